//! Clock-Edge Driver.
//!
//! The simulator owns the whole machine (core, bus, interrupt lines, clocks,
//! display) and advances it one driver time step at a time. Each step it:
//! 1. **Clocks:** Steps the CPU clock divider; reset is held for the first
//!    `reset_steps` steps.
//! 2. **Commits (rising edge only):** Routes the core's store to exactly one
//!    target, commits the core's registers, CSRs and PC, ticks the peripherals
//!    and resamples the interrupt lines.
//! 3. **Settles:** Fetches the instruction at the new PC, re-evaluates the core
//!    and drives the read-data wire from whichever target the access selects,
//!    ready for the next edge.
//! 4. **Scans out:** Advances the pixel clock domain and feeds the display.
//! 5. **Checks for completion:** Halt sentinel, display quit request, step budget.

use std::fmt;

use serde::Serialize;

use crate::common::SimError;
use crate::common::constants::DEVICE_MASK;
use crate::config::Config;
use crate::core::ports::{CoreInputs, CoreOutputs};
use crate::core::{CpuCore, SingleCycleCore};
use crate::isa::rv32i::opcodes::OP_LOAD;
use crate::sim::debug::MemoryDebugPort;
use crate::sim::loader::{LoadedImage, load_image};
use crate::sim::signature::{SignatureRange, write_signature};
use crate::sim::symbols::lookup_signature_symbols;
use crate::sim::vcd::{PORT_SIGNAL_COUNT, PORT_SIGNALS, VcdTracer};
use crate::soc::devices::{Timer, Uart, Vga};
use crate::soc::display::{Display, HeadlessDisplay};
use crate::soc::interconnect::{Route, SystemBus};
use crate::soc::irq::InterruptLines;
use crate::soc::memory::Memory;
use crate::soc::sync::{ClockDivider, Edge};
use crate::stats::SimStats;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SimOutcome {
    /// The halt sentinel appeared at the halt address.
    Halted {
        /// Driver steps taken.
        steps: u64,
    },
    /// The step budget ran out. Not an error: many programs loop after success.
    TimedOut {
        /// Driver steps taken.
        steps: u64,
    },
    /// The attached display asked to stop.
    QuitRequested {
        /// Driver steps taken.
        steps: u64,
    },
}

impl SimOutcome {
    /// Driver steps taken before the run stopped.
    pub const fn steps(self) -> u64 {
        match self {
            Self::Halted { steps } | Self::TimedOut { steps } | Self::QuitRequested { steps } => {
                steps
            }
        }
    }
}

impl fmt::Display for SimOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halted { steps } => write!(f, "halted after {steps} steps"),
            Self::TimedOut { steps } => write!(f, "timed out after {steps} steps"),
            Self::QuitRequested { steps } => write!(f, "quit requested after {steps} steps"),
        }
    }
}

/// Result of a complete run.
#[derive(Clone, Debug, Serialize)]
pub struct SimReport {
    /// Why the run stopped.
    pub outcome: SimOutcome,
    /// Counters collected during the run.
    pub stats: SimStats,
}

/// Run-control settings taken from the configuration.
#[derive(Clone, Copy, Debug)]
struct RunSettings {
    cycle_budget: u64,
    reset_steps: u64,
    halt_address: u32,
    halt_value: u32,
}

impl RunSettings {
    const fn from_config(config: &Config) -> Self {
        Self {
            cycle_budget: config.general.cycle_budget,
            reset_steps: config.general.reset_steps,
            halt_address: config.general.halt_address,
            halt_value: config.general.halt_value,
        }
    }
}

/// Wires that carry values from one step to the next.
#[derive(Clone, Copy, Debug, Default)]
struct Wires {
    reset: bool,
    instruction: u32,
    read_data: u32,
    outputs: CoreOutputs,
}

/// Top-level simulator: a CPU core plus the machine it drives.
#[derive(Debug)]
pub struct Simulator<C: CpuCore = SingleCycleCore> {
    core: C,
    bus: SystemBus,
    lines: InterruptLines,
    cpu_clock: ClockDivider,
    pixel_clock: ClockDivider,
    display: Option<Box<dyn Display>>,
    prev_vsync: bool,
    tracer: Option<VcdTracer>,
    image: Option<LoadedImage>,
    settings: RunSettings,
    wires: Wires,
    stats: SimStats,
}

impl Simulator<SingleCycleCore> {
    /// Builds the machine described by `config`.
    ///
    /// Memory is allocated, the image (if any) is loaded, the reference core is
    /// reset to the image's entry point (or `entry_point` for flat images), and
    /// the timer, UART and optionally the VGA controller are attached.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration, a missing, unreadable or
    /// oversized image, or a trace file that cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let mut memory = Memory::new(config.memory.words);
        let image = match &config.general.image_path {
            Some(path) => {
                let image = load_image(path, config.general.load_address)?;
                image.install(&mut memory)?;
                Some(image)
            }
            None => None,
        };
        let entry = image
            .as_ref()
            .and_then(|i| i.entry)
            .unwrap_or(config.general.entry_point);

        let bus = build_bus(config, memory);
        let mut sim = Self::with_core(SingleCycleCore::new(entry), bus, config)?;
        sim.image = image;
        Ok(sim)
    }
}

/// Attaches the standard peripherals to a bus around `memory`.
pub fn build_bus(config: &Config, memory: Memory) -> SystemBus {
    let mut bus = SystemBus::new(memory);
    let vga = &config.devices.vga;
    if vga.enabled {
        let _ = bus.add_peripheral(Box::new(Vga::new(vga.timing, vga.synchronizer_stages)));
    }
    let mut uart = Uart::new(config.devices.uart_echo);
    if config.devices.uart_stdin {
        uart.attach_stdin();
    }
    let _ = bus.add_peripheral(Box::new(uart));
    let _ = bus.add_peripheral(Box::new(Timer::new()));
    bus
}

impl<C: CpuCore> Simulator<C> {
    /// Wraps an existing core and bus.
    ///
    /// A headless display is attached when the VGA controller is enabled, and a
    /// VCD trace is opened when `trace_path` is set.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if the trace file cannot be created.
    pub fn with_core(core: C, bus: SystemBus, config: &Config) -> Result<Self, SimError> {
        let vga = &config.devices.vga;
        let display: Option<Box<dyn Display>> = vga.enabled.then(|| {
            Box::new(HeadlessDisplay::new(
                vga.timing.h_active,
                vga.timing.v_active,
                vga.quit_after_frames,
            )) as Box<dyn Display>
        });
        let tracer = match &config.general.trace_path {
            Some(path) => Some(VcdTracer::create(path, &PORT_SIGNALS)?),
            None => None,
        };
        Ok(Self {
            core,
            bus,
            lines: InterruptLines::new(),
            cpu_clock: ClockDivider::new(config.general.clock_divider),
            pixel_clock: ClockDivider::new(vga.pixel_clock_divider),
            display,
            prev_vsync: true,
            tracer,
            image: None,
            settings: RunSettings::from_config(config),
            wires: Wires::default(),
            stats: SimStats::default(),
        })
    }

    /// Replaces the display sink.
    pub fn set_display(&mut self, display: Box<dyn Display>) {
        self.display = Some(display);
    }

    /// Forces interrupt flag bits on regardless of device state; pass 0 to release.
    pub const fn set_interrupt_flag(&mut self, mask: u32) {
        self.lines.force(mask);
    }

    /// Runs until a halt condition and returns the report.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if the VCD trace could not be written.
    pub fn run(&mut self) -> Result<SimReport, SimError> {
        let outcome = loop {
            if let Some(outcome) = self.step() {
                break outcome;
            }
        };
        tracing::info!(%outcome, cycles = self.stats.cycles, "simulation finished");
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.finish()?;
        }
        Ok(SimReport {
            outcome,
            stats: self.stats.clone(),
        })
    }

    /// Advances up to `steps` driver steps, stopping early at a halt condition.
    pub fn run_steps(&mut self, steps: u64) -> Option<SimOutcome> {
        (0..steps).find_map(|_| self.step())
    }

    /// Advances until `cycles` more CPU rising edges have been committed.
    pub fn run_cycles(&mut self, cycles: u64) -> Option<SimOutcome> {
        let target = self.stats.cycles + cycles;
        while self.stats.cycles < target {
            if let Some(outcome) = self.step() {
                return Some(outcome);
            }
        }
        None
    }

    /// Advances one driver time step.
    ///
    /// # Returns
    ///
    /// The outcome if a halt condition was reached on this step.
    pub fn step(&mut self) -> Option<SimOutcome> {
        self.stats.steps += 1;
        let steps = self.stats.steps;
        self.wires.reset = steps <= self.settings.reset_steps;

        if self.cpu_clock.step() == Edge::Rising {
            self.rising_edge();
        }
        self.settle();
        let quit = self.scanout();
        self.trace();

        if self.halted() {
            tracing::info!(steps, address = self.settings.halt_address, "halt sentinel observed");
            return Some(SimOutcome::Halted { steps });
        }
        if quit {
            tracing::info!(steps, "display requested quit");
            return Some(SimOutcome::QuitRequested { steps });
        }
        if steps >= self.settings.cycle_budget {
            tracing::info!(steps, "step budget exhausted");
            return Some(SimOutcome::TimedOut { steps });
        }
        None
    }

    fn inputs(&self) -> CoreInputs {
        CoreInputs {
            reset: self.wires.reset,
            instruction: self.wires.instruction,
            instruction_valid: true,
            interrupt_flag: self.lines.flag(),
            read_data: self.wires.read_data,
        }
    }

    /// Commits everything the core and peripherals latch on a CPU rising edge.
    fn rising_edge(&mut self) {
        let inputs = self.inputs();
        let outputs = self.core.eval(&inputs);
        let address = outputs.effective_address();

        if !inputs.reset {
            if outputs.memory.write_enable {
                let route = self.bus.write(
                    address,
                    outputs.memory.write_data,
                    outputs.memory.write_strobe,
                );
                match route {
                    Route::Memory { .. } => self.stats.memory_writes += 1,
                    Route::Peripheral { .. } => self.stats.mmio_writes += 1,
                }
            } else if inputs.instruction & 0x7F == OP_LOAD
                && matches!(self.bus.route(address), Route::Peripheral { .. })
            {
                self.stats.mmio_reads += 1;
            }
        }

        let report = self.core.clock_edge(&inputs);
        if !inputs.reset {
            self.stats.record_edge(&report);
        }
        if let Some(source) = report.taken_interrupt() {
            self.lines.acknowledge(source);
        }

        self.bus.tick();
        self.lines.sample(self.bus.irq_signals());
    }

    /// Drives the fetch and read-data wires from the state committed so far.
    fn settle(&mut self) {
        let pc = self.core.instruction_address();
        self.wires.instruction = self.bus.memory().read(pc & DEVICE_MASK);
        let outputs = self.core.eval(&self.inputs());
        self.wires.read_data = self.bus.read(outputs.effective_address());
        self.wires.outputs = outputs;
    }

    /// Advances the pixel clock domain; returns `true` if the display wants to quit.
    fn scanout(&mut self) -> bool {
        if self.pixel_clock.step() != Edge::Rising {
            return false;
        }
        let Some(vga) = self.bus.vga_mut() else {
            return false;
        };
        let pixel = vga.scanout_tick();
        let falling_vsync = self.prev_vsync && !pixel.vsync;
        self.prev_vsync = pixel.vsync;

        let Some(display) = self.display.as_mut() else {
            return false;
        };
        display.update_pixel(&pixel);
        if falling_vsync {
            display.present();
            self.stats.frames_presented += 1;
            return display.quit_requested();
        }
        false
    }

    fn halted(&self) -> bool {
        self.settings.halt_address != 0
            && self.bus.memory().read(self.settings.halt_address & DEVICE_MASK)
                == self.settings.halt_value
    }

    fn trace(&mut self) {
        let Some(tracer) = self.tracer.as_mut() else {
            return;
        };
        let w = &self.wires;
        let m = &w.outputs.memory;
        let values: [u64; PORT_SIGNAL_COUNT] = [
            u64::from(self.cpu_clock.level()),
            u64::from(w.reset),
            u64::from(w.outputs.instruction_address),
            u64::from(w.instruction),
            w.outputs.device_select.index() as u64,
            u64::from(m.address),
            u64::from(m.write_data),
            u64::from(m.write_enable),
            u64::from(m.write_strobe.bits()),
            u64::from(w.read_data),
            u64::from(self.lines.flag()),
        ];
        tracer.sample(self.stats.steps, &values);
    }

    /// Resolves the signature region for `config`.
    ///
    /// Explicit bounds win; otherwise the `begin_signature`/`end_signature`
    /// symbols are looked up in the configured ELF, or in the loaded image.
    /// A failed lookup falls back to the default region.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured ELF cannot be read.
    pub fn signature_range(&self, config: &Config) -> Result<SignatureRange, SimError> {
        let signature = &config.signature;
        if let (Some(begin), Some(end)) = (signature.begin, signature.end) {
            return Ok(SignatureRange::resolve(begin, end));
        }
        let (begin, end) = match &signature.elf {
            Some(path) => {
                if !path.exists() {
                    return Err(SimError::MissingImage(path.clone()));
                }
                let bytes = std::fs::read(path).map_err(|e| SimError::io(path, e))?;
                lookup_signature_symbols(&bytes)
            }
            None => self
                .image
                .as_ref()
                .map_or((0, 0), |image| lookup_signature_symbols(&image.raw)),
        };
        Ok(SignatureRange::resolve(begin, end))
    }

    /// Writes the artifacts `config` asks for: signature file and frame dump.
    ///
    /// # Errors
    ///
    /// Returns an error if an artifact cannot be written.
    pub fn write_artifacts(&self, config: &Config) -> Result<(), SimError> {
        if let Some(path) = &config.signature.output {
            let range = self.signature_range(config)?;
            write_signature(self.bus.memory(), range, path)?;
        }
        if let Some(path) = &config.devices.vga.frame_dump {
            match self.display.as_deref().and_then(|d| d.as_headless()) {
                Some(display) => display.write_ppm(path)?,
                None => tracing::warn!(path = %path.display(), "no headless display; frame not dumped"),
            }
        }
        Ok(())
    }

    /// Returns the CPU core.
    pub const fn core(&self) -> &C {
        &self.core
    }

    /// Returns the system bus.
    pub const fn bus(&self) -> &SystemBus {
        &self.bus
    }

    /// Returns the system bus mutably (test setup, host input injection).
    pub const fn bus_mut(&mut self) -> &mut SystemBus {
        &mut self.bus
    }

    /// Returns the attached display, if any.
    pub fn display(&self) -> Option<&dyn Display> {
        self.display.as_deref()
    }

    /// Returns the loaded program image, if any.
    pub const fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    /// Opens a read-only debug port into memory.
    pub const fn memory_port(&self) -> MemoryDebugPort<'_> {
        MemoryDebugPort::new(self.bus.memory())
    }

    /// Reads general register `index` through the core's debug port.
    pub fn debug_read_register(&self, index: usize) -> u32 {
        self.core.debug_read_register(index)
    }

    /// Reads CSR `address` through the core's debug port.
    pub fn debug_read_csr(&self, address: u32) -> u32 {
        self.core.debug_read_csr(address)
    }

    /// Returns the interrupt flag vector presented to the core.
    pub const fn interrupt_flag(&self) -> u32 {
        self.lines.flag()
    }

    /// Returns the counters collected so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }
}
