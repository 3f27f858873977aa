//! Configuration system for the SoC simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline constants for the clock, memory, halt convention and peripherals.
//! 2. **Structures:** Hierarchical config for general, memory, device and signature settings.
//! 3. **Validation:** `Config::validate` rejects inconsistent settings before a run starts.
//!
//! Configuration is supplied as JSON (every field optional) or built with `Config::default()`
//! and overridden field by field, as the CLI does.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::common::SimError;
use crate::soc::devices::VgaTiming;
use crate::soc::sync::MIN_SYNC_STAGES;

/// Default configuration constants for the simulator.
mod defaults {
    /// Driver time steps before a run is reported as timed out.
    pub const CYCLE_BUDGET: u64 = 10_000;

    /// The CPU clock toggles when the step counter exceeds this value.
    pub const CLOCK_DIVIDER: u32 = 1;

    /// Reset is held while the step count is at or below this value.
    pub const RESET_STEPS: u64 = 2;

    /// Reset vector of the core.
    pub const ENTRY_POINT: u32 = crate::common::constants::DEFAULT_LOAD_ADDRESS;

    /// Byte address at which flat images are loaded.
    pub const LOAD_ADDRESS: u32 = crate::common::constants::DEFAULT_LOAD_ADDRESS;

    /// Sentinel that stops the run when found at the halt address.
    pub const HALT_VALUE: u32 = crate::common::constants::HALT_SENTINEL;

    /// Memory capacity in 32-bit words (64 MiB).
    pub const MEMORY_WORDS: usize = 16 * 1024 * 1024;

    /// The pixel clock toggles when the step counter exceeds this value (same rate as the CPU).
    pub const PIXEL_CLOCK_DIVIDER: u32 = 1;

    /// Register stages between the pixel and CPU clock domains.
    pub const SYNCHRONIZER_STAGES: usize = 2;
}

/// Root configuration structure.
///
/// # Example
///
/// ```
/// use socsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "cycle_budget": 500000, "halt_address": 8192 },
///     "memory": { "words": 1048576 },
///     "devices": { "vga": { "enabled": true, "quit_after_frames": 2 } }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.general.cycle_budget, 500_000);
/// assert_eq!(config.general.halt_value, 0xBABE_CAFE);
/// assert_eq!(config.memory.words, 1 << 20);
/// assert!(config.devices.vga.enabled);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Main memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Peripheral configuration
    #[serde(default)]
    pub devices: DeviceConfig,
    /// Signature extraction configuration
    #[serde(default)]
    pub signature: SignatureConfig,
}

impl Config {
    /// Parses a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        serde_json::from_str(text).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Checks settings that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` for zero-capacity memory, a synchronizer with fewer
    /// than two stages, or a load address beyond the end of memory.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.memory.words == 0 {
            return Err(SimError::Config("memory capacity must be at least one word".into()));
        }
        if self.devices.vga.synchronizer_stages < MIN_SYNC_STAGES {
            return Err(SimError::Config(format!(
                "synchronizer needs at least {MIN_SYNC_STAGES} stages, got {}",
                self.devices.vga.synchronizer_stages
            )));
        }
        let size_bytes = self.memory.words.saturating_mul(4);
        if self.general.load_address as usize >= size_bytes {
            return Err(SimError::Config(format!(
                "load address {:#x} is beyond memory ({size_bytes} bytes)",
                self.general.load_address
            )));
        }
        Ok(())
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Driver time steps before the run stops as timed out
    #[serde(default = "GeneralConfig::default_cycle_budget")]
    pub cycle_budget: u64,

    /// CPU clock divider: the clock toggles when the step counter exceeds it
    #[serde(default = "GeneralConfig::default_clock_divider")]
    pub clock_divider: u32,

    /// Reset is asserted while the step count is at or below this value
    #[serde(default = "GeneralConfig::default_reset_steps")]
    pub reset_steps: u64,

    /// Reset vector; an ELF image's entry point overrides it
    #[serde(default = "GeneralConfig::default_entry_point")]
    pub entry_point: u32,

    /// Byte address at which a flat image is loaded
    #[serde(default = "GeneralConfig::default_load_address")]
    pub load_address: u32,

    /// Word polled for the halt sentinel; 0 disables polling
    #[serde(default)]
    pub halt_address: u32,

    /// Sentinel value that stops the run
    #[serde(default = "GeneralConfig::default_halt_value")]
    pub halt_value: u32,

    /// Program image to load
    #[serde(default)]
    pub image_path: Option<PathBuf>,

    /// Value Change Dump output path
    #[serde(default)]
    pub trace_path: Option<PathBuf>,
}

impl GeneralConfig {
    fn default_cycle_budget() -> u64 {
        defaults::CYCLE_BUDGET
    }

    fn default_clock_divider() -> u32 {
        defaults::CLOCK_DIVIDER
    }

    fn default_reset_steps() -> u64 {
        defaults::RESET_STEPS
    }

    fn default_entry_point() -> u32 {
        defaults::ENTRY_POINT
    }

    fn default_load_address() -> u32 {
        defaults::LOAD_ADDRESS
    }

    fn default_halt_value() -> u32 {
        defaults::HALT_VALUE
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cycle_budget: defaults::CYCLE_BUDGET,
            clock_divider: defaults::CLOCK_DIVIDER,
            reset_steps: defaults::RESET_STEPS,
            entry_point: defaults::ENTRY_POINT,
            load_address: defaults::LOAD_ADDRESS,
            halt_address: 0,
            halt_value: defaults::HALT_VALUE,
            image_path: None,
            trace_path: None,
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Capacity in 32-bit words
    #[serde(default = "MemoryConfig::default_words")]
    pub words: usize,
}

impl MemoryConfig {
    fn default_words() -> usize {
        defaults::MEMORY_WORDS
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            words: defaults::MEMORY_WORDS,
        }
    }
}

/// Peripheral configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Echo UART transmit bytes to stdout
    #[serde(default)]
    pub uart_echo: bool,

    /// Forward host stdin into the UART receiver
    #[serde(default)]
    pub uart_stdin: bool,

    /// VGA controller and display settings
    #[serde(default)]
    pub vga: VgaConfig,
}

/// VGA controller and display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VgaConfig {
    /// Attach the VGA controller and a headless display
    #[serde(default)]
    pub enabled: bool,

    /// Pixel clock divider: the pixel clock toggles when the step counter exceeds it
    #[serde(default = "VgaConfig::default_pixel_clock_divider")]
    pub pixel_clock_divider: u32,

    /// Scan timing
    #[serde(default)]
    pub timing: VgaTiming,

    /// Stop the run after this many presented frames
    #[serde(default)]
    pub quit_after_frames: Option<u64>,

    /// Register stages for the vertical-blank crossing (at least 2)
    #[serde(default = "VgaConfig::default_synchronizer_stages")]
    pub synchronizer_stages: usize,

    /// Write the last frame to this path as a PPM image
    #[serde(default)]
    pub frame_dump: Option<PathBuf>,
}

impl VgaConfig {
    fn default_pixel_clock_divider() -> u32 {
        defaults::PIXEL_CLOCK_DIVIDER
    }

    fn default_synchronizer_stages() -> usize {
        defaults::SYNCHRONIZER_STAGES
    }
}

impl Default for VgaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pixel_clock_divider: defaults::PIXEL_CLOCK_DIVIDER,
            timing: VgaTiming::default(),
            quit_after_frames: None,
            synchronizer_stages: defaults::SYNCHRONIZER_STAGES,
            frame_dump: None,
        }
    }
}

/// Signature extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Output file; no signature is written when absent
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Explicit first byte address of the region
    #[serde(default)]
    pub begin: Option<u32>,

    /// Explicit end (exclusive) of the region
    #[serde(default)]
    pub end: Option<u32>,

    /// ELF image whose `begin_signature`/`end_signature` symbols delimit the region
    #[serde(default)]
    pub elf: Option<PathBuf>,
}
