//! RV32I SoC simulator CLI.
//!
//! This binary is a thin wrapper around `socsim_core`. It performs:
//! 1. **Configuration:** Loads an optional JSON config and applies flag overrides on top.
//! 2. **Run:** Builds the machine, loads the image and drives it to a halt condition.
//! 3. **Artifacts:** Writes the compliance signature, frame dump and optional JSON report.
//!
//! Numeric flags accept decimal or `0x`-prefixed hexadecimal.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use socsim_core::{Config, SimError, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "socsim",
    author,
    version,
    about = "Cycle-driven RV32I SoC simulator",
    long_about = "Run a program on a small RV32I SoC with a timer, UART and VGA controller.\n\nExamples:\n  socsim --image program.bin --halt 0x2000 --time 1000000\n  socsim --image test.elf --signature-elf test.elf --signature-out test.signature\n  socsim --image demo.bin --vga --quit-after 3 --frame-dump frame.ppm"
)]
struct Cli {
    /// JSON configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Program image (ELF or flat binary).
    #[arg(long)]
    image: Option<PathBuf>,

    /// Driver time steps before the run times out.
    #[arg(long, value_parser = parse_u64)]
    time: Option<u64>,

    /// Memory capacity in 32-bit words.
    #[arg(long, value_parser = parse_u64)]
    memory: Option<u64>,

    /// Address polled for the halt sentinel.
    #[arg(long, value_parser = parse_u32)]
    halt: Option<u32>,

    /// Write a Value Change Dump of the core ports to this file.
    #[arg(long)]
    vcd: Option<PathBuf>,

    /// Signature region and output file: BEGIN END FILE.
    #[arg(long, num_args = 3, value_names = ["BEGIN", "END", "FILE"])]
    signature: Option<Vec<String>>,

    /// ELF whose begin_signature/end_signature symbols delimit the signature.
    #[arg(long)]
    signature_elf: Option<PathBuf>,

    /// Signature output file when the range comes from symbols.
    #[arg(long)]
    signature_out: Option<PathBuf>,

    /// Attach the VGA controller and a headless display.
    #[arg(long)]
    vga: bool,

    /// Stop after this many presented frames.
    #[arg(long)]
    quit_after: Option<u64>,

    /// Write the last VGA frame as a PPM image.
    #[arg(long)]
    frame_dump: Option<PathBuf>,

    /// Echo UART output to stdout.
    #[arg(long)]
    uart_echo: bool,

    /// Feed stdin into the UART receiver.
    #[arg(long)]
    uart_stdin: bool,

    /// Write the run report as JSON to this file.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Builds the configuration, runs the simulation and writes the requested artifacts.
fn run(cli: &Cli) -> Result<(), SimError> {
    let config = build_config(cli)?;
    let mut sim = Simulator::from_config(&config)?;
    let report = sim.run()?;
    sim.write_artifacts(&config)?;

    println!("\n[*] {}", report.outcome);
    report.stats.print();

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| SimError::Config(format!("cannot serialize report: {e}")))?;
        fs::write(path, json).map_err(|e| SimError::io(path, e))?;
    }
    Ok(())
}

/// Loads the JSON config (if any) and applies flag overrides.
fn build_config(cli: &Cli) -> Result<Config, SimError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
            Config::from_json(&text)?
        }
        None => Config::default(),
    };

    let general = &mut config.general;
    if let Some(image) = &cli.image {
        general.image_path = Some(image.clone());
    }
    if let Some(time) = cli.time {
        general.cycle_budget = time;
    }
    if let Some(halt) = cli.halt {
        general.halt_address = halt;
    }
    if let Some(vcd) = &cli.vcd {
        general.trace_path = Some(vcd.clone());
    }
    if let Some(words) = cli.memory {
        config.memory.words = usize::try_from(words)
            .map_err(|_| SimError::Config(format!("memory size {words} does not fit this host")))?;
    }

    if let Some(args) = &cli.signature {
        let [begin, end, file] = args.as_slice() else {
            return Err(SimError::Config("--signature takes BEGIN END FILE".into()));
        };
        config.signature.begin = Some(parse_u32(begin).map_err(SimError::Config)?);
        config.signature.end = Some(parse_u32(end).map_err(SimError::Config)?);
        config.signature.output = Some(PathBuf::from(file));
    }
    if let Some(elf) = &cli.signature_elf {
        config.signature.elf = Some(elf.clone());
    }
    if let Some(out) = &cli.signature_out {
        config.signature.output = Some(out.clone());
    }

    let devices = &mut config.devices;
    devices.uart_echo |= cli.uart_echo;
    devices.uart_stdin |= cli.uart_stdin;
    devices.vga.enabled |= cli.vga;
    if let Some(frames) = cli.quit_after {
        devices.vga.quit_after_frames = Some(frames);
    }
    if let Some(path) = &cli.frame_dump {
        devices.vga.frame_dump = Some(path.clone());
    }

    config.validate()?;
    tracing::debug!(?config, "effective configuration");
    Ok(config)
}

/// Parses a decimal or `0x`-prefixed hexadecimal `u64`.
fn parse_u64(text: &str) -> Result<u64, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{text}': {e}"))
}

/// Parses a decimal or `0x`-prefixed hexadecimal `u32`.
fn parse_u32(text: &str) -> Result<u32, String> {
    let value = parse_u64(text)?;
    u32::try_from(value).map_err(|_| format!("'{text}' does not fit in 32 bits"))
}
