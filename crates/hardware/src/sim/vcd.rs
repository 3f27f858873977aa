//! Value Change Dump tracing of the core's port signals.
//!
//! The tracer streams to a file: the header and initial values are written on
//! creation, then each driver step emits a timestamp followed by only the
//! signals whose value changed. A write failure disables the tracer and is
//! reported by `finish`.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::common::SimError;

/// Name and bit width of one traced signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalSpec {
    /// Wire name in the dump.
    pub name: &'static str,
    /// Width in bits.
    pub width: u32,
}

/// Signals traced by the simulator, in the order `sample` expects them.
pub const PORT_SIGNALS: [SignalSpec; 11] = [
    SignalSpec { name: "clock", width: 1 },
    SignalSpec { name: "reset", width: 1 },
    SignalSpec { name: "instruction_address", width: 32 },
    SignalSpec { name: "instruction", width: 32 },
    SignalSpec { name: "device_select", width: 3 },
    SignalSpec { name: "memory_address", width: 32 },
    SignalSpec { name: "write_data", width: 32 },
    SignalSpec { name: "write_enable", width: 1 },
    SignalSpec { name: "write_strobe", width: 4 },
    SignalSpec { name: "read_data", width: 32 },
    SignalSpec { name: "interrupt_flag", width: 32 },
];

/// Number of traced port signals.
pub const PORT_SIGNAL_COUNT: usize = PORT_SIGNALS.len();

/// Streaming VCD writer.
pub struct VcdTracer {
    path: PathBuf,
    writer: Option<BufWriter<Box<dyn Write + Send>>>,
    ids: Vec<String>,
    widths: Vec<u32>,
    previous: Vec<u64>,
    error: Option<io::Error>,
}

impl std::fmt::Debug for VcdTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcdTracer")
            .field("path", &self.path)
            .field("signals", &self.ids.len())
            .field("active", &self.writer.is_some())
            .finish_non_exhaustive()
    }
}

impl VcdTracer {
    /// Creates `path` and writes the header for `signals`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if the file cannot be created or the header written.
    pub fn create(path: &Path, signals: &[SignalSpec]) -> Result<Self, SimError> {
        let file = File::create(path).map_err(|e| SimError::io(path, e))?;
        Self::with_writer(path, Box::new(file), signals).map_err(|e| SimError::io(path, e))
    }

    /// Wraps an arbitrary writer; `label` is only used in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns the writer's error if the header cannot be written.
    pub fn with_writer(
        label: &Path,
        writer: Box<dyn Write + Send>,
        signals: &[SignalSpec],
    ) -> io::Result<Self> {
        let mut tracer = Self {
            path: label.to_path_buf(),
            writer: Some(BufWriter::with_capacity(1 << 20, writer)),
            ids: (0..signals.len()).map(vcd_id).collect(),
            widths: signals.iter().map(|s| s.width).collect(),
            previous: vec![0; signals.len()],
            error: None,
        };
        tracer.write_header(signals)?;
        Ok(tracer)
    }

    fn write_header(&mut self, signals: &[SignalSpec]) -> io::Result<()> {
        let mut header = String::new();
        let _ = writeln!(header, "$timescale 1ns $end");
        let _ = writeln!(header, "$scope module soc $end");
        for (spec, id) in signals.iter().zip(&self.ids) {
            let _ = writeln!(header, "$var wire {} {} {} $end", spec.width, id, spec.name);
        }
        let _ = writeln!(header, "$upscope $end");
        let _ = writeln!(header, "$enddefinitions $end");
        let _ = writeln!(header, "#0");
        let _ = writeln!(header, "$dumpvars");
        for (idx, id) in self.ids.iter().enumerate() {
            header.push_str(&format_value(0, self.widths[idx], id));
            header.push('\n');
        }
        let _ = writeln!(header, "$end");
        match self.writer.as_mut() {
            Some(w) => w.write_all(header.as_bytes()),
            None => Ok(()),
        }
    }

    /// Records the signal values at `time`, emitting only changes.
    ///
    /// Values beyond the declared signal count are ignored.
    pub fn sample(&mut self, time: u64, values: &[u64]) {
        if self.writer.is_none() {
            return;
        }
        let mut out = String::new();
        for (idx, &value) in values.iter().enumerate().take(self.previous.len()) {
            if self.previous[idx] == value {
                continue;
            }
            if out.is_empty() {
                let _ = writeln!(out, "#{time}");
            }
            self.previous[idx] = value;
            out.push_str(&format_value(value, self.widths[idx], &self.ids[idx]));
            out.push('\n');
        }
        if out.is_empty() {
            return;
        }
        if let Some(writer) = self.writer.as_mut()
            && let Err(e) = writer.write_all(out.as_bytes())
        {
            tracing::warn!(path = %self.path.display(), error = %e, "VCD write failed; tracing disabled");
            self.writer = None;
            self.error = Some(e);
        }
    }

    /// Flushes the dump.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` for the first write error seen, or a flush failure.
    pub fn finish(&mut self) -> Result<(), SimError> {
        if let Some(e) = self.error.take() {
            return Err(SimError::io(&self.path, e));
        }
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| SimError::io(&self.path, e))?;
        }
        Ok(())
    }
}

impl Drop for VcdTracer {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }
}

/// Short identifier for signal `idx`: printable ASCII from `!`, base 94.
fn vcd_id(idx: usize) -> String {
    const BASE: usize = 94;
    const FIRST: u8 = b'!';
    let mut id = Vec::new();
    let mut n = idx;
    loop {
        id.push(FIRST + (n % BASE) as u8);
        n /= BASE;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    id.reverse();
    String::from_utf8_lossy(&id).into_owned()
}

fn format_value(value: u64, width: u32, id: &str) -> String {
    if width == 1 {
        format!("{}{id}", value & 1)
    } else {
        format!("b{value:b} {id}")
    }
}
