//! Display sinks for VGA scanout.
//!
//! The driver feeds every scanned pixel to a `Display` and calls `present` on
//! each falling edge of vertical sync. `HeadlessDisplay` keeps the frame in
//! memory and can dump it as a binary PPM.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::common::SimError;
use crate::soc::devices::PixelOutput;

/// Sink for scanned-out pixels.
pub trait Display: std::fmt::Debug + Send {
    /// Records one pixel. Pixels outside the active area are ignored.
    fn update_pixel(&mut self, pixel: &PixelOutput);
    /// Completes the current frame.
    fn present(&mut self);
    /// Returns `true` once the display wants the simulation to stop.
    fn quit_requested(&self) -> bool;

    /// Downcast to the in-memory display.
    fn as_headless(&self) -> Option<&HeadlessDisplay> {
        None
    }
}

/// Expands a 2-bit color channel to 8 bits.
pub const fn expand_channel(value: u8) -> u8 {
    (value & 0b11) * 85
}

/// Converts a 6-bit `RRGGBB` color to opaque ARGB8888.
pub const fn rrggbb_to_argb(rrggbb: u8) -> u32 {
    let r = expand_channel(rrggbb >> 4) as u32;
    let g = expand_channel(rrggbb >> 2) as u32;
    let b = expand_channel(rrggbb) as u32;
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

/// In-memory display used for batch runs and tests.
#[derive(Clone, Debug)]
pub struct HeadlessDisplay {
    width: u32,
    height: u32,
    frame: Vec<u32>,
    frames: u64,
    quit_after: Option<u64>,
}

impl HeadlessDisplay {
    /// Creates a black frame of `width` x `height` pixels.
    ///
    /// # Arguments
    ///
    /// * `quit_after` - Request quit once this many frames have been presented.
    pub fn new(width: u32, height: u32, quit_after: Option<u64>) -> Self {
        Self {
            width,
            height,
            frame: vec![0xFF00_0000; (width as usize) * (height as usize)],
            frames: 0,
            quit_after,
        }
    }

    /// Frame width in pixels.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of frames presented so far.
    pub const fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// ARGB value of pixel (`x`, `y`), or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.frame
            .get((y as usize) * (self.width as usize) + (x as usize))
            .copied()
    }

    /// Writes the current frame as a binary (P6) PPM.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if the file cannot be created or written.
    pub fn write_ppm(&self, path: &Path) -> Result<(), SimError> {
        let file = File::create(path).map_err(|e| SimError::io(path, e))?;
        let mut out = BufWriter::new(file);
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)
            .map_err(|e| SimError::io(path, e))?;
        for argb in &self.frame {
            let [_, r, g, b] = argb.to_be_bytes();
            out.write_all(&[r, g, b]).map_err(|e| SimError::io(path, e))?;
        }
        out.flush().map_err(|e| SimError::io(path, e))
    }
}

impl Display for HeadlessDisplay {
    fn update_pixel(&mut self, pixel: &PixelOutput) {
        if !pixel.active || pixel.x >= self.width || pixel.y >= self.height {
            return;
        }
        let idx = (pixel.y as usize) * (self.width as usize) + (pixel.x as usize);
        if let Some(slot) = self.frame.get_mut(idx) {
            *slot = rrggbb_to_argb(pixel.rrggbb);
        }
    }

    fn present(&mut self) {
        self.frames += 1;
        tracing::debug!(frame = self.frames, "frame presented");
    }

    fn quit_requested(&self) -> bool {
        self.quit_after.is_some_and(|n| self.frames >= n)
    }

    fn as_headless(&self) -> Option<&HeadlessDisplay> {
        Some(self)
    }
}
