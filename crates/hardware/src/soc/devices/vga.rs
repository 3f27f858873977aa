//! VGA framebuffer controller.
//!
//! The controller spans two clock domains:
//! 1. **CPU domain:** Memory-mapped registers for control, framebuffer upload and
//!    the palette, written on CPU rising edges.
//! 2. **Pixel domain:** Scanout counters advanced by `scanout_tick` on the pixel
//!    clock, producing one pixel per tick with sync and blanking signals.
//!
//! The vertical-blank flag is generated in the pixel domain and only reaches the
//! STATUS register after passing through a synchronizer clocked by the CPU.
//!
//! # Memory Map
//!
//! * `0x000`: STATUS (read-only, bit 0 = vertical blank)
//! * `0x004`: CTRL (read/write, bit 0 = display enable)
//! * `0x010`: UPLOAD_ADDR (read/write, framebuffer word index)
//! * `0x014`: STREAM_DATA (write-only, four 8-bit pixel indices, post-increments UPLOAD_ADDR)
//! * `0x400`-`0x7FC`: PALETTE (256 entries, 6-bit `RRGGBB`)

use serde::{Deserialize, Serialize};

use crate::common::DeviceSelect;
use crate::common::constants::SELECT_VGA;
use crate::soc::sync::Synchronizer;
use crate::soc::traits::Peripheral;

/// Offset of the status register.
pub const VGA_STATUS: u32 = 0x000;
/// Offset of the control register.
pub const VGA_CTRL: u32 = 0x004;
/// Offset of the upload address register.
pub const VGA_UPLOAD_ADDR: u32 = 0x010;
/// Offset of the stream data register.
pub const VGA_STREAM_DATA: u32 = 0x014;
/// Offset of the first palette entry.
pub const VGA_PALETTE_BASE: u32 = 0x400;
/// Number of palette entries.
pub const PALETTE_ENTRIES: usize = 256;

/// Framebuffer width in pixels.
pub const FB_WIDTH: u32 = 320;
/// Framebuffer height in pixels.
pub const FB_HEIGHT: u32 = 200;
/// Pixels packed into one framebuffer word.
pub const PIXELS_PER_WORD: u32 = 4;
/// Framebuffer size in words.
pub const FB_WORDS: usize = (FB_WIDTH * FB_HEIGHT / PIXELS_PER_WORD) as usize;

/// Display enable bit of CTRL.
const CTRL_ENABLE: u32 = 1;
/// Implemented bits of a palette entry.
const PALETTE_MASK: u32 = 0x3F;

/// Horizontal and vertical scan timing, in pixel clocks and lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VgaTiming {
    /// Visible pixels per line.
    pub h_active: u32,
    /// Horizontal front porch.
    pub h_front_porch: u32,
    /// Horizontal sync pulse width.
    pub h_sync: u32,
    /// Horizontal back porch.
    pub h_back_porch: u32,
    /// Visible lines per frame.
    pub v_active: u32,
    /// Vertical front porch.
    pub v_front_porch: u32,
    /// Vertical sync pulse width.
    pub v_sync: u32,
    /// Vertical back porch.
    pub v_back_porch: u32,
}

impl Default for VgaTiming {
    /// Standard 640x480 @ 60 Hz timing.
    fn default() -> Self {
        Self {
            h_active: 640,
            h_front_porch: 16,
            h_sync: 96,
            h_back_porch: 48,
            v_active: 480,
            v_front_porch: 10,
            v_sync: 2,
            v_back_porch: 33,
        }
    }
}

impl VgaTiming {
    /// Pixel clocks per line, blanking included.
    pub const fn h_total(&self) -> u32 {
        self.h_active + self.h_front_porch + self.h_sync + self.h_back_porch
    }

    /// Lines per frame, blanking included.
    pub const fn v_total(&self) -> u32 {
        self.v_active + self.v_front_porch + self.v_sync + self.v_back_porch
    }

    /// Integer upscaling factor from the framebuffer to the visible area (at least 1).
    pub fn scale(&self) -> u32 {
        (self.h_active / FB_WIDTH)
            .min(self.v_active / FB_HEIGHT)
            .max(1)
    }
}

/// Pixel-domain outputs for one pixel clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelOutput {
    /// Horizontal position.
    pub x: u32,
    /// Vertical position.
    pub y: u32,
    /// Inside the visible area.
    pub active: bool,
    /// Horizontal sync, active low.
    pub hsync: bool,
    /// Vertical sync, active low.
    pub vsync: bool,
    /// Color as 2 bits each of red, green and blue.
    pub rrggbb: u8,
}

/// VGA controller state.
#[derive(Clone, Debug)]
pub struct Vga {
    timing: VgaTiming,
    scale: u32,
    ctrl: u32,
    upload_addr: u32,
    framebuffer: Vec<u32>,
    palette: [u8; PALETTE_ENTRIES],
    h: u32,
    v: u32,
    vblank_raw: bool,
    vblank: Synchronizer<bool>,
}

impl Vga {
    /// Creates a controller with the given timing and synchronizer depth.
    pub fn new(timing: VgaTiming, synchronizer_stages: usize) -> Self {
        Self {
            timing,
            scale: timing.scale(),
            ctrl: 0,
            upload_addr: 0,
            framebuffer: vec![0; FB_WORDS],
            palette: [0; PALETTE_ENTRIES],
            h: 0,
            v: 0,
            vblank_raw: false,
            vblank: Synchronizer::new(synchronizer_stages),
        }
    }

    /// Scan timing in use.
    pub const fn timing(&self) -> &VgaTiming {
        &self.timing
    }

    /// Whether CTRL enables the display.
    pub const fn display_enabled(&self) -> bool {
        self.ctrl & CTRL_ENABLE != 0
    }

    /// Vertical blank as generated in the pixel domain.
    pub const fn vblank_raw(&self) -> bool {
        self.vblank_raw
    }

    /// Vertical blank as seen by the CPU after synchronization.
    pub fn vblank_synchronized(&self) -> bool {
        self.vblank.output()
    }

    /// Palette index of framebuffer pixel (`x`, `y`), or `None` outside the framebuffer.
    pub fn pixel_index(&self, x: u32, y: u32) -> Option<u8> {
        if x >= FB_WIDTH || y >= FB_HEIGHT {
            return None;
        }
        let linear = y * FB_WIDTH + x;
        let word = self.framebuffer.get((linear / PIXELS_PER_WORD) as usize)?;
        Some((word >> ((linear % PIXELS_PER_WORD) * 8)) as u8)
    }

    /// Palette entry `index`.
    pub fn palette(&self, index: u8) -> u8 {
        self.palette[usize::from(index)]
    }

    /// Advances the scanout by one pixel clock and returns the pixel just scanned.
    pub fn scanout_tick(&mut self) -> PixelOutput {
        let t = self.timing;
        let (x, y) = (self.h, self.v);
        let active = x < t.h_active && y < t.v_active;
        let h_sync_start = t.h_active + t.h_front_porch;
        let v_sync_start = t.v_active + t.v_front_porch;
        let hsync = !(x >= h_sync_start && x < h_sync_start + t.h_sync);
        let vsync = !(y >= v_sync_start && y < v_sync_start + t.v_sync);

        let rrggbb = if active && self.display_enabled() {
            self.pixel_index(x / self.scale, y / self.scale)
                .map_or(0, |index| self.palette(index))
        } else {
            0
        };

        self.vblank_raw = y >= t.v_active;
        self.h += 1;
        if self.h >= t.h_total() {
            self.h = 0;
            self.v += 1;
            if self.v >= t.v_total() {
                self.v = 0;
            }
        }

        PixelOutput {
            x,
            y,
            active,
            hsync,
            vsync,
            rrggbb,
        }
    }

    fn stream(&mut self, value: u32) {
        match self.framebuffer.get_mut(self.upload_addr as usize) {
            Some(word) => *word = value,
            None => tracing::trace!(addr = self.upload_addr, "framebuffer upload out of range"),
        }
        self.upload_addr = self.upload_addr.wrapping_add(1);
    }

    fn palette_slot(offset: u32) -> Option<usize> {
        let index = offset.checked_sub(VGA_PALETTE_BASE)? / 4;
        let index = index as usize;
        (index < PALETTE_ENTRIES).then_some(index)
    }
}

impl Peripheral for Vga {
    fn name(&self) -> &'static str {
        "VGA"
    }

    fn device_select(&self) -> DeviceSelect {
        DeviceSelect(SELECT_VGA)
    }

    fn read(&self, offset: u32) -> u32 {
        match offset {
            VGA_STATUS => u32::from(self.vblank_synchronized()),
            VGA_CTRL => self.ctrl,
            VGA_UPLOAD_ADDR => self.upload_addr,
            _ => Self::palette_slot(offset).map_or(0, |i| u32::from(self.palette[i])),
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        match offset {
            VGA_CTRL => self.ctrl = value,
            VGA_UPLOAD_ADDR => self.upload_addr = value,
            VGA_STREAM_DATA => self.stream(value),
            _ => {
                if let Some(i) = Self::palette_slot(offset) {
                    self.palette[i] = (value & PALETTE_MASK) as u8;
                }
            }
        }
    }

    fn tick(&mut self) {
        let _ = self.vblank.clock(self.vblank_raw);
    }

    fn as_vga(&self) -> Option<&Vga> {
        Some(self)
    }

    fn as_vga_mut(&mut self) -> Option<&mut Vga> {
        Some(self)
    }
}
