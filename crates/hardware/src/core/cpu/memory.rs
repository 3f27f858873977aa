//! Load/Store Byte Lanes.
//!
//! Memory is word-organized: a load receives the whole aligned word on the
//! read-data wire and picks its bytes out of it; a store shifts its data into
//! the addressed lanes and raises the matching write strobes. Misaligned
//! halfword and word accesses are aligned down rather than trapping.

use crate::isa::rv32i::funct3;
use crate::soc::memory::WriteStrobe;

/// Extracts and extends the loaded value from the aligned word `word`.
///
/// # Returns
///
/// `None` for a `funct3` that does not encode a load.
pub fn load_value(f3: u32, address: u32, word: u32) -> Option<u32> {
    let byte_shift = (address & 0x3) * 8;
    let half_shift = (address & 0x2) * 8;
    let value = match f3 {
        funct3::LB => ((word >> byte_shift) as u8 as i8) as i32 as u32,
        funct3::LBU => (word >> byte_shift) & 0xFF,
        funct3::LH => ((word >> half_shift) as u16 as i16) as i32 as u32,
        funct3::LHU => (word >> half_shift) & 0xFFFF,
        funct3::LW => word,
        _ => return None,
    };
    Some(value)
}

/// Positions store data in its byte lanes.
///
/// # Returns
///
/// The lane-shifted write data and its strobe, or `None` for a `funct3` that
/// does not encode a store.
pub fn store_lanes(f3: u32, address: u32, data: u32) -> Option<(u32, WriteStrobe)> {
    match f3 {
        funct3::SB => {
            let lane = address & 0x3;
            Some(((data & 0xFF) << (lane * 8), WriteStrobe::from_bits(1 << lane)))
        }
        funct3::SH => {
            let lane = address & 0x2;
            Some((
                (data & 0xFFFF) << (lane * 8),
                WriteStrobe::from_bits(0b11 << lane),
            ))
        }
        funct3::SW => Some((data, WriteStrobe::ALL)),
        _ => None,
    }
}
