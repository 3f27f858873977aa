//! # Memory Tests
//!
//! Byte-strobe semantics, clamp/drop bounds handling and bulk loading.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use socsim_core::SimError;
use socsim_core::soc::memory::{Memory, WriteStrobe};

#[test]
fn memory_starts_zeroed() {
    let memory = Memory::new(16);
    assert_eq!(memory.capacity(), 16);
    assert_eq!(memory.size_bytes(), 64);
    assert!(memory.as_words().iter().all(|&w| w == 0));
}

#[test]
fn low_lane_store_keeps_other_bytes() {
    let mut memory = Memory::new(16);
    memory.write(0x8, 0x1122_3344, WriteStrobe::ALL);
    memory.write(0x8, 0xAABB_CCDD, WriteStrobe([true, false, false, false]));
    assert_eq!(memory.read(0x8), 0x1122_33DD);
}

#[test]
fn empty_strobe_writes_nothing() {
    let mut memory = Memory::new(16);
    memory.write(0x4, 0x1234_5678, WriteStrobe::ALL);
    memory.write(0x4, 0xFFFF_FFFF, WriteStrobe::NONE);
    assert_eq!(memory.read(0x4), 0x1234_5678);
}

#[test]
fn unaligned_address_selects_containing_word() {
    let mut memory = Memory::new(16);
    memory.write(0x10, 0xCAFE_BABE, WriteStrobe::ALL);
    assert_eq!(memory.read(0x13), 0xCAFE_BABE);
}

#[test]
fn out_of_range_reads_zero_and_drops_writes() {
    let mut memory = Memory::new(4);
    memory.write(0x10, 0xFFFF_FFFF, WriteStrobe::ALL);
    assert_eq!(memory.read(0x10), 0);
    assert_eq!(memory.read(0xFFFF_FFFC), 0);
    assert!(memory.as_words().iter().all(|&w| w == 0));
}

#[test]
fn write_byte_uses_one_lane() {
    let mut memory = Memory::new(4);
    memory.write_byte(0x2, 0xAB);
    assert_eq!(memory.read(0x0), 0x00AB_0000);
}

#[test]
fn load_at_unaligned_base() {
    let mut memory = Memory::new(4);
    memory.load(&[0x11, 0x22, 0x33], 0x3).expect("fits");
    assert_eq!(memory.read(0x0), 0x1100_0000);
    assert_eq!(memory.read(0x4), 0x0000_3322);
}

#[test]
fn load_that_overruns_memory_is_rejected() {
    let mut memory = Memory::new(4);
    let err = memory.load(&[0; 8], 0xC).expect_err("only 4 bytes left");
    assert!(matches!(err, SimError::ImageTooLarge { size: 8, available: 4 }));
    assert!(memory.as_words().iter().all(|&w| w == 0));
}

#[test]
fn strobe_bits_round_trip_through_lanes() {
    let strobe = WriteStrobe::from_bits(0b1010);
    assert_eq!(strobe.0, [false, true, false, true]);
    assert_eq!(strobe.bits(), 0b1010);
    assert_eq!(strobe.mask(), 0xFF00_FF00);
    assert!(strobe.any());
    assert!(!WriteStrobe::NONE.any());
}

proptest! {
    #[test]
    fn strobed_write_merges_lanes(old in any::<u32>(), data in any::<u32>(), bits in 0u8..16) {
        let mut memory = Memory::new(4);
        memory.write(0, old, WriteStrobe::ALL);
        let strobe = WriteStrobe::from_bits(bits);
        memory.write(0, data, strobe);

        let result = memory.read(0).to_le_bytes();
        let (old, data) = (old.to_le_bytes(), data.to_le_bytes());
        for lane in 0..4 {
            let expected = if strobe.0[lane] { data[lane] } else { old[lane] };
            prop_assert_eq!(result[lane], expected);
        }
    }
}
