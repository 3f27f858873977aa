//! # Signature Tests
//!
//! Range resolution, the one-word-per-line output format and the debug port
//! the words are read through.

use pretty_assertions::assert_eq;
use rstest::rstest;
use socsim_core::common::constants::DEVICE_MASK;
use socsim_core::sim::debug::MemoryDebugPort;
use socsim_core::sim::signature::*;
use socsim_core::soc::memory::{Memory, WriteStrobe};

fn memory_with(words: &[(u32, u32)]) -> Memory {
    let mut memory = Memory::new(0x1000);
    for &(addr, value) in words {
        memory.write(addr, value, WriteStrobe::ALL);
    }
    memory
}

#[rstest]
#[case(0, 0)]
#[case(0x3000, 0x2000)]
fn unusable_ranges_fall_back(#[case] begin: u32, #[case] end: u32) {
    assert_eq!(SignatureRange::resolve(begin, end), SignatureRange::FALLBACK);
}

#[test]
fn fallback_region_is_256_words() {
    assert_eq!(SignatureRange::FALLBACK.words(), 256);
}

#[test]
fn valid_range_is_kept() {
    let range = SignatureRange::resolve(0x2100, 0x2110);
    assert_eq!(range, SignatureRange { begin: 0x2100, end: 0x2110 });
    assert_eq!(range.addresses().collect::<Vec<_>>(), vec![0x2100, 0x2104, 0x2108, 0x210C]);
}

#[test]
fn empty_range_has_no_words() {
    let range = SignatureRange::resolve(0x2100, 0x2100);
    assert_eq!(range.words(), 0);
}

#[test]
fn words_are_lowercase_hex_one_per_line() {
    let memory = memory_with(&[(0x100, 0xDEAD_BEEF), (0x104, 0x7)]);
    let range = SignatureRange::resolve(0x100, 0x108);

    let mut out = Vec::new();
    write_signature_to(&memory, range, &mut out).expect("write to vec");
    assert_eq!(String::from_utf8(out).expect("utf8"), "deadbeef\n00000007\n");
}

#[test]
fn signature_file_is_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.signature");
    let memory = memory_with(&[(0x200, 1)]);

    write_signature(&memory, SignatureRange::resolve(0x200, 0x204), &path).expect("write");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "00000001\n");
}

#[test]
fn signature_into_missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("out.signature");
    let memory = memory_with(&[]);

    let err = write_signature(&memory, SignatureRange::resolve(0x200, 0x204), &path)
        .expect_err("directory does not exist");
    assert!(matches!(err, socsim_core::SimError::Io { .. }));
}

#[test]
fn debug_port_data_appears_after_clock() {
    let memory = memory_with(&[(0x40, 0xABCD)]);
    let mut port = MemoryDebugPort::new(&memory);

    port.set_address(0x40);
    assert_eq!(port.data(), 0);
    port.clock();
    assert_eq!(port.data(), 0xABCD);
}

#[test]
fn debug_reads_are_idempotent() {
    let memory = memory_with(&[(0x40, 0x55)]);
    let before = memory.as_words().to_vec();

    let mut port = MemoryDebugPort::new(&memory);
    let first = port.read_word(0x40);
    let second = port.read_word(0x40);
    assert_eq!(first, second);
    assert_eq!(memory.as_words(), before.as_slice());
    assert_eq!(read_signature(&memory, SignatureRange::resolve(0x40, 0x44)), vec![0x55]);
}

#[test]
fn high_linked_range_reads_the_loaded_words() {
    let memory = memory_with(&[(0x8000_0100 & DEVICE_MASK, 0x1234_5678)]);
    let range = SignatureRange::resolve(0x8000_0100, 0x8000_0104);

    assert_eq!(read_signature(&memory, range), vec![0x1234_5678]);
    assert_eq!(MemoryDebugPort::new(&memory).read_word(0x8000_0100), 0x1234_5678);
}
