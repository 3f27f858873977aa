//! # Error Tests
//!
//! Checks that fatal errors carry the offending path or sizes in their message.

use std::io;
use std::path::PathBuf;

use socsim_core::SimError;

#[test]
fn missing_image_names_the_path() {
    let err = SimError::MissingImage(PathBuf::from("/nope/prog.bin"));
    assert_eq!(err.to_string(), "program image not found: /nope/prog.bin");
}

#[test]
fn io_error_keeps_source() {
    let err = SimError::io("out.sig", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
    assert!(err.to_string().starts_with("I/O error on out.sig"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn oversized_image_reports_sizes() {
    let err = SimError::ImageTooLarge {
        size: 100,
        available: 64,
    };
    let msg = err.to_string();
    assert!(msg.contains("100"));
    assert!(msg.contains("64"));
}
