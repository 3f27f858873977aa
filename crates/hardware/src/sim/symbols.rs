//! ELF symbol lookup for compliance signatures.
//!
//! Compliance test programs delimit their signature region with two linker
//! symbols. Any failure to find them (not an ELF, no symbol table, missing
//! names) yields the pair `(0, 0)`, which signature extraction treats as
//! "range unknown".

use object::{Object, ObjectSymbol};

/// Symbol marking the first word of the signature region.
pub const BEGIN_SIGNATURE: &str = "begin_signature";

/// Symbol marking the end (exclusive) of the signature region.
pub const END_SIGNATURE: &str = "end_signature";

/// Returns the address of the symbol `name`, if the image defines it.
pub fn lookup_symbol(bytes: &[u8], name: &str) -> Option<u32> {
    let file = object::File::parse(bytes).ok()?;
    file.symbols()
        .find(|sym| sym.name().is_ok_and(|n| n == name))
        .map(|sym| sym.address() as u32)
}

/// Looks up `begin_signature` and `end_signature` in an ELF image.
///
/// # Returns
///
/// `(begin, end)`, or `(0, 0)` if either symbol cannot be found.
pub fn lookup_signature_symbols(bytes: &[u8]) -> (u32, u32) {
    match (
        lookup_symbol(bytes, BEGIN_SIGNATURE),
        lookup_symbol(bytes, END_SIGNATURE),
    ) {
        (Some(begin), Some(end)) => (begin, end),
        _ => {
            tracing::debug!("signature symbols not found");
            (0, 0)
        }
    }
}
