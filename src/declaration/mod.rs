//! DIRF declaration reading.
//!
//! Turns the raw pipe-delimited export into a [`Declaration`]: the global
//! header plus the beneficiaries in order of first appearance.

pub mod models;
pub mod parser;

pub use models::{
    Beneficiary, BeneficiaryKind, Declaration, GlobalHeader, MonthlyRecordGroup, MONTHS,
    ZERO_CENTS,
};
pub use parser::{parse, ParseStats, ParserState, RecordTag};

const BOM: char = '\u{feff}';

/// Decode uploaded declaration bytes.
///
/// Invalid UTF-8 sequences are dropped rather than rejected.
pub fn load_declaration(bytes: &[u8]) -> String {
    let decoded: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    decoded.trim_start_matches(BOM).to_string()
}
