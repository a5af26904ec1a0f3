//! Common utilities for informe generation.
//!
//! Brazilian number and document formatting, Typst escaping and output naming.

use std::path::Path;

/// Parse a raw cents value ("12345") into a currency amount (123.45).
///
/// Empty or non-numeric values count as zero.
pub fn parse_cents(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed.parse::<f64>() {
        Ok(cents) if cents.is_finite() => cents / 100.0,
        _ => {
            log::debug!("Treating non-numeric value '{}' as zero", trimmed);
            0.0
        }
    }
}

/// Format a currency amount as `1.234,56`.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();

    let integer = (cents / 100).to_string();
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}{},{:02}", sign, grouped, cents % 100)
}

/// Format a raw cents value as `1.234,56`.
pub fn format_currency(value: &str) -> String {
    format_amount(parse_cents(value))
}

/// Punctuate a CPF (11 digits) or CNPJ (14 digits). Other lengths pass through.
pub fn format_document(document: &str) -> String {
    let d = document;
    match d.len() {
        11 if d.is_ascii() => format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..]),
        14 if d.is_ascii() => format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..]
        ),
        _ => d.to_string(),
    }
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Deterministic output name for one beneficiary's informe.
pub fn informe_filename(document: &str, withholding_code: &str) -> String {
    let name = format!("Informe_{}_{}.pdf", document, withholding_code);
    sanitize_filename::sanitize(name)
}

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}
