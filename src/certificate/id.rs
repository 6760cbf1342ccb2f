//! Certificate ID formatting (ported from the certificate page logic).

/// Fixed prefix carried by every certificate ID.
pub const CERT_PREFIX: &str = "DKFC";

/// Format a raw pledge identifier into the canonical certificate ID.
///
/// Every non-digit character is stripped first, so an already-formatted
/// value like `DKFC-042` normalizes back to the same ID. Digit strings
/// whose numeric value fits in five digits are left-padded with zeros to
/// width 5; longer values keep their natural length. Input with no digits
/// at all maps to the all-zero ID.
pub fn format_certificate_id(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return format!("{CERT_PREFIX}00000");
    }

    // Compare against 99999 by significant-digit count so arbitrarily long
    // inputs never need an integer parse.
    let significant = digits.trim_start_matches('0');
    let width = if significant.len() <= 5 { 5 } else { digits.len() };

    format!("{CERT_PREFIX}{digits:0>width$}")
}

/// Download filename convention for a rendered certificate PNG.
pub fn download_filename(formatted_id: &str) -> String {
    format!("DrugFreeKerala-Certificate-{formatted_id}.png")
}
