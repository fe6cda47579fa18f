use super::model::SampleId;

// ---------------------------------------------------------------------------
// Cell-level parse-and-validate
// ---------------------------------------------------------------------------

/// Outcome of parsing one measurement cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Present(f64),
    /// "not detected" and its spellings.
    NotDetected,
    Blank,
    /// Text that is neither a number nor a known missing marker.
    Invalid,
}

impl Measurement {
    /// Collapse to the stored form: only `Present` carries a value.
    pub fn value(self) -> Option<f64> {
        match self {
            Measurement::Present(v) => Some(v),
            _ => None,
        }
    }
}

/// Parse a measurement cell.
///
/// A trailing `%` is stripped before parsing, so `"3.9%"` and `"3.9"` give
/// the same value. Non-finite numbers count as invalid.
pub fn parse_measurement(cell: &str) -> Measurement {
    let s = cell.trim();
    if s.is_empty() {
        return Measurement::Blank;
    }
    if is_not_detected(s) {
        return Measurement::NotDetected;
    }
    let number = s.strip_suffix('%').map(str::trim_end).unwrap_or(s);
    match number.parse::<f64>() {
        Ok(v) if v.is_finite() => Measurement::Present(v),
        _ => Measurement::Invalid,
    }
}

/// Whether a cell spells "not detected": `not detected`, `Not-Detected.`,
/// `n.d.`, `ND`, ... Casing, spacing and punctuation are ignored.
pub fn is_not_detected(cell: &str) -> bool {
    let letters: String = cell
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(letters.as_str(), "notdetected" | "nd")
}

/// Parse a sample identifier. Accepts integer text and float text with a
/// zero fraction (`"101.0"`), which spreadsheet exports produce.
pub fn parse_sample_id(cell: &str) -> Option<SampleId> {
    let s = cell.trim();
    if let Ok(id) = s.parse::<SampleId>() {
        return Some(id);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < (1u64 << 53) as f64 {
        Some(f as SampleId)
    } else {
        None
    }
}

/// Parse a section number (1, 2, ...).
pub fn parse_section(cell: &str) -> Option<u8> {
    parse_sample_id(cell).and_then(|n| u8::try_from(n).ok()).filter(|&n| n > 0)
}
