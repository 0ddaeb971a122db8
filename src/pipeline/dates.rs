/// Canonicalize a draw/report date to a `YYYY-MM` key.
///
/// Accepts `MM/DD/YYYY`, `MM/DD/YY` and already-canonical `YYYY-MM`. The day is
/// discarded; two-digit years are taken to be 20xx. Anything that does not
/// split into exactly three `/` parts comes back unchanged.
pub fn normalize(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('/').collect();
    let [month, _day, year] = parts.as_slice() else {
        return raw.to_string();
    };

    let month = month.trim();
    let year = year.trim();
    let year = if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    };

    format!("{year}-{month:0>2}")
}

/// Whether a key has the canonical `YYYY-MM` shape.
pub fn is_canonical(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit)
}
