/// Flatten extracted report text to a single line.
///
/// Control characters become spaces and every whitespace run collapses to
/// one space, so patterns can rely on `\s+` between words regardless of
/// how the PDF laid them out.
pub fn flatten_text(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
