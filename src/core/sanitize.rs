// src/core/sanitize.rs

/// Collapse runs of whitespace (incl. NBSP and newlines from wrapped cards) to one space.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// File-name slug for a category label: lowercase ASCII alphanumerics,
/// every other run collapsed to a single '-', no leading/trailing '-'.
/// "Arts & Culture" → "arts-culture".
pub fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_dash = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() { out.push('-'); }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() { s!("category") } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_collapses_and_trims() {
        assert_eq!(normalize_ws("  Stanley \n\t Cup\u{a0} "), "Stanley Cup");
        assert_eq!(normalize_ws(""), "");
    }

    #[test]
    fn slugs() {
        assert_eq!(slug("Arts & Culture"), "arts-culture");
        assert_eq!(slug("E-commerce & Retail"), "e-commerce-retail");
        assert_eq!(slug("  Sports "), "sports");
        assert_eq!(slug("&&&"), "category");
    }
}
