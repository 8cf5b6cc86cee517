//! Rendering module
//!
//! Turns a validated, hydrated `Report` into markup:
//! - `tokens`: single palette/config -> design-token resolution shared by
//!   the compositor and the print-overlay reconciler
//! - `blocks`: per-variant component renderers
//! - `compositor`: head/body assembly for the full document
//! - `overlay`: standalone header/footer fragments for the isolated
//!   print-overlay context, plus filename derivation

pub mod blocks;
pub mod compositor;
pub mod overlay;
pub mod tokens;

use crate::report::StyleMap;

/// The single escaping chokepoint for user-supplied text interpolated into
/// markup. Everything free-form goes through here before it reaches a
/// fragment.
pub fn esc(value: &str) -> String {
    html_escape::encode_safe(value).into_owned()
}

/// Join class tokens, skipping empty entries.
pub(crate) fn join_classes(parts: &[&str]) -> String {
    parts
        .iter()
        .copied()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Look up an override for a renderer-declared style slot. Unrecognized
/// keys in the map are simply never asked for.
pub(crate) fn slot<'a>(style: &'a StyleMap, name: &str) -> &'a str {
    style.get(name).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn esc_neutralizes_markup() {
        let out = esc("<script>alert('x')</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn esc_handles_quotes_and_ampersands() {
        let out = esc(r#"a & b "c" 'd'"#);
        assert!(out.contains("&amp;"));
        assert!(!out.contains('"'));
        assert!(!out.contains('\''));
    }

    #[test]
    fn join_classes_skips_empty_tokens() {
        assert_eq!(join_classes(&["mb-3", "", "font-bold"]), "mb-3 font-bold");
        assert_eq!(join_classes(&["", ""]), "");
    }
}
