//! Print-overlay reconciler
//!
//! The external engine renders header/footer overlays in a context that is
//! isolated from the main document: no shared stylesheet, no CSS custom
//! properties. These fragments therefore carry literal inline styles,
//! derived from the same `DesignTokens` as the compositor so the two
//! presentations stay visually consistent. Also derives the
//! content-disposition filename for the finished PDF.

use std::sync::LazyLock;

use regex::Regex;

use crate::render::esc;
use crate::render::tokens::DesignTokens;
use crate::report::Report;

/// Live page-counter markup the engine's overlay context populates at
/// render time.
const PAGE_NUMBER_SPAN: &str = "&nbsp;<span class=\"pageNumber\"></span>&nbsp;";
const TOTAL_PAGES_SPAN: &str = "&nbsp;<span class=\"totalPages\"></span>";

static PAGE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Page\b").expect("literal regex"));
static OF_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bof\b").expect("literal regex"));

/// Standalone header fragment for the engine's overlay slot. Hidden headers
/// yield an empty placeholder element.
pub fn header_template(report: &Report, tokens: &DesignTokens) -> String {
    if !tokens.header_visible {
        return "<div></div>".to_string();
    }

    let title = match report.assets.header_image.as_deref() {
        Some(src) => format!("<img src=\"{}\" style=\"height:18px;\">", esc(src)),
        None => format!(
            "<div style=\"font-weight:600;\">{}</div>",
            esc(&report.report_name)
        ),
    };
    let logo = report
        .assets
        .logo
        .as_deref()
        .map(|src| format!("<img src=\"{}\" style=\"height:14px;margin-right:8px;\">", esc(src)))
        .unwrap_or_default();

    format!(
        "\n<div style=\"\n  font-size:10px;\n  color:{};\n  width:100%;\n  padding:4px 0;\n  display:flex;\n  align-items:center;\n  justify-content:{};\n  border-bottom:1px solid {};\n  font-family:{};\n  margin:0 15mm;\n\">{logo}{title}</div>",
        tokens.text_color,
        tokens.header_align.justify_css(),
        tokens.border_color,
        tokens.font_family,
    )
}

/// Standalone footer fragment. The `{{page}}`/`{{pages}}` placeholders in
/// the configured text become the engine's live counters, and the literal
/// words "Page" and "of" pick up a little spacing.
pub fn footer_template(report: &Report, tokens: &DesignTokens) -> String {
    if !tokens.footer_visible {
        return "<div></div>".to_string();
    }

    let text = esc(&report.configs.footer.text)
        .replace("{{page}}", PAGE_NUMBER_SPAN)
        .replace("{{pages}}", TOTAL_PAGES_SPAN);
    let text = PAGE_WORD.replace(&text, "<span style=\"padding-right:2px;\">Page</span>");
    let text = OF_WORD.replace(&text, "<span style=\"padding:0 2px;\">of</span>");

    let image = report
        .assets
        .footer_image
        .as_deref()
        .map(|src| format!("<img src=\"{}\" style=\"height:14px;margin-right:8px;\">", esc(src)))
        .unwrap_or_default();

    format!(
        "\n<div style=\"\n  font-size:10px;\n  color:{};\n  width:100%;\n  padding:4px 0;\n  display:flex;\n  align-items:center;\n  justify-content:{};\n  border-top:1px solid {};\n  font-family:{};\n  margin:0 15mm;\n  font-variant-numeric: tabular-nums;\n\">{image}{text}</div>",
        tokens.text_color,
        tokens.footer_align.justify_css(),
        tokens.border_color,
        tokens.font_family,
    )
}

/// Derive an ASCII-safe filename from the report name: decompose, replace
/// non-ASCII code points with underscores, collapse runs, trim non-word
/// edges, and fall back to a fixed name when nothing survives.
pub fn pdf_filename(raw: &str) -> String {
    use unicode_normalization::UnicodeNormalization;

    let ascii: String = raw
        .nfkd()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();

    let mut collapsed = String::with_capacity(ascii.len());
    let mut previous_underscore = false;
    for c in ascii.chars() {
        if c == '_' {
            if !previous_underscore {
                collapsed.push('_');
            }
            previous_underscore = true;
        } else {
            collapsed.push(c);
            previous_underscore = false;
        }
    }

    let trimmed =
        collapsed.trim_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '_'));
    if trimmed.is_empty() {
        "report".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::compositor::render_body;
    use serde_json::json;

    fn report(value: serde_json::Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    fn base(extra: serde_json::Value) -> Report {
        let mut payload = json!({
            "company": "Acme",
            "reportName": "Q3 Report",
            "components": [{ "type": "divider" }]
        });
        payload
            .as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        report(payload)
    }

    #[test]
    fn footer_substitutes_live_page_counters() {
        let r = base(json!({
            "configs": { "footer": { "text": "Page {{page}} of {{pages}}" } }
        }));
        let out = footer_template(&r, &DesignTokens::resolve(&r));

        assert!(!out.contains("{{page}}"));
        assert!(!out.contains("{{pages}}"));
        assert!(out.contains("<span class=\"pageNumber\"></span>"));
        assert!(out.contains("<span class=\"totalPages\"></span>"));
        assert!(out.contains("<span style=\"padding-right:2px;\">Page</span>"));
        assert!(out.contains("<span style=\"padding:0 2px;\">of</span>"));
    }

    #[test]
    fn hidden_overlays_collapse_to_placeholder() {
        let r = base(json!({
            "configs": {
                "header": { "visible": false },
                "footer": { "visible": false }
            }
        }));
        let tokens = DesignTokens::resolve(&r);
        assert_eq!(header_template(&r, &tokens), "<div></div>");
        assert_eq!(footer_template(&r, &tokens), "<div></div>");
    }

    #[test]
    fn header_falls_back_to_escaped_report_name() {
        let r = report(json!({
            "company": "Acme",
            "reportName": "Q3 <North> & Co",
            "components": [{ "type": "divider" }]
        }));
        let out = header_template(&r, &DesignTokens::resolve(&r));
        assert!(out.contains("Q3 &lt;North&gt; &amp; Co"));
        assert!(!out.contains("<North>"));
    }

    #[test]
    fn header_prefers_the_hydrated_image() {
        let r = base(json!({
            "assets": { "headerImage": "data:image/png;base64,AAAA" }
        }));
        let out = header_template(&r, &DesignTokens::resolve(&r));
        assert!(out.contains("<img src="));
        assert!(!out.contains("Q3 Report"));
    }

    #[test]
    fn overlay_and_compositor_agree_on_footer_state_and_alignment() {
        for (visible, align) in [(true, "left"), (true, "right"), (false, "center")] {
            let r = base(json!({
                "configs": { "footer": { "visible": visible, "align": align } }
            }));
            let tokens = DesignTokens::resolve(&r);
            let overlay = footer_template(&r, &tokens);
            let body = render_body(&r, &tokens);

            assert_eq!(overlay != "<div></div>", body.contains("fixed-footer"));
            if visible {
                assert!(overlay.contains(&format!(
                    "justify-content:{};",
                    tokens.footer_align.justify_css()
                )));
            }
        }
    }

    #[test]
    fn filename_replaces_non_ascii_and_collapses() {
        assert_eq!(pdf_filename("Informe Año 2024"), "Informe An_o 2024");
        assert_eq!(pdf_filename("Q3 Report"), "Q3 Report");
        assert_eq!(pdf_filename("((Quarterly))"), "Quarterly");
        assert_eq!(pdf_filename("日本語"), "_");
    }

    #[test]
    fn filename_falls_back_when_nothing_survives() {
        assert_eq!(pdf_filename(""), "report");
        assert_eq!(pdf_filename("!!!"), "report");
    }
}
