//! Document compositor
//!
//! Assembles the head fragment (computed CSS custom properties consumed by
//! every inline style in the body) and the body fragment (background layer,
//! header placement, ordered component flow, footer overlay). The preview
//! path serves `html_shell(head, body)` verbatim; the PDF path layers
//! `PRINT_HIDE_OVERLAYS_CSS` on the head so the engine's isolated overlay
//! mechanism takes over the repeating header/footer.

use crate::render::blocks::render_component;
use crate::render::esc;
use crate::render::tokens::DesignTokens;
use crate::report::Report;

/// Hides the in-flow fixed overlays when the external engine renders its
/// own header/footer templates on every page.
pub const PRINT_HIDE_OVERLAYS_CSS: &str =
    "<style>@media print {.fixed-header,.fixed-footer{display:none!important}}</style>";

/// Wrap head and body fragments into the full preview document.
pub fn html_shell(head: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width,initial-scale=1"/>
  <script src="https://cdn.tailwindcss.com"></script>
  {head}
  <style>
    @media print {{
      header.fixed-header {{ position: fixed; }}
      footer.fixed-footer {{ position: fixed; }}
    }}
  </style>
</head>
<body class="text-slate-900">
  {body}
</body>
</html>"#
    )
}

/// Compute the head fragment: design tokens as CSS custom properties plus
/// the layout rules every page shares.
pub fn render_head(tokens: &DesignTokens) -> String {
    let page_bg = tokens
        .background_image
        .as_deref()
        .map(|url| {
            // Quotes never survive into the url() literal.
            let url = url.replace('\'', "%27");
            format!(
                "\n.page-bg{{\n  position:fixed;\n  top:0;\n  left:0;\n  width:100%;\n  height:100%;\n  background-image:url('{url}');\n  background-size:cover;\n  background-repeat:no-repeat;\n  background-position:center top;\n  z-index:-1;\n}}"
            )
        })
        .unwrap_or_default();

    format!(
        r#"
<style>
  @media print {{
    html, body {{
      height: auto !important;
      min-height: 100%;
      display: block !important;
    }}
  }}
</style>

<style>
:root{{
  --color-text:{text};
  --color-border:{border};
  --color-bg:{bg};
  --page-size:{size};
  --page-orientation:{orientation};
  --page-margin:{margin};
  --header-h:{header_h};
  --footer-h:{footer_h};
}}
body{{
  color:var(--color-text);
  background-color:var(--color-bg);
}}
{page_bg}

/* inner white margin via padding, not page margin */
.body-wrap{{
  padding:var(--page-margin);
  padding-top:calc(var(--header-h) + var(--page-margin));
  padding-bottom:calc(var(--footer-h) + var(--page-margin));
  box-decoration-break:clone;
  -webkit-box-decoration-break:clone;
}}

.fixed-header{{
  position:fixed;
  top:0;
  left:0;
  right:0;
  height:var(--header-h);
  background:transparent;
  z-index:1000;
}}

.fixed-footer{{
  position:fixed;
  bottom:0;
  left:0;
  right:0;
  height:var(--footer-h);
  background:transparent;
  z-index:1000;
  display:flex;
  align-items:center;
}}

.pagebreak{{page-break-after:always;}}

@page{{
  size:var(--page-size) var(--page-orientation);
  margin:0;
}}

@media print{{
  .fixed-header{{position:fixed;}}
  .fixed-footer{{position:fixed;}}
  .page-bg{{position:fixed;}}
  html,body{{height:auto !important;}}

  .tbl{{page-break-inside:auto;break-inside:auto;}}
  .tbl thead{{display:table-header-group;}}
  .tbl tfoot{{display:table-footer-group;}}
  .tbl tr{{page-break-inside:avoid;break-inside:avoid;}}
  .tbl-wrap{{overflow:visible !important;}}
}}
</style>"#,
        text = tokens.text_color,
        border = tokens.border_color,
        bg = tokens.background_color,
        size = tokens.page_size,
        orientation = tokens.page_orientation,
        margin = tokens.page_margin,
        header_h = tokens.header_height,
        footer_h = tokens.footer_height,
    )
}

/// Logo plus image-or-text title, shared by both header placements.
fn header_title(report: &Report, logo_class: &str, image_class: &str, title_class: &str) -> String {
    let logo = report
        .assets
        .logo
        .as_deref()
        .map(|src| format!("<img src=\"{}\" alt=\"logo\" class=\"{logo_class}\"/>", esc(src)))
        .unwrap_or_default();
    let title = match report.assets.header_image.as_deref() {
        Some(src) => format!("<img src=\"{}\" alt=\"header\" class=\"{image_class}\"/>", esc(src)),
        None => format!("<div class=\"{title_class}\">{}</div>", esc(&report.report_name)),
    };
    format!("{logo}{title}")
}

/// Compute the body fragment. Component order is significant and preserved.
pub fn render_body(report: &Report, tokens: &DesignTokens) -> String {
    // Header placement: `first` renders once inline at the top of the flow,
    // `all` becomes a fixed overlay repeated on every physical page. The
    // two modes are mutually exclusive.
    let first_header = if tokens.header_visible && !tokens.header_overlay {
        format!(
            "<section class=\"mb-6 border-b pb-3\" style=\"border-color:{}\">\n  <div class=\"flex items-center {}\">\n    {}\n  </div>\n</section>",
            tokens.border_color,
            tokens.header_align.flex_class(),
            header_title(report, "h-8 mr-3", "h-10", "text-xl font-semibold"),
        )
    } else {
        String::new()
    };

    let fixed_header = if tokens.header_overlay {
        format!(
            "<header class=\"fixed-header border-b\" style=\"border-color:{}\">\n  <div class=\"flex items-center {} h-full px-4\">\n    {}\n  </div>\n</header>",
            tokens.border_color,
            tokens.header_align.flex_class(),
            header_title(report, "h-8 mr-3", "h-10", "font-semibold"),
        )
    } else {
        String::new()
    };

    let parts: String = report
        .components
        .iter()
        .map(|c| render_component(c, &report.configs, &report.colors))
        .collect();

    // The footer always repeats; no counters exist outside the print
    // engine, so the preview strips the placeholders.
    let fixed_footer = if tokens.footer_visible {
        let text = report
            .configs
            .footer
            .text
            .replace("{{page}}", "")
            .replace("{{pages}}", "");
        let image = report
            .assets
            .footer_image
            .as_deref()
            .map(|src| format!("<img src=\"{}\" alt=\"footer\" class=\"h-6 mr-2\"/>", esc(src)))
            .unwrap_or_default();
        format!(
            "<footer class=\"fixed-footer px-4\">\n  {image}<span class=\"text-sm text-gray-600\">{}</span>\n</footer>",
            esc(&text)
        )
    } else {
        String::new()
    };

    let page_bg = if tokens.background_image.is_some() {
        "<div class=\"page-bg\"></div>"
    } else {
        ""
    };

    let main = format!(
        "\n<main class=\"prose max-w-none body-wrap\">\n  <div class=\"{} {}\" style=\"font-family:{}\">\n    {first_header}{parts}\n  </div>\n</main>",
        report.configs.font.base, report.configs.font.leading, tokens.font_family,
    );

    format!("{page_bg}{fixed_header}{main}{fixed_footer}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(value: serde_json::Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    fn q3_report(repeat: &str) -> Report {
        report(json!({
            "company": "Acme",
            "reportName": "Q3 Report",
            "configs": { "header": { "repeat": repeat } },
            "components": [
                { "type": "header", "props": { "text": "Q3 Report" } },
                { "type": "table", "props": {
                    "headers": ["Item", "Qty"],
                    "rows": [["Widget", 3], ["Gadget", null]]
                } }
            ]
        }))
    }

    #[test]
    fn first_page_header_is_inline_not_overlay() {
        let r = q3_report("first");
        let tokens = DesignTokens::resolve(&r);
        let body = render_body(&r, &tokens);

        assert_eq!(body.matches("mb-6 border-b pb-3").count(), 1);
        assert!(!body.contains("fixed-header"));
        assert!(body.contains("<table"));
        assert_eq!(body.matches("<th ").count(), 2);
        assert_eq!(body.matches("<tr class=").count(), 2);
        // null cell renders empty
        assert!(body.contains("\"></td>"));
    }

    #[test]
    fn repeating_header_is_an_overlay_with_reserved_height() {
        let r = q3_report("all");
        let tokens = DesignTokens::resolve(&r);
        let body = render_body(&r, &tokens);
        let head = render_head(&tokens);

        assert!(body.contains("fixed-header"));
        assert!(!body.contains("mb-6 border-b pb-3"));
        assert!(head.contains("--header-h:48px;"));
    }

    #[test]
    fn header_falls_back_to_report_name_without_header_image() {
        let r = q3_report("all");
        let body = render_body(&r, &DesignTokens::resolve(&r));
        assert!(body.contains(">Q3 Report</div>"));
    }

    #[test]
    fn hidden_footer_renders_nothing_and_reserves_nothing() {
        let r = report(json!({
            "company": "Acme",
            "reportName": "Q3",
            "configs": { "footer": { "visible": false } },
            "components": [{ "type": "divider" }]
        }));
        let tokens = DesignTokens::resolve(&r);
        assert!(!render_body(&r, &tokens).contains("fixed-footer"));
        assert!(render_head(&tokens).contains("--footer-h:0px;"));
    }

    #[test]
    fn preview_footer_strips_page_placeholders() {
        let r = q3_report("all");
        let tokens = DesignTokens::resolve(&r);
        let body = render_body(&r, &tokens);
        assert!(!body.contains("{{page}}"));
        assert!(!body.contains("{{pages}}"));
        assert!(body.contains("Page"));
    }

    #[test]
    fn background_image_adds_the_full_bleed_layer() {
        let r = report(json!({
            "company": "Acme",
            "reportName": "Q3",
            "assets": { "backgroundImage": "data:image/png;base64,AAAA" },
            "components": [{ "type": "divider" }]
        }));
        let tokens = DesignTokens::resolve(&r);
        assert!(render_body(&r, &tokens).contains("<div class=\"page-bg\"></div>"));
        assert!(render_head(&tokens).contains("background-image:url('data:image/png;base64,AAAA')"));
    }

    #[test]
    fn components_render_in_array_order() {
        let r = report(json!({
            "company": "Acme",
            "reportName": "Q3",
            "components": [
                { "type": "para", "props": { "text": "FIRST" } },
                { "type": "pagebreak" },
                { "type": "para", "props": { "text": "SECOND" } }
            ]
        }));
        let body = render_body(&r, &DesignTokens::resolve(&r));
        let first = body.find("FIRST").unwrap();
        let brk = body.find("pagebreak").unwrap();
        let second = body.find("SECOND").unwrap();
        assert!(first < brk && brk < second);
    }

    #[test]
    fn rendering_is_byte_deterministic() {
        let r = q3_report("all");
        let tokens = DesignTokens::resolve(&r);
        assert_eq!(render_head(&tokens), render_head(&tokens));
        assert_eq!(render_body(&r, &tokens), render_body(&r, &tokens));
        assert_eq!(
            html_shell(&render_head(&tokens), &render_body(&r, &tokens)),
            html_shell(&render_head(&tokens), &render_body(&r, &tokens))
        );
    }
}
