//! Component renderer registry
//!
//! One pure function per component variant, dispatched over the `type`
//! tag. Each renderer turns (props, per-instance style overrides, shared
//! config, palette) into an HTML fragment. No I/O, no mutation; malformed
//! optional fields degrade to safe defaults instead of failing the render.

use chrono::{NaiveDate, Utc};

use crate::render::{esc, join_classes, slot};
use crate::report::{
    Component, ComponentKind, Configs, DateProps, ImageGridProps, ImageProps, Palette,
    SignatureProps, SpacerProps, SpacerSize, StyleMap, TableProps, TextProps,
};

/// Render one component to its HTML fragment. Unrecognized types are a
/// deliberate, logged no-op.
pub fn render_component(component: &Component, configs: &Configs, colors: &Palette) -> String {
    let style = &component.style;
    match &component.kind {
        ComponentKind::Header { props } => header_block(props, style),
        ComponentKind::Subheader { props } => subheader_block(props, style),
        ComponentKind::Date { props } => date_block(props, style, configs),
        ComponentKind::Para { props } => para_block(props, style),
        ComponentKind::Divider => divider_block(colors, style),
        ComponentKind::Spacer { props } => spacer_block(props, style),
        ComponentKind::Pagebreak => pagebreak_block(),
        ComponentKind::Signature { props } => signature_block(props, style, colors),
        ComponentKind::FooterText { props } => footer_text_block(props, style),
        ComponentKind::Table { props } => table_block(props, style, configs, colors),
        ComponentKind::Image { props } => image_block(props, style),
        ComponentKind::ImageGrid { props } => image_grid_block(props, style),
        ComponentKind::Unknown => {
            tracing::warn!("Dropping component with unrecognized type");
            String::new()
        }
    }
}

fn header_block(props: &TextProps, style: &StyleMap) -> String {
    format!(
        "\n<section class=\"{}\">\n  <h1 class=\"{}\">{}</h1>\n</section>",
        join_classes(&["mb-3", slot(style, "wrapper")]),
        join_classes(&["text-2xl font-bold text-slate-800", slot(style, "title")]),
        esc(&props.text)
    )
}

fn subheader_block(props: &TextProps, style: &StyleMap) -> String {
    format!(
        "\n<section class=\"{}\">\n  <h2 class=\"{}\">{}</h2>\n</section>",
        join_classes(&["mb-2", slot(style, "wrapper")]),
        join_classes(&["text-xl font-semibold text-slate-700", slot(style, "title")]),
        esc(&props.text)
    )
}

fn date_block(props: &DateProps, style: &StyleMap, configs: &Configs) -> String {
    format!(
        "\n<section class=\"{}\">\n  <div class=\"{}\">{}</div>\n</section>",
        join_classes(&[
            "mb-2 flex",
            configs.date.align.flex_class(),
            slot(style, "wrapper"),
        ]),
        join_classes(&["text-sm text-slate-600", slot(style, "text")]),
        esc(&format_date(props.value.as_deref()))
    )
}

/// Reformat the first 10 characters of an ISO date as `DD Mon YYYY`; an
/// unparseable value passes through verbatim and the missing/empty case
/// falls back to the current date.
fn format_date(value: Option<&str>) -> String {
    let raw = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Utc::now().format("%Y-%m-%d").to_string(),
    };
    let prefix: String = raw.chars().take(10).collect();
    match NaiveDate::parse_from_str(&prefix, "%Y-%m-%d") {
        Ok(date) => date.format("%d %b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn para_block(props: &TextProps, style: &StyleMap) -> String {
    format!(
        "\n<section class=\"{}\">\n  <p class=\"{}\">{}</p>\n</section>",
        join_classes(&["mb-3", slot(style, "wrapper")]),
        join_classes(&["text-justify", slot(style, "text")]),
        esc(&props.text)
    )
}

fn divider_block(colors: &Palette, style: &StyleMap) -> String {
    format!(
        "\n<hr class=\"{}\" style=\"border-color:{}\"/>",
        join_classes(&["my-4", slot(style, "hr")]),
        colors.border
    )
}

fn spacer_block(props: &SpacerProps, style: &StyleMap) -> String {
    let height = match props.size.unwrap_or(SpacerSize::Md) {
        SpacerSize::Xs => "h-2",
        SpacerSize::Sm => "h-4",
        SpacerSize::Md => "h-8",
        SpacerSize::Lg => "h-12",
        SpacerSize::Xl => "h-20",
    };
    format!(
        "<div class=\"{}\"></div>",
        join_classes(&[height, slot(style, "wrapper")])
    )
}

fn pagebreak_block() -> String {
    "<div class=\"pagebreak\"></div>".to_string()
}

fn signature_block(props: &SignatureProps, style: &StyleMap, colors: &Palette) -> String {
    // Clamped even though validation already bounds the range.
    let count = props.lines.unwrap_or(1).clamp(1, 5);
    let lines: String = (0..count)
        .map(|_| {
            format!(
                "<div class=\"border-b\" style=\"border-color:{};height:2rem;\"></div>",
                colors.border
            )
        })
        .collect();
    format!(
        "\n<section class=\"{}\">\n  <div class=\"flex flex-col gap-6 w-64\">\n    {}\n    <div class=\"{}\">{}</div>\n  </div>\n</section>",
        join_classes(&["mt-8", slot(style, "wrapper")]),
        lines,
        join_classes(&["text-sm text-slate-600", slot(style, "label")]),
        esc(props.label.as_deref().unwrap_or(""))
    )
}

fn footer_text_block(props: &TextProps, style: &StyleMap) -> String {
    format!(
        "\n<section class=\"{}\">{}</section>",
        join_classes(&["mt-8 text-center text-sm text-slate-600", slot(style, "text")]),
        esc(&props.text)
    )
}

fn table_block(props: &TableProps, style: &StyleMap, configs: &Configs, colors: &Palette) -> String {
    let table_cfg = &configs.table;
    let title = props
        .title
        .as_deref()
        .map(|t| {
            format!(
                "<div class=\"{}\">{}</div>",
                join_classes(&["mb-2 font-semibold text-slate-800", slot(style, "title")]),
                esc(t)
            )
        })
        .unwrap_or_default();

    let cell_padding = if table_cfg.compact {
        "py-1 px-2 text-sm"
    } else {
        "py-2 px-3"
    };

    let head_cells: String = props
        .headers
        .iter()
        .map(|h| {
            format!(
                "<th class=\"{cell_padding} border-b font-semibold text-left\" style=\"border-color:{}\">{}</th>",
                colors.border,
                esc(h)
            )
        })
        .collect();
    let head_row = if head_cells.is_empty() {
        String::new()
    } else {
        format!("<tr>{head_cells}</tr>")
    };

    // Rows tolerate any width; no attempt to pad or truncate to the header
    // count.
    let body: String = props
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let bg = if table_cfg.striped && i % 2 == 1 {
                "bg-gray-100"
            } else {
                "bg-white"
            };
            let cells: String = row
                .iter()
                .map(|cell| {
                    format!(
                        "<td class=\"{cell_padding} border-b\" style=\"border-color:{}\">{}</td>",
                        colors.border,
                        esc(&cell.display())
                    )
                })
                .collect();
            format!("<tr class=\"{bg}\">{cells}</tr>")
        })
        .collect();

    let notes = props
        .notes
        .as_deref()
        .map(|n| format!("<div class=\"mt-2 text-xs text-slate-500\">{}</div>", esc(n)))
        .unwrap_or_default();

    format!(
        "\n<section class=\"{}\">\n  {}\n  <div class=\"{}\">\n    <table class=\"{}\" style=\"border-color:{}\">\n      <thead class=\"{}\">{}</thead>\n      <tbody>{}</tbody>\n    </table>\n  </div>\n  {}\n</section>",
        join_classes(&["my-4", slot(style, "wrapper")]),
        title,
        join_classes(&["tbl-wrap overflow-x-auto", slot(style, "container")]),
        join_classes(&["tbl w-full border-collapse", &table_cfg.border]),
        colors.border,
        join_classes(&[slot(style, "thead"), &table_cfg.header_bg]),
        head_row,
        body,
        notes
    )
}

fn image_block(props: &ImageProps, style: &StyleMap) -> String {
    let mut size = String::new();
    if let Some(width) = &props.width {
        size.push_str(&format!("width:{width};"));
    }
    if let Some(height) = &props.height {
        size.push_str(&format!("height:{height};"));
    }
    let caption = props
        .caption
        .as_deref()
        .map(|c| {
            format!(
                "<div class=\"{}\">{}</div>",
                join_classes(&["text-xs text-slate-500 mt-1 text-center", slot(style, "caption")]),
                esc(c)
            )
        })
        .unwrap_or_default();
    format!(
        "\n<section class=\"{}\">\n  <img src=\"{}\" alt=\"{}\" class=\"{}\" style=\"{}\"/>\n  {}\n</section>",
        join_classes(&["my-4", slot(style, "wrapper")]),
        esc(&props.url),
        esc(props.alt.as_deref().unwrap_or("")),
        join_classes(&["max-w-full mx-auto", slot(style, "img")]),
        size,
        caption
    )
}

/// Maximum number of images an image-grid shows: a fixed 2 x 3 layout.
const GRID_CAPACITY: usize = 6;

fn image_grid_block(props: &ImageGridProps, style: &StyleMap) -> String {
    let title = props
        .title
        .as_deref()
        .map(|t| {
            format!(
                "<div class=\"{}\">{}</div>",
                join_classes(&[
                    "mb-4 text-center font-semibold text-slate-700 tracking-wide",
                    slot(style, "title"),
                ]),
                esc(t)
            )
        })
        .unwrap_or_default();

    // Flatten all rows, cap the total, then re-chunk into two columns. An
    // odd tail keeps its row with an empty second cell.
    let images: Vec<&String> = props.rows.iter().flatten().take(GRID_CAPACITY).collect();
    let rows: String = images
        .chunks(2)
        .map(|pair| {
            let cells: String = pair
                .iter()
                .map(|url| {
                    format!(
                        "<td style=\"width:50%;text-align:center;vertical-align:middle;padding:16px 0;border:2px solid black;\"><img src=\"{}\" style=\"width:auto;max-width:30vw;height:auto;max-height:20vh;object-fit:contain;border:none;border-radius:3px;display:block;margin:0 auto;\"/></td>",
                        esc(url)
                    )
                })
                .collect();
            let filler = if pair.len() < 2 {
                "<td style=\"max-height:20vh;\"></td>"
            } else {
                ""
            };
            format!("<tr style=\"border:2px solid black;\">{cells}{filler}</tr>")
        })
        .collect();

    format!(
        "\n<div style=\"margin:0 auto;width:100%;\">\n{}<section class=\"{}\" style=\"width:90vw;display:flex;align-items:center;justify-content:center;\">\n  <table style=\"width:80%;border-collapse:collapse;table-layout:fixed;margin:0 auto;text-align:center;\">\n    <tbody>{}</tbody>\n  </table>\n</section>\n</div>",
        title,
        join_classes(&["my-10", slot(style, "wrapper")]),
        rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use serde_json::json;

    fn parse(component: serde_json::Value) -> Component {
        serde_json::from_value(component).unwrap()
    }

    fn render(component: serde_json::Value) -> String {
        render_component(&parse(component), &Configs::default(), &Palette::default())
    }

    #[test]
    fn text_fields_are_escaped() {
        let out = render(json!({
            "type": "para",
            "props": { "text": "<script>alert(1)</script>" }
        }));
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn style_overrides_append_to_base_tokens() {
        let out = render(json!({
            "type": "header",
            "props": { "text": "T" },
            "style": { "title": "uppercase", "bogus": "ignored" }
        }));
        assert!(out.contains("text-2xl font-bold text-slate-800 uppercase"));
        assert!(!out.contains("ignored"));
    }

    #[test]
    fn date_reformats_iso_values() {
        let out = render(json!({
            "type": "date",
            "props": { "value": "2024-03-07T10:00:00Z" }
        }));
        assert!(out.contains("07 Mar 2024"));
    }

    #[test]
    fn unparseable_date_passes_through_escaped() {
        let out = render(json!({
            "type": "date",
            "props": { "value": "sometime <soon>" }
        }));
        assert!(out.contains("sometime &lt;soon&gt;"));
    }

    #[test]
    fn spacer_defaults_to_md() {
        assert!(render(json!({ "type": "spacer" })).contains("h-8"));
        assert!(render(json!({ "type": "spacer", "props": { "size": "xl" } })).contains("h-20"));
    }

    #[test]
    fn signature_lines_clamp_to_bounds() {
        let line = "height:2rem;";
        for (input, expected) in [(0i64, 1usize), (-1, 1), (1, 1), (3, 3), (6, 5)] {
            let out = render(json!({
                "type": "signature",
                "props": { "lines": input }
            }));
            assert_eq!(out.matches(line).count(), expected, "lines = {input}");
        }
    }

    #[test]
    fn table_renders_headers_rows_and_null_cells() {
        let out = render(json!({
            "type": "table",
            "props": {
                "headers": ["Item", "Qty"],
                "rows": [["Widget", 3], ["Gadget", null]]
            }
        }));
        assert_eq!(out.matches("<th ").count(), 2);
        assert_eq!(out.matches("<tr class=").count(), 2);
        assert!(out.contains(">Widget</td>"));
        assert!(out.contains(">3</td>"));
        // The null cell renders as an empty string.
        assert!(out.contains("border-color:#E5E7EB\"></td>"));
    }

    #[test]
    fn table_without_headers_omits_the_header_row() {
        let out = render(json!({
            "type": "table",
            "props": { "headers": [], "rows": [["a"]] }
        }));
        assert!(!out.contains("<th "));
        assert!(out.contains("<thead"));
    }

    #[test]
    fn table_tolerates_mismatched_row_widths() {
        let out = render(json!({
            "type": "table",
            "props": {
                "headers": ["A", "B"],
                "rows": [["only-one"], ["one", "two", "three"]]
            }
        }));
        assert_eq!(out.matches("<td ").count(), 4);
    }

    #[test]
    fn zebra_striping_alternates_on_odd_rows() {
        let out = render(json!({
            "type": "table",
            "props": { "headers": [], "rows": [["a"], ["b"], ["c"]] }
        }));
        assert_eq!(out.matches("bg-white").count(), 2);
        assert_eq!(out.matches("bg-gray-100").count(), 2); // header bg + row 1
    }

    #[test]
    fn compact_table_reduces_padding() {
        let report: Report = serde_json::from_value(json!({
            "company": "Acme",
            "reportName": "Q3",
            "configs": { "table": { "compact": true, "striped": false } },
            "components": [{
                "type": "table",
                "props": { "headers": ["A"], "rows": [["x"]] }
            }]
        }))
        .unwrap();
        let out = render_component(&report.components[0], &report.configs, &report.colors);
        assert!(out.contains("py-1 px-2 text-sm"));
        assert!(!out.contains("<tr class=\"bg-gray-100\">"));
    }

    #[test]
    fn image_grid_caps_at_six_and_pads_the_odd_row() {
        let urls: Vec<String> = (0..7)
            .map(|i| format!("https://example.com/{i}.png"))
            .collect();
        let out = render(json!({
            "type": "image-grid",
            "props": { "rows": [&urls[..4], &urls[4..]] }
        }));
        assert_eq!(out.matches("<img ").count(), 6);
        assert_eq!(out.matches("<tr ").count(), 3);
        assert!(!out.contains("6.png"));
        // Six images fill three full rows; no filler cell needed.
        assert!(!out.contains("<td style=\"max-height:20vh;\"></td>"));

        let out = render(json!({
            "type": "image-grid",
            "props": { "rows": [["https://example.com/a.png",
                                 "https://example.com/b.png",
                                 "https://example.com/c.png"]] }
        }));
        assert_eq!(out.matches("<img ").count(), 3);
        assert_eq!(out.matches("<tr ").count(), 2);
        assert!(out.contains("<td style=\"max-height:20vh;\"></td>"));
    }

    #[test]
    fn image_renders_dimensions_and_caption() {
        let out = render(json!({
            "type": "image",
            "props": {
                "url": "https://example.com/chart.png",
                "alt": "Chart",
                "caption": "Fig 1",
                "width": "50%",
                "height": "120px"
            }
        }));
        assert!(out.contains("<img src="));
        assert!(out.contains("width:50%;height:120px;"));
        assert!(out.contains(">Fig 1</div>"));
        assert!(out.contains("alt=\"Chart\""));
    }

    #[test]
    fn unknown_component_renders_empty() {
        assert_eq!(render(json!({ "type": "sparkline", "props": {} })), "");
    }

    #[test]
    fn rendering_is_deterministic() {
        let component = parse(json!({
            "type": "table",
            "props": { "headers": ["A"], "rows": [["x", 1.5, null]] }
        }));
        let a = render_component(&component, &Configs::default(), &Palette::default());
        let b = render_component(&component, &Configs::default(), &Palette::default());
        assert_eq!(a, b);
    }
}
