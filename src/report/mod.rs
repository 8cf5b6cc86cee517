//! Report document model
//!
//! Typed representation of one inbound report: identity fields, color
//! palette, layout configuration groups, asset slots, and the ordered
//! component list. Pure data; the only mutation a `Report` ever sees is
//! in-place asset hydration before rendering.

mod component;
pub mod validate;

pub use component::{
    Cell, Component, ComponentKind, DateProps, ImageGridProps, ImageProps, SignatureProps,
    SpacerProps, SpacerSize, StyleMap, TableProps, TextProps,
};

use serde::Deserialize;

/// Root document entity, owned exclusively by one render request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Report {
    pub company: String,
    #[serde(rename = "reportName")]
    pub report_name: String,
    #[serde(default)]
    pub colors: Palette,
    #[serde(default)]
    pub assets: Assets,
    #[serde(default)]
    pub configs: Configs,
    pub components: Vec<Component>,
}

/// Named color slots, each independently defaulted.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Palette {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_muted")]
    pub muted: String,
    #[serde(default = "default_border")]
    pub border: String,
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            accent: default_accent(),
            text: default_text(),
            muted: default_muted(),
            border: default_border(),
            background: default_background(),
        }
    }
}

fn default_primary() -> String {
    "#0F172A".to_string()
}
fn default_accent() -> String {
    "#2563EB".to_string()
}
fn default_text() -> String {
    "#111827".to_string()
}
fn default_muted() -> String {
    "#6B7280".to_string()
}
fn default_border() -> String {
    "#E5E7EB".to_string()
}
fn default_background() -> String {
    "#FFFFFF".to_string()
}

/// The four whole-document image slots. Each holds an image reference
/// (data URI, http(s) URL, or asset-root-relative path) until hydration
/// replaces it with its embedded form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Assets {
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(rename = "headerImage", default)]
    pub header_image: Option<String>,
    #[serde(rename = "footerImage", default)]
    pub footer_image: Option<String>,
    #[serde(rename = "backgroundImage", default)]
    pub background_image: Option<String>,
}

/// Layout configuration groups. Unknown fields in any group reject the
/// payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configs {
    #[serde(default)]
    pub page: PageCfg,
    #[serde(default)]
    pub font: FontCfg,
    #[serde(default)]
    pub header: HeaderCfg,
    #[serde(default)]
    pub footer: FooterCfg,
    #[serde(default)]
    pub date: DateCfg,
    #[serde(default)]
    pub table: TableCfg,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageCfg {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_margin")]
    pub margin: String,
}

impl Default for PageCfg {
    fn default() -> Self {
        Self {
            size: PageSize::default(),
            orientation: Orientation::default(),
            margin: default_margin(),
        }
    }
}

fn default_margin() -> String {
    "20mm".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// CSS `@page size` keyword.
    pub fn css(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn css(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontCfg {
    #[serde(default = "default_font_family")]
    pub family: String,
    #[serde(default = "default_font_base")]
    pub base: String,
    #[serde(default = "default_font_leading")]
    pub leading: String,
}

impl Default for FontCfg {
    fn default() -> Self {
        Self {
            family: default_font_family(),
            base: default_font_base(),
            leading: default_font_leading(),
        }
    }
}

fn default_font_family() -> String {
    "Inter, ui-sans-serif, system-ui".to_string()
}
fn default_font_base() -> String {
    "text-[12pt]".to_string()
}
fn default_font_leading() -> String {
    "leading-relaxed".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderCfg {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_center")]
    pub align: Align,
    #[serde(default)]
    pub repeat: HeaderRepeat,
}

impl Default for HeaderCfg {
    fn default() -> Self {
        Self {
            visible: true,
            align: Align::Center,
            repeat: HeaderRepeat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderRepeat {
    /// Fixed-position overlay repeated on every physical page.
    #[default]
    All,
    /// Rendered once, inline at the top of the flowing content.
    First,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterCfg {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_footer_text")]
    pub text: String,
    #[serde(default = "default_center")]
    pub align: Align,
}

impl Default for FooterCfg {
    fn default() -> Self {
        Self {
            visible: true,
            text: default_footer_text(),
            align: Align::Center,
        }
    }
}

fn default_footer_text() -> String {
    "Page {{page}} of {{pages}}".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateCfg {
    #[serde(default = "default_right")]
    pub align: Align,
    #[serde(default = "default_date_format")]
    pub format: String,
}

impl Default for DateCfg {
    fn default() -> Self {
        Self {
            align: Align::Right,
            format: default_date_format(),
        }
    }
}

fn default_date_format() -> String {
    "DD MMM YYYY".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableCfg {
    #[serde(default = "default_table_border")]
    pub border: String,
    #[serde(default = "default_true")]
    pub striped: bool,
    #[serde(default)]
    pub compact: bool,
    #[serde(rename = "headerBg", default = "default_table_header_bg")]
    pub header_bg: String,
}

impl Default for TableCfg {
    fn default() -> Self {
        Self {
            border: default_table_border(),
            striped: true,
            compact: false,
            header_bg: default_table_header_bg(),
        }
    }
}

fn default_table_border() -> String {
    "border-2".to_string()
}
fn default_table_header_bg() -> String {
    "bg-gray-100".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// `justify-content` value for the print-overlay context, which has no
    /// access to the main stylesheet.
    pub fn justify_css(&self) -> &'static str {
        match self {
            Align::Left => "flex-start",
            Align::Center => "center",
            Align::Right => "flex-end",
        }
    }

    /// Utility class for flex alignment inside the main document flow.
    pub fn flex_class(&self) -> &'static str {
        match self {
            Align::Left => "justify-start",
            Align::Center => "justify-center",
            Align::Right => "justify-end",
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_center() -> Align {
    Align::Center
}
fn default_right() -> Align {
    Align::Right
}

/// Image reference form checks shared by validation and hydration.
///
/// A non-null reference is exactly one of: an embedded `data:` URI, an
/// absolute http(s) URL, or a path relative to the configured asset root.
pub mod image_ref {
    pub fn is_embedded(href: &str) -> bool {
        href.starts_with("data:")
    }

    pub fn is_remote(href: &str) -> bool {
        let b = href.as_bytes();
        (b.len() >= 7 && b[..7].eq_ignore_ascii_case(b"http://"))
            || (b.len() >= 8 && b[..8].eq_ignore_ascii_case(b"https://"))
    }

    pub fn is_local_path(href: &str) -> bool {
        !href.is_empty()
            && href
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '-' | '_'))
    }

    pub fn is_valid(href: &str) -> bool {
        is_embedded(href) || is_remote(href) || is_local_path(href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_and_configs_default_every_field() {
        let report: Report = serde_json::from_value(serde_json::json!({
            "company": "Acme",
            "reportName": "Q3",
            "components": [{ "type": "para", "props": { "text": "hi" } }]
        }))
        .unwrap();

        assert_eq!(report.colors.primary, "#0F172A");
        assert_eq!(report.colors.background, "#FFFFFF");
        assert_eq!(report.configs.page.size, PageSize::A4);
        assert_eq!(report.configs.page.margin, "20mm");
        assert!(report.configs.header.visible);
        assert_eq!(report.configs.header.repeat, HeaderRepeat::All);
        assert_eq!(report.configs.footer.text, "Page {{page}} of {{pages}}");
        assert_eq!(report.configs.date.align, Align::Right);
        assert!(report.configs.table.striped);
        assert!(!report.configs.table.compact);
        assert!(report.assets.logo.is_none());
    }

    #[test]
    fn partial_config_group_keeps_other_defaults() {
        let report: Report = serde_json::from_value(serde_json::json!({
            "company": "Acme",
            "reportName": "Q3",
            "configs": { "page": { "size": "Letter" } },
            "components": [{ "type": "divider" }]
        }))
        .unwrap();

        assert_eq!(report.configs.page.size, PageSize::Letter);
        assert_eq!(report.configs.page.orientation, Orientation::Portrait);
        assert_eq!(report.configs.page.margin, "20mm");
    }

    #[test]
    fn unknown_config_field_is_rejected() {
        let result: std::result::Result<Report, _> = serde_json::from_value(serde_json::json!({
            "company": "Acme",
            "reportName": "Q3",
            "configs": { "page": { "papersize": "A4" } },
            "components": [{ "type": "divider" }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn image_ref_forms() {
        assert!(image_ref::is_valid("data:image/png;base64,AAAA"));
        assert!(image_ref::is_valid("https://example.com/a.png"));
        assert!(image_ref::is_valid("HTTP://example.com/a.png"));
        assert!(image_ref::is_valid("assets/bg.png"));
        assert!(!image_ref::is_valid("ftp://example.com/a.png"));
        assert!(!image_ref::is_valid("a b.png"));
        assert!(!image_ref::is_valid(""));
    }
}
