//! Design-token resolution
//!
//! The paginated output path renders header/footer overlays in an execution
//! context that cannot see the main document's stylesheet or CSS custom
//! properties. Both the compositor and the overlay reconciler therefore
//! derive their visual decisions from this one resolution function, so the
//! two independently-rendered presentations can only diverge in markup
//! shape, never in computed values.

use crate::report::{Align, HeaderRepeat, Report};

/// Height reserved for the repeating header overlay.
const HEADER_HEIGHT: &str = "48px";
/// Height reserved for the footer overlay.
const FOOTER_HEIGHT: &str = "40px";

/// Computed color/font/layout values shared by the main compositor and the
/// print-overlay reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignTokens {
    pub text_color: String,
    pub border_color: String,
    pub background_color: String,
    pub font_family: String,
    pub page_size: &'static str,
    pub page_orientation: &'static str,
    pub page_margin: String,
    pub header_visible: bool,
    /// Header rendered as a fixed overlay repeated on every page
    /// (`repeat = "all"`), as opposed to once inline on the first page.
    pub header_overlay: bool,
    pub header_align: Align,
    pub header_height: &'static str,
    pub footer_visible: bool,
    pub footer_align: Align,
    pub footer_height: &'static str,
    pub background_image: Option<String>,
}

impl DesignTokens {
    pub fn resolve(report: &Report) -> Self {
        let header = &report.configs.header;
        let footer = &report.configs.footer;
        let header_overlay = header.visible && header.repeat == HeaderRepeat::All;

        Self {
            text_color: report.colors.text.clone(),
            border_color: report.colors.border.clone(),
            background_color: report.colors.background.clone(),
            font_family: report.configs.font.family.clone(),
            page_size: report.configs.page.size.css(),
            page_orientation: report.configs.page.orientation.css(),
            page_margin: report.configs.page.margin.clone(),
            header_visible: header.visible,
            header_overlay,
            header_align: header.align,
            header_height: if header_overlay { HEADER_HEIGHT } else { "0px" },
            footer_visible: footer.visible,
            footer_align: footer.align,
            footer_height: if footer.visible { FOOTER_HEIGHT } else { "0px" },
            background_image: report.assets.background_image.clone(),
        }
    }
}
