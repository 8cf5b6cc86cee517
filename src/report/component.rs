//! Component union
//!
//! One discriminated, orderable content block within a report body.
//! Dispatch over the `type` tag happens in the renderer registry; this
//! module only models the data.

use std::collections::HashMap;

use serde::Deserialize;

/// Per-instance style overrides: semantic slot name -> class-string to
/// append. Keys are open; each renderer decides which slots it honors and
/// ignores the rest.
pub type StyleMap = HashMap<String, String>;

/// One content block: the variant payload plus the shared base fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    #[serde(flatten)]
    pub kind: ComponentKind,
    #[serde(default)]
    pub style: StyleMap,
    #[serde(default)]
    pub id: Option<String>,
}

/// Discriminated union over the `type` tag.
///
/// Unrecognized tags deserialize to `Unknown` and render to an empty
/// fragment with a warning instead of rejecting the payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentKind {
    #[serde(rename = "header")]
    Header { props: TextProps },
    #[serde(rename = "subheader")]
    Subheader { props: TextProps },
    #[serde(rename = "date")]
    Date {
        #[serde(default)]
        props: DateProps,
    },
    #[serde(rename = "para")]
    Para { props: TextProps },
    #[serde(rename = "divider")]
    Divider,
    #[serde(rename = "spacer")]
    Spacer {
        #[serde(default)]
        props: SpacerProps,
    },
    #[serde(rename = "pagebreak")]
    Pagebreak,
    #[serde(rename = "signature")]
    Signature {
        #[serde(default)]
        props: SignatureProps,
    },
    #[serde(rename = "footerText")]
    FooterText { props: TextProps },
    #[serde(rename = "table")]
    Table { props: TableProps },
    #[serde(rename = "image")]
    Image { props: ImageProps },
    #[serde(rename = "image-grid")]
    ImageGrid { props: ImageGridProps },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextProps {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateProps {
    /// ISO date string; the current date is used when absent.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpacerProps {
    #[serde(default)]
    pub size: Option<SpacerSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacerSize {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureProps {
    #[serde(default)]
    pub label: Option<String>,
    /// Number of signature lines, 1..=5. Renderers clamp out-of-range
    /// values even though validation already rejects them.
    #[serde(default)]
    pub lines: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableProps {
    #[serde(default)]
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One table cell. Row widths are independent of the header count; the
/// renderer tolerates the mismatch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Null,
}

impl Cell {
    /// Unescaped display text; `null` renders as the empty string and
    /// whole numbers drop the fractional part.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                format!("{}", *n as i64)
            }
            Cell::Number(n) => format!("{}", n),
            Cell::Null => String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageProps {
    /// Image reference; validation requires an http(s) URL or data URI,
    /// hydration replaces it with its embedded form.
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// CSS length strings, e.g. `50%` or `300px`.
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGridProps {
    #[serde(default)]
    pub title: Option<String>,
    /// Rows of image URLs; flattened and re-chunked by the renderer.
    pub rows: Vec<Vec<String>>,
}
