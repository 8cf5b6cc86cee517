//! Payload validation
//!
//! Turns an untyped JSON payload into a `Report` or a structured set of
//! field-scoped issues. Shape and enum errors surface from serde; the
//! semantic pass below collects every remaining issue at once rather than
//! stopping at the first.

use serde_json::Value;

use crate::error::{FieldErrors, FieldIssue};
use crate::report::{image_ref, ComponentKind, Report};

/// Validate an inbound payload. No partial render is ever attempted on a
/// rejected document.
pub fn parse_report(payload: Value) -> Result<Report, FieldErrors> {
    let report: Report = serde_json::from_value(payload)
        .map_err(|e| FieldErrors::single("$", e.to_string()))?;

    let mut issues = Vec::new();

    if report.company.trim().is_empty() {
        push(&mut issues, "company", "must be a non-empty string");
    }
    if report.report_name.trim().is_empty() {
        push(&mut issues, "reportName", "must be a non-empty string");
    }
    if report.components.is_empty() {
        push(&mut issues, "components", "at least one component is required");
    }

    let slots = [
        ("assets.logo", &report.assets.logo),
        ("assets.headerImage", &report.assets.header_image),
        ("assets.footerImage", &report.assets.footer_image),
        ("assets.backgroundImage", &report.assets.background_image),
    ];
    for (path, slot) in slots {
        if let Some(href) = slot {
            if !image_ref::is_valid(href) {
                push(&mut issues, path, "invalid image reference");
            }
        }
    }

    for (i, component) in report.components.iter().enumerate() {
        match &component.kind {
            ComponentKind::Image { props } => {
                if !(image_ref::is_remote(&props.url) || image_ref::is_embedded(&props.url)) {
                    push(
                        &mut issues,
                        format!("components[{i}].props.url"),
                        "must be an http(s) URL or data URI",
                    );
                }
            }
            ComponentKind::ImageGrid { props } => {
                if props.rows.is_empty() {
                    push(
                        &mut issues,
                        format!("components[{i}].props.rows"),
                        "at least one row is required",
                    );
                }
                for (r, row) in props.rows.iter().enumerate() {
                    for (c, url) in row.iter().enumerate() {
                        if !(image_ref::is_remote(url) || image_ref::is_embedded(url)) {
                            push(
                                &mut issues,
                                format!("components[{i}].props.rows[{r}][{c}]"),
                                "must be an http(s) URL or data URI",
                            );
                        }
                    }
                }
            }
            ComponentKind::Signature { props } => {
                if let Some(lines) = props.lines {
                    if !(1..=5).contains(&lines) {
                        push(
                            &mut issues,
                            format!("components[{i}].props.lines"),
                            "must be between 1 and 5",
                        );
                    }
                }
            }
            _ => {}
        }
    }

    if issues.is_empty() {
        Ok(report)
    } else {
        Err(FieldErrors { issues })
    }
}

fn push(issues: &mut Vec<FieldIssue>, path: impl Into<String>, message: impl Into<String>) {
    issues.push(FieldIssue {
        path: path.into(),
        message: message.into(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "company": "Acme",
            "reportName": "Q3 Report",
            "components": [{ "type": "para", "props": { "text": "hello" } }]
        })
    }

    #[test]
    fn accepts_minimal_report() {
        let report = parse_report(minimal()).unwrap();
        assert_eq!(report.company, "Acme");
        assert_eq!(report.components.len(), 1);
    }

    #[test]
    fn rejects_empty_components() {
        let mut payload = minimal();
        payload["components"] = json!([]);
        let errors = parse_report(payload).unwrap_err();
        assert!(errors.issues.iter().any(|i| i.path == "components"));
    }

    #[test]
    fn rejects_bad_asset_reference_with_field_path() {
        let mut payload = minimal();
        payload["assets"] = json!({ "logo": "not a ref!" });
        let errors = parse_report(payload).unwrap_err();
        assert_eq!(errors.issues.len(), 1);
        assert_eq!(errors.issues[0].path, "assets.logo");
    }

    #[test]
    fn rejects_relative_path_for_inline_image() {
        let mut payload = minimal();
        payload["components"] = json!([
            { "type": "image", "props": { "url": "assets/pic.png" } }
        ]);
        let errors = parse_report(payload).unwrap_err();
        assert_eq!(errors.issues[0].path, "components[0].props.url");
    }

    #[test]
    fn collects_multiple_issues_in_one_pass() {
        let errors = parse_report(json!({
            "company": "  ",
            "reportName": "",
            "components": [
                { "type": "signature", "props": { "lines": 9 } },
                { "type": "image-grid", "props": { "rows": [] } }
            ]
        }))
        .unwrap_err();
        assert_eq!(errors.issues.len(), 4);
    }

    #[test]
    fn unknown_root_field_is_rejected() {
        let mut payload = minimal();
        payload["extra"] = json!(true);
        assert!(parse_report(payload).is_err());
    }

    #[test]
    fn unknown_component_type_passes_validation() {
        let mut payload = minimal();
        payload["components"] = json!([
            { "type": "para", "props": { "text": "ok" } },
            { "type": "heatmap", "props": { "cells": [] } }
        ]);
        assert!(parse_report(payload).is_ok());
    }
}
