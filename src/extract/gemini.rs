//! Gemini field extractor
//!
//! Thin wrapper over the Gemini `generateContent` API. Builds an
//! extraction prompt, sends the scraped document text along, and recovers
//! a JSON object from whatever the model answers (models like wrapping
//! JSON in markdown fences).

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::ExtractError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Bill-of-Entry field labels; callers may override any label per
/// request.
const DEFAULT_BILL_FIELDS: &[(&str, &str)] = &[
    ("consignee_name", "Name of Consigner of Goods (Exporter)"),
    ("consignee_importer", "Name of Consignee of Goods (Importer)"),
    ("applicant_survey", "Applicant of Survey"),
    ("underwriter_name", "Name of Underwriter / Insurer"),
    ("cha_name", "Name of CHA / Clearing Agent / Forwarder"),
    ("certificate_no", "Certificate No (if Applicable)"),
    ("endorsement_no", "Endorsement No (if Any)"),
    ("invoice_no", "Invoice Details Invoice No"),
    ("invoice_date", "Invoice Details Invoice Date"),
    ("invoice_value", "Invoice Details Invoice Value"),
    ("invoice_pcs", "Invoice Details No of PKG"),
    ("invoice_gross_wt", "Invoice Details Gross WT"),
    ("invoice_net_wt", "Invoice Details Net WT"),
];

/// LLM-based structured field extractor
pub struct FieldExtractor {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl FieldExtractor {
    pub fn new(http: reqwest::Client, api_key: Option<String>, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Extract the Bill-of-Entry field set, with optional per-field label
    /// overrides from the caller.
    pub async fn extract_bill_fields(
        &self,
        document_text: &str,
        custom_labels: &HashMap<String, String>,
    ) -> Result<Map<String, Value>, ExtractError> {
        let prompt = bill_extraction_prompt(custom_labels);
        let answer = self.generate(&prompt, document_text).await?;
        parse_json_object(&answer)
    }

    /// Extract only the requested fields. The model sometimes volunteers
    /// extras; the result is filtered back down to what was asked for.
    pub async fn extract_selective_fields(
        &self,
        document_text: &str,
        fields: &[String],
        document_type: Option<&str>,
    ) -> Result<Map<String, Value>, ExtractError> {
        let prompt = selective_extraction_prompt(fields, document_type);
        let answer = self.generate(&prompt, document_text).await?;
        let extracted = parse_json_object(&answer)?;
        Ok(filter_requested(extracted, fields))
    }

    async fn generate(&self, prompt: &str, document_text: &str) -> Result<String, ExtractError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ExtractError::NotConfigured("GEMINI_API_KEY is not set".to_string())
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );
        let request = serde_json::json!({
            "contents": [{
                "parts": [{
                    "text": format!("{prompt}\n\nDocument Content:\n{document_text}")
                }]
            }],
            "generationConfig": {
                "temperature": 0.1,
                "topP": 0.8,
                "maxOutputTokens": 4096
            }
        });

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::Api(format!("Failed to call Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Api(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let result: Value = response
            .json()
            .await
            .map_err(|e| ExtractError::Api(format!("Failed to parse response: {}", e)))?;

        let text = result["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();
        tracing::debug!("Gemini answered with {} characters", text.len());
        Ok(text)
    }
}

fn bill_extraction_prompt(custom_labels: &HashMap<String, String>) -> String {
    let field_lines: Vec<String> = DEFAULT_BILL_FIELDS
        .iter()
        .map(|(key, default_label)| {
            let label = custom_labels
                .get(*key)
                .map(String::as_str)
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(default_label);
            format!("  \"{key}\": \"Extract value for '{label}'\"")
        })
        .collect();

    format!(
        "You are a specialized document extraction AI for Bill of Entry documents.\n\n\
         Extract the following information and return ONLY a valid JSON object:\n\n\
         {{\n{}\n}}\n\n\
         CRITICAL INSTRUCTIONS:\n\
         1. Return ONLY the JSON object, no explanations\n\
         2. If a field is not found, use null\n\
         3. For numeric values, extract only numbers (remove currency symbols)\n\
         4. For dates, use DD-MM-YYYY format\n\
         5. Look for the EXACT field labels provided above in the document\n\
         6. Match field labels case-insensitively and with partial matching\n\
         7. Look for variations and common abbreviations of the field names\n\
         8. For company names, include the full legal entity name\n\
         9. For invoice details, look in tables, forms, or structured sections\n\n\
         Search thoroughly through the entire document for each field.",
        field_lines.join(",\n")
    )
}

fn selective_extraction_prompt(fields: &[String], document_type: Option<&str>) -> String {
    let field_lines: Vec<String> = fields
        .iter()
        .map(|field| {
            format!(
                "  \"{field}\": \"Extract the value for '{}'\"",
                humanize_field(field)
            )
        })
        .collect();
    let doc_type = document_type.unwrap_or("business document");

    format!(
        "You are a specialized document extraction AI for {doc_type}s.\n\n\
         Extract ONLY the following specific fields and return a valid JSON object:\n\n\
         {{\n{}\n}}\n\n\
         CRITICAL INSTRUCTIONS:\n\
         1. Return ONLY a valid JSON object, no explanations or markdown\n\
         2. Extract ONLY the fields listed above - do not add any other fields\n\
         3. If a field is not found in the document, use null as the value\n\
         4. For numeric values, extract only numbers (remove currency symbols)\n\
         5. For dates, preserve the format found in the document\n\
         6. Match field labels case-insensitively, including abbreviations and\n\
            alternative spellings, and search tables, forms, headers, and text\n\
         7. If a field appears more than once, use the most prominent occurrence",
        field_lines.join(",\n")
    )
}

/// `policy_number` -> `Policy Number`
fn humanize_field(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recover the JSON object from a model answer: strip markdown fences,
/// then parse from the first `{` to the last `}`.
fn parse_json_object(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let start = cleaned
        .find('{')
        .ok_or_else(|| ExtractError::Parse("no JSON object in response".to_string()))?;
    let end = cleaned
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| ExtractError::Parse("no JSON object in response".to_string()))?;

    let parsed: Value = serde_json::from_str(&cleaned[start..=end])
        .map_err(|e| ExtractError::Parse(e.to_string()))?;
    match parsed {
        Value::Object(map) => Ok(map),
        _ => Err(ExtractError::Parse("expected a JSON object".to_string())),
    }
}

/// Keep only the requested, non-null fields.
fn filter_requested(extracted: Map<String, Value>, fields: &[String]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|field| {
            extracted
                .get(field)
                .filter(|value| !value.is_null())
                .map(|value| (field.clone(), value.clone()))
        })
        .collect()
}
