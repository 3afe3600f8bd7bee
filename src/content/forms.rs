//! Form and input inventory.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cdp::{CdpError, PageSession};

/// Validation attributes present on an input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// One `<option>` of a select.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

/// One input/select/textarea/submit inside a form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormInputInfo {
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
    pub id: String,
    pub value: String,
    pub placeholder: String,
    pub required: bool,
    pub disabled: bool,
    pub validation: ValidationInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

/// One form with its inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormInfo {
    pub id: String,
    pub name: String,
    pub action: String,
    pub method: String,
    pub inputs: Vec<FormInputInfo>,
}

const FORMS_SCRIPT: &str = r#"
    const forms = [];
    for (const form of document.querySelectorAll('form')) {
        const inputs = [];
        for (const el of form.querySelectorAll('input, select, textarea, button[type="submit"]')) {
            const info = {
                type: el.type || el.tagName.toLowerCase(),
                name: el.name || '',
                id: el.id || '',
                value: el.value || '',
                placeholder: el.placeholder || '',
                required: Boolean(el.required),
                disabled: Boolean(el.disabled),
                validation: {}
            };

            if (el instanceof HTMLInputElement) {
                if (el.minLength > -1) info.validation.minLength = el.minLength;
                if (el.maxLength > -1) info.validation.maxLength = el.maxLength;
                if (el.min) info.validation.min = el.min;
                if (el.max) info.validation.max = el.max;
                if (el.pattern) info.validation.pattern = el.pattern;
            }

            if (el instanceof HTMLSelectElement) {
                info.options = Array.from(el.options).map(opt => ({
                    value: opt.value,
                    text: opt.text
                }));
            }

            inputs.push(info);
        }

        forms.push({
            id: form.id || '',
            name: form.getAttribute('name') || '',
            action: form.action || '',
            method: form.method || '',
            inputs: inputs
        });
    }
    return forms;
"#;

/// Inventory every form on the page.
pub async fn analyze_forms(session: &PageSession) -> Result<Vec<FormInfo>, CdpError> {
    let value = session.evaluate_function(FORMS_SCRIPT, &json!({})).await?;
    Ok(serde_json::from_value(value)?)
}
