// Tab association form: raw submitted fields and their validated shape.
//
// Blank fields coerce to absent before they reach the store. Validation stops
// at the first failing field, checked in declaration order.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::{AppError, RequestParams, Result};

use super::entity::EntityKind;

pub const TITLE_MAX_LENGTH: usize = 255;

/// Raw field values as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabForm {
    #[serde(skip)]
    pub kind: Option<EntityKind>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub locale: Option<String>,
    pub visible: Option<String>,
    pub position: Option<String>,
    pub success_url: Option<String>,
}

/// Validated and typed form data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabFormData {
    pub title: String,
    pub description: Option<String>,
    pub locale: String,
    pub visible: bool,
    pub position: Option<i32>,
    pub success_url: Option<String>,
}

/// Submitted values and error message attached to a re-rendered view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub name: String,
    pub values: BTreeMap<&'static str, String>,
    pub error_message: Option<String>,
}

impl TabForm {
    pub fn from_params(kind: EntityKind, params: &RequestParams) -> Self {
        let field = |name: &str| params.get(name).map(str::to_string);

        Self {
            kind: Some(kind),
            title: field("title"),
            description: field("description"),
            locale: field("locale"),
            visible: field("visible"),
            position: field("position"),
            success_url: field("success_url"),
        }
    }

    /// Form name as seen by the edit templates, e.g. `tabs_product_form`
    pub fn name(&self) -> String {
        match self.kind {
            Some(kind) => format!("tabs_{}_form", kind),
            None => "tabs_form".to_string(),
        }
    }

    pub fn validate(&self, default_locale: &str) -> Result<TabFormData> {
        let title = match non_blank(&self.title) {
            None => return Err(AppError::validation("title: This value should not be blank.")),
            Some(title) if title.chars().count() > TITLE_MAX_LENGTH => {
                return Err(AppError::validation(format!(
                    "title: This value is too long. It should have {} characters or less.",
                    TITLE_MAX_LENGTH
                )))
            }
            Some(title) => title.to_string(),
        };

        let description = non_blank(&self.description).map(str::to_string);

        let locale = match non_blank(&self.locale) {
            None => default_locale.to_string(),
            Some(locale) if is_locale(locale) => locale.to_string(),
            Some(_) => {
                return Err(AppError::validation("locale: This value is not a valid locale."))
            }
        };

        let visible = match non_blank(&self.visible) {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                AppError::validation("visible: This value is not valid.")
            })?,
        };

        let position = match non_blank(&self.position) {
            None => None,
            Some(raw) => match raw.parse::<i32>() {
                // "0" counts as empty: the store picks the position
                Ok(0) => None,
                Ok(p) if p > 0 => Some(p),
                _ => {
                    return Err(AppError::validation(
                        "position: This value should be a positive integer.",
                    ))
                }
            },
        };

        let success_url = match non_blank(&self.success_url) {
            None => None,
            Some(url) if is_success_url(url) => Some(url.to_string()),
            Some(_) => {
                return Err(AppError::validation("success_url: This value is not a valid URL."))
            }
        };

        Ok(TabFormData {
            title,
            description,
            locale,
            visible,
            position,
            success_url,
        })
    }

    pub fn state(&self, error_message: Option<String>) -> FormState {
        let mut values = BTreeMap::new();
        let fields = [
            ("title", &self.title),
            ("description", &self.description),
            ("locale", &self.locale),
            ("visible", &self.visible),
            ("position", &self.position),
            ("success_url", &self.success_url),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                values.insert(name, value.clone());
            }
        }

        FormState {
            name: self.name(),
            values,
            error_message,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// `ll` or `ll_CC`
fn is_locale(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let language = |b: &[u8]| b.len() == 2 && b.iter().all(u8::is_ascii_lowercase);
    let country = |b: &[u8]| b.len() == 2 && b.iter().all(u8::is_ascii_uppercase);

    match bytes.len() {
        2 => language(bytes),
        5 => language(&bytes[..2]) && bytes[2] == b'_' && country(&bytes[3..]),
        _ => false,
    }
}

/// Admin-relative path or absolute http(s) URL
fn is_success_url(raw: &str) -> bool {
    if raw.starts_with('/') && !raw.starts_with("//") {
        return true;
    }

    url::Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
