use std::fmt;
use std::str::FromStr;

use handlebars::Handlebars;
use serde_json::{Value, json};
use thiserror::Error;

use crate::builder::Questionnaire;

const DOCUMENT_TEMPLATE: &str = include_str!("templates/document.hbs");
const ELEMENT_PARTIAL: &str = include_str!("templates/element.hbs");

/// Fields the minimal preset drops from every record before rendering.
const MINIMAL_DROPPED: [&str; 7] = [
    "hint",
    "constraint",
    "constraint_message",
    "default",
    "read_only",
    "calculation",
    "choice_filter",
];

/// Named bundle of rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every resolved field, including constraint and calculation plumbing.
    #[default]
    Full,
    /// Labels, skip logic, media, and choices only.
    Minimal,
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Full => write!(f, "full"),
            Preset::Minimal => write!(f, "minimal"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "full" => Ok(Preset::Full),
            "minimal" => Ok(Preset::Minimal),
            _ => Err(format!("unknown preset '{}'", value)),
        }
    }
}

/// Artifact flavor produced by the document renderer. Both emit the same
/// self-contained HTML; `doc` names the file so word processors open it as
/// a paginated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Doc,
    Html,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Doc => "doc",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Doc => write!(f, "doc"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "doc" => Ok(OutputFormat::Doc),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("unknown output format '{}'", value)),
        }
    }
}

/// Errors from the templating layer.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("template registration failed: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("document render failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Render `questionnaire` as a self-contained HTML document for `language`.
///
/// The record tree is produced first, trimmed according to `preset`, then
/// fed through a document template with a recursive element partial.
pub fn render_document(
    questionnaire: &Questionnaire,
    title: &str,
    language: &str,
    preset: Preset,
) -> Result<String, DocError> {
    let mut elements = questionnaire.to_records(language);
    if preset == Preset::Minimal {
        for element in &mut elements {
            strip_for_minimal(element);
        }
    }

    let mut registry = Handlebars::new();
    registry.register_template_string("document", DOCUMENT_TEMPLATE)?;
    registry.register_partial("element", ELEMENT_PARTIAL)?;

    let payload = json!({
        "title": title,
        "language": language,
        "elements": elements,
    });
    Ok(registry.render("document", &payload)?)
}

fn strip_for_minimal(record: &mut Value) {
    let Some(map) = record.as_object_mut() else {
        return;
    };
    for field in MINIMAL_DROPPED {
        map.remove(field);
    }
    if let Some(Value::Array(contents)) = map.get_mut("contents") {
        for child in contents {
            strip_for_minimal(child);
        }
    }
}
