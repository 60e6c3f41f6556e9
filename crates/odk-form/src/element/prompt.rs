use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::choices::{ChoiceCatalog, ChoiceList};
use crate::error::BuildError;
use crate::fields::{resolve, resolve_media};
use crate::row::RowRecord;

/// Fields whose text is translated per language.
const TRANSLATED_FIELDS: [&str; 3] = ["label", "hint", "constraint_message"];

/// Fields copied into the record verbatim. `relevant`, `constraint`, and
/// `calculation` hold expression text, which must never go through language
/// fallback.
const VERBATIM_FIELDS: [&str; 8] = [
    "relevant",
    "constraint",
    "appearance",
    "default",
    "read_only",
    "required",
    "calculation",
    "choice_filter",
];

/// Parsed question type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptType {
    /// `select_one <list>`: exactly one answer from a named list.
    SelectOne { list: String },
    /// `select_multiple <list>`: any number of answers from a named list.
    SelectMultiple { list: String },
    /// Every non-selection type (text, integer, date, note, calculate, ...).
    Plain(String),
}

impl PromptType {
    /// Parse a `type` cell. Selection types name their choice list in the
    /// second whitespace-delimited token; a missing token yields an empty
    /// list name so construction can report the row as unusable.
    pub fn parse(raw: &str) -> Self {
        let mut tokens = raw.split_whitespace();
        match tokens.next() {
            Some("select_one") => PromptType::SelectOne {
                list: tokens.next().unwrap_or_default().to_string(),
            },
            Some("select_multiple") => PromptType::SelectMultiple {
                list: tokens.next().unwrap_or_default().to_string(),
            },
            _ => PromptType::Plain(raw.trim().to_string()),
        }
    }

    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            PromptType::SelectOne { .. } | PromptType::SelectMultiple { .. }
        )
    }

    /// The referenced list name, for selection types.
    pub fn list_name(&self) -> Option<&str> {
        match self {
            PromptType::SelectOne { list } | PromptType::SelectMultiple { list } => Some(list),
            PromptType::Plain(_) => None,
        }
    }
}

/// A single question row: note, text, numeric, or selection.
#[derive(Debug, Clone)]
pub struct Prompt {
    fields: RowRecord,
    kind: PromptType,
    choices: Option<Arc<ChoiceList>>,
}

impl Prompt {
    /// Build a prompt from its row, linking selection types to their choice
    /// list. A selection type whose list the catalog does not define is a
    /// hard error, so `choices()` is always populated for selection prompts
    /// once construction succeeds.
    pub fn new(fields: RowRecord, catalog: &ChoiceCatalog) -> Result<Self, BuildError> {
        let kind = PromptType::parse(fields.value("type"));
        let choices = match kind.list_name() {
            Some(list) => Some(catalog.lookup(list, fields.name())?),
            None => None,
        };
        Ok(Self {
            fields,
            kind,
            choices,
        })
    }

    pub fn name(&self) -> &str {
        self.fields.name()
    }

    pub fn kind(&self) -> &PromptType {
        &self.kind
    }

    pub fn fields(&self) -> &RowRecord {
        &self.fields
    }

    /// The linked choice list; always `Some` for selection types.
    pub fn choices(&self) -> Option<&ChoiceList> {
        self.choices.as_deref()
    }

    /// Render the prompt for `language`.
    ///
    /// Translated fields resolve through the language fallback, expression
    /// and layout fields are copied verbatim, located media appear both
    /// under their own keys and the `media` aggregate, and selection
    /// prompts carry their rendered choices.
    pub fn to_record(&self, language: &str) -> Value {
        let mut record = Map::new();
        record.insert("name".into(), Value::String(self.name().to_string()));
        record.insert(
            "type".into(),
            Value::String(self.fields.value("type").to_string()),
        );
        for field in TRANSLATED_FIELDS {
            record.insert(
                field.to_string(),
                Value::String(resolve(&self.fields, field, language).to_string()),
            );
        }
        for field in VERBATIM_FIELDS {
            record.insert(
                field.to_string(),
                Value::String(self.fields.value(field).to_string()),
            );
        }
        for (key, value) in resolve_media(&self.fields, language) {
            record.insert(key, value);
        }
        if let Some(choices) = self.choices.as_deref() {
            record.insert("choices".into(), Value::Array(choices.to_records(language)));
        }
        Value::Object(record)
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Prompt {}>", self.name())
    }
}
