use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::BuildError;
use crate::fields::{resolve, resolve_media};
use crate::row::RowRecord;

/// Accepted spellings of the column that names a choice row's list.
const LIST_NAME_COLUMNS: [&str; 2] = ["list_name", "list name"];

/// One selectable option: a value token plus raw per-language label and
/// media columns. Labels resolve lazily at render time so a single choice
/// serves every output language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    fields: RowRecord,
}

impl Choice {
    pub fn new(fields: RowRecord) -> Self {
        Self { fields }
    }

    /// The stored answer token.
    pub fn value(&self) -> &str {
        self.fields.name()
    }

    /// Label for `language`, following the usual fallback order.
    pub fn label(&self, language: &str) -> &str {
        resolve(&self.fields, "label", language)
    }

    pub fn fields(&self) -> &RowRecord {
        &self.fields
    }

    /// Render the choice for `language`: value, resolved label, and any
    /// resolved media.
    pub fn to_record(&self, language: &str) -> Value {
        let mut record = Map::new();
        record.insert("value".into(), Value::String(self.value().to_string()));
        record.insert(
            "label".into(),
            Value::String(self.label(language).to_string()),
        );
        for (key, value) in resolve_media(&self.fields, language) {
            record.insert(key, value);
        }
        Value::Object(record)
    }
}

/// An ordered, named collection of choices. Order within a list is render
/// order (insertion order = authoring order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceList {
    name: String,
    choices: Vec<Choice>,
}

impl ChoiceList {
    pub fn new(name: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            name: name.into(),
            choices,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn to_records(&self, language: &str) -> Vec<Value> {
        self.choices
            .iter()
            .map(|choice| choice.to_record(language))
            .collect()
    }
}

/// Every choice list in a workbook, grouped by list identifier.
///
/// The catalog owns its lists; prompts hold shared references into it, so
/// building the catalog once serves every render language and every
/// selection question.
#[derive(Debug, Clone, Default)]
pub struct ChoiceCatalog {
    lists: BTreeMap<String, Arc<ChoiceList>>,
}

impl ChoiceCatalog {
    /// Group choice-sheet rows by list identifier, preserving authoring
    /// order within each list. Rows without a list identifier are dropped.
    pub fn from_rows(rows: &[RowRecord]) -> Self {
        let mut grouped: BTreeMap<String, Vec<Choice>> = BTreeMap::new();
        for row in rows {
            if row.is_blank() {
                continue;
            }
            let Some(list) = list_name(row) else { continue };
            grouped
                .entry(list.to_string())
                .or_default()
                .push(Choice::new(row.clone()));
        }

        let lists = grouped
            .into_iter()
            .map(|(name, choices)| {
                let list = Arc::new(ChoiceList::new(name.clone(), choices));
                (name, list)
            })
            .collect();
        Self { lists }
    }

    /// The list named `list`, if the workbook defines it.
    pub fn get(&self, list: &str) -> Option<Arc<ChoiceList>> {
        self.lists.get(list).cloned()
    }

    /// Like [`ChoiceCatalog::get`], but an unknown list becomes the hard
    /// error construction reports, attributed to the row named `row_name`.
    pub fn lookup(&self, list: &str, row_name: &str) -> Result<Arc<ChoiceList>, BuildError> {
        self.get(list).ok_or_else(|| BuildError::ChoiceListMissing {
            list: list.to_string(),
            name: row_name.to_string(),
        })
    }

    pub fn contains(&self, list: &str) -> bool {
        self.lists.contains_key(list)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

fn list_name(row: &RowRecord) -> Option<&str> {
    LIST_NAME_COLUMNS
        .iter()
        .map(|column| row.value(column).trim())
        .find(|list| !list.is_empty())
}
