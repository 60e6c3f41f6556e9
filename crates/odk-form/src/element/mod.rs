mod group;
mod prompt;

pub use group::{Group, Repeat, Table, format_header};
pub use prompt::{Prompt, PromptType};

use std::fmt;

use serde_json::Value;

/// A single node of the questionnaire tree.
///
/// The variant set is closed: prompts are leaves, the three composite
/// variants own their children outright.
#[derive(Debug, Clone)]
pub enum Element {
    Prompt(Prompt),
    Group(Group),
    Repeat(Repeat),
    Table(Table),
}

impl Element {
    /// Stable identifier from the originating row.
    pub fn name(&self) -> &str {
        match self {
            Element::Prompt(prompt) => prompt.name(),
            Element::Group(group) => group.name(),
            Element::Repeat(repeat) => repeat.name(),
            Element::Table(table) => table.name(),
        }
    }

    /// Render this element for `language` as an ordered record tree.
    pub fn to_record(&self, language: &str) -> Value {
        match self {
            Element::Prompt(prompt) => prompt.to_record(language),
            Element::Group(group) => group.to_record(language),
            Element::Repeat(repeat) => repeat.to_record(language),
            Element::Table(table) => table.to_record(language),
        }
    }
}

/// The display identity is the canonical way to assert tree shape in
/// tests: composites embed the ordered identities of their children,
/// recursively.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Prompt(prompt) => write!(f, "{prompt}"),
            Element::Group(group) => write!(f, "{group}"),
            Element::Repeat(repeat) => write!(f, "{repeat}"),
            Element::Table(table) => write!(f, "{table}"),
        }
    }
}
