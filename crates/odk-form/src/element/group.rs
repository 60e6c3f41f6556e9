use std::fmt;

use serde_json::{Map, Value};

use crate::element::Element;
use crate::fields::{resolve, resolve_media};
use crate::row::RowRecord;

/// Derive a composite's header record from its raw row fields.
///
/// The label resolves per language; the `relevant` expression and the
/// appearance hint are copied verbatim, since expression text is not
/// natural language and never goes through the fallback. Works on a bare
/// field map so header formatting can be exercised without building a
/// whole composite.
pub fn format_header(fields: &RowRecord, language: &str) -> Map<String, Value> {
    let mut header = Map::new();
    header.insert("name".into(), Value::String(fields.name().to_string()));
    header.insert(
        "label".into(),
        Value::String(resolve(fields, "label", language).to_string()),
    );
    header.insert(
        "relevant".into(),
        Value::String(fields.value("relevant").to_string()),
    );
    header.insert(
        "appearance".into(),
        Value::String(fields.value("appearance").to_string()),
    );
    for (key, value) in resolve_media(fields, language) {
        header.insert(key, value);
    }
    header
}

fn composite_record(kind: &str, fields: &RowRecord, children: &[Element], language: &str) -> Value {
    let mut record = Map::new();
    record.insert("kind".into(), Value::String(kind.to_string()));
    for (key, value) in format_header(fields, language) {
        record.insert(key, value);
    }
    record.insert(
        "contents".into(),
        Value::Array(
            children
                .iter()
                .map(|child| child.to_record(language))
                .collect(),
        ),
    );
    Value::Object(record)
}

fn write_identity(
    f: &mut fmt::Formatter<'_>,
    kind: &str,
    name: &str,
    children: &[Element],
) -> fmt::Result {
    write!(f, "<{kind} {name}: [")?;
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{child}")?;
    }
    f.write_str("]>")
}

/// A named composite holding an ordered sequence of child elements plus its
/// own header fields.
#[derive(Debug, Clone)]
pub struct Group {
    fields: RowRecord,
    children: Vec<Element>,
}

impl Group {
    pub fn new(fields: RowRecord, children: Vec<Element>) -> Self {
        Self { fields, children }
    }

    pub fn name(&self) -> &str {
        self.fields.name()
    }

    pub fn fields(&self) -> &RowRecord {
        &self.fields
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Header record plus the ordered, recursively rendered `contents`.
    pub fn to_record(&self, language: &str) -> Value {
        composite_record("group", &self.fields, &self.children, language)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identity(f, "Group", self.name(), &self.children)
    }
}

/// A group whose children are administered repeatedly.
#[derive(Debug, Clone)]
pub struct Repeat {
    fields: RowRecord,
    children: Vec<Element>,
}

impl Repeat {
    pub fn new(fields: RowRecord, children: Vec<Element>) -> Self {
        Self { fields, children }
    }

    pub fn name(&self) -> &str {
        self.fields.name()
    }

    pub fn fields(&self) -> &RowRecord {
        &self.fields
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn to_record(&self, language: &str) -> Value {
        composite_record("repeat", &self.fields, &self.children, language)
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identity(f, "Repeat", self.name(), &self.children)
    }
}

/// A group whose children lay out as matrix rows rather than sequentially.
#[derive(Debug, Clone)]
pub struct Table {
    fields: RowRecord,
    children: Vec<Element>,
}

impl Table {
    pub fn new(fields: RowRecord, children: Vec<Element>) -> Self {
        Self { fields, children }
    }

    pub fn name(&self) -> &str {
        self.fields.name()
    }

    pub fn fields(&self) -> &RowRecord {
        &self.fields
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn to_record(&self, language: &str) -> Value {
        composite_record("table", &self.fields, &self.children, language)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identity(f, "Table", self.name(), &self.children)
    }
}
