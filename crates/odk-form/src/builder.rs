//! Survey-row assembly: flat begin/end markers back into a tree.
//!
//! The row sequence is not itself nested, so assembly is an explicit stack
//! of open composites rather than recursive descent: begin markers push,
//! end markers pop, everything else lands under the innermost open
//! composite.

use serde_json::Value;

use crate::choices::ChoiceCatalog;
use crate::element::{Element, Group, Prompt, Repeat, Table};
use crate::error::BuildError;
use crate::row::RowRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompositeKind {
    Group,
    Repeat,
    Table,
}

enum Marker {
    Begin(CompositeKind),
    End(CompositeKind),
}

fn marker(row_type: &str) -> Option<Marker> {
    match row_type {
        "begin group" => Some(Marker::Begin(CompositeKind::Group)),
        "end group" => Some(Marker::End(CompositeKind::Group)),
        "begin repeat" => Some(Marker::Begin(CompositeKind::Repeat)),
        "end repeat" => Some(Marker::End(CompositeKind::Repeat)),
        "begin table" => Some(Marker::Begin(CompositeKind::Table)),
        "end table" => Some(Marker::End(CompositeKind::Table)),
        _ => None,
    }
}

struct OpenComposite {
    kind: CompositeKind,
    fields: RowRecord,
    children: Vec<Element>,
}

impl OpenComposite {
    fn close(self) -> Element {
        match self.kind {
            CompositeKind::Group => Element::Group(Group::new(self.fields, self.children)),
            CompositeKind::Repeat => Element::Repeat(Repeat::new(self.fields, self.children)),
            CompositeKind::Table => Element::Table(Table::new(self.fields, self.children)),
        }
    }
}

/// The fully assembled form: an ordered sequence of top-level elements.
///
/// Immutable once built. Rendering is a pure read, so one questionnaire
/// can serve any number of languages or output targets concurrently.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    elements: Vec<Element>,
}

impl Questionnaire {
    /// Assemble the tree from survey rows in authoring order.
    ///
    /// Row order is authoritative: duplicate names at the same level are
    /// both retained. Rows with a blank type are skipped; hand-authored
    /// workbooks routinely carry stray annotation rows. Unbalanced markers
    /// and unknown choice lists abort the whole build.
    pub fn build(rows: &[RowRecord], catalog: &ChoiceCatalog) -> Result<Self, BuildError> {
        let mut root = Vec::new();
        let mut stack: Vec<OpenComposite> = Vec::new();

        for row in rows {
            if row.is_blank() {
                continue;
            }
            let row_type = row.row_type();
            if row_type.is_empty() {
                continue;
            }

            match marker(&row_type) {
                Some(Marker::Begin(kind)) => {
                    stack.push(OpenComposite {
                        kind,
                        fields: row.clone(),
                        children: Vec::new(),
                    });
                }
                Some(Marker::End(kind)) => {
                    let open = stack.pop().ok_or_else(|| BuildError::Structure {
                        marker: row_type.clone(),
                        name: row.name().to_string(),
                    })?;
                    if open.kind != kind || name_mismatch(row, &open.fields) {
                        return Err(BuildError::Structure {
                            marker: row_type,
                            name: open.fields.name().to_string(),
                        });
                    }
                    let element = open.close();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root.push(element),
                    }
                }
                None => {
                    let element = Element::Prompt(Prompt::new(row.clone(), catalog)?);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root.push(element),
                    }
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(BuildError::Unterminated {
                name: open.fields.name().to_string(),
            });
        }

        Ok(Self { elements: root })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Render every top-level element for `language`, in order.
    pub fn to_records(&self, language: &str) -> Vec<Value> {
        self.elements
            .iter()
            .map(|element| element.to_record(language))
            .collect()
    }
}

/// A closing row only has to match when it declares a name of its own;
/// real workbooks usually leave the `name` cell of end markers blank.
fn name_mismatch(end_row: &RowRecord, open_fields: &RowRecord) -> bool {
    let declared = end_row.name();
    !declared.is_empty() && !open_fields.name().is_empty() && declared != open_fields.name()
}
