use thiserror::Error;

/// Errors raised while assembling a questionnaire from survey rows.
///
/// Any of these aborts construction of the whole form; no partial
/// questionnaire is ever produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// An `end` marker arrived with no matching open composite, or closed a
    /// composite of a different kind or name.
    #[error("row '{name}': '{marker}' does not close the open structure")]
    Structure { marker: String, name: String },

    /// The row stream ended while a composite was still open.
    #[error("input ended with '{name}' still open")]
    Unterminated { name: String },

    /// A selection-type row references a list the catalog does not define.
    #[error("row '{name}': choice list '{list}' is not defined")]
    ChoiceListMissing { list: String, name: String },

    /// Reserved for a strict mode that rejects conflicting translation
    /// columns; the default resolution rules never produce it.
    #[error("row '{name}': conflicting columns for field '{field}'")]
    AmbiguousField { field: String, name: String },
}
