#![allow(missing_docs)]

pub mod builder;
pub mod choices;
pub mod element;
pub mod error;
pub mod fields;
pub mod render;
pub mod row;

pub use builder::Questionnaire;
pub use choices::{Choice, ChoiceCatalog, ChoiceList};
pub use element::{Element, Group, Prompt, PromptType, Repeat, Table, format_header};
pub use error::BuildError;
pub use fields::{MEDIA_KINDS, resolve, resolve_media};
pub use render::{DocError, OutputFormat, Preset, render_document};
pub use row::RowRecord;
