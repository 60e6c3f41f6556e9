//! Language and media field resolution over a raw row.
//!
//! Resolution is a pure lookup: a translatable field prefers its
//! language-suffixed column (`label::English`) and falls back to the
//! unsuffixed column. Absent fields resolve to empty, never to an error,
//! since workbook columns are optionally populated per language.

use serde_json::{Map, Value};

use crate::row::RowRecord;

/// Media kinds recognized on prompt and choice rows.
pub const MEDIA_KINDS: [&str; 3] = ["image", "audio", "video"];

const MEDIA_OPEN: char = '[';
const MEDIA_CLOSE: char = ']';

/// Resolve `key` for `language`: the `key::language` column wins when
/// populated, the unsuffixed `key` column is the fallback.
pub fn resolve<'a>(fields: &'a RowRecord, key: &str, language: &str) -> &'a str {
    if !language.is_empty() {
        let suffixed = format!("{key}::{language}");
        if let Some(value) = fields.get(&suffixed)
            && !value.trim().is_empty()
        {
            return value;
        }
    }
    match fields.get(key) {
        Some(value) if !value.trim().is_empty() => value,
        _ => "",
    }
}

/// Wrap a located media reference so renderers can tell it from plain text.
pub fn format_media(value: &str) -> String {
    format!("{MEDIA_OPEN}{value}{MEDIA_CLOSE}")
}

fn resolve_media_kind<'a>(fields: &'a RowRecord, kind: &str, language: &str) -> &'a str {
    let prefixed = format!("media::{kind}");
    let value = resolve(fields, &prefixed, language);
    if !value.is_empty() {
        return value;
    }
    resolve(fields, kind, language)
}

/// Resolve every media kind for `language`.
///
/// A located value appears under the bare kind key and under its
/// language-suffixed `media::<kind>::<language>` counterpart with the same
/// wrapped value, so the two can never disagree. All wrapped values are
/// also aggregated under the single `media` key, ordered image, audio,
/// video.
pub fn resolve_media(fields: &RowRecord, language: &str) -> Map<String, Value> {
    let mut resolved = Map::new();
    let mut aggregate = Vec::new();
    for kind in MEDIA_KINDS {
        let value = resolve_media_kind(fields, kind, language);
        if value.is_empty() {
            continue;
        }
        let wrapped = format_media(value);
        resolved.insert(kind.to_string(), Value::String(wrapped.clone()));
        if !language.is_empty() {
            resolved.insert(
                format!("media::{kind}::{language}"),
                Value::String(wrapped.clone()),
            );
        }
        aggregate.push(Value::String(wrapped));
    }
    if !aggregate.is_empty() {
        resolved.insert("media".to_string(), Value::Array(aggregate));
    }
    resolved
}
