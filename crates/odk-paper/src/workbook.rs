use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{Reader, Xlsx, open_workbook};
use odk_form::RowRecord;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const SURVEY_SHEET: &str = "survey";
const CHOICES_SHEET: &str = "choices";
const SETTINGS_SHEET: &str = "settings";

/// Raw workbook contents: survey and choice rows plus settings metadata.
///
/// The first row of each sheet names the columns; remaining rows become
/// records keyed by those names. Fully blank rows are dropped here so the
/// builder never sees them.
#[derive(Debug, Clone, Default)]
pub struct FormWorkbook {
    pub survey_columns: Vec<String>,
    pub survey: Vec<RowRecord>,
    pub choices: Vec<RowRecord>,
    pub settings: BTreeMap<String, String>,
}

impl FormWorkbook {
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let sheet_names = workbook.sheet_names().to_owned();
        if !sheet_names.iter().any(|name| name == SURVEY_SHEET) {
            return Err(format!("{} has no '{}' sheet", path.display(), SURVEY_SHEET).into());
        }

        let (survey_columns, survey) = sheet_rows(&mut workbook, SURVEY_SHEET)?;
        let choices = if sheet_names.iter().any(|name| name == CHOICES_SHEET) {
            sheet_rows(&mut workbook, CHOICES_SHEET)?.1
        } else {
            Vec::new()
        };
        let settings = if sheet_names.iter().any(|name| name == SETTINGS_SHEET) {
            settings_map(sheet_rows(&mut workbook, SETTINGS_SHEET)?.1)
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            survey_columns,
            survey,
            choices,
            settings,
        })
    }

    pub fn form_title(&self) -> Option<&str> {
        self.setting("form_title")
    }

    pub fn default_language(&self) -> Option<&str> {
        self.setting("default_language")
    }

    /// Languages announced by the survey sheet's `label::` columns, in
    /// column order.
    pub fn languages(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for column in &self.survey_columns {
            if let Some(language) = column.strip_prefix("label::")
                && !language.is_empty()
                && !seen.iter().any(|known| known == language)
            {
                seen.push(language.to_string());
            }
        }
        seen
    }

    fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

fn sheet_rows<RS>(
    workbook: &mut Xlsx<RS>,
    sheet: &str,
) -> CliResult<(Vec<String>, Vec<RowRecord>)>
where
    RS: Read + Seek,
{
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|err| format!("sheet '{}' is unreadable: {}", sheet, err))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok((Vec::new(), Vec::new()));
    };
    let columns: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let record = RowRecord::from_pairs(
            columns
                .iter()
                .zip(row.iter())
                .filter(|(column, _)| !column.is_empty())
                .map(|(column, cell)| (column.clone(), cell.to_string())),
        );
        if !record.is_blank() {
            records.push(record);
        }
    }
    Ok((columns, records))
}

/// The settings sheet is one header row plus one value row.
fn settings_map(rows: Vec<RowRecord>) -> BTreeMap<String, String> {
    let mut settings = BTreeMap::new();
    if let Some(first) = rows.first() {
        for (column, value) in first.columns() {
            settings.insert(column.to_string(), value.to_string());
        }
    }
    settings
}
