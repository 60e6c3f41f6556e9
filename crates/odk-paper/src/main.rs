mod workbook;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::{error, info};

use odk_form::{ChoiceCatalog, OutputFormat, Preset, Questionnaire, render_document};
use workbook::{CliResult, FormWorkbook};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Converts XLSForm workbooks into paper-ready questionnaire documents",
    long_about = "Reads the survey, choices, and settings sheets of each workbook, rebuilds the \
                  questionnaire tree, and writes one rendered document per input file and language."
)]
struct Cli {
    /// XLSForm workbooks to convert.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
    /// Directory receiving the rendered documents.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out: PathBuf,
    /// Artifact flavor to emit.
    #[arg(short, long, value_enum, default_value_t = FormatArg::Doc)]
    format: FormatArg,
    /// Rendering preset.
    #[arg(short, long, value_enum, default_value_t = PresetArg::Full)]
    preset: PresetArg,
    /// Target language; repeatable. Defaults to the workbook's own languages.
    #[arg(short, long = "language", value_name = "LANGUAGE")]
    languages: Vec<String>,
    /// Optional project tag folded into output file names.
    #[arg(short, long, value_name = "TAG")]
    tag: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Doc,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Doc => OutputFormat::Doc,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PresetArg {
    Full,
    Minimal,
}

impl From<PresetArg> for Preset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Full => Preset::Full,
            PresetArg::Minimal => Preset::Minimal,
        }
    }
}

fn main() -> CliResult<()> {
    env_logger::init();
    let cli = Cli::parse();
    fs::create_dir_all(&cli.out)?;

    let mut failures = 0usize;
    for file in &cli.files {
        match convert_file(file, &cli) {
            Ok(outputs) => {
                for output in outputs {
                    info!("wrote {}", output.display());
                }
            }
            Err(err) => {
                failures += 1;
                error!("{}: {}", file.display(), err);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} file(s) failed to convert", failures, cli.files.len()).into());
    }
    Ok(())
}

/// Convert one workbook into one document per target language. A failure
/// here aborts this file only; the batch loop moves on.
fn convert_file(path: &Path, cli: &Cli) -> CliResult<Vec<PathBuf>> {
    let workbook = FormWorkbook::load(path)?;
    let catalog = ChoiceCatalog::from_rows(&workbook.choices);
    let questionnaire = Questionnaire::build(&workbook.survey, &catalog)?;

    let base = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or("input file has no usable name")?;
    let title = workbook.form_title().unwrap_or(base).to_string();
    let preset = Preset::from(cli.preset);
    let format = OutputFormat::from(cli.format);

    let mut outputs = Vec::new();
    for language in target_languages(&cli.languages, &workbook) {
        let document = render_document(&questionnaire, &title, &language, preset)?;
        let target = cli
            .out
            .join(output_name(base, cli.tag.as_deref(), &language, preset, format));
        fs::write(&target, document)?;
        outputs.push(target);
    }
    Ok(outputs)
}

/// Requested languages win; otherwise the workbook's declared default,
/// then every language its label columns announce, then a single pass
/// over the unsuffixed columns.
fn target_languages(requested: &[String], workbook: &FormWorkbook) -> Vec<String> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    if let Some(default) = workbook.default_language() {
        return vec![default.to_string()];
    }
    let discovered = workbook.languages();
    if discovered.is_empty() {
        vec![String::new()]
    } else {
        discovered
    }
}

fn output_name(
    base: &str,
    tag: Option<&str>,
    language: &str,
    preset: Preset,
    format: OutputFormat,
) -> String {
    let mut name = String::from(base);
    for segment in [tag.unwrap_or(""), language, &preset.to_string()] {
        if !segment.is_empty() {
            name.push('-');
            name.push_str(segment);
        }
    }
    format!("{}.{}", name, format.extension())
}
