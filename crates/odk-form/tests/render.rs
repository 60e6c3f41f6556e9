use odk_form::{
    ChoiceCatalog, Element, MEDIA_KINDS, OutputFormat, Preset, Prompt, Questionnaire, RowRecord,
    format_header, render_document,
};
use serde_json::Value;

fn survey_rows() -> Vec<RowRecord> {
    serde_json::from_str(include_str!("fixtures/female_survey.json")).expect("survey fixture")
}

fn catalog() -> ChoiceCatalog {
    let rows: Vec<RowRecord> =
        serde_json::from_str(include_str!("fixtures/yesno_choices.json")).expect("choices fixture");
    ChoiceCatalog::from_rows(&rows)
}

fn questionnaire() -> Questionnaire {
    Questionnaire::build(&survey_rows(), &catalog()).expect("build")
}

fn row(pairs: &[(&str, &str)]) -> RowRecord {
    RowRecord::from_pairs(pairs.iter().copied())
}

fn assert_media_invariants(record: &Value) {
    let object = record.as_object().expect("record object");
    for kind in MEDIA_KINDS {
        for (key, value) in object {
            let Some(text) = value.as_str() else { continue };
            if text.is_empty() || !(key == kind || key.starts_with(&format!("media::{kind}"))) {
                continue;
            }
            assert!(
                text.starts_with('[') && text.ends_with(']'),
                "'{key}' is not wrapped: {text}"
            );
            let bare = object
                .get(kind)
                .and_then(Value::as_str)
                .expect("bare media key");
            assert_eq!(bare, text, "'{key}' disagrees with '{kind}'");
            assert!(object.get("media").is_some(), "media aggregate missing");
        }
    }
}

#[test]
fn prompt_records_resolve_translated_fields_per_language() {
    let questionnaire = questionnaire();
    let Element::Prompt(prompt) = &questionnaire.elements()[0] else {
        panic!("expected a prompt at position 0");
    };

    let english = prompt.to_record("English");
    assert_eq!(
        english["label"],
        "How many times have you given birth?",
    );
    let french = prompt.to_record("Français");
    assert_eq!(french["label"], "Combien de fois avez-vous accouché ?");
}

#[test]
fn prompt_records_keep_expressions_verbatim() {
    let fields = row(&[
        ("type", "integer"),
        ("name", "age"),
        ("label::English", "Age"),
        ("relevant", "${consent} = '1'"),
        ("constraint", ". >= 0 and . <= 120"),
    ]);
    let prompt = Prompt::new(fields, &ChoiceCatalog::default()).expect("prompt");

    let record = prompt.to_record("English");
    assert_eq!(record["relevant"], "${consent} = '1'");
    assert_eq!(record["constraint"], ". >= 0 and . <= 120");
}

#[test]
fn selection_prompt_records_carry_rendered_choices() {
    let questionnaire = questionnaire();
    let Element::Prompt(prompt) = &questionnaire.elements()[2] else {
        panic!("expected a prompt at position 2");
    };

    let record = prompt.to_record("English");
    let choices = record["choices"].as_array().expect("choices array");
    assert_eq!(choices.len(), 2);
    assert_eq!(choices[0]["value"], "1");
    assert_eq!(choices[0]["label"], "Yes");
    assert_eq!(choices[1]["label"], "No");

    let french = prompt.to_record("Français");
    let choices = french["choices"].as_array().expect("choices array");
    assert_eq!(choices[0]["label"], "Oui");
}

#[test]
fn media_fields_agree_between_language_and_bare_keys() {
    let questionnaire = questionnaire();
    for element in questionnaire.iter() {
        if let Element::Prompt(prompt) = element {
            assert_media_invariants(&prompt.to_record("English"));
        }
    }
}

#[test]
fn media_bearing_prompt_exposes_the_aggregate() {
    let questionnaire = questionnaire();
    let Element::Prompt(prompt) = &questionnaire.elements()[2] else {
        panic!("expected a prompt at position 2");
    };

    let record = prompt.to_record("English");
    assert_eq!(record["image"], "[birth_events.png]");
    assert_eq!(record["media::image::English"], "[birth_events.png]");
    let aggregate = record["media"].as_array().expect("media aggregate");
    assert_eq!(aggregate.len(), 1);
}

#[test]
fn group_records_nest_their_contents() {
    let questionnaire = questionnaire();
    let record = questionnaire.elements()[1].to_record("English");

    assert_eq!(record["kind"], "group");
    assert_eq!(record["label"], "First birth");
    assert_eq!(record["relevant"], "${ever_birth} > 0");
    let contents = record["contents"].as_array().expect("contents");
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["name"], "fb_note");
}

#[test]
fn format_header_works_on_a_bare_field_map() {
    let fields = row(&[
        ("type", "begin group"),
        ("name", "date_group"),
        ("label::English", "Dates"),
        ("appearance", "field-list"),
        (
            "relevant",
            "today() > date(\"2017-03-01\") and today() < date(\"2017-11-01\")",
        ),
    ]);

    let header = format_header(&fields, "English");
    assert_eq!(header["name"], "date_group");
    assert_eq!(header["label"], "Dates");
    assert_eq!(header["appearance"], "field-list");
    assert_eq!(
        header["relevant"],
        "today() > date(\"2017-03-01\") and today() < date(\"2017-11-01\")"
    );
}

#[test]
fn rendering_twice_yields_identical_trees() {
    let questionnaire = questionnaire();
    assert_eq!(
        questionnaire.to_records("English"),
        questionnaire.to_records("English")
    );
    assert_eq!(
        questionnaire.to_records("Français"),
        questionnaire.to_records("Français")
    );
}

#[test]
fn document_contains_resolved_text_for_the_requested_language() {
    let questionnaire = questionnaire();

    let english =
        render_document(&questionnaire, "Female Questionnaire", "English", Preset::Full)
            .expect("render");
    assert!(english.contains("<html"));
    assert!(english.contains("Female Questionnaire"));
    assert!(english.contains("First birth"));
    assert!(english.contains("Yes"));
    assert!(english.contains("[birth_events.png]"));

    let french =
        render_document(&questionnaire, "Female Questionnaire", "Français", Preset::Full)
            .expect("render");
    assert!(french.contains("Première naissance"));
    assert!(french.contains("Oui"));
}

#[test]
fn minimal_preset_strips_plumbing_fields() {
    let questionnaire = questionnaire();
    let hint = "Answer for the first live birth only.";

    let full = render_document(&questionnaire, "FQ", "English", Preset::Full).expect("render");
    assert!(full.contains(hint));

    let minimal =
        render_document(&questionnaire, "FQ", "English", Preset::Minimal).expect("render");
    assert!(!minimal.contains(hint));
    assert!(minimal.contains("First birth"));
}

#[test]
fn presets_and_formats_parse_from_cli_strings() {
    assert_eq!("full".parse::<Preset>(), Ok(Preset::Full));
    assert_eq!("Minimal".parse::<Preset>(), Ok(Preset::Minimal));
    assert!("fancy".parse::<Preset>().is_err());
    assert_eq!(Preset::Minimal.to_string(), "minimal");

    assert_eq!("doc".parse::<OutputFormat>(), Ok(OutputFormat::Doc));
    assert_eq!("html".parse::<OutputFormat>(), Ok(OutputFormat::Html));
    assert!("pdf".parse::<OutputFormat>().is_err());
    assert_eq!(OutputFormat::Html.extension(), "html");
}
