use std::{fs, path::PathBuf};

use autofill::{
    config::{AutofillConfig, AutofillConfigBuilder},
    filler::FormFiller,
    resolver::ApplicantFields,
};

macro_rules! aw {
    ($e:expr) => {
        tokio_test::block_on($e)
    };
}

/*
These tests drive a real Chrome against local fixture pages:
RUST_LOG=debug cargo test --test fill -- --ignored
*/

const GREENHOUSE_STYLE_FORM: &str = r#"<html><body>
<form>
  <input name="first_name" type="text" />
  <input name="last_name" type="text" />
  <input name="email" type="email" />
  <input name="phone" type="tel" />
  <input name="resume" type="file" />
</form>
</body></html>"#;

fn test_config(dir: &tempfile::TempDir) -> AutofillConfig {
    AutofillConfigBuilder::default_builder()
        .user_data_dir(Some(dir.path().join("profile")))
        .artifact_dir(dir.path().join("screenshots"))
        .event_log(dir.path().join("logs").join("app.log"))
        .min_settle_secs(0u64)
        .max_settle_secs(1u64)
        .build()
        .unwrap()
}

fn write_fixture(dir: &tempfile::TempDir, html: &str) -> String {
    let page = dir.path().join("form.html");
    fs::write(&page, html).unwrap();
    format!("file://{}", page.display())
}

#[test]
#[ignore = "requires a local Chrome"]
fn fills_a_greenhouse_style_form_end_to_end() -> anyhow::Result<()> {
    env_logger::init();
    let dir = tempfile::tempdir()?;
    let resume = dir.path().join("resume.pdf");
    fs::write(&resume, b"%PDF-1.4 test resume")?;

    let url = write_fixture(&dir, GREENHOUSE_STYLE_FORM);
    let filler = FormFiller::new(test_config(&dir));

    let fields = ApplicantFields {
        first_name: Some("Jane".into()),
        email: Some("jane@x.com".into()),
        resume: Some(resume.clone()),
        ..Default::default()
    };
    let result = aw!(filler.fill_and_report(&url, fields.clone()));
    println!("{result:#?}");

    assert!(result.success);
    assert_eq!(result.filled_fields, vec!["first_name", "email", "resume"]);
    assert!(result.errors.is_empty());
    let screenshot = PathBuf::from(result.screenshot_path.unwrap());
    assert!(screenshot.exists());

    // the session must not linger on the profile: a second fill against the
    // same user-data directory has to be able to acquire it immediately
    let again = aw!(filler.fill_and_report(&url, fields));
    assert!(again.success);

    Ok(())
}

#[test]
#[ignore = "requires a local Chrome"]
fn missing_resume_is_a_partial_failure() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let url = write_fixture(&dir, GREENHOUSE_STYLE_FORM);
    let filler = FormFiller::new(test_config(&dir));

    let result = aw!(filler.fill_and_report(
        &url,
        ApplicantFields {
            first_name: Some("Jane".into()),
            email: Some("jane@x.com".into()),
            resume: Some(dir.path().join("no-such-resume.pdf")),
            ..Default::default()
        },
    ));
    println!("{result:#?}");

    assert!(!result.success);
    assert_eq!(result.filled_fields, vec!["first_name", "email"]);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("resume"));
    // partial failures still get a verification screenshot
    assert!(result.screenshot_path.is_some());

    Ok(())
}

#[test]
#[ignore = "requires a local Chrome"]
fn absent_field_is_reported_and_siblings_continue() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    // no phone input on this page
    let url = write_fixture(
        &dir,
        r#"<html><body><form><input name="email" type="email" /></form></body></html>"#,
    );
    let filler = FormFiller::new(test_config(&dir));

    let result = aw!(filler.fill_and_report(
        &url,
        ApplicantFields {
            email: Some("jane@x.com".into()),
            phone: Some("555-0100".into()),
            ..Default::default()
        },
    ));
    println!("{result:#?}");

    assert!(!result.success);
    assert_eq!(result.filled_fields, vec!["email"]);
    assert_eq!(result.errors, vec!["could not find field: phone"]);

    Ok(())
}

#[test]
#[ignore = "requires a local Chrome"]
fn navigation_failure_is_a_single_terminal_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = test_config(&dir);
    config.navigation_timeout_ms = 3_000;
    let filler = FormFiller::new(config);

    let result = aw!(filler.fill_and_report(
        "http://127.0.0.1:1/never-settles",
        ApplicantFields {
            email: Some("jane@x.com".into()),
            ..Default::default()
        },
    ));
    println!("{result:#?}");

    assert!(!result.success);
    assert!(result.filled_fields.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.screenshot_path.is_none());

    Ok(())
}

#[test]
#[ignore = "requires a local Chrome"]
fn fill_events_land_in_the_jsonl_log() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = test_config(&dir);
    let event_log = config.event_log.clone();
    let url = write_fixture(&dir, GREENHOUSE_STYLE_FORM);

    let filler = FormFiller::new(config);
    aw!(filler.fill_and_report(
        &url,
        ApplicantFields {
            email: Some("jane@x.com".into()),
            ..Default::default()
        },
    ));

    let contents = fs::read_to_string(event_log)?;
    let types = contents
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["type"]
            .as_str()
            .unwrap()
            .to_string())
        .collect::<Vec<_>>();
    assert!(types.contains(&"ats_vendor_detected".to_string()));
    assert!(types.iter().any(|t| t == "ats_form_filled" || t == "ats_form_error"));

    Ok(())
}
