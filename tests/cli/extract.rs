use anyhow::Result;
use serde_json::{Value, json};

use crate::{CliTest, JSON_CONFIG, stderr, stdout};

fn only_id(catalogue: &Value) -> String {
    let object = catalogue.as_object().expect("catalogue should be an object");
    assert_eq!(object.len(), 1, "expected a single entry: {catalogue}");
    object.keys().next().cloned().unwrap_or_default()
}

#[test]
fn test_extract_writes_every_locale() -> Result<()> {
    let test = CliTest::with_config(JSON_CONFIG)?;
    test.write_file(
        "src/app.tsx",
        r#"
  // TRANSLATORS: Greeting on the home page
  export const greet = (name) => say`Hello ${name}!`;
  "#,
    )?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("1 message(s) from 1 file(s)"));

    let en = test.read_json("locales/en.json")?;
    let id = only_id(&en);
    assert_eq!(en[&id]["message"], "Hello {name}!");
    assert_eq!(en[&id]["translation"], "Hello {name}!");
    assert_eq!(en[&id]["comments"], json!(["Greeting on the home page"]));

    let fr = test.read_json("locales/fr.json")?;
    assert_eq!(only_id(&fr), id);
    assert_eq!(fr[&id]["message"], "Hello {name}!");
    assert!(fr[&id].get("translation").is_none());

    Ok(())
}

#[test]
fn test_extract_is_idempotent() -> Result<()> {
    let test = CliTest::with_config(JSON_CONFIG)?;
    test.write_file("src/app.ts", "say`Welcome`;")?;

    test.extract_command().output()?;
    let first = test.read_file("locales/fr.json")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());
    assert!(!stdout(&output).contains("wrote"));
    assert_eq!(test.read_file("locales/fr.json")?, first);

    Ok(())
}

#[test]
fn test_extract_keeps_translations_and_stale_entries() -> Result<()> {
    let test = CliTest::with_config(JSON_CONFIG)?;
    test.write_file("src/app.ts", "say`Goodbye`;")?;
    test.extract_command().output()?;

    let mut fr = test.read_json("locales/fr.json")?;
    let old_id = only_id(&fr);
    fr[&old_id]["translation"] = json!("Au revoir");
    test.write_file("locales/fr.json", &serde_json::to_string_pretty(&fr)?)?;

    test.write_file("src/app.ts", "say`Good night`;")?;
    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let fr = test.read_json("locales/fr.json")?;
    let ids: Vec<_> = fr.as_object().unwrap().keys().cloned().collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[1], old_id, "stale entries come last");
    assert_eq!(fr[&ids[0]]["message"], "Good night");
    assert_eq!(fr[&old_id]["translation"], "Au revoir");

    let output = test.extract_command().arg("--prune").output()?;
    assert!(output.status.success());
    let fr = test.read_json("locales/fr.json")?;
    assert_eq!(only_id(&fr), ids[0]);

    Ok(())
}

#[test]
fn test_extract_default_po_catalogue() -> Result<()> {
    let test = CliTest::with_config(r#"{ "sourceLocale": "en", "locales": ["en", "de"] }"#)?;
    test.write_file(
        "src/menu.tsx",
        r#"export const open = say({ context: "menu" })`Open`;"#,
    )?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let de = test.read_file("src/locales/de/messages.po")?;
    assert!(de.contains("msgctxt \"menu\""));
    assert!(de.contains("msgid \"Open\""));
    assert!(de.contains("#: src/menu.tsx:1"));

    let en = test.read_file("src/locales/en/messages.po")?;
    assert!(en.contains("msgstr \"Open\""));

    Ok(())
}

#[test]
fn test_extract_reports_malformed_message() -> Result<()> {
    let test = CliTest::with_config(JSON_CONFIG)?;
    test.write_file(
        "src/cart.ts",
        r#"say.plural(count, { one: "item" });
say`Checkout`;"#,
    )?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("malformed-message"));
    assert!(out.contains("--> src/cart.ts:1:"));
    assert!(out.contains("1 problems (1 error, 0 warnings)"));

    // Well-formed messages of the file are still extracted.
    let en = test.read_json("locales/en.json")?;
    let id = only_id(&en);
    assert_eq!(en[&id]["message"], "Checkout");

    Ok(())
}

#[test]
fn test_extract_skips_unparsable_files() -> Result<()> {
    let test = CliTest::with_config(JSON_CONFIG)?;
    test.write_file("src/broken.ts", "const = ;")?;
    test.write_file("src/ok.ts", "say`Fine`;")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());
    assert!(stderr(&output).contains("1 file(s) could not be parsed"));
    assert!(!stdout(&output).contains("src/broken.ts"));

    let output = test.extract_command().arg("-v").output()?;
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("parse-error"));
    assert!(out.contains("--> src/broken.ts"));

    Ok(())
}

#[test]
fn test_extract_respects_excludes() -> Result<()> {
    let test = CliTest::with_config(
        r#"{
  "sourceLocale": "en",
  "locales": ["en"],
  "catalogues": [
    {
      "include": ["src/**/*.ts"],
      "exclude": ["**/generated/**"],
      "output": "locales/{locale}.{extension}",
      "format": "json"
    }
  ]
}"#,
    )?;
    test.write_file("src/app.ts", "say`Kept`;")?;
    test.write_file("src/generated/strings.ts", "say`Skipped`;")?;

    test.extract_command().output()?;
    let en = test.read_json("locales/en.json")?;
    let id = only_id(&en);
    assert_eq!(en[&id]["message"], "Kept");

    Ok(())
}

#[test]
fn test_extract_quiet() -> Result<()> {
    let test = CliTest::with_config(JSON_CONFIG)?;
    test.write_file("src/app.ts", "say`Hi`;")?;

    let output = test.extract_command().arg("-q").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(test.root().join("locales/fr.json").exists());

    Ok(())
}

#[test]
fn test_extract_rejects_invalid_config() -> Result<()> {
    let test = CliTest::with_config(r#"{ "sourceLocale": "en", "locales": ["fr", "en"] }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error:"));

    Ok(())
}

#[test]
fn test_extract_aborts_on_corrupt_catalogue() -> Result<()> {
    let test = CliTest::with_config(JSON_CONFIG)?;
    test.write_file("src/app.ts", "say`Hi`;")?;
    test.write_file("locales/fr.json", "{ not json")?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("locales/fr.json"));
    assert!(!test.root().join("locales/en.json").exists());

    Ok(())
}
