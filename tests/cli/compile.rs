use anyhow::Result;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

const FALLBACK_CONFIG: &str = r#"{
  "sourceLocale": "en",
  "locales": ["en", "fr", "fr-CA"],
  "fallbackLocales": { "fr-CA": ["fr"] },
  "catalogues": [
    {
      "include": ["src/**/*.ts"],
      "output": "locales/{locale}.{extension}",
      "format": "json"
    }
  ]
}"#;

fn write_catalogues(test: &CliTest) -> Result<()> {
    test.write_file(
        "locales/en.json",
        r#"{
  "greeting": { "message": "Hello", "translation": "Hello" },
  "farewell": { "message": "Goodbye", "translation": "Goodbye" }
}"#,
    )?;
    test.write_file(
        "locales/fr.json",
        r#"{
  "greeting": { "message": "Hello", "translation": "Bonjour" },
  "farewell": { "message": "Goodbye" }
}"#,
    )?;
    test.write_file(
        "locales/fr-CA.json",
        r#"{
  "farewell": { "message": "Goodbye", "translation": "Bye" }
}"#,
    )?;
    Ok(())
}

#[test]
fn test_compile_applies_fallbacks() -> Result<()> {
    let test = CliTest::with_config(FALLBACK_CONFIG)?;
    write_catalogues(&test)?;

    let output = test.compile_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_json("locales/en.compiled.json")?,
        json!({ "farewell": "Goodbye", "greeting": "Hello" })
    );
    // Missing French farewell falls back to the source locale.
    assert_eq!(
        test.read_json("locales/fr.compiled.json")?,
        json!({ "farewell": "Goodbye", "greeting": "Bonjour" })
    );
    // Own translation first, then the configured fallback.
    assert_eq!(
        test.read_json("locales/fr-CA.compiled.json")?,
        json!({ "farewell": "Bye", "greeting": "Bonjour" })
    );

    let out = stdout(&output);
    assert!(out.contains("fr-CA: 2/2 translated -> locales/fr-CA.compiled.json"));
    assert!(out.contains("Compiled 3 locale file(s)"));

    Ok(())
}

#[test]
fn test_compile_custom_output() -> Result<()> {
    let test = CliTest::with_config(
        r#"{
  "sourceLocale": "en",
  "locales": ["en", "fr"],
  "catalogues": [
    {
      "include": ["src/**/*.ts"],
      "output": "locales/{locale}.{extension}",
      "compiledOutput": "public/i18n/{locale}.{extension}",
      "format": "json"
    }
  ]
}"#,
    )?;
    write_catalogues(&test)?;

    let output = test.compile_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_json("public/i18n/fr.json")?,
        json!({ "farewell": "Goodbye", "greeting": "Bonjour" })
    );

    Ok(())
}

#[test]
fn test_compile_without_catalogues_writes_empty_tables() -> Result<()> {
    let test = CliTest::with_config(FALLBACK_CONFIG)?;

    let output = test.compile_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(test.read_file("locales/fr.compiled.json")?, "{}\n");

    Ok(())
}

#[test]
fn test_compile_aborts_on_corrupt_catalogue() -> Result<()> {
    let test = CliTest::with_config(FALLBACK_CONFIG)?;
    write_catalogues(&test)?;
    test.write_file("locales/fr.json", "[1, 2")?;

    let output = test.compile_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("fr.json"));
    assert!(!test.root().join("locales/en.compiled.json").exists());

    Ok(())
}

#[test]
fn test_extract_then_compile() -> Result<()> {
    let test = CliTest::with_config(FALLBACK_CONFIG)?;
    test.write_file("src/app.ts", "say`Hello ${name}`;")?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let output = test.compile_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let en = test.read_json("locales/en.compiled.json")?;
    let fr_ca = test.read_json("locales/fr-CA.compiled.json")?;
    assert_eq!(en.as_object().map(|o| o.len()), Some(1));
    assert_eq!(fr_ca, en);

    Ok(())
}
