use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourceLocale"], "en");
    assert_eq!(parsed["locales"], serde_json::json!(["en"]));
    assert!(
        parsed["catalogues"][0].get("output").is_some(),
        "Config should have a catalogue output"
    );
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Created .sayablerc.json"));

    let content = test.read_file(".sayablerc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_config("{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".sayablerc.json already exists"));
    assert_eq!(test.read_file(".sayablerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file("src/app.tsx", "export const App = () => <Say>Welcome</Say>;")?;

    let output = test.extract_command().output()?;
    assert!(
        output.status.success(),
        "Extract should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let catalogue = test.read_file("src/locales/en/messages.po")?;
    assert!(catalogue.contains("msgid \"Welcome\""));

    Ok(())
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    assert!(output.status.success());
    let out = stdout(&output);
    for command in ["extract", "compile", "init"] {
        assert!(out.contains(command), "missing {command} in help");
    }

    Ok(())
}
