use anyhow::Result;

use crate::{CliTest, stderr, stdout};

#[test]
fn test_transform_prints_rewritten_source() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "src/app.tsx",
        "// TRANSLATORS: Greeting\nexport const greet = (name) => say`Hello ${name}!`;\nconst label = <Say>Hi</Say>;\n",
    )?;

    let output = test.transform_command("src/app.tsx").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let code = stdout(&output);
    assert!(code.contains("// TRANSLATORS: Greeting"));
    assert!(code.contains("say.call({"));
    assert!(code.contains("name: name"));
    assert!(code.contains("<Say id=\""));
    assert!(!code.contains("Hello"));
    Ok(())
}

#[test]
fn test_transform_writes_output_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/app.ts", "export const title = say`Welcome`;\n")?;

    let output = test
        .transform_command("src/app.ts")
        .args(["--output", "out.js"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(test.read_file("out.js")?.contains("say.call({"));
    Ok(())
}

#[test]
fn test_transform_reports_malformed_messages() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/app.ts", "say.plural(count, { one: say`One` });\n")?;

    let output = test.transform_command("src/app.ts").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("problems"));
    Ok(())
}

#[test]
fn test_transform_missing_file_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.transform_command("src/missing.ts").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read"));
    Ok(())
}
