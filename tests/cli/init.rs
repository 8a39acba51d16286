use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, GREETINGS_BUNDLE, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["includes", "resourceDir", "sourceDir", "defaultLocale", "annotations"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{field}' field"
        );
    }
    assert_eq!(parsed["defaultLocale"], "en-US");

    // 2-space indentation
    assert!(content.contains("\n  \""));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout.trim(), "✓ Created .msgbundlerc.json");

    let content = test.read_file(".msgbundlerc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".msgbundlerc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(1));
    assert_eq!(out.stdout.trim(), "error: .msgbundlerc.json already exists");
    assert_eq!(test.read_file(".msgbundlerc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::with_file("greetings.bundle.json", GREETINGS_BUNDLE)?;

    test.command().arg("init").output()?;

    let out = run(test.generate_command())?;
    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(test.exists("generated/resources/i18n/Greetings_en-US.catalog"));

    Ok(())
}
