use anyhow::Result;

use crate::{CliTest, GREETINGS_BUNDLE, run};

#[test]
fn test_check_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("greetings.bundle.json", GREETINGS_BUNDLE)?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(out.stdout.contains(
        "✓ Checked 1 bundle(s): 2 catalog(s) and 1 implementation(s) would be generated"
    ));
    assert!(!test.exists("generated"));

    Ok(())
}

#[test]
fn test_check_reports_duplicate_keys() -> Result<()> {
    let test = CliTest::with_file(
        "errors.bundle.json",
        r#"{
  "types": [
    {
      "package": "crate",
      "name": "Errors",
      "kind": "trait",
      "annotations": [{ "name": "MessageBundle" }],
      "methods": [
        {
          "name": "not_found",
          "returns": { "name": "String" },
          "annotations": [{ "name": "Message", "values": { "key": "missing", "value": "not found" } }]
        },
        {
          "name": "gone",
          "returns": { "name": "String" },
          "annotations": [{ "name": "Message", "values": { "key": "missing", "value": "gone" } }]
        }
      ]
    }
  ]
}"#,
    )?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains(
        "error: key 'missing' is defined more than once for locale 'en-US' (methods 'not_found' and 'gone')"
    ));

    Ok(())
}

#[test]
fn test_check_single_type_skips_the_rest() -> Result<()> {
    let test = CliTest::with_file("greetings.bundle.json", GREETINGS_BUNDLE)?;
    test.write_file(
        "zz/farewells.bundle.json",
        r#"{
  "types": [
    {
      "package": "crate",
      "name": "Farewells",
      "kind": "trait",
      "annotations": [{ "name": "MessageBundle" }],
      "methods": [
        {
          "name": "bye",
          "returns": { "name": "String" },
          "annotations": [{ "name": "Message", "values": { "value": "bye" } }]
        }
      ]
    }
  ]
}"#,
    )?;

    let mut cmd = test.check_command();
    cmd.arg("--single-type");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("warning: 'crate::Farewells' was skipped"));

    Ok(())
}

#[test]
fn test_check_without_bundles() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("✓ No message bundles found in 0 file(s)"));

    Ok(())
}

#[test]
fn test_schema_describes_bundle_files() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("schema");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    let schema: serde_json::Value = serde_json::from_str(&out.stdout)?;
    assert_eq!(schema["title"], "BundleFile");

    Ok(())
}
