use anyhow::Result;
use insta::assert_snapshot;

use crate::{CliTest, GREETINGS_BUNDLE, run};

#[test]
fn test_generate_two_locales() -> Result<()> {
    let test = CliTest::with_file("bundles/greetings.bundle.json", GREETINGS_BUNDLE)?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(
        out.stdout
            .contains("Generated 2 catalog(s) and 1 implementation(s) for 1 bundle(s)")
    );
    assert_snapshot!(
        test.read_file("generated/resources/i18n/Greetings_en-US.catalog")?,
        @r"
    # Generated by msgbundle from crate::messages::Greetings. Do not edit.
    m1=worked {0} !
    "
    );
    assert_snapshot!(
        test.read_file("generated/resources/i18n/Greetings_pt-BR.catalog")?,
        @r"
    # Generated by msgbundle from crate::messages::Greetings. Do not edit.
    m1=funcionou {0} !
    "
    );

    let implementation = test.read_file("generated/src/messages/greetings_impl.rs")?;
    assert!(implementation.starts_with("// @generated by msgbundle from crate::messages::Greetings."));
    assert!(implementation.contains("GreetingsImpl"));

    Ok(())
}

#[test]
fn test_generate_placeholder_mismatch() -> Result<()> {
    let bundle = GREETINGS_BUNDLE.replace("worked {0} ! ", "worked!");
    let test = CliTest::with_file("greetings.bundle.json", &bundle)?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains(
        "error: methods annotated with Message must have as many parameters as placeholders in the message"
    ));
    assert!(out.stdout.contains("(crate::messages::Greetings::m1)"));
    assert!(out.stdout.contains("✘ 1 error(s)"));
    assert!(!test.exists("generated"));

    Ok(())
}

#[test]
fn test_generate_rejects_struct() -> Result<()> {
    let bundle = GREETINGS_BUNDLE.replace(r#""kind": "trait""#, r#""kind": "struct""#);
    let test = CliTest::with_file("greetings.bundle.json", &bundle)?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains(
        "error: the annotation 'MessageBundle' can be used only on traits, but 'crate::messages::Greetings' is a struct"
    ));
    assert!(!test.exists("generated"));

    Ok(())
}

#[test]
fn test_generate_rejects_integer_return() -> Result<()> {
    let bundle = GREETINGS_BUNDLE.replace(r#""returns": { "name": "String" }"#, r#""returns": { "name": "i32" }"#);
    let test = CliTest::with_file("greetings.bundle.json", &bundle)?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("must return a textual type or an error type, found 'i32'"));
    assert!(!test.exists("generated"));

    Ok(())
}

#[test]
fn test_generate_with_overrides() -> Result<()> {
    let test = CliTest::with_file("greetings.bundle.json", GREETINGS_BUNDLE)?;

    let mut cmd = test.generate_command();
    cmd.args([
        "greetings.bundle.json",
        "--resource-dir",
        "res",
        "--source-dir",
        "src/gen",
        "-O",
        "catalogBasePath=META-INF/i18n",
        "-O",
        "catalogBaseName=greet",
    ]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(test.exists("res/META-INF/i18n/greet_en-US.catalog"));
    assert!(test.exists("res/META-INF/i18n/greet_pt-BR.catalog"));
    assert!(test.exists("src/gen/messages/greetings_impl.rs"));

    Ok(())
}

#[test]
fn test_generate_uses_config_file() -> Result<()> {
    let test = CliTest::with_file("bundles/greetings.bundle.json", GREETINGS_BUNDLE)?;
    test.write_file(
        ".msgbundlerc.json",
        r#"{ "includes": ["bundles"], "resourceDir": "out", "options": { "catalogBasePath": "l10n" } }"#,
    )?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(test.exists("out/l10n/Greetings_en-US.catalog"));

    Ok(())
}

#[test]
fn test_generate_unknown_option_warns() -> Result<()> {
    let test = CliTest::with_file("greetings.bundle.json", GREETINGS_BUNDLE)?;

    let mut cmd = test.generate_command();
    cmd.args(["-O", "color=blue"]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains(
        "warning: option(s) not recognized by the processor: color (supported: catalogBaseName, catalogBasePath)"
    ));

    Ok(())
}

#[test]
fn test_generate_verbose_prints_notes() -> Result<()> {
    let test = CliTest::with_file("greetings.bundle.json", GREETINGS_BUNDLE)?;

    let mut cmd = test.generate_command();
    cmd.arg("-v");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("note: processing crate::messages::Greetings"));
    assert!(out.stdout.contains("note: catalog for locale 'en-US' written to"));

    Ok(())
}

#[test]
fn test_generate_malformed_bundle_is_internal_error() -> Result<()> {
    let test = CliTest::with_file("broken.bundle.json", "{ not json")?;

    let out = run(test.generate_command())?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Failed to parse bundle file"));

    Ok(())
}

#[test]
fn test_generate_missing_path() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.generate_command();
    cmd.arg("nowhere.bundle.json");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Path not found: nowhere.bundle.json"));

    Ok(())
}
