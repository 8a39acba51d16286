//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `generate`: Process bundle files and write catalogs and implementations
//! - `check`: Run the same pipeline without writing anything
//! - `init`: Initialize the msgbundle configuration file
//! - `schema`: Print the JSON Schema of bundle files

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Generate(cmd)) => cmd.args.verbose,
            Some(Command::Check(cmd)) => cmd.args.verbose,
            Some(Command::Init) | Some(Command::Schema) | None => false,
        }
    }
}

/// Arguments shared by `generate` and `check`.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Bundle files or directories to process (default: `includes` from the config file)
    pub paths: Vec<PathBuf>,

    /// Processor option, can be repeated: -O catalogBasePath=i18n
    #[arg(short = 'O', long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Directory catalogs are written to (overrides config file)
    #[arg(long)]
    pub resource_dir: Option<PathBuf>,

    /// Directory generated sources are written to (overrides config file)
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Locale of messages that do not name one (overrides config file)
    #[arg(long)]
    pub default_locale: Option<String>,

    /// Process only the first bundle of the round
    #[arg(long)]
    pub single_type: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_option(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate message catalogs and bundle implementations
    Generate(GenerateCommand),
    /// Validate message bundles without writing any file
    Check(CheckCommand),
    /// Initialize a new .msgbundlerc.json configuration file
    Init,
    /// Print the JSON Schema of bundle definition files
    Schema,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("catalogBasePath=META-INF/i18n"),
            Ok(("catalogBasePath".to_string(), "META-INF/i18n".to_string()))
        );
        assert_eq!(
            parse_option("empty="),
            Ok(("empty".to_string(), String::new()))
        );
        assert!(parse_option("novalue").is_err());
        assert!(parse_option("=x").is_err());
    }

    #[test]
    fn test_generate_arguments() {
        let args = Arguments::parse_from([
            "msgbundle",
            "generate",
            "bundles",
            "-O",
            "catalogBaseName=app",
            "--single-type",
            "-v",
        ]);

        assert!(args.verbose());
        let Some(Command::Generate(cmd)) = args.command else {
            panic!("expected generate");
        };
        assert_eq!(cmd.args.paths, vec![PathBuf::from("bundles")]);
        assert_eq!(
            cmd.args.options,
            vec![("catalogBaseName".to_string(), "app".to_string())]
        );
        assert!(cmd.args.single_type);
    }

    #[test]
    fn test_cli_definition() {
        Arguments::command().debug_assert();
    }
}
