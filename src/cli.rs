use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Platform extracted for when none is given on the command line.
pub const DEFAULT_PLATFORM: &str = "react";

/// Fenced code block languages stripped from every platform's output by default.
pub const DEFAULT_STRIP_LANGS: &[&str] = &["dart"];

pub struct Config {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub platform: String,
    pub strip_langs: Vec<String>,
    pub verbosity: u8,
}

impl Config {
    /// Builds a config with default platform settings for the given roots.
    pub fn new(source_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            platform: DEFAULT_PLATFORM.to_string(),
            strip_langs: DEFAULT_STRIP_LANGS.iter().map(|s| s.to_string()).collect(),
            verbosity: 0,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}

fn build_command() -> Command {
    Command::new("docs2md")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extracts platform-specific Markdown from an MDX documentation tree")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("Root directory of the MDX documentation tree")
                .required(true)
                .value_parser(existing_dir),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .help("Directory the platform's Markdown tree is written to")
                .required(true),
        )
        .arg(
            Arg::new("platform")
                .value_name("PLATFORM")
                .help("Target platform identifier")
                .default_value(DEFAULT_PLATFORM),
        )
        .arg(
            Arg::new("strip-lang")
                .long("strip-lang")
                .value_name("LANG")
                .help("Fenced code block language to strip from output (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v, -vv, -vvv)")
                .action(ArgAction::Count),
        )
}

fn existing_dir(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("source directory does not exist: {value}"))
    }
}

pub fn parse_args() -> Result<Config> {
    let matches = build_command().get_matches();

    let source_root = matches
        .get_one::<PathBuf>("source")
        .cloned()
        .unwrap_or_default();

    let output_root = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_default();

    let platform = matches
        .get_one::<String>("platform")
        .cloned()
        .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());

    let strip_langs: Vec<String> = matches
        .get_many::<String>("strip-lang")
        .map(|vals| vals.cloned().collect())
        .unwrap_or_else(|| DEFAULT_STRIP_LANGS.iter().map(|s| s.to_string()).collect());

    Ok(Config {
        source_root,
        output_root,
        platform,
        strip_langs,
        verbosity: matches.get_count("verbose"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn platform_defaults_to_react() {
        let dir = tempfile::tempdir().unwrap();
        let matches = build_command()
            .try_get_matches_from(["docs2md", dir.path().to_str().unwrap(), "out"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("platform").unwrap(), "react");
    }

    #[test]
    fn missing_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_command().try_get_matches_from(["docs2md", dir.path().to_str().unwrap()]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_source_dir_is_rejected() {
        let result =
            build_command().try_get_matches_from(["docs2md", "/definitely/not/here", "out"]);
        assert!(result.is_err());
    }

    #[test]
    fn strip_lang_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let matches = build_command()
            .try_get_matches_from([
                "docs2md",
                dir.path().to_str().unwrap(),
                "out",
                "vue",
                "--strip-lang",
                "dart",
                "--strip-lang",
                "swift",
            ])
            .unwrap();
        let langs: Vec<_> = matches.get_many::<String>("strip-lang").unwrap().collect();
        assert_eq!(langs, ["dart", "swift"]);
    }
}
