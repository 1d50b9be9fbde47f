//! Command line configuration for the normalizer tools.

use crate::NormalForm;
use clap::{ArgAction, Parser};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory scanned when the schema argument is `all`.
pub const EXAMPLE_DIR: &str = "example";

/// Command line arguments for the normalizer tools
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path of the JSON schema document, or "all" to process every example document
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// Normal form to decompose towards
    #[arg(short = 't', long, value_enum, default_value = "bcnf", value_name = "NF")]
    pub target: NormalForm,

    /// Specify directory for generated DDL files (only used by emitter).
    /// If <DIR> is `-` then stdout is used.
    #[arg(short = 'D', long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Keep the plain cover even when the target asks for a transitively reduced one
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_canonical: bool,
}

impl Config {
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn should_process_all(&self) -> bool {
        self.schema == "all" || self.schema == "--all"
    }

    /// File stem of the schema document, used to name generated output.
    pub fn schema_name(&self) -> String {
        Path::new(&self.schema)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown_schema".into())
    }

    pub fn target(&self) -> NormalForm {
        self.target
    }

    /// Whether the canonical (transitively reduced) cover is used.
    pub fn canonical(&self) -> bool {
        !self.no_canonical && self.target.needs_canonical_cover()
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.output_dir.as_deref()
    }

    pub fn output_to_stdout(&self) -> bool {
        self.output_dir.as_deref() == Some("-")
    }
}

/// All `.json` documents in `dir`, sorted alphabetically.
pub fn get_example_files(dir: &str) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no .json files found in {}", dir),
        ));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["normalizer", "schemas/shop.json"]);
        assert_eq!(config.target(), NormalForm::BoyceCodd);
        assert_eq!(config.schema_name(), "shop");
        assert!(config.canonical());
        assert!(!config.should_process_all());
        assert!(!config.output_to_stdout());
    }

    #[test]
    fn explicit_flags() {
        let config = Config::parse_from(["normalizer", "all", "-t", "2nf", "-D", "-"]);
        assert!(config.should_process_all());
        assert_eq!(config.target(), NormalForm::Second);
        assert!(!config.canonical());
        assert!(config.output_to_stdout());

        let plain = Config::parse_from(["normalizer", "x.json", "--no-canonical"]);
        assert!(!plain.canonical());
    }
}
