pub mod compile;
pub mod init;
pub mod lint;
pub mod vars;

pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};
pub use lint::{lint, LintArgs};
pub use vars::{vars, VarsArgs};

use anyhow::{anyhow, Context, Result};
use mailbuilder_blocks::EmailData;
use mailbuilder_common::{load_email_data, RealFileSystem};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A single template file, or every `*.json` under a directory
pub(crate) fn find_templates(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    files.sort();

    Ok(files)
}

pub(crate) fn read_template(path: &Path) -> Result<EmailData> {
    load_email_data(&RealFileSystem, path)
        .with_context(|| format!("Failed to load template {}", path.display()))
}

/// Parse `key=value` pairs given on the command line
pub(crate) fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", raw))?;
    let key = key.trim();
    if !mailbuilder_blocks::Variable::is_valid_key(key) {
        return Err(format!("invalid variable key `{}`", key));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_templates_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("promo")).unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("promo/a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = find_templates(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("b.json"), dir.path().join("promo/a.json")]);
    }

    #[test]
    fn test_find_templates_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_templates(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_parse_var() {
        assert_eq!(
            parse_var("first_name=Ada = Lovelace"),
            Ok(("first_name".to_string(), "Ada = Lovelace".to_string()))
        );
        assert!(parse_var("no_equals").is_err());
        assert!(parse_var("1bad=x").is_err());
    }
}
