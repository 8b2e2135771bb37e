use super::{find_templates, read_template};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailbuilder_linter::{lint_blocks, Diagnostic, DiagnosticLevel, LintOptions};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Template file or directory to lint (defaults to the configured source directory)
    pub input: Option<PathBuf>,

    /// Show all diagnostics including info level
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Rule to skip (repeatable)
    #[arg(long = "disable", value_name = "RULE")]
    pub disabled: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct LintTotals {
    pub files: usize,
    pub diagnostics: usize,
    pub errors: usize,
    pub warnings: usize,
}

pub fn lint(args: LintArgs, cwd: &Path) -> Result<()> {
    let input = match &args.input {
        Some(path) => cwd.join(path),
        None => Config::load(cwd)?.get_src_dir(cwd),
    };
    let json = args.format == "json";

    if !json {
        println!("🔍 {} Mailbuilder Linter", "Starting".green().bold());
        println!("   Input: {}", input.display());
        println!();
    }

    let totals = lint_path(&input, &args)?;

    if !json {
        print_summary(&totals);
    }

    if totals.errors > 0 {
        return Err(anyhow::anyhow!("{} lint errors", totals.errors));
    }

    Ok(())
}

pub(crate) fn lint_path(input: &Path, args: &LintArgs) -> Result<LintTotals> {
    let mut totals = LintTotals::default();

    for file in find_templates(input)? {
        let diagnostics = match read_template(&file) {
            Ok(data) => lint_blocks(
                &data,
                LintOptions {
                    disabled: args.disabled.clone(),
                    ..Default::default()
                },
            ),
            Err(err) => {
                eprintln!("{} {:#}", "✗".red(), err);
                totals.files += 1;
                totals.errors += 1;
                continue;
            }
        };

        totals.files += 1;
        totals.diagnostics += diagnostics.len();
        totals.errors += diagnostics.iter().filter(|d| d.is_error()).count();
        totals.warnings += diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
            .count();

        report(&file, &diagnostics, args)?;
    }

    Ok(totals)
}

fn report(file_path: &Path, diagnostics: &[Diagnostic], args: &LintArgs) -> Result<()> {
    if args.format == "json" {
        let json = serde_json::json!({
            "file": file_path.display().to_string(),
            "diagnostics": diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if diagnostics.is_empty() {
        if args.verbose {
            println!("{} {}", "✓".green(), file_path.display());
        }
        return Ok(());
    }

    println!("{}", file_path.display());

    for diagnostic in diagnostics {
        if !args.verbose && diagnostic.level == DiagnosticLevel::Info {
            continue;
        }

        let level_str = match diagnostic.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
            DiagnosticLevel::Info => "info".blue().bold(),
        };

        match &diagnostic.block_id {
            Some(block_id) => println!(
                "  {} [{}] {} {}",
                level_str,
                diagnostic.rule,
                diagnostic.message,
                format!("({})", block_id).dimmed()
            ),
            None => println!("  {} [{}] {}", level_str, diagnostic.rule, diagnostic.message),
        }

        if let Some(suggestion) = &diagnostic.suggestion {
            println!("    {} {}", "💡".dimmed(), suggestion.dimmed());
        }
    }

    println!();
    Ok(())
}

fn print_summary(totals: &LintTotals) {
    println!(
        "✨ {} Linting complete!",
        if totals.errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", totals.files);
    println!("   Total diagnostics: {}", totals.diagnostics);

    if totals.errors > 0 {
        println!("   {} {}", "Errors:".red(), totals.errors);
    }
    if totals.warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), totals.warnings);
    }
    if totals.errors == 0 && totals.warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{
        create_columns, create_footer, create_image, create_text, EmailData, EmailStyles,
    };
    use serde_json::json;

    fn args(disabled: &[&str]) -> LintArgs {
        LintArgs {
            input: None,
            verbose: false,
            format: "text".to_string(),
            disabled: disabled.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn write(dir: &Path, name: &str, data: &EmailData) {
        std::fs::write(dir.join(name), data.to_json_pretty().unwrap()).unwrap();
    }

    #[test]
    fn test_counts_errors_and_warnings() {
        let dir = tempfile::tempdir().unwrap();

        let mut columns = create_columns(None).unwrap();
        let nested = create_columns(None).unwrap();
        columns.columns_mut().unwrap()[0].children.push(nested);
        let image = create_image(Some(json!({ "alt": "" }))).unwrap();
        let text = create_text(Some(json!({ "content": "Hi {{ missing }}" }))).unwrap();
        write(
            dir.path(),
            "bad.json",
            &EmailData::new(
                vec![columns, image, text, create_footer(None).unwrap()],
                EmailStyles::default(),
                vec![],
            ),
        );
        write(
            dir.path(),
            "good.json",
            &EmailData::new(vec![create_footer(None).unwrap()], EmailStyles::default(), vec![]),
        );

        let totals = lint_path(dir.path(), &args(&[])).unwrap();
        assert_eq!(totals.files, 2);
        assert!(totals.errors >= 1);
        assert!(totals.warnings >= 1);
    }

    #[test]
    fn test_unreadable_template_counts_as_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let totals = lint_path(dir.path(), &args(&[])).unwrap();
        assert_eq!(totals, LintTotals { files: 1, diagnostics: 0, errors: 1, warnings: 0 });
    }

    #[test]
    fn test_lint_fails_on_errors() {
        let cwd = tempfile::tempdir().unwrap();
        let src = cwd.path().join("templates");
        std::fs::create_dir_all(&src).unwrap();

        let mut columns = create_columns(None).unwrap();
        columns.columns_mut().unwrap()[1]
            .children
            .push(create_columns(None).unwrap());
        write(
            &src,
            "nested.json",
            &EmailData::new(vec![columns, create_footer(None).unwrap()], EmailStyles::default(), vec![]),
        );

        assert!(lint(args(&[]), cwd.path()).is_err());
        assert!(lint(args(&["no-nested-columns"]), cwd.path()).is_ok());
    }
}
