use super::{find_templates, read_template};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailbuilder_blocks::EmailData;
use mailbuilder_common::{collect_block_variables, UNSUBSCRIBE_LINK, VIEW_IN_BROWSER_LINK};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct VarsArgs {
    /// Template file or directory (defaults to the configured source directory)
    pub input: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Variable usage of one template
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariableReport {
    /// Keys referenced by blocks, in document order
    pub referenced: Vec<String>,
    /// Keys declared by the template
    pub defined: Vec<String>,
    /// Referenced but not declared (reserved link keys excluded)
    pub undefined: Vec<String>,
    /// Declared but never referenced
    pub unused: Vec<String>,
}

impl VariableReport {
    pub fn from_data(data: &EmailData) -> Self {
        let referenced = collect_block_variables(&data.blocks);
        let defined: Vec<String> = data.variables.iter().map(|v| v.key.clone()).collect();

        let undefined = referenced
            .iter()
            .filter(|key| *key != UNSUBSCRIBE_LINK && *key != VIEW_IN_BROWSER_LINK)
            .filter(|key| !defined.contains(*key))
            .cloned()
            .collect();
        let unused = defined
            .iter()
            .filter(|key| !referenced.contains(*key))
            .cloned()
            .collect();

        Self {
            referenced,
            defined,
            undefined,
            unused,
        }
    }
}

pub fn vars(args: VarsArgs, cwd: &Path) -> Result<()> {
    let input = match &args.input {
        Some(path) => cwd.join(path),
        None => Config::load(cwd)?.get_src_dir(cwd),
    };

    for file in find_templates(&input)? {
        let data = read_template(&file)?;
        let report = VariableReport::from_data(&data);

        if args.json {
            let json = serde_json::json!({
                "file": file.display().to_string(),
                "variables": report,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
            continue;
        }

        println!("{}", file.display().to_string().bold());
        for variable in &data.variables {
            let marker = if report.unused.contains(&variable.key) {
                "unused".dimmed()
            } else {
                "used".green()
            };
            println!(
                "  {} {} = {:?} ({})",
                variable.key.bright_white(),
                variable.name.dimmed(),
                variable.default_value,
                marker
            );
        }
        for key in &report.undefined {
            println!("  {} {} (not defined)", key.yellow(), "⚠️".yellow());
        }
        if data.variables.is_empty() && report.undefined.is_empty() {
            println!("  {}", "no variables".dimmed());
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{create_footer, create_text, EmailStyles, Variable};
    use serde_json::json;

    #[test]
    fn test_report_splits_keys() {
        let data = EmailData::new(
            vec![
                create_text(Some(json!({ "content": "{{ name }} and {{ promo }}" }))).unwrap(),
                create_footer(Some(json!({ "content": "<a href=\"{{ unsubscribe_link }}\">x</a>" })))
                    .unwrap(),
            ],
            EmailStyles::default(),
            vec![
                Variable::new("1", "Name", "name", "friend"),
                Variable::new("2", "City", "city", ""),
            ],
        );

        let report = VariableReport::from_data(&data);
        assert_eq!(report.referenced, vec!["name", "promo", "unsubscribe_link"]);
        assert_eq!(report.defined, vec!["name", "city"]);
        assert_eq!(report.undefined, vec!["promo"]);
        assert_eq!(report.unused, vec!["city"]);
    }

    #[test]
    fn test_vars_reads_directory() {
        let cwd = tempfile::tempdir().unwrap();
        let src = cwd.path().join("templates");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("a.json"), EmailData::default().to_json_pretty().unwrap()).unwrap();

        let args = VarsArgs {
            input: None,
            json: true,
        };
        assert!(vars(args, cwd.path()).is_ok());
    }
}
