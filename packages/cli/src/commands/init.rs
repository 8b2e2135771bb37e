use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailbuilder_blocks::{
    create_button, create_divider, create_footer, create_heading, create_text, EmailData,
    EmailStyles, Variable,
};
use serde_json::json;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Template source directory
    #[arg(short, long, default_value = "templates")]
    pub src_dir: String,

    /// Compiled output directory
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Mailbuilder project...".bright_blue().bold()
    );

    let src_dir = cwd.join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let example_file = src_dir.join("welcome.json");
    if !example_file.exists() {
        fs::write(&example_file, welcome_template()?.to_json_pretty()?)?;
        println!("  {} Created welcome.json", "✓".green());
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        out_dir: args.out_dir.clone(),
        ..Default::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/welcome.json", args.src_dir);
    println!("  2. Run: mailbuilder compile");
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}

fn welcome_template() -> Result<EmailData> {
    let blocks = vec![
        create_heading(Some(json!({ "content": "Welcome, {{ first_name }}!", "level": 1 })))?,
        create_text(Some(json!({
            "content": "<p>Thanks for joining {{ company }}. Here is what happens next.</p>"
        })))?,
        create_button(Some(json!({ "text": "Get started", "link": "https://example.com" })))?,
        create_divider(None)?,
        create_footer(None)?,
    ];

    let variables = vec![
        Variable::new("var_first_name", "First name", "first_name", "there"),
        Variable::new("var_company", "Company", "company", "our newsletter"),
    ];

    Ok(EmailData::new(blocks, EmailStyles::default(), variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_linter::{lint_blocks, LintOptions};

    fn args(force: bool) -> InitArgs {
        InitArgs {
            src_dir: "templates".to_string(),
            out_dir: "dist".to_string(),
            force,
        }
    }

    #[test]
    fn test_init_creates_project() {
        let cwd = tempfile::tempdir().unwrap();
        init(args(false), cwd.path()).unwrap();

        let config = Config::load(cwd.path()).unwrap();
        assert_eq!(config.src_dir, "templates");

        let json = fs::read_to_string(cwd.path().join("templates/welcome.json")).unwrap();
        let data = EmailData::from_json(&json).unwrap();
        assert_eq!(data.blocks.len(), 5);
        assert_eq!(data.variables.len(), 2);
    }

    #[test]
    fn test_init_keeps_existing_config_without_force() {
        let cwd = tempfile::tempdir().unwrap();
        fs::write(cwd.path().join(DEFAULT_CONFIG_NAME), r#"{ "srcDir": "mine" }"#).unwrap();

        init(args(false), cwd.path()).unwrap();
        assert_eq!(Config::load(cwd.path()).unwrap().src_dir, "mine");

        init(args(true), cwd.path()).unwrap();
        assert_eq!(Config::load(cwd.path()).unwrap().src_dir, "templates");
    }

    #[test]
    fn test_welcome_template_lints_clean() {
        let data = welcome_template().unwrap();
        assert!(lint_blocks(&data, LintOptions::default()).is_empty());
    }
}
