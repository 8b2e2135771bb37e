use super::{find_templates, parse_var, read_template};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailbuilder_common::Bindings;
use mailbuilder_compiler_html::{compile_email, RenderOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Template file or directory (defaults to the configured source directory)
    pub path: Option<PathBuf>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Emit only the content rows, without the document shell
    #[arg(long)]
    pub fragment: bool,

    /// Bind a variable, e.g. --var first_name=Ada (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

pub fn compile(args: CompileArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let src_dir = config.get_src_dir(cwd);
    let input = args
        .path
        .as_ref()
        .map(|p| cwd.join(p))
        .unwrap_or_else(|| src_dir.clone());

    if !input.exists() {
        return Err(anyhow!("Source path does not exist: {}", input.display()));
    }

    println!("{}", "🔨 Compiling email templates...".bright_blue().bold());

    let templates = find_templates(&input)?;

    if templates.is_empty() {
        println!("{}", "⚠️  No templates found".yellow());
        return Ok(());
    }

    println!("Found {} templates", templates.len());

    let root = if input.is_dir() { input.as_path() } else { input.parent().unwrap_or(cwd) };
    let out_dir = match &args.out_dir {
        Some(out) => cwd.join(out),
        None => config.get_out_dir(cwd),
    };

    let mut overrides: Bindings = config.variables.clone().into_iter().collect();
    overrides.merge(args.vars.iter().cloned());

    let options = RenderOptions {
        full_document: config.full_document && !args.fragment,
        pretty: config.pretty,
        ..Default::default()
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for template in &templates {
        let relative_path = template.strip_prefix(root).unwrap_or(template);
        match compile_file(template, relative_path, &out_dir, &overrides, &options, args.stdout) {
            Ok(output_path) => {
                success_count += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    relative_path.display(),
                    output_path
                );
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    format!("{:#}", e).red()
                );
            }
        }
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Compiled {} templates successfully",
            "✅".green(),
            success_count
        );
        Ok(())
    } else {
        println!(
            "{} Compiled {} templates, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
        Err(anyhow!("{} templates failed to compile", error_count))
    }
}

pub(crate) fn compile_file(
    file_path: &Path,
    relative_path: &Path,
    out_dir: &Path,
    overrides: &Bindings,
    options: &RenderOptions,
    stdout: bool,
) -> Result<String> {
    let data = read_template(file_path)?;

    let mut options = options.clone();
    if options.title.is_none() {
        options.title = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);
    }

    let html = compile_email(&data, overrides, options);
    tracing::debug!(path = %file_path.display(), bytes = html.len(), "compiled template");

    if stdout {
        println!("{}", html);
        return Ok("stdout".to_string());
    }

    let output_file = out_dir.join(relative_path).with_extension("html");
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, html)?;

    Ok(output_file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{create_button, create_text, EmailData, EmailStyles, Variable};
    use serde_json::json;

    fn write_template(dir: &Path, name: &str) {
        let data = EmailData::new(
            vec![
                create_text(Some(json!({ "content": "<p>Hi {{ first_name }}</p>" }))).unwrap(),
                create_button(None).unwrap(),
            ],
            EmailStyles::default(),
            vec![Variable::new("v1", "First name", "first_name", "there")],
        );
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), data.to_json_pretty().unwrap()).unwrap();
    }

    #[test]
    fn test_compile_directory_writes_html() {
        let cwd = tempfile::tempdir().unwrap();
        write_template(&cwd.path().join("templates/promo"), "welcome.json");

        compile(
            CompileArgs {
                path: None,
                stdout: false,
                out_dir: None,
                fragment: false,
                vars: vec![("first_name".to_string(), "Ada".to_string())],
            },
            cwd.path(),
        )
        .unwrap();

        let html = fs::read_to_string(cwd.path().join("dist/promo/welcome.html")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html PUBLIC"));
        assert!(html.contains("<p>Hi Ada</p>"));
    }

    #[test]
    fn test_compile_fragment_uses_defaults() {
        let cwd = tempfile::tempdir().unwrap();
        write_template(&cwd.path().join("mail"), "a.json");

        compile(
            CompileArgs {
                path: Some(PathBuf::from("mail/a.json")),
                stdout: false,
                out_dir: Some("out".to_string()),
                fragment: true,
                vars: vec![],
            },
            cwd.path(),
        )
        .unwrap();

        let html = fs::read_to_string(cwd.path().join("out/a.html")).unwrap();
        assert!(!html.contains("<!DOCTYPE"));
        assert!(html.contains("<p>Hi there</p>"));
    }

    #[test]
    fn test_compile_reports_broken_template() {
        let cwd = tempfile::tempdir().unwrap();
        let src = cwd.path().join("templates");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("broken.json"), "{ \"blocks\": 3 }").unwrap();

        let result = compile(
            CompileArgs {
                path: None,
                stdout: false,
                out_dir: None,
                fragment: false,
                vars: vec![],
            },
            cwd.path(),
        );

        assert!(result.is_err());
        assert!(!cwd.path().join("dist/broken.html").exists());
    }
}
