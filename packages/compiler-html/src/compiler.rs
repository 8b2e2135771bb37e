use crate::css::{px, Css};
use crate::render::render_blocks;
use mailbuilder_blocks::{Block, EmailData, EmailStyles};
use mailbuilder_common::Bindings;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Options for HTML compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Wrap the rows in a complete, client-compatible document
    pub full_document: bool,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Document `<title>`
    pub title: Option<String>,
    /// Hidden inbox preview text placed at the top of the body
    pub preheader: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            full_document: true,
            pretty: true,
            indent: "  ".to_string(),
            title: None,
            preheader: None,
        }
    }
}

impl RenderOptions {
    /// Just the rows, no document shell
    pub fn fragment() -> Self {
        Self {
            full_document: false,
            ..Default::default()
        }
    }
}

pub(crate) struct Context {
    options: RenderOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub fn get_output(self) -> String {
        self.buffer
    }
}

/// Render a block tree to email HTML.
///
/// Hidden blocks are skipped. Every user-facing string goes through
/// `{{ key }}` substitution with `bindings`; unbound tokens are emitted
/// unchanged.
#[instrument(skip_all, fields(blocks = blocks.len(), full_document = options.full_document))]
pub fn compile_to_html(
    blocks: &[Block],
    styles: &EmailStyles,
    bindings: &Bindings,
    options: RenderOptions,
) -> String {
    let full_document = options.full_document;
    let title = options.title.clone();
    let preheader = options.preheader.clone();
    let mut ctx = Context::new(options);

    if full_document {
        open_document(&mut ctx, styles, title.as_deref(), preheader.as_deref());
        render_blocks(blocks, styles, bindings, &mut ctx);
        close_document(&mut ctx);
    } else {
        render_blocks(blocks, styles, bindings, &mut ctx);
    }

    let html = ctx.get_output();
    tracing::debug!(bytes = html.len(), "rendered email html");
    html
}

/// Render a saved template. Variable defaults are bound first, then
/// `overrides` replace them key by key.
pub fn compile_email(data: &EmailData, overrides: &Bindings, options: RenderOptions) -> String {
    let mut bindings = Bindings::from_variables(&data.variables);
    bindings.merge(overrides.iter());
    compile_to_html(&data.blocks, &data.styles, &bindings, options)
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Value for a `<style>` element declaration. Entities are not decoded
/// there, so characters that could close the rule or the element are dropped.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect()
}

fn open_document(ctx: &mut Context, styles: &EmailStyles, title: Option<&str>, preheader: Option<&str>) {
    let body = &styles.body;
    let container = &styles.container;

    ctx.add_line(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
    );
    ctx.add_line(
        r#"<html lang="en" xmlns="http://www.w3.org/1999/xhtml" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office">"#,
    );
    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line(r#"<meta charset="UTF-8">"#);
    ctx.add_line(r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#);
    ctx.add_line(r#"<meta http-equiv="X-UA-Compatible" content="IE=edge">"#);
    ctx.add_line(r#"<meta name="x-apple-disable-message-reformatting">"#);
    ctx.add_line(r#"<meta name="format-detection" content="telephone=no, date=no, address=no, email=no">"#);
    ctx.add_line(&format!("<title>{}</title>", escape_html(title.unwrap_or(""))));
    ctx.add_line("<!--[if mso]>");
    ctx.add_line("<noscript><xml><o:OfficeDocumentSettings><o:PixelsPerInch>96</o:PixelsPerInch></o:OfficeDocumentSettings></xml></noscript>");
    ctx.add_line("<style>table, td, div, h1, h2, h3, h4, h5, h6, p { font-family: Arial, sans-serif; }</style>");
    ctx.add_line("<![endif]-->");
    ctx.add_line("<style>");
    ctx.indent();
    ctx.add_line("body { margin: 0; padding: 0; width: 100% !important; -webkit-text-size-adjust: 100%; -ms-text-size-adjust: 100%; }");
    ctx.add_line("table, td { border-collapse: collapse; mso-table-lspace: 0pt; mso-table-rspace: 0pt; }");
    ctx.add_line("img { border: 0; outline: none; text-decoration: none; -ms-interpolation-mode: bicubic; }");
    ctx.add_line("p { margin: 0; }");
    ctx.add_line(&format!(
        "a {{ color: {}; text-decoration: {}; }}",
        css_value(&styles.link.color),
        css_value(&styles.link.text_decoration)
    ));
    ctx.add_line(&format!(
        "@media only screen and (max-width: {}px) {{",
        container.width.saturating_add(20)
    ));
    ctx.indent();
    ctx.add_line(".email-container { width: 100% !important; max-width: 100% !important; }");
    ctx.add_line(".stack-column { display: block !important; width: 100% !important; max-width: 100% !important; box-sizing: border-box; }");
    ctx.add_line(".fluid-img { width: 100% !important; max-width: 100% !important; height: auto !important; }");
    ctx.dedent();
    ctx.add_line("}");
    ctx.dedent();
    ctx.add_line("</style>");
    ctx.dedent();
    ctx.add_line("</head>");

    let mut body_css = Css::new();
    body_css
        .set("margin", "0")
        .set("padding", "0")
        .set("background-color", body.background_color.as_str())
        .set("font-family", body.font_family.as_str())
        .set("font-size", px(body.font_size))
        .set("line-height", body.line_height.as_str())
        .set("color", body.color.as_str());
    ctx.add_line(&format!(r#"<body style="{}">"#, escape_html(&body_css.to_string())));
    ctx.indent();
    ctx.add_line(&format!(
        r#"<center style="width: 100%; background-color: {};">"#,
        escape_html(&body.background_color)
    ));
    ctx.indent();

    if let Some(text) = preheader.filter(|p| !p.is_empty()) {
        ctx.add_line(&format!(
            r#"<div style="display: none; max-height: 0; overflow: hidden; mso-hide: all;">{}</div>"#,
            escape_html(text)
        ));
    }

    ctx.add_line(&format!(
        r#"<table role="presentation" width="100%" border="0" cellpadding="0" cellspacing="0" style="background-color: {};">"#,
        escape_html(&body.background_color)
    ));
    ctx.indent();
    ctx.add_line("<tr>");
    ctx.indent();
    ctx.add_line(r#"<td align="center" style="padding: 20px 0;">"#);
    ctx.indent();
    ctx.add_line(&format!(
        r#"<!--[if mso]><table role="presentation" align="center" width="{}" border="0" cellpadding="0" cellspacing="0"><tr><td><![endif]-->"#,
        container.width
    ));

    let mut container_css = Css::new();
    container_css
        .set("width", "100%")
        .set("max-width", px(container.width))
        .set("margin", "0 auto")
        .set("background-color", container.background_color.as_str());
    if container.padding > 0 {
        container_css.set("padding", px(container.padding));
    }
    if container.border_radius > 0 {
        container_css.set("border-radius", px(container.border_radius));
    }
    ctx.add_line(&format!(
        r#"<table role="presentation" class="email-container" align="center" width="{}" border="0" cellpadding="0" cellspacing="0" style="{}">"#,
        container.width,
        escape_html(&container_css.to_string())
    ));
    ctx.indent();
}

fn close_document(ctx: &mut Context) {
    ctx.dedent();
    ctx.add_line("</table>");
    ctx.add_line("<!--[if mso]></td></tr></table><![endif]-->");
    ctx.dedent();
    ctx.add_line("</td>");
    ctx.dedent();
    ctx.add_line("</tr>");
    ctx.dedent();
    ctx.add_line("</table>");
    ctx.dedent();
    ctx.add_line("</center>");
    ctx.dedent();
    ctx.add_line("</body>");
    ctx.add_line("</html>");
}
