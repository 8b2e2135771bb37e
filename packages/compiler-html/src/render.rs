//! Per-block row renderers.
//!
//! Every visible block becomes one `<tr><td>` row of the container table,
//! with the block's own style record inlined on the cell.

use crate::compiler::{escape_html, Context};
use crate::css::{px, Css};
use crate::media::{platform_label, social_icon_url, video_thumbnail};
use mailbuilder_blocks::{
    Align, Block, BlockKind, ButtonStyle, Column, DividerStyle, EmailStyles, HeadingLevel,
    ListItem, ListType, MenuItem, MenuLayout, SocialIconStyle, SocialLink,
};
use mailbuilder_common::{replace_variables, Bindings, UNSUBSCRIBE_LINK, VIEW_IN_BROWSER_LINK};

pub(crate) fn render_blocks(blocks: &[Block], styles: &EmailStyles, bindings: &Bindings, ctx: &mut Context) {
    let renderer = Renderer { styles, bindings };
    renderer.render_rows(blocks, ctx);
}

struct Renderer<'a> {
    styles: &'a EmailStyles,
    bindings: &'a Bindings,
}

/// Shared fields of image-like blocks
struct ImageParts<'a> {
    src: &'a str,
    alt: &'a str,
    link: Option<&'a str>,
    width: Option<&'a str>,
    align: Align,
    placeholder: &'static str,
    fluid: bool,
}

impl Renderer<'_> {
    fn render_rows(&self, blocks: &[Block], ctx: &mut Context) {
        for block in blocks.iter().filter(|b| !b.is_hidden()) {
            self.render_block(block, ctx);
        }
    }

    /// Substituted rich content, emitted raw
    fn rich(&self, text: &str) -> String {
        replace_variables(text, self.bindings)
    }

    /// Substituted plain text or attribute value, escaped
    fn plain(&self, text: &str) -> String {
        escape_html(&replace_variables(text, self.bindings))
    }

    fn render_block(&self, block: &Block, ctx: &mut Context) {
        let cell = Css::from(&block.styles);

        match &block.kind {
            BlockKind::Text { content } => {
                open_row(ctx, &cell, None);
                ctx.add_line(&format!("<div>{}</div>", self.rich(content)));
                close_row(ctx);
            }
            BlockKind::Heading { content, level } => {
                open_row(ctx, &cell, None);
                self.render_heading(block, content, *level, ctx);
                close_row(ctx);
            }
            BlockKind::Image {
                src,
                alt,
                link,
                width,
                align,
            } => self.render_image(
                &cell,
                ImageParts {
                    src,
                    alt,
                    link: link.as_deref(),
                    width: width.as_deref(),
                    align: *align,
                    placeholder: "Image",
                    fluid: true,
                },
                ctx,
            ),
            BlockKind::Logo {
                src,
                alt,
                link,
                width,
                align,
            } => self.render_image(
                &cell,
                ImageParts {
                    src,
                    alt,
                    link: link.as_deref(),
                    width: width.as_deref(),
                    align: *align,
                    placeholder: "Logo",
                    fluid: false,
                },
                ctx,
            ),
            BlockKind::Button {
                text,
                link,
                button_style,
                align,
            } => {
                open_row(ctx, &cell, Some(align.as_str()));
                self.render_button(text, link, button_style, *align, block, ctx);
                close_row(ctx);
            }
            BlockKind::Divider { divider_style } => {
                open_row(ctx, &cell, None);
                render_divider(divider_style, ctx);
                close_row(ctx);
            }
            BlockKind::Spacer { height } => {
                let mut cell = cell;
                cell.set("height", px(*height))
                    .set("line-height", px(*height))
                    .set("font-size", "0")
                    .set("mso-line-height-rule", "exactly");
                ctx.add_line("<tr>");
                ctx.indent();
                ctx.add_line(&format!(
                    r#"<td height="{}" style="{}">&nbsp;</td>"#,
                    height,
                    escape_html(&cell.to_string())
                ));
                ctx.dedent();
                ctx.add_line("</tr>");
            }
            BlockKind::Columns {
                columns,
                gap,
                stack_on_mobile,
            } => {
                open_row(ctx, &cell, None);
                self.render_columns(columns, *gap, *stack_on_mobile, ctx);
                close_row(ctx);
            }
            BlockKind::Social {
                links,
                icon_size,
                icon_style,
                spacing,
                align,
            } => {
                open_row(ctx, &cell, Some(align.as_str()));
                self.render_social(links, *icon_size, *icon_style, *spacing, ctx);
                close_row(ctx);
            }
            BlockKind::Video {
                url,
                thumbnail,
                alt,
                play_button_color,
            } => {
                open_row(ctx, &cell, Some("center"));
                self.render_video(url, thumbnail.as_deref(), alt, play_button_color, ctx);
                close_row(ctx);
            }
            BlockKind::Html { content } => {
                open_row(ctx, &cell, None);
                ctx.add_line(&self.rich(content));
                close_row(ctx);
            }
            BlockKind::Menu {
                items,
                layout,
                separator,
                align,
            } => {
                open_row(ctx, &cell, Some(align.as_str()));
                self.render_menu(block, items, *layout, separator, ctx);
                close_row(ctx);
            }
            BlockKind::Footer {
                content,
                address,
                show_unsubscribe,
                unsubscribe_text,
            } => {
                open_row(ctx, &cell, None);
                if !content.is_empty() {
                    ctx.add_line(&format!("<div>{}</div>", self.rich(content)));
                }
                if let Some(address) = address.as_deref().filter(|a| !a.is_empty()) {
                    ctx.add_line(&format!(
                        r#"<p style="margin: 8px 0 0 0;">{}</p>"#,
                        self.plain(address)
                    ));
                }
                if *show_unsubscribe {
                    self.render_reserved_link(UNSUBSCRIBE_LINK, unsubscribe_text, ctx);
                }
                close_row(ctx);
            }
            BlockKind::Header {
                content,
                show_view_in_browser,
                view_in_browser_text,
            } => {
                open_row(ctx, &cell, None);
                if *show_view_in_browser {
                    self.render_reserved_link(VIEW_IN_BROWSER_LINK, view_in_browser_text, ctx);
                }
                if !content.is_empty() {
                    ctx.add_line(&format!("<div>{}</div>", self.rich(content)));
                }
                close_row(ctx);
            }
            BlockKind::List { items, list_type } => {
                open_row(ctx, &cell, None);
                self.render_list(items, *list_type, ctx);
                close_row(ctx);
            }
        }
    }

    fn render_heading(&self, block: &Block, content: &str, level: HeadingLevel, ctx: &mut Context) {
        let defaults = self.styles.headings.get(level.get());
        let own = &block.styles;

        let mut css = Css::new();
        css.set("margin", "0")
            .set("font-size", px(own.font_size.unwrap_or(defaults.font_size)))
            .set(
                "font-weight",
                own.font_weight.as_deref().unwrap_or(defaults.font_weight.as_str()),
            )
            .set_opt(
                "font-family",
                own.font_family.as_deref().or(defaults.font_family.as_deref()),
            )
            .set_opt("color", own.color.as_deref().or(defaults.color.as_deref()))
            .set_opt(
                "line-height",
                own.line_height.as_deref().or(defaults.line_height.as_deref()),
            )
            .set_opt("text-align", own.text_align.map(|a| a.as_str()));

        let tag = level.tag();
        ctx.add_line(&format!(
            r#"<{tag} style="{}">{}</{tag}>"#,
            escape_html(&css.to_string()),
            self.rich(content),
            tag = tag
        ));
    }

    fn render_image(&self, cell: &Css, image: ImageParts<'_>, ctx: &mut Context) {
        open_row(ctx, cell, Some(image.align.as_str()));

        let src = self.plain(image.src);
        if src.trim().is_empty() {
            ctx.add_line(&format!(
                r#"<div style="background-color: #f3f4f6; border: 2px dashed #d1d5db; padding: 40px 20px; text-align: center; color: #9ca3af; font-size: 14px;">{}</div>"#,
                image.placeholder
            ));
            close_row(ctx);
            return;
        }

        let width = image.width.unwrap_or("100%");
        let mut css = Css::new();
        css.set("display", "block")
            .set("width", width)
            .set("max-width", "100%")
            .set("height", "auto")
            .set("border", "0")
            .set("outline", "none")
            .set("margin", align_margin(image.align));

        let width_attr = pixel_width(width, self.styles.container.width)
            .map(|w| format!(r#" width="{}""#, w))
            .unwrap_or_default();
        let class = if image.fluid { r#" class="fluid-img""# } else { "" };
        let img = format!(
            r#"<img src="{}" alt="{}"{}{} style="{}">"#,
            src,
            self.plain(image.alt),
            width_attr,
            class,
            escape_html(&css.to_string())
        );

        match image.link.filter(|l| !l.trim().is_empty()) {
            Some(link) => ctx.add_line(&format!(
                r#"<a href="{}" target="_blank" style="text-decoration: none;">{}</a>"#,
                self.plain(link),
                img
            )),
            None => ctx.add_line(&img),
        }

        close_row(ctx);
    }

    fn render_button(
        &self,
        text: &str,
        link: &str,
        style: &ButtonStyle,
        align: Align,
        block: &Block,
        ctx: &mut Context,
    ) {
        let mut anchor = Css::new();
        anchor
            .set("display", if style.full_width { "block" } else { "inline-block" })
            .set("padding", style.padding.to_css())
            .set("background-color", style.background_color.as_str())
            .set("color", style.text_color.as_str())
            .set("font-size", px(style.font_size))
            .set("font-weight", style.font_weight.as_str())
            .set("line-height", "1.2")
            .set("text-align", "center")
            .set("text-decoration", "none")
            .set("border-radius", px(style.border_radius))
            .set("mso-padding-alt", "0")
            .set_opt("font-family", block.styles.font_family.as_deref());
        if let Some(width) = style.border_width.filter(|w| *w > 0) {
            let color = style.border_color.as_deref().unwrap_or(style.background_color.as_str());
            anchor.set("border", format!("{}px solid {}", width, color));
        }

        let width_attr = if style.full_width { r#" width="100%""# } else { "" };
        ctx.add_line(&format!(
            r#"<table role="presentation" border="0" cellpadding="0" cellspacing="0"{} align="{}" style="margin: {};">"#,
            width_attr,
            align.as_str(),
            align_margin(align)
        ));
        ctx.indent();
        ctx.add_line("<tr>");
        ctx.indent();
        ctx.add_line(&format!(
            r#"<td align="center" bgcolor="{}" style="border-radius: {}; background-color: {};">"#,
            escape_html(&style.background_color),
            px(style.border_radius),
            escape_html(&style.background_color)
        ));
        ctx.indent();
        ctx.add_line(&format!(
            r#"<a href="{}" target="_blank" style="{}">{}</a>"#,
            self.plain(link),
            escape_html(&anchor.to_string()),
            self.plain(text)
        ));
        ctx.dedent();
        ctx.add_line("</td>");
        ctx.dedent();
        ctx.add_line("</tr>");
        ctx.dedent();
        ctx.add_line("</table>");
    }

    fn render_columns(&self, columns: &[Column], gap: u32, stack_on_mobile: bool, ctx: &mut Context) {
        ctx.add_line(r#"<table role="presentation" width="100%" border="0" cellpadding="0" cellspacing="0">"#);
        ctx.indent();
        ctx.add_line("<tr>");
        ctx.indent();

        let count = columns.len().max(1);
        let half_gap = gap / 2;
        let class = if stack_on_mobile { r#" class="stack-column""# } else { "" };

        for (i, column) in columns.iter().enumerate() {
            let width = column.width_percent().unwrap_or(100.0 / count as f64);
            let valign = column.styles.vertical_align.unwrap_or_default().as_str();

            let mut css = Css::from(&column.styles);
            css.set("width", format_percent(width)).set("vertical-align", valign);
            if half_gap > 0 && i > 0 {
                css.set("padding-left", px(half_gap));
            }
            if half_gap > 0 && i + 1 < columns.len() {
                css.set("padding-right", px(half_gap));
            }

            ctx.add_line(&format!(
                r#"<td{} width="{}" valign="{}" style="{}">"#,
                class,
                format_percent(width),
                valign,
                escape_html(&css.to_string())
            ));
            ctx.indent();
            ctx.add_line(r#"<table role="presentation" width="100%" border="0" cellpadding="0" cellspacing="0">"#);
            ctx.indent();
            self.render_rows(&column.children, ctx);
            ctx.dedent();
            ctx.add_line("</table>");
            ctx.dedent();
            ctx.add_line("</td>");
        }

        ctx.dedent();
        ctx.add_line("</tr>");
        ctx.dedent();
        ctx.add_line("</table>");
    }

    fn render_social(
        &self,
        links: &[SocialLink],
        icon_size: u32,
        icon_style: SocialIconStyle,
        spacing: u32,
        ctx: &mut Context,
    ) {
        let margin = spacing / 2;
        for link in links {
            ctx.add_line(&format!(
                r#"<a href="{}" target="_blank" style="display: inline-block; margin: 0 {}px; text-decoration: none;"><img src="{}" alt="{}" width="{size}" height="{size}" style="display: block; border: 0; width: {size}px; height: {size}px;"></a>"#,
                self.plain(&link.url),
                margin,
                escape_html(&social_icon_url(link, icon_style)),
                escape_html(&platform_label(&link.platform)),
                size = icon_size
            ));
        }
    }

    fn render_video(
        &self,
        url: &str,
        thumbnail: Option<&str>,
        alt: &str,
        play_button_color: &str,
        ctx: &mut Context,
    ) {
        let url = replace_variables(url, self.bindings);
        let thumbnail = thumbnail
            .filter(|t| !t.trim().is_empty())
            .map(|t| replace_variables(t, self.bindings))
            .or_else(|| video_thumbnail(&url));

        if url.trim().is_empty() {
            ctx.add_line(r#"<div style="background-color: #f3f4f6; border: 2px dashed #d1d5db; padding: 60px 20px; text-align: center; color: #9ca3af; font-size: 14px;">Video</div>"#);
            return;
        }

        let play_color = if play_button_color.is_empty() { "#ffffff" } else { play_button_color };
        ctx.add_line(&format!(
            r#"<a href="{}" target="_blank" style="display: block; position: relative; text-decoration: none;">"#,
            escape_html(&url)
        ));
        ctx.indent();
        match thumbnail {
            Some(thumbnail) => ctx.add_line(&format!(
                r#"<img src="{}" alt="{}" width="{}" class="fluid-img" style="display: block; width: 100%; max-width: 100%; height: auto; border: 0;">"#,
                escape_html(&thumbnail),
                self.plain(alt),
                self.styles.container.width
            )),
            None => ctx.add_line(r#"<div style="background-color: #111827; height: 300px;"></div>"#),
        }
        ctx.add_line(r#"<span style="position: absolute; top: 50%; left: 50%; width: 64px; height: 64px; margin-top: -32px; margin-left: -32px; border-radius: 50%; background-color: rgba(0, 0, 0, 0.6); display: block; text-align: center; line-height: 64px;">"#);
        ctx.indent();
        ctx.add_line(&format!(
            r#"<span style="display: inline-block; width: 0; height: 0; border-top: 12px solid transparent; border-bottom: 12px solid transparent; border-left: 20px solid {}; vertical-align: middle; margin-left: 6px;"></span>"#,
            escape_html(play_color)
        ));
        ctx.dedent();
        ctx.add_line("</span>");
        ctx.dedent();
        ctx.add_line("</a>");
    }

    fn render_menu(
        &self,
        block: &Block,
        items: &[MenuItem],
        layout: MenuLayout,
        separator: &str,
        ctx: &mut Context,
    ) {
        let color = block.styles.color.as_deref().unwrap_or(self.styles.link.color.as_str());
        let anchors: Vec<String> = items
            .iter()
            .map(|item| {
                format!(
                    r#"<a href="{}" target="_blank" style="color: {}; text-decoration: none;">{}</a>"#,
                    self.plain(&item.link),
                    escape_html(color),
                    self.plain(&item.text)
                )
            })
            .collect();

        match layout {
            MenuLayout::Horizontal => {
                let joined = anchors.join(&format!(
                    r#"<span style="color: inherit;">{}</span>"#,
                    escape_html(separator)
                ));
                ctx.add_line(&joined);
            }
            MenuLayout::Vertical => {
                for anchor in anchors {
                    ctx.add_line(&format!(r#"<div style="padding: 4px 0;">{}</div>"#, anchor));
                }
            }
        }
    }

    fn render_reserved_link(&self, key: &str, text: &str, ctx: &mut Context) {
        let href = self.plain(&format!("{{{{ {} }}}}", key));
        ctx.add_line(&format!(
            r#"<p style="margin: 8px 0 0 0;"><a href="{}" target="_blank" style="color: inherit; text-decoration: underline;">{}</a></p>"#,
            href,
            self.plain(text)
        ));
    }

    fn render_list(&self, items: &[ListItem], list_type: ListType, ctx: &mut Context) {
        let tag = list_type.tag();
        ctx.add_line(&format!(r#"<{} style="margin: 0; padding-left: 24px;">"#, tag));
        ctx.indent();
        for item in items {
            ctx.add_line(&format!(
                r#"<li style="margin: 0 0 4px 0;">{}</li>"#,
                self.rich(&item.content)
            ));
        }
        ctx.dedent();
        ctx.add_line(&format!("</{}>", tag));
    }
}

fn render_divider(style: &DividerStyle, ctx: &mut Context) {
    let mut css = Css::new();
    css.set("border", "none")
        .set(
            "border-top",
            format!("{}px {} {}", style.thickness, style.style.as_str(), style.color),
        )
        .set("width", style.width.as_str())
        .set("margin", "0 auto");
    ctx.add_line(&format!(r#"<hr style="{}">"#, escape_html(&css.to_string())));
}

fn open_row(ctx: &mut Context, cell: &Css, align: Option<&str>) {
    ctx.add_line("<tr>");
    ctx.indent();

    let align = align
        .map(|a| format!(r#" align="{}""#, a))
        .unwrap_or_default();
    let style = if cell.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, escape_html(&cell.to_string()))
    };
    ctx.add_line(&format!("<td{}{}>", align, style));
    ctx.indent();
}

fn close_row(ctx: &mut Context) {
    ctx.dedent();
    ctx.add_line("</td>");
    ctx.dedent();
    ctx.add_line("</tr>");
}

fn align_margin(align: Align) -> &'static str {
    match align {
        Align::Left => "0 auto 0 0",
        Align::Center => "0 auto",
        Align::Right => "0 0 0 auto",
    }
}

/// Pixel width for the `width` attribute Outlook reads
fn pixel_width(width: &str, container_width: u32) -> Option<u32> {
    let width = width.trim();
    if let Some(px) = width.strip_suffix("px") {
        return px.trim().parse::<f64>().ok().map(|v| v.round() as u32);
    }
    if let Some(percent) = width.strip_suffix('%') {
        return percent
            .trim()
            .parse::<f64>()
            .ok()
            .map(|p| (container_width as f64 * p / 100.0).round() as u32);
    }
    width.parse::<u32>().ok()
}

fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}%", value as u32)
    } else {
        format!("{:.2}%", value)
    }
}
