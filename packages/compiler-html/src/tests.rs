use crate::{compile_email, compile_to_html, RenderOptions};
use mailbuilder_blocks::{
    create_block, create_button, create_columns, create_divider, create_footer, create_header,
    create_heading, create_html, create_image, create_list, create_logo, create_menu, create_spacer,
    create_text, create_video, Block, BlockKind, EmailData, EmailStyles, Variable,
};
use mailbuilder_common::Bindings;
use serde_json::json;

fn fragment(blocks: &[Block]) -> String {
    compile_to_html(blocks, &EmailStyles::default(), &Bindings::new(), RenderOptions::fragment())
}

fn fragment_with(blocks: &[Block], bindings: &Bindings) -> String {
    compile_to_html(blocks, &EmailStyles::default(), bindings, RenderOptions::fragment())
}

#[test]
fn test_text_block_with_variable() {
    let block = create_text(Some(json!({ "content": "<p>Hello {{ first_name }}</p>" }))).unwrap();
    let bindings = Bindings::new().with("first_name", "Ada");

    let html = fragment_with(&[block], &bindings);

    println!("Generated HTML:\n{}", html);

    assert!(html.contains("<p>Hello Ada</p>"));
    assert!(!html.contains("{{"));
}

#[test]
fn test_unbound_variable_left_in_output() {
    let block = create_text(Some(json!({ "content": "<p>Hi {{ nickname }}</p>" }))).unwrap();
    let html = fragment(&[block]);

    assert!(html.contains("{{ nickname }}"));
}

#[test]
fn test_block_styles_inlined_on_cell() {
    let block = create_text(Some(json!({
        "styles": { "padding": { "top": 4, "right": 8, "bottom": 4, "left": 8 }, "backgroundColor": "#fef3c7" }
    })))
    .unwrap();

    let html = fragment(&[block]);

    assert!(html.contains(r#"<td style="padding: 4px 8px; background-color: #fef3c7;">"#));
}

#[test]
fn test_heading_uses_level_and_heading_styles() {
    let block = create_heading(Some(json!({ "content": "Welcome", "level": 1 }))).unwrap();
    let html = fragment(&[block]);

    println!("Generated HTML:\n{}", html);

    assert!(html.contains("<h1 style=\"margin: 0; font-size: 32px; font-weight: bold;"));
    assert!(html.contains(">Welcome</h1>"));
}

#[test]
fn test_button_renders_link_and_escapes_text() {
    let block = create_button(Some(json!({
        "text": "Save <50%> & more",
        "link": "https://shop.example.com/?a=1&b=2"
    })))
    .unwrap();

    let html = fragment(&[block]);

    println!("Generated HTML:\n{}", html);

    assert!(html.contains(r#"href="https://shop.example.com/?a=1&amp;b=2""#));
    assert!(html.contains("Save &lt;50%&gt; &amp; more</a>"));
    assert!(html.contains("background-color: #3b82f6;"));
    assert!(html.contains(r##"bgcolor="#3b82f6""##));
}

#[test]
fn test_image_placeholder_without_src() {
    let html = fragment(&[create_image(None).unwrap()]);
    assert!(html.contains("Image</div>"));
    assert!(!html.contains("<img"));
}

#[test]
fn test_image_with_link_and_width() {
    let block = create_image(Some(json!({
        "src": "https://cdn.example.com/hero.png",
        "alt": "Hero \"banner\"",
        "link": "https://example.com",
        "width": "50%"
    })))
    .unwrap();

    let html = fragment(&[block]);

    println!("Generated HTML:\n{}", html);

    assert!(html.contains(r#"<a href="https://example.com" target="_blank""#));
    assert!(html.contains(r#"src="https://cdn.example.com/hero.png""#));
    assert!(html.contains(r#"alt="Hero &quot;banner&quot;""#));
    assert!(html.contains(r#"width="300""#));
}

#[test]
fn test_hidden_blocks_are_skipped() {
    let visible = create_text(Some(json!({ "content": "shown" }))).unwrap();
    let hidden = create_text(Some(json!({ "content": "secret", "hidden": true }))).unwrap();

    let html = fragment(&[visible, hidden]);

    assert!(html.contains("shown"));
    assert!(!html.contains("secret"));
}

#[test]
fn test_columns_render_children_side_by_side() {
    let mut block = create_columns(Some(json!({ "columnCount": 2, "gap": 20 }))).unwrap();
    if let BlockKind::Columns { columns, .. } = &mut block.kind {
        columns[0]
            .children
            .push(create_text(Some(json!({ "content": "left side" }))).unwrap());
        columns[1]
            .children
            .push(create_text(Some(json!({ "content": "right side" }))).unwrap());
        columns[1]
            .children
            .push(create_text(Some(json!({ "content": "hidden side", "hidden": true }))).unwrap());
    }

    let html = fragment(&[block]);

    println!("Generated HTML:\n{}", html);

    assert_eq!(html.matches(r#"class="stack-column""#).count(), 2);
    assert_eq!(html.matches(r#"width="50%""#).count(), 2);
    assert!(html.contains("padding-right: 10px;"));
    assert!(html.contains("padding-left: 10px;"));
    assert!(html.find("left side").unwrap() < html.find("right side").unwrap());
    assert!(!html.contains("hidden side"));
}

#[test]
fn test_html_block_is_verbatim() {
    let block = create_html(Some(json!({ "content": "<table><tr><td>&copy; raw</td></tr></table>" }))).unwrap();
    let html = fragment(&[block]);
    assert!(html.contains("<table><tr><td>&copy; raw</td></tr></table>"));
}

#[test]
fn test_footer_unsubscribe_uses_reserved_variable() {
    let block = create_footer(Some(json!({ "address": "1 Main St" }))).unwrap();

    let unbound = fragment(&[block.clone()]);
    assert!(unbound.contains(r#"href="{{ unsubscribe_link }}""#));
    assert!(unbound.contains("1 Main St"));

    let bindings = Bindings::new().with("unsubscribe_link", "https://example.com/u/42");
    let bound = fragment_with(&[block], &bindings);
    assert!(bound.contains(r#"href="https://example.com/u/42""#));
    assert!(bound.contains(">Unsubscribe</a>"));
}

#[test]
fn test_footer_without_unsubscribe() {
    let block = create_footer(Some(json!({ "showUnsubscribe": false }))).unwrap();
    let html = fragment(&[block]);
    assert!(!html.contains("unsubscribe_link"));
}

#[test]
fn test_header_view_in_browser_link() {
    let block = create_header(None).unwrap();
    let bindings = Bindings::new().with("view_in_browser_link", "https://example.com/v/1");
    let html = fragment_with(&[block], &bindings);
    assert!(html.contains(r#"href="https://example.com/v/1""#));
    assert!(html.contains("View in browser</a>"));
}

#[test]
fn test_menu_items_joined_by_separator() {
    let html = fragment(&[create_menu(None).unwrap()]);

    println!("Generated HTML:\n{}", html);

    assert!(html.contains(">Home</a>"));
    assert!(html.contains(">Contact</a>"));
    assert_eq!(html.matches(" | </span>").count(), 2);
}

#[test]
fn test_video_thumbnail_from_youtube() {
    let block = create_video(Some(json!({ "url": "https://youtu.be/dQw4w9WgXcQ" }))).unwrap();
    let html = fragment(&[block]);

    assert!(html.contains("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"));
    assert!(html.contains(r#"href="https://youtu.be/dQw4w9WgXcQ""#));
}

#[test]
fn test_video_without_url_is_placeholder() {
    let block = create_video(Some(json!({
        "url": "",
        "thumbnail": "https://cdn.example.com/t.jpg"
    })))
    .unwrap();
    let html = fragment(&[block]);

    assert!(html.contains("Video</div>"));
    assert!(!html.contains(r#"<a href="""#));
    assert!(!html.contains("https://cdn.example.com/t.jpg"));
}

#[test]
fn test_menu_vertical_layout_one_item_per_line() {
    let block = create_menu(Some(json!({ "layout": "vertical" }))).unwrap();
    let html = fragment(&[block]);

    println!("Generated HTML:\n{}", html);

    let rows: Vec<&str> = html
        .lines()
        .filter(|line| line.contains(r#"<div style="padding: 4px 0;">"#))
        .collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains(">Home</a></div>"));
    assert!(rows[2].contains(">Contact</a></div>"));
    assert!(!html.contains(" | </span>"));
}

#[test]
fn test_list_tag_follows_list_type() {
    let items = json!([
        { "id": "item_1", "content": "Hello {{ first_name }}" },
        { "id": "item_2", "content": "Second" }
    ]);
    let bindings = Bindings::new().with("first_name", "Ada");

    let bullet = create_list(Some(json!({ "items": items.clone(), "listType": "bullet" }))).unwrap();
    let html = fragment_with(&[bullet], &bindings);
    assert!(html.contains("<ul "));
    assert!(html.contains("</ul>"));
    assert!(!html.contains("<ol"));
    assert!(html.contains(">Hello Ada</li>"));
    assert_eq!(html.matches("<li ").count(), 2);

    let numbered = create_list(Some(json!({ "items": items, "listType": "numbered" }))).unwrap();
    let html = fragment_with(&[numbered], &bindings);
    assert!(html.contains("<ol "));
    assert!(html.contains("</ol>"));
    assert!(!html.contains("<ul"));
    assert!(html.contains(">Hello Ada</li>"));
}

#[test]
fn test_divider_uses_divider_style() {
    let block = create_divider(Some(json!({
        "dividerStyle": { "style": "dashed", "color": "#ff0000", "thickness": 3, "width": "50%" }
    })))
    .unwrap();
    let html = fragment(&[block]);

    assert!(html.contains(
        r##"<hr style="border: none; border-top: 3px dashed #ff0000; width: 50%; margin: 0 auto;">"##
    ));
}

#[test]
fn test_logo_alignment_sets_auto_margins() {
    let render = |align: &str| {
        let block = create_logo(Some(json!({
            "src": "https://cdn.example.com/logo.png",
            "align": align
        })))
        .unwrap();
        fragment(&[block])
    };

    assert!(render("left").contains("margin: 0 auto 0 0;"));
    assert!(render("center").contains("margin: 0 auto;"));

    let right = render("right");
    assert!(right.contains(r#"<td align="right""#));
    assert!(right.contains("margin: 0 0 0 auto;"));
    assert!(right.contains(r#"width="150""#));
}

#[test]
fn test_spacer_height() {
    let block = create_spacer(Some(json!({ "height": 48 }))).unwrap();
    let html = fragment(&[block]);
    assert!(html.contains(r#"<td height="48" style="height: 48px; line-height: 48px;"#));
}

#[test]
fn test_social_icons() {
    let block = create_block("social", None).unwrap();
    let html = fragment(&[block]);

    println!("Generated HTML:\n{}", html);

    assert_eq!(html.matches("<img").count(), 3);
    assert!(html.contains(r#"alt="Facebook""#));
    assert!(html.contains("https://cdn.simpleicons.org/instagram/E4405F"));
}

#[test]
fn test_full_document_shell() {
    let options = RenderOptions {
        title: Some("Welcome".to_string()),
        preheader: Some("Your account is ready".to_string()),
        ..Default::default()
    };
    let html = compile_to_html(
        &[create_text(None).unwrap()],
        &EmailStyles::default(),
        &Bindings::new(),
        options,
    );

    println!("Generated HTML:\n{}", html);

    assert!(html.starts_with("<!DOCTYPE html PUBLIC"));
    assert!(html.contains("<center"));
    assert!(html.contains("<title>Welcome</title>"));
    assert!(html.contains("<!--[if mso]>"));
    assert!(html.contains("@media only screen and (max-width: 620px)"));
    assert!(html.contains(r#"class="email-container" align="center" width="600""#));
    assert!(html.contains("Your account is ready</div>"));
    assert!(html.contains("background-color: #f4f4f5;"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn test_compile_without_pretty_print() {
    let options = RenderOptions {
        pretty: false,
        ..Default::default()
    };
    let html = compile_to_html(
        &[create_button(None).unwrap()],
        &EmailStyles::default(),
        &Bindings::new(),
        options,
    );

    assert!(!html.contains('\n'));
}

#[test]
fn test_pretty_print_indents_rows() {
    let html = compile_to_html(
        &[create_text(None).unwrap()],
        &EmailStyles::default(),
        &Bindings::new(),
        RenderOptions {
            indent: "\t".to_string(),
            ..RenderOptions::fragment()
        },
    );

    assert!(html.starts_with("<tr>\n\t<td"));
}

#[test]
fn test_compile_email_overrides_defaults() {
    let text = create_text(Some(json!({ "content": "Hi {{ first_name }} from {{ company }}" }))).unwrap();
    let data = EmailData::new(
        vec![text],
        EmailStyles::default(),
        vec![
            Variable::new("v1", "First name", "first_name", "there"),
            Variable::new("v2", "Company", "company", "ACME"),
        ],
    );

    let defaults = compile_email(&data, &Bindings::new(), RenderOptions::fragment());
    assert!(defaults.contains("Hi there from ACME"));

    let overridden = compile_email(
        &data,
        &Bindings::new().with("first_name", "Ada"),
        RenderOptions::fragment(),
    );
    assert!(overridden.contains("Hi Ada from ACME"));
}

#[test]
fn test_empty_tree_still_produces_document() {
    let html = compile_to_html(&[], &EmailStyles::default(), &Bindings::new(), RenderOptions::default());
    assert!(html.contains("<body"));
    assert!(html.contains("</body>"));
}

#[test]
fn test_huge_container_width_does_not_overflow() {
    let mut styles = EmailStyles::default();
    styles.container.width = u32::MAX;

    let html = compile_to_html(&[create_text(None).unwrap()], &styles, &Bindings::new(), RenderOptions::default());

    assert!(html.contains(&format!("@media only screen and (max-width: {}px)", u32::MAX)));
}

#[test]
fn test_link_styles_cannot_close_style_element() {
    let mut styles = EmailStyles::default();
    styles.link.color = "red;}</style><script>alert(1)</script>".to_string();
    styles.link.text_decoration = "underline } body { display: none".to_string();

    let html = compile_to_html(&[create_text(None).unwrap()], &styles, &Bindings::new(), RenderOptions::default());

    println!("Generated HTML:\n{}", html);

    assert_eq!(html.matches("</style>").count(), 2);
    assert!(!html.contains("<script>"));
    assert!(html.contains("a { color: red/stylescriptalert(1)/script; text-decoration: underline  body  display: none; }"));
}
