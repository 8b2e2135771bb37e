//! Block factories.
//!
//! Each block type has a `create_*` function that returns a fully defaulted
//! block with a fresh id. Overrides are a JSON object shallow-merged over the
//! defaults (see [`crate::patch`]); `id` and `type` cannot be overridden.

use crate::block::{Block, BlockKind, BlockType, Column, ListItem, MenuItem, SocialLink};
use crate::error::{BlockError, BlockResult};
use crate::id_generator::generate_id;
use crate::patch::{apply_patch, patch_from_value};
use crate::style::{
    Align, BlockStyles, ButtonStyle, DividerStyle, HeadingLevel, ListType, MenuLayout,
    SocialIconStyle, Spacing, TextAlign,
};
use serde_json::Value;

/// Override key accepted by [`create_columns`] to pick the number of columns
pub const COLUMN_COUNT_KEY: &str = "columnCount";

const MAX_COLUMNS: usize = 4;

/// Create a block from its type tag, e.g. `"button"`
pub fn create_block(tag: &str, overrides: Option<Value>) -> BlockResult<Block> {
    let ty: BlockType = tag.parse()?;
    create_block_of(ty, overrides)
}

/// Create a block of a known type
pub fn create_block_of(ty: BlockType, overrides: Option<Value>) -> BlockResult<Block> {
    match ty {
        BlockType::Text => create_text(overrides),
        BlockType::Heading => create_heading(overrides),
        BlockType::Image => create_image(overrides),
        BlockType::Button => create_button(overrides),
        BlockType::Divider => create_divider(overrides),
        BlockType::Spacer => create_spacer(overrides),
        BlockType::Columns => create_columns(overrides),
        BlockType::Column => Err(BlockError::NotStandalone(BlockType::Column)),
        BlockType::Social => create_social(overrides),
        BlockType::Video => create_video(overrides),
        BlockType::Html => create_html(overrides),
        BlockType::Menu => create_menu(overrides),
        BlockType::Footer => create_footer(overrides),
        BlockType::Header => create_header(overrides),
        BlockType::Logo => create_logo(overrides),
        BlockType::List => create_list(overrides),
    }
}

fn build(kind: BlockKind, styles: BlockStyles, overrides: Option<Value>) -> BlockResult<Block> {
    let block = Block::new(generate_id(kind.block_type().as_str()), kind).with_styles(styles);

    match overrides {
        Some(value) => apply_patch(&block, &patch_from_value(value)?),
        None => Ok(block),
    }
}

fn padded(vertical: u32, horizontal: u32) -> BlockStyles {
    BlockStyles::default().with_padding(Spacing::symmetric(vertical, horizontal))
}

pub fn create_text(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Text {
            content: "<p>Enter your text here</p>".to_string(),
        },
        padded(10, 20),
        overrides,
    )
}

pub fn create_heading(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Heading {
            content: "Your Heading".to_string(),
            level: HeadingLevel::new(2),
        },
        padded(10, 20),
        overrides,
    )
}

pub fn create_image(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Image {
            src: String::new(),
            alt: "Image".to_string(),
            link: None,
            width: Some("100%".to_string()),
            align: Align::Center,
        },
        padded(10, 20),
        overrides,
    )
}

pub fn create_button(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Button {
            text: "Click Here".to_string(),
            link: "#".to_string(),
            button_style: ButtonStyle::default(),
            align: Align::Center,
        },
        padded(10, 20),
        overrides,
    )
}

pub fn create_divider(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Divider {
            divider_style: DividerStyle::default(),
        },
        padded(10, 20),
        overrides,
    )
}

pub fn create_spacer(overrides: Option<Value>) -> BlockResult<Block> {
    build(BlockKind::Spacer { height: 20 }, BlockStyles::default(), overrides)
}

/// Create a single column with the given width
pub fn create_column(width: impl Into<String>) -> Column {
    Column::new(generate_id(BlockType::Column.as_str()), width)
}

/// Evenly split columns, `count` clamped to 1..=4
pub fn create_even_columns(count: usize) -> Vec<Column> {
    let count = count.clamp(1, MAX_COLUMNS);
    let width = 100.0 / count as f64;
    let width = if width.fract() == 0.0 {
        format!("{}%", width as u32)
    } else {
        format!("{:.2}%", width)
    };

    (0..count).map(|_| create_column(width.clone())).collect()
}

pub fn create_columns(overrides: Option<Value>) -> BlockResult<Block> {
    let mut overrides = match overrides {
        Some(value) => Some(patch_from_value(value)?),
        None => None,
    };

    let count = match overrides.as_mut().and_then(|o| o.remove(COLUMN_COUNT_KEY)) {
        Some(Value::Number(n)) => n.as_u64().map(|n| n as usize).ok_or_else(|| {
            BlockError::InvalidOverrides(format!("{} must be a positive integer", COLUMN_COUNT_KEY))
        })?,
        Some(other) => {
            return Err(BlockError::InvalidOverrides(format!(
                "{} must be a number, got {}",
                COLUMN_COUNT_KEY, other
            )))
        }
        None => 2,
    };

    build(
        BlockKind::Columns {
            columns: create_even_columns(count),
            gap: 0,
            stack_on_mobile: true,
        },
        padded(10, 20),
        overrides.map(Value::Object),
    )
}

fn social_link(platform: &str) -> SocialLink {
    SocialLink {
        id: generate_id("link"),
        platform: platform.to_string(),
        url: "#".to_string(),
        custom_icon: None,
    }
}

pub fn create_social(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Social {
            links: vec![
                social_link("facebook"),
                social_link("twitter"),
                social_link("instagram"),
            ],
            icon_size: 32,
            icon_style: SocialIconStyle::Color,
            spacing: 8,
            align: Align::Center,
        },
        padded(10, 20),
        overrides,
    )
}

pub fn create_video(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Video {
            url: String::new(),
            thumbnail: None,
            alt: "Video".to_string(),
            play_button_color: "#ffffff".to_string(),
        },
        padded(10, 20),
        overrides,
    )
}

pub fn create_html(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Html {
            content: "<!-- Custom HTML -->".to_string(),
        },
        BlockStyles::default(),
        overrides,
    )
}

fn menu_item(text: &str) -> MenuItem {
    MenuItem {
        id: generate_id("item"),
        text: text.to_string(),
        link: "#".to_string(),
    }
}

pub fn create_menu(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Menu {
            items: vec![menu_item("Home"), menu_item("About"), menu_item("Contact")],
            layout: MenuLayout::Horizontal,
            separator: " | ".to_string(),
            align: Align::Center,
        },
        padded(10, 20),
        overrides,
    )
}

pub fn create_footer(overrides: Option<Value>) -> BlockResult<Block> {
    let styles = BlockStyles {
        font_size: Some(12),
        color: Some("#6b7280".to_string()),
        ..padded(20, 20)
    }
    .with_text_align(TextAlign::Center);

    build(
        BlockKind::Footer {
            content: "<p>&copy; Your Company. All rights reserved.</p>".to_string(),
            address: None,
            show_unsubscribe: true,
            unsubscribe_text: "Unsubscribe".to_string(),
        },
        styles,
        overrides,
    )
}

pub fn create_header(overrides: Option<Value>) -> BlockResult<Block> {
    let styles = BlockStyles {
        font_size: Some(12),
        color: Some("#6b7280".to_string()),
        ..padded(10, 20)
    }
    .with_text_align(TextAlign::Center);

    build(
        BlockKind::Header {
            content: String::new(),
            show_view_in_browser: true,
            view_in_browser_text: "View in browser".to_string(),
        },
        styles,
        overrides,
    )
}

pub fn create_logo(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::Logo {
            src: String::new(),
            alt: "Logo".to_string(),
            link: None,
            width: Some("150px".to_string()),
            align: Align::Center,
        },
        padded(20, 20),
        overrides,
    )
}

fn list_item(content: &str) -> ListItem {
    ListItem {
        id: generate_id("item"),
        content: content.to_string(),
    }
}

pub fn create_list(overrides: Option<Value>) -> BlockResult<Block> {
    build(
        BlockKind::List {
            items: vec![
                list_item("First item"),
                list_item("Second item"),
                list_item("Third item"),
            ],
            list_type: ListType::Bullet,
        },
        padded(10, 20),
        overrides,
    )
}
