use crate::error::BlockError;
use crate::style::{
    Align, BlockStyles, ButtonStyle, DividerStyle, HeadingLevel, ListType, MenuLayout,
    SocialIconStyle,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag of every block variant, including `column`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Heading,
    Image,
    Button,
    Divider,
    Spacer,
    Columns,
    Column,
    Social,
    Video,
    Html,
    Menu,
    Footer,
    Header,
    Logo,
    List,
}

impl BlockType {
    pub const ALL: [BlockType; 16] = [
        BlockType::Text,
        BlockType::Heading,
        BlockType::Image,
        BlockType::Button,
        BlockType::Divider,
        BlockType::Spacer,
        BlockType::Columns,
        BlockType::Column,
        BlockType::Social,
        BlockType::Video,
        BlockType::Html,
        BlockType::Menu,
        BlockType::Footer,
        BlockType::Header,
        BlockType::Logo,
        BlockType::List,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Heading => "heading",
            BlockType::Image => "image",
            BlockType::Button => "button",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::Columns => "columns",
            BlockType::Column => "column",
            BlockType::Social => "social",
            BlockType::Video => "video",
            BlockType::Html => "html",
            BlockType::Menu => "menu",
            BlockType::Footer => "footer",
            BlockType::Header => "header",
            BlockType::Logo => "logo",
            BlockType::List => "list",
        }
    }

    /// Human-readable name, used for sidebar templates and drag ghosts
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Text => "Text",
            BlockType::Heading => "Heading",
            BlockType::Image => "Image",
            BlockType::Button => "Button",
            BlockType::Divider => "Divider",
            BlockType::Spacer => "Spacer",
            BlockType::Columns => "Columns",
            BlockType::Column => "Column",
            BlockType::Social => "Social Links",
            BlockType::Video => "Video",
            BlockType::Html => "HTML",
            BlockType::Menu => "Menu",
            BlockType::Footer => "Footer",
            BlockType::Header => "Header",
            BlockType::Logo => "Logo",
            BlockType::List => "List",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| BlockError::UnknownType(s.to_string()))
    }
}

/// A single content or layout unit in an email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Stable for the block's lifetime
    pub id: String,

    #[serde(default)]
    pub styles: BlockStyles,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,

    #[serde(flatten)]
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            styles: BlockStyles::default(),
            locked: None,
            hidden: None,
            kind,
        }
    }

    pub fn with_styles(mut self, styles: BlockStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    pub fn is_columns(&self) -> bool {
        matches!(self.kind, BlockKind::Columns { .. })
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }

    /// Columns owned by this block (empty unless it is a `columns` block)
    pub fn columns(&self) -> &[Column] {
        match &self.kind {
            BlockKind::Columns { columns, .. } => columns,
            _ => &[],
        }
    }

    pub fn columns_mut(&mut self) -> Option<&mut Vec<Column>> {
        match &mut self.kind {
            BlockKind::Columns { columns, .. } => Some(columns),
            _ => None,
        }
    }
}

/// Type-specific payload of a block.
///
/// `column` is deliberately absent: columns only exist inside
/// [`BlockKind::Columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum BlockKind {
    Text {
        #[serde(default)]
        content: String,
    },

    Heading {
        #[serde(default)]
        content: String,
        #[serde(default)]
        level: HeadingLevel,
    },

    Image {
        #[serde(default)]
        src: String,
        #[serde(default)]
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<String>,
        #[serde(default)]
        align: Align,
    },

    Button {
        #[serde(default)]
        text: String,
        #[serde(default)]
        link: String,
        #[serde(default)]
        button_style: ButtonStyle,
        #[serde(default)]
        align: Align,
    },

    Divider {
        #[serde(default)]
        divider_style: DividerStyle,
    },

    Spacer {
        #[serde(default)]
        height: u32,
    },

    Columns {
        #[serde(default)]
        columns: Vec<Column>,
        #[serde(default)]
        gap: u32,
        #[serde(default)]
        stack_on_mobile: bool,
    },

    Social {
        #[serde(default)]
        links: Vec<SocialLink>,
        #[serde(default)]
        icon_size: u32,
        #[serde(default)]
        icon_style: SocialIconStyle,
        #[serde(default)]
        spacing: u32,
        #[serde(default)]
        align: Align,
    },

    Video {
        #[serde(default)]
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
        #[serde(default)]
        alt: String,
        #[serde(default)]
        play_button_color: String,
    },

    Html {
        #[serde(default)]
        content: String,
    },

    Menu {
        #[serde(default)]
        items: Vec<MenuItem>,
        #[serde(default)]
        layout: MenuLayout,
        #[serde(default)]
        separator: String,
        #[serde(default)]
        align: Align,
    },

    Footer {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
        #[serde(default)]
        show_unsubscribe: bool,
        #[serde(default)]
        unsubscribe_text: String,
    },

    Header {
        #[serde(default)]
        content: String,
        #[serde(default)]
        show_view_in_browser: bool,
        #[serde(default)]
        view_in_browser_text: String,
    },

    Logo {
        #[serde(default)]
        src: String,
        #[serde(default)]
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<String>,
        #[serde(default)]
        align: Align,
    },

    List {
        #[serde(default)]
        items: Vec<ListItem>,
        #[serde(default)]
        list_type: ListType,
    },
}

impl BlockKind {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Text { .. } => BlockType::Text,
            BlockKind::Heading { .. } => BlockType::Heading,
            BlockKind::Image { .. } => BlockType::Image,
            BlockKind::Button { .. } => BlockType::Button,
            BlockKind::Divider { .. } => BlockType::Divider,
            BlockKind::Spacer { .. } => BlockType::Spacer,
            BlockKind::Columns { .. } => BlockType::Columns,
            BlockKind::Social { .. } => BlockType::Social,
            BlockKind::Video { .. } => BlockType::Video,
            BlockKind::Html { .. } => BlockType::Html,
            BlockKind::Menu { .. } => BlockType::Menu,
            BlockKind::Footer { .. } => BlockType::Footer,
            BlockKind::Header { .. } => BlockType::Header,
            BlockKind::Logo { .. } => BlockType::Logo,
            BlockKind::List { .. } => BlockType::List,
        }
    }
}

/// Marker serialized as `"type": "column"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnTag {
    #[default]
    Column,
}

/// Child container owned by a `columns` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,

    #[serde(rename = "type", default)]
    pub tag: ColumnTag,

    /// Percentage string, e.g. `"50%"`
    pub width: String,

    #[serde(default)]
    pub styles: BlockStyles,

    /// Never contains a `columns` block
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Column {
    pub fn new(id: impl Into<String>, width: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: ColumnTag::Column,
            width: width.into(),
            styles: BlockStyles::default(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Width as a number, if the width string is a plain percentage
    pub fn width_percent(&self) -> Option<f64> {
        self.width.trim().strip_suffix('%')?.trim().parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: String,
    /// Platform name, e.g. `facebook`; resolved to an icon at render time
    pub platform: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    pub content: String,
}
