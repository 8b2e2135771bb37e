//! Email-wide settings, template variables and the persisted document shape.

use crate::block::Block;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current version of the persisted `EmailData` shape
pub const EMAIL_DATA_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyStyles {
    pub background_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub line_height: String,
    pub color: String,
}

impl Default for BodyStyles {
    fn default() -> Self {
        Self {
            background_color: "#f4f4f5".to_string(),
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            font_size: 16,
            line_height: "1.5".to_string(),
            color: "#333333".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerStyles {
    /// Max width of the content column in pixels
    pub width: u32,
    pub background_color: String,
    pub padding: u32,
    pub border_radius: u32,
}

impl Default for ContainerStyles {
    fn default() -> Self {
        Self {
            width: 600,
            background_color: "#ffffff".to_string(),
            padding: 0,
            border_radius: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkStyles {
    pub color: String,
    pub text_decoration: String,
}

impl Default for LinkStyles {
    fn default() -> Self {
        Self {
            color: "#3b82f6".to_string(),
            text_decoration: "underline".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingStyle {
    pub font_size: u32,
    #[serde(default = "default_heading_weight")]
    pub font_weight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
}

fn default_heading_weight() -> String {
    "bold".to_string()
}

impl HeadingStyle {
    fn sized(font_size: u32) -> Self {
        Self {
            font_size,
            font_weight: default_heading_weight(),
            color: None,
            font_family: None,
            line_height: Some("1.25".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingStyles {
    pub h1: HeadingStyle,
    pub h2: HeadingStyle,
    pub h3: HeadingStyle,
    pub h4: HeadingStyle,
    pub h5: HeadingStyle,
    pub h6: HeadingStyle,
}

impl HeadingStyles {
    pub fn get(&self, level: u8) -> &HeadingStyle {
        match level {
            0 | 1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            _ => &self.h6,
        }
    }
}

impl Default for HeadingStyles {
    fn default() -> Self {
        Self {
            h1: HeadingStyle::sized(32),
            h2: HeadingStyle::sized(24),
            h3: HeadingStyle::sized(20),
            h4: HeadingStyle::sized(18),
            h5: HeadingStyle::sized(16),
            h6: HeadingStyle::sized(14),
        }
    }
}

/// Email-wide style groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailStyles {
    pub body: BodyStyles,
    pub container: ContainerStyles,
    pub link: LinkStyles,
    pub headings: HeadingStyles,
}

/// Template variable, referenced in content as `{{ key }}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    /// Display name
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl Variable {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            key: key.into(),
            default_value: default_value.into(),
            description: None,
            category: None,
            required: None,
        }
    }

    /// Keys match `^[A-Za-z_][A-Za-z0-9_]*$`
    pub fn is_valid_key(key: &str) -> bool {
        let mut chars = key.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: String,
}

impl EmailMetadata {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            version: EMAIL_DATA_VERSION.to_string(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for EmailMetadata {
    fn default() -> Self {
        Self::now()
    }
}

/// Save/load contract of an email template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailData {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub styles: EmailStyles,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub metadata: EmailMetadata,
}

impl EmailData {
    pub fn new(blocks: Vec<Block>, styles: EmailStyles, variables: Vec<Variable>) -> Self {
        Self {
            blocks,
            styles,
            variables,
            metadata: EmailMetadata::now(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for EmailData {
    fn default() -> Self {
        Self::new(Vec::new(), EmailStyles::default(), Vec::new())
    }
}
