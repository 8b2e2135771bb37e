use crate::store::PreviewMode;
use crate::undo_stack::DEFAULT_HISTORY_LIMIT;
use mailbuilder_compiler_html::RenderOptions;
use serde::{Deserialize, Serialize};

/// Settings an editor instance is created with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Undo levels kept before the oldest is evicted (0 = unlimited)
    pub history_limit: usize,

    /// Initial canvas zoom, in percent
    pub zoom: u32,

    pub preview_mode: PreviewMode,

    pub show_grid: bool,

    /// Options used by `get_html`
    pub render: RenderOptions,

    /// File name suggested by `export_html`
    pub export_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            zoom: 100,
            preview_mode: PreviewMode::Desktop,
            show_grid: false,
            render: RenderOptions::default(),
            export_file_name: "email-template.html".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "historyLimit": 10 }"#).unwrap();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.zoom, 100);
        assert!(config.render.full_document);
    }
}
