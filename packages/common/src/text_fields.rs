use mailbuilder_blocks::{Block, BlockKind};

/// User-facing strings of a block that pass through variable substitution.
///
/// Columns contribute nothing here; their children are separate blocks.
pub fn text_fields(block: &Block) -> Vec<&str> {
    match &block.kind {
        BlockKind::Text { content } | BlockKind::Html { content } => vec![content.as_str()],
        BlockKind::Heading { content, .. } => vec![content.as_str()],
        BlockKind::Image { src, alt, link, .. } | BlockKind::Logo { src, alt, link, .. } => {
            let mut fields = vec![src.as_str(), alt.as_str()];
            fields.extend(link.as_deref());
            fields
        }
        BlockKind::Button { text, link, .. } => vec![text.as_str(), link.as_str()],
        BlockKind::Divider { .. } | BlockKind::Spacer { .. } | BlockKind::Columns { .. } => {
            Vec::new()
        }
        BlockKind::Social { links, .. } => links.iter().map(|l| l.url.as_str()).collect(),
        BlockKind::Video { url, alt, .. } => vec![url.as_str(), alt.as_str()],
        BlockKind::Menu { items, .. } => items
            .iter()
            .flat_map(|item| [item.text.as_str(), item.link.as_str()])
            .collect(),
        BlockKind::Footer {
            content,
            address,
            unsubscribe_text,
            ..
        } => {
            let mut fields = vec![content.as_str(), unsubscribe_text.as_str()];
            fields.extend(address.as_deref());
            fields
        }
        BlockKind::Header {
            content,
            view_in_browser_text,
            ..
        } => vec![content.as_str(), view_in_browser_text.as_str()],
        BlockKind::List { items, .. } => items.iter().map(|i| i.content.as_str()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{create_button, create_columns, create_menu};
    use serde_json::json;

    #[test]
    fn test_button_fields() {
        let block = create_button(Some(json!({ "text": "Hi {{ name }}", "link": "{{ url }}" }))).unwrap();
        assert_eq!(text_fields(&block), vec!["Hi {{ name }}", "{{ url }}"]);
    }

    #[test]
    fn test_menu_fields_include_links() {
        let block = create_menu(None).unwrap();
        assert_eq!(text_fields(&block).len(), 6);
    }

    #[test]
    fn test_columns_have_no_own_text() {
        let block = create_columns(None).unwrap();
        assert!(text_fields(&block).is_empty());
    }
}
