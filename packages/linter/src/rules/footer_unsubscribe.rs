use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use mailbuilder_blocks::{Block, BlockKind, EmailData};
use mailbuilder_common::UNSUBSCRIBE_LINK;

/// Bulk email needs a visible way to unsubscribe
pub struct FooterUnsubscribeRule;

impl LintRule for FooterUnsubscribeRule {
    fn name(&self) -> &'static str {
        "footer-unsubscribe"
    }

    fn description(&self) -> &'static str {
        "Require an unsubscribe link somewhere in the email"
    }

    fn check_email(&self, data: &EmailData) -> Vec<Diagnostic> {
        if data.blocks.is_empty() || has_unsubscribe(&data.blocks) {
            return Vec::new();
        }

        vec![Diagnostic::warning(self.name(), "The email has no unsubscribe link")
            .with_suggestion(format!(
                "Add a footer block with the unsubscribe link enabled, or link to {{{{ {} }}}}",
                UNSUBSCRIBE_LINK
            ))]
    }
}

fn has_unsubscribe(blocks: &[Block]) -> bool {
    let token = |text: &str| text.contains(UNSUBSCRIBE_LINK);

    blocks.iter().any(|block| {
        let own = match &block.kind {
            BlockKind::Footer {
                show_unsubscribe,
                content,
                ..
            } => *show_unsubscribe || token(content),
            BlockKind::Text { content } | BlockKind::Html { content } => token(content),
            BlockKind::Button { link, .. } => token(link),
            BlockKind::Menu { items, .. } => items.iter().any(|item| token(&item.link)),
            _ => false,
        };
        own || block.columns().iter().any(|column| has_unsubscribe(&column.children))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{create_columns, create_footer, create_html, create_text, EmailStyles};
    use serde_json::json;

    fn email(blocks: Vec<Block>) -> EmailData {
        EmailData::new(blocks, EmailStyles::default(), vec![])
    }

    #[test]
    fn test_missing_unsubscribe() {
        let diagnostics = FooterUnsubscribeRule.check_email(&email(vec![create_text(None).unwrap()]));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].suggestion.as_ref().unwrap().contains("{{ unsubscribe_link }}"));
    }

    #[test]
    fn test_footer_link_satisfies_rule() {
        assert!(FooterUnsubscribeRule
            .check_email(&email(vec![create_footer(None).unwrap()]))
            .is_empty());

        let hidden_link = create_footer(Some(json!({ "showUnsubscribe": false }))).unwrap();
        assert_eq!(FooterUnsubscribeRule.check_email(&email(vec![hidden_link])).len(), 1);
    }

    #[test]
    fn test_custom_link_inside_column() {
        let mut columns = create_columns(None).unwrap();
        columns.columns_mut().unwrap()[1].children.push(
            create_html(Some(json!({ "content": "<a href=\"{{unsubscribe_link}}\">Opt out</a>" }))).unwrap(),
        );

        assert!(FooterUnsubscribeRule.check_email(&email(vec![columns])).is_empty());
    }

    #[test]
    fn test_empty_email_is_not_flagged() {
        assert!(FooterUnsubscribeRule.check_email(&email(vec![])).is_empty());
    }
}
