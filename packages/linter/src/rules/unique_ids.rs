use crate::diagnostic::Diagnostic;
use crate::rules::LintRule;
use mailbuilder_blocks::{Block, EmailData};
use std::collections::HashSet;

/// Block and column ids must be unique across the whole tree
pub struct UniqueIdsRule;

impl LintRule for UniqueIdsRule {
    fn name(&self) -> &'static str {
        "unique-ids"
    }

    fn description(&self) -> &'static str {
        "Require every block and column id to be unique"
    }

    fn check_email(&self, data: &EmailData) -> Vec<Diagnostic> {
        let mut seen = HashSet::new();
        let mut diagnostics = Vec::new();
        collect(&data.blocks, &mut seen, &mut diagnostics);
        diagnostics
    }
}

fn collect<'a>(blocks: &'a [Block], seen: &mut HashSet<&'a str>, diagnostics: &mut Vec<Diagnostic>) {
    for block in blocks {
        report_if_seen(&block.id, seen, diagnostics);
        for column in block.columns() {
            report_if_seen(&column.id, seen, diagnostics);
            collect(&column.children, seen, diagnostics);
        }
    }
}

fn report_if_seen<'a>(id: &'a str, seen: &mut HashSet<&'a str>, diagnostics: &mut Vec<Diagnostic>) {
    if !seen.insert(id) {
        diagnostics.push(
            Diagnostic::error("unique-ids", format!("Id '{}' is used more than once", id))
                .on_block(id)
                .with_suggestion("Duplicate the block through the editor so it gets fresh ids"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{create_columns, create_text, EmailStyles};

    #[test]
    fn test_detects_duplicate_ids() {
        let text = create_text(None).unwrap();
        let mut columns = create_columns(None).unwrap();
        columns.columns_mut().unwrap()[0].children.push(text.clone());

        let data = EmailData::new(vec![text.clone(), columns], EmailStyles::default(), vec![]);
        let diagnostics = UniqueIdsRule.check_email(&data);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].block_id.as_ref(), Some(&text.id));
    }

    #[test]
    fn test_allows_unique_ids() {
        let data = EmailData::new(
            vec![create_text(None).unwrap(), create_columns(None).unwrap()],
            EmailStyles::default(),
            vec![],
        );
        assert!(UniqueIdsRule.check_email(&data).is_empty());
    }
}
