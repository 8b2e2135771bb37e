use crate::diagnostic::Diagnostic;
use crate::linter::LintContext;
use crate::rules::LintRule;
use mailbuilder_blocks::Block;

/// A `columns` block may only live at the top level
pub struct NoNestedColumnsRule;

impl LintRule for NoNestedColumnsRule {
    fn name(&self) -> &'static str {
        "no-nested-columns"
    }

    fn description(&self) -> &'static str {
        "Disallow columns blocks inside a column"
    }

    fn check_block(&self, block: &Block, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        match ctx.parent_column_id {
            Some(column_id) if block.is_columns() => vec![Diagnostic::error(
                self.name(),
                format!("Columns block is nested inside column '{}'", column_id),
            )
            .on_block(&block.id)
            .with_suggestion("Move the block to the top level of the email")],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{create_columns, EmailData};

    #[test]
    fn test_detects_nested_columns() {
        let data = EmailData::default();
        let inner = create_columns(None).unwrap();

        let top = LintContext {
            data: &data,
            parent_column_id: None,
        };
        assert!(NoNestedColumnsRule.check_block(&inner, &top).is_empty());

        let nested = LintContext {
            data: &data,
            parent_column_id: Some("column_1"),
        };
        let diagnostics = NoNestedColumnsRule.check_block(&inner, &nested);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "no-nested-columns");
        assert!(diagnostics[0].is_error());
    }
}
