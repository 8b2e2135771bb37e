use crate::diagnostic::Diagnostic;
use crate::linter::LintContext;
use crate::rules::LintRule;
use mailbuilder_blocks::Block;

/// Rounding slack, e.g. three columns of 33.33%
const TOLERANCE: f64 = 0.5;

/// Column widths of a `columns` block should add up to 100%
pub struct ColumnWidthsRule;

impl LintRule for ColumnWidthsRule {
    fn name(&self) -> &'static str {
        "column-widths"
    }

    fn description(&self) -> &'static str {
        "Require column percentages to sum to 100"
    }

    fn check_block(&self, block: &Block, _ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let columns = block.columns();
        if columns.is_empty() {
            return Vec::new();
        }

        let mut total = 0.0;
        for column in columns {
            match column.width_percent() {
                Some(width) => total += width,
                None => {
                    return vec![Diagnostic::warning(
                        self.name(),
                        format!("Column '{}' width '{}' is not a percentage", column.id, column.width),
                    )
                    .on_block(&block.id)
                    .with_suggestion("Use percentage widths such as '50%'")]
                }
            }
        }

        if (total - 100.0).abs() > TOLERANCE {
            vec![Diagnostic::warning(
                self.name(),
                format!("Column widths add up to {}%", total),
            )
            .on_block(&block.id)
            .with_suggestion("Adjust the widths so they total 100%")]
        } else {
            Vec::new()
        }
    }
}
