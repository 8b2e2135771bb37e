use crate::diagnostic::Diagnostic;
use crate::rules::RuleRegistry;
use mailbuilder_blocks::{Block, EmailData};
use tracing::debug;

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,

    /// Rule names to skip
    pub disabled: Vec<String>,
}

/// What a rule can see besides the block it is checking
#[derive(Debug, Clone, Copy)]
pub struct LintContext<'a> {
    pub data: &'a EmailData,

    /// Column holding the block, `None` at the top level
    pub parent_column_id: Option<&'a str>,
}

/// Lint a template and return diagnostics, template-wide ones first
pub fn lint_blocks(data: &EmailData, options: LintOptions) -> Vec<Diagnostic> {
    let mut registry = options.registry.unwrap_or_default();
    for name in &options.disabled {
        registry.remove_rule(name);
    }

    let mut diagnostics = Vec::new();

    for rule in registry.rules() {
        diagnostics.extend(rule.check_email(data));
    }

    let ctx = LintContext {
        data,
        parent_column_id: None,
    };
    for block in &data.blocks {
        diagnostics.extend(lint_block(block, &ctx, &registry));
    }

    debug!(
        rules = registry.rules().len(),
        diagnostics = diagnostics.len(),
        "lint finished"
    );
    diagnostics
}

/// Recursively lint a block and the blocks in its columns
fn lint_block(block: &Block, ctx: &LintContext<'_>, registry: &RuleRegistry) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for rule in registry.rules() {
        diagnostics.extend(rule.check_block(block, ctx));
    }

    for column in block.columns() {
        let nested = LintContext {
            data: ctx.data,
            parent_column_id: Some(&column.id),
        };
        for child in &column.children {
            diagnostics.extend(lint_block(child, &nested, registry));
        }
    }

    diagnostics
}
