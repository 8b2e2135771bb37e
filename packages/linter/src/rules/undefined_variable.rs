use crate::diagnostic::Diagnostic;
use crate::linter::LintContext;
use crate::rules::LintRule;
use mailbuilder_blocks::Block;
use mailbuilder_common::{extract_variables, text_fields, UNSUBSCRIBE_LINK, VIEW_IN_BROWSER_LINK};

/// Every `{{ key }}` must be declared as a template variable
pub struct UndefinedVariableRule;

impl LintRule for UndefinedVariableRule {
    fn name(&self) -> &'static str {
        "undefined-variable"
    }

    fn description(&self) -> &'static str {
        "Warn about merge tags with no matching variable"
    }

    fn check_block(&self, block: &Block, ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        let mut keys: Vec<String> = Vec::new();
        for text in text_fields(block) {
            for key in extract_variables(text) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }

        keys.into_iter()
            .filter(|key| key != UNSUBSCRIBE_LINK && key != VIEW_IN_BROWSER_LINK)
            .filter(|key| !ctx.data.variables.iter().any(|v| &v.key == key))
            .map(|key| {
                Diagnostic::warning(
                    self.name(),
                    format!("Variable '{}' is not defined and will be left as-is", key),
                )
                .on_block(&block.id)
                .with_suggestion(format!("Add a variable with key '{}' or fix the merge tag", key))
            })
            .collect()
    }
}
