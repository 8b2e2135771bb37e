mod a11y;
mod column_widths;
mod footer_unsubscribe;
mod no_nested_columns;
mod undefined_variable;
mod unique_ids;

pub use a11y::{ButtonTextRule, ImageAltRule};
pub use column_widths::ColumnWidthsRule;
pub use footer_unsubscribe::FooterUnsubscribeRule;
pub use no_nested_columns::NoNestedColumnsRule;
pub use undefined_variable::UndefinedVariableRule;
pub use unique_ids::UniqueIdsRule;

use crate::diagnostic::Diagnostic;
use crate::linter::LintContext;
use mailbuilder_blocks::{Block, EmailData};

/// Trait for implementing lint rules
pub trait LintRule {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check the template as a whole, once per run
    fn check_email(&self, _data: &EmailData) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check a single block, called for every block in the tree
    fn check_block(&self, _block: &Block, _ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Registry of all available lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(NoNestedColumnsRule),
                Box::new(UniqueIdsRule),
                Box::new(UndefinedVariableRule),
                Box::new(ColumnWidthsRule),
                Box::new(ImageAltRule),
                Box::new(ButtonTextRule),
                Box::new(FooterUnsubscribeRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Drop a rule by name; returns whether it was registered
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != name);
        self.rules.len() != before
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}
