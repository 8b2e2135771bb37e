mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use linter::{lint_blocks, LintContext, LintOptions};
pub use rules::{LintRule, RuleRegistry};
