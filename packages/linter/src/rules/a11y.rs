use crate::diagnostic::Diagnostic;
use crate::linter::LintContext;
use crate::rules::LintRule;
use mailbuilder_blocks::{Block, BlockKind};

/// Images and logos need alternative text
pub struct ImageAltRule;

impl LintRule for ImageAltRule {
    fn name(&self) -> &'static str {
        "a11y-img-alt"
    }

    fn description(&self) -> &'static str {
        "Require alt text on images"
    }

    fn check_block(&self, block: &Block, _ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        match &block.kind {
            BlockKind::Image { alt, .. } | BlockKind::Logo { alt, .. } if alt.trim().is_empty() => {
                vec![Diagnostic::error(
                    self.name(),
                    "Images must have alternative text for screen readers",
                )
                .on_block(&block.id)
                .with_suggestion("Describe the image content in the alt field")]
            }
            _ => Vec::new(),
        }
    }
}

/// Buttons need visible text
pub struct ButtonTextRule;

impl LintRule for ButtonTextRule {
    fn name(&self) -> &'static str {
        "a11y-button-text"
    }

    fn description(&self) -> &'static str {
        "Require text on buttons"
    }

    fn check_block(&self, block: &Block, _ctx: &LintContext<'_>) -> Vec<Diagnostic> {
        match &block.kind {
            BlockKind::Button { text, .. } if text.trim().is_empty() => vec![Diagnostic::error(
                self.name(),
                "Buttons must have accessible text content",
            )
            .on_block(&block.id)
            .with_suggestion("Add a short call to action, e.g. 'Read more'")],
            _ => Vec::new(),
        }
    }
}
