use mailbuilder_blocks::BlockStyles;
use std::fmt;

/// Ordered inline declaration list. Setting a property twice keeps its
/// original position and takes the latest value.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Css {
    declarations: Vec<(&'static str, String)>,
}

impl Css {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(existing) => existing.1 = value,
            None => self.declarations.push((property, value)),
        }
        self
    }

    pub fn set_opt<V: Into<String>>(&mut self, property: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(property, value);
        }
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Copy every property set on a block's style record
    pub fn extend_with(&mut self, styles: &BlockStyles) -> &mut Self {
        if let Some(padding) = &styles.padding {
            self.set("padding", padding.to_css());
        }
        if let Some(margin) = &styles.margin {
            self.set("margin", margin.to_css());
        }
        self.set_opt("background-color", styles.background_color.clone());
        if let Some(image) = &styles.background_image {
            self.set("background-image", format!("url('{}')", image));
            self.set("background-size", "cover");
            self.set("background-position", "center");
        }
        if let Some(width) = styles.border_width {
            let style = styles.border_style.unwrap_or_default();
            let color = styles.border_color.as_deref().unwrap_or("#e5e7eb");
            self.set("border", format!("{}px {} {}", width, style.as_str(), color));
        }
        self.set_opt("border-radius", styles.border_radius.map(px));
        self.set_opt("font-family", styles.font_family.clone());
        self.set_opt("font-size", styles.font_size.map(px));
        self.set_opt("font-weight", styles.font_weight.clone());
        self.set_opt("line-height", styles.line_height.clone());
        self.set_opt("color", styles.color.clone());
        self.set_opt("text-align", styles.text_align.map(|a| a.as_str()));
        self.set_opt("letter-spacing", styles.letter_spacing.clone());
        self.set_opt("text-decoration", styles.text_decoration.clone());
        self.set_opt("width", styles.width.clone());
        self.set_opt("max-width", styles.max_width.clone());
        self.set_opt("vertical-align", styles.vertical_align.map(|a| a.as_str()));
        self
    }
}

impl From<&BlockStyles> for Css {
    fn from(styles: &BlockStyles) -> Self {
        let mut css = Css::new();
        css.extend_with(styles);
        css
    }
}

impl fmt::Display for Css {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", property, value)?;
        }
        Ok(())
    }
}

pub(crate) fn px(value: u32) -> String {
    format!("{}px", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbuilder_blocks::{LineStyle, Spacing, TextAlign};

    #[test]
    fn test_later_value_wins_in_place() {
        let mut css = Css::new();
        css.set("color", "red").set("padding", "0").set("color", "blue");
        assert_eq!(css.to_string(), "color: blue; padding: 0;");
    }

    #[test]
    fn test_block_styles_become_declarations() {
        let styles = BlockStyles {
            padding: Some(Spacing::symmetric(10, 20)),
            background_color: Some("#fafafa".to_string()),
            border_width: Some(2),
            border_style: Some(LineStyle::Dashed),
            font_size: Some(14),
            ..Default::default()
        }
        .with_text_align(TextAlign::Center);

        let css = Css::from(&styles).to_string();
        assert_eq!(
            css,
            "padding: 10px 20px; background-color: #fafafa; border: 2px dashed #e5e7eb; \
             font-size: 14px; text-align: center;"
        );
    }

    #[test]
    fn test_empty_styles_render_nothing() {
        assert!(Css::from(&BlockStyles::default()).is_empty());
    }
}
