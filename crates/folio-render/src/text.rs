use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Measures single-line node labels.
///
/// Layout only needs a width that grows with the label; implementations backed by real font
/// metrics can be swapped in through [`crate::LayoutOptions`].
pub trait TextMeasurer {
    fn measure(&self, text: &str) -> TextMetrics;
}

/// Fixed-advance measurer: every display column is `char_width` pixels wide.
///
/// Wide (CJK) characters count as two columns, zero-width marks as none.
#[derive(Debug, Clone)]
pub struct DeterministicTextMeasurer {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for DeterministicTextMeasurer {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl DeterministicTextMeasurer {
    pub fn with_char_width(char_width: f64) -> Self {
        Self {
            char_width,
            ..Self::default()
        }
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str) -> TextMetrics {
        let char_width = if self.char_width > 0.0 {
            self.char_width
        } else {
            8.0
        };
        TextMetrics {
            width: text.width() as f64 * char_width,
            height: self.line_height,
        }
    }
}
