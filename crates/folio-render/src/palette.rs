use folio_core::config::{DEFAULT_PALETTE, RenderConfig};

use crate::{Error, Result};

/// Ordered node colors, indexed cyclically by a node's `color_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::EmptyPalette);
        }
        if let Some(bad) = colors.iter().find(|c| !is_css_color(c)) {
            return Err(Error::InvalidColor { color: bad.clone() });
        }
        Ok(Self { colors })
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        Self::new(config.palette.clone())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }
}

// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, or a bare keyword such as `teal`.
fn is_css_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 4 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphabetic()),
    }
}
