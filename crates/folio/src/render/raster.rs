use folio_core::MindMap;

use super::{FolioError, MapRenderer};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Folio(#[from] FolioError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color: {0}")]
    Background(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;

/// PNG export settings. The defaults (2x, white) give a crisp image for sharing.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: Some("white".to_string()),
        }
    }
}

/// Lays out and rasterizes outline text.
pub fn render_png(renderer: &MapRenderer, text: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    svg_to_png(&renderer.render_svg_text(text), options)
}

pub fn render_map_png(
    renderer: &MapRenderer,
    map: &MindMap,
    options: &RasterOptions,
) -> Result<Vec<u8>> {
    svg_to_png(&renderer.render_map_svg(map), options)
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, options: &RasterOptions) -> Result<tiny_skia::Pixmap> {
    let background = options
        .background
        .as_deref()
        .map(|bg| parse_tiny_skia_color(bg).ok_or_else(|| RasterError::Background(bg.into())))
        .transpose()?;

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    // Nunito is rarely installed; fall back to a common sans face.
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // Map SVGs always carry a `0 0 W H` viewBox, which usvg turns into the tree size.
    let size = tree.size();
    let scale = if options.scale.is_finite() && options.scale > 0.0 {
        options.scale
    } else {
        1.0
    };
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    if let Some(color) = background {
        pixmap.fill(color);
    }

    tracing::debug!(width_px, height_px, scale, "rasterizing map");
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    let nibble = |c: u8| (c as char).to_digit(16).map(|v| v as u8);
    let short = |c: u8| nibble(c).map(|v| (v << 4) | v);
    let pair = |hi: u8, lo: u8| Some((nibble(hi)? << 4) | nibble(lo)?);

    let b = hex.as_bytes();
    let (r, g, bl, a) = match b.len() {
        3 => (short(b[0])?, short(b[1])?, short(b[2])?, 255),
        4 => (short(b[0])?, short(b[1])?, short(b[2])?, short(b[3])?),
        6 => (pair(b[0], b[1])?, pair(b[2], b[3])?, pair(b[4], b[5])?, 255),
        8 => (
            pair(b[0], b[1])?,
            pair(b[2], b[3])?,
            pair(b[4], b[5])?,
            pair(b[6], b[7])?,
        ),
        _ => return None,
    };
    Some(tiny_skia::Color::from_rgba8(r, g, bl, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn svg_to_png_produces_png_signature() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="10" height="10" fill="black"/></svg>"#;
        let bytes = svg_to_png(svg, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn map_renders_at_double_scale() {
        let renderer = MapRenderer::default();
        let svg = renderer.render_svg_text("Root\n\tChild");
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
        let pixmap = svg_to_pixmap(&svg, &RasterOptions::default()).unwrap();
        assert_eq!(pixmap.width(), (tree.size().width() * 2.0).ceil() as u32);
    }

    #[test]
    fn map_png_uses_the_stored_outline() {
        let renderer = MapRenderer::default();
        let map = MindMap::new("m", "Root\n\tA\n\tB", chrono::Utc::now());
        let options = RasterOptions {
            scale: 1.0,
            background: None,
        };
        let bytes = render_map_png(&renderer, &map, &options).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));

        let svg = renderer.render_map_svg(&map);
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
        let pixmap = tiny_skia::Pixmap::decode_png(&bytes).unwrap();
        assert_eq!(pixmap.width(), tree.size().width().ceil() as u32);
        assert_eq!(pixmap.height(), tree.size().height().ceil() as u32);
    }

    #[test]
    fn parses_background_colors() {
        assert!(parse_tiny_skia_color("white").is_some());
        assert!(parse_tiny_skia_color("#fff").is_some());
        assert!(parse_tiny_skia_color("#ffffff80").is_some());
        assert!(parse_tiny_skia_color("#ggg").is_none());
        assert!(parse_tiny_skia_color("chartreuse").is_none());
    }

    #[test]
    fn bad_background_is_an_error() {
        let options = RasterOptions {
            background: Some("nope".to_string()),
            ..RasterOptions::default()
        };
        let err = svg_to_png("<svg/>", &options).unwrap_err();
        assert!(matches!(err, RasterError::Background(_)));
    }
}
