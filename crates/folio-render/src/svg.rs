use std::fmt::Write as _;

use crate::palette::Palette;
use crate::scene::Scene;
use crate::view::ViewTransform;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `<svg>` id; also prefixes the shadow filter id.
    pub diagram_id: String,
    /// Written as a `transform` on the content group when set.
    pub view_transform: Option<ViewTransform>,
    /// When true, node boxes reference a drop-shadow filter.
    pub drop_shadow: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: "folio-mindmap".to_string(),
            view_transform: None,
            drop_shadow: true,
        }
    }
}

pub fn render_svg(scene: &Scene, palette: &Palette, options: &SvgRenderOptions) -> String {
    let vp = &scene.viewport;
    let style = &scene.style;
    let id = escape_xml(&options.diagram_id);
    let filter_id = format!("{id}-shadow");

    let mut out = String::with_capacity(256 + scene.nodes.len() * 384);
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-roledescription="mindmap">"#,
        w = fmt(vp.width),
        h = fmt(vp.height),
    );

    if options.drop_shadow {
        let _ = write!(
            &mut out,
            r#"<defs><filter id="{filter_id}" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="2" dy="2" stdDeviation="3" flood-opacity="0.15"/></filter></defs>"#,
        );
    }

    match &options.view_transform {
        Some(t) => {
            let _ = write!(
                &mut out,
                r#"<g class="viewport" transform="{}">"#,
                t.to_svg_transform()
            );
        }
        None => out.push_str(r#"<g class="viewport">"#),
    }

    out.push_str(r#"<g class="connectors">"#);
    for c in &scene.connectors {
        let _ = write!(
            &mut out,
            r#"<path d="{d}" fill="none" stroke="{stroke}" stroke-width="{sw}" stroke-opacity="{so}" stroke-linecap="round"/>"#,
            d = c.path_data(),
            stroke = escape_xml(palette.color(c.color_index)),
            sw = fmt(style.connector_width),
            so = fmt(style.connector_opacity),
        );
    }
    out.push_str("</g>");

    let font_family = escape_xml(&style.font_family);
    let label_color = escape_xml(&style.label_color);
    out.push_str(r#"<g class="nodes">"#);
    for n in &scene.nodes {
        let _ = write!(
            &mut out,
            r#"<g class="node depth-{depth}">"#,
            depth = n.depth
        );
        if let Some(full) = &n.full_label {
            out.push_str("<title>");
            escape_xml_into(&mut out, full);
            out.push_str("</title>");
        }
        let _ = write!(
            &mut out,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" ry="{r}" fill="{fill}" opacity="{o}""#,
            x = fmt(n.x),
            y = fmt(n.y),
            w = fmt(n.width),
            h = fmt(n.height),
            r = fmt(n.corner_radius),
            fill = escape_xml(palette.color(n.color_index)),
            o = fmt(style.node_opacity),
        );
        if options.drop_shadow {
            let _ = write!(&mut out, r#" filter="url(#{filter_id})""#);
        }
        out.push_str("/>");
        let _ = write!(
            &mut out,
            r#"<text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="middle" font-family="{font_family}" font-size="{fs}" font-weight="{fw}" fill="{label_color}">"#,
            x = fmt(n.label_anchor.x),
            y = fmt(n.label_anchor.y),
            fs = fmt(n.label_style.font_size),
            fw = n.label_style.font_weight,
        );
        escape_xml_into(&mut out, &n.label);
        out.push_str("</text></g>");
    }
    out.push_str("</g></g></svg>");

    tracing::debug!(bytes = out.len(), "rendered svg");
    out
}

pub(crate) fn fmt(v: f64) -> String {
    let mut out = String::new();
    fmt_into(&mut out, v);
    out
}

/// Shortest round-trippable decimal, with float noise and `-0` removed.
pub(crate) fn fmt_into(out: &mut String, v: f64) {
    if !v.is_finite() {
        out.push('0');
        return;
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }

    let _ = write!(out, "{v}");
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub(crate) fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_drop_noise_and_negative_zero() {
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(2.5), "2.5");
        assert_eq!(fmt(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(fmt(3.0000000001), "3");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_xml(r#"a<b> & "c" 'd'"#),
            "a&lt;b&gt; &amp; &quot;c&quot; &#39;d&#39;"
        );
        assert_eq!(escape_xml("plain é"), "plain é");
    }
}
