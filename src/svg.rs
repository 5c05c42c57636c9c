use crate::extract::FragmentMap;

/// Build the SVG document for a `width x height` grid.
///
/// Colors are emitted in ascending `(r, g, b, a)` order, one `<path>` each,
/// so the output is byte-identical for equal inputs. With `scale > 1` the
/// paths are wrapped in a single scaling group instead of rescaling every
/// coordinate.
pub fn compose_svg(width: u32, height: u32, scale: u32, fragments: &FragmentMap) -> String {
    let mut svg = format!(
        r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg" shape-rendering="crispEdges">"#,
        u64::from(width) * u64::from(scale),
        u64::from(height) * u64::from(scale),
    );

    if scale > 1 {
        svg.push_str(&format!(r#"<g transform="scale({scale})">"#));
    }

    for (color, paths) in fragments {
        if paths.is_empty() {
            continue;
        }
        svg.push_str(&format!(r#"<path fill="{color}""#));
        if !color.is_opaque() {
            let opacity = f64::from(color.a) / 255.0;
            svg.push_str(&format!(r#" fill-opacity="{opacity:.2}""#));
        }
        svg.push_str(r#" d=""#);
        svg.push_str(&paths.join(" "));
        svg.push_str(r#""/>"#);
    }

    if scale > 1 {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}
