use crate::config::{LayoutConfig, RenderConfig};
use crate::dates::format_date;
use crate::ir::Person;
use crate::layout::{DescentLink, FamilyLayout, NodePosition, SpouseLink, descent_touches};
use crate::text_metrics::fit_to_width;
use crate::theme::Theme;
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

const CARD_RADIUS: f32 = 12.0;
const ACCENT_WIDTH: f32 = 6.0;
const TEXT_INSET: f32 = 14.0;
const HEART_SIZE: f32 = 9.0;

/// Layout coordinates are centred on x = 0; the SVG canvas starts at the
/// padded top-left corner of the card bounds.
struct Canvas {
    dx: f32,
    dy: f32,
}

impl Canvas {
    fn x(&self, x: f32) -> f32 {
        x + self.dx
    }

    fn y(&self, y: f32) -> f32 {
        y + self.dy
    }
}

pub fn render_svg(
    layout: &FamilyLayout<'_>,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
    highlight: &BTreeSet<String>,
) -> String {
    let mut svg = String::new();
    let width = (layout.width + render.padding * 2.0).max(200.0);
    let height = (layout.height + render.padding * 2.0).max(200.0);
    let canvas = Canvas {
        dx: render.padding - layout.min_x + (width - layout.width - render.padding * 2.0) / 2.0,
        dy: render.padding - layout.min_y,
    };

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render.background
    ));

    for link in &layout.descent_links {
        svg.push_str(&descent_svg(link, &canvas, theme, highlight));
    }
    for link in &layout.spouse_links {
        let lit = highlight.contains(&link.left) && highlight.contains(&link.right);
        svg.push_str(&spouse_svg(link, &canvas, theme, lit));
    }
    for node in layout.nodes.values() {
        let lit = highlight.contains(&node.person.id);
        svg.push_str(&card_svg(node, &canvas, theme, config, render, lit));
    }

    svg.push_str("</svg>");
    svg
}

fn descent_svg(
    link: &DescentLink,
    canvas: &Canvas,
    theme: &Theme,
    highlight: &BTreeSet<String>,
) -> String {
    let from_lit = descent_touches(link, highlight);
    let stroke = |lit: bool| {
        if lit {
            (theme.highlight_color.as_str(), 2.5)
        } else {
            (theme.line_color.as_str(), 1.5)
        }
    };
    let mut out = String::new();
    let any_child_lit = link.stubs.iter().any(|s| highlight.contains(&s.child));
    let (color, width) = stroke(from_lit && any_child_lit);
    let x = canvas.x(link.x);
    let drop_y = canvas.y(link.drop_y);
    out.push_str(&format!(
        "<path d=\"M {x:.2} {:.2} L {x:.2} {drop_y:.2} M {:.2} {drop_y:.2} L {:.2} {drop_y:.2}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
        canvas.y(link.parent_bottom),
        canvas.x(link.bar_x1),
        canvas.x(link.bar_x2),
    ));
    for stub in &link.stubs {
        let (color, width) = stroke(from_lit && highlight.contains(&stub.child));
        let sx = canvas.x(stub.x);
        out.push_str(&format!(
            "<line x1=\"{sx:.2}\" y1=\"{drop_y:.2}\" x2=\"{sx:.2}\" y2=\"{:.2}\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
            canvas.y(stub.top_y),
        ));
    }
    out
}

fn spouse_svg(link: &SpouseLink, canvas: &Canvas, theme: &Theme, lit: bool) -> String {
    let (color, width) = if lit {
        (theme.highlight_color.as_str(), 2.5)
    } else {
        (theme.spouse_line_color.as_str(), 2.0)
    };
    let y = canvas.y(link.y);
    let mut out = format!(
        "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
        canvas.x(link.x1),
        canvas.x(link.x2),
    );
    let cx = canvas.x(link.mid_x);
    out.push_str(&format!(
        "<circle cx=\"{cx:.2}\" cy=\"{y:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{color}\" stroke-width=\"1\"/>",
        HEART_SIZE + 3.0,
        theme.spouse_marker_fill
    ));
    out.push_str(&format!(
        "<path d=\"{}\" fill=\"{color}\"/>",
        heart_path(cx, y, HEART_SIZE)
    ));
    out
}

/// Two arcs over a point, centred on (cx, cy).
fn heart_path(cx: f32, cy: f32, size: f32) -> String {
    let r = size / 4.0;
    let top = cy - size / 4.0;
    let bottom = cy + size / 2.0;
    format!(
        "M {cx:.2} {bottom:.2} L {:.2} {top:.2} A {r:.2} {r:.2} 0 0 1 {cx:.2} {:.2} A {r:.2} {r:.2} 0 0 1 {:.2} {top:.2} Z",
        cx - size / 2.0,
        top - r / 2.0,
        cx + size / 2.0,
    )
}

fn card_svg(
    node: &NodePosition<'_>,
    canvas: &Canvas,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
    lit: bool,
) -> String {
    let person = node.person;
    let palette = theme.palette(person.gender);
    let (fill, border, border_width) = if lit {
        (theme.highlight_fill.as_str(), theme.highlight_color.as_str(), 3.0)
    } else {
        (palette.fill.as_str(), palette.border.as_str(), 1.4)
    };
    let left = canvas.x(node.x) - config.node_width / 2.0;
    let top = canvas.y(node.y) - config.node_height / 2.0;
    let mut out = format!(
        "<g data-person=\"{}\"><rect x=\"{left:.2}\" y=\"{top:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{CARD_RADIUS}\" ry=\"{CARD_RADIUS}\" fill=\"{fill}\" stroke=\"{border}\" stroke-width=\"{border_width}\"/>",
        escape_xml(&person.id),
        config.node_width,
        config.node_height,
    );
    out.push_str(&format!(
        "<rect x=\"{left:.2}\" y=\"{:.2}\" width=\"{ACCENT_WIDTH}\" height=\"{:.2}\" fill=\"{}\"/>",
        top + CARD_RADIUS,
        (config.node_height - CARD_RADIUS * 2.0).max(0.0),
        palette.accent
    ));

    let text_x = left + ACCENT_WIDTH + TEXT_INSET;
    let text_width = config.node_width - ACCENT_WIDTH - TEXT_INSET * 2.0;
    let mut lines: Vec<(String, f32, &str, &str)> = Vec::new();
    let name_size = theme.font_size + 1.0;
    lines.push((
        fit_to_width(&person.display_name(), text_width, name_size, &theme.font_family),
        name_size,
        theme.text_color.as_str(),
        "600",
    ));
    let small = (theme.font_size - 2.0).max(8.0);
    if render.show_lifespan {
        lines.push((
            fit_to_width(&lifespan(person), text_width, small, &theme.font_family),
            small,
            theme.muted_text_color.as_str(),
            "400",
        ));
    }
    if let Some(occupation) = person.occupation.as_deref().filter(|o| !o.trim().is_empty()) {
        lines.push((
            fit_to_width(occupation, text_width, small, &theme.font_family),
            small,
            theme.muted_text_color.as_str(),
            "400",
        ));
    }

    let block_height: f32 = lines.iter().map(|(_, size, _, _)| size * 1.35).sum();
    let mut baseline = canvas.y(node.y) - block_height / 2.0;
    for (text, size, color, weight) in lines {
        baseline += size * 1.35;
        out.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{size}\" font-weight=\"{weight}\" fill=\"{color}\">{}</text>",
            baseline - size * 0.35,
            escape_xml(&theme.font_family),
            escape_xml(&text)
        ));
    }
    out.push_str("</g>");
    out
}

fn lifespan(person: &Person) -> String {
    let born = format_date(Some(person.birth_date.as_str()));
    if person.is_living() {
        format!("b. {born}")
    } else {
        format!("{born} \u{2013} {}", format_date(person.death_date.as_deref()))
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .map(|f| f.trim().trim_matches('"').to_string())
        .find(|f| !f.is_empty())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Gender;
    use crate::layout::testing::FamilyBuilder;
    use crate::layout::{compute_layout, related_ids};

    fn family() -> Vec<Person> {
        let mut people = FamilyBuilder::new()
            .person("a", "1900")
            .gender("a", Gender::Male)
            .person("b", "1902")
            .gender("b", Gender::Female)
            .married("a", "b")
            .child(&["a", "b"], "c", "1930")
            .child(&["a", "b"], "d", "1933")
            .build();
        people[0].first_name = "Tom & Jerry".to_string();
        people[0].death_date = Some("1970".to_string());
        people
    }

    #[test]
    fn render_svg_basic() {
        let people = family();
        let config = LayoutConfig::default();
        let layout = compute_layout(&people, &config);
        let theme = Theme::classic();
        let svg = render_svg(&layout, &theme, &config, &RenderConfig::default(), &BTreeSet::new());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Tom &amp; Jerry"));
        assert!(svg.contains("1900 \u{2013} 1970"));
        assert!(svg.contains("b. 1902"));
        assert!(svg.contains(&theme.female.fill));
        assert_eq!(svg.matches("<g data-person=").count(), 4);
        assert!(!svg.contains(&theme.highlight_color));
    }

    #[test]
    fn highlight_recolours_related_cards() {
        let people = family();
        let config = LayoutConfig::default();
        let layout = compute_layout(&people, &config);
        let theme = Theme::classic();
        let related = related_ids(&people, "c");
        let svg = render_svg(&layout, &theme, &config, &RenderConfig::default(), &related);
        let lit_cards = svg.matches(&format!("fill=\"{}\"", theme.highlight_fill)).count();
        // c plus both parents; d is a sibling and stays plain.
        assert_eq!(lit_cards, 3);
    }

    #[test]
    fn empty_layout_renders_blank_canvas() {
        let layout = FamilyLayout::default();
        let svg = render_svg(
            &layout,
            &Theme::modern(),
            &LayoutConfig::default(),
            &RenderConfig::default(),
            &BTreeSet::new(),
        );
        assert!(svg.contains("width=\"200\""));
        assert!(!svg.contains("<g "));
    }
}
