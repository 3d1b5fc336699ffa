use crate::config::RenderConfig;
use crate::ir::{FamilyTree, Person, PersonId};
use crate::layout::{Layout, SegmentKind};
use crate::theme::Theme;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

const SPOUSE_STROKE_WIDTH: f32 = 4.0;
const LINE_STROKE_WIDTH: f32 = 2.0;
const BOX_STROKE_WIDTH: f32 = 2.0;
const NAME_OFFSET_Y: f32 = -18.0;
const DEATH_OFFSET_Y: f32 = 18.0;

pub fn render_svg(layout: &Layout, tree: &FamilyTree, theme: &Theme, config: &RenderConfig) -> String {
    let pad = config.padding;
    let (offset_x, offset_y, width, height) = match layout.bounds {
        Some(bounds) => (
            pad - bounds.min_x,
            pad - bounds.min_y,
            bounds.width() + pad * 2.0,
            bounds.height() + pad * 2.0,
        ),
        None => (pad, pad, pad * 2.0, pad * 2.0),
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    for segment in &layout.segments {
        let (stroke, stroke_width) = match segment.kind {
            SegmentKind::Spouse => (theme.spouse_line_color.as_str(), SPOUSE_STROKE_WIDTH),
            SegmentKind::Drop | SegmentKind::Bus | SegmentKind::Riser => {
                (theme.line_color.as_str(), LINE_STROKE_WIDTH)
            }
        };
        svg.push_str(&format!(
            "<line class=\"{}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            segment_class(segment.kind),
            segment.from.x + offset_x,
            segment.from.y + offset_y,
            segment.to.x + offset_x,
            segment.to.y + offset_y,
            stroke,
            stroke_width
        ));
    }

    let persons: HashMap<PersonId, &Person> =
        tree.persons.iter().map(|person| (person.id, person)).collect();
    let half_w = layout.box_width / 2.0;
    let half_h = layout.box_height / 2.0;
    for (id, position) in &layout.positions {
        let Some(person) = persons.get(id) else {
            continue;
        };
        let cx = position.x + offset_x;
        let cy = position.y + offset_y;
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            cx - half_w,
            cy - half_h,
            layout.box_width,
            layout.box_height,
            theme.fill_for(person.gender),
            theme.box_border,
            BOX_STROKE_WIDTH
        ));
        svg.push_str(&person_text_svg(cx, cy, person, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn segment_class(kind: SegmentKind) -> &'static str {
    match kind {
        SegmentKind::Spouse => "spouse",
        SegmentKind::Drop => "drop",
        SegmentKind::Bus => "bus",
        SegmentKind::Riser => "riser",
    }
}

fn text_svg(x: f32, y: f32, size: f32, text: &str, theme: &Theme) -> String {
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        size,
        theme.text_color,
        escape_xml(text)
    )
}

fn person_text_svg(cx: f32, cy: f32, person: &Person, theme: &Theme) -> String {
    let mut text = text_svg(cx, cy + NAME_OFFSET_Y, theme.font_size, &person.name, theme);
    if let Some(birth) = person.birth_date.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&text_svg(cx, cy, theme.small_font_size, birth, theme));
    }
    if let Some(death) = person.death_date.as_deref().filter(|s| !s.is_empty()) {
        let line = format!("{}{death}", theme.death_label);
        text.push_str(&text_svg(cx, cy + DEATH_OFFSET_Y, theme.small_font_size, &line, theme));
    }
    text
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
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme.font_family.clone();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

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
