//! Shape helpers shared by components drawing on a [`DrawingSurface`].

use serde_json::json;

use crate::core::{Bound, Position};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, DrawingSurface, PathPrimitive, RectPrimitive, ShapeAttributes, ShapeId,
    TextPrimitive, TextStyle,
};

const DEFAULT_LINE_STROKE_WIDTH: f64 = 2.0;

/// Rounds half-way values towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Builds a two-point line path.
///
/// Axis-aligned lines are snapped so an odd stroke width lands on pixel
/// centers and renders crisp.
#[must_use]
pub fn make_line_path(from: Position, to: Position, stroke_width: f64) -> PathPrimitive {
    let snap = (stroke_width % 2.0) / 2.0;
    let mut from_point = [from.left, from.top];
    let mut to_point = [to.left, to.top];

    for axis in 0..2 {
        if from_point[axis] == to_point[axis] {
            let snapped = round_half_up(from_point[axis]) - snap;
            from_point[axis] = snapped;
            to_point[axis] = snapped;
        }
    }

    PathPrimitive::new()
        .move_to(Position::new(from_point[0], from_point[1]))
        .line_to(Position::new(to_point[0], to_point[1]))
}

pub fn render_line(
    surface: &mut dyn DrawingSurface,
    path: PathPrimitive,
    color: &str,
    stroke_width: Option<f64>,
) -> ChartResult<ShapeId> {
    let mut attrs = ShapeAttributes::new();
    attrs.insert("stroke".to_owned(), json!(color));
    attrs.insert(
        "stroke-width".to_owned(),
        json!(stroke_width.unwrap_or(DEFAULT_LINE_STROKE_WIDTH)),
    );
    attrs.insert("stroke-linecap".to_owned(), json!("butt"));
    if color == "transparent" {
        attrs.insert("stroke".to_owned(), json!("#fff"));
        attrs.insert("stroke-opacity".to_owned(), json!(0));
    }
    attrs.insert("class".to_owned(), json!("auto-shape-rendering"));

    surface.create_path(path, attrs)
}

/// Renders a filled area; the outline stays invisible unless `fill_style`
/// sets `stroke-opacity` itself.
pub fn render_area(
    surface: &mut dyn DrawingSurface,
    path: PathPrimitive,
    fill_style: ShapeAttributes,
) -> ChartResult<ShapeId> {
    let mut attrs = ShapeAttributes::new();
    attrs.insert("stroke-opacity".to_owned(), json!(0));
    attrs.extend(fill_style);
    surface.create_path(path, attrs)
}

pub fn render_circle(
    surface: &mut dyn DrawingSurface,
    center: Position,
    radius: f64,
    attrs: Option<ShapeAttributes>,
) -> ChartResult<ShapeId> {
    surface.create_circle(
        CirclePrimitive::new(center, radius),
        attrs.unwrap_or_default(),
    )
}

pub fn render_rect(
    surface: &mut dyn DrawingSurface,
    bound: Bound,
    attrs: Option<ShapeAttributes>,
) -> ChartResult<ShapeId> {
    surface.create_rect(RectPrimitive::new(bound), attrs.unwrap_or_default())
}

pub fn update_rect_bound(
    surface: &mut dyn DrawingSurface,
    rect: ShapeId,
    bound: Bound,
) -> ChartResult<()> {
    bound.validate()?;
    let mut attrs = ShapeAttributes::new();
    attrs.insert("x".to_owned(), json!(bound.left));
    attrs.insert("y".to_owned(), json!(bound.top));
    attrs.insert("width".to_owned(), json!(bound.width));
    attrs.insert("height".to_owned(), json!(bound.height));
    surface.set_attributes(rect, attrs)
}

/// Renders a text label. When attributes are supplied and carry no
/// `dominant-baseline`, the label is vertically centered on `position`.
pub fn render_text(
    surface: &mut dyn DrawingSurface,
    position: Position,
    text: &str,
    style: &TextStyle,
    attrs: Option<ShapeAttributes>,
) -> ChartResult<ShapeId> {
    let attrs = match attrs {
        Some(mut attrs) => {
            if !attrs.contains_key("dominant-baseline") {
                attrs.insert("dominant-baseline".to_owned(), json!("central"));
            }
            attrs
        }
        None => ShapeAttributes::new(),
    };
    surface.create_text(TextPrimitive::new(position, text, style.clone()), attrs)
}

/// Scales each RGB channel of `hex` by `1 + lum`, clamped to `0..=255`.
pub fn changed_luminance_color(hex: &str, lum: f64) -> ChartResult<String> {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChartError::InvalidData(format!(
            "expected a 6-digit hex color, got `{hex}`"
        )));
    }

    let mut changed = String::with_capacity(7);
    changed.push('#');
    for channel in 0..3 {
        let raw = u8::from_str_radix(&digits[channel * 2..channel * 2 + 2], 16)
            .map_err(|e| ChartError::InvalidData(format!("invalid hex color `{hex}`: {e}")))?;
        let value = f64::from(raw);
        let next = round_half_up((value + value * lum).clamp(0.0, 255.0));
        changed.push_str(&format!("{:02x}", next as u8));
    }
    Ok(changed)
}

/// Truncates `text` so it fits `fixed_width`, marking the cut with `..`.
pub fn ellipsis_text(
    surface: &mut dyn DrawingSurface,
    text: &str,
    fixed_width: f64,
    style: &TextStyle,
) -> ChartResult<String> {
    let dot_width = surface.measure_text(".", style)?.width;
    let mut text_width = dot_width * 2.0;
    let mut fitted = String::new();
    let mut glyph = [0u8; 4];

    for ch in text.chars() {
        text_width += surface.measure_text(ch.encode_utf8(&mut glyph), style)?.width;
        if text_width >= fixed_width {
            fitted.push_str("..");
            break;
        }
        fitted.push(ch);
    }

    Ok(fitted)
}
