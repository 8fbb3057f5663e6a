use indexmap::IndexMap;

use crate::core::Dimension;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, DrawingSurface, PathPrimitive, RectPrimitive, ShapeAttributes, ShapeId,
    TextPrimitive,
};

/// Geometry of a recorded shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedPrimitive {
    Path(PathPrimitive),
    Circle(CirclePrimitive),
    Rect(RectPrimitive),
    Text(TextPrimitive),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedShape {
    pub primitive: RecordedPrimitive,
    pub attrs: ShapeAttributes,
}

/// In-memory surface used by tests and headless usage.
///
/// It validates primitives like a real backend would and measures text with
/// fixed per-glyph metrics so layout code stays deterministic.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub dimension: Dimension,
    /// Glyph advance as a fraction of the font size.
    pub glyph_width_ratio: f64,
    /// Line height as a fraction of the font size.
    pub line_height_ratio: f64,
    shapes: IndexMap<ShapeId, RecordedShape>,
    next_id: u64,
    removed_count: usize,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            glyph_width_ratio: 0.6,
            line_height_ratio: 1.2,
            shapes: IndexMap::new(),
            next_id: 1,
            removed_count: 0,
        }
    }

    #[must_use]
    pub fn shapes(&self) -> &IndexMap<ShapeId, RecordedShape> {
        &self.shapes
    }

    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&RecordedShape> {
        self.shapes.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of shapes removed so far, including probes used for measuring.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed_count
    }

    /// Live text shapes in creation order.
    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.shapes.values().filter_map(|shape| match &shape.primitive {
            RecordedPrimitive::Text(text) => Some(text),
            _ => None,
        })
    }

    fn insert(&mut self, primitive: RecordedPrimitive, attrs: ShapeAttributes) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.insert(id, RecordedShape { primitive, attrs });
        id
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(Dimension::new(500.0, 400.0))
    }
}

impl DrawingSurface for RecordingSurface {
    fn create_path(
        &mut self,
        path: PathPrimitive,
        attrs: ShapeAttributes,
    ) -> ChartResult<ShapeId> {
        path.validate()?;
        Ok(self.insert(RecordedPrimitive::Path(path), attrs))
    }

    fn create_circle(
        &mut self,
        circle: CirclePrimitive,
        attrs: ShapeAttributes,
    ) -> ChartResult<ShapeId> {
        circle.validate()?;
        Ok(self.insert(RecordedPrimitive::Circle(circle), attrs))
    }

    fn create_rect(
        &mut self,
        rect: RectPrimitive,
        attrs: ShapeAttributes,
    ) -> ChartResult<ShapeId> {
        rect.validate()?;
        Ok(self.insert(RecordedPrimitive::Rect(rect), attrs))
    }

    fn create_text(
        &mut self,
        text: TextPrimitive,
        attrs: ShapeAttributes,
    ) -> ChartResult<ShapeId> {
        text.validate()?;
        Ok(self.insert(RecordedPrimitive::Text(text), attrs))
    }

    fn set_attributes(&mut self, id: ShapeId, attrs: ShapeAttributes) -> ChartResult<()> {
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(ChartError::UnknownShape(id.0))?;
        shape.attrs.extend(attrs);
        Ok(())
    }

    fn remove(&mut self, id: ShapeId) {
        if self.shapes.shift_remove(&id).is_some() {
            self.removed_count += 1;
        }
    }

    fn text_bounds(&self, id: ShapeId) -> ChartResult<Dimension> {
        match self.shapes.get(&id).map(|shape| &shape.primitive) {
            Some(RecordedPrimitive::Text(text)) => {
                let glyphs = text.text.chars().count() as f64;
                Ok(Dimension::new(
                    glyphs * text.style.font_size * self.glyph_width_ratio,
                    text.style.font_size * self.line_height_ratio,
                ))
            }
            _ => Err(ChartError::UnknownShape(id.0)),
        }
    }
}
