mod element;
mod primitives;
mod recording_surface;
pub mod render_util;
mod surface;

pub use element::Element;
pub use primitives::{
    CirclePrimitive, PathCommand, PathPrimitive, RectPrimitive, ShapeAttributes, TextPrimitive,
    TextStyle,
};
pub use recording_surface::{RecordedPrimitive, RecordedShape, RecordingSurface};
pub use surface::{DrawingSurface, ShapeId, SurfaceHandle};
