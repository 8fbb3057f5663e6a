use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{Dimension, Position};
use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, PathPrimitive, RectPrimitive, ShapeAttributes, TextPrimitive, TextStyle,
};

/// Identifier of a shape created on a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

/// Contract implemented by any vector drawing backend.
///
/// Components only ever see a surface through [`SurfaceHandle`]; the core
/// never inspects backend state.
pub trait DrawingSurface {
    fn create_path(&mut self, path: PathPrimitive, attrs: ShapeAttributes)
    -> ChartResult<ShapeId>;

    fn create_circle(
        &mut self,
        circle: CirclePrimitive,
        attrs: ShapeAttributes,
    ) -> ChartResult<ShapeId>;

    fn create_rect(&mut self, rect: RectPrimitive, attrs: ShapeAttributes)
    -> ChartResult<ShapeId>;

    fn create_text(&mut self, text: TextPrimitive, attrs: ShapeAttributes)
    -> ChartResult<ShapeId>;

    /// Merges `attrs` into the attribute map of an existing shape.
    fn set_attributes(&mut self, id: ShapeId, attrs: ShapeAttributes) -> ChartResult<()>;

    /// Removes a shape. Unknown or already removed ids are ignored so that
    /// deferred effects firing after teardown stay harmless.
    fn remove(&mut self, id: ShapeId);

    /// Bounding box of a rendered text shape.
    fn text_bounds(&self, id: ShapeId) -> ChartResult<Dimension>;

    /// Measures `text` by rendering it off to the side and reading its bounds.
    fn measure_text(&mut self, text: &str, style: &TextStyle) -> ChartResult<Dimension> {
        let probe = TextPrimitive::new(Position::default(), text, style.clone());
        let id = self.create_text(probe, ShapeAttributes::new())?;
        let bounds = self.text_bounds(id);
        self.remove(id);
        bounds
    }
}

/// Shared handle to the drawing surface of one chart instance.
#[derive(Clone)]
pub struct SurfaceHandle {
    inner: Rc<RefCell<dyn DrawingSurface>>,
}

impl SurfaceHandle {
    #[must_use]
    pub fn new(surface: impl DrawingSurface + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(surface)),
        }
    }

    /// Wraps a backend the caller keeps a typed reference to.
    #[must_use]
    pub fn from_shared<S: DrawingSurface + 'static>(surface: Rc<RefCell<S>>) -> Self {
        Self { inner: surface }
    }

    /// Mutable access to the backend. Panics if the surface is already
    /// borrowed, which only happens when a component re-enters itself.
    pub fn borrow_mut(&self) -> RefMut<'_, dyn DrawingSurface + 'static> {
        self.inner.borrow_mut()
    }

    /// Runs `f` against the backend.
    pub fn with<T>(&self, f: impl FnOnce(&mut (dyn DrawingSurface + 'static)) -> T) -> T {
        let mut surface = self.inner.borrow_mut();
        f(&mut *surface)
    }

    /// Like [`with`](Self::with), but returns `None` instead of panicking
    /// when the backend is already borrowed.
    pub fn try_with<T>(
        &self,
        f: impl FnOnce(&mut (dyn DrawingSurface + 'static)) -> T,
    ) -> Option<T> {
        let mut surface = self.inner.try_borrow_mut().ok()?;
        Some(f(&mut *surface))
    }

    /// Whether both handles point at the same backend instance.
    #[must_use]
    pub fn same_surface(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}
