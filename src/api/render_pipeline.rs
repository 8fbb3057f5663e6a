use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::components::{RenderOperation, RenderOutput, RenderPayload};
use crate::core::BoundsAndScale;
use crate::error::ChartResult;
use crate::render::{Element, SurfaceHandle};

use super::ComponentRegistry;

/// Summary of one render pass.
#[derive(Debug, Default)]
pub struct RenderPass {
    /// Surface established during the pass, if any component supplied one.
    pub surface: Option<SurfaceHandle>,
    /// Names of the components that handled the operation, in order.
    pub invoked: Vec<String>,
    /// Number of elements appended to the attach target.
    pub attached: usize,
    /// Collected elements, kept only when no attach target was supplied.
    pub elements: Vec<Element>,
}

impl ComponentRegistry {
    /// Runs `operation` on every component in registration order.
    ///
    /// Each component receives its layout (keyed by name, then type), the
    /// shared bounds/scale data, `additional` and the drawing surface. The
    /// first component that supplies a surface establishes it for the rest of
    /// the pass; later attempts to supply a different one are ignored.
    /// Collected elements are appended to `attach_target` in component order.
    ///
    /// A failing component aborts the pass and its error is returned.
    pub fn render(
        &mut self,
        operation: RenderOperation,
        bounds_and_scale: Option<&BoundsAndScale>,
        additional: &IndexMap<String, Value>,
        attach_target: Option<&mut Element>,
    ) -> ChartResult<RenderPass> {
        let mut surface: Option<SurfaceHandle> = None;
        let mut invoked = Vec::new();
        let mut elements = Vec::new();

        for entry in &mut self.components {
            let payload = RenderPayload {
                name: &entry.name,
                component_type: &entry.component_type,
                layout: bounds_and_scale
                    .map(|bounds| bounds.layout_for(&entry.name, &entry.component_type)),
                bounds_and_scale,
                additional,
                surface: surface.as_ref(),
            };

            match operation.invoke(&mut *entry.component, &payload)? {
                RenderOutput::Skipped => continue,
                RenderOutput::Rendered(element) => {
                    elements.extend(element);
                }
                RenderOutput::CreatedSurface {
                    element,
                    surface: supplied,
                } => {
                    elements.push(element);
                    match &surface {
                        None => {
                            trace!(name = %entry.name, "surface established");
                            surface = Some(supplied);
                        }
                        Some(established) if established.same_surface(&supplied) => {}
                        Some(_) => {
                            warn!(
                                name = %entry.name,
                                operation = operation.name(),
                                "ignoring surface supplied after one was established in this pass"
                            );
                        }
                    }
                }
            }
            invoked.push(entry.name.clone());
        }

        let attached = match attach_target {
            Some(target) => target.append_all(elements.drain(..)),
            None => 0,
        };

        debug!(
            operation = operation.name(),
            invoked = invoked.len(),
            attached,
            "render pass"
        );

        if surface.is_some() {
            self.surface = surface.clone();
        }

        Ok(RenderPass {
            surface,
            invoked,
            attached,
            elements,
        })
    }
}
