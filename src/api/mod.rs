//! Component registry: registration, render passes and command dispatch.

mod component_dispatch;
mod registry;
mod registry_params;
mod render_pipeline;

pub use component_dispatch::ConditionMap;
pub use registry::{ComponentRegistry, RegisteredComponent};
pub use registry_params::{ComponentParams, RegisterParams, RegistryParams};
pub use render_pipeline::RenderPass;
