//! Legend checked/selected state model.

mod model;
mod types;

pub use model::{LegendModel, LegendModelParams};
pub use types::{ItemTheme, LegendItem, LegendLabel, LegendLabels, SendingData};
