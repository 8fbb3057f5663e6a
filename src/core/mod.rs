pub mod layout;
pub mod types;

pub use layout::{AxisData, BoundsAndScale, Layout};
pub use types::{Bound, Dimension, Limit, Position};
