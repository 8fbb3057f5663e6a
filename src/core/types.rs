use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Width/height of a component area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

impl Dimension {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Top-left anchor of a component area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    #[must_use]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.left.is_finite() && self.top.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bound {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bound {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_layout(position: Position, dimension: Dimension) -> Self {
        Self::new(position.left, position.top, dimension.width, dimension.height)
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.left.is_finite() || !self.top.is_finite() {
            return Err(ChartError::InvalidData(
                "bound position must be finite".to_owned(),
            ));
        }
        if !Dimension::new(self.width, self.height).is_valid() {
            return Err(ChartError::InvalidData(
                "bound size must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Value range a series group is scaled against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub min: f64,
    pub max: f64,
}

impl Limit {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }
}
