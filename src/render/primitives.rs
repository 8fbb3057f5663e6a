use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

use crate::core::{Bound, Position};
use crate::error::{ChartError, ChartResult};

/// Style attribute map attached to a shape (`fill`, `stroke-width`, ...).
pub type ShapeAttributes = IndexMap<String, Value>;

/// One step of a vector path in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Close,
}

impl PathCommand {
    fn is_finite(self) -> bool {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => x.is_finite() && y.is_finite(),
            Self::Close => true,
        }
    }
}

/// Draw command for an open or closed path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathPrimitive {
    pub commands: SmallVec<[PathCommand; 4]>,
}

impl PathPrimitive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn move_to(mut self, position: Position) -> Self {
        self.commands.push(PathCommand::MoveTo {
            x: position.left,
            y: position.top,
        });
        self
    }

    #[must_use]
    pub fn line_to(mut self, position: Position) -> Self {
        self.commands.push(PathCommand::LineTo {
            x: position.left,
            y: position.top,
        });
        self
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !matches!(self.commands.first(), Some(PathCommand::MoveTo { .. })) {
            return Err(ChartError::InvalidData(
                "path must start with a move command".to_owned(),
            ));
        }
        if !self.commands.iter().all(|command| command.is_finite()) {
            return Err(ChartError::InvalidData(
                "path coordinates must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub center: Position,
    pub radius: f64,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(center: Position, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.center.is_finite() {
            return Err(ChartError::InvalidData(
                "circle center must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(ChartError::InvalidData(
                "circle radius must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub bound: Bound,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(bound: Bound) -> Self {
        Self { bound }
    }

    pub fn validate(self) -> ChartResult<()> {
        self.bound.validate()
    }
}

/// Font settings used for drawing and measuring text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    pub font_family: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            font_family: "Verdana".to_owned(),
        }
    }
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub position: Position,
    pub text: String,
    pub style: TextStyle,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(position: Position, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            position,
            text: text.into(),
            style,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.position.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.style.font_size.is_finite() || self.style.font_size <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}
