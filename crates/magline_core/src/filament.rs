use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Loop geometry that cannot support any field computation.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("Loop radius must be positive and finite, got {0}.")]
    DegenerateRadius(f64),
    #[error("Loop current must be finite, got {0}.")]
    NonFiniteCurrent(f64),
}

/// A circular current filament: radius in meters, current in amperes,
/// centered at the origin in the z = 0 plane with its axis along z.
/// Immutable once constructed; replaced wholesale when parameters change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentLoop {
    radius: f64,
    current: f64,
}

impl CurrentLoop {
    /// Validates the geometry before any computation can touch it.
    /// Any finite current is accepted, including zero and negative values.
    pub fn new(radius: f64, current: f64) -> Result<Self, GeometryError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::DegenerateRadius(radius));
        }
        if !current.is_finite() {
            return Err(GeometryError::NonFiniteCurrent(current));
        }
        Ok(Self { radius, current })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// A loop with zero current produces no field anywhere.
    pub fn is_energized(&self) -> bool {
        self.current != 0.0
    }

    /// Same geometry carrying a different current.
    pub fn with_current(&self, current: f64) -> Result<Self, GeometryError> {
        Self::new(self.radius, current)
    }
}
