use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in field evaluation and tracing.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// An axisymmetric vector field sampled in the poloidal (r, z) half-plane.
pub trait PoloidalField<T: Scalar> {
    /// Evaluates the field at the given position.
    /// r: cylindrical radius of the sample point
    /// z: height above the loop plane
    /// Returns (B_r, B_z); the azimuthal component vanishes by symmetry.
    fn sample(&self, r: T, z: T) -> (T, T);
}

/// A trait for steppers that advance a point along the local field direction.
pub trait Steppable<T: Scalar> {
    /// Performs one arc-length step of size ds.
    /// r, z: current position (updated after step)
    /// ds: step size, negative to walk against the field
    /// Returns the field magnitude where the step started, so callers can
    /// detect a vanished field.
    fn step(&mut self, field: &impl PoloidalField<T>, r: &mut T, z: &mut T, ds: T) -> T;
}
