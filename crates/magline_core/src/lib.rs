pub mod axial;
pub mod field;
pub mod filament;
pub mod lineset;
pub mod solver;
pub mod steppers;
pub mod tracer;
/// The `magline_core` crate provides the numerical engine for the Magline
/// visualization: the magnetostatic field of a circular current loop and the
/// family of field lines threading it.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `PoloidalField` (axisymmetric field sampling), `Steppable` (arc-length steppers).
/// - **Field**: discretized Biot-Savart evaluation plus the closed-form on-axis formula.
/// - **Tracing**: bidirectional arc-length field-line integration inside a bounded domain.
/// - **Line sets**: seeded field-line families, memoized per parameter triple.
pub mod traits;

/// Vacuum permeability (H/m).
pub const MU_0: f64 = 4.0e-7 * std::f64::consts::PI;

/// The Biot-Savart prefactor, mu_0 / 4 pi.
pub const MU0_OVER_4PI: f64 = 1.0e-7;
