use crate::field::BiotSavart;
use crate::steppers::{Euler, RK4};
use crate::traits::{PoloidalField, Steppable};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Offset added to |r| before sampling, so integration never evaluates the
/// field exactly on the symmetry axis.
pub const AXIS_OFFSET: f64 = 1e-8;

/// Field magnitudes below this are a vanished far field; the trace ends
/// normally rather than erroring.
pub const FIELD_CUTOFF: f64 = 1e-15;

/// Tracing halts once |r| > 6R or |z| > 5R.
pub const RADIAL_BOUND: f64 = 6.0;
pub const AXIAL_BOUND: f64 = 5.0;

/// Stability window for the arc-length step, as a fraction of loop radius.
pub const MIN_STEP_FRACTION: f64 = 0.02;
pub const MAX_STEP_FRACTION: f64 = 0.05;

/// Integration scheme used when walking a field line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepperKind {
    Euler,
    Rk4,
}

impl StepperKind {
    fn build(self) -> InternalStepper {
        match self {
            StepperKind::Euler => InternalStepper::Euler(Euler),
            StepperKind::Rk4 => InternalStepper::Rk4(RK4),
        }
    }
}

enum InternalStepper {
    Euler(Euler),
    Rk4(RK4),
}

impl InternalStepper {
    fn step(&mut self, field: &impl PoloidalField<f64>, r: &mut f64, z: &mut f64, ds: f64) -> f64 {
        match self {
            InternalStepper::Euler(s) => s.step(field, r, z, ds),
            InternalStepper::Rk4(s) => s.step(field, r, z, ds),
        }
    }
}

/// Shifts every sample off the axis. Positions keep their sign while the
/// evaluator always sees |r| + AXIS_OFFSET, including RK4 substages.
struct AxisShifted<'a> {
    inner: &'a BiotSavart,
}

impl PoloidalField<f64> for AxisShifted<'_> {
    fn sample(&self, r: f64, z: f64) -> (f64, f64) {
        self.inner.sample(r.abs() + AXIS_OFFSET, z)
    }
}

/// Walks a single field line from the seed with explicit Euler stepping.
///
/// `ds > 0` follows the field, `ds < 0` walks against it. The first output
/// point is the seed itself. The walk ends when the field magnitude drops
/// below `FIELD_CUTOFF`, the position leaves the bounded domain, or
/// `max_steps` points have been emitted; every returned point lies inside
/// the domain.
pub fn trace_line(
    field: &BiotSavart,
    seed_r: f64,
    seed_z: f64,
    max_steps: usize,
    ds: f64,
) -> Result<Vec<[f64; 2]>> {
    trace_line_with(field, StepperKind::Euler, seed_r, seed_z, max_steps, ds)
}

/// `trace_line` with an explicit choice of integration scheme.
pub fn trace_line_with(
    field: &BiotSavart,
    stepper: StepperKind,
    seed_r: f64,
    seed_z: f64,
    max_steps: usize,
    ds: f64,
) -> Result<Vec<[f64; 2]>> {
    let radius = field.filament().radius();
    if max_steps == 0 {
        bail!("max_steps must be greater than zero.");
    }
    if !ds.is_finite() || ds == 0.0 {
        bail!("Step size must be finite and nonzero, got {ds}.");
    }
    let fraction = ds.abs() / radius;
    if !(MIN_STEP_FRACTION..=MAX_STEP_FRACTION).contains(&fraction) {
        bail!(
            "Step size |{ds}| is outside the stable window [{}, {}] for loop radius {radius}.",
            MIN_STEP_FRACTION * radius,
            MAX_STEP_FRACTION * radius,
        );
    }

    let r_bound = RADIAL_BOUND * radius;
    let z_bound = AXIAL_BOUND * radius;
    let shifted = AxisShifted { inner: field };
    let mut stepper = stepper.build();

    let mut points = Vec::with_capacity(max_steps);
    let (mut r, mut z) = (seed_r, seed_z);
    for _ in 0..max_steps {
        points.push([r, z]);
        let magnitude = stepper.step(&shifted, &mut r, &mut z, ds);
        if magnitude < FIELD_CUTOFF {
            // Vanished field; normal termination.
            break;
        }
        if r.abs() > r_bound || z.abs() > z_bound {
            break;
        }
    }
    Ok(points)
}

/// Composes one displayed field line from a seed near the wire: a walk
/// against the field and a walk along it, joined into a single continuous
/// curve running through the seed.
pub fn trace_bidirectional(
    field: &BiotSavart,
    stepper: StepperKind,
    seed_r: f64,
    seed_z: f64,
    max_steps: usize,
    ds: f64,
) -> Result<Vec<[f64; 2]>> {
    let step = ds.abs();
    let backward = trace_line_with(field, stepper, seed_r, seed_z, max_steps, -step)?;
    let forward = trace_line_with(field, stepper, seed_r, seed_z, max_steps, step)?;

    // Both halves start at the seed; reversing the backward half puts the
    // seed at its end, so drop it there to avoid the duplicate.
    let mut path = Vec::with_capacity(backward.len() + forward.len());
    path.extend(backward.iter().skip(1).rev().copied());
    path.extend(forward.iter().copied());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{
        trace_bidirectional, trace_line, trace_line_with, StepperKind, AXIAL_BOUND, RADIAL_BOUND,
    };
    use crate::field::BiotSavart;
    use crate::filament::CurrentLoop;
    use approx::assert_relative_eq;

    fn evaluator() -> BiotSavart {
        BiotSavart::new(CurrentLoop::new(0.1, 5.0).expect("valid loop"))
    }

    #[test]
    fn first_point_is_the_seed() {
        let field = evaluator();
        let path = trace_line(&field, 0.045, 0.0, 600, 0.003).expect("trace should run");
        assert!(!path.is_empty());
        assert_eq!(path[0], [0.045, 0.0]);
    }

    #[test]
    fn stays_inside_the_bounded_domain() {
        let field = evaluator();
        let radius = field.filament().radius();
        for &seed_r in &[0.02, 0.045, 0.13, 0.35] {
            let path = trace_line(&field, seed_r, 0.0, 600, 0.003).expect("trace should run");
            assert!(path.len() <= 600);
            for p in &path {
                assert!(p[0].abs() <= RADIAL_BOUND * radius);
                assert!(p[1].abs() <= AXIAL_BOUND * radius);
            }
        }
    }

    #[test]
    fn consecutive_points_are_one_step_apart() {
        let field = evaluator();
        let ds = 0.003;
        let path = trace_line(&field, 0.045, 0.0, 200, ds).expect("trace should run");
        for pair in path.windows(2) {
            let dr = pair[1][0] - pair[0][0];
            let dz = pair[1][1] - pair[0][1];
            assert_relative_eq!(dr.hypot(dz), ds, max_relative = 1e-9);
        }
    }

    #[test]
    fn zero_current_trace_is_a_single_point() {
        let field = BiotSavart::new(CurrentLoop::new(0.1, 0.0).expect("valid loop"));
        let path = trace_line(&field, 0.045, 0.0, 600, 0.003).expect("trace should run");
        assert_eq!(path, vec![[0.045, 0.0]]);
    }

    #[test]
    fn rejects_step_outside_stability_window() {
        let field = evaluator();
        for &ds in &[0.0001, 0.05, -0.05, 0.0, f64::NAN] {
            assert!(trace_line(&field, 0.045, 0.0, 600, ds).is_err());
        }
    }

    #[test]
    fn rejects_zero_step_budget() {
        let field = evaluator();
        assert!(trace_line(&field, 0.045, 0.0, 0, 0.003).is_err());
    }

    #[test]
    fn bidirectional_path_is_continuous_through_the_seed() {
        let field = evaluator();
        let ds = 0.003;
        let path = trace_bidirectional(&field, StepperKind::Euler, 0.045, 0.0, 300, ds)
            .expect("trace should run");
        assert!(path.len() > 2);
        // The seed appears exactly once and adjacent points never jump by
        // more than one step.
        let seeds = path.iter().filter(|p| **p == [0.045, 0.0]).count();
        assert_eq!(seeds, 1);
        for pair in path.windows(2) {
            let dr = pair[1][0] - pair[0][0];
            let dz = pair[1][1] - pair[0][1];
            assert!(dr.hypot(dz) <= ds * 1.000001);
        }
    }

    #[test]
    fn rk4_traces_the_same_topology_as_euler() {
        let field = evaluator();
        let euler = trace_line_with(&field, StepperKind::Euler, 0.045, 0.0, 600, 0.003)
            .expect("trace should run");
        let rk4 = trace_line_with(&field, StepperKind::Rk4, 0.045, 0.0, 600, 0.003)
            .expect("trace should run");
        assert!(!euler.is_empty() && !rk4.is_empty());
        assert_eq!(euler[0], rk4[0]);
    }

    #[test]
    fn interior_line_wraps_around_the_wire() {
        // A line seeded close to the wire stays on a tight closed curve: it
        // never leaves the domain, exhausts both step budgets, and winds
        // around the wire cross-section at (R, 0) at least once.
        let field = evaluator();
        let radius = field.filament().radius();
        let path = trace_bidirectional(&field, StepperKind::Euler, 0.08, 0.0, 600, 0.003)
            .expect("trace should run");
        assert_eq!(path.len(), 2 * 600 - 1);

        let mut winding = 0.0;
        for pair in path.windows(2) {
            let a = (pair[0][1]).atan2(pair[0][0] - radius);
            let b = (pair[1][1]).atan2(pair[1][0] - radius);
            let mut delta = b - a;
            if delta > std::f64::consts::PI {
                delta -= std::f64::consts::TAU;
            } else if delta < -std::f64::consts::PI {
                delta += std::f64::consts::TAU;
            }
            winding += delta;
        }
        assert!(
            winding.abs() > std::f64::consts::TAU,
            "expected at least one full turn around the wire, got {winding}"
        );
    }
}
