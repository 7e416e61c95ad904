use crate::field::{BiotSavart, QuadratureSettings};
use crate::filament::CurrentLoop;
use crate::tracer::{self, StepperKind};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings for assembling the displayed family of field lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuilderSettings {
    /// Step budget per tracing direction.
    pub max_steps: usize,
    /// Arc-length step as a fraction of loop radius; must stay inside the
    /// tracer's stability window.
    pub step_fraction: f64,
    /// Paths with fewer points than this are discarded.
    pub min_points: usize,
    /// Cap on the number of exterior seeds.
    pub max_exterior_seeds: usize,
    /// Angular discretization of the loop.
    pub segments: usize,
    pub stepper: StepperKind,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            max_steps: 600,
            step_fraction: 0.03,
            min_points: 10,
            max_exterior_seeds: 6,
            segments: 120,
            stepper: StepperKind::Euler,
        }
    }
}

/// One traced field line in the (r, z) plane. r keeps the sign produced by
/// the walk; the renderer mirrors about r = 0 for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLinePath {
    points: Vec<[f64; 2]>,
}

impl FieldLinePath {
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Seed positions for a family of `line_count` lines: interior seeds spread
/// across the loop opening plus up to `max_exterior` seeds beyond the wire.
fn make_seeds(radius: f64, line_count: usize, max_exterior: usize) -> Vec<[f64; 2]> {
    let exterior = line_count.min(max_exterior);
    let mut seeds = Vec::with_capacity(line_count + exterior);
    for i in 0..line_count {
        let frac = (i + 1) as f64 / (line_count + 1) as f64;
        seeds.push([radius * frac * 0.9, 0.0]);
    }
    for i in 0..exterior {
        let frac = (i + 1) as f64 / (line_count + 1) as f64;
        seeds.push([radius * (1.3 + frac * 2.5), 0.0]);
    }
    seeds
}

/// Builds the full family of field lines for one parameter triple.
///
/// Pure in (I, R, line_count, settings); callers memoize on that key and
/// reuse the result across frames. A zero current or zero line count
/// returns an empty set before any tracing happens. Seeds whose traces end
/// up shorter than `min_points` are dropped from the result, not reported
/// as errors.
pub fn build_field_line_set(
    filament: &CurrentLoop,
    line_count: usize,
    settings: &BuilderSettings,
) -> Result<Vec<FieldLinePath>> {
    if !filament.is_energized() || line_count == 0 {
        return Ok(Vec::new());
    }

    let evaluator = BiotSavart::with_settings(
        *filament,
        QuadratureSettings {
            segments: settings.segments,
        },
    )?;
    let ds = settings.step_fraction * filament.radius();

    let mut paths = Vec::new();
    for [seed_r, seed_z] in make_seeds(filament.radius(), line_count, settings.max_exterior_seeds) {
        let points = tracer::trace_bidirectional(
            &evaluator,
            settings.stepper,
            seed_r,
            seed_z,
            settings.max_steps,
            ds,
        )?;
        if points.len() < settings.min_points {
            debug!(seed_r, points = points.len(), "discarding short field line");
            continue;
        }
        paths.push(FieldLinePath { points });
    }
    Ok(paths)
}
