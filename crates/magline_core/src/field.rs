use crate::filament::CurrentLoop;
use crate::traits::PoloidalField;
use crate::MU0_OVER_4PI;
use anyhow::{bail, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Segments closer to the observation point than this are skipped; the
/// observation point sits on the wire itself.
const COINCIDENCE_CUTOFF: f64 = 1e-10;

/// A poloidal flux-density sample in tesla.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxDensity {
    pub br: f64,
    pub bz: f64,
}

impl FluxDensity {
    pub const ZERO: FluxDensity = FluxDensity { br: 0.0, bz: 0.0 };

    pub fn magnitude(&self) -> f64 {
        self.br.hypot(self.bz)
    }
}

/// Settings controlling the angular discretization of the loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuadratureSettings {
    pub segments: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self { segments: 120 }
    }
}

/// Numerical Biot-Savart evaluator for a single circular filament.
///
/// The loop is discretized into equal angular segments. Each segment at
/// angle phi carries a differential current element
/// dl = (-R sin(phi), R cos(phi), 0) dphi at source (R cos(phi), R sin(phi), 0)
/// and contributes dB = (mu_0 I / 4 pi) (dl x rvec) / |rvec|^3 at the
/// observation point (r, 0, z). The y component of the sum vanishes by
/// axisymmetry, leaving (B_r, B_z).
#[derive(Debug, Clone, Copy)]
pub struct BiotSavart {
    filament: CurrentLoop,
    segments: usize,
}

impl BiotSavart {
    pub fn new(filament: CurrentLoop) -> Self {
        Self {
            filament,
            segments: QuadratureSettings::default().segments,
        }
    }

    pub fn with_settings(filament: CurrentLoop, settings: QuadratureSettings) -> Result<Self> {
        if settings.segments < 8 {
            bail!(
                "Quadrature needs at least 8 segments, got {}.",
                settings.segments
            );
        }
        Ok(Self {
            filament,
            segments: settings.segments,
        })
    }

    /// Same discretization around a replacement loop.
    pub fn with_filament(&self, filament: CurrentLoop) -> Self {
        Self {
            filament,
            segments: self.segments,
        }
    }

    pub fn filament(&self) -> &CurrentLoop {
        &self.filament
    }

    /// Flux density at cylindrical position (r, z), evaluated at azimuth 0.
    ///
    /// Continuous and deterministic in (r, z); no branch introduces a jump
    /// as r crosses zero. Callers that integrate across the axis pass
    /// |r| + epsilon. A zero-current loop returns the zero vector without
    /// summing.
    pub fn field_at(&self, r: f64, z: f64) -> FluxDensity {
        let current = self.filament.current();
        if current == 0.0 {
            return FluxDensity::ZERO;
        }

        let radius = self.filament.radius();
        let observer = Vector3::new(r, 0.0, z);
        let dphi = TAU / self.segments as f64;
        let mut sum = Vector3::zeros();
        for k in 0..self.segments {
            let (sin_phi, cos_phi) = (dphi * k as f64).sin_cos();
            let source = Vector3::new(radius * cos_phi, radius * sin_phi, 0.0);
            let dl = Vector3::new(-radius * sin_phi, radius * cos_phi, 0.0) * dphi;
            let rvec = observer - source;
            let dist = rvec.norm();
            if dist < COINCIDENCE_CUTOFF {
                continue;
            }
            sum += dl.cross(&rvec) / (dist * dist * dist);
        }
        sum *= MU0_OVER_4PI * current;

        FluxDensity {
            br: sum.x,
            bz: sum.z,
        }
    }
}

impl PoloidalField<f64> for BiotSavart {
    fn sample(&self, r: f64, z: f64) -> (f64, f64) {
        let b = self.field_at(r, z);
        (b.br, b.bz)
    }
}
