use crate::axial;
use crate::field::{BiotSavart, FluxDensity, QuadratureSettings};
use crate::filament::CurrentLoop;
use crate::lineset::{build_field_line_set, BuilderSettings, FieldLinePath};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The parameter triple a cached line set was built from. Compared directly
/// instead of hashing a formatted string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldKey {
    pub current: f64,
    pub radius: f64,
    pub line_count: usize,
}

impl FieldKey {
    fn of(filament: &CurrentLoop, line_count: usize) -> Self {
        Self {
            current: filament.current(),
            radius: filament.radius(),
            line_count,
        }
    }
}

/// A family of field lines together with the key that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLineSet {
    key: FieldKey,
    paths: Vec<FieldLinePath>,
}

impl FieldLineSet {
    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn paths(&self) -> &[FieldLinePath] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Owns the loop and the memoized line set the renderer draws each frame.
///
/// The cache is keyed by (I, R, line_count) and rebuilt wholesale when the
/// key changes; it is never patched incrementally. Per-pixel field sampling
/// goes straight through to the evaluator and never touches the cache.
#[derive(Debug)]
pub struct FieldSolver {
    filament: CurrentLoop,
    settings: BuilderSettings,
    evaluator: BiotSavart,
    cache: Option<FieldLineSet>,
}

impl FieldSolver {
    pub fn new(filament: CurrentLoop) -> Self {
        Self {
            filament,
            settings: BuilderSettings::default(),
            evaluator: BiotSavart::new(filament),
            cache: None,
        }
    }

    pub fn with_settings(filament: CurrentLoop, settings: BuilderSettings) -> Result<Self> {
        let evaluator = BiotSavart::with_settings(
            filament,
            QuadratureSettings {
                segments: settings.segments,
            },
        )?;
        Ok(Self {
            filament,
            settings,
            evaluator,
            cache: None,
        })
    }

    pub fn filament(&self) -> &CurrentLoop {
        &self.filament
    }

    /// Replaces the loop. The cached set is invalidated lazily: the next
    /// `line_set` call compares keys and rebuilds if they differ.
    pub fn set_filament(&mut self, filament: CurrentLoop) {
        self.filament = filament;
        self.evaluator = self.evaluator.with_filament(filament);
    }

    /// Flux density at (r, z), for per-pixel shading.
    pub fn field_at(&self, r: f64, z: f64) -> FluxDensity {
        self.evaluator.field_at(r, z)
    }

    /// Closed-form on-axis flux density at height x.
    pub fn axial_field(&self, x: f64) -> f64 {
        axial::axial_field(&self.filament, x)
    }

    /// Flux density at the loop center.
    pub fn center_field(&self) -> f64 {
        axial::center_field(&self.filament)
    }

    /// Returns the line set for the current loop and count, rebuilding only
    /// when the (I, R, line_count) key changed since the last build.
    pub fn line_set(&mut self, line_count: usize) -> Result<&FieldLineSet> {
        let key = FieldKey::of(&self.filament, line_count);
        let stale = self.cache.as_ref().map_or(true, |set| set.key != key);
        if stale {
            debug!(?key, "rebuilding field line set");
            let paths = build_field_line_set(&self.filament, line_count, &self.settings)?;
            self.cache = Some(FieldLineSet { key, paths });
        }
        // The branch above just filled the cache.
        Ok(self.cache.as_ref().expect("line set cache populated"))
    }
}
