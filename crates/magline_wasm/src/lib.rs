use magline_core::filament::CurrentLoop;
use magline_core::solver::FieldSolver;
use magline_core::tracer::AXIS_OFFSET;
use wasm_bindgen::prelude::*;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Bridge between the JS canvas frontend and the core solver. Owns the
/// loop parameters and the memoized field-line cache across frames.
#[wasm_bindgen]
pub struct WasmSolver {
    solver: FieldSolver,
}

#[wasm_bindgen]
impl WasmSolver {
    /// Radius in meters, current in amperes; callers convert display units
    /// (centimeters) before crossing this boundary.
    #[wasm_bindgen(constructor)]
    pub fn new(radius_m: f64, current_a: f64) -> Result<WasmSolver, JsValue> {
        console_error_panic_hook::set_once();

        let filament = CurrentLoop::new(radius_m, current_a).map_err(to_js_error)?;
        Ok(WasmSolver {
            solver: FieldSolver::new(filament),
        })
    }

    /// Replaces the loop parameters. The line-set cache is rebuilt on the
    /// next `line_set` call if the parameters actually changed.
    pub fn set_parameters(&mut self, radius_m: f64, current_a: f64) -> Result<(), JsValue> {
        let filament = CurrentLoop::new(radius_m, current_a).map_err(to_js_error)?;
        self.solver.set_filament(filament);
        Ok(())
    }

    pub fn radius(&self) -> f64 {
        self.solver.filament().radius()
    }

    pub fn current(&self) -> f64 {
        self.solver.filament().current()
    }

    /// [B_r, B_z] at cylindrical position (r, z).
    pub fn field_at(&self, r: f64, z: f64) -> Vec<f64> {
        let b = self.solver.field_at(r, z);
        vec![b.br, b.bz]
    }

    /// |B| at (r, z), for heat-map shading.
    pub fn field_magnitude(&self, r: f64, z: f64) -> f64 {
        self.solver.field_at(r, z).magnitude()
    }

    /// Closed-form on-axis flux density at height x above the loop center.
    pub fn axial_field(&self, x: f64) -> f64 {
        self.solver.axial_field(x)
    }

    /// Flux density at the loop center.
    pub fn center_field(&self) -> f64 {
        self.solver.center_field()
    }

    /// Structured line set for the current parameters, serialized for JS.
    pub fn line_set(&mut self, line_count: usize) -> Result<JsValue, JsValue> {
        let set = self.solver.line_set(line_count).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(set).map_err(to_js_error)
    }

    /// Line set as one Float64Array per path, points interleaved
    /// [r0, z0, r1, z1, ...] for direct canvas consumption.
    pub fn line_set_flat(&mut self, line_count: usize) -> Result<js_sys::Array, JsValue> {
        let set = self.solver.line_set(line_count).map_err(to_js_error)?;
        let out = js_sys::Array::new();
        for path in set.paths() {
            let mut flat = Vec::with_capacity(path.len() * 2);
            for p in path.points() {
                flat.push(p[0]);
                flat.push(p[1]);
            }
            out.push(&js_sys::Float64Array::from(flat.as_slice()).into());
        }
        Ok(out)
    }

    /// Row-major |B| samples on an nr x nz grid covering
    /// [r_min, r_max] x [z_min, z_max], for coarse heat-map shading.
    pub fn field_grid(
        &self,
        r_min: f64,
        r_max: f64,
        z_min: f64,
        z_max: f64,
        nr: usize,
        nz: usize,
    ) -> Result<Vec<f64>, JsValue> {
        if nr < 2 || nz < 2 {
            return Err(JsValue::from_str("Grid needs at least 2 samples per axis."));
        }
        let dr = (r_max - r_min) / (nr - 1) as f64;
        let dz = (z_max - z_min) / (nz - 1) as f64;
        let mut out = Vec::with_capacity(nr * nz);
        for iz in 0..nz {
            let z = z_min + dz * iz as f64;
            for ir in 0..nr {
                let r = r_min + dr * ir as f64;
                out.push(self.solver.field_at(r.abs() + AXIS_OFFSET, z).magnitude());
            }
        }
        Ok(out)
    }
}
