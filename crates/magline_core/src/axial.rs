use crate::filament::CurrentLoop;
use crate::MU_0;

/// Closed-form on-axis flux density (T) at height x above the loop center:
/// B(x) = mu_0 I R^2 / (2 (R^2 + x^2)^(3/2)).
///
/// O(1); used for the center-field readout and as a cross-check on the
/// numerical evaluator.
pub fn axial_field(filament: &CurrentLoop, x: f64) -> f64 {
    let r2 = filament.radius() * filament.radius();
    MU_0 * filament.current() * r2 / (2.0 * (r2 + x * x).powf(1.5))
}

/// Flux density at the loop center, B(0) = mu_0 I / (2R).
pub fn center_field(filament: &CurrentLoop) -> f64 {
    MU_0 * filament.current() / (2.0 * filament.radius())
}

#[cfg(test)]
mod tests {
    use super::{axial_field, center_field};
    use crate::filament::CurrentLoop;
    use approx::assert_relative_eq;

    #[test]
    fn reproduces_reference_scenario() {
        // R = 0.1 m, I = 5 A gives 4 pi x 10^-7 * 5 * 0.01 / (2 * 0.001).
        let filament = CurrentLoop::new(0.1, 5.0).expect("valid loop");
        assert_relative_eq!(axial_field(&filament, 0.0), 3.1416e-5, max_relative = 0.01);
    }

    #[test]
    fn center_value_dominates_off_axis_values() {
        let filament = CurrentLoop::new(0.1, 5.0).expect("valid loop");
        let peak = axial_field(&filament, 0.0);
        for &x in &[-0.5, -0.1, -0.01, 0.01, 0.1, 0.5] {
            assert!(axial_field(&filament, x) < peak);
        }
    }

    #[test]
    fn axial_field_is_even_in_x() {
        let filament = CurrentLoop::new(0.2, 3.0).expect("valid loop");
        for &x in &[0.01, 0.1, 1.0] {
            assert_relative_eq!(
                axial_field(&filament, x),
                axial_field(&filament, -x),
                epsilon = 1e-18
            );
        }
    }

    #[test]
    fn doubling_radius_halves_center_field() {
        let small = CurrentLoop::new(0.1, 5.0).expect("valid loop");
        let large = CurrentLoop::new(0.2, 5.0).expect("valid loop");
        assert_relative_eq!(
            center_field(&large),
            0.5 * center_field(&small),
            max_relative = 1e-12
        );
    }

    #[test]
    fn center_field_matches_axial_at_origin() {
        let filament = CurrentLoop::new(0.37, -4.2).expect("valid loop");
        assert_relative_eq!(
            center_field(&filament),
            axial_field(&filament, 0.0),
            max_relative = 1e-12
        );
    }
}
