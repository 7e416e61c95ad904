use crate::traits::{PoloidalField, Scalar, Steppable};

/// Normalizes a field sample to a unit direction, reporting the magnitude.
/// A zero sample yields a zero direction so the step moves nothing.
fn unit_direction<T: Scalar>(br: T, bz: T) -> (T, T, T) {
    let mag = (br * br + bz * bz).sqrt();
    if mag > T::zero() {
        (br / mag, bz / mag, mag)
    } else {
        (T::zero(), T::zero(), mag)
    }
}

/// Explicit Euler arc-length stepper on the unit direction field:
/// dr/ds = B_r / |B|, dz/ds = B_z / |B|.
pub struct Euler;

impl<T: Scalar> Steppable<T> for Euler {
    fn step(&mut self, field: &impl PoloidalField<T>, r: &mut T, z: &mut T, ds: T) -> T {
        let (br, bz) = field.sample(*r, *z);
        let (ur, uz, mag) = unit_direction(br, bz);
        *r = *r + ds * ur;
        *z = *z + ds * uz;
        mag
    }
}

/// Classic Runge-Kutta 4th order arc-length stepper.
///
/// Each stage sample is normalized independently, so the scheme integrates
/// the direction field rather than the raw flux density. The reported
/// magnitude is the first-stage value.
pub struct RK4;

impl<T: Scalar> Steppable<T> for RK4 {
    fn step(&mut self, field: &impl PoloidalField<T>, r: &mut T, z: &mut T, ds: T) -> T {
        let half = T::from_f64(0.5).unwrap();
        let sixth = T::from_f64(1.0 / 6.0).unwrap();
        let two = T::from_f64(2.0).unwrap();

        let (r0, z0) = (*r, *z);
        let stage = |rr: T, zz: T| {
            let (br, bz) = field.sample(rr, zz);
            unit_direction(br, bz)
        };

        // k1 = u(y)
        let (k1r, k1z, mag) = stage(r0, z0);
        // k2 = u(y + ds*k1/2)
        let (k2r, k2z, _) = stage(r0 + ds * k1r * half, z0 + ds * k1z * half);
        // k3 = u(y + ds*k2/2)
        let (k3r, k3z, _) = stage(r0 + ds * k2r * half, z0 + ds * k2z * half);
        // k4 = u(y + ds*k3)
        let (k4r, k4z, _) = stage(r0 + ds * k3r, z0 + ds * k3z);

        *r = r0 + ds * sixth * (k1r + two * k2r + two * k3r + k4r);
        *z = z0 + ds * sixth * (k1z + two * k2z + two * k3z + k4z);

        mag
    }
}
