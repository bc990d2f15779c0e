use super::Point;

// Units where c = 1: velocities are fractions of c, times are measured as ct.

/// Lorentz factor γ = 1 / sqrt(1 - β²)
pub fn lorentz_factor(beta: f64) -> f64 {
    1.0 / (1.0 - beta * beta).sqrt()
}

/// Length contraction: L = L0 / γ
pub fn length_contraction(proper_length: f64, beta: f64) -> f64 {
    proper_length / lorentz_factor(beta)
}

/// Boost along x into a frame moving at `v` (fraction of c).
///
/// `v == 1.0` is treated as "no transform" and maps every event onto itself.
/// No other velocity is checked: `|v| >= 1` produces infinite or NaN coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boost {
    velocity: f64,
    gamma: f64,
}

impl Boost {
    pub fn new(velocity: f64) -> Self {
        Self {
            velocity,
            gamma: lorentz_factor(velocity),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.velocity == 1.0
    }

    /// Boost matrix rows for `(x, ct)`.
    pub fn matrix(&self) -> [[f64; 2]; 2] {
        let (g, v) = (self.gamma, self.velocity);
        [[g, -g * v], [-g * v, g]]
    }

    pub fn apply(&self, [x, t, z]: Point) -> Point {
        if self.is_identity() {
            return [x, t, z];
        }
        let [[a, b], [c, d]] = self.matrix();
        [a * x + b * t, c * x + d * t, z]
    }
}

/// Returns the boost for `v` as a plain point function, ready for `apply_function`.
pub fn lorentz_transform(v: f64) -> impl Fn(Point) -> Point + Copy {
    let boost = Boost::new(v);
    move |p| boost.apply(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx_eq::ApproxEq;

    const VELOCITIES: [f64; 8] = [-0.99, -0.75, -0.5, -0.1, 0.1, 0.5, 0.75, 0.99];
    const EVENTS: [Point; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 2.0, 3.0],
        [-2.5, -5.0, 0.5],
        [13.4, 0.5, -1.0],
    ];

    #[test]
    fn rest_frame_is_identity() {
        let ltf = lorentz_transform(0.0);
        for event in EVENTS {
            assert_eq!(ltf(event), event);
        }
    }

    #[test]
    fn origin_is_fixed() {
        assert_eq!(lorentz_transform(0.5)([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn inverse_boost_round_trips() {
        for v in VELOCITIES {
            let forward = lorentz_transform(v);
            let back = lorentz_transform(-v);
            for event in EVENTS {
                assert!(back(forward(event)).approx_eq(event), "v = {v}, {event:?}");
            }
        }
    }

    #[test]
    fn gamma_is_even() {
        for v in VELOCITIES {
            assert_eq!(lorentz_factor(v), lorentz_factor(-v));
        }
    }

    #[test]
    fn light_speed_returns_input_unchanged() {
        let ltf = lorentz_transform(1.0);
        for event in EVENTS {
            assert_eq!(ltf(event), event);
        }
        assert!(Boost::new(1.0).is_identity());
    }

    #[test]
    fn negative_light_speed_is_not_special_cased() {
        let [x, t, z] = lorentz_transform(-1.0)([1.0, 2.0, 3.0]);
        assert!(!x.is_finite());
        assert!(!t.is_finite());
        assert_eq!(z, 3.0);
    }

    #[test]
    fn half_light_speed() {
        let boost = Boost::new(0.5);
        assert!(lorentz_factor(0.5).approx_eq(1.0 / 0.75_f64.sqrt()));

        // rocket trip from (-2.5, -5) to (2.5, 5)
        let [_, launch, _] = boost.apply([-2.5, -5.0, 0.0]);
        let [_, landing, _] = boost.apply([2.5, 5.0, 0.0]);
        assert!((landing - launch).approx_eq(10.0 / lorentz_factor(0.5)));
        assert!(((landing - launch) - 8.66).abs() < 0.01);
    }

    #[test]
    fn z_passes_through() {
        assert_eq!(lorentz_transform(0.3)([1.0, 1.0, 7.0])[2], 7.0);
    }

    #[test]
    fn contraction() {
        assert!(length_contraction(100.0, 0.6).approx_eq(80.0));
        assert!(length_contraction(100.0, -0.6).approx_eq(80.0));
    }
}
