use super::Point;

/// Anything that maps diagram coordinates `(x, ct)` onto scene space.
pub trait CoordinateSystem {
    fn c2p(&self, x: f64, y: f64) -> Point;

    /// Scene units per diagram unit along the vertical (ct) axis.
    fn y_unit(&self) -> f64;
}

/// What a parametric line through an event traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    /// Constant-velocity motion.
    Worldline,
    /// Horizontal line marking events simultaneous in the plane's frame.
    Flat,
}

/// Parametric line starting at diagram coordinates `(x0, y0)`.
///
/// For [`Trace::Worldline`] the parameter `t` is in scene units along the time axis, so
/// the line has slope `1 / v` on screen. For [`Trace::Flat`] `v` is ignored and `t` counts
/// diagram units, scaled by the vertical unit size. `t` is not bounded; callers pick the range.
pub fn parametric(
    plane: &impl CoordinateSystem,
    x0: f64,
    y0: f64,
    v: f64,
    trace: Trace,
) -> impl Fn(f64) -> Point + Copy {
    let [x, y, _] = plane.c2p(x0, y0);
    let unit = plane.y_unit();
    move |t| match trace {
        Trace::Worldline => [x + v * t, y + t, 0.0],
        Trace::Flat => [x + t * unit, y, 0.0],
    }
}

pub fn worldline(
    plane: &impl CoordinateSystem,
    x0: f64,
    y0: f64,
    v: f64,
) -> impl Fn(f64) -> Point + Copy {
    parametric(plane, x0, y0, v, Trace::Worldline)
}

pub fn simultaneity_line(
    plane: &impl CoordinateSystem,
    x0: f64,
    y0: f64,
) -> impl Fn(f64) -> Point + Copy {
    parametric(plane, x0, y0, 0.0, Trace::Flat)
}

/// Samples `f` over `[start, end]` every `step`, always including `end`.
pub fn sample(f: impl Fn(f64) -> Point, start: f64, end: f64, step: f64) -> Vec<Point> {
    if step <= 0.0 || end <= start {
        return vec![f(start)];
    }
    let steps = ((end - start) / step).ceil() as usize;
    (0..=steps)
        .map(|i| f((start + i as f64 * step).min(end)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx_eq::ApproxEq;

    /// Plane with half-unit scaling in both directions, origin at the centre.
    struct HalfUnits;

    impl CoordinateSystem for HalfUnits {
        fn c2p(&self, x: f64, y: f64) -> Point {
            [x * 0.5, y * 0.5, 0.0]
        }

        fn y_unit(&self) -> f64 {
            0.5
        }
    }

    #[test]
    fn resting_worldline_is_vertical() {
        let f = worldline(&HalfUnits, 0.0, 0.0, 0.0);
        for t in [0.0, 0.5, 1.0, 7.25, 50.0] {
            let [x, y, _] = f(t);
            assert_eq!(x, 0.0);
            assert!(y.approx_eq(t));
        }
    }

    #[test]
    fn moving_worldline_has_inverse_slope() {
        let f = worldline(&HalfUnits, -2.5, -5.0, 0.5);
        assert!(f(0.0).approx_eq([-1.25, -2.5, 0.0]));
        // the rocket's worldline ends on the landing event at (2.5, 5)
        assert!(f(5.0).approx_eq(HalfUnits.c2p(2.5, 5.0)));
    }

    #[test]
    fn simultaneity_line_is_horizontal() {
        let f = simultaneity_line(&HalfUnits, 2.5, 5.0);
        let [x0, y0, _] = f(0.0);
        for t in [0.5, 1.0, 2.0] {
            let [x, y, _] = f(t);
            assert_eq!(y, y0);
            assert!((x - x0).approx_eq(t * 0.5));
        }
    }

    #[test]
    fn flat_trace_ignores_velocity() {
        let slow = parametric(&HalfUnits, 1.0, 1.0, 0.0, Trace::Flat);
        let fast = parametric(&HalfUnits, 1.0, 1.0, 0.9, Trace::Flat);
        for t in [0.0, 3.0, 11.0] {
            assert_eq!(slow(t), fast(t));
        }
    }

    #[test]
    fn sampling_includes_both_ends() {
        let points = sample(|t| [t, 0.0, 0.0], 0.0, 1.0, 0.3);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0][0], 0.0);
        assert_eq!(points.last().map(|p| p[0]), Some(1.0));
    }

    #[test]
    fn degenerate_range_yields_single_point() {
        assert_eq!(sample(|t| [t, t, 0.0], 2.0, 2.0, 0.1).len(), 1);
    }
}
