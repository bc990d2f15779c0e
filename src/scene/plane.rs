//! Number plane: the diagram's coordinate system and its grid.

use super::mobject::{Anchor, Mobject, Rgb, Style};
use crate::relativity::{Point, worldline::CoordinateSystem};

/// Diagram coordinates mapped linearly onto a rectangle of scene space centred at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberPlane {
    x_range: (f64, f64),
    y_range: (f64, f64),
    x_length: f64,
    y_length: f64,
}

impl NumberPlane {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64), x_length: f64, y_length: f64) -> Self {
        Self {
            x_range,
            y_range,
            x_length,
            y_length,
        }
    }

    pub fn x_unit(&self) -> f64 {
        self.x_length / (self.x_range.1 - self.x_range.0)
    }

    fn x_mid(&self) -> f64 {
        (self.x_range.0 + self.x_range.1) / 2.
    }

    fn y_mid(&self) -> f64 {
        (self.y_range.0 + self.y_range.1) / 2.
    }

    /// One line per integer coordinate, axes included, in `color`.
    pub fn grid_lines(&self, color: Rgb, opacity: f64) -> Mobject {
        let style = Style::stroke(color).with_opacity(opacity);
        let (x_min, x_max) = self.x_range;
        let (y_min, y_max) = self.y_range;

        let vertical = integers(x_min, x_max).map(|x| {
            let width = if x == 0 { 2.0 } else { 1.0 };
            Mobject::path(vec![self.c2p(x as f64, y_min), self.c2p(x as f64, y_max)])
                .with_style(style.with_width(width))
        });
        let horizontal = integers(y_min, y_max).map(|y| {
            let width = if y == 0 { 2.0 } else { 1.0 };
            Mobject::path(vec![self.c2p(x_min, y as f64), self.c2p(x_max, y as f64)])
                .with_style(style.with_width(width))
        });
        Mobject::group(vertical.chain(horizontal).collect())
    }

    /// Grid lines plus numbers along both axes.
    pub fn with_coordinates(&self, color: Rgb, opacity: f64) -> Mobject {
        let label_style = Style::stroke(color).with_opacity(opacity);
        let (x_min, x_max) = self.x_range;
        let (y_min, y_max) = self.y_range;

        let x_numbers = integers(x_min, x_max)
            .filter(|&x| x != 0)
            .map(|x| self.number(x, [x as f64, 0.0], [0.0, -0.2]));
        let y_numbers = integers(y_min, y_max)
            .filter(|&y| y != 0)
            .map(|y| self.number(y, [0.0, y as f64], [-0.2, 0.0]));

        let mut children = vec![self.grid_lines(color, opacity)];
        children.extend(x_numbers.chain(y_numbers).map(|m| m.with_style(label_style)));
        Mobject::group(children)
    }

    fn number(&self, value: i64, [x, y]: [f64; 2], [dx, dy]: [f64; 2]) -> Mobject {
        let [px, py, _] = self.c2p(x, y);
        Mobject::text(value.to_string(), Anchor::Fixed([px + dx, py + dy, 0.0]), 0.25)
    }

    /// Axis labels placed just inside the visible part of each axis.
    pub fn axis_labels(&self, x_label: &str, y_label: &str, visible: (f64, f64)) -> Mobject {
        let (half_width, half_height) = (visible.0 / 2., visible.1 / 2.);
        let [_, axis_y, _] = self.c2p(0.0, 0.0);
        let [axis_x, _, _] = self.c2p(0.0, 0.0);
        Mobject::group(vec![
            Mobject::text(
                x_label,
                Anchor::Fixed([half_width - 0.4, axis_y + 0.3, 0.0]),
                0.5,
            ),
            Mobject::text(
                y_label,
                Anchor::Fixed([axis_x + 0.4, half_height - 0.4, 0.0]),
                0.5,
            ),
        ])
    }
}

impl CoordinateSystem for NumberPlane {
    fn c2p(&self, x: f64, y: f64) -> Point {
        [
            (x - self.x_mid()) * self.x_unit(),
            (y - self.y_mid()) * self.y_unit(),
            0.0,
        ]
    }

    fn y_unit(&self) -> f64 {
        self.y_length / (self.y_range.1 - self.y_range.0)
    }
}

fn integers(min: f64, max: f64) -> impl Iterator<Item = i64> {
    (min.ceil() as i64)..=(max.floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{approx_eq::ApproxEq, scene::mobject::Shape};

    fn spacetime() -> NumberPlane {
        NumberPlane::new((-40., 40.), (-20., 20.), 40., 20.)
    }

    #[test]
    fn unit_sizes() {
        let plane = spacetime();
        assert!(plane.x_unit().approx_eq(0.5));
        assert!(plane.y_unit().approx_eq(0.5));
    }

    #[test]
    fn origin_maps_to_scene_centre() {
        assert_eq!(spacetime().c2p(0.0, 0.0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn off_centre_ranges() {
        let plane = NumberPlane::new((0., 10.), (-2., 6.), 5., 4.);
        assert!(plane.c2p(5.0, 2.0).approx_eq([0.0, 0.0, 0.0]));
        assert!(plane.c2p(10.0, 6.0).approx_eq([2.5, 2.0, 0.0]));
    }

    #[test]
    fn grid_has_a_line_per_integer() {
        let plane = spacetime();
        let Shape::Group(lines) = plane.grid_lines(Rgb::WHITE, 0.5).shape else {
            panic!("grid is a group");
        };
        assert_eq!(lines.len(), 81 + 41);
    }

    #[test]
    fn coordinates_skip_the_origin() {
        let plane = NumberPlane::new((-2., 2.), (-1., 1.), 4., 2.);
        let Shape::Group(children) = plane.with_coordinates(Rgb::WHITE, 1.0).shape else {
            panic!("plane is a group");
        };
        // grid + 4 x numbers + 2 y numbers
        assert_eq!(children.len(), 1 + 4 + 2);
    }
}
