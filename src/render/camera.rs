use crate::relativity::Point;

/// Reference image height that stroke widths are specified against.
const REFERENCE_HEIGHT: f64 = 480.0;

/// Maps scene units (origin at the centre, y up) onto pixels (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    width: u32,
    height: u32,
    frame_width: f64,
    frame_height: f64,
}

impl Camera {
    pub fn new(width: u32, height: u32, frame_width: f64) -> Self {
        Self {
            width,
            height,
            frame_width,
            frame_height: frame_width * height as f64 / width as f64,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixels per scene unit.
    pub fn scale(&self) -> f64 {
        self.width as f64 / self.frame_width
    }

    pub fn stroke(&self, width: f64) -> u32 {
        (width * self.height as f64 / REFERENCE_HEIGHT).round().max(1.0) as u32
    }

    pub fn to_pixel(&self, [x, y, _]: Point) -> (i32, i32) {
        let px = (x / self.frame_width + 0.5) * self.width as f64;
        let py = (0.5 - y / self.frame_height) * self.height as f64;
        (px.round() as i32, py.round() as i32)
    }

    /// Whether a scene point lands inside the image, with `margin` scene units of slack.
    pub fn contains(&self, [x, y, _]: Point, margin: f64) -> bool {
        x.abs() <= self.frame_width / 2. + margin && y.abs() <= self.frame_height / 2. + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(800, 400, 16.0)
    }

    #[test]
    fn centre_and_corners() {
        let camera = camera();
        assert_eq!(camera.to_pixel([0.0, 0.0, 0.0]), (400, 200));
        assert_eq!(camera.to_pixel([-8.0, 4.0, 0.0]), (0, 0));
        assert_eq!(camera.to_pixel([8.0, -4.0, 0.0]), (800, 400));
    }

    #[test]
    fn y_points_up() {
        let camera = camera();
        let (_, above) = camera.to_pixel([0.0, 1.0, 0.0]);
        let (_, below) = camera.to_pixel([0.0, -1.0, 0.0]);
        assert!(above < below);
    }

    #[test]
    fn strokes_scale_with_height() {
        assert_eq!(Camera::new(854, 480, 14.2).stroke(2.0), 2);
        assert_eq!(Camera::new(1920, 1080, 14.2).stroke(2.0), 5);
        assert_eq!(Camera::new(100, 50, 14.2).stroke(2.0), 1);
    }

    #[test]
    fn containment() {
        let camera = camera();
        assert!(camera.contains([7.9, 3.9, 0.0], 0.0));
        assert!(!camera.contains([8.5, 0.0, 0.0], 0.0));
        assert!(camera.contains([8.5, 0.0, 0.0], 1.0));
    }
}
