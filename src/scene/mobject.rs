//! Drawable scene objects.
//!
//! Everything here is plain geometry in scene units. Objects know how to move their points
//! ([`Mobject::apply_function`]), how to blend into another object of the same structure
//! ([`Mobject::interpolate`]) and nothing about pixels.

use super::{MobjectId, TrackerId};
use crate::relativity::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const GREY: Rgb = Rgb(0x88, 0x88, 0x88);
    pub const RED: Rgb = Rgb(0xFC, 0x62, 0x55);
    pub const ORANGE: Rgb = Rgb(0xFF, 0x86, 0x2F);
    pub const PURPLE: Rgb = Rgb(0x9A, 0x72, 0xAC);

    fn lerp(self, other: Rgb, alpha: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * alpha).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Rgb,
    pub opacity: f64,
    /// Stroke width in pixels at the reference resolution of 480 rows.
    pub width: f64,
    pub fill: Option<Rgb>,
}

impl Default for Style {
    fn default() -> Self {
        Self::stroke(Rgb::WHITE)
    }
}

impl Style {
    pub fn stroke(color: Rgb) -> Self {
        Self {
            color,
            opacity: 1.0,
            width: 2.0,
            fill: None,
        }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }

    pub fn with_width(self, width: f64) -> Self {
        Self { width, ..self }
    }

    pub fn with_fill(self, fill: Rgb) -> Self {
        Self {
            fill: Some(fill),
            ..self
        }
    }

    fn lerp(&self, other: &Style, alpha: f64) -> Style {
        Style {
            color: self.color.lerp(other.color, alpha),
            opacity: lerp(self.opacity, other.opacity, alpha),
            width: lerp(self.width, other.width, alpha),
            fill: if alpha < 1.0 { self.fill } else { other.fill },
        }
    }
}

/// Dashed rendering: the path is cut into `num_dashes` pieces of equal arc length and each
/// piece is drawn for `ratio` of its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub num_dashes: usize,
    pub ratio: f64,
}

impl Default for Dash {
    fn default() -> Self {
        Self {
            num_dashes: 15,
            ratio: 0.5,
        }
    }
}

/// Where a label sits. Everything except `Fixed` is resolved against the current
/// snapshot each time the label is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    Fixed(Point),
    /// Centre of another object plus an offset.
    Follow { target: MobjectId, offset: [f64; 2] },
    /// Beside another object's bounding box, `buff` away along `direction`.
    NextTo {
        target: MobjectId,
        direction: [f64; 2],
        buff: f64,
    },
    /// Frame corner picked by the signs of `direction`, `buff` away from both edges.
    Corner { direction: [f64; 2], buff: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabelText {
    Static(String),
    /// `prefix` followed by the tracker's value rounded to `decimals`.
    Tracker {
        prefix: String,
        tracker: TrackerId,
        decimals: usize,
    },
}

impl From<&str> for LabelText {
    fn from(value: &str) -> Self {
        LabelText::Static(value.to_string())
    }
}

impl From<String> for LabelText {
    fn from(value: String) -> Self {
        LabelText::Static(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Path {
        points: Vec<Point>,
        dash: Option<Dash>,
    },
    Dot {
        center: Point,
        radius: f64,
    },
    Arrow {
        start: Point,
        end: Point,
        tip_length: f64,
    },
    Rect {
        center: Point,
        width: f64,
        height: f64,
    },
    Text {
        content: LabelText,
        anchor: Anchor,
        /// Glyph height in scene units.
        size: f64,
    },
    Group(Vec<Mobject>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mobject {
    pub shape: Shape,
    pub style: Style,
    pub z_index: f64,
}

impl Mobject {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            style: Style::default(),
            z_index: 0.0,
        }
    }

    pub fn path(points: Vec<Point>) -> Self {
        Self::new(Shape::Path { points, dash: None })
    }

    pub fn dashed(points: Vec<Point>, dash: Dash) -> Self {
        Self::new(Shape::Path {
            points,
            dash: Some(dash),
        })
    }

    pub fn dot(center: Point) -> Self {
        Self::new(Shape::Dot {
            center,
            radius: 0.08,
        })
        .with_style(Style::stroke(Rgb::WHITE).with_fill(Rgb::WHITE))
    }

    pub fn arrow(start: Point, end: Point, tip_length: f64) -> Self {
        Self::new(Shape::Arrow {
            start,
            end,
            tip_length,
        })
    }

    pub fn rect(center: Point, width: f64, height: f64) -> Self {
        Self::new(Shape::Rect {
            center,
            width,
            height,
        })
    }

    pub fn text(content: impl Into<LabelText>, anchor: Anchor, size: f64) -> Self {
        Self::new(Shape::Text {
            content: content.into(),
            anchor,
            size,
        })
    }

    pub fn group(children: Vec<Mobject>) -> Self {
        Self::new(Shape::Group(children))
    }

    /// Sets the style here and on every child.
    pub fn with_style(mut self, style: Style) -> Self {
        self.visit_mut(&mut |m| m.style = style);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.visit_mut(&mut |m| m.style.color = color);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.visit_mut(&mut |m| m.style.opacity = opacity);
        self
    }

    pub fn with_z_index(mut self, z_index: f64) -> Self {
        self.z_index = z_index;
        self
    }

    fn visit_mut(&mut self, f: &mut impl FnMut(&mut Mobject)) {
        f(self);
        if let Shape::Group(children) = &mut self.shape {
            for child in children {
                child.visit_mut(f);
            }
        }
    }

    fn map_points(&mut self, f: &impl Fn(Point) -> Point) {
        match &mut self.shape {
            Shape::Path { points, .. } => points.iter_mut().for_each(|p| *p = f(*p)),
            Shape::Dot { center, .. } | Shape::Rect { center, .. } => *center = f(*center),
            Shape::Arrow { start, end, .. } => {
                *start = f(*start);
                *end = f(*end);
            }
            Shape::Text { anchor, .. } => {
                if let Anchor::Fixed(p) = anchor {
                    *p = f(*p);
                }
            }
            Shape::Group(children) => children.iter_mut().for_each(|c| c.map_points(f)),
        }
    }

    /// Copy with every point sent through `f`.
    pub fn apply_function(&self, f: impl Fn(Point) -> Point) -> Mobject {
        let mut moved = self.clone();
        moved.map_points(&f);
        moved
    }

    /// Point-wise blend towards `target`. Objects whose structure differs switch over at `alpha == 1`.
    pub fn interpolate(&self, target: &Mobject, alpha: f64) -> Mobject {
        let style = self.style.lerp(&target.style, alpha);
        let z_index = lerp(self.z_index, target.z_index, alpha);
        let shape = match (&self.shape, &target.shape) {
            (
                Shape::Path { points: a, dash },
                Shape::Path {
                    points: b,
                    dash: target_dash,
                },
            ) if a.len() == b.len() && dash == target_dash => Shape::Path {
                points: a.iter().zip(b).map(|(p, q)| lerp_point(*p, *q, alpha)).collect(),
                dash: *dash,
            },
            (
                Shape::Dot { center: a, radius: r },
                Shape::Dot {
                    center: b,
                    radius: s,
                },
            ) => Shape::Dot {
                center: lerp_point(*a, *b, alpha),
                radius: lerp(*r, *s, alpha),
            },
            (
                Shape::Arrow {
                    start: a0,
                    end: a1,
                    tip_length: t,
                },
                Shape::Arrow {
                    start: b0,
                    end: b1,
                    tip_length: u,
                },
            ) => Shape::Arrow {
                start: lerp_point(*a0, *b0, alpha),
                end: lerp_point(*a1, *b1, alpha),
                tip_length: lerp(*t, *u, alpha),
            },
            (
                Shape::Text {
                    content,
                    anchor: Anchor::Fixed(a),
                    size,
                },
                Shape::Text {
                    content: target_content,
                    anchor: Anchor::Fixed(b),
                    size: target_size,
                },
            ) if content == target_content => Shape::Text {
                content: content.clone(),
                anchor: Anchor::Fixed(lerp_point(*a, *b, alpha)),
                size: lerp(*size, *target_size, alpha),
            },
            (Shape::Group(a), Shape::Group(b)) if a.len() == b.len() => Shape::Group(
                a.iter()
                    .zip(b)
                    .map(|(m, n)| m.interpolate(n, alpha))
                    .collect(),
            ),
            _ if alpha >= 1.0 => target.shape.clone(),
            _ => self.shape.clone(),
        };
        Mobject {
            shape,
            style,
            z_index,
        }
    }

    /// Axis-aligned bounds of every point this object owns. Labels without a fixed
    /// position contribute nothing.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let extend = |acc: Option<(Point, Point)>, (lo, hi): (Point, Point)| match acc {
            None => Some((lo, hi)),
            Some((a, b)) => Some((
                [a[0].min(lo[0]), a[1].min(lo[1]), a[2].min(lo[2])],
                [b[0].max(hi[0]), b[1].max(hi[1]), b[2].max(hi[2])],
            )),
        };
        match &self.shape {
            Shape::Path { points, .. } => points.iter().map(|p| (*p, *p)).fold(None, extend),
            Shape::Dot { center, radius } => {
                let [x, y, z] = *center;
                Some(([x - radius, y - radius, z], [x + radius, y + radius, z]))
            }
            Shape::Arrow { start, end, .. } => extend(Some((*start, *start)), (*end, *end)),
            Shape::Rect {
                center: [x, y, z],
                width,
                height,
            } => Some((
                [x - width / 2., y - height / 2., *z],
                [x + width / 2., y + height / 2., *z],
            )),
            Shape::Text {
                anchor: Anchor::Fixed(p),
                ..
            } => Some((*p, *p)),
            Shape::Text { .. } => None,
            Shape::Group(children) => children
                .iter()
                .filter_map(Mobject::bounds)
                .fold(None, extend),
        }
    }

    pub fn center(&self) -> Point {
        match self.bounds() {
            Some((lo, hi)) => lerp_point(lo, hi, 0.5),
            None => [0.0, 0.0, 0.0],
        }
    }
}

pub fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    a + (b - a) * alpha
}

pub fn lerp_point(a: Point, b: Point, alpha: f64) -> Point {
    [
        lerp(a[0], b[0], alpha),
        lerp(a[1], b[1], alpha),
        lerp(a[2], b[2], alpha),
    ]
}

fn distance(a: Point, b: Point) -> f64 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt()
}

/// Portion of a polyline between arc-length fractions `from` and `to`.
pub fn sub_path(points: &[Point], from: f64, to: f64) -> Vec<Point> {
    let (from, to) = (from.clamp(0.0, 1.0), to.clamp(0.0, 1.0));
    if points.len() < 2 || to <= from {
        return Vec::new();
    }
    let lengths: Vec<f64> = points.windows(2).map(|w| distance(w[0], w[1])).collect();
    let total: f64 = lengths.iter().sum();
    if total == 0.0 {
        return Vec::new();
    }
    let (start, end) = (from * total, to * total);

    let mut out = Vec::new();
    let mut travelled = 0.0;
    for (w, len) in points.windows(2).zip(&lengths) {
        let (seg_start, seg_end) = (travelled, travelled + len);
        travelled = seg_end;
        if seg_end < start || *len == 0.0 {
            continue;
        }
        if seg_start > end {
            break;
        }
        if out.is_empty() {
            out.push(lerp_point(w[0], w[1], ((start - seg_start) / len).max(0.0)));
        }
        if seg_end <= end {
            out.push(w[1]);
        } else {
            out.push(lerp_point(w[0], w[1], (end - seg_start) / len));
            break;
        }
    }
    out
}

/// Visible dash pieces of a path drawn up to `progress`.
pub fn dashes(points: &[Point], dash: Dash, progress: f64) -> Vec<Vec<Point>> {
    let n = dash.num_dashes.max(1) as f64;
    (0..dash.num_dashes.max(1))
        .map(|i| {
            let start = i as f64 / n;
            let end = (start + dash.ratio / n).min(progress);
            sub_path(points, start, end)
        })
        .filter(|piece| piece.len() >= 2)
        .collect()
}
