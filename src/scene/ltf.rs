//! The Lorentz transformation scene: two stars, a rocket flying between them, and the same
//! trip seen from the rocket's frame.

use log::info;

use super::{
    MobjectId, Scene, TrackerId,
    animation::{Animation, Play, RateFunc},
    mobject::{Anchor, Dash, LabelText, Mobject, Rgb, Style},
    plane::NumberPlane,
};
use crate::relativity::{
    Point,
    special::{Boost, lorentz_transform},
    worldline::{CoordinateSystem, sample, simultaneity_line, worldline},
};

/// Horizontal position of star A (star B sits at the mirror image), in light-years.
pub const STAR_X: f64 = 2.5;
const STEP: f64 = 0.05;
const LABEL_SIZE: f64 = 0.35;
const UPPER_RIGHT: [f64; 2] = [1.0, 1.0];

/// Launch from star A and landing at star B for a rocket moving at `speed`, placed so the
/// trip is centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trip {
    pub speed: f64,
    pub launch: (f64, f64),
    pub landing: (f64, f64),
}

impl Trip {
    pub fn new(speed: f64) -> Self {
        let half = STAR_X / speed;
        Self {
            speed,
            launch: (-STAR_X, -half),
            landing: (STAR_X, half),
        }
    }

    /// Coordinate time between launch and landing in the stars' frame.
    pub fn interval(&self) -> f64 {
        self.landing.1 - self.launch.1
    }

    /// Both events as seen from a frame moving at `v`.
    pub fn boosted(&self, v: f64) -> ((f64, f64), (f64, f64)) {
        let boost = Boost::new(v);
        let [x0, t0, _] = boost.apply([self.launch.0, self.launch.1, 0.0]);
        let [x1, t1, _] = boost.apply([self.landing.0, self.landing.1, 0.0]);
        ((x0, t0), (x1, t1))
    }

    /// Coordinate time between launch and landing in a frame moving at `v`.
    pub fn boosted_interval(&self, v: f64) -> f64 {
        let ((_, t0), (_, t1)) = self.boosted(v);
        t1 - t0
    }
}

/// The built scene plus handles to the pieces worth inspecting.
#[derive(Debug, Clone)]
#[cfg_attr(not(test), allow(dead_code))]
pub struct LorentzScene {
    pub scene: Scene,
    pub plane: NumberPlane,
    pub trip: Trip,
    pub velocity: TrackerId,
    pub launch: MobjectId,
    pub landing: MobjectId,
    pub rocket: MobjectId,
    pub rest_interval_label: MobjectId,
    pub rocket_interval_label: MobjectId,
}

fn label(text: impl Into<LabelText>, anchor: Anchor) -> Mobject {
    Mobject::text(text, anchor, LABEL_SIZE).with_z_index(1.0)
}

/// Dashed horizontal markers from two events to a vertical arrow, and the arrow's label.
struct IntervalMarker {
    top: Mobject,
    bottom: Mobject,
    arrow: Mobject,
}

impl IntervalMarker {
    fn new(plane: &NumberPlane, bottom: (f64, f64), top: (f64, f64), arrow_x: f64) -> Self {
        let dash = Dash {
            num_dashes: 15,
            ratio: 0.3,
        };
        let line = |(x, y): (f64, f64)| {
            Mobject::dashed(
                sample(simultaneity_line(plane, x, y), 0.0, arrow_x - x, 0.1),
                dash,
            )
        };
        Self {
            top: line(top),
            bottom: line(bottom),
            arrow: Mobject::arrow(plane.c2p(arrow_x, bottom.1), plane.c2p(arrow_x, top.1), 0.15),
        }
    }

    /// Draws the markers, holds them for two seconds and fades them out.
    fn play(self, scene: &mut Scene, text: String) -> MobjectId {
        let top = scene.add(self.top);
        let bottom = scene.add(self.bottom);
        let arrow = scene.add(self.arrow);
        let text = scene.add(label(
            text,
            Anchor::NextTo {
                target: arrow,
                direction: [1.0, 0.0],
                buff: 0.5,
            },
        ));
        scene.play(Play::new([Animation::Create(top), Animation::Create(bottom)]));
        scene.play(Play::new([Animation::Create(arrow), Animation::Write(text)]));
        scene.wait(2.0);
        scene.play(Play::new([top, bottom, arrow, text].map(Animation::FadeOut)));
        text
    }
}

fn point((x, y): (f64, f64), plane: &NumberPlane) -> Point {
    plane.c2p(x, y)
}

/// Builds the whole animation for a rocket at `rocket_speed` inside a frame of `frame` scene units.
pub fn construct(rocket_speed: f64, frame: (f64, f64)) -> LorentzScene {
    let mut scene = Scene::new(frame.0, frame.1);
    let plane = NumberPlane::new((-40., 40.), (-20., 20.), 40., 20.);
    let trip = Trip::new(rocket_speed);
    let ltf = lorentz_transform(rocket_speed);

    let grid = scene.add(plane.with_coordinates(Rgb::WHITE, 0.5));
    let grid_labels = scene.add(plane.axis_labels("x", "ct", frame));

    let red = Style::stroke(Rgb::RED).with_opacity(0.5);
    let red_grid = scene.add(plane.with_coordinates(Rgb::RED, 0.5));
    let ct_marker = scene.add(Mobject::dot(plane.c2p(0.5, 7.0)).with_opacity(0.0));
    let x_marker = scene.add(Mobject::dot(plane.c2p(13.4, 0.5)).with_opacity(0.0));
    let follow = |target| Anchor::Follow {
        target,
        offset: [0.0, 0.0],
    };
    let ct_label = scene.add(label("ct′", follow(ct_marker)).with_style(red));
    let x_label = scene.add(label("x′", follow(x_marker)).with_style(red));

    let velocity = scene.tracker(0.0);
    let velocity_label = scene.add(label(
        LabelText::Tracker {
            prefix: "v(S′) = ".to_string(),
            tracker: velocity,
            decimals: 2,
        },
        Anchor::Corner {
            direction: UPPER_RIGHT,
            buff: 1.0,
        },
    ));

    let star_dash = Dash {
        num_dashes: 50,
        ratio: 0.8,
    };
    let star = |x: f64, color| {
        Mobject::dashed(
            sample(worldline(&plane, x, -25.0, 0.0), 0.0, 50.0, STEP),
            star_dash,
        )
        .with_color(color)
    };
    let star_a = scene.add(star(-STAR_X, Rgb::ORANGE));
    let star_b = scene.add(star(STAR_X, Rgb::PURPLE));

    let launch_point = point(trip.launch, &plane);
    let landing_point = point(trip.landing, &plane);
    let launch = scene.add(Mobject::dot(launch_point));
    let launch_label = scene.add(label(
        "Launch from Star A",
        Anchor::Follow {
            target: launch,
            offset: [0.0, -0.5],
        },
    ));
    let rocket = scene.add(
        Mobject::path(sample(
            worldline(&plane, trip.launch.0, trip.launch.1, rocket_speed),
            0.0,
            landing_point[1] - launch_point[1],
            STEP,
        ))
        .with_color(Rgb::GREY),
    );
    let landing = scene.add(Mobject::dot(landing_point));
    let landing_label = scene.add(label(
        "Landing at Star B",
        Anchor::Follow {
            target: landing,
            offset: [0.0, 0.5],
        },
    ));

    let equations_at = plane.c2p(-11.0, -2.5);
    let equations_back = scene.add(
        Mobject::rect(
            equations_at,
            5.0 * plane.x_unit(),
            3.0 * plane.y_unit(),
        )
        .with_style(Style::stroke(Rgb::WHITE).with_fill(Rgb::BLACK))
        .with_z_index(0.5),
    );
    let [ex, ey, _] = equations_at;
    let equations = scene.add(
        Mobject::group(vec![
            Mobject::text("x′ = γ(x − βct)", Anchor::Fixed([ex, ey + 0.2, 0.0]), 0.3),
            Mobject::text("ct′ = γ(ct − βx)", Anchor::Fixed([ex, ey - 0.2, 0.0]), 0.3),
        ])
        .with_z_index(1.0),
    );

    // introduce the stars
    scene.play(Play::new([
        Animation::Create(grid),
        Animation::Create(grid_labels),
    ]));
    scene.wait(1.0);
    scene.play(
        Play::new([Animation::Create(star_a), Animation::Create(star_b)])
            .rate(RateFunc::Linear)
            .run_time(2.0),
    );
    scene.wait(1.0);

    // launch the rocket
    scene.play(Play::new([Animation::Create(launch)]));
    scene.play(Play::new([Animation::Write(launch_label)]));
    scene.wait(1.0);
    scene.play(Play::new([Animation::Create(rocket)]).run_time(2.0));
    scene.play(Play::new([Animation::Create(landing)]));
    scene.play(Play::new([Animation::Write(landing_label)]));
    scene.wait(1.0);

    // Δct in the stars' frame
    let arrow_x = trip.landing.0 + 2.0;
    let rest_interval_label = IntervalMarker::new(&plane, trip.launch, trip.landing, arrow_x)
        .play(&mut scene, format!("Δct = {:.2} ly", trip.interval()));

    // boost everything into the rocket's frame
    scene.play(Play::new([Animation::Write(velocity_label)]));
    scene.play(Play::new([
        Animation::Create(red_grid),
        Animation::Create(x_marker),
        Animation::Create(ct_marker),
        Animation::Write(ct_label),
        Animation::Write(x_label),
    ]));
    scene.wait(1.0);
    scene.play(Play::new([
        Animation::FadeIn(equations_back),
        Animation::Write(equations),
    ]));
    let boosted = |id| Animation::Transform {
        target: id,
        into: scene.mobject(id).apply_function(ltf),
    };
    let transforms: Vec<_> = [
        red_grid, star_a, star_b, rocket, launch, x_marker, ct_marker, landing,
    ]
    .into_iter()
    .map(boosted)
    .chain([Animation::SetValue {
        tracker: velocity,
        value: rocket_speed,
    }])
    .collect();
    scene.play(Play::new(transforms).rate(RateFunc::Linear).run_time(3.0));
    scene.wait(1.0);
    scene.play(Play::new(
        [red_grid, x_label, ct_label].map(Animation::FadeOut),
    ));
    scene.play(Play::new(
        [equations_back, equations].map(Animation::FadeOut),
    ));

    // Δct' in the rocket's frame
    let (boosted_launch, boosted_landing) = trip.boosted(rocket_speed);
    let rocket_interval_label = IntervalMarker::new(
        &plane,
        boosted_launch,
        (boosted_launch.0, boosted_landing.1),
        boosted_launch.0 + 2.0,
    )
    .play(
        &mut scene,
        format!("Δct′ = {:.2} ly", trip.boosted_interval(rocket_speed)),
    );
    scene.wait(1.0);

    info!(
        "built Lorentz scene: {} steps, {:.1}s, rocket at {rocket_speed}c",
        scene.steps().len(),
        scene.duration()
    );

    LorentzScene {
        scene,
        plane,
        trip,
        velocity,
        launch,
        landing,
        rocket,
        rest_interval_label,
        rocket_interval_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{approx_eq::ApproxEq, scene::mobject::Shape};

    fn frame() -> (f64, f64) {
        (14.0 + 2.0 / 9.0, 8.0)
    }

    #[test]
    fn trip_events() {
        let trip = Trip::new(0.5);
        assert_eq!(trip.launch, (-2.5, -5.0));
        assert_eq!(trip.landing, (2.5, 5.0));
        assert!(trip.interval().approx_eq(10.0));
    }

    #[test]
    fn rocket_frame_sees_shorter_trip() {
        let trip = Trip::new(0.5);
        let ((x0, _), (x1, _)) = trip.boosted(0.5);
        // the rocket is at rest in its own frame
        assert!(x0.approx_eq(0.0));
        assert!(x1.approx_eq(0.0));
        assert!((trip.boosted_interval(0.5) - 8.66).abs() < 0.005);
    }

    #[test]
    fn duration_matches_script() {
        let built = construct(0.5, frame());
        assert!(built.scene.duration().approx_eq(34.0));
    }

    #[test]
    fn interval_labels_show_computed_values() {
        let built = construct(0.5, frame());
        let end = built.scene.snapshot(built.scene.duration());
        let text = |id| match &end.object(id).mobject.shape {
            Shape::Text { content, .. } => end.resolve_text(content),
            other => panic!("not a label: {other:?}"),
        };
        assert_eq!(text(built.rest_interval_label), "Δct = 10.00 ly");
        assert_eq!(text(built.rocket_interval_label), "Δct′ = 8.66 ly");
    }

    #[test]
    fn events_end_up_boosted() {
        let built = construct(0.5, frame());
        let end = built.scene.snapshot(built.scene.duration());
        let ((_, t0), (_, t1)) = built.trip.boosted(0.5);
        let launch = end.object(built.launch).mobject.center();
        let landing = end.object(built.landing).mobject.center();
        assert!(launch.approx_eq(built.plane.c2p(0.0, t0)));
        assert!(landing.approx_eq(built.plane.c2p(0.0, t1)));
        assert!(end.tracker(built.velocity).approx_eq(0.5));
    }

    #[test]
    fn rocket_ends_on_landing() {
        let built = construct(0.5, frame());
        let Shape::Path { points, .. } = &built.scene.mobject(built.rocket).shape else {
            panic!("rocket is a path");
        };
        let last = points.last().copied().unwrap_or_default();
        assert!(last.approx_eq(built.plane.c2p(2.5, 5.0)));
    }

    #[test]
    fn nothing_is_visible_before_the_first_step() {
        let built = construct(0.5, frame());
        assert!(built.scene.snapshot(-1.0).visible().is_empty());
    }
}
