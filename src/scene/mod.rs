//! Scene timeline.
//!
//! A [`Scene`] is a registry of objects and value trackers plus a linear list of steps.
//! Nothing is rendered eagerly: [`Scene::snapshot`] replays the steps up to a point in time
//! and returns the resolved state, so any consumer (renderer, tests, the terminal view) pulls
//! exactly the state it needs.

pub mod animation;
pub mod ltf;
pub mod mobject;
pub mod plane;

use animation::{Animation, Play, Step};
use log::debug;
use mobject::{Anchor, LabelText, Mobject, lerp};

use crate::relativity::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MobjectId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackerId(pub(crate) usize);

/// State of one registered object at some instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectState {
    pub mobject: Mobject,
    pub visible: bool,
    /// How much of the outline (or text) is drawn, in `[0, 1]`.
    pub progress: f64,
    /// Multiplies the object's own opacity.
    pub opacity: f64,
}

impl ObjectState {
    fn hidden(mobject: Mobject) -> Self {
        Self {
            mobject,
            visible: false,
            progress: 0.0,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    mobjects: Vec<Mobject>,
    trackers: Vec<f64>,
    steps: Vec<Step>,
    /// Visible area in scene units, used to resolve corner anchors.
    frame: (f64, f64),
}

impl Scene {
    pub fn new(frame_width: f64, frame_height: f64) -> Self {
        Self {
            frame: (frame_width, frame_height),
            ..Default::default()
        }
    }

    /// Registers an object. It stays invisible until an animation shows it.
    pub fn add(&mut self, mobject: Mobject) -> MobjectId {
        self.mobjects.push(mobject);
        MobjectId(self.mobjects.len() - 1)
    }

    /// Registered geometry, before any step ran.
    pub fn mobject(&self, id: MobjectId) -> &Mobject {
        &self.mobjects[id.0]
    }

    pub fn tracker(&mut self, value: f64) -> TrackerId {
        self.trackers.push(value);
        TrackerId(self.trackers.len() - 1)
    }

    pub fn play(&mut self, play: Play) {
        self.steps.push(Step::Play(play));
    }

    pub fn wait(&mut self, duration: f64) {
        self.steps.push(Step::Wait(duration));
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn duration(&self) -> f64 {
        self.steps.iter().map(Step::duration).sum()
    }

    /// State of every object at `time` seconds. Times past the end give the final state.
    pub fn snapshot(&self, time: f64) -> Snapshot {
        let mut snapshot = Snapshot {
            objects: self.mobjects.iter().cloned().map(ObjectState::hidden).collect(),
            trackers: self.trackers.clone(),
            frame: self.frame,
        };

        let mut start = 0.0;
        for (index, step) in self.steps.iter().enumerate() {
            let end = start + step.duration();
            if time < start {
                break;
            }
            if let Step::Play(play) = step {
                let linear = if time >= end || play.run_time <= 0.0 {
                    1.0
                } else {
                    (time - start) / play.run_time
                };
                let alpha = play.rate.apply(linear);
                for animation in &play.animations {
                    snapshot.apply(animation, alpha);
                }
                if linear < 1.0 {
                    debug!("snapshot at {time:.3}s is inside step {index} (alpha {alpha:.3})");
                }
            }
            start = end;
        }
        snapshot
    }
}

/// Fully resolved scene state at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    objects: Vec<ObjectState>,
    trackers: Vec<f64>,
    frame: (f64, f64),
}

impl Snapshot {
    fn apply(&mut self, animation: &Animation, alpha: f64) {
        match animation {
            Animation::Create(id) | Animation::Write(id) => {
                let state = &mut self.objects[id.0];
                state.visible = true;
                state.opacity = 1.0;
                state.progress = alpha;
            }
            Animation::FadeIn(id) => {
                let state = &mut self.objects[id.0];
                state.visible = true;
                state.progress = 1.0;
                state.opacity = alpha;
            }
            Animation::FadeOut(id) => {
                let state = &mut self.objects[id.0];
                state.opacity = 1.0 - alpha;
                if alpha >= 1.0 {
                    state.visible = false;
                }
            }
            Animation::Transform { target, into } => {
                let state = &mut self.objects[target.0];
                state.mobject = state.mobject.interpolate(into, alpha);
            }
            Animation::SetValue { tracker, value } => {
                let current = self.trackers[tracker.0];
                self.trackers[tracker.0] = lerp(current, *value, alpha);
            }
        }
    }

    pub fn object(&self, id: MobjectId) -> &ObjectState {
        &self.objects[id.0]
    }

    pub fn tracker(&self, id: TrackerId) -> f64 {
        self.trackers[id.0]
    }

    /// Visible objects in draw order (lowest z first, then registration order).
    pub fn visible(&self) -> Vec<&ObjectState> {
        let mut visible: Vec<_> = self
            .objects
            .iter()
            .filter(|s| s.visible && s.opacity > 0.0)
            .collect();
        visible.sort_by(|a, b| a.mobject.z_index.total_cmp(&b.mobject.z_index));
        visible
    }

    /// Where a label anchored at `anchor` sits right now.
    pub fn resolve_anchor(&self, anchor: &Anchor) -> Point {
        match anchor {
            Anchor::Fixed(p) => *p,
            Anchor::Follow { target, offset } => {
                let [x, y, z] = self.object(*target).mobject.center();
                [x + offset[0], y + offset[1], z]
            }
            Anchor::NextTo {
                target,
                direction,
                buff,
            } => {
                let mobject = &self.object(*target).mobject;
                let [cx, cy, cz] = mobject.center();
                let (lo, hi) = mobject.bounds().unwrap_or(([cx, cy, cz], [cx, cy, cz]));
                let edge = |d: f64, lo: f64, hi: f64, c: f64| {
                    if d > 0.0 {
                        hi + d * buff
                    } else if d < 0.0 {
                        lo + d * buff
                    } else {
                        c
                    }
                };
                [
                    edge(direction[0], lo[0], hi[0], cx),
                    edge(direction[1], lo[1], hi[1], cy),
                    cz,
                ]
            }
            Anchor::Corner {
                direction: [dx, dy],
                buff,
            } => {
                let (w, h) = (self.frame.0 / 2. - buff, self.frame.1 / 2. - buff);
                [dx.signum() * w, dy.signum() * h, 0.0]
            }
        }
    }

    /// Current text of a label.
    pub fn resolve_text(&self, content: &LabelText) -> String {
        match content {
            LabelText::Static(text) => text.clone(),
            LabelText::Tracker {
                prefix,
                tracker,
                decimals,
            } => format!("{prefix}{}", format_rounded(self.tracker(*tracker), *decimals)),
        }
    }
}

/// Rounds to `decimals` places and drops trailing zeros, so 0.5 prints as "0.5" and 0 as "0".
pub fn format_rounded(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" { "0".to_string() } else { text }
}
