use super::{MobjectId, TrackerId, mobject::Mobject};

/// Maps linear progress in `[0, 1]` onto eased progress in the same range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RateFunc {
    Linear,
    #[default]
    Smooth,
}

impl RateFunc {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smooth => smooth(t, 10.0),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid rescaled so that it passes exactly through (0, 0) and (1, 1).
fn smooth(t: f64, inflection: f64) -> f64 {
    let error = sigmoid(-inflection / 2.0);
    ((sigmoid(inflection * (t - 0.5)) - error) / (1.0 - 2.0 * error)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// Draws the object progressively along its outline.
    Create(MobjectId),
    /// Reveals a label character by character.
    Write(MobjectId),
    FadeIn(MobjectId),
    FadeOut(MobjectId),
    /// Morphs the object's geometry into `into`.
    Transform { target: MobjectId, into: Mobject },
    /// Moves a value tracker towards `value`.
    SetValue { tracker: TrackerId, value: f64 },
}

/// Animations that run together.
#[derive(Debug, Clone, PartialEq)]
pub struct Play {
    pub animations: Vec<Animation>,
    pub run_time: f64,
    pub rate: RateFunc,
}

impl Play {
    pub fn new(animations: impl IntoIterator<Item = Animation>) -> Self {
        Self {
            animations: animations.into_iter().collect(),
            run_time: 1.0,
            rate: RateFunc::default(),
        }
    }

    pub fn run_time(self, run_time: f64) -> Self {
        Self { run_time, ..self }
    }

    pub fn rate(self, rate: RateFunc) -> Self {
        Self { rate, ..self }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Play(Play),
    Wait(f64),
}

impl Step {
    pub fn duration(&self) -> f64 {
        match self {
            Step::Play(play) => play.run_time,
            Step::Wait(duration) => *duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx_eq::ApproxEq;

    #[test]
    fn rate_functions_hit_both_ends() {
        for rate in [RateFunc::Linear, RateFunc::Smooth] {
            assert!(rate.apply(0.0).approx_eq(0.0), "{rate:?}");
            assert!(rate.apply(1.0).approx_eq(1.0), "{rate:?}");
            assert!(rate.apply(0.5).approx_eq(0.5), "{rate:?}");
        }
    }

    #[test]
    fn rate_functions_clamp() {
        assert_eq!(RateFunc::Linear.apply(1.5), 1.0);
        assert_eq!(RateFunc::Smooth.apply(-0.5), 0.0);
    }

    #[test]
    fn smooth_eases_in() {
        assert!(RateFunc::Smooth.apply(0.1) < 0.1);
        assert!(RateFunc::Smooth.apply(0.9) > 0.9);
    }

    #[test]
    fn play_defaults() {
        let play = Play::new([]);
        assert_eq!(play.run_time, 1.0);
        assert_eq!(play.rate, RateFunc::Smooth);
        assert_eq!(Step::Play(play.run_time(3.0)).duration(), 3.0);
        assert_eq!(Step::Wait(2.0).duration(), 2.0);
    }
}
