//! Tween / timeline model for the choice transition.
//!
//! The choreography is described as data: a handful of [`Tween`]s with start
//! offsets inside one [`Timeline`]. The presenter samples the timeline by
//! elapsed milliseconds each animation frame and writes the values into
//! element styles; nothing in here touches the DOM, so the exact staging
//! (overlap offset, total length, per-target values) is testable natively.

/// Duration of the chosen-block exit (drop + full rotation).
pub const EXIT_DURATION_MS: f64 = 1500.0;
/// Degrees the chosen block rotates while exiting.
pub const EXIT_ROTATION_DEG: f64 = 360.0;
/// Duration of the horizontal chain/block slide.
pub const SLIDE_DURATION_MS: f64 = 2000.0;
/// The slide starts this long before the exit tween ends.
pub const SLIDE_OVERLAP_MS: f64 = 1300.0;
/// Duration of the one-shot intro label exit.
pub const INTRO_DURATION_MS: f64 = 1200.0;

/// Easing curves used by the choreography.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Starts slow, accelerates (quadratic).
    In,
    /// Symmetric ease-in-out (quadratic both ends).
    InOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::In => t * t,
            Ease::InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

/// Animated visual property. X/Y are pixel translations from baseline,
/// Rotation is degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prop {
    X,
    Y,
    Rotation,
}

/// What a tween moves. Targets are roles, not concrete elements; the
/// presenter maps them onto elements using the chosen side and active slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// The block the player clicked.
    ChosenBlock,
    /// The other block of the departing pair.
    OtherBlock,
    /// The decorative chain strip.
    Chain,
    /// Both blocks of the pre-staged incoming pair.
    NextSlot,
    /// The intro label (intro sequence only).
    IntroLabel,
}

/// One animated property ramp inside a timeline.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    pub target: Target,
    pub prop: Prop,
    pub from: f64,
    pub to: f64,
    /// Offset of this tween's start from the timeline start.
    pub start_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    /// Value at `elapsed` ms since timeline start. Clamped: `from` before the
    /// tween begins, `to` after it ends.
    pub fn value_at(&self, elapsed: f64) -> f64 {
        let t = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed - self.start_ms) / self.duration_ms
        };
        self.from + (self.to - self.from) * self.ease.apply(t)
    }
}

/// An ordered bag of overlapping tweens with a single completion point.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    tweens: Vec<Tween>,
}

impl Timeline {
    pub fn new(tweens: Vec<Tween>) -> Self {
        Self { tweens }
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// Total length: end of the latest-ending tween.
    pub fn duration_ms(&self) -> f64 {
        self.tweens.iter().map(Tween::end_ms).fold(0.0, f64::max)
    }

    pub fn finished(&self, elapsed: f64) -> bool {
        elapsed >= self.duration_ms()
    }

    /// Sample one (target, prop) track, if the timeline animates it.
    pub fn value_of(&self, target: Target, prop: Prop, elapsed: f64) -> Option<f64> {
        self.tweens
            .iter()
            .find(|tw| tw.target == target && tw.prop == prop)
            .map(|tw| tw.value_at(elapsed))
    }
}

/// The full choice transition, parameterized by viewport size.
///
/// Staging: the chosen block drops one viewport height and turns a full
/// rotation over 1.5 s (ease-in); 1.3 s before that ends, the chain, the
/// non-chosen block, and the pre-staged next pair all slide one viewport
/// width rightward over 2 s (ease-in-out). The slide track ends last and is
/// the completion point.
#[derive(Clone, Debug)]
pub struct TransitionPlan {
    pub timeline: Timeline,
}

impl TransitionPlan {
    pub fn new(viewport_w: f64, viewport_h: f64) -> Self {
        let slide_start = EXIT_DURATION_MS - SLIDE_OVERLAP_MS;
        let slide = |target: Target, from: f64, to: f64| Tween {
            target,
            prop: Prop::X,
            from,
            to,
            start_ms: slide_start,
            duration_ms: SLIDE_DURATION_MS,
            ease: Ease::InOut,
        };
        let timeline = Timeline::new(vec![
            Tween {
                target: Target::ChosenBlock,
                prop: Prop::Y,
                from: 0.0,
                to: viewport_h,
                start_ms: 0.0,
                duration_ms: EXIT_DURATION_MS,
                ease: Ease::In,
            },
            Tween {
                target: Target::ChosenBlock,
                prop: Prop::Rotation,
                from: 0.0,
                to: EXIT_ROTATION_DEG,
                start_ms: 0.0,
                duration_ms: EXIT_DURATION_MS,
                ease: Ease::In,
            },
            slide(Target::Chain, 0.0, viewport_w),
            slide(Target::OtherBlock, 0.0, viewport_w),
            // Pre-staged one screen to the left; arrives at baseline.
            slide(Target::NextSlot, -viewport_w, 0.0),
        ]);
        Self { timeline }
    }

    pub fn duration_ms(&self) -> f64 {
        self.timeline.duration_ms()
    }

    pub fn finished(&self, elapsed: f64) -> bool {
        self.timeline.finished(elapsed)
    }
}

/// One-shot intro: the title label drops off-surface with an accelerating
/// ease, then the playing phase begins.
pub fn intro_plan(viewport_h: f64) -> Timeline {
    Timeline::new(vec![Tween {
        target: Target::IntroLabel,
        prop: Prop::Y,
        from: 0.0,
        to: viewport_h,
        start_ms: 0.0,
        duration_ms: INTRO_DURATION_MS,
        ease: Ease::In,
    }])
}
