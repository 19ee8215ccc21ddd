//! Ring rotation driven by wheel and touch input.
//!
//! Input handlers only move the target angle and the idle bookkeeping.
//! [`RotationEngine::tick`] is the only writer of the current angle.

use egui::{Pos2, Vec2};

pub const FULL_TURN: f64 = 360.0;
const HALF_TURN: f64 = FULL_TURN / 2.0;

/// Maps any angle into `[0, 360)`.
pub fn normalize(angle: f64) -> f64 {
    let angle = angle.rem_euclid(FULL_TURN);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if angle >= FULL_TURN {
        0.0
    } else {
        angle
    }
}

pub fn angle_per_card(quantity: usize) -> f64 {
    FULL_TURN / quantity.max(1) as f64
}

/// Fixed slot angle of a card on the ring.
pub fn card_angle(index: usize, quantity: usize) -> f64 {
    angle_per_card(quantity) * index as f64
}

/// Where a card ends up relative to the viewer, in `[0, 360)`.
pub fn effective_angle(index: usize, quantity: usize, rotation: f64) -> f64 {
    normalize(card_angle(index, quantity) + normalize(rotation))
}

pub fn is_card_in_front(index: usize, quantity: usize, rotation: f64) -> bool {
    const WINDOW: f64 = 45.0;
    let angle = effective_angle(index, quantity, rotation);
    angle < WINDOW || angle > FULL_TURN - WINDOW
}

/// The ring slot closest to `rotation` and the target angle that reaches it
/// without turning more than half a turn.
///
/// Exact ties go to the higher slot.
pub fn nearest_slot(rotation: f64, quantity: usize) -> (usize, f64) {
    let quantity = quantity.max(1);
    let per_card = angle_per_card(quantity);

    let slot = (normalize(rotation) / per_card).round();
    let full_turns = (rotation / FULL_TURN).floor();

    let mut target = full_turns * FULL_TURN + slot * per_card;
    let jump = target - rotation;
    if jump.abs() > HALF_TURN {
        target -= FULL_TURN.copysign(jump);
    }

    (slot as usize % quantity, target)
}

/// The card that faces the viewer when the ring rests on `slot`.
pub const fn card_for_slot(slot: usize, quantity: usize) -> usize {
    let quantity = if quantity == 0 { 1 } else { quantity };
    (quantity - slot % quantity) % quantity
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Smoothing {
    /// Fixed blend applied on every tick, so the feel follows the repaint rate.
    PerFrame(f64),
    /// Decay rate per second, the blend is `1 - exp(-rate * dt)`.
    PerSecond(f64),
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::PerFrame(Self::FACTOR)
    }
}

impl Smoothing {
    pub const FACTOR: f64 = 0.08;
    const REFERENCE_HZ: f64 = 60.0;

    /// Frame independent smoothing that matches [`Self::FACTOR`] at 60hz.
    pub fn frame_independent() -> Self {
        Self::per_second_from(Self::FACTOR, Self::REFERENCE_HZ)
    }

    pub fn per_second_from(factor: f64, hz: f64) -> Self {
        Self::PerSecond(-(1.0 - factor.clamp(0.0, 0.999)).ln() * hz)
    }

    fn blend(self, dt: f64) -> f64 {
        match self {
            Self::PerFrame(factor) => factor.clamp(0.0, 1.0),
            Self::PerSecond(rate) => 1.0 - (-rate * dt.max(0.0)).exp(),
        }
    }

    // per-second smoothing compares motion as if it happened over a 60hz frame
    fn frame_motion(self, moved: f64, dt: f64) -> f64 {
        match self {
            Self::PerFrame(..) => moved,
            Self::PerSecond(..) if dt > 0.0 => moved / (dt * Self::REFERENCE_HZ),
            Self::PerSecond(..) => 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineSettings {
    /// Degrees of rotation per unit of scroll delta.
    pub sensitivity: f32,
    pub smoothing: Smoothing,
    /// Largest target change a single input event may cause.
    pub max_input_step: Option<f32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.15,
            smoothing: Smoothing::default(),
            max_input_step: None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MotionPhase {
    /// Input arrived since the last snap.
    Spinning,
    /// Snapped onto a card and easing into place. Cards may flip.
    Settling,
    /// Resting on a card.
    #[default]
    Stopped,
}

impl MotionPhase {
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Spinning)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tick {
    pub angle: f64,
    pub phase: MotionPhase,
    /// Ring slot chosen when this tick performed the snap.
    pub snapped: Option<usize>,
}

#[derive(Copy, Clone, Debug)]
struct TouchTrack {
    start: Pos2,
    last_x: f32,
}

#[derive(Debug, Clone)]
pub struct RotationEngine {
    settings: EngineSettings,
    quantity: usize,

    current: f64,
    target: f64,
    phase: MotionPhase,

    last_input: f64,
    last_tick: Option<f64>,
    touch: Option<TouchTrack>,
}

impl Default for RotationEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default(), 1)
    }
}

impl RotationEngine {
    const SNAP_MOTION: f64 = 0.05;
    const SNAP_IDLE: f64 = 0.2;
    const STOP_DISTANCE: f64 = 0.1;
    const STOP_IDLE: f64 = 0.3;
    const TOUCH_GAIN: f64 = 3.0;

    pub fn new(settings: EngineSettings, quantity: usize) -> Self {
        Self {
            settings,
            quantity: quantity.max(1),
            current: 0.0,
            target: 0.0,
            phase: MotionPhase::Stopped,
            last_input: f64::NEG_INFINITY,
            last_tick: None,
            touch: None,
        }
    }

    pub const fn angle(&self) -> f64 {
        self.current
    }

    pub const fn target(&self) -> f64 {
        self.target
    }

    pub const fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub const fn quantity(&self) -> usize {
        self.quantity
    }

    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn angle_per_card(&self) -> f64 {
        angle_per_card(self.quantity)
    }

    pub fn is_card_in_front(&self, index: usize) -> bool {
        is_card_in_front(index, self.quantity, self.current)
    }

    /// Whether a card is allowed to flip to its detailed face right now.
    pub fn can_flip(&self, index: usize) -> bool {
        self.phase.is_settled() && self.is_card_in_front(index)
    }

    /// Changes the number of cards on the ring.
    ///
    /// The angles are kept, but the resting episode starts over so the next
    /// idle tick snaps onto the new slot spacing.
    pub fn set_quantity(&mut self, quantity: usize) {
        let quantity = quantity.max(1);
        if quantity == self.quantity {
            return;
        }
        self.quantity = quantity;
        self.phase = MotionPhase::Spinning;
    }

    /// Advances the smoothing by one frame at time `now` (seconds).
    pub fn tick(&mut self, now: f64) -> Tick {
        let dt = self
            .last_tick
            .map_or(0.0, |last| (now - last).max(0.0));
        self.last_tick = Some(now);

        let smoothing = self.settings.smoothing;
        let previous = self.current;
        self.current += (self.target - self.current) * smoothing.blend(dt);

        let moved = smoothing.frame_motion((self.current - previous).abs(), dt);
        let idle = now - self.last_input;

        let mut snapped = None;
        if self.phase == MotionPhase::Spinning
            && moved < Self::SNAP_MOTION
            && idle > Self::SNAP_IDLE
        {
            snapped = Some(self.snap());
            self.phase = MotionPhase::Settling;
        }

        let distance = (self.current - self.target).abs();
        if self.phase == MotionPhase::Settling
            && distance < Self::STOP_DISTANCE
            && idle > Self::STOP_IDLE
        {
            self.phase = MotionPhase::Stopped;
        }

        Tick {
            angle: self.current,
            phase: self.phase,
            snapped,
        }
    }

    fn snap(&mut self) -> usize {
        let (slot, target) = nearest_slot(self.current, self.quantity);
        log::trace!("snap {:.2} -> {target:.2} (slot {slot})", self.current);
        self.target = target;
        slot
    }

    /// A wheel event. `delta` uses the DOM convention, positive `y` scrolls down.
    pub fn wheel(&mut self, delta: Vec2, now: f64) {
        let dominant = if delta.x.abs() > delta.y.abs() {
            delta.x
        } else {
            delta.y
        };

        self.phase = MotionPhase::Spinning;
        self.last_input = now;
        self.push_target(f64::from(dominant) * self.sensitivity());
    }

    pub fn touch_start(&mut self, pos: Pos2) {
        self.touch = Some(TouchTrack {
            start: pos,
            last_x: pos.x,
        });
        self.phase = MotionPhase::Spinning;
    }

    /// Only horizontally dominant moves rotate the ring, inverted and
    /// amplified relative to the wheel.
    pub fn touch_move(&mut self, pos: Pos2, now: f64) {
        let track = match &mut self.touch {
            Some(track) => track,
            None => return,
        };

        let step_x = pos.x - track.last_x;
        let drift_y = pos.y - track.start.y;
        track.last_x = pos.x;

        if step_x.abs() > drift_y.abs() {
            self.last_input = now;
            self.push_target(-f64::from(step_x) * self.sensitivity() * Self::TOUCH_GAIN);
        }
    }

    pub fn touch_end(&mut self, now: f64) {
        self.touch = None;
        self.last_input = now;
    }

    fn sensitivity(&self) -> f64 {
        f64::from(self.settings.sensitivity)
    }

    fn push_target(&mut self, step: f64) {
        let step = match self.settings.max_input_step.map(f64::from) {
            Some(max) => step.clamp(-max.abs(), max.abs()),
            None => step,
        };
        self.target += step;
    }
}
