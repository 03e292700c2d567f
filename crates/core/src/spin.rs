//! Spin animation
//!
//! Drives the wheel's rotation from whatever angle it idles at to an angle
//! that puts the pre-selected wedge under the pointer. The host calls
//! [`SpinAnimator::advance`] once per frame with the real elapsed time, so
//! the result does not depend on frame rate.
//!
//! Angles are radians. The pointer sits at angle 0 (the wheel's right-hand
//! side) and wedge `i` spans `[rotation + i*arc, rotation + (i+1)*arc)`.

use std::f64::consts::TAU;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::SpinConfig;
use crate::error::SpinRefusal;
use crate::models::{DrawNumber, WheelSegment};
use crate::segments::drawable_segments;

/// Quartic ease-out: fast start, long gentle stop
pub fn ease_out_quart(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(4)
}

/// Index of the wedge under the pointer for a given rotation
pub fn segment_at_pointer(rotation: f64, segment_count: usize) -> Option<usize> {
    if segment_count == 0 {
        return None;
    }
    let arc = TAU / segment_count as f64;
    let normalized = rotation.rem_euclid(TAU);
    let angle_from_start = (TAU - normalized).rem_euclid(TAU);
    Some((angle_from_start / arc).floor() as usize % segment_count)
}

/// Everything fixed at the moment a spin starts
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    pub target_index: usize,
    /// Value of the target wedge, reported verbatim on landing
    pub landed_value: DrawNumber,
    pub segment_count: usize,
    pub start_rotation: f64,
    /// Normalized rotation that centres the target wedge on the pointer
    pub target_rotation: f64,
    pub total_change: f64,
    pub base_spins: u32,
    pub duration: Duration,
}

impl SpinPlan {
    pub fn compute(
        config: &SpinConfig,
        segments: &[WheelSegment],
        target_index: usize,
        start_rotation: f64,
    ) -> Result<Self, SpinRefusal> {
        let segment_count = segments.len();
        if segment_count == 0 {
            return Err(SpinRefusal::DegenerateLayout);
        }
        let target = segments.get(target_index).ok_or(SpinRefusal::TargetOutOfRange {
            index: target_index,
            len: segment_count,
        })?;

        let single_candidate = drawable_segments(segments) == 1;
        let base_spins = config.spins(single_candidate);
        let arc = TAU / segment_count as f64;

        let target_rotation =
            base_spins as f64 * TAU + (TAU - (target_index as f64 + 0.5) * arc);
        let total_change = target_rotation - start_rotation.rem_euclid(TAU);

        Ok(Self {
            target_index,
            landed_value: target.value,
            segment_count,
            start_rotation,
            target_rotation,
            total_change,
            base_spins,
            duration: config.duration(single_candidate),
        })
    }

    pub fn arc(&self) -> f64 {
        TAU / self.segment_count as f64
    }

    pub fn final_rotation(&self) -> f64 {
        self.start_rotation + self.total_change
    }

    /// Rotation at a point in time; exact final value once `elapsed >= duration`
    pub fn rotation_at(&self, elapsed: Duration) -> f64 {
        let progress = self.progress_at(elapsed);
        if progress >= 1.0 {
            return self.final_rotation();
        }
        self.start_rotation + self.total_change * ease_out_quart(progress)
    }

    pub fn progress_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

/// Terminal event of a spin
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    pub value: DrawNumber,
    pub target_index: usize,
    pub rotation: f64,
}

/// Receives spin side effects (sound, haptics, UI updates)
pub trait SpinObserver {
    /// The wheel moved past a wedge boundary this frame
    fn on_tick(&mut self) {}

    /// Fired once when the spin completes
    fn on_landed(&mut self, _landing: &Landing) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SpinObserver for NoopObserver {}

/// Snapshot handed to the renderer each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub rotation: f64,
    /// Decorative outer rim, independent of the draw
    pub rim_rotation: f64,
    pub is_spinning: bool,
    /// `0..=1` while spinning, 1 once stopped, 0 while idle
    pub progress: f64,
}

/// Live progress of an active spin
#[derive(Debug, Clone, PartialEq)]
pub struct SpinState {
    pub plan: SpinPlan,
    pub elapsed: Duration,
    last_boundary: i64,
}

impl SpinState {
    pub fn current_rotation(&self) -> f64 {
        self.plan.rotation_at(self.elapsed)
    }

    pub fn progress(&self) -> f64 {
        self.plan.progress_at(self.elapsed)
    }
}

#[derive(Debug, Clone)]
enum Motion {
    Idle,
    Spinning(SpinState),
    Stopped(Landing),
}

/// Owns the wheel rotation
#[derive(Debug, Clone)]
pub struct SpinAnimator {
    config: SpinConfig,
    rotation: f64,
    rim_rotation: f64,
    motion: Motion,
}

impl SpinAnimator {
    pub fn new(config: SpinConfig) -> Self {
        Self {
            config,
            rotation: 0.0,
            rim_rotation: 0.0,
            motion: Motion::Idle,
        }
    }

    /// Start idling from a given angle
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.motion, Motion::Spinning(_))
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.motion, Motion::Stopped(_))
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn rim_rotation(&self) -> f64 {
        self.rim_rotation
    }

    /// Wedge the active (or just finished) spin is aiming at
    pub fn target_index(&self) -> Option<usize> {
        match &self.motion {
            Motion::Spinning(state) => Some(state.plan.target_index),
            Motion::Stopped(landing) => Some(landing.target_index),
            Motion::Idle => None,
        }
    }

    pub fn spin_state(&self) -> Option<&SpinState> {
        match &self.motion {
            Motion::Spinning(state) => Some(state),
            _ => None,
        }
    }

    pub fn landing(&self) -> Option<&Landing> {
        match &self.motion {
            Motion::Stopped(landing) => Some(landing),
            _ => None,
        }
    }

    /// Begin spinning toward `target_index`. Refused while another spin is
    /// active; a spin cannot be cancelled once started.
    pub fn start_spin(&mut self, segments: &[WheelSegment], target_index: usize) -> Result<SpinPlan, SpinRefusal> {
        if self.is_spinning() {
            return Err(SpinRefusal::AlreadySpinning);
        }

        let plan = SpinPlan::compute(&self.config, segments, target_index, self.rotation)?;
        info!(
            target_index,
            value = %plan.landed_value,
            segments = plan.segment_count,
            base_spins = plan.base_spins,
            duration_ms = plan.duration.as_millis() as u64,
            "Spin started"
        );

        let last_boundary = (self.rotation / plan.arc()).floor() as i64;
        self.motion = Motion::Spinning(SpinState {
            plan: plan.clone(),
            elapsed: Duration::ZERO,
            last_boundary,
        });
        Ok(plan)
    }

    /// Advance by one frame's worth of wall-clock time
    pub fn advance(&mut self, delta: Duration, observer: &mut dyn SpinObserver) -> RotationState {
        let dt = delta.as_secs_f64();

        let rim_velocity = if self.is_spinning() {
            self.config.rim_spin_velocity
        } else {
            self.config.rim_idle_velocity
        };
        self.rim_rotation = (self.rim_rotation - rim_velocity * dt).rem_euclid(TAU);

        let mut landed = None;
        let progress = match &mut self.motion {
            Motion::Idle => {
                self.rotation = (self.rotation + self.config.idle_velocity * dt).rem_euclid(TAU);
                0.0
            }
            Motion::Stopped(_) => 1.0,
            Motion::Spinning(state) => {
                state.elapsed += delta;
                let progress = state.progress();
                self.rotation = state.current_rotation();

                let boundary = (self.rotation / state.plan.arc()).floor() as i64;
                if boundary > state.last_boundary {
                    state.last_boundary = boundary;
                    observer.on_tick();
                }

                if progress >= 1.0 {
                    landed = Some(Landing {
                        value: state.plan.landed_value,
                        target_index: state.plan.target_index,
                        rotation: state.plan.final_rotation(),
                    });
                }
                progress
            }
        };

        if let Some(landing) = landed {
            self.rotation = landing.rotation;
            info!(value = %landing.value, target_index = landing.target_index, "Spin landed");
            observer.on_landed(&landing);
            self.motion = Motion::Stopped(landing);
        }

        RotationState {
            rotation: self.rotation,
            rim_rotation: self.rim_rotation,
            is_spinning: self.is_spinning(),
            progress,
        }
    }

    /// Leave the stopped state and resume idling. No-op while spinning.
    pub fn release(&mut self) {
        if let Motion::Stopped(_) = self.motion {
            self.rotation = self.rotation.rem_euclid(TAU);
            self.motion = Motion::Idle;
            debug!("Wheel released to idle");
        }
    }

    /// Wedge currently under the pointer, for the live number readout only
    pub fn segment_at_pointer<'a>(&self, segments: &'a [WheelSegment]) -> Option<&'a WheelSegment> {
        segment_at_pointer(self.rotation, segments.len()).and_then(|i| segments.get(i))
    }
}

impl Default for SpinAnimator {
    fn default() -> Self {
        Self::new(SpinConfig::default())
    }
}
