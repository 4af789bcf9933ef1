//! Assembly animation state machine.
//!
//! A single animation session interpolates the scene's assembly progress from
//! its current value to a target over a duration, shaped by an ease-in-out
//! quadratic curve. The animator never schedules itself: the tick driver calls
//! [`AssemblyAnimator::advance`] with a caller-supplied timestamp every frame,
//! which keeps the whole state machine deterministic under test.
//!
//! Sessions are single-flight: a second `begin` while one is active is dropped
//! (not queued), and the part sequence must not be mutated while a session is
//! open.

use cgmath::Vector3;
use instant::Duration;

use crate::data_structures::scene::SceneModel;

/// Disassembly spread radius at progress 0.
const SPREAD_RADIUS: f64 = 5.0;
/// Vertical stacking factor applied per part index.
const SPREAD_LIFT: f64 = 0.5;

/// Transient state of one running animation. The clock starts on the first
/// `advance` after the session opens, so opening a session needs no timestamp.
#[derive(Clone, Copy, Debug)]
struct AnimationSession {
    start_progress: f64,
    target_progress: f64,
    started_at: Option<Duration>,
    duration: Duration,
}

/// What one `advance` tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// No session active; nothing changed.
    Idle,
    /// Progress and part positions were updated; the session continues.
    Running,
    /// The session reached its target and closed this tick.
    Completed,
}

#[derive(Debug, Default)]
pub struct AssemblyAnimator {
    session: Option<AnimationSession>,
}

impl AssemblyAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session from the scene's current progress towards `target`.
    ///
    /// Returns `false` and changes nothing when a session is already active:
    /// concurrent requests are deliberately dropped rather than queued.
    ///
    /// A zero duration snaps the scene to the target synchronously (progress
    /// set, part positions updated) and never opens a session; the caller
    /// still gets `true` and should fire its completion notification.
    pub fn begin(&mut self, scene: &mut SceneModel, target: f64, duration_ms: u64) -> bool {
        if self.session.is_some() {
            log::warn!("assembly animation already running, request dropped");
            return false;
        }

        let target = target.clamp(0.0, 1.0);
        if duration_ms == 0 {
            scene.set_progress(target);
            update_part_positions(scene);
            return true;
        }

        self.session = Some(AnimationSession {
            start_progress: scene.progress(),
            target_progress: target,
            started_at: None,
            duration: Duration::from_millis(duration_ms),
        });
        true
    }

    /// Advance the active session to `now` and write the eased progress and
    /// derived part positions back into the scene.
    ///
    /// `now` is a timestamp on whatever monotonic clock the tick driver uses;
    /// only differences between successive values matter.
    pub fn advance(&mut self, now: Duration, scene: &mut SceneModel) -> Tick {
        let Some(session) = self.session.as_mut() else {
            return Tick::Idle;
        };

        let started_at = *session.started_at.get_or_insert(now);
        let elapsed = now.saturating_sub(started_at);
        let raw = (elapsed.as_secs_f64() / session.duration.as_secs_f64()).min(1.0);
        let eased = ease_in_out(raw);

        let progress =
            session.start_progress + (session.target_progress - session.start_progress) * eased;
        scene.set_progress(progress);
        update_part_positions(scene);

        if raw >= 1.0 {
            self.session = None;
            Tick::Completed
        } else {
            Tick::Running
        }
    }

    /// Drop the active session without touching the scene. Used only at viewer
    /// teardown; there is no mid-flight cancellation during normal operation.
    pub fn abort(&mut self) {
        self.session = None;
    }
}

/// Ease-in-out quadratic: accelerate to the midpoint, decelerate after.
pub fn ease_in_out(t: f64) -> f64 {
    if t <= 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Re-derive every part's position from the scene's assembly progress.
///
/// The offset is a pure function of `(progress, index, part count)`: parts fan
/// out on a circle of radius `(1 - progress) * 5` while climbing by half the
/// offset per index. At progress 1 the offset vanishes and every part sits at
/// its original position.
pub fn update_part_positions(scene: &mut SceneModel) {
    let count = scene.len();
    let progress = scene.progress();
    for (index, part) in scene.parts_mut().iter_mut().enumerate() {
        part.current_position = part.original_position() + spread_offset(progress, index, count);
    }
}

/// Disassembly offset for the part at `index` of `count` total parts.
pub fn spread_offset(progress: f64, index: usize, count: usize) -> Vector3<f64> {
    let offset = (1.0 - progress) * SPREAD_RADIUS;
    let angle = index as f64 / count as f64 * std::f64::consts::TAU;
    Vector3::new(
        angle.cos() * offset,
        index as f64 * offset * SPREAD_LIFT,
        angle.sin() * offset,
    )
}
