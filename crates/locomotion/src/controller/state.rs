use std::fmt;

use glam::{Quat, Vec3};

use crate::fluidity::FluidityTracker;
use crate::grounding::GroundingSnapshot;
use crate::timing::{CooldownTimer, RequestWindow};

use super::MovementConfig;

/// Closed set of locomotion modes. Dispatch is by exhaustive match so a new
/// mode cannot be added without handling every behavior table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Ground,
    Air,
    Wall,
    Boost,
}

/// All mutable per-character simulation state, threaded explicitly through
/// the tick phases. Created once at spawn and alive for the character's
/// whole session; only the request windows and cooldowns reset when an
/// ability fires.
#[derive(Debug, Clone)]
pub struct CharacterState {
    pub mode: MotionState,

    pub velocity: Vec3,
    pub internal_velocity: Vec3,
    pub orientation: Quat,
    pub target_yaw: f32,
    pub head_pitch: f32,

    pub running: bool,
    pub run_amount: f32,

    pub jump_window: RequestWindow,
    pub jump_cooldown: CooldownTimer,
    pub boost_window: RequestWindow,
    pub boost_cooldown: CooldownTimer,
    pub wall_jump_window: RequestWindow,
    pub pending_boost: Option<Vec3>,

    pub wall_normal: Vec3,
    pub wall_contact_time: f32,

    pub fluidity: FluidityTracker,

    pub previous_grounding: GroundingSnapshot,
    pub pre_move_velocity: Vec3,
}

impl CharacterState {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            mode: MotionState::Ground,
            velocity: Vec3::ZERO,
            internal_velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            target_yaw: 0.0,
            head_pitch: 0.0,
            running: false,
            run_amount: 0.0,
            jump_window: RequestWindow::new(config.input_delay),
            jump_cooldown: CooldownTimer::ready(config.jump_cooldown),
            boost_window: RequestWindow::new(config.input_delay),
            boost_cooldown: CooldownTimer::ready(config.boost_cooldown),
            wall_jump_window: RequestWindow::new(config.wall_jump_expiry),
            pending_boost: None,
            wall_normal: Vec3::ZERO,
            wall_contact_time: 0.0,
            fluidity: FluidityTracker::new(
                config.fluidity_speed_up_time,
                config.fluidity_slow_down_time,
            ),
            previous_grounding: GroundingSnapshot::stable(Vec3::Y, Vec3::ZERO),
            pre_move_velocity: Vec3::ZERO,
        }
    }

    /// Swaps the locomotion mode, running the exit hook of the old mode and
    /// the enter hook of the new one. Safe to call several times within one
    /// tick (hit handling can chain transitions); a transition to the
    /// current mode is a no-op.
    pub fn transition(&mut self, to: MotionState) {
        if to == self.mode {
            return;
        }

        let from = self.mode;
        self.on_exit(from, to);
        self.mode = to;
        self.on_enter(to, from);
        log::debug!("transition {:?} -> {:?}", from, to);
    }

    fn on_enter(&mut self, state: MotionState, _from: MotionState) {
        match state {
            MotionState::Boost => {
                // A boost launch overrides any residual landing momentum.
                self.internal_velocity = Vec3::ZERO;
            }
            MotionState::Wall => {
                self.wall_contact_time = 0.0;
            }
            MotionState::Ground | MotionState::Air => {}
        }
    }

    fn on_exit(&mut self, state: MotionState, _to: MotionState) {
        match state {
            MotionState::Wall => {
                self.wall_normal = Vec3::ZERO;
            }
            MotionState::Ground | MotionState::Air | MotionState::Boost => {}
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            mode: self.mode,
            velocity: self.velocity,
            internal_velocity: self.internal_velocity,
            fluidity: self.fluidity.value(),
        }
    }
}

/// Read-only debug dump of the quantities worth watching at runtime.
#[derive(Debug, Clone, Copy)]
pub struct Telemetry {
    pub mode: MotionState,
    pub velocity: Vec3,
    pub internal_velocity: Vec3,
    pub fluidity: f32,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mode={:?} vel=({:.2}, {:.2}, {:.2}) internal=({:.2}, {:.2}, {:.2}) fluidity={:.2}",
            self.mode,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.internal_velocity.x,
            self.internal_velocity.y,
            self.internal_velocity.z,
            self.fluidity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_to_same_mode_is_noop() {
        let config = MovementConfig::default();
        let mut state = CharacterState::new(&config);
        state.internal_velocity = Vec3::new(1.0, 0.0, 0.0);

        state.transition(MotionState::Ground);
        assert_eq!(state.mode, MotionState::Ground);
        assert_eq!(state.internal_velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn entering_boost_zeroes_internal_velocity() {
        let config = MovementConfig::default();
        let mut state = CharacterState::new(&config);
        state.internal_velocity = Vec3::new(3.0, 0.0, -2.0);

        state.transition(MotionState::Boost);
        assert_eq!(state.internal_velocity, Vec3::ZERO);
    }

    #[test]
    fn leaving_wall_clears_wall_normal() {
        let config = MovementConfig::default();
        let mut state = CharacterState::new(&config);
        state.transition(MotionState::Wall);
        state.wall_normal = Vec3::X;

        state.transition(MotionState::Air);
        assert_eq!(state.wall_normal, Vec3::ZERO);
    }

    #[test]
    fn telemetry_formats_all_fields() {
        let config = MovementConfig::default();
        let state = CharacterState::new(&config);
        let line = state.telemetry().to_string();
        assert!(line.contains("mode=Ground"));
        assert!(line.contains("fluidity=0.00"));
    }
}
