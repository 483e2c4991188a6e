use glam::Vec2;

use crate::controller::{CharacterController, CharacterState, ConfigError, MovementConfig, Telemetry};
use crate::grounding::MotionSolver;
use crate::input::{Buttons, InputCollector};

/// Fixed-step accumulator: wall-clock deltas in, whole simulation ticks
/// out. Clamps huge deltas so a stall cannot trigger a tick avalanche.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    const MAX_ACCUMULATED: f32 = 0.25;

    /// `tick_rate` must be nonzero; a zero rate would make `dt` infinite.
    pub fn new(tick_rate: u32) -> Self {
        assert!(tick_rate > 0, "tick_rate must be nonzero");
        Self {
            dt: 1.0 / tick_rate as f32,
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator = (self.accumulator + delta).min(Self::MAX_ACCUMULATED);
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }

    /// Fraction of the next tick already accumulated, for render
    /// interpolation.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }
}

/// Owns one character's controller, state and solver and runs fixed ticks.
/// Input can arrive at any cadence through `push_input`; each tick captures
/// whatever accumulated into one immutable snapshot before stepping.
pub struct Simulation<S: MotionSolver> {
    controller: CharacterController,
    state: CharacterState,
    solver: S,
    collector: InputCollector,
    timestep: FixedTimestep,
}

impl<S: MotionSolver> Simulation<S> {
    pub fn new(config: MovementConfig, solver: S, tick_rate: u32) -> Result<Self, ConfigError> {
        if tick_rate == 0 {
            return Err(ConfigError::NonPositive {
                name: "tick_rate",
                value: 0.0,
            });
        }

        let controller = CharacterController::new(config)?;
        let state = CharacterState::new(controller.config());

        Ok(Self {
            controller,
            state,
            solver,
            collector: InputCollector::new(),
            timestep: FixedTimestep::new(tick_rate),
        })
    }

    pub fn push_input(&mut self, move_axes: Vec2, look_delta: Vec2, pressed: Buttons) {
        self.collector.push(move_axes, look_delta, pressed);
    }

    /// Advances by wall-clock `delta`, running as many fixed ticks as
    /// accumulated. Returns the number of ticks run.
    pub fn update(&mut self, delta: f32) -> u32 {
        self.timestep.accumulate(delta);

        let mut ticks_run = 0;
        while self.timestep.consume_tick() {
            self.tick();
            ticks_run += 1;
        }
        ticks_run
    }

    /// Runs exactly one fixed tick.
    pub fn tick(&mut self) {
        let intent = self.collector.take();
        let dt = self.timestep.dt();
        self.controller
            .step(&intent, &mut self.state, &mut self.solver, dt);
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn telemetry(&self) -> Telemetry {
        self.state.telemetry()
    }

    pub fn fov_offset(&self) -> f32 {
        self.controller.fov_offset(&self.state)
    }

    pub fn interpolation_alpha(&self) -> f32 {
        self.timestep.alpha()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grounding::{GroundingSnapshot, MovementHit};
    use glam::{Quat, Vec3};

    struct InertSolver;

    impl MotionSolver for InertSolver {
        fn grounding(&self) -> GroundingSnapshot {
            GroundingSnapshot::airborne()
        }
        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }
        fn move_body(&mut self, _translation: Vec3, _dt: f32) -> Vec<MovementHit> {
            Vec::new()
        }
        fn rotate(&mut self, _rotation: Quat) {}
        fn force_unground(&mut self) {}
    }

    #[test]
    fn zero_tick_rate_rejected_at_construction() {
        assert!(Simulation::new(MovementConfig::default(), InertSolver, 0).is_err());
    }

    #[test]
    fn valid_tick_rate_keeps_velocity_finite() {
        let mut sim = Simulation::new(MovementConfig::default(), InertSolver, 60).unwrap();
        sim.tick();
        assert!(sim.state().velocity.is_finite());
    }

    #[test]
    fn accumulator_yields_whole_ticks() {
        let mut ts = FixedTimestep::new(60);

        ts.accumulate(1.0 / 30.0);
        assert!(ts.consume_tick());
        assert!(ts.consume_tick());
        assert!(!ts.consume_tick());
    }

    #[test]
    fn accumulator_clamps_stalls() {
        let mut ts = FixedTimestep::new(60);
        ts.accumulate(10.0);

        let mut ticks = 0;
        while ts.consume_tick() {
            ticks += 1;
        }
        assert!(ticks <= 15);
    }

    #[test]
    fn alpha_tracks_partial_tick() {
        let mut ts = FixedTimestep::new(60);
        ts.accumulate(1.0 / 120.0);
        assert!((ts.alpha() - 0.5).abs() < 1e-4);
    }
}
