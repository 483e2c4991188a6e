mod commands;
mod config;
mod state;

pub use commands::{HitCommand, HitCommandQueue};
pub use config::{ConfigError, MovementConfig};
pub use state::{CharacterState, MotionState, Telemetry};

use glam::{Quat, Vec2, Vec3};

use crate::grounding::{GroundingSnapshot, MotionSolver, MovementHit};
use crate::input::InputIntent;

/// Exponential damping toward a target: `blend_exp(v, t, s, 0) == v`, and
/// repeated steps converge on `t` for any positive sharpness.
pub fn blend_exp(current: Vec3, target: Vec3, sharpness: f32, dt: f32) -> Vec3 {
    current.lerp(target, 1.0 - (-sharpness * dt).exp())
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn project(vector: Vec3, onto: Vec3) -> Vec3 {
    onto * vector.dot(onto)
}

/// Folds an angle into (-pi, pi] so clamping against a symmetric range works
/// after repeated accumulation.
fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Input intent resolved into world space for one tick.
struct ParsedInput {
    /// Move intent rotated by the current body yaw; length in [0, 1].
    world_direction: Vec3,
    magnitude: f32,
    is_active: bool,
    look: Vec2,
}

/// The movement state machine and velocity/rotation integrators. Holds only
/// configuration; all mutable state lives in `CharacterState` and is
/// threaded through the tick phases explicitly.
pub struct CharacterController {
    config: MovementConfig,
}

impl CharacterController {
    const INTERNAL_VELOCITY_EPSILON: f32 = 0.3;
    const WALL_NORMAL_MAX_UP_DOT: f32 = 0.4;
    const WALL_APPROACH_MIN_DOT: f32 = -0.4;
    const WALL_APPROACH_MAX_DOT: f32 = 0.2;

    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Cosmetic FOV offset driven by fluidity. Presentation-only.
    pub fn fov_offset(&self, state: &CharacterState) -> f32 {
        self.config
            .fov_easing
            .sample(self.config.fov_min, self.config.fov_max, state.fluidity.value())
    }

    /// Runs one fixed simulation step in the strict phase order: timers and
    /// ability resolution, state-transition evaluation, velocity
    /// integration, rotation integration, the solver sweep, then hit and
    /// grounding bookkeeping.
    pub fn step(
        &self,
        intent: &InputIntent,
        state: &mut CharacterState,
        solver: &mut dyn MotionSolver,
        dt: f32,
    ) {
        let input = self.parse_input(intent, state);

        self.pre_step(intent, &input, state, dt);
        self.evaluate_transitions(state, &solver.grounding());
        self.update_velocity(&input, state, solver, dt);
        self.update_rotation(&input, state, solver, dt);

        state.pre_move_velocity = state.velocity;
        let hits = solver.move_body(state.velocity * dt, dt);

        self.post_step(&input, state, solver, &hits, dt);
    }

    fn parse_input(&self, intent: &InputIntent, state: &CharacterState) -> ParsedInput {
        let local = Vec3::new(intent.move_axes.x, 0.0, -intent.move_axes.y);
        let world_direction = Quat::from_rotation_y(state.target_yaw) * local;

        ParsedInput {
            world_direction,
            magnitude: intent.move_axes.length(),
            is_active: world_direction.length_squared() > 1e-4,
            look: intent.look_axes,
        }
    }

    // Phase 1: timers, run toggle, boost resolution.
    fn pre_step(
        &self,
        intent: &InputIntent,
        input: &ParsedInput,
        state: &mut CharacterState,
        dt: f32,
    ) {
        if intent.jump_pressed() {
            state.jump_window.request();
        }
        if intent.boost_pressed() {
            state.boost_window.request();
        }
        if intent.run_pressed() {
            self.toggle_run(state);
        }

        state.jump_window.tick(dt);
        state.boost_window.tick(dt);
        state.jump_cooldown.tick(dt);
        state.boost_cooldown.tick(dt);
        state.wall_jump_window.tick(dt);
        state.wall_contact_time += dt;

        self.tick_run_amount(state, dt);
        self.resolve_boost(input, state);
    }

    fn toggle_run(&self, state: &mut CharacterState) {
        state.running = !state.running;
        if !state.running {
            // Run-stop transfer: planar speed beyond the walking cap keeps
            // carrying the character as decaying momentum.
            let planar = Vec3::new(state.velocity.x, 0.0, state.velocity.z);
            let excess = planar.length() - self.config.ground_max_move_speed;
            if excess > 0.0 {
                state.internal_velocity += planar.normalize() * excess;
            }
        }
    }

    fn tick_run_amount(&self, state: &mut CharacterState, dt: f32) {
        let target = if state.running { 1.0 } else { 0.0 };
        let rate = if target > state.run_amount {
            1.0 / self.config.run_spin_up_time
        } else {
            1.0 / self.config.run_spin_down_time
        };

        let max_change = rate * dt;
        state.run_amount += (target - state.run_amount).clamp(-max_change, max_change);
    }

    fn resolve_boost(&self, input: &ParsedInput, state: &mut CharacterState) {
        if !state.boost_window.active() {
            return;
        }

        if !state.boost_cooldown.available() {
            // Expected control flow; the request keeps retrying until its
            // window expires.
            log::trace!("boost request ignored: cooling down");
            return;
        }

        let direction = if input.is_active {
            input.world_direction.normalize()
        } else {
            state.forward()
        };

        state.pending_boost = Some(direction);
        state.boost_cooldown.fire();
        state.boost_window.consume();
        state.transition(MotionState::Boost);
    }

    // Phase 2: mode transitions driven by the grounding snapshot.
    fn evaluate_transitions(&self, state: &mut CharacterState, grounding: &GroundingSnapshot) {
        let fallback = if grounding.found_any_ground {
            MotionState::Ground
        } else {
            MotionState::Air
        };

        match state.mode {
            MotionState::Ground => {
                if !grounding.found_any_ground {
                    state.transition(MotionState::Air);
                }
            }
            MotionState::Air => {
                if grounding.found_any_ground {
                    state.transition(MotionState::Ground);
                }
            }
            MotionState::Boost => {
                // Boost holds for the tick its impulse fires, then falls
                // back to whatever the ground report says.
                if state.pending_boost.is_none() {
                    state.transition(fallback);
                }
            }
            MotionState::Wall => {
                if state.wall_contact_time > self.config.max_wall_disconnect_time {
                    state.transition(fallback);
                }
            }
        }
    }

    // Phase 3: per-mode velocity integration.
    fn update_velocity(
        &self,
        input: &ParsedInput,
        state: &mut CharacterState,
        solver: &mut dyn MotionSolver,
        dt: f32,
    ) {
        let grounding = solver.grounding();

        self.decay_internal_velocity(input, state, dt);

        if let Some(direction) = state.pending_boost.take() {
            state.velocity +=
                direction * self.config.boost_speed - project(state.velocity, Vec3::Y);
        }

        self.try_jump(state, solver, &grounding);

        match state.mode {
            MotionState::Ground => self.ground_move(input, state, solver, &grounding, dt),
            MotionState::Air | MotionState::Boost => self.air_move(input, state, &grounding, dt),
            MotionState::Wall => self.wall_move(input, state, &grounding, dt),
        }
    }

    fn decay_internal_velocity(&self, input: &ParsedInput, state: &mut CharacterState, dt: f32) {
        if state.internal_velocity.length_squared() == 0.0 {
            return;
        }

        let opposed = input.is_active
            && input
                .world_direction
                .normalize()
                .dot(state.internal_velocity.normalize())
                <= 0.0;

        if opposed {
            // Pushing against the momentum kills it outright.
            state.internal_velocity = Vec3::ZERO;
        } else {
            state.internal_velocity *= 1.0 / (1.0 + self.config.internal_drag * dt);
        }

        if state.internal_velocity.length() <= Self::INTERNAL_VELOCITY_EPSILON {
            state.internal_velocity = Vec3::ZERO;
        }
    }

    fn try_jump(
        &self,
        state: &mut CharacterState,
        solver: &mut dyn MotionSolver,
        grounding: &GroundingSnapshot,
    ) {
        if !state.jump_window.active() || !state.jump_cooldown.available() {
            return;
        }

        let ground_impulse = (2.0 * self.config.jump_height * self.config.gravity).sqrt();
        let (direction, speed) = if grounding.is_stable_on_ground {
            (Vec3::Y, ground_impulse)
        } else if grounding.found_any_ground {
            (
                (grounding.ground_normal + Vec3::Y).normalize_or(Vec3::Y),
                ground_impulse,
            )
        } else if state.mode == MotionState::Wall || state.wall_jump_window.active() {
            (
                (state.wall_normal + Vec3::Y).normalize_or(Vec3::Y),
                self.config.wall_jump_speed,
            )
        } else {
            // Airborne with no wall contact left: absorbed silently.
            return;
        };

        // The up-axis component is replaced, never stacked.
        state.velocity += direction * speed - project(state.velocity, Vec3::Y);

        state.jump_window.consume();
        state.wall_jump_window.consume();
        state.jump_cooldown.fire();
        solver.force_unground();
        state.transition(MotionState::Air);
    }

    fn ground_move(
        &self,
        input: &ParsedInput,
        state: &mut CharacterState,
        solver: &dyn MotionSolver,
        grounding: &GroundingSnapshot,
        dt: f32,
    ) {
        let mut velocity = state.velocity;

        // Effective normal: when snapping was suppressed the character sits
        // on a slope edge, and the side of the contact point picks the
        // convex (outer) or concave (inner) normal.
        let mut normal = grounding.ground_normal;
        if velocity.length_squared() > 0.0 && grounding.snapping_prevented {
            let to_character = solver.position() - grounding.ground_point;
            normal = if velocity.dot(to_character) >= 0.0 {
                grounding.outer_ground_normal
            } else {
                grounding.inner_ground_normal
            };
        }

        velocity = solver.tangent_to_surface(velocity, normal) * velocity.length();

        let eased_speed = self.config.move_speed_easing.sample(
            self.config.ground_min_move_speed,
            self.config.ground_max_move_speed,
            state.fluidity.value(),
        );
        let speed = lerp(eased_speed, self.config.run_move_speed, state.run_amount);

        let input_right = input.world_direction.cross(Vec3::Y);
        let reoriented = normal.cross(input_right).normalize_or_zero() * input.magnitude;
        let target = reoriented * speed;

        velocity = blend_exp(velocity, target, self.config.move_sharpness, dt);

        let cap = lerp(
            self.config.ground_max_move_speed,
            self.config.run_move_speed,
            state.run_amount,
        );
        velocity = velocity.clamp_length_max(cap);

        velocity += state.internal_velocity * dt;
        state.velocity = velocity;
    }

    fn air_move(
        &self,
        input: &ParsedInput,
        state: &mut CharacterState,
        grounding: &GroundingSnapshot,
        dt: f32,
    ) {
        let mut velocity = state.velocity;

        let planar = Vec3::new(velocity.x, 0.0, velocity.z);
        let below_cap = planar.length() < self.config.air_max_move_speed;
        let braking = input.world_direction.dot(planar) < 0.0;

        if input.is_active && (below_cap || braking) {
            let acceleration = self.config.air_speed_easing.sample(
                self.config.air_min_acceleration,
                self.config.air_max_acceleration,
                state.fluidity.value(),
            );
            let target = input.world_direction * self.config.air_move_speed;
            let diff = Vec3::new(target.x - velocity.x, 0.0, target.z - velocity.z);
            velocity += diff * acceleration * dt;
        }

        velocity.y -= self.config.gravity * dt;

        // Found ground that is too steep to stand on: slide along it rather
        // than accelerating into it.
        if grounding.found_any_ground && !grounding.is_stable_on_ground {
            let obstruction = Vec3::Y
                .cross(grounding.ground_normal)
                .cross(Vec3::Y)
                .normalize_or_zero();
            if obstruction != Vec3::ZERO {
                velocity -= project(velocity, obstruction);
            }
        }

        velocity *= 1.0 / (1.0 + self.config.air_drag * dt);

        let planar =
            Vec3::new(velocity.x, 0.0, velocity.z).clamp_length_max(self.config.air_max_move_speed);
        velocity = Vec3::new(planar.x, velocity.y, planar.z);

        velocity += state.internal_velocity * dt;
        state.velocity = velocity;
    }

    fn wall_move(
        &self,
        input: &ParsedInput,
        state: &mut CharacterState,
        grounding: &GroundingSnapshot,
        dt: f32,
    ) {
        // Boundary inclusive: dropping to exactly the minimum speed falls
        // off the wall.
        let min_speed_sq = self.config.min_wall_run_speed * self.config.min_wall_run_speed;
        if state.velocity.length_squared() <= min_speed_sq {
            let fallback = if grounding.found_any_ground {
                MotionState::Ground
            } else {
                MotionState::Air
            };
            state.transition(fallback);
            return;
        }

        let normal = state.wall_normal;
        let mut velocity = state.velocity - project(state.velocity, normal);

        let speed = self.config.move_speed_easing.sample(
            self.config.wall_run_min_move_speed,
            self.config.wall_run_max_move_speed,
            state.fluidity.value(),
        );

        let direction = velocity.normalize_or_zero();
        let mut target = direction * (input.magnitude * speed);

        // Looking up or down angles the run along the wall.
        let lateral = direction.cross(Vec3::Y).normalize_or_zero();
        if lateral != Vec3::ZERO {
            target = Quat::from_axis_angle(lateral, state.head_pitch) * target;
        }

        // Linear, not exponential: wall running intentionally bleeds toward
        // its target at a constant fraction per second.
        velocity = velocity.lerp(target, dt.min(1.0));
        state.velocity = velocity;
    }

    // Phase 4: rotation integration.
    fn update_rotation(
        &self,
        input: &ParsedInput,
        state: &mut CharacterState,
        solver: &mut dyn MotionSolver,
        dt: f32,
    ) {
        let horizontal = input.look.x;
        let yaw_sensitivity = lerp(
            self.config.look_min_sensitivity,
            self.config.look_max_sensitivity,
            horizontal.abs().clamp(0.0, 1.0),
        );
        state.target_yaw = normalize_angle(state.target_yaw - horizontal * yaw_sensitivity);

        let mut target = Quat::from_rotation_y(state.target_yaw);
        if state.mode == MotionState::Wall {
            // Lean the body away from the wall while running on it.
            let right = state.orientation * Vec3::X;
            let side = state.wall_normal.dot(right).signum();
            target *= Quat::from_rotation_z(side * self.config.wall_lean_angle);
        }

        let blend = 1.0 - (-self.config.look_sharpness * dt).exp();
        state.orientation = state.orientation.slerp(target, blend).normalize();
        solver.rotate(state.orientation);

        // Pitch goes straight to the head, clamped, no smoothing.
        let vertical = input.look.y;
        let pitch_sensitivity = lerp(
            self.config.look_min_sensitivity,
            self.config.look_max_sensitivity,
            vertical.abs().clamp(0.0, 1.0),
        );
        state.head_pitch = normalize_angle(state.head_pitch + vertical * pitch_sensitivity)
            .clamp(self.config.pitch_min, self.config.pitch_max);
    }

    // Phase 6: hit commands, landing transfer, fluidity, bookkeeping.
    fn post_step(
        &self,
        input: &ParsedInput,
        state: &mut CharacterState,
        solver: &dyn MotionSolver,
        hits: &[MovementHit],
        dt: f32,
    ) {
        let grounding = solver.grounding();

        let mut queue = HitCommandQueue::new();
        for hit in hits {
            let up_dot = hit.normal.dot(Vec3::Y);
            if up_dot > 0.0 {
                queue.push(HitCommand::RegisterWallJump { normal: hit.normal });
            }
            if (0.0..=Self::WALL_NORMAL_MAX_UP_DOT).contains(&up_dot) {
                queue.push(HitCommand::WallContact { normal: hit.normal });
            }
        }

        for command in queue.drain_ordered() {
            match command {
                HitCommand::RegisterWallJump { normal } => {
                    state.wall_jump_window.request();
                    state.wall_normal = normal;
                }
                HitCommand::WallContact { normal } => {
                    state.wall_contact_time = 0.0;
                    self.try_enter_wall_run(state, &grounding, normal);
                }
            }
        }

        let previous = state.previous_grounding;
        if previous.found_any_ground && !grounding.found_any_ground {
            log::trace!("left ground");
        }
        if !previous.found_any_ground && grounding.found_any_ground {
            self.transfer_landing_momentum(state, &grounding);
        }

        state
            .fluidity
            .tick(grounding.is_stable_on_ground, input.is_active, dt);

        state.previous_grounding = grounding;
    }

    fn try_enter_wall_run(
        &self,
        state: &mut CharacterState,
        grounding: &GroundingSnapshot,
        normal: Vec3,
    ) {
        if state.mode == MotionState::Wall || grounding.found_any_ground {
            return;
        }

        let approach = state.forward().dot(normal);
        let within_cone = approach > Self::WALL_APPROACH_MIN_DOT
            && approach < Self::WALL_APPROACH_MAX_DOT;
        let fast_enough = state.velocity.length() >= self.config.min_wall_run_speed;

        if within_cone && fast_enough {
            state.wall_normal = normal;
            state.transition(MotionState::Wall);
        }
    }

    fn transfer_landing_momentum(&self, state: &mut CharacterState, grounding: &GroundingSnapshot) {
        let incoming = state.pre_move_velocity;
        let normal = grounding.ground_normal;

        let tangential = incoming - project(incoming, normal);
        let head_on = incoming
            .normalize_or_zero()
            .dot(-normal)
            .clamp(0.0, 1.0);

        state.internal_velocity = tangential * (self.config.hit_reduction * head_on);
    }
}
