use serde::{Deserialize, Serialize};

use crate::easing::Ease;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} range is inverted ({min} > {max})")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
}

/// Every movement tunable. Angles are radians, speeds m/s, times seconds.
/// Validated once at controller construction; a degenerate value here (a
/// zero damping time constant, say) would otherwise surface as NaN velocity
/// deep inside a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    // Ground movement
    pub ground_min_move_speed: f32,
    pub ground_max_move_speed: f32,
    pub move_sharpness: f32,

    // Running
    pub run_move_speed: f32,
    pub run_spin_up_time: f32,
    pub run_spin_down_time: f32,

    // Air movement
    pub air_move_speed: f32,
    pub air_max_move_speed: f32,
    pub air_min_acceleration: f32,
    pub air_max_acceleration: f32,
    pub gravity: f32,
    pub air_drag: f32,

    // Wall running
    pub min_wall_run_speed: f32,
    pub max_wall_disconnect_time: f32,
    pub wall_run_min_move_speed: f32,
    pub wall_run_max_move_speed: f32,
    pub wall_lean_angle: f32,

    // Jumping
    pub jump_height: f32,
    pub jump_cooldown: f32,
    pub wall_jump_speed: f32,
    pub wall_jump_expiry: f32,
    pub input_delay: f32,

    // Boosting
    pub boost_speed: f32,
    pub boost_cooldown: f32,

    // Landing momentum
    pub hit_reduction: f32,
    pub internal_drag: f32,

    // Aiming
    pub look_min_sensitivity: f32,
    pub look_max_sensitivity: f32,
    pub look_sharpness: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,

    // Fluidity
    pub fluidity_speed_up_time: f32,
    pub fluidity_slow_down_time: f32,

    // Cosmetic FOV offset range, degrees
    pub fov_min: f32,
    pub fov_max: f32,

    // Easing curve per eased tunable
    pub move_speed_easing: Ease,
    pub air_speed_easing: Ease,
    pub fov_easing: Ease,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            ground_min_move_speed: 5.0,
            ground_max_move_speed: 10.0,
            move_sharpness: 10.0,

            run_move_speed: 14.0,
            run_spin_up_time: 1.5,
            run_spin_down_time: 0.4,

            air_move_speed: 5.0,
            air_max_move_speed: 25.0,
            air_min_acceleration: 2.0,
            air_max_acceleration: 5.0,
            gravity: 20.0,
            air_drag: 0.1,

            min_wall_run_speed: 2.0,
            max_wall_disconnect_time: 1.0,
            wall_run_min_move_speed: 6.0,
            wall_run_max_move_speed: 12.0,
            wall_lean_angle: 15_f32.to_radians(),

            jump_height: 2.0,
            jump_cooldown: 0.5,
            wall_jump_speed: 10.0,
            wall_jump_expiry: 0.5,
            input_delay: 0.1,

            boost_speed: 10.0,
            boost_cooldown: 2.0,

            hit_reduction: 0.5,
            internal_drag: 2.0,

            look_min_sensitivity: 5_f32.to_radians(),
            look_max_sensitivity: 20_f32.to_radians(),
            look_sharpness: 10.0,
            pitch_min: -85_f32.to_radians(),
            pitch_max: 85_f32.to_radians(),

            fluidity_speed_up_time: 1.0,
            fluidity_slow_down_time: 3.0,

            fov_min: 0.0,
            fov_max: 20.0,

            move_speed_easing: Ease::SineInOut,
            air_speed_easing: Ease::QuadOut,
            fov_easing: Ease::SineOut,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("move_sharpness", self.move_sharpness),
            ("look_sharpness", self.look_sharpness),
            ("gravity", self.gravity),
            ("fluidity_speed_up_time", self.fluidity_speed_up_time),
            ("fluidity_slow_down_time", self.fluidity_slow_down_time),
            ("run_spin_up_time", self.run_spin_up_time),
            ("run_spin_down_time", self.run_spin_down_time),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let non_negative = [
            ("ground_min_move_speed", self.ground_min_move_speed),
            ("air_move_speed", self.air_move_speed),
            ("air_max_move_speed", self.air_max_move_speed),
            ("air_min_acceleration", self.air_min_acceleration),
            ("air_drag", self.air_drag),
            ("internal_drag", self.internal_drag),
            ("hit_reduction", self.hit_reduction),
            ("min_wall_run_speed", self.min_wall_run_speed),
            ("max_wall_disconnect_time", self.max_wall_disconnect_time),
            ("wall_run_min_move_speed", self.wall_run_min_move_speed),
            ("jump_height", self.jump_height),
            ("jump_cooldown", self.jump_cooldown),
            ("wall_jump_speed", self.wall_jump_speed),
            ("wall_jump_expiry", self.wall_jump_expiry),
            ("input_delay", self.input_delay),
            ("boost_speed", self.boost_speed),
            ("boost_cooldown", self.boost_cooldown),
            ("look_min_sensitivity", self.look_min_sensitivity),
        ];
        for (name, value) in non_negative {
            if value < 0.0 || !value.is_finite() {
                return Err(ConfigError::Negative { name, value });
            }
        }

        let ranges = [
            (
                "ground_move_speed",
                self.ground_min_move_speed,
                self.ground_max_move_speed,
            ),
            (
                "wall_run_move_speed",
                self.wall_run_min_move_speed,
                self.wall_run_max_move_speed,
            ),
            (
                "air_acceleration",
                self.air_min_acceleration,
                self.air_max_acceleration,
            ),
            (
                "look_sensitivity",
                self.look_min_sensitivity,
                self.look_max_sensitivity,
            ),
            ("pitch", self.pitch_min, self.pitch_max),
            ("fov", self.fov_min, self.fov_max),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(ConfigError::InvertedRange { name, min, max });
            }
        }

        Ok(())
    }
}
