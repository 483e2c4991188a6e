/// Momentum-quality scalar in [0, 1]. Sustained grounded movement builds it
/// up at `1/speed_up_time`; standing still on the ground bleeds it off at
/// `1/slow_down_time`. In the air it keeps rising while the player steers
/// and otherwise holds. Speed caps and FOV are eased by this value.
#[derive(Debug, Clone, Copy)]
pub struct FluidityTracker {
    value: f32,
    speed_up_freq: f32,
    slow_down_freq: f32,
}

impl FluidityTracker {
    pub fn new(speed_up_time: f32, slow_down_time: f32) -> Self {
        Self {
            value: 0.0,
            speed_up_freq: 1.0 / speed_up_time,
            slow_down_freq: 1.0 / slow_down_time,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn tick(&mut self, stable_on_ground: bool, has_move_input: bool, dt: f32) {
        let rate = if stable_on_ground {
            if has_move_input {
                self.speed_up_freq
            } else {
                -self.slow_down_freq
            }
        } else if has_move_input {
            self.speed_up_freq
        } else {
            0.0
        };

        self.value = (self.value + rate * dt).clamp(0.0, 1.0);
    }
}
