use bitflags::bitflags;
use glam::Vec2;

bitflags! {
    /// One-shot button presses. These are edge-triggered: a press between
    /// two simulation ticks must reach the next tick even if a later poll
    /// reports the button released.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const JUMP = 1 << 0;
        const BOOST = 1 << 1;
        const RUN = 1 << 2;
    }
}

/// Immutable-for-the-tick input snapshot consumed by the controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputIntent {
    /// Planar move intent (x = right, y = forward), clamped to the unit disc.
    pub move_axes: Vec2,
    /// Look delta (x = horizontal, y = vertical), unclamped.
    pub look_axes: Vec2,
    pub buttons: Buttons,
}

impl InputIntent {
    pub fn new(move_axes: Vec2, look_axes: Vec2, buttons: Buttons) -> Self {
        Self {
            move_axes: move_axes.clamp_length_max(1.0),
            look_axes,
            buttons,
        }
    }

    pub fn jump_pressed(&self) -> bool {
        self.buttons.contains(Buttons::JUMP)
    }

    pub fn boost_pressed(&self) -> bool {
        self.buttons.contains(Buttons::BOOST)
    }

    pub fn run_pressed(&self) -> bool {
        self.buttons.contains(Buttons::RUN)
    }
}

/// Accumulates input polls that arrive faster than the simulation ticks.
/// Axes are level-triggered and overwrite; the held value persists across
/// `take` calls until a poll overwrites it, so a released stick must be
/// pushed as zero. Button presses are OR-ed so a press between two ticks is
/// never lost. `take` produces the snapshot for the coming tick and rearms
/// the one-shot state.
#[derive(Debug, Default)]
pub struct InputCollector {
    move_axes: Vec2,
    look_accum: Vec2,
    pressed: Buttons,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, move_axes: Vec2, look_delta: Vec2, pressed: Buttons) {
        self.move_axes = move_axes.clamp_length_max(1.0);
        self.look_accum += look_delta;
        self.pressed |= pressed;
    }

    pub fn take(&mut self) -> InputIntent {
        let intent = InputIntent {
            move_axes: self.move_axes,
            look_axes: self.look_accum,
            buttons: self.pressed,
        };
        self.look_accum = Vec2::ZERO;
        self.pressed = Buttons::empty();
        intent
    }
}
