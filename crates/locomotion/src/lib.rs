pub mod controller;
pub mod easing;
pub mod fluidity;
pub mod grounding;
pub mod input;
pub mod physics;
pub mod simulation;
pub mod timing;

pub use controller::{
    CharacterController, CharacterState, ConfigError, HitCommand, HitCommandQueue, MotionState,
    MovementConfig, Telemetry, blend_exp,
};
pub use easing::Ease;
pub use fluidity::FluidityTracker;
pub use grounding::{GroundingSnapshot, MotionSolver, MovementHit};
pub use input::{Buttons, InputCollector, InputIntent};
pub use physics::{PhysicsWorld, RapierSolver};
pub use simulation::{FixedTimestep, Simulation};
pub use timing::{CooldownTimer, RequestWindow};
