mod solver;
mod world;

pub use solver::RapierSolver;
pub use world::PhysicsWorld;
