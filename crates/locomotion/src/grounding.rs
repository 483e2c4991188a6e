use glam::Vec3;

/// Point-in-time ground-contact report produced by the motion solver after
/// each body sweep. The controller keeps the previous tick's snapshot around
/// so land/leave-ground edges can be detected by comparing two of these.
#[derive(Debug, Clone, Copy)]
pub struct GroundingSnapshot {
    pub found_any_ground: bool,
    pub is_stable_on_ground: bool,
    pub ground_normal: Vec3,
    pub inner_ground_normal: Vec3,
    pub outer_ground_normal: Vec3,
    pub ground_point: Vec3,
    pub snapping_prevented: bool,
}

impl Default for GroundingSnapshot {
    fn default() -> Self {
        Self::airborne()
    }
}

impl GroundingSnapshot {
    pub fn airborne() -> Self {
        Self {
            found_any_ground: false,
            is_stable_on_ground: false,
            ground_normal: Vec3::Y,
            inner_ground_normal: Vec3::Y,
            outer_ground_normal: Vec3::Y,
            ground_point: Vec3::ZERO,
            snapping_prevented: false,
        }
    }

    pub fn stable(normal: Vec3, point: Vec3) -> Self {
        Self {
            found_any_ground: true,
            is_stable_on_ground: true,
            ground_normal: normal,
            inner_ground_normal: normal,
            outer_ground_normal: normal,
            ground_point: point,
            snapping_prevented: false,
        }
    }
}

/// A contact reported while sweeping the body through the world. The solver
/// may report zero or several of these per tick.
#[derive(Debug, Clone, Copy)]
pub struct MovementHit {
    pub normal: Vec3,
    pub point: Vec3,
    pub is_stable: bool,
}

/// The external character-motion solver as seen by the movement core.
///
/// Implementations sweep the body, resolve penetration and maintain the
/// grounding state; the core only reads reports and issues move/rotate
/// requests. `move_body` returns the contacts encountered during the sweep
/// instead of invoking callbacks, so the core can apply them at a defined
/// point in the tick.
pub trait MotionSolver {
    fn grounding(&self) -> GroundingSnapshot;

    fn position(&self) -> Vec3;

    /// Sweeps the body along `translation`, updating position and the
    /// grounding state.
    fn move_body(&mut self, translation: Vec3, dt: f32) -> Vec<MovementHit>;

    fn rotate(&mut self, rotation: glam::Quat);

    /// Suppresses ground snapping for the next sweep so a jump actually
    /// leaves the surface.
    fn force_unground(&mut self);

    /// Reorients `direction` to be tangent to the surface with `normal`,
    /// preserving heading.
    fn tangent_to_surface(&self, direction: Vec3, normal: Vec3) -> Vec3 {
        normal.cross(direction.cross(normal)).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    struct NullSolver;

    impl MotionSolver for NullSolver {
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
    fn tangent_preserves_heading_on_slope() {
        let solver = NullSolver;
        let normal = Vec3::new(0.0, 1.0, -0.5).normalize();
        let tangent = solver.tangent_to_surface(Vec3::Z, normal);

        assert!(tangent.dot(normal).abs() < 1e-5);
        assert!(tangent.dot(Vec3::Z) > 0.0);
        assert!((tangent.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn tangent_on_flat_ground_is_identity_for_planar_motion() {
        let solver = NullSolver;
        let tangent = solver.tangent_to_surface(Vec3::new(1.0, 0.0, 1.0).normalize(), Vec3::Y);
        assert!((tangent - Vec3::new(1.0, 0.0, 1.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn tangent_of_vertical_direction_is_zero() {
        let solver = NullSolver;
        assert_eq!(solver.tangent_to_surface(Vec3::Y, Vec3::Y), Vec3::ZERO);
    }
}
