use glam::{Quat, Vec3};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use crate::grounding::{GroundingSnapshot, MotionSolver, MovementHit};

use super::PhysicsWorld;

/// rapier-backed motion solver: sweeps a capsule-ish cylinder through the
/// static world, tracks grounding, and reports contacts to the movement
/// core.
pub struct RapierSolver {
    world: PhysicsWorld,
    handle: RigidBodyHandle,
    character_controller: KinematicCharacterController,
    shape: SharedShape,
    half_height: f32,
    max_slope_cos: f32,
    grounding: GroundingSnapshot,
    position: Vec3,
    unground_requested: bool,
}

impl RapierSolver {
    const SNAP_DISTANCE: f32 = 0.2;
    const GROUND_PROBE_SLACK: f32 = 0.1;

    pub fn new(mut world: PhysicsWorld, spawn: Vec3, radius: f32, height: f32) -> Self {
        let max_slope_climb_angle = 50_f32.to_radians();

        let mut character_controller = KinematicCharacterController::default();
        character_controller.offset = CharacterLength::Absolute(0.02);
        character_controller.up = Vector::Y;
        character_controller.max_slope_climb_angle = max_slope_climb_angle;
        character_controller.min_slope_slide_angle = 35_f32.to_radians();
        character_controller.snap_to_ground = Some(CharacterLength::Absolute(Self::SNAP_DISTANCE));
        character_controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(0.35),
            min_width: CharacterLength::Absolute(0.15),
            include_dynamic_bodies: false,
        });

        let handle = world.add_character(spawn, radius, height);
        let shape = SharedShape::cylinder(height / 2.0, radius);

        Self {
            world,
            handle,
            character_controller,
            shape,
            half_height: height / 2.0,
            max_slope_cos: max_slope_climb_angle.cos(),
            grounding: GroundingSnapshot::airborne(),
            position: spawn,
            unground_requested: false,
        }
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    fn refresh_grounding(&mut self, swept_grounded: bool, snapping_prevented: bool) {
        let probe_reach = self.half_height + Self::SNAP_DISTANCE + Self::GROUND_PROBE_SLACK;
        let probe = self
            .world
            .ground_probe(self.handle, self.position, probe_reach);

        self.grounding = match probe {
            Some((normal, point)) if swept_grounded || !snapping_prevented => {
                let found = swept_grounded
                    || (self.position.y - point.y) <= self.half_height + Self::SNAP_DISTANCE;
                if found {
                    GroundingSnapshot {
                        found_any_ground: true,
                        is_stable_on_ground: normal.dot(Vec3::Y) >= self.max_slope_cos,
                        ground_normal: normal,
                        inner_ground_normal: normal,
                        outer_ground_normal: normal,
                        ground_point: point,
                        snapping_prevented,
                    }
                } else {
                    GroundingSnapshot::airborne()
                }
            }
            _ => GroundingSnapshot::airborne(),
        };
    }
}

impl MotionSolver for RapierSolver {
    fn grounding(&self) -> GroundingSnapshot {
        self.grounding
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn move_body(&mut self, translation: Vec3, dt: f32) -> Vec<MovementHit> {
        let snapping_prevented = self.unground_requested;
        self.unground_requested = false;

        // Ground snapping would glue a fresh jump back to the floor.
        let mut controller = self.character_controller.clone();
        if snapping_prevented {
            controller.snap_to_ground = None;
        }

        let Some(position) = self.world.body_position(self.handle) else {
            return Vec::new();
        };
        let pose = Pose::from_parts(
            Vector::new(position.x, position.y, position.z),
            self.world
                .bodies
                .get(self.handle)
                .map(|b| *b.rotation())
                .unwrap_or(Rotation::IDENTITY),
        );

        let mut hits = Vec::new();
        let max_slope_cos = self.max_slope_cos;
        let corrected = self.world.move_character(
            &controller,
            self.handle,
            &self.shape,
            pose,
            Vector::new(translation.x, translation.y, translation.z),
            dt,
            |collision| {
                let n = collision.hit.normal1;
                let p = collision.hit.witness1;
                let normal = Vec3::new(n.x, n.y, n.z);
                hits.push(MovementHit {
                    normal,
                    point: Vec3::new(p.x, p.y, p.z),
                    is_stable: normal.dot(Vec3::Y) >= max_slope_cos,
                });
            },
        );

        let applied = Vec3::new(
            corrected.translation.x,
            corrected.translation.y,
            corrected.translation.z,
        );
        self.position = position + applied;
        self.world.set_body_position(self.handle, self.position);
        self.world.step();

        self.refresh_grounding(corrected.grounded, snapping_prevented);

        hits
    }

    fn rotate(&mut self, rotation: Quat) {
        self.world.set_body_rotation(self.handle, rotation);
    }

    fn force_unground(&mut self) {
        self.unground_requested = true;
        self.grounding = GroundingSnapshot::airborne();
    }
}
