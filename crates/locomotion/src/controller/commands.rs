use glam::Vec3;

/// Work derived from solver contact reports. Hits surface mid-sweep, in
/// whatever order the solver found them; turning them into commands and
/// applying those at one point in the tick keeps the state machine's
/// mutation order deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitCommand {
    /// An upward-facing contact arms the wall-jump window.
    RegisterWallJump { normal: Vec3 },
    /// A near-vertical contact refreshes wall contact and may enter
    /// wall-run.
    WallContact { normal: Vec3 },
}

impl HitCommand {
    /// Wall-jump eligibility is applied before wall-run entry.
    fn rank(&self) -> u8 {
        match self {
            Self::RegisterWallJump { .. } => 0,
            Self::WallContact { .. } => 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct HitCommandQueue {
    commands: Vec<HitCommand>,
}

impl HitCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: HitCommand) {
        self.commands.push(command);
    }

    /// Empties the queue in application order: by rank, stable within a
    /// rank so repeated contacts keep their reporting order.
    pub fn drain_ordered(&mut self) -> Vec<HitCommand> {
        let mut drained = std::mem::take(&mut self.commands);
        drained.sort_by_key(HitCommand::rank);
        drained
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
