use anyhow::Result;
use clap::Parser;
use glam::{Vec2, Vec3};

use freerun::{
    Buttons, MotionSolver, MovementConfig, PhysicsWorld, RapierSolver, Simulation,
};

#[derive(Parser)]
#[command(name = "freerun-demo")]
#[command(about = "Scripted locomotion walkthrough in a test arena")]
struct Args {
    #[arg(short, long, default_value_t = 60)]
    tick_rate: u32,

    #[arg(long, default_value_t = 30, help = "Ticks between telemetry lines")]
    report_every: u32,
}

struct Phase {
    name: &'static str,
    seconds: f32,
    move_axes: Vec2,
    look: Vec2,
    press_on_entry: Buttons,
}

const PHASES: &[Phase] = &[
    Phase {
        name: "settle",
        seconds: 1.0,
        move_axes: Vec2::ZERO,
        look: Vec2::ZERO,
        press_on_entry: Buttons::empty(),
    },
    Phase {
        name: "walk",
        seconds: 3.0,
        move_axes: Vec2::new(0.0, 1.0),
        look: Vec2::ZERO,
        press_on_entry: Buttons::empty(),
    },
    Phase {
        name: "run",
        seconds: 3.0,
        move_axes: Vec2::new(0.0, 1.0),
        look: Vec2::ZERO,
        press_on_entry: Buttons::RUN,
    },
    Phase {
        name: "jump",
        seconds: 2.0,
        move_axes: Vec2::new(0.0, 1.0),
        look: Vec2::ZERO,
        press_on_entry: Buttons::JUMP,
    },
    Phase {
        name: "boost",
        seconds: 2.0,
        move_axes: Vec2::new(0.0, 1.0),
        look: Vec2::ZERO,
        press_on_entry: Buttons::BOOST,
    },
    Phase {
        name: "turn",
        seconds: 2.0,
        move_axes: Vec2::new(0.0, 1.0),
        look: Vec2::new(0.15, 0.0),
        press_on_entry: Buttons::empty(),
    },
    Phase {
        name: "rest",
        seconds: 2.0,
        move_axes: Vec2::ZERO,
        look: Vec2::ZERO,
        press_on_entry: Buttons::empty(),
    },
];

/// Flat floor, a long wall on the right of the running line, and a raised
/// platform past it.
fn build_arena() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.add_ground(0.0, 80.0);
    world.add_static_box(Vec3::new(2.5, 2.5, -25.0), Vec3::new(0.25, 2.5, 20.0));
    world.add_static_box(Vec3::new(-6.0, 0.75, -40.0), Vec3::new(4.0, 0.75, 4.0));
    world
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let solver = RapierSolver::new(build_arena(), Vec3::new(0.0, 2.0, 0.0), 0.3, 1.8);
    let mut sim = Simulation::new(MovementConfig::default(), solver, args.tick_rate)?;

    let mut elapsed_ticks: u32 = 0;
    for phase in PHASES {
        let ticks = (phase.seconds * args.tick_rate as f32).round() as u32;
        log::info!("phase '{}' for {} ticks", phase.name, ticks);

        for i in 0..ticks {
            let pressed = if i == 0 {
                phase.press_on_entry
            } else {
                Buttons::empty()
            };
            sim.push_input(phase.move_axes, phase.look, pressed);
            sim.tick();
            elapsed_ticks += 1;

            if elapsed_ticks % args.report_every == 0 {
                let position = sim.solver().position();
                log::info!(
                    "t={:6.2}s pos=({:6.2}, {:5.2}, {:7.2}) fov=+{:4.1} {}",
                    elapsed_ticks as f32 / args.tick_rate as f32,
                    position.x,
                    position.y,
                    position.z,
                    sim.fov_offset(),
                    sim.telemetry(),
                );
            }
        }
    }

    log::info!("final {}", sim.telemetry());
    Ok(())
}
