//! Skirmish headless driver
//!
//! Builds a two-player world, replays a scripted input sequence one tick at a
//! time and prints the final world snapshot. Usage:
//!
//! ```text
//! RUST_LOG=debug skirmish [settings.json]
//! ```

use glam::Vec2;

use skirmish::sim::{
    EntityId, EntitySpec, InputEvent, Key, PlayerSlot, Sprite, TickInput, TickReport, Tuning, World,
    tick,
};
use skirmish::{SimError, SimSettings};

/// Ticks to simulate before stopping
const RUN_TICKS: u64 = 400;

const PLAYER_SPRITE: Sprite = Sprite {
    id: 1,
    width: 50.0,
    height: 50.0,
};
const SHOT_SPRITE: Sprite = Sprite {
    id: 2,
    width: 8.0,
    height: 16.0,
};
const CRATE_SPRITE: Sprite = Sprite {
    id: 3,
    width: 60.0,
    height: 60.0,
};

/// Driver state: the world plus running totals
struct Game {
    world: World,
    totals: TickReport,
}

impl Game {
    fn new(settings: SimSettings) -> Result<Self, SimError> {
        let mut world = World::new(settings)?;

        world.spawn_default_player(
            PlayerSlot::One,
            "player_1",
            Vec2::new(300.0, 300.0),
            PLAYER_SPRITE,
            SHOT_SPRITE,
        )?;
        world.spawn_default_player(
            PlayerSlot::Two,
            "player_2",
            Vec2::new(500.0, 300.0),
            PLAYER_SPRITE,
            SHOT_SPRITE,
        )?;

        // Heavy crate both players and shots can hit
        let crate_tuning = Tuning {
            mass: 5.0,
            bounciness: 0.2,
            ..Tuning::default()
        };
        world.spawn(
            EntitySpec::new("crate", Vec2::new(400.0, 120.0), CRATE_SPRITE, crate_tuning)
                .with_groups(["players", "shots"]),
        )?;

        Ok(Self {
            world,
            totals: TickReport::default(),
        })
    }

    /// Scripted input: players charge each other, then shoot at the crate
    fn script(at: u64) -> Vec<InputEvent> {
        match at {
            1 => vec![InputEvent::KeyDown(Key::D), InputEvent::KeyDown(Key::Left)],
            60 => vec![InputEvent::KeyUp(Key::D), InputEvent::KeyUp(Key::Left)],
            120 => vec![
                InputEvent::KeyDown(Key::Space),
                InputEvent::KeyUp(Key::Space),
                InputEvent::KeyUp(Key::Enter),
            ],
            // Still cooling down, ignored
            150 => vec![InputEvent::KeyUp(Key::Space)],
            200 => vec![InputEvent::KeyDown(Key::W), InputEvent::KeyDown(Key::Up)],
            260 => vec![InputEvent::KeyUp(Key::W), InputEvent::KeyUp(Key::Up)],
            330 => vec![InputEvent::KeyUp(Key::Space)],
            _ => Vec::new(),
        }
    }

    /// Run until the tick budget is spent or a quit event arrives
    fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            let input = TickInput::new(Self::script(self.world.time_ticks + 1));
            let report = tick(&mut self.world, &input);

            self.totals.collisions += report.collisions;
            self.totals.declip_fallbacks += report.declip_fallbacks;
            self.totals.projectiles_fired += report.projectiles_fired;
            if report.collisions > 0 {
                log::info!(
                    "Tick {}: {} collision(s) resolved",
                    self.world.time_ticks,
                    report.collisions
                );
            }
            if report.quit_requested {
                log::info!("Quit requested at tick {}", self.world.time_ticks);
                break;
            }
        }
    }

    fn position_of(&self, slot: PlayerSlot) -> Option<Vec2> {
        let id: EntityId = self.world.controlled(slot)?;
        self.world.get(id).map(|e| e.position)
    }
}

fn main() {
    env_logger::init();
    log::info!("Skirmish (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SimError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => SimSettings::load(path)?,
        None => SimSettings::default(),
    };

    let mut game = Game::new(settings)?;
    game.run(RUN_TICKS);

    log::info!(
        "Finished {} ticks: {} collisions ({} axis-only de-clips), {} projectiles fired",
        game.world.time_ticks,
        game.totals.collisions,
        game.totals.declip_fallbacks,
        game.totals.projectiles_fired
    );
    for slot in PlayerSlot::ALL {
        if let Some(pos) = game.position_of(slot) {
            log::info!("{:?} ended at ({:.1}, {:.1})", slot, pos.x, pos.y);
        }
    }
    for item in game.world.render_list() {
        log::debug!("draw sprite {} at {:?}", item.sprite.id, item.position);
    }

    println!("{}", game.world.snapshot_json()?);
    Ok(())
}
