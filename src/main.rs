//! Lane Runner headless host
//!
//! Runs the simulation without rendering: a simple autopilot steers the
//! runner, damage events are applied to the run state, the shop is visited on
//! every level-up, and the final run state is printed as JSON.
//!
//! Usage: `lane-runner [tuning.json] [seed]`

use std::process::ExitCode;

use glam::Vec3;

use lane_runner::sim::{GameStatus, ObjectKind, RunState, ShopItem, SimEvent, WorldSimulator};
use lane_runner::{Tuning, lane_at, lane_offset};

/// Host frame rate
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after five minutes of simulated play
const MAX_FRAMES: u32 = 60 * 60 * 5;

/// How far ahead the autopilot looks for threats
const LOOKAHEAD: f32 = 18.0;
/// Jump when a threat is this close
const JUMP_DISTANCE: f32 = 3.0;
const JUMP_VELOCITY: f32 = 14.0;
const GRAVITY: f32 = 40.0;

/// Keeps the runner alive long enough to exercise the simulation
#[derive(Debug, Default)]
struct Autopilot {
    lane: i32,
    height: f32,
    vertical_speed: f32,
    jumps_used: u32,
}

impl Autopilot {
    fn position(&self) -> Vec3 {
        Vec3::new(lane_offset(self.lane), self.height, 0.0)
    }

    fn grounded(&self) -> bool {
        self.height <= 0.0
    }

    /// Closest threat ahead in `lane`, as a distance
    fn threat_in(lane: i32, sim: &WorldSimulator) -> Option<f32> {
        sim.objects()
            .iter()
            .filter(|o| o.active && lane_at(o.position.x) == lane)
            .filter_map(|o| match o.kind {
                // Beams cover the whole lane, warning phase included
                ObjectKind::BossBeam { .. } => Some(0.0),
                _ if o.is_damaging() && o.position.z < 0.5 && o.position.z > -LOOKAHEAD => {
                    Some(-o.position.z)
                }
                _ => None,
            })
            .reduce(f32::min)
    }

    /// Closest pickup ahead in `lane`
    fn pickup_in(lane: i32, sim: &WorldSimulator) -> Option<f32> {
        sim.objects()
            .iter()
            .filter(|o| o.active && lane_at(o.position.x) == lane)
            .filter(|o| {
                matches!(
                    o.kind,
                    ObjectKind::Gem { .. } | ObjectKind::Letter { .. } | ObjectKind::ShopPortal
                )
            })
            .filter(|o| o.position.z < 0.0 && o.position.z > -LOOKAHEAD * 2.0)
            .map(|o| -o.position.z)
            .reduce(f32::min)
    }

    fn update(&mut self, sim: &WorldSimulator, run: &RunState, dt: f32) {
        let lanes = run.lanes();
        if !lanes.contains(&self.lane) {
            self.lane = 0;
        }

        if let Some(distance) = Self::threat_in(self.lane, sim) {
            let safe = lanes
                .iter()
                .copied()
                .filter(|l| (l - self.lane).abs() == 1)
                .find(|l| Self::threat_in(*l, sim).is_none());

            match safe {
                Some(lane) => self.lane = lane,
                None if distance < JUMP_DISTANCE => self.jump(run),
                None => {}
            }
        } else if let Some(lane) = lanes
            .iter()
            .copied()
            .filter(|l| (l - self.lane).abs() == 1)
            .filter(|l| Self::threat_in(*l, sim).is_none())
            .find(|l| Self::pickup_in(*l, sim).is_some())
        {
            if Self::pickup_in(self.lane, sim).is_none() {
                self.lane = lane;
            }
        }

        if !self.grounded() || self.vertical_speed > 0.0 {
            self.vertical_speed -= GRAVITY * dt;
            self.height = (self.height + self.vertical_speed * dt).max(0.0);
            if self.height == 0.0 {
                self.vertical_speed = 0.0;
                self.jumps_used = 0;
            }
        }
    }

    fn jump(&mut self, run: &RunState) {
        let max_jumps = if run.has_double_jump { 2 } else { 1 };
        if self.jumps_used < max_jumps {
            self.vertical_speed = JUMP_VELOCITY;
            self.jumps_used += 1;
        }
    }
}

/// Spend points in the shop, most urgent item first
fn visit_shop(run: &mut RunState) {
    let wishlist = [
        (ShopItem::Heal, run.lives < run.max_lives),
        (ShopItem::DoubleJump, !run.has_double_jump),
        (ShopItem::Immortal, !run.has_immortality),
        (ShopItem::MaxLife, true),
    ];
    for (item, wanted) in wishlist {
        if wanted && run.buy_item(item, item.cost()) {
            log::info!("Bought {} for {}", item.label(), item.cost());
        }
    }
    run.close_shop();
}

fn load_tuning(path: &str) -> Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read tuning file {path}: {e}; using defaults");
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(e) => {
            log::error!("{e}");
            log::warn!("Falling back to default tuning");
            Tuning::default()
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let mut tuning = args
        .next()
        .map(|path| load_tuning(&path))
        .unwrap_or_default();
    if let Some(seed) = args.next().and_then(|s| s.parse::<u64>().ok()) {
        tuning.seed = seed;
    }
    log::info!("Lane Runner starting with seed {}", tuning.seed);

    let mut run = RunState::new();
    let mut sim = WorldSimulator::new(tuning);
    let mut pilot = Autopilot::default();
    run.start_game();

    let mut frames = 0;
    while frames < MAX_FRAMES {
        match run.status {
            GameStatus::Playing => {
                pilot.update(&sim, &run, FRAME_DT);
                let events = sim.step(&mut run, FRAME_DT, pilot.position());
                for event in &events {
                    match event {
                        SimEvent::PlayerHit => {
                            if run.take_damage() {
                                log::info!("Hit! {} lives left", run.lives);
                                run.activate_immortality();
                            }
                        }
                        SimEvent::BossAttack { lanes } => {
                            log::debug!("Beams incoming on {:?}", lanes);
                        }
                        _ => {}
                    }
                }
            }
            GameStatus::Shop => visit_shop(&mut run),
            GameStatus::Menu | GameStatus::GameOver | GameStatus::Victory => break,
        }
        frames += 1;
    }
    sim.sync(&run);

    log::info!(
        "Run finished after {:.1}s: {:?}, level {}, score {}",
        frames as f32 * FRAME_DT,
        run.status,
        run.level,
        run.score
    );

    match serde_json::to_string_pretty(&run) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize run state: {e}");
            ExitCode::FAILURE
        }
    }
}
