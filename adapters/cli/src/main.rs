#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Handlords session without a window.

mod settings;

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use handlords_core::{seed_from_raw, Command, Event, RandomSource, DEFAULT_SEED, HUMAN_PLAYER};
use handlords_system_analytics::CombatAnalytics;
use handlords_system_clock::FixedTimestep;
use handlords_world::{self as world, query, World};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Runs a rock-paper-scissors territory simulation and prints a summary.
#[derive(Parser, Debug)]
#[command(name = "handlords")]
#[command(about = "Run a deterministic rock-paper-scissors territory simulation")]
struct Args {
    /// TOML settings file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Nonzero seed for the shift register, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_seed)]
    seed: Option<u16>,

    /// Pair interactions attempted per tick
    #[arg(long)]
    pairs: Option<u32>,

    /// Fixed simulation rate in ticks per second
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Draw from the operating-system entropy source instead of the seed
    #[arg(long)]
    entropy: bool,

    /// Stop after this many ticks if the round has not finished
    #[arg(long, default_value_t = 3_000)]
    ticks: u64,

    /// Rotate the human piece every N ticks
    #[arg(long)]
    rotate_every: Option<u64>,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,
}

fn parse_seed(value: &str) -> Result<u16, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse::<u16>(),
    };
    parsed.map_err(|error| format!("invalid seed `{value}`: {error}"))
}

/// Entry point for the Handlords command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => settings::load(path)?,
        None => Settings::default(),
    };
    let mut session = Session::new(&args, settings)?;

    if args.realtime {
        session.run_realtime(args.ticks, args.rotate_every);
    } else {
        session.run_headless(args.ticks, args.rotate_every);
    }

    session.print_summary();
    Ok(())
}

/// A world together with the systems observing it.
struct Session {
    world: World,
    analytics: CombatAnalytics,
}

impl Session {
    fn new(args: &Args, settings: Settings) -> Result<Self> {
        let mut config = settings.game;
        if let Some(pairs) = args.pairs {
            config.pairs_per_tick = pairs;
        }
        if let Some(tick_rate) = args.tick_rate {
            config.ticks_per_second = tick_rate;
        }
        if args.entropy {
            config.random_source = RandomSource::Entropy;
        }

        let seed = match args.seed.or(settings.seed) {
            Some(raw) => seed_from_raw(raw).context("invalid seed")?,
            None => DEFAULT_SEED,
        };
        info!(
            seed = seed.get(),
            pairs = config.pairs_per_tick,
            tick_rate = config.ticks_per_second,
            opponents = config.opponents.len(),
            "starting session"
        );
        let world = World::with_config(config, seed).context("invalid game configuration")?;

        Ok(Self {
            world,
            analytics: CombatAnalytics::new(),
        })
    }

    fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        for event in &events {
            match event {
                Event::PhaseChanged { from, to } => info!(?from, ?to, "phase changed"),
                Event::IntentRejected { intent, phase } => {
                    debug!(?intent, ?phase, "intent ignored");
                }
                _ => {}
            }
        }

        let ticks_per_second = query::config(&self.world).ticks_per_second;
        self.analytics.handle(&events, ticks_per_second);
    }

    fn finished(&self) -> bool {
        query::phase(&self.world).is_terminal()
    }

    fn script_rotation(&mut self, rotate_every: Option<u64>) {
        let tick = query::tick(&self.world);
        if let Some(every) = rotate_every.filter(|every| *every > 0) {
            if tick > 0 && tick % every == 0 {
                self.submit(Command::RotateHumanPiece);
            }
        }
    }

    fn log_progress(&self) {
        let tick = query::tick(&self.world);
        let ticks_per_second = u64::from(query::config(&self.world).ticks_per_second.max(1));
        if tick % ticks_per_second != 0 {
            return;
        }
        let combats = self
            .analytics
            .last_report()
            .map_or(0, |report| report.combats_per_second());
        info!(
            tick,
            human = query::territory(&self.world, HUMAN_PLAYER),
            combats_per_second = combats,
            "progress"
        );
    }

    fn run_headless(&mut self, tick_limit: u64, rotate_every: Option<u64>) {
        self.submit(Command::Begin);
        while !self.finished() && query::tick(&self.world) < tick_limit {
            self.submit(Command::AdvanceTick);
            self.log_progress();
            self.script_rotation(rotate_every);
        }
    }

    fn run_realtime(&mut self, tick_limit: u64, rotate_every: Option<u64>) {
        let mut clock = FixedTimestep::new();
        let mut commands = Vec::new();
        self.submit(Command::Begin);
        let mut last_frame = Instant::now();

        while !self.finished() && query::tick(&self.world) < tick_limit {
            let interval = query::config(&self.world).tick_interval();
            thread::sleep(interval.min(Duration::from_millis(50)));

            let now = Instant::now();
            let elapsed = now.duration_since(last_frame);
            last_frame = now;

            clock.handle(
                elapsed,
                query::phase(&self.world),
                query::config(&self.world).ticks_per_second,
                &mut commands,
            );
            for command in commands.drain(..) {
                if self.finished() || query::tick(&self.world) >= tick_limit {
                    break;
                }
                self.submit(command);
                self.log_progress();
                self.script_rotation(rotate_every);
            }
        }
    }

    fn print_summary(&self) {
        let world = &self.world;
        println!("phase: {:?}", query::phase(world));
        println!("tick: {}", query::tick(world));
        for player in query::player_view(world).iter() {
            println!(
                "player {}: {} cells, holding {:?}",
                player.id.get(),
                query::territory(world, player.id),
                player.piece
            );
        }
        let report = self.analytics.last_report();
        println!(
            "combats per second: {}",
            report.map_or(0, |report| report.combats_per_second())
        );
        println!(
            "battle efficiency: {}%",
            report.map_or(0, |report| report.efficiency_percent)
        );
        println!("reproducible: {}", query::is_reproducible(world));
    }
}
