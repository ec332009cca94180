#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Handlords.
//!
//! The world owns the arena, the shared random source and every player. It is
//! mutated only through [`apply`] and observed through [`query`]; all state
//! transitions happen on the caller's thread in the order commands arrive.

pub mod grid;
pub mod random;

mod combat;
mod level;
mod opponents;
mod players;

use std::num::NonZeroU16;

use handlords_core::{
    BehaviorTuning, Command, ConfigError, Event, GameConfig, Intent, LevelId, OpponentError, Phase, PlayerId,
    RandomSource, RotationDirection, TickStats, DEFAULT_PAIRS_PER_TICK, DEFAULT_SEED,
    DEFAULT_TICKS_PER_SECOND, HUMAN_PLAYER,
};
use tracing::{debug, trace, warn};

use crate::{grid::Grid, opponents::BehaviorContext, players::PlayerState, random::Randomness};

/// Represents the authoritative Handlords world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    config: GameConfig,
    random: Randomness,
    players: Vec<PlayerState>,
    tick: u64,
    level: LevelId,
    phase: Phase,
    last_stats: TickStats,
}

impl World {
    /// Creates a world with the default configuration and seed, ready to begin.
    #[must_use]
    pub fn new() -> Self {
        Self::build(GameConfig::default(), DEFAULT_SEED)
    }

    /// Creates a world from a validated configuration and shift-register seed.
    pub fn with_config(config: GameConfig, seed: NonZeroU16) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: GameConfig, seed: NonZeroU16) -> Self {
        let players = roster(&config);
        let random = Randomness::new(seed, config.random_source);
        if config.random_source == RandomSource::Entropy {
            warn!("entropy random source configured; this session will not be reproducible");
        }

        let mut world = Self {
            grid: Grid::arena(),
            config,
            random,
            players,
            tick: 0,
            level: LevelId::FIRST,
            phase: Phase::Ready,
            last_stats: TickStats::default(),
        };
        level::load(world.level, &mut world.grid, &world.players);
        world
    }

    fn transition(&mut self, to: Phase, out_events: &mut Vec<Event>) {
        let from = self.phase;
        self.phase = to;
        debug!(?from, ?to, tick = self.tick, "phase changed");
        out_events.push(Event::PhaseChanged { from, to });
    }

    fn reject(&self, intent: Intent, out_events: &mut Vec<Event>) {
        trace!(?intent, phase = ?self.phase, "intent rejected");
        out_events.push(Event::IntentRejected {
            intent,
            phase: self.phase,
        });
    }

    fn advance_tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick = self.tick.saturating_add(1);
        let tick = self.tick;

        for player in &mut self.players {
            player.tick_losses = 0;
        }

        let stats = combat::resolve_pairs(
            &mut self.grid,
            &mut self.random,
            &mut self.players,
            self.config.pairs_per_tick,
        );
        self.last_stats = stats;
        trace!(
            tick,
            attempts = stats.attempts,
            battles = stats.battles,
            same_owner = stats.same_owner,
            wall_or_empty = stats.wall_or_empty,
            "combat resolved"
        );
        out_events.push(Event::TickAdvanced { tick });
        out_events.push(Event::CombatResolved { tick, stats });

        for (index, player) in self.players.iter_mut().enumerate().skip(1) {
            let Some(opponent) = self.config.opponents.get(index - 1) else {
                continue;
            };
            let mut context = BehaviorContext {
                tick,
                tuning: opponent.behavior,
                random: &mut self.random,
            };
            if let Some(direction) = opponents::decide(&mut context, player) {
                let piece = players::rotate(&mut self.grid, player, direction, tick);
                debug!(player = player.id.get(), ?piece, ?direction, tick, "opponent rotated");
                out_events.push(Event::PieceRotated {
                    player: player.id,
                    piece,
                    direction,
                    tick,
                });
            }
        }

        self.evaluate_outcome(out_events);
    }

    fn evaluate_outcome(&mut self, out_events: &mut Vec<Event>) {
        let counts = players::territory(&self.grid, self.players.len());
        let Some((human, opponents)) = counts.split_first() else {
            return;
        };
        let opponent_total: usize = opponents.iter().sum();

        if *human == 0 && opponent_total > 0 {
            self.transition(Phase::Lost, out_events);
        } else if opponent_total == 0 && *human > 0 {
            self.transition(Phase::Won, out_events);
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.tick = 0;
        self.last_stats = TickStats::default();
        for player in &mut self.players {
            player.reset();
        }
        level::load(self.level, &mut self.grid, &self.players);
        debug!(level = self.level.get(), "level loaded");
        out_events.push(Event::LevelLoaded { level: self.level });
        self.transition(Phase::Ready, out_events);
    }

    fn opponent_index(&self, player: PlayerId) -> Result<usize, OpponentError> {
        if player.is_human() {
            return Err(OpponentError::HumanPlayer);
        }
        if player.index() >= self.players.len() {
            return Err(OpponentError::UnknownPlayer);
        }
        Ok(player.index())
    }

    fn with_opponent(
        &mut self,
        player: PlayerId,
        out_events: &mut Vec<Event>,
        update: impl FnOnce(&mut World, usize, &mut Vec<Event>),
    ) {
        match self.opponent_index(player) {
            Ok(index) => update(self, index, out_events),
            Err(reason) => {
                trace!(player = player.get(), ?reason, "opponent command rejected");
                out_events.push(Event::OpponentCommandRejected { player, reason });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn roster(config: &GameConfig) -> Vec<PlayerState> {
    let human = PlayerState::new(HUMAN_PLAYER, config.human_piece);
    let opponents = config
        .opponents
        .iter()
        .zip(1..=u8::MAX)
        .map(|(opponent, id)| PlayerState::new(PlayerId::new(id), opponent.piece));
    std::iter::once(human).chain(opponents).collect()
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Begin => {
            if world.phase == Phase::Ready {
                world.transition(Phase::Playing, out_events);
            } else {
                world.reject(Intent::Begin, out_events);
            }
        }
        Command::RotateHumanPiece => {
            if world.phase != Phase::Playing {
                world.reject(Intent::RotateHuman, out_events);
                return;
            }
            let tick = world.tick;
            let Some(human) = world.players.get_mut(HUMAN_PLAYER.index()) else {
                return;
            };
            let direction = RotationDirection::Forward;
            let piece = players::rotate(&mut world.grid, human, direction, tick);
            debug!(?piece, tick, "human rotated");
            out_events.push(Event::PieceRotated {
                player: HUMAN_PLAYER,
                piece,
                direction,
                tick,
            });
        }
        Command::Acknowledge => {
            if world.phase.is_terminal() {
                world.restart(out_events);
            } else {
                world.reject(Intent::Acknowledge, out_events);
            }
        }
        Command::AdvanceTick => {
            if world.phase == Phase::Playing {
                world.advance_tick(out_events);
            }
        }
        Command::ConfigurePairsPerTick { pairs } => {
            world.config.pairs_per_tick = pairs;
            out_events.push(Event::ConfigChanged);
        }
        Command::ConfigureTickRate { ticks_per_second } => {
            world.config.ticks_per_second = ticks_per_second.max(1);
            out_events.push(Event::ConfigChanged);
        }
        Command::ConfigureOpponent { player, behavior } => {
            world.with_opponent(player, out_events, |world, index, out_events| {
                let Some(opponent) = world.config.opponents.get_mut(index - 1) else {
                    return;
                };
                if !opponent.behavior.same_variant(&behavior) {
                    if let Some(state) = world.players.get_mut(index) {
                        state.clear_schedule();
                    }
                }
                opponent.behavior = behavior;
                out_events.push(Event::ConfigChanged);
            });
        }
        Command::ResetTuning => {
            world.config.pairs_per_tick = DEFAULT_PAIRS_PER_TICK;
            world.config.ticks_per_second = DEFAULT_TICKS_PER_SECOND;
            out_events.push(Event::ConfigChanged);
        }
        Command::SelectRandomSource { source } => {
            world.random.select(source);
            world.config.random_source = source;
            if source == RandomSource::Entropy {
                warn!("entropy random source selected; the session is no longer reproducible");
            }
            out_events.push(Event::RandomSourceChanged {
                source,
                reproducible: world.random.is_reproducible(),
            });
        }
        Command::ForceOpponentRotation { player } => {
            world.with_opponent(player, out_events, |world, index, out_events| {
                let tick = world.tick;
                let Some(state) = world.players.get_mut(index) else {
                    return;
                };
                let direction = RotationDirection::Forward;
                let piece = players::rotate(&mut world.grid, state, direction, tick);
                state.rotation_period = 0;
                debug!(player = player.get(), ?piece, tick, "opponent rotation forced");
                out_events.push(Event::PieceRotated {
                    player,
                    piece,
                    direction,
                    tick,
                });
            });
        }
        Command::ResetOpponentSchedule { player } => {
            world.with_opponent(player, out_events, |world, index, out_events| {
                if let Some(state) = world.players.get_mut(index) {
                    state.rotation_period = 0;
                }
                out_events.push(Event::ConfigChanged);
            });
        }
        Command::ResetOpponentTuning { player } => {
            world.with_opponent(player, out_events, |world, index, out_events| {
                if let Some(opponent) = world.config.opponents.get_mut(index - 1) {
                    opponent.behavior = BehaviorTuning::default();
                }
                if let Some(state) = world.players.get_mut(index) {
                    state.clear_schedule();
                }
                out_events.push(Event::ConfigChanged);
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use handlords_core::{
        GameConfig, GridView, LevelId, Phase, PlayerId, PlayerView, RandomSource, TickStats,
    };

    use super::{opponents, World};

    /// Exposes a read-only view of the arena cells.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Captures a read-only view of every player in player-index order.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerView {
        PlayerView::from_snapshots(world.players.iter().map(|player| player.snapshot()).collect())
    }

    /// Number of ticks advanced since the level was loaded.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Current game-flow phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Level whose layout is loaded.
    #[must_use]
    pub fn level(world: &World) -> LevelId {
        world.level
    }

    /// Interaction tallies of the most recent tick.
    #[must_use]
    pub fn last_tick_stats(world: &World) -> TickStats {
        world.last_stats
    }

    /// Configuration currently in effect.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Number of cells owned by the provided player.
    #[must_use]
    pub fn territory(world: &World, player: PlayerId) -> usize {
        world.grid.view().territory_of(player)
    }

    /// Contents of the shift register.
    #[must_use]
    pub fn rng_state(world: &World) -> u16 {
        world.random.lfsr_state()
    }

    /// Randomness strategy producing values.
    #[must_use]
    pub fn random_source(world: &World) -> RandomSource {
        world.random.source()
    }

    /// Reports whether the session can still be replayed from its seed.
    #[must_use]
    pub fn is_reproducible(world: &World) -> bool {
        world.random.is_reproducible()
    }

    /// Ticks left before the player's next scheduled rotation.
    ///
    /// Returns `None` for unknown players and for players without a pending
    /// schedule, which includes the human and loss-reactive opponents.
    #[must_use]
    pub fn ticks_until_rotation(world: &World, player: PlayerId) -> Option<u64> {
        let state = world.players.get(player.index())?;
        opponents::ticks_until_rotation(world.tick, state)
    }
}
