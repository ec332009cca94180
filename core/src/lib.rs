#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Handlords engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing intents and configuration changes, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

use std::{num::NonZeroU16, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of columns in the standard arena.
pub const ARENA_COLUMNS: u32 = 40;

/// Number of rows in the standard arena.
pub const ARENA_ROWS: u32 = 24;

/// Pair interactions attempted per tick unless configured otherwise.
pub const DEFAULT_PAIRS_PER_TICK: u32 = 240;

/// Simulation rate unless configured otherwise.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 15;

/// Average rotation interval of the jittered opponent, in ticks.
pub const DEFAULT_ROTATION_AVERAGE: u32 = 58;

/// Half-width of the jittered opponent's rotation interval, in ticks.
pub const DEFAULT_ROTATION_HALF_INTERVAL: u32 = 43;

/// Seed loaded into the shift register when none is supplied.
pub const DEFAULT_SEED: NonZeroU16 = match NonZeroU16::new(0xACE1) {
    Some(seed) => seed,
    None => panic!("default seed must be nonzero"),
};

/// Identifier of the human-controlled player.
pub const HUMAN_PLAYER: PlayerId = PlayerId::new(0);

/// Largest roster that player identifiers can address.
pub const MAX_PLAYERS: usize = u8::MAX as usize + 1;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts play from the ready phase.
    Begin,
    /// Rotates the human player's piece one step forward.
    RotateHumanPiece,
    /// Acknowledges a finished round and reloads the level.
    Acknowledge,
    /// Advances the simulation by one fixed tick.
    AdvanceTick,
    /// Changes how many pair interactions are attempted per tick.
    ConfigurePairsPerTick {
        /// Attempts to perform on each subsequent tick.
        pairs: u32,
    },
    /// Changes the fixed tick rate. Values below one are clamped to one.
    ConfigureTickRate {
        /// Ticks per simulated second.
        ticks_per_second: u32,
    },
    /// Replaces the behavior tuning of an opponent.
    ConfigureOpponent {
        /// Opponent whose tuning is replaced.
        player: PlayerId,
        /// New behavior parameters.
        behavior: BehaviorTuning,
    },
    /// Restores the default pair count and tick rate.
    ResetTuning,
    /// Selects the randomness strategy used from the next draw onwards.
    SelectRandomSource {
        /// Strategy to activate.
        source: RandomSource,
    },
    /// Rotates an opponent immediately and discards its pending schedule.
    ForceOpponentRotation {
        /// Opponent to rotate.
        player: PlayerId,
    },
    /// Discards an opponent's pending schedule so it is resampled next tick.
    ResetOpponentSchedule {
        /// Opponent whose schedule is discarded.
        player: PlayerId,
    },
    /// Restores an opponent's default behavior and discards its schedule.
    ResetOpponentTuning {
        /// Opponent whose tuning is restored.
        player: PlayerId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces a phase transition.
    PhaseChanged {
        /// Phase active before the transition.
        from: Phase,
        /// Phase active after the transition.
        to: Phase,
    },
    /// Indicates that the tick counter advanced.
    TickAdvanced {
        /// Value of the tick counter after advancing.
        tick: u64,
    },
    /// Reports the pair interactions resolved during a tick.
    CombatResolved {
        /// Tick during which the interactions happened.
        tick: u64,
        /// Interaction tallies for the tick.
        stats: TickStats,
    },
    /// Confirms that a player's piece rotated and its cells were re-stamped.
    PieceRotated {
        /// Player whose piece rotated.
        player: PlayerId,
        /// Piece held after the rotation.
        piece: PieceKind,
        /// Direction of the rotation.
        direction: RotationDirection,
        /// Tick recorded for the rotation.
        tick: u64,
    },
    /// Confirms that a level layout was stamped onto the grid.
    LevelLoaded {
        /// Level that was loaded.
        level: LevelId,
    },
    /// Reports that a tuning parameter changed.
    ConfigChanged,
    /// Reports that the randomness strategy changed.
    RandomSourceChanged {
        /// Strategy now active.
        source: RandomSource,
        /// Whether the session is still reproducible from its seed.
        reproducible: bool,
    },
    /// Reports that an intent was submitted in a phase that does not accept it.
    IntentRejected {
        /// Intent that was rejected.
        intent: Intent,
        /// Phase that was active when the intent arrived.
        phase: Phase,
    },
    /// Reports that an opponent-targeted command could not be applied.
    OpponentCommandRejected {
        /// Player named by the command.
        player: PlayerId,
        /// Specific reason the command failed.
        reason: OpponentError,
    },
}

/// Discrete player intents gated by the current phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Start signal, accepted in [`Phase::Ready`].
    Begin,
    /// Human rotation, accepted in [`Phase::Playing`].
    RotateHuman,
    /// Acknowledgement, accepted in terminal phases.
    Acknowledge,
}

/// Reasons an opponent-targeted command may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpponentError {
    /// No player with the provided identifier exists.
    UnknownPlayer,
    /// The identifier names the human player, who has no behavior.
    HumanPlayer,
}

/// Top-level game-flow state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the start signal.
    Ready,
    /// Ticks perform simulation work.
    Playing,
    /// The human player lost all territory.
    Lost,
    /// Every opponent lost all territory.
    Won,
    /// Reserved for completing a multi-level campaign.
    GameWon,
}

impl Phase {
    /// Reports whether the phase waits for an acknowledgement.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Won | Self::GameWon)
    }
}

/// Symbol held by a player and stamped onto its cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
}

impl PieceKind {
    /// Every piece in rotation order.
    pub const ALL: [PieceKind; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    /// Piece that follows in the cycle Rock, Paper, Scissors.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Rock => Self::Paper,
            Self::Paper => Self::Scissors,
            Self::Scissors => Self::Rock,
        }
    }

    /// Piece that precedes in the cycle.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }

    /// Steps the piece once in the provided direction.
    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Forward => self.next(),
            RotationDirection::Reverse => self.previous(),
        }
    }

    /// Reports whether this piece defeats `other` under rock-paper-scissors.
    #[must_use]
    pub const fn beats(self, other: PieceKind) -> bool {
        matches!(
            (self, other),
            (Self::Rock, Self::Scissors) | (Self::Scissors, Self::Paper) | (Self::Paper, Self::Rock)
        )
    }
}

/// Direction a rotation steps through the piece cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    /// Rock to Paper to Scissors.
    Forward,
    /// Scissors to Paper to Rock.
    Reverse,
}

/// Small integer identifying a player; zero is the human.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Position of the player within the roster.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Reports whether the identifier names the human player.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        self.0 == HUMAN_PLAYER.0
    }
}

/// Content of a single arena cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Unclaimed space that adjacent territory spreads into.
    #[default]
    Empty,
    /// Immutable obstacle.
    Wall,
    /// Territory held by a player.
    Owned {
        /// Player controlling the cell.
        owner: PlayerId,
        /// Piece stamped onto the cell.
        piece: PieceKind,
    },
}

impl Cell {
    /// Player controlling the cell, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        match self {
            Self::Owned { owner, .. } => Some(*owner),
            Self::Empty | Self::Wall => None,
        }
    }

    /// Reports whether the cell is owned by the provided player.
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner() == Some(player)
    }
}

/// Cardinal directions towards neighbouring cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Maps a random draw onto a direction using the value modulo four.
    #[must_use]
    pub const fn from_random(value: u16) -> Self {
        match value % 4 {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Coordinate one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds depend on the grid and are checked by the caller.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Identifier of a level layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(u8);

impl LevelId {
    /// The opening level, the only one with a layout.
    pub const FIRST: LevelId = LevelId(1);

    /// Retrieves the numeric representation of the level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Pair interaction tallies recorded for a single tick.
///
/// These counters exist for observability and never influence the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TickStats {
    /// Pair interactions attempted, including skipped ones.
    pub attempts: u32,
    /// Pairs owned by different players that fought.
    pub battles: u32,
    /// Pairs owned by the same player.
    pub same_owner: u32,
    /// Pairs involving a wall or an empty cell.
    pub wall_or_empty: u32,
}

/// Strategy used to produce random values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomSource {
    /// Seeded 16-bit linear-feedback shift register.
    #[default]
    Lfsr,
    /// Operating-system seeded generator for debugging.
    ///
    /// Selecting this breaks reproducibility: outcomes can no longer be
    /// replayed from a seed.
    Entropy,
}

impl RandomSource {
    /// Reports whether draws from this source are reproducible from a seed.
    #[must_use]
    pub const fn is_deterministic(self) -> bool {
        matches!(self, Self::Lfsr)
    }
}

/// Inclusive range of rotation intervals measured in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalRange {
    min: u32,
    max: u32,
}

impl IntervalRange {
    /// Builds the range `[average - half, average + half]`, clamped so that the
    /// minimum is at least one tick and the maximum never falls below it.
    #[must_use]
    pub fn jittered(average: u32, half_interval: u32) -> Self {
        let min = average.saturating_sub(half_interval).max(1);
        let max = average.saturating_add(half_interval).max(min);
        Self { min, max }
    }

    /// Shortest interval in the range.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Longest interval in the range.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Number of distinct intervals in the range.
    #[must_use]
    pub const fn span(&self) -> u32 {
        self.max - self.min + 1
    }
}

/// Behavior driving a computer-controlled player, with its tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorTuning {
    /// Rotates forward after a period drawn uniformly from a jittered range.
    Jittered {
        /// Centre of the interval range, in ticks.
        average: u32,
        /// Half-width of the interval range, in ticks.
        half_interval: u32,
    },
    /// Rotates forward on a fixed cadence.
    FixedCadence {
        /// Ticks between rotations; clamped to at least one.
        interval: u32,
    },
    /// Rotates in reverse with a probability that grows with losses this tick.
    LossReactive {
        /// Chance added per cell lost this tick, in parts per thousand.
        per_loss_permille: u32,
        /// Upper bound on the chance, in parts per thousand.
        cap_permille: u32,
    },
    /// Rotates forward on a cadence that shortens after every rotation.
    Accelerating {
        /// Ticks before the first rotation.
        initial: u32,
        /// Ticks removed from the period after each rotation.
        step: u32,
        /// Shortest period reachable; clamped to at least one.
        floor: u32,
    },
}

impl BehaviorTuning {
    /// Default tuning for the jittered rotator.
    pub const JITTERED: BehaviorTuning = BehaviorTuning::Jittered {
        average: DEFAULT_ROTATION_AVERAGE,
        half_interval: DEFAULT_ROTATION_HALF_INTERVAL,
    };

    /// Default tuning for the fixed-cadence rotator.
    pub const FIXED_CADENCE: BehaviorTuning = BehaviorTuning::FixedCadence { interval: 60 };

    /// Default tuning for the loss-reactive reverse rotator.
    pub const LOSS_REACTIVE: BehaviorTuning = BehaviorTuning::LossReactive {
        per_loss_permille: 5,
        cap_permille: 250,
    };

    /// Default tuning for the accelerating rotator.
    pub const ACCELERATING: BehaviorTuning = BehaviorTuning::Accelerating {
        initial: 120,
        step: 8,
        floor: 20,
    };

    /// Reports whether both tunings describe the same behavior variant.
    #[must_use]
    pub const fn same_variant(&self, other: &BehaviorTuning) -> bool {
        matches!(
            (self, other),
            (Self::Jittered { .. }, Self::Jittered { .. })
                | (Self::FixedCadence { .. }, Self::FixedCadence { .. })
                | (Self::LossReactive { .. }, Self::LossReactive { .. })
                | (Self::Accelerating { .. }, Self::Accelerating { .. })
        )
    }
}

impl Default for BehaviorTuning {
    fn default() -> Self {
        Self::JITTERED
    }
}

/// Roster entry describing a computer-controlled player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpponentConfig {
    /// Piece held when the level loads.
    pub piece: PieceKind,
    /// Behavior deciding when the opponent rotates.
    #[serde(default)]
    pub behavior: BehaviorTuning,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            piece: PieceKind::Scissors,
            behavior: BehaviorTuning::default(),
        }
    }
}

/// Tunable simulation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pair interactions attempted per tick.
    pub pairs_per_tick: u32,
    /// Fixed simulation rate.
    pub ticks_per_second: u32,
    /// Strategy producing random values.
    pub random_source: RandomSource,
    /// Piece held by the human player when the level loads.
    pub human_piece: PieceKind,
    /// Computer-controlled players in player-index order starting at one.
    pub opponents: Vec<OpponentConfig>,
}

impl GameConfig {
    /// Number of players including the human.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.opponents.len() + 1
    }

    /// Wall-clock duration of a single tick, treating a zero rate as one.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.ticks_per_second)
    }

    /// Checks the invariants required to build a world from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.opponents.is_empty() {
            return Err(ConfigError::MissingOpponent);
        }
        let count = self.player_count();
        if count > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers { count });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pairs_per_tick: DEFAULT_PAIRS_PER_TICK,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            random_source: RandomSource::default(),
            human_piece: PieceKind::Rock,
            opponents: vec![OpponentConfig::default()],
        }
    }
}

/// Wall-clock duration of a tick at the provided rate, treating zero as one.
#[must_use]
pub fn tick_interval(ticks_per_second: u32) -> Duration {
    Duration::from_secs(1) / ticks_per_second.max(1)
}

/// Converts a raw seed into the nonzero form the shift register requires.
///
/// An all-zero register is a fixed point of the feedback function, so zero is
/// rejected rather than silently producing a constant stream.
pub fn seed_from_raw(value: u16) -> Result<NonZeroU16, ConfigError> {
    NonZeroU16::new(value).ok_or(ConfigError::ZeroSeed)
}

/// Reasons a configuration cannot be used to build a world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The tick rate must be at least one tick per second.
    #[error("ticks per second must be at least 1")]
    ZeroTickRate,
    /// The level layout requires at least one opponent.
    #[error("at least one opponent must be configured")]
    MissingOpponent,
    /// Player identifiers cannot address the whole roster.
    #[error("{count} players configured but at most {MAX_PLAYERS} are supported")]
    TooManyPlayers {
        /// Number of players requested including the human.
        count: usize,
    },
    /// The shift register cannot be seeded with zero.
    #[error("the random seed must be nonzero")]
    ZeroSeed,
}

/// Immutable representation of a single player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerSnapshot {
    /// Identifier of the player.
    pub id: PlayerId,
    /// Piece currently held.
    pub piece: PieceKind,
    /// Tick at which the player last rotated.
    pub last_rotation_tick: u64,
    /// Cells lost during the current tick.
    pub tick_losses: u32,
    /// Rotation period chosen by the player's behavior; zero when unscheduled.
    pub rotation_period: u32,
    /// Rotations counted by accelerating behaviors.
    pub acceleration: u32,
}

/// Read-only snapshot describing every player.
#[derive(Clone, Debug, Default)]
pub struct PlayerView {
    snapshots: Vec<PlayerSnapshot>,
}

impl PlayerView {
    /// Creates a new player view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PlayerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in player-index order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided player, if present.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&PlayerSnapshot> {
        self.snapshots.get(player.index())
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PlayerSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the arena cells.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [Cell],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the cell at the provided coordinate, if it lies on the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        if coord.column() >= self.columns || coord.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        self.cells.get(row * width + column).copied()
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + 'a {
        self.cells.iter().copied()
    }

    /// Counts the cells owned by the provided player.
    #[must_use]
    pub fn territory_of(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.is_owned_by(player))
            .count()
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rock_paper_scissors_precedence() {
        assert!(PieceKind::Rock.beats(PieceKind::Scissors));
        assert!(PieceKind::Scissors.beats(PieceKind::Paper));
        assert!(PieceKind::Paper.beats(PieceKind::Rock));

        for piece in PieceKind::ALL {
            assert!(!piece.beats(piece), "{piece:?} must not beat itself");
            assert_ne!(
                piece.beats(piece.next()),
                piece.next().beats(piece),
                "exactly one of {piece:?} and {:?} wins",
                piece.next()
            );
        }
    }

    #[test]
    fn rotation_cycles_in_both_directions() {
        assert_eq!(PieceKind::Rock.next(), PieceKind::Paper);
        assert_eq!(PieceKind::Paper.next(), PieceKind::Scissors);
        assert_eq!(PieceKind::Scissors.next(), PieceKind::Rock);

        for piece in PieceKind::ALL {
            assert_eq!(piece.next().previous(), piece);
            assert_eq!(
                piece.rotated(RotationDirection::Reverse),
                piece.previous()
            );
            assert_eq!(piece.next().next().next(), piece);
        }
    }

    #[test]
    fn direction_uses_value_modulo_four() {
        assert_eq!(Direction::from_random(0), Direction::North);
        assert_eq!(Direction::from_random(5), Direction::East);
        assert_eq!(Direction::from_random(0xFFFE), Direction::South);
        assert_eq!(Direction::from_random(0xFFFF), Direction::West);
    }

    #[test]
    fn neighbor_rejects_negative_coordinates() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.neighbor(Direction::North), None);
        assert_eq!(origin.neighbor(Direction::West), None);
        assert_eq!(origin.neighbor(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(origin.neighbor(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn jittered_range_matches_default_tuning() {
        let range = IntervalRange::jittered(DEFAULT_ROTATION_AVERAGE, DEFAULT_ROTATION_HALF_INTERVAL);
        assert_eq!(range.min(), 15);
        assert_eq!(range.max(), 101);
        assert_eq!(range.span(), 87);
    }

    #[test]
    fn jittered_range_clamps_to_one_tick() {
        let range = IntervalRange::jittered(10, 40);
        assert_eq!(range.min(), 1);
        assert_eq!(range.max(), 50);

        let degenerate = IntervalRange::jittered(0, 0);
        assert_eq!(degenerate.min(), 1);
        assert_eq!(degenerate.max(), 1);
        assert_eq!(degenerate.span(), 1);
    }

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.pairs_per_tick, 240);
        assert_eq!(config.ticks_per_second, 15);
        assert_eq!(config.player_count(), 2);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validation_rejects_unusable_configs() {
        let mut config = GameConfig {
            ticks_per_second: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickRate));

        config.ticks_per_second = 15;
        config.opponents.clear();
        assert_eq!(config.validate(), Err(ConfigError::MissingOpponent));

        config.opponents = vec![OpponentConfig::default(); MAX_PLAYERS];
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyPlayers {
                count: MAX_PLAYERS + 1
            })
        );
    }

    #[test]
    fn zero_seed_is_rejected() {
        assert_eq!(seed_from_raw(0), Err(ConfigError::ZeroSeed));
        assert_eq!(seed_from_raw(0xACE1), Ok(DEFAULT_SEED));
    }

    #[test]
    fn tick_interval_clamps_zero_rate() {
        assert_eq!(tick_interval(0), std::time::Duration::from_secs(1));
        assert_eq!(tick_interval(4), std::time::Duration::from_millis(250));
    }

    #[test]
    fn config_parses_from_toml_with_defaults() {
        let source = r#"
            pairs_per_tick = 300
            human_piece = "paper"

            [[opponents]]
            piece = "rock"
            behavior = { kind = "fixed_cadence", interval = 12 }

            [[opponents]]
            piece = "scissors"
        "#;

        let config: GameConfig = toml::from_str(source).expect("config parses");
        assert_eq!(config.pairs_per_tick, 300);
        assert_eq!(config.ticks_per_second, DEFAULT_TICKS_PER_SECOND);
        assert_eq!(config.random_source, RandomSource::Lfsr);
        assert_eq!(config.human_piece, PieceKind::Paper);
        assert_eq!(
            config.opponents,
            vec![
                OpponentConfig {
                    piece: PieceKind::Rock,
                    behavior: BehaviorTuning::FixedCadence { interval: 12 },
                },
                OpponentConfig {
                    piece: PieceKind::Scissors,
                    behavior: BehaviorTuning::JITTERED,
                },
            ]
        );
    }

    #[test]
    fn grid_view_counts_territory() {
        let owner = PlayerId::new(1);
        let cells = [
            Cell::Wall,
            Cell::Owned {
                owner,
                piece: PieceKind::Rock,
            },
            Cell::Owned {
                owner: HUMAN_PLAYER,
                piece: PieceKind::Paper,
            },
            Cell::Owned {
                owner,
                piece: PieceKind::Rock,
            },
        ];
        let view = GridView::new(&cells, 2, 2);

        assert_eq!(view.territory_of(owner), 2);
        assert_eq!(view.territory_of(HUMAN_PLAYER), 1);
        assert_eq!(view.cell(CellCoord::new(1, 1)), Some(cells[3]));
        assert_eq!(view.cell(CellCoord::new(2, 0)), None);
    }
}
