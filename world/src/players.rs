//! Per-player state and the rotation sweep.

use handlords_core::{Cell, PieceKind, PlayerId, PlayerSnapshot, RotationDirection};

use crate::grid::Grid;

/// Authoritative state of a single player.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PlayerState {
    pub(crate) id: PlayerId,
    pub(crate) piece: PieceKind,
    pub(crate) starting_piece: PieceKind,
    pub(crate) last_rotation_tick: u64,
    pub(crate) tick_losses: u32,
    pub(crate) rotation_period: u32,
    pub(crate) acceleration: u32,
}

impl PlayerState {
    pub(crate) fn new(id: PlayerId, starting_piece: PieceKind) -> Self {
        Self {
            id,
            piece: starting_piece,
            starting_piece,
            last_rotation_tick: 0,
            tick_losses: 0,
            rotation_period: 0,
            acceleration: 0,
        }
    }

    /// Restores the state the player had when the level first loaded.
    pub(crate) fn reset(&mut self) {
        self.piece = self.starting_piece;
        self.last_rotation_tick = 0;
        self.tick_losses = 0;
        self.clear_schedule();
    }

    pub(crate) fn clear_schedule(&mut self) {
        self.rotation_period = 0;
        self.acceleration = 0;
    }

    pub(crate) fn record_loss(&mut self) {
        self.tick_losses = self.tick_losses.saturating_add(1);
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            piece: self.piece,
            last_rotation_tick: self.last_rotation_tick,
            tick_losses: self.tick_losses,
            rotation_period: self.rotation_period,
            acceleration: self.acceleration,
        }
    }
}

/// Steps the player's piece, records the tick and re-stamps every owned cell.
pub(crate) fn rotate(
    grid: &mut Grid,
    player: &mut PlayerState,
    direction: RotationDirection,
    tick: u64,
) -> PieceKind {
    player.piece = player.piece.rotated(direction);
    player.last_rotation_tick = tick;
    restamp(grid, player.id, player.piece);
    player.piece
}

fn restamp(grid: &mut Grid, player: PlayerId, piece: PieceKind) {
    for cell in grid.cells_mut() {
        if let Cell::Owned { owner, piece: held } = cell {
            if *owner == player {
                *held = piece;
            }
        }
    }
}

/// Counts owned cells per player index.
///
/// Owners outside the roster are a defect: they trip a debug assertion and are
/// left out of the counts otherwise.
pub(crate) fn territory(grid: &Grid, player_count: usize) -> Vec<usize> {
    let mut counts = vec![0usize; player_count];
    for owner in grid.cells().iter().filter_map(Cell::owner) {
        debug_assert!(
            owner.index() < player_count,
            "cell owner {owner:?} outside roster of {player_count}"
        );
        if let Some(count) = counts.get_mut(owner.index()) {
            *count += 1;
        }
    }
    counts
}
