//! Random pair selection and rock-paper-scissors resolution.

use handlords_core::{Cell, CellCoord, Direction, PlayerId, TickStats};

use crate::{grid::Grid, players::PlayerState, random::Randomness};

/// Outcome of resolving a single ordered pair of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Interaction {
    /// A wall was involved or both cells were empty.
    Blocked,
    /// Territory spread into an empty cell.
    Filled,
    /// Both cells belong to the same player.
    SameOwner,
    /// Cells of different players fought and the loser's cell changed hands.
    Battle,
}

/// Performs `attempts` random pair interactions and tallies them.
///
/// Each attempt draws a column, a row and a direction, in that order. Pairs
/// whose neighbour falls off the grid count as attempts and nothing else.
pub(crate) fn resolve_pairs(
    grid: &mut Grid,
    random: &mut Randomness,
    players: &mut [PlayerState],
    attempts: u32,
) -> TickStats {
    let mut stats = TickStats {
        attempts,
        ..TickStats::default()
    };

    let columns = grid.columns();
    let rows = grid.rows();
    if columns == 0 || rows == 0 {
        return stats;
    }

    for _ in 0..attempts {
        let column = u32::from(random.next_u16()) % columns;
        let row = u32::from(random.next_u16()) % rows;
        let direction = Direction::from_random(random.next_u16());

        let source = CellCoord::new(column, row);
        let Some(neighbor) = source
            .neighbor(direction)
            .filter(|neighbor| grid.contains(*neighbor))
        else {
            continue;
        };

        match resolve_pair(grid, random, players, source, neighbor) {
            Interaction::Blocked | Interaction::Filled => stats.wall_or_empty += 1,
            Interaction::SameOwner => stats.same_owner += 1,
            Interaction::Battle => stats.battles += 1,
        }
    }

    stats
}

/// Resolves the ordered pair `(source, neighbor)`.
///
/// Both coordinates must lie on the grid. The shared random source is drawn
/// from only when two different players meet with the same piece; its lowest
/// bit set means the source cell wins.
pub(crate) fn resolve_pair(
    grid: &mut Grid,
    random: &mut Randomness,
    players: &mut [PlayerState],
    source: CellCoord,
    neighbor: CellCoord,
) -> Interaction {
    let source_cell = *grid.at(source);
    let neighbor_cell = *grid.at(neighbor);

    match (source_cell, neighbor_cell) {
        (Cell::Wall, _) | (_, Cell::Wall) | (Cell::Empty, Cell::Empty) => Interaction::Blocked,
        (Cell::Empty, Cell::Owned { .. }) => {
            *grid.at_mut(source) = neighbor_cell;
            Interaction::Filled
        }
        (Cell::Owned { .. }, Cell::Empty) => {
            *grid.at_mut(neighbor) = source_cell;
            Interaction::Filled
        }
        (
            Cell::Owned {
                owner: source_owner,
                piece: source_piece,
            },
            Cell::Owned {
                owner: neighbor_owner,
                piece: neighbor_piece,
            },
        ) => {
            if source_owner == neighbor_owner {
                return Interaction::SameOwner;
            }

            let source_wins = if source_piece == neighbor_piece {
                random.next_u16() & 1 == 1
            } else {
                source_piece.beats(neighbor_piece)
            };

            let (winning_cell, losing_coord, loser) = if source_wins {
                (source_cell, neighbor, neighbor_owner)
            } else {
                (neighbor_cell, source, source_owner)
            };

            *grid.at_mut(losing_coord) = winning_cell;
            charge_loss(players, loser);
            Interaction::Battle
        }
    }
}

fn charge_loss(players: &mut [PlayerState], loser: PlayerId) {
    debug_assert!(
        loser.index() < players.len(),
        "losing owner {loser:?} outside roster of {}",
        players.len()
    );
    if let Some(player) = players.get_mut(loser.index()) {
        player.record_loss();
    }
}
