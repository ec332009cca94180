//! Level layouts stamped onto the grid.

use handlords_core::{Cell, CellCoord, LevelId, PieceKind, PlayerId, HUMAN_PLAYER};

use crate::{grid::Grid, players::PlayerState};

const FIRST_OPPONENT: PlayerId = PlayerId::new(1);

/// Clears the grid and stamps the layout of `level`.
///
/// Only [`LevelId::FIRST`] has a layout: a wall border with the interior split
/// down the middle, the left half held by the human and the right half by the
/// first opponent, each stamped with its owner's current piece.
pub(crate) fn load(level: LevelId, grid: &mut Grid, players: &[PlayerState]) {
    debug_assert_eq!(level, LevelId::FIRST, "only the first level has a layout");
    debug_assert!(players.len() > FIRST_OPPONENT.index(), "layout needs an opponent");

    grid.clear();

    let columns = grid.columns();
    let rows = grid.rows();
    if columns == 0 || rows == 0 {
        return;
    }

    let human_piece = players.get(HUMAN_PLAYER.index()).map(|player| player.piece);
    let opponent_piece = players.get(FIRST_OPPONENT.index()).map(|player| player.piece);
    let split = columns / 2;

    for row in 0..rows {
        for column in 0..columns {
            let on_border = column == 0 || row == 0 || column == columns - 1 || row == rows - 1;
            let cell = if on_border {
                Cell::Wall
            } else if column < split {
                owned(HUMAN_PLAYER, human_piece)
            } else {
                owned(FIRST_OPPONENT, opponent_piece)
            };
            *grid.at_mut(CellCoord::new(column, row)) = cell;
        }
    }
}

fn owned(owner: PlayerId, piece: Option<PieceKind>) -> Cell {
    piece.map_or(Cell::Empty, |piece| Cell::Owned { owner, piece })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<PlayerState> {
        vec![
            PlayerState::new(HUMAN_PLAYER, PieceKind::Rock),
            PlayerState::new(FIRST_OPPONENT, PieceKind::Scissors),
        ]
    }

    #[test]
    fn first_level_splits_the_arena() {
        let mut grid = Grid::arena();
        load(LevelId::FIRST, &mut grid, &roster());

        assert_eq!(*grid.at(CellCoord::new(0, 5)), Cell::Wall);
        assert_eq!(*grid.at(CellCoord::new(39, 5)), Cell::Wall);
        assert_eq!(*grid.at(CellCoord::new(12, 0)), Cell::Wall);
        assert_eq!(*grid.at(CellCoord::new(12, 23)), Cell::Wall);
        assert_eq!(
            *grid.at(CellCoord::new(19, 1)),
            Cell::Owned {
                owner: HUMAN_PLAYER,
                piece: PieceKind::Rock,
            }
        );
        assert_eq!(
            *grid.at(CellCoord::new(20, 1)),
            Cell::Owned {
                owner: FIRST_OPPONENT,
                piece: PieceKind::Scissors,
            }
        );

        let view = grid.view();
        assert_eq!(view.territory_of(HUMAN_PLAYER), 19 * 22);
        assert_eq!(view.territory_of(FIRST_OPPONENT), 19 * 22);
    }

    #[test]
    fn reload_discards_previous_contents() {
        let mut grid = Grid::arena();
        let players = roster();
        load(LevelId::FIRST, &mut grid, &players);
        let pristine = grid.clone();

        *grid.at_mut(CellCoord::new(5, 5)) = Cell::Owned {
            owner: FIRST_OPPONENT,
            piece: PieceKind::Paper,
        };
        load(LevelId::FIRST, &mut grid, &players);

        assert_eq!(grid, pristine);
    }
}
