//! Board grid, cells, and terrain setup.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::CategoryPolicy;
use crate::constants::CATEGORIES;
use crate::roster::PawnId;

/// A location on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Build a coordinate from signed UI input, rejecting anything off-board.
    #[must_use]
    pub fn checked(row: i32, col: i32, size: u8) -> Option<Self> {
        let row = u8::try_from(row).ok()?;
        let col = u8::try_from(col).ok()?;
        (row < size && col < size).then_some(Self { row, col })
    }

    #[must_use]
    pub const fn manhattan(self, other: Self) -> u16 {
        (self.row.abs_diff(other.row) as u16) + (self.col.abs_diff(other.col) as u16)
    }

    /// In-bounds orthogonal neighbours in up, down, left, right order.
    #[must_use]
    pub fn orthogonal_neighbors(self, size: u8) -> Vec<Self> {
        let mut out = Vec::with_capacity(4);
        if self.row > 0 {
            out.push(Self::new(self.row - 1, self.col));
        }
        if self.row + 1 < size {
            out.push(Self::new(self.row + 1, self.col));
        }
        if self.col > 0 {
            out.push(Self::new(self.row, self.col - 1));
        }
        if self.col + 1 < size {
            out.push(Self::new(self.row, self.col + 1));
        }
        out
    }
}

/// A single board square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Selects the question pool for actions targeting this cell.
    pub category: String,
    /// Holes are fixed at setup and can never hold a pawn.
    pub is_hole: bool,
    pub occupant: Option<PawnId>,
}

impl Cell {
    fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            is_hole: false,
            occupant: None,
        }
    }

    #[must_use]
    pub const fn is_free(&self) -> bool {
        !self.is_hole && self.occupant.is_none()
    }
}

/// Square grid of cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Build a `size × size` board and tag every cell with a category.
    pub fn initialize<R: Rng + ?Sized>(size: u8, policy: CategoryPolicy, rng: &mut R) -> Self {
        let mut cells = Vec::with_capacity(usize::from(size) * usize::from(size));
        for row in 0..size {
            for col in 0..size {
                let category = match policy {
                    CategoryPolicy::Checkerboard => checkerboard_category(row, col),
                    CategoryPolicy::UniformRandom => {
                        CATEGORIES[rng.gen_range(0..CATEGORIES.len())]
                    }
                };
                cells.push(Cell::new(category));
            }
        }
        Self { size, cells }
    }

    #[must_use]
    pub const fn size(&self) -> u8 {
        self.size
    }

    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| usize::from(coord.row) * usize::from(self.size) + usize::from(coord.col))
    }

    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).and_then(|idx| self.cells.get(idx))
    }

    fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).and_then(|idx| self.cells.get_mut(idx))
    }

    #[must_use]
    pub fn occupant_at(&self, coord: Coord) -> Option<PawnId> {
        self.cell(coord).and_then(|cell| cell.occupant)
    }

    #[must_use]
    pub fn is_hole(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(|cell| cell.is_hole)
    }

    /// Iterate over every cell with its coordinate, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            let row = u8::try_from(idx / usize::from(size)).unwrap_or(u8::MAX);
            let col = u8::try_from(idx % usize::from(size)).unwrap_or(u8::MAX);
            (Coord::new(row, col), cell)
        })
    }

    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_hole).count()
    }

    /// Turn `count` random free cells into holes, sampling without replacement.
    ///
    /// Must run after pawns are placed. `count` is clamped to the number of
    /// free cells. Returns the cells that became holes.
    pub fn place_holes<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Coord> {
        let free: Vec<Coord> = self
            .iter()
            .filter(|(_, cell)| cell.is_free())
            .map(|(coord, _)| coord)
            .collect();
        let count = count.min(free.len());
        let chosen: Vec<Coord> = free.choose_multiple(rng, count).copied().collect();
        for coord in &chosen {
            if let Some(cell) = self.cell_mut(*coord) {
                cell.is_hole = true;
            }
        }
        log::debug!("placed {} holes on {}x{} board", chosen.len(), self.size, self.size);
        chosen
    }

    /// Put a pawn on an empty, non-hole cell. Returns false if the cell is unusable.
    pub(crate) fn set_occupant(&mut self, coord: Coord, pawn: PawnId) -> bool {
        match self.cell_mut(coord) {
            Some(cell) if cell.is_free() => {
                cell.occupant = Some(pawn);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn clear_occupant(&mut self, coord: Coord) -> Option<PawnId> {
        self.cell_mut(coord).and_then(|cell| cell.occupant.take())
    }

    /// Move whatever stands on `from` onto the empty cell `to`.
    pub(crate) fn move_occupant(&mut self, from: Coord, to: Coord) -> bool {
        if !self.cell(to).is_some_and(Cell::is_free) {
            return false;
        }
        let Some(pawn) = self.clear_occupant(from) else {
            return false;
        };
        self.set_occupant(to, pawn)
    }
}

fn checkerboard_category(row: u8, col: u8) -> &'static str {
    CATEGORIES[(usize::from(row) + usize::from(col)) % CATEGORIES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn board(size: u8) -> Board {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        Board::initialize(size, CategoryPolicy::Checkerboard, &mut rng)
    }

    #[test]
    fn checkerboard_follows_row_plus_col() {
        let board = board(8);
        assert_eq!(board.cell(Coord::new(0, 0)).unwrap().category, "Sport");
        assert_eq!(board.cell(Coord::new(0, 1)).unwrap().category, "History");
        assert_eq!(board.cell(Coord::new(1, 0)).unwrap().category, "History");
        assert_eq!(board.cell(Coord::new(3, 3)).unwrap().category, "Sport");
        assert_eq!(board.cell(Coord::new(2, 3)).unwrap().category, "Random");
    }

    #[test]
    fn uniform_policy_only_uses_known_categories() {
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        let board = Board::initialize(12, CategoryPolicy::UniformRandom, &mut rng);
        assert!(
            board
                .iter()
                .all(|(_, cell)| CATEGORIES.contains(&cell.category.as_str()))
        );
    }

    #[test]
    fn neighbors_stay_in_bounds() {
        assert_eq!(Coord::new(0, 0).orthogonal_neighbors(6).len(), 2);
        assert_eq!(Coord::new(5, 2).orthogonal_neighbors(6).len(), 3);
        assert_eq!(Coord::new(3, 3).orthogonal_neighbors(6).len(), 4);
        assert_eq!(Coord::new(1, 1).manhattan(Coord::new(2, 3)), 3);
    }

    #[test]
    fn checked_rejects_negative_and_oversized_input() {
        assert_eq!(Coord::checked(-1, 0, 8), None);
        assert_eq!(Coord::checked(0, 8, 8), None);
        assert_eq!(Coord::checked(300, 1, 8), None);
        assert_eq!(Coord::checked(7, 7, 8), Some(Coord::new(7, 7)));
    }

    #[test]
    fn holes_skip_occupied_cells_and_clamp() {
        let mut board = board(6);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for col in 0..6 {
            assert!(board.set_occupant(Coord::new(0, col), PawnId(u16::from(col))));
        }
        let holes = board.place_holes(1_000, &mut rng);
        assert_eq!(holes.len(), 30);
        assert_eq!(board.hole_count(), 30);
        for col in 0..6 {
            assert!(!board.is_hole(Coord::new(0, col)));
        }
    }

    #[test]
    fn holes_are_distinct() {
        let mut board = board(10);
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut holes = board.place_holes(20, &mut rng);
        holes.sort();
        holes.dedup();
        assert_eq!(holes.len(), 20);
        assert_eq!(board.hole_count(), 20);
    }

    #[test]
    fn occupant_moves_only_onto_free_cells() {
        let mut board = board(6);
        let a = Coord::new(1, 1);
        let b = Coord::new(1, 2);
        assert!(board.set_occupant(a, PawnId(1)));
        assert!(!board.set_occupant(a, PawnId(2)));
        assert!(board.move_occupant(a, b));
        assert_eq!(board.occupant_at(a), None);
        assert_eq!(board.occupant_at(b), Some(PawnId(1)));
        assert!(!board.move_occupant(a, b));
    }
}
