//! Move resolution: legal destinations, target classification, and the
//! board mutations applied when the trivia gate lets an action through.
use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord};
use crate::constants::{ATTACK_REWARD, MOVE_REWARD};
use crate::roster::{Pawn, PawnId, PlayerId, Roster};
use crate::trivia::TriviaGate;

/// What a click on `target` means for the selected pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Manhattan distance other than 1, including the pawn's own cell.
    NotAdjacent,
    Hole,
    MoveEmpty,
    Attack,
    BlockedSameOwner,
}

/// Orthogonal neighbours the pawn may act on: in bounds, not holes, and
/// not held by a friendly pawn. Enemy-held cells are included as attacks.
#[must_use]
pub fn legal_destinations(board: &Board, roster: &Roster, pawn: PawnId) -> Vec<Coord> {
    let Some(pawn) = roster.pawn(pawn) else {
        return Vec::new();
    };
    pawn.position
        .orthogonal_neighbors(board.size())
        .into_iter()
        .filter(|coord| {
            matches!(
                classify_for(board, roster, pawn, *coord),
                TargetKind::MoveEmpty | TargetKind::Attack
            )
        })
        .collect()
}

/// Classify a target cell relative to the selected pawn.
///
/// Off-board targets and unknown pawns classify as [`TargetKind::NotAdjacent`].
#[must_use]
pub fn classify_target(board: &Board, roster: &Roster, pawn: PawnId, target: Coord) -> TargetKind {
    roster
        .pawn(pawn)
        .map_or(TargetKind::NotAdjacent, |pawn| {
            classify_for(board, roster, pawn, target)
        })
}

fn classify_for(board: &Board, roster: &Roster, pawn: &Pawn, target: Coord) -> TargetKind {
    let Some(cell) = board.cell(target) else {
        return TargetKind::NotAdjacent;
    };
    if pawn.position.manhattan(target) != 1 {
        return TargetKind::NotAdjacent;
    }
    if cell.is_hole {
        return TargetKind::Hole;
    }
    match cell.occupant.and_then(|id| roster.pawn(id)) {
        None => TargetKind::MoveEmpty,
        Some(occupant) if occupant.owner == pawn.owner => TargetKind::BlockedSameOwner,
        Some(_) => TargetKind::Attack,
    }
}

/// Ask up to `count` questions; every one must come back correct.
///
/// Stops at the first wrong or missing answer.
pub fn run_challenges<G: TriviaGate + ?Sized>(gate: &mut G, category: &str, count: u8) -> bool {
    for _ in 0..count {
        if gate.ask(category) != Some(true) {
            return false;
        }
    }
    true
}

/// Result of a capture applied to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub captured: Pawn,
    pub from: Coord,
    pub to: Coord,
}

/// Move `pawn` into the empty cell `to` and award the move reward.
///
/// Returns the source cell, or `None` if the move could not be applied.
pub fn apply_move(board: &mut Board, roster: &mut Roster, pawn: PawnId, to: Coord) -> Option<Coord> {
    let (from, owner) = roster.pawn(pawn).map(|p| (p.position, p.owner))?;
    if !board.move_occupant(from, to) {
        return None;
    }
    relocate(roster, pawn, owner, to, MOVE_REWARD);
    Some(from)
}

/// Remove the defender on `to`, move the attacker in, award the attack reward.
pub fn apply_capture(
    board: &mut Board,
    roster: &mut Roster,
    attacker: PawnId,
    to: Coord,
) -> Option<Capture> {
    let (from, owner) = roster.pawn(attacker).map(|p| (p.position, p.owner))?;
    let defender_id = board.occupant_at(to)?;
    if roster.pawn(defender_id)?.owner == owner {
        return None;
    }
    board.clear_occupant(to);
    let captured = roster.remove_pawn(defender_id)?;
    if !board.move_occupant(from, to) {
        return None;
    }
    relocate(roster, attacker, owner, to, ATTACK_REWARD);
    Some(Capture { captured, from, to })
}

fn relocate(roster: &mut Roster, pawn: PawnId, owner: PlayerId, to: Coord, reward: u32) {
    if let Some(p) = roster.pawn_mut(pawn) {
        p.position = to;
    }
    if let Some(player) = roster.player_mut(owner) {
        player.award(reward);
    }
}
