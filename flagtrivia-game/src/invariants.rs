//! Structural sanity checks over a match.
//!
//! None of these can fail through the public API. A violation means the
//! engine itself has a bug.
use std::collections::BTreeMap;

use crate::board::Coord;
use crate::roster::PawnId;
use crate::state::{MatchPhase, MatchState};

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check every structural invariant, returning all violations found.
#[must_use]
pub fn check_invariants(state: &MatchState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = state.board();
    let roster = state.roster();

    let mut occupied: BTreeMap<PawnId, Coord> = BTreeMap::new();
    for (coord, cell) in board.iter() {
        let Some(id) = cell.occupant else {
            continue;
        };
        if cell.is_hole {
            violations.push(InvariantViolation::new(format!(
                "hole at {coord:?} holds pawn {}",
                id.0
            )));
        }
        if let Some(previous) = occupied.insert(id, coord) {
            violations.push(InvariantViolation::new(format!(
                "pawn {} occupies both {previous:?} and {coord:?}",
                id.0
            )));
        }
        match roster.pawn(id) {
            None => violations.push(InvariantViolation::new(format!(
                "cell {coord:?} holds captured pawn {}",
                id.0
            ))),
            Some(pawn) if pawn.position != coord => {
                violations.push(InvariantViolation::new(format!(
                    "pawn {} sits on {coord:?} but records {:?}",
                    id.0, pawn.position
                )));
            }
            Some(_) => {}
        }
    }

    for pawn in roster.pawns() {
        if !occupied.contains_key(&pawn.id) {
            violations.push(InvariantViolation::new(format!(
                "live pawn {} at {:?} is missing from the board",
                pawn.id.0, pawn.position
            )));
        }
    }

    for player in roster.players() {
        let flags = roster.live_flag_count(player.id);
        if roster.is_active(player.id) {
            if flags != 1 {
                violations.push(InvariantViolation::new(format!(
                    "active player {} has {flags} live flags",
                    player.id
                )));
            }
        } else if roster.live_pawns_of(player.id).next().is_some() {
            violations.push(InvariantViolation::new(format!(
                "eliminated player {} still has pawns on the board",
                player.id
            )));
        }
    }

    let active = roster.active().len();
    if active == 0 {
        violations.push(InvariantViolation::new("active roster is empty"));
    } else if state.current_index() >= active {
        violations.push(InvariantViolation::new(format!(
            "turn index {} out of range for {active} active players",
            state.current_index()
        )));
    }

    match state.phase() {
        MatchPhase::MatchOver { winner } => {
            if active != 1 || !roster.is_active(winner) {
                violations.push(InvariantViolation::new(format!(
                    "match over with winner {winner} but {active} active players"
                )));
            }
        }
        _ if active == 1 => {
            violations.push(InvariantViolation::new(
                "single active player but the match is still running",
            ));
        }
        MatchPhase::Selected(id) => {
            let owned = roster
                .pawn(id)
                .is_some_and(|pawn| Some(pawn.owner) == roster.active().get(state.current_index()).copied());
            if !owned {
                violations.push(InvariantViolation::new(format!(
                    "selected pawn {} does not belong to the current player",
                    id.0
                )));
            }
        }
        MatchPhase::Idle => {}
    }

    violations
}

/// Panic on any violation in debug builds; no-op in release.
pub fn assert_invariants(state: &MatchState) {
    #[cfg(debug_assertions)]
    {
        let violations = check_invariants(state);
        assert!(
            violations.is_empty(),
            "invariant violations: {}",
            violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );
    }
    #[cfg(not(debug_assertions))]
    let _ = state;
}
