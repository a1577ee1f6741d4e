//! Turn rotation and faction elimination.
use crate::board::Board;
use crate::roster::{Pawn, PlayerId, Roster};

/// Next index in a cyclic turn order.
#[must_use]
pub const fn advance_turn(active_len: usize, current: usize) -> usize {
    if active_len == 0 {
        return 0;
    }
    (current + 1) % active_len
}

/// Index, within the post-elimination roster, of the player who follows
/// `actor` in the pre-elimination seating order.
///
/// Players removed in the same step are skipped, so the result never points
/// at an eliminated seat.
#[must_use]
pub fn next_turn_after(pre: &[PlayerId], post: &[PlayerId], actor: PlayerId) -> usize {
    let Some(start) = pre.iter().position(|id| *id == actor) else {
        return 0;
    };
    (1..=pre.len())
        .map(|step| pre[(start + step) % pre.len()])
        .find_map(|candidate| post.iter().position(|id| *id == candidate))
        .unwrap_or(0)
}

/// Active players who no longer have a live flag.
#[must_use]
pub fn check_eliminations(roster: &Roster) -> Vec<PlayerId> {
    roster
        .active()
        .iter()
        .copied()
        .filter(|id| roster.live_flag_count(*id) == 0)
        .collect()
}

/// Take every remaining pawn of `player` off the board and out of play,
/// then drop the player from the active roster.
pub fn remove_faction(board: &mut Board, roster: &mut Roster, player: PlayerId) -> Vec<Pawn> {
    let ids: Vec<_> = roster.live_pawns_of(player).map(|p| p.id).collect();
    let mut removed = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(pawn) = roster.remove_pawn(id) {
            board.clear_occupant(pawn.position);
            removed.push(pawn);
        }
    }
    roster.deactivate(player);
    debug_assert!(
        !roster.active().is_empty(),
        "elimination emptied the active roster"
    );
    log::info!("{player} eliminated, {} pawns removed", removed.len());
    removed
}
