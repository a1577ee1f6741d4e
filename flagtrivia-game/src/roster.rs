//! Players, pawns, and the starting layout.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::constants::{HOME_OFFSETS, PLAYER_COLORS};

/// Seat identifier, assigned in seat order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", u16::from(self.0) + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PawnId(pub u16);

/// Display colour carried for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: Rgb,
    /// Never decreases during a match.
    pub score: u32,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        let (r, g, b) = PLAYER_COLORS[usize::from(id.0) % PLAYER_COLORS.len()];
        Self {
            id,
            name: format!("Player {}", u16::from(id.0) + 1),
            color: Rgb(r, g, b),
            score: 0,
        }
    }

    pub const fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    /// Fixed at creation.
    pub owner: PlayerId,
    pub position: Coord,
    /// Capturing this pawn eliminates its owner.
    pub is_flag: bool,
}

/// Every player of the match plus the live pawn set.
///
/// Eliminated players stay in `players` (their score is still shown) but
/// leave `active`. Captured pawns leave `pawns` for good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
    pawns: BTreeMap<PawnId, Pawn>,
    active: Vec<PlayerId>,
}

impl Roster {
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn active(&self) -> &[PlayerId] {
        &self.active
    }

    #[must_use]
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.active.contains(&player)
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    #[must_use]
    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.pawns.get(&id)
    }

    pub(crate) fn pawn_mut(&mut self, id: PawnId) -> Option<&mut Pawn> {
        self.pawns.get_mut(&id)
    }

    /// All live pawns in id order.
    pub fn pawns(&self) -> impl Iterator<Item = &Pawn> + '_ {
        self.pawns.values()
    }

    #[must_use]
    pub fn pawn_count(&self) -> usize {
        self.pawns.len()
    }

    pub fn live_pawns_of(&self, player: PlayerId) -> impl Iterator<Item = &Pawn> + '_ {
        self.pawns.values().filter(move |pawn| pawn.owner == player)
    }

    #[must_use]
    pub fn live_flag_count(&self, player: PlayerId) -> usize {
        self.live_pawns_of(player).filter(|pawn| pawn.is_flag).count()
    }

    /// The player's surviving flag, if it has not been captured.
    pub fn live_flag_of(&self, player: PlayerId) -> Option<&Pawn> {
        self.live_pawns_of(player).find(|pawn| pawn.is_flag)
    }

    pub(crate) fn remove_pawn(&mut self, id: PawnId) -> Option<Pawn> {
        self.pawns.remove(&id)
    }

    pub(crate) fn deactivate(&mut self, player: PlayerId) {
        self.active.retain(|id| *id != player);
    }
}

/// Create `num_players` players and lay out their starting pawns.
///
/// Seats take the corners `(0,0)`, `(n-1,n-1)`, `(0,n-1)`, `(n-1,0)` in
/// order, with the offset constellation reflected towards the board centre.
/// Offsets that fall off the board are skipped.
#[must_use]
pub fn place_pawns(num_players: u8, board_size: u8) -> Roster {
    let mut players = Vec::with_capacity(usize::from(num_players));
    let mut pawns = BTreeMap::new();
    let mut next_id: u16 = 0;

    for seat in 0..num_players {
        let id = PlayerId(seat);
        players.push(Player::new(id));
        for (index, &(dr, dc)) in HOME_OFFSETS.iter().enumerate() {
            let Some(position) = home_position(seat, board_size, dr, dc) else {
                continue;
            };
            let pawn_id = PawnId(next_id);
            next_id += 1;
            pawns.insert(
                pawn_id,
                Pawn {
                    id: pawn_id,
                    owner: id,
                    position,
                    is_flag: index == 0,
                },
            );
        }
    }

    let active = players.iter().map(|p| p.id).collect();
    Roster {
        players,
        pawns,
        active,
    }
}

fn home_position(seat: u8, size: u8, dr: u8, dc: u8) -> Option<Coord> {
    let size = i16::from(size);
    let far = size - 1;
    let (dr, dc) = (i16::from(dr), i16::from(dc));
    let (row, col) = match seat % 4 {
        0 => (dr, dc),
        1 => (far - dr, far - dc),
        2 => (dr, far - dc),
        _ => (far - dr, dc),
    };
    if !(0..size).contains(&row) || !(0..size).contains(&col) {
        return None;
    }
    Some(Coord::new(u8::try_from(row).ok()?, u8::try_from(col).ok()?))
}
