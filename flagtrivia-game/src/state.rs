//! Match state machine and the public select/target API.
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Coord};
use crate::config::MatchConfig;
use crate::constants::{ATTACK_CHALLENGES, ATTACK_REWARD, MOVE_CHALLENGES, MOVE_REWARD};
use crate::error::ConfigError;
use crate::invariants::assert_invariants;
use crate::resolver::{
    TargetKind, apply_capture, apply_move, classify_target, legal_destinations, run_challenges,
};
use crate::roster::{Pawn, PawnId, Player, PlayerId, Roster, place_pawns};
use crate::trivia::TriviaGate;
use crate::turn::{check_eliminations, next_turn_after, remove_faction};

/// Where the match is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Idle,
    Selected(PawnId),
    MatchOver { winner: PlayerId },
}

/// Outcome of a `target` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    Deselected,
    MoveSuccess,
    MoveFailure,
    AttackSuccess,
    AttackFailure,
    Invalid,
}

impl ActionResult {
    /// Whether the result consumed the acting player's turn.
    #[must_use]
    pub const fn ends_turn(self) -> bool {
        matches!(
            self,
            Self::MoveSuccess | Self::MoveFailure | Self::AttackSuccess | Self::AttackFailure
        )
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::MoveSuccess | Self::AttackSuccess)
    }
}

/// Outcome of the single-click input flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    Selected(PawnId),
    Ignored,
    Action(ActionResult),
}

/// Facts emitted by resolution for presentation layers to animate or log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchEvent {
    PawnMoved {
        pawn: PawnId,
        from: Coord,
        to: Coord,
    },
    PawnCaptured {
        pawn: PawnId,
        owner: PlayerId,
        at: Coord,
        by: PawnId,
    },
    ScoreAwarded {
        player: PlayerId,
        points: u32,
        total: u32,
    },
    PlayerEliminated {
        player: PlayerId,
        pawns_removed: usize,
    },
    TurnPassed {
        from: PlayerId,
        to: PlayerId,
    },
    MatchWon {
        winner: PlayerId,
    },
}

/// A running match: board, roster, turn pointer and pending selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    config: MatchConfig,
    board: Board,
    roster: Roster,
    current: usize,
    phase: MatchPhase,
    turn_number: u32,
    #[serde(skip)]
    events: Vec<MatchEvent>,
}

impl MatchState {
    /// Set up a fresh match from `config`.
    ///
    /// Pawns are laid out before holes are drawn, so no hole ever lands on a
    /// starting position. The whole setup is reproducible from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the player count, board size or time
    /// limit is outside the supported range.
    pub fn new_match(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
        let roster = place_pawns(config.players, config.board_size);
        let mut board = Board::initialize(config.board_size, config.category_policy, &mut rng);
        for pawn in roster.pawns() {
            board.set_occupant(pawn.position, pawn.id);
        }
        board.place_holes(usize::from(config.hole_count), &mut rng);

        log::debug!(
            "new match: {} players on {}x{}, {} holes, seed {}",
            config.players,
            config.board_size,
            config.board_size,
            board.hole_count(),
            config.seed
        );

        let state = Self {
            config,
            board,
            roster,
            current: 0,
            phase: MatchPhase::Idle,
            turn_number: 1,
            events: Vec::new(),
        };
        assert_invariants(&state);
        Ok(state)
    }

    /// Select the current player's pawn at `(row, col)`.
    ///
    /// Returns `true` when the selection changed. Empty cells, enemy pawns,
    /// out-of-bounds coordinates and a finished match leave it untouched.
    pub fn select(&mut self, row: i32, col: i32) -> bool {
        if self.is_over() {
            return false;
        }
        let Some(pawn) = self.own_pawn_at(row, col) else {
            return false;
        };
        if self.phase == MatchPhase::Selected(pawn) {
            return false;
        }
        log::debug!("{} selected pawn {} at ({row}, {col})", self.current_player(), pawn.0);
        self.phase = MatchPhase::Selected(pawn);
        true
    }

    /// Act with the selected pawn on `(row, col)`.
    ///
    /// Moves and attacks are gated by `gate` and always end the turn.
    /// Holes, friendly pawns and non-adjacent cells only drop the selection.
    pub fn target<G: TriviaGate + ?Sized>(&mut self, row: i32, col: i32, gate: &mut G) -> ActionResult {
        let MatchPhase::Selected(pawn) = self.phase else {
            return ActionResult::Invalid;
        };
        let Some(to) = Coord::checked(row, col, self.board.size()) else {
            return ActionResult::Invalid;
        };

        let kind = classify_target(&self.board, &self.roster, pawn, to);
        let category = self
            .board
            .cell(to)
            .map(|cell| cell.category.clone())
            .unwrap_or_default();
        self.phase = MatchPhase::Idle;

        let result = match kind {
            TargetKind::NotAdjacent | TargetKind::Hole | TargetKind::BlockedSameOwner => {
                log::debug!("target ({row}, {col}) is {kind:?}, selection dropped");
                return ActionResult::Deselected;
            }
            TargetKind::MoveEmpty => {
                if run_challenges(gate, &category, MOVE_CHALLENGES) {
                    self.resolve_move(pawn, to)
                } else {
                    ActionResult::MoveFailure
                }
            }
            TargetKind::Attack => {
                if run_challenges(gate, &category, ATTACK_CHALLENGES) {
                    self.resolve_attack(pawn, to)
                } else {
                    ActionResult::AttackFailure
                }
            }
        };
        log::debug!("{} {kind:?} on ({row}, {col}) [{category}]: {result:?}", self.current_player());
        self.finish_action();
        result
    }

    /// Single-click input: select when nothing is selected, switch to another
    /// own pawn, otherwise act on the clicked cell.
    pub fn click<G: TriviaGate + ?Sized>(&mut self, row: i32, col: i32, gate: &mut G) -> ClickOutcome {
        if self.is_over() {
            return ClickOutcome::Ignored;
        }
        if let Some(pawn) = self.own_pawn_at(row, col) {
            self.select(row, col);
            return ClickOutcome::Selected(pawn);
        }
        match self.phase {
            MatchPhase::Selected(_) => ClickOutcome::Action(self.target(row, col, gate)),
            _ => ClickOutcome::Ignored,
        }
    }

    fn own_pawn_at(&self, row: i32, col: i32) -> Option<PawnId> {
        let coord = Coord::checked(row, col, self.board.size())?;
        let id = self.board.occupant_at(coord)?;
        let pawn = self.roster.pawn(id)?;
        (pawn.owner == self.current_player()).then_some(id)
    }

    fn resolve_move(&mut self, pawn: PawnId, to: Coord) -> ActionResult {
        let owner = self.current_player();
        let Some(from) = apply_move(&mut self.board, &mut self.roster, pawn, to) else {
            log::warn!("move of pawn {} to {to:?} could not be applied", pawn.0);
            return ActionResult::MoveFailure;
        };
        self.events.push(MatchEvent::PawnMoved { pawn, from, to });
        self.push_award(owner, MOVE_REWARD);
        ActionResult::MoveSuccess
    }

    fn resolve_attack(&mut self, attacker: PawnId, to: Coord) -> ActionResult {
        let owner = self.current_player();
        let Some(capture) = apply_capture(&mut self.board, &mut self.roster, attacker, to) else {
            log::warn!("attack of pawn {} on {to:?} could not be applied", attacker.0);
            return ActionResult::AttackFailure;
        };
        self.events.push(MatchEvent::PawnCaptured {
            pawn: capture.captured.id,
            owner: capture.captured.owner,
            at: capture.to,
            by: attacker,
        });
        self.events.push(MatchEvent::PawnMoved {
            pawn: attacker,
            from: capture.from,
            to: capture.to,
        });
        self.push_award(owner, ATTACK_REWARD);
        ActionResult::AttackSuccess
    }

    fn push_award(&mut self, player: PlayerId, points: u32) {
        let total = self.score(player).unwrap_or_default();
        self.events.push(MatchEvent::ScoreAwarded {
            player,
            points,
            total,
        });
    }

    /// Elimination sweep, then either the win transition or the turn hand-off.
    fn finish_action(&mut self) {
        let actor = self.current_player();
        let pre = self.roster.active().to_vec();

        for player in check_eliminations(&self.roster) {
            let removed = remove_faction(&mut self.board, &mut self.roster, player);
            self.events.push(MatchEvent::PlayerEliminated {
                player,
                pawns_removed: removed.len(),
            });
        }

        let post = self.roster.active().to_vec();
        self.current = next_turn_after(&pre, &post, actor);
        self.turn_number = self.turn_number.saturating_add(1);

        if let [winner] = post[..] {
            self.current = 0;
            self.phase = MatchPhase::MatchOver { winner };
            self.events.push(MatchEvent::MatchWon { winner });
            log::info!("{winner} wins after {} turns", self.turn_number - 1);
        } else {
            let next = self.current_player();
            self.events.push(MatchEvent::TurnPassed {
                from: actor,
                to: next,
            });
        }

        assert_invariants(self);
    }

    /// Player whose turn it is. After the match ends this is the winner.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.roster.active()[self.current]
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn cell(&self, row: i32, col: i32) -> Option<&Cell> {
        Coord::checked(row, col, self.board.size()).and_then(|coord| self.board.cell(coord))
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> Option<u32> {
        self.roster.player(player).map(|p| p.score)
    }

    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            MatchPhase::MatchOver { winner } => Some(winner),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::MatchOver { .. })
    }

    #[must_use]
    pub fn active_players(&self) -> &[PlayerId] {
        self.roster.active()
    }

    /// Every seat, eliminated ones included.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        self.roster.players()
    }

    /// Destinations for the selected pawn; empty when nothing is selected.
    #[must_use]
    pub fn legal_destinations_for_selection(&self) -> Vec<Coord> {
        self.selected()
            .map(|pawn| legal_destinations(&self.board, &self.roster, pawn))
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn selected(&self) -> Option<PawnId> {
        match self.phase {
            MatchPhase::Selected(pawn) => Some(pawn),
            _ => None,
        }
    }

    #[must_use]
    pub fn selected_pawn(&self) -> Option<&Pawn> {
        self.selected().and_then(|id| self.roster.pawn(id))
    }

    /// 1-based number of the turn being played.
    #[must_use]
    pub const fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.phase
    }

    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Events produced since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }
}

/// A match bound to the trivia gate that referees it.
#[derive(Debug, Clone)]
pub struct MatchSession<G> {
    state: MatchState,
    gate: G,
}

impl<G: TriviaGate> MatchSession<G> {
    #[must_use]
    pub const fn new(state: MatchState, gate: G) -> Self {
        Self { state, gate }
    }

    /// Build the match and bind it in one step.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is out of range.
    pub fn start(config: MatchConfig, gate: G) -> Result<Self, ConfigError> {
        MatchState::new_match(config).map(|state| Self::new(state, gate))
    }

    pub fn select(&mut self, row: i32, col: i32) -> bool {
        self.state.select(row, col)
    }

    pub fn target(&mut self, row: i32, col: i32) -> ActionResult {
        self.state.target(row, col, &mut self.gate)
    }

    pub fn click(&mut self, row: i32, col: i32) -> ClickOutcome {
        self.state.click(row, col, &mut self.gate)
    }

    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        self.state.drain_events()
    }

    #[must_use]
    pub const fn gate(&self) -> &G {
        &self.gate
    }

    pub const fn gate_mut(&mut self) -> &mut G {
        &mut self.gate
    }

    /// Consume the session, returning the state and gate.
    #[must_use]
    pub fn into_parts(self) -> (MatchState, G) {
        (self.state, self.gate)
    }
}
