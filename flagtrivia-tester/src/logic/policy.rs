use std::fmt;

use flagtrivia_game::{
    Answer, Challenge, Coord, MatchState, PawnId, PlayerId, Responder, TargetKind,
    classify_target, legal_destinations,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// How simulated players answer trivia challenges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnswerPolicy {
    Perfect,
    /// Correct with the given probability.
    Accuracy(f64),
    AlwaysWrong,
    /// Lets every timer run out.
    TimesOut,
}

impl AnswerPolicy {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Perfect => "Perfect".to_string(),
            Self::Accuracy(p) => format!("Accuracy {:.0}%", p * 100.0),
            Self::AlwaysWrong => "Always Wrong".to_string(),
            Self::TimesOut => "Times Out".to_string(),
        }
    }

    #[must_use]
    pub fn responder(self, seed: u64) -> PolicyResponder {
        PolicyResponder {
            policy: self,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl fmt::Display for AnswerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// [`Responder`] driven by an [`AnswerPolicy`].
#[derive(Debug, Clone)]
pub struct PolicyResponder {
    policy: AnswerPolicy,
    rng: ChaCha20Rng,
}

impl Responder for PolicyResponder {
    fn respond(&mut self, challenge: &Challenge) -> Answer {
        let correct = challenge.correct_index();
        let wrong = (correct + 1) % challenge.options.len().max(1);
        match self.policy {
            AnswerPolicy::Perfect => Answer::Choice(correct),
            AnswerPolicy::Accuracy(p) => {
                if self.rng.gen_bool(p.clamp(0.0, 1.0)) {
                    Answer::Choice(correct)
                } else {
                    Answer::Choice(wrong)
                }
            }
            AnswerPolicy::AlwaysWrong => Answer::Choice(wrong),
            AnswerPolicy::TimesOut => Answer::TimedOut,
        }
    }
}

/// One select-then-target step chosen by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAction {
    pub pawn: PawnId,
    pub from: Coord,
    pub to: Coord,
    pub kind: TargetKind,
    /// Whether `to` holds an enemy flag.
    pub hits_flag: bool,
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose the next action for the current player, or `None` if stuck.
    fn pick_action(&mut self, state: &MatchState) -> Option<PlannedAction>;
}

/// Built-in move strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovePolicy {
    /// Attacks first (flags before pawns), otherwise advances on the nearest enemy flag.
    Aggressive,
    /// Moves whenever possible and keeps the flag at home.
    Cautious,
    Random,
}

impl MovePolicy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aggressive => "Aggressive",
            Self::Cautious => "Cautious",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Aggressive => Box::new(AggressivePolicy),
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Random => Box::new(RandomPolicy {
                rng: ChaCha20Rng::seed_from_u64(seed),
            }),
        }
    }
}

impl fmt::Display for MovePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every move or attack available to the current player.
#[must_use]
pub fn candidate_actions(state: &MatchState) -> Vec<PlannedAction> {
    let board = state.board();
    let roster = state.roster();
    roster
        .live_pawns_of(state.current_player())
        .flat_map(|pawn| {
            legal_destinations(board, roster, pawn.id)
                .into_iter()
                .map(move |to| PlannedAction {
                    pawn: pawn.id,
                    from: pawn.position,
                    to,
                    kind: classify_target(board, roster, pawn.id, to),
                    hits_flag: board
                        .occupant_at(to)
                        .and_then(|id| roster.pawn(id))
                        .is_some_and(|target| target.is_flag),
                })
        })
        .collect()
}

fn enemy_flags(state: &MatchState, player: PlayerId) -> Vec<Coord> {
    state
        .roster()
        .pawns()
        .filter(|pawn| pawn.is_flag && pawn.owner != player)
        .map(|pawn| pawn.position)
        .collect()
}

fn distance_to_nearest(coord: Coord, targets: &[Coord]) -> u16 {
    targets
        .iter()
        .map(|target| coord.manhattan(*target))
        .min()
        .unwrap_or(u16::MAX)
}

struct AggressivePolicy;
struct CautiousPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl PlayerPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "Aggressive"
    }

    fn pick_action(&mut self, state: &MatchState) -> Option<PlannedAction> {
        let candidates = candidate_actions(state);
        if let Some(flag_hit) = candidates.iter().find(|a| a.hits_flag) {
            return Some(*flag_hit);
        }
        if let Some(attack) = candidates.iter().find(|a| a.kind == TargetKind::Attack) {
            return Some(*attack);
        }
        let flags = enemy_flags(state, state.current_player());
        candidates
            .into_iter()
            .min_by_key(|a| distance_to_nearest(a.to, &flags))
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn pick_action(&mut self, state: &MatchState) -> Option<PlannedAction> {
        let candidates = candidate_actions(state);
        let is_flag = |action: &PlannedAction| {
            state
                .roster()
                .pawn(action.pawn)
                .is_some_and(|pawn| pawn.is_flag)
        };
        let flags = enemy_flags(state, state.current_player());
        candidates
            .iter()
            .filter(|a| a.kind == TargetKind::MoveEmpty && !is_flag(a))
            .min_by_key(|a| distance_to_nearest(a.to, &flags))
            .or_else(|| candidates.iter().find(|a| a.kind == TargetKind::MoveEmpty))
            .or_else(|| candidates.first())
            .copied()
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_action(&mut self, state: &MatchState) -> Option<PlannedAction> {
        let candidates = candidate_actions(state);
        if candidates.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..candidates.len());
        candidates.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagtrivia_game::{MatchConfig, ScriptedGate};

    fn duel() -> MatchState {
        MatchState::new_match(MatchConfig::default().with_hole_count(0)).unwrap()
    }

    fn challenge() -> Challenge {
        let bank = flagtrivia_game::QuestionBank::from_csv("Sport,Q?,A,B,C,D\n");
        let mut gate = flagtrivia_game::BankGate::new(bank, 1, |_: &Challenge| Answer::TimedOut);
        gate.draw("Sport").unwrap()
    }

    #[test]
    fn answer_policies_grade_as_advertised() {
        let challenge = challenge();
        let mut perfect = AnswerPolicy::Perfect.responder(1);
        let mut wrong = AnswerPolicy::AlwaysWrong.responder(1);
        let mut timeout = AnswerPolicy::TimesOut.responder(1);
        assert!(challenge.grade(perfect.respond(&challenge)));
        assert!(!challenge.grade(wrong.respond(&challenge)));
        assert_eq!(timeout.respond(&challenge), Answer::TimedOut);
    }

    #[test]
    fn accuracy_extremes_match_perfect_and_wrong() {
        let challenge = challenge();
        let mut always = AnswerPolicy::Accuracy(1.0).responder(9);
        let mut never = AnswerPolicy::Accuracy(0.0).responder(9);
        for _ in 0..20 {
            assert!(challenge.grade(always.respond(&challenge)));
            assert!(!challenge.grade(never.respond(&challenge)));
        }
    }

    #[test]
    fn labels_are_readable() {
        assert_eq!(AnswerPolicy::Accuracy(0.75).label(), "Accuracy 75%");
        assert_eq!(MovePolicy::Cautious.to_string(), "Cautious");
    }

    #[test]
    fn candidates_cover_the_opening_frontier() {
        let state = duel();
        let candidates = candidate_actions(&state);
        assert_eq!(candidates.len(), 6);
        assert!(candidates.iter().all(|a| a.kind == TargetKind::MoveEmpty));
    }

    #[test]
    fn aggressive_heads_for_the_enemy_flag() {
        let state = duel();
        let mut policy = MovePolicy::Aggressive.create_policy(0);
        let action = policy.pick_action(&state).unwrap();
        assert_eq!(action.kind, TargetKind::MoveEmpty);
        let before = action.from.manhattan(Coord::new(7, 7));
        assert_eq!(action.to.manhattan(Coord::new(7, 7)), before - 1);
    }

    #[test]
    fn cautious_never_moves_the_flag_while_others_can() {
        let mut state = duel();
        let mut policy = MovePolicy::Cautious.create_policy(0);
        let mut gate = ScriptedGate::answering(true, 40);
        for _ in 0..20 {
            let action = policy.pick_action(&state).unwrap();
            assert!(!state.roster().pawn(action.pawn).unwrap().is_flag);
            state.select(i32::from(action.from.row), i32::from(action.from.col));
            state.target(i32::from(action.to.row), i32::from(action.to.col), &mut gate);
        }
    }

    #[test]
    fn random_policy_is_seeded() {
        let state = duel();
        let mut a = MovePolicy::Random.create_policy(4);
        let mut b = MovePolicy::Random.create_policy(4);
        for _ in 0..5 {
            assert_eq!(a.pick_action(&state), b.pick_action(&state));
        }
    }
}
