use flagtrivia_game::{
    ActionResult, Answer, BankGate, Challenge, Coord, MatchConfig, MatchEvent, MatchPhase,
    MatchState, PawnId, PlayerId, Question, QuestionBank, ScriptedGate, TriviaGate,
    check_invariants, legal_destinations,
};

fn new_match(players: u8, size: u8) -> MatchState {
    let config = MatchConfig::default()
        .with_players(players)
        .with_board_size(size)
        .with_hole_count(0);
    MatchState::new_match(config).unwrap()
}

fn act(state: &mut MatchState, from: (i32, i32), to: (i32, i32), answers: &[bool]) -> ActionResult {
    assert!(state.select(from.0, from.1), "cannot select {from:?}");
    let mut gate = ScriptedGate::new(answers.iter().map(|a| Some(*a)));
    state.target(to.0, to.1, &mut gate)
}

fn at(coord: Coord) -> (i32, i32) {
    (i32::from(coord.row), i32::from(coord.col))
}

/// Burn the current player's turn with a failed move.
fn pass(state: &mut MatchState) {
    let player = state.current_player();
    let (from, to) = state
        .roster()
        .live_pawns_of(player)
        .find_map(|pawn| {
            legal_destinations(state.board(), state.roster(), pawn.id)
                .into_iter()
                .find(|dest| state.board().occupant_at(*dest).is_none())
                .map(|dest| (pawn.position, dest))
        })
        .unwrap();
    assert_eq!(act(state, at(from), at(to), &[false]), ActionResult::MoveFailure);
}

fn play_as(
    state: &mut MatchState,
    player: PlayerId,
    from: (i32, i32),
    to: (i32, i32),
    answers: &[bool],
) -> ActionResult {
    while state.current_player() != player {
        pass(state);
    }
    act(state, from, to, answers)
}

/// Two players on 8x8 with P1's pawn at (4,3) facing P2's pawn at (5,3), P1 to act.
fn duel_at_contact() -> MatchState {
    let mut state = new_match(2, 8);
    let p1 = PlayerId(0);
    let p2 = PlayerId(1);
    let script = [
        (p1, (2, 0), (3, 0)),
        (p2, (5, 7), (5, 6)),
        (p1, (3, 0), (4, 0)),
        (p2, (5, 6), (5, 5)),
        (p1, (4, 0), (4, 1)),
        (p2, (5, 5), (5, 4)),
        (p1, (4, 1), (4, 2)),
        (p2, (5, 4), (5, 3)),
        (p1, (4, 2), (4, 3)),
    ];
    for (player, from, to) in script {
        assert_eq!(play_as(&mut state, player, from, to, &[true]), ActionResult::MoveSuccess);
    }
    pass(&mut state);
    assert_eq!(state.current_player(), p1);
    state.drain_events();
    state
}

#[test]
fn successful_attack_captures_and_scores_five() {
    let mut state = duel_at_contact();
    let before = state.score(PlayerId(0)).unwrap();
    let attacker = state.cell(4, 3).and_then(|c| c.occupant).unwrap();
    let defender = state.cell(5, 3).and_then(|c| c.occupant).unwrap();

    assert_eq!(act(&mut state, (4, 3), (5, 3), &[true, true]), ActionResult::AttackSuccess);

    assert!(state.roster().pawn(defender).is_none());
    assert_eq!(state.cell(5, 3).and_then(|c| c.occupant), Some(attacker));
    assert_eq!(state.cell(4, 3).and_then(|c| c.occupant), None);
    assert_eq!(state.score(PlayerId(0)), Some(before + 5));
    assert_eq!(state.score(PlayerId(1)), Some(4));
    assert_eq!(state.current_player(), PlayerId(1));
    assert_eq!(state.roster().live_pawns_of(PlayerId(1)).count(), 5);

    let events = state.drain_events();
    assert!(events.contains(&MatchEvent::PawnCaptured {
        pawn: defender,
        owner: PlayerId(1),
        at: Coord::new(5, 3),
        by: attacker,
    }));
}

#[test]
fn second_wrong_answer_fails_the_attack() {
    let mut state = duel_at_contact();
    let before = state.score(PlayerId(0)).unwrap();
    state.select(4, 3);
    let mut gate = ScriptedGate::new([Some(true), Some(false)]);
    assert_eq!(state.target(5, 3, &mut gate), ActionResult::AttackFailure);
    assert_eq!(gate.requested().len(), 2);

    assert_eq!(state.cell(4, 3).and_then(|c| c.occupant), Some(PawnId(4)));
    assert_eq!(state.cell(5, 3).and_then(|c| c.occupant), Some(PawnId(10)));
    assert_eq!(state.score(PlayerId(0)), Some(before));
    assert_eq!(state.current_player(), PlayerId(1));
}

#[test]
fn first_wrong_answer_skips_the_second_question() {
    let mut state = duel_at_contact();
    state.select(4, 3);
    let mut gate = ScriptedGate::new([Some(false), Some(true)]);
    assert_eq!(state.target(5, 3, &mut gate), ActionResult::AttackFailure);
    assert_eq!(gate.requested().len(), 1);
    assert_eq!(gate.remaining(), 1);
}

#[test]
fn attack_category_comes_from_the_target_cell() {
    let mut state = duel_at_contact();
    state.select(4, 3);
    let mut gate = ScriptedGate::answering(false, 2);
    state.target(5, 3, &mut gate);
    // (5 + 3) % 6 == 2
    assert_eq!(gate.requested(), ["Music".to_string()]);
}

#[test]
fn flag_capture_removes_the_whole_faction_in_four_player_match() {
    let mut state = new_match(4, 12);
    let raider = PlayerId(2);
    let march = [(0, 9), (0, 8), (0, 7), (0, 6), (0, 5), (0, 4), (0, 3)];
    for step in march.windows(2) {
        assert_eq!(play_as(&mut state, raider, step[0], step[1], &[true]), ActionResult::MoveSuccess);
    }
    for (from, to) in [((0, 3), (0, 2)), ((0, 2), (0, 1))] {
        assert_eq!(play_as(&mut state, raider, from, to, &[true, true]), ActionResult::AttackSuccess);
    }
    assert_eq!(state.roster().live_pawns_of(PlayerId(0)).count(), 4);
    state.drain_events();

    assert_eq!(
        play_as(&mut state, raider, (0, 1), (0, 0), &[true, true]),
        ActionResult::AttackSuccess
    );

    assert_eq!(state.roster().live_pawns_of(PlayerId(0)).count(), 0);
    for cell in [(1, 0), (1, 1), (2, 0)] {
        assert_eq!(state.cell(cell.0, cell.1).and_then(|c| c.occupant), None);
    }
    assert_eq!(state.active_players(), [PlayerId(1), PlayerId(2), PlayerId(3)]);
    assert_eq!(state.current_player(), PlayerId(3));
    assert_eq!(state.current_index(), 2);
    assert!(!state.is_over());
    assert_eq!(state.score(PlayerId(2)), Some(6 + 3 * 5));

    let events = state.drain_events();
    assert!(events.contains(&MatchEvent::PlayerEliminated {
        player: PlayerId(0),
        pawns_removed: 3,
    }));
    assert!(events.contains(&MatchEvent::TurnPassed {
        from: PlayerId(2),
        to: PlayerId(3),
    }));
    assert!(check_invariants(&state).is_empty());

    // The eliminated seat is skipped from now on.
    pass(&mut state);
    assert_eq!(state.current_player(), PlayerId(1));
}

#[test]
fn last_flag_capture_ends_the_match() {
    let mut state = new_match(2, 6);
    let p1 = PlayerId(0);
    let route = [(2, 0), (3, 0), (4, 0), (5, 0), (5, 1), (5, 2)];
    for step in route.windows(2) {
        assert_eq!(play_as(&mut state, p1, step[0], step[1], &[true]), ActionResult::MoveSuccess);
    }
    for (from, to) in [((5, 2), (5, 3)), ((5, 3), (5, 4)), ((5, 4), (5, 5))] {
        assert_eq!(play_as(&mut state, p1, from, to, &[true, true]), ActionResult::AttackSuccess);
    }

    assert!(state.is_over());
    assert_eq!(state.winner(), Some(p1));
    assert_eq!(state.phase(), MatchPhase::MatchOver { winner: p1 });
    assert_eq!(state.active_players(), [p1]);
    assert_eq!(state.roster().live_pawns_of(PlayerId(1)).count(), 0);
    assert_eq!(state.score(p1), Some(5 + 3 * 5));
    assert!(state.events().contains(&MatchEvent::MatchWon { winner: p1 }));

    assert!(!state.select(5, 5));
    let mut gate = ScriptedGate::answering(true, 1);
    assert_eq!(state.target(4, 5, &mut gate), ActionResult::Invalid);
    assert_eq!(gate.remaining(), 1);
}

#[test]
fn hole_target_keeps_the_turn() {
    let (mut state, from, hole) = (0..64)
        .find_map(|seed| {
            let config = MatchConfig::default().with_hole_count(40).with_seed(seed);
            let state = MatchState::new_match(config).ok()?;
            let pair = state.roster().live_pawns_of(PlayerId(0)).find_map(|pawn| {
                pawn.position
                    .orthogonal_neighbors(state.board().size())
                    .into_iter()
                    .find(|c| state.board().is_hole(*c))
                    .map(|hole| (pawn.position, hole))
            })?;
            Some((state, pair.0, pair.1))
        })
        .unwrap();

    let mut gate = ScriptedGate::answering(true, 1);
    assert!(state.select(at(from).0, at(from).1));
    assert_eq!(state.target(at(hole).0, at(hole).1, &mut gate), ActionResult::Deselected);
    assert_eq!(state.current_player(), PlayerId(0));
    assert!(state.selected().is_none());
    assert_eq!(gate.remaining(), 1);
}

#[test]
fn empty_category_falls_back_to_another() {
    let sport = Question {
        category: "Sport".into(),
        prompt: "How many rings are on the Olympic flag?".into(),
        correct: "5".into(),
        distractors: ["4".into(), "6".into(), "7".into()],
    };
    let bank = QuestionBank::from_questions([sport]);
    let mut gate = BankGate::new(bank, 5, |c: &Challenge| Answer::Choice(c.correct_index()));

    let challenge = gate.draw("Art").unwrap();
    assert_eq!(challenge.category, "Sport");
    assert_eq!(gate.ask("Art"), Some(true));
}

#[test]
fn empty_bank_gate_fails_every_action() {
    let mut state = new_match(2, 8);
    let mut gate = BankGate::new(QuestionBank::default(), 5, |_: &Challenge| Answer::TimedOut);
    assert_eq!(gate.ask("Sport"), None);
    state.select(2, 0);
    assert_eq!(state.target(3, 0, &mut gate), ActionResult::MoveFailure);
    assert_eq!(gate.asked(), 0);
    assert_eq!(state.current_player(), PlayerId(1));
}
