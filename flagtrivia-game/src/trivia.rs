//! Trivia gate: the collaborator whose answers decide moves and captures.
use std::collections::VecDeque;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TIME_LIMIT_SECS;
use crate::questions::QuestionBank;

/// Poses one question for a category.
///
/// `Some(true)` means answered correctly, `Some(false)` wrong or timed out,
/// and `None` that no question exists at all. The engine treats `None` as a
/// failed answer.
pub trait TriviaGate {
    fn ask(&mut self, category: &str) -> Option<bool>;
}

impl<G: TriviaGate + ?Sized> TriviaGate for &mut G {
    fn ask(&mut self, category: &str) -> Option<bool> {
        (**self).ask(category)
    }
}

impl<G: TriviaGate + ?Sized> TriviaGate for Box<G> {
    fn ask(&mut self, category: &str) -> Option<bool> {
        (**self).ask(category)
    }
}

/// A question as presented to whoever answers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Category of the question actually drawn (may differ after fallback).
    pub category: String,
    pub prompt: String,
    /// Correct answer plus distractors, shuffled.
    pub options: Vec<String>,
    correct_index: usize,
    pub time_limit_secs: u16,
}

impl Challenge {
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    #[must_use]
    pub const fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn grade(&self, answer: Answer) -> bool {
        match answer {
            Answer::Choice(index) => self.is_correct(index),
            Answer::TimedOut => false,
        }
    }
}

/// What a responder did with a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Choice(usize),
    /// The answer timer ran out; graded exactly like a wrong answer.
    TimedOut,
}

/// Answers challenges: a human behind a UI, a scripted policy, a test.
pub trait Responder {
    fn respond(&mut self, challenge: &Challenge) -> Answer;
}

impl<F: FnMut(&Challenge) -> Answer> Responder for F {
    fn respond(&mut self, challenge: &Challenge) -> Answer {
        self(challenge)
    }
}

/// Gate backed by a [`QuestionBank`] and a seeded RNG.
#[derive(Debug, Clone)]
pub struct BankGate<R> {
    bank: QuestionBank,
    rng: ChaCha20Rng,
    time_limit_secs: u16,
    responder: R,
    asked: u32,
}

impl<R: Responder> BankGate<R> {
    #[must_use]
    pub fn new(bank: QuestionBank, seed: u64, responder: R) -> Self {
        if bank.is_empty() {
            log::warn!("question bank is empty; every challenge will fail");
        }
        Self {
            bank,
            rng: ChaCha20Rng::seed_from_u64(seed),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            responder,
            asked: 0,
        }
    }

    #[must_use]
    pub fn with_time_limit(mut self, secs: u16) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Draw a question and shuffle its options without asking it.
    pub fn draw(&mut self, category: &str) -> Option<Challenge> {
        let question = self.bank.pick_from(category, &mut self.rng)?;
        let mut options = Vec::with_capacity(4);
        options.push(question.correct.clone());
        options.extend(question.distractors.iter().cloned());
        let mut order: Vec<usize> = (0..options.len()).collect();
        order.shuffle(&mut self.rng);
        let correct_index = order.iter().position(|&idx| idx == 0).unwrap_or(0);
        let options = order.into_iter().map(|idx| options[idx].clone()).collect();
        Some(Challenge {
            category: question.category.clone(),
            prompt: question.prompt.clone(),
            options,
            correct_index,
            time_limit_secs: self.time_limit_secs,
        })
    }

    #[must_use]
    pub const fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub const fn responder(&self) -> &R {
        &self.responder
    }

    pub const fn responder_mut(&mut self) -> &mut R {
        &mut self.responder
    }

    /// Challenges actually posed so far.
    #[must_use]
    pub const fn asked(&self) -> u32 {
        self.asked
    }
}

impl<R: Responder> TriviaGate for BankGate<R> {
    fn ask(&mut self, category: &str) -> Option<bool> {
        let challenge = self.draw(category)?;
        self.asked += 1;
        let answer = self.responder.respond(&challenge);
        let correct = challenge.grade(answer);
        log::debug!(
            "challenge [{}] asked for {category}: {answer:?} -> {}",
            challenge.category,
            if correct { "correct" } else { "wrong" }
        );
        Some(correct)
    }
}

/// Replays a fixed sequence of gate results.
///
/// Once the script runs dry every further call returns `None`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGate {
    script: VecDeque<Option<bool>>,
    requested: Vec<String>,
}

impl ScriptedGate {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            requested: Vec::new(),
        }
    }

    /// Gate answering every question with the same boolean.
    #[must_use]
    pub fn answering(correct: bool, count: usize) -> Self {
        Self::new(std::iter::repeat_n(Some(correct), count))
    }

    pub fn push(&mut self, result: Option<bool>) {
        self.script.push_back(result);
    }

    /// Categories requested so far, in order.
    #[must_use]
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TriviaGate for ScriptedGate {
    fn ask(&mut self, category: &str) -> Option<bool> {
        self.requested.push(category.to_string());
        self.script.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::from_csv(
            "Sport,How many rings on the Olympic flag?,5,4,6,7\n\
             Sport,Length of a marathon in km?,42.195,40,21.1,50\n",
        )
    }

    fn pick_correct(challenge: &Challenge) -> Answer {
        Answer::Choice(challenge.correct_index())
    }

    #[test]
    fn correct_choice_passes_and_wrong_fails() {
        let mut gate = BankGate::new(bank(), 1, pick_correct);
        assert_eq!(gate.ask("Sport"), Some(true));

        let mut wrong = BankGate::new(bank(), 1, |c: &Challenge| {
            Answer::Choice((c.correct_index() + 1) % c.options.len())
        });
        assert_eq!(wrong.ask("Sport"), Some(false));
        assert_eq!(wrong.asked(), 1);
    }

    #[test]
    fn timeout_counts_as_wrong() {
        let mut gate = BankGate::new(bank(), 2, |_: &Challenge| Answer::TimedOut);
        assert_eq!(gate.ask("Sport"), Some(false));
    }

    #[test]
    fn missing_category_falls_back() {
        let mut gate = BankGate::new(bank(), 3, pick_correct);
        let challenge = gate.draw("Art").unwrap();
        assert_eq!(challenge.category, "Sport");
        assert_eq!(gate.ask("Art"), Some(true));
    }

    #[test]
    fn empty_bank_returns_none_without_asking() {
        let mut gate = BankGate::new(QuestionBank::default(), 4, pick_correct);
        assert_eq!(gate.ask("Sport"), None);
        assert_eq!(gate.asked(), 0);
    }

    #[test]
    fn options_contain_every_answer_once() {
        let mut gate = BankGate::new(bank(), 5, pick_correct).with_time_limit(45);
        let challenge = gate.draw("Sport").unwrap();
        assert_eq!(challenge.options.len(), 4);
        assert_eq!(challenge.time_limit_secs, 45);
        let question = gate
            .bank()
            .questions_in("Sport")
            .iter()
            .find(|q| q.prompt == challenge.prompt)
            .unwrap();
        assert_eq!(challenge.options[challenge.correct_index()], question.correct);
        for distractor in &question.distractors {
            assert!(challenge.options.contains(distractor));
        }
    }

    #[test]
    fn scripted_gate_replays_then_runs_dry() {
        let mut gate = ScriptedGate::new([Some(true), Some(false)]);
        assert_eq!(gate.ask("Art"), Some(true));
        assert_eq!(gate.ask("Music"), Some(false));
        assert_eq!(gate.ask("Sport"), None);
        assert_eq!(gate.requested(), &["Art", "Music", "Sport"]);
    }
}
