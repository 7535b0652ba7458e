//! Two-phase number quiz
//!
//! Parity questions first, then primality. A phase advances once its
//! correct-answer count reaches its threshold. The check runs right after a
//! correct answer and again whenever a new question is requested, so a
//! finishing answer ends the phase in the same frame.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::QuizTuning;

/// Quiz phase, strictly forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionPhase {
    Parity,
    Prime,
    Done,
}

/// Answer buttons left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerButton {
    /// "Odd" in the parity phase, "Yes" in the prime phase
    First,
    /// "Even" in the parity phase, "No" in the prime phase
    Second,
    /// Legacy "Prime" button
    Third,
}

impl AnswerButton {
    pub const ALL: [AnswerButton; 3] = [Self::First, Self::Second, Self::Third];

    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }
}

/// A drawn number and the phase that asked it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub phase: QuestionPhase,
}

/// Per-phase counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub asked: u32,
    pub correct: u32,
    pub required: u32,
}

impl PhaseProgress {
    fn new(required: u32) -> Self {
        Self {
            required,
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.correct >= self.required
    }
}

/// Outcome of pressing an answer button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerResult {
    /// Input disabled, no question, or the button is not active this phase
    Ignored,
    /// Right answer; `advanced_to` is set when this answer completed the phase
    Correct {
        number: u32,
        advanced_to: Option<QuestionPhase>,
    },
    /// Wrong answer; the question stays up
    Wrong { number: u32 },
}

/// Primality by trial division over odd divisors up to the integer square root
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n.is_multiple_of(2) {
        return false;
    }
    let limit = n.isqrt();
    let mut d = 3;
    while d <= limit {
        if n.is_multiple_of(d) {
            return false;
        }
        d += 2;
    }
    true
}

/// Expected truth of `button` for `number`, `None` when the button is inactive
pub fn expected_answer(
    button: AnswerButton,
    number: u32,
    phase: QuestionPhase,
    legacy_prime_button: bool,
) -> Option<bool> {
    match (phase, button) {
        (QuestionPhase::Parity, AnswerButton::First) => Some(!number.is_multiple_of(2)),
        (QuestionPhase::Parity, AnswerButton::Second) => Some(number.is_multiple_of(2)),
        (QuestionPhase::Parity, AnswerButton::Third) if legacy_prime_button => {
            Some(is_prime(number))
        }
        (QuestionPhase::Prime, AnswerButton::First) => Some(is_prime(number)),
        (QuestionPhase::Prime, AnswerButton::Second) => Some(!is_prime(number)),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Quiz {
    phase: QuestionPhase,
    parity: PhaseProgress,
    prime: PhaseProgress,
    current: Option<Question>,
    accepting: bool,
    min_number: u32,
    max_number: u32,
    legacy_prime_button: bool,
    rng: Pcg32,
}

impl Quiz {
    pub fn new(tuning: &QuizTuning, seed: u64) -> Self {
        Self {
            phase: QuestionPhase::Parity,
            parity: PhaseProgress::new(tuning.parity_correct_required),
            prime: PhaseProgress::new(tuning.prime_correct_required),
            current: None,
            accepting: false,
            min_number: tuning.min_number,
            max_number: tuning.max_number,
            legacy_prime_button: tuning.legacy_prime_button,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> QuestionPhase {
        self.phase
    }

    pub fn current(&self) -> Option<Question> {
        self.current
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn progress(&self, phase: QuestionPhase) -> Option<&PhaseProgress> {
        match phase {
            QuestionPhase::Parity => Some(&self.parity),
            QuestionPhase::Prime => Some(&self.prime),
            QuestionPhase::Done => None,
        }
    }

    fn progress_mut(&mut self) -> Option<&mut PhaseProgress> {
        match self.phase {
            QuestionPhase::Parity => Some(&mut self.parity),
            QuestionPhase::Prime => Some(&mut self.prime),
            QuestionPhase::Done => None,
        }
    }

    /// Move past every phase whose threshold is met. Returns true if the phase changed.
    pub fn advance_if_complete(&mut self) -> bool {
        let before = self.phase;
        loop {
            let next = match self.phase {
                QuestionPhase::Parity if self.parity.is_complete() => QuestionPhase::Prime,
                QuestionPhase::Prime if self.prime.is_complete() => QuestionPhase::Done,
                _ => break,
            };
            log::info!("Quiz phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
        self.phase != before
    }

    /// Draw the next number. `None` once the quiz is done.
    pub fn next_question(&mut self) -> Option<Question> {
        self.advance_if_complete();
        let phase = self.phase;
        if phase == QuestionPhase::Done {
            self.current = None;
            self.accepting = false;
            return None;
        }
        let number = self.rng.random_range(self.min_number..=self.max_number);
        if let Some(progress) = self.progress_mut() {
            progress.asked += 1;
        }

        let question = Question { number, phase };
        self.current = Some(question);
        self.accepting = true;
        log::debug!("Question {:?}", question);
        Some(question)
    }

    pub fn answer(&mut self, button: AnswerButton) -> AnswerResult {
        if !self.accepting {
            return AnswerResult::Ignored;
        }
        let Some(question) = self.current else {
            return AnswerResult::Ignored;
        };
        let Some(expected) =
            expected_answer(button, question.number, self.phase, self.legacy_prime_button)
        else {
            return AnswerResult::Ignored;
        };

        if !expected {
            log::info!("Answer wrong (num={})", question.number);
            return AnswerResult::Wrong {
                number: question.number,
            };
        }

        log::info!("Answer right (num={})", question.number);
        self.accepting = false;
        if let Some(progress) = self.progress_mut() {
            progress.correct += 1;
        }
        let advanced_to = self.advance_if_complete().then_some(self.phase);
        AnswerResult::Correct {
            number: question.number,
            advanced_to,
        }
    }

    /// The button that answers the current question correctly
    pub fn correct_button(&self) -> Option<AnswerButton> {
        let question = self.current?;
        [AnswerButton::First, AnswerButton::Second]
            .into_iter()
            .find(|&b| {
                expected_answer(b, question.number, self.phase, self.legacy_prime_button)
                    == Some(true)
            })
    }

    /// An active button that answers the current question wrongly
    pub fn wrong_button(&self) -> Option<AnswerButton> {
        let question = self.current?;
        [AnswerButton::First, AnswerButton::Second]
            .into_iter()
            .find(|&b| {
                expected_answer(b, question.number, self.phase, self.legacy_prime_button)
                    == Some(false)
            })
    }

    /// Stop accepting answers for good
    pub fn disable(&mut self) {
        self.accepting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tuning(parity: u32, prime: u32) -> QuizTuning {
        QuizTuning {
            parity_correct_required: parity,
            prime_correct_required: prime,
            ..Default::default()
        }
    }

    fn answer_correctly(quiz: &mut Quiz) -> AnswerResult {
        let button = quiz.correct_button().unwrap();
        quiz.answer(button)
    }

    #[test]
    fn test_is_prime_known_values() {
        let inputs = [1, 2, 3, 4, 9, 17, 100];
        let expected = [false, true, true, false, false, true, false];
        for (n, want) in inputs.iter().zip(expected) {
            assert_eq!(is_prime(*n), want, "is_prime({n})");
        }
        assert!(!is_prime(0));
        assert!(is_prime(97));
        assert!(!is_prime(91));
    }

    #[test]
    fn test_parity_scoring() {
        assert_eq!(
            expected_answer(AnswerButton::First, 7, QuestionPhase::Parity, false),
            Some(true)
        );
        assert_eq!(
            expected_answer(AnswerButton::Second, 7, QuestionPhase::Parity, false),
            Some(false)
        );
        assert_eq!(
            expected_answer(AnswerButton::Third, 7, QuestionPhase::Parity, false),
            None
        );
        assert_eq!(
            expected_answer(AnswerButton::Third, 7, QuestionPhase::Parity, true),
            Some(true)
        );
    }

    #[test]
    fn test_prime_scoring_yes_no() {
        assert_eq!(
            expected_answer(AnswerButton::First, 9, QuestionPhase::Prime, false),
            Some(false)
        );
        assert_eq!(
            expected_answer(AnswerButton::Second, 9, QuestionPhase::Prime, false),
            Some(true)
        );
        assert_eq!(
            expected_answer(AnswerButton::Third, 9, QuestionPhase::Prime, true),
            None
        );
    }

    #[test]
    fn test_no_answers_before_first_question() {
        let mut quiz = Quiz::new(&tuning(2, 2), 1);
        assert_eq!(quiz.answer(AnswerButton::First), AnswerResult::Ignored);
    }

    #[test]
    fn test_wrong_answer_keeps_question_and_input() {
        let mut quiz = Quiz::new(&tuning(2, 2), 7);
        let q = quiz.next_question().unwrap();
        let wrong = quiz.wrong_button().unwrap();
        assert_eq!(quiz.answer(wrong), AnswerResult::Wrong { number: q.number });
        assert!(quiz.is_accepting());
        assert_eq!(quiz.current(), Some(q));
        assert_eq!(quiz.progress(QuestionPhase::Parity).unwrap().asked, 1);
        assert_eq!(quiz.progress(QuestionPhase::Parity).unwrap().correct, 0);
    }

    #[test]
    fn test_correct_answer_disables_until_next_draw() {
        let mut quiz = Quiz::new(&tuning(3, 2), 7);
        quiz.next_question();
        assert!(matches!(answer_correctly(&mut quiz), AnswerResult::Correct { .. }));
        assert!(!quiz.is_accepting());
        assert_eq!(quiz.answer(AnswerButton::First), AnswerResult::Ignored);
        quiz.next_question();
        assert!(quiz.is_accepting());
    }

    #[test]
    fn test_phase_transitions_at_thresholds() {
        let mut quiz = Quiz::new(&tuning(3, 2), 42);
        for i in 0..3 {
            let q = quiz.next_question().unwrap();
            assert_eq!(q.phase, QuestionPhase::Parity);
            let result = answer_correctly(&mut quiz);
            let expect_advance = if i == 2 {
                Some(QuestionPhase::Prime)
            } else {
                None
            };
            assert!(matches!(
                result,
                AnswerResult::Correct { advanced_to, .. } if advanced_to == expect_advance
            ));
        }
        let q = quiz.next_question().unwrap();
        assert_eq!(q.phase, QuestionPhase::Prime);
        answer_correctly(&mut quiz);
        quiz.next_question();
        let result = answer_correctly(&mut quiz);
        assert!(matches!(
            result,
            AnswerResult::Correct {
                advanced_to: Some(QuestionPhase::Done),
                ..
            }
        ));
        assert_eq!(quiz.phase(), QuestionPhase::Done);
        assert_eq!(quiz.next_question(), None);
    }

    #[test]
    fn test_same_seed_same_questions() {
        let mut a = Quiz::new(&tuning(5, 5), 99);
        let mut b = Quiz::new(&tuning(5, 5), 99);
        for _ in 0..10 {
            assert_eq!(a.next_question(), b.next_question());
        }
    }

    proptest! {
        #[test]
        fn prop_is_prime_matches_naive(n in 0u32..5000) {
            let naive = n >= 2 && (2..n).all(|d| n % d != 0);
            prop_assert_eq!(is_prime(n), naive);
        }

        #[test]
        fn prop_questions_stay_in_range(seed in any::<u64>(), min in 0u32..50, span in 0u32..50) {
            let t = QuizTuning { min_number: min, max_number: min + span, ..Default::default() };
            let mut quiz = Quiz::new(&t, seed);
            for _ in 0..20 {
                let q = quiz.next_question().unwrap();
                prop_assert!(q.number >= min && q.number <= min + span);
            }
        }
    }
}
