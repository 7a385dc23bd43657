use std::ops::RangeInclusive;

use crate::model::Question;

/// Points awarded per correct answer.
pub const POINTS_PER_CORRECT: u32 = 20;
/// Best possible score of a quiz.
pub const MAX_SCORE: u32 = 100;

/// Score a quiz from its questions and the recorded answers.
///
/// Each answer matching the question's correct index earns
/// `POINTS_PER_CORRECT`; missing answers earn nothing. The result is capped at
/// `MAX_SCORE`. Pure: the same inputs always give the same score.
#[must_use]
pub fn calculate_score(questions: &[Question], answers: &[Option<usize>]) -> u32 {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, question)| question.is_correct(answers.get(*i).copied().flatten()))
        .count();
    let correct = u32::try_from(correct).unwrap_or(u32::MAX);
    correct.saturating_mul(POINTS_PER_CORRECT).min(MAX_SCORE)
}

/// Classification of a score under a `ScorePolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub score: u32,
    pub percent: u32,
    pub passed: bool,
    pub perfect: bool,
}

/// Pass and perfect thresholds, in percent.
///
/// The deployed site disagrees with itself here: the results screen treats
/// only 100 as perfect while the score history marks 69 as perfect too, and
/// both use a pass band that leaves 70–79 failing. The default mirrors the
/// results screen; `history_view` mirrors the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePolicy {
    pass_bands: Vec<RangeInclusive<u32>>,
    perfect_scores: Vec<u32>,
}

impl ScorePolicy {
    #[must_use]
    pub fn new(pass_bands: Vec<RangeInclusive<u32>>, perfect_scores: Vec<u32>) -> Self {
        Self {
            pass_bands,
            perfect_scores,
        }
    }

    /// Thresholds used by the score history listing.
    #[must_use]
    pub fn history_view() -> Self {
        Self::new(vec![48..=69, 80..=100], vec![69, 100])
    }

    /// A single pass mark with 100 as the only perfect score.
    #[must_use]
    pub fn pass_mark(min_percent: u32) -> Self {
        Self::new(vec![min_percent..=100], vec![100])
    }

    #[must_use]
    pub fn classify(&self, score: u32) -> ScoreOutcome {
        let percent = score.min(MAX_SCORE) * 100 / MAX_SCORE;
        ScoreOutcome {
            score,
            percent,
            passed: self.pass_bands.iter().any(|band| band.contains(&percent)),
            perfect: self.perfect_scores.contains(&score),
        }
    }
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self::new(vec![48..=69, 80..=100], vec![100])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizId;

    fn question(correct: usize) -> Question {
        Question::new(
            QuizId::new(1),
            "Q",
            vec!["a".into(), "b".into()],
            correct,
            "",
        )
    }

    #[test]
    fn scores_matching_answers() {
        let questions = vec![question(1), question(0)];
        assert_eq!(calculate_score(&questions, &[Some(1), Some(0)]), 40);
        assert_eq!(calculate_score(&questions, &[Some(0), Some(1)]), 0);
    }

    #[test]
    fn missing_answers_score_nothing() {
        let questions = vec![question(0), question(0), question(1)];
        assert_eq!(calculate_score(&questions, &[Some(0)]), 20);
        assert_eq!(calculate_score(&questions, &[None, Some(0), None]), 20);
        assert_eq!(calculate_score(&questions, &[]), 0);
    }

    #[test]
    fn score_is_pure_and_bounded() {
        let questions: Vec<_> = (0..7).map(|i| question(i % 2)).collect();
        let answers: Vec<_> = (0..7).map(|i| Some(i % 2)).collect();
        let first = calculate_score(&questions, &answers);
        assert_eq!(first, calculate_score(&questions, &answers));
        assert_eq!(first, MAX_SCORE);

        for correct in 0..=5 {
            let answers: Vec<_> = (0..5)
                .map(|i| if i < correct { Some(0) } else { Some(1) })
                .collect();
            let qs: Vec<_> = (0..5).map(|_| question(0)).collect();
            let score = calculate_score(&qs, &answers);
            assert!([0, 20, 40, 60, 80, 100].contains(&score));
        }
    }

    #[test]
    fn default_policy_bands() {
        let policy = ScorePolicy::default();
        assert!(!policy.classify(40).passed);
        assert!(policy.classify(60).passed);
        assert!(!policy.classify(70).passed);
        assert!(policy.classify(80).passed);
        assert!(policy.classify(100).perfect);
        assert!(!policy.classify(80).perfect);
    }

    #[test]
    fn history_policy_counts_69_as_perfect() {
        let policy = ScorePolicy::history_view();
        assert!(policy.classify(69).perfect);
        assert!(!ScorePolicy::default().classify(69).perfect);
    }

    #[test]
    fn pass_mark_policy() {
        let policy = ScorePolicy::pass_mark(60);
        assert!(policy.classify(60).passed);
        assert!(policy.classify(80).passed);
        assert!(!policy.classify(40).passed);
    }
}
