//! View models handed to a front end. They carry no markup.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Question, Slide};
use crate::scoring::ScoreOutcome;
use crate::time::{format_published_date, DayZone};

/// Position marker string, e.g. `[->---]` for the second of five.
#[must_use]
pub fn progress_bar(total: usize, index: usize) -> String {
    let marks: String = (0..total)
        .map(|i| if i == index { '>' } else { '-' })
        .collect();
    format!("[{marks}]")
}

//
// ─── SLIDES ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideReference {
    pub description: String,
    pub link: String,
    pub source: String,
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideView {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub sections: Vec<String>,
    pub reference: Option<SlideReference>,
    pub progress: String,
    pub has_previous: bool,
    /// Advancing from the last slide starts the quiz.
    pub is_last: bool,
    pub show_welcome: bool,
}

impl SlideView {
    /// Build the view of `slides[index]`, or `None` if out of range.
    #[must_use]
    pub fn build(
        slides: &[Slide],
        index: usize,
        welcome_dismissed: bool,
        zone: DayZone,
    ) -> Option<Self> {
        let slide = slides.get(index)?;
        let reference = slide.headline.as_ref().map(|headline| SlideReference {
            description: headline.description.clone(),
            link: headline.link.clone(),
            source: headline.source.clone(),
            published: format_published_date(headline.published_date.as_deref(), zone),
        });
        Some(Self {
            index,
            total: slides.len(),
            title: slide.title.clone(),
            sections: slide.sections(),
            reference,
            progress: progress_bar(slides.len(), index),
            has_previous: index > 0,
            is_last: index + 1 == slides.len(),
            show_welcome: index == 0 && !welcome_dismissed,
        })
    }
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// An option as displayed, remembering where it sits in the served order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedOption {
    pub label: char,
    pub text: String,
    pub original_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<DisplayedOption>,
    pub progress: String,
}

impl QuestionView {
    /// Build the view of `questions[index]` with options in shuffled order.
    ///
    /// Option text is cleaned of `A) ` style prefixes and blank options are
    /// dropped. True/false questions read `True`/`False` and lose their
    /// `(True/False)` suffix. Labels follow display order.
    pub fn arrange<R: Rng + ?Sized>(
        questions: &[Question],
        index: usize,
        rng: &mut R,
    ) -> Option<Self> {
        let question = questions.get(index)?;
        let cleaned: Vec<String> = question.options.iter().map(|o| clean_option(o)).collect();
        let true_false = is_true_false(&question.question, &cleaned);

        let mut options: Vec<(usize, String)> = cleaned
            .into_iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(i, text)| {
                let text = if true_false { title_case_boolean(&text) } else { text };
                (i, text)
            })
            .collect();
        options.shuffle(rng);

        let options = options
            .into_iter()
            .zip('A'..='Z')
            .map(|((original_index, text), label)| DisplayedOption {
                label,
                text,
                original_index,
            })
            .collect();

        let prompt = if true_false {
            strip_true_false_suffix(&question.question)
        } else {
            question.question.trim().to_string()
        };

        Some(Self {
            index,
            total: questions.len(),
            prompt,
            options,
            progress: progress_bar(questions.len(), index),
        })
    }

    /// Question number as shown to people (1-based).
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Look up a displayed option by its label, case-insensitively.
    #[must_use]
    pub fn option_by_label(&self, label: char) -> Option<&DisplayedOption> {
        let label = label.to_ascii_uppercase();
        self.options.iter().find(|option| option.label == label)
    }

    /// Look up a displayed option by its exact text.
    #[must_use]
    pub fn option_by_text(&self, text: &str) -> Option<&DisplayedOption> {
        self.options.iter().find(|option| option.text == text)
    }
}

/// Strip a leading `A) `..`D) ` marker and surrounding whitespace.
#[must_use]
pub fn clean_option(raw: &str) -> String {
    let trimmed = raw.trim_start();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some('A'..='D'), Some(')')) => chars.as_str().trim().to_string(),
        _ => trimmed.trim().to_string(),
    }
}

fn is_true_false(question: &str, cleaned: &[String]) -> bool {
    if question.trim().to_lowercase().starts_with("true or false") {
        return cleaned.iter().all(|option| parse_boolean(option).is_some());
    }
    cleaned.len() == 2 && cleaned.iter().all(|option| parse_boolean(option).is_some())
}

fn parse_boolean(option: &str) -> Option<bool> {
    match option.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn title_case_boolean(option: &str) -> String {
    match parse_boolean(option) {
        Some(true) => "True".to_string(),
        Some(false) => "False".to_string(),
        None => option.to_string(),
    }
}

fn strip_true_false_suffix(question: &str) -> String {
    let trimmed = question.trim();
    const SUFFIX: &str = "(true/false)";
    let lower = trimmed.to_lowercase();
    match lower.strip_suffix(SUFFIX) {
        Some(head) if trimmed.is_char_boundary(head.len()) => {
            trimmed[..head.len()].trim_end().to_string()
        }
        _ => trimmed.to_string(),
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub outcome: ScoreOutcome,
    /// One line per missed question, with its explanation.
    pub explanations: Vec<String>,
    /// Outcome of the score submission, as told to the visitor.
    pub message: String,
    /// Site-wide completed-quiz count, when it was refreshed.
    pub quiz_count: Option<u64>,
}

impl ResultsView {
    #[must_use]
    pub fn headline(&self) -> String {
        format!(
            "Score: {}/100 ({}%) - {}",
            self.outcome.score,
            self.outcome.percent,
            if self.outcome.passed { "Passed" } else { "Failed" }
        )
    }

    /// Congratulation line, present only for a passing score.
    #[must_use]
    pub fn congratulation(&self) -> Option<&'static str> {
        match (self.outcome.passed, self.outcome.perfect) {
            (true, true) => Some(
                "Congratulations for passing the cyber awareness quiz with a perfect score!",
            ),
            (true, false) => Some(
                "Congratulations for passing the cyber awareness quiz! Some questions were incorrect. Review the explanations below.",
            ),
            (false, _) => None,
        }
    }
}

/// Explanation lines for every question not answered correctly.
#[must_use]
pub fn missed_explanations(questions: &[Question], answers: &[Option<usize>]) -> Vec<String> {
    questions
        .iter()
        .enumerate()
        .filter(|(i, question)| !question.is_correct(answers.get(*i).copied().flatten()))
        .map(|(i, question)| format!("Question {}: Incorrect. {}", i + 1, question.explanation))
        .collect()
}
