//! Plain-text rendering of education screens.

use aware_core::presentation::{QuestionView, ResultsView, SlideView};
use services::Screen;

pub fn screen(screen: &Screen) -> String {
    match screen {
        Screen::Slide(view) => slide(view),
        Screen::Question(view) => question(view),
        Screen::Results(view) => results(view),
        Screen::Unavailable { message } => format!("{message}\n"),
    }
}

fn slide(view: &SlideView) -> String {
    let mut out = String::new();
    if view.show_welcome {
        out.push_str("Welcome! Work through the slides, then take the quiz. (w to hide)\n\n");
    }
    out.push_str(&format!("== {} ==\n", view.title));
    for section in &view.sections {
        out.push_str(&format!("  * {section}\n"));
    }
    if let Some(reference) = &view.reference {
        out.push_str(&format!(
            "\n  In the news: {}\n  {} ({}, published {})\n",
            reference.description, reference.link, reference.source, reference.published
        ));
    }
    out.push_str(&format!("\n{}\n", view.progress));
    let next = if view.is_last { "n: start quiz" } else { "n: next" };
    if view.has_previous {
        out.push_str(&format!("p: previous  {next}\n"));
    } else {
        out.push_str(&format!("{next}\n"));
    }
    out
}

fn question(view: &QuestionView) -> String {
    let mut out = format!("Question {}\n{}\n", view.number(), view.prompt);
    for option in &view.options {
        out.push_str(&format!("  {}. {}\n", option.label, option.text));
    }
    out.push_str(&format!("\n{}\n", view.progress));
    out
}

fn results(view: &ResultsView) -> String {
    let mut out = format!("{}\n", view.headline());
    if let Some(line) = view.congratulation() {
        out.push_str(&format!("{line}\n"));
    }
    for explanation in &view.explanations {
        out.push_str(&format!("{explanation}\n"));
    }
    out.push_str(&format!("\n{}\n", view.message));
    if let Some(count) = view.quiz_count {
        out.push_str(&format!("Quizzes completed so far: {count}\n"));
    }
    out.push_str("c: continue\n");
    out
}

#[cfg(test)]
mod tests {
    use aware_core::ScorePolicy;

    use super::*;

    #[test]
    fn results_show_headline_and_message() {
        let view = ResultsView {
            outcome: ScorePolicy::default().classify(40),
            explanations: vec!["Question 2: Incorrect. Check the sender.".into()],
            message: "Sign in to save your score.".into(),
            quiz_count: Some(12),
        };
        let text = screen(&Screen::Results(view));
        assert!(text.starts_with("Score: 40/100 (40%) - Failed\n"));
        assert!(text.contains("Question 2: Incorrect."));
        assert!(text.contains("Quizzes completed so far: 12"));
    }

    #[test]
    fn unavailable_is_just_the_message() {
        let text = screen(&Screen::Unavailable {
            message: "Try later.".into(),
        });
        assert_eq!(text, "Try later.\n");
    }
}
