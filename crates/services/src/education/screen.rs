use std::fmt;

use aware_core::presentation::{QuestionView, ResultsView, SlideView};

/// Where the education flow currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EducationState {
    #[default]
    NoSession,
    Slides,
    Quiz,
    /// A restored attempt whose score still has to be submitted.
    PendingSubmission,
    Results,
}

impl fmt::Display for EducationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EducationState::NoSession => "no session",
            EducationState::Slides => "slides",
            EducationState::Quiz => "quiz",
            EducationState::PendingSubmission => "pending submission",
            EducationState::Results => "results",
        };
        f.write_str(name)
    }
}

/// What the front end should render next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Slide(SlideView),
    Question(QuestionView),
    Results(ResultsView),
    /// Content could not be loaded; the visitor may try again later.
    Unavailable { message: String },
}
