mod ids;
mod quiz;
mod section;
mod session;
mod slide;
mod snapshot;

pub use ids::QuizId;
pub use quiz::{Question, QuestionError};
pub use section::{LoginProvider, Section, Theme};
pub use session::{AnswerRecorded, EducationSession, SessionStateError};
pub use slide::{content_timestamp, Headline, Slide};
pub use snapshot::SessionSnapshot;
