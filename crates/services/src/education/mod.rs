mod controller;
mod screen;

pub use controller::{EducationController, NO_QUIZ_MESSAGE, NO_SLIDES_MESSAGE};
pub use screen::{EducationState, Screen};
