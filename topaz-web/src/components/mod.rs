pub mod choice_card;
pub mod lab_card;
pub mod placeholder;
pub mod progress;
