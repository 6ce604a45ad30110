pub mod matcher;
pub mod normalize;
pub mod tokenize;

pub use matcher::{Feedback, find_match, is_correct};
pub use normalize::normalize;
pub use tokenize::{Token, tokenize};
