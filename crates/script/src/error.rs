use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected character {ch:?} at byte {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("unexpected {found} at byte {pos}")]
    Unexpected { pos: usize, found: String },

    #[error("unterminated {what} starting at byte {pos}")]
    Unterminated { pos: usize, what: &'static str },

    #[error("invalid number literal at byte {pos}")]
    BadNumber { pos: usize },

    #[error("invalid escape sequence at byte {pos}")]
    BadEscape { pos: usize },

    #[error("unsupported syntax at byte {pos}: {what}")]
    Unsupported { pos: usize, what: &'static str },
}
