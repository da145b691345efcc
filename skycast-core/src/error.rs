use thiserror::Error;

/// Validation errors raised at the edges of the core: user input and user-supplied cities.
///
/// The synthesizer itself never fails; these only guard what is handed to it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Please enter a city name!")]
    EmptyCity,

    #[error(
        "Invalid date '{input}'. Expected 'YYYY-MM-DD HH:MM', 'YYYY-MM-DDTHH:MM' or 'YYYY-MM-DD'."
    )]
    InvalidDate { input: String },

    #[error("Invalid city '{name}': {reason}")]
    InvalidCity { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
