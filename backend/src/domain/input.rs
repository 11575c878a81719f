//! Parsing of numeric text typed by the user or returned by the coach.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please input a value")]
    Blank,
    #[error("'{0}' is not a whole number of milliliters")]
    NotANumber(String),
    #[error("'{0}' is too large")]
    OutOfRange(String),
}

/// Parse a drink amount. Only ASCII digits are accepted.
pub fn parse_amount_text(text: &str) -> Result<u32, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Blank);
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::NotANumber(trimmed.to_string()));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| InputError::OutOfRange(trimmed.to_string()))
}

/// Parse an edited daily goal; a blank field keeps the current goal
pub fn parse_goal_text(text: &str, current_goal_ml: i64) -> Result<i64, InputError> {
    if text.trim().is_empty() {
        return Ok(current_goal_ml);
    }
    parse_amount_text(text).map(i64::from)
}

/// Keep only the digit characters of `text`, e.g. "About 2,700 ml" -> "2700"
pub fn extract_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}
