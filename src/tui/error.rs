use thiserror::Error;
use crate::database::DatabaseError;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("IO/Terminal error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Key binding error: {0}")]
    KeyBindingError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_keeps_detail() {
        let err = TuiError::RenderError("terminal too small: current 20x5, minimum 50x16".to_string());
        assert_eq!(
            err.to_string(),
            "Render error: terminal too small: current 20x5, minimum 50x16"
        );
    }
}
