//! Extension traits for error handling

use crate::engine::outcome::ToolError;

/// Extension trait for converting library errors into tool failures
pub trait ToToolError<T> {
    /// Convert an error to a `ToolError::Failed` with context
    fn tool_err(self, context: &str) -> Result<T, ToolError>;
}

impl<T, E: std::fmt::Display> ToToolError<T> for Result<T, E> {
    fn tool_err(self, context: &str) -> Result<T, ToolError> {
        self.map_err(|e| ToolError::failed(context, e))
    }
}
