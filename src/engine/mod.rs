//! The engine module contains the core logic for the servers' functionality.

pub mod catalog;
pub mod outcome;
pub mod registry;
pub mod resources;
pub mod server;
pub mod sheets;
pub mod slides;

use crate::error_ext::ToToolError;
use outcome::ToolError;

/// Run blocking file work off the async runtime.
pub async fn run_blocking<T, F>(work: F) -> Result<T, ToolError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ToolError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .tool_err("Background task failed")?
}
