// Run Log Port - append-only, human-readable task log

use crate::error::Result;
use async_trait::async_trait;

/// Append-only sink for task summary lines
///
/// Implementations open, append and close the target within one call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RunLog: Send + Sync {
    /// Append lines (without trailing newlines) in order
    async fn append_lines(&self, lines: &[String]) -> Result<()>;

    /// Where the lines go (for diagnostics)
    fn location(&self) -> String;
}
