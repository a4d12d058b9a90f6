use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};

/// Runs `future` unless `cancel` fires first.
///
/// An already-cancelled token short-circuits without polling `future`, so no
/// request is issued.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(ClientError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        result = future => result,
    }
}
