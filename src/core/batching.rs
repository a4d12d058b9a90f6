use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::cancel::run_cancellable;
use crate::error::{ClientError, Result};
use crate::models::CollectionResponse;

/// Fetches `ids` in consecutive chunks of at most `batch_size`.
///
/// Chunks preserve input order, including duplicates, and results are
/// concatenated in chunk order. An empty id list makes no request, whatever
/// the batch size. Chunks are fetched one at a time; the first failing chunk
/// aborts the rest.
pub async fn fetch_in_batches<T, F, Fut>(
    ids: &[i32],
    batch_size: usize,
    mut fetch_batch: F,
    cancel: &CancellationToken,
) -> Result<Vec<T>>
where
    F: FnMut(Vec<i32>) -> Fut,
    Fut: Future<Output = Result<Option<CollectionResponse<T>>>>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    if batch_size == 0 {
        return Err(ClientError::invalid_argument(
            "batch_size",
            "must be greater than zero",
        ));
    }

    let mut items = Vec::new();
    for (index, chunk) in ids.chunks(batch_size).enumerate() {
        let page = run_cancellable(cancel, fetch_batch(chunk.to_vec())).await?;
        let page = CollectionResponse::into_items(page);
        debug!(
            batch = index,
            requested = chunk.len(),
            received = page.len(),
            "Fetched batch"
        );
        items.extend(page);
    }

    Ok(items)
}
