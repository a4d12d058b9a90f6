//! Offset pagination over listings that never report a total.
//!
//! The server only hands back `count` and `value` for each page, so the end
//! of a listing has to be inferred from what the pages contain:
//!
//! - an empty (or absent) page ends the walk
//! - when a creation-date bound is set, a page holding anything older than the
//!   bound ends the walk, because listings are ordered newest first
//!
//! `$skip` always advances by the size of the raw page, never by the number of
//! items that survived filtering.

use chrono::{DateTime, Utc};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::cancel::run_cancellable;
use crate::error::Result;
use crate::models::{CollectionResponse, ListFilter};

/// Items that carry a creation timestamp the pagination loop can bound on.
pub trait CreationDated {
    fn creation_date(&self) -> DateTime<Utc>;
}

/// Loop state carried between page fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    pub skip: usize,
    pub pages_fetched: usize,
}

impl PageCursor {
    fn advance(self, raw_len: usize) -> Self {
        Self {
            skip: self.skip + raw_len,
            pages_fetched: self.pages_fetched + 1,
        }
    }
}

/// Outcome of evaluating one raw page against a filter.
#[derive(Debug)]
pub struct PageStep<T> {
    pub kept: Vec<T>,
    pub raw_len: usize,
    pub is_last: bool,
}

/// Filters a raw page and decides whether another page should be fetched.
///
/// The date bound is applied before the custom predicate.
pub fn evaluate_page<T: CreationDated>(raw: Vec<T>, filter: &ListFilter<T>) -> PageStep<T> {
    let raw_len = raw.len();
    let reached_bound = filter
        .created_after
        .is_some_and(|bound| raw.iter().any(|item| item.creation_date() < bound));

    let kept = raw
        .into_iter()
        .filter(|item| match filter.created_after {
            Some(bound) => item.creation_date() >= bound,
            None => true,
        })
        .filter(|item| match &filter.custom_filter {
            Some(predicate) => predicate(item),
            None => true,
        })
        .collect();

    PageStep {
        kept,
        raw_len,
        is_last: raw_len == 0 || reached_bound,
    }
}

/// Walks a paginated listing, returning every item that passes `filter`.
///
/// `fetch_page` receives the `$skip` offset for the next request. Pages are
/// fetched strictly one after another; cancellation is checked before each
/// fetch and raced against the in-flight one.
pub async fn paginate<T, F, Fut>(
    mut fetch_page: F,
    filter: &ListFilter<T>,
    cancel: &CancellationToken,
) -> Result<Vec<T>>
where
    T: CreationDated,
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Option<CollectionResponse<T>>>>,
{
    let mut cursor = PageCursor::default();
    let mut items = Vec::new();

    loop {
        let page = run_cancellable(cancel, fetch_page(cursor.skip)).await?;
        let step = evaluate_page(CollectionResponse::into_items(page), filter);

        debug!(
            skip = cursor.skip,
            raw = step.raw_len,
            kept = step.kept.len(),
            last = step.is_last,
            "Fetched page"
        );

        items.extend(step.kept);
        cursor = cursor.advance(step.raw_len);

        if step.is_last {
            break;
        }
    }

    debug!(
        pages = cursor.pages_fetched,
        total = items.len(),
        "Pagination complete"
    );
    Ok(items)
}
