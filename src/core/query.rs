//! The "run a query, then hydrate its work items" workflow.

use serde_json::Value;
use std::fmt;
use std::future::Future;
use tracing::debug;

use super::reconcile::{HydrationPlan, parse_query_result, plan_hydration};
use crate::error::Result;
use crate::models::{WorkItem, WorkItemsQueryResultWithWorkItems};

/// Phases of a query-and-expand call, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    ExecutingQuery,
    Reconciling,
    Hydrating,
    Done,
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExecutingQuery => "executing query",
            Self::Reconciling => "reconciling",
            Self::Hydrating => "hydrating",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs `query`, reconciles its result and hydrates the matched work items.
///
/// `hydrate` is only called when the result references at least one work
/// item; an empty result comes back with no work items and no further
/// request. The returned value keeps the shape and metadata of the query
/// result, with links preserved for hierarchical queries.
pub async fn run_and_hydrate<Q, H, HFut>(
    query: Q,
    hydrate: H,
    expand: bool,
) -> Result<WorkItemsQueryResultWithWorkItems>
where
    Q: Future<Output = Result<Value>>,
    H: FnOnce(HydrationPlan) -> HFut,
    HFut: Future<Output = Result<Vec<WorkItem>>>,
{
    debug!(phase = %QueryPhase::ExecutingQuery, expand, "Query phase");
    let document = query.await?;

    debug!(phase = %QueryPhase::Reconciling, "Query phase");
    let result = parse_query_result(document)?;

    let Some(plan) = plan_hydration(&result, expand) else {
        debug!(phase = %QueryPhase::Done, work_items = 0, "Query phase");
        return Ok(result.with_work_items(Vec::new()));
    };

    debug!(phase = %QueryPhase::Hydrating, ids = plan.ids.len(), "Query phase");
    let work_items = hydrate(plan).await?;

    debug!(phase = %QueryPhase::Done, work_items = work_items.len(), "Query phase");
    Ok(result.with_work_items(work_items))
}
