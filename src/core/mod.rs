//! Query-result aggregation and pagination engine.
//!
//! Everything in this module is transport-agnostic: the loops take fetch
//! closures and a [`CancellationToken`](tokio_util::sync::CancellationToken),
//! so they can be driven by the real client or by plain closures in tests.
//!
//! - [`pagination`]: walks `$skip`-paginated listings until a content-inferred stop
//! - [`batching`]: splits identifier lists into server-sized chunks
//! - [`reconcile`]: normalizes flat and hierarchical query results
//! - [`query`]: the "run query, then hydrate" workflow

pub mod batching;
pub mod cancel;
pub mod pagination;
pub mod query;
pub mod reconcile;

pub use batching::fetch_in_batches;
pub use cancel::run_cancellable;
pub use pagination::{CreationDated, paginate};
pub use query::run_and_hydrate;
pub use reconcile::{HydrationPlan, Projection, parse_query_result, plan_hydration};
