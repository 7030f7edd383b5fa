//! Pure predicates over update payloads.
//!
//! A filter takes the payload (the update object without its `update_id`
//! wrapper) and answers whether a handler should run. Filters are evaluated
//! in registration order with short-circuit on the first negative answer; a
//! failing filter drops the update.

pub mod generators;
pub mod ready;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

pub use generators::{
    all_keys, any_keys, callback_data, callback_data_startswith, caption_commands,
    caption_startswith, chat_ids, chat_types, commands, from_users, regex, regex_caption,
    sub_keys, text_startswith,
};

/// Raised when a filter cannot be evaluated; the update is dropped.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FilterError(pub String);

pub type FilterResult = Result<bool, FilterError>;

/// The predicate seam. Implemented by everything this module produces; user
/// code usually goes through [`filter_fn`] and friends instead of
/// implementing it directly.
#[async_trait]
pub trait Filter: Send + Sync {
    async fn check(&self, payload: &Value) -> FilterResult;
}

pub type BoxFilter = Arc<dyn Filter>;

/// Lift a plain synchronous predicate into a filter.
pub fn filter_fn<F>(f: F) -> BoxFilter
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    struct FnFilter<F>(F);

    #[async_trait]
    impl<F> Filter for FnFilter<F>
    where
        F: Fn(&Value) -> bool + Send + Sync,
    {
        async fn check(&self, payload: &Value) -> FilterResult {
            Ok((self.0)(payload))
        }
    }

    Arc::new(FnFilter(f))
}

/// Lift a fallible predicate into a filter. An `Err` drops the update.
pub fn try_filter_fn<F>(f: F) -> BoxFilter
where
    F: Fn(&Value) -> FilterResult + Send + Sync + 'static,
{
    struct TryFnFilter<F>(F);

    #[async_trait]
    impl<F> Filter for TryFnFilter<F>
    where
        F: Fn(&Value) -> FilterResult + Send + Sync,
    {
        async fn check(&self, payload: &Value) -> FilterResult {
            (self.0)(payload)
        }
    }

    Arc::new(TryFnFilter(f))
}

/// Lift an async predicate into a filter. The payload is cloned so the
/// future can own it.
pub fn async_filter_fn<F, Fut>(f: F) -> BoxFilter
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FilterResult> + Send + 'static,
{
    struct AsyncFnFilter {
        f: Box<dyn Fn(Value) -> BoxFuture<'static, FilterResult> + Send + Sync>,
    }

    #[async_trait]
    impl Filter for AsyncFnFilter {
        async fn check(&self, payload: &Value) -> FilterResult {
            (self.f)(payload.clone()).await
        }
    }

    Arc::new(AsyncFnFilter {
        f: Box::new(move |payload| Box::pin(f(payload))),
    })
}

/// Turn evaluation failures into a plain `false`, for schema-tolerant
/// predicates that treat missing keys as "does not match".
pub fn false_on_error(filter: BoxFilter) -> BoxFilter {
    struct FalseOnError(BoxFilter);

    #[async_trait]
    impl Filter for FalseOnError {
        async fn check(&self, payload: &Value) -> FilterResult {
            Ok(self.0.check(payload).await.unwrap_or(false))
        }
    }

    Arc::new(FalseOnError(filter))
}

/// Negation.
pub fn not_(filter: BoxFilter) -> BoxFilter {
    struct Not(BoxFilter);

    #[async_trait]
    impl Filter for Not {
        async fn check(&self, payload: &Value) -> FilterResult {
            Ok(!self.0.check(payload).await?)
        }
    }

    Arc::new(Not(filter))
}

/// True if any inner filter is true; stops at the first hit.
pub fn if_any(filters: Vec<BoxFilter>) -> BoxFilter {
    struct Any(Vec<BoxFilter>);

    #[async_trait]
    impl Filter for Any {
        async fn check(&self, payload: &Value) -> FilterResult {
            for f in &self.0 {
                if f.check(payload).await? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }

    Arc::new(Any(filters))
}

/// True if all inner filters are true; stops at the first miss.
pub fn if_all(filters: Vec<BoxFilter>) -> BoxFilter {
    struct All(Vec<BoxFilter>);

    #[async_trait]
    impl Filter for All {
        async fn check(&self, payload: &Value) -> FilterResult {
            check_all(&self.0, payload).await
        }
    }

    Arc::new(All(filters))
}

/// True if no inner filter is true.
pub fn if_none(filters: Vec<BoxFilter>) -> BoxFilter {
    not_(if_any(filters))
}

/// True if exactly one inner filter is true. Cannot short-circuit until a
/// second hit is seen.
pub fn xor(filters: Vec<BoxFilter>) -> BoxFilter {
    struct Xor(Vec<BoxFilter>);

    #[async_trait]
    impl Filter for Xor {
        async fn check(&self, payload: &Value) -> FilterResult {
            let mut hits = 0usize;
            for f in &self.0 {
                if f.check(payload).await? {
                    hits += 1;
                    if hits > 1 {
                        return Ok(false);
                    }
                }
            }
            Ok(hits == 1)
        }
    }

    Arc::new(Xor(filters))
}

/// Evaluate a filter list in order, short-circuiting on the first `false`.
/// An empty list always matches.
pub(crate) async fn check_all(filters: &[BoxFilter], payload: &Value) -> FilterResult {
    for f in filters {
        if !f.check(payload).await? {
            return Ok(false);
        }
    }
    Ok(true)
}
