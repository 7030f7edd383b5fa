use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::filters::{check_all, BoxFilter, FilterResult};

/// What a handler reports back to the dispatch engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The update was consumed; stop trying further candidates.
    Handled,
    /// The handler declines the turn; the engine tries the next candidate
    /// (for a temporary step: the handler stays registered).
    Unhandled,
    /// Ask the polling driver to shut down and re-execute the process.
    /// Ignored with an error log when returned from a lifecycle handler.
    Restart,
}

/// The sentinel a handler returns to pass control to the next candidate.
pub const UNHANDLED: Flow = Flow::Unhandled;

/// Handlers bubble arbitrary errors with `?`; a failed handler is logged
/// and the update dropped.
pub type HandlerResult = anyhow::Result<Flow>;

/// Shared mutable state bound to a temporary handler at registration and
/// passed to each of its steps.
pub type Context = Arc<RwLock<Value>>;

type PayloadFn = dyn Fn(Value) -> BoxFuture<'static, HandlerResult> + Send + Sync;
type ContextFn = dyn Fn(Value, Option<Context>) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A registered callable. Two shapes exist so the same handler can serve as
/// a permanent handler (no context) and as a temporary step (context
/// injected): the permanent path always passes `None`.
#[derive(Clone)]
pub enum HandlerFn {
    /// Takes the update payload only.
    Payload(Arc<PayloadFn>),
    /// Takes the payload plus the optional temporary-handler context.
    WithContext(Arc<ContextFn>),
}

impl HandlerFn {
    pub(crate) async fn invoke(&self, payload: Value, context: Option<Context>) -> HandlerResult {
        match self {
            HandlerFn::Payload(f) => f(payload).await,
            HandlerFn::WithContext(f) => f(payload, context).await,
        }
    }
}

/// Wrap a payload-only async closure.
pub fn handler<F, Fut>(f: F) -> HandlerFn
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    HandlerFn::Payload(Arc::new(move |payload| Box::pin(f(payload))))
}

/// Wrap a payload-plus-context async closure. The context is `None` when
/// the handler runs from the permanent registry.
pub fn ctx_handler<F, Fut>(f: F) -> HandlerFn
where
    F: Fn(Value, Option<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    HandlerFn::WithContext(Arc::new(move |payload, context| Box::pin(f(payload, context))))
}

/// A permanent handler entry: callable plus its filter chain.
pub(crate) struct Handler {
    pub(crate) callable: HandlerFn,
    pub(crate) filters: Vec<BoxFilter>,
}

impl Handler {
    pub(crate) async fn matches(&self, payload: &Value) -> FilterResult {
        check_all(&self.filters, payload).await
    }
}

/// One step of a temporary handler: its own sub-filters plus the callable.
pub struct Step {
    pub(crate) filters: Vec<BoxFilter>,
    pub(crate) callable: HandlerFn,
}

impl Step {
    pub fn new(callable: HandlerFn, filters: Vec<BoxFilter>) -> Self {
        Self { filters, callable }
    }

    pub(crate) async fn matches(&self, payload: &Value) -> FilterResult {
        check_all(&self.filters, payload).await
    }
}

/// A one-shot conversation handler: shared filters guard all steps, the
/// first matching step runs, and any non-[`Flow::Unhandled`] return retires
/// the whole record.
pub(crate) struct TemporaryHandler {
    pub(crate) shared_filters: Vec<BoxFilter>,
    pub(crate) steps: Vec<Step>,
    pub(crate) context: Option<Context>,
    pub(crate) expires_at: Option<Instant>,
}

impl TemporaryHandler {
    pub(crate) fn expired(&self) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= Instant::now())
    }

    pub(crate) async fn shared_matches(&self, payload: &Value) -> FilterResult {
        check_all(&self.shared_filters, payload).await
    }
}
