//! The handler registry and dispatch engine.
//!
//! Permanent handlers are registered up front and locked once polling
//! starts; temporary handlers implement short stateful conversations and
//! can be added at any time, including from inside a running handler.
//! Dispatch tries temporary handlers first (insertion order, over a
//! snapshot), then permanent handlers (registration order), honoring the
//! cooperative [`UNHANDLED`] protocol throughout.

mod handler;

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Notify, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, warn};

pub use handler::{ctx_handler, handler, Context, Flow, HandlerFn, HandlerResult, Step, UNHANDLED};
pub(crate) use handler::{Handler, TemporaryHandler};

use crate::filters::BoxFilter;
use crate::utils::errors::{ExitCode, TelegramError};

/// The closed set of update categories the Bot API can deliver.
pub const UPDATE_CATEGORIES: [&str; 23] = [
    "message",
    "edited_message",
    "channel_post",
    "edited_channel_post",
    "business_connection",
    "business_message",
    "edited_business_message",
    "deleted_business_messages",
    "message_reaction",
    "message_reaction_count",
    "inline_query",
    "chosen_inline_result",
    "callback_query",
    "shipping_query",
    "pre_checkout_query",
    "purchased_paid_media",
    "poll",
    "poll_answer",
    "my_chat_member",
    "chat_member",
    "chat_join_request",
    "chat_boost",
    "removed_chat_boost",
];

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("'{0}' is not a valid update category")]
    UnknownCategory(String),

    #[error("the handler registry is locked once polling has started")]
    Locked,

    #[error("there can only be one '{0}' event handler")]
    DuplicateLifecycle(&'static str),

    #[error("a temporary handler needs at least one step")]
    NoSteps,
}

/// Options for [`EventRegistry::wait_for`].
#[derive(Default)]
pub struct WaitForOptions {
    /// Initial context value shared by all steps.
    pub context: Option<Value>,
    /// Drop the handler without invocation once this much time has passed.
    pub timeout: Option<Duration>,
}

type StartupFn = dyn Fn() -> BoxFuture<'static, HandlerResult> + Send + Sync;
type ShutdownFn = dyn Fn(ExitCode) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// Handler registry plus dispatch engine. Obtained via `Bot::event`.
pub struct EventRegistry {
    startup: Mutex<Option<Arc<StartupFn>>>,
    shutdown: Mutex<Option<Arc<ShutdownFn>>>,
    permanent: Mutex<HashMap<String, Vec<Arc<Handler>>>>,
    temporary: Mutex<HashMap<String, Vec<Arc<TemporaryHandler>>>>,
    locked: AtomicBool,
    restart: AtomicBool,
    restart_signal: Notify,
}

impl EventRegistry {
    pub(crate) fn new() -> Self {
        Self {
            startup: Mutex::new(None),
            shutdown: Mutex::new(None),
            permanent: Mutex::new(HashMap::new()),
            temporary: Mutex::new(HashMap::new()),
            locked: AtomicBool::new(false),
            restart: AtomicBool::new(false),
            restart_signal: Notify::new(),
        }
    }

    /// Register a permanent handler for `category`. Handlers are tried in
    /// registration order; a handler without filters is a catch-all, and
    /// anything registered after it only runs if it returns [`UNHANDLED`].
    pub fn on(
        &self,
        category: &str,
        filters: Vec<BoxFilter>,
        callable: HandlerFn,
    ) -> Result<(), RegistryError> {
        if !UPDATE_CATEGORIES.contains(&category) {
            return Err(RegistryError::UnknownCategory(category.to_string()));
        }
        if self.locked.load(Ordering::SeqCst) {
            return Err(RegistryError::Locked);
        }
        let mut map = self.permanent.lock().expect("permanent registry poisoned");
        let list = map.entry(category.to_string()).or_default();
        if list.iter().any(|h| h.filters.is_empty()) {
            warn!(
                category,
                "a handler without filters is registered above this one; \
                 the new handler only runs when earlier handlers return UNHANDLED"
            );
        }
        list.push(Arc::new(Handler { callable, filters }));
        Ok(())
    }

    /// Register the singleton `startup` handler. Runs after the HTTP client
    /// opens, before the first update is fetched.
    pub fn on_startup<F, Fut>(&self, f: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = HandlerResult> + Send + 'static,
    {
        if self.locked.load(Ordering::SeqCst) {
            return Err(RegistryError::Locked);
        }
        let mut slot = self.startup.lock().expect("startup slot poisoned");
        if slot.is_some() {
            return Err(RegistryError::DuplicateLifecycle("startup"));
        }
        *slot = Some(Arc::new(move || Box::pin(f())));
        Ok(())
    }

    /// Register the singleton `shutdown` handler; receives the exit code.
    pub fn on_shutdown<F, Fut>(&self, f: F) -> Result<(), RegistryError>
    where
        F: Fn(ExitCode) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = HandlerResult> + Send + 'static,
    {
        if self.locked.load(Ordering::SeqCst) {
            return Err(RegistryError::Locked);
        }
        let mut slot = self.shutdown.lock().expect("shutdown slot poisoned");
        if slot.is_some() {
            return Err(RegistryError::DuplicateLifecycle("shutdown"));
        }
        *slot = Some(Arc::new(move |code| Box::pin(f(code))));
        Ok(())
    }

    /// Register a temporary one-shot handler. Shared filters are checked
    /// first; the first step whose sub-filters match runs with the bound
    /// context. Returning anything other than [`UNHANDLED`] from a step
    /// removes the whole handler. Usable at any time, including from inside
    /// handlers.
    pub fn wait_for(
        &self,
        category: &str,
        shared_filters: Vec<BoxFilter>,
        steps: Vec<Step>,
        options: WaitForOptions,
    ) -> Result<(), RegistryError> {
        if !UPDATE_CATEGORIES.contains(&category) {
            return Err(RegistryError::UnknownCategory(category.to_string()));
        }
        if steps.is_empty() {
            return Err(RegistryError::NoSteps);
        }
        let record = Arc::new(TemporaryHandler {
            shared_filters,
            steps,
            context: options.context.map(|v| Arc::new(RwLock::new(v))),
            expires_at: options.timeout.map(|t| Instant::now() + t),
        });
        self.temporary
            .lock()
            .expect("temporary registry poisoned")
            .entry(category.to_string())
            .or_default()
            .push(record);
        debug!(category, "registered temporary handler");
        Ok(())
    }

    /// The categories to request from Telegram: every category with at
    /// least one permanent or temporary handler, sorted for determinism.
    pub fn allowed_updates(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for (category, list) in self.permanent.lock().expect("permanent registry poisoned").iter() {
            if !list.is_empty() {
                set.insert(category.clone());
            }
        }
        for (category, list) in self.temporary.lock().expect("temporary registry poisoned").iter() {
            if !list.is_empty() {
                set.insert(category.clone());
            }
        }
        set.into_iter().collect()
    }

    pub(crate) fn lock_permanent(&self) {
        self.locked.store(true, Ordering::SeqCst);
    }

    pub(crate) fn restart_requested(&self) -> bool {
        self.restart.load(Ordering::SeqCst)
    }

    fn request_restart(&self) {
        self.restart.store(true, Ordering::SeqCst);
        self.restart_signal.notify_one();
    }

    pub(crate) async fn restart_notified(&self) {
        self.restart_signal.notified().await;
    }

    /// Run one update through the engine. Temporary handlers first over a
    /// snapshot, then permanent handlers against payload deep copies.
    pub(crate) async fn dispatch(&self, category: &str, payload: Value) {
        let snapshot: Vec<Arc<TemporaryHandler>> = self
            .temporary
            .lock()
            .expect("temporary registry poisoned")
            .get(category)
            .cloned()
            .unwrap_or_default();

        for tmp in snapshot {
            if tmp.expired() {
                self.remove_temporary(category, &tmp);
                debug!(category, "removed expired temporary handler");
                continue;
            }
            match tmp.shared_matches(&payload).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    let err = TelegramError::FilterEvaluation {
                        event: category.to_string(),
                        message: e.to_string(),
                    };
                    error!("{err}. Update was dropped.");
                    return;
                }
            }

            let mut matched_step = None;
            for step in &tmp.steps {
                match step.matches(&payload).await {
                    Ok(true) => {
                        matched_step = Some(step);
                        break;
                    }
                    Ok(false) => continue,
                    Err(e) => {
                        let err = TelegramError::FilterEvaluation {
                            event: category.to_string(),
                            message: e.to_string(),
                        };
                        error!("{err}. Update was dropped.");
                        return;
                    }
                }
            }

            let Some(step) = matched_step else {
                warn!(
                    category,
                    "shared filters matched but no step matched; trying the next temporary handler"
                );
                continue;
            };

            match step.callable.invoke(payload.clone(), tmp.context.clone()).await {
                Ok(Flow::Unhandled) => {
                    debug!(category, "temporary step declined the turn; handler stays registered");
                }
                Ok(Flow::Restart) => {
                    debug!(category, "restart requested from temporary handler");
                    self.request_restart();
                }
                Ok(Flow::Handled) => {
                    self.remove_temporary(category, &tmp);
                    debug!(category, "temporary handler finished and was removed");
                }
                Err(e) => {
                    let err = TelegramError::EventHandler {
                        event: category.to_string(),
                        message: format!("{e:#}"),
                    };
                    error!("{err}. Update was dropped.");
                }
            }
            // The temporary handler consumed the turn either way.
            return;
        }

        let handlers: Vec<Arc<Handler>> = self
            .permanent
            .lock()
            .expect("permanent registry poisoned")
            .get(category)
            .cloned()
            .unwrap_or_default();

        for h in handlers {
            match h.matches(&payload).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    let err = TelegramError::FilterEvaluation {
                        event: category.to_string(),
                        message: e.to_string(),
                    };
                    error!("{err}. Update was dropped.");
                    return;
                }
            }
            // Each candidate gets its own deep copy of the payload so
            // in-place mutation cannot leak into later handlers.
            match h.callable.invoke(payload.clone(), None).await {
                Ok(Flow::Unhandled) => {
                    debug!(category, "handler returned UNHANDLED; continue checking for matching handlers");
                    continue;
                }
                Ok(Flow::Restart) => {
                    debug!(category, "restart requested; preparing shutdown");
                    self.request_restart();
                    return;
                }
                Ok(Flow::Handled) => return,
                Err(e) => {
                    let err = TelegramError::EventHandler {
                        event: category.to_string(),
                        message: format!("{e:#}"),
                    };
                    error!("{err}. Update was dropped.");
                    return;
                }
            }
        }

        warn!(category, "no matching event handler found; update was dropped");
    }

    fn remove_temporary(&self, category: &str, target: &Arc<TemporaryHandler>) {
        let mut map = self.temporary.lock().expect("temporary registry poisoned");
        if let Some(list) = map.get_mut(category) {
            list.retain(|h| !Arc::ptr_eq(h, target));
            if list.is_empty() {
                map.remove(category);
            }
        }
    }

    /// Fire the `startup` lifecycle handler. Restart requests are not
    /// allowed here and are logged and ignored.
    pub(crate) async fn emit_startup(&self) {
        let callable = self.startup.lock().expect("startup slot poisoned").clone();
        if let Some(callable) = callable {
            match callable().await {
                Ok(Flow::Restart) => error!("restart is not allowed in the 'startup' event handler"),
                Ok(_) => {}
                Err(e) => error!("error in 'startup' event handler: {e:#}"),
            }
        }
    }

    /// Fire the `shutdown` lifecycle handler with the exit code.
    pub(crate) async fn emit_shutdown(&self, code: ExitCode) {
        let callable = self.shutdown.lock().expect("shutdown slot poisoned").clone();
        if let Some(callable) = callable {
            match callable(code).await {
                Ok(Flow::Restart) => error!("restart is not allowed in the 'shutdown' event handler"),
                Ok(_) => {}
                Err(e) => error!("error in 'shutdown' event handler: {e:#}"),
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn temporary_count(&self, category: &str) -> usize {
        self.temporary
            .lock()
            .unwrap()
            .get(category)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use serde_json::json;

    use super::*;
    use crate::filters::{filter_fn, try_filter_fn, FilterError};
    use crate::filters::generators::chat_ids;

    fn counting_handler(counter: Arc<AtomicUsize>, flow: Flow) -> HandlerFn {
        handler(move |_payload| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(flow)
            }
        })
    }

    #[test]
    fn rejects_unknown_categories_and_double_lifecycle() {
        let registry = EventRegistry::new();
        assert!(matches!(
            registry.on("msg", vec![], counting_handler(Arc::new(AtomicUsize::new(0)), Flow::Handled)),
            Err(RegistryError::UnknownCategory(_))
        ));
        registry.on_startup(|| async { Ok(Flow::Handled) }).unwrap();
        assert!(matches!(
            registry.on_startup(|| async { Ok(Flow::Handled) }),
            Err(RegistryError::DuplicateLifecycle("startup"))
        ));
        registry.on_shutdown(|_code| async { Ok(Flow::Handled) }).unwrap();
        assert!(registry.on_shutdown(|_code| async { Ok(Flow::Handled) }).is_err());
    }

    #[test]
    fn registration_fails_once_locked() {
        let registry = EventRegistry::new();
        registry.lock_permanent();
        let counter = Arc::new(AtomicUsize::new(0));
        assert!(matches!(
            registry.on("message", vec![], counting_handler(counter, Flow::Handled)),
            Err(RegistryError::Locked)
        ));
        assert!(matches!(
            registry.on_startup(|| async { Ok(Flow::Handled) }),
            Err(RegistryError::Locked)
        ));
    }

    #[test]
    fn allowed_updates_is_the_union_of_both_registries() {
        let registry = EventRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry
            .on("message", vec![], counting_handler(counter.clone(), Flow::Handled))
            .unwrap();
        registry
            .wait_for(
                "callback_query",
                vec![],
                vec![Step::new(counting_handler(counter, Flow::Handled), vec![])],
                WaitForOptions::default(),
            )
            .unwrap();
        assert_eq!(registry.allowed_updates(), vec!["callback_query", "message"]);
    }

    #[tokio::test]
    async fn allowed_updates_shrinks_when_a_temporary_handler_retires() {
        let registry = EventRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry
            .wait_for(
                "message",
                vec![],
                vec![Step::new(counting_handler(counter, Flow::Handled), vec![])],
                WaitForOptions::default(),
            )
            .unwrap();
        assert_eq!(registry.allowed_updates(), vec!["message"]);
        registry.dispatch("message", json!({"text": "x"})).await;
        assert!(registry.allowed_updates().is_empty());
    }

    #[tokio::test]
    async fn unhandled_falls_through_in_registration_order() {
        let registry = EventRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let third = Arc::new(AtomicUsize::new(0));
        registry
            .on("message", vec![], counting_handler(first.clone(), Flow::Unhandled))
            .unwrap();
        registry
            .on("message", vec![], counting_handler(second.clone(), Flow::Handled))
            .unwrap();
        registry
            .on("message", vec![], counting_handler(third.clone(), Flow::Handled))
            .unwrap();

        registry.dispatch("message", json!({"text": "hi"})).await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(third.load(Ordering::SeqCst), 0, "dispatch stops at the first Handled");
    }

    #[tokio::test]
    async fn failing_filter_drops_the_update() {
        let registry = EventRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry
            .on(
                "message",
                vec![try_filter_fn(|_| Err(FilterError("broken".into())))],
                counting_handler(counter.clone(), Flow::Handled),
            )
            .unwrap();
        // A later catch-all would match, but the update is dropped first.
        let fallback = Arc::new(AtomicUsize::new(0));
        registry
            .on("message", vec![], counting_handler(fallback.clone(), Flow::Handled))
            .unwrap();

        registry.dispatch("message", json!({"text": "hi"})).await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(fallback.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_mutation_cannot_leak_between_candidates() {
        let registry = EventRegistry::new();
        let saw_original = Arc::new(AtomicUsize::new(0));
        registry
            .on(
                "message",
                vec![],
                handler(|mut payload| async move {
                    payload["text"] = json!("mutated");
                    Ok(Flow::Unhandled)
                }),
            )
            .unwrap();
        let saw = saw_original.clone();
        registry
            .on(
                "message",
                vec![],
                handler(move |payload| {
                    let saw = saw.clone();
                    async move {
                        if payload["text"] == json!("original") {
                            saw.fetch_add(1, Ordering::SeqCst);
                        }
                        Ok(Flow::Handled)
                    }
                }),
            )
            .unwrap();

        registry.dispatch("message", json!({"text": "original"})).await;
        assert_eq!(saw_original.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn temporary_handler_runs_before_permanent_and_retires() {
        let registry = EventRegistry::new();
        let permanent = Arc::new(AtomicUsize::new(0));
        let step_runs = Arc::new(AtomicUsize::new(0));
        registry
            .on("message", vec![], counting_handler(permanent.clone(), Flow::Handled))
            .unwrap();
        registry
            .wait_for(
                "message",
                vec![chat_ids(&[1])],
                vec![Step::new(counting_handler(step_runs.clone(), Flow::Handled), vec![])],
                WaitForOptions::default(),
            )
            .unwrap();

        // Wrong chat: shared filter fails, falls through to permanent.
        registry.dispatch("message", json!({"chat": {"id": 2}})).await;
        assert_eq!(step_runs.load(Ordering::SeqCst), 0);
        assert_eq!(permanent.load(Ordering::SeqCst), 1);
        assert_eq!(registry.temporary_count("message"), 1);

        // Right chat: step runs, handler removed, permanent skipped.
        registry.dispatch("message", json!({"chat": {"id": 1}})).await;
        assert_eq!(step_runs.load(Ordering::SeqCst), 1);
        assert_eq!(permanent.load(Ordering::SeqCst), 1);
        assert_eq!(registry.temporary_count("message"), 0);
    }

    #[tokio::test]
    async fn unhandled_step_keeps_the_temporary_handler_alive() {
        let registry = EventRegistry::new();
        let permanent = Arc::new(AtomicUsize::new(0));
        let step_runs = Arc::new(AtomicUsize::new(0));
        registry
            .on("message", vec![], counting_handler(permanent.clone(), Flow::Handled))
            .unwrap();
        registry
            .wait_for(
                "message",
                vec![],
                vec![Step::new(counting_handler(step_runs.clone(), Flow::Unhandled), vec![])],
                WaitForOptions::default(),
            )
            .unwrap();

        registry.dispatch("message", json!({"text": "1"})).await;
        registry.dispatch("message", json!({"text": "2"})).await;

        // The step consumed both turns without retiring; the permanent
        // handler never saw the updates.
        assert_eq!(step_runs.load(Ordering::SeqCst), 2);
        assert_eq!(permanent.load(Ordering::SeqCst), 0);
        assert_eq!(registry.temporary_count("message"), 1);
    }

    #[tokio::test]
    async fn step_context_is_shared_and_mutable() {
        let registry = EventRegistry::new();
        let done = Arc::new(AtomicUsize::new(0));
        let done_clone = done.clone();
        let step = Step::new(
            ctx_handler(move |_payload, context| {
                let done = done_clone.clone();
                async move {
                    let context = context.expect("context bound at registration");
                    let mut value = context.write().await;
                    let count = value["count"].as_i64().unwrap_or(0);
                    if count > 0 {
                        value["count"] = json!(count - 1);
                        return Ok(Flow::Unhandled);
                    }
                    done.fetch_add(1, Ordering::SeqCst);
                    Ok(Flow::Handled)
                }
            }),
            vec![],
        );
        registry
            .wait_for(
                "message",
                vec![],
                vec![step],
                WaitForOptions {
                    context: Some(json!({"count": 2})),
                    timeout: None,
                },
            )
            .unwrap();

        for _ in 0..3 {
            registry.dispatch("message", json!({"text": "tick"})).await;
        }
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(registry.temporary_count("message"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_temporary_handler_never_invokes_a_step() {
        let registry = EventRegistry::new();
        let step_runs = Arc::new(AtomicUsize::new(0));
        let fallback = Arc::new(AtomicUsize::new(0));
        registry
            .on("message", vec![], counting_handler(fallback.clone(), Flow::Handled))
            .unwrap();
        registry
            .wait_for(
                "message",
                vec![],
                vec![Step::new(counting_handler(step_runs.clone(), Flow::Handled), vec![])],
                WaitForOptions {
                    context: None,
                    timeout: Some(Duration::from_secs(30)),
                },
            )
            .unwrap();

        tokio::time::advance(Duration::from_secs(31)).await;
        registry.dispatch("message", json!({"text": "late"})).await;

        assert_eq!(step_runs.load(Ordering::SeqCst), 0);
        assert_eq!(fallback.load(Ordering::SeqCst), 1);
        assert_eq!(registry.temporary_count("message"), 0, "expired handler is removed");
    }

    #[tokio::test]
    async fn no_matching_step_falls_through_to_the_next_temporary_handler() {
        let registry = EventRegistry::new();
        let first_step = Arc::new(AtomicUsize::new(0));
        let second_step = Arc::new(AtomicUsize::new(0));
        registry
            .wait_for(
                "message",
                vec![],
                vec![Step::new(
                    counting_handler(first_step.clone(), Flow::Handled),
                    vec![filter_fn(|_| false)],
                )],
                WaitForOptions::default(),
            )
            .unwrap();
        registry
            .wait_for(
                "message",
                vec![],
                vec![Step::new(counting_handler(second_step.clone(), Flow::Handled), vec![])],
                WaitForOptions::default(),
            )
            .unwrap();

        registry.dispatch("message", json!({"text": "x"})).await;

        assert_eq!(first_step.load(Ordering::SeqCst), 0);
        assert_eq!(second_step.load(Ordering::SeqCst), 1);
        assert_eq!(registry.temporary_count("message"), 1, "only the handled record retires");
    }

    #[tokio::test]
    async fn restart_from_a_handler_sets_the_flag() {
        let registry = EventRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry
            .on("message", vec![], counting_handler(counter, Flow::Restart))
            .unwrap();
        assert!(!registry.restart_requested());
        registry.dispatch("message", json!({"text": "x"})).await;
        assert!(registry.restart_requested());
    }

    #[tokio::test]
    async fn handlers_registered_from_inside_a_handler_skip_the_current_cycle() {
        let registry = Arc::new(EventRegistry::new());
        let inner_runs = Arc::new(AtomicUsize::new(0));
        let registry_clone = registry.clone();
        let inner_clone = inner_runs.clone();
        registry
            .on(
                "message",
                vec![],
                handler(move |_payload| {
                    let registry = registry_clone.clone();
                    let inner = inner_clone.clone();
                    async move {
                        registry
                            .wait_for(
                                "message",
                                vec![],
                                vec![Step::new(counting_handler(inner, Flow::Handled), vec![])],
                                WaitForOptions::default(),
                            )
                            .unwrap();
                        Ok(Flow::Handled)
                    }
                }),
            )
            .unwrap();

        registry.dispatch("message", json!({"text": "first"})).await;
        // Registered mid-dispatch: must not run in the same cycle.
        assert_eq!(inner_runs.load(Ordering::SeqCst), 0);
        registry.dispatch("message", json!({"text": "second"})).await;
        assert_eq!(inner_runs.load(Ordering::SeqCst), 1);
    }
}
