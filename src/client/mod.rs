//! The bot handle and the request pipeline.
//!
//! Every API call goes through [`Bot::call`], which hands back a
//! [`MethodCall`] builder; awaiting it runs the full pipeline: client gate,
//! rate-control slot, file staging, form/multipart POST, error
//! classification and retry with backoff, and result conversion.

mod download;
pub(crate) mod files;

use std::collections::HashMap;
use std::future::IntoFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

pub use download::Download;

use crate::config::{BotConfig, ConfigError};
use crate::dispatch::EventRegistry;
use crate::utils::errors::TelegramError;
use crate::utils::{redact_token, update_category};
use files::{stage_files, Attachment, FilePart};

/// The cloud Bot API base; `logOut` always goes here regardless of the
/// configured base URL.
const CLOUD_API_URL: &str = "https://api.telegram.org";

/// A Telegram bot instance. Cheap to clone; all clones share the same
/// registry, HTTP client and rate control.
#[derive(Clone)]
pub struct Bot {
    pub(crate) inner: Arc<BotInner>,
}

pub(crate) struct BotInner {
    pub(crate) config: BotConfig,
    pub(crate) api_url: String,
    pub(crate) file_url: String,
    pub(crate) http: RwLock<Option<reqwest::Client>>,
    pub(crate) request_sem: Arc<Semaphore>,
    pub(crate) handler_sem: Arc<Semaphore>,
    pub(crate) event: EventRegistry,
    pub(crate) tasks: Mutex<Vec<JoinHandle<()>>>,
    pub(crate) stop: Notify,
    pub(crate) is_ready: AtomicBool,
}

impl Bot {
    /// Create a bot from a validated configuration.
    pub fn new(config: BotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let api_url = format!(
            "{}/bot{}",
            config.base_api_url.trim_end_matches('/'),
            config.token
        );
        let file_url = format!(
            "{}/bot{}",
            config.base_file_url.trim_end_matches('/'),
            config.token
        );
        let request_sem = Arc::new(Semaphore::new(config.max_concurrent_requests));
        let handler_sem = Arc::new(Semaphore::new(config.max_concurrent_handlers));
        Ok(Self {
            inner: Arc::new(BotInner {
                config,
                api_url,
                file_url,
                http: RwLock::new(None),
                request_sem,
                handler_sem,
                event: EventRegistry::new(),
                tasks: Mutex::new(Vec::new()),
                stop: Notify::new(),
                is_ready: AtomicBool::new(false),
            }),
        })
    }

    /// Shorthand for `Bot::new(BotConfig::new(token))`.
    pub fn from_token(token: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(BotConfig::new(token))
    }

    /// The handler registry: register permanent handlers with
    /// [`EventRegistry::on`], lifecycle handlers with `on_startup` /
    /// `on_shutdown`, temporary conversations with
    /// [`EventRegistry::wait_for`].
    pub fn event(&self) -> &EventRegistry {
        &self.inner.event
    }

    pub fn config(&self) -> &BotConfig {
        &self.inner.config
    }

    /// True once polling or idling has fired the startup event.
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready.load(Ordering::SeqCst)
    }

    /// Build an API request. `params` must be a JSON object or `Null`.
    ///
    /// ```no_run
    /// # async fn demo(bot: botloop::Bot) -> Result<(), botloop::TelegramError> {
    /// use serde_json::json;
    ///
    /// let me = bot.call("getMe", serde_json::Value::Null).await?;
    /// bot.call("sendMessage", json!({"chat_id": 1, "text": "hi"})).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn call(&self, method: impl Into<String>, params: Value) -> MethodCall {
        MethodCall {
            bot: self.inner.clone(),
            method: method.into(),
            params,
            file_params: Vec::new(),
            media_params: Vec::new(),
            attachments: HashMap::new(),
            timeout: None,
            catch_errors: true,
            convert: None,
        }
    }

    /// Feed one raw update into the dispatch engine. This is the entry
    /// point for webhook-hosted setups; the polling driver uses it too.
    /// Dispatch runs as a background task bounded by the handler semaphore;
    /// submission order is preserved, completion order is not.
    pub fn process_update(&self, update: Value) {
        let Some(category) = update_category(&update).map(str::to_string) else {
            warn!("update without a category key; dropped");
            return;
        };
        let payload = update.get(&category).cloned().unwrap_or(Value::Null);
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            let _permit = inner
                .handler_sem
                .clone()
                .acquire_owned()
                .await
                .expect("handler semaphore closed");
            inner.event.dispatch(&category, payload).await;
        });
        self.inner.track(handle);
    }

    /// Cooperatively stop a running `start_polling` / `start_idle` loop.
    pub fn stop(&self) {
        self.inner.stop.notify_one();
    }

    pub(crate) fn open_client(&self) -> Result<(), TelegramError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            TelegramError::Network {
                method: "clientInit".to_string(),
                source: e,
            }
        })?;
        *self.inner.http.write().expect("http slot poisoned") = Some(client);
        Ok(())
    }

    pub(crate) fn close_client(&self) {
        *self.inner.http.write().expect("http slot poisoned") = None;
    }

    pub(crate) fn client(&self) -> Result<reqwest::Client, TelegramError> {
        self.inner
            .http
            .read()
            .expect("http slot poisoned")
            .clone()
            .ok_or(TelegramError::ClientNotStarted)
    }

    /// Wait for all tracked background tasks (dispatches and spawned
    /// calls) to finish.
    pub(crate) async fn gather_pending(&self) {
        self.inner.gather_pending().await;
    }
}

impl BotInner {
    pub(crate) fn track(&self, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().expect("task list poisoned");
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle);
    }

    pub(crate) async fn gather_pending(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().expect("task list poisoned");
            tasks.drain(..).collect()
        };
        if handles.is_empty() {
            return;
        }
        debug!("waiting for {} pending task(s) to complete", handles.len());
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                if e.is_panic() {
                    error!("a pending task panicked: {e}");
                }
            }
        }
        debug!("all pending tasks completed");
    }
}

type ConvertFn = dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync;

/// A prepared API request. Configure it with the builder methods, then
/// `.await` it (or fire-and-forget with [`MethodCall::spawn`]).
#[must_use = "a MethodCall does nothing until awaited or spawned"]
pub struct MethodCall {
    bot: Arc<BotInner>,
    method: String,
    params: Value,
    file_params: Vec<String>,
    media_params: Vec<(String, Vec<String>)>,
    attachments: HashMap<String, Attachment>,
    timeout: Option<u64>,
    catch_errors: bool,
    convert: Option<Arc<ConvertFn>>,
}

impl MethodCall {
    /// Declare which parameters may carry files (paths, `{filename,
    /// content}` objects, or byte attachments).
    pub fn file_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_params = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declare a media-bearing parameter and the sub-fields of each media
    /// item that may carry files.
    pub fn media_params<I, S>(mut self, param: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_params
            .push((param.into(), fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Attach raw bytes for a file-bearing parameter. The multipart
    /// filename is a random URL-safe token.
    pub fn file_bytes(mut self, param: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.attachments.insert(
            param.into(),
            Attachment {
                filename: None,
                bytes,
            },
        );
        self
    }

    /// Attach raw bytes with an explicit filename.
    pub fn file_named(
        mut self,
        param: impl Into<String>,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.attachments.insert(
            param.into(),
            Attachment {
                filename: Some(filename.into()),
                bytes,
            },
        );
        self
    }

    /// Override the per-call timeout in seconds (still capped by
    /// `max_timeout`).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    /// With `true` (the default) non-critical failures are logged and the
    /// call resolves to `Value::Null`; with `false` they propagate. The
    /// uninitialized-client error always propagates.
    pub fn catch_errors(mut self, catch: bool) -> Self {
        self.catch_errors = catch;
        self
    }

    /// Post-process the `result` payload; a failing converter surfaces as
    /// [`TelegramError::ResultConversion`].
    pub fn convert<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.convert = Some(Arc::new(f));
        self
    }

    /// Run the call as a tracked background task, dropping the result.
    /// Errors follow the `catch_errors` policy (logged either way).
    pub fn spawn(self) {
        let bot = self.bot.clone();
        let handle = tokio::spawn(async move {
            let _ = self.execute().await;
        });
        bot.track(handle);
    }

    async fn execute(self) -> Result<Value, TelegramError> {
        let catch_errors = self.catch_errors;
        let method = self.method.clone();
        match self.run().await {
            Ok(value) => Ok(value),
            Err(e @ TelegramError::ClientNotStarted) => {
                error!("'{method}' failed: {e}");
                Err(e)
            }
            Err(e) => {
                error!("{}", redact_token(&e.to_string()));
                if matches!(e, TelegramError::Conflict { .. }) {
                    warn!(
                        "if this conflict wasn't caused by you, somebody else may have access to \
                         your API token; consider revoking it via @BotFather"
                    );
                }
                if catch_errors {
                    Ok(Value::Null)
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn run(self) -> Result<Value, TelegramError> {
        let client = self
            .bot
            .http
            .read()
            .expect("http slot poisoned")
            .clone()
            .ok_or(TelegramError::ClientNotStarted)?;

        let _permit = self
            .bot
            .request_sem
            .clone()
            .acquire_owned()
            .await
            .expect("request semaphore closed");

        let params = match self.params {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(TelegramError::InvalidParams(format!(
                    "params must be a JSON object, got {}",
                    match other {
                        Value::Array(_) => "an array",
                        Value::String(_) => "a string",
                        Value::Number(_) => "a number",
                        Value::Bool(_) => "a bool",
                        _ => "an unexpected value",
                    }
                )))
            }
        };

        let staged = stage_files(
            params,
            &self.file_params,
            &self.media_params,
            self.attachments,
        )
        .await?;
        let fields = serialize_params(staged.params)?;

        let url = request_url(&self.bot.api_url, &self.bot.config.token, &self.method);

        let config = &self.bot.config;
        let mut timeout = self
            .timeout
            .unwrap_or(config.default_timeout)
            .min(config.max_timeout);
        let mut attempt = 0usize;

        loop {
            if attempt >= config.max_retries {
                return Err(TelegramError::MaxRetriesExceeded {
                    method: self.method.clone(),
                    attempts: config.max_retries,
                });
            }

            let request = if staged.parts.is_empty() {
                client.post(&url).form(&fields)
            } else {
                client
                    .post(&url)
                    .multipart(build_form(&fields, &staged.parts)?)
            };

            let (status, final_url, body) = match send_once(request, timeout).await {
                Ok(response) => response,
                Err(e) => {
                    let wait = 2u64.pow(attempt as u32);
                    warn!(
                        "'{}' transport error: {} - retrying after {wait}s",
                        self.method,
                        redact_token(&e.to_string())
                    );
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                    timeout = (timeout + 10).min(config.max_timeout);
                    attempt += 1;
                    continue;
                }
            };

            if status.is_success() {
                let parsed: Value = serde_json::from_str(&body).map_err(|e| TelegramError::Api {
                    method: self.method.clone(),
                    status: status.as_u16(),
                    description: format!("invalid JSON in response body: {e}"),
                })?;
                if config.log_successful_requests {
                    debug!("'{}' -> HTTP {}: OK", self.method, status.as_u16());
                }
                let result = parsed.get("result").cloned().unwrap_or(Value::Null);
                return match &self.convert {
                    Some(f) => f(result)
                        .map_err(|e| TelegramError::ResultConversion(format!("{e:#}"))),
                    None => Ok(result),
                };
            }

            let err =
                TelegramError::from_response(&self.method, status.as_u16(), &body, &final_url);
            if err.retryable() {
                let wait = err.retry_after().unwrap_or(Duration::from_secs(5));
                warn!(
                    "'{}' -> {} - retrying after {}s",
                    self.method,
                    err,
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
                continue;
            }
            return Err(err);
        }
    }
}

impl IntoFuture for MethodCall {
    type Output = Result<Value, TelegramError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

/// `logOut` must always target the cloud Bot API server, even when a local
/// Bot API server is configured; every other method uses the configured
/// base URL.
fn request_url(api_url: &str, token: &str, method: &str) -> String {
    if method == "logOut" {
        format!("{CLOUD_API_URL}/bot{token}/logOut")
    } else {
        format!("{api_url}/{method}")
    }
}

async fn send_once(
    request: reqwest::RequestBuilder,
    timeout_secs: u64,
) -> Result<(reqwest::StatusCode, String, String), reqwest::Error> {
    let response = request
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await?;
    let status = response.status();
    let final_url = response.url().to_string();
    let body = response.text().await?;
    Ok((status, final_url, body))
}

/// Drop null values and flatten everything into form fields; structured
/// values (objects, arrays) are JSON-stringified compactly.
fn serialize_params(params: Map<String, Value>) -> Result<Vec<(String, String)>, TelegramError> {
    let mut fields = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Null => continue,
            Value::String(s) => fields.push((key, s)),
            Value::Bool(b) => fields.push((key, b.to_string())),
            Value::Number(n) => fields.push((key, n.to_string())),
            structured @ (Value::Array(_) | Value::Object(_)) => {
                let serialized = serde_json::to_string(&structured).map_err(|e| {
                    TelegramError::InvalidParams(format!("could not serialize '{key}': {e}"))
                })?;
                fields.push((key, serialized));
            }
        }
    }
    Ok(fields)
}

fn build_form(
    fields: &[(String, String)],
    parts: &[(String, FilePart)],
) -> Result<reqwest::multipart::Form, TelegramError> {
    let mut form = reqwest::multipart::Form::new();
    for (key, value) in fields {
        form = form.text(key.clone(), value.clone());
    }
    for (name, part) in parts {
        let file_part = reqwest::multipart::Part::bytes(part.bytes.clone())
            .file_name(part.filename.clone())
            .mime_str(&part.mime)
            .map_err(|e| {
                TelegramError::FileProcessing(format!("invalid MIME type '{}': {e}", part.mime))
            })?;
        form = form.part(name.clone(), file_part);
    }
    Ok(form)
}
