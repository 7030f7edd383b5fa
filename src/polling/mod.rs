//! The long-poll driver and the idle driver for webhook-fed setups.

use std::future::IntoFuture;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};

use crate::client::Bot;
use crate::utils::errors::{ExitCode, TelegramError};
use crate::utils::redact_token;

/// Sleep before retrying the fetch after the retry budget is exhausted.
const FETCH_RETRY_PAUSE: Duration = Duration::from_secs(60);
/// Idle drivers wake up this often just to re-check for cancellation.
const IDLE_TICK: Duration = Duration::from_secs(3600);

impl Bot {
    /// Run the bot in long-polling mode until shutdown. Locks the handler
    /// registry, opens the shared HTTP client, fires `startup`, then keeps
    /// fetching updates and feeding them to dispatch while advancing the
    /// acknowledged offset.
    ///
    /// With `drop_pending_updates` everything queued before startup is
    /// skipped. When a handler requests a restart the process re-executes
    /// itself (unless `exec_on_restart` is disabled) after acknowledging
    /// the processed offset.
    pub async fn start_polling(&self, drop_pending_updates: bool) -> ExitCode {
        let exit_code = self.polling_loop(drop_pending_updates).await;
        if exit_code == ExitCode::Restart && self.config().exec_on_restart {
            respawn();
        }
        exit_code
    }

    async fn polling_loop(&self, drop_pending_updates: bool) -> ExitCode {
        self.event().lock_permanent();

        debug!("starting client session");
        if let Err(e) = self.open_client() {
            error!("could not initialize the HTTP client: {e}");
            return ExitCode::UnexpectedError;
        }

        let mut offset: i64 = 0;
        if drop_pending_updates {
            match self
                .call("getUpdates", json!({"offset": -1}))
                .catch_errors(false)
                .await
            {
                Ok(Value::Array(updates)) if !updates.is_empty() => {
                    if let Some(last_id) = updates
                        .last()
                        .and_then(|u| u.get("update_id"))
                        .and_then(Value::as_i64)
                    {
                        offset = last_id + 1;
                        debug!("dropped pending updates");
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(
                    "could not drop pending updates: {}",
                    redact_token(&e.to_string())
                ),
            }
        }

        self.event().emit_startup().await;
        self.gather_pending().await;
        self.inner.is_ready.store(true, Ordering::SeqCst);

        info!("start bot in long polling mode. Press CTRL+C to quit.");
        debug!("allowed updates: {:?}", self.event().allowed_updates());

        let exit_code = loop {
            if self.event().restart_requested() {
                // Acknowledge everything processed so far so the restarted
                // process starts with a clean queue.
                let _ = self
                    .call("getUpdates", json!({"offset": offset, "timeout": 0}))
                    .await;
                info!("restart requested; shutting down with exit_code=1");
                break ExitCode::Restart;
            }

            let fetch = self
                .call("getUpdates", Value::Object(self.poll_params(offset)))
                .catch_errors(false)
                .timeout(self.config().polling_timeout + self.config().default_timeout)
                .into_future();

            let fetched = tokio::select! {
                _ = tokio::signal::ctrl_c() => break ExitCode::TerminatedByUser,
                _ = self.inner.stop.notified() => break ExitCode::TerminatedByUser,
                _ = self.event().restart_notified() => continue,
                fetched = fetch => fetched,
            };

            match fetched {
                Ok(Value::Array(updates)) => {
                    if !updates.is_empty() {
                        debug!("received {} new update(s)", updates.len());
                    }
                    for update in updates {
                        let Some(update_id) =
                            update.get("update_id").and_then(Value::as_i64)
                        else {
                            warn!("update without update_id; skipped");
                            continue;
                        };
                        self.process_update(update);
                        offset = update_id + 1;
                    }
                }
                Ok(_) => {}
                Err(TelegramError::MaxRetriesExceeded { .. }) => {
                    error!(
                        "failed to get updates; check your internet connection. Retrying in {} seconds...",
                        FETCH_RETRY_PAUSE.as_secs()
                    );
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => break ExitCode::TerminatedByUser,
                        _ = self.inner.stop.notified() => break ExitCode::TerminatedByUser,
                        _ = tokio::time::sleep(FETCH_RETRY_PAUSE) => {}
                    }
                }
                Err(e) if e.critical() => {
                    // Already logged by the pipeline; 401/409 on the fetch
                    // means polling cannot continue.
                    error!("critical Telegram error on getUpdates; shutting down with exit_code=3");
                    break ExitCode::CriticalTelegramError;
                }
                Err(e) if e.is_api_error() => {
                    error!(
                        "failed to get updates due to an unexpected Telegram API error: {}",
                        redact_token(&e.to_string())
                    );
                    break ExitCode::UnexpectedTelegramError;
                }
                Err(e) => {
                    error!(
                        "an unexpected error occurred while getting updates: {}",
                        redact_token(&e.to_string())
                    );
                    break ExitCode::UnexpectedError;
                }
            }
        };

        info!("shutting down with exit_code={exit_code}");
        self.event().emit_shutdown(exit_code).await;
        self.gather_pending().await;
        self.inner.is_ready.store(false, Ordering::SeqCst);
        self.close_client();
        debug!("closed client session");
        exit_code
    }

    fn poll_params(&self, offset: i64) -> Map<String, Value> {
        let config = self.config();
        let mut params = Map::new();
        params.insert("offset".to_string(), json!(offset));
        params.insert("timeout".to_string(), json!(config.polling_timeout));
        if let Some(limit) = config.update_limit {
            params.insert("limit".to_string(), json!(limit));
        }
        params.insert(
            "allowed_updates".to_string(),
            json!(self.event().allowed_updates()),
        );
        params
    }

    /// Run the bot in idle mode for webhook-hosted setups: open the client,
    /// fire `startup`, then wait for updates fed through
    /// [`Bot::process_update`] until cancellation.
    pub async fn start_idle(&self) -> ExitCode {
        debug!("starting client session");
        if let Err(e) = self.open_client() {
            error!("could not initialize the HTTP client: {e}");
            return ExitCode::UnexpectedError;
        }

        self.event().emit_startup().await;
        self.gather_pending().await;
        self.inner.is_ready.store(true, Ordering::SeqCst);

        info!("start bot in idle mode. Press CTRL+C to quit.");

        let exit_code = loop {
            if self.event().restart_requested() {
                info!("restart requested; shutting down with exit_code=1");
                break ExitCode::Restart;
            }
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break ExitCode::TerminatedByUser,
                _ = self.inner.stop.notified() => break ExitCode::TerminatedByUser,
                _ = self.event().restart_notified() => continue,
                _ = tokio::time::sleep(IDLE_TICK) => continue,
            }
        };

        info!("shutting down with exit_code={exit_code}");
        self.event().emit_shutdown(exit_code).await;
        self.gather_pending().await;
        self.inner.is_ready.store(false, Ordering::SeqCst);
        self.close_client();
        debug!("closed client session");

        if exit_code == ExitCode::Restart && self.config().exec_on_restart {
            respawn();
        }
        exit_code
    }
}

/// Replace the current process with a fresh copy of itself: same
/// executable, same arguments.
fn respawn() {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            error!("could not determine the current executable for restart: {e}");
            return;
        }
    };
    let args: Vec<std::ffi::OsString> = std::env::args_os().skip(1).collect();
    info!("re-executing {}", exe.display());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = std::process::Command::new(&exe).args(&args).exec();
        // exec only returns on failure.
        error!("could not exec-replace the process: {err}");
    }

    #[cfg(not(unix))]
    {
        match std::process::Command::new(&exe).args(&args).spawn() {
            Ok(_) => std::process::exit(ExitCode::Restart.code()),
            Err(e) => error!("could not respawn the process: {e}"),
        }
    }
}
