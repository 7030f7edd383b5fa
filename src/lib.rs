//! Event-driven Telegram Bot API client.
//!
//! Updates are dynamic JSON maps dispatched to the first matching handler;
//! handlers cooperate through the [`UNHANDLED`] sentinel, short stateful
//! conversations run as temporary one-shot handlers, and every API call
//! goes through a retrying, multipart-capable request pipeline.
//!
//! ```no_run
//! use botloop::{handler, Bot, Flow};
//! use botloop::filters::{chat_types, commands};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     botloop::setup_logging()?;
//!     let bot = Bot::from_token(std::env::var("API_TOKEN")?)?;
//!
//!     let sender = bot.clone();
//!     bot.event().on(
//!         "message",
//!         vec![chat_types(&["private"]), commands(&["ping"])],
//!         handler(move |msg| {
//!             let bot = sender.clone();
//!             async move {
//!                 bot.send_message(json!({
//!                     "chat_id": msg["chat"]["id"],
//!                     "text": "pong",
//!                 }))
//!                 .spawn();
//!                 Ok(Flow::Handled)
//!             }
//!         }),
//!     )?;
//!
//!     std::process::exit(bot.start_polling(false).await.code());
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod filters;
pub mod utils;

mod api;
mod polling;

pub use client::{Bot, Download, MethodCall};
pub use config::{BotConfig, ConfigError};
pub use dispatch::{
    ctx_handler, handler, Context, EventRegistry, Flow, HandlerFn, HandlerResult, RegistryError,
    Step, WaitForOptions, UNHANDLED, UPDATE_CATEGORIES,
};
pub use utils::errors::{ExitCode, TelegramError};
pub use utils::logger::setup_logging;
