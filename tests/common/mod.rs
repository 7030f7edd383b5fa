//! Shared helpers for the integration tests: a bot wired against a wiremock
//! server, plus small utilities for waiting on background work.
#![allow(dead_code)]

use std::time::Duration;

use botloop::{Bot, BotConfig, ExitCode};
use tokio::task::JoinHandle;
use wiremock::MockServer;

/// Well-formed but obviously fake token.
pub const TEST_TOKEN: &str = "123456:TESTTOKENTESTTOKENTESTTOKEN_abc0";

/// A bot pointed at the mock server, with fast timeouts and the restart
/// exec disabled so tests can observe exit codes.
pub fn test_bot(server: &MockServer) -> Bot {
    test_bot_with(server, |_| {})
}

pub fn test_bot_with(server: &MockServer, tweak: impl FnOnce(&mut BotConfig)) -> Bot {
    let mut config = BotConfig::new(TEST_TOKEN);
    config.base_api_url = server.uri();
    config.base_file_url = format!("{}/file", server.uri());
    config.polling_timeout = 0;
    config.default_timeout = 5;
    config.max_timeout = 10;
    config.exec_on_restart = false;
    tweak(&mut config);
    Bot::new(config).expect("test config is valid")
}

/// Spawn `start_idle` and wait until the startup event has fired, so the
/// HTTP client is available for direct calls.
pub async fn started_bot(server: &MockServer) -> (Bot, JoinHandle<ExitCode>) {
    started_bot_with(server, |_| {}).await
}

pub async fn started_bot_with(
    server: &MockServer,
    tweak: impl FnOnce(&mut BotConfig),
) -> (Bot, JoinHandle<ExitCode>) {
    let bot = test_bot_with(server, tweak);
    let runner = {
        let bot = bot.clone();
        tokio::spawn(async move { bot.start_idle().await })
    };
    wait_until(Duration::from_secs(2), || bot.is_ready()).await;
    (bot, runner)
}

/// Poll a condition until it holds or the deadline passes.
pub async fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) {
    let start = std::time::Instant::now();
    while !condition() {
        assert!(
            start.elapsed() < deadline,
            "condition not met within {deadline:?}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// The path every API request for the test token hits, e.g.
/// `bot_path("getUpdates")`.
pub fn bot_path(method: &str) -> String {
    format!("/bot{TEST_TOKEN}/{method}")
}
