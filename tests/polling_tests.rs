//! Polling driver scenarios: offset management, allowed_updates
//! derivation, lifecycle events, critical errors and the restart signal.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use botloop::filters::commands;
use botloop::{handler, ExitCode, Flow};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{bot_path, test_bot, wait_until};

fn updates_body(updates: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": updates}))
}

async fn wait_for_request_containing(server: &MockServer, needle: &str) {
    let deadline = std::time::Instant::now() + Duration::from_secs(3);
    loop {
        let seen = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .any(|r| String::from_utf8_lossy(&r.body).contains(needle));
        if seen {
            return;
        }
        assert!(
            std::time::Instant::now() < deadline,
            "no request containing '{needle}' arrived in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// S1: one `/ping` update is fetched and dispatched to the matching
/// handler; the next fetch acknowledges it with offset=11.
#[tokio::test]
async fn poll_and_dispatch_advances_the_offset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .and(body_string_contains("offset=0&"))
        .respond_with(updates_body(json!([{
            "update_id": 10,
            "message": {
                "chat": {"id": 1, "type": "private"},
                "text": "/ping",
                "entities": [{"type": "bot_command", "offset": 0, "length": 5}]
            }
        }])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .respond_with(updates_body(json!([])))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    let pings = Arc::new(AtomicUsize::new(0));
    let exit_seen = Arc::new(Mutex::new(None::<i32>));

    let counter = pings.clone();
    bot.event()
        .on(
            "message",
            vec![commands(&["ping"])],
            handler(move |_msg| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Flow::Handled)
                }
            }),
        )
        .unwrap();
    let exit_slot = exit_seen.clone();
    bot.event()
        .on_shutdown(move |code| {
            let exit_slot = exit_slot.clone();
            async move {
                *exit_slot.lock().unwrap() = Some(code.code());
                Ok(Flow::Handled)
            }
        })
        .unwrap();

    let runner = {
        let bot = bot.clone();
        tokio::spawn(async move { bot.start_polling(false).await })
    };

    wait_until(Duration::from_secs(3), || pings.load(Ordering::SeqCst) == 1).await;
    wait_for_request_containing(&server, "offset=11&").await;

    bot.stop();
    let code = runner.await.unwrap();
    assert_eq!(code, ExitCode::TerminatedByUser);
    assert_eq!(*exit_seen.lock().unwrap(), Some(0));
    assert_eq!(pings.load(Ordering::SeqCst), 1, "the handler ran exactly once");
}

/// P1: allowed_updates reflects exactly the registered categories.
#[tokio::test]
async fn allowed_updates_lists_registered_categories() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .respond_with(updates_body(json!([])))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    bot.event()
        .on("message", vec![], handler(|_msg| async { Ok(Flow::Handled) }))
        .unwrap();
    bot.event()
        .on("callback_query", vec![], handler(|_q| async { Ok(Flow::Handled) }))
        .unwrap();

    let runner = {
        let bot = bot.clone();
        tokio::spawn(async move { bot.start_polling(false).await })
    };

    // ["callback_query","message"], urlencoded.
    wait_for_request_containing(
        &server,
        "allowed_updates=%5B%22callback_query%22%2C%22message%22%5D",
    )
    .await;

    bot.stop();
    runner.await.unwrap();
}

/// Pending updates are skipped with offset=-1 and acknowledged past the
/// newest update_id.
#[tokio::test]
async fn drop_pending_updates_skips_the_backlog() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .and(body_string_contains("offset=-1"))
        .respond_with(updates_body(json!([
            {"update_id": 40, "message": {"text": "old"}},
            {"update_id": 41, "message": {"text": "older"}}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .respond_with(updates_body(json!([])))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    let handled = Arc::new(AtomicUsize::new(0));
    let counter = handled.clone();
    bot.event()
        .on(
            "message",
            vec![],
            handler(move |_msg| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Flow::Handled)
                }
            }),
        )
        .unwrap();

    let runner = {
        let bot = bot.clone();
        tokio::spawn(async move { bot.start_polling(true).await })
    };

    wait_for_request_containing(&server, "offset=42&").await;
    bot.stop();
    runner.await.unwrap();

    assert_eq!(
        handled.load(Ordering::SeqCst),
        0,
        "dropped updates are never dispatched"
    );
}

/// S5: a 409 on the fetch aborts polling with exit code 3, and the
/// shutdown handler sees it.
#[tokio::test]
async fn conflict_on_fetch_is_critical() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "ok": false,
            "description": "terminated by other getUpdates request"
        })))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    let exit_seen = Arc::new(Mutex::new(None::<i32>));
    let exit_slot = exit_seen.clone();
    bot.event()
        .on_shutdown(move |code| {
            let exit_slot = exit_slot.clone();
            async move {
                *exit_slot.lock().unwrap() = Some(code.code());
                Ok(Flow::Handled)
            }
        })
        .unwrap();

    let code = bot.start_polling(false).await;
    assert_eq!(code, ExitCode::CriticalTelegramError);
    assert_eq!(*exit_seen.lock().unwrap(), Some(3));
}

/// S6: a handler returning Restart finishes the batch, acknowledges the
/// offset, and resolves with exit code 1 (the exec-replace is disabled in
/// the test config).
#[tokio::test]
async fn restart_signal_shuts_down_with_code_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .and(body_string_contains("offset=0&"))
        .respond_with(updates_body(json!([{
            "update_id": 21,
            "message": {"text": "boom"}
        }])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .respond_with(updates_body(json!([])))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    let exit_seen = Arc::new(Mutex::new(None::<i32>));

    bot.event()
        .on("message", vec![], handler(|_msg| async { Ok(Flow::Restart) }))
        .unwrap();
    let exit_slot = exit_seen.clone();
    bot.event()
        .on_shutdown(move |code| {
            let exit_slot = exit_slot.clone();
            async move {
                *exit_slot.lock().unwrap() = Some(code.code());
                Ok(Flow::Handled)
            }
        })
        .unwrap();

    let runner = {
        let bot = bot.clone();
        tokio::spawn(async move { bot.start_polling(false).await })
    };

    let code = tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .expect("driver noticed the restart request")
        .unwrap();
    assert_eq!(code, ExitCode::Restart);
    assert_eq!(*exit_seen.lock().unwrap(), Some(1));

    // The processed batch was acknowledged before shutting down.
    wait_for_request_containing(&server, "offset=22").await;
}

/// Registration is refused once polling has locked the registry.
#[tokio::test]
async fn late_registration_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .respond_with(updates_body(json!([])))
        .mount(&server)
        .await;

    let bot = test_bot(&server);
    bot.event()
        .on("message", vec![], handler(|_msg| async { Ok(Flow::Handled) }))
        .unwrap();

    let runner = {
        let bot = bot.clone();
        tokio::spawn(async move { bot.start_polling(false).await })
    };
    wait_until(Duration::from_secs(2), || bot.is_ready()).await;

    let result = bot
        .event()
        .on("message", vec![], handler(|_msg| async { Ok(Flow::Handled) }));
    assert!(result.is_err(), "the permanent registry is locked while polling");

    // Temporary handlers stay available for the bot's whole lifetime.
    bot.event()
        .wait_for(
            "message",
            vec![],
            vec![botloop::Step::new(
                handler(|_msg| async { Ok(Flow::Handled) }),
                vec![],
            )],
            botloop::WaitForOptions::default(),
        )
        .unwrap();

    bot.stop();
    runner.await.unwrap();
}
