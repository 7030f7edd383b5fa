//! Dispatch scenarios driven through the public `process_update` entry
//! point: cooperative UNHANDLED chains and temporary conversations.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use botloop::filters::{chat_ids, commands};
use botloop::{ctx_handler, handler, Flow, Step, WaitForOptions};
use serde_json::json;
use wiremock::MockServer;

use common::{test_bot, wait_until};

fn message_update(update_id: i64, chat_id: i64, text: &str) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "message": {
            "chat": {"id": chat_id, "type": "private"},
            "text": text,
        }
    })
}

fn command_update(update_id: i64, chat_id: i64, cmd: &str) -> serde_json::Value {
    json!({
        "update_id": update_id,
        "message": {
            "chat": {"id": chat_id, "type": "private"},
            "text": cmd,
            "entities": [{"type": "bot_command", "offset": 0, "length": cmd.len()}],
        }
    })
}

/// S2: two catch-all handlers; the first declines with UNHANDLED, the
/// second consumes. Exactly one dispatch cycle.
#[tokio::test]
async fn unhandled_chain_runs_both_handlers_once() {
    let server = MockServer::start().await;
    let bot = test_bot(&server);
    let order = Arc::new(Mutex::new(Vec::<&'static str>::new()));

    let record = order.clone();
    bot.event()
        .on(
            "message",
            vec![],
            handler(move |_msg| {
                let record = record.clone();
                async move {
                    record.lock().unwrap().push("h1");
                    Ok(Flow::Unhandled)
                }
            }),
        )
        .unwrap();
    let record = order.clone();
    bot.event()
        .on(
            "message",
            vec![],
            handler(move |_msg| {
                let record = record.clone();
                async move {
                    record.lock().unwrap().push("h2");
                    Ok(Flow::Handled)
                }
            }),
        )
        .unwrap();

    bot.process_update(message_update(1, 10, "hello"));
    wait_until(Duration::from_secs(2), || order.lock().unwrap().len() == 2).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(*order.lock().unwrap(), vec!["h1", "h2"]);
}

/// S3: a temporary conversation guarded by chat id. Updates from another
/// chat fall through to the permanent handler; the `/done` command from
/// the right chat runs the step with its context and retires the handler.
#[tokio::test]
async fn temporary_conversation_with_shared_filter_and_context() {
    let server = MockServer::start().await;
    let bot = test_bot(&server);

    let fallback_runs = Arc::new(AtomicUsize::new(0));
    let answered = Arc::new(Mutex::new(None::<i64>));

    let fallback = fallback_runs.clone();
    bot.event()
        .on(
            "message",
            vec![],
            handler(move |_msg| {
                let fallback = fallback.clone();
                async move {
                    fallback.fetch_add(1, Ordering::SeqCst);
                    Ok(Flow::Handled)
                }
            }),
        )
        .unwrap();

    let answer_log = answered.clone();
    let answer = ctx_handler(move |_msg, context| {
        let answer_log = answer_log.clone();
        async move {
            let context = context.expect("context bound at registration");
            let step = context.read().await["step"].as_i64().unwrap();
            *answer_log.lock().unwrap() = Some(step);
            Ok(Flow::Handled)
        }
    });
    bot.event()
        .wait_for(
            "message",
            vec![chat_ids(&[100])],
            vec![Step::new(answer, vec![commands(&["done"])])],
            WaitForOptions {
                context: Some(json!({"step": 0})),
                timeout: None,
            },
        )
        .unwrap();

    // From chat 200: the shared filter fails, the permanent handler runs.
    bot.process_update(message_update(1, 200, "hi"));
    wait_until(Duration::from_secs(2), || {
        fallback_runs.load(Ordering::SeqCst) == 1
    })
    .await;
    assert!(answered.lock().unwrap().is_none());

    // "/done" from chat 100: the step runs with the context and the
    // temporary handler is gone afterwards.
    bot.process_update(command_update(2, 100, "/done"));
    wait_until(Duration::from_secs(2), || answered.lock().unwrap().is_some()).await;
    assert_eq!(*answered.lock().unwrap(), Some(0));

    // Another "/done" from chat 100 now reaches the permanent handler.
    bot.process_update(command_update(3, 100, "/done"));
    wait_until(Duration::from_secs(2), || {
        fallback_runs.load(Ordering::SeqCst) == 2
    })
    .await;
}

/// Updates are dropped once a filter chain fails; later updates still
/// dispatch normally.
#[tokio::test]
async fn non_matching_updates_do_not_stick() {
    let server = MockServer::start().await;
    let bot = test_bot(&server);
    let pings = Arc::new(AtomicUsize::new(0));

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

    bot.process_update(message_update(1, 10, "not a command"));
    bot.process_update(command_update(2, 10, "/ping"));
    wait_until(Duration::from_secs(2), || pings.load(Ordering::SeqCst) == 1).await;
}
