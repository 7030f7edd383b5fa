//! Filter generators: small constructors that bake their arguments into a
//! reusable predicate.
//!
//! All generators panic when called with an empty argument list; an empty
//! filter would silently match nothing.

use regex::Regex;
use serde_json::Value;

use super::{filter_fn, BoxFilter};

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// True if any of `keys` is present in the payload.
pub fn any_keys(keys: &[&str]) -> BoxFilter {
    assert!(!keys.is_empty(), "any_keys needs at least one key");
    let keys = owned(keys);
    filter_fn(move |obj| keys.iter().any(|k| obj.get(k).is_some()))
}

/// True if all of `keys` are present in the payload.
pub fn all_keys(keys: &[&str]) -> BoxFilter {
    assert!(!keys.is_empty(), "all_keys needs at least one key");
    let keys = owned(keys);
    filter_fn(move |obj| keys.iter().all(|k| obj.get(k).is_some()))
}

/// True if `key_sequence` is found nested in the payload, e.g.
/// `sub_keys(&["chat", "is_forum"])`. Checks presence only, not values,
/// which suits flags that are always `true` when present.
pub fn sub_keys(key_sequence: &[&str]) -> BoxFilter {
    assert!(!key_sequence.is_empty(), "sub_keys needs at least one key");
    let keys = owned(key_sequence);
    filter_fn(move |obj| {
        let mut current = obj;
        for key in &keys {
            match current.get(key) {
                Some(next) => current = next,
                None => return false,
            }
        }
        true
    })
}

fn regex_over(patterns: &[&str], key: &'static str) -> BoxFilter {
    assert!(!patterns.is_empty(), "regex needs at least one pattern");
    let pattern = Regex::new(&patterns.join("|")).expect("invalid regex pattern");
    filter_fn(move |obj| {
        let text = obj.get(key).and_then(Value::as_str).unwrap_or("");
        pattern.is_match(text)
    })
}

/// True if any pattern matches the message text.
///
/// # Panics
/// When a pattern fails to compile.
pub fn regex(patterns: &[&str]) -> BoxFilter {
    regex_over(patterns, "text")
}

/// Like [`regex`] but over the caption.
pub fn regex_caption(patterns: &[&str]) -> BoxFilter {
    regex_over(patterns, "caption")
}

fn startswith_over(substrings: &[&str], key: &'static str) -> BoxFilter {
    assert!(!substrings.is_empty(), "text_startswith needs at least one substring");
    let substrings = owned(substrings);
    filter_fn(move |obj| {
        let text = obj.get(key).and_then(Value::as_str).unwrap_or("");
        substrings.iter().any(|s| text.starts_with(s.as_str()))
    })
}

/// True if the message text starts with any of `substrings`.
pub fn text_startswith(substrings: &[&str]) -> BoxFilter {
    startswith_over(substrings, "text")
}

/// Like [`text_startswith`] but over the caption.
pub fn caption_startswith(substrings: &[&str]) -> BoxFilter {
    startswith_over(substrings, "caption")
}

fn commands_over(cmds: &[&str], text_key: &'static str, entities_key: &'static str) -> BoxFilter {
    assert!(!cmds.is_empty(), "commands needs at least one command");
    let cmds: Vec<String> = cmds
        .iter()
        .map(|c| c.trim_start_matches('/').to_string())
        .collect();
    filter_fn(move |obj| {
        let entities = match obj.get(entities_key).and_then(Value::as_array) {
            Some(entities) => entities,
            None => return false,
        };
        let text = obj.get(text_key).and_then(Value::as_str).unwrap_or("");
        for entity in entities {
            let is_command = entity.get("type").and_then(Value::as_str) == Some("bot_command")
                && entity.get("offset").and_then(Value::as_i64) == Some(0);
            if !is_command {
                continue;
            }
            let length = entity
                .get("length")
                .and_then(Value::as_i64)
                .unwrap_or(0)
                .max(0) as usize;
            // The token between '/' and an optional '@botname' suffix.
            let token: String = text.chars().take(length).skip(1).collect();
            let command = token.split('@').next().unwrap_or("");
            if cmds.iter().any(|c| c == command) {
                return true;
            }
        }
        false
    })
}

/// True if the message carries one of `cmds` as a bot command (an entity of
/// type `bot_command` at offset 0). Leading slashes in `cmds` are optional.
pub fn commands(cmds: &[&str]) -> BoxFilter {
    commands_over(cmds, "text", "entities")
}

/// Like [`commands`] but over the caption entities.
pub fn caption_commands(cmds: &[&str]) -> BoxFilter {
    commands_over(cmds, "caption", "caption_entities")
}

/// True if `payload.chat.id` is one of `ids`.
pub fn chat_ids(ids: &[i64]) -> BoxFilter {
    assert!(!ids.is_empty(), "chat_ids needs at least one id");
    let ids = ids.to_vec();
    filter_fn(move |obj| {
        obj.get("chat")
            .and_then(|c| c.get("id"))
            .and_then(Value::as_i64)
            .is_some_and(|id| ids.contains(&id))
    })
}

/// True if `payload.chat.type` is one of `types` ("private", "group",
/// "supergroup", "channel").
pub fn chat_types(types: &[&str]) -> BoxFilter {
    assert!(!types.is_empty(), "chat_types needs at least one type");
    let types = owned(types);
    filter_fn(move |obj| {
        obj.get("chat")
            .and_then(|c| c.get("type"))
            .and_then(Value::as_str)
            .is_some_and(|t| types.iter().any(|wanted| wanted == t))
    })
}

/// True if `payload.from.id` is one of `ids`.
pub fn from_users(ids: &[i64]) -> BoxFilter {
    assert!(!ids.is_empty(), "from_users needs at least one id");
    let ids = ids.to_vec();
    filter_fn(move |obj| {
        obj.get("from")
            .and_then(|f| f.get("id"))
            .and_then(Value::as_i64)
            .is_some_and(|id| ids.contains(&id))
    })
}

/// For `callback_query` updates: true if `payload.data` equals one of
/// `data`.
pub fn callback_data(data: &[&str]) -> BoxFilter {
    assert!(!data.is_empty(), "callback_data needs at least one value");
    let data = owned(data);
    filter_fn(move |obj| {
        obj.get("data")
            .and_then(Value::as_str)
            .is_some_and(|d| data.iter().any(|wanted| wanted == d))
    })
}

/// For `callback_query` updates: true if `payload.data` starts with any of
/// `prefixes`.
pub fn callback_data_startswith(prefixes: &[&str]) -> BoxFilter {
    assert!(!prefixes.is_empty(), "callback_data_startswith needs at least one prefix");
    let prefixes = owned(prefixes);
    filter_fn(move |obj| {
        obj.get("data")
            .and_then(Value::as_str)
            .is_some_and(|d| prefixes.iter().any(|p| d.starts_with(p.as_str())))
    })
}
