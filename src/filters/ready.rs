//! Ready-made presence filters for common message shapes.

use super::{any_keys, BoxFilter};

/// True if "text" is present.
pub fn is_text() -> BoxFilter {
    any_keys(&["text"])
}

/// True if "caption" is present.
pub fn has_caption() -> BoxFilter {
    any_keys(&["caption"])
}

/// True if either "text" or "caption" is present.
pub fn contains_text() -> BoxFilter {
    any_keys(&["text", "caption"])
}

/// True if the message replies to another message.
pub fn is_reply() -> BoxFilter {
    any_keys(&["reply_to_message"])
}

/// True if the media is covered by a spoiler animation.
pub fn has_media_spoiler() -> BoxFilter {
    any_keys(&["has_media_spoiler"])
}

pub fn is_animation() -> BoxFilter {
    any_keys(&["animation"])
}

pub fn is_audio() -> BoxFilter {
    any_keys(&["audio"])
}

pub fn is_document() -> BoxFilter {
    any_keys(&["document"])
}

pub fn is_paid_media() -> BoxFilter {
    any_keys(&["paid_media"])
}

pub fn is_photo() -> BoxFilter {
    any_keys(&["photo"])
}

pub fn is_sticker() -> BoxFilter {
    any_keys(&["sticker"])
}

pub fn is_story() -> BoxFilter {
    any_keys(&["story"])
}

pub fn is_video() -> BoxFilter {
    any_keys(&["video"])
}

pub fn is_video_note() -> BoxFilter {
    any_keys(&["video_note"])
}

pub fn is_voice() -> BoxFilter {
    any_keys(&["voice"])
}

pub fn is_contact() -> BoxFilter {
    any_keys(&["contact"])
}

pub fn is_dice() -> BoxFilter {
    any_keys(&["dice"])
}

pub fn is_game() -> BoxFilter {
    any_keys(&["game"])
}

pub fn is_poll() -> BoxFilter {
    any_keys(&["poll"])
}

pub fn is_venue() -> BoxFilter {
    any_keys(&["venue"])
}

pub fn is_location() -> BoxFilter {
    any_keys(&["location"])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::filters::Filter;

    #[test]
    fn presence_filters_look_at_the_right_keys() {
        tokio_test::block_on(async {
            let msg = json!({"photo": [{}], "caption": "look"});
            assert!(is_photo().check(&msg).await.unwrap());
            assert!(has_caption().check(&msg).await.unwrap());
            assert!(contains_text().check(&msg).await.unwrap());
            assert!(!is_text().check(&msg).await.unwrap());
            assert!(!is_voice().check(&msg).await.unwrap());
        });
    }

    #[test]
    fn flag_and_attachment_filters_look_at_the_right_keys() {
        tokio_test::block_on(async {
            let spoilered = json!({"video": {}, "has_media_spoiler": true});
            assert!(has_media_spoiler().check(&spoilered).await.unwrap());
            assert!(is_video().check(&spoilered).await.unwrap());
            assert!(!has_media_spoiler().check(&json!({"video": {}})).await.unwrap());

            assert!(is_paid_media().check(&json!({"paid_media": {}})).await.unwrap());
            assert!(is_story().check(&json!({"story": {}})).await.unwrap());
            assert!(is_game().check(&json!({"game": {}})).await.unwrap());

            let plain = json!({"text": "hi"});
            assert!(!is_paid_media().check(&plain).await.unwrap());
            assert!(!is_story().check(&plain).await.unwrap());
            assert!(!is_game().check(&plain).await.unwrap());
        });
    }
}
