//! File staging: resolve file-bearing parameters into multipart parts and
//! `attach://` references.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::utils::errors::TelegramError;

/// One multipart part ready for upload.
#[derive(Debug)]
pub(crate) struct FilePart {
    pub(crate) filename: String,
    pub(crate) bytes: Vec<u8>,
    pub(crate) mime: String,
}

/// Raw bytes supplied through the call builder for a file-bearing param.
pub(crate) struct Attachment {
    pub(crate) filename: Option<String>,
    pub(crate) bytes: Vec<u8>,
}

/// The adjusted parameter map plus the parts to upload, in insertion order.
#[derive(Debug)]
pub(crate) struct StagedRequest {
    pub(crate) params: Map<String, Value>,
    pub(crate) parts: Vec<(String, FilePart)>,
}

enum Resolved {
    Part { filename: String, bytes: Vec<u8> },
    /// Telegram file_id, URL, or anything else to forward untouched.
    PassThrough,
}

/// Resolve every file-bearing and media-bearing parameter. Direct file
/// params become parts named after the param; files nested in media items
/// become sequential `file_<n>` parts. Param values are rewritten to
/// `attach://<part>` references and mutated media values are re-serialized
/// as compact JSON.
pub(crate) async fn stage_files(
    mut params: Map<String, Value>,
    file_params: &[String],
    media_params: &[(String, Vec<String>)],
    mut attachments: HashMap<String, Attachment>,
) -> Result<StagedRequest, TelegramError> {
    let mut parts: Vec<(String, FilePart)> = Vec::new();

    for key in file_params {
        if let Some(attachment) = attachments.remove(key) {
            let filename = attachment.filename.unwrap_or_else(random_token);
            let mime = guess_mime(&filename);
            params.insert(key.clone(), Value::String(format!("attach://{key}")));
            parts.push((
                key.clone(),
                FilePart {
                    filename,
                    bytes: attachment.bytes,
                    mime,
                },
            ));
            continue;
        }
        let Some(value) = params.get(key) else { continue };
        match resolve_value(value).await? {
            Resolved::Part { filename, bytes } => {
                let mime = guess_mime(&filename);
                params.insert(key.clone(), Value::String(format!("attach://{key}")));
                parts.push((key.clone(), FilePart { filename, bytes, mime }));
            }
            Resolved::PassThrough => {}
        }
    }

    let mut media_index = 0usize;
    for (key, fields) in media_params {
        let Some(value) = params.remove(key) else { continue };
        let (mut items, single) = match value {
            Value::Array(items) => (items, false),
            item @ Value::Object(_) => (vec![item], true),
            other => {
                return Err(TelegramError::FileProcessing(format!(
                    "media parameter '{key}' must be an object or a list, got {}",
                    kind_of(&other)
                )))
            }
        };

        for item in &mut items {
            let Some(media) = item.as_object_mut() else {
                return Err(TelegramError::FileProcessing(format!(
                    "media items in '{key}' must be objects"
                )));
            };
            for field in fields {
                let Some(field_value) = media.get(field) else { continue };
                match resolve_value(field_value).await? {
                    Resolved::Part { filename, bytes } => {
                        let part_name = format!("file_{media_index}");
                        media_index += 1;
                        let mime = guess_mime(&filename);
                        media.insert(
                            field.clone(),
                            Value::String(format!("attach://{part_name}")),
                        );
                        parts.push((part_name, FilePart { filename, bytes, mime }));
                    }
                    Resolved::PassThrough => {}
                }
            }
        }

        let rebuilt = if single {
            items.into_iter().next().unwrap_or(Value::Null)
        } else {
            Value::Array(items)
        };
        let serialized = serde_json::to_string(&rebuilt).map_err(|e| {
            TelegramError::InvalidParams(format!("could not serialize media parameter '{key}': {e}"))
        })?;
        params.insert(key.clone(), Value::String(serialized));
    }

    if !attachments.is_empty() {
        let leftovers: Vec<&String> = attachments.keys().collect();
        return Err(TelegramError::FileProcessing(format!(
            "byte attachments {leftovers:?} do not correspond to any declared file parameter"
        )));
    }

    Ok(StagedRequest { params, parts })
}

/// Resolve one file-bearing value per the accepted forms: a string naming
/// an existing local file is read from disk, a `{filename, content}` object
/// overrides the filename, anything else passes through (file_id or URL).
async fn resolve_value(value: &Value) -> Result<Resolved, TelegramError> {
    match value {
        Value::String(text) => read_if_local(text, None).await,
        Value::Object(map) => {
            let (Some(filename), Some(content)) = (map.get("filename"), map.get("content")) else {
                return Ok(Resolved::PassThrough);
            };
            let Some(filename) = filename.as_str() else {
                return Err(TelegramError::FileProcessing(
                    "'filename' must be a string".to_string(),
                ));
            };
            match content {
                Value::String(text) => read_if_local(text, Some(filename.to_string())).await,
                other => Err(TelegramError::FileProcessing(format!(
                    "'content' must be a path string, got {}",
                    kind_of(other)
                ))),
            }
        }
        _ => Ok(Resolved::PassThrough),
    }
}

async fn read_if_local(text: &str, filename: Option<String>) -> Result<Resolved, TelegramError> {
    let path = Path::new(text);
    if !path.is_file() {
        return Ok(Resolved::PassThrough);
    }
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| TelegramError::FileProcessing(format!("could not read '{text}': {e}")))?;
    let filename = filename.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(random_token)
    });
    Ok(Resolved::Part { filename, bytes })
}

/// URL-safe random filename for raw byte uploads without an explicit name.
pub(crate) fn random_token() -> String {
    use rand::Rng;

    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn guess_mime(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
