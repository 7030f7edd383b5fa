//! Download helper for files fetched with `getFile`.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::{Stream, StreamExt};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::Bot;
use crate::utils::errors::TelegramError;

impl Bot {
    /// Start downloading a file. `file_obj` must carry the `file_path`
    /// returned by `getFile`.
    ///
    /// ```no_run
    /// # async fn demo(bot: botloop::Bot, doc: serde_json::Value) -> anyhow::Result<()> {
    /// use serde_json::json;
    ///
    /// let file = bot
    ///     .call("getFile", json!({"file_id": doc["file_id"]}))
    ///     .catch_errors(false)
    ///     .await?;
    /// let bytes = bot.download(&file)?.as_bytes().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn download(&self, file_obj: &Value) -> Result<Download, TelegramError> {
        let client = self.client()?;
        let file_path = file_obj
            .get("file_path")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                TelegramError::InvalidParams(
                    "'file_path' is missing from the file object; fetch it with 'getFile' first"
                        .to_string(),
                )
            })?;
        Ok(Download {
            client,
            url: format!("{}/{}", self.inner.file_url, file_path),
        })
    }
}

/// A pending download; pick a terminal operation to run it.
#[derive(Debug)]
pub struct Download {
    client: reqwest::Client,
    url: String,
}

impl Download {
    fn remote_filename(&self) -> String {
        self.url
            .rsplit('/')
            .next()
            .unwrap_or("file")
            .split('?')
            .next()
            .unwrap_or("file")
            .to_string()
    }

    async fn response(self) -> Result<reqwest::Response, TelegramError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TelegramError::Network {
                method: "downloadFile".to_string(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(TelegramError::from_response(
                "downloadFile",
                status.as_u16(),
                &body,
                &url,
            ));
        }
        Ok(response)
    }

    /// Collect the whole file into memory.
    pub async fn as_bytes(self) -> Result<Vec<u8>, TelegramError> {
        let response = self.response().await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| TelegramError::Network {
                method: "downloadFile".to_string(),
                source: e,
            })
    }

    /// Collect the file as UTF-8 text.
    pub async fn as_text(self) -> Result<String, TelegramError> {
        let bytes = self.as_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Collect the file and encode it as standard base64.
    pub async fn as_base64(self) -> Result<String, TelegramError> {
        Ok(BASE64.encode(self.as_bytes().await?))
    }

    /// Stream the file to disk. When `dest` is a directory the remote
    /// filename is appended; an existing destination is only replaced with
    /// `overwrite`.
    pub async fn as_file(
        self,
        dest: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<PathBuf, TelegramError> {
        let mut path = dest.as_ref().to_path_buf();
        if path.is_dir() {
            path.push(self.remote_filename());
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(TelegramError::FileProcessing(format!(
                    "destination directory '{}' was not found",
                    parent.display()
                )));
            }
        }
        if path.exists() && !overwrite {
            return Err(TelegramError::FileProcessing(format!(
                "'{}' already exists and overwriting is not allowed",
                path.display()
            )));
        }

        let response = self.response().await?;
        let mut file = tokio::fs::File::create(&path).await.map_err(|e| {
            TelegramError::FileProcessing(format!("could not create '{}': {e}", path.display()))
        })?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TelegramError::Network {
                method: "downloadFile".to_string(),
                source: e,
            })?;
            file.write_all(&chunk).await.map_err(|e| {
                TelegramError::FileProcessing(format!("could not write '{}': {e}", path.display()))
            })?;
        }
        file.flush().await.map_err(|e| {
            TelegramError::FileProcessing(format!("could not flush '{}': {e}", path.display()))
        })?;
        debug!("downloaded '{}'", path.display());
        Ok(path)
    }

    /// Pull-based chunk stream for callers that want to process the file
    /// incrementally.
    pub async fn stream(
        self,
    ) -> Result<impl Stream<Item = Result<Vec<u8>, TelegramError>>, TelegramError> {
        let response = self.response().await?;
        Ok(response.bytes_stream().map(|chunk| {
            chunk
                .map(|b| b.to_vec())
                .map_err(|e| TelegramError::Network {
                    method: "downloadFile".to_string(),
                    source: e,
                })
        }))
    }
}
