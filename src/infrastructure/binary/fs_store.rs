//! Filesystem-backed binary store
//!
//! Entry ids are file paths. Inline `data` is standard base64, optionally
//! prefixed with a `data:` URL header.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use futures_util::stream::{self, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::application::ports::{AudioPayload, BinaryError, BinaryStore};
use crate::domain::input::{non_blank, BinaryEntry};

/// Bytes read per stream chunk
const CHUNK_SIZE: usize = 64 * 1024;

pub struct FsBinaryStore {
    chunk_size: usize,
}

impl FsBinaryStore {
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    fn read_error(path: &Path, e: io::Error) -> BinaryError {
        if e.kind() == io::ErrorKind::NotFound {
            BinaryError::NotFound(path.display().to_string())
        } else {
            BinaryError::Read {
                id: path.display().to_string(),
                message: e.to_string(),
            }
        }
    }
}

impl Default for FsBinaryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BinaryStore for FsBinaryStore {
    async fn open_stream(&self, id: &str) -> Result<AudioPayload, BinaryError> {
        let path = PathBuf::from(id);
        let file = File::open(&path)
            .await
            .map_err(|e| Self::read_error(&path, e))?;
        let length = file.metadata().await.ok().map(|m| m.len());
        let chunk_size = self.chunk_size;

        let chunks = stream::try_unfold(file, move |mut file| async move {
            let mut buf = vec![0u8; chunk_size];
            let n = file.read(&mut buf).await?;
            if n == 0 {
                return Ok::<_, io::Error>(None);
            }
            buf.truncate(n);
            Ok(Some((buf, file)))
        });

        Ok(AudioPayload::Stream {
            stream: chunks.boxed(),
            length,
        })
    }

    async fn read_buffer(&self, entry: &BinaryEntry) -> Result<Vec<u8>, BinaryError> {
        if let Some(data) = non_blank(entry.data.as_deref()) {
            return decode_inline(data);
        }

        match non_blank(entry.id.as_deref()) {
            Some(id) => {
                let path = PathBuf::from(id);
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| Self::read_error(&path, e))
            }
            None => Err(BinaryError::Unreadable),
        }
    }
}

fn decode_inline(data: &str) -> Result<Vec<u8>, BinaryError> {
    let payload = match data.split_once(";base64,") {
        Some((header, rest)) if header.starts_with("data:") => rest,
        _ => data,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| BinaryError::Decode(e.to_string()))
}
