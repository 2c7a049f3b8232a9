//! Pagination walker for listing endpoints
//!
//! Drains a paginated collection into one in-memory sequence. The walker
//! starts with `limit`/`offset` paging and switches to `cursor` paging as
//! soon as a page reports a `next_page_cursor` key.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::ports::{ApiError, ApiRequest, HttpMethod, RequestBody, SttApi};
use crate::domain::input::MAX_LIST_LIMIT;
use crate::domain::transcription::{item_list, next_cursor, PageCursor};

/// Items requested per page when collecting everything
pub const PAGE_SIZE: u32 = MAX_LIST_LIMIT;

/// A listing endpoint and the keys its items may live under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListEndpoint {
    pub path: &'static str,
    pub item_keys: &'static [&'static str],
}

impl ListEndpoint {
    pub const FILES: Self = Self {
        path: "/files",
        item_keys: &["files", "items"],
    };

    pub const TRANSCRIPTIONS: Self = Self {
        path: "/transcriptions",
        item_keys: &["transcriptions", "items"],
    };

    pub const MODELS: Self = Self {
        path: "/models",
        item_keys: &["models"],
    };

    /// Items of one response, or a malformed-response error
    pub fn items(&self, response: &Value) -> Result<Vec<Value>, ApiError> {
        item_list(response, self.item_keys).into_result(|raw| ApiError::Malformed {
            context: self.path.to_string(),
            raw,
        })
    }
}

pub struct PaginationWalker<A: SttApi> {
    api: Arc<A>,
    page_size: u32,
}

impl<A: SttApi> PaginationWalker<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, PAGE_SIZE);
        self
    }

    /// Fetch every page of `endpoint`
    pub async fn collect(
        &self,
        method: HttpMethod,
        endpoint: &ListEndpoint,
    ) -> Result<Vec<Value>, ApiError> {
        let mut items = Vec::new();
        let mut offset: u64 = 0;
        let mut cursor: Option<String> = None;

        loop {
            let request = ApiRequest::new(method, endpoint.path, RequestBody::Empty)
                .with_query("limit", self.page_size);
            let request = match &cursor {
                Some(c) => request.with_query("cursor", c),
                None => request.with_query("offset", offset),
            };

            let page = self.api.request(request).await?;
            let page_items = endpoint.items(&page)?;
            let count = page_items.len();
            items.extend(page_items);
            debug!(path = endpoint.path, count, total = items.len(), "Fetched page");

            match next_cursor(&page) {
                PageCursor::Next(next) => {
                    if cursor.as_deref() == Some(next.as_str()) {
                        warn!(path = endpoint.path, cursor = %next, "Cursor did not advance, stopping");
                        break;
                    }
                    cursor = Some(next);
                }
                PageCursor::End => break,
                // A cursor-paged listing that drops the key has ended too.
                PageCursor::Absent if cursor.is_some() => break,
                PageCursor::Absent => {
                    if count == 0 {
                        break;
                    }
                    offset += u64::from(self.page_size);
                }
            }
        }

        Ok(items)
    }

    /// Fetch a single page of at most `limit` items, capped at `PAGE_SIZE`
    pub async fn fetch_page(
        &self,
        endpoint: &ListEndpoint,
        limit: u32,
    ) -> Result<Vec<Value>, ApiError> {
        let limit = limit.clamp(1, PAGE_SIZE);
        let page = self
            .api
            .request(ApiRequest::get(endpoint.path).with_query("limit", limit))
            .await?;
        endpoint.items(&page)
    }
}
