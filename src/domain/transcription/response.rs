//! Response-shape normalization
//!
//! The API answers some endpoints with either a bare array or an object
//! wrapping it, and spells identifiers more than one way. These helpers turn
//! raw JSON into the expected shape or report it as malformed.

use serde_json::Value;

/// Key carrying the cursor of the next page
pub const NEXT_PAGE_CURSOR_KEY: &str = "next_page_cursor";

/// Outcome of normalizing a raw response
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<T> {
    Value(T),
    Malformed(Value),
}

impl<T> Normalized<T> {
    pub fn into_result<E>(self, malformed: impl FnOnce(Value) -> E) -> Result<T, E> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Malformed(raw) => Err(malformed(raw)),
        }
    }
}

/// First non-empty string or number under any of `keys`
pub fn resource_id(response: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match response.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Items of a listing response.
///
/// A bare array passes through. For an object the first present key among
/// `keys` must hold an array; no key at all is an empty list.
pub fn item_list(response: &Value, keys: &[&str]) -> Normalized<Vec<Value>> {
    match response {
        Value::Array(items) => Normalized::Value(items.clone()),
        Value::Object(map) => match keys.iter().find_map(|key| map.get(*key)) {
            Some(Value::Array(items)) => Normalized::Value(items.clone()),
            Some(Value::Null) | None => Normalized::Value(Vec::new()),
            Some(_) => Normalized::Malformed(response.clone()),
        },
        _ => Normalized::Malformed(response.clone()),
    }
}

/// Cursor state of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// The page does not use cursors
    Absent,
    /// Cursor paging, and this was the last page
    End,
    Next(String),
}

pub fn next_cursor(response: &Value) -> PageCursor {
    let Some(cursor) = response.as_object().and_then(|m| m.get(NEXT_PAGE_CURSOR_KEY)) else {
        return PageCursor::Absent;
    };

    match cursor {
        Value::String(s) if !s.is_empty() => PageCursor::Next(s.clone()),
        _ => PageCursor::End,
    }
}
