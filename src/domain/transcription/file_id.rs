//! Uploaded-file identifier value object

use std::fmt;

use serde::Serialize;

use crate::domain::error::ValidationError;

/// Identifier of a file stored by the API.
///
/// Always in 8-4-4-4-12 hexadecimal form; surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("File ID"));
        }
        if !is_uuid_like(trimmed) {
            return Err(ValidationError::InvalidFileId {
                input: input.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parse an optional parameter, treating absence like an empty value
    pub fn parse_opt(input: Option<&str>) -> Result<Self, ValidationError> {
        Self::parse(input.unwrap_or_default())
    }

    /// Wrap an identifier issued by the API itself
    pub fn from_api(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_uuid_like(s: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let mut parts = s.split('-');
    let shaped = GROUPS.iter().all(|len| {
        parts
            .next()
            .is_some_and(|p| p.len() == *len && p.bytes().all(|b| b.is_ascii_hexdigit()))
    });
    shaped && parts.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuid_in_any_case() {
        let id = FileId::parse("3F2504E0-4F89-41D3-9A0C-0305E82C3301").unwrap();
        assert_eq!(id.as_str(), "3F2504E0-4F89-41D3-9A0C-0305E82C3301");
        assert!(FileId::parse("3f2504e0-4f89-41d3-9a0c-0305e82c3301").is_ok());
    }

    #[test]
    fn trims_whitespace() {
        let id = FileId::parse("  3f2504e0-4f89-41d3-9a0c-0305e82c3301\n").unwrap();
        assert_eq!(id.to_string(), "3f2504e0-4f89-41d3-9a0c-0305e82c3301");
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in [
            "not-a-uuid",
            "3f2504e04f8941d39a0c0305e82c3301",
            "3f2504e0-4f89-41d3-9a0c-0305e82c330",
            "3f2504e0-4f89-41d3-9a0c-0305e82c3301-00",
            "g f2504e0-4f89-41d3-9a0c-0305e82c3301",
            "{3f2504e0-4f89-41d3-9a0c-0305e82c3301}",
        ] {
            assert_eq!(
                FileId::parse(bad),
                Err(ValidationError::InvalidFileId {
                    input: bad.to_string()
                }),
                "{bad}"
            );
        }
    }

    #[test]
    fn empty_is_missing() {
        assert_eq!(FileId::parse("   "), Err(ValidationError::MissingField("File ID")));
        assert_eq!(FileId::parse_opt(None), Err(ValidationError::MissingField("File ID")));
    }

    #[test]
    fn error_message_names_input() {
        let err = FileId::parse("not-a-uuid").unwrap_err();
        assert!(err.to_string().contains("\"not-a-uuid\""));
    }
}
