//! Resources, canonical operations and the legacy alias table

use std::fmt;
use std::str::FromStr;

use crate::domain::error::UnknownOperationError;

/// API resource an invocation works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    File,
    Transcription,
    Model,
}

impl Resource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Transcription => "transcription",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = UnknownOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "transcription" => Ok(Self::Transcription),
            "model" => Ok(Self::Model),
            _ => Err(UnknownOperationError::Resource {
                input: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOperation {
    Upload,
    Get,
    List,
    Delete,
}

/// How far a transcription request is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscribeMode {
    /// Upload (binary source) or reference a URL, submit, poll, clean up
    Full,
    /// Submit for an existing file id and return the creation response
    SubmitOnly,
    /// Submit for an existing file id, then poll and clean up the job
    SubmitAndWait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptionLookup {
    ById,
    ByFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptionOperation {
    Transcribe(TranscribeMode),
    Get(TranscriptionLookup),
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelOperation {
    List,
}

/// A canonical operation, already bound to its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    File(FileOperation),
    Transcription(TranscriptionOperation),
    Model(ModelOperation),
}

/// Every accepted operation name, deprecated spellings included.
const ALIASES: &[(Resource, &str, Operation)] = &[
    (Resource::File, "upload", Operation::File(FileOperation::Upload)),
    (Resource::File, "get", Operation::File(FileOperation::Get)),
    (Resource::File, "list", Operation::File(FileOperation::List)),
    (Resource::File, "getAll", Operation::File(FileOperation::List)),
    (Resource::File, "delete", Operation::File(FileOperation::Delete)),
    (
        Resource::Transcription,
        "transcribe",
        Operation::Transcription(TranscriptionOperation::Transcribe(TranscribeMode::Full)),
    ),
    (
        Resource::Transcription,
        "create",
        Operation::Transcription(TranscriptionOperation::Transcribe(TranscribeMode::SubmitOnly)),
    ),
    (
        Resource::Transcription,
        "createAndWait",
        Operation::Transcription(TranscriptionOperation::Transcribe(
            TranscribeMode::SubmitAndWait,
        )),
    ),
    (
        Resource::Transcription,
        "get",
        Operation::Transcription(TranscriptionOperation::Get(TranscriptionLookup::ById)),
    ),
    (
        Resource::Transcription,
        "getByFile",
        Operation::Transcription(TranscriptionOperation::Get(TranscriptionLookup::ByFile)),
    ),
    (
        Resource::Transcription,
        "list",
        Operation::Transcription(TranscriptionOperation::List),
    ),
    (
        Resource::Transcription,
        "getAll",
        Operation::Transcription(TranscriptionOperation::List),
    ),
    (Resource::Model, "list", Operation::Model(ModelOperation::List)),
    (Resource::Model, "getAll", Operation::Model(ModelOperation::List)),
];

impl Operation {
    /// Resolve an operation name (case-insensitive, `-`/`_` ignored) for a resource.
    pub fn resolve(resource: Resource, name: &str) -> Result<Self, UnknownOperationError> {
        let wanted = normalize(name);
        ALIASES
            .iter()
            .find(|(r, alias, _)| *r == resource && normalize(alias) == wanted)
            .map(|(_, _, op)| *op)
            .ok_or_else(|| UnknownOperationError::Operation {
                resource: resource.to_string(),
                input: name.to_string(),
                valid: Self::names_for(resource).join(", "),
            })
    }

    /// Accepted names for a resource, in table order
    pub fn names_for(resource: Resource) -> Vec<&'static str> {
        ALIASES
            .iter()
            .filter(|(r, _, _)| *r == resource)
            .map(|(_, alias, _)| *alias)
            .collect()
    }

    pub fn resource(&self) -> Resource {
        match self {
            Self::File(_) => Resource::File,
            Self::Transcription(_) => Resource::Transcription,
            Self::Model(_) => Resource::Model,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_parses() {
        assert_eq!("file".parse::<Resource>().unwrap(), Resource::File);
        assert_eq!(" Transcription ".parse::<Resource>().unwrap(), Resource::Transcription);
        assert!("audio".parse::<Resource>().is_err());
    }

    #[test]
    fn legacy_aliases_resolve_to_canonical_operations() {
        assert_eq!(
            Operation::resolve(Resource::File, "getAll").unwrap(),
            Operation::File(FileOperation::List)
        );
        assert_eq!(
            Operation::resolve(Resource::Transcription, "create").unwrap(),
            Operation::Transcription(TranscriptionOperation::Transcribe(TranscribeMode::SubmitOnly))
        );
        assert_eq!(
            Operation::resolve(Resource::Transcription, "createAndWait").unwrap(),
            Operation::Transcription(TranscriptionOperation::Transcribe(
                TranscribeMode::SubmitAndWait
            ))
        );
        assert_eq!(
            Operation::resolve(Resource::Transcription, "getByFile").unwrap(),
            Operation::Transcription(TranscriptionOperation::Get(TranscriptionLookup::ByFile))
        );
        assert_eq!(
            Operation::resolve(Resource::Model, "getAll").unwrap(),
            Operation::Model(ModelOperation::List)
        );
    }

    #[test]
    fn names_are_matched_loosely() {
        assert_eq!(
            Operation::resolve(Resource::Transcription, "create-and-wait").unwrap(),
            Operation::resolve(Resource::Transcription, "createAndWait").unwrap()
        );
        assert_eq!(
            Operation::resolve(Resource::Transcription, "get_by_file").unwrap(),
            Operation::resolve(Resource::Transcription, "getByFile").unwrap()
        );
    }

    #[test]
    fn operations_are_scoped_to_their_resource() {
        assert!(Operation::resolve(Resource::Model, "upload").is_err());
        assert!(Operation::resolve(Resource::File, "transcribe").is_err());

        let err = Operation::resolve(Resource::Model, "delete").unwrap_err();
        assert!(err.to_string().contains("list, getAll"));
    }

    #[test]
    fn resolved_operation_knows_its_resource() {
        let op = Operation::resolve(Resource::File, "upload").unwrap();
        assert_eq!(op.resource(), Resource::File);
    }
}
