//! Error taxonomy for a generation run.
//!
//! Structural defects in the schema are [`SpecError`]s, one variant per defect,
//! each carrying the `METHOD /path` location of the offending operation.
//! Everything that can abort a run is a [`GenerateError`], whose message
//! always starts with the stage that failed.

use std::fmt;
use std::path::PathBuf;

/// A structural defect detected while extracting operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// The operation declares no tags, so it has no owning module.
    #[error("{location}: operation has no tags; the first tag names the module")]
    MissingTags { location: String },

    /// The operation has no `operationId` to name its action and service.
    #[error("{location}: operation has no operationId")]
    MissingOperationId { location: String },

    /// A value that must be present is missing or points nowhere.
    #[error("{location}: malformed spec: {detail}")]
    MalformedSpec { location: String, detail: String },

    /// The request body declares no JSON media type.
    #[error("{location}: request body declares no application/json media type")]
    NoRequestBodyJsonMediaType { location: String },

    /// Neither a 200 nor a 201 response is declared.
    #[error("{location}: no 200 or 201 response declared")]
    SuccessResponseMissing { location: String },

    /// The success response declares no JSON media type.
    #[error("{location}: {status} response declares no application/json media type")]
    SuccessResponseNoJsonMediaType { location: String, status: String },
}

impl SpecError {
    /// The `METHOD /path` location of the operation that failed validation.
    pub fn location(&self) -> &str {
        match self {
            SpecError::MissingTags { location }
            | SpecError::MissingOperationId { location }
            | SpecError::MalformedSpec { location, .. }
            | SpecError::NoRequestBodyJsonMediaType { location }
            | SpecError::SuccessResponseMissing { location }
            | SpecError::SuccessResponseNoJsonMediaType { location, .. } => location,
        }
    }
}

/// The kind of generated artifact. Each kind has its own template and
/// its own write policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Routes,
    Action,
    Service,
    Contracts,
    Schemas,
}

impl ArtifactKind {
    /// All kinds, in the order the pipeline writes them.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Routes,
        ArtifactKind::Action,
        ArtifactKind::Service,
        ArtifactKind::Contracts,
        ArtifactKind::Schemas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Routes => "routes",
            ArtifactKind::Action => "action",
            ArtifactKind::Service => "service",
            ArtifactKind::Contracts => "contracts",
            ArtifactKind::Schemas => "schemas",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure that aborts a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("load failed: {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("extraction failed: {0}")]
    Spec(#[from] SpecError),

    #[error("render failed: {artifact} template: {source}")]
    Render {
        artifact: ArtifactKind,
        #[source]
        source: minijinja::Error,
    },

    #[error("template setup failed: {name}: {message}")]
    TemplateOverride { name: String, message: String },

    #[error("write failed: {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Short name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            GenerateError::Load { .. } => "load",
            GenerateError::Spec(_) => "extraction",
            GenerateError::Render { .. } | GenerateError::TemplateOverride { .. } => "render",
            GenerateError::Write { .. } => "write",
        }
    }
}
