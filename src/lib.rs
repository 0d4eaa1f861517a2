//! # hanamigen
//!
//! **hanamigen** generates the skeleton of a [Hanami](https://hanamirb.org)
//! application from an [OpenAPI 3](https://spec.openapis.org/oas/v3.1.0)
//! document: a route table, one action per operation, write-once service
//! stubs, dry-validation request/response contracts, and reusable schemas for
//! every component.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Loads the document and extracts validated [`spec::Operation`]s
//! - **[`generator`]** - Attribute trees, template models, rendering and writing
//! - **[`config`]** - `hanamigen.toml` loading and option precedence
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `hanamigen` command line
//! - **[`error`]** - Error types shared by all stages
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(hanamigen)
//!     participant Spec as spec::load_spec
//!     participant Build as spec::extract_operations
//!     participant Models as generator::assemble
//!     participant Renderer as generator::Renderer
//!     participant Writer as generator::ArtifactWriter
//!     participant FS as File System
//!
//!     CLI->>Spec: load_spec("openapi.yaml")
//!     Spec-->>CLI: SchemaGraph
//!     CLI->>Build: extract_operations(&graph)
//!     Build-->>CLI: Vec<Operation>
//!     CLI->>Models: assemble(app, &operations, &graph)
//!     Models-->>CLI: TemplateModels
//!     CLI->>Renderer: render every artifact
//!     Renderer-->>CLI: Vec<RenderedArtifact>
//!     CLI->>Writer: write_all(&artifacts)
//!     Writer->>FS: overwrite routes, actions, contracts, schemas
//!     Writer->>FS: create services only if absent
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! hanamigen generate --input-file openapi.yaml --app-name Bookshelf --output-dir app
//! ```
//!
//! From code:
//!
//! ```rust,no_run
//! use hanamigen::generator::{generate, GenerateOptions};
//!
//! let mut options = GenerateOptions::new("openapi.yaml");
//! options.app_name = "Bookshelf".to_string();
//! let report = generate(&options)?;
//! println!("{} operations, {} files written", report.operations, report.files.written.len());
//! # Ok::<(), hanamigen::error::GenerateError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod spec;

pub use error::{ArtifactKind, GenerateError, SpecError};
pub use generator::{generate, GenerateOptions, GenerationReport};
pub use spec::{extract_operations, load_spec, Operation, SchemaGraph};
