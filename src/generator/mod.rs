//! # Generator Module
//!
//! Turns an OpenAPI document into a Hanami application skeleton.
//!
//! ## Pipeline
//!
//! ```text
//! OpenAPI document → Operations → Attribute trees → Template models → Rendered text → Files
//! ```
//!
//! 1. **Extract** - [`crate::spec::extract_operations`] validates every operation
//! 2. **Build** - [`build_attributes`] lowers body schemas to attribute trees
//! 3. **Assemble** - [`assemble`] produces the routes, action, service, contract
//!    and schema models
//! 4. **Render** - [`Renderer`] renders every model with minijinja
//! 5. **Write** - [`ArtifactWriter`] persists the results
//!
//! Rendering completes for all artifacts before the first file is written, so a
//! run that fails leaves the output directory untouched.
//!
//! ## Generated Structure
//!
//! ```text
//! <output_dir>/
//! ├── config/
//! │   └── routes.rb                      # Regenerated
//! └── actions/
//!     ├── contracts.rb                   # Regenerated
//!     ├── schemas.rb                     # Regenerated
//!     └── <module>/
//!         ├── <operation>.rb             # Regenerated
//!         └── <operation>_service.rb     # Written once, then left alone
//! ```

mod attributes;
mod models;
mod naming;
mod templates;
mod writer;

pub use attributes::{build_attribute, build_attributes, Attribute, AttributeKind, Primitive};
pub use models::{
    action_model, assemble, contract_model, route_model, schemas_model, service_model,
    ActionModel, ContractModel, ContractsModel, RouteModel, RoutesModel, SchemaModel,
    SchemasModel, ServiceModel, TemplateModels,
};
pub use naming::{to_camel_case, to_rack_path, to_snake};
pub use templates::{template_name, Renderer, ATTRIBUTES_TEMPLATE, BUILTIN_TEMPLATES};
pub use writer::{
    artifact_path, ArtifactWriter, RenderedArtifact, WritePolicy, WriteReport, RUBY_EXTENSION,
};

use std::path::PathBuf;
use tracing::info;

use crate::error::{ArtifactKind, GenerateError};
use crate::spec::{extract_operations, load_spec, Operation};

/// Default Ruby application module.
pub const DEFAULT_APP_NAME: &str = "HanamiApp";
/// Default output root.
pub const DEFAULT_OUTPUT_DIR: &str = "gen";

/// Inputs of a generation run, after config and CLI have been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub input_file: PathBuf,
    pub app_name: String,
    pub output_dir: PathBuf,
    pub templates_dir: Option<PathBuf>,
    pub dry_run: bool,
}

impl GenerateOptions {
    pub fn new(input_file: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            input_file: input_file.into(),
            app_name: DEFAULT_APP_NAME.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            templates_dir: None,
            dry_run: false,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub operations: usize,
    pub files: WriteReport,
}

/// Render every artifact for a run, in write order: routes, actions,
/// services, contracts, schemas.
pub fn render_artifacts(
    renderer: &Renderer,
    operations: &[Operation],
    models: &TemplateModels,
) -> Result<Vec<RenderedArtifact>, GenerateError> {
    let ext = RUBY_EXTENSION;
    let mut artifacts = Vec::with_capacity(3 + 2 * operations.len());

    artifacts.push(RenderedArtifact {
        kind: ArtifactKind::Routes,
        relative_path: artifact_path(ArtifactKind::Routes, "", "", ext),
        contents: renderer.render(ArtifactKind::Routes, &models.routes)?,
    });
    for (operation, action) in operations.iter().zip(&models.actions) {
        artifacts.push(RenderedArtifact {
            kind: ArtifactKind::Action,
            relative_path: artifact_path(
                ArtifactKind::Action,
                &operation.module_name,
                &operation.operation_id,
                ext,
            ),
            contents: renderer.render(ArtifactKind::Action, action)?,
        });
    }
    for (operation, service) in operations.iter().zip(&models.services) {
        artifacts.push(RenderedArtifact {
            kind: ArtifactKind::Service,
            relative_path: artifact_path(
                ArtifactKind::Service,
                &operation.module_name,
                &operation.operation_id,
                ext,
            ),
            contents: renderer.render(ArtifactKind::Service, service)?,
        });
    }
    artifacts.push(RenderedArtifact {
        kind: ArtifactKind::Contracts,
        relative_path: artifact_path(ArtifactKind::Contracts, "", "", ext),
        contents: renderer.render(ArtifactKind::Contracts, &models.contracts)?,
    });
    artifacts.push(RenderedArtifact {
        kind: ArtifactKind::Schemas,
        relative_path: artifact_path(ArtifactKind::Schemas, "", "", ext),
        contents: renderer.render(ArtifactKind::Schemas, &models.schemas)?,
    });
    Ok(artifacts)
}

/// Run the full pipeline.
pub fn generate(options: &GenerateOptions) -> Result<GenerationReport, GenerateError> {
    let graph = load_spec(&options.input_file)?;
    let operations = extract_operations(&graph)?;
    let models = assemble(&options.app_name, &operations, &graph);

    let renderer = match &options.templates_dir {
        Some(dir) => Renderer::with_overrides(dir)?,
        None => Renderer::new()?,
    };
    let artifacts = render_artifacts(&renderer, &operations, &models)?;
    info!(artifacts = artifacts.len(), "Rendered artifacts");

    let writer = ArtifactWriter::new(&options.output_dir).dry_run(options.dry_run);
    let files = writer.write_all(&artifacts)?;
    info!(
        output_dir = %options.output_dir.display(),
        written = files.written.len(),
        skipped = files.skipped.len(),
        dry_run = options.dry_run,
        "Generation complete"
    );

    Ok(GenerationReport {
        operations: operations.len(),
        files,
    })
}
