use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::naming::{to_camel_case, to_snake};
use crate::error::{ArtifactKind, GenerateError};

/// Shared attribute-rendering macros, imported by the contracts and schemas
/// templates.
pub const ATTRIBUTES_TEMPLATE: &str = "attributes.rb.j2";

/// Built-in templates, by file name.
pub const BUILTIN_TEMPLATES: [(&str, &str); 6] = [
    ("routes.rb.j2", include_str!("../../templates/hanami/routes.rb.j2")),
    ("action.rb.j2", include_str!("../../templates/hanami/action.rb.j2")),
    ("service.rb.j2", include_str!("../../templates/hanami/service.rb.j2")),
    ("contracts.rb.j2", include_str!("../../templates/hanami/contracts.rb.j2")),
    ("schemas.rb.j2", include_str!("../../templates/hanami/schemas.rb.j2")),
    (ATTRIBUTES_TEMPLATE, include_str!("../../templates/hanami/attributes.rb.j2")),
];

/// Template file that renders an artifact kind.
pub fn template_name(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Routes => "routes.rb.j2",
        ArtifactKind::Action => "action.rb.j2",
        ArtifactKind::Service => "service.rb.j2",
        ArtifactKind::Contracts => "contracts.rb.j2",
        ArtifactKind::Schemas => "schemas.rb.j2",
    }
}

fn pad(value: String, width: usize) -> String {
    format!("{}{}", " ".repeat(width), value)
}

/// Template environment for one generation run.
///
/// Holds the compiled templates (built-ins, possibly replaced from an
/// override directory) and the `to_snake`, `to_camel` and `pad` filters.
/// Referencing an undefined variable is a render error.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Renderer with the built-in templates only.
    pub fn new() -> Result<Self, GenerateError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_filter("to_snake", |value: String| to_snake(&value));
        env.add_filter("to_camel", |value: String| to_camel_case(&value));
        env.add_filter("pad", pad);

        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| GenerateError::TemplateOverride {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(Renderer { env })
    }

    /// Renderer whose built-in templates are replaced by same-named files in
    /// `dir`. Files with other names are ignored.
    pub fn with_overrides(dir: &Path) -> Result<Self, GenerateError> {
        let mut renderer = Renderer::new()?;
        let override_error = |name: &str, message: String| GenerateError::TemplateOverride {
            name: name.to_string(),
            message,
        };

        let entries = fs::read_dir(dir)
            .map_err(|e| override_error(&dir.display().to_string(), e.to_string()))?;
        let mut overridden = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| override_error(&dir.display().to_string(), e.to_string()))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !BUILTIN_TEMPLATES.iter().any(|(name, _)| *name == file_name) {
                debug!(file = %file_name, "Ignoring non-template file in template directory");
                continue;
            }
            let source = fs::read_to_string(entry.path())
                .map_err(|e| override_error(&file_name, e.to_string()))?;
            renderer
                .env
                .add_template_owned(file_name.clone(), source)
                .map_err(|e| override_error(&file_name, e.to_string()))?;
            info!(template = %file_name, "Using template override");
            overridden += 1;
        }
        if overridden == 0 {
            warn!(dir = %dir.display(), "Template directory contains no known template names");
        }
        Ok(renderer)
    }

    /// Render `kind`'s template against `ctx`.
    pub fn render<S: Serialize>(&self, kind: ArtifactKind, ctx: &S) -> Result<String, GenerateError> {
        let render_error = |source: minijinja::Error| GenerateError::Render {
            artifact: kind,
            source,
        };
        self.env
            .get_template(template_name(kind))
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(render_error)
    }
}
