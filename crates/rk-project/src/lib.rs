//! rk-project: model file format, validation and compilation.
//!
//! A model file (YAML or JSON) describes materials, components, links,
//! kinetics switches, the external reactivity schedule and the output grid.
//! `compile` turns a validated file into an `rk_sim::ReactorModel` plus
//! `SimOptions`.

pub mod compile;
pub mod schema;
pub mod validate;

pub use compile::{CompiledModel, compile};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_model};

use rk_sim::{ErrorKind, SimError};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sim(#[from] SimError),
}

impl ProjectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProjectError::Validation(e) if e.is_dimension() => ErrorKind::Dimension,
            ProjectError::Sim(e) => e.kind(),
            _ => ErrorKind::Configuration,
        }
    }
}

pub fn from_yaml_str(content: &str) -> ProjectResult<ModelDef> {
    let model: ModelDef = serde_yaml::from_str(content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn from_json_str(content: &str) -> ProjectResult<ModelDef> {
    let model: ModelDef = serde_json::from_str(content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<ModelDef> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<ModelDef> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

/// Load by extension: `.json` is JSON, anything else YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<ModelDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}

pub fn save_yaml(path: &std::path::Path, model: &ModelDef) -> ProjectResult<()> {
    validate_model(model)?;
    let content = serde_yaml::to_string(model)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn save_json(path: &std::path::Path, model: &ModelDef) -> ProjectResult<()> {
    validate_model(model)?;
    let content = serde_json::to_string_pretty(model)?;
    std::fs::write(path, content)?;
    Ok(())
}
