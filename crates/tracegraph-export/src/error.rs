use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("yaml serialization failed")]
    Yaml(#[from] serde_yaml::Error),
}
