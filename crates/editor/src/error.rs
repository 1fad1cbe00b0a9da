use stepform_types::OptionSourceError;
use thiserror::Error;

/// Errors that abort building an editor panel.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("field '{key}' has an unusable option source: {source}")]
    InvalidOptionSource {
        key: String,
        #[source]
        source: OptionSourceError,
    },

    #[error("step '{0}' is not part of the definition")]
    StepNotFound(String),
}
