use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum TemplateError {
    #[error("ScanError: {0}")]
    ScanError(ScanError),
}

/// Why tag scanning stopped before the end of the template.
///
/// Neither case fails a render; text past the stopping point is simply
/// treated as literal.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum ScanError {
    #[error("Tag was opened but never closed")]
    UnterminatedTag,
    #[error("Tag has no content between its delimiters")]
    EmptyTag,
}

macro_rules! impl_from_error {
    ($($error:tt),+) => {$(
        impl From<$error> for TemplateError {
            fn from(e: $error) -> Self {
                TemplateError::$error(e)
            }
        }
    )+};
}

impl_from_error!(ScanError);
