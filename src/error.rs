use thiserror::Error;

use crate::ir::PersonId;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("duplicate person id {0}")]
    DuplicatePersonId(PersonId),
    #[error("layout backend `{backend}` unavailable: {reason}")]
    BackendUnavailable {
        backend: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid family tree document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown field `{field}` in {record} record")]
    UnknownField { record: String, field: String },
}
