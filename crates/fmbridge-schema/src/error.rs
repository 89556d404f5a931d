use thiserror::Error;

/// Errors produced while checking the shape of a schema document.
///
/// Every variant carries the path of the offending node, using dotted
/// segments from the schema root (e.g. `$.items.properties.name`).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema node at `{path}` must be a JSON object")]
    NotAnObject { path: String },

    #[error("schema node at `{path}` has no `type` tag")]
    MissingType { path: String },

    #[error("unknown schema type `{found}` at `{path}`")]
    UnknownType { path: String, found: String },

    #[error("`{kind}` schema at `{path}` is missing `{field}`")]
    MissingField {
        path: String,
        kind: &'static str,
        field: &'static str,
    },

    #[error("invalid constraint at `{path}`: {message}")]
    InvalidConstraint { path: String, message: String },
}
