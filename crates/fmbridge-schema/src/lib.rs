mod error;
mod schema;
mod validate;

pub use error::SchemaError;
pub use schema::{ArraySchema, NumberSchema, ObjectSchema, Schema, StringSchema};
