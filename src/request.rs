//! Read and validate batch request messages

/// Valid JSON messages are deserialised into a set of structs defined here
pub mod message;

/// Compile the embedded batch request JSON schema
pub mod schema;
