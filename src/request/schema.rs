use jsonschema::JSONSchema;
use serde_json::Value;

/// Compile the embedded batch request schema
///
/// The schema is a single self-contained document, so no resolver is needed.
pub fn load_schema() -> JSONSchema {
    static SCHEMA: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/data/schema/batch_request.json"
    ));
    let schema: Value = serde_json::from_str(SCHEMA).expect("Valid JSON");
    JSONSchema::compile(&schema).expect("Valid schema")
}
