/// Why validation could not accept the params.
#[derive(Debug)]
pub(crate) enum ValidateFailure {
    /// The action's declared schema is not itself a valid JSON Schema.
    /// This is a server-side configuration fault, not a client error.
    Schema(String),
    /// The params do not satisfy the schema. The message aggregates every
    /// field error.
    Input(String),
}

/// Validate `params` against a JSON Schema document.
///
/// All field errors are collected and joined into one human-readable
/// message rather than failing on the first.
pub(crate) fn validate_params(
    schema: &serde_json::Value,
    params: &serde_json::Value,
) -> Result<(), ValidateFailure> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| ValidateFailure::Schema(e.to_string()))?;

    let errors: Vec<String> = validator
        .iter_errors(params)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{path}: {e}")
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateFailure::Input(errors.join("; ")))
    }
}
