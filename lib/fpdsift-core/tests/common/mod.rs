use fpdsift_core::{Diagnostic, FpdConfig, FpdValidator, RedactionSource, Schema};
use rstest::fixture;
use serde_json::Value;
use tracing::info;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

#[fixture]
pub fn validator() -> FpdValidator<'static> {
    init_tracing();
    FpdValidator::ortb2(FpdConfig::default())
}

/// Runs a record through the validator and renders the diagnostics.
pub fn run<R>(
    validator: &FpdValidator<'_>,
    data: &Value,
    redaction: &R,
) -> anyhow::Result<(Value, Vec<String>)>
where
    R: RedactionSource + ?Sized,
{
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let output = validator.process_value(data, redaction, &mut diagnostics)?;
    let lines = diagnostics.iter().map(ToString::to_string).collect();
    Ok((output, lines))
}

/// Parses a schema from its JSON form.
pub fn schema(json: Value) -> Schema {
    match serde_json::from_value(json) {
        Ok(schema) => schema,
        Err(error) => panic!("invalid test schema: {error}"),
    }
}
