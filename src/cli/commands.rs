//! CLI command implementations
//!
//! Every command follows the same start-up sequence:
//! 1. Configuration load and validation
//! 2. Log threshold applied
//! 3. Schema definitions loaded (all or nothing)
//!
//! Command output goes to stdout as JSON lines; log lines go to stderr.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::deserialize::{DeserializeError, Deserializer};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{SchemaRegistry, TypeSchema};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_documents, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check { config, type_name } => check(&config, &type_name),
        Command::Schemas { config } => schemas(&config),
    }
}

/// Counts from one check stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Documents resolved successfully
    pub accepted: usize,
    /// Documents rejected
    pub rejected: usize,
}

/// Validate stdin documents against one type
pub fn check(config_path: &Path, type_name: &str) -> CliResult<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(&config)?;
    let schema = registry
        .get(type_name)
        .ok_or_else(|| CliError::unknown_type(type_name))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    check_stream(
        &config.deserializer(),
        schema,
        stdin.lock(),
        &mut stdout.lock(),
    )?;

    Ok(())
}

/// Resolves every document read from `input`, writing one response line per
/// document to `output`.
///
/// Malformed or invalid documents produce error responses and the stream
/// continues; only read and write failures stop it.
pub fn check_stream<R: BufRead, W: Write>(
    deserializer: &Deserializer,
    schema: &TypeSchema,
    input: R,
    output: &mut W,
) -> CliResult<CheckSummary> {
    log_event_with_fields(Event::CheckStart, &[("type", schema.name())]);

    let mut summary = CheckSummary::default();
    for (index, document) in read_documents(input).enumerate() {
        let line = (index + 1).to_string();
        let outcome = match document? {
            Ok(value) => check_document(deserializer, schema, &value, output)?,
            Err(e) => {
                let err = CliError::from(e);
                write_error(output, err.code_str(), err.message(), json!([]))?;
                false
            }
        };

        if outcome {
            summary.accepted += 1;
            Logger::trace(Event::DocumentAccepted.as_str(), &[("line", &line)]);
        } else {
            summary.rejected += 1;
            Logger::info(Event::DocumentRejected.as_str(), &[("line", &line)]);
        }
    }

    log_event_with_fields(
        Event::CheckComplete,
        &[
            ("type", schema.name()),
            ("accepted", &summary.accepted.to_string()),
            ("rejected", &summary.rejected.to_string()),
        ],
    );
    Ok(summary)
}

/// Resolves one document and writes its response. Returns whether the
/// document was accepted.
pub fn check_document<W: Write>(
    deserializer: &Deserializer,
    schema: &TypeSchema,
    document: &Value,
    output: &mut W,
) -> CliResult<bool> {
    match deserializer.resolve(schema, document) {
        Ok(record) => {
            write_response(output, &record)?;
            Ok(true)
        }
        Err(e) => {
            write_deserialize_error(output, &e)?;
            Ok(false)
        }
    }
}

fn write_deserialize_error<W: Write>(output: &mut W, e: &DeserializeError) -> CliResult<()> {
    let errors = serde_json::to_value(e.field_errors())?;
    write_error(output, e.code(), &e.to_string(), errors)
}

/// Summary of one loaded type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSummary {
    /// Type name
    pub name: String,
    /// Base type name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Effective field names, own fields first
    pub fields: Vec<String>,
}

impl TypeSummary {
    fn of(schema: &TypeSchema) -> Self {
        Self {
            name: schema.name().to_string(),
            extends: schema.base().map(|base| base.name().to_string()),
            fields: schema.field_names().into_iter().map(String::from).collect(),
        }
    }
}

/// List the loaded types
pub fn schemas(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(&config)?;

    let stdout = io::stdout();
    write_response(&mut stdout.lock(), &summarize(&registry))
}

/// Summaries of every registered type, in name order
pub fn summarize(registry: &SchemaRegistry) -> Vec<TypeSummary> {
    registry.schemas().map(|schema| TypeSummary::of(schema)).collect()
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            log_event_with_fields(Event::ConfigInvalid, &[("message", e.message())]);
            return Err(e);
        }
    };

    Logger::set_min_severity(config.log_severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", &config_path.display().to_string()),
            ("max_depth", &config.max_depth.to_string()),
        ],
    );
    Ok(config)
}

fn load_registry(config: &Config) -> CliResult<SchemaRegistry> {
    match SchemaRegistry::load_dir(config.schema_path()) {
        Ok(registry) => Ok(registry),
        Err(e) => {
            log_event_with_fields(
                Event::SchemaLoadFailed,
                &[("code", e.code()), ("message", &e.to_string())],
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints;
    use crate::schema::FieldDescriptor;
    use std::fs;
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn person() -> Arc<TypeSchema> {
        TypeSchema::builder("Person")
            .field(FieldDescriptor::string("name").with(constraints::non_empty_string()))
            .field(FieldDescriptor::number("age").with(constraints::range(0.0, 150.0).unwrap()))
            .build()
            .unwrap()
    }

    fn run_stream(input: &str) -> (CheckSummary, Vec<Value>) {
        let mut out = Vec::new();
        let summary = check_stream(
            &Deserializer::new(),
            &person(),
            Cursor::new(input.to_string()),
            &mut out,
        )
        .unwrap();

        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, lines)
    }

    #[test]
    fn test_check_stream_mixed_documents() {
        let (summary, lines) = run_stream(concat!(
            "{\"name\":\"Alice\",\"age\":30}\n",
            "{\"age\":30}\n",
            "\n",
            "{broken\n",
            "\"text\"\n",
        ));

        assert_eq!(summary, CheckSummary { accepted: 1, rejected: 3 });
        assert_eq!(lines.len(), 4);

        assert_eq!(lines[0], json!({"status": "ok", "data": {"name": "Alice", "age": 30}}));

        assert_eq!(lines[1]["code"], "RC_VALIDATION_FAILED");
        assert_eq!(
            lines[1]["errors"],
            json!([{ "field": "name", "errors": ["required field missing"] }])
        );
        assert_eq!(
            lines[1]["message"],
            "input value does not pass validation:\nname:\n    required field missing"
        );

        assert_eq!(lines[2]["code"], "RC_CLI_IO_ERROR");
        assert_eq!(lines[3]["code"], "RC_INPUT_SHAPE");
    }

    #[test]
    fn test_check_document_depth_error() {
        let mut out = Vec::new();
        let leaf = TypeSchema::builder("Leaf").build().unwrap();
        let top = TypeSchema::builder("Top")
            .field(FieldDescriptor::nested("leaf", &leaf))
            .build()
            .unwrap();

        let accepted = check_document(
            &Deserializer::new().with_max_depth(0),
            &top,
            &json!({"leaf": {}}),
            &mut out,
        )
        .unwrap();

        assert!(!accepted);
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["code"], "RC_SCHEMA_TOO_DEEP");
    }

    #[test]
    fn test_summarize_registry() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("named.json"),
            json!({ "name": "Named", "fields": [{ "name": "name", "type": "string" }] })
                .to_string(),
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("person.json"),
            json!({
                "name": "Person",
                "extends": "Named",
                "fields": [{ "name": "age", "type": "number" }]
            })
            .to_string(),
        )
        .unwrap();

        let registry = SchemaRegistry::load_dir(temp_dir.path()).unwrap();
        let summaries = summarize(&registry);

        assert_eq!(
            serde_json::to_value(&summaries).unwrap(),
            json!([
                { "name": "Named", "fields": ["name"] },
                { "name": "Person", "extends": "Named", "fields": ["age", "name"] }
            ])
        );
    }

    #[test]
    fn test_check_unknown_type() {
        let temp_dir = TempDir::new().unwrap();
        let schema_dir = temp_dir.path().join("schemas");
        fs::create_dir(&schema_dir).unwrap();
        let config_path = temp_dir.path().join("recordcheck.json");
        fs::write(
            &config_path,
            json!({ "schema_dir": schema_dir.to_string_lossy() }).to_string(),
        )
        .unwrap();

        let err = check(&config_path, "Nobody").unwrap_err();
        assert_eq!(err.code_str(), "RC_CLI_UNKNOWN_TYPE");
    }

    #[test]
    fn test_schema_load_failure_is_cli_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("recordcheck.json");
        fs::write(
            &config_path,
            json!({ "schema_dir": temp_dir.path().join("missing").to_string_lossy() })
                .to_string(),
        )
        .unwrap();

        let err = schemas(&config_path).unwrap_err();
        assert_eq!(err.code_str(), "RC_CLI_SCHEMA_ERROR");
    }
}
