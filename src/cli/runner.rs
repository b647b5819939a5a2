//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, NodeConfig};
use crate::error::{Error, Result, ResultExt};
use crate::translator::{JsonParameters, OperationKind, OutputRecord, RunMode};
use crate::types::{JsonObject, JsonValue};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Run {
                params,
                params_json,
                items,
                continue_on_fail,
            } => {
                self.execute(
                    params.as_deref(),
                    params_json.as_deref(),
                    items.as_deref(),
                    *continue_on_fail,
                )
                .await
            }
            Commands::Operations => {
                self.operations();
                Ok(())
            }
        }
    }

    /// Load configuration: file (or defaults), then token overrides
    fn load_config(&self) -> Result<NodeConfig> {
        let config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => NodeConfig::default(),
        };
        let config = config.with_token(self.cli.token.clone()).with_env_token();
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Check the API token
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Checking connection to {}", config.base_url)
            }
        }));

        let result = match config.build_translator() {
            Ok(translator) => translator.check_connection().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => self.output_message(&json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": {
                    "status": "SUCCEEDED",
                    "message": "Connection successful"
                }
            })),
            Err(e) => self.output_message(&json!({
                "type": "CONNECTION_STATUS",
                "connectionStatus": {
                    "status": "FAILED",
                    "message": format!("Connection failed: {e}")
                }
            })),
        }

        Ok(())
    }

    /// Run an operation over the input items
    async fn execute(
        &self,
        params_path: Option<&Path>,
        params_json: Option<&str>,
        items_path: Option<&Path>,
        continue_on_fail: bool,
    ) -> Result<()> {
        let config = self.load_config()?;

        let content = match (params_path, params_json) {
            (_, Some(inline)) => inline.to_string(),
            (Some(path), None) => read_file(path, "parameters")?,
            (None, None) => {
                return Err(Error::config(
                    "No parameters given (use --params or --params-json)",
                ))
            }
        };
        let mut params = parse_parameters(&content)?;

        if let Some(path) = items_path {
            params.items = parse_items(&read_file(path, "items")?)?;
        }

        let mut translator = config.build_translator()?;
        if continue_on_fail {
            translator = translator.with_run_mode(RunMode::tolerant());
        }

        let item_count = params.item_count();
        info!(
            "Running over {} item(s), continue on failure: {}",
            item_count,
            translator.run_mode().continue_on_failure
        );

        let execution = translator.execute(item_count, &params).await;
        for record in &execution.output {
            self.output_record(record);
        }

        info!("Produced {} record(s)", execution.output.len());
        execution.into_result().map(|_| ())
    }

    /// List operations
    fn operations(&self) {
        let operations: Vec<JsonValue> = OperationKind::ALL
            .into_iter()
            .map(|kind| {
                json!({
                    "name": kind.as_str(),
                    "description": kind.description(),
                    "parameters": kind.parameters(),
                    "default": kind == OperationKind::default()
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "OPERATIONS",
            "operations": operations
        }));
    }

    fn output_record(&self, record: &OutputRecord) {
        match serde_json::to_value(record) {
            Ok(value) => self.output_message(&value),
            Err(e) => eprintln!("Failed to serialize record: {e}"),
        }
    }

    /// Output a message to stdout
    fn output_message(&self, msg: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}

/// Parse a parameters document.
///
/// Accepts `{"parameters": {...}, "items": [...]}` or a bare parameters
/// object, which then applies to a single item.
pub fn parse_parameters(content: &str) -> Result<JsonParameters> {
    let value: JsonValue = serde_json::from_str(content).context("Invalid parameters JSON")?;

    let JsonValue::Object(object) = value else {
        return Err(Error::config("Parameters must be a JSON object"));
    };

    if matches!(object.get("parameters"), Some(JsonValue::Object(_))) {
        return serde_json::from_value(JsonValue::Object(object))
            .map_err(|e| Error::config(format!("Invalid parameters document: {e}")));
    }

    Ok(JsonParameters::new(object))
}

/// Parse an items document: a JSON array of per-item parameter objects
pub fn parse_items(content: &str) -> Result<Vec<JsonObject>> {
    serde_json::from_str(content).context("Items must be a JSON array of objects")
}
