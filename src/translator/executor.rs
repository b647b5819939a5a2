//! Request translator
//!
//! Runs a batch item by item: resolve the operation, build the request,
//! call the transport, and normalize the envelope into output records.

use super::operation::{
    DeleteRecordParams, Operation, OperationKind, SearchNodesParams, SearchRecordsParams,
    WriteRecordParams,
};
use super::output::{failure_record, unexpected_response, with_datasheet_id, Execution, OutputRecord};
use super::params::{ItemParams, ParameterSource};
use super::search::filter_records;
use crate::api::{Endpoints, FieldsData, NodesData, RecordsData, RemoteEnvelope};
use crate::error::{Error, Result};
use crate::fields::{build_fields, FieldKeyMap};
use crate::http::{ApiTransport, RequestConfig};
use crate::types::{ApiVersion, JsonObject, JsonValue, Method};
use serde_json::json;
use tracing::{debug, error, info, warn};

/// Host run mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Turn per-item failures into diagnostic records instead of stopping the batch
    pub continue_on_failure: bool,
}

impl RunMode {
    /// Stop at the first failing item
    pub fn strict() -> Self {
        Self {
            continue_on_failure: false,
        }
    }

    /// Report failures as records and keep going
    pub fn tolerant() -> Self {
        Self {
            continue_on_failure: true,
        }
    }
}

/// Translates node operations into Aitable API calls
#[derive(Debug)]
pub struct Translator<T> {
    transport: T,
    endpoints: Endpoints,
    mode: RunMode,
}

impl<T: ApiTransport> Translator<T> {
    /// Create a strict-mode translator for API v1
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            endpoints: Endpoints::default(),
            mode: RunMode::default(),
        }
    }

    /// Target a different API version
    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.endpoints = Endpoints::new(version);
        self
    }

    /// Set the run mode
    #[must_use]
    pub fn with_run_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn run_mode(&self) -> RunMode {
        self.mode
    }

    /// Credential probe: `GET /spaces` must answer with a success envelope
    pub async fn check_connection(&self) -> Result<()> {
        let response = self
            .transport
            .send(Method::GET, &self.endpoints.spaces(), RequestConfig::new())
            .await?;

        if response.data.get("success") == Some(&JsonValue::Bool(true)) {
            info!("Credential check succeeded");
            return Ok(());
        }

        let message = response
            .data
            .get("message")
            .and_then(JsonValue::as_str)
            .unwrap_or("unexpected response from the spaces endpoint");
        Err(Error::Other(format!("Credential check failed: {message}")))
    }

    /// Process `item_count` input items in order
    pub async fn execute<P: ParameterSource + ?Sized>(
        &self,
        item_count: usize,
        params: &P,
    ) -> Execution {
        let mut output = Vec::new();

        for item_index in 0..item_count {
            match self.execute_item(item_index, params).await {
                Ok(records) => output.extend(records),
                Err(err) => {
                    return Execution {
                        output,
                        error: Some(err),
                    }
                }
            }
        }

        Execution {
            output,
            error: None,
        }
    }

    /// Process one input item.
    ///
    /// In tolerant mode this never fails: a failure becomes one diagnostic
    /// record. In strict mode the error is tagged with operation and item index.
    pub async fn execute_item<P: ParameterSource + ?Sized>(
        &self,
        item_index: usize,
        params: &P,
    ) -> Result<Vec<OutputRecord>> {
        let item = ItemParams::new(params, item_index);
        let operation_name = operation_label(item.raw("operation"));

        let result = match OperationKind::resolve(&item) {
            Ok(kind) => match Operation::resolve(kind, &item) {
                Ok(operation) => self.run(&operation).await,
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };

        match result {
            Ok(values) => {
                debug!(
                    "Item {} ({}) produced {} record(s)",
                    item_index,
                    operation_name,
                    values.len()
                );
                Ok(values
                    .into_iter()
                    .map(|json| OutputRecord::new(json, item_index))
                    .collect())
            }
            Err(err) if self.mode.continue_on_failure => {
                warn!(
                    "Item {} ({}) failed, continuing: {}",
                    item_index, operation_name, err
                );
                Ok(vec![OutputRecord::new(
                    failure_record(&operation_name, &err),
                    item_index,
                )])
            }
            Err(err) => {
                error!("Item {} ({}) failed: {}", item_index, operation_name, err);
                Err(Error::item(operation_name, item_index, err))
            }
        }
    }

    /// Single dispatch point
    async fn run(&self, operation: &Operation) -> Result<Vec<JsonValue>> {
        match operation {
            Operation::SearchNodes(p) => self.search_nodes(p).await,
            Operation::SearchRecords(p) => self.search_records(p).await,
            Operation::CreateRecord(p) | Operation::EditRecord(p) => self.write_record(p).await,
            Operation::DeleteRecord(p) => self.delete_record(p).await,
        }
    }

    async fn search_nodes(&self, p: &SearchNodesParams) -> Result<Vec<JsonValue>> {
        let request = RequestConfig::new()
            .query("type", p.node_type.as_str())
            .query_opt("query", p.query.clone())
            .query_opt("permissions", p.permissions_param());

        let response = self
            .transport
            .send(Method::GET, &self.endpoints.space_nodes(&p.space_id), request)
            .await?;

        match RemoteEnvelope::<NodesData>::decode(&response.data) {
            RemoteEnvelope::Success { data } => Ok(data.nodes),
            RemoteEnvelope::Failure { raw, .. } => Ok(vec![unexpected_response(
                "No data returned or error occurred",
                raw,
            )]),
        }
    }

    async fn search_records(&self, p: &SearchRecordsParams) -> Result<Vec<JsonValue>> {
        let mut request = RequestConfig::new()
            .query_opt("fieldIds", p.columns_to_search.clone())
            .query_opt("filterByFormula", p.filter_by_formula.clone());
        if p.max_results > 0 {
            request = request.query("pageSize", p.max_results.to_string());
        }

        let response = self
            .transport
            .send(Method::GET, &self.endpoints.records(&p.datasheet_id), request)
            .await
            .map_err(|e| Error::remote("fetching records", &p.datasheet_id, None, e))?;

        match RemoteEnvelope::<RecordsData>::decode(&response.data) {
            RemoteEnvelope::Success { data } => {
                let fetched = data.records.len();
                let records = match &p.search_term {
                    Some(term) => filter_records(data.records, term),
                    None => data.records,
                };
                debug!(
                    "Datasheet {}: {} of {} record(s) kept",
                    p.datasheet_id,
                    records.len(),
                    fetched
                );
                Ok(records
                    .into_iter()
                    .map(|record| with_datasheet_id(record, &p.datasheet_id))
                    .collect())
            }
            RemoteEnvelope::Failure { raw, .. } => Ok(vec![unexpected_response(
                "No records found in datasheet or error occurred",
                raw,
            )]),
        }
    }

    /// Shared create/edit path
    async fn write_record(&self, p: &WriteRecordParams) -> Result<Vec<JsonValue>> {
        let keys = if p.fetch_fields {
            Some(self.fetch_field_keys(&p.datasheet_id).await?)
        } else {
            None
        };

        let fields = build_fields(&p.fields, keys.as_ref());

        let mut record = JsonObject::new();
        if let Some(record_id) = &p.record_id {
            record.insert("recordId".to_string(), JsonValue::String(record_id.clone()));
        }
        record.insert("fields".to_string(), JsonValue::Object(fields));

        let mut body = json!({ "records": [record] });
        if p.use_field_names {
            body["fieldKey"] = JsonValue::String("name".to_string());
        }

        let (method, action, failure_message) = if p.record_id.is_some() {
            (
                Method::PATCH,
                "updating record",
                "Record update failed or error occurred",
            )
        } else {
            (
                Method::POST,
                "creating record",
                "Record creation failed or error occurred",
            )
        };

        let response = self
            .transport
            .send(
                method,
                &self.endpoints.records(&p.datasheet_id),
                RequestConfig::new().json(body),
            )
            .await
            .map_err(|e| Error::remote(action, &p.datasheet_id, None, e))?;

        match RemoteEnvelope::<RecordsData>::decode(&response.data) {
            RemoteEnvelope::Success { data } => match data.records.into_iter().next() {
                Some(record) => Ok(vec![with_datasheet_id(record, &p.datasheet_id)]),
                None => Ok(vec![unexpected_response(failure_message, response.data)]),
            },
            RemoteEnvelope::Failure { raw, .. } => {
                Ok(vec![unexpected_response(failure_message, raw)])
            }
        }
    }

    async fn fetch_field_keys(&self, datasheet_id: &str) -> Result<FieldKeyMap> {
        info!("Fetching field metadata for datasheet {}", datasheet_id);

        let response = self
            .transport
            .send(
                Method::GET,
                &self.endpoints.fields(datasheet_id),
                RequestConfig::new(),
            )
            .await
            .map_err(|e| Error::field_metadata(e.to_string()))?;

        match RemoteEnvelope::<FieldsData>::decode(&response.data) {
            RemoteEnvelope::Success { data } => {
                let keys = FieldKeyMap::from_fields(&data.fields);
                info!("Fetched metadata for {} field(s)", keys.len());
                Ok(keys)
            }
            RemoteEnvelope::Failure { message, .. } => Err(Error::field_metadata(
                message.unwrap_or_else(|| "unexpected response from the fields endpoint".to_string()),
            )),
        }
    }

    async fn delete_record(&self, p: &DeleteRecordParams) -> Result<Vec<JsonValue>> {
        // Deletion takes record IDs in the query string, never in a body
        let request = RequestConfig::new().query("recordIds", p.record_id.as_str());

        let response = self
            .transport
            .send(Method::DELETE, &self.endpoints.records(&p.datasheet_id), request)
            .await
            .map_err(|e| {
                Error::remote(
                    "deleting record",
                    &p.datasheet_id,
                    Some(p.record_id.clone()),
                    e,
                )
            })?;

        if response.data.get("success") == Some(&JsonValue::Bool(true)) {
            Ok(vec![json!({
                "success": true,
                "message": "Record deleted successfully",
                "recordId": p.record_id,
                "datasheetId": p.datasheet_id,
                "response": response.data,
            })])
        } else {
            Ok(vec![unexpected_response(
                "Record deletion failed or error occurred",
                response.data,
            )])
        }
    }
}

/// Name a failure is attributed to: the operation as given, or the default
/// operation only when the parameter is unset
fn operation_label(raw: Option<JsonValue>) -> String {
    match raw {
        None | Some(JsonValue::Null) => OperationKind::default().as_str().to_string(),
        Some(JsonValue::String(name)) if name.is_empty() => {
            OperationKind::default().as_str().to_string()
        }
        Some(JsonValue::String(name)) => name,
        Some(other) => other.to_string(),
    }
}
