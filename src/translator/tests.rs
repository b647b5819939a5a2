//! Tests for the request translator

use super::*;
use crate::error::{Error, Result};
use crate::http::{ApiResponse, ApiTransport, RequestConfig};
use crate::types::{ApiVersion, JsonObject, JsonValue, Method};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Fake transport
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Call {
    method: Method,
    path: String,
    request: RequestConfig,
}

/// Replays queued responses and records every call
#[derive(Default)]
struct FakeTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    fn new() -> Self {
        Self::default()
    }

    fn reply(self, data: JsonValue) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status: 200, data }));
        self
    }

    fn fail(self, err: Error) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiTransport for FakeTransport {
    async fn send(&self, method: Method, path: &str, request: RequestConfig) -> Result<ApiResponse> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            request,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other("no response queued".to_string())))
    }
}

fn params(value: JsonValue) -> JsonParameters {
    match value {
        JsonValue::Object(map) => JsonParameters::new(map),
        other => panic!("parameters must be an object, got {other}"),
    }
}

fn object(value: JsonValue) -> JsonObject {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn records_response(records: JsonValue) -> JsonValue {
    json!({"success": true, "code": 200, "data": {"records": records}})
}

// ============================================================================
// searchNodes
// ============================================================================

#[tokio::test]
async fn test_search_nodes_emits_one_record_per_node() {
    let transport = FakeTransport::new().reply(json!({
        "success": true,
        "data": {"nodes": [
            {"id": "dst1", "name": "Tasks", "type": "Datasheet"},
            {"id": "dst2", "name": "Bugs", "type": "Datasheet"}
        ]}
    }));
    let translator = Translator::new(transport);
    let params = params(json!({
        "operation": "searchNodes",
        "spaceId": "spcX9P2xUcKst",
        "nodeType": "Datasheet",
        "query": "",
        "permissions": ["0", "2"]
    }));

    let output = translator.execute(1, &params).await.into_result().unwrap();

    assert_eq!(output.len(), 2);
    assert_eq!(output[0], OutputRecord::new(json!({"id": "dst1", "name": "Tasks", "type": "Datasheet"}), 0));
    assert_eq!(output[1].paired_item, 0);

    let calls = translator.transport().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/fusion/v1/spaces/spcX9P2xUcKst/nodes");
    assert_eq!(calls[0].request.query.get("type"), Some(&"Datasheet".to_string()));
    assert_eq!(calls[0].request.query.get("permissions"), Some(&"0,2".to_string()));
    assert!(!calls[0].request.query.contains_key("query"));
    assert!(calls[0].request.body.is_none());
}

#[tokio::test]
async fn test_search_nodes_defaults() {
    let transport = FakeTransport::new().reply(json!({"success": true, "data": {"nodes": []}}));
    let translator = Translator::new(transport);
    let params = params(json!({"spaceId": "spc1", "query": "Road"}));

    let output = translator.execute(1, &params).await.into_result().unwrap();
    assert!(output.is_empty());

    let calls = translator.transport().calls();
    assert_eq!(calls[0].request.query.get("type"), Some(&"Datasheet".to_string()));
    assert_eq!(calls[0].request.query.get("query"), Some(&"Road".to_string()));
    assert!(!calls[0].request.query.contains_key("permissions"));
}

#[tokio::test]
async fn test_search_nodes_unexpected_envelope() {
    let body = json!({"success": false, "code": 404, "message": "space not found"});
    let translator = Translator::new(FakeTransport::new().reply(body.clone()));
    let params = params(json!({"operation": "searchNodes", "spaceId": "spc1"}));

    let output = translator.execute(1, &params).await.into_result().unwrap();

    assert_eq!(
        output,
        vec![OutputRecord::new(
            json!({
                "success": false,
                "message": "No data returned or error occurred",
                "response": body
            }),
            0
        )]
    );
    assert!(output[0].is_diagnostic());
}

#[tokio::test]
async fn test_search_nodes_rejects_bad_filters() {
    let translator = Translator::new(FakeTransport::new());

    let bad_permission = params(json!({"spaceId": "spc1", "permissions": ["4"]}));
    let err = translator.execute(1, &bad_permission).await.into_result().unwrap_err();
    assert!(err.is_validation());

    let bad_type = params(json!({"spaceId": "spc1", "nodeType": "Spreadsheet"}));
    let err = translator.execute(1, &bad_type).await.into_result().unwrap_err();
    assert!(err.is_validation());

    let missing_space = params(json!({"operation": "searchNodes"}));
    let err = translator.execute(1, &missing_space).await.into_result().unwrap_err();
    assert!(err.to_string().contains("Space ID is required"));

    assert!(translator.transport().calls().is_empty());
}

// ============================================================================
// searchNodesInDatasheet
// ============================================================================

#[tokio::test]
async fn test_search_records_filters_by_term() {
    let transport = FakeTransport::new().reply(records_response(json!([
        {"recordId": "rec1", "fields": {"Name": "Alpha"}},
        {"recordId": "rec2", "fields": {"Name": "Beta"}}
    ])));
    let translator = Translator::new(transport);
    let params = params(json!({
        "operation": "searchNodesInDatasheet",
        "datasheetId": "dst1",
        "searchTerm": "alp"
    }));

    let output = translator.execute(1, &params).await.into_result().unwrap();

    assert_eq!(
        output,
        vec![OutputRecord::new(
            json!({"recordId": "rec1", "fields": {"Name": "Alpha"}, "datasheetId": "dst1"}),
            0
        )]
    );

    let calls = translator.transport().calls();
    assert_eq!(calls[0].path, "/fusion/v1/datasheets/dst1/records");
    assert_eq!(calls[0].request.query.get("pageSize"), Some(&"100".to_string()));
    assert!(!calls[0].request.query.contains_key("filterByFormula"));
}

#[tokio::test]
async fn test_search_records_forwards_formula_and_columns() {
    let transport = FakeTransport::new().reply(records_response(json!([
        {"recordId": "rec1", "fields": {"Name": "Project X"}},
        {"recordId": "rec2", "fields": {"Name": "Project Y"}}
    ])));
    let translator = Translator::new(transport);
    let params = params(json!({
        "operation": "searchNodesInDatasheet",
        "datasheetId": "dst1",
        "filterByFormula": "{Name}=\"Project X\"",
        "columnsToSearch": "fldA,fldB",
        "maxResults": "25"
    }));

    let output = translator.execute(1, &params).await.into_result().unwrap();
    assert_eq!(output.len(), 2);

    let query = &translator.transport().calls()[0].request.query;
    assert_eq!(query.get("filterByFormula"), Some(&"{Name}=\"Project X\"".to_string()));
    assert_eq!(query.get("fieldIds"), Some(&"fldA,fldB".to_string()));
    assert_eq!(query.get("pageSize"), Some(&"25".to_string()));
}

#[tokio::test]
async fn test_search_records_zero_max_results_omits_page_size() {
    let transport = FakeTransport::new().reply(records_response(json!([])));
    let translator = Translator::new(transport);
    let params = params(json!({
        "operation": "searchNodesInDatasheet",
        "datasheetId": "dst1",
        "maxResults": 0
    }));

    translator.execute(1, &params).await.into_result().unwrap();
    assert!(!translator.transport().calls()[0].request.query.contains_key("pageSize"));
}

#[tokio::test]
async fn test_search_records_unexpected_envelope() {
    let body = json!({"success": true, "data": {"pageNum": 1}});
    let translator = Translator::new(FakeTransport::new().reply(body.clone()));
    let params = params(json!({"operation": "searchNodesInDatasheet", "datasheetId": "dst1"}));

    let output = translator.execute(1, &params).await.into_result().unwrap();
    assert_eq!(
        output[0].json,
        json!({
            "success": false,
            "message": "No records found in datasheet or error occurred",
            "response": body
        })
    );
}

// ============================================================================
// createRecord / editRecord
// ============================================================================

#[tokio::test]
async fn test_create_record_with_fetched_field_ids() {
    let transport = FakeTransport::new()
        .reply(json!({
            "success": true,
            "data": {"fields": [
                {"id": "fldAbc", "name": "title", "type": "SingleText"},
                {"id": "fldPts", "name": "Points", "type": "Number"}
            ]}
        }))
        .reply(records_response(json!([
            {"recordId": "recNew", "fields": {"title": "Launch"}}
        ])));
    let translator = Translator::new(transport);
    let params = params(json!({
        "operation": "createRecord",
        "datasheetId": "dst1",
        "useFieldNames": true,
        "fetchFields": true,
        "fieldsUi": {"fieldValues": [
            {"fieldName": "Title", "fieldType": "text", "fieldValue": "Launch"},
            {"fieldName": "points", "fieldType": "number", "fieldValue": "8"},
            {"fieldName": "Owner", "fieldType": "text", "fieldValue": "sam"},
            {"fieldName": "Parent", "fieldType": "link", "fieldValue": ""}
        ]}
    }));

    let output = translator.execute(1, &params).await.into_result().unwrap();

    assert_eq!(
        output,
        vec![OutputRecord::new(
            json!({"recordId": "recNew", "fields": {"title": "Launch"}, "datasheetId": "dst1"}),
            0
        )]
    );

    let calls = translator.transport().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/fusion/v1/datasheets/dst1/fields");
    assert_eq!(calls[1].method, Method::POST);
    assert_eq!(calls[1].path, "/fusion/v1/datasheets/dst1/records");
    assert_eq!(
        calls[1].request.body,
        Some(json!({
            "records": [{"fields": {"fldAbc": "Launch", "fldPts": 8, "Owner": "sam"}}],
            "fieldKey": "name"
        }))
    );
}

#[tokio::test]
async fn test_fetched_ids_apply_without_field_names() {
    let transport = FakeTransport::new()
        .reply(json!({"success": true, "data": {"fields": [{"id": "fldAbc", "name": "title"}]}}))
        .reply(records_response(json!([{"recordId": "recNew", "fields": {}}])));
    let translator = Translator::new(transport);
    let params = params(json!({
        "operation": "createRecord",
        "datasheetId": "dst1",
        "useFieldNames": false,
        "fetchFields": true,
        "fieldsUi": [{"fieldName": "Title", "fieldType": "text", "fieldValue": "x"}]
    }));

    translator.execute(1, &params).await.into_result().unwrap();

    let body = translator.transport().calls()[1].request.body.clone().unwrap();
    assert_eq!(body, json!({"records": [{"fields": {"fldAbc": "x"}}]}));
}

#[tokio::test]
async fn test_create_record_without_fetch_uses_names_verbatim() {
    let transport = FakeTransport::new().reply(records_response(json!([{"recordId": "rec1"}])));
    let translator = Translator::new(transport);
    let params = params(json!({
        "operation": "createRecord",
        "datasheetId": "dst1",
        "fieldsUi": {"fieldValues": [
            {"fieldName": "Title", "fieldType": "text", "fieldValue": "Hello"},
            {"fieldName": "Blocked By", "fieldType": "twoWayLink", "fieldValue": "null"}
        ]}
    }));

    translator.execute(1, &params).await.into_result().unwrap();

    let calls = translator.transport().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].request.body,
        Some(json!({
            "records": [{"fields": {"Title": "Hello", "Blocked By": null}}],
            "fieldKey": "name"
        }))
    );
}

#[tokio::test]
async fn test_edit_record_patches_with_record_id() {
    let transport = FakeTransport::new().reply(records_response(json!([
        {"recordId": "rec1", "fields": {"Done": true}}
    ])));
    let translator = Translator::new(transport);
    let params = params(json!({
        "operation": "editRecord",
        "datasheetId": "dst1",
        "recordId": "rec1",
        "useFieldNames": "false",
        "fieldsUi": {"fieldValues": [
            {"fieldName": "fldDone", "fieldType": "checkbox", "fieldValue": "True"}
        ]}
    }));

    let output = translator.execute(1, &params).await.into_result().unwrap();
    assert_eq!(output[0].json["datasheetId"], "dst1");
    assert_eq!(output[0].json["recordId"], "rec1");

    let calls = translator.transport().calls();
    assert_eq!(calls[0].method, Method::PATCH);
    assert_eq!(
        calls[0].request.body,
        Some(json!({"records": [{"recordId": "rec1", "fields": {"fldDone": true}}]}))
    );
}

#[tokio::test]
async fn test_write_record_unexpected_envelopes() {
    let failure = json!({"success": false, "code": 400, "message": "field not found"});
    let empty = records_response(json!([]));
    let transport = FakeTransport::new().reply(failure.clone()).reply(empty.clone());
    let translator = Translator::new(transport);
    let create = params(json!({"operation": "createRecord", "datasheetId": "dst1"}));
    let edit = params(json!({"operation": "editRecord", "datasheetId": "dst1", "recordId": "rec1"}));

    let output = translator.execute(1, &create).await.into_result().unwrap();
    assert_eq!(
        output[0].json,
        json!({
            "success": false,
            "message": "Record creation failed or error occurred",
            "response": failure
        })
    );

    let output = translator.execute(1, &edit).await.into_result().unwrap();
    assert_eq!(
        output[0].json,
        json!({
            "success": false,
            "message": "Record update failed or error occurred",
            "response": empty
        })
    );
}

#[tokio::test]
async fn test_field_metadata_failure_is_fatal_for_item() {
    let transport = FakeTransport::new().reply(json!({"success": false, "message": "No permission"}));
    let translator = Translator::new(transport).with_run_mode(RunMode::tolerant());
    let params = params(json!({
        "operation": "createRecord",
        "datasheetId": "dst1",
        "fetchFields": true,
        "fieldsUi": [{"fieldName": "Title", "fieldValue": "x"}]
    }));

    let output = translator.execute(1, &params).await.into_result().unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output[0].json["operation"], "createRecord");
    assert_eq!(output[0].json["statusCode"], "unknown");
    assert!(output[0].json["error"]
        .as_str()
        .unwrap()
        .contains("Failed to fetch field metadata: No permission"));

    // The record was never written
    let calls = translator.transport().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/fusion/v1/datasheets/dst1/fields");
}

// ============================================================================
// deleteRecord
// ============================================================================

#[tokio::test]
async fn test_delete_record_uses_query_not_body() {
    let body = json!({"success": true, "code": 200, "data": true});
    let translator = Translator::new(FakeTransport::new().reply(body.clone()));
    let params = params(json!({
        "operation": "deleteRecord",
        "datasheetId": "dst1",
        "recordId": "rec9"
    }));

    let output = translator.execute(1, &params).await.into_result().unwrap();

    assert_eq!(
        output,
        vec![OutputRecord::new(
            json!({
                "success": true,
                "message": "Record deleted successfully",
                "recordId": "rec9",
                "datasheetId": "dst1",
                "response": body
            }),
            0
        )]
    );

    let calls = translator.transport().calls();
    assert_eq!(calls[0].method, Method::DELETE);
    assert_eq!(calls[0].path, "/fusion/v1/datasheets/dst1/records");
    assert_eq!(calls[0].request.query.get("recordIds"), Some(&"rec9".to_string()));
    assert!(calls[0].request.body.is_none());
}

#[tokio::test]
async fn test_delete_record_failure_envelope() {
    let body = json!({"success": false, "message": "record not found"});
    let translator = Translator::new(FakeTransport::new().reply(body.clone()));
    let params = params(json!({"operation": "deleteRecord", "datasheetId": "dst1", "recordId": "rec9"}));

    let output = translator.execute(1, &params).await.into_result().unwrap();
    assert_eq!(
        output[0].json,
        json!({
            "success": false,
            "message": "Record deletion failed or error occurred",
            "response": body
        })
    );
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_missing_identifiers_fail_before_any_call() {
    let cases = [
        json!({"operation": "createRecord", "fieldsUi": [{"fieldName": "A", "fieldValue": "b"}]}),
        json!({"operation": "editRecord", "recordId": "rec1"}),
        json!({"operation": "editRecord", "datasheetId": "dst1"}),
        json!({"operation": "deleteRecord", "recordId": "rec1"}),
        json!({"operation": "deleteRecord", "datasheetId": "dst1", "recordId": "  "}),
        json!({"operation": "searchNodesInDatasheet", "datasheetId": ""}),
    ];

    for case in cases {
        let translator = Translator::new(FakeTransport::new());
        let err = translator
            .execute(1, &params(case.clone()))
            .await
            .into_result()
            .unwrap_err();

        assert!(err.is_validation(), "{case}: {err}");
        assert!(matches!(err, Error::Item { item_index: 0, .. }), "{case}: {err}");
        assert!(translator.transport().calls().is_empty(), "{case}");
    }
}

#[tokio::test]
async fn test_missing_datasheet_message() {
    let translator = Translator::new(FakeTransport::new());
    let params = params(json!({"operation": "deleteRecord", "recordId": "rec1"}));

    let err = translator.execute(1, &params).await.into_result().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error during deleteRecord operation on item 0: Datasheet ID is required"
    );
}

#[tokio::test]
async fn test_identifier_with_path_separator_is_rejected() {
    let translator = Translator::new(FakeTransport::new());
    let params = params(json!({"operation": "deleteRecord", "datasheetId": "dst1/../x", "recordId": "rec1"}));

    let err = translator.execute(1, &params).await.into_result().unwrap_err();
    assert!(err.is_validation());
    assert!(translator.transport().calls().is_empty());
}

#[tokio::test]
async fn test_unknown_operation() {
    let translator = Translator::new(FakeTransport::new()).with_run_mode(RunMode::tolerant());
    let params = params(json!({"operation": "truncateDatasheet"}));

    let output = translator.execute(1, &params).await.into_result().unwrap();
    assert_eq!(
        output[0].json,
        json!({
            "error": "Unknown operation: truncateDatasheet",
            "operation": "truncateDatasheet",
            "statusCode": "unknown"
        })
    );
}

// ============================================================================
// Batch semantics
// ============================================================================

#[tokio::test]
async fn test_tolerant_mode_keeps_a_slot_per_item() {
    let transport = FakeTransport::new()
        .reply(records_response(json!([{"recordId": "a", "fields": {"Name": "A"}}])))
        .fail(Error::http_status(500, "upstream down"))
        .reply(records_response(json!([{"recordId": "c", "fields": {"Name": "C"}}])));
    let translator = Translator::new(transport).with_run_mode(RunMode::tolerant());
    let params = params(json!({"operation": "searchNodesInDatasheet"})).with_items(vec![
        object(json!({"datasheetId": "dstA"})),
        object(json!({"datasheetId": "dstB"})),
        object(json!({"datasheetId": "dstC"})),
    ]);

    let execution = translator.execute(params.item_count(), &params).await;
    assert!(execution.is_complete());
    let output = execution.output;

    assert_eq!(output.len(), 3);
    assert_eq!(
        output.iter().map(|r| r.paired_item).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(output[0].json["recordId"], "a");
    assert_eq!(
        output[1].json,
        json!({
            "success": false,
            "message": "Error fetching records: HTTP 500: upstream down",
            "datasheetId": "dstB"
        })
    );
    assert_eq!(output[2].json["datasheetId"], "dstC");
}

#[tokio::test]
async fn test_strict_mode_stops_and_keeps_prior_output() {
    let transport = FakeTransport::new()
        .reply(records_response(json!([{"recordId": "a", "fields": {}}])))
        .fail(Error::http_status(502, "bad gateway"))
        .reply(records_response(json!([{"recordId": "c", "fields": {}}])));
    let translator = Translator::new(transport);
    let params = params(json!({"operation": "searchNodesInDatasheet"})).with_items(vec![
        object(json!({"datasheetId": "dstA"})),
        object(json!({"datasheetId": "dstB"})),
        object(json!({"datasheetId": "dstC"})),
    ]);

    let execution = translator.execute(params.item_count(), &params).await;

    assert_eq!(execution.output.len(), 1);
    assert_eq!(execution.output[0].json["datasheetId"], "dstA");
    match execution.error {
        Some(Error::Item {
            operation,
            item_index,
            source,
        }) => {
            assert_eq!(operation, "searchNodesInDatasheet");
            assert_eq!(item_index, 1);
            assert_eq!(source.status_code(), Some(502));
        }
        other => panic!("expected item error, got {other:?}"),
    }
    assert_eq!(translator.transport().calls().len(), 2);
}

#[tokio::test]
async fn test_tolerant_search_nodes_transport_error() {
    let transport = FakeTransport::new().fail(Error::http_status(
        401,
        r#"{"success":false,"code":401,"message":"Unauthorized"}"#,
    ));
    let translator = Translator::new(transport).with_run_mode(RunMode::tolerant());
    let params = params(json!({"operation": "searchNodes", "spaceId": "spc1"}));

    let output = translator.execute(1, &params).await.into_result().unwrap();

    assert_eq!(output[0].json["operation"], "searchNodes");
    assert_eq!(output[0].json["statusCode"], 401);
    assert_eq!(output[0].json["errorDetails"]["message"], "Unauthorized");
}

#[tokio::test]
async fn test_tolerant_delete_error_carries_ids() {
    let transport = FakeTransport::new().fail(Error::Timeout { timeout_ms: 30000 });
    let translator = Translator::new(transport).with_run_mode(RunMode::tolerant());
    let params = params(json!({"operation": "deleteRecord", "datasheetId": "dst1", "recordId": "rec1"}));

    let output = translator.execute(1, &params).await.into_result().unwrap();
    assert_eq!(
        output[0].json,
        json!({
            "success": false,
            "message": "Error deleting record: Request timeout after 30000ms",
            "datasheetId": "dst1",
            "recordId": "rec1"
        })
    );
}

#[tokio::test]
async fn test_api_version_v2_paths() {
    let transport = FakeTransport::new().reply(json!({"success": true, "data": true}));
    let translator = Translator::new(transport).with_api_version(ApiVersion::V2);
    let params = params(json!({"operation": "deleteRecord", "datasheetId": "dst1", "recordId": "rec1"}));

    translator.execute(1, &params).await.into_result().unwrap();
    assert_eq!(
        translator.transport().calls()[0].path,
        "/fusion/v2/datasheets/dst1/records"
    );
}

// ============================================================================
// Parameters and search helpers
// ============================================================================

#[test]
fn test_item_overrides_win() {
    let params = params(json!({"operation": "searchNodes", "spaceId": "spcShared"}))
        .with_items(vec![object(json!({})), object(json!({"spaceId": "spcOwn"}))]);

    assert_eq!(params.item_count(), 2);
    assert_eq!(params.get_param("spaceId", 0), Some(json!("spcShared")));
    assert_eq!(params.get_param("spaceId", 1), Some(json!("spcOwn")));
    assert_eq!(params.get_param("spaceId", 7), Some(json!("spcShared")));
    assert_eq!(params.get_param("missing", 0), None);
}

#[test]
fn test_item_params_accessors() {
    let source = params(json!({
        "flag": "TRUE",
        "off": false,
        "count": "40",
        "float": 12.0,
        "negative": -1,
        "list": "0, 1,,3",
        "array": [0, "2"],
        "number": 5
    }));
    let item = ItemParams::new(&source, 0);

    assert!(item.bool_or("flag", false).unwrap());
    assert!(!item.bool_or("off", true).unwrap());
    assert!(item.bool_or("unset", true).unwrap());
    assert_eq!(item.u64_or("count", 100).unwrap(), 40);
    assert_eq!(item.u64_or("float", 100).unwrap(), 12);
    assert_eq!(item.u64_or("unset", 100).unwrap(), 100);
    assert!(item.u64_or("negative", 100).is_err());
    assert_eq!(item.string_list("list").unwrap(), vec!["0", "1", "3"]);
    assert_eq!(item.string_list("array").unwrap(), vec!["0", "2"]);
    assert_eq!(item.string("number").unwrap(), "5");
    assert_eq!(item.optional("unset").unwrap(), None);
    assert!(item.string("array").is_err());
}

#[test]
fn test_operation_kind_parsing() {
    assert_eq!(
        "searchNodesInDatasheet".parse::<OperationKind>().unwrap(),
        OperationKind::SearchNodesInDatasheet
    );
    assert!("SearchNodes".parse::<OperationKind>().is_err());
    assert_eq!(OperationKind::default(), OperationKind::SearchNodes);
    assert_eq!(
        serde_json::to_value(OperationKind::DeleteRecord).unwrap(),
        json!("deleteRecord")
    );
}

#[test]
fn test_record_matches_only_string_fields() {
    let record = object(json!({
        "recordId": "rec1",
        "fields": {"Count": 42, "Tags": ["alpha"], "Notes": "Mentions ALPHA here"}
    }));

    assert!(record_matches(&record, "alpha"));
    assert!(!record_matches(&record, "42"));
    assert!(!record_matches(&object(json!({"recordId": "rec2"})), "alpha"));
}

#[test]
fn test_filter_records_is_or_across_fields() {
    let records = vec![
        object(json!({"fields": {"Name": "Alpha"}})),
        object(json!({"fields": {"Name": "Beta"}})),
        object(json!({"fields": {"Name": "Gamma", "Notes": "see alpine"}})),
    ];

    let kept = filter_records(records, "ALP");
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0]["fields"]["Name"], "Alpha");
    assert_eq!(kept[1]["fields"]["Name"], "Gamma");
}

// ============================================================================
// Credential probe
// ============================================================================

#[tokio::test]
async fn test_check_connection() {
    let transport = FakeTransport::new()
        .reply(json!({"success": true, "data": {"spaces": [{"id": "spc1", "name": "Team"}]}}))
        .reply(json!({"success": false, "code": 401, "message": "Invalid API token"}));
    let translator = Translator::new(transport);

    translator.check_connection().await.unwrap();

    let err = translator.check_connection().await.unwrap_err();
    assert_eq!(err.to_string(), "Credential check failed: Invalid API token");

    let calls = translator.transport().calls();
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/fusion/v1/spaces");
}

#[tokio::test]
async fn test_unreadable_operation_is_not_blamed_on_default() {
    let translator = Translator::new(FakeTransport::new()).with_run_mode(RunMode::tolerant());
    let params = params(json!({"operation": {"bad": 1}, "spaceId": "spc1"}));

    let output = translator.execute(1, &params).await.into_result().unwrap();

    assert_eq!(output[0].json["operation"], r#"{"bad":1}"#);
    assert_eq!(output[0].json["statusCode"], "unknown");
    assert!(output[0].json["error"]
        .as_str()
        .unwrap()
        .contains("Invalid value for parameter 'operation'"));
    assert!(translator.transport().calls().is_empty());
}

#[tokio::test]
async fn test_strict_error_names_the_given_operation() {
    let translator = Translator::new(FakeTransport::new());
    let params = params(json!({"operation": 7, "spaceId": "spc1"}));

    let err = translator.execute(1, &params).await.into_result().unwrap_err();
    match err {
        Error::Item { operation, .. } => assert_eq!(operation, "7"),
        other => panic!("expected item error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unset_operation_is_attributed_to_search_nodes() {
    let translator = Translator::new(FakeTransport::new()).with_run_mode(RunMode::tolerant());
    let params = params(json!({"operation": null}));

    let output = translator.execute(1, &params).await.into_result().unwrap();
    assert_eq!(output[0].json["operation"], "searchNodes");
    assert_eq!(output[0].json["error"], "Space ID is required");
}
