//! Operations and their typed parameters

use super::params::{ItemParams, ParameterSource};
use crate::error::{Error, Result};
use crate::fields::{parse_fields_ui, FieldSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default `maxResults` for record searches
pub const DEFAULT_MAX_RESULTS: u64 = 100;

// ============================================================================
// Operation Kind
// ============================================================================

/// Operation selector, spelled the way the host's `operation` parameter spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    #[default]
    SearchNodes,
    SearchNodesInDatasheet,
    CreateRecord,
    EditRecord,
    DeleteRecord,
}

impl OperationKind {
    /// Every supported operation
    pub const ALL: [OperationKind; 5] = [
        OperationKind::SearchNodes,
        OperationKind::SearchNodesInDatasheet,
        OperationKind::CreateRecord,
        OperationKind::EditRecord,
        OperationKind::DeleteRecord,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::SearchNodes => "searchNodes",
            OperationKind::SearchNodesInDatasheet => "searchNodesInDatasheet",
            OperationKind::CreateRecord => "createRecord",
            OperationKind::EditRecord => "editRecord",
            OperationKind::DeleteRecord => "deleteRecord",
        }
    }

    /// One-line description for listings
    pub fn description(self) -> &'static str {
        match self {
            OperationKind::SearchNodes => {
                "Search for nodes (datasheets, folders, forms, ...) in a space"
            }
            OperationKind::SearchNodesInDatasheet => {
                "Search and retrieve records from a datasheet (simple search or formula filter)"
            }
            OperationKind::CreateRecord => "Create a record in a datasheet",
            OperationKind::EditRecord => "Update fields of an existing record",
            OperationKind::DeleteRecord => "Delete a record from a datasheet",
        }
    }

    /// Parameters the operation reads
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            OperationKind::SearchNodes => &["spaceId", "nodeType", "query", "permissions"],
            OperationKind::SearchNodesInDatasheet => &[
                "datasheetId",
                "searchTerm",
                "filterByFormula",
                "columnsToSearch",
                "maxResults",
            ],
            OperationKind::CreateRecord => {
                &["datasheetId", "useFieldNames", "fetchFields", "fieldsUi"]
            }
            OperationKind::EditRecord => &[
                "datasheetId",
                "recordId",
                "useFieldNames",
                "fetchFields",
                "fieldsUi",
            ],
            OperationKind::DeleteRecord => &["datasheetId", "recordId"],
        }
    }

    /// Read the `operation` parameter; unset means `searchNodes`
    pub fn resolve<P: ParameterSource + ?Sized>(params: &ItemParams<'_, P>) -> Result<Self> {
        let name = params.string("operation")?;
        if name.is_empty() {
            return Ok(Self::default());
        }
        name.parse()
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Node Type & Permissions
// ============================================================================

/// Kind of node to search for in a space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeType {
    #[default]
    Datasheet,
    Folder,
    Form,
    Dashboard,
    Mirror,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Datasheet => "Datasheet",
            NodeType::Folder => "Folder",
            NodeType::Form => "Form",
            NodeType::Dashboard => "Dashboard",
            NodeType::Mirror => "Mirror",
        }
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "datasheet" => Ok(NodeType::Datasheet),
            "folder" => Ok(NodeType::Folder),
            "form" => Ok(NodeType::Form),
            "dashboard" => Ok(NodeType::Dashboard),
            "mirror" => Ok(NodeType::Mirror),
            _ => Err(Error::invalid_param(
                "nodeType",
                format!("'{s}' is not one of Datasheet, Folder, Form, Dashboard, Mirror"),
            )),
        }
    }
}

/// Permission level filter for node search
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermissionLevel {
    Manager,
    Editor,
    UpdateOnly,
    ReadOnly,
}

impl PermissionLevel {
    /// Numeric code the API expects
    pub fn code(self) -> u8 {
        match self {
            PermissionLevel::Manager => 0,
            PermissionLevel::Editor => 1,
            PermissionLevel::UpdateOnly => 2,
            PermissionLevel::ReadOnly => 3,
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0" => Ok(PermissionLevel::Manager),
            "1" => Ok(PermissionLevel::Editor),
            "2" => Ok(PermissionLevel::UpdateOnly),
            "3" => Ok(PermissionLevel::ReadOnly),
            other => Err(Error::invalid_param(
                "permissions",
                format!("'{other}' is not a permission level (0-3)"),
            )),
        }
    }
}

// ============================================================================
// Operation Parameters
// ============================================================================

/// `searchNodes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNodesParams {
    pub space_id: String,
    pub node_type: NodeType,
    pub query: Option<String>,
    pub permissions: Vec<PermissionLevel>,
}

impl SearchNodesParams {
    /// Comma-joined permission codes, `None` when no filter was chosen
    pub fn permissions_param(&self) -> Option<String> {
        if self.permissions.is_empty() {
            return None;
        }
        Some(
            self.permissions
                .iter()
                .map(|p| p.code().to_string())
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// `searchNodesInDatasheet`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecordsParams {
    pub datasheet_id: String,
    /// Client-side "contains" filter over string field values
    pub search_term: Option<String>,
    /// Server-side formula, forwarded verbatim
    pub filter_by_formula: Option<String>,
    /// Comma-separated field IDs, forwarded verbatim as `fieldIds`
    pub columns_to_search: Option<String>,
    pub max_results: u64,
}

/// `createRecord` and `editRecord`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecordParams {
    pub datasheet_id: String,
    /// Set for edits, unset for creates
    pub record_id: Option<String>,
    /// Send `fieldKey: "name"` so the API accepts field names as keys
    pub use_field_names: bool,
    /// Fetch the datasheet schema first and map field names to IDs
    pub fetch_fields: bool,
    pub fields: Vec<FieldSpec>,
}

/// `deleteRecord`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecordParams {
    pub datasheet_id: String,
    pub record_id: String,
}

// ============================================================================
// Operation
// ============================================================================

/// A fully resolved operation for one input item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    SearchNodes(SearchNodesParams),
    SearchRecords(SearchRecordsParams),
    CreateRecord(WriteRecordParams),
    EditRecord(WriteRecordParams),
    DeleteRecord(DeleteRecordParams),
}

impl Operation {
    /// Read and validate the parameters of `kind`.
    ///
    /// Missing identifiers fail here, before anything touches the network.
    pub fn resolve<P: ParameterSource + ?Sized>(
        kind: OperationKind,
        params: &ItemParams<'_, P>,
    ) -> Result<Self> {
        match kind {
            OperationKind::SearchNodes => {
                let space_id = params.identifier("spaceId", "Space ID")?;
                let node_type = match params.optional("nodeType")? {
                    Some(name) => name.parse()?,
                    None => NodeType::default(),
                };
                let permissions = params
                    .string_list("permissions")?
                    .iter()
                    .map(|code| code.parse())
                    .collect::<Result<Vec<PermissionLevel>>>()?;

                Ok(Operation::SearchNodes(SearchNodesParams {
                    space_id,
                    node_type,
                    query: params.optional("query")?,
                    permissions,
                }))
            }

            OperationKind::SearchNodesInDatasheet => {
                let datasheet_id = params.identifier("datasheetId", "Datasheet ID")?;

                Ok(Operation::SearchRecords(SearchRecordsParams {
                    datasheet_id,
                    search_term: params.optional("searchTerm")?,
                    filter_by_formula: params.optional("filterByFormula")?,
                    columns_to_search: params.optional("columnsToSearch")?,
                    max_results: params.u64_or("maxResults", DEFAULT_MAX_RESULTS)?,
                }))
            }

            OperationKind::CreateRecord | OperationKind::EditRecord => {
                let datasheet_id = params.identifier("datasheetId", "Datasheet ID")?;
                let record_id = if kind == OperationKind::EditRecord {
                    Some(params.identifier("recordId", "Record ID")?)
                } else {
                    None
                };

                let write = WriteRecordParams {
                    datasheet_id,
                    record_id,
                    use_field_names: params.bool_or("useFieldNames", true)?,
                    fetch_fields: params.bool_or("fetchFields", false)?,
                    fields: parse_fields_ui(params.raw("fieldsUi").as_ref())?,
                };

                Ok(if kind == OperationKind::EditRecord {
                    Operation::EditRecord(write)
                } else {
                    Operation::CreateRecord(write)
                })
            }

            OperationKind::DeleteRecord => {
                let datasheet_id = params.identifier("datasheetId", "Datasheet ID")?;
                let record_id = params.identifier("recordId", "Record ID")?;

                Ok(Operation::DeleteRecord(DeleteRecordParams {
                    datasheet_id,
                    record_id,
                }))
            }
        }
    }
}
