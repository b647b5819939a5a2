//! Endpoint paths

use crate::types::ApiVersion;

/// Builds request paths under `/fusion/{version}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Endpoints {
    version: ApiVersion,
}

impl Endpoints {
    /// Paths for the given API version
    pub fn new(version: ApiVersion) -> Self {
        Self { version }
    }

    /// `GET /spaces`, also used as the credential probe
    pub fn spaces(&self) -> String {
        format!("{}/spaces", self.version.prefix())
    }

    /// `GET /spaces/{spaceId}/nodes`
    pub fn space_nodes(&self, space_id: &str) -> String {
        format!("{}/spaces/{space_id}/nodes", self.version.prefix())
    }

    /// `GET|POST|PATCH|DELETE /datasheets/{datasheetId}/records`
    pub fn records(&self, datasheet_id: &str) -> String {
        format!("{}/datasheets/{datasheet_id}/records", self.version.prefix())
    }

    /// `GET /datasheets/{datasheetId}/fields`
    pub fn fields(&self, datasheet_id: &str) -> String {
        format!("{}/datasheets/{datasheet_id}/fields", self.version.prefix())
    }
}
