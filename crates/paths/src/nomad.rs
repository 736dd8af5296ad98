//! # Nomad ACL API Paths
//!
//! API Reference: https://developer.hashicorp.com/nomad/api-docs/acl/tokens

/// Version prefix shared by every Nomad HTTP API path
pub const API_VERSION: &str = "v1";

/// Axum route for a single ACL token addressed by accessor ID
pub const ACL_TOKEN_ROUTE: &str = "/v1/acl/token/{accessor_id}";

/// Header carrying the caller's ACL secret ID
pub const TOKEN_HEADER: &str = "X-Nomad-Token";

/// ACL token operations used against a Nomad cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclOperation {
    /// `DELETE /v1/acl/token/:accessor_id`
    DeleteToken,
}

impl AclOperation {
    /// Static path segments preceding the accessor ID
    pub fn segments(self) -> &'static [&'static str] {
        match self {
            AclOperation::DeleteToken => &[API_VERSION, "acl", "token"],
        }
    }

    /// HTTP method name for the operation
    pub fn method(self) -> &'static str {
        match self {
            AclOperation::DeleteToken => "DELETE",
        }
    }

    /// Plain HTTP path for the given accessor ID (no percent-encoding applied)
    pub fn path(self, accessor_id: &str) -> String {
        format!("/{}/{accessor_id}", self.segments().join("/"))
    }
}
