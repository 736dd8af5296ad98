//! Revocation integration tests against the mock Nomad ACL API

pub mod revoke;
pub mod server;
