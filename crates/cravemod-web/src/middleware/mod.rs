pub mod canonical_host;
pub mod security_headers;
