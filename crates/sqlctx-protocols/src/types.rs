//! Common utility types.

use std::collections::HashMap;

/// Metadata map attached to vector store entries.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Metadata key holding a record's domain tags.
pub const DOMAIN_TAGS_KEY: &str = "domain_tags";
