//! # sqlctx Core
//!
//! The hybrid retrieval engine that grounds an SQL assistant with logic
//! examples and schema fragments.
//!
//! ## How It Works
//!
//! 1. The query is embedded in the logic space and matched against stored
//!    question/SQL examples
//! 2. If any example passes the domain's distance threshold, the tables it
//!    touches are expanded through foreign-key joins and topped up with a
//!    direct schema search (logic-driven)
//! 3. Otherwise schemas are searched directly and each hit pulls in its
//!    joined tables (schema-only)
//! 4. Without an explicit domain, the domain is detected from the selected
//!    records and the selection is re-filtered under its thresholds

mod detector;
mod domain;
mod error;
mod expander;
mod request;
mod result;
mod retriever;
mod scorer;

pub use detector::{Detection, DomainDetector};
pub use domain::{DomainConfig, DomainOverrides, DomainRegistry};
pub use error::{Collaborator, ErrorKind, Phase, RetrievalError};
pub use expander::{AutoJoinExpander, Expansion, SchemaLookup, SchemaSnapshot};
pub use request::RetrievalRequest;
pub use result::{RetrievalResult, Strategy};
pub use retriever::{Retriever, RetrieverOptions};
pub use scorer::{score, shortlist, tokenize, Candidate, HybridScorer};
