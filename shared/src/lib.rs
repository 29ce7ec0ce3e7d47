//! Shared types for the returns & wastage analytics service
//!
//! Wire-contract types used by the report server and its clients:
//! transaction models, report facet structures, the response envelope
//! and small utilities.

pub mod models;
pub mod report;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{CollectionType, TransactionLine, TrxType};
pub use report::ReportData;
pub use response::{ReportEnvelope, ReportMetadata};
