//! Domain models
//!
//! Row-level shapes of the external transaction log. These are read-only
//! from the service's point of view; the write path lives elsewhere.

pub mod transaction_line;

pub use transaction_line::{CollectionType, TransactionLine, TrxType};
