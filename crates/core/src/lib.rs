//! Core utilities for ClickUp tooling
//!
//! Pure helpers shared by the API client and the reporting tools:
//!
//! - **Batching**: split identifier lists into bulk-endpoint sized chunks
//! - **Timestamps**: parse the service's millisecond timestamp strings
//! - **Workdays**: count business days spanned by a status period
//!
//! # Example
//!
//! ```rust
//! use clickup_core::{business_days_between, partition, status_interval};
//!
//! let ids: Vec<String> = (0..150).map(|i| i.to_string()).collect();
//! assert_eq!(partition(&ids, 100).unwrap().len(), 2);
//!
//! let (start, end) = status_interval("1704067200000", 60 * 24 * 7).unwrap();
//! assert_eq!(business_days_between(&start, &end), 5);
//! ```

#![warn(missing_docs)]

pub mod chunk;
pub mod error;
pub mod timestamp;
pub mod workdays;

pub use chunk::{chunk_count, partition};
pub use error::{CoreError, CoreResult};
pub use timestamp::{parse_unix_millis, status_interval};
pub use workdays::{business_days_between, business_days_between_dates, BUSINESS_DAYS_PER_WEEK};
