//! Domain models and types for Ward.
//!
//! This module contains the entity models, identifier rules, and the error
//! taxonomy shared by the store and HTTP layers.
//!
//! # Overview
//!
//! - **Entity models** ([`Patient`], [`MedicalRecord`], [`Medication`])
//! - **Error types** ([`WardError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Identifier assignment
//!
//! Clients may submit an empty id or the `"@new"` sentinel to have the
//! server assign a fresh UUID:
//!
//! ```rust
//! use ward::domain::assign_id;
//!
//! let id = assign_id("@new");
//! assert_eq!(id.len(), 36);
//!
//! let kept = assign_id("pat123456");
//! assert_eq!(kept, "pat123456");
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```rust
//! use ward::domain::{Result, WardError};
//!
//! fn example() -> Result<()> {
//!     Err(WardError::Validation("invalid input".to_string()))
//! }
//! ```

pub mod errors;
pub mod medical_record;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{StoreError, WardError};
pub use medical_record::{MedicalRecord, Medication};
pub use patient::{find_insurance_conflict, Patient};
pub use result::Result;

/// Sentinel id value meaning "server assigns a new identifier"
pub const NEW_ID_SENTINEL: &str = "@new";

/// Resolves the identifier for a newly created entity
///
/// An empty string or the [`NEW_ID_SENTINEL`] yields a fresh UUID v4; any
/// other value is kept as-is.
pub fn assign_id(requested: &str) -> String {
    if requested.is_empty() || requested == NEW_ID_SENTINEL {
        uuid::Uuid::new_v4().to_string()
    } else {
        requested.to_string()
    }
}
