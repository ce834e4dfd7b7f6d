//! Result type alias for Ward
//!
//! This module provides a convenient Result type alias that uses WardError
//! as the error type.

use super::errors::WardError;

/// Result type alias for Ward operations
///
/// This is a convenience type alias that uses `WardError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use ward::domain::result::Result;
/// use ward::domain::errors::WardError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(WardError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, WardError>;
