//! Result type alias for Stockroom

use super::errors::StockroomError;

/// Result type alias for Stockroom operations
///
/// # Examples
///
/// ```
/// use stockroom::domain::result::Result;
/// use stockroom::domain::errors::StockroomError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(StockroomError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, StockroomError>;
