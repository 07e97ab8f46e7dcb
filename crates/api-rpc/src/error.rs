//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use deployq_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>)
        }
    }
}

/// Reject a request whose field is missing or blank
pub fn require_non_blank(field: &str, value: &str) -> Result<(), ErrorObjectOwned> {
    if value.trim().is_empty() {
        return Err(to_rpc_error(AppError::Validation(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deployq_core::domain::DomainError;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            to_rpc_error(AppError::Validation("bad".into())).code(),
            code::VALIDATION_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::Domain(DomainError::EmptyQueue)).code(),
            code::INTERNAL_ERROR
        );

        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            to_rpc_error(AppError::Serialization(bad_json)).code(),
            code::INTERNAL_ERROR
        );
    }

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("user_id", "U1").is_ok());
        let err = require_non_blank("user_id", "  ").unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert!(err.message().contains("user_id"));
    }
}
