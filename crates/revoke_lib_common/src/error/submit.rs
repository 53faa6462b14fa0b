use thiserror::Error;

/// JSON-RPC server error code wallets and nodes return when a call cannot be executed,
/// e.g. tokens that refuse to change a non-zero allowance to another non-zero value
pub const UNSUPPORTED_OPERATION_CODE: i64 = -32000;

/// Failure reported by the signing provider while submitting a transaction
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Submission failed (code {code:?}): {message}")]
pub struct SubmitError {
    pub code: Option<i64>,
    pub message: String,
}

impl SubmitError {
    pub fn new(code: Option<i64>, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    pub fn without_code(message: &str) -> Self {
        Self::new(None, message)
    }

    /// Extracts the provider error code, preferring the code of the nested provider error
    /// (carried in the `data` member) over the outer JSON-RPC code.
    pub fn from_web3(err: &web3::Error) -> Self {
        match err {
            web3::Error::Rpc(rpc_err) => {
                let nested_code = rpc_err
                    .data
                    .as_ref()
                    .and_then(|data| data.get("code"))
                    .and_then(|code| code.as_i64());
                Self {
                    code: Some(nested_code.unwrap_or_else(|| rpc_err.code.code())),
                    message: rpc_err.message.clone(),
                }
            }
            other => Self {
                code: None,
                message: other.to_string(),
            },
        }
    }

    pub fn is_unsupported_operation(&self) -> bool {
        self.code == Some(UNSUPPORTED_OPERATION_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpc_core::{Error as RpcError, ErrorCode};

    #[test]
    fn test_code_from_rpc_error() {
        let err = web3::Error::Rpc(RpcError {
            code: ErrorCode::ServerError(-32000),
            message: "execution reverted".to_string(),
            data: None,
        });
        let submit_err = SubmitError::from_web3(&err);
        assert_eq!(submit_err.code, Some(-32000));
        assert!(submit_err.is_unsupported_operation());
        assert_eq!(submit_err.message, "execution reverted");
    }

    #[test]
    fn test_nested_code_takes_precedence() {
        let err = web3::Error::Rpc(RpcError {
            code: ErrorCode::InternalError,
            message: "Internal JSON-RPC error.".to_string(),
            data: Some(serde_json::json!({"code": -32000, "message": "approve from non-zero"})),
        });
        let submit_err = SubmitError::from_web3(&err);
        assert_eq!(submit_err.code, Some(-32000));
    }

    #[test]
    fn test_transport_error_has_no_code() {
        let submit_err = SubmitError::from_web3(&web3::Error::Unreachable);
        assert_eq!(submit_err.code, None);
        assert!(!submit_err.is_unsupported_operation());
    }
}
