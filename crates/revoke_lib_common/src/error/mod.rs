mod bag;
mod custom;
mod submit;
mod wrapped;

pub use bag::ErrorBag;
pub use custom::{CustomError, TransactionFailedError};
pub use submit::{SubmitError, UNSUPPORTED_OPERATION_CODE};
pub use wrapped::RevokeError;

/// Export macros for creating errors
mod macros;
