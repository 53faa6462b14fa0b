use super::ErrorBag;
use std::error::Error;

/// Error type build over ErrorBag, containing source code location and optional message
/// Note that only creating via macro is possible to catch line and file
#[derive(Debug)]
pub struct RevokeError {
    pub inner: ErrorBag,
    pub msg: Option<String>,
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl RevokeError {
    /// Message without the source location, suitable for showing to the user
    pub fn user_message(&self) -> String {
        match &self.msg {
            Some(msg) => format!("{}, {}", msg, self.inner),
            None => self.inner.to_string(),
        }
    }
}

impl Error for RevokeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}

impl std::fmt::Display for RevokeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file_loc = self.file.replace('\\', "/");
        if let Some(msg) = &self.msg {
            write!(
                f,
                "{}, {}, {}:{}:{}",
                msg, self.inner, file_loc, self.line, self.column
            )
        } else {
            write!(
                f,
                "{}, {}:{}:{}",
                self.inner, file_loc, self.line, self.column
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::err_custom_create;

    #[test]
    fn test_error_location() {
        let err = err_custom_create!("Chain {} not found", "mainnet");
        assert!(err.to_string().starts_with("CustomError: Chain mainnet not found, "));
        assert!(err
            .to_string()
            .contains(&format!("wrapped.rs:{}:", err.line)));
        assert_eq!(err.user_message(), "CustomError: Chain mainnet not found");
    }
}
