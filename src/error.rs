//! Error codes shared by user-facing failures.
//!
//! DESIGN
//! ======
//! Every error the UI shell can surface implements [`ErrorCode`]: a grepable
//! `E_*` code for logs, a short inline message for the user, and whether the
//! user can reasonably try again. The shell never shows `Display` output
//! directly; that text is for logs.

/// Grepable error code, inline message, and retryable flag.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    /// Message shown inline next to the form or canvas.
    fn user_message(&self) -> String;

    fn retryable(&self) -> bool {
        false
    }
}
