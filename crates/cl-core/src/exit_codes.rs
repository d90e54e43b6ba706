//! Exit codes for the `chemlight` CLI.
//!
//! A send that fails after startup is still exit 0: sends are
//! fire-and-forget and their failures only appear in the log stream.
//! Non-zero codes cover problems detected before anything is sent.

/// Exit codes for `chemlight` invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The operation ran (delivery outcome is in the log).
    Clean = 0,

    /// Invalid arguments.
    ArgsError = 10,

    /// Configuration could not be loaded or is invalid.
    ConfigError = 11,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}
