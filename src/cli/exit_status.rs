use std::process::ExitCode;

/// Exit status of a `sayable` run.
///
/// - `Success` (0): catalogues written or compiled, no error diagnostics
/// - `Failure` (1): the run finished but reported malformed messages, or
///   `init` found an existing config
/// - `Error` (2): the run aborted (invalid config, corrupt catalogue, I/O)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    /// `Failure` when any error diagnostic was reported.
    pub fn from_error_count(errors: usize) -> Self {
        if errors > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
