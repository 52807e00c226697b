//! Exit code logic for `dops bulkdownload`.
//!
//! Per-item failures are reported, not fatal, unless the caller opts in.

use crate::ProcessExit;

/// Maps a finished run to the process exit outcome.
pub(crate) fn determine_exit_outcome(
    failed: usize,
    interrupted: bool,
    fail_on_error: bool,
) -> ProcessExit {
    if interrupted {
        ProcessExit::Interrupted
    } else if fail_on_error && failed > 0 {
        ProcessExit::Failure
    } else {
        ProcessExit::Success
    }
}
