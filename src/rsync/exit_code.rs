/// Exit codes that still produce a usable itemized listing: success, partial
/// transfer due to error, and partial transfer due to vanished source files
pub const ACCEPTED_EXIT_CODES: [i32; 3] = [0, 23, 24];

/// Check whether the listing from a run that ended with `code` can be trusted
#[must_use]
pub fn is_accepted(code: i32) -> bool {
    ACCEPTED_EXIT_CODES.contains(&code)
}

/// rsync's documented meaning of an exit code
#[must_use]
pub const fn describe(code: i32) -> &'static str {
    match code {
        0 => "Success",
        1 => "Syntax or usage error",
        2 => "Protocol incompatibility",
        3 => "Errors selecting input/output files, dirs",
        4 => "Requested action not supported",
        5 => "Error starting client-server protocol",
        6 => "Daemon unable to append to log-file",
        10 => "Error in socket I/O",
        11 => "Error in file I/O",
        12 => "Error in rsync protocol data stream",
        13 => "Errors with program diagnostics",
        14 => "Error in IPC code",
        20 => "Received SIGUSR1 or SIGINT",
        21 => "Some error returned by waitpid()",
        22 => "Error allocating core memory buffers",
        23 => "Partial transfer due to error",
        24 => "Partial transfer due to vanished source files",
        25 => "The --max-delete limit stopped deletions",
        30 => "Timeout in data send/receive",
        35 => "Timeout waiting for daemon connection",
        255 => "Remote shell failed (ssh)",
        _ => "Unknown exit code",
    }
}
