use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of tracker operations. All of them are terminal for the current invocation; the
/// caller decides how to report them.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("store file {} does not exist", .0.display())]
    StoreMissing(PathBuf),

    #[error("store file {} is not a valid store document: {source}", .path.display())]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("month {0} is not initialized yet")]
    MonthNotInitialized(String),

    #[error("day {day} is not a tracked day in {month}")]
    DayNotTracked { month: String, day: u32 },

    #[error("value '{0}' is not allowed")]
    ValueNotAllowed(String),

    #[error("value for day {day} in {month} is already set to '{current}'")]
    AlreadySet {
        month: String,
        day: u32,
        current: String,
    },

    #[error("'{0}' is not a month key, expected MM.YYYY or t")]
    InvalidMonthKey(String),

    #[error("{0} is not a valid date")]
    InvalidDate(String),

    #[error("store I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),
}
