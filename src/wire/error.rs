use thiserror::Error;

/// Errors that can occur while decoding wire data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// The buffer ended before the value was fully read
    #[error("Wire read of {needed} bytes with only {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// A boolean field held a byte other than 0 or 1
    #[error("Invalid boolean byte {value} on the wire")]
    InvalidBool { value: u8 },
}
