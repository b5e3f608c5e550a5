//! Response rendering
//!
//! Each request gets exactly one response line; [`std::fmt::Display`]
//! produces it without the trailing newline.

use std::fmt;

/// A response to send to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// CREATE succeeded
    Created { name: String },

    /// READ succeeded; content rendered lossily as UTF-8
    Content(Vec<u8>),

    /// WRITE succeeded
    Written { name: String },

    /// LIST succeeded
    Listing(Vec<String>),

    /// DELETE succeeded
    Deleted { name: String },

    /// QUIT acknowledged; the connection closes after this line
    Disconnecting,

    /// Any failure, with the message clients see
    Error(String),
}

impl Response {
    /// Build an error response from any engine or protocol error
    pub fn error(message: impl fmt::Display) -> Self {
        Response::Error(message.to_string())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Created { name } => write!(f, "SUCCESS: File '{}' created.", name),
            Response::Content(bytes) => {
                write!(f, "SUCCESS: {}", String::from_utf8_lossy(bytes))
            }
            Response::Written { name } => write!(f, "SUCCESS: File '{}' written.", name),
            Response::Listing(names) => write!(f, "SUCCESS: {}", names.join(", ")),
            Response::Deleted { name } => write!(f, "SUCCESS: File '{}' deleted.", name),
            Response::Disconnecting => write!(f, "SUCCESS: Disconnecting."),
            Response::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}
