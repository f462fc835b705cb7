use std::io;

/// The error type for everything that can go wrong while a router or a server is being set up.
///
/// Request processing never produces this type: failures that happen while a request is resolved or
/// while a handler writes its response are absorbed into the [`Response`](./struct.Response.html) and logged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The route pattern could not be compiled.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The same route parameter name appears twice in one pattern.
    #[error("route parameter {name:?} is declared more than once in {pattern:?}")]
    DuplicateParam { pattern: String, name: String },

    /// A route was registered after the router started resolving requests.
    #[error("router is sealed, {pattern:?} can no longer be registered")]
    Sealed { pattern: String },

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Binding or accepting on the listening socket failed.
    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn invalid_pattern<P: Into<String>, R: Into<String>>(pattern: P, reason: R) -> Error {
        Error::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
