use thiserror::Error;

/// Errors raised by the radio transport.
///
/// Connect failures are fatal at startup; everything else is logged by the
/// caller and the responder keeps listening.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The serial device could not be opened.
    #[error("failed to open serial port {port}: {reason}")]
    Open { port: String, reason: String },

    /// Read/write failure on an open link.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Protobuf encoding failed or the frame is too large for the serial API.
    #[error("encode error: {0}")]
    Encode(String),

    /// The link was closed or its writer task has exited.
    #[error("transport closed")]
    Closed,

    /// Serial support was compiled out (`serial` feature disabled).
    #[error("serial support not compiled in")]
    NotCompiled,
}

impl From<prost::EncodeError> for TransportError {
    fn from(e: prost::EncodeError) -> Self {
        TransportError::Encode(e.to_string())
    }
}
