//! Error types for the protocol layer.
//!
//! Each crate in Cardroom defines its own error enum. A `ProtocolError`
//! always means the problem is in naming or parsing, never in game rules
//! or persistence.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The text does not name a known notification event.
    #[error("unknown event name: {0}")]
    UnknownEvent(String),
}
