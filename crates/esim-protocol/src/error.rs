//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when decoding frames or messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload is too short for the message it claims to carry.
    #[error("payload too short: expected at least {expected} bytes, got {actual}")]
    PayloadTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Declared payload length exceeds what the module can produce.
    #[error("payload too long: maximum {max} bytes, got {actual}")]
    PayloadTooLong {
        /// Maximum allowed length.
        max: usize,
        /// Declared length.
        actual: usize,
    },

    /// Frame CRC did not match the recomputed value.
    #[error("CRC mismatch: computed 0x{computed:04X}, received 0x{received:04X}")]
    CrcMismatch {
        /// CRC computed over the received header and payload.
        computed: u16,
        /// CRC carried in the frame trailer.
        received: u16,
    },

    /// Unknown message type code.
    #[error("unknown message type: 0x{0:02X}")]
    UnknownMessageType(u8),

    /// Unknown parameter identifier.
    #[error("unknown parameter id: 0x{0:02X}")]
    UnknownParam(u8),
}
