//! Request/response transaction client.
//!
//! One public operation is exactly one frame write followed by at most one
//! bounded frame read. There are no retries; callers wanting resilience
//! re-invoke the operation. The client assumes exclusive access to the
//! transport for the duration of a call.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use esim_protocol::{
    encode_frame, Command, Frame, FrameDecoder, Param, ParamValue, ProtocolError, Response,
    StatusReport,
};

use crate::transport::Transport;

/// How a transaction can fail.
///
/// The original host tool collapsed all of these into `None`/`false`; they
/// are kept distinct here so callers can tell silence from corruption from
/// an explicit rejection.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// No response frame arrived within the read timeout.
    #[error("no response from module")]
    Timeout,

    /// No usable frame arrived, but at least one frame failed its CRC while
    /// waiting. The link is carrying corrupted traffic rather than nothing.
    #[error("response frame corrupted (CRC mismatch)")]
    Corrupted,

    /// A frame arrived but its payload could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(ProtocolError),

    /// A well-formed response arrived, but not the kind this request calls
    /// for (e.g. a status report in answer to a parameter get, or a value
    /// readback echoing the wrong parameter).
    #[error("unexpected response to request")]
    Unexpected,

    /// The module answered with an error response.
    #[error("request rejected by module (code 0x{code:02X})")]
    Rejected {
        /// Error code from the module.
        code: u8,
    },

    /// Transport-level I/O failure.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

/// Synchronous transaction client for the module protocol.
pub struct Client<T: Transport> {
    transport: T,
    timeout: Duration,
}

impl<T: Transport> Client<T> {
    /// Create a client over `transport`. Every blocking read during a
    /// transaction is bounded by `timeout`.
    pub fn new(transport: T, timeout: Duration) -> Self {
        Client { transport, timeout }
    }

    /// Consume the client, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Query the module's status report.
    pub fn get_status(&mut self) -> Result<StatusReport, TransactionError> {
        match self.transact(Command::GetStatus)? {
            Response::Status(report) => Ok(report),
            _ => Err(TransactionError::Unexpected),
        }
    }

    /// Read a parameter value.
    pub fn get_param(&mut self, param: Param) -> Result<ParamValue, TransactionError> {
        match self.transact(Command::GetParam { param })? {
            // The response must echo the requested parameter.
            Response::Param { param: echoed, value } if echoed == param => Ok(value),
            Response::Error { code } => Err(TransactionError::Rejected { code }),
            _ => Err(TransactionError::Unexpected),
        }
    }

    /// Set a parameter value. Range checks are enforced by the module; an
    /// out-of-range value comes back as [`TransactionError::Rejected`].
    pub fn set_param(&mut self, value: ParamValue) -> Result<(), TransactionError> {
        match self.transact(Command::SetParam { value })? {
            Response::SetAck => Ok(()),
            Response::Error { code } => Err(TransactionError::Rejected { code }),
            _ => Err(TransactionError::Unexpected),
        }
    }

    /// Reset the module. Fire-and-forget: the module may reboot before a
    /// response can be transmitted, so none is awaited.
    pub fn reset_module(&mut self) -> Result<(), TransactionError> {
        self.send(Command::ResetModule)?;
        Ok(())
    }

    /// Write one request frame.
    fn send(&mut self, command: Command) -> Result<(), TransactionError> {
        let frame = encode_frame(command.message_type(), &command.encode_payload());
        debug!(msg_type = command.message_type(), len = frame.len(), "sending request");
        self.transport.write_all(&frame)?;
        Ok(())
    }

    /// One full round trip: write the request, read and interpret the
    /// response frame.
    fn transact(&mut self, command: Command) -> Result<Response, TransactionError> {
        self.send(command)?;
        let frame = self.read_frame()?;
        Response::decode(frame.msg_type, &frame.payload).map_err(TransactionError::Malformed)
    }

    /// Read one frame from the stream.
    ///
    /// Bytes are fed through a fresh decoder; the sync scan skips noise. A
    /// zero-byte read (timeout) at any stage ends the attempt. A CRC failure
    /// is remembered but scanning continues, since the genuine response may
    /// still follow within the window.
    fn read_frame(&mut self) -> Result<Frame, TransactionError> {
        let mut decoder = FrameDecoder::new();
        let mut buf = [0u8; 64];
        let mut saw_crc_error = false;

        loop {
            let n = self.transport.read(&mut buf, self.timeout)?;
            if n == 0 {
                return Err(if saw_crc_error {
                    TransactionError::Corrupted
                } else {
                    TransactionError::Timeout
                });
            }

            for &byte in &buf[..n] {
                match decoder.push(byte) {
                    Ok(Some(frame)) => return Ok(frame),
                    Ok(None) => {}
                    Err(ProtocolError::CrcMismatch { computed, received }) => {
                        warn!(computed, received, "dropping frame with bad CRC");
                        saw_crc_error = true;
                    }
                    // Framing noise; the decoder has already resynced.
                    Err(e) => debug!(error = %e, "discarding unframeable bytes"),
                }
            }
        }
    }
}
