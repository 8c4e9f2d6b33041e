//! Responses received from the module.

use crate::constants::*;
use crate::error::*;
use crate::types::*;

/// Responses received from the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Status report.
    Status(StatusReport),

    /// Parameter value readback (answer to a get).
    Param {
        /// Parameter the value belongs to.
        param: Param,
        /// The value.
        value: ParamValue,
    },

    /// Acknowledgement of a set (parameter response with the 0x00 sentinel).
    SetAck,

    /// The module rejected the preceding request.
    Error {
        /// Error code reported by the module (0x01 = generic rejection).
        code: u8,
    },
}

impl Response {
    /// Decode a response from a frame's message type and payload.
    pub fn decode(msg_type: u8, payload: &[u8]) -> Result<Self, ProtocolError> {
        match msg_type {
            MSG_STATUS_RSP => Ok(Response::Status(decode_status(payload)?)),

            MSG_PARAM_RSP => {
                if payload.is_empty() {
                    return Err(ProtocolError::PayloadTooShort {
                        expected: 1,
                        actual: 0,
                    });
                }
                // A leading 0x00 is the set acknowledgement sentinel; any
                // other leading byte must be a known parameter id.
                if payload[0] == PARAM_RSP_ACK {
                    return Ok(Response::SetAck);
                }
                let param = Param::try_from(payload[0])?;
                let value = ParamValue::from_wire(param, &payload[1..])?;
                Ok(Response::Param { param, value })
            }

            MSG_ERROR_RSP => {
                let code = payload.first().copied().unwrap_or(0);
                Ok(Response::Error { code })
            }

            other => Err(ProtocolError::UnknownMessageType(other)),
        }
    }
}

/// Decode a status report payload.
fn decode_status(payload: &[u8]) -> Result<StatusReport, ProtocolError> {
    if payload.len() < STATUS_PAYLOAD_LEN {
        return Err(ProtocolError::PayloadTooShort {
            expected: STATUS_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }

    let be_u32 = |offset: usize| {
        u32::from_be_bytes([
            payload[offset],
            payload[offset + 1],
            payload[offset + 2],
            payload[offset + 3],
        ])
    };

    Ok(StatusReport {
        state: SystemState::from(payload[0]),
        uptime_ms: be_u32(1),
        error_flags: be_u32(5),
        rx_errors: be_u32(9),
        tx_errors: be_u32(13),
        sensor_fault: payload[17],
    })
}
