//! ESIM UART Protocol
//!
//! This crate provides types and utilities for talking to an ESIM sensor
//! module over its framed UART protocol. Each frame carries one message:
//!
//! - **Commands** (host → module): status query, parameter get/set, reset
//! - **Responses** (module → host): status report, parameter response,
//!   error response
//!
//! # Wire format
//!
//! All multi-byte fields are big-endian:
//!
//! ```text
//! +------+------+---------+------+--------+-----------------+-------+
//! | 0xAA | 0x55 | version | type | len:u16| payload[0..len] |crc:u16|
//! +------+------+---------+------+--------+-----------------+-------+
//! ```
//!
//! The CRC-16/CCITT covers everything after the sync bytes and before the
//! trailer (version, type, length, payload).
//!
//! # Example
//!
//! ```rust,ignore
//! use esim_protocol::{encode_frame, Command, FrameDecoder, Response};
//!
//! let cmd = Command::GetStatus;
//! let wire = encode_frame(cmd.message_type(), &cmd.encode_payload());
//!
//! let mut decoder = FrameDecoder::new();
//! for byte in received {
//!     if let Some(frame) = decoder.push(byte)? {
//!         let response = Response::decode(frame.msg_type, &frame.payload)?;
//!     }
//! }
//! ```

mod commands;
mod constants;
mod crc;
mod error;
mod frame;
mod responses;
mod types;

pub use commands::*;
pub use constants::*;
pub use crc::*;
pub use error::*;
pub use frame::*;
pub use responses::*;
pub use types::*;
