//! Protocol constants
//!
//! These constants define the frame layout, message type codes, parameter
//! identifiers, and parameter limits used by the ESIM UART protocol.

// ============================================================================
// Frame Layout
// ============================================================================

/// First sync byte of every frame.
pub const FRAME_SYNC_0: u8 = 0xAA;
/// Second sync byte of every frame.
pub const FRAME_SYNC_1: u8 = 0x55;
/// Protocol version transmitted in every frame.
pub const FRAME_VERSION: u8 = 0x01;
/// Header bytes after the sync pair: version, type, length (2).
pub const FRAME_HEADER_LEN: usize = 4;
/// Maximum payload length accepted by the module firmware.
pub const MAX_PAYLOAD_LEN: usize = 64;

// ============================================================================
// Message Types (host → module and module → host)
// ============================================================================

/// Request the module's status report.
pub const MSG_GET_STATUS: u8 = 0x01;
/// Status report response.
pub const MSG_STATUS_RSP: u8 = 0x02;
/// Set a parameter value.
pub const MSG_SET_PARAM: u8 = 0x03;
/// Read a parameter value.
pub const MSG_GET_PARAM: u8 = 0x04;
/// Parameter response (value readback or set acknowledgement).
pub const MSG_PARAM_RSP: u8 = 0x05;
/// Reset the module. No response is guaranteed.
pub const MSG_RESET_MOD: u8 = 0x06;
/// Error response (rejected request).
pub const MSG_ERROR_RSP: u8 = 0x07;

// ============================================================================
// Parameter Identifiers
// ============================================================================

/// Sensor sample rate (u16, valid range 1..=1000).
pub const PARAM_SENSOR_SAMPLE_RATE: u8 = 0x01;
/// Status reporting period in milliseconds (u16, valid range 100..=5000).
pub const PARAM_STATUS_PERIOD_MS: u8 = 0x02;
/// Sensor enable flag (boolean as one byte).
pub const PARAM_SENSOR_ENABLE: u8 = 0x03;

/// Leading payload byte of a parameter response acknowledging a set.
pub const PARAM_RSP_ACK: u8 = 0x00;

// ============================================================================
// Parameter Limits and Defaults (enforced by the module firmware)
// ============================================================================

/// Minimum accepted sensor sample rate.
pub const SAMPLE_RATE_MIN: u16 = 1;
/// Maximum accepted sensor sample rate.
pub const SAMPLE_RATE_MAX: u16 = 1000;
/// Minimum accepted status period in milliseconds.
pub const STATUS_PERIOD_MIN_MS: u16 = 100;
/// Maximum accepted status period in milliseconds.
pub const STATUS_PERIOD_MAX_MS: u16 = 5000;

/// Sample rate after module initialization or reset.
pub const DEFAULT_SAMPLE_RATE: u16 = 100;
/// Status period after module initialization or reset.
pub const DEFAULT_STATUS_PERIOD_MS: u16 = 1000;
/// Sensor enable flag after module initialization or reset.
pub const DEFAULT_SENSOR_ENABLE: bool = true;

// ============================================================================
// Sizes
// ============================================================================

/// Length of a status report payload.
pub const STATUS_PAYLOAD_LEN: usize = 18;
