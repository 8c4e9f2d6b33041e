//! Common types used in the protocol.

use crate::constants::*;
use crate::error::ProtocolError;

/// A configuration parameter exposed by the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Sensor sample rate (1..=1000).
    SensorSampleRate,
    /// Status reporting period in milliseconds (100..=5000).
    StatusPeriodMs,
    /// Sensor enable flag.
    SensorEnable,
}

impl Param {
    /// Wire code for this parameter.
    pub fn code(&self) -> u8 {
        match self {
            Param::SensorSampleRate => PARAM_SENSOR_SAMPLE_RATE,
            Param::StatusPeriodMs => PARAM_STATUS_PERIOD_MS,
            Param::SensorEnable => PARAM_SENSOR_ENABLE,
        }
    }

    /// Look up a parameter by wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            PARAM_SENSOR_SAMPLE_RATE => Some(Param::SensorSampleRate),
            PARAM_STATUS_PERIOD_MS => Some(Param::StatusPeriodMs),
            PARAM_SENSOR_ENABLE => Some(Param::SensorEnable),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Param {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, ProtocolError> {
        Param::from_code(code).ok_or(ProtocolError::UnknownParam(code))
    }
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::SensorSampleRate => write!(f, "sensor-sample-rate"),
            Param::StatusPeriodMs => write!(f, "status-period-ms"),
            Param::SensorEnable => write!(f, "sensor-enable"),
        }
    }
}

/// A parameter value, tagged by the parameter it belongs to.
///
/// The two numeric parameters travel as big-endian u16; the enable flag
/// travels as a single 0/1 byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValue {
    /// Sensor sample rate.
    SensorSampleRate(u16),
    /// Status period in milliseconds.
    StatusPeriodMs(u16),
    /// Sensor enable flag.
    SensorEnable(bool),
}

impl ParamValue {
    /// The parameter this value belongs to.
    pub fn param(&self) -> Param {
        match self {
            ParamValue::SensorSampleRate(_) => Param::SensorSampleRate,
            ParamValue::StatusPeriodMs(_) => Param::StatusPeriodMs,
            ParamValue::SensorEnable(_) => Param::SensorEnable,
        }
    }

    /// Decode a value of the given parameter from response payload bytes
    /// (the bytes following the echoed parameter id).
    pub fn from_wire(param: Param, data: &[u8]) -> Result<Self, ProtocolError> {
        match param {
            Param::SensorSampleRate | Param::StatusPeriodMs => {
                if data.len() < 2 {
                    return Err(ProtocolError::PayloadTooShort {
                        expected: 2,
                        actual: data.len(),
                    });
                }
                let value = u16::from_be_bytes([data[0], data[1]]);
                Ok(match param {
                    Param::SensorSampleRate => ParamValue::SensorSampleRate(value),
                    _ => ParamValue::StatusPeriodMs(value),
                })
            }
            Param::SensorEnable => {
                if data.is_empty() {
                    return Err(ProtocolError::PayloadTooShort {
                        expected: 1,
                        actual: 0,
                    });
                }
                Ok(ParamValue::SensorEnable(data[0] != 0))
            }
        }
    }

    /// Append this value's wire encoding to `buf`.
    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        match self {
            ParamValue::SensorSampleRate(v) | ParamValue::StatusPeriodMs(v) => {
                buf.extend_from_slice(&v.to_be_bytes());
            }
            ParamValue::SensorEnable(v) => {
                buf.push(if *v { 1 } else { 0 });
            }
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::SensorSampleRate(v) => write!(f, "{}", v),
            ParamValue::StatusPeriodMs(v) => write!(f, "{}", v),
            ParamValue::SensorEnable(v) => write!(f, "{}", v),
        }
    }
}

/// Operational state reported by the module's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// Power-on, before initialization.
    Boot,
    /// Initializing peripherals.
    Init,
    /// Normal operation.
    Run,
    /// A fault was detected.
    Error,
    /// Attempting recovery from a fault.
    Recovery,
    /// State code not known to this host.
    Unknown(u8),
}

impl From<u8> for SystemState {
    fn from(code: u8) -> Self {
        match code {
            0 => SystemState::Boot,
            1 => SystemState::Init,
            2 => SystemState::Run,
            3 => SystemState::Error,
            4 => SystemState::Recovery,
            other => SystemState::Unknown(other),
        }
    }
}

impl From<SystemState> for u8 {
    fn from(state: SystemState) -> u8 {
        match state {
            SystemState::Boot => 0,
            SystemState::Init => 1,
            SystemState::Run => 2,
            SystemState::Error => 3,
            SystemState::Recovery => 4,
            SystemState::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for SystemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemState::Boot => write!(f, "BOOT"),
            SystemState::Init => write!(f, "INIT"),
            SystemState::Run => write!(f, "RUN"),
            SystemState::Error => write!(f, "ERROR"),
            SystemState::Recovery => write!(f, "RECOVERY"),
            SystemState::Unknown(code) => write!(f, "UNKNOWN(0x{:02X})", code),
        }
    }
}

/// Decoded status report from the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    /// Current state machine state.
    pub state: SystemState,
    /// Milliseconds since the module booted.
    pub uptime_ms: u32,
    /// Error flag bitmask.
    pub error_flags: u32,
    /// Count of receive errors (bad frames, CRC failures) seen by the module.
    pub rx_errors: u32,
    /// Count of transmit errors seen by the module.
    pub tx_errors: u32,
    /// Sensor fault code (0 = no fault).
    pub sensor_fault: u8,
}
