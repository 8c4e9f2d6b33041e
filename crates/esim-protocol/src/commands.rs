//! Commands that can be sent to the module.

use crate::constants::*;
use crate::types::*;

/// Commands that can be sent to the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request the module's status report.
    GetStatus,

    /// Read a parameter value.
    GetParam {
        /// Parameter to read.
        param: Param,
    },

    /// Set a parameter value.
    SetParam {
        /// New value (carries its own parameter tag).
        value: ParamValue,
    },

    /// Reset the module. The module may reboot before it can answer, so no
    /// response should be expected.
    ResetModule,
}

impl Command {
    /// Message type code for this command's frame.
    pub fn message_type(&self) -> u8 {
        match self {
            Command::GetStatus => MSG_GET_STATUS,
            Command::GetParam { .. } => MSG_GET_PARAM,
            Command::SetParam { .. } => MSG_SET_PARAM,
            Command::ResetModule => MSG_RESET_MOD,
        }
    }

    /// Encode this command's frame payload.
    pub fn encode_payload(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        match self {
            Command::GetStatus => {}

            Command::GetParam { param } => {
                buf.push(param.code());
            }

            Command::SetParam { value } => {
                buf.push(value.param().code());
                value.encode_to(&mut buf);
            }

            Command::ResetModule => {}
        }

        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_status_empty_payload() {
        let cmd = Command::GetStatus;
        assert_eq!(cmd.message_type(), MSG_GET_STATUS);
        assert!(cmd.encode_payload().is_empty());
    }

    #[test]
    fn test_get_param_payload() {
        let cmd = Command::GetParam {
            param: Param::StatusPeriodMs,
        };
        assert_eq!(cmd.message_type(), MSG_GET_PARAM);
        assert_eq!(cmd.encode_payload(), vec![PARAM_STATUS_PERIOD_MS]);
    }

    #[test]
    fn test_set_rate_payload_big_endian() {
        let cmd = Command::SetParam {
            value: ParamValue::SensorSampleRate(500),
        };
        assert_eq!(cmd.message_type(), MSG_SET_PARAM);
        assert_eq!(
            cmd.encode_payload(),
            vec![PARAM_SENSOR_SAMPLE_RATE, 0x01, 0xF4]
        );
    }

    #[test]
    fn test_set_enable_payload_is_single_byte() {
        let on = Command::SetParam {
            value: ParamValue::SensorEnable(true),
        };
        assert_eq!(on.encode_payload(), vec![PARAM_SENSOR_ENABLE, 1]);

        let off = Command::SetParam {
            value: ParamValue::SensorEnable(false),
        };
        assert_eq!(off.encode_payload(), vec![PARAM_SENSOR_ENABLE, 0]);
    }

    #[test]
    fn test_reset_empty_payload() {
        let cmd = Command::ResetModule;
        assert_eq!(cmd.message_type(), MSG_RESET_MOD);
        assert!(cmd.encode_payload().is_empty());
    }
}
