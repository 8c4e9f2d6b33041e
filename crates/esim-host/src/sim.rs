//! In-process module simulator.
//!
//! Behavioral model of the far-end firmware: a parameter store with range
//! validation, a coarse state machine, and the frame-level request handlers.
//! It implements [`Transport`] directly, so the real [`Client`] can be
//! exercised byte-for-byte against it in tests without a serial link.
//!
//! [`Client`]: crate::client::Client

use std::io;
use std::time::{Duration, Instant};

use tracing::debug;

use esim_protocol::*;

use crate::transport::Transport;

/// Simulated ESIM module.
pub struct ModuleSim {
    state: SystemState,
    booted_at: Instant,
    error_flags: u32,
    rx_errors: u32,
    tx_errors: u32,
    sensor_fault: u8,

    sample_rate: u16,
    status_period_ms: u16,
    sensor_enable: bool,

    decoder: FrameDecoder,
    outgoing: Vec<u8>,
}

impl Default for ModuleSim {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleSim {
    /// Create a freshly booted module with default parameters.
    pub fn new() -> Self {
        ModuleSim {
            state: SystemState::Run,
            booted_at: Instant::now(),
            error_flags: 0,
            rx_errors: 0,
            tx_errors: 0,
            sensor_fault: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            status_period_ms: DEFAULT_STATUS_PERIOD_MS,
            sensor_enable: DEFAULT_SENSOR_ENABLE,
            decoder: FrameDecoder::new(),
            outgoing: Vec::new(),
        }
    }

    /// Currently stored sample rate.
    pub fn sample_rate(&self) -> u16 {
        self.sample_rate
    }

    /// Currently stored status period.
    pub fn status_period_ms(&self) -> u16 {
        self.status_period_ms
    }

    /// Currently stored sensor enable flag.
    pub fn sensor_enable(&self) -> bool {
        self.sensor_enable
    }

    /// Count of receive errors (bad CRCs, unknown messages) so far.
    pub fn rx_errors(&self) -> u32 {
        self.rx_errors
    }

    fn queue_frame(&mut self, msg_type: u8, payload: &[u8]) {
        self.outgoing.extend_from_slice(&encode_frame(msg_type, payload));
    }

    fn handle_frame(&mut self, frame: Frame) {
        match frame.msg_type {
            MSG_GET_STATUS => self.handle_get_status(),
            MSG_SET_PARAM => self.handle_set_param(&frame.payload),
            MSG_GET_PARAM => self.handle_get_param(&frame.payload),
            MSG_RESET_MOD => self.handle_reset(),
            other => {
                debug!(msg_type = other, "sim: unknown message type");
                self.rx_errors += 1;
            }
        }
    }

    fn handle_get_status(&mut self) {
        let uptime = self.booted_at.elapsed().as_millis() as u32;

        let mut payload = Vec::with_capacity(STATUS_PAYLOAD_LEN);
        payload.push(u8::from(self.state));
        payload.extend_from_slice(&uptime.to_be_bytes());
        payload.extend_from_slice(&self.error_flags.to_be_bytes());
        payload.extend_from_slice(&self.rx_errors.to_be_bytes());
        payload.extend_from_slice(&self.tx_errors.to_be_bytes());
        payload.push(self.sensor_fault);

        self.queue_frame(MSG_STATUS_RSP, &payload);
    }

    fn handle_set_param(&mut self, data: &[u8]) {
        let accepted = match data {
            [PARAM_SENSOR_SAMPLE_RATE, hi, lo] => {
                let rate = u16::from_be_bytes([*hi, *lo]);
                if (SAMPLE_RATE_MIN..=SAMPLE_RATE_MAX).contains(&rate) {
                    self.sample_rate = rate;
                    true
                } else {
                    false
                }
            }
            [PARAM_STATUS_PERIOD_MS, hi, lo] => {
                let period = u16::from_be_bytes([*hi, *lo]);
                if (STATUS_PERIOD_MIN_MS..=STATUS_PERIOD_MAX_MS).contains(&period) {
                    self.status_period_ms = period;
                    true
                } else {
                    false
                }
            }
            [PARAM_SENSOR_ENABLE, flag] => {
                self.sensor_enable = *flag != 0;
                true
            }
            _ => false,
        };

        if accepted {
            self.queue_frame(MSG_PARAM_RSP, &[PARAM_RSP_ACK]);
        } else {
            self.queue_frame(MSG_ERROR_RSP, &[0x01]);
        }
    }

    fn handle_get_param(&mut self, data: &[u8]) {
        // Unknown ids get no response at all, matching the firmware.
        let Some(&id) = data.first() else { return };

        match id {
            PARAM_SENSOR_SAMPLE_RATE => {
                let v = self.sample_rate.to_be_bytes();
                self.queue_frame(MSG_PARAM_RSP, &[id, v[0], v[1]]);
            }
            PARAM_STATUS_PERIOD_MS => {
                let v = self.status_period_ms.to_be_bytes();
                self.queue_frame(MSG_PARAM_RSP, &[id, v[0], v[1]]);
            }
            PARAM_SENSOR_ENABLE => {
                let v = if self.sensor_enable { 1 } else { 0 };
                self.queue_frame(MSG_PARAM_RSP, &[id, v]);
            }
            _ => {}
        }
    }

    fn handle_reset(&mut self) {
        debug!("sim: module reset");
        self.state = SystemState::Run;
        self.booted_at = Instant::now();
        self.error_flags = 0;
        self.rx_errors = 0;
        self.tx_errors = 0;
        self.sensor_fault = 0;
        self.sample_rate = DEFAULT_SAMPLE_RATE;
        self.status_period_ms = DEFAULT_STATUS_PERIOD_MS;
        self.sensor_enable = DEFAULT_SENSOR_ENABLE;
        self.decoder.reset();
        self.outgoing.clear();
    }
}

impl Transport for ModuleSim {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        for &byte in data {
            match self.decoder.push(byte) {
                Ok(Some(frame)) => self.handle_frame(frame),
                Ok(None) => {}
                Err(ProtocolError::CrcMismatch { .. }) => self.rx_errors += 1,
                Err(_) => {}
            }
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> io::Result<usize> {
        // Responses are queued synchronously by write_all, so there is
        // nothing to wait for: either bytes are pending or the "timeout"
        // elapses immediately.
        let n = self.outgoing.len().min(buf.len());
        buf[..n].copy_from_slice(&self.outgoing[..n]);
        self.outgoing.drain(..n);
        Ok(n)
    }
}
