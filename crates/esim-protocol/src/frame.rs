//! Frame encoding/decoding.
//!
//! Every message travels in one frame:
//!
//! ```text
//! +------+------+---------+------+---------+-----------------+---------+
//! | 0xAA | 0x55 | version | type | len:u16 | payload[0..len] | crc:u16 |
//! +------+------+---------+------+---------+-----------------+---------+
//! ```
//!
//! The length and CRC are big-endian. The CRC-16/CCITT covers version, type,
//! length, and payload; it never covers the sync bytes.

use bytes::BufMut;

use crate::constants::*;
use crate::crc::crc16_ccitt;
use crate::error::ProtocolError;

/// A decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Protocol version byte. Carried for forward compatibility; current
    /// hosts do not reject frames based on it.
    pub version: u8,
    /// Message type code.
    pub msg_type: u8,
    /// Frame payload.
    pub payload: Vec<u8>,
}

/// Encode a frame for transmission.
pub fn encode_frame(msg_type: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + FRAME_HEADER_LEN + payload.len() + 2);
    buf.push(FRAME_SYNC_0);
    buf.push(FRAME_SYNC_1);
    buf.push(FRAME_VERSION);
    buf.push(msg_type);
    buf.put_u16(payload.len() as u16);
    buf.extend_from_slice(payload);

    // CRC over everything after the sync bytes.
    let crc = crc16_ccitt(&buf[2..]);
    buf.put_u16(crc);
    buf
}

/// Decoder state. One state per frame section, so a timeout or bad byte at
/// any point simply drops back to scanning for sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Scanning for the first sync byte.
    Sync0,
    /// Expecting the second sync byte.
    Sync1,
    /// Accumulating version, type, and length.
    Header,
    /// Accumulating payload bytes.
    Payload,
    /// Accumulating the two CRC trailer bytes.
    Trailer,
}

/// Incremental frame decoder.
///
/// Feed received bytes one at a time with [`push`](FrameDecoder::push). The
/// decoder scans byte-by-byte for the sync marker, so noise or a truncated
/// frame never permanently desynchronizes the stream: any decode failure
/// resets the machine and the scan resumes at the next byte.
#[derive(Debug)]
pub struct FrameDecoder {
    state: DecodeState,
    header: [u8; FRAME_HEADER_LEN],
    header_len: usize,
    payload: Vec<u8>,
    payload_len: usize,
    trailer: [u8; 2],
    trailer_len: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new decoder, scanning for sync.
    pub fn new() -> Self {
        FrameDecoder {
            state: DecodeState::Sync0,
            header: [0; FRAME_HEADER_LEN],
            header_len: 0,
            payload: Vec::new(),
            payload_len: 0,
            trailer: [0; 2],
            trailer_len: 0,
        }
    }

    /// Discard any partial frame and resume scanning for sync.
    pub fn reset(&mut self) {
        self.state = DecodeState::Sync0;
        self.header_len = 0;
        self.payload.clear();
        self.payload_len = 0;
        self.trailer_len = 0;
    }

    /// Feed one received byte into the decoder.
    ///
    /// Returns `Ok(Some(frame))` when the byte completes a CRC-verified
    /// frame, `Ok(None)` while a frame is still incomplete, and `Err` when a
    /// frame is abandoned (CRC mismatch, oversized length). After an error
    /// the decoder has already reset itself; the caller may treat the error
    /// as "no frame yet" and keep feeding bytes.
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>, ProtocolError> {
        match self.state {
            DecodeState::Sync0 => {
                if byte == FRAME_SYNC_0 {
                    self.state = DecodeState::Sync1;
                }
                Ok(None)
            }

            DecodeState::Sync1 => {
                self.state = if byte == FRAME_SYNC_1 {
                    DecodeState::Header
                } else if byte == FRAME_SYNC_0 {
                    // Another 0xAA may be the real start of frame (e.g. the
                    // previous one was trailing noise). Keep waiting for 0x55.
                    DecodeState::Sync1
                } else {
                    DecodeState::Sync0
                };
                Ok(None)
            }

            DecodeState::Header => {
                self.header[self.header_len] = byte;
                self.header_len += 1;
                if self.header_len == FRAME_HEADER_LEN {
                    let len = u16::from_be_bytes([self.header[2], self.header[3]]) as usize;
                    if len > MAX_PAYLOAD_LEN {
                        let err = ProtocolError::PayloadTooLong {
                            max: MAX_PAYLOAD_LEN,
                            actual: len,
                        };
                        self.reset();
                        return Err(err);
                    }
                    self.payload_len = len;
                    self.state = if len > 0 {
                        DecodeState::Payload
                    } else {
                        DecodeState::Trailer
                    };
                }
                Ok(None)
            }

            DecodeState::Payload => {
                self.payload.push(byte);
                if self.payload.len() == self.payload_len {
                    self.state = DecodeState::Trailer;
                }
                Ok(None)
            }

            DecodeState::Trailer => {
                self.trailer[self.trailer_len] = byte;
                self.trailer_len += 1;
                if self.trailer_len < 2 {
                    return Ok(None);
                }
                self.finish()
            }
        }
    }

    /// Verify the CRC and hand back the completed frame.
    fn finish(&mut self) -> Result<Option<Frame>, ProtocolError> {
        let received = u16::from_be_bytes(self.trailer);
        let mut covered = Vec::with_capacity(FRAME_HEADER_LEN + self.payload.len());
        covered.extend_from_slice(&self.header);
        covered.extend_from_slice(&self.payload);
        let crc = crc16_ccitt(&covered);

        if crc != received {
            log::warn!(
                "frame CRC mismatch: computed 0x{:04X}, received 0x{:04X}",
                crc,
                received
            );
            let err = ProtocolError::CrcMismatch {
                computed: crc,
                received,
            };
            self.reset();
            return Err(err);
        }

        let frame = Frame {
            version: self.header[0],
            msg_type: self.header[1],
            payload: std::mem::take(&mut self.payload),
        };
        self.reset();
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed a byte slice through a decoder, failing the test on any decode
    /// error, and return the frames produced.
    fn feed_all(decoder: &mut FrameDecoder, data: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        for &b in data {
            if let Some(frame) = decoder.push(b).expect("unexpected decode error") {
                frames.push(frame);
            }
        }
        frames
    }

    #[test]
    fn test_round_trip() {
        let payload = [PARAM_SENSOR_SAMPLE_RATE, 0x01, 0xF4];
        let wire = encode_frame(MSG_SET_PARAM, &payload);

        let mut decoder = FrameDecoder::new();
        let frames = feed_all(&mut decoder, &wire);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].version, FRAME_VERSION);
        assert_eq!(frames[0].msg_type, MSG_SET_PARAM);
        assert_eq!(frames[0].payload, payload);
    }

    #[test]
    fn test_round_trip_empty_payload() {
        let wire = encode_frame(MSG_GET_STATUS, &[]);
        assert_eq!(wire.len(), 8);
        assert_eq!(&wire[..2], &[FRAME_SYNC_0, FRAME_SYNC_1]);

        let mut decoder = FrameDecoder::new();
        let frames = feed_all(&mut decoder, &wire);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].msg_type, MSG_GET_STATUS);
        assert!(frames[0].payload.is_empty());
    }

    #[test]
    fn test_resync_after_leading_noise() {
        let mut stream = vec![0x00, 0xFF, 0xAA, 0x13, 0x55, 0xAA];
        stream.extend_from_slice(&encode_frame(MSG_GET_PARAM, &[PARAM_SENSOR_ENABLE]));

        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for &b in &stream {
            // Noise may produce decode errors; only completed frames count.
            if let Ok(Some(frame)) = decoder.push(b) {
                frames.push(frame);
            }
        }
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].msg_type, MSG_GET_PARAM);
        assert_eq!(frames[0].payload, vec![PARAM_SENSOR_ENABLE]);
    }

    #[test]
    fn test_single_bit_flip_rejected() {
        let payload = [PARAM_STATUS_PERIOD_MS, 0x03, 0xE8];
        let clean = encode_frame(MSG_SET_PARAM, &payload);

        // Flip every bit after the sync pair in turn; none may decode.
        // Depending on the flipped field the decoder either reports a CRC
        // mismatch or is left waiting for bytes that never come (length
        // field flips); it must never hand back a frame.
        for byte_idx in 2..clean.len() {
            for bit in 0..8 {
                let mut corrupted = clean.clone();
                corrupted[byte_idx] ^= 1 << bit;

                let mut decoder = FrameDecoder::new();
                for &b in &corrupted {
                    if let Ok(Some(frame)) = decoder.push(b) {
                        panic!("bit {} of byte {} accepted: {:?}", bit, byte_idx, frame);
                    }
                }
            }
        }
    }

    #[test]
    fn test_crc_mismatch_reported_and_recovers() {
        let mut bad = encode_frame(MSG_GET_STATUS, &[]);
        let last = bad.len() - 1;
        bad[last] ^= 0xFF;

        let mut decoder = FrameDecoder::new();
        let mut saw_crc_error = false;
        for &b in &bad {
            match decoder.push(b) {
                Ok(Some(_)) => panic!("corrupted frame accepted"),
                Ok(None) => {}
                Err(ProtocolError::CrcMismatch { .. }) => saw_crc_error = true,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        assert!(saw_crc_error);

        // The decoder must be back in sync scan and accept the next frame.
        let good = encode_frame(MSG_GET_STATUS, &[]);
        let frames = feed_all(&mut decoder, &good);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_oversized_length_aborts_to_resync() {
        let mut stream = vec![
            FRAME_SYNC_0,
            FRAME_SYNC_1,
            FRAME_VERSION,
            MSG_GET_STATUS,
            0xFF,
            0xFF, // absurd declared length
        ];
        let mut decoder = FrameDecoder::new();
        let mut result = Ok(None);
        for &b in &stream {
            result = decoder.push(b);
        }
        assert_eq!(
            result,
            Err(ProtocolError::PayloadTooLong {
                max: MAX_PAYLOAD_LEN,
                actual: 0xFFFF,
            })
        );

        // Still able to decode a following frame.
        stream = encode_frame(MSG_GET_STATUS, &[]);
        let frames = feed_all(&mut decoder, &stream);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut stream = encode_frame(MSG_GET_STATUS, &[]);
        stream.extend_from_slice(&encode_frame(
            MSG_GET_PARAM,
            &[PARAM_SENSOR_SAMPLE_RATE],
        ));

        let mut decoder = FrameDecoder::new();
        let frames = feed_all(&mut decoder, &stream);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].msg_type, MSG_GET_STATUS);
        assert_eq!(frames[1].msg_type, MSG_GET_PARAM);
    }

    #[test]
    fn test_sync_false_start() {
        // 0xAA followed by a non-0x55 byte must not consume the real frame.
        let mut stream = vec![FRAME_SYNC_0, 0x00];
        stream.extend_from_slice(&encode_frame(MSG_GET_STATUS, &[]));

        let mut decoder = FrameDecoder::new();
        let frames = feed_all(&mut decoder, &stream);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_payload_bytes_matching_sync_are_data() {
        // A payload containing the sync pattern must round-trip unharmed.
        let payload = [0xAA, 0x55, 0xAA, 0x55];
        let wire = encode_frame(MSG_STATUS_RSP, &payload);

        let mut decoder = FrameDecoder::new();
        let frames = feed_all(&mut decoder, &wire);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload, payload);
    }
}
