//! Byte-stream transport abstraction.
//!
//! The client only needs a blocking duplex stream: write a buffer, read up
//! to `buf.len()` bytes with a timeout. Serial hardware is the normal
//! transport; tests substitute an in-process implementation.

use std::io;
use std::time::Duration;

/// A blocking duplex byte stream.
///
/// Implementations must not buffer writes (a frame is written in one call
/// and must reach the wire) and must treat a read timeout as a normal
/// zero-byte result, not an error.
pub trait Transport {
    /// Write the whole buffer to the stream.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read up to `buf.len()` bytes, waiting at most `timeout`.
    ///
    /// Returns the number of bytes read; 0 means the timeout expired (or the
    /// peer has nothing to send), which is not an error.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize>;
}

/// Transport over a serial port (115200 8N1 by default on the module side).
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    /// Open a serial device (or PTY) at the given baud rate.
    pub fn open(path: &str, baud: u32) -> Result<Self, serialport::Error> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(100))
            .open()?;
        Ok(SerialTransport { port })
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)?;
        self.port.flush()
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        self.port
            .set_timeout(timeout)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }
}
