//! The 4-byte frame header.
//!
//! ```text
//! +----------+-------------+--------+--------+----------------+
//! | stack_id | function_id | len_lo | len_hi | body[0..]      |
//! +----------+-------------+--------+--------+----------------+
//! ```
//!
//! `len` is the total frame length (header + body), little-endian.

use bytes::{Buf, BufMut};

use crate::{Result, WireError};

/// Size of the frame header in bytes.
pub const HEADER_SIZE: usize = 4;

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Originating stack identifier.
    pub stack_id: u8,
    /// Packet function id.
    pub function_id: u8,
    /// Total frame length including the header.
    pub length: u16,
}

impl FrameHeader {
    /// Append the header to `buf`.
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.stack_id);
        buf.put_u8(self.function_id);
        buf.put_u16_le(self.length);
    }

    /// Read a header from the start of `frame`.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        if frame.len() < HEADER_SIZE {
            return Err(WireError::FrameTooShort {
                expected: HEADER_SIZE,
                actual: frame.len(),
            });
        }
        let mut buf = &frame[..HEADER_SIZE];
        Ok(FrameHeader {
            stack_id: buf.get_u8(),
            function_id: buf.get_u8(),
            length: buf.get_u16_le(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = FrameHeader {
            stack_id: 0x12,
            function_id: 7,
            length: 0x0106,
        };
        let mut buf = Vec::new();
        header.encode(&mut buf);
        assert_eq!(buf, vec![0x12, 7, 0x06, 0x01]);
        assert_eq!(FrameHeader::decode(&buf), Ok(header));
    }

    #[test]
    fn test_header_too_short() {
        assert_eq!(
            FrameHeader::decode(&[1, 2, 3]),
            Err(WireError::FrameTooShort {
                expected: 4,
                actual: 3
            })
        );
    }
}
