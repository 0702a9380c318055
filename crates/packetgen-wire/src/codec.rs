//! Reference marshalling and unmarshalling over a [`FrameLayout`].
//!
//! This is the executable form of the byte layout the C emitter writes out:
//! host values are converted to little-endian on the way in and back to host
//! order on the way out, strings are copied up to their capacity, single-byte
//! data is copied verbatim.

use bytes::{Buf, BufMut, BytesMut};
use packetgen_schema::ScalarType;

use crate::header::{FrameHeader, HEADER_SIZE};
use crate::layout::{FrameLayout, Slot};
use crate::resolve::Transfer;
use crate::value::WireValue;
use crate::{Result, WireError};

impl FrameLayout {
    /// Build a complete frame (header + body) from `values`, one per slot.
    pub fn encode(&self, stack_id: u8, values: &[WireValue]) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(self.frame_size());
        FrameHeader {
            stack_id,
            function_id: self.function_id,
            // Layout resolution guarantees the size fits in 16 bits.
            length: self.frame_size() as u16,
        }
        .encode(&mut buf);
        self.encode_into(&mut buf, values)?;
        Ok(buf.to_vec())
    }

    /// Build only the body from `values`.
    pub fn encode_body(&self, values: &[WireValue]) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(self.body_size);
        self.encode_into(&mut buf, values)?;
        Ok(buf.to_vec())
    }

    fn encode_into(&self, buf: &mut BytesMut, values: &[WireValue]) -> Result<()> {
        if values.len() != self.slots.len() {
            return Err(WireError::ValueCount {
                expected: self.slots.len(),
                actual: values.len(),
            });
        }
        for (slot, value) in self.slots.iter().zip(values) {
            put_slot(buf, slot, value)?;
        }
        Ok(())
    }

    /// Check the header of `frame` and unmarshal its body.
    pub fn decode(&self, frame: &[u8]) -> Result<Vec<WireValue>> {
        let header = FrameHeader::decode(frame)?;
        if header.function_id != self.function_id {
            return Err(WireError::FunctionIdMismatch {
                expected: self.function_id,
                actual: header.function_id,
            });
        }
        if header.length as usize != self.frame_size() {
            return Err(WireError::LengthMismatch {
                expected: self.frame_size(),
                actual: header.length as usize,
            });
        }
        if frame.len() < self.frame_size() {
            return Err(WireError::FrameTooShort {
                expected: self.frame_size(),
                actual: frame.len(),
            });
        }
        self.decode_body(&frame[HEADER_SIZE..self.frame_size()])
    }

    /// Unmarshal a body into one value per slot.
    pub fn decode_body(&self, body: &[u8]) -> Result<Vec<WireValue>> {
        if body.len() < self.body_size {
            return Err(WireError::FrameTooShort {
                expected: self.body_size,
                actual: body.len(),
            });
        }
        let mut buf = &body[..self.body_size];
        Ok(self
            .slots
            .iter()
            .map(|slot| get_slot(&mut buf, slot))
            .collect())
    }
}

fn put_slot(buf: &mut BytesMut, slot: &Slot, value: &WireValue) -> Result<()> {
    let layout = &slot.layout;
    match layout.transfer() {
        Transfer::StringCopy => {
            let bytes = match value {
                WireValue::String(bytes) => bytes,
                other => return Err(mismatch(slot, other)),
            };
            let n = bytes.len().min(layout.count);
            buf.put_slice(&bytes[..n]);
            buf.put_bytes(0, layout.count - n);
        }
        Transfer::ArraySwap | Transfer::ArrayCopy => {
            let items = match value {
                WireValue::Array(items) => items,
                other => return Err(mismatch(slot, other)),
            };
            if items.len() != layout.count {
                return Err(WireError::ArrayLength {
                    element: slot.name.clone(),
                    expected: layout.count,
                    actual: items.len(),
                });
            }
            for item in items {
                put_scalar(buf, slot, item)?;
            }
        }
        Transfer::ScalarSwap | Transfer::ScalarCopy => put_scalar(buf, slot, value)?,
    }
    Ok(())
}

fn put_scalar(buf: &mut BytesMut, slot: &Slot, value: &WireValue) -> Result<()> {
    if value.scalar_type() != Some(slot.layout.wire_type) {
        return Err(mismatch(slot, value));
    }
    match *value {
        WireValue::Int8(v) => buf.put_i8(v),
        WireValue::Uint8(v) => buf.put_u8(v),
        WireValue::Int16(v) => buf.put_i16_le(v),
        WireValue::Uint16(v) => buf.put_u16_le(v),
        WireValue::Int32(v) => buf.put_i32_le(v),
        WireValue::Uint32(v) => buf.put_u32_le(v),
        WireValue::Int64(v) => buf.put_i64_le(v),
        WireValue::Uint64(v) => buf.put_u64_le(v),
        WireValue::Float(v) => buf.put_f32_le(v),
        WireValue::Bool(v) => buf.put_u8(u8::from(v)),
        WireValue::Char(v) => buf.put_u8(v),
        WireValue::String(_) | WireValue::Array(_) => return Err(mismatch(slot, value)),
    }
    Ok(())
}

fn get_slot(buf: &mut &[u8], slot: &Slot) -> WireValue {
    let layout = &slot.layout;
    match layout.transfer() {
        Transfer::StringCopy => {
            let bytes = buf[..layout.count].to_vec();
            buf.advance(layout.count);
            WireValue::String(bytes)
        }
        Transfer::ArraySwap | Transfer::ArrayCopy => WireValue::Array(
            (0..layout.count)
                .map(|_| get_scalar(buf, layout.wire_type))
                .collect(),
        ),
        Transfer::ScalarSwap | Transfer::ScalarCopy => get_scalar(buf, layout.wire_type),
    }
}

fn get_scalar(buf: &mut &[u8], ty: ScalarType) -> WireValue {
    match ty {
        ScalarType::Int8 => WireValue::Int8(buf.get_i8()),
        ScalarType::Uint8 => WireValue::Uint8(buf.get_u8()),
        ScalarType::Int16 => WireValue::Int16(buf.get_i16_le()),
        ScalarType::Uint16 => WireValue::Uint16(buf.get_u16_le()),
        ScalarType::Int32 => WireValue::Int32(buf.get_i32_le()),
        ScalarType::Uint32 => WireValue::Uint32(buf.get_u32_le()),
        ScalarType::Int64 => WireValue::Int64(buf.get_i64_le()),
        ScalarType::Uint64 => WireValue::Uint64(buf.get_u64_le()),
        ScalarType::Float => WireValue::Float(buf.get_f32_le()),
        ScalarType::Bool => WireValue::Bool(buf.get_u8() != 0),
        ScalarType::Char => WireValue::Char(buf.get_u8()),
        // Strings are handled as whole slots.
        ScalarType::String => WireValue::String(vec![buf.get_u8()]),
    }
}

fn mismatch(slot: &Slot, value: &WireValue) -> WireError {
    WireError::TypeMismatch {
        element: slot.name.clone(),
        expected: slot.layout.wire_type,
        found: value.describe(),
    }
}
