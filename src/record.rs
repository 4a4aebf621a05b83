//! Record codec: decode/encode a single length-prefixed typed record.

use std::io::{Read, Write};

use anyhow::{anyhow, ensure, Context, Result};

use crate::io::{GdsRead, GdsWrite};
use crate::tag::{PayloadKind, RecordTag};

/// A single `(size, tag, payload)` record, as it appears on the wire.
/// `payload` is the raw `size - 4` bytes; use the `as_*`
/// accessors to interpret it according to `tag.payload_kind()`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    pub tag: RecordTag,
    pub payload: Vec<u8>,
}

impl Record {
    pub fn new(tag: RecordTag, payload: Vec<u8>) -> Self {
        Self { tag, payload }
    }

    /// Decode one record's 4-byte header plus payload from `input`.
    /// Errors: short read, `size < 4`, unknown tag, truncated payload.
    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let size = input
            .read_u16()
            .context("truncated record header (size)")?;
        ensure!(size >= 4, "record size {size} smaller than the 4-byte header");
        let record_id = input
            .read_u8()
            .context("truncated record header (record_id)")?;
        let datatype_id = input
            .read_u8()
            .context("truncated record header (datatype_id)")?;
        let wire_tag = (u16::from(record_id) << 8) | u16::from(datatype_id);
        let tag = RecordTag::try_from(wire_tag)
            .map_err(|_| anyhow!("unknown record tag 0x{wire_tag:04x}"))?;

        let mut payload = vec![0u8; usize::from(size - 4)];
        input
            .read_exact(&mut payload)
            .with_context(|| format!("truncated payload for {} record", tag.name()))?;
        Ok(Self { tag, payload })
    }

    /// Encode this record's header and payload to `output`. `size` is
    /// recomputed from the payload length and asserted to fit in 16 bits.
    pub fn write<W: Write + ?Sized>(&self, output: &mut W) -> Result<()> {
        let size = 4usize
            .checked_add(self.payload.len())
            .filter(|&n| n <= usize::from(u16::MAX))
            .ok_or_else(|| {
                anyhow!(
                    "{} record payload of {} bytes does not fit the 16-bit size field",
                    self.tag.name(),
                    self.payload.len()
                )
            })? as u16;
        let wire_tag: u16 = self.tag.into();
        output.write_u16(size).context("write record size")?;
        output
            .write_u8((wire_tag >> 8) as u8)
            .context("write record_id")?;
        output
            .write_u8((wire_tag & 0xff) as u8)
            .context("write datatype_id")?;
        output
            .write_all(&self.payload)
            .with_context(|| format!("write {} payload", self.tag.name()))?;
        Ok(())
    }

    fn check_kind(&self, expected: PayloadKind) -> Result<()> {
        ensure!(
            self.tag.payload_kind() == expected,
            "{} record payload kind mismatch",
            self.tag.name()
        );
        Ok(())
    }

    pub fn as_i16(&self) -> Result<i16> {
        self.check_kind(PayloadKind::Int16)?;
        ensure!(self.payload.len() == 2, "{} expects a single int16", self.tag.name());
        Ok(i16::from_be_bytes([self.payload[0], self.payload[1]]))
    }

    pub fn as_i16s(&self) -> Result<Vec<i16>> {
        self.check_kind(PayloadKind::Int16)?;
        decode_be_words(&self.payload, self.tag)
    }

    pub fn as_u16(&self) -> Result<u16> {
        self.check_kind(PayloadKind::BitArray)?;
        ensure!(self.payload.len() == 2, "{} expects a single u16", self.tag.name());
        Ok(u16::from_be_bytes([self.payload[0], self.payload[1]]))
    }

    pub fn as_i32(&self) -> Result<i32> {
        self.check_kind(PayloadKind::Int32)?;
        ensure!(self.payload.len() == 4, "{} expects a single int32", self.tag.name());
        Ok(i32::from_be_bytes([
            self.payload[0],
            self.payload[1],
            self.payload[2],
            self.payload[3],
        ]))
    }

    pub fn as_i32s(&self) -> Result<Vec<i32>> {
        self.check_kind(PayloadKind::Int32)?;
        decode_be_words(&self.payload, self.tag)
    }

    pub fn as_f64(&self) -> Result<f64> {
        self.check_kind(PayloadKind::Real8)?;
        ensure!(self.payload.len() == 8, "{} expects a single real8", self.tag.name());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.payload);
        Ok(crate::scalar::decode_real(u64::from_be_bytes(bytes)))
    }

    pub fn as_f64s(&self) -> Result<Vec<f64>> {
        self.check_kind(PayloadKind::Real8)?;
        ensure!(
            self.payload.len() % 8 == 0,
            "{} payload length {} not a multiple of 8",
            self.tag.name(),
            self.payload.len()
        );
        self.payload
            .chunks_exact(8)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                Ok(crate::scalar::decode_real(u64::from_be_bytes(bytes)))
            })
            .collect()
    }

    pub fn as_ascii(&self) -> Result<String> {
        self.check_kind(PayloadKind::Ascii)?;
        let trimmed = trim_trailing_nul(&self.payload);
        String::from_utf8(trimmed.to_vec())
            .with_context(|| format!("{} payload is not valid ASCII/UTF-8", self.tag.name()))
    }
}

fn decode_be_words<T>(payload: &[u8], tag: RecordTag) -> Result<Vec<T>>
where
    T: FromBeBytes,
{
    let width = T::WIDTH;
    ensure!(
        payload.len() % width == 0,
        "{} payload length {} not a multiple of {width}",
        tag.name(),
        payload.len()
    );
    Ok(payload.chunks_exact(width).map(T::from_be_bytes).collect())
}

trait FromBeBytes: Sized {
    const WIDTH: usize;
    fn from_be_bytes(bytes: &[u8]) -> Self;
}

impl FromBeBytes for i16 {
    const WIDTH: usize = 2;
    fn from_be_bytes(bytes: &[u8]) -> Self {
        i16::from_be_bytes([bytes[0], bytes[1]])
    }
}

impl FromBeBytes for i32 {
    const WIDTH: usize = 4;
    fn from_be_bytes(bytes: &[u8]) -> Self {
        i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

fn trim_trailing_nul(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == 0 {
        end -= 1;
    }
    &bytes[..end]
}

/// Pad an ASCII string to even length with a single NUL byte. Strings
/// already of even length are left alone.
pub fn pad_ascii(s: &str) -> Vec<u8> {
    let mut bytes = s.as_bytes().to_vec();
    if bytes.len() % 2 != 0 {
        bytes.push(0);
    }
    bytes
}

/// Encode a payload-bearing record from a scalar/string/vec value and a
/// tag, computing the wire bytes per `tag.payload_kind()`.
pub fn record_i16(tag: RecordTag, value: i16) -> Record {
    Record::new(tag, value.to_be_bytes().to_vec())
}

pub fn record_i16s(tag: RecordTag, values: &[i16]) -> Record {
    let mut payload = Vec::with_capacity(values.len() * 2);
    for v in values {
        payload.extend_from_slice(&v.to_be_bytes());
    }
    Record::new(tag, payload)
}

pub fn record_u16(tag: RecordTag, value: u16) -> Record {
    Record::new(tag, value.to_be_bytes().to_vec())
}

pub fn record_i32(tag: RecordTag, value: i32) -> Record {
    Record::new(tag, value.to_be_bytes().to_vec())
}

pub fn record_i32s(tag: RecordTag, values: &[i32]) -> Record {
    let mut payload = Vec::with_capacity(values.len() * 4);
    for v in values {
        payload.extend_from_slice(&v.to_be_bytes());
    }
    Record::new(tag, payload)
}

pub fn record_f64(tag: RecordTag, value: f64) -> Result<Record> {
    let bits = crate::scalar::encode_real(value)?;
    Ok(Record::new(tag, bits.to_be_bytes().to_vec()))
}

pub fn record_f64s(tag: RecordTag, values: &[f64]) -> Result<Record> {
    let mut payload = Vec::with_capacity(values.len() * 8);
    for v in values {
        let bits = crate::scalar::encode_real(*v)?;
        payload.extend_from_slice(&bits.to_be_bytes());
    }
    Ok(Record::new(tag, payload))
}

pub fn record_ascii(tag: RecordTag, value: &str) -> Record {
    Record::new(tag, pad_ascii(value))
}

pub fn record_empty(tag: RecordTag) -> Record {
    Record::new(tag, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn record_round_trip() {
        let record = Record::new(RecordTag::Header, vec![0x00, 0x01]);
        let mut bytes = Vec::new();
        record.write(&mut bytes).unwrap();
        assert_eq!(bytes, vec![0x00, 0x06, 0x00, 0x02, 0x00, 0x01]);
        let decoded = Record::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn string_padding_odd_length_gets_nul() {
        assert_eq!(pad_ascii("test123"), b"test123\0".to_vec());
    }

    #[test]
    fn string_padding_even_length_untouched() {
        assert_eq!(pad_ascii("test1234"), b"test1234".to_vec());
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let bytes = vec![0x00, 0x04, 0xff, 0xff];
        assert!(Record::read(&mut Cursor::new(bytes)).is_err());
    }

    #[test]
    fn short_size_is_an_error() {
        let bytes = vec![0x00, 0x02, 0x00, 0x02];
        assert!(Record::read(&mut Cursor::new(bytes)).is_err());
    }
}
