//! Big-endian primitive read/write extension traits over `Read`/`Write`.
//! GDSII is always big-endian and fixed-width, so these are plain
//! `from_be_bytes`/`to_be_bytes` wrappers with no mode switch.

use std::io::{Read, Write};

use anyhow::{Context, Result};

pub trait GdsRead: Read {
    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf).context("truncated u8")?;
        Ok(buf[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf).context("truncated u16")?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl<R: Read + ?Sized> GdsRead for R {}

pub trait GdsWrite: Write {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value]).context("write u8")
    }

    fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_all(&value.to_be_bytes()).context("write u16")
    }
}

impl<W: Write + ?Sized> GdsWrite for W {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_byte_packing() {
        let mut buf = Vec::new();
        buf.write_u16(0x0F0F).unwrap();
        assert_eq!(buf, vec![0x0F, 0x0F]);
    }

    #[test]
    fn u8_round_trips() {
        let mut buf = Vec::new();
        buf.write_u8(0xAB).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(cursor.read_u8().unwrap(), 0xAB);
    }
}
