use std::io::Read;

use anyhow::{ensure, Result};

use crate::record::{record_ascii, record_f64, record_i16s, record_i32, record_i32s, record_u16, Record};
use crate::strans::Strans;
use crate::tag::RecordTag;

/// A rectangular array of instances. `xy` is exactly three points
/// (insertion, column-anchor, row-anchor); `colrow = (ncol, nrow)` with
/// both strictly positive.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ARef {
    pub elflags: u16,
    pub plex: i32,
    pub sname: String,
    pub strans: Strans,
    pub mag: f64,
    pub angle: f64,
    pub colrow: (i16, i16),
    pub xy: Vec<i32>,
}

impl Default for ARef {
    fn default() -> Self {
        Self {
            elflags: 0,
            plex: 0,
            sname: String::new(),
            strans: Strans::default(),
            mag: 1.0,
            angle: 0.0,
            colrow: (0, 0),
            xy: Vec::new(),
        }
    }
}

impl ARef {
    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let mut aref = Self::default();
        let mut seen_elflags = false;
        let mut seen_plex = false;
        let mut seen_sname = false;
        let mut seen_strans = false;
        let mut seen_mag = false;
        let mut seen_angle = false;
        let mut seen_colrow = false;
        let mut seen_xy = false;
        loop {
            let record = Record::read(input)?;
            match record.tag {
                RecordTag::EndEl => break,
                RecordTag::ElFlags => {
                    ensure!(!seen_elflags, "duplicate ELFLAGS record inside AREF element");
                    seen_elflags = true;
                    aref.elflags = record.as_u16()?;
                }
                RecordTag::Plex => {
                    ensure!(!seen_plex, "duplicate PLEX record inside AREF element");
                    seen_plex = true;
                    aref.plex = record.as_i32()?;
                }
                RecordTag::SName => {
                    ensure!(!seen_sname, "duplicate SNAME record inside AREF element");
                    seen_sname = true;
                    aref.sname = record.as_ascii()?;
                }
                RecordTag::Strans => {
                    ensure!(!seen_strans, "duplicate STRANS record inside AREF element");
                    seen_strans = true;
                    aref.strans = Strans::from_raw(record.as_u16()?);
                }
                RecordTag::Mag => {
                    ensure!(!seen_mag, "duplicate MAG record inside AREF element");
                    seen_mag = true;
                    aref.mag = record.as_f64()?;
                }
                RecordTag::Angle => {
                    ensure!(!seen_angle, "duplicate ANGLE record inside AREF element");
                    seen_angle = true;
                    aref.angle = record.as_f64()?;
                }
                RecordTag::ColRow => {
                    ensure!(!seen_colrow, "duplicate COLROW record inside AREF element");
                    seen_colrow = true;
                    let values = record.as_i16s()?;
                    ensure!(values.len() == 2, "COLROW must carry exactly 2 values");
                    aref.colrow = (values[0], values[1]);
                }
                RecordTag::Xy => {
                    ensure!(!seen_xy, "duplicate XY record inside AREF element");
                    seen_xy = true;
                    aref.xy = record.as_i32s()?;
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "unexpected {} record inside AREF element",
                        other.name()
                    ))
                }
            }
        }
        ensure!(
            aref.xy.len() == 6,
            "AREF xy must carry exactly three points, got {} values",
            aref.xy.len()
        );
        ensure!(!aref.sname.is_empty(), "AREF missing required SNAME");
        ensure!(
            aref.colrow.0 > 0 && aref.colrow.1 > 0,
            "AREF colrow ({}, {}) must both be positive",
            aref.colrow.0,
            aref.colrow.1
        );
        Ok(aref)
    }

    pub fn write_records(&self, out: &mut Vec<Record>) -> Result<()> {
        out.push(Record::new(RecordTag::ARef, Vec::new()));
        if self.elflags != 0 {
            out.push(record_u16(RecordTag::ElFlags, self.elflags));
        }
        if self.plex != 0 {
            out.push(record_i32(RecordTag::Plex, self.plex));
        }
        out.push(record_ascii(RecordTag::SName, &self.sname));
        if self.strans.into_raw() != 0 {
            out.push(record_u16(RecordTag::Strans, self.strans.into_raw()));
        }
        if self.mag != 1.0 {
            out.push(record_f64(RecordTag::Mag, self.mag)?);
        }
        if self.angle != 0.0 {
            out.push(record_f64(RecordTag::Angle, self.angle)?);
        }
        out.push(record_i16s(
            RecordTag::ColRow,
            &[self.colrow.0, self.colrow.1],
        ));
        out.push(record_i32s(RecordTag::Xy, &self.xy));
        out.push(Record::new(RecordTag::EndEl, Vec::new()));
        Ok(())
    }
}
