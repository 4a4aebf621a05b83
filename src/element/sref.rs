use std::io::Read;

use anyhow::{ensure, Result};

use crate::record::{record_ascii, record_f64, record_i32, record_i32s, record_u16, Record};
use crate::strans::Strans;
use crate::tag::RecordTag;

/// A single structure instance. `xy` is exactly one point, the
/// insertion point.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SRef {
    pub elflags: u16,
    pub plex: i32,
    pub sname: String,
    pub strans: Strans,
    pub mag: f64,
    pub angle: f64,
    pub xy: Vec<i32>,
}

impl Default for SRef {
    fn default() -> Self {
        Self {
            elflags: 0,
            plex: 0,
            sname: String::new(),
            strans: Strans::default(),
            mag: 1.0,
            angle: 0.0,
            xy: Vec::new(),
        }
    }
}

impl SRef {
    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let mut sref = Self::default();
        let mut seen_elflags = false;
        let mut seen_plex = false;
        let mut seen_sname = false;
        let mut seen_strans = false;
        let mut seen_mag = false;
        let mut seen_angle = false;
        let mut seen_xy = false;
        loop {
            let record = Record::read(input)?;
            match record.tag {
                RecordTag::EndEl => break,
                RecordTag::ElFlags => {
                    ensure!(!seen_elflags, "duplicate ELFLAGS record inside SREF element");
                    seen_elflags = true;
                    sref.elflags = record.as_u16()?;
                }
                RecordTag::Plex => {
                    ensure!(!seen_plex, "duplicate PLEX record inside SREF element");
                    seen_plex = true;
                    sref.plex = record.as_i32()?;
                }
                RecordTag::SName => {
                    ensure!(!seen_sname, "duplicate SNAME record inside SREF element");
                    seen_sname = true;
                    sref.sname = record.as_ascii()?;
                }
                RecordTag::Strans => {
                    ensure!(!seen_strans, "duplicate STRANS record inside SREF element");
                    seen_strans = true;
                    sref.strans = Strans::from_raw(record.as_u16()?);
                }
                RecordTag::Mag => {
                    ensure!(!seen_mag, "duplicate MAG record inside SREF element");
                    seen_mag = true;
                    sref.mag = record.as_f64()?;
                }
                RecordTag::Angle => {
                    ensure!(!seen_angle, "duplicate ANGLE record inside SREF element");
                    seen_angle = true;
                    sref.angle = record.as_f64()?;
                }
                RecordTag::Xy => {
                    ensure!(!seen_xy, "duplicate XY record inside SREF element");
                    seen_xy = true;
                    sref.xy = record.as_i32s()?;
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "unexpected {} record inside SREF element",
                        other.name()
                    ))
                }
            }
        }
        ensure!(
            sref.xy.len() == 2,
            "SREF xy must carry exactly one point, got {} values",
            sref.xy.len()
        );
        ensure!(!sref.sname.is_empty(), "SREF missing required SNAME");
        Ok(sref)
    }

    pub fn write_records(&self, out: &mut Vec<Record>) -> Result<()> {
        out.push(Record::new(RecordTag::SRef, Vec::new()));
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
        out.push(record_i32s(RecordTag::Xy, &self.xy));
        out.push(Record::new(RecordTag::EndEl, Vec::new()));
        Ok(())
    }
}
