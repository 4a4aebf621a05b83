use std::io::Read;

use anyhow::{ensure, Result};

use crate::record::{record_i16, record_i32, record_i32s, record_u16, Record};
use crate::tag::RecordTag;

/// A box element. `xy` is exactly 5 points (a closed rectangle, first
/// and last point coincide).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GdsBox {
    pub elflags: u16,
    pub plex: i32,
    pub layer: i16,
    pub boxtype: i16,
    pub xy: Vec<i32>,
}

impl Default for GdsBox {
    fn default() -> Self {
        Self {
            elflags: 0,
            plex: 0,
            layer: -1,
            boxtype: -1,
            xy: Vec::new(),
        }
    }
}

impl GdsBox {
    pub fn layer_key(&self) -> String {
        format!("{}/{}", self.layer, self.boxtype)
    }

    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let mut gds_box = Self::default();
        let mut seen_elflags = false;
        let mut seen_plex = false;
        let mut seen_layer = false;
        let mut seen_boxtype = false;
        let mut seen_xy = false;
        loop {
            let record = Record::read(input)?;
            match record.tag {
                RecordTag::EndEl => break,
                RecordTag::ElFlags => {
                    ensure!(!seen_elflags, "duplicate ELFLAGS record inside BOX element");
                    seen_elflags = true;
                    gds_box.elflags = record.as_u16()?;
                }
                RecordTag::Plex => {
                    ensure!(!seen_plex, "duplicate PLEX record inside BOX element");
                    seen_plex = true;
                    gds_box.plex = record.as_i32()?;
                }
                RecordTag::Layer => {
                    ensure!(!seen_layer, "duplicate LAYER record inside BOX element");
                    seen_layer = true;
                    gds_box.layer = record.as_i16()?;
                }
                RecordTag::BoxType => {
                    ensure!(!seen_boxtype, "duplicate BOXTYPE record inside BOX element");
                    seen_boxtype = true;
                    gds_box.boxtype = record.as_i16()?;
                }
                RecordTag::Xy => {
                    ensure!(!seen_xy, "duplicate XY record inside BOX element");
                    seen_xy = true;
                    gds_box.xy = record.as_i32s()?;
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "unexpected {} record inside BOX element",
                        other.name()
                    ))
                }
            }
        }
        ensure!(
            gds_box.xy.len() == 10,
            "BOX xy must carry exactly 5 points, got {} values",
            gds_box.xy.len()
        );
        Ok(gds_box)
    }

    pub fn write_records(&self, out: &mut Vec<Record>) {
        out.push(Record::new(RecordTag::Box, Vec::new()));
        if self.elflags != 0 {
            out.push(record_u16(RecordTag::ElFlags, self.elflags));
        }
        if self.plex != 0 {
            out.push(record_i32(RecordTag::Plex, self.plex));
        }
        out.push(record_i16(RecordTag::Layer, self.layer));
        out.push(record_i16(RecordTag::BoxType, self.boxtype));
        out.push(record_i32s(RecordTag::Xy, &self.xy));
        out.push(Record::new(RecordTag::EndEl, Vec::new()));
    }
}
