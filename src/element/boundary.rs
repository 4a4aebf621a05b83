use std::io::Read;

use anyhow::{ensure, Result};

use crate::record::{record_i16, record_i32, record_i32s, record_u16, Record};
use crate::tag::RecordTag;

/// A closed polygon on a layer. `xy` length is even, at least 6 points.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Boundary {
    pub elflags: u16,
    pub plex: i32,
    pub layer: i16,
    pub datatype: i16,
    pub xy: Vec<i32>,
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            elflags: 0,
            plex: 0,
            layer: -1,
            datatype: -1,
            xy: Vec::new(),
        }
    }
}

impl Boundary {
    pub fn layer_key(&self) -> String {
        format!("{}/{}", self.layer, self.datatype)
    }

    /// Consume attribute records until `ENDEL`.
    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let mut boundary = Self::default();
        let (mut seen_elflags, mut seen_plex, mut seen_layer, mut seen_datatype, mut seen_xy) =
            (false, false, false, false, false);
        loop {
            let record = Record::read(input)?;
            match record.tag {
                RecordTag::EndEl => break,
                RecordTag::ElFlags => {
                    ensure!(!seen_elflags, "duplicate ELFLAGS record inside BOUNDARY element");
                    seen_elflags = true;
                    boundary.elflags = record.as_u16()?;
                }
                RecordTag::Plex => {
                    ensure!(!seen_plex, "duplicate PLEX record inside BOUNDARY element");
                    seen_plex = true;
                    boundary.plex = record.as_i32()?;
                }
                RecordTag::Layer => {
                    ensure!(!seen_layer, "duplicate LAYER record inside BOUNDARY element");
                    seen_layer = true;
                    boundary.layer = record.as_i16()?;
                }
                RecordTag::DataType => {
                    ensure!(!seen_datatype, "duplicate DATATYPE record inside BOUNDARY element");
                    seen_datatype = true;
                    boundary.datatype = record.as_i16()?;
                }
                RecordTag::Xy => {
                    ensure!(!seen_xy, "duplicate XY record inside BOUNDARY element");
                    seen_xy = true;
                    boundary.xy = record.as_i32s()?;
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "unexpected {} record inside BOUNDARY element",
                        other.name()
                    ))
                }
            }
        }
        ensure!(
            boundary.xy.len() >= 12 && boundary.xy.len() % 2 == 0,
            "BOUNDARY xy must have an even length with at least 6 points, got {}",
            boundary.xy.len() / 2
        );
        Ok(boundary)
    }

    pub fn write_records(&self, out: &mut Vec<Record>) {
        out.push(Record::new(RecordTag::Boundary, Vec::new()));
        if self.elflags != 0 {
            out.push(record_u16(RecordTag::ElFlags, self.elflags));
        }
        if self.plex != 0 {
            out.push(record_i32(RecordTag::Plex, self.plex));
        }
        out.push(record_i16(RecordTag::Layer, self.layer));
        out.push(record_i16(RecordTag::DataType, self.datatype));
        out.push(record_i32s(RecordTag::Xy, &self.xy));
        out.push(Record::new(RecordTag::EndEl, Vec::new()));
    }
}
