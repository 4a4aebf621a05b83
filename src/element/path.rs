use std::io::Read;

use anyhow::{ensure, Result};

use crate::record::{record_i16, record_i32, record_i32s, record_u16, Record};
use crate::tag::RecordTag;

/// An open path. `xy` length even, at least 4; `width` negative means
/// an absolute width unaffected by magnification; `pathtype` in
/// `{0, 1, 2, 4}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Path {
    pub elflags: u16,
    pub plex: i32,
    pub layer: i16,
    pub datatype: i16,
    pub pathtype: i16,
    pub width: i32,
    pub xy: Vec<i32>,
}

impl Default for Path {
    fn default() -> Self {
        Self {
            elflags: 0,
            plex: 0,
            layer: -1,
            datatype: -1,
            pathtype: -1,
            width: 0,
            xy: Vec::new(),
        }
    }
}

impl Path {
    pub fn layer_key(&self) -> String {
        format!("{}/{}", self.layer, self.datatype)
    }

    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let mut path = Self::default();
        let mut seen_elflags = false;
        let mut seen_plex = false;
        let mut seen_layer = false;
        let mut seen_datatype = false;
        let mut seen_pathtype = false;
        let mut seen_width = false;
        let mut seen_xy = false;
        let mut seen_bgnextn = false;
        let mut seen_endextn = false;
        loop {
            let record = Record::read(input)?;
            match record.tag {
                RecordTag::EndEl => break,
                RecordTag::ElFlags => {
                    ensure!(!seen_elflags, "duplicate ELFLAGS record inside PATH element");
                    seen_elflags = true;
                    path.elflags = record.as_u16()?;
                }
                RecordTag::Plex => {
                    ensure!(!seen_plex, "duplicate PLEX record inside PATH element");
                    seen_plex = true;
                    path.plex = record.as_i32()?;
                }
                RecordTag::Layer => {
                    ensure!(!seen_layer, "duplicate LAYER record inside PATH element");
                    seen_layer = true;
                    path.layer = record.as_i16()?;
                }
                RecordTag::DataType => {
                    ensure!(!seen_datatype, "duplicate DATATYPE record inside PATH element");
                    seen_datatype = true;
                    path.datatype = record.as_i16()?;
                }
                RecordTag::PathType => {
                    ensure!(!seen_pathtype, "duplicate PATHTYPE record inside PATH element");
                    seen_pathtype = true;
                    path.pathtype = record.as_i16()?;
                }
                RecordTag::Width => {
                    ensure!(!seen_width, "duplicate WIDTH record inside PATH element");
                    seen_width = true;
                    path.width = record.as_i32()?;
                }
                RecordTag::Xy => {
                    ensure!(!seen_xy, "duplicate XY record inside PATH element");
                    seen_xy = true;
                    path.xy = record.as_i32s()?;
                }
                // Path extension begin/end: documented no-ops, still at most once each.
                RecordTag::BgnExtn => {
                    ensure!(!seen_bgnextn, "duplicate BGNEXTN record inside PATH element");
                    seen_bgnextn = true;
                }
                RecordTag::EndExtn => {
                    ensure!(!seen_endextn, "duplicate ENDEXTN record inside PATH element");
                    seen_endextn = true;
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "unexpected {} record inside PATH element",
                        other.name()
                    ))
                }
            }
        }
        ensure!(
            path.xy.len() >= 4 && path.xy.len() % 2 == 0,
            "PATH xy must have an even length with at least 2 points, got {}",
            path.xy.len() / 2
        );
        ensure!(
            matches!(path.pathtype, 0 | 1 | 2 | 4 | -1),
            "PATH pathtype {} is not one of {{0,1,2,4}}",
            path.pathtype
        );
        Ok(path)
    }

    pub fn write_records(&self, out: &mut Vec<Record>) {
        out.push(Record::new(RecordTag::Path, Vec::new()));
        if self.elflags != 0 {
            out.push(record_u16(RecordTag::ElFlags, self.elflags));
        }
        if self.plex != 0 {
            out.push(record_i32(RecordTag::Plex, self.plex));
        }
        out.push(record_i16(RecordTag::Layer, self.layer));
        out.push(record_i16(RecordTag::DataType, self.datatype));
        if self.pathtype != -1 {
            out.push(record_i16(RecordTag::PathType, self.pathtype));
        }
        if self.width != 0 {
            out.push(record_i32(RecordTag::Width, self.width));
        }
        out.push(record_i32s(RecordTag::Xy, &self.xy));
        out.push(Record::new(RecordTag::EndEl, Vec::new()));
    }
}
