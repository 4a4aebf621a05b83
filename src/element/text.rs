use std::io::Read;

use anyhow::{ensure, Result};

use crate::record::{record_ascii, record_f64, record_i16, record_i32, record_i32s, record_u16, Record};
use crate::strans::Strans;
use crate::tag::RecordTag;

/// A text label. Single-pair `xy` anchor, string body passes
/// through transforms unchanged.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Text {
    pub elflags: u16,
    pub plex: i32,
    pub layer: i16,
    pub texttype: i16,
    pub presentation: u16,
    pub strans: Strans,
    pub mag: f64,
    pub angle: f64,
    pub xy: Vec<i32>,
    pub string: String,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            elflags: 0,
            plex: 0,
            layer: -1,
            texttype: -1,
            presentation: 0,
            strans: Strans::default(),
            mag: 1.0,
            angle: 0.0,
            xy: Vec::new(),
            string: String::new(),
        }
    }
}

impl Text {
    pub fn layer_key(&self) -> String {
        format!("{}/{}", self.layer, self.texttype)
    }

    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let mut text = Self::default();
        let mut seen_elflags = false;
        let mut seen_plex = false;
        let mut seen_layer = false;
        let mut seen_texttype = false;
        let mut seen_presentation = false;
        let mut seen_strans = false;
        let mut seen_mag = false;
        let mut seen_angle = false;
        let mut seen_xy = false;
        let mut seen_string = false;
        loop {
            let record = Record::read(input)?;
            match record.tag {
                RecordTag::EndEl => break,
                RecordTag::ElFlags => {
                    ensure!(!seen_elflags, "duplicate ELFLAGS record inside TEXT element");
                    seen_elflags = true;
                    text.elflags = record.as_u16()?;
                }
                RecordTag::Plex => {
                    ensure!(!seen_plex, "duplicate PLEX record inside TEXT element");
                    seen_plex = true;
                    text.plex = record.as_i32()?;
                }
                RecordTag::Layer => {
                    ensure!(!seen_layer, "duplicate LAYER record inside TEXT element");
                    seen_layer = true;
                    text.layer = record.as_i16()?;
                }
                RecordTag::TextType => {
                    ensure!(!seen_texttype, "duplicate TEXTTYPE record inside TEXT element");
                    seen_texttype = true;
                    text.texttype = record.as_i16()?;
                }
                RecordTag::Presentation => {
                    ensure!(!seen_presentation, "duplicate PRESENTATION record inside TEXT element");
                    seen_presentation = true;
                    text.presentation = record.as_u16()?;
                }
                RecordTag::Strans => {
                    ensure!(!seen_strans, "duplicate STRANS record inside TEXT element");
                    seen_strans = true;
                    text.strans = Strans::from_raw(record.as_u16()?);
                }
                RecordTag::Mag => {
                    ensure!(!seen_mag, "duplicate MAG record inside TEXT element");
                    seen_mag = true;
                    text.mag = record.as_f64()?;
                }
                RecordTag::Angle => {
                    ensure!(!seen_angle, "duplicate ANGLE record inside TEXT element");
                    seen_angle = true;
                    text.angle = record.as_f64()?;
                }
                RecordTag::Xy => {
                    ensure!(!seen_xy, "duplicate XY record inside TEXT element");
                    seen_xy = true;
                    text.xy = record.as_i32s()?;
                }
                RecordTag::String => {
                    ensure!(!seen_string, "duplicate STRING record inside TEXT element");
                    seen_string = true;
                    text.string = record.as_ascii()?;
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "unexpected {} record inside TEXT element",
                        other.name()
                    ))
                }
            }
        }
        ensure!(
            text.xy.len() == 2,
            "TEXT xy must carry exactly one anchor point, got {} values",
            text.xy.len()
        );
        Ok(text)
    }

    pub fn write_records(&self, out: &mut Vec<Record>) -> Result<()> {
        out.push(Record::new(RecordTag::Text, Vec::new()));
        if self.elflags != 0 {
            out.push(record_u16(RecordTag::ElFlags, self.elflags));
        }
        if self.plex != 0 {
            out.push(record_i32(RecordTag::Plex, self.plex));
        }
        out.push(record_i16(RecordTag::Layer, self.layer));
        out.push(record_i16(RecordTag::TextType, self.texttype));
        if self.presentation != 0 {
            out.push(record_u16(RecordTag::Presentation, self.presentation));
        }
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
        out.push(record_ascii(RecordTag::String, &self.string));
        out.push(Record::new(RecordTag::EndEl, Vec::new()));
        Ok(())
    }
}
