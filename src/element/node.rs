use std::io::Read;

use anyhow::{ensure, Result};

use crate::record::{record_i16, record_i32, record_i32s, record_u16, Record};
use crate::tag::RecordTag;

/// A node element: ignored by the resolver but preserved by the codec
/// (an unsupported-for-flattening, not unsupported-for-IO, element kind).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub elflags: u16,
    pub plex: i32,
    pub layer: i16,
    pub nodetype: i16,
    pub xy: Vec<i32>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            elflags: 0,
            plex: 0,
            layer: -1,
            nodetype: -1,
            xy: Vec::new(),
        }
    }
}

impl Node {
    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let mut node = Self::default();
        let mut seen_elflags = false;
        let mut seen_plex = false;
        let mut seen_layer = false;
        let mut seen_nodetype = false;
        let mut seen_xy = false;
        loop {
            let record = Record::read(input)?;
            match record.tag {
                RecordTag::EndEl => break,
                RecordTag::ElFlags => {
                    ensure!(!seen_elflags, "duplicate ELFLAGS record inside NODE element");
                    seen_elflags = true;
                    node.elflags = record.as_u16()?;
                }
                RecordTag::Plex => {
                    ensure!(!seen_plex, "duplicate PLEX record inside NODE element");
                    seen_plex = true;
                    node.plex = record.as_i32()?;
                }
                RecordTag::Layer => {
                    ensure!(!seen_layer, "duplicate LAYER record inside NODE element");
                    seen_layer = true;
                    node.layer = record.as_i16()?;
                }
                RecordTag::NodeType => {
                    ensure!(!seen_nodetype, "duplicate NODETYPE record inside NODE element");
                    seen_nodetype = true;
                    node.nodetype = record.as_i16()?;
                }
                RecordTag::Xy => {
                    ensure!(!seen_xy, "duplicate XY record inside NODE element");
                    seen_xy = true;
                    node.xy = record.as_i32s()?;
                }
                other => {
                    return Err(anyhow::anyhow!(
                        "unexpected {} record inside NODE element",
                        other.name()
                    ))
                }
            }
        }
        Ok(node)
    }

    pub fn write_records(&self, out: &mut Vec<Record>) {
        out.push(Record::new(RecordTag::Node, Vec::new()));
        if self.elflags != 0 {
            out.push(record_u16(RecordTag::ElFlags, self.elflags));
        }
        if self.plex != 0 {
            out.push(record_i32(RecordTag::Plex, self.plex));
        }
        out.push(record_i16(RecordTag::Layer, self.layer));
        out.push(record_i16(RecordTag::NodeType, self.nodetype));
        out.push(record_i32s(RecordTag::Xy, &self.xy));
        out.push(Record::new(RecordTag::EndEl, Vec::new()));
    }
}
