//! Element assemblers. `Element` is the tagged sum over the
//! seven element kinds; dispatch is a `match` on the variant, never a
//! runtime type check.

mod aref;
mod boundary;
mod gds_box;
mod node;
mod path;
mod sref;
mod text;

pub use aref::ARef;
pub use boundary::Boundary;
pub use gds_box::GdsBox;
pub use node::Node;
pub use path::Path;
pub use sref::SRef;
pub use text::Text;

use std::fmt;
use std::io::Read;

use anyhow::{anyhow, Result};

use crate::record::Record;
use crate::tag::RecordTag;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Element {
    Boundary(Boundary),
    Path(Path),
    Text(Text),
    Node(Node),
    Box(GdsBox),
    SRef(SRef),
    ARef(ARef),
}

impl Element {
    /// `record` must be one of the seven element-begin records. Consumes
    /// the stream up to and including the matching `ENDEL`.
    pub fn read<R: Read + ?Sized>(begin_tag: RecordTag, input: &mut R) -> Result<Self> {
        match begin_tag {
            RecordTag::Boundary => Boundary::read(input).map(Element::Boundary),
            RecordTag::Path => Path::read(input).map(Element::Path),
            RecordTag::Text => Text::read(input).map(Element::Text),
            RecordTag::Node => Node::read(input).map(Element::Node),
            RecordTag::Box => GdsBox::read(input).map(Element::Box),
            RecordTag::SRef => SRef::read(input).map(Element::SRef),
            RecordTag::ARef => ARef::read(input).map(Element::ARef),
            other => Err(anyhow!("{} is not an element-begin record", other.name())),
        }
    }

    pub fn write_records(&self, out: &mut Vec<Record>) -> Result<()> {
        match self {
            Element::Boundary(e) => {
                e.write_records(out);
                Ok(())
            }
            Element::Path(e) => {
                e.write_records(out);
                Ok(())
            }
            Element::Text(e) => e.write_records(out),
            Element::Node(e) => {
                e.write_records(out);
                Ok(())
            }
            Element::Box(e) => {
                e.write_records(out);
                Ok(())
            }
            Element::SRef(e) => e.write_records(out),
            Element::ARef(e) => e.write_records(out),
        }
    }

    /// The layer key this element contributes to, for kinds that carry
    /// one directly. References contribute through the
    /// elements they expand, not directly, so they return `None`.
    pub fn layer_key(&self) -> Option<String> {
        match self {
            Element::Boundary(e) => Some(e.layer_key()),
            Element::Path(e) => Some(e.layer_key()),
            Element::Text(e) => Some(e.layer_key()),
            Element::Box(e) => Some(e.layer_key()),
            Element::Node(_) | Element::SRef(_) | Element::ARef(_) => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Boundary(e) => write!(
                f,
                "Boundary - ElFlags: {}, Plex: {}, Layer: {}, Datatype: {}, XY: {:?}",
                e.elflags, e.plex, e.layer, e.datatype, e.xy
            ),
            Element::Path(e) => write!(
                f,
                "Path - ElFlags: {}, Plex: {}, Layer: {}, Datatype: {}, Pathtype: {}, Width: {}, XY: {:?}",
                e.elflags, e.plex, e.layer, e.datatype, e.pathtype, e.width, e.xy
            ),
            Element::Text(e) => write!(
                f,
                "Text - ElFlags: {}, Plex: {}, Layer: {}, String: {}, XY: {:?}",
                e.elflags, e.plex, e.layer, e.string, e.xy
            ),
            Element::Node(e) => write!(
                f,
                "Node - ElFlags: {}, Plex: {}, Layer: {}, Nodetype: {}, XY: {:?}",
                e.elflags, e.plex, e.layer, e.nodetype, e.xy
            ),
            Element::Box(e) => write!(
                f,
                "Box - ElFlags: {}, Plex: {}, Layer: {}, Boxtype: {}, XY: {:?}",
                e.elflags, e.plex, e.layer, e.boxtype, e.xy
            ),
            Element::SRef(e) => write!(
                f,
                "SRef - ElFlags: {}, Plex: {}, Sname: {}, Strans: {:?}, Mag: {}, Angle: {}, XY: {:?}",
                e.elflags, e.plex, e.sname, e.strans, e.mag, e.angle, e.xy
            ),
            Element::ARef(e) => write!(
                f,
                "ARef - ElFlags: {}, Plex: {}, Sname: {}, Strans: {:?}, Mag: {}, Angle: {}, Colrow: {:?}, XY: {:?}",
                e.elflags, e.plex, e.sname, e.strans, e.mag, e.angle, e.colrow, e.xy
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn aref_round_trip() {
        let aref = ARef {
            elflags: 0,
            plex: 0,
            sname: "Test".to_string(),
            strans: crate::strans::Strans::default(),
            mag: 1.0,
            angle: 0.0,
            colrow: (1, 1),
            xy: vec![0, 0, 1, 1, 0, 0],
        };
        let element = Element::ARef(aref.clone());
        let mut records = Vec::new();
        element.write_records(&mut records).unwrap();

        let mut bytes = Vec::new();
        // skip the ARef begin record itself; Element::read expects the
        // caller to have already consumed the begin tag (as the
        // structure assembler does).
        for record in &records[1..] {
            record.write(&mut bytes).unwrap();
        }
        let decoded = Element::read(RecordTag::ARef, &mut Cursor::new(bytes)).unwrap();
        assert_eq!(decoded, Element::ARef(aref));
    }
}
