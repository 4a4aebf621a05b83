//! Library assembler and the data model types it builds
//!: `Library`, `Structure`, `Units`, `Timestamps`.

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};

use anyhow::{anyhow, ensure, Context, Result};

use crate::element::Element;
use crate::record::{record_ascii, record_f64s, record_i16, Record};
use crate::tag::RecordTag;

/// The 12 `int16` fields a `BGNLIB`/`BGNSTR` record carries: last
/// modification time then last access time, each `(year, month, day,
/// hour, minute, second)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timestamps {
    pub modification: [i16; 6],
    pub access: [i16; 6],
}

impl Timestamps {
    fn from_values(values: &[i16]) -> Result<Self> {
        ensure!(
            values.len() == 12,
            "expected 12 timestamp fields, got {}",
            values.len()
        );
        let mut modification = [0i16; 6];
        let mut access = [0i16; 6];
        modification.copy_from_slice(&values[0..6]);
        access.copy_from_slice(&values[6..12]);
        Ok(Self {
            modification,
            access,
        })
    }

    fn to_values(self) -> [i16; 12] {
        let mut out = [0i16; 12];
        out[0..6].copy_from_slice(&self.modification);
        out[6..12].copy_from_slice(&self.access);
        out
    }
}

/// `UNITS = (user_per_db, meters_per_db)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Units {
    pub user_per_db: f64,
    pub meters_per_db: f64,
}

/// A named collection of elements.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Structure {
    pub bgn: Timestamps,
    pub name: String,
    pub elements: Vec<Element>,
}

impl Structure {
    fn read<R: Read + ?Sized>(bgn: Timestamps, input: &mut R) -> Result<Self> {
        let name_record = Record::read(input).context("reading STRNAME")?;
        ensure!(
            name_record.tag == RecordTag::StrName,
            "expected STRNAME after BGNSTR, got {}",
            name_record.tag.name()
        );
        let name = name_record.as_ascii()?;

        let mut elements = Vec::new();
        loop {
            let record = Record::read(input)
                .with_context(|| format!("reading elements of structure \"{name}\""))?;
            match record.tag {
                RecordTag::EndStr => break,
                RecordTag::Boundary
                | RecordTag::Path
                | RecordTag::Text
                | RecordTag::Node
                | RecordTag::Box
                | RecordTag::SRef
                | RecordTag::ARef => {
                    let element = Element::read(record.tag, input).with_context(|| {
                        format!("reading element in structure \"{name}\"")
                    })?;
                    elements.push(element);
                }
                other => {
                    return Err(anyhow!(
                        "unexpected {} record inside structure \"{name}\" (outside any element)",
                        other.name()
                    ))
                }
            }
        }
        Ok(Self {
            bgn,
            name,
            elements,
        })
    }

    fn write<W: Write + ?Sized>(&self, output: &mut W) -> Result<()> {
        Record::new(RecordTag::BgnStr, pack_i16s(&self.bgn.to_values())).write(output)?;
        record_ascii(RecordTag::StrName, &self.name).write(output)?;
        for element in &self.elements {
            let mut records = Vec::new();
            element
                .write_records(&mut records)
                .with_context(|| format!("encoding element in structure \"{}\"", self.name))?;
            for record in &records {
                record.write(output)?;
            }
        }
        Record::new(RecordTag::EndStr, Vec::new()).write(output)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Top-level stream container. Structures are kept in an
/// insertion-ordered `Vec` plus a name index, so write order stays
/// reproducible without a separate sort
/// pass over a `HashMap`'s unspecified iteration order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Library {
    pub version: i16,
    pub bgn: Timestamps,
    pub name: String,
    pub units: Units,
    pub structures: Vec<Structure>,
    /// Library-level records this core doesn't model directly,
    /// preserved verbatim between `UNITS` and the first `BGNSTR` so a
    /// read-then-write round trip doesn't silently drop them.
    pub extra_records: Vec<Record>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// Library-level tags tolerated (and preserved) outside the
/// `HEADER BGNLIB LIBNAME UNITS (BGNSTR...ENDSTR)* ENDLIB` shape;
/// anything else is a hard schema-violation error.
fn is_extra_library_record(tag: RecordTag) -> bool {
    matches!(
        tag,
        RecordTag::RefLibs
            | RecordTag::Fonts
            | RecordTag::Generations
            | RecordTag::AttrTable
            | RecordTag::Format
            | RecordTag::Mask
            | RecordTag::EndMasks
            | RecordTag::LibDirSize
            | RecordTag::SrfName
            | RecordTag::LibSecur
    )
}

impl Library {
    pub fn new(name: impl Into<String>, units: Units) -> Self {
        Self {
            version: 600,
            bgn: Timestamps::default(),
            name: name.into(),
            units,
            structures: Vec::new(),
            extra_records: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn structure(&self, name: &str) -> Option<&Structure> {
        self.index.get(name).map(|&i| &self.structures[i])
    }

    /// Insert a structure, erroring on a duplicate name.
    pub fn add_structure(&mut self, structure: Structure) -> Result<()> {
        ensure!(
            !self.index.contains_key(&structure.name),
            "duplicate structure name \"{}\"",
            structure.name
        );
        self.index.insert(structure.name.clone(), self.structures.len());
        self.structures.push(structure);
        Ok(())
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, structure) in self.structures.iter().enumerate() {
            self.index.insert(structure.name.clone(), i);
        }
    }

    /// Read a whole library from its top-level stream shape.
    pub fn read<R: Read + ?Sized>(input: &mut R) -> Result<Self> {
        let header = Record::read(input).context("reading HEADER")?;
        ensure!(
            header.tag == RecordTag::Header,
            "stream must start with HEADER, got {}",
            header.tag.name()
        );
        let version = header.as_i16()?;

        let bgnlib = Record::read(input).context("reading BGNLIB")?;
        ensure!(
            bgnlib.tag == RecordTag::BgnLib,
            "expected BGNLIB after HEADER, got {}",
            bgnlib.tag.name()
        );
        let bgn = Timestamps::from_values(&bgnlib.as_i16s()?)?;

        let libname = Record::read(input).context("reading LIBNAME")?;
        ensure!(
            libname.tag == RecordTag::LibName,
            "expected LIBNAME after BGNLIB, got {}",
            libname.tag.name()
        );
        let name = libname.as_ascii()?;

        let units_record = Record::read(input).context("reading UNITS")?;
        ensure!(
            units_record.tag == RecordTag::Units,
            "expected UNITS after LIBNAME, got {}",
            units_record.tag.name()
        );
        let units_values = units_record.as_f64s()?;
        ensure!(
            units_values.len() == 2,
            "UNITS must carry exactly 2 reals, got {}",
            units_values.len()
        );
        let units = Units {
            user_per_db: units_values[0],
            meters_per_db: units_values[1],
        };

        let mut library = Self {
            version,
            bgn,
            name,
            units,
            structures: Vec::new(),
            extra_records: Vec::new(),
            index: HashMap::new(),
        };

        loop {
            let record = Record::read(input).context("reading library body")?;
            match record.tag {
                RecordTag::EndLib => break,
                RecordTag::BgnStr => {
                    let str_bgn = Timestamps::from_values(&record.as_i16s()?)?;
                    let structure = Structure::read(str_bgn, input)?;
                    library.add_structure(structure)?;
                }
                tag if is_extra_library_record(tag) => library.extra_records.push(record),
                other => {
                    return Err(anyhow!(
                        "unexpected {} record at library top level",
                        other.name()
                    ))
                }
            }
        }
        library.reindex();
        Ok(library)
    }

    /// Write this library's stream. Never writes a partial file on
    /// error: all records are assembled into a buffer and validated
    /// before any bytes reach `output`.
    pub fn write<W: Write + ?Sized>(&self, output: &mut W) -> Result<()> {
        let mut buffer = Vec::new();
        record_i16(RecordTag::Header, self.version).write(&mut buffer)?;
        Record::new(RecordTag::BgnLib, pack_i16s(&self.bgn.to_values())).write(&mut buffer)?;
        record_ascii(RecordTag::LibName, &self.name).write(&mut buffer)?;
        record_f64s(
            RecordTag::Units,
            &[self.units.user_per_db, self.units.meters_per_db],
        )?
        .write(&mut buffer)?;
        for record in &self.extra_records {
            record.write(&mut buffer)?;
        }
        for structure in &self.structures {
            structure.write(&mut buffer)?;
        }
        Record::new(RecordTag::EndLib, Vec::new()).write(&mut buffer)?;
        output.write_all(&buffer).context("write library bytes")
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Library:")?;
        writeln!(f, "   Version: {}", self.version)?;
        writeln!(f, "   Name: {}", self.name)?;
        writeln!(
            f,
            "   Units: [{}, {}]",
            self.units.user_per_db, self.units.meters_per_db
        )?;
        write!(f, "   Structures:")?;
        for structure in &self.structures {
            write!(f, "\n      {structure}")?;
            for element in &structure.elements {
                write!(f, "\n         {element}")?;
            }
        }
        Ok(())
    }
}

fn pack_i16s(values: &[i16; 12]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(24);
    for v in values {
        payload.extend_from_slice(&v.to_be_bytes());
    }
    payload
}
