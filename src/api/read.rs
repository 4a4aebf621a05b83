use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use crate::library::Library;
use crate::record::Record;
use crate::tag::RecordTag;

/// Parse a whole GDSII stream file into a [`Library`].
pub fn read_library(path: impl AsRef<Path>) -> Result<Library> {
    let path = path.as_ref();
    let input = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(input);
    Library::read(&mut reader).with_context(|| format!("parsing {}", path.display()))
}

/// Decode the raw record stream of a GDSII file without building the
/// structured [`Library`] model, for low-level inspection. Stops after
/// the `ENDLIB` record, matching a well-formed file's stream shape.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let input = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(input);
    let mut records = Vec::new();
    loop {
        let record = Record::read(&mut reader).with_context(|| format!("reading {}", path.display()))?;
        let done = record.tag == RecordTag::EndLib;
        records.push(record);
        if done {
            break;
        }
    }
    Ok(records)
}
