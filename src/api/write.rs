use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::library::Library;

/// Encode `library` and write it to `path`.
pub fn write_library(library: &Library, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let output = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(output);
    library.write(&mut writer)?;
    writer.into_inner().map(|_| ()).map_err(|err| {
        anyhow::anyhow!("flushing {}: {}", path.display(), err.into_error())
    })
}
