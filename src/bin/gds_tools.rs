//! Dump and flatten GDSII libraries.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use gds_rs::api::{flatten_all, read_library, read_records};

/// Inspect and flatten GDSII stream files.
#[derive(Clone, Debug, Parser)]
struct Args {
    /// input GDSII stream file
    #[arg(short, long)]
    input: PathBuf,
    #[command(subcommand)]
    operation: Operation,
}

#[derive(Clone, Debug, Subcommand)]
enum Operation {
    /// Dump the raw record stream (tag, size, decoded payload)
    DumpRecords,
    /// Dump the parsed library structure
    DumpLibrary,
    /// Flatten a structure's hierarchy into per-layer polygons/paths/labels
    Flatten(FlattenArgs),
}

#[derive(Clone, Debug, Parser)]
struct FlattenArgs {
    /// name of the structure to flatten
    structure: String,
    /// print the result as JSON instead of the default text dump
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match &args.operation {
        Operation::DumpRecords => dump_records(&args),
        Operation::DumpLibrary => dump_library(&args),
        Operation::Flatten(flatten_args) => flatten(&args, flatten_args),
    }
}

fn dump_records(args: &Args) -> Result<()> {
    for record in read_records(&args.input)? {
        println!("{} ({} bytes)", record.tag.name(), record.payload.len());
    }
    Ok(())
}

fn dump_library(args: &Args) -> Result<()> {
    let library = read_library(&args.input)?;
    println!("{library}");
    Ok(())
}

fn flatten(args: &Args, flatten_args: &FlattenArgs) -> Result<()> {
    let library = read_library(&args.input)?;
    let bundle = flatten_all(&library, &flatten_args.structure)?;
    if flatten_args.json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else {
        for (layer, polys) in &bundle.polygons {
            println!("polygon layer {layer}: {} shapes", polys.polygons.len());
        }
        for (layer, paths) in &bundle.paths {
            println!("path layer {layer}: {} shapes", paths.paths.len());
        }
        for (layer, labels) in &bundle.labels {
            println!("label layer {layer}: {} labels", labels.labels.len());
        }
    }
    Ok(())
}
