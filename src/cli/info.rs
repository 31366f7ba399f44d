use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use mcellrel::batch::realization_seed;
use mcellrel::container::{BlockLayout, Compression, ContainerReader};

/// Display header information about a binary output file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let handle = File::open(&file).context("Failed to open file")?;
    let (compression, reader) =
        Compression::decompress(BufReader::new(handle)).context("Failed to read file")?;
    let header = ContainerReader::read_header(reader)
        .with_context(|| format!("Failed to decode header of {}", file.display()))?;

    println!("MCell Binary Output Information");
    println!("===============================");
    println!("File: {}", file.display());
    println!();

    println!("Container:");
    println!("  API: {}", header.api);
    println!("  Compression: {:?}", compression);
    if let BlockLayout::V2 { buffer_rows, .. } = &header.layout {
        println!("  Buffer rows: {}", buffer_rows);
    }
    match realization_seed(&file) {
        Ok(seed) => println!("  Realization seed: {}", seed),
        Err(err) => println!("  Realization seed: <{}>", err),
    }
    println!();

    let metadata = header.metadata;
    println!("Simulation:");
    println!("  Step size: {:e} s", metadata.step_size);
    println!("  Iterations: {}", metadata.iteration_count);
    println!(
        "  Simulated time: {:e} s",
        metadata.step_size * metadata.iteration_count as f64
    );
    println!("  Blocks: {}", metadata.block_count);
    println!();

    println!("Blocks:");
    for (i, name) in header.block_names.iter().enumerate() {
        match &header.layout {
            BlockLayout::V2 { kinds, .. } => {
                println!("  {:5}. {} ({:?})", i + 1, name, kinds[i])
            }
            BlockLayout::V1 => println!("  {:5}. {}", i + 1, name),
        }
    }

    Ok(())
}
