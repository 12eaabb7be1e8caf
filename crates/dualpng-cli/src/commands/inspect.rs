//! Inspect command
//!
//! Prints format, resolution and the gAMA value of images.

use crate::InspectArgs;
use anyhow::{Context, Result};
use dualpng_io::Format;
use std::fs;
use std::path::Path;

struct Report {
    format: Format,
    width: u32,
    height: u32,
    gamma: Option<u32>,
    file_size: u64,
}

pub fn run(args: InspectArgs) -> Result<()> {
    for (i, path) in args.input.iter().enumerate() {
        let report = inspect(path)?;
        if args.json {
            print_json(path, &report);
        } else {
            if i > 0 {
                println!();
            }
            print_text(path, &report);
        }
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<Report> {
    let data = fs::read(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let format = Format::from_bytes(&data);
    let image = dualpng_io::decode(&data)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let gamma = match format {
        Format::Png => dualpng_io::read_gamma(&data)?,
        _ => None,
    };
    Ok(Report {
        format,
        width: image.width(),
        height: image.height(),
        gamma,
        file_size: data.len() as u64,
    })
}

fn print_text(path: &Path, r: &Report) {
    println!("{}", path.display());
    println!("  Format:     {}", r.format);
    println!("  Resolution: {}x{}", r.width, r.height);
    println!("  File size:  {} bytes", r.file_size);
    match r.gamma {
        Some(g) => println!("  gAMA:       {} (file gamma {:.5})", g, f64::from(g) / 100_000.0),
        None => println!("  gAMA:       none"),
    }
}

fn print_json(path: &Path, r: &Report) {
    let value = serde_json::json!({
        "path": path.display().to_string(),
        "format": r.format.name(),
        "width": r.width,
        "height": r.height,
        "file_size": r.file_size,
        "gamma": r.gamma,
    });
    println!("{value}");
}
