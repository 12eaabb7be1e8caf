//! Merge command
//!
//! Runs the same upload, upload, merge, fetch sequence a server session
//! would, against a single-session registry.

use crate::MergeArgs;
use anyhow::{Context, Result};
use dualpng_core::Image;
use dualpng_ops::LanczosResizer;
use dualpng_session::{MergeParams, RegistryConfig, ResultMode, SessionRegistry, Slot};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const PLACEHOLDER_SIZE: u32 = 500;

pub fn run(args: MergeArgs, config: RegistryConfig, verbose: u8) -> Result<()> {
    let img1 = match &args.img1 {
        Some(path) => super::load_image(path)?,
        None => Image::filled(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, WHITE),
    };
    let img2 = match &args.img2 {
        Some(path) => super::load_image(path)?,
        None => Image::filled(img1.width(), img1.height(), BLACK),
    };
    debug!(
        img1 = ?img1.dimensions(),
        img2 = ?img2.dimensions(),
        "sources loaded"
    );

    let registry = SessionRegistry::new(config);
    let session = registry.create_anonymous()?;
    session.set_source(Slot::One, img1);
    session.set_source(Slot::Two, img2);

    let params = MergeParams {
        range1: args.range1,
        range2: args.range2,
        gamma: args.gamma,
        width: args.width,
        height: args.height,
        brightness1: args.brightness1,
        brightness2: args.brightness2,
        mask: args.mask,
    };
    let resizer = LanczosResizer::with_filter(args.filter);
    let summary = session.merge(&params, &resizer).context("Merge failed")?;

    let mode = if args.no_gamma {
        ResultMode::NoGamma
    } else {
        ResultMode::Gamma
    };
    let rendered = session
        .result(mode)
        .context("Merge produced no result")?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create: {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    rendered
        .encode(&mut writer)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;
    writer.flush()?;

    info!(output = %args.output.display(), "written");
    if verbose > 0 {
        match rendered.gamma {
            Some(g) => println!(
                "{}: {}x{}, gAMA {}",
                args.output.display(),
                summary.width,
                summary.height,
                g
            ),
            None => println!(
                "{}: {}x{}, no gAMA",
                args.output.display(),
                summary.width,
                summary.height
            ),
        }
    }
    Ok(())
}
