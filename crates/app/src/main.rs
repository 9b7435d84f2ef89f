//! Entry point for wavemesh.
//! Loads every configured OBJ mesh in parallel and reports the vertex buffers
//! a renderer would upload.

mod config;

use std::path::PathBuf;

use anyhow::{Result, bail};
use asset::{LoadedMesh, load_obj_from_path};
use rayon::prelude::*;

use crate::config::Config;

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    output_corners: Option<bool>,
    paths: Vec<PathBuf>,
}

fn parse_switch(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Args {
    // Accept: --config=<file> --output-corners[=on|off] <model.obj>...
    let mut parsed = Args::default();
    for arg in args {
        if let Some(val) = arg.strip_prefix("--config=") {
            parsed.config = Some(PathBuf::from(val));
        } else if arg == "--output-corners" {
            parsed.output_corners = Some(true);
        } else if let Some(val) = arg.strip_prefix("--output-corners=") {
            parsed.output_corners = parse_switch(val);
            if parsed.output_corners.is_none() {
                log::warn!("Unknown value '{}' for --output-corners, ignoring.", val);
            }
        } else if arg.starts_with("--") {
            log::warn!("Unknown flag '{}', ignoring.", arg);
        } else {
            parsed.paths.push(PathBuf::from(arg));
        }
    }
    parsed
}

fn report(name: &str, mesh: &LoadedMesh) {
    log::info!(
        "{}: {} vertices, {} triangles, {} bytes",
        name,
        mesh.buffer.vertex_count(),
        mesh.buffer.triangle_count(),
        mesh.buffer.as_bytes().len()
    );
    if let Some(corners) = &mesh.corners {
        corners.log(name);
        if !corners.is_complete() {
            log::warn!(
                "{}: corner scan incomplete ({} of 4 missing)",
                name,
                corners.missing().count()
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1));
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    for path in args.paths {
        config.add_model_path(path);
    }
    let output_corners = args
        .output_corners
        .unwrap_or(config.misc.output_corner_vertices);

    if config.models.is_empty() {
        bail!("No models to load: pass OBJ paths or --config=<file>");
    }

    log::info!(
        "Starting wavemesh. models={}, output_corners={}",
        config.models.len(),
        output_corners
    );

    // Each load owns its own stream and buffers.
    let models: Vec<_> = config.models.iter().collect();
    let results: Vec<_> = models
        .par_iter()
        .map(|(name, path)| (*name, *path, load_obj_from_path(path, output_corners)))
        .collect();

    let mut failed = 0;
    for (name, path, result) in results {
        match result {
            Ok(mesh) => report(name, &mesh),
            Err(err) => {
                failed += 1;
                log::error!("{}: failed to load {}: {}", name, path.display(), err);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} models failed to load", failed, models.len());
    }

    log::info!("Finished loading. Bye!");
    Ok(())
}
