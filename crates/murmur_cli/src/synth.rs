//! Implementation of the `murmur synth` and `murmur fingerprint` commands.

use std::path::Path;

use murmur_common::CacheEntry;
use murmur_synth::prepare_request;

use crate::service::{build_request, build_synthesizer, load_service_config};
use crate::{FingerprintArgs, GlobalArgs, SynthArgs};

/// Runs the `murmur synth` command.
///
/// Prints the request id and content type on stdout, and writes the audio to
/// `--output` when given.
pub fn run(args: &SynthArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = load_service_config(global)?;
    if args.no_cache {
        config.cache = false;
    }
    let synthesizer = build_synthesizer(config)?;
    let request = build_request(&args.text, &args.options);
    let entry = synthesizer.synthesize(&request)?;

    if let Some(output) = &args.output {
        write_audio(Path::new(output), &entry)?;
    }
    println!("{}", describe(&entry));
    Ok(0)
}

/// Runs the `murmur fingerprint` command.
pub fn fingerprint(
    args: &FingerprintArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_service_config(global)?;
    let request = build_request(&args.text, &args.options);
    let (_, fingerprint) = prepare_request(&request, &config.request_options)?;
    println!("{fingerprint}");
    Ok(0)
}

fn write_audio(path: &Path, entry: &CacheEntry) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, &entry.data)
        .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    Ok(())
}

fn describe(entry: &CacheEntry) -> String {
    format!(
        "{}\t{}\t{} bytes",
        entry.request_id,
        entry.mime,
        entry.data.len()
    )
}
