//! Build script for tunematch.
//!
//! Copies the configuration template and the default genre lookup into the
//! user's local data directory so that a fresh install finds them where the
//! application expects them:
//! - Linux: `~/.local/share/tunematch/`
//! - macOS: `~/Library/Application Support/tunematch/`
//! - Windows: `%LOCALAPPDATA%/tunematch/`

use std::{env, fs, path::PathBuf};

/// Files copied from the crate root. An existing `genres.json` in the data
/// directory is left alone so local edits survive a rebuild.
const TEMPLATES: [(&str, bool); 2] = [(".env.example", true), ("genres.json", false)];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("tunematch");
    fs::create_dir_all(&out_dir)?;

    for (name, overwrite) in TEMPLATES {
        println!("cargo:rerun-if-changed={name}");

        let source = manifest_dir.join(name);
        let target = out_dir.join(name);
        if !source.is_file() {
            println!("cargo:warning={} not found at {}", name, source.display());
            continue;
        }
        if target.exists() && !overwrite {
            continue;
        }
        fs::copy(&source, &target)?;
    }

    Ok(())
}
