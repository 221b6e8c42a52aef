//! Manifest parsing and batch conversion
//!
//! Parses sounds.toml and converts every listed WAV in one run.
//!
//! ```toml
//! [output]
//! dir = "build/sounds"
//! nibble_order = "low-first"
//!
//! [[sounds]]
//! path = "raw/beep.wav"
//!
//! [[sounds]]
//! path = "raw/laser-v2.wav"
//! name = "laser"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::convert::{
    ConvertOptions, ConvertedSound, NibblePacking, convert_file, sound_name_from_path,
};
use crate::formats::{NAME_LEN, USF_EXTENSION};

/// Root manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoundManifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub sounds: Vec<SoundEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub nibble_order: NibblePacking,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            nibble_order: NibblePacking::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoundEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
}

impl SoundEntry {
    /// Name stored in the header, before truncation
    pub fn sound_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| sound_name_from_path(&self.path))
    }
}

/// Load and parse a manifest file
///
/// Relative sound paths and the output directory are resolved against the
/// manifest's own directory.
pub fn load_manifest(path: &Path) -> Result<SoundManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest = parse_manifest(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;

    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        manifest.output.dir = base.join(&manifest.output.dir);
        for entry in &mut manifest.sounds {
            entry.path = base.join(&entry.path);
        }
    }
    Ok(manifest)
}

/// Parse manifest text without touching the filesystem
pub fn parse_manifest(content: &str) -> Result<SoundManifest> {
    Ok(toml::from_str(content)?)
}

/// Validate a manifest without building
///
/// Requires at least one sound, every source to exist, and header names to be
/// unique once truncated to the name field.
pub fn validate(manifest: &SoundManifest) -> Result<()> {
    if manifest.sounds.is_empty() {
        anyhow::bail!("Manifest lists no sounds");
    }

    let mut seen = HashSet::new();
    for entry in &manifest.sounds {
        let name = entry.sound_name();
        let stored = &name.as_bytes()[..name.len().min(NAME_LEN)];
        if !seen.insert(stored.to_vec()) {
            anyhow::bail!(
                "Duplicate sound name '{}' (names must be unique in their first {} bytes)",
                name,
                NAME_LEN
            );
        }
        if !entry.path.exists() {
            anyhow::bail!("Sound '{}' source not found: {:?}", name, entry.path);
        }
    }
    Ok(())
}

/// Convert every sound in a manifest
///
/// Stops at the first failing sound. Files already written stay in place.
pub fn build_all(
    manifest: &SoundManifest,
    output_override: Option<&Path>,
) -> Result<Vec<ConvertedSound>> {
    validate(manifest)?;

    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut converted = Vec::with_capacity(manifest.sounds.len());
    for entry in &manifest.sounds {
        let name = entry.sound_name();
        let output = output_dir.join(format!("{}.{}", name, USF_EXTENSION));
        tracing::info!("Converting sound: {} -> {:?}", name, output);

        let options = ConvertOptions {
            name: Some(name.clone()),
            nibble_order: manifest.output.nibble_order,
        };
        let sound = convert_file(&entry.path, Some(&output), &options)
            .with_context(|| format!("Failed to convert sound '{}'", name))?;
        converted.push(sound);
    }

    Ok(converted)
}
