#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use version_bump::{BumpTargets, DESCRIPTOR_PATH, MANIFEST_PATH, TizenVersion, apply};

#[derive(Parser, Debug)]
#[command(
    name = "version-bump",
    about = "Write a Tizen release version (x.y.z, x,y <= 255, z <= 65535) into the manifest and widget descriptor",
    after_help = "Example: version-bump 1.0.0"
)]
struct Args {
    /// New version in x.y.z form.
    version: String,

    /// Project root the default file locations are resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Package manifest. Defaults to `<root>/package.json`.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Widget descriptor. Defaults to `<root>/standalone/src/config.xml`.
    #[arg(long)]
    descriptor: Option<PathBuf>,
}

impl Args {
    fn targets(&self) -> BumpTargets {
        let defaults = BumpTargets::under(&self.root);
        BumpTargets {
            manifest: self.manifest.clone().unwrap_or(defaults.manifest),
            descriptor: self.descriptor.clone().unwrap_or(defaults.descriptor),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let version = TizenVersion::parse(&args.version)
        .with_context(|| format!("usage: version-bump <x.y.z>  (got {:?})", args.version))?;

    println!("Updating to version {version}");
    let touched = apply(&args.targets(), version).context("failed to update version")?;
    println!("Updated version in:");
    for path in &touched {
        println!("  - {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_live_under_root() {
        let args = Args::try_parse_from(["version-bump", "1.0.0", "--root", "/srv/shell"])
            .expect("parse args");
        let targets = args.targets();
        assert_eq!(targets.manifest, PathBuf::from("/srv/shell").join(MANIFEST_PATH));
        assert_eq!(
            targets.descriptor,
            PathBuf::from("/srv/shell").join(DESCRIPTOR_PATH)
        );
    }

    #[test]
    fn explicit_paths_override_root() {
        let args = Args::try_parse_from([
            "version-bump",
            "2.1.0",
            "--manifest",
            "/tmp/pkg.json",
            "--descriptor",
            "/tmp/config.xml",
        ])
        .expect("parse args");
        let targets = args.targets();
        assert_eq!(targets.manifest, PathBuf::from("/tmp/pkg.json"));
        assert_eq!(targets.descriptor, PathBuf::from("/tmp/config.xml"));
    }

    #[test]
    fn version_is_required() {
        assert!(Args::try_parse_from(["version-bump"]).is_err());
    }
}
