//! Release version stamping.
//!
//! Tizen packages need an `x.y.z` version with `x, y <= 255` and
//! `z <= 65535`. The same version is written to the package manifest and to
//! the `<widget>` element of the standalone descriptor.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

pub const MANIFEST_PATH: &str = "package.json";
pub const DESCRIPTOR_PATH: &str = "standalone/src/config.xml";

const MAX_MAJOR: u64 = 255;
const MAX_MINOR: u64 = 255;
const MAX_PATCH: u64 = 65_535;
const WIDGET_VERSION_PATTERN: &str = r#"(<widget\b[^>]*?\sversion=")[^"]*(")"#;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version argument is required")]
    Empty,
    #[error("invalid version format {0:?}; expected x.y.z (e.g. 1.0.0)")]
    InvalidFormat(String),
    #[error(
        "version numbers exceed tizen limits (x and y must be <= 255, z must be <= 65535); got x={major}, y={minor}, z={patch}"
    )]
    OutOfRange { major: u64, minor: u64, patch: u64 },
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid manifest json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest is not a json object")]
    ManifestNotObject,
    #[error("descriptor has no <widget> version attribute")]
    MissingWidgetVersion,
    #[error("invalid widget version pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A validated `x.y.z` release version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TizenVersion {
    major: u8,
    minor: u8,
    patch: u16,
}

impl TizenVersion {
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(VersionError::Empty);
        }

        let parts: Vec<&str> = raw.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(VersionError::InvalidFormat(raw.to_string()));
        };
        let major = parse_component(major).ok_or_else(|| VersionError::InvalidFormat(raw.to_string()))?;
        let minor = parse_component(minor).ok_or_else(|| VersionError::InvalidFormat(raw.to_string()))?;
        let patch = parse_component(patch).ok_or_else(|| VersionError::InvalidFormat(raw.to_string()))?;

        if major > MAX_MAJOR || minor > MAX_MINOR || patch > MAX_PATCH {
            return Err(VersionError::OutOfRange { major, minor, patch });
        }
        Ok(Self {
            major: u8::try_from(major).map_err(|_| VersionError::OutOfRange { major, minor, patch })?,
            minor: u8::try_from(minor).map_err(|_| VersionError::OutOfRange { major, minor, patch })?,
            patch: u16::try_from(patch).map_err(|_| VersionError::OutOfRange { major, minor, patch })?,
        })
    }

    pub fn major(self) -> u8 {
        self.major
    }

    pub fn minor(self) -> u8 {
        self.minor
    }

    pub fn patch(self) -> u16 {
        self.patch
    }
}

// Digits only. Values too large for u64 saturate so they still report as out of range.
fn parse_component(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some(raw.parse::<u64>().unwrap_or(u64::MAX))
}

impl FromStr for TizenVersion {
    type Err = VersionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl fmt::Display for TizenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Set the top-level `version` of a package manifest. Key order is kept and
/// the output is two-space indented with a trailing newline.
pub fn rewrite_manifest_version(raw: &str, version: TizenVersion) -> Result<String, RewriteError> {
    let mut manifest: Value = serde_json::from_str(raw)?;
    let object = manifest
        .as_object_mut()
        .ok_or(RewriteError::ManifestNotObject)?;
    object.insert("version".to_string(), Value::String(version.to_string()));

    let mut rendered = serde_json::to_string_pretty(&manifest)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Replace the `version` attribute of the first `<widget>` start tag. Nothing
/// else in the document changes.
pub fn rewrite_descriptor_version(raw: &str, version: TizenVersion) -> Result<String, RewriteError> {
    let pattern = Regex::new(WIDGET_VERSION_PATTERN)?;
    if !pattern.is_match(raw) {
        return Err(RewriteError::MissingWidgetVersion);
    }
    let replacement = format!("${{1}}{version}${{2}}");
    Ok(pattern.replace(raw, replacement.as_str()).into_owned())
}

/// Files touched by [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpTargets {
    pub manifest: PathBuf,
    pub descriptor: PathBuf,
}

impl BumpTargets {
    /// Default locations under a project root.
    pub fn under(root: &Path) -> Self {
        Self {
            manifest: root.join(MANIFEST_PATH),
            descriptor: root.join(DESCRIPTOR_PATH),
        }
    }
}

/// Rewrite both files. Both are read and rewritten in memory before either is
/// written, so a bad descriptor leaves the manifest untouched.
pub fn apply(targets: &BumpTargets, version: TizenVersion) -> Result<Vec<PathBuf>, RewriteError> {
    let manifest = rewrite_manifest_version(&read(&targets.manifest)?, version)?;
    let descriptor = rewrite_descriptor_version(&read(&targets.descriptor)?, version)?;

    write(&targets.manifest, &manifest)?;
    write(&targets.descriptor, &descriptor)?;
    info!(%version, manifest = %targets.manifest.display(), descriptor = %targets.descriptor.display(), "version updated");
    Ok(vec![targets.manifest.clone(), targets.descriptor.clone()])
}

fn read(path: &Path) -> Result<String, RewriteError> {
    std::fs::read_to_string(path).map_err(|source| RewriteError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), RewriteError> {
    std::fs::write(path, contents).map_err(|source| RewriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}
