//! Implementation of `sdist`.
//!
//! Writes `<dist>/<name>-<version>.tar.gz` holding the package sources under a
//! `<name>-<version>/` prefix plus a generated `PKG-INFO`. Build output,
//! previous distributions, packaging metadata and hidden files are left out.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use walkdir::{DirEntry, WalkDir};

use crate::core::{Package, PackageMetadata};
use crate::error::BuildError;
use crate::ops::LifecycleCommand;
use crate::util::fs::ensure_dir;

/// Options for `sdist`.
#[derive(Debug, Clone, Default)]
pub struct Sdist {
    /// Output directory (defaults to `<root>/dist`, relative paths are
    /// taken from the package root)
    pub dist_dir: Option<PathBuf>,
}

impl Sdist {
    /// Create the source archive and return its path.
    pub fn create(&self, pkg: &Package) -> Result<PathBuf, BuildError> {
        let dist_dir = match self.dist_dir {
            Some(ref dir) => pkg.root().join(dir),
            None => pkg.dist_dir(),
        };
        ensure_dir(&dist_dir)?;

        let base = format!("{}-{}", pkg.name(), pkg.version());
        let archive_path = dist_dir.join(format!("{}.tar.gz", base));
        let io_err = |e| {
            BuildError::io(
                format!("failed to write archive: {}", archive_path.display()),
                e,
            )
        };

        let sources = collect_sources(pkg.root(), &dist_dir)?;

        let file = File::create(&archive_path).map_err(io_err)?;
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        for rel in &sources {
            builder
                .append_path_with_name(pkg.root().join(rel), Path::new(&base).join(rel))
                .map_err(io_err)?;
        }

        let pkg_info = render_pkg_info(pkg.metadata());
        let mut header = tar::Header::new_gnu();
        header.set_size(pkg_info.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                Path::new(&base).join("PKG-INFO"),
                pkg_info.as_bytes(),
            )
            .map_err(io_err)?;

        builder
            .into_inner()
            .and_then(|encoder| encoder.finish())
            .map_err(io_err)?;

        tracing::info!(
            "Created {} ({} files)",
            archive_path.display(),
            sources.len() + 1
        );
        Ok(archive_path)
    }
}

impl LifecycleCommand for Sdist {
    fn run(&self, pkg: &Package) -> Result<(), BuildError> {
        self.create(pkg).map(|_| ())
    }
}

/// Files to ship, relative to `root`, in a stable order.
fn collect_sources(root: &Path, dist_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e, dist_dir));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let context = format!("failed to walk {}", root.display());
            match e.into_io_error() {
                Some(io) => BuildError::io(context, io),
                None => BuildError::io(context, std::io::Error::other("filesystem loop")),
            }
        })?;

        if entry.file_type().is_file() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                files.push(rel.to_path_buf());
            }
        }
    }

    Ok(files)
}

fn is_excluded(entry: &DirEntry, dist_dir: &Path) -> bool {
    let name = entry.file_name().to_string_lossy();
    let top_level = entry.depth() == 1;

    name.starts_with('.')
        || name == "__pycache__"
        || name.ends_with(".pyc")
        || name.ends_with(".egg-info")
        || (top_level && (name == "build" || name == "dist"))
        || entry.path() == dist_dir
}

/// Core metadata (version 2.1) for the archive's `PKG-INFO`.
fn render_pkg_info(meta: &PackageMetadata) -> String {
    let mut out = String::new();
    out.push_str("Metadata-Version: 2.1\n");
    out.push_str(&format!("Name: {}\n", meta.name));
    out.push_str(&format!("Version: {}\n", meta.version));
    out.push_str(&format!("Summary: {}\n", meta.summary));
    if let Some(ref url) = meta.url {
        out.push_str(&format!("Home-page: {}\n", url));
    }
    if let Some(ref license) = meta.license {
        out.push_str(&format!("License: {}\n", license));
    }
    out.push_str("Description-Content-Type: text/x-rst\n");
    out.push('\n');
    out.push_str(&meta.long_description);
    out
}
