use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use custom_error::custom_error;
use lazy_static::lazy_static;
use regex::Regex;

custom_error! {pub CacheError
    Read{path: String, desc: String} = "could not read cache directory {path}: {desc}",
    NoChild{path: String} = "invalid cache layout: {path} has no subdirectory",
    ManyChildren{path: String, n: usize} = "invalid cache layout: {path} has {n} subdirectories where exactly one was expected",
    BadLeaf{name: String} = "invalid cache layout: could not derive release and build from directory name '{name}'",
}

/// Offline annotation cache resolved from the conventional layout
/// root/<species>[_refseq]/<release>_<build>. Each of the two levels
/// below the root must hold exactly one subdirectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VepCache {
    root: PathBuf,
    species: String,
    release: String,
    build: String,
}

impl VepCache {
    pub fn from_root<P: AsRef<Path>>(root: P) -> Result<Self, CacheError> {
        lazy_static! {
            static ref LEAF: Regex = Regex::new(r"^([^_]+)_([^_]+)$").unwrap();
        }
        let root = root.as_ref();
        let species_dir = only_subdir(root)?;
        let leaf = only_subdir(&species_dir)?;
        let species_name = dir_name(&species_dir);
        let species = match species_name.strip_suffix("_refseq") {
            Some(s) => s.to_owned(),
            None => species_name,
        };
        let leaf_name = dir_name(&leaf);
        let caps = LEAF
            .captures(&leaf_name)
            .ok_or(CacheError::BadLeaf { name: leaf_name.clone() })?;
        debug!(
            "Resolved annotation cache under {}: species {}, release {}, build {}",
            root.display(),
            species,
            &caps[1],
            &caps[2]
        );
        Ok(VepCache {
            root: root.to_owned(),
            species,
            release: caps[1].to_owned(),
            build: caps[2].to_owned(),
        })
    }

    pub fn species(&self) -> &str {
        &self.species
    }
    pub fn release(&self) -> &str {
        &self.release
    }
    pub fn build(&self) -> &str {
        &self.build
    }
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Append the offline-mode arguments derived from this cache.
    pub fn add_args(&self, args: &mut Vec<OsString>) {
        args.push("--offline".into());
        args.push("--cache".into());
        args.push("--dir_cache".into());
        args.push(self.root.clone().into_os_string());
        args.push("--cache_version".into());
        args.push(self.release.clone().into());
        args.push("--species".into());
        args.push(self.species.clone().into());
        args.push("--assembly".into());
        args.push(self.build.clone().into());
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// Non-directory entries are ignored, as only the directory levels of
// the cache layout carry meaning
fn only_subdir(path: &Path) -> Result<PathBuf, CacheError> {
    let err_path = || path.display().to_string();
    let entries = fs::read_dir(path).map_err(|e| CacheError::Read {
        path: err_path(),
        desc: e.to_string(),
    })?;
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CacheError::Read {
            path: err_path(),
            desc: e.to_string(),
        })?;
        let p = entry.path();
        if p.is_dir() {
            dirs.push(p);
        }
    }
    if dirs.len() > 1 {
        return Err(CacheError::ManyChildren {
            path: err_path(),
            n: dirs.len(),
        });
    }
    dirs.pop().ok_or_else(|| CacheError::NoChild { path: err_path() })
}
