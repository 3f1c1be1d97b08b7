//! Locating input files by name pattern.
//!
//! The merge stage finds its P&L export by regex rather than fixed name, since
//! exports may carry a date or run suffix. [`FileLocator`] makes the lookup
//! swappable so tests can supply a fixed listing.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;

pub trait FileLocator {
    fn find(&self, pattern: &Regex) -> Result<Option<PathBuf>>;
}

#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    dir: PathBuf,
}

impl DirectoryLocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileLocator for DirectoryLocator {
    fn find(&self, pattern: &Regex) -> Result<Option<PathBuf>> {
        let entries =
            fs::read_dir(&self.dir).with_context(|| format!("Listing directory {:?}", self.dir))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("Reading entry in {:?}", self.dir))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if pattern.is_match(name) {
                debug!("Pattern '{}' matched {:?}", pattern.as_str(), name);
                return Ok(Some(entry.path()));
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListingLocator {
    root: PathBuf,
    names: Vec<String>,
}

impl ListingLocator {
    pub fn new(root: impl Into<PathBuf>, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            root: root.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileLocator for ListingLocator {
    fn find(&self, pattern: &Regex) -> Result<Option<PathBuf>> {
        Ok(self
            .names
            .iter()
            .find(|name| pattern.is_match(name))
            .map(|name| self.root.join(name)))
    }
}
