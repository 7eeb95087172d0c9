use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::component::ComponentResource;

/// Resource whose entries are listed up front. Useful for embedded and test artifacts.
#[derive(Debug, Clone, Default)]
pub struct MemoryResource {
    location: String,
    entries: HashSet<String>,
}

impl MemoryResource {
    /// Create an empty resource at the given location
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            entries: HashSet::new(),
        }
    }

    /// Add an entry
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entries.insert(entry.into());
        self
    }
}

impl ComponentResource for MemoryResource {
    fn location(&self) -> &str {
        &self.location
    }

    fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry)
    }
}

/// Resource backed by an unpacked artifact directory
#[derive(Debug, Clone)]
pub struct DirectoryResource {
    root: PathBuf,
    location: String,
}

impl DirectoryResource {
    /// Create a resource rooted at `root`. The directory is not touched until queried.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let location = root.display().to_string();
        Self { root, location }
    }

    /// Root directory of the artifact
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ComponentResource for DirectoryResource {
    fn location(&self) -> &str {
        &self.location
    }

    fn contains(&self, entry: &str) -> bool {
        self.root.join(entry).is_file()
    }
}
