//! The bundle handed to the pipeline by the external bundler.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Entry,
    Chunk,
    Asset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Output path relative to the output directory.
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub kind: ChunkKind,
}

/// Chunk name to output file, in emission order.
///
/// Serializes as `{ "<chunk>": { "fileName": "...", "kind": "entry" } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleManifest {
    chunks: IndexMap<String, ManifestEntry>,
}

impl BundleManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: ManifestEntry) {
        self.chunks.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.chunks.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.chunks.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Every output file name, in manifest order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.chunks.values().map(|entry| entry.file_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("invalid bundle manifest: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("could not serialize manifest: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// A finished bundle: its manifest and the bytes of every file in it.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub manifest: BundleManifest,
    pub files: Vec<OutputFile>,
}

impl Bundle {
    pub fn push(
        &mut self,
        name: impl Into<String>,
        kind: ChunkKind,
        file_name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) {
        let file_name = file_name.into();
        self.manifest.insert(
            name,
            ManifestEntry {
                file_name: file_name.clone(),
                kind,
            },
        );
        self.files.push(OutputFile {
            file_name,
            contents: contents.into(),
        });
    }

    pub fn push_entry(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) {
        self.push(name, ChunkKind::Entry, file_name, contents);
    }

    pub fn push_asset(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) {
        self.push(name, ChunkKind::Asset, file_name, contents);
    }
}
