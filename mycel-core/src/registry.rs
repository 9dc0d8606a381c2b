//! The global cell type registry.
//!
//! Maps type tags ("std::generate") to factories producing fresh hosts.
//! Plasm loading resolves persisted type tags through here, so any cell type
//! that should round-trip must be registered first.

use crate::cell::{Cell, CellHost, CellPtr};
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::sync::OnceLock;

struct FactoryEntry {
    doc: String,
    ctor: fn() -> CellPtr,
}

/// A tag → factory table for cell types.
#[derive(Default)]
pub struct Registry {
    entries: DashMap<String, FactoryEntry>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by plasm load.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Register a cell type under a tag. Re-registration replaces the entry.
    ///
    /// The entry's description comes from the type's own
    /// [`Cell::short_doc`], so there is exactly one source for it.
    pub fn register<C: Cell + Default + 'static>(&self, tag: &str) {
        self.entries.insert(
            tag.to_string(),
            FactoryEntry {
                doc: C::default().short_doc().to_string(),
                ctor: CellHost::wrap::<C>,
            },
        );
    }

    /// Create a fresh cell with parameters declared, ready for parameter
    /// assignment and connection.
    pub fn create(&self, tag: &str) -> Result<CellPtr> {
        let entry = self.entries.get(tag).ok_or_else(|| Error::UnknownCellType {
            type_tag: tag.to_string(),
        })?;
        let host = (entry.ctor)();
        host.set_type_tag(tag);
        host.declare_params()?;
        Ok(host)
    }

    /// Create a fresh named cell.
    pub fn create_named(&self, tag: &str, name: &str) -> Result<CellPtr> {
        let host = self.create(tag)?;
        host.set_name(name);
        Ok(host)
    }

    /// Whether a tag is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// The registered description for a tag.
    #[must_use]
    pub fn doc(&self, tag: &str) -> Option<String> {
        self.entries.get(tag).map(|e| e.doc.clone())
    }

    /// All registered tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        tags.sort();
        tags
    }
}
