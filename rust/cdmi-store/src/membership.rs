use std::{collections::HashMap, path::PathBuf, sync::Arc};

use tokio::sync::RwLock;

use crate::StoreError;

/// The shared parent/child index of a store bundle.
///
/// Child listings cross resource kinds (a container's children may be
/// containers, data objects or domains), so the index is owned by the
/// bundle and shared by its per-kind stores rather than kept inside any
/// one of them. Listings preserve insertion order; ordinal range queries
/// observe that order.
///
/// An in-memory index lives and dies with the process; a persistent one
/// journals every mutation to a JSON document so listings survive
/// restarts.
#[derive(Clone)]
pub struct Membership {
    listings: Arc<RwLock<HashMap<String, Vec<String>>>>,
    journal: Option<PathBuf>,
}

impl Membership {
    /// Create an index with no persistence
    pub fn in_memory() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
            journal: None,
        }
    }

    /// Open an index journaled to the given file, loading any listings a
    /// previous process left behind
    pub async fn persistent(journal: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let journal = journal.into();

        let listings = if journal.exists() {
            let bytes = tokio::fs::read(&journal)
                .await
                .map_err(|error| StoreError::Backend(format!("{error}")))?;
            serde_json::from_slice(&bytes)
                .map_err(|error| StoreError::DecodeFailed(format!("{error}")))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            listings: Arc::new(RwLock::new(listings)),
            journal: Some(journal),
        })
    }

    /// Record `name` as a child of `parent`, preserving listing order and
    /// ignoring duplicates
    pub async fn note(&self, parent: &str, name: &str) -> Result<(), StoreError> {
        let mut listings = self.listings.write().await;
        let children = listings.entry(parent.to_string()).or_default();

        if !children.iter().any(|child| child == name) {
            children.push(name.to_string());
        }

        self.flush(&listings).await
    }

    /// Remove `name` from the children of `parent` and drop any listing
    /// rooted at the removed path itself
    pub async fn forget(&self, parent: &str, name: &str, path: &str) -> Result<(), StoreError> {
        let mut listings = self.listings.write().await;

        if let Some(children) = listings.get_mut(parent) {
            children.retain(|child| child != name);
        }
        listings.remove(path);

        self.flush(&listings).await
    }

    /// The ordered child names recorded under `parent`
    pub async fn children_of(&self, parent: &str) -> Vec<String> {
        self.listings
            .read()
            .await
            .get(parent)
            .cloned()
            .unwrap_or_default()
    }

    async fn flush(&self, listings: &HashMap<String, Vec<String>>) -> Result<(), StoreError> {
        let Some(journal) = &self.journal else {
            return Ok(());
        };

        let bytes = serde_json::to_vec(listings)
            .map_err(|error| StoreError::EncodeFailed(format!("{error}")))?;
        tokio::fs::write(journal, bytes)
            .await
            .map_err(|error| StoreError::Backend(format!("{error}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn it_preserves_listing_order() -> Result<()> {
        let membership = Membership::in_memory();

        membership.note("/", "beta").await?;
        membership.note("/", "alpha").await?;
        membership.note("/", "beta").await?;

        assert_eq!(membership.children_of("/").await, vec!["beta", "alpha"]);

        Ok(())
    }

    #[tokio::test]
    async fn it_reloads_a_journaled_index() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let journal = dir.path().join("children.json");

        {
            let membership = Membership::persistent(&journal).await?;
            membership.note("/", "reports").await?;
            membership.note("/reports", "2025").await?;
        }

        let membership = Membership::persistent(&journal).await?;
        assert_eq!(membership.children_of("/").await, vec!["reports"]);
        assert_eq!(membership.children_of("/reports").await, vec!["2025"]);

        membership.forget("/", "reports", "/reports").await?;
        assert!(membership.children_of("/").await.is_empty());
        assert!(membership.children_of("/reports").await.is_empty());

        Ok(())
    }
}
