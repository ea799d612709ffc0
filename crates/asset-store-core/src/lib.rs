//! # asset-store-core
//!
//! Core traits and types shared between the asset browser host and the store
//! providers that feed it.
//!
//! The host owns these shapes; providers only read [`SearchCriteria`] and
//! produce [`AssetModel`] records:
//!
//! - [`SearchCriteria`] - Keywords, category filters and paging sent by the host
//! - [`AssetModel`] - One asset as displayed in the browser
//! - [`ProviderModel`] - Static description shown in the provider settings list
//! - [`AssetStore`] - The trait every provider implements
//! - [`SettingStore`] - Persisted host settings consulted by providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod settings;

pub use settings::{MemorySettingStore, SettingStore};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum AssetStoreError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Category not found: {0:?}")]
    CategoryNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Search timed out after {0:?}")]
    Timeout(Duration),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AssetStoreError>;

// ============================================================================
// Search Criteria
// ============================================================================

/// Category filters selected in the browser.
///
/// Each entry is a slash-delimited path such as `/Architecture/House`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Paging requested by the browser.
///
/// The host sends `0` for "unset" as often as it omits the field, so both
/// are treated the same by the accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub number: Option<u32>,
    pub size: Option<u32>,
}

impl PageRequest {
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: Some(number),
            size: Some(size),
        }
    }

    /// Requested page number, if one was set and non-zero.
    pub fn number(&self) -> Option<u32> {
        self.number.filter(|n| *n != 0)
    }

    /// Requested page size, if one was set and non-zero.
    pub fn size(&self) -> Option<u32> {
        self.size.filter(|n| *n != 0)
    }
}

/// A search request issued by the asset browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub filter: SearchFilter,
    #[serde(default)]
    pub page: PageRequest,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_page(mut self, number: u32, size: u32) -> Self {
        self.page = PageRequest::new(number, size);
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// A single asset as listed in the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetModel {
    pub identifier: String,
    pub name: String,
    pub published_at: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub vendor: String,
    pub product_url: String,
    pub download_url: String,
    pub price: f64,
    pub thumbnail: String,
}

/// One page of results returned by a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub assets: Vec<AssetModel>,
    /// Whether the browser should offer to load another page.
    pub more: bool,
}

impl SearchPage {
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Provider description used by the browser's settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderModel {
    pub name: String,
    /// Path to the provider logo.
    pub icon: String,
    /// Name of the persisted boolean setting that toggles this provider.
    pub enable_setting: Option<String>,
    /// Current value of `enable_setting`.
    pub enabled: bool,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Contract every asset store provider implements.
///
/// The host calls [`AssetStore::search`] through [`search_with_timeout`];
/// implementations make a single best-effort attempt and leave timeouts and
/// cancellation to the host.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stable identifier used by the registry.
    fn id(&self) -> &str;

    /// Run a search.
    ///
    /// `Ok(None)` means the provider had nothing to query for these criteria,
    /// which is not the same as a query that matched zero assets.
    async fn search(&self, criteria: &SearchCriteria) -> Result<Option<SearchPage>>;

    /// Describe this provider for the settings UI.
    fn provider(&self) -> ProviderModel;
}

/// Run `store.search` under the host's timeout.
///
/// Dropping the inner future on expiry is the only cancellation a provider
/// ever sees.
pub async fn search_with_timeout(
    store: &dyn AssetStore,
    criteria: &SearchCriteria,
    limit: Duration,
) -> Result<Option<SearchPage>> {
    match tokio::time::timeout(limit, store.search(criteria)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Search on provider '{}' timed out after {:?}", store.id(), limit);
            Err(AssetStoreError::Timeout(limit))
        }
    }
}

// ============================================================================
// Re-exports
// ============================================================================

pub mod prelude {
    pub use crate::{
        search_with_timeout, AssetModel, AssetStore, AssetStoreError, MemorySettingStore,
        PageRequest, ProviderModel, Result, SearchCriteria, SearchFilter, SearchPage,
        SettingStore,
    };
}
