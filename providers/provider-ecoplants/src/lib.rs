//! # provider-ecoplants
//!
//! EcoPlants asset store provider backed by the PBRMAX asset list API.
//!
//! The provider translates the browser's [`SearchCriteria`] into one PBRMAX
//! query per vendor category and maps the returned items to [`AssetModel`]s.
//!
//! ## Features
//!
//! - Category paths mapped to vendor category IDs through a configurable [`CategoryTable`]
//! - Sequential per-category requests, aggregated in table order
//! - Deep links into the PBRMAX web store for every asset
//! - Enable flag read from the host's persisted settings
//!
//! Download URLs and prices are not exposed by the public endpoint, so assets
//! carry an empty download URL and a zero price.

use asset_store_core::prelude::*;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod category;
mod wire;

pub use category::{CategoryQuery, CategoryTable, NO_CATEGORY};
pub use wire::ASSET_TYPE;

use wire::{product_url, AssetListRequest, AssetListResponse};

/// Default provider identifier and vendor name.
pub const PROVIDER_ID: &str = "EcoPlants";

/// Default PBRMAX asset list endpoint.
pub const STORE_URL: &str = "https://api.prod.pbrmax.cn/en-US/asset/list";

/// Default setting key toggling this provider in the browser.
pub const SETTING_STORE_ENABLE: &str = "/exts/ecoplants.asset_provider/enable";

/// Logo file looked up inside the data directory.
pub const ICON_FILE: &str = "logo_placeholder.png";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum EcoPlantsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PBRMAX API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown category: {0:?}")]
    UnknownCategory(String),
}

impl From<EcoPlantsError> for AssetStoreError {
    fn from(err: EcoPlantsError) -> Self {
        match err {
            EcoPlantsError::Http(e) => AssetStoreError::Network(e.to_string()),
            EcoPlantsError::Api(e) => AssetStoreError::Provider(format!("PBRMAX API error: {e}")),
            EcoPlantsError::Parse(e) => AssetStoreError::Provider(format!("Parse error: {e}")),
            EcoPlantsError::UnknownCategory(key) => AssetStoreError::CategoryNotFound(key),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the EcoPlants provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcoPlantsConfig {
    /// Provider name shown in the browser and stamped as asset vendor
    pub provider_id: String,

    /// Asset list endpoint queried with POST
    pub store_url: String,

    /// Base of the web store deep links
    pub product_page_url: String,

    /// Value of the `app-version` request header
    pub app_version: String,

    /// Directory holding the provider logo
    pub data_dir: PathBuf,

    /// Setting key for the enable flag
    pub enable_setting: String,

    /// Category path to vendor category ID mapping
    pub categories: CategoryTable,
}

impl Default for EcoPlantsConfig {
    fn default() -> Self {
        Self {
            provider_id: PROVIDER_ID.to_string(),
            store_url: STORE_URL.to_string(),
            product_page_url: "https://pbrmax.cn/".to_string(),
            app_version: "2.0.0".to_string(),
            data_dir: PathBuf::from("data"),
            enable_setting: SETTING_STORE_ENABLE.to_string(),
            categories: CategoryTable::default(),
        }
    }
}

// ============================================================================
// EcoPlants Provider
// ============================================================================

/// Asset store provider for the EcoPlants catalogue.
pub struct EcoPlantsProvider {
    config: Arc<EcoPlantsConfig>,
    settings: Arc<dyn SettingStore>,
    client: Client,
}

impl EcoPlantsProvider {
    /// Create a provider. No request timeout is configured; the host owns it.
    pub fn new(
        config: EcoPlantsConfig,
        settings: Arc<dyn SettingStore>,
    ) -> std::result::Result<Self, EcoPlantsError> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(config, settings, client))
    }

    /// Create a provider around an existing HTTP client.
    pub fn with_client(
        config: EcoPlantsConfig,
        settings: Arc<dyn SettingStore>,
        client: Client,
    ) -> Self {
        Self {
            config: Arc::new(config),
            settings,
            client,
        }
    }

    pub fn config(&self) -> &EcoPlantsConfig {
        &self.config
    }

    /// Resolve the criteria's category filter to vendor IDs.
    fn resolve_categories(
        &self,
        criteria: &SearchCriteria,
    ) -> std::result::Result<&[i64], EcoPlantsError> {
        let key = CategoryTable::lookup_key(&criteria.filter.categories);
        self.config.categories.get(&key).ok_or_else(|| {
            warn!("No vendor categories configured for {:?}", key);
            EcoPlantsError::UnknownCategory(key)
        })
    }

    /// POST one asset list query.
    async fn fetch_assets(
        &self,
        request: &AssetListRequest<'_>,
    ) -> std::result::Result<AssetListResponse, EcoPlantsError> {
        debug!(
            "Querying {} (category {:?}, page {:?}, limit {:?})",
            self.config.store_url, request.filter.category_id, request.page, request.limit
        );

        let response = self
            .client
            .post(&self.config.store_url)
            .header("app-version", &self.config.app_version)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EcoPlantsError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<AssetListResponse>()
            .await
            .map_err(|e| EcoPlantsError::Parse(e.to_string()))
    }

    /// Convert one response page to asset records.
    fn to_assets(
        &self,
        response: AssetListResponse,
        category: CategoryQuery,
    ) -> std::result::Result<Vec<AssetModel>, EcoPlantsError> {
        let data = response.data;
        if data.items.is_empty() {
            return Ok(Vec::new());
        }

        let page = data
            .page
            .ok_or_else(|| EcoPlantsError::Parse("missing field `page` in response data".to_string()))?;

        Ok(data
            .items
            .into_iter()
            .map(|item| AssetModel {
                product_url: product_url(
                    &self.config.product_page_url,
                    &page,
                    &item.asset_uid,
                    category,
                ),
                identifier: item.asset_uid,
                name: item.name,
                published_at: String::new(),
                categories: Vec::new(),
                tags: Vec::new(),
                vendor: self.config.provider_id.clone(),
                download_url: String::new(),
                price: 0.0,
                thumbnail: item.preview,
            })
            .collect())
    }

    async fn run_search(
        &self,
        criteria: &SearchCriteria,
    ) -> std::result::Result<Option<SearchPage>, EcoPlantsError> {
        let ids = self.resolve_categories(criteria)?;
        if ids.is_empty() {
            debug!("Category filter maps to no vendor categories, skipping search");
            return Ok(None);
        }

        if !criteria.keywords.is_empty() {
            debug!("Ignoring keywords {:?}; PBRMAX has no keyword filter", criteria.keywords);
        }

        let page_number = criteria.page.number();
        let page_size = criteria.page.size();

        let mut assets = Vec::new();
        for &id in ids {
            let category = CategoryQuery::from(id);
            let request = AssetListRequest::new(category, page_number, page_size, ids.len());
            let response = self.fetch_assets(&request).await?;
            assets.extend(self.to_assets(response, category)?);
        }

        let more = !matches!(page_size, Some(size) if assets.len() < size as usize);

        info!(
            "EcoPlants search returned {} asset(s) from {} category request(s), more={}",
            assets.len(),
            ids.len(),
            more
        );

        Ok(Some(SearchPage { assets, more }))
    }
}

#[async_trait]
impl AssetStore for EcoPlantsProvider {
    fn id(&self) -> &str {
        &self.config.provider_id
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Option<SearchPage>> {
        Ok(self.run_search(criteria).await?)
    }

    fn provider(&self) -> ProviderModel {
        let enabled = match self.settings.get_bool(&self.config.enable_setting) {
            Ok(value) => value.unwrap_or(true),
            Err(e) => {
                warn!(
                    "Could not read setting {}: {}; assuming enabled",
                    self.config.enable_setting, e
                );
                true
            }
        };

        ProviderModel {
            name: self.config.provider_id.clone(),
            icon: self
                .config
                .data_dir
                .join(ICON_FILE)
                .to_string_lossy()
                .into_owned(),
            enable_setting: Some(self.config.enable_setting.clone()),
            enabled,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    struct BrokenSettings;

    impl SettingStore for BrokenSettings {
        fn get_bool(&self, _key: &str) -> Result<Option<bool>> {
            Err(AssetStoreError::Settings("settings file unreadable".to_string()))
        }
    }

    fn create_test_provider() -> EcoPlantsProvider {
        EcoPlantsProvider::new(EcoPlantsConfig::default(), Arc::new(MemorySettingStore::new()))
            .unwrap()
    }

    fn parse_response(value: serde_json::Value) -> AssetListResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = create_test_provider();
        assert_eq!(provider.id(), "EcoPlants");
        assert_eq!(provider.config().store_url, STORE_URL);
        assert_eq!(provider.config().app_version, "2.0.0");
    }

    #[test]
    fn test_provider_model_defaults() {
        let provider = create_test_provider();
        let model = provider.provider();

        assert_eq!(model.name, "EcoPlants");
        assert!(Path::new(&model.icon).starts_with("data"));
        assert!(model.icon.ends_with(ICON_FILE));
        assert_eq!(model.enable_setting.as_deref(), Some(SETTING_STORE_ENABLE));
        assert!(model.enabled);
    }

    #[test]
    fn test_provider_model_reads_setting() {
        let settings = Arc::new(MemorySettingStore::new());
        let config = EcoPlantsConfig {
            data_dir: PathBuf::from("/opt/ecoplants/data"),
            ..Default::default()
        };
        let provider = EcoPlantsProvider::new(config, settings.clone()).unwrap();

        settings.set(SETTING_STORE_ENABLE, false);
        let model = provider.provider();
        assert!(!model.enabled);
        assert!(Path::new(&model.icon).starts_with("/opt/ecoplants/data"));

        settings.set(SETTING_STORE_ENABLE, true);
        assert!(provider.provider().enabled);
    }

    #[test]
    fn test_provider_model_falls_back_when_settings_fail() {
        let provider =
            EcoPlantsProvider::new(EcoPlantsConfig::default(), Arc::new(BrokenSettings)).unwrap();
        let model = provider.provider();
        assert_eq!(model.name, "EcoPlants");
        assert!(model.enabled);
    }

    #[test]
    fn test_resolve_categories() {
        let provider = create_test_provider();

        let ids = provider.resolve_categories(&SearchCriteria::new()).unwrap();
        assert_eq!(ids, &[NO_CATEGORY]);

        let criteria = SearchCriteria::new().with_categories(["/Architecture/Road"]);
        assert_eq!(provider.resolve_categories(&criteria).unwrap(), &[308, 310, 249]);

        let criteria = SearchCriteria::new().with_categories(["/Rocks"]);
        assert!(matches!(
            provider.resolve_categories(&criteria),
            Err(EcoPlantsError::UnknownCategory(key)) if key == "ROCKS"
        ));
    }

    #[test]
    fn test_to_assets_with_category() {
        let provider = create_test_provider();
        let response = parse_response(json!({
            "data": {
                "items": [
                    {"asset_uid": "u-1", "name": "Birch", "preview": "https://cdn/u-1.jpg"},
                    {"asset_uid": "u-2", "name": "Pine", "preview": "https://cdn/u-2.jpg"}
                ],
                "page": 3
            }
        }));

        let assets = provider.to_assets(response, CategoryQuery::Id(156)).unwrap();

        assert_eq!(assets.len(), 2);
        let first = &assets[0];
        assert_eq!(first.identifier, "u-1");
        assert_eq!(first.name, "Birch");
        assert_eq!(first.thumbnail, "https://cdn/u-1.jpg");
        assert_eq!(first.vendor, "EcoPlants");
        assert_eq!(first.published_at, "");
        assert!(first.categories.is_empty());
        assert!(first.tags.is_empty());
        assert_eq!(first.download_url, "");
        assert_eq!(first.price, 0.0);
        assert_eq!(
            first.product_url,
            r#"https://pbrmax.cn/?activeIndex=0&query={"pageNum":3,"assetId":"u-1","filter":{"category":156,"type":"3d assets"}}"#
        );
        assert_eq!(assets[1].identifier, "u-2");
    }

    #[test]
    fn test_to_assets_requires_page_when_items_present() {
        let provider = create_test_provider();

        let response = parse_response(json!({
            "data": {"items": [{"asset_uid": "u-1", "name": "Birch", "preview": ""}]}
        }));
        assert!(matches!(
            provider.to_assets(response, CategoryQuery::Any),
            Err(EcoPlantsError::Parse(_))
        ));

        let response = parse_response(json!({"data": {"items": []}}));
        assert!(provider.to_assets(response, CategoryQuery::Any).unwrap().is_empty());
    }

    #[test]
    fn test_error_conversion() {
        let err: AssetStoreError = EcoPlantsError::UnknownCategory("ROCKS".to_string()).into();
        assert!(matches!(err, AssetStoreError::CategoryNotFound(key) if key == "ROCKS"));

        let err: AssetStoreError = EcoPlantsError::Api("HTTP 500: boom".to_string()).into();
        assert!(matches!(err, AssetStoreError::Provider(_)));

        let err: AssetStoreError = EcoPlantsError::Parse("bad json".to_string()).into();
        assert!(matches!(err, AssetStoreError::Provider(msg) if msg.contains("bad json")));
    }

    #[test]
    fn test_config_serialization() {
        let config = EcoPlantsConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EcoPlantsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_partial_uses_defaults() {
        let config: EcoPlantsConfig =
            serde_json::from_str(r#"{"store_url": "http://localhost:9000/list"}"#).unwrap();
        assert_eq!(config.store_url, "http://localhost:9000/list");
        assert_eq!(config.provider_id, PROVIDER_ID);
        assert_eq!(config.categories, CategoryTable::default());
    }
}
