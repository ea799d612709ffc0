//! PBRMAX asset list request and response bodies.

use crate::category::CategoryQuery;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Asset type sent with every query.
pub const ASSET_TYPE: &str = "3d assets";

#[derive(Debug, Serialize)]
pub(crate) struct AssetListRequest<'a> {
    pub filter: AssetFilter<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssetFilter<'a> {
    #[serde(rename = "type")]
    pub asset_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

impl<'a> AssetListRequest<'a> {
    /// Build the body for one category of a fanned-out search.
    ///
    /// `limit` is the page size split evenly across `category_count` requests
    /// and is sent as a float, as the vendor API accepts.
    pub fn new(
        category: CategoryQuery,
        page: Option<u32>,
        page_size: Option<u32>,
        category_count: usize,
    ) -> Self {
        Self {
            filter: AssetFilter {
                asset_type: ASSET_TYPE,
                category_id: category.id(),
            },
            page,
            limit: page_size.map(|size| f64::from(size) / category_count.max(1) as f64),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssetListResponse {
    pub data: AssetListData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssetListData {
    pub items: Vec<VendorAsset>,
    #[serde(default)]
    pub page: Option<Number>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VendorAsset {
    pub asset_uid: String,
    pub name: String,
    pub preview: String,
}

/// Deep link into the PBRMAX web store for one asset.
///
/// The `query` parameter carries literal, unencoded JSON because that is what
/// the storefront router parses.
pub(crate) fn product_url(
    base: &str,
    page: &Number,
    asset_uid: &str,
    category: CategoryQuery,
) -> String {
    match category {
        CategoryQuery::Any => format!(
            r#"{base}?activeIndex=0&query={{"pageNum":{page},"assetId":"{asset_uid}"}}"#
        ),
        CategoryQuery::Id(id) => format!(
            r#"{base}?activeIndex=0&query={{"pageNum":{page},"assetId":"{asset_uid}","filter":{{"category":{id},"type":"{ASSET_TYPE}"}}}}"#
        ),
    }
}
