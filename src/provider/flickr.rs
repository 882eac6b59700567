use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use crate::models::photo::{lenient_u64, PageInfo, PageResponse, PhotoRecord};
use crate::provider::{FetchError, PhotoProvider};
use crate::utils::config::Config;

const SEARCH_METHOD: &str = "flickr.photos.search";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    stat: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    photos: Option<PhotoPage>,
}

#[derive(Debug, Deserialize)]
struct PhotoPage {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    pages: u32,
    #[serde(default)]
    perpage: u32,
    #[serde(default, deserialize_with = "lenient_u64")]
    total: u64,
    #[serde(default)]
    photo: Vec<PhotoRecord>,
}

impl Envelope {
    fn into_page(self) -> PageResponse {
        match self.photos {
            Some(p) => PageResponse {
                status: self.stat,
                message: self.message,
                photos: p.photo,
                info: PageInfo { page: p.page, total_pages: p.pages, per_page: p.perpage, total: p.total },
            },
            None => PageResponse::failed(self.stat, self.message),
        }
    }
}

/// `flickr.photos.search` over the public REST endpoint.
pub struct FlickrProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    safe_search: u8,
    per_page: Option<u32>,
}

impl FlickrProvider {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self {
            client,
            api_base: cfg.api_base.clone(),
            api_key: cfg.api_key.clone(),
            safe_search: cfg.safe_search,
            per_page: cfg.per_page,
        })
    }

    fn params(&self, query: &str, page: Option<u32>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("method", SEARCH_METHOD.to_string()),
            ("api_key", self.api_key.clone()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
            ("safe_search", self.safe_search.to_string()),
            ("text", query.to_string()),
        ];
        if let Some(p) = page {
            params.push(("page", p.to_string()));
        }
        if let Some(n) = self.per_page {
            params.push(("per_page", n.to_string()));
        }
        params
    }

    async fn fetch(&self, query: &str, page: Option<u32>) -> Result<PageResponse, FetchError> {
        debug!(query, ?page, "flickr search request");
        let resp = self
            .client
            .get(&self.api_base)
            .query(&self.params(query, page))
            .send()
            .await?
            .error_for_status()?;
        let envelope: Envelope = resp.json().await?;
        Ok(envelope.into_page())
    }
}

#[async_trait]
impl PhotoProvider for FlickrProvider {
    async fn search(&self, query: &str) -> Result<PageResponse, FetchError> {
        self.fetch(query, None).await
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<PageResponse, FetchError> {
        self.fetch(query, Some(page)).await
    }
}
