use serde::{Deserialize, Deserializer, Serialize};

/// One search hit as the provider returns it. The controller only looks at `id`;
/// the remaining fields are carried through for rendering.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PhotoRecord {
    pub id: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub farm: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ispublic: i64,
    #[serde(default)]
    pub isfriend: i64,
    #[serde(default)]
    pub isfamily: i64,
}

impl PhotoRecord {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    /// Static image location on the farm servers.
    pub fn source_url(&self) -> String {
        format!("http://farm{}.static.flickr.com/{}/{}_{}.jpg", self.farm, self.server, self.id, self.secret)
    }
}

/// Paging metadata reported alongside a result page.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub total_pages: u32,
    pub per_page: u32,
    pub total: u64,
}

/// A provider answer for one page. Only `status` and `photos` drive the controller.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PageResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub photos: Vec<PhotoRecord>,
    pub info: PageInfo,
}

pub const STATUS_OK: &str = "ok";

impl PageResponse {
    pub fn ok(photos: Vec<PhotoRecord>) -> Self {
        Self { status: STATUS_OK.to_string(), message: None, photos, info: PageInfo::default() }
    }

    pub fn failed(status: impl Into<String>, message: Option<String>) -> Self {
        Self { status: status.into(), message, photos: Vec::new(), info: PageInfo::default() }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct PhotoView {
    #[serde(flatten)]
    pub photo: PhotoRecord,
    pub url: String,
}

impl From<PhotoRecord> for PhotoView {
    fn from(photo: PhotoRecord) -> Self {
        let url = photo.source_url();
        Self { photo, url }
    }
}

/// Read-only copy of the session handed to the rendering side.
#[derive(Debug, Serialize, Clone)]
pub struct SessionSnapshot {
    pub query: String,
    pub current_page: u32,
    pub generation: u64,
    pub busy: bool,
    pub results: Vec<PhotoRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<PageInfo>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SessionView {
    pub query: String,
    pub current_page: u32,
    pub generation: u64,
    pub busy: bool,
    pub count: usize,
    pub photos: Vec<PhotoView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<PageInfo>,
}

impl From<SessionSnapshot> for SessionView {
    fn from(s: SessionSnapshot) -> Self {
        Self {
            query: s.query,
            current_page: s.current_page,
            generation: s.generation,
            busy: s.busy,
            count: s.results.len(),
            photos: s.results.into_iter().map(PhotoView::from).collect(),
            last_page: s.last_page,
        }
    }
}

/// Accepts `123` as well as `"123"`; the search endpoint has returned both.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u64),
        Str(String),
    }
    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
