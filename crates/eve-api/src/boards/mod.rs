//! # Board Catalog
//!
//! Development-board metadata scraped from espboards.dev: the list of
//! boards for a target family and, per board, its photo, pinout diagram,
//! and GPIO mapping table. The editor uses it to drive board and pin
//! pickers.
//!
//! Fetches are time-boxed and results are cached in-process per target and
//! per board for [`CACHE_TTL`]. A failed fetch is never cached.

pub mod parse;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Site the catalog is scraped from.
pub const DEFAULT_BASE_URL: &str = "https://www.espboards.dev";

/// How long catalog and board results stay fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Per-request fetch timeout.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Error loading board metadata.
#[derive(Error, Debug)]
pub enum BoardsError {
    /// Target is not a supported chip family.
    #[error("target must be esp32 or esp8266, got '{0}'")]
    InvalidTarget(String),

    /// Board slug was blank.
    #[error("slug is required")]
    MissingSlug,

    /// The request failed (connect, timeout, body).
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The site answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Supported chip family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BoardTarget {
    Esp32,
    Esp8266,
}

impl BoardTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Esp32 => "esp32",
            Self::Esp8266 => "esp8266",
        }
    }
}

impl fmt::Display for BoardTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, surrounding whitespace ignored.
impl FromStr for BoardTarget {
    type Err = BoardsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "esp32" => Ok(Self::Esp32),
            "esp8266" => Ok(Self::Esp8266),
            _ => Err(BoardsError::InvalidTarget(s.to_string())),
        }
    }
}

/// One board in a target's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub target: BoardTarget,
    pub slug: String,
    pub name: String,
    pub url: String,
    pub image_url: String,
    /// Microcontroller page the board was listed on (esp32 only).
    pub microcontroller: Option<String>,
}

/// One row of a board's pin mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BoardPin {
    /// `GPIO<n>` for numbered pins, else the raw pin name.
    pub value: String,
    pub label: String,
    pub description: Option<String>,
    pub meta: Option<BTreeMap<String, String>>,
}

/// Details scraped from a board's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetails {
    pub target: BoardTarget,
    pub slug: String,
    pub name: String,
    pub url: String,
    pub pinout_image_url: Option<String>,
    pub board_image_url: Option<String>,
    pub pins: Vec<BoardPin>,
}

struct Cached<T> {
    at: Instant,
    value: Arc<T>,
}

/// A time-to-live cache keyed by `K`.
struct TtlCache<K, T> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Cached<T>>>,
}

impl<K: std::hash::Hash + Eq, T> TtlCache<K, T> {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K) -> Option<Arc<T>> {
        self.entries
            .read()
            .get(key)
            .filter(|c| c.at.elapsed() < self.ttl)
            .map(|c| Arc::clone(&c.value))
    }

    fn put(&self, key: K, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.entries.write().insert(
            key,
            Cached {
                at: Instant::now(),
                value: Arc::clone(&value),
            },
        );
        value
    }
}

/// Fetches, parses, and caches board metadata.
pub struct BoardCatalog {
    client: reqwest::Client,
    base_url: String,
    catalogs: TtlCache<BoardTarget, Vec<Board>>,
    details: TtlCache<(BoardTarget, String), BoardDetails>,
}

impl fmt::Debug for BoardCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardCatalog")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BoardCatalog {
    /// A catalog scraping [`DEFAULT_BASE_URL`].
    pub fn new() -> Result<Self, BoardsError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// A catalog scraping another host with the same page layout.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, BoardsError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("eve/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BoardsError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            catalogs: TtlCache::new(CACHE_TTL),
            details: TtlCache::new(CACHE_TTL),
        })
    }

    async fn fetch(&self, url: &str) -> Result<String, BoardsError> {
        let fetch_err = |source: reqwest::Error| BoardsError::Fetch {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(BoardsError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(fetch_err)
    }

    /// Boards for a target, sorted by case-insensitive name.
    pub async fn boards(&self, target: BoardTarget) -> Result<Arc<Vec<Board>>, BoardsError> {
        if let Some(boards) = self.catalogs.get(&target) {
            return Ok(boards);
        }

        let mut boards = match target {
            BoardTarget::Esp8266 => {
                let html = self.fetch(&format!("{}/esp8266/", self.base_url)).await?;
                parse::board_cards(&self.base_url, &html, target, None)
            }
            BoardTarget::Esp32 => self.esp32_boards().await?,
        };
        boards.sort_by_cached_key(|b| b.name.to_lowercase());
        tracing::info!(%target, count = boards.len(), "board catalog loaded");

        Ok(self.catalogs.put(target, boards))
    }

    /// esp32 boards are listed per microcontroller. Pages that fail to load
    /// are skipped; a board listed under several keeps its first listing.
    async fn esp32_boards(&self) -> Result<Vec<Board>, BoardsError> {
        let index = self.fetch(&format!("{}/esp32/", self.base_url)).await?;
        let mut seen = HashSet::new();
        let mut boards = Vec::new();
        for micro in parse::microcontrollers(&index) {
            let url = format!("{}/esp32/microcontroller/{micro}/", self.base_url);
            let html = match self.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(microcontroller = %micro, error = %e, "skipping microcontroller page");
                    continue;
                }
            };
            for board in parse::board_cards(&self.base_url, &html, BoardTarget::Esp32, Some(&micro)) {
                if seen.insert(board.slug.clone()) {
                    boards.push(board);
                }
            }
        }
        Ok(boards)
    }

    /// Name, images, and pin table of one board.
    pub async fn details(
        &self,
        target: BoardTarget,
        slug: &str,
    ) -> Result<Arc<BoardDetails>, BoardsError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(BoardsError::MissingSlug);
        }
        let key = (target, slug.to_string());
        if let Some(details) = self.details.get(&key) {
            return Ok(details);
        }

        let url = format!("{}/{target}/{slug}/", self.base_url);
        let html = self.fetch(&url).await?;
        let details = BoardDetails {
            target,
            slug: slug.to_string(),
            name: parse::board_name(&html, slug),
            url,
            pinout_image_url: parse::pinout_image(&self.base_url, &html),
            board_image_url: parse::board_image(&self.base_url, &html),
            pins: parse::pin_mappings(&html),
        };
        tracing::debug!(%target, slug, pins = details.pins.len(), "board details loaded");

        Ok(self.details.put(key, details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_parsing() {
        assert_eq!(" ESP32 ".parse::<BoardTarget>().unwrap(), BoardTarget::Esp32);
        assert_eq!("esp8266".parse::<BoardTarget>().unwrap(), BoardTarget::Esp8266);
        let err = "rp2040".parse::<BoardTarget>().unwrap_err();
        assert!(matches!(err, BoardsError::InvalidTarget(ref t) if t == "rp2040"));
    }

    #[test]
    fn target_serializes_lowercase() {
        assert_eq!(serde_json::to_value(BoardTarget::Esp8266).unwrap(), "esp8266");
        assert_eq!(BoardTarget::Esp32.to_string(), "esp32");
    }

    #[test]
    fn ttl_cache_expires() {
        let cache: TtlCache<u8, &str> = TtlCache::new(Duration::ZERO);
        cache.put(1, "x");
        assert!(cache.get(&1).is_none());

        let cache: TtlCache<u8, &str> = TtlCache::new(Duration::from_secs(60));
        cache.put(1, "x");
        assert_eq!(cache.get(&1).as_deref(), Some(&"x"));
    }

    #[tokio::test]
    async fn blank_slug_rejected_before_fetch() {
        let catalog = BoardCatalog::with_base_url("http://127.0.0.1:9").unwrap();
        let err = catalog.details(BoardTarget::Esp32, "  ").await.unwrap_err();
        assert!(matches!(err, BoardsError::MissingSlug));
    }

    #[test]
    fn details_serialize_camel_case() {
        let details = BoardDetails {
            target: BoardTarget::Esp32,
            slug: "devkitc".into(),
            name: "DevKitC".into(),
            url: "https://www.espboards.dev/esp32/devkitc/".into(),
            pinout_image_url: None,
            board_image_url: Some("https://www.espboards.dev/i.png".into()),
            pins: vec![],
        };
        let v = serde_json::to_value(&details).unwrap();
        assert_eq!(v["pinoutImageUrl"], serde_json::Value::Null);
        assert_eq!(v["boardImageUrl"], "https://www.espboards.dev/i.png");
        assert_eq!(v["target"], "esp32");
    }
}
