//! Sprite acquisition with explicit fallback chains
//!
//! Every sprite has an ordered list of URLs. Each attempt's failure is
//! recorded and logged, so a missing asset is visible in the load report
//! instead of silently swallowed. The session never depends on a sprite
//! being present; the renderer has a flat-colour path for all of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::ObstacleKind;

/// Why a single fetch attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to decode {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("{url} decoded to an empty image")]
    Empty { url: String },

    #[error("{url}: expected {expected} RGBA bytes, got {actual}")]
    SizeMismatch {
        url: String,
        expected: usize,
        actual: usize,
    },
}

/// Identifies a sprite slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Player,
    Tree(u8),
    Snowman(u8),
    Heart,
    Background,
}

impl SpriteId {
    pub fn obstacle(kind: ObstacleKind, variant: u8) -> Self {
        match kind {
            ObstacleKind::Tree => SpriteId::Tree(variant),
            ObstacleKind::Snowman => SpriteId::Snowman(variant),
        }
    }
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Check dimensions against the pixel buffer
    pub fn new(url: &str, width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::Empty {
                url: url.to_string(),
            });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(AssetError::SizeMismatch {
                url: url.to_string(),
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

/// One manifest line: a sprite and the URLs to try, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSource {
    pub id: SpriteId,
    pub urls: Vec<String>,
}

/// Everything the game would like to load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteManifest {
    pub sources: Vec<SpriteSource>,
}

impl SpriteManifest {
    /// Shipped manifest: remote CDN first, bundled copy second
    pub fn standard(remote_base: &str, local_base: &str, trees: u8, snowmen: u8) -> Self {
        let chain = |file: &str| {
            vec![
                format!("{}/{}", remote_base.trim_end_matches('/'), file),
                format!("{}/{}", local_base.trim_end_matches('/'), file),
            ]
        };
        let mut sources = vec![
            SpriteSource {
                id: SpriteId::Player,
                urls: chain("skier.png"),
            },
            SpriteSource {
                id: SpriteId::Heart,
                urls: chain("heart.png"),
            },
            SpriteSource {
                id: SpriteId::Background,
                urls: chain("slope.png"),
            },
        ];
        sources.extend((0..trees).map(|i| SpriteSource {
            id: SpriteId::Tree(i),
            urls: chain(&format!("tree{}.png", i + 1)),
        }));
        sources.extend((0..snowmen).map(|i| SpriteSource {
            id: SpriteId::Snowman(i),
            urls: chain(&format!("snowman{}.png", i + 1)),
        }));
        Self { sources }
    }
}

/// Final status of one sprite slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteOutcome {
    Loaded { url: String },
    Missing { attempts: Vec<AssetError> },
}

/// Walks one sprite's fallback chain.
///
/// Drives both the synchronous loader and the browser's async loader:
/// ask for `next_url`, fetch it however the platform does, `record` the
/// result, repeat until `next_url` is `None`, then `finish`.
#[derive(Debug)]
pub struct SpriteAttempt {
    id: SpriteId,
    urls: Vec<String>,
    cursor: usize,
    loaded: Option<(String, SpriteImage)>,
    failures: Vec<AssetError>,
}

impl SpriteAttempt {
    pub fn new(source: &SpriteSource) -> Self {
        Self {
            id: source.id,
            urls: source.urls.clone(),
            cursor: 0,
            loaded: None,
            failures: Vec::new(),
        }
    }

    pub fn next_url(&self) -> Option<&str> {
        if self.loaded.is_some() {
            return None;
        }
        self.urls.get(self.cursor).map(String::as_str)
    }

    pub fn record(&mut self, result: Result<SpriteImage, AssetError>) {
        let Some(url) = self.urls.get(self.cursor).cloned() else {
            return;
        };
        self.cursor += 1;
        match result {
            Ok(image) => self.loaded = Some((url, image)),
            Err(err) => {
                log::warn!("Sprite {:?}: {}", self.id, err);
                self.failures.push(err);
            }
        }
    }

    pub fn finish(self) -> (SpriteId, Option<SpriteImage>, SpriteOutcome) {
        match self.loaded {
            Some((url, image)) => {
                if !self.failures.is_empty() {
                    log::info!("Sprite {:?} loaded from fallback {}", self.id, url);
                }
                (self.id, Some(image), SpriteOutcome::Loaded { url })
            }
            None => {
                log::warn!(
                    "Sprite {:?} unavailable after {} attempt(s); using fallback rendering",
                    self.id,
                    self.failures.len()
                );
                (
                    self.id,
                    None,
                    SpriteOutcome::Missing {
                        attempts: self.failures,
                    },
                )
            }
        }
    }
}

/// Loaded sprites plus a per-sprite outcome
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    images: BTreeMap<SpriteId, SpriteImage>,
    outcomes: BTreeMap<SpriteId, SpriteOutcome>,
}

impl SpriteSet {
    /// No sprites at all; everything renders with flat colours
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve every chain with a synchronous fetch function
    pub fn acquire<F>(manifest: &SpriteManifest, mut fetch: F) -> Self
    where
        F: FnMut(&str) -> Result<SpriteImage, AssetError>,
    {
        let mut set = Self::empty();
        for source in &manifest.sources {
            let mut attempt = SpriteAttempt::new(source);
            while let Some(url) = attempt.next_url().map(str::to_owned) {
                attempt.record(fetch(&url));
            }
            set.insert(attempt);
        }
        set
    }

    /// Store a finished attempt
    pub fn insert(&mut self, attempt: SpriteAttempt) {
        let (id, image, outcome) = attempt.finish();
        if let Some(image) = image {
            self.images.insert(id, image);
        }
        self.outcomes.insert(id, outcome);
    }

    pub fn get(&self, id: SpriteId) -> Option<&SpriteImage> {
        self.images.get(&id)
    }

    pub fn has(&self, id: SpriteId) -> bool {
        self.images.contains_key(&id)
    }

    pub fn outcome(&self, id: SpriteId) -> Option<&SpriteOutcome> {
        self.outcomes.get(&id)
    }

    /// Loaded sprites in id order
    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &SpriteImage)> {
        self.images.iter().map(|(id, image)| (*id, image))
    }

    /// Sprites that could not be loaded from any URL
    pub fn missing(&self) -> Vec<SpriteId> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SpriteOutcome::Missing { .. }))
            .map(|(id, _)| *id)
            .collect()
    }

    /// One-line summary for the log
    pub fn load_report(&self) -> String {
        let missing = self.missing();
        if missing.is_empty() {
            format!("{} sprites loaded", self.images.len())
        } else {
            format!(
                "{} sprites loaded, {} missing: {:?}",
                self.images.len(),
                missing.len(),
                missing
            )
        }
    }
}
