//! Episode Loader — resolves an episode identifier to its authored document.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use witnesslab_core::error::DomainError;

use crate::application::validation::validate_episode;
use crate::domain::document::{EpisodeDocument, parse_json, parse_yaml};

/// Identifiers of the episodes bundled with the engine, in narrative order.
pub const BUNDLED_EPISODES: [&str; 3] = ["episode-001", "episode-002", "episode-003"];

/// Resolves episode identifiers to validated authored documents.
#[async_trait]
pub trait EpisodeLoader: Send + Sync {
    /// Loads and validates the episode named `episode_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EpisodeNotFound` for unknown ids and
    /// `DomainError::MalformedUnit` for documents that fail to parse or
    /// validate.
    async fn load(&self, episode_id: &str) -> Result<EpisodeDocument, DomainError>;
}

fn bundled_source(episode_id: &str) -> Option<&'static str> {
    match episode_id {
        "episode-001" => Some(include_str!("../../content/episodes/episode-001.json")),
        "episode-002" => Some(include_str!("../../content/episodes/episode-002.json")),
        "episode-003" => Some(include_str!("../../content/episodes/episode-003.json")),
        _ => None,
    }
}

fn checked(requested: &str, doc: EpisodeDocument) -> Result<EpisodeDocument, DomainError> {
    if doc.id != requested {
        return Err(DomainError::MalformedUnit {
            episode_id: requested.to_owned(),
            reason: format!("document declares id {}", doc.id),
        });
    }
    validate_episode(&doc)?;
    Ok(doc)
}

/// Serves the episodes compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledEpisodeLoader;

#[async_trait]
impl EpisodeLoader for BundledEpisodeLoader {
    async fn load(&self, episode_id: &str) -> Result<EpisodeDocument, DomainError> {
        let raw = bundled_source(episode_id)
            .ok_or_else(|| DomainError::EpisodeNotFound(episode_id.to_owned()))?;
        checked(episode_id, parse_json(episode_id, raw)?)
    }
}

/// Reads `<id>.json` or `<id>.yaml` from a content directory.
#[derive(Debug, Clone)]
pub struct DirectoryEpisodeLoader {
    root: PathBuf,
}

impl DirectoryEpisodeLoader {
    /// Creates a loader rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read(&self, file_name: String) -> Result<Option<String>, DomainError> {
        match tokio::fs::read_to_string(self.root.join(&file_name)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Infrastructure(format!(
                "reading {file_name}: {e}"
            ))),
        }
    }
}

fn is_plain_stem(episode_id: &str) -> bool {
    !episode_id.is_empty()
        && episode_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl EpisodeLoader for DirectoryEpisodeLoader {
    async fn load(&self, episode_id: &str) -> Result<EpisodeDocument, DomainError> {
        if !is_plain_stem(episode_id) {
            return Err(DomainError::Validation(format!(
                "invalid episode id: {episode_id:?}"
            )));
        }

        if let Some(raw) = self.read(format!("{episode_id}.json")).await? {
            return checked(episode_id, parse_json(episode_id, &raw)?);
        }
        if let Some(raw) = self.read(format!("{episode_id}.yaml")).await? {
            return checked(episode_id, parse_yaml(episode_id, &raw)?);
        }
        tracing::debug!(episode_id, root = %self.root.display(), "episode file not found");
        Err(DomainError::EpisodeNotFound(episode_id.to_owned()))
    }
}
