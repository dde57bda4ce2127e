//! Search orchestration over the result cache and the live catalog.
//!
//! Each search request walks one path: a fresh cached query with linked
//! results answers immediately; anything else goes to the catalog, and
//! podcast results are persisted and linked before the reply is built.
//! Episode searches skip the cache in both directions.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, warn};

use crate::clients::itunes::{CatalogError, CatalogRecord, CatalogSearch};
use crate::constants::cache;
use crate::db::ResultCacheStore;
use crate::domain::{MediaKind, TrackId};
use crate::entities::podcast_results;
use crate::models::{EpisodeCard, PodcastCard};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to create search query")]
    RecordQuery(String),
}

/// Where the podcast cards in a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrigin {
    Cache,
    Live,
}

/// Reply shape of one orchestrated search.
#[derive(Debug)]
pub enum SearchOutcome {
    Podcasts {
        cards: Vec<PodcastCard>,
        origin: ResultOrigin,
    },
    Episodes {
        cards: Vec<EpisodeCard>,
    },
}

/// Why one fetched record was dropped during the persistence pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Upsert(String),
    Link(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub track_id: TrackId,
    pub reason: SkipReason,
}

/// Per-batch persistence result: the rows that made it, and the records
/// that were dropped with the reason each one was dropped.
#[derive(Debug, Default)]
pub struct PersistReport {
    pub stored: Vec<podcast_results::Model>,
    pub skipped: Vec<SkippedRecord>,
}

/// Monotonic token source for callers that supersede in-flight searches.
///
/// A caller takes a token with [`begin`](Self::begin) before issuing a
/// request and checks [`is_current`](Self::is_current) when the reply
/// lands; a reply carrying a superseded token is discarded instead of
/// rendered. The server-side write path is unaffected: persistence of a
/// superseded search still completes.
#[derive(Debug, Default)]
pub struct SearchGeneration(AtomicU64);

impl SearchGeneration {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Starts a new generation and returns its token, invalidating all
    /// previously issued tokens.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[must_use]
    pub fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}

pub struct SearchService {
    store: Arc<dyn ResultCacheStore>,
    catalog: Arc<dyn CatalogSearch>,
}

impl SearchService {
    #[must_use]
    pub fn new(store: Arc<dyn ResultCacheStore>, catalog: Arc<dyn CatalogSearch>) -> Self {
        Self { store, catalog }
    }

    /// Runs one search request through the cache-or-fetch state machine.
    ///
    /// The term arrives already validated (non-empty, length-capped); it is
    /// normalized here before any cache operation so lookups and stored
    /// queries always agree on the key.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Catalog`] when the live fetch fails; no cache row is
    ///   written in that case.
    /// - [`SearchError::RecordQuery`] when the new query row cannot be
    ///   created after a successful fetch.
    /// - [`SearchError::Database`] when the persistence task dies.
    pub async fn search(
        &self,
        term: &str,
        media: MediaKind,
        limit: u32,
    ) -> Result<SearchOutcome, SearchError> {
        if media.is_episode() {
            return self.search_episodes(term, limit).await;
        }

        let normalized = term.trim().to_lowercase();

        if let Some(cards) = self.cached_podcasts(&normalized, media, limit).await {
            metrics::counter!("search_cache_hits_total").increment(1);
            return Ok(SearchOutcome::Podcasts {
                cards,
                origin: ResultOrigin::Cache,
            });
        }

        metrics::counter!("search_cache_misses_total").increment(1);
        self.fetch_and_persist(term, &normalized, media, limit)
            .await
    }

    /// Episode searches go straight to the catalog; nothing is read from or
    /// written to the store.
    async fn search_episodes(&self, term: &str, limit: u32) -> Result<SearchOutcome, SearchError> {
        let records = self
            .catalog
            .search(term, MediaKind::PodcastEpisode, limit)
            .await
            .inspect_err(|_| {
                metrics::counter!("catalog_search_failures_total").increment(1);
            })?;

        let cards = records.iter().map(EpisodeCard::from_catalog).collect();
        Ok(SearchOutcome::Episodes { cards })
    }

    /// Cache-hit probe: `Some(cards)` only when a fresh query exists and has
    /// at least one linked result. A fresh query with zero links reports a
    /// miss, so the caller refetches instead of replaying an empty answer.
    /// Store read failures degrade to a miss as well.
    async fn cached_podcasts(
        &self,
        normalized_term: &str,
        media: MediaKind,
        limit: u32,
    ) -> Option<Vec<PodcastCard>> {
        let max_age = chrono::Duration::minutes(cache::FRESHNESS_WINDOW_MINUTES);

        let query = match self
            .store
            .find_fresh_query(normalized_term, media.as_str(), max_age)
            .await
        {
            Ok(found) => found?,
            Err(e) => {
                warn!("Cache lookup failed for '{normalized_term}', fetching live: {e}");
                return None;
            }
        };

        let linked = match self
            .store
            .list_linked_results(query.id, u64::from(limit))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to load cached results for query {}: {e}", query.id);
                return None;
            }
        };

        if linked.is_empty() {
            debug!(
                "Fresh query {} for '{normalized_term}' has no linked results, fetching live",
                query.id
            );
            return None;
        }

        debug!(
            "Cache hit for '{normalized_term}' ({}): {} results",
            media.as_str(),
            linked.len()
        );

        Some(linked.iter().map(PodcastCard::from_stored).collect())
    }

    /// Cache-miss path: fetch live, record the query, persist and link each
    /// record, and answer with cards built from the stored rows.
    async fn fetch_and_persist(
        &self,
        term: &str,
        normalized_term: &str,
        media: MediaKind,
        limit: u32,
    ) -> Result<SearchOutcome, SearchError> {
        let records = self
            .catalog
            .search(term, media, limit)
            .await
            .inspect_err(|_| {
                metrics::counter!("catalog_search_failures_total").increment(1);
            })?;

        // An empty live answer is a valid reply, not a cacheable one: no
        // query row is recorded for it.
        if records.is_empty() {
            return Ok(SearchOutcome::Podcasts {
                cards: Vec::new(),
                origin: ResultOrigin::Live,
            });
        }

        let query = self
            .store
            .record_query(normalized_term, media.as_str())
            .await
            .map_err(|e| {
                warn!("Failed to record search query '{normalized_term}': {e}");
                SearchError::RecordQuery(e.to_string())
            })?;

        // Persistence runs on its own task: a caller that disconnects drops
        // this request future, and a half-written batch must not be
        // cancelled with it.
        let store = Arc::clone(&self.store);
        let query_id = query.id;
        let report = tokio::spawn(async move { persist_batch(store, query_id, records).await })
            .await
            .map_err(|e| SearchError::Database(format!("persistence task failed: {e}")))?;

        let cards = report.stored.iter().map(PodcastCard::from_stored).collect();
        Ok(SearchOutcome::Podcasts {
            cards,
            origin: ResultOrigin::Live,
        })
    }
}

/// Persists one fetched batch against an already-recorded query.
///
/// Records are deduplicated by track id within the batch, then resolved
/// existing-or-insert and linked to the query. A record that fails to
/// resolve or to link is dropped from the reply and reported, never fatal
/// to the batch.
pub async fn persist_batch(
    store: Arc<dyn ResultCacheStore>,
    query_id: i32,
    mut records: Vec<CatalogRecord>,
) -> PersistReport {
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);
    records.retain(|record| seen.insert(record.track_id));
    if records.len() < before {
        debug!(
            "Dropped {} duplicate track ids from fetched batch",
            before - records.len()
        );
    }

    let track_ids: Vec<i64> = records.iter().map(|r| r.track_id.value()).collect();
    let known = match store.existing_track_ids(&track_ids).await {
        Ok(ids) => ids,
        Err(e) => {
            // The batch pre-check only saves round trips; the unique index
            // still guarantees dedup when every record goes down the insert
            // path.
            warn!("Batch existence check failed, treating all records as new: {e}");
            HashSet::new()
        }
    };

    let mut report = PersistReport::default();

    for record in records {
        let resolved = if known.contains(&record.track_id.value()) {
            match store.find_result_by_track_id(record.track_id.value()).await {
                Ok(Some(model)) => Ok(model),
                Ok(None) => store.insert_result_if_absent(&record).await,
                Err(e) => Err(e),
            }
        } else {
            store.insert_result_if_absent(&record).await
        };

        let model = match resolved {
            Ok(model) => model,
            Err(e) => {
                warn!("Skipping result {}: {e}", record.track_id);
                report.skipped.push(SkippedRecord {
                    track_id: record.track_id,
                    reason: SkipReason::Upsert(e.to_string()),
                });
                continue;
            }
        };

        if let Err(e) = store.link_query_to_result(query_id, model.id).await {
            warn!(
                "Failed to link result {} to query {query_id}, dropping it: {e}",
                record.track_id
            );
            report.skipped.push(SkippedRecord {
                track_id: record.track_id,
                reason: SkipReason::Link(e.to_string()),
            });
            continue;
        }

        report.stored.push(model);
    }

    metrics::counter!("search_results_persisted_total").increment(report.stored.len() as u64);
    metrics::counter!("search_results_skipped_total").increment(report.skipped.len() as u64);

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_tokens_supersede_older_ones() {
        let generation = SearchGeneration::new();

        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(generation.is_current(second));
        assert!(!generation.is_current(first));
    }

    #[test]
    fn generation_tokens_are_monotonic() {
        let generation = SearchGeneration::new();
        let a = generation.begin();
        let b = generation.begin();
        let c = generation.begin();
        assert!(a < b && b < c);
    }

    #[test]
    fn persist_report_starts_empty() {
        let report = PersistReport::default();
        assert!(report.stored.is_empty());
        assert!(report.skipped.is_empty());
    }
}
