//! Curated popular listing built from rotating Arabic search terms.
//!
//! Each call picks a few terms at random, runs small catalog searches for
//! them, deduplicates by track id in memory, and shuffles the combined
//! list. Nothing on this path touches the result cache.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, warn};

use crate::clients::itunes::CatalogSearch;
use crate::constants::popular;
use crate::domain::MediaKind;
use crate::models::PodcastCard;

pub struct PopularService {
    catalog: Arc<dyn CatalogSearch>,
}

impl PopularService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogSearch>) -> Self {
        Self { catalog }
    }

    /// Collects up to `limit` popular podcast cards.
    ///
    /// A term whose catalog search fails is logged and skipped; the listing
    /// is whatever the remaining terms produced, possibly empty. This path
    /// never fails as a whole.
    pub async fn list_popular(&self, limit: u32) -> Vec<PodcastCard> {
        let terms = pick_rotation_terms();
        #[allow(clippy::cast_possible_truncation)]
        let per_term = limit.div_ceil(terms.len().max(1) as u32);

        debug!("Popular rotation: {terms:?} ({per_term} per term)");

        let mut cards: Vec<PodcastCard> = Vec::new();
        let mut seen_track_ids: HashSet<i64> = HashSet::new();

        for term in terms {
            let records = match self
                .catalog
                .search(term, MediaKind::Podcast, per_term)
                .await
            {
                Ok(records) => records,
                Err(e) => {
                    metrics::counter!("catalog_search_failures_total").increment(1);
                    warn!("Popular search for '{term}' failed, skipping term: {e}");
                    continue;
                }
            };

            for record in &records {
                if seen_track_ids.insert(record.track_id.value()) {
                    cards.push(PodcastCard::from_catalog(record));
                }
            }
        }

        // The rng is scoped so the future stays Send across the awaits above.
        {
            let mut rng = rand::rng();
            cards.shuffle(&mut rng);
        }
        cards.truncate(limit as usize);

        cards
    }
}

fn pick_rotation_terms() -> Vec<&'static str> {
    let mut rng = rand::rng();
    popular::ARABIC_TERMS
        .choose_multiple(&mut rng, popular::TERMS_PER_ROTATION)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_picks_distinct_known_terms() {
        for _ in 0..20 {
            let terms = pick_rotation_terms();
            assert_eq!(terms.len(), popular::TERMS_PER_ROTATION);

            let unique: HashSet<&str> = terms.iter().copied().collect();
            assert_eq!(unique.len(), terms.len());

            for term in terms {
                assert!(popular::ARABIC_TERMS.contains(&term));
            }
        }
    }
}
