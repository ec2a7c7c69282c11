// src/core/pagination/resolver.rs

//! Implements the cursor-chain resolver.
//!
//! The upstream API only exposes "next" links, so page N can only be reached by
//! following the chain from some earlier page. Every page ever walked is cached
//! under its own key, so later requests for any page resume from the closest
//! cached predecessor instead of walking from page 1 again.
//!
//! A per-result-set high-water mark records the highest page ever cached, so
//! the search for a predecessor never scans past pages that were never walked.

use super::PageCacheEntry;
use super::keys::{page_entry_key, page_max_key};
use crate::core::storage::{self, KeyValueStore};
use crate::core::upstream::{RecipeHit, RecipeProvider};
use crate::core::{LarderError, metrics};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// The result of resolving one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    pub page: u32,
    pub hits: Vec<RecipeHit>,
    /// How many upstream calls were made to produce this page. `0` on a cache hit.
    pub upstream_calls: usize,
    /// The page numbers written to the cache, ascending. Empty on a cache hit.
    pub written_pages: Vec<u32>,
}

/// Where a forward walk starts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResumePoint {
    /// Follow `link` to obtain page `page`.
    Cursor { page: u32, link: String },
    /// No earlier page is cached; start from the page-1 URL.
    Start,
}

#[derive(Debug, Clone)]
pub struct CursorChainResolver {
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn RecipeProvider>,
    page_ttl: Option<Duration>,
}

impl CursorChainResolver {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn RecipeProvider>,
        page_ttl: Option<Duration>,
    ) -> Self {
        Self {
            store,
            provider,
            page_ttl,
        }
    }

    /// Reads a single cached page, if present.
    pub async fn cached_page(
        &self,
        cache_key: &str,
        page: u32,
    ) -> Result<Option<PageCacheEntry>, LarderError> {
        storage::get_json(self.store.as_ref(), &page_entry_key(cache_key, page)).await
    }

    /// The highest page number cached for `cache_key`, if any page was ever written.
    pub async fn highest_cached_page(&self, cache_key: &str) -> Result<Option<u32>, LarderError> {
        storage::get_json(self.store.as_ref(), &page_max_key(cache_key)).await
    }

    /// Returns the hits of `target_page` of the result set identified by `cache_key`.
    ///
    /// `first_page_url` is the upstream URL of page 1. A cached page is returned
    /// without any upstream call; otherwise the chain is walked forward from the
    /// highest cached page below the target (or from page 1), one call per page,
    /// and every page walked is written back to the cache.
    ///
    /// Fails with `NotFound` when the target page is empty or the chain ends
    /// before reaching it; nothing is cached in that case.
    pub async fn resolve_page(
        &self,
        cache_key: &str,
        first_page_url: &str,
        target_page: u32,
    ) -> Result<ResolvedPage, LarderError> {
        if target_page < 1 {
            return Err(LarderError::OutOfRange(
                "Page can't be zero or negative value".to_string(),
            ));
        }

        if let Some(entry) = self.cached_page(cache_key, target_page).await? {
            metrics::PAGE_CACHE_HITS_TOTAL.inc();
            debug!("Page cache hit for page {} of '{}'.", target_page, cache_key);
            return Ok(ResolvedPage {
                page: target_page,
                hits: entry.hits,
                upstream_calls: 0,
                written_pages: Vec::new(),
            });
        }
        metrics::PAGE_CACHE_MISSES_TOTAL.inc();

        let (mut current_page, mut link) = match self.find_resume_point(cache_key, target_page).await? {
            ResumePoint::Cursor { page, link } => (page, link),
            ResumePoint::Start => (1, first_page_url.to_string()),
        };
        debug!(
            "Page cache miss for page {} of '{}': walking from page {}.",
            target_page, cache_key, current_page
        );

        let mut pending: Vec<(u32, PageCacheEntry)> = Vec::new();
        let mut upstream_calls = 0;

        while current_page < target_page {
            let page = self.provider.search(&link).await?;
            upstream_calls += 1;
            let Some(next) = page.next_cursor().map(str::to_string) else {
                debug!(
                    "Cursor chain for '{}' ended at page {} before page {}.",
                    cache_key, current_page, target_page
                );
                return Err(LarderError::no_recipes_left());
            };
            pending.push((
                current_page,
                PageCacheEntry {
                    hits: page.hits,
                    next: Some(next.clone()),
                },
            ));
            link = next;
            current_page += 1;
        }

        let page = self.provider.search(&link).await?;
        upstream_calls += 1;
        if page.hits.is_empty() {
            return Err(LarderError::no_recipes_left());
        }
        let next = page.next_cursor().map(str::to_string);
        let hits = page.hits;
        pending.push((
            target_page,
            PageCacheEntry {
                hits: hits.clone(),
                next,
            },
        ));

        let mut written_pages = Vec::with_capacity(pending.len());
        for (number, entry) in &pending {
            storage::set_json(
                self.store.as_ref(),
                &page_entry_key(cache_key, *number),
                entry,
                self.page_ttl,
            )
            .await?;
            written_pages.push(*number);
        }
        self.raise_high_water_mark(cache_key, target_page).await?;

        Ok(ResolvedPage {
            page: target_page,
            hits,
            upstream_calls,
            written_pages,
        })
    }

    /// Records `page` as the highest cached page unless a higher one is already
    /// recorded. The mark is rewritten on every walk so it never expires before
    /// the pages it covers.
    ///
    /// Concurrent walkers may race here; a lowered mark only costs a longer walk.
    async fn raise_high_water_mark(&self, cache_key: &str, page: u32) -> Result<(), LarderError> {
        let current = self.highest_cached_page(cache_key).await?.unwrap_or(0);
        storage::set_json(
            self.store.as_ref(),
            &page_max_key(cache_key),
            &page.max(current),
            self.page_ttl,
        )
        .await
    }

    /// Scans downward from `min(target_page - 1, highest cached page)` for the
    /// closest cached page and returns the cursor that continues it.
    async fn find_resume_point(
        &self,
        cache_key: &str,
        target_page: u32,
    ) -> Result<ResumePoint, LarderError> {
        let Some(highest) = self.highest_cached_page(cache_key).await? else {
            return Ok(ResumePoint::Start);
        };
        let top = highest.min(target_page - 1);
        for page in (1..=top).rev() {
            if let Some(entry) = self.cached_page(cache_key, page).await? {
                return match entry.next {
                    Some(link) => Ok(ResumePoint::Cursor {
                        page: page + 1,
                        link,
                    }),
                    // The closest cached page is the last one the provider has.
                    None => Err(LarderError::no_recipes_left()),
                };
            }
        }
        Ok(ResumePoint::Start)
    }
}
