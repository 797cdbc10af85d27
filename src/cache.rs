use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use actix_web::web;

use crate::api::ApiClient;
use crate::models::tender::Tender;

/// Freshness interval for a successfully loaded page.
pub const REVALIDATE_OK: Duration = Duration::from_secs(60);
/// Failures are retried aggressively on the next request.
pub const REVALIDATE_ERR: Duration = Duration::from_secs(1);

const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Data handed to the proposal page: either a tender or an HTTP-like status
/// code, plus the interval for which the result may be served as fresh.
#[derive(Debug, Clone)]
pub struct PageProps {
    pub status_code: Option<u16>,
    pub tender: Option<Tender>,
    pub revalidate: Duration,
}

/// Fetch the tender record for a page render.
pub fn load_tender(api: &ApiClient, id: i64) -> PageProps {
    match api.find_tender(id) {
        Ok(tender) => PageProps {
            status_code: None,
            tender: Some(tender),
            revalidate: REVALIDATE_OK,
        },
        Err(e) => {
            log::error!("Failed to load tender {id}: {e}");
            PageProps {
                status_code: e.status(),
                tender: None,
                revalidate: REVALIDATE_ERR,
            }
        }
    }
}

struct CacheEntry {
    props: PageProps,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < self.props.revalidate
    }
}

/// Keyed store of loaded page data with per-entry freshness intervals.
///
/// `prewarm` loads every tender the backend lists; ids it does not cover are
/// loaded on first request. A stale entry is re-fetched synchronously on the
/// next request, and the background refresher re-fetches stale entries so
/// prewarmed pages stay warm without traffic.
pub struct PageCache {
    entries: Mutex<HashMap<i64, CacheEntry>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Load every tender the backend currently lists. A listing failure is
    /// not fatal: the cache stays empty and pages load on demand.
    pub fn prewarm(&self, api: &ApiClient) {
        let ids: Vec<i64> = match api.list_tenders() {
            Ok(tenders) => tenders.iter().map(|t| t.id).collect(),
            Err(e) => {
                log::error!("Tender listing failed, prewarming nothing: {e}");
                return;
            }
        };
        for id in &ids {
            self.refresh(api, *id);
        }
        log::info!("Prewarmed {} tender page(s)", ids.len());
    }

    /// Serve the cached props for `id` while fresh, loading them otherwise.
    pub fn get_or_load(&self, api: &ApiClient, id: i64) -> PageProps {
        {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = entries.get(&id) {
                if entry.is_fresh() {
                    return entry.props.clone();
                }
            }
        }
        self.refresh(api, id)
    }

    /// Re-fetch `id` and replace its cache entry.
    pub fn refresh(&self, api: &ApiClient, id: i64) -> PageProps {
        let props = load_tender(api, id);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            id,
            CacheEntry {
                props: props.clone(),
                fetched_at: Instant::now(),
            },
        );
        props
    }

    /// Ids whose entries have outlived their freshness interval.
    pub fn stale_ids(&self) -> Vec<i64> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .filter(|(_, entry)| !entry.is_fresh())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodically re-fetch stale entries in the background.
pub fn spawn_refresher(cache: web::Data<PageCache>, api: ApiClient) {
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(REFRESH_INTERVAL);
        // The first tick fires immediately; prewarm already covered it.
        interval.tick().await;
        loop {
            interval.tick().await;
            let stale = cache.stale_ids();
            if stale.is_empty() {
                continue;
            }
            log::info!("Refreshing {} stale tender page(s)", stale.len());
            for id in stale {
                cache.refresh(&api, id);
            }
        }
    });
}
