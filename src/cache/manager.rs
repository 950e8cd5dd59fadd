//! The offline asset cache manager.
//!
//! One parameterized manager covers install (all-or-nothing precache),
//! activation (purge of stale store versions), request routing
//! (network-first for navigation, cache-first for everything else) and
//! the skip-waiting upgrade handshake.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use reqwest::Method;
use tracing::{debug, error, info, warn};

use super::channel::{PageMessage, WorkerChannel, WorkerMessage};
use super::error::CacheError;
use super::fetch::{is_same_origin, AssetRequest, FetchError, FetchedResponse, Fetcher, RequestClass};
use super::manifest::Manifest;
use super::store::{CacheEntry, CacheStore};

/// Concurrent fetches during the precache install.
/// 4 keeps install fast without hammering the content origin.
const MAX_CONCURRENT_PRECACHE: usize = 4;

/// Precached document served when a navigation request cannot be
/// satisfied from the network or its own cached copy.
const FALLBACK_DOCUMENT: &str = "offline.html";

/// Synthesized last-resort offline page.
const OFFLINE_PAGE: &str =
    "<h1>Amor Fati</h1><p>Pas de connexion. Ce contenu n'est pas disponible hors ligne.</p>";

/// Inline placeholder returned for image requests that fail entirely.
const PLACEHOLDER_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"100\"><rect fill=\"#ccc\" width=\"100\" height=\"100\"/></svg>";

/// Cache manager lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Waiting,
    Active,
    Terminated,
}

/// Routing decision for one request.
#[derive(Debug)]
pub enum Intercept {
    /// Not intercepted (anything other than GET).
    PassThrough,
    Response(CacheResponse),
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    Fallback,
}

#[derive(Debug)]
pub struct CacheResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub source: ResponseSource,
}

impl CacheResponse {
    fn from_entry(entry: CacheEntry, source: ResponseSource) -> Self {
        Self {
            status: entry.status,
            content_type: entry.content_type,
            body: entry.body,
            source,
        }
    }

    fn from_network(response: FetchedResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.content_type,
            body: response.body,
            source: ResponseSource::Network,
        }
    }

    fn offline_page() -> Self {
        Self {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: OFFLINE_PAGE.as_bytes().to_vec(),
            source: ResponseSource::Fallback,
        }
    }

    fn image_placeholder() -> Self {
        Self {
            status: 200,
            content_type: Some("image/svg+xml".to_string()),
            body: PLACEHOLDER_SVG.as_bytes().to_vec(),
            source: ResponseSource::Fallback,
        }
    }

    fn offline_error() -> Self {
        Self {
            status: 503,
            content_type: None,
            body: b"Offline".to_vec(),
            source: ResponseSource::Fallback,
        }
    }
}

pub struct CacheManager<F> {
    fetcher: F,
    store: CacheStore,
    manifest: Manifest,
    origin: String,
    state: WorkerState,
}

impl<F: Fetcher> CacheManager<F> {
    pub fn new(
        fetcher: F,
        cache_root: &Path,
        manifest: Manifest,
        origin: String,
    ) -> Result<Self, CacheError> {
        let store = CacheStore::open(cache_root, &manifest.version)?;
        Ok(Self {
            fetcher,
            store,
            manifest,
            origin,
            state: WorkerState::Installing,
        })
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn version(&self) -> &str {
        self.store.version()
    }

    pub fn is_installed(&self) -> bool {
        self.store.is_installed()
    }

    /// Fetch and commit the whole precache bundle, all-or-nothing.
    ///
    /// Any failed asset fetch aborts the transition and leaves the
    /// previous version authoritative. An already-committed store skips
    /// the network entirely.
    pub async fn install(&mut self) -> Result<(), CacheError> {
        self.state = WorkerState::Installing;

        if self.store.is_installed() {
            debug!(version = %self.manifest.version, "Store already installed, skipping precache");
            self.state = WorkerState::Waiting;
            return Ok(());
        }

        info!(
            version = %self.manifest.version,
            assets = self.manifest.assets.len(),
            "Precaching asset bundle"
        );

        let fetcher = &self.fetcher;
        let results: Vec<(String, Result<FetchedResponse, FetchError>)> =
            stream::iter(self.manifest.assets.iter().cloned().map(|asset| async move {
                let request = AssetRequest::get(asset);
                let result = fetcher.fetch(&request).await;
                (request.url, result)
            }))
            .buffer_unordered(MAX_CONCURRENT_PRECACHE)
            .collect()
            .await;

        let mut entries = Vec::with_capacity(results.len());
        for (url, result) in results {
            match result {
                Ok(response) if response.status == 200 => {
                    entries.push(CacheEntry::capture(Method::GET.as_str(), &url, &response));
                }
                Ok(response) => {
                    return Err(CacheError::Precache {
                        url,
                        source: FetchError::Status(response.status),
                    });
                }
                Err(source) => return Err(CacheError::Precache { url, source }),
            }
        }

        let staging = self.store.stage()?;
        for entry in &entries {
            if let Err(e) = staging.put(entry) {
                staging.abort();
                return Err(e);
            }
        }
        staging.commit()?;

        info!(version = %self.manifest.version, "Precache install complete");
        self.state = WorkerState::Waiting;
        Ok(())
    }

    /// Purge every other store version and begin serving requests.
    /// Returns the removed version tags.
    pub fn activate(&mut self) -> Result<Vec<String>, CacheError> {
        let removed = self.store.purge_other_versions()?;
        self.state = WorkerState::Active;
        Ok(removed)
    }

    /// Begin serving without purging other versions. Used when a failed
    /// install leaves an older version in control.
    pub fn resume(&mut self) {
        self.state = WorkerState::Active;
    }

    /// Route one request. Only GET is intercepted.
    pub async fn handle(&self, request: &AssetRequest) -> Intercept {
        if request.method != Method::GET {
            return Intercept::PassThrough;
        }
        let response = match request.class() {
            RequestClass::Navigation => self.network_first(request).await,
            class => self.cache_first(request, class).await,
        };
        Intercept::Response(response)
    }

    /// Navigation policy: live fetch, caching successes; offline falls
    /// back to the cached copy, then the fallback document, then a
    /// synthesized page.
    async fn network_first(&self, request: &AssetRequest) -> CacheResponse {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                let entry = CacheEntry::capture(request.method.as_str(), &request.url, &response);
                if let Err(e) = self.store.put(&entry) {
                    warn!(error = %e, url = %request.url, "Failed to store navigation response");
                }
                CacheResponse::from_network(response)
            }
            Err(e) => {
                debug!(error = %e, url = %request.url, "Navigation fetch failed, using cache");
                if let Ok(Some(entry)) = self.store.get(request.method.as_str(), &request.url) {
                    return CacheResponse::from_entry(entry, ResponseSource::Cache);
                }
                if let Ok(Some(entry)) = self.store.get(Method::GET.as_str(), FALLBACK_DOCUMENT) {
                    return CacheResponse::from_entry(entry, ResponseSource::Fallback);
                }
                CacheResponse::offline_page()
            }
        }
    }

    /// Asset policy: cached copy wins; misses fetch live and store
    /// validated responses; total failure yields a typed placeholder.
    async fn cache_first(&self, request: &AssetRequest, class: RequestClass) -> CacheResponse {
        match self.store.get(request.method.as_str(), &request.url) {
            Ok(Some(entry)) => return CacheResponse::from_entry(entry, ResponseSource::Cache),
            Ok(None) => {}
            Err(e) => warn!(error = %e, url = %request.url, "Cache lookup failed, fetching live"),
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                // Only healthy same-origin responses are worth keeping
                if response.status == 200 && is_same_origin(&request.url, &self.origin) {
                    let entry =
                        CacheEntry::capture(request.method.as_str(), &request.url, &response);
                    if let Err(e) = self.store.put(&entry) {
                        warn!(error = %e, url = %request.url, "Failed to store asset response");
                    }
                }
                CacheResponse::from_network(response)
            }
            Err(e) => {
                warn!(error = %e, url = %request.url, "Asset fetch failed, serving placeholder");
                match class {
                    RequestClass::Image => CacheResponse::image_placeholder(),
                    _ => CacheResponse::offline_error(),
                }
            }
        }
    }
}

/// The worker task: install the current manifest, run the upgrade
/// handshake, then serve routing queries until the page goes away.
pub async fn run_worker<F>(fetcher: F, cache_root: PathBuf, origin: String, channel: WorkerChannel)
where
    F: Fetcher + Clone + Send + Sync + 'static,
{
    let manifest = Manifest::current();
    let previous_versions: Vec<String> = CacheStore::list_versions(&cache_root)
        .unwrap_or_default()
        .into_iter()
        .filter(|v| v != &manifest.version)
        .collect();

    let mut manager =
        match CacheManager::new(fetcher.clone(), &cache_root, manifest, origin.clone()) {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "Failed to open cache store, worker terminating");
                return;
            }
        };

    if let Err(e) = manager.install().await {
        error!(error = %e, "Precache install failed");
        // Stay on the previous version if one exists
        if let Some(previous) = previous_versions.last() {
            match CacheManager::new(fetcher, &cache_root, Manifest::resumed(previous), origin) {
                Ok(mut old) => {
                    warn!(version = %previous, "Serving from previous cache version");
                    old.resume();
                    serve_loop(old, channel, None).await;
                }
                Err(e) => error!(error = %e, "Failed to reopen previous cache version"),
            }
        }
        return;
    }

    if previous_versions.is_empty() {
        // First install claims control immediately
        match manager.activate() {
            Ok(_) => info!(version = %manager.version(), "Cache manager active"),
            Err(e) => warn!(error = %e, "Activation cleanup failed"),
        }
        serve_loop(manager, channel, None).await;
    } else {
        // An old version still controls the page; wait for the takeover
        // request while the old version keeps serving.
        channel.notify(WorkerMessage::UpdateReady);
        info!(version = %manager.version(), "New cache version installed, waiting");

        let controlling = previous_versions.last().and_then(|previous| {
            match CacheManager::new(
                fetcher,
                &cache_root,
                Manifest::resumed(previous),
                origin,
            ) {
                Ok(mut old) => {
                    old.resume();
                    Some(old)
                }
                Err(e) => {
                    warn!(error = %e, "Failed to reopen controlling cache version");
                    None
                }
            }
        });
        serve_loop(manager, channel, controlling).await;
    }
}

/// Answer routing queries and upgrade messages until the page hangs up.
/// While `controlling` is set, the waiting manager does not serve; the
/// old version does, until skip-waiting activates the new one.
async fn serve_loop<F>(
    mut manager: CacheManager<F>,
    mut channel: WorkerChannel,
    mut controlling: Option<CacheManager<F>>,
) where
    F: Fetcher,
{
    loop {
        tokio::select! {
            query = channel.query_rx.recv() => match query {
                Some(query) => {
                    let serving = controlling.as_ref().unwrap_or(&manager);
                    let outcome = serving.handle(&query.request).await;
                    let _ = query.reply.send(outcome);
                }
                None => break,
            },
            message = channel.msg_rx.recv() => match message {
                Some(PageMessage::SkipWaiting) => {
                    if manager.state() == WorkerState::Waiting {
                        match manager.activate() {
                            Ok(removed) => {
                                info!(version = %manager.version(), ?removed, "Takeover complete");
                                controlling = None;
                                channel.notify(WorkerMessage::ReloadPage);
                            }
                            Err(e) => error!(error = %e, "Takeover activation failed"),
                        }
                    }
                }
                None => break,
            },
        }
    }
    manager.state = WorkerState::Terminated;
    debug!("Cache worker channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::super::channel;

    const ORIGIN: &str = "https://amor-fati.app/content";

    /// In-memory fetcher: serves a fixed page map, 404s unknown paths,
    /// and errors out entirely when switched offline.
    #[derive(Clone)]
    struct MockFetcher {
        pages: Arc<HashMap<String, Vec<u8>>>,
        offline: Arc<AtomicBool>,
    }

    impl MockFetcher {
        fn with_pages(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: Arc::new(
                    pages
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
                        .collect(),
                ),
                offline: Arc::new(AtomicBool::new(false)),
            }
        }

        fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }
    }

    impl Fetcher for MockFetcher {
        fn fetch(
            &self,
            request: &AssetRequest,
        ) -> impl Future<Output = Result<FetchedResponse, FetchError>> + Send {
            let result = if self.offline.load(Ordering::SeqCst) {
                Err(FetchError::Offline)
            } else {
                match self.pages.get(&request.url) {
                    Some(body) => Ok(FetchedResponse {
                        status: 200,
                        content_type: Some("text/html".to_string()),
                        body: body.clone(),
                    }),
                    None => Ok(FetchedResponse {
                        status: 404,
                        content_type: None,
                        body: Vec::new(),
                    }),
                }
            };
            async move { result }
        }
    }

    fn manifest(version: &str, assets: &[&str]) -> Manifest {
        Manifest {
            version: version.to_string(),
            assets: assets.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn expect_response(intercept: Intercept) -> CacheResponse {
        match intercept {
            Intercept::Response(r) => r,
            Intercept::PassThrough => panic!("expected a routed response"),
        }
    }

    #[tokio::test]
    async fn test_precached_asset_served_offline() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::with_pages(&[("index.html", "<h1>guide</h1>")]);
        let mut manager = CacheManager::new(
            fetcher.clone(),
            dir.path(),
            manifest("v1", &["index.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();

        manager.install().await.unwrap();
        manager.activate().unwrap();
        fetcher.go_offline();

        let response = expect_response(manager.handle(&AssetRequest::get("index.html")).await);
        assert_eq!(response.body, b"<h1>guide</h1>");
        assert_eq!(response.source, ResponseSource::Cache);
    }

    #[tokio::test]
    async fn test_post_is_never_intercepted() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::with_pages(&[("index.html", "x")]);
        let mut manager = CacheManager::new(
            fetcher,
            dir.path(),
            manifest("v1", &["index.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        manager.install().await.unwrap();
        manager.activate().unwrap();

        let mut request = AssetRequest::get("index.html");
        request.method = Method::POST;
        assert!(matches!(manager.handle(&request).await, Intercept::PassThrough));
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // offline.html is missing from the origin, so install must fail
        let fetcher = MockFetcher::with_pages(&[("index.html", "x")]);
        let mut manager = CacheManager::new(
            fetcher,
            dir.path(),
            manifest("v2", &["index.html", "offline.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();

        let err = manager.install().await.unwrap_err();
        assert!(matches!(err, CacheError::Precache { ref url, .. } if url == "offline.html"));
        assert_eq!(manager.state(), WorkerState::Installing);
        // Nothing committed, not even the asset that fetched fine
        assert!(CacheStore::list_versions(dir.path()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_install_leaves_previous_version() {
        let dir = tempfile::tempdir().unwrap();

        let fetcher = MockFetcher::with_pages(&[("index.html", "v1 page")]);
        let mut v1 = CacheManager::new(
            fetcher.clone(),
            dir.path(),
            manifest("v1", &["index.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        v1.install().await.unwrap();
        v1.activate().unwrap();

        let mut v2 = CacheManager::new(
            fetcher,
            dir.path(),
            manifest("v2", &["index.html", "missing.css"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        assert!(v2.install().await.is_err());

        assert_eq!(CacheStore::list_versions(dir.path()).unwrap(), vec!["v1"]);
        let response = expect_response(v1.handle(&AssetRequest::get("index.html")).await);
        assert_eq!(response.body, b"v1 page");
    }

    #[tokio::test]
    async fn test_activation_purges_older_versions() {
        let dir = tempfile::tempdir().unwrap();

        let fetcher = MockFetcher::with_pages(&[("index.html", "page")]);
        let mut v1 = CacheManager::new(
            fetcher.clone(),
            dir.path(),
            manifest("v1", &["index.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        v1.install().await.unwrap();
        v1.activate().unwrap();

        let mut v2 = CacheManager::new(
            fetcher,
            dir.path(),
            manifest("v2", &["index.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        v2.install().await.unwrap();
        let removed = v2.activate().unwrap();

        assert_eq!(removed, vec!["v1"]);
        assert_eq!(CacheStore::list_versions(dir.path()).unwrap(), vec!["v2"]);
        assert_eq!(v2.state(), WorkerState::Active);
    }

    #[tokio::test]
    async fn test_navigation_network_first_then_cache() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::with_pages(&[("guide.html", "fresh"), ("offline.html", "off")]);
        let mut manager = CacheManager::new(
            fetcher.clone(),
            dir.path(),
            manifest("v1", &["offline.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        manager.install().await.unwrap();
        manager.activate().unwrap();

        // Online: served live and stored
        let response =
            expect_response(manager.handle(&AssetRequest::navigation("guide.html")).await);
        assert_eq!(response.source, ResponseSource::Network);
        assert_eq!(response.body, b"fresh");

        // Offline: the stored copy answers
        fetcher.go_offline();
        let response =
            expect_response(manager.handle(&AssetRequest::navigation("guide.html")).await);
        assert_eq!(response.source, ResponseSource::Cache);
        assert_eq!(response.body, b"fresh");

        // Unknown navigation falls back to the precached offline document
        let response =
            expect_response(manager.handle(&AssetRequest::navigation("nowhere.html")).await);
        assert_eq!(response.source, ResponseSource::Fallback);
        assert_eq!(response.body, b"off");
    }

    #[tokio::test]
    async fn test_navigation_synthesizes_page_without_fallback_document() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::with_pages(&[("index.html", "x")]);
        let mut manager = CacheManager::new(
            fetcher.clone(),
            dir.path(),
            manifest("v1", &["index.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        manager.install().await.unwrap();
        manager.activate().unwrap();
        fetcher.go_offline();

        let response =
            expect_response(manager.handle(&AssetRequest::navigation("nowhere.html")).await);
        assert_eq!(response.source, ResponseSource::Fallback);
        assert_eq!(response.status, 200);
        assert!(String::from_utf8_lossy(&response.body).contains("Amor Fati"));
    }

    #[tokio::test]
    async fn test_image_failure_gets_placeholder_and_other_gets_503() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MockFetcher::with_pages(&[("index.html", "x")]);
        let mut manager = CacheManager::new(
            fetcher.clone(),
            dir.path(),
            manifest("v1", &["index.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        manager.install().await.unwrap();
        manager.activate().unwrap();
        fetcher.go_offline();

        let image = expect_response(manager.handle(&AssetRequest::get("photo.png")).await);
        assert_eq!(image.status, 200);
        assert_eq!(image.content_type.as_deref(), Some("image/svg+xml"));

        let other = expect_response(manager.handle(&AssetRequest::get("app.css")).await);
        assert_eq!(other.status, 503);
        assert_eq!(other.body, b"Offline");
    }

    #[tokio::test]
    async fn test_cross_origin_response_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://cdn.example/lib.js";
        let fetcher = MockFetcher::with_pages(&[("index.html", "x"), (url, "lib")]);
        let mut manager = CacheManager::new(
            fetcher.clone(),
            dir.path(),
            manifest("v1", &["index.html"]),
            ORIGIN.to_string(),
        )
        .unwrap();
        manager.install().await.unwrap();
        manager.activate().unwrap();

        // Served live but not cached
        let response = expect_response(manager.handle(&AssetRequest::get(url)).await);
        assert_eq!(response.source, ResponseSource::Network);
        assert_eq!(response.body, b"lib");

        fetcher.go_offline();
        let response = expect_response(manager.handle(&AssetRequest::get(url)).await);
        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn test_worker_upgrade_handshake() {
        let dir = tempfile::tempdir().unwrap();

        // Seed an old committed version
        let old = CacheStore::open(dir.path(), "amor-fati-cache-v1").unwrap();
        old.put(&CacheEntry::capture(
            "GET",
            "index.html",
            &FetchedResponse {
                status: 200,
                content_type: Some("text/html".to_string()),
                body: b"old".to_vec(),
            },
        ))
        .unwrap();

        let current = Manifest::current();
        let pages: Vec<(&str, &str)> = current.assets.iter().map(|a| (a.as_str(), "new")).collect();
        let fetcher = MockFetcher::with_pages(&pages);

        let (mut page, worker) = channel::channel();
        let task = tokio::spawn(run_worker(
            fetcher,
            dir.path().to_path_buf(),
            ORIGIN.to_string(),
            worker,
        ));

        let event = tokio::time::timeout(Duration::from_secs(5), page.event())
            .await
            .unwrap();
        assert_eq!(event, Some(WorkerMessage::UpdateReady));

        // Old version still controls until the takeover request
        let response = expect_response(page.fetch(AssetRequest::get("index.html")).await);
        assert_eq!(response.body, b"old");

        page.request_skip_waiting().await;
        let event = tokio::time::timeout(Duration::from_secs(5), page.event())
            .await
            .unwrap();
        assert_eq!(event, Some(WorkerMessage::ReloadPage));

        // v1 entries are gone, the new version serves
        assert_eq!(
            CacheStore::list_versions(dir.path()).unwrap(),
            vec![current.version.clone()]
        );
        let response = expect_response(page.fetch(AssetRequest::get("index.html")).await);
        assert_eq!(response.body, b"new");

        drop(page);
        let _ = tokio::time::timeout(Duration::from_secs(5), task).await;
    }
}
