//! Shared test doubles.
#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Result, bail};
use filmport_api::omdb::{
    LocalOmdbApi, MovieRecord, OmdbSearchResponse, OmdbTitle, PosterImage, SearchParams,
};
use rusqlite::Connection;
use url::Url;

/// Runs once before the next download is served.
type DownloadHook = Box<dyn FnOnce() + Send>;

/// Mock API that only serves poster downloads.
pub struct MockOmdbApi {
    pub download_calls: AtomicU32,
    pub failing_urls: Mutex<HashSet<String>>,
    pub download_hook: Mutex<Option<DownloadHook>>,
}

impl MockOmdbApi {
    pub fn new() -> Self {
        Self {
            download_calls: AtomicU32::new(0),
            failing_urls: Mutex::new(HashSet::new()),
            download_hook: Mutex::new(None),
        }
    }

    pub fn before_download(&self, hook: impl FnOnce() + Send + 'static) {
        *self.download_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn fail_download(&self, url: &str) {
        self.failing_urls.lock().unwrap().insert(String::from(url));
    }

    pub fn downloads(&self) -> u32 {
        self.download_calls.load(Ordering::SeqCst)
    }
}

impl LocalOmdbApi for MockOmdbApi {
    async fn search(&self, _params: &SearchParams) -> Result<OmdbSearchResponse> {
        panic!("importer must not search");
    }

    async fn title(&self, _imdb_id: &str) -> Result<OmdbTitle> {
        panic!("importer must not fetch details");
    }

    async fn download(&self, url: &Url) -> Result<PosterImage> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let hook = self.download_hook.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        if self.failing_urls.lock().unwrap().contains(url.as_str()) {
            bail!("HTTP 404 Not Found for {url}");
        }
        Ok(PosterImage {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            content_type: Some(String::from("image/jpeg")),
        })
    }
}

pub fn setup_db() -> (Connection, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let conn = filmport_db::open_db(Some(&PathBuf::from(dir.path()))).unwrap();
    (conn, dir)
}

pub fn make_record(external_id: &str, title: &str, genres: &[&str]) -> MovieRecord {
    MovieRecord {
        external_id: String::from(external_id),
        title: String::from(title),
        year: String::from("2018"),
        plot: format!("{title} plot."),
        genres: genres.iter().map(|g| String::from(*g)).collect(),
        poster_url: Some(format!("https://img.example/{external_id}.jpg")),
    }
}
