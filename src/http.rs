use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT_SECS: u64 = 15;
const FETCH_ATTEMPTS: u32 = 3;

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "nhl_corsi";
const CACHE_FILE: &str = "response_cache.json";

static CLIENT: OnceCell<Client> = OnceCell::new();
static CACHE: Mutex<Option<ResponseCacheFile>> = Mutex::new(None);

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ResponseCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    fetched_at: u64,
}

/// Fetch a JSON body, retrying transient failures with exponential backoff.
///
/// Completed-game payloads never change, so a cached body is served without
/// revalidation. Set NHL_CORSI_REFRESH=1 to bypass the cache for a run.
pub fn fetch_json_cached(client: &Client, url: &str) -> Result<String> {
    if !refresh_requested()
        && let Some(entry) = cached_entry(url)
    {
        return Ok(entry.body);
    }

    let mut last_err = None;
    for attempt in 0..FETCH_ATTEMPTS {
        match fetch_once(client, url) {
            Ok(body) => {
                store_entry(url, &body);
                return Ok(body);
            }
            Err(err) => {
                last_err = Some(err);
                if attempt + 1 < FETCH_ATTEMPTS {
                    std::thread::sleep(Duration::from_millis(500 << attempt));
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("fetch failed: {url}")))
}

fn fetch_once(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .header(USER_AGENT, "Mozilla/5.0")
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {status}: {url}"));
    }
    Ok(body)
}

fn refresh_requested() -> bool {
    std::env::var("NHL_CORSI_REFRESH")
        .map(|raw| matches!(raw.trim(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn cached_entry(url: &str) -> Option<CacheEntry> {
    let mut guard = CACHE.lock().expect("response cache lock poisoned");
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.entries.get(url).cloned()
}

fn store_entry(url: &str, body: &str) {
    let mut guard = CACHE.lock().expect("response cache lock poisoned");
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(
        url.to_string(),
        CacheEntry {
            body: body.to_string(),
            fetched_at: now_secs(),
        },
    );
    let _ = save_cache_file(cache);
}

fn load_cache_file() -> ResponseCacheFile {
    let Some(path) = cache_path() else {
        return ResponseCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return ResponseCacheFile::default();
    };
    let cache = serde_json::from_str::<ResponseCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return ResponseCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &ResponseCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize response cache")?;
    fs::write(&tmp, json).context("write response cache")?;
    fs::rename(&tmp, &path).context("swap response cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR).join(CACHE_FILE))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
