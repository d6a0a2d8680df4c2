//! Per-account cookie persistence.
//!
//! One JSON file under the platform cache directory maps account emails to
//! their cookie stores, so separate accounts never clobber each other.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ClientError;

pub type CookieJar = BTreeMap<String, String>;

pub fn cache_path() -> Result<PathBuf, ClientError> {
    let dir = dirs::cache_dir().ok_or(ClientError::NoCacheDir)?;
    Ok(dir.join("msgr").join("cookies.json"))
}

pub fn load(email: &str) -> Result<Option<CookieJar>, ClientError> {
    load_from(&cache_path()?, email)
}

pub fn save(email: &str, cookies: &CookieJar) -> Result<(), ClientError> {
    save_to(&cache_path()?, email, cookies)
}

pub fn clear(email: &str) -> Result<(), ClientError> {
    clear_in(&cache_path()?, email)
}

/// A missing or corrupt cache reads as empty, which just forces a fresh
/// login.
fn read_all(path: &Path) -> BTreeMap<String, CookieJar> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
        Err(_) => BTreeMap::new(),
    }
}

fn load_from(path: &Path, email: &str) -> Result<Option<CookieJar>, ClientError> {
    let mut all = read_all(path);
    Ok(all.remove(email).filter(|jar| !jar.is_empty()))
}

fn save_to(path: &Path, email: &str, cookies: &CookieJar) -> Result<(), ClientError> {
    let mut all = read_all(path);
    all.insert(email.to_string(), cookies.clone());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&all)?)?;
    Ok(())
}

fn clear_in(path: &Path, email: &str) -> Result<(), ClientError> {
    let mut all = read_all(path);
    all.remove(email);
    if all.is_empty() {
        return match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        };
    }
    fs::write(path, serde_json::to_string_pretty(&all)?)?;
    Ok(())
}
