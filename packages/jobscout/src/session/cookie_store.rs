//! Cookie persistence between runs.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::BoxError;
use crate::types::{CookieJar, Platform};

/// Where saved sessions live. Backends only store and fetch jars;
/// staleness policy belongs to the session manager.
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// The saved jar for a platform, if one exists.
    async fn load(&self, platform: Platform) -> Result<Option<CookieJar>, BoxError>;

    /// Persist a jar, replacing any previous one.
    async fn save(&self, platform: Platform, jar: &CookieJar) -> Result<(), BoxError>;

    /// Drop a saved jar (after a login failure invalidates it).
    async fn clear(&self, platform: Platform) -> Result<(), BoxError>;
}

/// One JSON file per platform under a state directory.
pub struct FileCookieStore {
    dir: PathBuf,
}

impl FileCookieStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, platform: Platform) -> PathBuf {
        self.dir.join(format!("{}_cookies.json", platform.as_str()))
    }
}

#[async_trait]
impl CookieStore for FileCookieStore {
    async fn load(&self, platform: Platform) -> Result<Option<CookieJar>, BoxError> {
        let path = self.path_for(platform);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Box::new(e)),
        };
        let jar = serde_json::from_str(&raw)?;
        Ok(Some(jar))
    }

    async fn save(&self, platform: Platform, jar: &CookieJar) -> Result<(), BoxError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let raw = serde_json::to_string_pretty(jar)?;
        tokio::fs::write(self.path_for(platform), raw).await?;
        Ok(())
    }

    async fn clear(&self, platform: Platform) -> Result<(), BoxError> {
        match tokio::fs::remove_file(self.path_for(platform)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cookie;
    use chrono::Utc;

    fn jar() -> CookieJar {
        CookieJar {
            cookies: vec![Cookie {
                name: "li_at".into(),
                value: "tok".into(),
                domain: ".linkedin.com".into(),
                path: "/".into(),
                expires: None,
                secure: true,
                http_only: true,
            }],
            saved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn round_trips_a_jar_per_platform() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCookieStore::new(dir.path());

        store.save(Platform::LinkedIn, &jar()).await.unwrap();
        assert!(store.load(Platform::Indeed).await.unwrap().is_none());

        let loaded = store.load(Platform::LinkedIn).await.unwrap().unwrap();
        assert_eq!(loaded.cookies[0].name, "li_at");
        assert_eq!(loaded.cookies[0].domain, ".linkedin.com");
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCookieStore::new(dir.path());

        store.clear(Platform::Bayt).await.unwrap();
        store.save(Platform::Bayt, &jar()).await.unwrap();
        store.clear(Platform::Bayt).await.unwrap();
        assert!(store.load(Platform::Bayt).await.unwrap().is_none());
    }
}
