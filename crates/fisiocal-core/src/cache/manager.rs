use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Physiotherapist, Student};

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "agora".to_string()
        } else if minutes < 60 {
            format!("há {}min", minutes)
        } else if minutes < 1440 {
            format!("há {}h", (minutes + 30) / 60)
        } else {
            format!("há {}d", (minutes + 720) / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Stores the last fetched roster per physiotherapist filter.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(self.cache_path(name), contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        Ok(())
    }

    fn students_key(physiotherapist: Option<i64>) -> String {
        match physiotherapist {
            Some(id) => format!("students_{}", id),
            None => "students_all".to_string(),
        }
    }

    // ===== Students =====

    pub fn load_students(&self, physiotherapist: Option<i64>) -> Result<Option<CachedData<Vec<Student>>>> {
        self.load(&Self::students_key(physiotherapist))
    }

    pub fn save_students(&self, physiotherapist: Option<i64>, students: &[Student]) -> Result<()> {
        self.save(&Self::students_key(physiotherapist), &students)
    }

    // ===== Physiotherapists =====

    pub fn load_physiotherapists(&self) -> Result<Option<CachedData<Vec<Physiotherapist>>>> {
        self.load("physiotherapists")
    }

    pub fn save_physiotherapists(&self, physiotherapists: &[Physiotherapist]) -> Result<()> {
        self.save("physiotherapists", &physiotherapists)
    }

    // ===== Cache Age Information =====

    /// Age of the cached roster for a filter, "nunca" if never fetched.
    pub fn roster_age(&self, physiotherapist: Option<i64>) -> String {
        match self.load_students(physiotherapist) {
            Ok(Some(cached)) => cached.age_display(),
            Ok(None) => "nunca".to_string(),
            Err(e) => {
                debug!(error = %e, "Failed to load roster cache for age display");
                "nunca".to_string()
            }
        }
    }

    /// Missing or unreadable cache counts as stale.
    pub fn is_roster_stale(&self, physiotherapist: Option<i64>) -> bool {
        match self.load_students(physiotherapist) {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true,
            Err(e) => {
                debug!(error = %e, "Failed to load roster cache for staleness check");
                true
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slot;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display() {
        let mut cached = CachedData::new(vec![1]);
        assert_eq!(cached.age_display(), "agora");

        cached.cached_at = Utc::now() - Duration::minutes(12);
        assert_eq!(cached.age_display(), "há 12min");

        cached.cached_at = Utc::now() - Duration::minutes(100);
        assert_eq!(cached.age_display(), "há 2h");

        cached.cached_at = Utc::now() - Duration::hours(50);
        assert_eq!(cached.age_display(), "há 2d");

        cached.cached_at = Utc::now() + Duration::minutes(5);
        assert_eq!(cached.age_display(), "agora");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
    }

    #[test]
    fn test_roster_round_trip_per_filter() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().join("fisiocal")).unwrap();

        assert!(cache.load_students(None).unwrap().is_none());
        assert!(cache.is_roster_stale(None));
        assert_eq!(cache.roster_age(None), "nunca");

        let all = vec![
            Student::new(1, "Ana", vec![Slot::new(0, 8)]),
            Student::new(2, "Bruno", vec![]),
        ];
        let filtered = vec![Student::new(1, "Ana", vec![Slot::new(0, 8)])];
        cache.save_students(None, &all).unwrap();
        cache.save_students(Some(3), &filtered).unwrap();

        assert_eq!(cache.load_students(None).unwrap().unwrap().data, all);
        assert_eq!(cache.load_students(Some(3)).unwrap().unwrap().data, filtered);
        assert!(cache.load_students(Some(4)).unwrap().is_none());
        assert!(!cache.is_roster_stale(None));
        assert_eq!(cache.roster_age(Some(3)), "agora");
    }

    #[test]
    fn test_physiotherapists_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        let physios = vec![Physiotherapist {
            id: 3,
            first_name: "Carla".to_string(),
            last_name: "Mendes".to_string(),
        }];
        cache.save_physiotherapists(&physios).unwrap();
        assert_eq!(cache.load_physiotherapists().unwrap().unwrap().data, physios);
    }

    #[test]
    fn test_corrupt_cache_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        std::fs::write(dir.path().join("students_all.json"), "not json").unwrap();

        assert!(cache.load_students(None).is_err());
        assert!(cache.is_roster_stale(None));
        assert_eq!(cache.roster_age(None), "nunca");
    }
}
