//! `--json` mode: print the projected calendar for a web calendar widget.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use fisiocal_core::api::ApiClient;
use fisiocal_core::cache::CacheManager;
use fisiocal_core::config::Config;
use fisiocal_core::models::Student;
use fisiocal_core::Projector;

/// Fetch the roster, project it and write the events to stdout.
/// Falls back to the cached roster when the backend is unreachable.
pub async fn export_json(reference_date: NaiveDate, physiotherapist: Option<i64>) -> Result<()> {
    let config = Config::load()?;
    let cache = CacheManager::new(config.cache_dir()?)?;

    let mut api = ApiClient::new(&config.api_base_url())?;
    if let Some(token) = config.api_token() {
        api.set_token(token);
    }

    let students = match api.fetch_students(physiotherapist).await {
        Ok(students) => {
            if let Err(e) = cache.save_students(physiotherapist, &students) {
                warn!(error = %e, "Failed to cache roster");
            }
            students
        }
        Err(e) => {
            warn!(error = %e, "Roster fetch failed, using cache");
            cached_roster(&cache, physiotherapist)
                .with_context(|| format!("Failed to fetch roster: {:#}", e))?
        }
    };

    let projector = Projector::new().with_color_hint(config.event_color());
    let events = projector.project(&students, reference_date);
    info!(count = events.len(), "Exporting events");

    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

fn cached_roster(cache: &CacheManager, physiotherapist: Option<i64>) -> Result<Vec<Student>> {
    cache
        .load_students(physiotherapist)?
        .map(|cached| cached.data)
        .context("No cached roster available")
}
