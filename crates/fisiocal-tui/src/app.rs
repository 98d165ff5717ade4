//! Application state management for fisiocal.
//!
//! This module contains the core `App` struct that manages all application
//! state: the roster snapshot, the projected calendar, the physiotherapist
//! filter, UI selection, and background refresh coordination.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, Months, NaiveDate};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use fisiocal_core::api::ApiClient;
use fisiocal_core::cache::CacheManager;
use fisiocal_core::config::Config;
use fisiocal_core::models::{CalendarEvent, Physiotherapist, Student};
use fisiocal_core::{ProjectionWindow, Projector};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// One refresh sends at most four messages.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Which pane has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Events,
    Students,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from the background refresh task back to the UI task.
enum RefreshResult {
    /// Roster for a physiotherapist filter (None = all students)
    Students(Option<i64>, Vec<Student>),
    Physiotherapists(Vec<Physiotherapist>),
    /// Signal that all refresh tasks have completed
    RefreshComplete,
    /// An error occurred during refresh
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    pub cache: CacheManager,
    pub projector: Projector,

    // UI State
    pub state: AppState,
    pub focus: Focus,
    pub event_selection: usize,
    pub student_selection: usize,
    pub status_message: Option<String>,

    // Calendar state
    pub today: NaiveDate,
    pub reference_date: NaiveDate,
    pub physiotherapist_filter: Option<i64>,

    // Data
    pub physiotherapists: Vec<Physiotherapist>,
    pub students: Vec<Student>,
    pub events: Vec<CalendarEvent>,
    pub roster_age: String,

    refreshing: bool,
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,
}

impl App {
    /// Create a new application instance.
    ///
    /// `today` is the date the calendar opens on. `filter` overrides the
    /// physiotherapist filter saved in the config.
    pub fn new(today: NaiveDate, filter: Option<i64>) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");
        let cache = CacheManager::new(cache_dir)?;

        let mut api = ApiClient::new(&config.api_base_url())?;
        match config.api_token() {
            Some(token) => api.set_token(token),
            None => debug!("No API token configured, sending unauthenticated requests"),
        }

        let projector = Projector::new().with_color_hint(config.event_color());
        let physiotherapist_filter = filter.or(config.last_physiotherapist);

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            api,
            cache,
            projector,

            state: AppState::Normal,
            focus: Focus::Events,
            event_selection: 0,
            student_selection: 0,
            status_message: None,

            today,
            reference_date: today,
            physiotherapist_filter,

            physiotherapists: Vec::new(),
            students: Vec::new(),
            events: Vec::new(),
            roster_age: "nunca".to_string(),

            refreshing: false,
            refresh_rx: rx,
            refresh_tx: tx,
        })
    }

    // =========================================================================
    // Cache
    // =========================================================================

    /// Show whatever roster is cached for the current filter.
    pub fn load_from_cache(&mut self) {
        if let Ok(Some(cached)) = self.cache.load_physiotherapists() {
            self.physiotherapists = cached.data;
        }

        self.students = match self.cache.load_students(self.physiotherapist_filter) {
            Ok(Some(cached)) => cached.data,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load cached roster");
                Vec::new()
            }
        };
        self.roster_age = self.cache.roster_age(self.physiotherapist_filter);
        self.reproject();
    }

    pub fn is_cache_stale(&self) -> bool {
        self.cache.is_roster_stale(self.physiotherapist_filter)
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    // =========================================================================
    // Projection
    // =========================================================================

    /// Rebuild the calendar from the current roster and reference date.
    pub fn reproject(&mut self) {
        self.events = self.projector.project(&self.students, self.reference_date);
        self.event_selection = clamp_selection(self.event_selection, self.events.len());
        self.student_selection = 0;
    }

    pub fn window(&self) -> ProjectionWindow {
        ProjectionWindow::containing(self.reference_date)
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.events.get(self.event_selection)
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refetch the roster and physiotherapists.
    pub fn refresh_background(&mut self) {
        if self.refreshing {
            return;
        }
        info!(filter = ?self.physiotherapist_filter, "Starting background refresh");

        let tx = self.refresh_tx.clone();
        let api = self.api.clone();
        let filter = self.physiotherapist_filter;

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, api, filter).await;
        });

        self.refreshing = true;
        self.status_message = Some("Atualizando...".to_string());
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Fetch roster and physiotherapists concurrently and report back.
    async fn execute_background_refresh(
        tx: mpsc::Sender<RefreshResult>,
        api: ApiClient,
        filter: Option<i64>,
    ) {
        let (students, physiotherapists) =
            futures::join!(api.fetch_students(filter), api.fetch_physiotherapists());

        match students {
            Ok(data) => Self::send_result(&tx, RefreshResult::Students(filter, data)).await,
            Err(e) => {
                error!(error = %e, "Roster fetch failed");
                Self::send_result(&tx, RefreshResult::Error(format!("{:#}", e))).await;
            }
        }

        match physiotherapists {
            Ok(data) => Self::send_result(&tx, RefreshResult::Physiotherapists(data)).await,
            // Physiotherapist accounts cannot list colleagues; not an error for the calendar
            Err(e) => debug!(error = %e, "Physiotherapist list unavailable"),
        }

        Self::send_result(&tx, RefreshResult::RefreshComplete).await;
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.refresh_rx.try_recv() {
            self.process_refresh_result(result);
        }
    }

    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Students(filter, data) => {
                if let Err(e) = self.cache.save_students(filter, &data) {
                    warn!(error = %e, "Failed to cache roster");
                }
                // The filter may have changed while the fetch was in flight
                if filter == self.physiotherapist_filter {
                    self.students = data;
                    self.roster_age = self.cache.roster_age(filter);
                    self.reproject();
                }
            }
            RefreshResult::Physiotherapists(data) => {
                if let Err(e) = self.cache.save_physiotherapists(&data) {
                    warn!(error = %e, "Failed to cache physiotherapists");
                }
                self.physiotherapists = data;
            }
            RefreshResult::RefreshComplete => {
                self.refreshing = false;
                if !matches!(self.status_message.as_deref(), Some(m) if m.starts_with("Erro")) {
                    self.status_message = Some(format!("{} horários projetados", self.events.len()));
                }
            }
            RefreshResult::Error(message) => {
                self.status_message = Some(format!("Erro: {}", message));
            }
        }
    }

    // =========================================================================
    // Filter and navigation
    // =========================================================================

    pub fn filter_label(&self) -> String {
        match self.physiotherapist_filter {
            None => "Todos".to_string(),
            Some(id) => self
                .physiotherapists
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.full_name())
                .unwrap_or_else(|| format!("#{}", id)),
        }
    }

    /// Move to the next (or previous) physiotherapist, wrapping through "Todos".
    pub fn cycle_physiotherapist(&mut self, forward: bool) {
        let next = next_filter(self.physiotherapist_filter, &self.physiotherapists, forward);
        if next == self.physiotherapist_filter {
            return;
        }
        self.set_filter(next);
    }

    fn set_filter(&mut self, filter: Option<i64>) {
        debug!(?filter, "Physiotherapist filter changed");
        self.physiotherapist_filter = filter;
        self.config.last_physiotherapist = filter;
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        self.event_selection = 0;
        self.load_from_cache();
        if self.is_cache_stale() {
            // A refresh for the previous filter may still be running
            self.refreshing = false;
            self.refresh_background();
        }
    }

    pub fn next_month(&mut self) {
        self.reference_date = shift_month(self.reference_date, self.today, 1);
        self.event_selection = 0;
        self.reproject();
    }

    pub fn prev_month(&mut self) {
        self.reference_date = shift_month(self.reference_date, self.today, -1);
        self.event_selection = 0;
        self.reproject();
    }

    pub fn go_today(&mut self) {
        self.reference_date = self.today;
        self.event_selection = 0;
        self.reproject();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    fn selection_len(&self) -> usize {
        match self.focus {
            Focus::Events => self.events.len(),
            Focus::Students => self
                .selected_event()
                .map(|e| e.grouped_students.len())
                .unwrap_or(0),
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.focus {
            Focus::Events => &mut self.event_selection,
            Focus::Students => &mut self.student_selection,
        }
    }

    /// Move the selection in the focused pane by `delta` rows.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.selection_len();
        let selection = self.selection_mut();
        let target = if delta.is_negative() {
            selection.saturating_sub(delta.unsigned_abs())
        } else {
            selection.saturating_add(delta.unsigned_abs())
        };
        *selection = clamp_selection(target, len);

        if self.focus == Focus::Events {
            self.student_selection = 0;
        }
    }

    pub fn select_first(&mut self) {
        *self.selection_mut() = 0;
        if self.focus == Focus::Events {
            self.student_selection = 0;
        }
    }

    pub fn select_last(&mut self) {
        let len = self.selection_len();
        *self.selection_mut() = len.saturating_sub(1);
        if self.focus == Focus::Events {
            self.student_selection = 0;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Events if self.selected_event().is_some() => Focus::Students,
            Focus::Events => Focus::Events,
            Focus::Students => Focus::Events,
        };
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn clamp_selection(selection: usize, len: usize) -> usize {
    selection.min(len.saturating_sub(1))
}

/// Filter after `current` in the order: Todos, physio 1, physio 2, ...
fn next_filter(current: Option<i64>, physiotherapists: &[Physiotherapist], forward: bool) -> Option<i64> {
    let mut order: Vec<Option<i64>> = vec![None];
    order.extend(physiotherapists.iter().map(|p| Some(p.id)));

    let position = order.iter().position(|f| *f == current).unwrap_or(0);
    let next = if forward {
        (position + 1) % order.len()
    } else {
        (position + order.len() - 1) % order.len()
    };
    order[next]
}

/// Reference date `months` away from `reference`. Landing on the current
/// month gives back `today`; any other month starts on its 1st.
fn shift_month(reference: NaiveDate, today: NaiveDate, months: i32) -> NaiveDate {
    let first = reference.with_day(1).unwrap_or(reference);
    let shifted = if months >= 0 {
        first.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        first.checked_sub_months(Months::new(months.unsigned_abs()))
    }
    .unwrap_or(first);

    if shifted.year() == today.year() && shifted.month() == today.month() {
        today
    } else {
        shifted
    }
}
