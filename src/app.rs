//! Application state management.
//!
//! This module contains the core `App` struct that manages all application
//! state, including UI state, the assessment form, persisted data, and the
//! cache worker connection.

use std::path::PathBuf;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{AssetRequest, Intercept, PageHandle, WorkerMessage};
use crate::config::Config;
use crate::models::{
    AppData, Assessment, DimensionScores, Priority, ALL_DIMENSIONS, MAX_DIMENSION_SCORE,
};
use crate::scoring::{compare_latest, recommendations, Evolution};
use crate::store::DataStore;

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for the free-form context note.
/// Matches the input field of the original journal, one short sentence.
const MAX_CONTEXT_LENGTH: usize = 200;

/// Form fields: five dimension scores, the context note, the priority picker.
pub const FORM_FIELD_COUNT: usize = 7;

/// Index of the context field within the form.
pub const CONTEXT_FIELD: usize = 5;

/// Index of the priority field within the form.
pub const PRIORITY_FIELD: usize = 6;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Welcome,
    Assessment,
    History,
    Settings,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Welcome => "Accueil",
            Tab::Assessment => "Évaluation",
            Tab::History => "Historique",
            Tab::Settings => "Réglages",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Welcome => Tab::Assessment,
            Tab::Assessment => Tab::History,
            Tab::History => Tab::Settings,
            Tab::Settings => Tab::Welcome,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Welcome => Tab::Settings,
            Tab::Assessment => Tab::Welcome,
            Tab::History => Tab::Assessment,
            Tab::Settings => Tab::History,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    /// Typing into the context note field
    EditingContext,
    /// Typing an import file path on the Settings tab
    EnteringImportPath,
    ShowingHelp,
    ConfirmingQuit,
    /// First confirmation of a full data wipe
    ConfirmingWipe,
    /// Second confirmation of a full data wipe
    ConfirmingWipeFinal,
    /// A save failed; block until the user acknowledges
    SaveErrorNotice,
    Quitting,
}

/// The in-progress assessment form.
#[derive(Debug, Clone)]
pub struct FormState {
    pub scores: DimensionScores,
    /// Currently focused field (dimension index, context, or priority)
    pub field: usize,
    pub context: String,
    pub priority: Priority,
}

impl FormState {
    pub fn new(priority: Priority) -> Self {
        Self {
            scores: DimensionScores::default(),
            field: 0,
            context: String::new(),
            priority,
        }
    }
}

/// What the last submission produced, shown until the form is reset.
#[derive(Debug, Clone)]
pub struct SubmissionSummary {
    pub total: u8,
    pub evolution: Evolution,
    pub recommendations: Vec<String>,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub store: DataStore,
    pub data: AppData,

    // Cache worker connection (absent in offline mode)
    page: Option<PageHandle>,
    worker_task: Option<JoinHandle<()>>,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub form: FormState,
    pub last_submission: Option<SubmissionSummary>,
    pub history_selection: usize,
    pub import_path: String,

    // Guide document fetched through the cache worker
    pub guide: Option<String>,

    // Worker upgrade state
    pub update_ready: bool,
    reloaded_once: bool,

    // Status bar
    pub status_message: Option<String>,
    pub save_error: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        debug!("App::new() starting");
        let data_dir = config.data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        let store = DataStore::new(data_dir)?;
        let data = store.load();
        info!(assessments = data.assessments.len(), "Data loaded");

        let priority = data.priority.unwrap_or(Priority::None);
        Ok(Self {
            config,
            store,
            data,
            page: None,
            worker_task: None,
            state: AppState::Normal,
            current_tab: Tab::Welcome,
            form: FormState::new(priority),
            last_submission: None,
            history_selection: 0,
            import_path: String::new(),
            guide: None,
            update_ready: false,
            reloaded_once: false,
            status_message: None,
            save_error: None,
        })
    }

    /// Build an app against a throwaway store, for tests only.
    #[cfg(test)]
    pub(crate) fn with_store(store: DataStore) -> Self {
        let data = store.load();
        Self {
            config: Config::default(),
            store,
            data,
            page: None,
            worker_task: None,
            state: AppState::Normal,
            current_tab: Tab::Welcome,
            form: FormState::new(Priority::None),
            last_submission: None,
            history_selection: 0,
            import_path: String::new(),
            guide: None,
            update_ready: false,
            reloaded_once: false,
            status_message: None,
            save_error: None,
        }
    }

    /// Connect the cache worker spawned at startup.
    pub fn attach_worker(&mut self, page: PageHandle, task: JoinHandle<()>) {
        self.page = Some(page);
        self.worker_task = Some(task);
    }

    pub fn has_worker(&self) -> bool {
        self.page.is_some()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Persist the current data. Every mutation funnels through here so a
    /// failed write always surfaces as a blocking notice.
    fn commit(&mut self) {
        if let Err(e) = self.store.save(&self.data) {
            warn!(error = %e, "Failed to save data");
            self.save_error = Some(format!("Échec de la sauvegarde : {}", e));
            self.state = AppState::SaveErrorNotice;
        }
    }

    /// Acknowledge a save failure and return to normal interaction.
    pub fn acknowledge_save_error(&mut self) {
        self.save_error = None;
        self.state = AppState::Normal;
    }

    // ========================================================================
    // Assessment form
    // ========================================================================

    pub fn next_field(&mut self) {
        self.form.field = (self.form.field + 1) % FORM_FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.form.field = (self.form.field + FORM_FIELD_COUNT - 1) % FORM_FIELD_COUNT;
    }

    /// Adjust the focused dimension score, clamped to the valid range.
    pub fn adjust_score(&mut self, delta: i8) {
        if let Some(dimension) = ALL_DIMENSIONS.get(self.form.field) {
            let current = self.form.scores.get(*dimension) as i8;
            let adjusted = (current + delta).clamp(0, MAX_DIMENSION_SCORE as i8);
            self.form.scores.set(*dimension, adjusted as u8);
        }
    }

    /// Set the focused dimension score directly (digit keys).
    pub fn set_score(&mut self, score: u8) {
        if let Some(dimension) = ALL_DIMENSIONS.get(self.form.field) {
            self.form.scores.set(*dimension, score.min(MAX_DIMENSION_SCORE));
        }
    }

    pub fn cycle_priority(&mut self) {
        self.form.priority = self.form.priority.next();
    }

    pub fn push_context_char(&mut self, c: char) {
        if self.form.context.chars().count() < MAX_CONTEXT_LENGTH {
            self.form.context.push(c);
        }
    }

    pub fn pop_context_char(&mut self) {
        self.form.context.pop();
    }

    /// Record the current form as a new assessment. The priority choice is
    /// persisted for the next session and the submission summary (total,
    /// evolution, recommendations) stays visible until the form resets.
    pub fn submit_assessment(&mut self) {
        let priority = match self.form.priority {
            Priority::None => None,
            p => Some(p),
        };
        let assessment = Assessment::new(
            self.form.scores.clone(),
            self.form.context.trim().to_string(),
            priority,
        );
        let total = assessment.total_score;

        self.data.priority = priority;
        self.data.record(assessment);
        let evolution = compare_latest(&self.data.assessments);
        let recs = recommendations(&self.form.scores, priority);
        self.commit();

        info!(total, "Assessment recorded");
        self.last_submission = Some(SubmissionSummary {
            total,
            evolution,
            recommendations: recs,
        });
        self.history_selection = self.data.assessments.len().saturating_sub(1);
        self.status_message = Some(format!("Évaluation enregistrée ({}/40)", total));
    }

    /// Clear the form for a fresh assessment, keeping the saved priority.
    pub fn reset_form(&mut self) {
        let priority = self.data.priority.unwrap_or(Priority::None);
        self.form = FormState::new(priority);
        self.last_submission = None;
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn history_up(&mut self) {
        self.history_selection = self.history_selection.saturating_sub(1);
    }

    pub fn history_down(&mut self) {
        if !self.data.assessments.is_empty() {
            self.history_selection =
                (self.history_selection + 1).min(self.data.assessments.len() - 1);
        }
    }

    pub fn selected_assessment(&self) -> Option<&Assessment> {
        self.data.assessments.get(self.history_selection)
    }

    // ========================================================================
    // Settings: export, import, wipe
    // ========================================================================

    /// Write the data to a dated export file in the current directory.
    pub fn export_data(&mut self) {
        let path = PathBuf::from(DataStore::default_export_name());
        match self.store.export(&self.data, &path) {
            Ok(()) => {
                info!(?path, "Data exported");
                self.status_message = Some(format!("Exporté vers {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                self.status_message = Some(format!("Échec de l'export : {}", e));
            }
        }
    }

    pub fn start_import(&mut self) {
        self.import_path.clear();
        self.state = AppState::EnteringImportPath;
    }

    /// Import the file at the typed path, replacing all current data.
    /// The durable write goes through `commit`, so a failed save blocks.
    pub fn finish_import(&mut self) {
        let path = PathBuf::from(self.import_path.trim());
        self.state = AppState::Normal;
        match DataStore::parse_import(&path) {
            Ok(data) => {
                info!(assessments = data.assessments.len(), "Data imported");
                self.status_message =
                    Some(format!("Import réussi ({} évaluations)", data.assessments.len()));
                self.data = data;
                self.history_selection = 0;
                self.reset_form();
                self.commit();
            }
            Err(e) => {
                warn!(error = %e, "Import failed");
                self.status_message = Some(format!("Échec de l'import : {}", e));
            }
        }
    }

    /// Erase everything after the double confirmation.
    pub fn wipe_data(&mut self) {
        self.data = AppData::default();
        self.commit();
        self.history_selection = 0;
        self.reset_form();
        self.state = AppState::Normal;
        self.status_message = Some("Toutes les données ont été effacées".to_string());
    }

    // ========================================================================
    // Cache worker
    // ========================================================================

    /// Fetch the guide document through the cache worker so it stays
    /// readable offline.
    pub async fn load_guide(&mut self) {
        let Some(page) = &self.page else {
            return;
        };
        match page.fetch(AssetRequest::navigation("index.html")).await {
            Intercept::Response(response) if response.status == 200 => {
                self.guide = Some(String::from_utf8_lossy(&response.body).to_string());
            }
            Intercept::Response(response) => {
                debug!(status = response.status, "Guide fetch returned an error page");
            }
            Intercept::PassThrough => {
                debug!("Cache worker gone, guide unavailable");
            }
        }
    }

    /// Ask the waiting worker version to take over now.
    pub async fn apply_update(&mut self) {
        if let Some(page) = &self.page {
            page.request_skip_waiting().await;
        }
    }

    /// Drain worker notifications (called once per main-loop tick).
    pub fn check_worker_events(&mut self) {
        let Some(page) = &mut self.page else {
            return;
        };
        while let Some(event) = page.try_event() {
            match event {
                WorkerMessage::UpdateReady => {
                    self.update_ready = true;
                    self.status_message =
                        Some("Mise à jour disponible - appuyez sur [u]".to_string());
                }
                WorkerMessage::ReloadPage => {
                    // Reload exactly once per takeover
                    if !self.reloaded_once {
                        self.reloaded_once = true;
                        self.update_ready = false;
                        self.data = self.store.load();
                        self.guide = None;
                        self.status_message = Some("Application mise à jour".to_string());
                        info!("Reloaded after cache takeover");
                    }
                }
            }
        }
    }
}
