// src/lib.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

// --- Declare modules ---
pub mod analytics;
pub mod api;
pub mod catalog;
mod config;
pub mod confirm;
pub mod forms;
pub mod memory;
pub mod models;
pub mod workout_list;

// --- Expose public types ---
pub use analytics::{one_rep_max, ExerciseHistory};
pub use api::{remote_message, ApiError, Backend, HttpBackend};
pub use catalog::{CatalogOrder, CatalogState, ExerciseCatalog};
pub use config::{
    get_config_path as get_config_path_util, load_config as load_config_util, parse_color,
    save_config as save_config_util, validate_server_url, Config, ConfigError, StandardColor,
    Theme, Units, DEFAULT_SERVER_URL,
};
pub use confirm::Confirmation;
pub use forms::{Change, ExerciseForm, FormError, FormMessage, WorkoutForm};
pub use models::{
    Exercise, NewSet, NewWorkout, PersonalRecord, SetUpdate, Workout, WorkoutSet,
    UNKNOWN_EXERCISE, WORKOUT_DATE_FORMAT,
};
pub use workout_list::{
    EditStatus, LoadState, NewSetForm, SetEditor, SetsTicket, WorkoutDetail, WorkoutList,
};

/// Per-invocation overrides of the persisted connection settings.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub server_url: Option<String>,
    pub user_id: Option<i64>,
}

pub struct AppService {
    pub config: Config,
    pub config_path: PathBuf,
    api: Arc<dyn Backend>,
}

fn http_backend(config: &Config) -> Result<Arc<dyn Backend>> {
    let backend = HttpBackend::new(
        &config.server_url,
        config.user_id,
        &config.user_role,
        config.request_timeout(),
    )
    .with_context(|| format!("Failed to build HTTP client for {}", config.server_url))?;
    Ok(Arc::new(backend))
}

impl AppService {
    /// Initializes the service from the config file.
    /// # Errors
    /// Returns `anyhow::Error` if the config cannot be located, loaded, or the
    /// HTTP client cannot be built.
    pub fn initialize() -> Result<Self> {
        Self::initialize_with(&ConnectionOverrides::default())
    }

    /// Like [`AppService::initialize`], with overrides that are not persisted.
    /// # Errors
    /// See [`AppService::initialize`]. Also fails on an invalid override URL.
    pub fn initialize_with(overrides: &ConnectionOverrides) -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let mut config = config::load_config(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        if let Some(url) = &overrides.server_url {
            config.server_url = validate_server_url(url)?;
        }
        if let Some(user_id) = overrides.user_id {
            config.user_id = user_id;
        }

        let api = http_backend(&config)?;
        info!(
            "Using server {} as user {} ({})",
            config.server_url, config.user_id, config.user_role
        );
        Ok(Self {
            config,
            config_path,
            api,
        })
    }

    /// Builds a service over an arbitrary backend, e.g. `memory::InMemoryBackend`.
    pub fn with_backend(config: Config, config_path: PathBuf, api: Arc<dyn Backend>) -> Self {
        Self {
            config,
            config_path,
            api,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub const fn user_id(&self) -> i64 {
        self.config.user_id
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save_config(&self.config_path, &self.config)
    }

    /// Persists a new server URL and reconnects to it.
    /// # Errors
    /// - `ConfigError::InvalidServerUrl` if the URL has no http(s) scheme.
    /// - `ConfigError` variants if saving fails.
    pub fn set_server_url(&mut self, url: &str) -> Result<()> {
        self.config.server_url = validate_server_url(url)?;
        self.save_config()?;
        self.api = http_backend(&self.config)?;
        Ok(())
    }

    /// Persists the user (and optionally role) sent with every request.
    /// # Errors
    /// Returns `ConfigError` on an empty role or if saving fails.
    pub fn set_user(&mut self, user_id: i64, role: Option<&str>) -> Result<()> {
        self.config.user_id = user_id;
        if let Some(role) = role {
            self.config.user_role = config::validate_user_role(role)?;
        }
        self.save_config()?;
        self.api = http_backend(&self.config)?;
        Ok(())
    }

    // --- Exercises ---

    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        self.api
            .list_exercises()
            .context("Failed to fetch exercises")
    }

    pub fn create_exercise(&self, name: &str, description: &str) -> Result<()> {
        self.api
            .create_exercise(name, description)
            .with_context(|| format!("Failed to create exercise '{name}'"))?;
        info!("Exercise '{}' created", name);
        Ok(())
    }

    // --- Workouts ---

    pub fn list_workouts(&self) -> Result<Vec<Workout>> {
        self.api
            .list_workouts(self.user_id())
            .with_context(|| format!("Failed to fetch workouts for user {}", self.user_id()))
    }

    pub fn create_workout(&self, workout: &NewWorkout) -> Result<()> {
        self.api
            .create_workout(self.user_id(), workout)
            .context("Failed to create workout")
    }

    pub fn delete_workout(&self, workout_id: i64) -> Result<()> {
        self.api
            .delete_workout(workout_id)
            .with_context(|| format!("Failed to delete workout {workout_id}"))
    }

    // --- Sets ---

    pub fn list_sets(&self, workout_id: i64) -> Result<Vec<WorkoutSet>> {
        self.api
            .list_sets(workout_id)
            .with_context(|| format!("Failed to fetch sets for workout {workout_id}"))
    }

    pub fn add_set(&self, workout_id: i64, set: &NewSet) -> Result<()> {
        self.api
            .create_set(workout_id, set)
            .with_context(|| format!("Failed to add set to workout {workout_id}"))?;
        info!(
            "Added set ({} x {}) to workout {}",
            set.weight, set.reps, workout_id
        );
        Ok(())
    }

    pub fn update_set(&self, set_id: i64, update: &SetUpdate) -> Result<()> {
        self.api
            .update_set(set_id, update)
            .with_context(|| format!("Failed to update set {set_id}"))?;
        info!("Set {} updated", set_id);
        Ok(())
    }

    pub fn delete_set(&self, set_id: i64) -> Result<()> {
        self.api
            .delete_set(set_id)
            .with_context(|| format!("Failed to delete set {set_id}"))
    }

    // --- Analytics ---

    pub fn personal_record(&self, exercise_id: i64) -> Result<PersonalRecord> {
        self.api
            .personal_record(self.user_id(), exercise_id)
            .with_context(|| format!("Failed to fetch personal record for exercise {exercise_id}"))
    }

    pub fn exercise_history(&self, exercise_id: i64) -> Result<Vec<WorkoutSet>> {
        self.api
            .exercise_sets(self.user_id(), exercise_id)
            .with_context(|| format!("Failed to fetch history for exercise {exercise_id}"))
    }
}
