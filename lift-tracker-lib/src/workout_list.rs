//src/workout_list.rs
use crate::api::remote_message;
use crate::confirm::Confirmation;
use crate::forms::{parse_number, Change, FormError};
use crate::models::{self, Exercise, NewSet, SetUpdate, Workout, WorkoutSet};
use crate::AppService;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub const SET_UPDATED: &str = "Set updated successfully!";
pub const SET_UPDATE_FAILED: &str = "Error updating set.";
pub const WORKOUT_DELETE_PROMPT: &str =
    "Are you sure you want to delete this workout? This action cannot be undone.";
pub const SET_DELETE_PROMPT: &str = "Are you sure you want to delete this set?";
pub const WORKOUT_DELETE_FAILED: &str =
    "An error occurred while deleting the workout. Please try again.";
pub const SET_DELETE_FAILED: &str = "An error occurred while deleting the set. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Identifies one set-list fetch. Only the most recently issued ticket may
/// write its result into the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetsTicket {
    workout_id: i64,
    generation: u64,
}

/// Buffers of the add-set form, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewSetForm {
    pub exercise_id: Option<i64>,
    pub weight: String,
    pub reps: String,
    pub comment: String,
}

impl NewSetForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn to_new_set(&self) -> Result<NewSet, FormError> {
        let exercise_id = self.exercise_id.ok_or(FormError::SetFieldsRequired)?;
        if self.weight.trim().is_empty() || self.reps.trim().is_empty() {
            return Err(FormError::SetFieldsRequired);
        }
        Ok(NewSet {
            exercise_id,
            weight: parse_number("weight", &self.weight)?,
            reps: parse_number("reps", &self.reps)?,
            comment: self.comment.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStatus {
    Saved(String),
    Failed(String),
}

/// Edit form for one set, seeded from its current values.
#[derive(Debug, Clone, PartialEq)]
pub struct SetEditor {
    pub set: WorkoutSet,
    pub reps: String,
    pub weight: String,
    pub comment: String,
    pub status: Option<EditStatus>,
    close_at: Option<Instant>,
}

impl SetEditor {
    fn seeded(set: WorkoutSet) -> Self {
        Self {
            reps: set.reps.to_string(),
            weight: set.weight.to_string(),
            comment: set.comment.clone(),
            set,
            status: None,
            close_at: None,
        }
    }

    pub const fn closes_at(&self) -> Option<Instant> {
        self.close_at
    }

    /// Blank numeric fields are left unchanged on the server.
    fn to_update(&self) -> Result<SetUpdate, FormError> {
        let reps = match self.reps.trim() {
            "" => None,
            raw => Some(parse_number("reps", raw)?),
        };
        let weight = match self.weight.trim() {
            "" => None,
            raw => Some(parse_number("weight", raw)?),
        };
        Ok(SetUpdate {
            reps,
            weight,
            comment: Some(self.comment.trim().to_string()),
        })
    }
}

/// State of the open workout's detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetail {
    pub workout_id: i64,
    pub sets: Vec<WorkoutSet>,
    pub sets_state: LoadState,
    pub new_set: NewSetForm,
    pub editor: Option<SetEditor>,
    pub set_delete: Confirmation<i64>,
}

impl WorkoutDetail {
    fn new(workout_id: i64) -> Self {
        Self {
            workout_id,
            sets: Vec::new(),
            sets_state: LoadState::Idle,
            new_set: NewSetForm::default(),
            editor: None,
            set_delete: Confirmation::default(),
        }
    }
}

/// Cached workouts and the detail view of the open workout.
///
/// Everything held here is a copy of the last successful fetch. Mutations go
/// to the backend first; local state changes only once the call succeeds.
#[derive(Debug)]
pub struct WorkoutList {
    workouts: Vec<Workout>,
    workouts_state: LoadState,
    exercises: Vec<Exercise>,
    exercises_state: LoadState,
    detail: Option<WorkoutDetail>,
    workout_delete: Confirmation<i64>,
    alert: Option<String>,
    sets_generation: u64,
    latest_ticket: Option<SetsTicket>,
    edit_close_delay: Duration,
}

impl WorkoutList {
    pub fn new(edit_close_delay: Duration) -> Self {
        Self {
            workouts: Vec::new(),
            workouts_state: LoadState::Idle,
            exercises: Vec::new(),
            exercises_state: LoadState::Idle,
            detail: None,
            workout_delete: Confirmation::default(),
            alert: None,
            sets_generation: 0,
            latest_ticket: None,
            edit_close_delay,
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub const fn workouts_state(&self) -> &LoadState {
        &self.workouts_state
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub const fn exercises_state(&self) -> &LoadState {
        &self.exercises_state
    }

    pub const fn detail(&self) -> Option<&WorkoutDetail> {
        self.detail.as_ref()
    }

    pub fn new_set_form_mut(&mut self) -> Option<&mut NewSetForm> {
        self.detail.as_mut().map(|d| &mut d.new_set)
    }

    pub fn editor_mut(&mut self) -> Option<&mut SetEditor> {
        self.detail.as_mut().and_then(|d| d.editor.as_mut())
    }

    pub fn load_workouts(&mut self, service: &AppService) {
        self.workouts_state = LoadState::Loading;
        match service.list_workouts() {
            Ok(workouts) => {
                debug!("Loaded {} workouts", workouts.len());
                self.workouts = workouts;
                self.workouts_state = LoadState::Loaded;
            }
            Err(e) => {
                error!("Error fetching workouts: {:?}", e);
                self.workouts.clear();
                self.workouts_state = LoadState::Failed(remote_message(&e));
            }
        }
    }

    /// Loads the exercise cache used for name lookup and the add-set dropdown.
    pub fn load_exercises(&mut self, service: &AppService) {
        self.exercises_state = LoadState::Loading;
        match service.list_exercises() {
            Ok(mut exercises) => {
                exercises.sort_by_key(|e| e.name.to_lowercase());
                self.exercises = exercises;
                self.exercises_state = LoadState::Loaded;
            }
            Err(e) => {
                error!("Error fetching exercises: {:?}", e);
                self.exercises.clear();
                self.exercises_state = LoadState::Failed(remote_message(&e));
            }
        }
    }

    pub fn apply_change(&mut self, service: &AppService, change: Change) {
        match change {
            Change::Workouts => self.load_workouts(service),
            Change::Exercises => self.load_exercises(service),
        }
    }

    /// Name of an exercise from the cache, or the unknown placeholder.
    pub fn exercise_name(&self, exercise_id: i64) -> &str {
        models::exercise_name(&self.exercises, exercise_id)
    }

    pub fn open_workout(&mut self, service: &AppService, workout_id: i64) {
        self.detail = Some(WorkoutDetail::new(workout_id));
        self.reload_sets(service);
    }

    pub fn close_workout(&mut self) {
        self.detail = None;
        self.latest_ticket = None;
    }

    /// Marks the open workout's sets as loading and issues a fresh ticket.
    pub fn begin_sets_load(&mut self) -> Option<SetsTicket> {
        let detail = self.detail.as_mut()?;
        self.sets_generation += 1;
        let ticket = SetsTicket {
            workout_id: detail.workout_id,
            generation: self.sets_generation,
        };
        detail.sets_state = LoadState::Loading;
        self.latest_ticket = Some(ticket);
        Some(ticket)
    }

    /// Applies a set-list result. Returns `false` if the result was stale and
    /// discarded.
    pub fn finish_sets_load(
        &mut self,
        ticket: SetsTicket,
        result: anyhow::Result<Vec<WorkoutSet>>,
    ) -> bool {
        if self.latest_ticket != Some(ticket) {
            debug!("Discarding stale set list for workout {}", ticket.workout_id);
            return false;
        }
        let Some(detail) = self
            .detail
            .as_mut()
            .filter(|d| d.workout_id == ticket.workout_id)
        else {
            debug!("Workout {} is no longer open", ticket.workout_id);
            return false;
        };

        match result {
            Ok(sets) => {
                if let Some(editor) = detail.editor.as_mut() {
                    if let Some(fresh) = sets.iter().find(|s| s.id == editor.set.id) {
                        editor.set = fresh.clone();
                    }
                }
                detail.sets = sets;
                detail.sets_state = LoadState::Loaded;
            }
            Err(e) => {
                error!("Error fetching sets for workout {}: {:?}", ticket.workout_id, e);
                detail.sets.clear();
                detail.sets_state = LoadState::Failed(remote_message(&e));
            }
        }
        true
    }

    pub fn reload_sets(&mut self, service: &AppService) -> bool {
        let Some(ticket) = self.begin_sets_load() else {
            return false;
        };
        let result = service.list_sets(ticket.workout_id);
        self.finish_sets_load(ticket, result)
    }

    pub fn start_edit(&mut self, set_id: i64) -> bool {
        let Some(detail) = self.detail.as_mut() else {
            return false;
        };
        match detail.sets.iter().find(|s| s.id == set_id) {
            Some(set) => {
                detail.editor = Some(SetEditor::seeded(set.clone()));
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.editor = None;
        }
    }

    /// Sends the edit. On success the set list is re-fetched and the editor
    /// is scheduled to close `edit_close_delay` after `now`.
    pub fn submit_edit(&mut self, service: &AppService, now: Instant) -> Result<(), FormError> {
        let (set_id, update) = {
            let detail = self.detail.as_mut().ok_or(FormError::NoWorkoutSelected)?;
            let editor = detail.editor.as_mut().ok_or(FormError::NoSetSelected)?;
            editor.status = None;
            editor.close_at = None;
            match editor.to_update() {
                Ok(update) => (editor.set.id, update),
                Err(err) => {
                    editor.status = Some(EditStatus::Failed(err.to_string()));
                    return Err(err);
                }
            }
        };

        match service.update_set(set_id, &update) {
            Ok(()) => {
                self.reload_sets(service);
                let close_at = now + self.edit_close_delay;
                if let Some(editor) = self.editor_mut() {
                    editor.status = Some(EditStatus::Saved(SET_UPDATED.to_string()));
                    editor.close_at = Some(close_at);
                }
                Ok(())
            }
            Err(e) => {
                error!("Error updating set {}: {:?}", set_id, e);
                if let Some(editor) = self.editor_mut() {
                    editor.status = Some(EditStatus::Failed(SET_UPDATE_FAILED.to_string()));
                }
                Err(FormError::Remote(remote_message(&e)))
            }
        }
    }

    /// Closes the editor once its deadline has passed. Returns `true` if it closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(detail) = self.detail.as_mut() else {
            return false;
        };
        let due = detail
            .editor
            .as_ref()
            .and_then(|e| e.close_at)
            .is_some_and(|deadline| now >= deadline);
        if due {
            detail.editor = None;
        }
        due
    }

    pub fn submit_new_set(&mut self, service: &AppService) -> Result<(), FormError> {
        if !self.exercises_state.is_loaded() {
            return Err(FormError::ExercisesNotLoaded);
        }
        let detail = self.detail.as_ref().ok_or(FormError::NoWorkoutSelected)?;
        let new_set = detail.new_set.to_new_set()?;
        let workout_id = detail.workout_id;

        match service.add_set(workout_id, &new_set) {
            Ok(()) => {
                if let Some(form) = self.new_set_form_mut() {
                    form.clear();
                }
                self.reload_sets(service);
                Ok(())
            }
            Err(e) => {
                error!("Error adding new set: {:?}", e);
                let text = format!("Failed to add new set: {}", remote_message(&e));
                self.alert = Some(text.clone());
                Err(FormError::Remote(text))
            }
        }
    }

    pub fn request_set_delete(&mut self, set_id: i64) -> bool {
        match self.detail.as_mut() {
            Some(detail) if detail.sets.iter().any(|s| s.id == set_id) => {
                detail.set_delete.request(set_id);
                true
            }
            _ => false,
        }
    }

    pub fn pending_set_delete(&self) -> Option<i64> {
        self.detail
            .as_ref()
            .and_then(|d| d.set_delete.pending().copied())
    }

    pub fn cancel_set_delete(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.set_delete.cancel();
        }
    }

    /// Deletes the staged set and filters it out locally, without a re-fetch.
    pub fn confirm_set_delete(&mut self, service: &AppService) -> bool {
        let Some(detail) = self.detail.as_mut() else {
            return false;
        };
        let Some(set_id) = detail.set_delete.take() else {
            return false;
        };

        match service.delete_set(set_id) {
            Ok(()) => {
                info!("Set {} deleted", set_id);
                detail.sets.retain(|s| s.id != set_id);
                if detail.editor.as_ref().is_some_and(|e| e.set.id == set_id) {
                    detail.editor = None;
                }
                true
            }
            Err(e) => {
                error!("Error deleting set {}: {:?}", set_id, e);
                self.alert = Some(SET_DELETE_FAILED.to_string());
                false
            }
        }
    }

    pub fn request_workout_delete(&mut self, workout_id: i64) -> bool {
        if !self.workouts.iter().any(|w| w.id == workout_id) {
            return false;
        }
        self.workout_delete.request(workout_id);
        true
    }

    pub fn pending_workout_delete(&self) -> Option<i64> {
        self.workout_delete.pending().copied()
    }

    /// Drops the staged workout. Never touches the network.
    pub fn cancel_workout_delete(&mut self) {
        self.workout_delete.cancel();
    }

    pub fn confirm_workout_delete(&mut self, service: &AppService) -> bool {
        let Some(workout_id) = self.workout_delete.take() else {
            return false;
        };

        match service.delete_workout(workout_id) {
            Ok(()) => {
                info!("Workout {} deleted", workout_id);
                self.workouts.retain(|w| w.id != workout_id);
                if self.detail.as_ref().is_some_and(|d| d.workout_id == workout_id) {
                    self.close_workout();
                }
                true
            }
            Err(e) => {
                error!("Error deleting workout {}: {:?}", workout_id, e);
                self.alert = Some(WORKOUT_DELETE_FAILED.to_string());
                false
            }
        }
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}
