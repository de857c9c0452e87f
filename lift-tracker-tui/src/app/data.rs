//src/app/data.rs
use super::navigation::clamp_selection;
use super::state::{ActiveModal, ActiveTab, App};
use lift_tracker_lib::{Change, ExerciseHistory, LoadState};
use std::time::Instant;

impl App {
    /// Lazily loads whatever the active tab shows and runs timed state.
    pub fn refresh_data_for_active_tab(&mut self) {
        self.tick(Instant::now());

        match self.active_tab {
            ActiveTab::Workouts => {
                if *self.workout_list.workouts_state() == LoadState::Idle {
                    self.workout_list.load_workouts(&self.service);
                    self.workout_list.load_exercises(&self.service);
                    self.sync_workout_selection();
                }
            }
            ActiveTab::Exercises => self.exercise_table.mount(&self.service),
            ActiveTab::History => {
                self.history_exercises.mount(&self.service);
                if self.history.is_none() && !self.history_exercises.exercises().is_empty() {
                    if self.history_list_state.selected().is_none() {
                        self.history_list_state.select(Some(0));
                    }
                    self.load_history_for_selection();
                }
            }
        }
    }

    /// Deadline-driven updates: editor auto-close and status bar expiry.
    pub fn tick(&mut self, now: Instant) {
        self.clear_expired_error(now);
        if self.workout_list.tick(now) && matches!(self.active_modal, ActiveModal::EditSet { .. })
        {
            self.active_modal = ActiveModal::None;
        }
    }

    /// Forces a reload of the active tab.
    pub fn reload_active_tab(&mut self) {
        match self.active_tab {
            ActiveTab::Workouts => {
                self.workout_list.load_workouts(&self.service);
                self.workout_list.load_exercises(&self.service);
                self.workout_list.reload_sets(&self.service);
                self.sync_workout_selection();
            }
            ActiveTab::Exercises => self.exercise_table.refresh(&self.service),
            ActiveTab::History => {
                self.history_exercises.refresh(&self.service);
                self.sync_history_selection();
                self.load_history_for_selection();
            }
        }
    }

    /// Routes a change announced by a form to every view that caches it.
    pub fn apply_change(&mut self, change: Change) {
        self.workout_list.apply_change(&self.service, change);
        self.exercise_table.apply_change(&self.service, change);
        self.history_exercises.apply_change(&self.service, change);
        self.sync_workout_selection();
        self.sync_history_selection();
    }

    pub fn load_history_for_selection(&mut self) {
        let selected = self
            .history_list_state
            .selected()
            .and_then(|i| self.history_exercises.exercises().get(i))
            .map(|e| e.id);
        self.history_exercises.select(selected);
        self.history = selected.map(|id| ExerciseHistory::load(&self.service, id));
        self.history_table_state.select(None);
    }

    /// Re-finds the shown exercise by id after its catalog reloads. The
    /// history is only re-fetched when that exercise is gone.
    fn sync_history_selection(&mut self) {
        let Some(shown) = self.history.as_ref().map(|h| h.exercise_id) else {
            return;
        };
        let exercises = self.history_exercises.exercises();
        match exercises.iter().position(|e| e.id == shown) {
            Some(index) => {
                self.history_list_state.select(Some(index));
                self.history_exercises.select(Some(shown));
            }
            None => {
                let len = exercises.len();
                let index = (len > 0)
                    .then(|| self.history_list_state.selected().unwrap_or(0).min(len - 1));
                self.history_list_state.select(index);
                self.load_history_for_selection();
            }
        }
    }

    /// Keeps table selections inside the current lists.
    pub fn sync_workout_selection(&mut self) {
        clamp_selection(
            &mut self.workout_table_state,
            self.workout_list.workouts().len(),
        );
        let set_count = self.workout_list.detail().map_or(0, |d| d.sets.len());
        clamp_selection(&mut self.set_table_state, set_count);
    }

    /// Moves a pending alert from the workout list into the alert modal.
    pub fn surface_alert(&mut self) {
        if let Some(message) = self.workout_list.take_alert() {
            self.set_error(message.clone());
            self.active_modal = ActiveModal::Alert { message };
        }
    }
}
