// src/app/input.rs
use super::{
    actions::{
        close_modal, close_open_workout, open_add_exercise_modal, open_add_set_modal,
        open_add_workout_modal, open_edit_set_modal, open_selected_workout,
        request_delete_selected_set, request_delete_selected_workout,
    },
    modals::{
        handle_add_exercise_modal_input, handle_add_set_modal_input,
        handle_add_workout_modal_input, handle_alert_modal_input,
        handle_confirm_delete_modal_input, handle_edit_set_modal_input, handle_help_modal_input,
    },
    navigation::{
        exercise_table_next, exercise_table_previous, history_list_next, history_list_previous,
        set_table_next, set_table_previous, workout_table_next, workout_table_previous,
    },
    state::{ActiveModal, ActiveTab, App, WorkoutsFocus},
    AppInputError,
};
use crate::ui::modal::is_backdrop_click;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if self.active_modal != ActiveModal::None {
            return self.handle_modal_input(key);
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('r') => self.reload_active_tab(),
            KeyCode::F(1) => self.active_tab = ActiveTab::Workouts,
            KeyCode::F(2) => self.active_tab = ActiveTab::Exercises,
            KeyCode::F(3) => self.active_tab = ActiveTab::History,
            _ => {
                let result = match self.active_tab {
                    ActiveTab::Workouts => self.handle_workouts_input(key),
                    ActiveTab::Exercises => self.handle_exercises_input(key),
                    ActiveTab::History => self.handle_history_input(key),
                };
                if let Err(err) = result {
                    self.set_error(err.to_string());
                }
            }
        }
        Ok(())
    }

    /// A left click outside the open modal closes it through its cancel path.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.active_modal == ActiveModal::None {
            return;
        }
        if let Some(area) = self.modal_area {
            if is_backdrop_click(area, mouse.column, mouse.row) {
                close_modal(self);
            }
        }
    }

    fn handle_modal_input(&mut self, key: KeyEvent) -> Result<()> {
        match self.active_modal {
            ActiveModal::Help => handle_help_modal_input(self, key),
            ActiveModal::Alert { .. } => handle_alert_modal_input(self, key),
            ActiveModal::AddExercise { .. } => handle_add_exercise_modal_input(self, key)?,
            ActiveModal::AddWorkout { .. } => handle_add_workout_modal_input(self, key)?,
            ActiveModal::AddSet { .. } => handle_add_set_modal_input(self, key)?,
            ActiveModal::EditSet { .. } => handle_edit_set_modal_input(self, key)?,
            ActiveModal::ConfirmDelete { .. } => handle_confirm_delete_modal_input(self, key)?,
            ActiveModal::None => {}
        }
        Ok(())
    }

    // --- Tab-Specific Input Handling ---
    fn handle_workouts_input(&mut self, key: KeyEvent) -> Result<(), AppInputError> {
        match self.workouts_focus {
            WorkoutsFocus::Workouts => match key.code {
                KeyCode::Char('k') | KeyCode::Up => workout_table_previous(self),
                KeyCode::Char('j') | KeyCode::Down => workout_table_next(self),
                KeyCode::Enter => open_selected_workout(self)?,
                KeyCode::Tab if self.workout_list.detail().is_some() => {
                    self.workouts_focus = WorkoutsFocus::Sets;
                }
                KeyCode::Char('n') => open_add_workout_modal(self),
                KeyCode::Char('d') | KeyCode::Delete => request_delete_selected_workout(self)?,
                _ => {}
            },
            WorkoutsFocus::Sets => match key.code {
                KeyCode::Char('k') | KeyCode::Up => set_table_previous(self),
                KeyCode::Char('j') | KeyCode::Down => set_table_next(self),
                KeyCode::Tab => self.workouts_focus = WorkoutsFocus::Workouts,
                KeyCode::Esc => close_open_workout(self),
                KeyCode::Char('a') => open_add_set_modal(self)?,
                KeyCode::Char('e') | KeyCode::Enter => open_edit_set_modal(self)?,
                KeyCode::Char('d') | KeyCode::Delete => request_delete_selected_set(self)?,
                _ => {}
            },
        }
        Ok(())
    }

    fn handle_exercises_input(&mut self, key: KeyEvent) -> Result<(), AppInputError> {
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => exercise_table_previous(self),
            KeyCode::Char('j') | KeyCode::Down => exercise_table_next(self),
            KeyCode::Char('a') | KeyCode::Char('n') => open_add_exercise_modal(self),
            _ => {}
        }
        Ok(())
    }

    fn handle_history_input(&mut self, key: KeyEvent) -> Result<(), AppInputError> {
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => history_list_previous(self),
            KeyCode::Char('j') | KeyCode::Down => history_list_next(self),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DeleteTarget, EditSetField};
    use crossterm::event::{KeyModifiers, MouseEvent};
    use lift_tracker_lib::memory::{InMemoryBackend, Operation};
    use lift_tracker_lib::{AppService, Change, Config, EditStatus, FormMessage};
    use ratatui::layout::Rect;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn test_app() -> (App, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        let service =
            AppService::with_backend(Config::default(), "test_config.toml".into(), backend.clone());
        (App::new(service), backend)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse_event(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    /// App with one workout holding one set, opened in the detail pane.
    fn app_with_open_workout() -> (App, Arc<InMemoryBackend>, i64) {
        let (mut app, backend) = test_app();
        let bench = backend.seed_exercise("Bench", "Chest");
        let workout = backend.seed_workout(1, "Push");
        let set_id = backend.seed_set(workout, bench, 80.0, 8);
        app.refresh_data_for_active_tab();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.workouts_focus, WorkoutsFocus::Sets);
        (app, backend, set_id)
    }

    #[test]
    fn add_exercise_modal_validates_then_submits() {
        let (mut app, backend) = test_app();
        press(&mut app, KeyCode::F(2));
        app.refresh_data_for_active_tab();
        press(&mut app, KeyCode::Char('a'));

        type_text(&mut app, "Deadlift");
        press(&mut app, KeyCode::Tab); // Description
        press(&mut app, KeyCode::Tab); // Confirm
        let requests = backend.request_count();
        press(&mut app, KeyCode::Enter);
        assert_eq!(backend.request_count(), requests);
        match &app.active_modal {
            ActiveModal::AddExercise { form, .. } => assert_eq!(
                form.message,
                Some(FormMessage::Error(
                    "Both name and description are required.".to_string()
                ))
            ),
            other => panic!("unexpected modal {other:?}"),
        }

        press(&mut app, KeyCode::Up); // Description
        type_text(&mut app, "Hinge");
        press(&mut app, KeyCode::Down); // Confirm
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.exercise_table.exercises().len(), 1);
        assert_eq!(app.workout_list.exercise_name(1), "Deadlift");
    }

    #[test]
    fn cancelled_workout_delete_keeps_list() {
        let (mut app, backend) = test_app();
        backend.seed_workout(1, "Push");
        app.refresh_data_for_active_tab();

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(
            app.active_modal,
            ActiveModal::ConfirmDelete {
                target: DeleteTarget::Workout
            }
        );
        let requests = backend.request_count();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.active_modal, ActiveModal::None);
        assert_eq!(backend.request_count(), requests);
        assert_eq!(app.workout_list.workouts().len(), 1);
        assert_eq!(app.workout_list.pending_workout_delete(), None);
    }

    #[test]
    fn confirmed_set_delete_updates_table() {
        let (mut app, _backend, _set_id) = app_with_open_workout();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.active_modal, ActiveModal::None);
        assert!(app.workout_list.detail().unwrap().sets.is_empty());
        assert_eq!(app.set_table_state.selected(), None);
    }

    #[test]
    fn failed_delete_shows_alert() {
        let (mut app, backend, _set_id) = app_with_open_workout();
        backend.fail_on(Operation::DeleteSet);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.active_modal, ActiveModal::Alert { .. }));
        assert_eq!(app.workout_list.detail().unwrap().sets.len(), 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.active_modal, ActiveModal::None);
    }

    #[test]
    fn edit_modal_closes_after_deadline() {
        let (mut app, backend, set_id) = app_with_open_workout();
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(
            app.active_modal,
            ActiveModal::EditSet {
                focused_field: EditSetField::Reps
            }
        );
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Tab); // Weight
        press(&mut app, KeyCode::Tab); // Comment
        press(&mut app, KeyCode::Tab); // Confirm
        press(&mut app, KeyCode::Enter);

        let stored = backend.stored_sets(app.workout_list.detail().unwrap().workout_id);
        assert_eq!(stored.iter().find(|s| s.id == set_id).unwrap().reps, 6);
        let status = app
            .workout_list
            .detail()
            .and_then(|d| d.editor.as_ref())
            .and_then(|e| e.status.clone());
        assert!(matches!(status, Some(EditStatus::Saved(_))));

        app.tick(Instant::now() + Duration::from_secs(2));
        assert_eq!(app.active_modal, ActiveModal::None);
        assert!(app.workout_list.detail().unwrap().editor.is_none());
    }

    #[test]
    fn add_set_modal_requires_fields() {
        let (mut app, backend, _set_id) = app_with_open_workout();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab); // Weight
        type_text(&mut app, "100");
        for _ in 0..3 {
            press(&mut app, KeyCode::Tab);
        }
        let requests = backend.request_count();
        press(&mut app, KeyCode::Enter);
        assert_eq!(backend.request_count(), requests);
        assert!(matches!(
            app.active_modal,
            ActiveModal::AddSet {
                error_message: Some(_),
                ..
            }
        ));

        press(&mut app, KeyCode::Up); // Comment
        press(&mut app, KeyCode::Up); // Reps
        type_text(&mut app, "5");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down); // Confirm
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.active_modal, ActiveModal::None);
        assert_eq!(app.workout_list.detail().unwrap().sets.len(), 2);
    }

    #[test]
    fn backdrop_click_cancels_but_inside_click_does_not() {
        let (mut app, backend) = test_app();
        backend.seed_workout(1, "Push");
        app.refresh_data_for_active_tab();
        press(&mut app, KeyCode::Char('d'));
        app.modal_area = Some(Rect::new(10, 5, 20, 6));

        click(&mut app, 15, 7);
        assert!(matches!(app.active_modal, ActiveModal::ConfirmDelete { .. }));

        click(&mut app, 2, 2);
        assert_eq!(app.active_modal, ActiveModal::None);
        assert_eq!(app.workout_list.pending_workout_delete(), None);
        assert_eq!(app.workout_list.workouts().len(), 1);
    }

    fn highlighted_history_name(app: &App) -> Option<String> {
        app.history_list_state
            .selected()
            .and_then(|i| app.history_exercises.exercises().get(i))
            .map(|e| e.name.clone())
    }

    #[test]
    fn history_selection_names_the_shown_exercise() {
        let (mut app, backend) = test_app();
        let squat = backend.seed_exercise("Squat", "Legs");
        press(&mut app, KeyCode::F(3));
        app.refresh_data_for_active_tab();

        assert_eq!(app.history.as_ref().map(|h| h.exercise_id), Some(squat));
        assert_eq!(
            app.history_exercises.selected().map(|e| e.name.as_str()),
            Some("Squat")
        );

        let bench = backend.seed_exercise("Bench", "Chest");
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.history.as_ref().map(|h| h.exercise_id), Some(squat));
        app.reload_active_tab();
        assert_eq!(highlighted_history_name(&app).as_deref(), Some("Squat"));
        assert_eq!(app.history.as_ref().map(|h| h.exercise_id), Some(squat));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(highlighted_history_name(&app).as_deref(), Some("Bench"));
        assert_eq!(app.history.as_ref().map(|h| h.exercise_id), Some(bench));
        assert_eq!(
            app.history_exercises.selected().map(|e| e.name.as_str()),
            Some("Bench")
        );
    }

    #[test]
    fn history_keeps_its_exercise_when_the_catalog_resorts() {
        let (mut app, backend) = test_app();
        let squat = backend.seed_exercise("Squat", "Legs");
        press(&mut app, KeyCode::F(3));
        app.refresh_data_for_active_tab();

        backend.seed_exercise("Bench", "Chest");
        let requests = backend.request_count();
        app.apply_change(Change::Exercises);

        // Bench sorts first; the highlight must move with Squat
        assert_eq!(highlighted_history_name(&app).as_deref(), Some("Squat"));
        assert_eq!(app.history.as_ref().map(|h| h.exercise_id), Some(squat));
        assert_eq!(
            app.history_exercises.selected().map(|e| e.name.as_str()),
            Some("Squat")
        );
        // Only the two exercise lists were re-fetched, not the history
        assert_eq!(backend.request_count(), requests + 2);
    }
}
