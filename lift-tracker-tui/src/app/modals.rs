//src/app/modals.rs
use super::actions::close_modal;
use super::state::{
    ActiveModal, AddExerciseField, AddSetField, AddWorkoutField, App, DeleteTarget, EditSetField,
    WorkoutsFocus,
};
use super::AppInputError;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use lift_tracker_lib::FormError;
use std::time::Instant;

// --- Text Input Helpers ---

fn edit_text(buffer: &mut String, code: KeyCode, accept: fn(char) -> bool) {
    match code {
        KeyCode::Char(c) if accept(c) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }
}

fn any_char(_: char) -> bool {
    true
}

fn integer_char(c: char) -> bool {
    c.is_ascii_digit()
}

fn decimal_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn date_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | ':' | ' ')
}

/// Id after (or before) `current` in `ids`, wrapping around.
fn cycle_id(ids: &[i64], current: Option<i64>, forward: bool) -> Option<i64> {
    if ids.is_empty() {
        return None;
    }
    let len = ids.len();
    let index = match current.and_then(|id| ids.iter().position(|x| *x == id)) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    ids.get(index).copied()
}

// --- Submission Logic ---

fn submit_add_exercise(app: &mut App) {
    let result = match &mut app.active_modal {
        ActiveModal::AddExercise {
            form,
            focused_field,
        } => {
            let result = form.submit(&app.service);
            if result.is_ok() {
                *focused_field = AddExerciseField::Name;
            }
            result
        }
        _ => return,
    };
    // The form keeps its own success or error message
    if let Ok(change) = result {
        app.apply_change(change);
    }
}

fn submit_add_workout(app: &mut App) {
    let result = match &mut app.active_modal {
        ActiveModal::AddWorkout {
            form,
            focused_field,
        } => {
            let result = form.submit(&app.service);
            if result.is_ok() {
                *focused_field = AddWorkoutField::Comment;
            }
            result
        }
        _ => return,
    };
    if let Ok(change) = result {
        app.apply_change(change);
    }
}

fn submit_add_set(app: &mut App) {
    match app.workout_list.submit_new_set(&app.service) {
        Ok(()) => {
            app.active_modal = ActiveModal::None;
            app.sync_workout_selection();
        }
        Err(FormError::Remote(_)) => {
            app.active_modal = ActiveModal::None;
            app.surface_alert();
        }
        Err(err) => {
            if let ActiveModal::AddSet { error_message, .. } = &mut app.active_modal {
                *error_message = Some(AppInputError::from(err).to_string());
            }
        }
    }
}

fn submit_edit_set(app: &mut App) {
    // Success and failure are both reported inside the editor itself
    if app
        .workout_list
        .submit_edit(&app.service, Instant::now())
        .is_ok()
    {
        app.sync_workout_selection();
    }
}

fn confirm_delete(app: &mut App, target: DeleteTarget) {
    app.active_modal = ActiveModal::None;
    let deleted = match target {
        DeleteTarget::Workout => app.workout_list.confirm_workout_delete(&app.service),
        DeleteTarget::Set => app.workout_list.confirm_set_delete(&app.service),
    };
    if deleted && app.workout_list.detail().is_none() {
        app.workouts_focus = WorkoutsFocus::Workouts;
    }
    app.sync_workout_selection();
    app.surface_alert();
}

// --- Input Handling ---

pub fn handle_help_modal_input(app: &mut App, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')
    ) {
        close_modal(app);
    }
}

pub fn handle_alert_modal_input(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
        close_modal(app);
    }
}

pub fn handle_add_exercise_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let mut should_submit = false;
    let mut should_close = false;

    if let ActiveModal::AddExercise {
        ref mut form,
        ref mut focused_field,
    } = app.active_modal
    {
        match (key.code, *focused_field) {
            (KeyCode::Esc, _) | (KeyCode::Enter, AddExerciseField::Cancel) => should_close = true,
            (KeyCode::Enter, AddExerciseField::Confirm) => should_submit = true,
            (KeyCode::Left | KeyCode::Right, AddExerciseField::Confirm) => {
                *focused_field = AddExerciseField::Cancel;
            }
            (KeyCode::Left | KeyCode::Right, AddExerciseField::Cancel) => {
                *focused_field = AddExerciseField::Confirm;
            }
            (KeyCode::Enter | KeyCode::Tab | KeyCode::Down, _) => {
                *focused_field = focused_field.next();
            }
            (KeyCode::BackTab | KeyCode::Up, _) => *focused_field = focused_field.previous(),
            (code, AddExerciseField::Name) => edit_text(&mut form.name, code, any_char),
            (code, AddExerciseField::Description) => {
                edit_text(&mut form.description, code, any_char);
            }
            _ => {}
        }
    }

    if should_close {
        close_modal(app);
    } else if should_submit {
        submit_add_exercise(app);
    }
    Ok(())
}

pub fn handle_add_workout_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let mut should_submit = false;
    let mut should_close = false;

    if let ActiveModal::AddWorkout {
        ref mut form,
        ref mut focused_field,
    } = app.active_modal
    {
        match (key.code, *focused_field) {
            (KeyCode::Esc, _) | (KeyCode::Enter, AddWorkoutField::Cancel) => should_close = true,
            (KeyCode::Enter, AddWorkoutField::Confirm) => should_submit = true,
            (KeyCode::Left | KeyCode::Right, AddWorkoutField::Confirm) => {
                *focused_field = AddWorkoutField::Cancel;
            }
            (KeyCode::Left | KeyCode::Right, AddWorkoutField::Cancel) => {
                *focused_field = AddWorkoutField::Confirm;
            }
            (KeyCode::Enter | KeyCode::Tab | KeyCode::Down, _) => {
                *focused_field = focused_field.next();
            }
            (KeyCode::BackTab | KeyCode::Up, _) => *focused_field = focused_field.previous(),
            (code, AddWorkoutField::Comment) => edit_text(&mut form.comment, code, any_char),
            (code, AddWorkoutField::Date) => edit_text(&mut form.date, code, date_char),
            _ => {}
        }
    }

    if should_close {
        close_modal(app);
    } else if should_submit {
        submit_add_workout(app);
    }
    Ok(())
}

pub fn handle_add_set_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let mut should_submit = false;
    let mut should_close = false;
    if app.workout_list.detail().is_none() {
        close_modal(app);
        return Ok(());
    }
    let exercise_ids: Vec<i64> = app.workout_list.exercises().iter().map(|e| e.id).collect();

    if let ActiveModal::AddSet {
        ref mut focused_field,
        ref mut error_message,
    } = app.active_modal
    {
        *error_message = None;
        let Some(form) = app.workout_list.new_set_form_mut() else {
            return Ok(());
        };

        match (key.code, *focused_field) {
            (KeyCode::Esc, _) | (KeyCode::Enter, AddSetField::Cancel) => should_close = true,
            (KeyCode::Enter, AddSetField::Confirm) => should_submit = true,
            (KeyCode::Left, AddSetField::Exercise) => {
                form.exercise_id = cycle_id(&exercise_ids, form.exercise_id, false);
            }
            (KeyCode::Right, AddSetField::Exercise) => {
                form.exercise_id = cycle_id(&exercise_ids, form.exercise_id, true);
            }
            (KeyCode::Left | KeyCode::Right, AddSetField::Confirm) => {
                *focused_field = AddSetField::Cancel;
            }
            (KeyCode::Left | KeyCode::Right, AddSetField::Cancel) => {
                *focused_field = AddSetField::Confirm;
            }
            (KeyCode::Enter | KeyCode::Tab | KeyCode::Down, _) => {
                *focused_field = focused_field.next();
            }
            (KeyCode::BackTab | KeyCode::Up, _) => *focused_field = focused_field.previous(),
            (code, AddSetField::Weight) => edit_text(&mut form.weight, code, decimal_char),
            (code, AddSetField::Reps) => edit_text(&mut form.reps, code, integer_char),
            (code, AddSetField::Comment) => edit_text(&mut form.comment, code, any_char),
            _ => {}
        }
    }

    if should_close {
        close_modal(app);
    } else if should_submit {
        submit_add_set(app);
    }
    Ok(())
}

pub fn handle_edit_set_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let mut should_submit = false;
    let mut should_close = false;
    if app.workout_list.editor_mut().is_none() {
        close_modal(app);
        return Ok(());
    }

    if let ActiveModal::EditSet {
        ref mut focused_field,
    } = app.active_modal
    {
        let Some(editor) = app.workout_list.editor_mut() else {
            return Ok(());
        };

        match (key.code, *focused_field) {
            (KeyCode::Esc, _) | (KeyCode::Enter, EditSetField::Cancel) => should_close = true,
            (KeyCode::Enter, EditSetField::Confirm) => should_submit = true,
            (KeyCode::Left | KeyCode::Right, EditSetField::Confirm) => {
                *focused_field = EditSetField::Cancel;
            }
            (KeyCode::Left | KeyCode::Right, EditSetField::Cancel) => {
                *focused_field = EditSetField::Confirm;
            }
            (KeyCode::Enter | KeyCode::Tab | KeyCode::Down, _) => {
                *focused_field = focused_field.next();
            }
            (KeyCode::BackTab | KeyCode::Up, _) => *focused_field = focused_field.previous(),
            (code, EditSetField::Reps) => edit_text(&mut editor.reps, code, integer_char),
            (code, EditSetField::Weight) => edit_text(&mut editor.weight, code, decimal_char),
            (code, EditSetField::Comment) => edit_text(&mut editor.comment, code, any_char),
            _ => {}
        }
    }

    if should_close {
        close_modal(app);
    } else if should_submit {
        submit_edit_set(app);
    }
    Ok(())
}

pub fn handle_confirm_delete_modal_input(app: &mut App, key: KeyEvent) -> Result<()> {
    if let ActiveModal::ConfirmDelete { target } = app.active_modal {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => confirm_delete(app, target),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => close_modal(app),
            _ => {}
        }
    }
    Ok(())
}
