//src/app/actions.rs
use super::state::{
    ActiveModal, AddExerciseField, AddSetField, AddWorkoutField, App, DeleteTarget, EditSetField,
    WorkoutsFocus,
};
use super::AppInputError;
use lift_tracker_lib::{ExerciseForm, WorkoutForm};

pub fn open_add_exercise_modal(app: &mut App) {
    app.active_modal = ActiveModal::AddExercise {
        form: ExerciseForm::default(),
        focused_field: AddExerciseField::Name,
    };
}

pub fn open_add_workout_modal(app: &mut App) {
    app.active_modal = ActiveModal::AddWorkout {
        form: WorkoutForm::default(),
        focused_field: AddWorkoutField::Comment,
    };
}

/// Opens the highlighted workout in the detail pane and moves focus there.
pub fn open_selected_workout(app: &mut App) -> Result<(), AppInputError> {
    let workout_id = app
        .selected_workout_id()
        .ok_or(AppInputError::SelectionRequired)?;
    app.workout_list.open_workout(&app.service, workout_id);
    app.set_table_state.select(None);
    app.sync_workout_selection();
    app.workouts_focus = WorkoutsFocus::Sets;
    Ok(())
}

pub fn close_open_workout(app: &mut App) {
    app.workout_list.close_workout();
    app.set_table_state.select(None);
    app.workouts_focus = WorkoutsFocus::Workouts;
}

pub fn open_add_set_modal(app: &mut App) -> Result<(), AppInputError> {
    if app.workout_list.detail().is_none() {
        return Err(AppInputError::SelectionRequired);
    }
    if app.workout_list.exercises().is_empty() {
        return Err(AppInputError::NoExercises);
    }
    let first_exercise = app.workout_list.exercises().first().map(|e| e.id);
    if let Some(form) = app.workout_list.new_set_form_mut() {
        if form.exercise_id.is_none() {
            form.exercise_id = first_exercise;
        }
    }
    app.active_modal = ActiveModal::AddSet {
        focused_field: AddSetField::Exercise,
        error_message: None,
    };
    Ok(())
}

pub fn open_edit_set_modal(app: &mut App) -> Result<(), AppInputError> {
    let set_id = app
        .selected_set_id()
        .ok_or(AppInputError::SelectionRequired)?;
    if app.workout_list.start_edit(set_id) {
        app.active_modal = ActiveModal::EditSet {
            focused_field: EditSetField::Reps,
        };
    }
    Ok(())
}

pub fn request_delete_selected_workout(app: &mut App) -> Result<(), AppInputError> {
    let workout_id = app
        .selected_workout_id()
        .ok_or(AppInputError::SelectionRequired)?;
    if app.workout_list.request_workout_delete(workout_id) {
        app.active_modal = ActiveModal::ConfirmDelete {
            target: DeleteTarget::Workout,
        };
    }
    Ok(())
}

pub fn request_delete_selected_set(app: &mut App) -> Result<(), AppInputError> {
    let set_id = app
        .selected_set_id()
        .ok_or(AppInputError::SelectionRequired)?;
    if app.workout_list.request_set_delete(set_id) {
        app.active_modal = ActiveModal::ConfirmDelete {
            target: DeleteTarget::Set,
        };
    }
    Ok(())
}

/// Closes whatever modal is open through its cancel path.
pub fn close_modal(app: &mut App) {
    match app.active_modal {
        ActiveModal::ConfirmDelete {
            target: DeleteTarget::Workout,
        } => app.workout_list.cancel_workout_delete(),
        ActiveModal::ConfirmDelete {
            target: DeleteTarget::Set,
        } => app.workout_list.cancel_set_delete(),
        ActiveModal::EditSet { .. } => app.workout_list.cancel_edit(),
        _ => {}
    }
    app.active_modal = ActiveModal::None;
    app.modal_area = None;
}
