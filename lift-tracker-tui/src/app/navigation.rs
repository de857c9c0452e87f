//src/app/navigation.rs
use super::state::App;
use ratatui::widgets::{ListState, TableState};

fn next_index(current: Option<usize>, len: usize) -> usize {
    match current {
        Some(i) if i >= len - 1 => 0,
        Some(i) => i + 1,
        None => 0,
    }
}

fn previous_index(current: Option<usize>, len: usize) -> usize {
    match current {
        Some(0) => len - 1,
        Some(i) => i - 1,
        None => len.saturating_sub(1),
    }
}

pub fn table_next(state: &mut TableState, len: usize) {
    if len == 0 {
        return;
    }
    state.select(Some(next_index(state.selected(), len)));
}

pub fn table_previous(state: &mut TableState, len: usize) {
    if len == 0 {
        return;
    }
    state.select(Some(previous_index(state.selected(), len)));
}

/// Selects the first row of a non-empty table, clamps a selection past the
/// end, and clears it for an empty table.
pub fn clamp_selection(state: &mut TableState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

// --- Workouts Tab Navigation ---

pub fn workout_table_next(app: &mut App) {
    let len = app.workout_list.workouts().len();
    table_next(&mut app.workout_table_state, len);
}

pub fn workout_table_previous(app: &mut App) {
    let len = app.workout_list.workouts().len();
    table_previous(&mut app.workout_table_state, len);
}

pub fn set_table_next(app: &mut App) {
    let len = app.workout_list.detail().map_or(0, |d| d.sets.len());
    table_next(&mut app.set_table_state, len);
}

pub fn set_table_previous(app: &mut App) {
    let len = app.workout_list.detail().map_or(0, |d| d.sets.len());
    table_previous(&mut app.set_table_state, len);
}

// --- Exercises Tab Navigation ---

pub fn exercise_table_next(app: &mut App) {
    let len = app.exercise_table.exercises().len();
    table_next(&mut app.exercise_table_state, len);
}

pub fn exercise_table_previous(app: &mut App) {
    let len = app.exercise_table.exercises().len();
    table_previous(&mut app.exercise_table_state, len);
}

// --- History Tab Navigation ---

fn select_history(state: &mut ListState, index: usize) -> bool {
    let changed = state.selected() != Some(index);
    state.select(Some(index));
    changed
}

pub fn history_list_next(app: &mut App) {
    let len = app.history_exercises.exercises().len();
    if len == 0 {
        return;
    }
    let i = next_index(app.history_list_state.selected(), len);
    if select_history(&mut app.history_list_state, i) {
        app.load_history_for_selection();
    }
}

pub fn history_list_previous(app: &mut App) {
    let len = app.history_exercises.exercises().len();
    if len == 0 {
        return;
    }
    let i = previous_index(app.history_list_state.selected(), len);
    if select_history(&mut app.history_list_state, i) {
        app.load_history_for_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut state = TableState::default();
        table_previous(&mut state, 3);
        assert_eq!(state.selected(), Some(2));
        table_next(&mut state, 3);
        assert_eq!(state.selected(), Some(0));
        table_next(&mut state, 0);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn clamping_follows_list_length() {
        let mut state = TableState::default();
        clamp_selection(&mut state, 2);
        assert_eq!(state.selected(), Some(0));
        state.select(Some(5));
        clamp_selection(&mut state, 2);
        assert_eq!(state.selected(), Some(1));
        clamp_selection(&mut state, 0);
        assert_eq!(state.selected(), None);
    }
}
