// lift-tracker-tui/src/ui/modals.rs
use crate::{
    app::{
        ActiveModal, AddExerciseField, AddSetField, AddWorkoutField, App, DeleteTarget,
        EditSetField,
    },
    ui::modal::render_modal_frame,
};
use lift_tracker_lib::{
    workout_list::{SET_DELETE_PROMPT, WORKOUT_DELETE_PROMPT},
    EditStatus, FormMessage,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Draws the active modal and returns its outer area.
pub fn render_modal(f: &mut Frame, app: &App) -> Option<Rect> {
    match &app.active_modal {
        ActiveModal::None => None,
        ActiveModal::Help => Some(render_help_modal(f)),
        ActiveModal::AddExercise { .. } => Some(render_add_exercise_modal(f, app)),
        ActiveModal::AddWorkout { .. } => Some(render_add_workout_modal(f, app)),
        ActiveModal::AddSet { .. } => Some(render_add_set_modal(f, app)),
        ActiveModal::EditSet { .. } => Some(render_edit_set_modal(f, app)),
        ActiveModal::ConfirmDelete { target } => Some(render_confirm_delete_modal(f, *target)),
        ActiveModal::Alert { message } => Some(render_alert_modal(f, message)),
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().reversed()
    } else {
        Style::default()
    }
}

fn field_rows(area: Rect, count: usize) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); count])
        .split(area)
        .to_vec()
}

fn render_input(f: &mut Frame, area: Rect, value: &str, focused: bool) {
    f.render_widget(Paragraph::new(value).style(focus_style(focused)), area);
    if focused {
        f.set_cursor(area.x + value.chars().count() as u16, area.y);
    }
}

fn render_buttons(f: &mut Frame, area: Rect, confirm: &str, ok_focused: bool, cancel_focused: bool) {
    let button_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let ok_button = Paragraph::new(format!(" {confirm} "))
        .alignment(Alignment::Center)
        .style(focus_style(ok_focused));
    f.render_widget(ok_button, button_layout[0]);

    let cancel_button = Paragraph::new(" Cancel ")
        .alignment(Alignment::Center)
        .style(focus_style(cancel_focused));
    f.render_widget(cancel_button, button_layout[1]);
}

fn render_form_message(f: &mut Frame, area: Rect, message: Option<&FormMessage>) {
    if let Some(message) = message {
        let color = if message.is_error() {
            Color::Red
        } else {
            Color::Green
        };
        f.render_widget(
            Paragraph::new(message.text())
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn render_help_modal(f: &mut Frame) -> Rect {
    let (area, inner) = render_modal_frame(f, "Help (?)", 64, 28, Color::Yellow);

    let section = |title: &'static str| Line::from(title).style(Style::new().bold().underlined());
    let help_text = vec![
        section("--- Global ---"),
        Line::from(" q: Quit"),
        Line::from(" ?: Show/Hide Help"),
        Line::from(" r: Reload the current tab from the server"),
        Line::from(" F1, F2, F3: Switch Tabs"),
        Line::from(" Click outside a dialog to close it"),
        Line::from(""),
        section("--- Workouts Tab (F1) ---"),
        Line::from(" k/j / ↑/↓: Navigate"),
        Line::from(" Enter: Open the selected workout"),
        Line::from(" n: New workout"),
        Line::from(" d / Delete: Delete the selected workout"),
        Line::from(" Tab: Switch between workouts and sets"),
        Line::from(" a: Add a set to the open workout"),
        Line::from(" e / Enter: Edit the selected set"),
        Line::from(" Esc: Close the open workout"),
        Line::from(""),
        section("--- Exercises Tab (F2) ---"),
        Line::from(" k/j / ↑/↓: Navigate"),
        Line::from(" a / n: Add exercise"),
        Line::from(""),
        section("--- History Tab (F3) ---"),
        Line::from(" k/j / ↑/↓: Pick exercise (* marks the PR set)"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    f.render_widget(Paragraph::new(help_text).wrap(Wrap { trim: false }), inner);
    area
}

fn render_add_exercise_modal(f: &mut Frame, app: &App) -> Rect {
    let ActiveModal::AddExercise {
        form,
        focused_field,
    } = &app.active_modal
    else {
        return Rect::default();
    };
    let (area, inner) = render_modal_frame(f, "Add Exercise", 56, 11, Color::Yellow);
    let rows = field_rows(inner, 7);

    f.render_widget(Paragraph::new("Name:"), rows[0]);
    render_input(f, rows[1], &form.name, *focused_field == AddExerciseField::Name);
    f.render_widget(Paragraph::new("Description:"), rows[2]);
    render_input(
        f,
        rows[3],
        &form.description,
        *focused_field == AddExerciseField::Description,
    );
    render_buttons(
        f,
        rows[5],
        "Add Exercise",
        *focused_field == AddExerciseField::Confirm,
        *focused_field == AddExerciseField::Cancel,
    );
    render_form_message(f, rows[6], form.message.as_ref());
    area
}

fn render_add_workout_modal(f: &mut Frame, app: &App) -> Rect {
    let ActiveModal::AddWorkout {
        form,
        focused_field,
    } = &app.active_modal
    else {
        return Rect::default();
    };
    let (area, inner) = render_modal_frame(f, "New Workout", 56, 11, Color::Yellow);
    let rows = field_rows(inner, 7);

    f.render_widget(Paragraph::new("Comment:"), rows[0]);
    render_input(f, rows[1], &form.comment, *focused_field == AddWorkoutField::Comment);
    f.render_widget(
        Paragraph::new("Date (YYYY-MM-DD HH:MM:SS, blank for now):"),
        rows[2],
    );
    render_input(f, rows[3], &form.date, *focused_field == AddWorkoutField::Date);
    render_buttons(
        f,
        rows[5],
        "Add Workout",
        *focused_field == AddWorkoutField::Confirm,
        *focused_field == AddWorkoutField::Cancel,
    );
    render_form_message(f, rows[6], form.message.as_ref());
    area
}

fn render_add_set_modal(f: &mut Frame, app: &App) -> Rect {
    let ActiveModal::AddSet {
        focused_field,
        error_message,
    } = &app.active_modal
    else {
        return Rect::default();
    };
    let (area, inner) = render_modal_frame(f, "Add Set", 60, 15, Color::Yellow);
    let Some(detail) = app.workout_list.detail() else {
        return area;
    };
    let form = &detail.new_set;
    let rows = field_rows(inner, 11);

    let exercise = form
        .exercise_id
        .and_then(|id| app.workout_list.exercises().iter().find(|e| e.id == id));
    let (name, description) = exercise.map_or(("Select an exercise", ""), |e| {
        (e.name.as_str(), e.description.as_str())
    });

    f.render_widget(Paragraph::new("Exercise (←/→ to change):"), rows[0]);
    f.render_widget(
        Paragraph::new(format!("< {name} >"))
            .style(focus_style(*focused_field == AddSetField::Exercise)),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(description.to_string()).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );

    let unit = app.service.config.units.weight_label();
    f.render_widget(Paragraph::new(format!("Weight ({unit}):")), rows[3]);
    render_input(f, rows[4], &form.weight, *focused_field == AddSetField::Weight);
    f.render_widget(Paragraph::new("Reps:"), rows[5]);
    render_input(f, rows[6], &form.reps, *focused_field == AddSetField::Reps);
    f.render_widget(Paragraph::new("Comment:"), rows[7]);
    render_input(f, rows[8], &form.comment, *focused_field == AddSetField::Comment);
    render_buttons(
        f,
        rows[9],
        "Add Set",
        *focused_field == AddSetField::Confirm,
        *focused_field == AddSetField::Cancel,
    );

    if let Some(err) = error_message {
        f.render_widget(
            Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
            rows[10],
        );
    }
    area
}

fn render_edit_set_modal(f: &mut Frame, app: &App) -> Rect {
    let ActiveModal::EditSet { focused_field } = &app.active_modal else {
        return Rect::default();
    };
    let Some(editor) = app.workout_list.detail().and_then(|d| d.editor.as_ref()) else {
        return Rect::default();
    };
    let title = format!(
        "Edit Set: {}",
        app.workout_list.exercise_name(editor.set.exercise_id)
    );
    let (area, inner) = render_modal_frame(f, &title, 56, 13, Color::Yellow);
    let rows = field_rows(inner, 9);

    let unit = app.service.config.units.weight_label();
    f.render_widget(Paragraph::new("Reps:"), rows[0]);
    render_input(f, rows[1], &editor.reps, *focused_field == EditSetField::Reps);
    f.render_widget(Paragraph::new(format!("Weight ({unit}):")), rows[2]);
    render_input(f, rows[3], &editor.weight, *focused_field == EditSetField::Weight);
    f.render_widget(Paragraph::new("Comment:"), rows[4]);
    render_input(f, rows[5], &editor.comment, *focused_field == EditSetField::Comment);
    render_buttons(
        f,
        rows[7],
        "Save",
        *focused_field == EditSetField::Confirm,
        *focused_field == EditSetField::Cancel,
    );

    let status = match &editor.status {
        Some(EditStatus::Saved(text)) => Some((text.as_str(), Color::Green)),
        Some(EditStatus::Failed(text)) => Some((text.as_str(), Color::Red)),
        None => None,
    };
    if let Some((text, color)) = status {
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(color)),
            rows[8],
        );
    }
    area
}

fn render_confirm_delete_modal(f: &mut Frame, target: DeleteTarget) -> Rect {
    let (title, prompt) = match target {
        DeleteTarget::Workout => ("Delete Workout", WORKOUT_DELETE_PROMPT),
        DeleteTarget::Set => ("Delete Set", SET_DELETE_PROMPT),
    };
    let (area, inner) = render_modal_frame(f, title, 52, 8, Color::Red);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(prompt)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new("[Y]es / [N]o (Esc)")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow)),
        chunks[1],
    );
    area
}

fn render_alert_modal(f: &mut Frame, message: &str) -> Rect {
    let (area, inner) = render_modal_frame(f, "Error", 52, 8, Color::Red);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new("[OK] Enter")
            .alignment(Alignment::Center)
            .style(Style::default().reversed()),
        chunks[1],
    );
    area
}
