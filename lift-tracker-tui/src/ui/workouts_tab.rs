// lift-tracker-tui/src/ui/workouts_tab.rs
use crate::app::{App, WorkoutsFocus};
use lift_tracker_lib::LoadState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn placeholder(f: &mut Frame, block: Block, area: Rect, text: String, color: Color) {
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(block),
        area,
    );
}

pub fn render_workouts_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_workout_table(f, app, chunks[0]);
    render_set_table(f, app, chunks[1]);
}

fn render_workout_table(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Workouts")
        .border_style(focus_border(app.workouts_focus == WorkoutsFocus::Workouts));

    match app.workout_list.workouts_state() {
        LoadState::Idle | LoadState::Loading => {
            placeholder(f, block, area, "Loading...".into(), Color::Gray);
            return;
        }
        LoadState::Failed(message) => {
            placeholder(f, block, area, format!("Error: {message}"), Color::Red);
            return;
        }
        LoadState::Loaded => {}
    }

    if app.workout_list.workouts().is_empty() {
        placeholder(
            f,
            block,
            area,
            "No workouts yet. Press 'n' to start one.".into(),
            Color::DarkGray,
        );
        return;
    }

    let open_id = app.workout_list.detail().map(|d| d.workout_id);
    let header = Row::new(
        ["Date", "Comment"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::LightBlue))),
    )
    .height(1)
    .bottom_margin(1);

    let rows = app.workout_list.workouts().iter().map(|w| {
        let style = if Some(w.id) == open_id {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![Cell::from(w.date_label()), Cell::from(w.comment.clone())]).style(style)
    });

    let widths = [Constraint::Length(17), Constraint::Min(10)];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.workout_table_state);
}

fn render_set_table(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.workouts_focus == WorkoutsFocus::Sets;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Sets")
        .border_style(focus_border(focused));

    let Some(detail) = app.workout_list.detail() else {
        placeholder(
            f,
            block,
            area,
            "Select a workout and press Enter to see its sets.".into(),
            Color::DarkGray,
        );
        return;
    };

    match &detail.sets_state {
        LoadState::Idle | LoadState::Loading => {
            placeholder(f, block, area, "Loading sets...".into(), Color::Gray);
            return;
        }
        LoadState::Failed(message) => {
            placeholder(f, block, area, format!("Error: {message}"), Color::Red);
            return;
        }
        LoadState::Loaded => {}
    }

    if detail.sets.is_empty() {
        placeholder(
            f,
            block,
            area,
            "No sets logged. Press 'a' to add one.".into(),
            Color::DarkGray,
        );
        return;
    }

    let weight_label = app.service.config.units.weight_label();
    let header = Row::new(
        [
            "Exercise".to_string(),
            format!("Weight ({weight_label})"),
            "Reps".to_string(),
            "Comment".to_string(),
        ]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::LightBlue))),
    )
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row> = detail
        .sets
        .iter()
        .map(|set| {
            Row::new(vec![
                Cell::from(app.workout_list.exercise_name(set.exercise_id).to_string()),
                Cell::from(format!("{:.1}", set.weight)),
                Cell::from(set.reps.to_string()),
                Cell::from(set.comment.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(35),
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Min(10),
    ];
    let highlight = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.set_table_state);
}
