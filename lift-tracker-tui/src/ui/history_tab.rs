// lift-tracker-tui/src/ui/history_tab.rs
use crate::app::App;
use lift_tracker_lib::{one_rep_max, CatalogState, LoadState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

pub fn render_history_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    render_exercise_list(f, app, chunks[0]);
    render_history(f, app, chunks[1]);
}

fn render_exercise_list(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Exercise")
        .border_style(Style::default().fg(Color::Yellow));

    let items: Vec<ListItem> = match app.history_exercises.state() {
        CatalogState::Loading => vec![ListItem::new("Loading...")],
        CatalogState::Failed(message) => {
            vec![ListItem::new(format!("Error: {message}")).style(Style::default().fg(Color::Red))]
        }
        CatalogState::Loaded(exercises) => exercises
            .iter()
            .map(|ex| ListItem::new(ex.name.clone()))
            .collect(),
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, &mut app.history_list_state);
}

fn render_history(f: &mut Frame, app: &mut App, area: Rect) {
    let title = app
        .history_exercises
        .selected()
        .map_or_else(|| "History".to_string(), |ex| format!("History: {}", ex.name));
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(history) = app.history.as_ref() else {
        f.render_widget(
            Paragraph::new("Pick an exercise to see its sets.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    };

    if let LoadState::Failed(message) = &history.state {
        f.render_widget(
            Paragraph::new(format!("Error: {message}"))
                .style(Style::default().fg(Color::Red))
                .block(block),
            area,
        );
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let unit = app.service.config.units.weight_label();
    let record_line = match history.record.as_ref() {
        Some(pr) if pr.max_weight_set_id.is_some() => Line::from(vec![
            Span::styled("PR: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{:.1} {unit}", pr.max_weight),
                Style::default().fg(Color::Green),
            ),
        ]),
        _ => Line::from(Span::styled(
            "No personal record yet",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(record_line), chunks[0]);

    if history.sets.is_empty() {
        f.render_widget(
            Paragraph::new("No sets logged for this exercise.")
                .style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
        return;
    }

    let header = Row::new(
        [
            "Workout".to_string(),
            format!("Weight ({unit})"),
            "Reps".to_string(),
            "e1RM".to_string(),
            "Comment".to_string(),
        ]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::LightBlue))),
    )
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row> = history
        .sets
        .iter()
        .map(|set| {
            let e1rm = one_rep_max(set.weight, set.reps)
                .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
            let weight = if history.is_record(set.id) {
                format!("{:.1} *", set.weight)
            } else {
                format!("{:.1}", set.weight)
            };
            Row::new(vec![
                Cell::from(format!("#{}", set.workout_id)),
                Cell::from(weight),
                Cell::from(set.reps.to_string()),
                Cell::from(e1rm),
                Cell::from(set.comment.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(13),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, chunks[1], &mut app.history_table_state);
}
