// lift-tracker-tui/src/ui/exercises_tab.rs
use crate::app::App;
use lift_tracker_lib::CatalogState;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub fn render_exercises_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Exercises");

    let exercises = match app.exercise_table.state() {
        CatalogState::Loading => {
            f.render_widget(Paragraph::new("Loading...").block(block), area);
            return;
        }
        CatalogState::Failed(message) => {
            f.render_widget(
                Paragraph::new(format!("Error: {message}"))
                    .style(Style::default().fg(Color::Red))
                    .block(block),
                area,
            );
            return;
        }
        CatalogState::Loaded(exercises) => exercises,
    };

    if exercises.is_empty() {
        f.render_widget(
            Paragraph::new("No exercises yet. Press 'a' to add one.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let header_cells = ["Name", "Description"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::LightBlue)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = exercises.iter().map(|ex| {
        Row::new(vec![
            Cell::from(ex.name.clone()),
            Cell::from(ex.description.clone()),
        ])
    });

    let widths = [Constraint::Percentage(30), Constraint::Percentage(70)];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.exercise_table_state);
}
