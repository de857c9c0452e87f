// lift-tracker-tui/src/ui/status_bar.rs
use crate::app::{ActiveModal, ActiveTab, App, WorkoutsFocus};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

fn hint(app: &App) -> &'static str {
    match app.active_modal {
        ActiveModal::None => match (app.active_tab, app.workouts_focus) {
            (ActiveTab::Workouts, WorkoutsFocus::Workouts) => {
                "[↑↓/jk] Nav | [Enter] Open | [n]ew workout | [d]elete | [r]eload | [?] Help | [q]uit "
            }
            (ActiveTab::Workouts, WorkoutsFocus::Sets) => {
                "[↑↓/jk] Nav | [a]dd set | [e]dit | [d]elete | [Tab] Workouts | [Esc] Close | [?] Help "
            }
            (ActiveTab::Exercises, _) => "[↑↓/jk] Nav | [a]dd exercise | [r]eload | [?] Help | [q]uit ",
            (ActiveTab::History, _) => "[↑↓/jk] Exercise | [r]eload | [?] Help | [q]uit ",
        },
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::AddExercise { .. } | ActiveModal::AddWorkout { .. } => {
            " [Esc] Close | [Enter] Confirm/Next | [Tab/↑↓] Navigate "
        }
        ActiveModal::AddSet { .. } => {
            " [Esc] Cancel | [Enter] Confirm/Next | [Tab/↑↓] Navigate | [←→] Exercise "
        }
        ActiveModal::EditSet { .. } => " [Esc] Cancel | [Enter] Save/Next | [Tab/↑↓] Navigate ",
        ActiveModal::ConfirmDelete { .. } => " [y] Delete | [n/Esc] Keep ",
        ActiveModal::Alert { .. } => " [Esc/Enter] Dismiss ",
    }
}

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let error_text = app.last_error.as_deref().unwrap_or("");

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let status_paragraph =
        Paragraph::new(hint(app)).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let error_paragraph = Paragraph::new(error_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::Red))
        .alignment(Alignment::Right);
    f.render_widget(error_paragraph, status_chunks[1]);
}
