// lift-tracker-tui/src/ui/layout.rs
use crate::{
    app::{ActiveModal, ActiveTab, App},
    ui::{
        exercises_tab::render_exercises_tab, history_tab::render_history_tab,
        modals::render_modal, status_bar::render_status_bar, tabs::render_tabs,
        workouts_tab::render_workouts_tab,
    },
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // Tabs on top, content below, status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status Bar
        ])
        .split(size);

    render_tabs(f, app, main_chunks[0]);
    render_main_content(f, app, main_chunks[1]);
    render_status_bar(f, app, main_chunks[2]);

    // Render modal last if active
    app.modal_area = if app.active_modal == ActiveModal::None {
        None
    } else {
        render_modal(f, app)
    };
}

fn render_main_content(f: &mut Frame, app: &mut App, area: Rect) {
    match app.active_tab {
        ActiveTab::Workouts => render_workouts_tab(f, app, area),
        ActiveTab::Exercises => render_exercises_tab(f, app, area),
        ActiveTab::History => render_history_tab(f, app, area),
    }
}

/// Helper function to create a centered rectangle with fixed dimensions.
/// Ensures the dimensions do not exceed the available screen size `r`.
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let clamped_width = width.min(r.width);
    let clamped_height = height.min(r.height);

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(clamped_height) / 2),
            Constraint::Length(clamped_height),
            Constraint::Length(r.height.saturating_sub(clamped_height) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(r.width.saturating_sub(clamped_width) / 2),
            Constraint::Length(clamped_width),
            Constraint::Length(r.width.saturating_sub(clamped_width) / 2),
        ])
        .split(popup_layout[1])[1] // Take the middle chunk
}
