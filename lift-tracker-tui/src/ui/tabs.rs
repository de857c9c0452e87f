// lift-tracker-tui/src/ui/tabs.rs
use crate::app::{ActiveTab, App};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

pub fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = ["Workouts (F1)", "Exercises (F2)", "History (F3)"]
        .iter()
        .map(|t| Line::from(Span::styled(*t, Style::default().fg(Color::Gray))))
        .collect();

    let selected_tab_index = match app.active_tab {
        ActiveTab::Workouts => 0,
        ActiveTab::Exercises => 1,
        ActiveTab::History => 2,
    };

    let server = format!(
        " {} · user {} ",
        app.service.config.server_url, app.service.config.user_id
    );
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM).title(server))
        .select(selected_tab_index)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}
