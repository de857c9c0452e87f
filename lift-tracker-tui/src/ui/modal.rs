// lift-tracker-tui/src/ui/modal.rs
use crate::ui::layout::centered_rect_fixed;
use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Style, Stylize},
    widgets::{block::Title, Block, Borders, Clear},
    Frame,
};

pub const CLOSE_HINT: &str = " [x] Esc ";

/// Draws an empty modal frame centered on screen and returns
/// `(outer, inner)` areas. The outer area is what backdrop clicks test against.
pub fn render_modal_frame(
    f: &mut Frame,
    title: &str,
    width: u16,
    height: u16,
    border: Color,
) -> (Rect, Rect) {
    let area = centered_rect_fixed(width, height, f.size());
    let block = Block::default()
        .title(Title::from(title.to_string()).alignment(Alignment::Left))
        .title(Title::from(CLOSE_HINT).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().fg(border));

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    (area, inner)
}

/// True when (`column`, `row`) lies outside `area`.
pub fn is_backdrop_click(area: Rect, column: u16, row: u16) -> bool {
    let inside_x = column >= area.x && column < area.x.saturating_add(area.width);
    let inside_y = row >= area.y && row < area.y.saturating_add(area.height);
    !(inside_x && inside_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_count_as_inside() {
        let area = Rect::new(10, 5, 20, 6);
        assert!(!is_backdrop_click(area, 10, 5));
        assert!(!is_backdrop_click(area, 29, 10));
        assert!(is_backdrop_click(area, 30, 10));
        assert!(is_backdrop_click(area, 29, 11));
        assert!(is_backdrop_click(area, 9, 7));
    }
}
