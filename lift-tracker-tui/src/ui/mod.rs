mod exercises_tab;
mod history_tab;
mod layout;
pub mod modal;
mod modals;
mod status_bar;
mod tabs;
mod workouts_tab;

pub use layout::render_ui;
