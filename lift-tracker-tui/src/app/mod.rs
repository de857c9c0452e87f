//src/app/mod.rs
use lift_tracker_lib::FormError;
use thiserror::Error;

// Declare the modules within the app directory
pub mod actions;
pub mod data;
pub mod input;
pub mod modals;
pub mod navigation;
pub mod state;

pub use state::{
    ActiveModal, ActiveTab, AddExerciseField, AddSetField, AddWorkoutField, App, DeleteTarget,
    EditSetField, WorkoutsFocus,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppInputError {
    #[error("No exercises available. Add one on the Exercises tab first.")]
    NoExercises,
    #[error("Nothing selected.")]
    SelectionRequired,
    #[error("{0}")]
    Form(#[from] FormError),
}
