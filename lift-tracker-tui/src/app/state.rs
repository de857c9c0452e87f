//src/app/state.rs
use lift_tracker_lib::{
    AppService, ExerciseCatalog, ExerciseForm, ExerciseHistory, WorkoutForm, WorkoutList,
};
use ratatui::layout::Rect;
use ratatui::widgets::{ListState, TableState};
use std::time::{Duration, Instant};

const ERROR_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Workouts,
    Exercises,
    History,
}

// Which pane has focus on the Workouts tab
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkoutsFocus {
    Workouts,
    Sets,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddExerciseField {
    Name,
    Description,
    Confirm,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddWorkoutField {
    Comment,
    Date,
    Confirm,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddSetField {
    Exercise,
    Weight,
    Reps,
    Comment,
    Confirm,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditSetField {
    Reps,
    Weight,
    Comment,
    Confirm,
    Cancel,
}

macro_rules! field_cycle {
    ($ty:ident: $($variant:ident),+) => {
        impl $ty {
            const ORDER: &'static [$ty] = &[$($ty::$variant),+];

            pub fn next(self) -> Self {
                let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
                Self::ORDER[(i + 1) % Self::ORDER.len()]
            }

            pub fn previous(self) -> Self {
                let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
                Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
            }
        }
    };
}

field_cycle!(AddExerciseField: Name, Description, Confirm, Cancel);
field_cycle!(AddWorkoutField: Comment, Date, Confirm, Cancel);
field_cycle!(AddSetField: Exercise, Weight, Reps, Comment, Confirm, Cancel);
field_cycle!(EditSetField: Reps, Weight, Comment, Confirm, Cancel);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    Workout,
    Set,
}

// The form buffers for sets live in the workout list; the modal only tracks focus.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveModal {
    None,
    Help,
    AddExercise {
        form: ExerciseForm,
        focused_field: AddExerciseField,
    },
    AddWorkout {
        form: WorkoutForm,
        focused_field: AddWorkoutField,
    },
    AddSet {
        focused_field: AddSetField,
        error_message: Option<String>,
    },
    EditSet {
        focused_field: EditSetField,
    },
    ConfirmDelete {
        target: DeleteTarget,
    },
    Alert {
        message: String,
    },
}

pub struct App {
    pub service: AppService,
    pub active_tab: ActiveTab,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    /// Screen area of the modal drawn last frame, for backdrop clicks.
    pub modal_area: Option<Rect>,
    pub last_error: Option<String>, // For status bar errors
    pub error_clear_time: Option<Instant>,

    // === Workouts Tab State ===
    pub workout_list: WorkoutList,
    pub workouts_focus: WorkoutsFocus,
    pub workout_table_state: TableState,
    pub set_table_state: TableState,

    // === Exercises Tab State ===
    pub exercise_table: ExerciseCatalog,
    pub exercise_table_state: TableState,

    // === History Tab State ===
    pub history_exercises: ExerciseCatalog,
    pub history_list_state: ListState,
    pub history: Option<ExerciseHistory>,
    pub history_table_state: TableState,
}

impl App {
    pub fn new(service: AppService) -> Self {
        let workout_list = WorkoutList::new(service.config.edit_close_delay());
        Self {
            active_tab: ActiveTab::Workouts,
            should_quit: false,
            active_modal: ActiveModal::None,
            modal_area: None,
            last_error: None,
            error_clear_time: None,
            workout_list,
            workouts_focus: WorkoutsFocus::Workouts,
            workout_table_state: TableState::default(),
            set_table_state: TableState::default(),
            exercise_table: ExerciseCatalog::table(),
            exercise_table_state: TableState::default(),
            history_exercises: ExerciseCatalog::dropdown(),
            history_list_state: ListState::default(),
            history: None,
            history_table_state: TableState::default(),
            service,
        }
    }

    // Method to set status bar errors
    pub fn set_error(&mut self, msg: String) {
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + ERROR_DISPLAY);
    }

    pub(crate) fn clear_expired_error(&mut self, now: Instant) {
        if let Some(clear_time) = self.error_clear_time {
            if now >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }
    }

    pub fn selected_workout_id(&self) -> Option<i64> {
        self.workout_table_state
            .selected()
            .and_then(|i| self.workout_list.workouts().get(i))
            .map(|w| w.id)
    }

    pub fn selected_set_id(&self) -> Option<i64> {
        let detail = self.workout_list.detail()?;
        self.set_table_state
            .selected()
            .and_then(|i| detail.sets.get(i))
            .map(|s| s.id)
    }
}
