//src/forms.rs
use crate::api::remote_message;
use crate::models::{parse_timestamp, NewWorkout, WORKOUT_DATE_FORMAT};
use crate::AppService;
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{error, info};

pub const EXERCISE_ADDED: &str = "Exercise added successfully!";
pub const WORKOUT_ADDED: &str = "Workout added successfully!";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Both name and description are required.")]
    ExerciseFieldsRequired,
    #[error("Please fill in all required fields (Exercise, Weight, Reps).")]
    SetFieldsRequired,
    #[error("Exercises are still loading. Try again in a moment.")]
    ExercisesNotLoaded,
    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Invalid date '{0}'. Use YYYY-MM-DD HH:MM:SS.")]
    InvalidDate(String),
    #[error("No workout is open.")]
    NoWorkoutSelected,
    #[error("No set is being edited.")]
    NoSetSelected,
    #[error("{0}")]
    Remote(String),
}

/// Which collection a successful mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Exercises,
    Workouts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Success(String),
    Error(String),
}

impl FormMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, FormError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| FormError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExerciseForm {
    pub name: String,
    pub description: String,
    pub message: Option<FormMessage>,
}

impl ExerciseForm {
    /// Creates the exercise. Both fields must be non-empty before any request is made.
    pub fn submit(&mut self, service: &AppService) -> Result<Change, FormError> {
        self.message = None;
        let name = self.name.trim();
        let description = self.description.trim();
        if name.is_empty() || description.is_empty() {
            let err = FormError::ExerciseFieldsRequired;
            self.message = Some(FormMessage::Error(err.to_string()));
            return Err(err);
        }

        match service.create_exercise(name, description) {
            Ok(()) => {
                self.name.clear();
                self.description.clear();
                self.message = Some(FormMessage::Success(EXERCISE_ADDED.to_string()));
                Ok(Change::Exercises)
            }
            Err(e) => {
                error!("Error adding exercise: {:?}", e);
                let text = format!("Failed to add exercise: {}", remote_message(&e));
                self.message = Some(FormMessage::Error(text.clone()));
                Err(FormError::Remote(text))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkoutForm {
    pub comment: String,
    /// Optional, `YYYY-MM-DD HH:MM:SS`. Empty lets the backend use the current time.
    pub date: String,
    pub message: Option<FormMessage>,
}

impl WorkoutForm {
    fn parse_date(&self) -> Result<Option<NaiveDateTime>, FormError> {
        let raw = self.date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDateTime::parse_from_str(raw, WORKOUT_DATE_FORMAT)
            .ok()
            .or_else(|| parse_timestamp(raw))
            .map(Some)
            .ok_or_else(|| FormError::InvalidDate(raw.to_string()))
    }

    pub fn submit(&mut self, service: &AppService) -> Result<Change, FormError> {
        self.message = None;
        let workout_date = match self.parse_date() {
            Ok(date) => date,
            Err(err) => {
                self.message = Some(FormMessage::Error(err.to_string()));
                return Err(err);
            }
        };
        let workout = NewWorkout {
            comment: self.comment.trim().to_string(),
            workout_date,
        };

        match service.create_workout(&workout) {
            Ok(()) => {
                info!("Workout '{}' created", workout.comment);
                self.comment.clear();
                self.date.clear();
                self.message = Some(FormMessage::Success(WORKOUT_ADDED.to_string()));
                Ok(Change::Workouts)
            }
            Err(e) => {
                error!("Error adding workout: {:?}", e);
                let text = format!("Failed to add workout: {}", remote_message(&e));
                self.message = Some(FormMessage::Error(text.clone()));
                Err(FormError::Remote(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed_before_parsing() {
        assert_eq!(parse_number::<i64>("reps", " 5 ").unwrap(), 5);
        assert_eq!(parse_number::<f64>("weight", "72.5").unwrap(), 72.5);
        assert_eq!(
            parse_number::<i64>("reps", "five").unwrap_err().to_string(),
            "Invalid number for reps: 'five'"
        );
    }

    #[test]
    fn workout_dates_accept_backend_format() {
        let mut form = WorkoutForm {
            date: "2024-05-01 18:30:00".into(),
            ..WorkoutForm::default()
        };
        assert!(form.parse_date().unwrap().is_some());
        form.date = "  ".into();
        assert_eq!(form.parse_date().unwrap(), None);
        form.date = "tomorrow".into();
        assert!(matches!(form.parse_date(), Err(FormError::InvalidDate(_))));
    }
}
