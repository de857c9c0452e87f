//src/analytics.rs
use crate::api::remote_message;
use crate::models::{PersonalRecord, WorkoutSet};
use crate::workout_list::LoadState;
use crate::AppService;
use tracing::error;

/// Epley estimate of the one-rep max, rounded to two decimals.
///
/// Returns `None` when `reps` is not positive.
pub fn one_rep_max(weight: f64, reps: i64) -> Option<f64> {
    if reps <= 0 {
        return None;
    }
    let estimate = weight * (1.0 + reps as f64 / 30.0);
    Some((estimate * 100.0).round() / 100.0)
}

/// Heaviest set in `sets`. Ties keep the earliest set; zero weights never count.
pub fn find_pr(sets: &[WorkoutSet]) -> PersonalRecord {
    sets.iter().fold(PersonalRecord::default(), |best, set| {
        if set.weight > best.max_weight {
            PersonalRecord {
                max_weight_set_id: Some(set.id),
                max_weight: set.weight,
            }
        } else {
            best
        }
    })
}

/// Personal record plus every set for one exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseHistory {
    pub exercise_id: i64,
    pub record: Option<PersonalRecord>,
    pub sets: Vec<WorkoutSet>,
    pub state: LoadState,
}

impl ExerciseHistory {
    /// Fetches both analytics views. Failures degrade to empty data.
    pub fn load(service: &AppService, exercise_id: i64) -> Self {
        let mut state = LoadState::Loaded;

        let sets = service.exercise_history(exercise_id).unwrap_or_else(|e| {
            error!("Error fetching history for exercise {}: {:?}", exercise_id, e);
            state = LoadState::Failed(remote_message(&e));
            Vec::new()
        });

        let record = match service.personal_record(exercise_id) {
            Ok(record) => Some(record),
            Err(e) => {
                error!("Error fetching PR for exercise {}: {:?}", exercise_id, e);
                None
            }
        };

        Self {
            exercise_id,
            record,
            sets,
            state,
        }
    }

    pub fn is_record(&self, set_id: i64) -> bool {
        self.record
            .as_ref()
            .and_then(|r| r.max_weight_set_id)
            .is_some_and(|id| id == set_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(id: i64, weight: f64, reps: i64) -> WorkoutSet {
        WorkoutSet {
            id,
            exercise_id: 1,
            weight,
            reps,
            comment: String::new(),
            workout_id: 1,
        }
    }

    #[test]
    fn epley_matches_backend_rounding() {
        assert_eq!(one_rep_max(100.0, 5), Some(116.67));
        assert_eq!(one_rep_max(60.0, 1), Some(62.0));
        assert_eq!(one_rep_max(100.0, 0), None);
    }

    #[test]
    fn pr_keeps_first_heaviest_set() {
        let sets = vec![set(1, 80.0, 5), set(2, 100.0, 3), set(3, 100.0, 1)];
        let pr = find_pr(&sets);
        assert_eq!(pr.max_weight_set_id, Some(2));
        assert_eq!(pr.max_weight, 100.0);
        assert_eq!(find_pr(&[]), PersonalRecord::default());
    }
}
