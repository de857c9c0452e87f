//src/memory.rs
use crate::analytics::find_pr;
use crate::api::{ApiError, Backend};
use crate::models::{Exercise, NewSet, NewWorkout, PersonalRecord, SetUpdate, Workout, WorkoutSet};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Backend operations, used to inject failures into [`InMemoryBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListExercises,
    CreateExercise,
    ListWorkouts,
    CreateWorkout,
    DeleteWorkout,
    ListSets,
    CreateSet,
    UpdateSet,
    DeleteSet,
    PersonalRecord,
    ExerciseSets,
}

#[derive(Debug)]
struct StoredWorkout {
    user_id: i64,
    workout: Workout,
}

#[derive(Debug, Default)]
struct Store {
    exercises: Vec<Exercise>,
    workouts: Vec<StoredWorkout>,
    sets: Vec<WorkoutSet>,
    last_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn has_workout(&self, workout_id: i64) -> bool {
        self.workouts.iter().any(|w| w.workout.id == workout_id)
    }

    fn user_sets(&self, user_id: i64, exercise_id: i64) -> Vec<WorkoutSet> {
        let owned: HashSet<i64> = self
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|w| w.workout.id)
            .collect();
        self.sets
            .iter()
            .filter(|s| s.exercise_id == exercise_id && owned.contains(&s.workout_id))
            .cloned()
            .collect()
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::status(404, Some(format!("{what} not found")))
}

/// In-process implementation of the REST contract.
///
/// Counts every request and can be switched offline or told to fail
/// individual operations with a server error.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    store: Mutex<Store>,
    requests: AtomicUsize,
    offline: AtomicBool,
    failing: Mutex<HashSet<Operation>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fail_on(&self, operation: Operation) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(operation);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.clear();
        }
    }

    /// Adds an exercise without counting a request. Returns its id.
    pub fn seed_exercise(&self, name: &str, description: &str) -> i64 {
        self.with_store(|store| {
            let id = store.next_id();
            store.exercises.push(Exercise {
                id,
                name: name.to_string(),
                description: description.to_string(),
            });
            id
        })
    }

    /// Adds a workout for `user_id` without counting a request. Returns its id.
    pub fn seed_workout(&self, user_id: i64, comment: &str) -> i64 {
        self.with_store(|store| {
            let id = store.next_id();
            store.workouts.push(StoredWorkout {
                user_id,
                workout: Workout {
                    id,
                    workout_date: Some(Utc::now().naive_utc()),
                    comment: comment.to_string(),
                },
            });
            id
        })
    }

    /// Adds a set without counting a request. Returns its id.
    pub fn seed_set(&self, workout_id: i64, exercise_id: i64, weight: f64, reps: i64) -> i64 {
        self.with_store(|store| {
            let id = store.next_id();
            store.sets.push(WorkoutSet {
                id,
                exercise_id,
                weight,
                reps,
                comment: String::new(),
                workout_id,
            });
            id
        })
    }

    /// Current stored sets of a workout, bypassing the request counter.
    pub fn stored_sets(&self, workout_id: i64) -> Vec<WorkoutSet> {
        self.with_store(|store| {
            store
                .sets
                .iter()
                .filter(|s| s.workout_id == workout_id)
                .cloned()
                .collect()
        })
    }

    fn with_store<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        let mut guard = self
            .store
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }

    fn begin(&self, operation: Operation) -> Result<MutexGuard<'_, Store>, ApiError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("backend is offline".to_string()));
        }
        let failing = self
            .failing
            .lock()
            .map(|f| f.contains(&operation))
            .unwrap_or(false);
        if failing {
            return Err(ApiError::status(500, None));
        }
        self.store
            .lock()
            .map_err(|_| ApiError::Unavailable("store lock poisoned".to_string()))
    }
}

impl Backend for InMemoryBackend {
    fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        let store = self.begin(Operation::ListExercises)?;
        Ok(store.exercises.clone())
    }

    fn create_exercise(&self, name: &str, description: &str) -> Result<(), ApiError> {
        let mut store = self.begin(Operation::CreateExercise)?;
        if store.exercises.iter().any(|e| e.name == name) {
            return Err(ApiError::status(
                409,
                Some(format!("Exercise '{name}' already exists")),
            ));
        }
        let id = store.next_id();
        store.exercises.push(Exercise {
            id,
            name: name.to_string(),
            description: description.to_string(),
        });
        Ok(())
    }

    fn list_workouts(&self, user_id: i64) -> Result<Vec<Workout>, ApiError> {
        let store = self.begin(Operation::ListWorkouts)?;
        Ok(store
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|w| w.workout.clone())
            .collect())
    }

    fn create_workout(&self, user_id: i64, workout: &NewWorkout) -> Result<(), ApiError> {
        let mut store = self.begin(Operation::CreateWorkout)?;
        let id = store.next_id();
        store.workouts.push(StoredWorkout {
            user_id,
            workout: Workout {
                id,
                workout_date: Some(
                    workout
                        .workout_date
                        .unwrap_or_else(|| Utc::now().naive_utc()),
                ),
                comment: workout.comment.clone(),
            },
        });
        Ok(())
    }

    fn delete_workout(&self, workout_id: i64) -> Result<(), ApiError> {
        let mut store = self.begin(Operation::DeleteWorkout)?;
        if !store.has_workout(workout_id) {
            return Err(not_found("Workout"));
        }
        store.workouts.retain(|w| w.workout.id != workout_id);
        store.sets.retain(|s| s.workout_id != workout_id);
        Ok(())
    }

    fn list_sets(&self, workout_id: i64) -> Result<Vec<WorkoutSet>, ApiError> {
        let store = self.begin(Operation::ListSets)?;
        if !store.has_workout(workout_id) {
            return Err(not_found("Workout"));
        }
        Ok(store
            .sets
            .iter()
            .filter(|s| s.workout_id == workout_id)
            .cloned()
            .collect())
    }

    fn create_set(&self, workout_id: i64, set: &NewSet) -> Result<(), ApiError> {
        let mut store = self.begin(Operation::CreateSet)?;
        if !store.has_workout(workout_id) {
            return Err(not_found("Workout"));
        }
        if !store.exercises.iter().any(|e| e.id == set.exercise_id) {
            return Err(not_found("Exercise"));
        }
        let id = store.next_id();
        store.sets.push(WorkoutSet {
            id,
            exercise_id: set.exercise_id,
            weight: set.weight,
            reps: set.reps,
            comment: set.comment.clone(),
            workout_id,
        });
        Ok(())
    }

    fn update_set(&self, set_id: i64, update: &SetUpdate) -> Result<(), ApiError> {
        let mut store = self.begin(Operation::UpdateSet)?;
        let set = store
            .sets
            .iter_mut()
            .find(|s| s.id == set_id)
            .ok_or_else(|| not_found("Set"))?;
        if let Some(reps) = update.reps {
            set.reps = reps;
        }
        if let Some(weight) = update.weight {
            set.weight = weight;
        }
        if let Some(comment) = &update.comment {
            set.comment = comment.clone();
        }
        Ok(())
    }

    fn delete_set(&self, set_id: i64) -> Result<(), ApiError> {
        let mut store = self.begin(Operation::DeleteSet)?;
        if !store.sets.iter().any(|s| s.id == set_id) {
            return Err(not_found("Set"));
        }
        store.sets.retain(|s| s.id != set_id);
        Ok(())
    }

    fn personal_record(&self, user_id: i64, exercise_id: i64) -> Result<PersonalRecord, ApiError> {
        let store = self.begin(Operation::PersonalRecord)?;
        Ok(find_pr(&store.user_sets(user_id, exercise_id)))
    }

    fn exercise_sets(&self, user_id: i64, exercise_id: i64) -> Result<Vec<WorkoutSet>, ApiError> {
        let store = self.begin(Operation::ExerciseSets)?;
        Ok(store.user_sets(user_id, exercise_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_requests_but_not_seeding() {
        let backend = InMemoryBackend::new();
        backend.seed_exercise("Bench", "Chest");
        assert_eq!(backend.request_count(), 0);
        backend.list_exercises().unwrap();
        backend.list_exercises().unwrap();
        assert_eq!(backend.request_count(), 2);
    }

    #[test]
    fn injected_failures_are_server_errors() {
        let backend = InMemoryBackend::new();
        backend.fail_on(Operation::ListExercises);
        let err = backend.list_exercises().unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        backend.clear_failures();
        assert!(backend.list_exercises().is_ok());

        backend.set_offline(true);
        assert!(matches!(
            backend.list_exercises(),
            Err(ApiError::Unavailable(_))
        ));
    }

    #[test]
    fn sets_require_known_workout_and_exercise() {
        let backend = InMemoryBackend::new();
        let workout = backend.seed_workout(1, "Push");
        let new_set = NewSet {
            exercise_id: 42,
            weight: 50.0,
            reps: 10,
            comment: String::new(),
        };
        let err = backend.create_set(workout, &new_set).unwrap_err();
        assert_eq!(err.to_string(), "Exercise not found");
        assert_eq!(err.status_code(), Some(404));
        assert!(backend.list_sets(999).is_err());
    }

    #[test]
    fn analytics_only_see_the_users_own_sets() {
        let backend = InMemoryBackend::new();
        let bench = backend.seed_exercise("Bench", "Chest");
        let mine = backend.seed_workout(1, "Mine");
        let theirs = backend.seed_workout(2, "Theirs");
        let my_set = backend.seed_set(mine, bench, 90.0, 3);
        backend.seed_set(theirs, bench, 140.0, 1);

        let pr = backend.personal_record(1, bench).unwrap();
        assert_eq!(pr.max_weight_set_id, Some(my_set));
        assert_eq!(backend.exercise_sets(1, bench).unwrap().len(), 1);
    }
}
