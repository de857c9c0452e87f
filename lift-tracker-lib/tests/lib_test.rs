use anyhow::Result;
use lift_tracker_lib::memory::{InMemoryBackend, Operation};
use lift_tracker_lib::workout_list::{
    SET_DELETE_FAILED, SET_UPDATED, SET_UPDATE_FAILED, WORKOUT_DELETE_FAILED,
};
use lift_tracker_lib::{
    one_rep_max, ApiError, AppService, Change, Config, EditStatus, ExerciseCatalog,
    ExerciseForm, ExerciseHistory, FormError, FormMessage, LoadState, WorkoutForm, WorkoutList,
    WorkoutSet, UNKNOWN_EXERCISE,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const CLOSE_DELAY: Duration = Duration::from_millis(1500);

// Helper function to create a test service over an in-memory backend
fn create_test_service() -> (AppService, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::new());
    let config = Config {
        user_id: 1,
        edit_close_delay_ms: 1500,
        ..Default::default()
    };
    let service = AppService::with_backend(config, "test_config.toml".into(), backend.clone());
    (service, backend)
}

fn loaded_list(service: &AppService) -> WorkoutList {
    let mut list = WorkoutList::new(CLOSE_DELAY);
    list.load_exercises(service);
    list.load_workouts(service);
    list
}

fn set_values(sets: &[WorkoutSet]) -> Vec<(i64, f64, i64)> {
    sets.iter().map(|s| (s.exercise_id, s.weight, s.reps)).collect()
}

#[test]
fn test_create_workout_then_add_set_end_to_end() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    assert_eq!(bench, 1);

    let mut list = loaded_list(&service);
    let mut form = WorkoutForm {
        comment: "Leg day".into(),
        ..Default::default()
    };
    let change = form.submit(&service)?;
    assert_eq!(change, Change::Workouts);
    list.apply_change(&service, change);

    let comments: Vec<&str> = list.workouts().iter().map(|w| w.comment.as_str()).collect();
    assert_eq!(comments, vec!["Leg day"]);

    let workout_id = list.workouts()[0].id;
    list.open_workout(&service, workout_id);
    {
        let form = list.new_set_form_mut().unwrap();
        form.exercise_id = Some(bench);
        form.weight = "100".into();
        form.reps = "5".into();
    }
    list.submit_new_set(&service)?;

    let detail = list.detail().unwrap();
    assert_eq!(set_values(&detail.sets), vec![(1, 100.0, 5)]);
    assert_eq!(detail.new_set, Default::default());
    assert_eq!(list.exercise_name(detail.sets[0].exercise_id), "Bench");
    Ok(())
}

#[test]
fn test_exercise_name_resolution() -> Result<()> {
    let (service, backend) = create_test_service();
    backend.seed_exercise("Bench", "Chest");
    backend.seed_exercise("Squat", "Legs");

    let mut list = WorkoutList::new(CLOSE_DELAY);
    assert_eq!(list.exercise_name(2), UNKNOWN_EXERCISE);

    list.load_exercises(&service);
    assert_eq!(list.exercise_name(2), "Squat");
    assert_eq!(list.exercise_name(99), UNKNOWN_EXERCISE);
    Ok(())
}

#[test]
fn test_successful_edit_refetches_and_closes_after_delay() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    let workout = backend.seed_workout(1, "Push");
    let set_id = backend.seed_set(workout, bench, 80.0, 8);
    let other = backend.seed_set(workout, bench, 85.0, 6);

    let mut list = loaded_list(&service);
    list.open_workout(&service, workout);
    assert!(list.start_edit(set_id));

    // Something else changes on the server while the editor is open
    backend.seed_set(workout, bench, 90.0, 3);

    {
        let editor = list.editor_mut().unwrap();
        assert_eq!(editor.reps, "8");
        editor.reps = "10".into();
        editor.weight = "82.5".into();
    }
    let now = Instant::now();
    list.submit_edit(&service, now)?;

    let detail = list.detail().unwrap();
    assert_eq!(detail.sets, backend.stored_sets(workout));
    assert!(detail.sets.iter().any(|s| s.id == other));
    let editor = detail.editor.as_ref().unwrap();
    assert_eq!(editor.status, Some(EditStatus::Saved(SET_UPDATED.to_string())));
    assert_eq!(editor.set.reps, 10);

    assert!(!list.tick(now + Duration::from_millis(1499)));
    assert!(list.detail().unwrap().editor.is_some());
    assert!(list.tick(now + CLOSE_DELAY));
    assert!(list.detail().unwrap().editor.is_none());
    Ok(())
}

#[test]
fn test_failed_edit_keeps_editor_open() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    let workout = backend.seed_workout(1, "Push");
    let set_id = backend.seed_set(workout, bench, 80.0, 8);

    let mut list = loaded_list(&service);
    list.open_workout(&service, workout);
    list.start_edit(set_id);
    backend.fail_on(Operation::UpdateSet);

    let now = Instant::now();
    let result = list.submit_edit(&service, now);
    assert!(matches!(result, Err(FormError::Remote(_))));

    let editor = list.detail().unwrap().editor.as_ref().unwrap();
    assert_eq!(
        editor.status,
        Some(EditStatus::Failed(SET_UPDATE_FAILED.to_string()))
    );
    assert_eq!(editor.closes_at(), None);
    assert!(!list.tick(now + Duration::from_secs(60)));
    Ok(())
}

#[test]
fn test_delete_set_removes_exactly_that_set_without_refetch() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    let workout = backend.seed_workout(1, "Push");
    let keep = backend.seed_set(workout, bench, 80.0, 8);
    let doomed = backend.seed_set(workout, bench, 85.0, 6);

    let mut list = loaded_list(&service);
    list.open_workout(&service, workout);
    list.start_edit(doomed);

    assert!(list.request_set_delete(doomed));
    assert_eq!(list.pending_set_delete(), Some(doomed));

    let before = backend.request_count();
    assert!(list.confirm_set_delete(&service));
    assert_eq!(backend.request_count(), before + 1);

    let detail = list.detail().unwrap();
    let ids: Vec<i64> = detail.sets.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![keep]);
    assert!(detail.editor.is_none());
    assert_eq!(list.pending_set_delete(), None);
    Ok(())
}

#[test]
fn test_failed_set_delete_raises_alert_and_keeps_list() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    let workout = backend.seed_workout(1, "Push");
    let set_id = backend.seed_set(workout, bench, 80.0, 8);

    let mut list = loaded_list(&service);
    list.open_workout(&service, workout);
    list.request_set_delete(set_id);
    backend.fail_on(Operation::DeleteSet);

    assert!(!list.confirm_set_delete(&service));
    assert_eq!(list.detail().unwrap().sets.len(), 1);
    assert_eq!(list.take_alert().as_deref(), Some(SET_DELETE_FAILED));
    assert_eq!(list.alert(), None);
    Ok(())
}

#[test]
fn test_cancel_workout_delete_makes_no_request() -> Result<()> {
    let (service, backend) = create_test_service();
    backend.seed_workout(1, "Push");
    let pull = backend.seed_workout(1, "Pull");

    let mut list = loaded_list(&service);
    let before_list = list.workouts().to_vec();

    assert!(list.request_workout_delete(pull));
    assert_eq!(list.pending_workout_delete(), Some(pull));

    let before = backend.request_count();
    list.cancel_workout_delete();
    assert_eq!(backend.request_count(), before);
    assert_eq!(list.pending_workout_delete(), None);
    assert_eq!(list.workouts(), before_list.as_slice());
    Ok(())
}

#[test]
fn test_confirm_workout_delete_filters_and_closes_detail() -> Result<()> {
    let (service, backend) = create_test_service();
    let push = backend.seed_workout(1, "Push");
    let pull = backend.seed_workout(1, "Pull");

    let mut list = loaded_list(&service);
    list.open_workout(&service, pull);
    list.request_workout_delete(pull);
    assert!(list.confirm_workout_delete(&service));

    let ids: Vec<i64> = list.workouts().iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![push]);
    assert!(list.detail().is_none());
    Ok(())
}

#[test]
fn test_failed_workout_delete_keeps_list() -> Result<()> {
    let (service, backend) = create_test_service();
    let push = backend.seed_workout(1, "Push");

    let mut list = loaded_list(&service);
    list.request_workout_delete(push);
    backend.fail_on(Operation::DeleteWorkout);

    assert!(!list.confirm_workout_delete(&service));
    assert_eq!(list.workouts().len(), 1);
    assert_eq!(list.pending_workout_delete(), None);
    assert_eq!(list.take_alert().as_deref(), Some(WORKOUT_DELETE_FAILED));
    Ok(())
}

#[test]
fn test_stale_set_responses_are_discarded() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    let first = backend.seed_workout(1, "First");
    let second = backend.seed_workout(1, "Second");
    backend.seed_set(first, bench, 50.0, 10);
    let second_set = backend.seed_set(second, bench, 60.0, 8);

    let mut list = loaded_list(&service);
    list.open_workout(&service, first);

    // Older ticket, same workout
    let old = list.begin_sets_load().unwrap();
    let new = list.begin_sets_load().unwrap();
    assert!(list.finish_sets_load(new, service.list_sets(first)));
    assert!(!list.finish_sets_load(old, Ok(Vec::new())));
    assert_eq!(list.detail().unwrap().sets.len(), 1);

    // A fetch for a workout that is no longer open
    let pending = list.begin_sets_load().unwrap();
    list.open_workout(&service, second);
    assert!(!list.finish_sets_load(pending, service.list_sets(first)));
    let ids: Vec<i64> = list.detail().unwrap().sets.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![second_set]);
    Ok(())
}

#[test]
fn test_add_set_validation_makes_no_request() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    let workout = backend.seed_workout(1, "Push");

    // Exercises not loaded yet
    let mut list = WorkoutList::new(CLOSE_DELAY);
    list.load_workouts(&service);
    list.open_workout(&service, workout);
    let before = backend.request_count();
    assert_eq!(
        list.submit_new_set(&service),
        Err(FormError::ExercisesNotLoaded)
    );

    list.load_exercises(&service);
    let before_submit = backend.request_count();
    assert!(before_submit > before);
    {
        let form = list.new_set_form_mut().unwrap();
        form.exercise_id = Some(bench);
        form.weight = "100".into();
    }
    assert_eq!(
        list.submit_new_set(&service),
        Err(FormError::SetFieldsRequired)
    );
    assert_eq!(backend.request_count(), before_submit);
    Ok(())
}

#[test]
fn test_failed_add_set_keeps_form_and_alerts() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    let workout = backend.seed_workout(1, "Push");

    let mut list = loaded_list(&service);
    list.open_workout(&service, workout);
    {
        let form = list.new_set_form_mut().unwrap();
        form.exercise_id = Some(bench);
        form.weight = "100".into();
        form.reps = "5".into();
    }
    backend.fail_on(Operation::CreateSet);

    assert!(list.submit_new_set(&service).is_err());
    let form = &list.detail().unwrap().new_set;
    assert_eq!(form.weight, "100");
    assert_eq!(form.reps, "5");
    assert!(list.alert().unwrap().starts_with("Failed to add new set"));
    Ok(())
}

#[test]
fn test_read_failures_degrade_to_empty() -> Result<()> {
    let (service, backend) = create_test_service();
    let workout = backend.seed_workout(1, "Push");
    backend.seed_exercise("Bench", "Chest");

    let mut list = loaded_list(&service);
    list.open_workout(&service, workout);
    backend.set_offline(true);

    list.load_workouts(&service);
    list.load_exercises(&service);
    list.reload_sets(&service);

    assert!(list.workouts().is_empty());
    assert!(matches!(list.workouts_state(), LoadState::Failed(_)));
    assert!(list.exercises().is_empty());
    let detail = list.detail().unwrap();
    assert!(detail.sets.is_empty());
    assert!(matches!(detail.sets_state, LoadState::Failed(_)));
    assert_eq!(list.alert(), None);
    Ok(())
}

#[test]
fn test_exercise_form_requires_both_fields() -> Result<()> {
    let (service, backend) = create_test_service();
    let mut form = ExerciseForm {
        name: "Deadlift".into(),
        ..Default::default()
    };

    assert_eq!(form.submit(&service), Err(FormError::ExerciseFieldsRequired));
    assert_eq!(
        form.message,
        Some(FormMessage::Error(
            "Both name and description are required.".to_string()
        ))
    );
    assert_eq!(backend.request_count(), 0);

    form.description = "Posterior chain".into();
    assert_eq!(form.submit(&service), Ok(Change::Exercises));
    assert_eq!(
        form.message,
        Some(FormMessage::Success("Exercise added successfully!".to_string()))
    );
    assert!(form.name.is_empty() && form.description.is_empty());
    Ok(())
}

#[test]
fn test_exercise_form_reports_server_detail() -> Result<()> {
    let (service, backend) = create_test_service();
    backend.seed_exercise("Deadlift", "Back");
    let mut form = ExerciseForm {
        name: "Deadlift".into(),
        description: "Again".into(),
        ..Default::default()
    };
    assert!(form.submit(&service).is_err());
    assert_eq!(
        form.message.as_ref().map(FormMessage::text),
        Some("Failed to add exercise: Exercise 'Deadlift' already exists")
    );

    backend.fail_on(Operation::CreateExercise);
    form.name = "Row".into();
    form.description = "Back".into();
    assert!(form.submit(&service).is_err());
    assert_eq!(
        form.message.as_ref().map(FormMessage::text),
        Some("Failed to add exercise: HTTP error! status: 500")
    );
    assert_eq!(form.name, "Row");
    Ok(())
}

#[test]
fn test_workout_form_rejects_bad_date_without_request() -> Result<()> {
    let (service, backend) = create_test_service();
    let mut form = WorkoutForm {
        comment: "Pull".into(),
        date: "next tuesday".into(),
        ..Default::default()
    };

    assert_eq!(
        form.submit(&service),
        Err(FormError::InvalidDate("next tuesday".to_string()))
    );
    assert!(form.message.as_ref().is_some_and(FormMessage::is_error));
    assert_eq!(backend.request_count(), 0);
    assert_eq!(form.comment, "Pull");

    form.date = "2024-05-01 18:30:00".into();
    assert_eq!(form.submit(&service), Ok(Change::Workouts));
    assert_eq!(
        form.message,
        Some(FormMessage::Success("Workout added successfully!".to_string()))
    );
    let workouts = service.list_workouts()?;
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].date_label(), "2024-05-01 18:30");
    assert_eq!(workouts[0].comment, "Pull");
    Ok(())
}

#[test]
fn test_workout_form_reports_http_status() -> Result<()> {
    let (service, backend) = create_test_service();
    backend.fail_on(Operation::CreateWorkout);
    let mut form = WorkoutForm {
        comment: "Leg day".into(),
        ..Default::default()
    };

    assert_eq!(
        form.submit(&service),
        Err(FormError::Remote(
            "Failed to add workout: HTTP error! status: 500".to_string()
        ))
    );
    assert_eq!(
        form.message.as_ref().map(FormMessage::text),
        Some("Failed to add workout: HTTP error! status: 500")
    );
    assert_eq!(form.comment, "Leg day");

    backend.clear_failures();
    assert!(service.list_workouts()?.is_empty());
    Ok(())
}

#[test]
fn test_catalog_orders_and_fetches_once() -> Result<()> {
    let (service, backend) = create_test_service();
    backend.seed_exercise("squat", "Legs");
    let bench = backend.seed_exercise("Bench", "Chest");

    let mut dropdown = ExerciseCatalog::dropdown();
    let mut table = ExerciseCatalog::table();
    dropdown.mount(&service);
    table.mount(&service);
    let requests = backend.request_count();
    dropdown.mount(&service);
    assert_eq!(backend.request_count(), requests);

    let sorted: Vec<&str> = dropdown.exercises().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(sorted, vec!["Bench", "squat"]);
    let unsorted: Vec<&str> = table.exercises().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(unsorted, vec!["squat", "Bench"]);

    let selected = dropdown.select(Some(bench)).map(|e| e.description.clone());
    assert_eq!(selected.as_deref(), Some("Chest"));

    backend.seed_exercise("Curl", "Arms");
    dropdown.apply_change(&service, Change::Workouts);
    assert_eq!(dropdown.exercises().len(), 2);
    dropdown.apply_change(&service, Change::Exercises);
    assert_eq!(dropdown.exercises()[1].name, "Curl");
    Ok(())
}

#[test]
fn test_catalog_shows_error_state() -> Result<()> {
    let (service, backend) = create_test_service();
    backend.fail_on(Operation::ListExercises);
    let mut table = ExerciseCatalog::table();
    table.mount(&service);
    assert_eq!(
        table.state(),
        &lift_tracker_lib::CatalogState::Failed("HTTP error! status: 500".to_string())
    );
    assert!(table.exercises().is_empty());
    Ok(())
}

#[test]
fn test_history_reports_pr_and_estimates() -> Result<()> {
    let (service, backend) = create_test_service();
    let bench = backend.seed_exercise("Bench", "Chest");
    let workout = backend.seed_workout(1, "Push");
    backend.seed_set(workout, bench, 80.0, 8);
    let top = backend.seed_set(workout, bench, 100.0, 5);

    let history = ExerciseHistory::load(&service, bench);
    assert_eq!(history.sets.len(), 2);
    assert!(history.is_record(top));
    assert_eq!(history.record.as_ref().map(|r| r.max_weight), Some(100.0));
    assert_eq!(one_rep_max(100.0, 5), Some(116.67));

    backend.set_offline(true);
    let degraded = ExerciseHistory::load(&service, bench);
    assert!(degraded.sets.is_empty());
    assert!(degraded.record.is_none());
    Ok(())
}

#[test]
fn test_service_errors_downcast_to_api_error() -> Result<()> {
    let (service, _backend) = create_test_service();
    let err = service.list_sets(404).unwrap_err();
    let api_err = err.downcast_ref::<ApiError>().unwrap();
    assert_eq!(api_err.status_code(), Some(404));
    assert_eq!(lift_tracker_lib::remote_message(&err), "Workout not found");
    Ok(())
}
