//src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use lift_tracker_lib::{
    forms::EXERCISE_ADDED, models::exercise_name, one_rep_max, remote_message, AppService,
    ConnectionOverrides, Exercise, ExerciseForm, NewSet, NewWorkout, PersonalRecord, SetUpdate,
    Units, Workout, WorkoutSet,
};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {}...", shell);
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    init_logging(cli_args.verbose);

    let overrides = ConnectionOverrides {
        server_url: cli_args.server,
        user_id: cli_args.user,
    };
    let mut service = AppService::initialize_with(&overrides)
        .context("Failed to initialize application service")?;
    let header_color: Color = service.config.header_color().into();
    let units = service.config.units;

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        // --- Exercise Commands ---
        cli::Commands::ListExercises => match service.list_exercises() {
            Ok(exercises) if export_csv => print_exercise_csv(&exercises)?,
            Ok(exercises) if exercises.is_empty() => println!("No exercises defined yet."),
            Ok(exercises) => print_exercise_table(&exercises, header_color),
            Err(e) => bail!("Error listing exercises: {}", remote_message(&e)),
        },
        cli::Commands::CreateExercise { name, description } => {
            println!("{}", create_exercise(&service, name, description)?);
        }

        // --- Workout Commands ---
        cli::Commands::ListWorkouts => match service.list_workouts() {
            Ok(workouts) if export_csv => print_workout_csv(&workouts)?,
            Ok(workouts) if workouts.is_empty() => println!("No workouts found."),
            Ok(workouts) => print_workout_table(&workouts, header_color),
            Err(e) => bail!("Error listing workouts: {}", remote_message(&e)),
        },
        cli::Commands::AddWorkout { comment, date } => {
            let workout = NewWorkout {
                comment: comment.trim().to_string(),
                workout_date: date,
            };
            match service.create_workout(&workout) {
                Ok(()) => println!("Successfully added workout."),
                Err(e) => bail!("Error adding workout: {}", remote_message(&e)),
            }
        }
        cli::Commands::DeleteWorkout { id } => match service.delete_workout(id) {
            Ok(()) => println!("Successfully deleted workout ID {}.", id),
            Err(e) => bail!("Error deleting workout: {}", remote_message(&e)),
        },

        // --- Set Commands ---
        cli::Commands::ListSets { workout_id } => {
            let sets = match service.list_sets(workout_id) {
                Ok(sets) => sets,
                Err(e) => bail!("Error listing sets: {}", remote_message(&e)),
            };
            let exercises = exercises_or_empty(&service);
            if export_csv {
                print_set_csv(&sets, &exercises, units)?;
            } else if sets.is_empty() {
                println!("No sets logged for workout {}.", workout_id);
            } else {
                print_set_table(&sets, &exercises, header_color, units);
            }
        }
        cli::Commands::AddSet {
            workout_id,
            exercise,
            weight,
            reps,
            comment,
        } => {
            let set = NewSet {
                exercise_id: exercise,
                weight,
                reps,
                comment: comment.trim().to_string(),
            };
            match service.add_set(workout_id, &set) {
                Ok(()) => println!(
                    "Successfully logged {} x {:.1} {} to workout {}.",
                    reps,
                    weight,
                    units.weight_label(),
                    workout_id
                ),
                Err(e) => bail!("Failed to add new set: {}", remote_message(&e)),
            }
        }
        cli::Commands::EditSet {
            id,
            reps,
            weight,
            comment,
        } => {
            let update = set_update(reps, weight, comment)?;
            match service.update_set(id, &update) {
                Ok(()) => println!("Set updated successfully!"),
                Err(e) => bail!("Error updating set: {}", remote_message(&e)),
            }
        }
        cli::Commands::DeleteSet { id } => match service.delete_set(id) {
            Ok(()) => println!("Successfully deleted set ID {}.", id),
            Err(e) => bail!("Error deleting set: {}", remote_message(&e)),
        },

        // --- Analytics ---
        cli::Commands::Pr { exercise_id } => match service.personal_record(exercise_id) {
            Ok(record) => {
                let name = exercise_label(&service, exercise_id);
                print_personal_record(&name, &record, units);
            }
            Err(e) => bail!("Error fetching personal record: {}", remote_message(&e)),
        },
        cli::Commands::History { exercise_id } => {
            let sets = match service.exercise_history(exercise_id) {
                Ok(sets) => sets,
                Err(e) => bail!("Error fetching history: {}", remote_message(&e)),
            };
            if export_csv {
                print_history_csv(&sets, units)?;
            } else if sets.is_empty() {
                println!("No sets logged for this exercise.");
            } else {
                let name = exercise_label(&service, exercise_id);
                println!("History for {}:", name);
                print_history_table(&sets, header_color, units);
            }
        }

        // --- Config Commands ---
        cli::Commands::SetServer { url } => match service.set_server_url(&url) {
            Ok(()) => println!("Server set to {}.", service.config.server_url),
            Err(e) => bail!("Error setting server: {:#}", e),
        },
        cli::Commands::SetUser { id, role } => match service.set_user(id, role.as_deref()) {
            Ok(()) => println!(
                "Now acting as user {} (role '{}').",
                service.config.user_id, service.config.user_role
            ),
            Err(e) => bail!("Error setting user: {:#}", e),
        },
        cli::Commands::ConfigPath => {
            println!("{}", service.get_config_path().display());
        }
    }

    Ok(())
}

/// Runs the same validation and messages as the TUI's add-exercise form.
fn create_exercise(service: &AppService, name: String, description: String) -> Result<String> {
    let mut form = ExerciseForm {
        name,
        description,
        ..Default::default()
    };
    form.submit(service)?;
    Ok(form
        .message
        .map_or_else(|| EXERCISE_ADDED.to_string(), |m| m.text().to_string()))
}

fn set_update(reps: Option<i64>, weight: Option<f64>, comment: Option<String>) -> Result<SetUpdate> {
    let update = SetUpdate {
        reps,
        weight,
        comment: comment.map(|c| c.trim().to_string()),
    };
    if update.is_empty() {
        bail!("Nothing to change. Pass --reps, --weight or --comment.");
    }
    Ok(update)
}

/// Name lookups are cosmetic, so a failed fetch falls back to the placeholder name.
fn exercises_or_empty(service: &AppService) -> Vec<Exercise> {
    service.list_exercises().unwrap_or_else(|e| {
        warn!("Could not load exercise names: {:#}", e);
        Vec::new()
    })
}

fn exercise_label(service: &AppService, exercise_id: i64) -> String {
    exercise_name(&exercises_or_empty(service), exercise_id).to_string()
}

fn print_exercise_table(exercises: &[Exercise], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Name").fg(header_color),
            Cell::new("Description").fg(header_color),
        ]);

    for exercise in exercises {
        table.add_row(vec![
            Cell::new(exercise.id.to_string()),
            Cell::new(&exercise.name),
            Cell::new(&exercise.description),
        ]);
    }
    println!("{table}");
}

fn print_workout_table(workouts: &[Workout], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Date").fg(header_color),
            Cell::new("Comment").fg(header_color),
        ]);

    for workout in workouts {
        table.add_row(vec![
            Cell::new(workout.id.to_string()),
            Cell::new(workout.date_label()),
            Cell::new(if workout.comment.is_empty() {
                "-"
            } else {
                workout.comment.as_str()
            }),
        ]);
    }
    println!("{table}");
}

fn print_set_table(sets: &[WorkoutSet], exercises: &[Exercise], header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Comment").fg(header_color),
        ]);

    for set in sets {
        table.add_row(vec![
            Cell::new(set.id.to_string()),
            Cell::new(exercise_name(exercises, set.exercise_id)),
            Cell::new(format!("{:.2}", set.weight)),
            Cell::new(set.reps.to_string()),
            Cell::new(&set.comment),
        ]);
    }
    println!("{table}");
}

fn print_personal_record(name: &str, record: &PersonalRecord, units: Units) {
    match record.max_weight_set_id {
        Some(set_id) => println!(
            "PR for {}: {:.2} {} (set ID {})",
            name,
            record.max_weight,
            units.weight_label(),
            set_id
        ),
        None => println!("No personal record for {} yet.", name),
    }
}

fn e1rm_label(set: &WorkoutSet) -> String {
    one_rep_max(set.weight, set.reps).map_or("-".to_string(), |v| format!("{:.2}", v))
}

fn print_history_table(sets: &[WorkoutSet], header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Set ID").fg(header_color),
            Cell::new("Workout ID").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Est. 1RM").fg(header_color),
            Cell::new("Comment").fg(header_color),
        ]);

    for set in sets {
        table.add_row(vec![
            Cell::new(set.id.to_string()),
            Cell::new(set.workout_id.to_string()),
            Cell::new(format!("{:.2}", set.weight)),
            Cell::new(set.reps.to_string()),
            Cell::new(e1rm_label(set)),
            Cell::new(&set.comment),
        ]);
    }
    println!("{table}");
}

fn print_exercise_csv(exercises: &[Exercise]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["ID", "Name", "Description"])?;
    for exercise in exercises {
        writer.write_record([
            exercise.id.to_string(),
            exercise.name.clone(),
            exercise.description.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_workout_csv(workouts: &[Workout]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["ID", "Date", "Comment"])?;
    for workout in workouts {
        writer.write_record([
            workout.id.to_string(),
            workout
                .workout_date
                .map_or(String::new(), |d| d.format("%Y-%m-%dT%H:%M:%S").to_string()),
            workout.comment.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_set_csv(sets: &[WorkoutSet], exercises: &[Exercise], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    let weight_header = format!("Weight_{}", units.weight_label());
    writer.write_record(["ID", "Exercise", weight_header.as_str(), "Reps", "Comment"])?;
    for set in sets {
        writer.write_record([
            set.id.to_string(),
            exercise_name(exercises, set.exercise_id).to_string(),
            format!("{:.2}", set.weight),
            set.reps.to_string(),
            set.comment.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_history_csv(sets: &[WorkoutSet], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    let weight_header = format!("Weight_{}", units.weight_label());
    writer.write_record([
        "Set_ID",
        "Workout_ID",
        weight_header.as_str(),
        "Reps",
        "Est_1RM",
        "Comment",
    ])?;
    for set in sets {
        writer.write_record([
            set.id.to_string(),
            set.workout_id.to_string(),
            format!("{:.2}", set.weight),
            set.reps.to_string(),
            one_rep_max(set.weight, set.reps).map_or(String::new(), |v| format!("{:.2}", v)),
            set.comment.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_tracker_lib::memory::InMemoryBackend;
    use lift_tracker_lib::Config;
    use std::sync::Arc;

    fn test_service() -> (AppService, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        let service =
            AppService::with_backend(Config::default(), "test_config.toml".into(), backend.clone());
        (service, backend)
    }

    #[test]
    fn create_exercise_shares_form_validation() {
        let (service, backend) = test_service();

        let err = create_exercise(&service, " Row ".into(), "  ".into()).unwrap_err();
        assert_eq!(err.to_string(), "Both name and description are required.");
        assert_eq!(backend.request_count(), 0);

        let message = create_exercise(&service, " Row ".into(), "Back".into()).unwrap();
        assert_eq!(message, "Exercise added successfully!");
        let names: Vec<String> = service
            .list_exercises()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Row".to_string()]);
    }

    #[test]
    fn create_exercise_reports_server_detail() {
        let (service, backend) = test_service();
        backend.seed_exercise("Row", "Back");
        let err = create_exercise(&service, "Row".into(), "Again".into()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to add exercise: Exercise 'Row' already exists"
        );
    }

    #[test]
    fn set_update_needs_at_least_one_field() {
        assert!(set_update(None, None, None).is_err());
        let update = set_update(Some(6), None, Some(" paused ".into())).unwrap();
        assert_eq!(update.reps, Some(6));
        assert_eq!(update.weight, None);
        assert_eq!(update.comment.as_deref(), Some("paused"));
    }
}
