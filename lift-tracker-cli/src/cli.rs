// src/cli.rs
use chrono::NaiveDateTime;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use lift_tracker_lib::models::parse_timestamp;

#[derive(Parser, Debug)]
#[command(author, version, about = "A CLI client for the lift tracker server", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output tables as CSV instead of formatted tables
    #[arg(long, global = true)]
    pub export_csv: bool,

    /// Server URL for this invocation (not saved)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// User id for this invocation (not saved)
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<i64>,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

fn parse_workout_date(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("'{raw}' is not a date like 2024-05-01 18:30:00"))
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all exercises known to the server
    ListExercises,
    /// Define a new exercise
    CreateExercise {
        /// Name of the exercise (e.g., "Bench Press")
        #[arg(short, long)]
        name: String,
        /// Short description of the movement
        #[arg(short, long)]
        description: String,
    },
    /// List your workouts
    ListWorkouts,
    /// Start a new workout
    AddWorkout {
        /// Free-form note about the session
        #[arg(short, long, default_value = "")]
        comment: String,
        /// When the workout happened (defaults to now on the server)
        #[arg(short, long, value_parser = parse_workout_date)]
        date: Option<NaiveDateTime>,
    },
    /// Delete a workout and all of its sets
    DeleteWorkout {
        /// ID of the workout to delete
        id: i64,
    },
    /// List the sets of a workout
    ListSets {
        /// ID of the workout
        workout_id: i64,
    },
    /// Log a set into a workout
    AddSet {
        /// ID of the workout
        workout_id: i64,
        /// ID of the exercise performed
        #[arg(short, long)]
        exercise: i64,
        /// Weight lifted
        #[arg(short, long)]
        weight: f64,
        /// Number of repetitions
        #[arg(short, long)]
        reps: i64,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Change a logged set. Omitted fields are left as they are.
    EditSet {
        /// ID of the set
        id: i64,
        #[arg(short, long)]
        reps: Option<i64>,
        #[arg(short, long)]
        weight: Option<f64>,
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Delete a logged set
    DeleteSet {
        /// ID of the set
        id: i64,
    },
    /// Show the heaviest set logged for an exercise
    Pr {
        /// ID of the exercise
        exercise_id: i64,
    },
    /// Show every set logged for an exercise, with estimated one-rep max
    History {
        /// ID of the exercise
        exercise_id: i64,
    },
    /// Save the server URL to the config file
    SetServer { url: String },
    /// Save the user id (and optionally role) to the config file
    SetUser {
        id: i64,
        #[arg(long)]
        role: Option<String>,
    },
    /// Show the path to the config file
    ConfigPath,
    /// Generate shell completion scripts
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

// Command structure used for completion generation
pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
