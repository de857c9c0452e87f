//src/models.rs
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Label shown in place of an exercise name that cannot be resolved.
pub const UNKNOWN_EXERCISE: &str = "Unknown Exercise";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Format the backend accepts for the `workout_date` query parameter.
pub const WORKOUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        serialize_with = "serialize_timestamp"
    )]
    pub workout_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
}

impl Workout {
    pub fn date_label(&self) -> String {
        self.workout_date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string())
    }
}

/// One performed set within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exercise_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reps: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workout_id: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewWorkout {
    pub comment: String,
    pub workout_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSet {
    pub exercise_id: i64,
    pub weight: f64,
    pub reps: i64,
    pub comment: String,
}

/// Fields sent with a set update. `None` leaves the stored value alone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetUpdate {
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub comment: Option<String>,
}

impl SetUpdate {
    pub fn is_empty(&self) -> bool {
        self.reps.is_none() && self.weight.is_none() && self.comment.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersonalRecord {
    #[serde(default)]
    pub max_weight_set_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_weight: f64,
}

/// Resolve a display name for `exercise_id` against a cached exercise list.
pub fn exercise_name(exercises: &[Exercise], exercise_id: i64) -> &str {
    exercises
        .iter()
        .find(|e| e.id == exercise_id)
        .map_or(UNKNOWN_EXERCISE, |e| e.name.as_str())
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}

fn serialize_timestamp<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_payloads_with_nulls() {
        let json = r#"[{"id": 3, "exercise_id": 1, "weight": null, "reps": 5, "comment": null, "workout_id": 9}]"#;
        let sets: Vec<WorkoutSet> = serde_json::from_str(json).unwrap();
        assert_eq!(sets[0].weight, 0.0);
        assert_eq!(sets[0].comment, "");
        assert_eq!(sets[0].reps, 5);
    }

    #[test]
    fn accepts_naive_and_offset_timestamps() {
        let naive: Workout =
            serde_json::from_str(r#"{"id": 1, "workout_date": "2024-05-01T10:30:00", "comment": "Leg day"}"#)
                .unwrap();
        let offset: Workout = serde_json::from_str(
            r#"{"id": 2, "workout_date": "2024-05-01T10:30:00+00:00", "comment": null}"#,
        )
        .unwrap();
        assert_eq!(naive.workout_date, offset.workout_date);
        assert_eq!(naive.date_label(), "2024-05-01 10:30");
        assert_eq!(offset.comment, "");
    }

    #[test]
    fn missing_date_renders_placeholder() {
        let w: Workout = serde_json::from_str(r#"{"id": 1, "workout_date": null}"#).unwrap();
        assert_eq!(w.date_label(), "-");
    }

    #[test]
    fn resolves_exercise_names_with_fallback() {
        let exercises = vec![
            Exercise { id: 1, name: "Bench".into(), description: String::new() },
            Exercise { id: 2, name: "Squat".into(), description: String::new() },
        ];
        assert_eq!(exercise_name(&exercises, 2), "Squat");
        assert_eq!(exercise_name(&exercises, 99), UNKNOWN_EXERCISE);
        assert_eq!(exercise_name(&[], 1), UNKNOWN_EXERCISE);
    }
}
