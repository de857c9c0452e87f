//src/api.rs
use crate::models::{
    Exercise, NewSet, NewWorkout, PersonalRecord, SetUpdate, Workout, WorkoutSet,
    WORKOUT_DATE_FORMAT,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to reach server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Failed to decode server response: {0}")]
    Decode(String),
    #[error("Server unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl ApiError {
    /// Builds a status error, preferring the backend's own explanation.
    pub fn status(status: u16, detail: Option<String>) -> Self {
        let message = detail.unwrap_or_else(|| format!("HTTP error! status: {status}"));
        Self::Status { status, message }
    }

    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Message suitable for showing to the user for a failed service call.
pub fn remote_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api_err) => api_err.to_string(),
        None => err.to_string(),
    }
}

/// Pulls `detail` (or Flask-RESTX's `message`) out of an error body.
pub fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// The remote workout API. Every call is one request/response round trip.
pub trait Backend {
    fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError>;
    fn create_exercise(&self, name: &str, description: &str) -> Result<(), ApiError>;
    fn list_workouts(&self, user_id: i64) -> Result<Vec<Workout>, ApiError>;
    fn create_workout(&self, user_id: i64, workout: &NewWorkout) -> Result<(), ApiError>;
    fn delete_workout(&self, workout_id: i64) -> Result<(), ApiError>;
    fn list_sets(&self, workout_id: i64) -> Result<Vec<WorkoutSet>, ApiError>;
    fn create_set(&self, workout_id: i64, set: &NewSet) -> Result<(), ApiError>;
    fn update_set(&self, set_id: i64, update: &SetUpdate) -> Result<(), ApiError>;
    fn delete_set(&self, set_id: i64) -> Result<(), ApiError>;
    fn personal_record(&self, user_id: i64, exercise_id: i64) -> Result<PersonalRecord, ApiError>;
    fn exercise_sets(&self, user_id: i64, exercise_id: i64) -> Result<Vec<WorkoutSet>, ApiError>;
}

pub struct HttpBackend {
    http_client: Client,
    server_url: String,
}

impl HttpBackend {
    /// Builds a client whose every request carries the identity headers.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidHeader` if the role cannot be sent as a header,
    /// or `ApiError::Transport` if the underlying client cannot be built.
    pub fn new(
        server_url: &str,
        user_id: i64,
        user_role: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&user_id.to_string())
                .map_err(|_| ApiError::InvalidHeader(USER_ID_HEADER))?,
        );
        headers.insert(
            USER_ROLE_HEADER,
            HeaderValue::from_str(user_role).map_err(|_| ApiError::InvalidHeader(USER_ROLE_HEADER))?,
        );

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        error!("Request failed with status: {}. Body: {}", status, body);
        Err(ApiError::status(status.as_u16(), error_detail(&body)))
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send(self.http_client.get(&url))?
            .json::<T>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

pub(crate) fn workout_query(workout: &NewWorkout) -> Vec<(&'static str, String)> {
    let mut query = vec![("comment", workout.comment.clone())];
    if let Some(date) = workout.workout_date {
        query.push(("workout_date", date.format(WORKOUT_DATE_FORMAT).to_string()));
    }
    query
}

pub(crate) fn set_query(set: &NewSet) -> Vec<(&'static str, String)> {
    vec![
        ("exercise_id", set.exercise_id.to_string()),
        ("weight", set.weight.to_string()),
        ("reps", set.reps.to_string()),
        ("comment", set.comment.clone()),
    ]
}

pub(crate) fn update_query(update: &SetUpdate) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(reps) = update.reps {
        query.push(("reps", reps.to_string()));
    }
    if let Some(weight) = update.weight {
        query.push(("weight", weight.to_string()));
    }
    if let Some(comment) = &update.comment {
        query.push(("comment", comment.clone()));
    }
    query
}

impl Backend for HttpBackend {
    fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        self.fetch("/exercises/")
    }

    fn create_exercise(&self, name: &str, description: &str) -> Result<(), ApiError> {
        let url = self.url("/exercises/");
        debug!("POST {} name={:?}", url, name);
        self.send(
            self.http_client
                .post(&url)
                .query(&[("name", name), ("description", description)]),
        )?;
        Ok(())
    }

    fn list_workouts(&self, user_id: i64) -> Result<Vec<Workout>, ApiError> {
        self.fetch(&format!("/workouts/{user_id}/get"))
    }

    fn create_workout(&self, user_id: i64, workout: &NewWorkout) -> Result<(), ApiError> {
        let url = self.url(&format!("/workouts/{user_id}/add"));
        debug!("POST {}", url);
        self.send(self.http_client.post(&url).query(&workout_query(workout)))?;
        Ok(())
    }

    fn delete_workout(&self, workout_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/workouts/{workout_id}/delete"));
        debug!("DELETE {}", url);
        self.send(self.http_client.delete(&url))?;
        Ok(())
    }

    fn list_sets(&self, workout_id: i64) -> Result<Vec<WorkoutSet>, ApiError> {
        self.fetch(&format!("/sets/{workout_id}"))
    }

    fn create_set(&self, workout_id: i64, set: &NewSet) -> Result<(), ApiError> {
        let url = self.url(&format!("/sets/{workout_id}"));
        debug!("POST {} {:?}", url, set);
        self.send(self.http_client.post(&url).query(&set_query(set)).body(""))?;
        Ok(())
    }

    fn update_set(&self, set_id: i64, update: &SetUpdate) -> Result<(), ApiError> {
        let url = self.url(&format!("/sets/{set_id}/update"));
        debug!("PUT {} {:?}", url, update);
        self.send(self.http_client.put(&url).query(&update_query(update)))?;
        Ok(())
    }

    fn delete_set(&self, set_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/sets/{set_id}/delete"));
        debug!("DELETE {}", url);
        self.send(self.http_client.delete(&url))?;
        Ok(())
    }

    fn personal_record(&self, user_id: i64, exercise_id: i64) -> Result<PersonalRecord, ApiError> {
        self.fetch(&format!(
            "/analytics/users/{user_id}/exercises/{exercise_id}/findpr"
        ))
    }

    fn exercise_sets(&self, user_id: i64, exercise_id: i64) -> Result<Vec<WorkoutSet>, ApiError> {
        self.fetch(&format!(
            "/analytics/users/{user_id}/exercises/{exercise_id}/getsets"
        ))
    }
}
