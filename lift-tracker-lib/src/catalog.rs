//src/catalog.rs
use crate::api::remote_message;
use crate::forms::Change;
use crate::models::Exercise;
use crate::AppService;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrder {
    /// Case-insensitive by name, for pickers.
    Alphabetical,
    /// As returned by the server.
    Backend,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Loading,
    Loaded(Vec<Exercise>),
    Failed(String),
}

/// Read-only exercise list, fetched once when first shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseCatalog {
    order: CatalogOrder,
    state: CatalogState,
    selected: Option<i64>,
    mounted: bool,
}

impl ExerciseCatalog {
    pub const fn new(order: CatalogOrder) -> Self {
        Self {
            order,
            state: CatalogState::Loading,
            selected: None,
            mounted: false,
        }
    }

    pub const fn dropdown() -> Self {
        Self::new(CatalogOrder::Alphabetical)
    }

    pub const fn table() -> Self {
        Self::new(CatalogOrder::Backend)
    }

    /// Fetches on the first call only.
    pub fn mount(&mut self, service: &AppService) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.refresh(service);
    }

    pub fn refresh(&mut self, service: &AppService) {
        self.state = match service.list_exercises() {
            Ok(mut exercises) => {
                if self.order == CatalogOrder::Alphabetical {
                    exercises.sort_by_key(|e| e.name.to_lowercase());
                }
                CatalogState::Loaded(exercises)
            }
            Err(e) => {
                error!("Error fetching exercises: {:?}", e);
                CatalogState::Failed(remote_message(&e))
            }
        };
        if self.selected().is_none() {
            self.selected = None;
        }
    }

    /// Re-fetches if mounted and the change concerns exercises.
    pub fn apply_change(&mut self, service: &AppService, change: Change) {
        if self.mounted && change == Change::Exercises {
            self.refresh(service);
        }
    }

    pub const fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn exercises(&self) -> &[Exercise] {
        match &self.state {
            CatalogState::Loaded(exercises) => exercises,
            _ => &[],
        }
    }

    pub fn select(&mut self, exercise_id: Option<i64>) -> Option<&Exercise> {
        self.selected = exercise_id;
        self.selected()
    }

    pub fn selected(&self) -> Option<&Exercise> {
        let id = self.selected?;
        self.exercises().iter().find(|e| e.id == id)
    }
}
