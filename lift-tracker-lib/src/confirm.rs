//src/confirm.rs

/// A value staged until the user confirms or cancels an irreversible action.
///
/// The confirmation dialog is shown exactly while a value is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<T> {
    pending: Option<T>,
}

impl<T> Default for Confirmation<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Confirmation<T> {
    pub fn request(&mut self, value: T) {
        self.pending = Some(value);
    }

    pub const fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Hands the staged value to the confirm path, closing the dialog.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
