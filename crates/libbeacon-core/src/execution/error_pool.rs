use crate::execution::GraphQLError;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

/// Errors recorded during a request without failing the field that
/// produced them; they are appended to the response.
#[derive(Debug, Default)]
pub struct ErrorPool {
    pub(super) errors: Mutex<Vec<GraphQLError>>,
}
impl ErrorPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<GraphQLError> {
        std::mem::take(&mut *self.errors())
    }

    pub fn is_empty(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn record(&self, error: GraphQLError) {
        self.errors().push(error);
    }

    /// Recovers from a poisoned lock; the errors recorded before the panic
    /// are kept.
    fn errors(&self) -> MutexGuard<'_, Vec<GraphQLError>> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
