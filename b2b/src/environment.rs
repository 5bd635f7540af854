//! Injected dependencies of the slice reducers.

use b2b_state_core::environment::{Clock, SystemClock};
use std::fmt;
use std::sync::Arc;

/// Environment shared by every B2B reducer
///
/// The clock stamps `last_updated_at` / `last_refreshed_at` and decides
/// whether an approval is overdue.
#[derive(Clone)]
pub struct B2BEnvironment {
    /// Time source
    pub clock: Arc<dyn Clock>,
}

impl B2BEnvironment {
    /// Environment with the given clock
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Production environment backed by the system clock
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Default for B2BEnvironment {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for B2BEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("B2BEnvironment")
            .field("now", &self.clock.now())
            .finish()
    }
}
