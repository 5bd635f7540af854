//! # B2B State Testing
//!
//! Testing utilities and helpers for the B2B state container.
//!
//! This crate provides:
//! - A fixed clock for deterministic timestamps and overdue checks
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Identity assertions for copy-on-write transitions
//! - One-call tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use b2b_state_testing::{assertions, test_clock, ReducerTest};
//!
//! ReducerTest::new(CartReducer::new())
//!     .with_env(B2BEnvironment::new(Arc::new(test_clock())))
//!     .given_state(CartState::default())
//!     .when_action(CartAction::RemoveItem { product_id: "missing".into() })
//!     .then_transition(assertions::assert_unchanged)
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use b2b_state_core::environment::Clock;
use std::sync::Mutex;

/// Ergonomic Given-When-Then testing for reducers
pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Mutex, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use b2b_state_testing::mocks::FixedClock;
    /// use b2b_state_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// A clock that only moves when told to
    ///
    /// Useful for overdue checks, where a test needs time to pass between
    /// two dispatches.
    #[derive(Debug)]
    pub struct ManualClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a manual clock starting at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.time.lock().map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// The instant every test clock starts at (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `tracing` subscriber that writes through the test harness
    ///
    /// Honors `RUST_LOG`; safe to call from every test (only the first call
    /// installs anything).
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{test_clock, test_epoch, FixedClock, ManualClock};
pub use reducer_test::{assertions, ReducerTest};
