//! ebMS Testing Infrastructure
//!
//! Mock producers, recording signal callbacks, mock collaborators and
//! fixtures shared by the integration tests of the ebMS crates.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! ebms-testkit = { path = "../ebms-testkit" }
//! ```
//!
//! ```rust,ignore
//! use ebms_testkit::*;
//!
//! let (engine, signals) = test_engine(vec![
//!     scoped_all(StaticProducer::new("outbox", test_user_message("m1@ebms"))),
//!     scoped_to(&mpc(TEST_MPC), EmptyProducer::new("idle")),
//! ]);
//! ```

pub mod collaborators;
pub mod fixtures;
pub mod producers;
pub mod signals;
pub mod strategies;

pub use collaborators::*;
pub use fixtures::*;
pub use producers::*;
pub use signals::*;

/// Install a test-friendly tracing subscriber; later calls are no-ops
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
