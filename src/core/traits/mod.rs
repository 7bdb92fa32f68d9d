//! Platform abstraction traits for the load sensor component.
//!
//! # Features
//!
//! - **`embassy`**: Enables Embassy implementations (`EmbassyTime`, `EmbassyState<T>`)
//! - Mock implementations are always available for host testing

pub mod sync;
pub mod time;

pub use sync::{MockState, SharedState};
pub use time::{MockTime, TimeSource};

#[cfg(feature = "embassy")]
pub use sync::EmbassyState;

#[cfg(feature = "embassy")]
pub use time::EmbassyTime;
