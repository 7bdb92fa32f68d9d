//! Parameter management types
//!
//! This module provides the parameter store and the load sensor's
//! parameter block. Loading settings from persistent storage and wiring
//! them from user configuration happen outside this crate.

pub mod error;
pub mod load;
pub mod storage;

pub use error::ParameterError;
pub use load::LoadParams;
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};
