//! Embassy tasks driving the load sensor

pub mod load;

pub use load::{run_load_loop_hook, run_load_polling};
