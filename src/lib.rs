pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::LoadTestConfig;
pub use frameworks::runner::{run, run_with_config};
