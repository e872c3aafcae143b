// Use cases layer: the per-user play loop and the driver that fans it out.

pub mod driver;
pub mod play;

pub use driver::{AuthMode, DriverError, DriverSettings, run_load_test};
pub use play::{PlayOutcome, play};
