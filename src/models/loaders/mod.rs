pub mod scenario_loader;

pub use scenario_loader::{load_scenario, Scenario};
