// Config module - the persisted user data file

mod store;

pub use store::{ConfigError, ConfigFile, ConfigStore};
