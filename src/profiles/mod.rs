// Profiles module - named, validated bundles of sampling parameters

mod params;
mod store;

pub use params::{validate_parameters, ParameterValidationError, SamplingParameters};
pub use store::{Profile, ProfileError, ProfileStore, DEFAULT_PROFILE_NAME};
