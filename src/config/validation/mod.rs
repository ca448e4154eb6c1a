//! Configuration validation
//!
//! - `trait_def`: the Validate trait
//! - `url`: URL shape checks shared by endpoint and webhook settings
//! - `config_validators`: one implementation per configuration section
//! - `tests`: test suite for all validators

mod config_validators;
mod trait_def;
mod url;

pub use trait_def::Validate;
pub use url::validate_http_url;
