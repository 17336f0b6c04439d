/// Generation configuration and mode enumerations
pub mod config;
/// Range validation and schema migration
pub mod validator;
