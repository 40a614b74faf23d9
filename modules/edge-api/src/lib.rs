//! Edge API module: stateless arithmetic over path operands and a single
//! shared current value kept in a pluggable key-value store.

pub mod module;
pub use module::EdgeApiModule;

pub mod config;
pub use config::EdgeApiConfig;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
