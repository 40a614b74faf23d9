pub mod arithmetic;
pub mod calculator;
pub mod error;
pub mod models;
pub mod operation;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod service_test;
