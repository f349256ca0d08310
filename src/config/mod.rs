//! Request configuration

pub mod request;

pub use request::PlanRequest;
