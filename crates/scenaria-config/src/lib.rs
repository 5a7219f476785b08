//! Scenaria Config
//!
//! This crate contains the serializable configuration types for scenaria:
//! the harness settings ([`HarnessConfig`]) and the suites of test cases the
//! harness drives against a running service ([`Catalog`], [`Suite`],
//! [`TestCase`]).
//!
//! Both can be loaded from JSON. When no suite file is supplied the CLI falls
//! back to [`Catalog::builtin`].

mod catalog;
mod error;
mod harness;
mod suite;

pub use catalog::Catalog;
pub use error::ConfigError;
pub use harness::HarnessConfig;
pub use suite::{Suite, TestCase};
