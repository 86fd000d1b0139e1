//! Binding registry and precedence resolution
//!
//! This module contains the core engine: typed value kinds and coercion,
//! the registry of declared bindings, the environment source abstraction,
//! and the resolution pass that decides which source wins.

pub mod env;
pub mod registry;
pub mod value;

mod resolver;

pub use env::{EnvSource, MockEnv, StdEnv};
pub use registry::{derive_env_name, Handle, PrecedenceMode, Registry, DEFAULT_SEPARATOR};
pub use value::{BindValue, Value, ValueKind};
