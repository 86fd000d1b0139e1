//! flagenv - Typed flag/environment configuration binding
//!
//! Declare a typed configuration value once and have it satisfiable from a
//! command-line flag and an environment variable, with a deterministic,
//! configurable rule for which source wins when both are present.
//!
//! ```no_run
//! use flagenv::{Registry, Result};
//!
//! fn main() -> Result<()> {
//!     let mut registry = Registry::new();
//!     let host = registry.bind("host", "APP_HOST", "localhost".to_string(), "server host")?;
//!     let port = registry.bind("port", "APP_PORT", 8080u32, "listen port")?;
//!
//!     registry.resolve()?;
//!
//!     println!("listening on {}:{}", host.get(), port.get());
//!     Ok(())
//! }
//! ```

pub mod bind;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use bind::{
    derive_env_name, BindValue, EnvSource, Handle, MockEnv, PrecedenceMode, Registry, StdEnv,
    Value, ValueKind, DEFAULT_SEPARATOR,
};
pub use error::{FlagenvError, Result};
