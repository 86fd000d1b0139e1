//! Binding registry
//!
//! This module owns the mapping from a declared configuration value to its
//! default, its environment variable name, and the cell the resolver
//! ultimately writes the final value into. Each registry is an independent
//! resolution session; there is no process-global state.

use crate::bind::value::{BindValue, Value, ValueKind};
use crate::error::{FlagenvError, Result};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Default separator used when deriving environment variable names from
/// flag names, e.g. `project-id` becomes `PROJECT_ID`.
pub const DEFAULT_SEPARATOR: &str = "-";

/// Which source wins when both a flag and an environment variable supply a
/// value for the same binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecedenceMode {
    /// The environment variable's value wins on conflict (the default).
    #[default]
    EnvWins,
    /// The explicitly passed flag value wins on conflict.
    FlagWins,
}

/// One declared configuration value: name, env var, default, and the cell
/// resolution commits into. Created once at declaration time and read-only
/// afterwards.
pub(crate) struct Binding {
    pub(crate) name: String,
    pub(crate) env_var: String,
    pub(crate) kind: ValueKind,
    pub(crate) default: Value,
    pub(crate) usage: String,
    pub(crate) cell: Rc<RefCell<Value>>,
}

/// Caller-held handle to a binding's cell.
///
/// Holds the declared default until a resolution pass commits a value.
pub struct Handle<T> {
    cell: Rc<RefCell<Value>>,
    _marker: PhantomData<T>,
}

impl<T: BindValue> Handle<T> {
    /// Read the current value: the declared default before resolution, the
    /// resolved value after.
    pub fn get(&self) -> T {
        // The cell only ever holds the declared kind; a mismatch is a
        // programming error inside this crate, not a runtime condition.
        T::from_value(&self.cell.borrow()).expect("binding cell holds a value of the declared kind")
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("value", &*self.cell.borrow())
            .finish()
    }
}

/// Registry of bindings for one resolution session.
#[derive(Default)]
pub struct Registry {
    bindings: Vec<Binding>,
    mode: PrecedenceMode,
    env_prefix: String,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the precedence mode. May be changed at any time before a
    /// resolution pass; it is read once per binding during resolution.
    pub fn set_mode(&mut self, mode: PrecedenceMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> PrecedenceMode {
        self.mode
    }

    /// Set the prefix used when environment variable names are derived from
    /// flag names via [`Registry::bind_auto`]. Explicitly supplied names are
    /// never prefixed.
    pub fn set_env_prefix(&mut self, prefix: impl Into<String>) {
        self.env_prefix = prefix.into();
    }

    /// Declare a typed configuration value satisfiable from the flag `name`
    /// and the environment variable `env_var`.
    ///
    /// Returns a [`Handle`] through which the caller reads the value after
    /// resolution. Declaring the same name twice silently replaces the
    /// earlier binding. A blank `env_var` is a declaration-time error.
    pub fn bind<T: BindValue>(
        &mut self,
        name: &str,
        env_var: &str,
        default: T,
        usage: &str,
    ) -> Result<Handle<T>> {
        if env_var.is_empty() {
            return Err(FlagenvError::config(format!(
                "binding '{name}' declared with a blank environment variable name"
            )));
        }

        let default = default.into_value();
        let cell = Rc::new(RefCell::new(default.clone()));
        let binding = Binding {
            name: name.to_string(),
            env_var: env_var.to_string(),
            kind: T::kind(),
            default,
            usage: usage.to_string(),
            cell: Rc::clone(&cell),
        };

        match self.bindings.iter().position(|b| b.name == name) {
            Some(index) => self.bindings[index] = binding,
            None => self.bindings.push(binding),
        }

        Ok(Handle {
            cell,
            _marker: PhantomData,
        })
    }

    /// Declare a binding whose environment variable name is derived from the
    /// flag name using the registry's prefix and the default separator.
    ///
    /// Returns the handle together with the derived name.
    pub fn bind_auto<T: BindValue>(
        &mut self,
        name: &str,
        default: T,
        usage: &str,
    ) -> Result<(Handle<T>, String)> {
        let env_var = derive_env_name(name, DEFAULT_SEPARATOR, &self.env_prefix);
        let handle = self.bind(name, &env_var, default, usage)?;
        Ok((handle, env_var))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Derive an environment variable name from a flag name: each
/// `separator`-delimited segment is upper-cased, an optional upper-cased
/// prefix is prepended, and segments are joined with `_`.
///
/// `derive_env_name("project-id", "-", "foo")` yields `"FOO_PROJECT_ID"`.
pub fn derive_env_name(flag_name: &str, separator: &str, prefix: &str) -> String {
    let mut segments = Vec::new();
    if !prefix.is_empty() {
        segments.push(prefix.to_uppercase());
    }
    segments.extend(flag_name.split(separator).map(str::to_uppercase));
    segments.join("_")
}
