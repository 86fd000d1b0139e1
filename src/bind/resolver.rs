//! Precedence resolution
//!
//! One pass over the registry after the flag collaborator has consumed the
//! argument vector: per binding, detect which sources supplied a value,
//! apply the precedence mode, coerce environment strings into the declared
//! kind, and commit the winner through the binding's cell.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

use crate::bind::env::{EnvSource, StdEnv};
use crate::bind::registry::{Binding, PrecedenceMode, Registry};
use crate::bind::value::{Value, ValueKind};
use crate::error::{FlagenvError, Result};

impl Registry {
    /// Resolve every binding from the process arguments and the process
    /// environment.
    pub fn resolve(&self) -> Result<()> {
        self.resolve_from(std::env::args().skip(1), &StdEnv)
    }

    /// Resolve every binding from an explicit argument vector and
    /// environment source. The argument vector must not carry a leading
    /// binary name.
    ///
    /// Each binding is resolved and committed independently: a coercion
    /// failure aborts the pass but does not roll back bindings already
    /// committed. Re-invoking re-runs presence detection and may overwrite
    /// previously resolved values; bindings with no present source are left
    /// untouched.
    pub fn resolve_from<I, S>(&self, args: I, env: &dyn EnvSource) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let matches = self.command().try_get_matches_from(args)?;

        for binding in self.bindings() {
            self.resolve_binding(binding, &matches, env)?;
        }

        Ok(())
    }

    /// Build the clap command the registry's bindings are registered with.
    /// Flag syntax (`--name value`, `--name=value`, bare `--name` for
    /// booleans) is entirely clap's contract.
    fn command(&self) -> Command {
        let mut command = Command::new("flagenv").no_binary_name(true);

        for binding in self.bindings() {
            let kind = binding.kind;
            let mut arg = Arg::new(binding.name.clone())
                .long(binding.name.clone())
                .help(binding.usage.clone())
                .action(ArgAction::Set)
                .value_parser(move |raw: &str| kind.coerce(raw));

            if kind == ValueKind::Bool {
                arg = arg.num_args(0..=1).default_missing_value("true");
            }

            command = command.arg(arg);
        }

        command
    }

    fn resolve_binding(
        &self,
        binding: &Binding,
        matches: &ArgMatches,
        env: &dyn EnvSource,
    ) -> Result<()> {
        // The collaborator reports explicitly passed flags, so presence
        // detection does not depend on comparing against the default value.
        let flag_present = matches!(
            matches.value_source(&binding.name),
            Some(ValueSource::CommandLine)
        );
        let env_value = env.get(&binding.env_var);
        let env_present = env_value.is_some();

        let resolved = match (flag_present, env_value) {
            (true, Some(raw)) if self.mode() == PrecedenceMode::EnvWins => {
                Some(self.coerce_env(binding, &raw)?)
            }
            (true, _) => matches.get_one::<Value>(&binding.name).cloned(),
            (false, Some(raw)) => Some(self.coerce_env(binding, &raw)?),
            (false, None) => None,
        };

        match resolved {
            Some(value) => {
                debug!(
                    binding = %binding.name,
                    flag_present,
                    env_present,
                    value = %value,
                    "resolved binding"
                );
                *binding.cell.borrow_mut() = value;
            }
            None => {
                debug!(binding = %binding.name, default = %binding.default, "default stands");
            }
        }

        Ok(())
    }

    fn coerce_env(&self, binding: &Binding, raw: &str) -> Result<Value> {
        binding.kind.coerce(raw).map_err(|reason| {
            FlagenvError::coercion(binding.name.clone(), raw.to_string(), binding.kind, reason)
        })
    }
}
