//! Assembly of the model runner invocation.
use crate::context::ExecutionContext;
use crate::flags::{display_path, optional_pairs, required_pairs};
use crate::params::ParameterSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One fully assembled invocation: `program args...`, run from `working_dir`.
///
/// Built once per run; the token order only depends on the parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl CommandLine {
    pub fn build(ctx: &ExecutionContext, params: &ParameterSet, out_folder: &Path) -> Self {
        let mut args = vec![display_path(&ctx.script_path())];
        let pairs = required_pairs(params, out_folder)
            .into_iter()
            .chain(optional_pairs(params));
        for (flag, value) in pairs {
            args.push(flag.to_string());
            args.push(value);
        }
        Self {
            program: ctx.interpreter.clone(),
            args,
            working_dir: ctx.model_dir.clone(),
        }
    }

    /// Value following `flag`, if the flag was emitted.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// All emitted `--flag` tokens, in order.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .skip(1)
            .step_by(2)
            .map(String::as_str)
    }

    /// The child inherits stdout/stderr so progress shows up as it happens.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.working_dir);
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
