//! Executing a parameter set against the model.
//!
//! [`Runner`] is the seam between flag assembly and however the model is
//! actually launched. [`SubprocessRunner`] starts the runner script as a local
//! child process and blocks until it exits.
use crate::command::CommandLine;
use crate::context::{ExecutionContext, GPU_CHECKS};
use crate::error::RunError;
use crate::notify::{Level, Notification, Notifier};
use crate::params::ParameterSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{error, info};

/// Directory holding a finished run's artifacts. Its contents belong to the
/// model; nothing here reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub path: PathBuf,
}

pub trait Runner {
    fn run(&self, params: &ParameterSet) -> Result<OutputLocation, RunError>;
}

/// A failed run together with the parameter set that triggered it.
#[derive(Debug, Error)]
#[error("LigandMPNN failed: {error}")]
pub struct InvocationFailure {
    pub params: ParameterSet,
    #[source]
    pub error: RunError,
}

/// Raise the "LigandMPNN failed" notification for `err`.
pub fn notify_failure<N>(notifier: &N, err: &RunError, params: Option<&ParameterSet>)
where
    N: Notifier + ?Sized,
{
    notifier.notify(&Notification {
        level: Level::Error,
        title: "LigandMPNN failed".to_string(),
        body: err.to_string(),
        parameters: params.and_then(|p| serde_json::to_value(p).ok()),
    });
}

/// Run once. On failure raise a notification carrying the error and the
/// parameter set; there is no retry.
pub fn invoke<R, N>(
    runner: &R,
    params: &ParameterSet,
    notifier: &N,
) -> Result<OutputLocation, InvocationFailure>
where
    R: Runner + ?Sized,
    N: Notifier + ?Sized,
{
    match runner.run(params) {
        Ok(location) => Ok(location),
        Err(err) => {
            error!(run_name = %params.run_name, "FAILED: {err}");
            notify_failure(notifier, &err, Some(params));
            Err(InvocationFailure {
                params: params.clone(),
                error: err,
            })
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    ctx: ExecutionContext,
}

/// A run that has been validated and assembled but not started.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub output_dir: PathBuf,
    pub command: CommandLine,
}

impl SubprocessRunner {
    pub fn new(ctx: ExecutionContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Validate and assemble the invocation without touching the filesystem.
    pub fn plan(&self, params: &ParameterSet) -> Result<Plan, RunError> {
        params.validate()?;
        let cwd = std::env::current_dir().map_err(|source| RunError::PathResolution {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(self.plan_from(params, &cwd))
    }

    fn plan_from(&self, params: &ParameterSet, cwd: &Path) -> Plan {
        let ctx = self.ctx.anchored(cwd);
        let params = params.clone().resolve_paths(cwd);
        let output_dir = ctx.output_dir(&params.run_name);
        let command = CommandLine::build(&ctx, &params, &output_dir);
        Plan {
            output_dir,
            command,
        }
    }
}

fn preflight() -> Result<(), RunError> {
    for check in GPU_CHECKS {
        let command = check.join(" ");
        info!("Checking {command}");
        let status = Command::new(check[0])
            .args(&check[1..])
            .status()
            .map_err(|e| RunError::Preflight {
                command: command.clone(),
                detail: e.to_string(),
            })?;
        if !status.success() {
            return Err(RunError::Preflight {
                command,
                detail: status.to_string(),
            });
        }
    }
    Ok(())
}

impl Runner for SubprocessRunner {
    fn run(&self, params: &ParameterSet) -> Result<OutputLocation, RunError> {
        let Plan {
            output_dir,
            command,
        } = self.plan(params)?;

        info!("Creating local directories");
        fs::create_dir_all(&output_dir).map_err(|source| RunError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        if self.ctx.gpu_check {
            preflight()?;
        }

        info!("Running LigandMPNN");
        info!("Running command: {command}");
        let status = command
            .to_command()
            .status()
            .map_err(|source| RunError::Launch {
                program: command.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(RunError::Exit {
                command: command.to_string(),
                status,
            });
        }

        info!(output = %output_dir.display(), "Done");
        Ok(OutputLocation { path: output_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;

    struct Fixed(Result<PathBuf, String>);

    impl Runner for Fixed {
        fn run(&self, _params: &ParameterSet) -> Result<OutputLocation, RunError> {
            match &self.0 {
                Ok(path) => Ok(OutputLocation { path: path.clone() }),
                Err(msg) => Err(RunError::InvalidParameters(msg.clone())),
            }
        }
    }

    #[test]
    fn test_invoke_success_is_silent() {
        let notifier = MemoryNotifier::default();
        let params = ParameterSet::new("ok", "/data/in.pdb");
        let loc = invoke(&Fixed(Ok(PathBuf::from("/out/ok"))), &params, &notifier).unwrap();
        assert_eq!(loc.path, PathBuf::from("/out/ok"));
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_invoke_failure_notifies_with_detail() {
        let notifier = MemoryNotifier::default();
        let params = ParameterSet::new("bad", "/data/in.pdb");
        let failure = invoke(&Fixed(Err("boom".to_string())), &params, &notifier).unwrap_err();
        assert_eq!(failure.params, params);
        assert!(failure.to_string().contains("boom"));

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Error);
        assert_eq!(notes[0].title, "LigandMPNN failed");
        assert!(notes[0].body.contains("boom"));
        let carried = notes[0].parameters.as_ref().unwrap();
        assert_eq!(carried["run_name"], "bad");
    }

    #[test]
    fn test_notify_failure_without_parameters() {
        let notifier = MemoryNotifier::default();
        let err = RunError::InvalidParameters("no bundle".to_string());
        notify_failure(&notifier, &err, None);

        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "LigandMPNN failed");
        assert!(notes[0].body.contains("no bundle"));
        assert!(notes[0].parameters.is_none());
    }

    #[test]
    fn test_plan_anchors_relative_inputs() {
        let runner = SubprocessRunner::new(ExecutionContext {
            output_root: PathBuf::from("outputs"),
            ..ExecutionContext::default()
        });
        let params = ParameterSet::new("test1", "inputs/1BC8.pdb");
        let plan = runner.plan_from(&params, Path::new("/work"));
        assert_eq!(plan.output_dir, PathBuf::from("/work/outputs/test1"));
        assert_eq!(
            plan.command.flag_value("--pdb_path"),
            Some("/work/inputs/1BC8.pdb")
        );
        assert_eq!(
            plan.command.flag_value("--out_folder"),
            Some("/work/outputs/test1")
        );
    }

    #[test]
    fn test_run_rejects_empty_run_name_before_launch() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = SubprocessRunner::new(ExecutionContext {
            output_root: tmp.path().to_path_buf(),
            ..ExecutionContext::default()
        });
        let err = runner
            .run(&ParameterSet::new("", "/data/in.pdb"))
            .unwrap_err();
        assert!(matches!(err, RunError::InvalidParameters(_)));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_name_cannot_leave_output_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("outputs");
        let runner = SubprocessRunner::new(ExecutionContext {
            output_root: root.clone(),
            ..ExecutionContext::default()
        });
        let absolute = tmp.path().join("elsewhere");
        for name in [absolute.display().to_string(), "../escaped".to_string()] {
            let params = ParameterSet::new(name.as_str(), "/data/in.pdb");
            assert!(matches!(
                runner.plan(&params),
                Err(RunError::InvalidParameters(_))
            ));
            let err = runner.run(&params).unwrap_err();
            assert!(matches!(err, RunError::InvalidParameters(_)), "{name}");
        }
        assert!(!absolute.exists());
        assert!(!tmp.path().join("escaped").exists());
        assert!(!root.exists());
    }

    #[test]
    fn test_missing_interpreter_is_launch_error() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = SubprocessRunner::new(ExecutionContext {
            interpreter: "ligandmpnn-no-such-interpreter".to_string(),
            model_dir: tmp.path().to_path_buf(),
            output_root: tmp.path().join("outputs"),
            ..ExecutionContext::default()
        });
        let err = runner
            .run(&ParameterSet::new("test1", "/data/in.pdb"))
            .unwrap_err();
        assert!(matches!(err, RunError::Launch { .. }), "{err}");
        assert_eq!(err.exit_code(), None);
        // The output directory is created before the launch is attempted.
        assert!(tmp.path().join("outputs/test1").is_dir());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn runner_with_script(dir: &Path, body: &str) -> SubprocessRunner {
            fs::write(dir.join("run.py"), body).unwrap();
            SubprocessRunner::new(ExecutionContext {
                interpreter: "sh".to_string(),
                model_dir: dir.to_path_buf(),
                output_root: dir.join("outputs"),
                ..ExecutionContext::default()
            })
        }

        #[test]
        fn test_zero_exit_returns_output_dir() {
            let tmp = tempfile::tempdir().unwrap();
            let runner = runner_with_script(tmp.path(), "echo \"$@\" > args.txt\n");
            let params = ParameterSet::new("test1", "/data/in.pdb");

            let loc = runner.run(&params).unwrap();
            assert_eq!(loc.path, tmp.path().join("outputs/test1"));
            assert!(loc.path.is_dir());

            // Written relative to the child's working directory.
            let args = fs::read_to_string(tmp.path().join("args.txt")).unwrap();
            assert!(args.starts_with("--model_type ligand_mpnn --seed 111"));
            assert!(args.contains("--pack_with_ligand_context 1"));

            // Same run name again: the directory already exists.
            assert_eq!(runner.run(&params).unwrap(), loc);
        }

        #[test]
        fn test_non_zero_exit_carries_status() {
            let tmp = tempfile::tempdir().unwrap();
            let runner = runner_with_script(tmp.path(), "exit 3\n");
            let err = runner
                .run(&ParameterSet::new("test1", "/data/in.pdb"))
                .unwrap_err();
            assert_eq!(err.exit_code(), Some(3));
            assert!(err.to_string().contains("--pdb_path /data/in.pdb"));
        }
    }
}
