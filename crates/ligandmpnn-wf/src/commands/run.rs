use crate::context::ExecutionContext;
use crate::notify::StderrNotifier;
use crate::params::ParameterSet;
use crate::runner::{invoke, notify_failure, SubprocessRunner};
use std::path::Path;
use tracing::error;

/// Run (or with `dry_run`, only print) one LigandMPNN invocation.
///
/// On success the output directory is printed on stdout. Logs and failure
/// notifications go to stderr.
pub fn execute(params: ParameterSet, ctx: ExecutionContext, dry_run: bool) -> anyhow::Result<()> {
    let runner = SubprocessRunner::new(ctx);

    if dry_run {
        let plan = runner.plan(&params)?;
        println!("{}", plan.command);
        return Ok(());
    }

    let location = invoke(&runner, &params, &StderrNotifier)?;
    println!("{}", location.path.display());
    Ok(())
}

/// Load a saved parameter bundle and run it.
///
/// A bundle that cannot be read or parsed fails like any other run: it is
/// notified on stderr, without parameters since none could be loaded.
pub fn execute_bundle(path: &Path, ctx: ExecutionContext, dry_run: bool) -> anyhow::Result<()> {
    let params = match ParameterSet::from_json_file(path) {
        Ok(params) => params,
        Err(err) => {
            error!(bundle = %path.display(), "FAILED: {err}");
            notify_failure(&StderrNotifier, &err, None);
            return Err(err.into());
        }
    };
    execute(params, ctx, dry_run)
}
