use std::path::{Path, PathBuf};

/// Container layout the workflow image is built with.
pub const DEFAULT_INTERPRETER: &str = "python";
pub const DEFAULT_MODEL_DIR: &str = "/tmp/docker-build/work/LigandMPNN";
pub const DEFAULT_SCRIPT: &str = "run.py";
pub const DEFAULT_OUTPUT_ROOT: &str = "/root/outputs";

/// Commands run before the model when `gpu_check` is on. Each must exit zero.
pub const GPU_CHECKS: [&[&str]; 2] = [&["nvidia-smi"], &["nvcc", "--version"]];

/// Where and how the model runner is executed.
///
/// Supplied by whatever hosts the workflow; nothing in here is derived from
/// the parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    pub interpreter: String,
    /// Root of the LigandMPNN checkout. The runner's working directory.
    pub model_dir: PathBuf,
    /// Entry script, relative to `model_dir` unless absolute.
    pub script: PathBuf,
    pub output_root: PathBuf,
    pub gpu_check: bool,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            script: PathBuf::from(DEFAULT_SCRIPT),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            gpu_check: false,
        }
    }
}

impl ExecutionContext {
    pub fn script_path(&self) -> PathBuf {
        self.model_dir.join(&self.script)
    }

    pub fn output_dir(&self, run_name: &str) -> PathBuf {
        self.output_root.join(run_name)
    }

    /// Anchor relative directories at `base`. The runner changes directory
    /// before it starts, so its arguments must not depend on ours.
    pub fn anchored(&self, base: &Path) -> Self {
        let anchor = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        Self {
            model_dir: anchor(&self.model_dir),
            output_root: anchor(&self.output_root),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_hang_off_configured_roots() {
        let ctx = ExecutionContext::default();
        assert_eq!(
            ctx.script_path(),
            PathBuf::from("/tmp/docker-build/work/LigandMPNN/run.py")
        );
        assert_eq!(ctx.output_dir("test1"), PathBuf::from("/root/outputs/test1"));

        let ctx = ExecutionContext {
            script: PathBuf::from("/opt/runner.py"),
            ..ExecutionContext::default()
        };
        assert_eq!(ctx.script_path(), PathBuf::from("/opt/runner.py"));
    }

    #[test]
    fn test_anchored_resolves_relative_dirs_only() {
        let ctx = ExecutionContext {
            model_dir: PathBuf::from("LigandMPNN"),
            output_root: PathBuf::from("/scratch/outputs"),
            ..ExecutionContext::default()
        }
        .anchored(Path::new("/work"));
        assert_eq!(ctx.model_dir, PathBuf::from("/work/LigandMPNN"));
        assert_eq!(ctx.output_root, PathBuf::from("/scratch/outputs"));
        assert_eq!(ctx.script_path(), PathBuf::from("/work/LigandMPNN/run.py"));
    }
}
