use super::commands;
use crate::context::{
    ExecutionContext, DEFAULT_INTERPRETER, DEFAULT_MODEL_DIR, DEFAULT_OUTPUT_ROOT, DEFAULT_SCRIPT,
};
use crate::params::{self, ParameterSet};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Design sequences for one input structure
    Run {
        #[command(flatten)]
        params: ParamArgs,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Replay a saved JSON parameter bundle
    RunJson {
        /// JSON object keyed by parameter name (`run_name`, `input_pdb`, `bias_AA`, ...)
        #[arg(value_name = "PARAMS_JSON")]
        params_file: PathBuf,
        #[command(flatten)]
        context: ContextArgs,
    },
}

#[derive(Args, Debug)]
pub struct ParamArgs {
    // Required
    /// Name of run; also the output sub-directory
    #[arg(long, required = true)]
    run_name: String,

    /// Input PDB file
    #[arg(long, required = true)]
    input_pdb: PathBuf,

    // Model Configuration
    /// Type of model to use (e.g., 'ligand_mpnn')
    #[arg(long, default_value = params::DEFAULT_MODEL_TYPE)]
    model_type: String,

    /// Random seed
    #[arg(long, default_value_t = params::DEFAULT_SEED)]
    seed: i64,

    /// Temperature for sampling
    #[arg(long, default_value_t = params::DEFAULT_TEMPERATURE)]
    temperature: f64,

    /// Number of batches to run
    #[arg(long, default_value_t = params::DEFAULT_NUMBER_OF_BATCHES)]
    number_of_batches: i64,

    /// Number of sequences per batch
    #[arg(long, default_value_t = params::DEFAULT_BATCH_SIZE)]
    batch_size: i64,

    /// Path to LigandMPNN checkpoint file
    #[arg(long)]
    checkpoint_ligand_mpnn: Option<String>,

    // LigandMPNN Options
    /// Use atom context in LigandMPNN (0 or 1)
    #[arg(long, default_value_t = params::DEFAULT_USE_ATOM_CONTEXT)]
    ligand_mpnn_use_atom_context: i64,

    /// Use side chain context in LigandMPNN (0 or 1)
    #[arg(long, default_value_t = 0)]
    ligand_mpnn_use_side_chain_context: i64,

    // Side Chain Packing
    /// Perform side chain packing (0 or 1)
    #[arg(long, default_value_t = 0)]
    pack_side_chains: i64,

    /// Number of side chain packing samples (0 for single fast sample)
    #[arg(long, default_value_t = 0)]
    number_of_packs_per_design: i64,

    /// Consider ligand/DNA atoms during side chain packing (0 or 1)
    #[arg(long, default_value_t = params::DEFAULT_PACK_WITH_LIGAND_CONTEXT)]
    pack_with_ligand_context: i64,

    // Residue Selection
    /// Residues to keep fixed during design (e.g., 'C1 C2 C3 C4 C5')
    #[arg(long)]
    fixed_residues: Option<String>,

    /// Residues to redesign (e.g., 'C1 C2 C3 C4 C5')
    #[arg(long)]
    redesigned_residues: Option<String>,

    /// Chains to design (e.g., 'A,B,C')
    #[arg(long)]
    chains_to_design: Option<String>,

    /// Only parse the given chains (e.g., 'A,B,C')
    #[arg(long)]
    parse_these_chains_only: Option<String>,

    // Amino Acid Biasing
    /// Global amino acid bias (e.g., 'W:3.0,P:3.0,C:3.0,A:-3.0')
    #[arg(long = "bias-AA")]
    bias_aa: Option<String>,

    /// JSONL file with amino acid biases
    #[arg(long = "bias-AA-jsonl")]
    bias_aa_jsonl: Option<PathBuf>,

    /// JSONL file with amino acid biases per residue
    #[arg(long = "bias-AA-per-residue-jsonl")]
    bias_aa_per_residue_jsonl: Option<PathBuf>,

    /// Amino acids to omit globally (e.g., 'CDFGHILMNPQRSTVWY')
    #[arg(long = "omit-AA")]
    omit_aa: Option<String>,

    /// JSONL file with amino acid omissions
    #[arg(long = "omit-AA-jsonl")]
    omit_aa_jsonl: Option<PathBuf>,

    /// JSONL file with amino acids to omit per residue
    #[arg(long = "omit-AA-per-residue-jsonl")]
    omit_aa_per_residue_jsonl: Option<PathBuf>,

    // Symmetry and Oligomers
    /// Residues designed with symmetry (e.g., 'C1,C2,C3|C4,C5|C6,C7')
    #[arg(long)]
    symmetry_residues: Option<String>,

    /// Weights for symmetry residues (e.g., '0.33,0.33,0.33|0.5,0.5|0.5,0.5')
    #[arg(long)]
    symmetry_weights: Option<String>,

    /// Design homo-oligomer sequences (0 or 1)
    #[arg(long, default_value_t = 0)]
    homo_oligomer: i64,

    // Advanced
    /// Save sequence design statistics (0 or 1)
    #[arg(long, default_value_t = 0)]
    save_stats: i64,

    /// Parse atoms with zero occupancy (0 or 1)
    #[arg(long, default_value_t = 0)]
    parse_atoms_with_zero_occupancy: i64,
}

impl From<ParamArgs> for ParameterSet {
    fn from(a: ParamArgs) -> Self {
        ParameterSet {
            run_name: a.run_name,
            input_pdb: a.input_pdb,
            model_type: a.model_type,
            seed: a.seed,
            temperature: a.temperature,
            number_of_batches: a.number_of_batches,
            batch_size: a.batch_size,
            checkpoint_ligand_mpnn: a.checkpoint_ligand_mpnn,
            ligand_mpnn_use_atom_context: a.ligand_mpnn_use_atom_context,
            ligand_mpnn_use_side_chain_context: a.ligand_mpnn_use_side_chain_context,
            pack_side_chains: a.pack_side_chains,
            number_of_packs_per_design: a.number_of_packs_per_design,
            pack_with_ligand_context: a.pack_with_ligand_context,
            fixed_residues: a.fixed_residues,
            redesigned_residues: a.redesigned_residues,
            chains_to_design: a.chains_to_design,
            parse_these_chains_only: a.parse_these_chains_only,
            bias_aa: a.bias_aa,
            bias_aa_jsonl: a.bias_aa_jsonl,
            bias_aa_per_residue_jsonl: a.bias_aa_per_residue_jsonl,
            omit_aa: a.omit_aa,
            omit_aa_jsonl: a.omit_aa_jsonl,
            omit_aa_per_residue_jsonl: a.omit_aa_per_residue_jsonl,
            symmetry_residues: a.symmetry_residues,
            symmetry_weights: a.symmetry_weights,
            homo_oligomer: a.homo_oligomer,
            save_stats: a.save_stats,
            parse_atoms_with_zero_occupancy: a.parse_atoms_with_zero_occupancy,
        }
    }
}

#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Interpreter that starts the runner script
    #[arg(long, env = "LIGANDMPNN_PYTHON", default_value = DEFAULT_INTERPRETER)]
    python: String,

    /// LigandMPNN checkout; the runner's working directory
    #[arg(long, env = "LIGANDMPNN_DIR", default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,

    /// Runner script, relative to --model-dir
    #[arg(long, env = "LIGANDMPNN_SCRIPT", default_value = DEFAULT_SCRIPT)]
    script: PathBuf,

    /// Parent of the per-run output directories
    #[arg(long, env = "LIGANDMPNN_OUTPUT_ROOT", default_value = DEFAULT_OUTPUT_ROOT)]
    output_root: PathBuf,

    /// Run nvidia-smi and nvcc --version before the model
    #[arg(long, env = "LIGANDMPNN_GPU_CHECK")]
    gpu_check: bool,

    /// Print the assembled command and exit without running it
    #[arg(long)]
    dry_run: bool,
}

impl From<&ContextArgs> for ExecutionContext {
    fn from(a: &ContextArgs) -> Self {
        ExecutionContext {
            interpreter: a.python.clone(),
            model_dir: a.model_dir.clone(),
            script: a.script.clone(),
            output_root: a.output_root.clone(),
            gpu_check: a.gpu_check,
        }
    }
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Run { params, context } => {
                commands::run::execute(params.into(), (&context).into(), context.dry_run)
            }
            Commands::RunJson {
                params_file,
                context,
            } => commands::run::execute_bundle(&params_file, (&context).into(), context.dry_run),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_args_map_onto_parameter_set() {
        let cli = Cli::try_parse_from([
            "ligandmpnn-wf",
            "run",
            "--run-name",
            "test1",
            "--input-pdb",
            "/data/in.pdb",
            "--bias-AA",
            "A:10.0",
            "--pack-side-chains",
            "1",
        ])
        .unwrap();
        let Commands::Run { params, context } = cli.command else {
            panic!("expected run");
        };
        let params: ParameterSet = params.into();
        assert_eq!(
            params,
            ParameterSet {
                bias_aa: Some("A:10.0".to_string()),
                pack_side_chains: 1,
                ..ParameterSet::new("test1", "/data/in.pdb")
            }
        );
        assert!(!context.dry_run);
    }

    #[test]
    fn test_run_requires_run_name_and_input() {
        assert!(Cli::try_parse_from(["ligandmpnn-wf", "run", "--run-name", "x"]).is_err());
        assert!(Cli::try_parse_from(["ligandmpnn-wf", "run", "--input-pdb", "x.pdb"]).is_err());
    }
}
