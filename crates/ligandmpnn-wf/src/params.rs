//! The parameter set accepted by one LigandMPNN run.
//!
//! Field names follow the LigandMPNN `run.py` options; the serde names keep
//! the upstream `bias_AA` spelling so a saved bundle lines up with the flags.
use crate::error::RunError;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_MODEL_TYPE: &str = "ligand_mpnn";
pub const DEFAULT_SEED: i64 = 111;
pub const DEFAULT_TEMPERATURE: f64 = 0.1;
pub const DEFAULT_NUMBER_OF_BATCHES: i64 = 1;
pub const DEFAULT_BATCH_SIZE: i64 = 1;
pub const DEFAULT_USE_ATOM_CONTEXT: i64 = 1;
pub const DEFAULT_PACK_WITH_LIGAND_CONTEXT: i64 = 1;

fn default_model_type() -> String {
    DEFAULT_MODEL_TYPE.to_string()
}
fn default_seed() -> i64 {
    DEFAULT_SEED
}
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}
fn default_number_of_batches() -> i64 {
    DEFAULT_NUMBER_OF_BATCHES
}
fn default_batch_size() -> i64 {
    DEFAULT_BATCH_SIZE
}
fn default_use_atom_context() -> i64 {
    DEFAULT_USE_ATOM_CONTEXT
}
fn default_pack_with_ligand_context() -> i64 {
    DEFAULT_PACK_WITH_LIGAND_CONTEXT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    // Required
    pub run_name: String,
    pub input_pdb: PathBuf,

    // Model configuration
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default = "default_seed")]
    pub seed: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_number_of_batches")]
    pub number_of_batches: i64,
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,
    #[serde(default)]
    pub checkpoint_ligand_mpnn: Option<String>,
    #[serde(default = "default_use_atom_context")]
    pub ligand_mpnn_use_atom_context: i64,
    #[serde(default)]
    pub ligand_mpnn_use_side_chain_context: i64,

    // Side chain packing
    #[serde(default)]
    pub pack_side_chains: i64,
    #[serde(default)]
    pub number_of_packs_per_design: i64,
    #[serde(default = "default_pack_with_ligand_context")]
    pub pack_with_ligand_context: i64,

    // Residue selection
    #[serde(default)]
    pub fixed_residues: Option<String>,
    #[serde(default)]
    pub redesigned_residues: Option<String>,
    #[serde(default)]
    pub chains_to_design: Option<String>,
    #[serde(default)]
    pub parse_these_chains_only: Option<String>,

    // Amino acid biases and restrictions
    #[serde(default, rename = "bias_AA")]
    pub bias_aa: Option<String>,
    #[serde(default, rename = "bias_AA_jsonl")]
    pub bias_aa_jsonl: Option<PathBuf>,
    #[serde(default, rename = "bias_AA_per_residue_jsonl")]
    pub bias_aa_per_residue_jsonl: Option<PathBuf>,
    #[serde(default, rename = "omit_AA")]
    pub omit_aa: Option<String>,
    #[serde(default, rename = "omit_AA_jsonl")]
    pub omit_aa_jsonl: Option<PathBuf>,
    #[serde(default, rename = "omit_AA_per_residue_jsonl")]
    pub omit_aa_per_residue_jsonl: Option<PathBuf>,

    // Symmetry and oligomers
    #[serde(default)]
    pub symmetry_residues: Option<String>,
    #[serde(default)]
    pub symmetry_weights: Option<String>,
    #[serde(default)]
    pub homo_oligomer: i64,

    // Advanced
    #[serde(default)]
    pub save_stats: i64,
    #[serde(default)]
    pub parse_atoms_with_zero_occupancy: i64,
}

impl ParameterSet {
    /// A parameter set with every optional parameter at its default.
    pub fn new(run_name: impl Into<String>, input_pdb: impl Into<PathBuf>) -> Self {
        Self {
            run_name: run_name.into(),
            input_pdb: input_pdb.into(),
            model_type: default_model_type(),
            seed: DEFAULT_SEED,
            temperature: DEFAULT_TEMPERATURE,
            number_of_batches: DEFAULT_NUMBER_OF_BATCHES,
            batch_size: DEFAULT_BATCH_SIZE,
            checkpoint_ligand_mpnn: None,
            ligand_mpnn_use_atom_context: DEFAULT_USE_ATOM_CONTEXT,
            ligand_mpnn_use_side_chain_context: 0,
            pack_side_chains: 0,
            number_of_packs_per_design: 0,
            pack_with_ligand_context: DEFAULT_PACK_WITH_LIGAND_CONTEXT,
            fixed_residues: None,
            redesigned_residues: None,
            chains_to_design: None,
            parse_these_chains_only: None,
            bias_aa: None,
            bias_aa_jsonl: None,
            bias_aa_per_residue_jsonl: None,
            omit_aa: None,
            omit_aa_jsonl: None,
            omit_aa_per_residue_jsonl: None,
            symmetry_residues: None,
            symmetry_weights: None,
            homo_oligomer: 0,
            save_stats: 0,
            parse_atoms_with_zero_occupancy: 0,
        }
    }

    /// Load a saved parameter bundle (JSON object keyed by parameter name).
    pub fn from_json_file(path: &Path) -> Result<Self, RunError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RunError::ParameterFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| RunError::ParameterFileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.run_name.trim().is_empty() {
            return Err(RunError::InvalidParameters(
                "run_name must not be empty".to_string(),
            ));
        }
        // The run directory must stay below the output root.
        let escapes = Path::new(&self.run_name)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(RunError::InvalidParameters(format!(
                "run_name '{}' must be a relative name without '..'",
                self.run_name
            )));
        }
        if self.input_pdb.as_os_str().is_empty() {
            return Err(RunError::InvalidParameters(
                "input_pdb must reference a file".to_string(),
            ));
        }
        Ok(())
    }

    /// Anchor relative file references at `base`.
    ///
    /// The model runner executes inside its own repository, so a path relative
    /// to the caller would otherwise point somewhere else.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let anchor = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.input_pdb = anchor(self.input_pdb);
        self.bias_aa_jsonl = self.bias_aa_jsonl.map(anchor);
        self.bias_aa_per_residue_jsonl = self.bias_aa_per_residue_jsonl.map(anchor);
        self.omit_aa_jsonl = self.omit_aa_jsonl.map(anchor);
        self.omit_aa_per_residue_jsonl = self.omit_aa_per_residue_jsonl.map(anchor);
        self
    }
}
