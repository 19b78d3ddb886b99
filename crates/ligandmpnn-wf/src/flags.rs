//! Flag table for the LigandMPNN `run.py` command line.
//!
//! Seven flags are always passed. Every other parameter has its own inclusion
//! rule, and the rules are deliberately not uniform: `ligand_mpnn_use_atom_context`
//! is only passed when switched off, the other toggles only when switched on.
//! Changing which rule a flag uses changes model behaviour.
use crate::params::ParameterSet;
use std::path::{Path, PathBuf};

/// Flags passed on every invocation, in emission order.
pub const REQUIRED_FLAGS: [&str; 7] = [
    "--model_type",
    "--seed",
    "--pdb_path",
    "--out_folder",
    "--number_of_batches",
    "--batch_size",
    "--temperature",
];

#[derive(Clone, Copy)]
pub enum Inclusion {
    /// Passed whenever the value is present and non-empty.
    IfSet(fn(&ParameterSet) -> Option<String>),
    /// Passed only when the toggle equals `when`.
    Equals { get: fn(&ParameterSet) -> i64, when: i64 },
    /// Passed only when the value is strictly above `floor`.
    Above { get: fn(&ParameterSet) -> i64, floor: i64 },
}

#[derive(Clone, Copy)]
pub struct OptionalFlag {
    pub name: &'static str,
    pub inclusion: Inclusion,
}

impl OptionalFlag {
    /// The value to pass after the flag, or `None` when the flag is suppressed.
    pub fn value(&self, params: &ParameterSet) -> Option<String> {
        match self.inclusion {
            Inclusion::IfSet(get) => get(params).filter(|v| !v.is_empty()),
            Inclusion::Equals { get, when } => (get(params) == when).then(|| when.to_string()),
            Inclusion::Above { get, floor } => {
                let v = get(params);
                (v > floor).then(|| v.to_string())
            }
        }
    }
}

fn text(value: &Option<String>) -> Option<String> {
    value.clone()
}

fn path(value: &Option<PathBuf>) -> Option<String> {
    value.as_deref().map(display_path)
}

pub fn display_path(p: &Path) -> String {
    p.display().to_string()
}

/// Plain decimals keep a decimal point (`1.0`, `0.1`) like Python's `str`.
/// Exponent forms follow Rust (`1e-5`, `1e16`; Python writes `1e-05`,
/// `1e+16`); `run.py` parses either with `float()`.
pub fn format_float(v: f64) -> String {
    format!("{v:?}")
}

/// Optional flags, in emission order.
pub const OPTIONAL_FLAGS: &[OptionalFlag] = &[
    OptionalFlag {
        name: "--checkpoint_ligand_mpnn",
        inclusion: Inclusion::IfSet(|p| text(&p.checkpoint_ligand_mpnn)),
    },
    OptionalFlag {
        name: "--ligand_mpnn_use_atom_context",
        inclusion: Inclusion::Equals {
            get: |p| p.ligand_mpnn_use_atom_context,
            when: 0,
        },
    },
    OptionalFlag {
        name: "--ligand_mpnn_use_side_chain_context",
        inclusion: Inclusion::Equals {
            get: |p| p.ligand_mpnn_use_side_chain_context,
            when: 1,
        },
    },
    OptionalFlag {
        name: "--pack_side_chains",
        inclusion: Inclusion::Equals {
            get: |p| p.pack_side_chains,
            when: 1,
        },
    },
    OptionalFlag {
        name: "--number_of_packs_per_design",
        inclusion: Inclusion::Above {
            get: |p| p.number_of_packs_per_design,
            floor: 0,
        },
    },
    // Default is 1, so this is passed unless explicitly disabled; 0 is never passed.
    OptionalFlag {
        name: "--pack_with_ligand_context",
        inclusion: Inclusion::Equals {
            get: |p| p.pack_with_ligand_context,
            when: 1,
        },
    },
    OptionalFlag {
        name: "--fixed_residues",
        inclusion: Inclusion::IfSet(|p| text(&p.fixed_residues)),
    },
    OptionalFlag {
        name: "--redesigned_residues",
        inclusion: Inclusion::IfSet(|p| text(&p.redesigned_residues)),
    },
    OptionalFlag {
        name: "--chains_to_design",
        inclusion: Inclusion::IfSet(|p| text(&p.chains_to_design)),
    },
    OptionalFlag {
        name: "--bias_AA",
        inclusion: Inclusion::IfSet(|p| text(&p.bias_aa)),
    },
    OptionalFlag {
        name: "--bias_AA_jsonl",
        inclusion: Inclusion::IfSet(|p| path(&p.bias_aa_jsonl)),
    },
    OptionalFlag {
        name: "--omit_AA",
        inclusion: Inclusion::IfSet(|p| text(&p.omit_aa)),
    },
    OptionalFlag {
        name: "--omit_AA_jsonl",
        inclusion: Inclusion::IfSet(|p| path(&p.omit_aa_jsonl)),
    },
    OptionalFlag {
        name: "--symmetry_residues",
        inclusion: Inclusion::IfSet(|p| text(&p.symmetry_residues)),
    },
    OptionalFlag {
        name: "--symmetry_weights",
        inclusion: Inclusion::IfSet(|p| text(&p.symmetry_weights)),
    },
    OptionalFlag {
        name: "--homo_oligomer",
        inclusion: Inclusion::Equals {
            get: |p| p.homo_oligomer,
            when: 1,
        },
    },
    OptionalFlag {
        name: "--bias_AA_per_residue_jsonl",
        inclusion: Inclusion::IfSet(|p| path(&p.bias_aa_per_residue_jsonl)),
    },
    OptionalFlag {
        name: "--omit_AA_per_residue_jsonl",
        inclusion: Inclusion::IfSet(|p| path(&p.omit_aa_per_residue_jsonl)),
    },
    OptionalFlag {
        name: "--parse_atoms_with_zero_occupancy",
        inclusion: Inclusion::Equals {
            get: |p| p.parse_atoms_with_zero_occupancy,
            when: 1,
        },
    },
    OptionalFlag {
        name: "--save_stats",
        inclusion: Inclusion::Equals {
            get: |p| p.save_stats,
            when: 1,
        },
    },
    OptionalFlag {
        name: "--parse_these_chains_only",
        inclusion: Inclusion::IfSet(|p| text(&p.parse_these_chains_only)),
    },
];

/// Flag/value pairs for the always-passed flags.
pub fn required_pairs(params: &ParameterSet, out_folder: &Path) -> [(&'static str, String); 7] {
    let [model_type, seed, pdb_path, out, batches, batch_size, temperature] = REQUIRED_FLAGS;
    [
        (model_type, params.model_type.clone()),
        (seed, params.seed.to_string()),
        (pdb_path, display_path(&params.input_pdb)),
        (out, display_path(out_folder)),
        (batches, params.number_of_batches.to_string()),
        (batch_size, params.batch_size.to_string()),
        (temperature, format_float(params.temperature)),
    ]
}

/// Flag/value pairs for the optional flags that survive their inclusion rule.
pub fn optional_pairs(params: &ParameterSet) -> Vec<(&'static str, String)> {
    OPTIONAL_FLAGS
        .iter()
        .filter_map(|flag| flag.value(params).map(|v| (flag.name, v)))
        .collect()
}
