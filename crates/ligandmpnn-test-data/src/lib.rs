//! ligandmpnn-test-data
//!
//! Structure fixtures embedded in the crate for use in testing.
//!
//! The fixtures are represented as `TestFile` objects which package the raw
//! bytes and create temporary files for the workflow to point at.
use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use ligandmpnn_test_data::TestFile;
/// let (pdb_file, _temp) = TestFile::zinc_fragment().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Four residue fragment (CPHE) of chain A with a bound zinc as HETATM.
    pub fn zinc_fragment() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/zn_finger_fragment.pdb"),
            suffix: "pdb",
        }
    }

    /// Per-residue bias file in the LigandMPNN JSONL layout.
    pub fn bias_per_residue() -> Self {
        Self {
            filebinary: br#"{"A1": {"G": -0.3, "C": -2.0, "P": 10.8}, "A3": {"H": 1.5}}"#,
            suffix: "jsonl",
        }
    }

    /// Per-residue omission file in the LigandMPNN JSONL layout.
    pub fn omit_per_residue() -> Self {
        Self {
            filebinary: br#"{"A1": "ACDEFGHIKLMNPQRSTVW", "A4": "C"}"#,
            suffix: "jsonl",
        }
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.filebinary
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }
}
