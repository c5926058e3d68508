/*
    Writes generated inputs where the replay tooling picks them up
*/

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::generator::Derivation;

pub fn input_file_name(seed: u64) -> String {
    format!("inputs{:02}.txt", seed)
}

// One file per seed holding the whitespace separated tokens
pub fn write_inputs(dir: &Path, derivations: &[Derivation]) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    derivations.iter()
        .map(|derivation| {
            let path = dir.join(input_file_name(derivation.seed));
            fs::write(&path, format!("{}\n", derivation))?;
            info!("Wrote {} tokens to {}", derivation.input_size(), path.display());
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Generator, GeneratorConfig, TerminalGuided};
    use crate::grammar::tests::grammar;

    #[test]
    fn file_names_are_padded() {
        assert_eq!(input_file_name(0), "inputs00.txt");
        assert_eq!(input_file_name(7), "inputs07.txt");
        assert_eq!(input_file_name(12), "inputs12.txt");
    }

    #[test]
    fn writes_one_file_per_seed() {
        let grammar = grammar(&[("<start>", &[&["<a>", "<a>"]]), ("<a>", &[&["x"], &["y"]])]);
        let mut generator = Generator::new(&grammar, Box::new(TerminalGuided), GeneratorConfig::default()).unwrap();
        let derivations = generator.generate_batch(0..3, false).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let paths = write_inputs(&dir.path().join("inputs"), &derivations).unwrap();

        assert_eq!(paths.len(), 3);
        for (path, derivation) in paths.iter().zip(&derivations) {
            let text = fs::read_to_string(path).unwrap();
            assert_eq!(text.trim_end(), derivation.to_string());
            assert_eq!(text.split_whitespace().count(), 2);
        }
    }
}
