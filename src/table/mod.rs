use anyhow::{self, Context};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use crate::prob::{Gaussian, Distribution};

/// Comma-separated persistence of sample matrices, labeled outputs, masks and ROC curves.
pub mod csv;

pub use self::csv::*;

/// Loads a JSON array of class models. Each model passes through the same checks
/// as Gaussian::new. Loaded models do not refer to any dataset.
pub fn load_models<P : AsRef<Path>>(path : P) -> anyhow::Result<Vec<Gaussian<'static>>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("Error opening {}", path.display()) )?;
    let models : Vec<Gaussian<'static>> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("Error parsing models from {}", path.display()) )?;
    models.into_iter()
        .map(|m| {
            Gaussian::new(m.id(), m.mean().clone(), m.cov().clone(), m.prior())
                .with_context(|| format!("Invalid model {} at {}", m.id(), path.display()) )
        })
        .collect()
}

pub fn save_models<P : AsRef<Path>>(path : P, models : &[Gaussian<'_>]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("Error creating {}", path.display()) )?;
    serde_json::to_writer_pretty(BufWriter::new(f), models)?;
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use nalgebra::*;
    use crate::decision::RocPoint;

    fn tmp(name : &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("bayesclass-{}-{}", std::process::id(), name))
    }

    #[test]
    fn matrix_file() {
        let path = tmp("matrix.csv");
        let m = DMatrix::from_row_slice(3, 2, &[1.5, -2., 0., 0.25, 1E-3, 7.]);
        save_matrix(&path, &m).unwrap();
        assert_eq!(load_matrix(&path).unwrap(), m);
        std::fs::write(&path, "1,2\n3\n").unwrap();
        assert!(load_matrix(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn mask_file() {
        let path = tmp("mask.csv");
        save_mask(&path, &[true, false, true]).unwrap();
        assert_eq!(load_mask(&path).unwrap(), vec![true, false, true]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn labeled_file() {
        let path = tmp("labeled.csv");
        save_labeled(&path, &[(DVector::from_column_slice(&[1., 2.]), 7)]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "1,2,7");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn roc_file() {
        let path = tmp("roc.csv");
        let pts = [RocPoint { false_pos_rate : 0.5, false_neg_rate : 0.25, threshold : 0.1 }];
        save_roc(&path, &pts).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("false_pos_rate,false_neg_rate,threshold"));
        assert_eq!(lines.next(), Some("0.5,0.25,0.1"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn model_file() {
        let path = tmp("models.json");
        let data = DMatrix::from_element(3, 2, 1.);
        let g = Gaussian::new(4, DVector::from_column_slice(&[1., 2.]), DMatrix::identity(2, 2), 0.3)
            .unwrap()
            .with_dataset(&data);
        save_models(&path, &[g]).unwrap();
        let loaded = load_models(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), 4);
        assert_eq!(loaded[0].mean()[1], 2.);
        assert!(loaded[0].dataset().is_none());
        std::fs::remove_file(&path).unwrap();
    }

}
