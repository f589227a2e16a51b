use ::csv;
use nalgebra::{DMatrix, DVector};
use anyhow::{self, Context};
use std::path::Path;
use crate::decision::RocPoint;

/// Reads a headerless, comma-separated matrix: one observation per line,
/// one feature per field. All lines must have the same number of fields.
pub fn load_matrix<P : AsRef<Path>>(path : P) -> anyhow::Result<DMatrix<f64>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Error opening {}", path.display()) )?;
    let mut values = Vec::new();
    let mut ncols = None;
    let mut nrows = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Error reading line {} of {}", i + 1, path.display()) )?;
        match ncols {
            Some(n) if n != record.len() => {
                anyhow::bail!("Line {} of {} has {} fields (expected {})", i + 1, path.display(), record.len(), n);
            },
            None => ncols = Some(record.len()),
            _ => { }
        }
        for field in record.iter() {
            let v : f64 = field.parse()
                .with_context(|| format!("Invalid number '{}' at line {} of {}", field, i + 1, path.display()) )?;
            values.push(v);
        }
        nrows += 1;
    }
    match ncols {
        Some(n) => Ok(DMatrix::from_row_slice(nrows, n, &values[..])),
        None => Err(anyhow::Error::msg(format!("{} has no observations", path.display())))
    }
}

fn write_rows<P, I, R>(path : P, rows : I) -> anyhow::Result<()>
where
    P : AsRef<Path>,
    I : IntoIterator<Item=R>,
    R : IntoIterator<Item=String>
{
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Error creating {}", path.display()) )?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_matrix<P : AsRef<Path>>(path : P, m : &DMatrix<f64>) -> anyhow::Result<()> {
    write_rows(path, m.row_iter().map(|row| row.iter().map(|v| v.to_string() ).collect::<Vec<_>>() ))
}

/// Writes each classified observation followed by the id of the class it was assigned to.
pub fn save_labeled<P : AsRef<Path>>(path : P, labeled : &[(DVector<f64>, i32)]) -> anyhow::Result<()> {
    write_rows(path, labeled.iter().map(|(x, id)| {
        let mut row : Vec<String> = x.iter().map(|v| v.to_string() ).collect();
        row.push(id.to_string());
        row
    }))
}

/// Reads a single-column 0/1 decision vector.
pub fn load_mask<P : AsRef<Path>>(path : P) -> anyhow::Result<Vec<bool>> {
    let m = load_matrix(path)?;
    if m.ncols() != 1 {
        anyhow::bail!("Mask must have a single column, found {}", m.ncols());
    }
    Ok(m.iter().map(|v| *v != 0.0 ).collect())
}

pub fn save_mask<P : AsRef<Path>>(path : P, mask : &[bool]) -> anyhow::Result<()> {
    write_rows(path, mask.iter().map(|m| vec![if *m { "1".to_string() } else { "0".to_string() }] ))
}

/// Writes the curve with a header line, one (FPR, FNR, threshold) row per point.
pub fn save_roc<P : AsRef<Path>>(path : P, points : &[RocPoint]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Error creating {}", path.display()) )?;
    for pt in points {
        writer.serialize(pt)?;
    }
    writer.flush()?;
    Ok(())
}
