use structopt::*;
use nalgebra::*;
use anyhow::{self, Context};
use log::{info, warn};
use std::path::{Path, PathBuf};
use bayesclass::prob::*;
use bayesclass::fit::*;
use bayesclass::decision::*;
use bayesclass::sim::Polar;
use bayesclass::table;

/// Fractions of each dataset used to re-estimate the class models in a convergence study.
const STUDY_FRACTIONS : [f64; 5] = [1.0, 0.1, 0.01, 0.001, 0.0001];

/// Estimate, compare and evaluate Gaussian class models from the command line
#[derive(StructOpt, Debug)]
pub enum BayesClass {

    /// Synthesizes a dataset of n observations from the first model of a JSON model file.
    Generate {
        model : String,

        #[structopt(short)]
        n : usize,

        #[structopt(short, long, default_value="0")]
        seed : u64,

        #[structopt(short)]
        output : String
    },

    /// Estimates a class model by maximum likelihood from a CSV dataset (optionally
    /// from its first n rows only) and writes it as JSON.
    Estimate {
        data : String,

        #[structopt(short)]
        n : Option<usize>,

        #[structopt(long, default_value="1")]
        id : i32,

        #[structopt(long, default_value="1.0")]
        prior : f64,

        #[structopt(short)]
        output : Option<String>
    },

    /// Classifies each CSV dataset against all models of a JSON model file. The i-th
    /// dataset is taken to be drawn from the i-th model. Labeled rows are written to the
    /// output directory, one CSV per dataset.
    Classify {
        models : String,

        #[structopt(short, required = true)]
        data : Vec<String>,

        #[structopt(short, default_value="case3")]
        method : Discriminant,

        #[structopt(short)]
        output : Option<String>
    },

    /// Re-estimates each model from decreasing fractions of its dataset and reports the
    /// accuracy of the re-estimated models at each fraction.
    Study {
        models : String,

        #[structopt(short, required = true)]
        data : Vec<String>,

        #[structopt(short, default_value="case3")]
        method : Discriminant
    },

    /// Prints the Bhattacharyya error bound between the first two models of a JSON model file.
    Bound {
        models : String
    },

    /// Sweeps the likelihood threshold of a detector over a CSV feature matrix, comparing
    /// each decision against a 0/1 truth mask. Writes the ROC curve and the mask at the
    /// equal-error threshold.
    Detect {
        model : String,

        #[structopt(short)]
        features : String,

        #[structopt(short)]
        truth : String,

        #[structopt(short, default_value="1000")]
        steps : usize,

        /// Threshold increment. Defaults to the peak density of the model divided by steps.
        #[structopt(long)]
        step : Option<f64>,

        #[structopt(short)]
        roc : Option<String>,

        #[structopt(short)]
        mask : Option<String>
    }

}

fn first_model(path : &str) -> anyhow::Result<Gaussian<'static>> {
    table::load_models(path)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::Error::msg(format!("{} has no models", path)) )
}

fn load_datasets(paths : &[String], n_models : usize) -> anyhow::Result<Vec<DMatrix<f64>>> {
    if paths.len() != n_models {
        anyhow::bail!("Informed {} datasets for {} models", paths.len(), n_models);
    }
    paths.iter().map(|p| table::load_matrix(p) ).collect()
}

fn labeled_path(dir : &str, data : &str) -> PathBuf {
    let stem = Path::new(data).file_stem().map(|s| s.to_string_lossy().to_string() ).unwrap_or_default();
    Path::new(dir).join(format!("{}_labeled.csv", stem))
}

fn classify(
    models : &[Gaussian<'_>],
    data : &[DMatrix<f64>],
    names : &[String],
    method : Discriminant,
    output : Option<&str>
) -> anyhow::Result<Report> {
    let mut total = Report::default();
    for ((y, model), name) in data.iter().zip(models.iter()).zip(names.iter()) {
        let batch = Batch::new(name, method, models)?;
        let mut labeled : Vec<(DVector<f64>, i32)> = Vec::new();
        let report = batch.classify(y.into(), model.id(), &mut labeled)?;
        println!("{}: {} of {} correct ({:.4}%)", name, report.correct, report.total, 100. * report.accuracy());
        if let Some(dir) = output {
            table::save_labeled(labeled_path(dir, name), &labeled)?;
        }
        total += report;
    }
    Ok(total)
}

fn generate(model : &str, n : usize, seed : u64, output : &str) -> anyhow::Result<()> {
    let g = first_model(model)?;
    let y = Polar::seeded(seed).sample(&g, n)?;
    info!("Generated {} observations from class {}", n, g.id());
    table::save_matrix(output, &y)
}

fn estimate(data : &str, n : Option<usize>, id : i32, prior : f64, output : &Option<String>) -> anyhow::Result<()> {
    let y = table::load_matrix(data)?;
    let mut g = Gaussian::zeroed(id, y.ncols(), prior)?.with_dataset(&y);
    Mle.fit_prefix(&mut g, n.unwrap_or(y.nrows()))?;
    match output {
        Some(path) => table::save_models(path, &[g]),
        None => {
            println!("{}", serde_json::to_string_pretty(&[g])?);
            Ok(())
        }
    }
}

/// Number of leading rows a fraction of a dataset keeps (truncated).
fn prefix_size(rows : usize, frac : f64) -> usize {
    (rows as f64 * frac) as usize
}

/// Classifies the datasets with the informed parameters first, then once after
/// re-estimating every model from each fraction of its dataset. Returns the total
/// report of each pass, where the first pass carries no fraction.
fn study_passes(
    models : &mut [Gaussian<'_>],
    datasets : &[DMatrix<f64>],
    names : &[String],
    method : Discriminant
) -> anyhow::Result<Vec<(Option<f64>, Report)>> {
    let mut passes = vec![(None, classify(models, datasets, names, method, None)?)];
    for frac in STUDY_FRACTIONS.iter() {
        let sizes : Vec<usize> = datasets.iter().map(|y| prefix_size(y.nrows(), *frac) ).collect();
        // A non-singular covariance needs more rows than features.
        if sizes.iter().zip(datasets.iter()).any(|(n, y)| *n <= y.ncols() ) {
            warn!("Fraction {} leaves too few rows to estimate a covariance; stopping", frac);
            break;
        }
        for (model, n) in models.iter_mut().zip(sizes.iter()) {
            let id = model.id();
            Mle.fit_prefix(model, *n)
                .with_context(|| format!("Estimating class {} from {} rows", id, n) )?;
        }
        passes.push((Some(*frac), classify(models, datasets, names, method, None)?));
    }
    Ok(passes)
}

fn study(models : &str, data : &[String], method : Discriminant) -> anyhow::Result<()> {
    let loaded = table::load_models(models)?;
    let datasets = load_datasets(data, loaded.len())?;
    let mut models : Vec<Gaussian<'_>> = loaded;
    for (model, y) in models.iter_mut().zip(datasets.iter()) {
        model.set_dataset(y);
    }
    for (frac, total) in study_passes(&mut models, &datasets, data, method)? {
        match frac {
            Some(frac) => print!("Fraction {}: ", frac),
            None => print!("Informed parameters: ")
        }
        println!("{} of {} correct ({:.4}%)", total.correct, total.total, 100. * total.accuracy());
    }
    Ok(())
}

fn bound(models : &str) -> anyhow::Result<()> {
    let models = table::load_models(models)?;
    if models.len() < 2 {
        anyhow::bail!("Bound requires two models, found {}", models.len());
    }
    let k = bhattacharyya_distance(&models[0], &models[1])?;
    let b = bhattacharyya_bound(&models[0], &models[1])?;
    println!("Bhattacharyya distance: {}", k);
    println!("Error bound: {}", b);
    Ok(())
}

fn detect(
    model : &str,
    features : &str,
    truth : &str,
    steps : usize,
    step : Option<f64>,
    roc : &Option<String>,
    mask : &Option<String>
) -> anyhow::Result<()> {
    let g = first_model(model)?;
    let y = table::load_matrix(features)?;
    let truth = table::load_mask(truth)?;
    let sweep = match step {
        Some(step) => Sweep::new(steps, step)?,
        None => Sweep::spanning(&g, steps)?
    };
    let curve = bayesclass::decision::sweep(&g, (&y).into(), &truth, &sweep)?;
    let best = curve.best_point();
    println!(
        "Best threshold: {} (FPR = {}, FNR = {})",
        best.threshold,
        best.false_pos_rate,
        best.false_neg_rate
    );
    if let Some(path) = roc {
        table::save_roc(path, &curve.points)?;
    }
    if let Some(path) = mask {
        table::save_mask(path, &curve.mask)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cmd = BayesClass::from_args();
    match &cmd {
        BayesClass::Generate { model, n, seed, output } => {
            generate(model, *n, *seed, output)
        },
        BayesClass::Estimate { data, n, id, prior, output } => {
            estimate(data, *n, *id, *prior, output)
        },
        BayesClass::Classify { models, data, method, output } => {
            let models = table::load_models(models)?;
            let datasets = load_datasets(data, models.len())?;
            let total = classify(&models, &datasets, data, *method, output.as_deref())?;
            println!("Total: {} of {} correct ({:.4}%)", total.correct, total.total, 100. * total.accuracy());
            Ok(())
        },
        BayesClass::Study { models, data, method } => {
            study(models, data, *method)
        },
        BayesClass::Bound { models } => {
            bound(models)
        },
        BayesClass::Detect { model, features, truth, steps, step, roc, mask } => {
            detect(model, features, truth, *steps, *step, roc, mask)
        }
    }
}
