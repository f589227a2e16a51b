use bayesclass::prob::*;
use bayesclass::fit::*;
use bayesclass::decision::*;
use bayesclass::sim::Polar;
use bayesclass::image::*;
use nalgebra::*;

const EPS : f64 = 1E-8;

fn two_classes() -> Vec<Gaussian<'static>> {
    vec![
        Gaussian::new_standard(1, DVector::from_column_slice(&[1., 1.]), 0.3).unwrap(),
        Gaussian::new_standard(2, DVector::from_column_slice(&[4., 4.]), 0.7).unwrap()
    ]
}

#[test]
fn two_class_decisions() {
    let models = two_classes();
    let batch = Batch::new("two", Discriminant::Case3, &models).unwrap();
    let pts = [[1., 1.], [4., 4.], [2.5, 2.5]];
    let expected = [1, 2, 2];
    for (p, id) in pts.iter().zip(expected.iter()) {
        let x = DVector::from_column_slice(&p[..]);
        assert_eq!(models[batch.classify_one(&x).unwrap()].id(), *id);
    }

    // At the midpoint, the quadratic terms are equal and the larger prior decides.
    let x = DVector::from_column_slice(&[2.5, 2.5]);
    let scores = batch.scores(&x).unwrap();
    let diff = scores[1] - scores[0];
    assert!((diff - (0.7f64.ln() - 0.3f64.ln())).abs() < EPS);
}

#[test]
fn discriminants_agree_for_shared_covariance() {
    let models = vec![
        Gaussian::new_standard(1, DVector::from_column_slice(&[0., 0.]), 1. / 3.).unwrap(),
        Gaussian::new_standard(2, DVector::from_column_slice(&[3., 0.]), 1. / 3.).unwrap(),
        Gaussian::new_standard(3, DVector::from_column_slice(&[0., 3.]), 1. / 3.).unwrap()
    ];
    let batches : Vec<_> = [Discriminant::Euclidean, Discriminant::Case1, Discriminant::Case3]
        .iter()
        .map(|d| Batch::new(&d.to_string(), *d, &models).unwrap() )
        .collect();
    for i in 0..9 {
        for j in 0..9 {
            let x = DVector::from_column_slice(&[i as f64 * 0.45 - 0.31, j as f64 * 0.45 - 0.17]);
            let decisions : Vec<usize> = batches.iter().map(|b| b.classify_one(&x).unwrap() ).collect();
            assert!(decisions.iter().all(|d| *d == decisions[0]), "Disagreement at {:?}", x.as_slice());
        }
    }
}

#[test]
fn mle_converges() {
    let sigma = DMatrix::from_row_slice(2, 2, &[2., 0.5, 0.5, 1.]);
    let truth = Gaussian::new(1, DVector::from_column_slice(&[1., -2.]), sigma.clone(), 1.).unwrap();
    let y = Polar::seeded(3).sample(&truth, 5000).unwrap();
    let mut model = Gaussian::zeroed(1, 2, 1.).unwrap().with_dataset(&y);

    Mle.fit_prefix(&mut model, 5000).unwrap();
    assert!((model.mean() - truth.mean()).amax() < 0.1);
    assert!((model.cov() - &sigma).amax() < 0.2);
    assert!(utils::is_symmetric(model.cov()));

    // A few rows still yield a valid, if poorer, estimate.
    Mle.fit_prefix(&mut model, 5).unwrap();
    assert_eq!(model.mean(), &Mle::sample_mean(y.rows(0, 5)).unwrap());
    assert!(Mle.fit_prefix(&mut model, 1).unwrap_err().is_precondition());
}

#[test]
fn generated_datasets_classify() {
    let models = two_classes();
    let mut polar = Polar::seeded(11);
    let batch = Batch::new("generated", Discriminant::Case3, &models).unwrap();
    let mut total = Report::default();
    for m in models.iter() {
        let y = polar.sample(m, 500).unwrap();
        total += batch.classify((&y).into(), m.id(), &mut NullSink).unwrap();
    }
    assert_eq!(total.total, 1000);
    assert!(total.accuracy() > 0.9);
}

#[test]
fn bound_orders_overlap() {
    let models = two_classes();
    let far = bhattacharyya_bound(&models[0], &models[1]).unwrap();
    let near_class = Gaussian::new_standard(2, DVector::from_column_slice(&[1.5, 1.5]), 0.7).unwrap();
    let near = bhattacharyya_bound(&models[0], &near_class).unwrap();
    assert!(far >= 0. && far <= 1.);
    assert!(near >= 0. && near <= 1.);
    assert!(far < near);
}

// 10x10 image whose left half is skin-toned and right half is blue, with a
// reference that marks the left half.
fn scene() -> (Image, Image) {
    let (w, h) = (10, 10);
    let mut data = Vec::new();
    let mut reference = Vec::new();
    for row in 0..h {
        for col in 0..w {
            let i = row * w + col;
            if col < w / 2 {
                data.extend_from_slice(&[200 + (i % 7) as u8 * 3, 100 + (i % 5) as u8 * 4, 50 + (i % 3) as u8 * 5]);
                reference.extend_from_slice(&[255, 255, 255]);
            } else {
                data.extend_from_slice(&[30, 60, 200 + (i % 4) as u8 * 5]);
                reference.extend_from_slice(&[0, 0, 0]);
            }
        }
    }
    (Image::from_raw(w, h, 255, data).unwrap(), Image::from_raw(w, h, 255, reference).unwrap())
}

#[test]
fn skin_detection() {
    let (img, reference) = scene();
    let training = img.masked_chromaticity(&reference).unwrap();
    assert_eq!(training.nrows(), 50);

    let mut skin = Gaussian::zeroed(1, 2, 1.).unwrap();
    Mle.fit(&mut skin, (&training).into()).unwrap();

    let features = img.chromaticity();
    let truth = reference.truth_mask();
    let sweep = Sweep::spanning(&skin, 200).unwrap();
    let roc = bayesclass::decision::sweep(&skin, (&features).into(), &truth, &sweep).unwrap();
    assert_eq!(roc.points.len(), 200);

    let best = roc.best_point();
    assert_eq!(best.false_pos_rate, 0.0);
    assert!(best.false_neg_rate < 0.1);

    let detected = img.apply_mask(&roc.mask).unwrap();
    for (px, positive) in detected.pixels().zip(truth.iter()) {
        if !positive {
            assert!(px.iter().all(|c| *c == 0));
        }
    }
}
