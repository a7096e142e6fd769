use proptest::prelude::*;

use shapelab_core::expr::MAX_SOURCE_LEN;
use shapelab_core::{Complex, Expression, Relation};
use shapelab_engine::{
    apply, ImageSet, Outcome, Pipeline, PointSet, SampleFailure, Sampler, SamplerConfig, Stage,
};

fn relation(src: &str) -> Relation {
    Relation::parse(src).unwrap()
}

fn expression(src: &str) -> Expression {
    Expression::parse(src).unwrap()
}

#[test]
fn unit_circle_on_first_attempt() {
    let sampler = Sampler::new(SamplerConfig::default()).unwrap();

    let sample = sampler.sample(&relation("x**2 + y**2 == 1")).unwrap();

    assert_eq!(sample.attempts, 1);
    assert_eq!(sample.radius, 8.0);
    assert!((sample.tolerance - 0.04).abs() < 1e-3);
    assert!(sample.points.len() >= 200, "{} points", sample.points.len());
    for p in &sample.points {
        assert!((p.norm_sq() - 1.0).abs() < sample.tolerance);
    }

    // z**2 maps the unit circle onto itself.
    let image = apply(&expression("z**2"), &sample.points).unwrap();
    assert_eq!(image.len(), sample.points.len());
    for w in &image {
        assert!((w.norm() - 1.0).abs() < 0.05);
    }
}

#[test]
fn radius_ten_circle_is_found() {
    // The first window [-8, 8]² already reaches |z| = 8√2 ≈ 11.3 at its
    // corners, so this circle is matched near (8, 6) without growing.
    // Growth is covered by window_grows_to_reach_distant_curve.
    let sampler = Sampler::new(SamplerConfig::default()).unwrap();

    let sample = sampler.sample(&relation("x**2 + y**2 == 100")).unwrap();

    assert_eq!(sample.attempts, 1);
    assert!(!sample.points.is_empty());
    for p in &sample.points {
        assert!((p.norm_sq() - 100.0).abs() < sample.tolerance);
    }
}

#[test]
fn pole_on_the_diagonal_does_not_abort_sampling() {
    let sampler = Sampler::new(SamplerConfig::default()).unwrap();

    // x == y exactly on the grid diagonal, where 1/(x - y) is infinite.
    let sample = sampler.sample(&relation("1/(x - y) == 1")).unwrap();

    assert_eq!(sample.attempts, 1);
    assert!(!sample.points.is_empty());
    for p in &sample.points {
        assert!(p.re != p.im);
        assert!((1.0 / (p.re - p.im) - 1.0).abs() < sample.tolerance + 1e-9);
    }
}

#[test]
fn log_of_zero_at_the_origin_does_not_abort_sampling() {
    let sampler = Sampler::new(SamplerConfig {
        resolution: 801,
        ..SamplerConfig::default()
    })
    .unwrap();

    let sample = sampler.sample(&relation("log(x**2 + y**2) == 0")).unwrap();

    assert_eq!(sample.attempts, 1);
    assert!(sample.points.iter().all(|p| *p != Complex::ZERO));
}

#[test]
fn long_operator_chain_is_a_relation_error() {
    let pipeline = Pipeline::new(SamplerConfig::default()).unwrap();
    let src = format!("{}x > 0", "x+".repeat(2000));
    assert!(src.len() < MAX_SOURCE_LEN);

    let outcome = pipeline.run(&src, "z");

    assert!(matches!(
        outcome,
        Outcome::ParseOrEvalError {
            stage: Stage::Relation,
            ..
        }
    ));
}

#[test]
fn near_limit_relation_samples() {
    let sampler = Sampler::new(SamplerConfig {
        resolution: 51,
        ..SamplerConfig::default()
    })
    .unwrap();
    // 44 groups of 44 terms: close to the byte limit but shallow.
    let group = format!("({})", vec!["x"; 44].join("+"));
    let src = format!("{} > 0", vec![group; 44].join("+"));
    assert!(src.len() > MAX_SOURCE_LEN - 200 && src.len() <= MAX_SOURCE_LEN);

    let sample = sampler.sample(&relation(&src)).unwrap();

    assert_eq!(sample.attempts, 1);
    assert!(sample.points.iter().all(|p| p.re > 0.0));
}

#[test]
fn window_grows_to_reach_distant_curve() {
    let config = SamplerConfig {
        resolution: 400,
        ..SamplerConfig::default()
    };
    let sampler = Sampler::new(config).unwrap();

    // |z| >= 20 lies outside [-R, R]² until the corners reach it at R = 16.
    let sample = sampler.sample(&relation("x**2 + y**2 >= 400")).unwrap();

    assert_eq!(sample.radius, 16.0);
    assert_eq!(sample.attempts, 5);
}

#[test]
fn undefined_identifier_exhausts_the_budget() {
    let sampler = Sampler::new(SamplerConfig::default()).unwrap();

    let err = sampler.sample(&relation("q**2==1")).unwrap_err();

    let SampleFailure::NoPointsFound {
        attempts,
        last_error,
    } = err;
    assert_eq!(attempts, 10);
    assert!(last_error.unwrap().contains("'q'"));
}

#[test]
fn empty_point_set_maps_to_empty_image() {
    let image = apply(&expression("(z - 1j)**2"), &PointSet::default()).unwrap();
    assert_eq!(image, ImageSet::default());
}

#[test]
fn end_to_end_default_inputs() {
    let pipeline = Pipeline::new(SamplerConfig::default()).unwrap();

    let outcome = pipeline.run("x**2 + y**2 == 1", "(z - 1j)**2");

    let Outcome::Mapped {
        points,
        image,
        bounds,
        ..
    } = outcome
    else {
        panic!("expected mapped outcome");
    };
    assert_eq!(points.len(), image.len());
    for p in points.iter().chain(image.iter()) {
        assert!(p.re >= bounds.x_min && p.re <= bounds.x_max);
        assert!(p.im >= bounds.y_min && p.im <= bounds.y_max);
    }
    assert!((bounds.width() - bounds.height()).abs() < 1e-9);
}

#[test]
fn sampling_is_deterministic() {
    let sampler = Sampler::new(SamplerConfig {
        resolution: 300,
        ..SamplerConfig::default()
    })
    .unwrap();
    let rel = relation("2*y == x**2 + 1");

    let s1 = sampler.sample(&rel).unwrap();
    let s2 = sampler.sample(&rel).unwrap();

    assert_eq!(s1, s2, "samples must be deterministic");
}

#[test]
fn outcome_categories_are_distinct() {
    let pipeline = Pipeline::new(SamplerConfig {
        resolution: 64,
        max_attempts: 2,
        ..SamplerConfig::default()
    })
    .unwrap();

    let categories = [
        pipeline.run("x > 0", "z").category(),
        pipeline.run("x >", "z").category(),
        pipeline.run("x > 100", "z").category(),
    ];
    assert_eq!(categories, ["mapped", "parse_or_eval_error", "no_points_found"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn sampled_points_satisfy_the_relation(r in 0.5f64..12.0) {
        let sampler = Sampler::new(SamplerConfig {
            resolution: 120,
            ..SamplerConfig::default()
        })
        .unwrap();
        let src = format!("x**2 + y**2 == {}", r * r);

        // r < 12 lies well inside the R = 26 budget, so some attempt matches.
        let result = sampler.sample(&relation(&src));
        prop_assert!(result.is_ok(), "{:?}", result);
        let sample = result.unwrap();
        prop_assert!(!sample.points.is_empty());
        for p in &sample.points {
            prop_assert!((p.norm_sq() - r * r).abs() < sample.tolerance);
        }
    }

    #[test]
    fn attempts_never_exceed_budget(max_attempts in 1usize..6, bound in 50.0f64..500.0) {
        let sampler = Sampler::new(SamplerConfig {
            resolution: 16,
            max_attempts,
            ..SamplerConfig::default()
        })
        .unwrap();

        match sampler.sample(&relation(&format!("x > {bound}"))) {
            Ok(sample) => {
                prop_assert!(sample.attempts <= max_attempts);
            }
            Err(SampleFailure::NoPointsFound { attempts, .. }) => {
                prop_assert_eq!(attempts, max_attempts);
            }
        }
    }

    #[test]
    fn mapping_preserves_length(
        pts in proptest::collection::vec((-5.0f64..5.0, -5.0f64..5.0), 0..300),
    ) {
        let points = PointSet::new(pts.iter().map(|&(re, im)| Complex::new(re, im)).collect());

        let image = apply(&expression("np.sin(z) * 2 + z**3"), &points).unwrap();

        prop_assert_eq!(image.len(), points.len());
    }
}
