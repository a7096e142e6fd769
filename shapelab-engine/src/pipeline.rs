use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use shapelab_core::{Expression, Relation};

use crate::bounds::ViewBounds;
use crate::mapper::Mapper;
use crate::point_set::{ImageSet, PointSet};
use crate::sampler::{SampleFailure, Sampler, SamplerConfig};

/// Which user input a parse or evaluation error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Relation,
    Function,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Relation => write!(f, "relation"),
            Stage::Function => write!(f, "function"),
        }
    }
}

/// The single user-facing result of one sample→map run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Mapped {
        points: PointSet,
        image: ImageSet,
        radius: f64,
        tolerance: f64,
        attempts: usize,
        bounds: ViewBounds,
    },
    ParseOrEvalError {
        stage: Stage,
        message: String,
    },
    NoPointsFound {
        attempts: usize,
        last_error: Option<String>,
    },
    EmptyImage,
}

impl Outcome {
    /// Stable category name.
    pub fn category(&self) -> &'static str {
        match self {
            Outcome::Mapped { .. } => "mapped",
            Outcome::ParseOrEvalError { .. } => "parse_or_eval_error",
            Outcome::NoPointsFound { .. } => "no_points_found",
            Outcome::EmptyImage => "empty_image",
        }
    }

    /// The message shown to the user for this category.
    pub fn message(&self) -> String {
        match self {
            Outcome::Mapped { points, .. } => format!("mapped {} point(s)", points.len()),
            Outcome::ParseOrEvalError { stage, message } => {
                format!("Error in the {stage}: {message}")
            }
            Outcome::NoPointsFound { .. } => {
                "No points satisfy the relation in the search window. Try a different equation."
                    .to_string()
            }
            Outcome::EmptyImage => "The function produced no points to display.".to_string(),
        }
    }
}

/// Parses both inputs, samples the relation, then maps the sample.
#[derive(Debug, Clone)]
pub struct Pipeline {
    sampler: Sampler,
    mapper: Mapper,
}

impl Pipeline {
    pub fn new(config: SamplerConfig) -> crate::Result<Self> {
        Ok(Self {
            sampler: Sampler::new(config)?,
            mapper: Mapper::default(),
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        self.sampler.config()
    }

    pub fn run(&self, relation_src: &str, expression_src: &str) -> Outcome {
        let outcome = self.run_inner(relation_src, expression_src);
        match &outcome {
            Outcome::Mapped { points, attempts, .. } => {
                info!(points = points.len(), attempts, "Pipeline complete");
            }
            other => {
                warn!(category = other.category(), message = %other.message(), "Pipeline failed");
            }
        }
        outcome
    }

    fn run_inner(&self, relation_src: &str, expression_src: &str) -> Outcome {
        let relation = match Relation::parse(relation_src) {
            Ok(r) => r,
            Err(e) => return parse_error(Stage::Relation, e),
        };
        let expression = match Expression::parse(expression_src) {
            Ok(e) => e,
            Err(e) => return parse_error(Stage::Function, e),
        };

        let sample = match self.sampler.sample(&relation) {
            Ok(s) => s,
            Err(SampleFailure::NoPointsFound { attempts, last_error }) => {
                return Outcome::NoPointsFound { attempts, last_error };
            }
        };

        let image = match self.mapper.apply(&expression, &sample.points) {
            Ok(image) => image,
            Err(e) => return parse_error(Stage::Function, e),
        };
        if image.is_empty() {
            return Outcome::EmptyImage;
        }

        let bounds = ViewBounds::fit(&sample.points, &image);
        Outcome::Mapped {
            points: sample.points,
            image,
            radius: sample.radius,
            tolerance: sample.tolerance,
            attempts: sample.attempts,
            bounds,
        }
    }
}

fn parse_error(stage: Stage, e: impl fmt::Display) -> Outcome {
    Outcome::ParseOrEvalError {
        stage,
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(SamplerConfig {
            resolution: 201,
            max_attempts: 3,
            ..SamplerConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn maps_unit_circle() {
        let outcome = pipeline().run("x**2 + y**2 == 1", "(z - 1j)**2");
        assert_eq!(outcome.category(), "mapped");
        let Outcome::Mapped { points, image, .. } = outcome else {
            unreachable!()
        };
        assert_eq!(points.len(), image.len());
        assert!(!points.is_empty());
    }

    #[test]
    fn bad_relation_syntax_is_a_relation_error() {
        let outcome = pipeline().run("x**2 + = 1", "z");
        assert!(matches!(
            outcome,
            Outcome::ParseOrEvalError { stage: Stage::Relation, .. }
        ));
    }

    #[test]
    fn numeric_relation_is_a_relation_error() {
        let outcome = pipeline().run("x + y", "z");
        assert_eq!(outcome.category(), "parse_or_eval_error");
    }

    #[test]
    fn bad_function_is_a_function_error() {
        let outcome = pipeline().run("x > 7", "foo(z)");
        let Outcome::ParseOrEvalError { stage, message } = outcome else {
            panic!("expected error");
        };
        assert_eq!(stage, Stage::Function);
        assert!(message.contains("foo"));
    }

    #[test]
    fn function_division_by_zero_is_a_function_error() {
        // The grid hits the origin at odd resolution.
        let outcome = pipeline().run("x**2 + y**2 < 0.01", "1/z");
        assert!(matches!(
            outcome,
            Outcome::ParseOrEvalError { stage: Stage::Function, .. }
        ));
    }

    #[test]
    fn unsatisfiable_relation_reports_no_points() {
        let outcome = pipeline().run("x**2 + y**2 == -1", "z");
        assert_eq!(
            outcome,
            Outcome::NoPointsFound { attempts: 3, last_error: None }
        );
        assert!(outcome.message().contains("different equation"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SamplerConfig {
            resolution: 0,
            ..SamplerConfig::default()
        };
        assert!(Pipeline::new(config).is_err());
    }
}
