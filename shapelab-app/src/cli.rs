use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use shapelab_core::{Complex, Matrix2, Point2, ReflectionAxis, Shape};
use shapelab_engine::SamplerConfig;

#[derive(Debug, Parser)]
#[command(name = "shapelab", version)]
#[command(about = "Plane transformation lab: complex maps, matrices, reflections and motions")]
pub struct Cli {
    /// Preferences file to use instead of the per-user one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON document
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sample a relation in x, y and map the points through f(z)
    Complex(ComplexArgs),
    /// Transform a shape by a 2×2 matrix
    Matrix(MatrixArgs),
    /// Compose two reflections and follow clicked points through them
    Reflect(ReflectArgs),
    /// Rotate, translate, rotate, and classify the resulting motion
    Motion(MotionArgs),
    /// Print the effective preferences
    Config(ConfigArgs),
}

// ---------------------------------------------------------------------------
// complex
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
pub struct ComplexArgs {
    /// Relation in x and y, e.g. "x**2 + y**2 == 1"
    #[arg(long, allow_hyphen_values = true)]
    pub relation: Option<String>,

    /// Function of z, e.g. "(z - 1j)**2"
    #[arg(long, allow_hyphen_values = true)]
    pub function: Option<String>,

    /// Window radius of the first attempt
    #[arg(long)]
    pub radius: Option<f64>,

    /// Grid points per axis
    #[arg(long)]
    pub resolution: Option<usize>,

    /// Maximum number of attempts
    #[arg(long)]
    pub attempts: Option<usize>,

    /// Radius added after each empty attempt
    #[arg(long)]
    pub step: Option<f64>,
}

impl ComplexArgs {
    /// `base` with every flag that was given applied on top.
    pub fn sampler_config(&self, base: SamplerConfig) -> SamplerConfig {
        SamplerConfig {
            initial_radius: self.radius.unwrap_or(base.initial_radius),
            resolution: self.resolution.unwrap_or(base.resolution),
            max_attempts: self.attempts.unwrap_or(base.max_attempts),
            radius_step: self.step.unwrap_or(base.radius_step),
            ..base
        }
    }
}

// ---------------------------------------------------------------------------
// matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeKind {
    Triangle,
    Quadrilateral,
    Circle,
    Line,
}

#[derive(Debug, Args)]
pub struct MatrixArgs {
    #[arg(long, value_enum, default_value_t = ShapeKind::Triangle)]
    pub shape: ShapeKind,

    /// Polygon vertex "x,y"; repeat for each vertex
    #[arg(long = "point", value_parser = parse_point, allow_hyphen_values = true)]
    pub points: Vec<Point2>,

    /// Circle centre "x,y"
    #[arg(long, value_parser = parse_point, default_value = "1,1", allow_hyphen_values = true)]
    pub center: Point2,

    /// Circle radius
    #[arg(long, default_value_t = 2.0)]
    pub radius: f64,

    /// Line coefficients "a,b,c" of a·x + b·y = c
    #[arg(long, value_parser = parse_line, default_value = "1,1,2", allow_hyphen_values = true)]
    pub line: [f64; 3],

    /// Matrix entries "a11,a12,a21,a22"
    #[arg(long, value_parser = parse_matrix, default_value = "1,-1,1,2", allow_hyphen_values = true)]
    pub matrix: Matrix2,
}

impl MatrixArgs {
    pub fn shape(&self) -> Result<Shape> {
        let p = |x, y| Point2::new(x, y);
        Ok(match self.shape {
            ShapeKind::Triangle => {
                let [a, b, c] = self.vertices([p(1.0, 1.0), p(1.0, 2.0), p(2.0, 1.0)])?;
                Shape::Triangle { a, b, c }
            }
            ShapeKind::Quadrilateral => {
                let [a, b, c, d] =
                    self.vertices([p(1.0, 1.0), p(1.0, 2.0), p(2.0, 2.0), p(2.0, 1.0)])?;
                Shape::Quadrilateral { a, b, c, d }
            }
            ShapeKind::Circle => Shape::Circle {
                center: self.center,
                radius: self.radius,
            },
            ShapeKind::Line => {
                let [a, b, c] = self.line;
                Shape::Line { a, b, c }
            }
        })
    }

    /// The given vertices, or `defaults` when none were given.
    fn vertices<const N: usize>(&self, defaults: [Point2; N]) -> Result<[Point2; N]> {
        if self.points.is_empty() {
            return Ok(defaults);
        }
        match <[Point2; N]>::try_from(self.points.as_slice()) {
            Ok(v) => Ok(v),
            Err(_) => bail!(
                "{:?} needs exactly {N} --point values, got {}",
                self.shape,
                self.points.len()
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// reflect / motion / config
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
pub struct ReflectArgs {
    /// First mirror: "x", "y", or an angle in degrees
    #[arg(long, value_parser = parse_axis, default_value = "x", allow_hyphen_values = true)]
    pub first: ReflectionAxis,

    /// Second mirror: "x", "y", or an angle in degrees
    #[arg(long, value_parser = parse_axis, default_value = "y", allow_hyphen_values = true)]
    pub second: ReflectionAxis,

    /// Clicked point "x,y"; repeat to click several times in order
    #[arg(long = "point", value_parser = parse_point, allow_hyphen_values = true)]
    pub points: Vec<Point2>,
}

#[derive(Debug, Args)]
pub struct MotionArgs {
    /// First rotation about the origin, in degrees
    #[arg(long, default_value_t = 90.0, allow_hyphen_values = true)]
    pub alpha: f64,

    /// Translation "re,im"
    #[arg(long, value_parser = parse_complex, default_value = "2,0", allow_hyphen_values = true)]
    pub translate: Complex,

    /// Second rotation about the origin, in degrees
    #[arg(long, default_value_t = 45.0, allow_hyphen_values = true)]
    pub beta: f64,

    /// Point to move "re,im"
    #[arg(long, value_parser = parse_complex, default_value = "1,1", allow_hyphen_values = true)]
    pub point: Complex,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Also write the effective preferences to the preferences file
    #[arg(long)]
    pub write: bool,
}

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{}': {e}", part.trim()))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    let found = values.len();
    <[f64; N]>::try_from(values)
        .map_err(|_| format!("expected {N} comma-separated numbers, got {found}"))
}

pub fn parse_point(s: &str) -> Result<Point2, String> {
    let [x, y] = parse_numbers(s)?;
    Ok(Point2::new(x, y))
}

pub fn parse_complex(s: &str) -> Result<Complex, String> {
    let [re, im] = parse_numbers(s)?;
    Ok(Complex::new(re, im))
}

pub fn parse_line(s: &str) -> Result<[f64; 3], String> {
    parse_numbers(s)
}

pub fn parse_matrix(s: &str) -> Result<Matrix2, String> {
    let [a11, a12, a21, a22] = parse_numbers(s)?;
    Ok(Matrix2::new(a11, a12, a21, a22))
}

pub fn parse_axis(s: &str) -> Result<ReflectionAxis, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "x" | "x-axis" => Ok(ReflectionAxis::XAxis),
        "y" | "y-axis" => Ok(ReflectionAxis::YAxis),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .map(|angle_deg| ReflectionAxis::Line { angle_deg })
            .ok_or_else(|| format!("expected 'x', 'y' or an angle in degrees, got '{s}'")),
    }
}
