//! JSON documents printed on stdout, one per command.

use serde_json::{json, Value};

use shapelab_core::{
    format_number, Complex, LinearImage, Matrix2, Motion, Point2, ReflectionComposition,
    ReflectionView, Shape,
};
use shapelab_engine::Outcome;

pub fn complex_document(relation: &str, function: &str, outcome: &Outcome) -> Value {
    let status = outcome.category();
    match outcome {
        Outcome::Mapped {
            points,
            image,
            radius,
            tolerance,
            attempts,
            bounds,
        } => json!({
            "status": status,
            "relation": relation,
            "function": function,
            "radius": radius,
            "tolerance": tolerance,
            "attempts": attempts,
            "points": points,
            "image": image,
            "bounds": bounds,
        }),
        Outcome::NoPointsFound {
            attempts,
            last_error,
        } => json!({
            "status": status,
            "message": outcome.message(),
            "attempts": attempts,
            "last_error": last_error,
        }),
        Outcome::ParseOrEvalError { stage, .. } => json!({
            "status": status,
            "stage": stage,
            "message": outcome.message(),
        }),
        Outcome::EmptyImage => json!({
            "status": status,
            "message": outcome.message(),
        }),
    }
}

pub fn matrix_document(shape: &Shape, matrix: &Matrix2, image: &LinearImage) -> Value {
    let (x_min, x_max) = image.view.x_range();
    let (y_min, y_max) = image.view.y_range();
    json!({
        "input": shape,
        "matrix": matrix,
        "det": matrix.det(),
        "shape": image.shape,
        "transformed": image.transformed,
        "base_point": image.base_point.map(|(from, to)| json!({
            "original": from,
            "transformed": to,
            "label": point_label(to),
        })),
        "view": {
            "x_range": [x_min, x_max],
            "y_range": [y_min, y_max],
        },
    })
}

pub fn reflect_document(composition: &ReflectionComposition, views: &[ReflectionView]) -> Value {
    let clicks: Vec<Value> = views
        .iter()
        .map(|v| {
            json!({
                "original": v.original,
                "first_image": v.first_image,
                "final_image": v.final_image,
                "label": point_label(v.final_image),
            })
        })
        .collect();
    let axes = views.last().map(|v| json!([v.first_axis, v.second_axis]));
    json!({
        "first": composition.first,
        "second": composition.second,
        "matrix": composition.matrix,
        "classification": composition.classification,
        "axes": axes,
        "clicks": clicks,
    })
}

pub fn motion_document(motion: &Motion, point: Complex) -> Value {
    let image = motion.apply(point);
    json!({
        "a": motion.a,
        "b": motion.b,
        "classification": motion.classify(),
        "point": point,
        "image": image,
        "label": point_label(Point2::new(image.re, image.im)),
    })
}

pub fn render(doc: &Value, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    }
}

/// `(x, y)` with the coordinates trimmed for display.
fn point_label(p: Point2) -> String {
    format!("({}, {})", format_number(p.x), format_number(p.y))
}
