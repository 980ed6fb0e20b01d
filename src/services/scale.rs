//! Scaling of exported coordinates to captured-image resolution.
//!
//! Captured images are rendered at a higher pixel density than the on-screen
//! layout; boxes must be scaled by the same ratio to line up with them.

use crate::models::{BackendDimensions, BackendExport, BackendProduct, Polygon};

/// Returns a copy of `export` with every coordinate and size multiplied by `ratio`.
///
/// Values are rounded to the nearest integer. The input is left untouched so
/// that unscaled coordinates stay available for on-screen overlays.
pub fn scale_backend(export: &BackendExport, ratio: f64) -> BackendExport {
    let mut scaled = export.clone();

    for door in scaled.cooler.values_mut() {
        for section in &mut door.sections {
            for product in &mut section.products {
                scale_product(product, ratio);
            }
        }
    }
    scale_dimensions(&mut scaled.dimensions, ratio);

    scaled
}

fn scale_product(product: &mut BackendProduct, ratio: f64) {
    product.bounding_box = scale_polygon(&product.bounding_box, ratio);
    product.width = scale_value(product.width, ratio);
    product.height = scale_value(product.height, ratio);

    for child in &mut product.stacked {
        scale_product(child, ratio);
    }
}

fn scale_polygon(polygon: &Polygon, ratio: f64) -> Polygon {
    polygon.map(|[x, y]| [scale_value(x, ratio), scale_value(y, ratio)])
}

fn scale_dimensions(dimensions: &mut BackendDimensions, ratio: f64) {
    dimensions.width = scale_value(dimensions.width, ratio);
    dimensions.height = scale_value(dimensions.height, ratio);

    for field in [
        &mut dimensions.total_width,
        &mut dimensions.total_height,
        &mut dimensions.header_height,
        &mut dimensions.grille_height,
        &mut dimensions.frame_border,
    ] {
        *field = field.map(|value| scale_value(value, ratio));
    }

    dimensions.bounding_box_scale *= ratio;
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scale_value(value: i64, ratio: f64) -> i64 {
    (value as f64 * ratio).round() as i64
}
