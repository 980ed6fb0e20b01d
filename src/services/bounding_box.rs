//! Bounding-box export of placement trees.
//!
//! Walks rows top to bottom and stacks left to right, computing every item's
//! box in absolute cooler pixels (origin at the outer top-left corner of the
//! frame). Output is deterministic: exporting an unchanged tree twice yields
//! identical JSON.
//!
//! # Coordinate rules
//!
//! - item bottom = row bottom − heights of the items below it in the stack
//! - item left = stack offset; stacks are separated by one gap pixel
//! - X is shifted by the frame border (or the door offset for multi-door coolers)
//! - Y is shifted by frame border + header height + shelf-lip correction
//! - left/top are floored, right/bottom are ceiled

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::config::RenderConfig;
use crate::models::backend::{DOOR_KEY, MANUAL_CONFIDENCE};
use crate::models::{
    BackendDimensions, BackendDoor, BackendExport, BackendProduct, BackendSection, DoorConfig,
    Item, LayoutData, MultiDoorRefrigerator, Refrigerator, Row, Stack,
};
use crate::services::geometry::{Edges, PixelBox};
use crate::services::positions::{compute_row_extents, stack_x_offsets, RowExtent};

/// Section numbers of door `n` start at `n * DOOR_POSITION_STRIDE + 1`.
pub const DOOR_POSITION_STRIDE: u32 = 100;

/// Absolute offsets applied to one door's door-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DoorOrigin {
    index: u32,
    x: f64,
    y: f64,
}

/// Exports a single-door placement tree.
///
/// Row dimensions come from `door`; rows of `fridge` that the catalog door
/// does not define are skipped with a warning.
pub fn export_single_door(
    fridge: &Refrigerator,
    door: &DoorConfig,
    render: &RenderConfig,
) -> BackendExport {
    let origin = DoorOrigin {
        index: 0,
        x: render.frame_border,
        y: render.y_offset(),
    };
    let sections = export_door_sections(fridge, door, origin);

    let width = round_px(door.width);
    let height = round_px(door.height);
    let border = render.frame_border;

    BackendExport {
        cooler: cooler_entry(sections),
        dimensions: BackendDimensions {
            width,
            height,
            total_width: Some(round_px(door.width + 2.0 * border)),
            total_height: Some(round_px(
                render.header_height + door.height + render.grille_height + 2.0 * border,
            )),
            header_height: Some(round_px(render.header_height)),
            grille_height: Some(round_px(render.grille_height)),
            frame_border: Some(round_px(border)),
            bounding_box_scale: 1.0,
        },
    }
}

/// Exports a multi-door placement tree.
///
/// Doors are laid out left to right; each contributes its own frame on both
/// sides plus `render.door_gap` before the next door. All sections land in the
/// single [`DOOR_KEY`] entry, numbered `door_index * 100 + row_number`.
pub fn export_multi_door(
    fridge: &MultiDoorRefrigerator,
    layout: &LayoutData,
    render: &RenderConfig,
) -> BackendExport {
    let border = render.frame_border;
    let mut sections = Vec::new();
    let mut door_x = 0.0;
    let mut index = 0_u32;

    for door in &fridge.doors {
        match layout.doors.iter().find(|config| config.id == door.id) {
            Some(config) => {
                let origin = DoorOrigin {
                    index,
                    x: door_x + border,
                    y: render.y_offset(),
                };
                sections.extend(export_door_sections(&door.refrigerator, config, origin));
            }
            None => warn!(
                door_id = %door.id,
                layout_id = %layout.id,
                "door missing from layout catalog, skipping export"
            ),
        }

        door_x += door.width + 2.0 * border + render.door_gap;
        index += 1;
    }

    let width: f64 = fridge.doors.iter().map(|door| door.width).sum();
    let height = fridge
        .doors
        .iter()
        .map(|door| door.height)
        .fold(0.0, f64::max);
    let total_width = if fridge.doors.is_empty() {
        0.0
    } else {
        door_x - render.door_gap
    };

    BackendExport {
        cooler: cooler_entry(sections),
        dimensions: BackendDimensions {
            width: round_px(width),
            height: round_px(height),
            total_width: Some(round_px(total_width)),
            total_height: Some(round_px(
                render.header_height + height + render.grille_height + 2.0 * border,
            )),
            header_height: Some(round_px(render.header_height)),
            grille_height: Some(round_px(render.grille_height)),
            frame_border: Some(round_px(border)),
            bounding_box_scale: 1.0,
        },
    }
}

fn cooler_entry(sections: Vec<BackendSection>) -> BTreeMap<String, BackendDoor> {
    let mut cooler = BTreeMap::new();
    cooler.insert(
        DOOR_KEY.to_string(),
        BackendDoor {
            data: Vec::new(),
            sections,
            door_visible: true,
        },
    );
    cooler
}

fn export_door_sections(
    fridge: &Refrigerator,
    door: &DoorConfig,
    origin: DoorOrigin,
) -> Vec<BackendSection> {
    let extents: HashMap<String, RowExtent> = compute_row_extents(&door.rows)
        .into_iter()
        .map(|extent| (extent.row_id.clone(), extent))
        .collect();

    let mut sections = Vec::with_capacity(fridge.row_count());
    for (row_number, row) in (1_u32..).zip(fridge.rows()) {
        let Some(extent) = extents.get(&row.id) else {
            warn!(
                row_id = %row.id,
                door_id = %door.id,
                "row missing from catalog dimensions, skipping export"
            );
            continue;
        };

        let position = origin.index * DOOR_POSITION_STRIDE + row_number;
        sections.push(BackendSection {
            data: Vec::new(),
            position,
            products: export_row_products(row, extent, position, origin),
        });
    }

    sections
}

fn export_row_products(
    row: &Row,
    extent: &RowExtent,
    section_position: u32,
    origin: DoorOrigin,
) -> Vec<BackendProduct> {
    let offsets = stack_x_offsets(row);

    row.stacks
        .iter()
        .zip(offsets)
        .enumerate()
        .filter_map(|(stack_idx, (stack, x))| {
            let product = export_stack(stack, x, extent.y_end, origin);
            if product.is_none() {
                warn!(row_id = %row.id, stack_idx, "empty stack, skipping export");
            }
            product.map(|mut product| {
                let base = format!("{section_position}-{}", stack_idx + 1);
                for (level, child) in (1_usize..).zip(product.stacked.iter_mut()) {
                    child.position = format!("{base}-{level}");
                }
                product.position = base;
                product
            })
        })
        .collect()
}

/// Builds the front product of a stack with every item above it nested in `stacked`.
fn export_stack(stack: &Stack, x: f64, row_bottom: f64, origin: DoorOrigin) -> Option<BackendProduct> {
    let mut consumed = 0.0;
    let mut products = stack.items.iter().map(|item| {
        let product = export_item(item, x, row_bottom - consumed, origin);
        consumed += item.height;
        product
    });

    let mut front = products.next()?;
    front.stacked = products.collect();
    front.stack_size = front.stacked.len();
    Some(front)
}

fn export_item(item: &Item, x: f64, bottom: f64, origin: DoorOrigin) -> BackendProduct {
    let edges = Edges::from_bottom_left(x, bottom, item.width, item.height).offset(origin.x, origin.y);
    let pixel_box = PixelBox::covering(edges);

    BackendProduct {
        product: item.name.clone(),
        sku_code: item.sku_id.clone(),
        stacked: Vec::new(),
        position: String::new(),
        stack_size: 0,
        confidence: MANUAL_CONFIDENCE.to_string(),
        bounding_box: pixel_box.corners(),
        width: pixel_box.width(),
        height: pixel_box.height(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_px(value: f64) -> i64 {
    value.round() as i64
}
