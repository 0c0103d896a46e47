//! Randomized, bounds-respecting placement of image sprites.

use crate::objects::{AssetError, ImageResource, ObjectId, SceneObjectFactory};
use crate::scene::Scene;
use crate::surface::RenderSurface;
use kurbo::{Point, Size};
use rand::Rng;
use std::sync::Arc;

/// Largest fraction of the visible size a placed sprite may cover per axis.
pub const TARGET_FRACTION: f64 = 0.32;
/// Gap kept between a sprite and the visible edges.
pub const PLACEMENT_MARGIN: f64 = 24.0;

/// Where and how large a sprite ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Point,
    pub scale: f64,
    pub rendered_size: Size,
}

/// Scale and center for an image of `intrinsic` size inside `visible`.
///
/// Returns `None` for images with a zero dimension.
pub fn compute_placement(intrinsic: Size, visible: Size, rng: &mut impl Rng) -> Option<Placement> {
    if intrinsic.width <= 0.0 || intrinsic.height <= 0.0 {
        return None;
    }
    let target = visible * TARGET_FRACTION;
    let scale = (target.width / intrinsic.width)
        .min(target.height / intrinsic.height)
        .min(1.0);
    let rendered_size = intrinsic * scale;

    let center = Point::new(
        sample_axis(rendered_size.width / 2.0, visible.width, rng),
        sample_axis(rendered_size.height / 2.0, visible.height, rng),
    );
    Some(Placement {
        center,
        scale,
        rendered_size,
    })
}

/// Uniform sample in `[half + margin, extent - half - margin]`.
/// An empty range collapses to its larger bound.
fn sample_axis(half: f64, extent: f64, rng: &mut impl Rng) -> f64 {
    let lo = half + PLACEMENT_MARGIN;
    let hi = extent - half - PLACEMENT_MARGIN;
    if hi > lo { rng.gen_range(lo..=hi) } else { lo.max(hi) }
}

/// Inserts decoded images into a scene.
pub struct AssetPlacementEngine;

impl AssetPlacementEngine {
    /// Place `resource` as a new sprite, select it and request a render.
    ///
    /// Decode failures and empty images leave the scene untouched.
    pub fn place(
        scene: &mut Scene,
        surface: &mut dyn RenderSurface,
        resource: Result<Arc<ImageResource>, AssetError>,
        visible: Size,
        rng: &mut impl Rng,
    ) -> Option<ObjectId> {
        let resource = match resource {
            Ok(resource) => resource,
            Err(err) => {
                log::debug!("Skipping image placement: {}", err);
                return None;
            }
        };
        let placement = compute_placement(resource.intrinsic_size(), visible, rng)?;

        let id = scene.add_sprite(SceneObjectFactory::sprite(
            resource,
            placement.center,
            placement.scale,
        ))?;
        scene.set_active(id);
        surface.request_render();
        log::debug!(
            "Placed sprite at ({:.1}, {:.1}) scale {:.3}",
            placement.center.x,
            placement.center.y,
            placement.scale
        );
        Some(id)
    }
}
