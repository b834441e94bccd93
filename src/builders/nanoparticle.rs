//! Nanoparticle bodies: sphere, rod and cube, colored by surface charge.

use glam::Vec3;

use super::coating::{self, Coating};
use super::{label, positive, BuildContext, BuildError};
use crate::options::ColorOptions;
use crate::payload::NanoparticleSpec;
use crate::resources::{
    Blending, GeometryDesc, MaterialDesc, MaterialHandle, TextureDesc,
};
use crate::scene::{Group, NodeKind, Transform};
use crate::util::color::Color;

const BODY_OPACITY: f32 = 0.9;
const BODY_SHININESS: f32 = 80.0;
const SHELL_OPACITY: f32 = 0.3;
const SHELL_SHININESS: f32 = 100.0;
const EDGE_OPACITY: f32 = 0.5;

// ---------------------------------------------------------------------------
// Shape and charge
// ---------------------------------------------------------------------------

/// Nanoparticle geometry variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Core sphere with a translucent shell.
    Sphere,
    /// Capped cylinder along Y.
    Rod,
    /// Cube with an edge outline.
    Cube,
}

impl Shape {
    /// Classify a payload type name (case-insensitive). Unknown or missing
    /// names are spheres.
    #[must_use]
    pub fn parse(kind: Option<&str>) -> Self {
        match kind.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("rod") => Self::Rod,
            Some("cube") => Self::Cube,
            _ => Self::Sphere,
        }
    }

    /// Label text when the payload has no coating name.
    #[must_use]
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Sphere => "Nanoparticle",
            Self::Rod => "Nanorod",
            Self::Cube => "Nanocube",
        }
    }
}

/// Surface charge bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeBucket {
    /// Below `-threshold` mV.
    Negative,
    /// Within `[-threshold, threshold]` mV.
    Neutral,
    /// Above `threshold` mV.
    Positive,
}

impl ChargeBucket {
    /// Bucket a surface charge. The threshold itself is neutral.
    #[must_use]
    pub fn classify(charge: f32, threshold: f32) -> Self {
        if charge < -threshold {
            Self::Negative
        } else if charge > threshold {
            Self::Positive
        } else {
            Self::Neutral
        }
    }

    /// Body color from the palette.
    #[must_use]
    pub fn color(self, colors: &ColorOptions) -> Color {
        match self {
            Self::Negative => colors.charge_negative,
            Self::Neutral => colors.charge_neutral,
            Self::Positive => colors.charge_positive,
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the nanoparticle body, its coating layer and its label into
/// `group`.
///
/// # Errors
///
/// The size is not a positive finite number, or the surface charge is
/// not finite.
pub fn build_nanoparticle(
    ctx: &mut BuildContext<'_>,
    spec: &NanoparticleSpec,
    group: &mut Group,
) -> Result<(), BuildError> {
    let opts = ctx.options;
    let size = positive(
        spec.size_nm
            .filter(|s| *s != 0.0)
            .unwrap_or(opts.geometry.default_size_nm),
        "nanoparticle size",
    )?;
    let charge = spec.surface_charge.unwrap_or(0.0);
    if !charge.is_finite() {
        return Err(BuildError::NonFinite("surface charge"));
    }
    let shape = Shape::parse(spec.kind.as_deref());
    let color = ChargeBucket::classify(charge, opts.colors.charge_threshold)
        .color(&opts.colors);

    let label_y = match shape {
        Shape::Sphere => sphere(ctx, size, color, group),
        Shape::Rod => rod(ctx, size, color, group),
        Shape::Cube => cube(ctx, size, color, group),
    };

    let coating_kind = Coating::parse(spec.coating.as_deref());
    if let Some(layer) = coating::build_coating(ctx, coating_kind, size) {
        group.add(layer);
    }

    let text = spec
        .coating
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| shape.default_label());
    let anchor = Vec3::new(0.0, label_y, 0.0);
    if let Some(node) = label::label(ctx, text, anchor) {
        group.add_label(node);
    }
    Ok(())
}

fn body_material(
    ctx: &mut BuildContext<'_>,
    prefix: &str,
    color: Color,
) -> MaterialHandle {
    ctx.material(&format!("{prefix}_{}", color.key()), || {
        MaterialDesc::phong(color)
            .with_opacity(BODY_OPACITY)
            .with_shininess(BODY_SHININESS)
    })
}

/// Core, shell and glow. Returns the label anchor height.
fn sphere(
    ctx: &mut BuildContext<'_>,
    size: f32,
    color: Color,
    group: &mut Group,
) -> f32 {
    let opts = ctx.options;
    let degraded = ctx.detail.degraded;
    let radius = size / opts.geometry.sphere_divisor;
    let shell_radius = radius * opts.geometry.shell_scale;
    let segments = opts.quality.particle_segments.pick(degraded);

    let geometry = ctx.sphere(radius, segments);
    let material = body_material(ctx, "core", color);
    group.add(ctx.mesh(NodeKind::Mesh, geometry, material));

    let geometry = ctx.sphere(shell_radius, segments);
    let key = if degraded {
        format!("shell_{}_wire", color.key())
    } else {
        format!("shell_{}", color.key())
    };
    let material = ctx.material(&key, || {
        MaterialDesc::phong(color)
            .with_opacity(SHELL_OPACITY)
            .with_shininess(SHELL_SHININESS)
            .with_wireframe(degraded)
    });
    group.add(ctx.mesh(NodeKind::Mesh, geometry, material));

    if ctx.detail.glow {
        let size = shell_radius * opts.geometry.glow_scale;
        let geometry = ctx.quad();
        let material = ctx.material(&format!("glow_{}", color.key()), || {
            MaterialDesc::sprite(TextureDesc::glow(color))
                .with_blending(Blending::Additive)
        });
        let mut glow = ctx.mesh(NodeKind::Sprite, geometry, material);
        glow.transform.scale = Vec3::new(size, size, 1.0);
        group.add(glow);
    }
    -radius * 1.5
}

/// Cylinder body along Y with sphere caps. Returns the label anchor
/// height.
fn rod(
    ctx: &mut BuildContext<'_>,
    size: f32,
    color: Color,
    group: &mut Group,
) -> f32 {
    let opts = ctx.options;
    let radius = size / opts.geometry.rod_radius_divisor;
    let length = size / opts.geometry.rod_length_divisor;
    let segments = opts.quality.rod_segments.pick(ctx.detail.degraded);

    let geometry = ctx.geometry(
        &format!("cylinder_{radius:.2}_{length:.2}_{segments}"),
        || GeometryDesc::Cylinder {
            radius,
            height: length,
            segments,
        },
    );
    let material = body_material(ctx, "rod", color);
    group.add(ctx.mesh(NodeKind::Mesh, geometry, material));

    for y in [length / 2.0, -length / 2.0] {
        let geometry = ctx.sphere(radius, segments);
        let material = body_material(ctx, "rod", color);
        let mut cap = ctx.mesh(NodeKind::Mesh, geometry, material);
        cap.transform = Transform::from_translation(Vec3::new(0.0, y, 0.0));
        group.add(cap);
    }
    -length
}

/// Box with an optional edge outline. Returns the label anchor height.
fn cube(
    ctx: &mut BuildContext<'_>,
    size: f32,
    color: Color,
    group: &mut Group,
) -> f32 {
    let opts = ctx.options;
    let side = size / opts.geometry.cube_divisor;

    let geometry = ctx.geometry(&format!("box_{side:.2}"), || {
        GeometryDesc::Cuboid { side }
    });
    let material = body_material(ctx, "cube", color);
    group.add(ctx.mesh(NodeKind::Mesh, geometry, material));

    if ctx.detail.cube_edges {
        // Edge geometry is derived per cube, not pooled.
        let geometry =
            ctx.resources.create_geometry(GeometryDesc::CubeEdges { side });
        let edge_color = opts.colors.cube_edges;
        let material = ctx.material("edges", || {
            MaterialDesc::line(edge_color).with_opacity(EDGE_OPACITY)
        });
        group.add(ctx.mesh(NodeKind::LineSegments, geometry, material));
    }
    -side
}
