//! Coating layer: small spheres spread over a shell around the core.

use glam::Vec3;
use rand::Rng;

use super::BuildContext;
use crate::options::ColorOptions;
use crate::resources::MaterialDesc;
use crate::scene::{Node, NodeKind, Transform};
use crate::util::color::Color;

const COATING_OPACITY: f32 = 0.7;

/// Surface coating chemistry, selecting the particle color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coating {
    /// Polyethylene glycol.
    Peg,
    /// Lipid bilayer.
    Lipid,
    /// Generic polymer (also used when the payload names none).
    Polymer,
    /// Protein corona.
    Protein,
    /// Anything else.
    Other,
}

impl Coating {
    /// Classify a payload coating name (case-insensitive).
    #[must_use]
    pub fn parse(name: Option<&str>) -> Self {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Self::Polymer;
        };
        match name.to_ascii_lowercase().as_str() {
            "peg" => Self::Peg,
            "lipid" => Self::Lipid,
            "polymer" => Self::Polymer,
            "protein" => Self::Protein,
            _ => Self::Other,
        }
    }

    /// Particle color from the palette.
    #[must_use]
    pub fn color(self, colors: &ColorOptions) -> Color {
        match self {
            Self::Peg => colors.coating_peg,
            Self::Lipid => colors.coating_lipid,
            Self::Polymer => colors.coating_polymer,
            Self::Protein => colors.coating_protein,
            Self::Other => colors.coating_other,
        }
    }
}

/// Quasi-uniform points on a sphere of `radius`: the i-th of `count`
/// points has polar angle `acos(-1 + 2i/count)` and azimuth
/// `sqrt(count * pi) * polar`. Each coordinate is then scaled by a random
/// factor in `[1 - jitter, 1 + jitter)`.
pub fn shell_points(
    count: usize,
    radius: f32,
    jitter: f32,
    rng: &mut impl Rng,
) -> Vec<Vec3> {
    let n = count as f32;
    let spiral = (n * std::f32::consts::PI).sqrt();
    let mut wobble = || 1.0 - jitter + rng.random::<f32>() * 2.0 * jitter;
    (0..count)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f32 / n).clamp(-1.0, 1.0).acos();
            let theta = spiral * phi;
            Vec3::new(
                radius * phi.sin() * theta.cos() * wobble(),
                radius * phi.sin() * theta.sin() * wobble(),
                radius * phi.cos() * wobble(),
            )
        })
        .collect()
}

/// Build the coating group for a nanoparticle of `size_nm`.
///
/// The particle count is `floor(size_nm * coating_per_nm)`. The shell and
/// particle radii are relative to the sphere radius for that size
/// regardless of shape. Returns `None` when coatings are disabled at the
/// current detail level or the count is zero.
pub fn build_coating(
    ctx: &mut BuildContext<'_>,
    coating: Coating,
    size_nm: f32,
) -> Option<Node> {
    if !ctx.detail.coating {
        return None;
    }
    let opts = ctx.options;
    let geo = &opts.geometry;
    let count = (size_nm * geo.coating_per_nm).floor().max(0.0) as usize;
    if count == 0 {
        return None;
    }

    let core = size_nm / geo.sphere_divisor;
    let particle = core * geo.coating_particle_scale;
    let points = shell_points(
        count,
        core * geo.coating_shell_scale,
        geo.coating_jitter,
        &mut *ctx.rng,
    );

    let color = coating.color(&opts.colors);
    let segments = opts.quality.small_sphere_segments;
    let key = format!("coating_{}", color.key());
    let mut layer = ctx.node(NodeKind::Group);
    for point in points {
        let geometry = ctx.sphere(particle, segments);
        let material = ctx.material(&key, || {
            MaterialDesc::phong(color).with_opacity(COATING_OPACITY)
        });
        let mut node = ctx.mesh(NodeKind::Mesh, geometry, material);
        node.transform = Transform::from_translation(point);
        layer.add_child(node);
    }
    Some(layer)
}
