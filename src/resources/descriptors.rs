//! CPU-side descriptions of geometry, materials and textures.
//!
//! Descriptors are what the [`ResourcePool`](super::pool::ResourcePool)
//! caches as templates and what a backend needs to create the matching GPU
//! objects. They carry no GPU state.

use glam::Vec3;
use serde::Serialize;

use crate::scene::bounds::Aabb;
use crate::util::color::Color;

/// Shape of a vertex buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GeometryDesc {
    /// UV sphere centered at the origin.
    Sphere {
        /// Sphere radius.
        radius: f32,
        /// Width and height segment count.
        segments: u32,
    },
    /// Open-ended cylinder along +Y, centered at the origin.
    Cylinder {
        /// Cylinder radius.
        radius: f32,
        /// Total height.
        height: f32,
        /// Radial segment count.
        segments: u32,
    },
    /// Axis-aligned cube centered at the origin.
    Cuboid {
        /// Edge length.
        side: f32,
    },
    /// The 12 edges of a cube, drawn as line segments.
    CubeEdges {
        /// Edge length.
        side: f32,
    },
    /// Connected line strip.
    Polyline {
        /// Vertices in draw order.
        points: Vec<[f32; 3]>,
    },
    /// Unit quad in the XY plane, used by sprites and labels.
    Quad,
}

impl GeometryDesc {
    /// Object-space bounding box.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Self::Sphere { radius, .. } => {
                Aabb::from_half_extents(Vec3::splat(*radius))
            }
            Self::Cylinder { radius, height, .. } => Aabb::from_half_extents(
                Vec3::new(*radius, height / 2.0, *radius),
            ),
            Self::Cuboid { side } | Self::CubeEdges { side } => {
                Aabb::from_half_extents(Vec3::splat(side / 2.0))
            }
            Self::Polyline { points } => points
                .iter()
                .fold(Aabb::EMPTY, |b, p| b.including(Vec3::from(*p))),
            Self::Quad => Aabb::from_half_extents(Vec3::new(0.5, 0.5, 0.0)),
        }
    }
}

/// Shading model of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// Lit Blinn-Phong surface.
    Phong,
    /// Unlit flat color.
    Basic,
    /// Unlit line color.
    Line,
    /// Camera-facing sprite.
    Sprite,
}

/// Framebuffer blending mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Blending {
    /// Standard alpha blending.
    #[default]
    Normal,
    /// Additive (used by glow sprites).
    Additive,
}

/// A texture generated on the client (no image downloads).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TextureDesc {
    /// Centered text rendered into a canvas.
    Text {
        /// Text to draw.
        text: String,
        /// CSS font shorthand.
        font: String,
        /// Fill color.
        color: Color,
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },
    /// Radial gradient from `color` at the center to transparent.
    RadialGradient {
        /// Center color.
        color: Color,
        /// Square canvas size in pixels.
        size: u32,
    },
}

impl TextureDesc {
    /// Canvas texture for a label.
    #[must_use]
    pub fn label(text: &str, color: Color) -> Self {
        Self::Text {
            text: text.to_owned(),
            font: "Bold 20px Arial".to_owned(),
            color,
            width: 256,
            height: 64,
        }
    }

    /// Canvas texture for a glow sprite.
    #[must_use]
    pub fn glow(color: Color) -> Self {
        Self::RadialGradient { color, size: 256 }
    }
}

/// Surface appearance of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialDesc {
    /// Shading model.
    pub shading: Shading,
    /// Base color.
    pub color: Color,
    /// Opacity in `0.0..=1.0`; anything below 1 is drawn transparent.
    pub opacity: f32,
    /// Specular exponent (Phong only).
    pub shininess: f32,
    /// Draw triangle edges only.
    pub wireframe: bool,
    /// Emissive color and intensity.
    pub emissive: Option<(Color, f32)>,
    /// Blending mode.
    pub blending: Blending,
    /// Color map, owned by the material.
    pub map: Option<TextureDesc>,
}

impl MaterialDesc {
    /// Opaque Phong material with default shininess.
    #[must_use]
    pub fn phong(color: Color) -> Self {
        Self {
            shading: Shading::Phong,
            color,
            opacity: 1.0,
            shininess: 30.0,
            wireframe: false,
            emissive: None,
            blending: Blending::Normal,
            map: None,
        }
    }

    /// Unlit material.
    #[must_use]
    pub fn basic(color: Color) -> Self {
        Self {
            shading: Shading::Basic,
            ..Self::phong(color)
        }
    }

    /// Line material.
    #[must_use]
    pub fn line(color: Color) -> Self {
        Self {
            shading: Shading::Line,
            ..Self::phong(color)
        }
    }

    /// Sprite material sampling `map`.
    #[must_use]
    pub fn sprite(map: TextureDesc) -> Self {
        Self {
            shading: Shading::Sprite,
            map: Some(map),
            ..Self::phong(Color::WHITE)
        }
    }

    /// Set opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set shininess.
    #[must_use]
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Set wireframe rendering.
    #[must_use]
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Set the emissive term.
    #[must_use]
    pub fn with_emissive(mut self, color: Color, intensity: f32) -> Self {
        self.emissive = Some((color, intensity));
        self
    }

    /// Set the blending mode.
    #[must_use]
    pub fn with_blending(mut self, blending: Blending) -> Self {
        self.blending = blending;
        self
    }

    /// Whether the material needs the transparent pass.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0 || self.map.is_some()
    }
}
