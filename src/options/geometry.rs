use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
/// Sizes, scale factors and layout distances for the entity builders.
pub struct GeometryOptions {
    /// Atom sphere radius when the payload omits one.
    #[schemars(title = "Atom Radius", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub default_atom_radius: f32,
    /// Bond cylinder radius.
    #[schemars(title = "Bond Radius", range(min = 0.02, max = 0.5), extend("step" = 0.01))]
    pub bond_radius: f32,
    /// Bonds shorter than this are degenerate and skipped.
    #[schemars(skip)]
    pub min_bond_length: f32,
    /// Nanoparticle size used when the payload omits `size_nm`.
    #[schemars(skip)]
    pub default_size_nm: f32,
    /// nm per scene unit of sphere radius.
    #[schemars(skip)]
    pub sphere_divisor: f32,
    /// nm per scene unit of rod radius.
    #[schemars(skip)]
    pub rod_radius_divisor: f32,
    /// nm per scene unit of rod length.
    #[schemars(skip)]
    pub rod_length_divisor: f32,
    /// nm per scene unit of cube side.
    #[schemars(skip)]
    pub cube_divisor: f32,
    /// Translucent shell radius relative to the core.
    #[schemars(skip)]
    pub shell_scale: f32,
    /// Glow sprite size relative to the shell radius.
    #[schemars(skip)]
    pub glow_scale: f32,
    /// Coating shell radius relative to the core.
    #[schemars(skip)]
    pub coating_shell_scale: f32,
    /// Coating particle radius relative to the core.
    #[schemars(skip)]
    pub coating_particle_scale: f32,
    /// Coating particles per nm of nanoparticle size.
    #[schemars(title = "Coating Density", range(min = 0.0, max = 10.0), extend("step" = 0.5))]
    pub coating_per_nm: f32,
    /// Maximum relative jitter applied to each coating coordinate.
    #[schemars(skip)]
    pub coating_jitter: f32,
    /// Interaction marker sphere radius.
    #[schemars(skip)]
    pub marker_radius: f32,
    /// Halo radius relative to the marker.
    #[schemars(skip)]
    pub halo_scale: f32,
    /// Vertical offset of a label above its anchor.
    #[schemars(skip)]
    pub label_offset: f32,
    /// Label sprite size in scene units (width, height).
    #[schemars(skip)]
    pub label_size: [f32; 2],
    /// Distance between the molecule and nanoparticle groups along X.
    #[schemars(title = "Separation", range(min = 0.0, max = 30.0), extend("step" = 0.5))]
    pub group_separation: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            default_atom_radius: 0.5,
            bond_radius: 0.1,
            min_bond_length: 0.1,
            default_size_nm: 10.0,
            sphere_divisor: 20.0,
            rod_radius_divisor: 30.0,
            rod_length_divisor: 10.0,
            cube_divisor: 15.0,
            shell_scale: 1.2,
            glow_scale: 5.0,
            coating_shell_scale: 1.3,
            coating_particle_scale: 0.15,
            coating_per_nm: 2.0,
            coating_jitter: 0.1,
            marker_radius: 0.2,
            halo_scale: 1.5,
            label_offset: 0.5,
            label_size: [2.0, 0.5],
            group_separation: 8.0,
        }
    }
}
