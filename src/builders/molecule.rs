//! Atom spheres, bond cylinders and their labels.

use glam::{Quat, Vec3};
use serde::Serialize;

use super::{finite, label, positive, BuildContext, BuildCounts, BuildError};
use crate::payload::{Atom, Bond, Molecule};
use crate::resources::{GeometryDesc, MaterialDesc};
use crate::scene::{Group, NodeKind, Transform};

const BOND_OPACITY: f32 = 0.7;

/// Per-kind tallies for one molecule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoleculeCounts {
    /// Atom records.
    pub atoms: BuildCounts,
    /// Bond records.
    pub bonds: BuildCounts,
}

/// Build every atom and bond of `molecule` into `group`.
pub fn build_molecule(
    ctx: &mut BuildContext<'_>,
    molecule: &Molecule,
    group: &mut Group,
) -> MoleculeCounts {
    let mut counts = MoleculeCounts::default();
    for (i, atom) in molecule.atoms.iter().enumerate() {
        counts.atoms.record("atom", i, build_atom(ctx, atom, group));
    }
    for (i, bond) in molecule.bonds.iter().enumerate() {
        counts.bonds.record("bond", i, build_bond(ctx, bond, group));
    }
    counts.atoms.skipped += molecule.atoms.rejected();
    counts.bonds.skipped += molecule.bonds.rejected();
    log::debug!(
        "molecule {:?}: {} atoms, {} bonds",
        molecule.name,
        counts.atoms.built,
        counts.bonds.built
    );
    counts
}

/// Sphere for one atom, colored by element, plus its symbol label.
///
/// # Errors
///
/// The atom has no finite position or a non-positive radius.
pub fn build_atom(
    ctx: &mut BuildContext<'_>,
    atom: &Atom,
    group: &mut Group,
) -> Result<(), BuildError> {
    let opts = ctx.options;
    let position = atom
        .position
        .ok_or(BuildError::MissingPosition("atom"))?
        .to_vec3();
    let position = finite(position, "atom position")?;
    // Zero means unset, like a missing radius.
    let radius = positive(
        atom.radius
            .filter(|r| *r != 0.0)
            .unwrap_or(opts.geometry.default_atom_radius),
        "atom radius",
    )?;

    let element = atom.element.as_deref().map(str::trim);
    let palette = element.and_then(|e| opts.colors.element(e));
    let (key, color) = match (element, palette) {
        (Some(symbol), Some(color)) => (format!("atom_{symbol}"), color),
        _ => ("atom_default".to_owned(), opts.colors.default_element),
    };

    let segments = opts.quality.atom_segments.pick(ctx.detail.degraded);
    let geometry = ctx.sphere(radius, segments);
    let material = ctx.material(&key, || MaterialDesc::phong(color));
    let mut sphere = ctx.mesh(NodeKind::Mesh, geometry, material);
    sphere.transform = Transform::from_translation(position);
    group.add(sphere);

    if let Some(symbol) = element {
        if let Some(node) = label::label(ctx, symbol, position) {
            group.add_label(node);
        }
    }
    Ok(())
}

/// Cylinder between two atoms: unit-height geometry scaled to the bond
/// length, rotated from +Y onto the bond axis, centered at the midpoint.
///
/// # Errors
///
/// An endpoint is missing or the bond is shorter than the minimum length.
pub fn build_bond(
    ctx: &mut BuildContext<'_>,
    bond: &Bond,
    group: &mut Group,
) -> Result<(), BuildError> {
    let opts = ctx.options;
    let (Some(start), Some(end)) = (bond.start, bond.end) else {
        return Err(BuildError::MissingPosition("bond"));
    };
    let start = finite(start.to_vec3(), "bond start")?;
    let end = finite(end.to_vec3(), "bond end")?;

    let axis = end - start;
    let length = axis.length();
    if length < opts.geometry.min_bond_length {
        return Err(BuildError::DegenerateBond(length));
    }

    let radius = opts.geometry.bond_radius;
    let segments = opts.quality.bond_segments.pick(ctx.detail.degraded);
    let geometry = ctx.geometry(
        &format!("cylinder_{radius:.2}_{segments}"),
        || GeometryDesc::Cylinder {
            radius,
            height: 1.0,
            segments,
        },
    );
    let color = opts.colors.bond;
    let material = ctx.material("bond", || {
        MaterialDesc::phong(color).with_opacity(BOND_OPACITY)
    });

    let mut cylinder = ctx.mesh(NodeKind::Mesh, geometry, material);
    cylinder.transform = Transform::from_translation(start + axis * 0.5)
        .with_rotation(Quat::from_rotation_arc(Vec3::Y, axis / length))
        .with_scale(Vec3::new(1.0, length, 1.0));
    group.add(cylinder);
    Ok(())
}
