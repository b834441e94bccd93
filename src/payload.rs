//! Visualization payload supplied by the backend API.
//!
//! Every field is optional: missing sections are skipped by the composer
//! and missing numeric fields default to zero or a neutral value. Unknown
//! fields are ignored so the backend can grow the payload freely. A
//! malformed record or section is logged and dropped, never fatal.

use std::ops::Deref;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VizError;

/// A 3D position. Missing components are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Position {
    /// Construct a position from components.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert to a [`Vec3`].
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

// ---------------------------------------------------------------------------
// Lenient sections
// ---------------------------------------------------------------------------

/// A list section of the payload.
///
/// `null` or a missing list is empty. Entries that do not deserialize are
/// logged and counted in [`rejected`](Self::rejected) instead of failing
/// the payload; the rest keep their relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct Records<T> {
    items: Vec<T>,
    rejected: usize,
}

impl<T> Records<T> {
    /// Entries dropped because they did not deserialize.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            rejected: 0,
        }
    }
}

impl<T> Deref for Records<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for Records<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items, rejected: 0 }
    }
}

impl<T> FromIterator<T> for Records<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Serialize> Serialize for Records<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(s)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Records<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let values = match Option::<serde_json::Value>::deserialize(d)? {
            None => return Ok(Self::default()),
            Some(serde_json::Value::Array(values)) => values,
            Some(other) => {
                log::warn!("ignoring non-list record section: {other}");
                return Ok(Self::default());
            }
        };
        let mut records = Self::default();
        for (i, value) in values.into_iter().enumerate() {
            match serde_json::from_value(value) {
                Ok(item) => records.items.push(item),
                Err(e) => {
                    log::warn!("ignoring malformed record {i}: {e}");
                    records.rejected += 1;
                }
            }
        }
        Ok(records)
    }
}

/// An optional object section. `null` and values of the wrong shape are
/// treated as absent.
fn lenient_section<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.and_then(|v| {
        serde_json::from_value(v)
            .inspect_err(|e| log::warn!("ignoring malformed section: {e}"))
            .ok()
    }))
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One atom of the molecule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Atom {
    /// Atom center. Atoms without a position are skipped.
    pub position: Option<Position>,
    /// Element symbol (`"C"`, `"Cl"`, ...). Selects the palette color.
    pub element: Option<String>,
    /// Sphere radius in scene units.
    pub radius: Option<f32>,
}

/// A bond between two positions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Bond {
    /// First endpoint.
    pub start: Option<Position>,
    /// Second endpoint.
    pub end: Option<Position>,
}

/// The drug molecule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Molecule {
    /// Display name.
    pub name: Option<String>,
    /// Atoms in payload order.
    pub atoms: Records<Atom>,
    /// Bonds in payload order.
    pub bonds: Records<Bond>,
}

/// The nanoparticle carrier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NanoparticleSpec {
    /// Shape name: `sphere`, `rod` or `cube` (anything else is a sphere).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Diameter-like size in nanometres.
    pub size_nm: Option<f32>,
    /// Surface charge (zeta potential, mV).
    pub surface_charge: Option<f32>,
    /// Coating name: `peg`, `lipid`, `polymer`, `protein` or other.
    pub coating: Option<String>,
}

/// A drug / nanoparticle interaction site.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionPoint {
    /// Marker position.
    pub position: Option<Position>,
    /// Far end of the connecting line.
    pub target_position: Option<Position>,
    /// Interaction type label (`"hbond"`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Everything needed to build one scene. Immutable once received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationPayload {
    /// The drug molecule, if any.
    #[serde(deserialize_with = "lenient_section")]
    pub molecule: Option<Molecule>,
    /// The nanoparticle, if any.
    #[serde(deserialize_with = "lenient_section")]
    pub nanoparticle: Option<NanoparticleSpec>,
    /// Interaction sites.
    pub interaction_points: Records<InteractionPoint>,
}

/// Summary of the molecule record that accompanies a visualization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleculeSummary {
    /// Display name.
    pub name: Option<String>,
}

/// The backend response envelope: `{ "visualization": {...}, "molecule":
/// {...} }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationResponse {
    /// Molecule record of the request (used for the info panel).
    #[serde(deserialize_with = "lenient_section")]
    pub molecule: Option<MoleculeSummary>,
    /// The scene description.
    pub visualization: VisualizationPayload,
}

impl VisualizationResponse {
    /// Name shown in the info panel: the molecule record's name, falling
    /// back to the payload molecule's name.
    #[must_use]
    pub fn molecule_name(&self) -> Option<&str> {
        self.molecule
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .or_else(|| {
                self.visualization
                    .molecule
                    .as_ref()
                    .and_then(|m| m.name.as_deref())
            })
    }
}

/// Parse either a response envelope or a bare payload.
///
/// A JSON object with a `visualization` key is treated as the envelope;
/// anything else must be a bare [`VisualizationPayload`].
///
/// # Errors
///
/// [`VizError::Payload`] for malformed JSON or a mistyped field.
pub fn parse_response(json: &str) -> Result<VisualizationResponse, VizError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(VizError::Payload(
            "expected a JSON object".to_owned(),
        ));
    }
    if value.get("visualization").is_some() {
        if value["visualization"].is_null() {
            return Err(VizError::Payload(
                "visualization section is null".to_owned(),
            ));
        }
        return Ok(serde_json::from_value(value)?);
    }
    let visualization = serde_json::from_value(value)?;
    Ok(VisualizationResponse {
        molecule: None,
        visualization,
    })
}

impl VisualizationPayload {
    /// Parse a bare payload or the `visualization` section of an envelope.
    ///
    /// # Errors
    ///
    /// As [`parse_response`].
    pub fn from_json(json: &str) -> Result<Self, VizError> {
        parse_response(json).map(|r| r.visualization)
    }

    /// Whether the payload has nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.molecule.is_none()
            && self.nanoparticle.is_none()
            && self.interaction_points.is_empty()
    }

    /// A methane molecule next to a 30 nm PEG-coated sphere, used when no
    /// payload is available.
    #[must_use]
    pub fn demo() -> Self {
        // Tetrahedral hydrogens at unit distance around the carbon.
        let tetra = (-1.0_f32 / 3.0).acos();
        let directions = [
            (0.0_f32, 0.0_f32),
            (2.0 * std::f32::consts::FRAC_PI_3, std::f32::consts::PI - tetra),
            (4.0 * std::f32::consts::FRAC_PI_3, std::f32::consts::PI - tetra),
            (0.0, tetra),
        ];
        let hydrogens: Vec<Position> = directions
            .iter()
            .map(|&(theta, phi)| {
                Position::new(
                    phi.sin() * theta.cos(),
                    phi.sin() * theta.sin(),
                    phi.cos(),
                )
            })
            .collect();

        let mut atoms = vec![Atom {
            position: Some(Position::default()),
            element: Some("C".to_owned()),
            radius: Some(0.5),
        }];
        atoms.extend(hydrogens.iter().map(|&p| Atom {
            position: Some(p),
            element: Some("H".to_owned()),
            radius: Some(0.3),
        }));
        let bonds = hydrogens
            .iter()
            .map(|&p| Bond {
                start: Some(Position::default()),
                end: Some(p),
            })
            .collect();

        Self {
            molecule: Some(Molecule {
                name: Some("Methane".to_owned()),
                atoms: atoms.into(),
                bonds,
            }),
            nanoparticle: Some(NanoparticleSpec {
                kind: Some("sphere".to_owned()),
                size_nm: Some(30.0),
                surface_charge: Some(-20.0),
                coating: Some("PEG".to_owned()),
            }),
            interaction_points: Records::default(),
        }
    }
}
