use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::util::color::Color;

/// Color palette for atoms, bonds, nanoparticles and interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// Atom color for elements missing from the palette.
    pub default_element: Color,
    /// Bond cylinder color.
    pub bond: Color,
    /// Nanoparticle color for surface charge below `-charge_threshold`.
    pub charge_negative: Color,
    /// Nanoparticle color for charge within the threshold (inclusive).
    pub charge_neutral: Color,
    /// Nanoparticle color for surface charge above `charge_threshold`.
    pub charge_positive: Color,
    /// Surface charge (mV) separating the neutral bucket from the others.
    pub charge_threshold: f32,
    /// Cube edge outline color.
    pub cube_edges: Color,
    /// PEG coating particles.
    pub coating_peg: Color,
    /// Lipid coating particles.
    pub coating_lipid: Color,
    /// Polymer coating particles.
    pub coating_polymer: Color,
    /// Protein coating particles.
    pub coating_protein: Color,
    /// Any other coating.
    pub coating_other: Color,
    /// Interaction marker sphere (also its emissive color).
    pub interaction_point: Color,
    /// Interaction connecting line.
    pub interaction_line: Color,
    /// Pulsing interaction halo.
    pub interaction_halo: Color,
    /// Label text fill.
    pub label_text: Color,
    /// Atom color keyed by element symbol (case-sensitive, e.g. `Cl`).
    pub elements: HashMap<String, Color>,
}

impl Default for ColorOptions {
    fn default() -> Self {
        let elements = [
            ("C", 0x0080_8080),
            ("H", 0x00ff_ffff),
            ("O", 0x00ff_0000),
            ("N", 0x0000_00ff),
            ("S", 0x00ff_ff00),
            ("P", 0x00ff_8000),
            ("F", 0x0000_ff00),
            ("Cl", 0x0000_ff00),
            ("Br", 0x0088_2200),
            ("I", 0x0066_00bb),
        ]
        .into_iter()
        .map(|(symbol, hex)| (symbol.to_owned(), Color(hex)))
        .collect();

        Self {
            elements,
            default_element: Color(0x00dd_dddd),
            bond: Color::WHITE,
            charge_negative: Color(0x0000_55ff),
            charge_neutral: Color(0x0000_aa55),
            charge_positive: Color(0x00ff_5500),
            charge_threshold: 15.0,
            cube_edges: Color::WHITE,
            coating_peg: Color(0x0088_aaff),
            coating_lipid: Color(0x00ff_aa33),
            coating_polymer: Color(0x00aa_88cc),
            coating_protein: Color(0x0033_ccaa),
            coating_other: Color(0x00aa_aaaa),
            interaction_point: Color(0x00ff_00ff),
            interaction_line: Color(0x00ff_88ff),
            interaction_halo: Color(0x00ff_00ff),
            label_text: Color::WHITE,
        }
    }
}

impl ColorOptions {
    /// Look up an atom color by element symbol. `None` when the symbol is
    /// not in the palette.
    #[must_use]
    pub fn element(&self, symbol: &str) -> Option<Color> {
        self.elements.get(symbol.trim()).copied()
    }
}
