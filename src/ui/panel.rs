//! HTML for the info panel and the error block.

use std::fmt::Write as _;

use crate::payload::VisualizationResponse;

/// Values shown in the info panel.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanel {
    /// Molecule name, or "Unnamed".
    pub molecule: String,
    /// Nanoparticle type, or "Standard".
    pub nanoparticle_type: String,
    /// Nanoparticle size, or "?".
    pub size: String,
}

impl InfoPanel {
    /// Panel values for a backend response.
    #[must_use]
    pub fn from_response(response: &VisualizationResponse) -> Self {
        let nano = response.visualization.nanoparticle.as_ref();
        let non_blank = |s: &&str| !s.trim().is_empty();
        Self {
            molecule: response
                .molecule_name()
                .filter(non_blank)
                .unwrap_or("Unnamed")
                .to_owned(),
            nanoparticle_type: nano
                .and_then(|n| n.kind.as_deref())
                .filter(non_blank)
                .unwrap_or("Standard")
                .to_owned(),
            size: nano
                .and_then(|n| n.size_nm)
                .filter(|s| s.is_finite() && *s != 0.0)
                .map_or_else(|| "?".to_owned(), |s| s.to_string()),
        }
    }

    /// Panel markup. All values are escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<h4>Visualization Info</h4>\n\
             <table class=\"table table-sm\">\n<tbody>\n",
        );
        for (label, value) in [
            ("Molecule", self.molecule.clone()),
            ("Nanoparticle Type", self.nanoparticle_type.clone()),
            ("Size", format!("{} nm", self.size)),
        ] {
            let _ = writeln!(
                html,
                "<tr><th>{label}</th><td>{}</td></tr>",
                escape_html(&value)
            );
        }
        html.push_str(
            "</tbody>\n</table>\n\
             <p class=\"small text-muted\">\
             <i class=\"fas fa-info-circle me-1\"></i>\
             Use controls to adjust the visualization view.</p>\n\
             <p class=\"small text-muted\">\
             <i class=\"fas fa-hand-pointer me-1\"></i>\
             Click and drag to rotate. Scroll to zoom.</p>\n",
        );
        html
    }
}

/// Error block that replaces the container contents.
#[must_use]
pub fn error_html(message: &str) -> String {
    format!(
        "<div class=\"text-center py-5\">\
         <div class=\"alert alert-danger d-inline-block\">\
         <i class=\"fas fa-exclamation-triangle me-2\"></i>{}\
         </div></div>",
        escape_html(message)
    )
}

/// Escape text for use inside HTML elements and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
