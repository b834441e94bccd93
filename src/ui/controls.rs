//! DOM controls and their translation into [`VizCommand`]s.
//!
//! Every control is optional: hosts look each id up and skip the ones
//! that are absent.

use crate::engine::command::{ViewMode, VizCommand};

/// Element that receives the rendering surface (and the error block).
pub const CONTAINER_ID: &str = "visualizationContainer";
/// Element that receives the info panel.
pub const INFO_PANEL_ID: &str = "visualizationInfo";

/// The four visualization controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// `<select>` with the view filter.
    ViewSelector,
    /// Range input 0–100 for the rotation speed.
    RotationSpeed,
    /// Range input 0–100 for the zoom level.
    ZoomLevel,
    /// Checkbox for label visibility.
    ShowLabels,
}

/// Raw value read from a control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    /// `value` of a select or range input.
    Text(String),
    /// `checked` of a checkbox.
    Checked(bool),
}

impl ControlId {
    /// All controls.
    pub const ALL: [ControlId; 4] = [
        Self::ViewSelector,
        Self::RotationSpeed,
        Self::ZoomLevel,
        Self::ShowLabels,
    ];

    /// Element id in the page.
    #[must_use]
    pub fn dom_id(self) -> &'static str {
        match self {
            Self::ViewSelector => "viewSelector",
            Self::RotationSpeed => "rotationSpeed",
            Self::ZoomLevel => "zoomLevel",
            Self::ShowLabels => "showLabels",
        }
    }

    /// DOM event that reports a new value.
    #[must_use]
    pub fn event(self) -> &'static str {
        match self {
            Self::RotationSpeed | Self::ZoomLevel => "input",
            Self::ViewSelector | Self::ShowLabels => "change",
        }
    }

    /// Whether the control reports `checked` rather than `value`.
    #[must_use]
    pub fn is_checkbox(self) -> bool {
        self == Self::ShowLabels
    }

    /// Command for a new control value, or `None` (logged) when the
    /// value does not make sense for the control.
    #[must_use]
    pub fn command(self, value: &ControlValue) -> Option<VizCommand> {
        let command = match (self, value) {
            (Self::ShowLabels, ControlValue::Checked(show)) => {
                Some(VizCommand::ShowLabels(*show))
            }
            (Self::ViewSelector, ControlValue::Text(v)) => {
                ViewMode::parse(v).map(VizCommand::SetView)
            }
            (Self::RotationSpeed, ControlValue::Text(v)) => {
                slider(v).map(VizCommand::SetRotationSpeed)
            }
            (Self::ZoomLevel, ControlValue::Text(v)) => {
                slider(v).map(VizCommand::SetZoom)
            }
            _ => None,
        };
        if command.is_none() {
            log::warn!("ignoring {value:?} from #{}", self.dom_id());
        }
        command
    }
}

fn slider(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &str) -> ControlValue {
        ControlValue::Text(v.to_owned())
    }

    #[test]
    fn maps_values_to_commands() {
        assert_eq!(
            ControlId::ViewSelector.command(&text("nano")),
            Some(VizCommand::SetView(ViewMode::Nano))
        );
        assert_eq!(
            ControlId::RotationSpeed.command(&text("35")),
            Some(VizCommand::SetRotationSpeed(35.0))
        );
        assert_eq!(
            ControlId::ZoomLevel.command(&text(" 80 ")),
            Some(VizCommand::SetZoom(80.0))
        );
        assert_eq!(
            ControlId::ShowLabels.command(&ControlValue::Checked(false)),
            Some(VizCommand::ShowLabels(false))
        );
    }

    #[test]
    fn rejects_nonsense() {
        assert_eq!(ControlId::ViewSelector.command(&text("all")), None);
        assert_eq!(ControlId::ZoomLevel.command(&text("NaN")), None);
        assert_eq!(ControlId::RotationSpeed.command(&text("")), None);
        assert_eq!(ControlId::ShowLabels.command(&text("on")), None);
    }

    #[test]
    fn ids_and_events() {
        let ids: Vec<_> = ControlId::ALL.map(ControlId::dom_id).to_vec();
        assert_eq!(
            ids,
            ["viewSelector", "rotationSpeed", "zoomLevel", "showLabels"]
        );
        assert_eq!(ControlId::ZoomLevel.event(), "input");
        assert_eq!(ControlId::ViewSelector.event(), "change");
        assert!(ControlId::ShowLabels.is_checkbox());
    }
}
