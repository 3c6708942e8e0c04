//! Routing of map clicks.
//!
//! Without a sector filter a click navigates into the zone; with one, it
//! opens the zone's statistics instead. Hovering only tracks the zone name
//! for the tooltip.

use atlas_common::{DivisionLevel, ZoneId, ZoneProperties};

#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    DrillDown {
        id: ZoneId,
        name: String,
        level: DivisionLevel,
    },
    OpenZoneStats(ZoneProperties),
}

pub fn dispatch_click(properties: &ZoneProperties, overlay_active: bool) -> ClickAction {
    if overlay_active {
        ClickAction::OpenZoneStats(properties.clone())
    } else {
        ClickAction::DrillDown {
            id: properties.id,
            name: properties.name.clone(),
            level: properties.level,
        }
    }
}

/// Pointer movement over the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverAction {
    Enter { name: String },
    Leave,
}

pub fn dispatch_hover(properties: Option<&ZoneProperties>) -> HoverAction {
    match properties {
        Some(p) => HoverAction::Enter {
            name: p.name.clone(),
        },
        None => HoverAction::Leave,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_mode() {
        let props = ZoneProperties::new(5, "Centre", DivisionLevel::Region);
        assert_eq!(
            dispatch_click(&props, false),
            ClickAction::DrillDown {
                id: 5,
                name: "Centre".to_string(),
                level: DivisionLevel::Region
            }
        );
        assert_eq!(dispatch_click(&props, true), ClickAction::OpenZoneStats(props));
    }
}
