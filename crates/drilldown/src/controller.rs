//! Drill-down state machine.
//!
//! States follow the administrative hierarchy REGION → DEPARTEMENT →
//! ARRONDISSEMENT. Clicking a zone of level L displays the children of that
//! zone at level `L.child()`; arrondissements have no children, so clicks on
//! them are ignored.
//!
//! Every state change emits a [`FetchCommand::Zones`] for the new view,
//! returned to the caller and delivered to all subscribed observers.

use atlas_common::{DivisionLevel, ZoneId};
use tracing::{debug, info};

use crate::command::{FetchCommand, FetchObserver, TicketIssuer};
use crate::{DrillDownError, History, NavigationState};

/// One element of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    /// History index to pass to `jump_to_history`; `None` for the current view.
    pub index: Option<usize>,
}

pub struct DrillDownController {
    root: NavigationState,
    current: NavigationState,
    history: History,
    issuer: TicketIssuer,
    observers: Vec<Box<dyn FetchObserver>>,
}

impl DrillDownController {
    /// Create a controller positioned on the root view.
    pub fn new(root_name: impl Into<String>, issuer: TicketIssuer) -> Self {
        let root = NavigationState::root(root_name);
        Self {
            current: root.clone(),
            root,
            history: History::new(),
            issuer,
            observers: Vec::new(),
        }
    }

    /// Register an observer for every emitted fetch command.
    pub fn subscribe(&mut self, observer: Box<dyn FetchObserver>) {
        self.observers.push(observer);
    }

    pub fn current(&self) -> &NavigationState {
        &self.current
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn root(&self) -> &NavigationState {
        &self.root
    }

    /// Request the geometry of the current view, e.g. when the map mounts.
    pub fn refresh(&mut self) -> FetchCommand {
        self.emit()
    }

    /// Drill into the zone `id` that was clicked at `clicked_level`.
    ///
    /// Returns `None`, leaving the state untouched, when the clicked level
    /// has no child level.
    pub fn drill_down(
        &mut self,
        id: ZoneId,
        name: &str,
        clicked_level: DivisionLevel,
    ) -> Option<FetchCommand> {
        let Some(next_level) = clicked_level.child() else {
            debug!(zone_id = id, level = %clicked_level, "Ignoring click on terminal level");
            return None;
        };

        let next = NavigationState::new(next_level, id, name);
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);

        info!(
            zone_id = id,
            name = %name,
            level = %next_level,
            depth = self.history.len(),
            "Drilled down"
        );
        Some(self.emit())
    }

    /// Restore `history[index]` and drop it and every later entry.
    pub fn jump_to_history(&mut self, index: usize) -> Result<FetchCommand, DrillDownError> {
        let target = self.history.truncate_to(index)?;
        info!(index, name = %target.name, level = %target.level, "Jumped to history entry");
        self.current = target;
        Ok(self.emit())
    }

    /// Go up one level, or reset when there is nothing to go back to.
    pub fn back(&mut self) -> FetchCommand {
        match self.history.len() {
            0 => self.reset(),
            len => {
                let target = self.history.truncate_to(len - 1);
                match target {
                    Ok(target) => {
                        self.current = target;
                        self.emit()
                    }
                    Err(_) => self.reset(),
                }
            }
        }
    }

    /// Clear the history and return to the root view.
    pub fn reset(&mut self) -> FetchCommand {
        self.history.clear();
        self.current = self.root.clone();
        info!(name = %self.root.name, "Reset to root view");
        self.emit()
    }

    /// History entries followed by the current view.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, state)| Breadcrumb {
                name: state.name.clone(),
                index: Some(i),
            })
            .chain(std::iter::once(Breadcrumb {
                name: self.current.name.clone(),
                index: None,
            }))
            .collect()
    }

    pub fn scope_label(&self) -> &'static str {
        self.current.scope_label()
    }

    /// The zone detail panel is shown for every view except the root.
    pub fn detail_panel_visible(&self) -> bool {
        !self.current.is_root()
    }

    fn emit(&self) -> FetchCommand {
        let command = FetchCommand::Zones {
            ticket: self.issuer.next(),
            level: self.current.level,
            parent_id: self.current.parent_id,
        };
        for observer in &self.observers {
            observer.notify(&command);
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandQueue;

    fn controller() -> DrillDownController {
        DrillDownController::new("Cameroun", TicketIssuer::new())
    }

    #[test]
    fn test_back_from_root_resets() {
        let mut c = controller();
        let cmd = c.back();
        assert!(c.current().is_root());
        assert!(matches!(cmd, FetchCommand::Zones { parent_id: None, .. }));
    }

    #[test]
    fn test_back_pops_one_level() {
        let mut c = controller();
        c.drill_down(5, "Centre", DivisionLevel::Region);
        c.drill_down(12, "Mfoundi", DivisionLevel::Departement);
        c.back();
        assert_eq!(c.current().name, "Centre");
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_observers_see_every_command() {
        let queue = CommandQueue::new();
        let mut c = controller();
        c.subscribe(Box::new(queue.clone()));

        c.refresh();
        c.drill_down(5, "Centre", DivisionLevel::Region);
        c.drill_down(99, "Mfou", DivisionLevel::Arrondissement);
        c.reset();

        let commands = queue.drain();
        assert_eq!(commands.len(), 3);
        assert!(commands.windows(2).all(|w| w[0].ticket() < w[1].ticket()));
    }

    #[test]
    fn test_breadcrumbs() {
        let mut c = controller();
        c.drill_down(5, "Centre", DivisionLevel::Region);
        let crumbs = c.breadcrumbs();
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[0], Breadcrumb { name: "Cameroun".into(), index: Some(0) });
        assert_eq!(crumbs[1], Breadcrumb { name: "Centre".into(), index: None });
        assert!(c.detail_panel_visible());
    }
}
