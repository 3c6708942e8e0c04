//! Drill-down state machine tests.

use atlas_common::DivisionLevel;
use drilldown::{
    CommandQueue, DrillDownController, DrillDownError, FetchCommand, NavigationState,
    TicketIssuer,
};
use test_utils::{ids, ROOT_NAME};

fn controller() -> (DrillDownController, CommandQueue) {
    let queue = CommandQueue::new();
    let mut controller = DrillDownController::new(ROOT_NAME, TicketIssuer::new());
    controller.subscribe(Box::new(queue.clone()));
    (controller, queue)
}

fn root() -> NavigationState {
    NavigationState::root(ROOT_NAME)
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn test_drill_down_to_arrondissement_and_jump_back() {
    let (mut c, _) = controller();

    c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region)
        .expect("region has a child level");
    assert_eq!(
        c.current(),
        &NavigationState::new(DivisionLevel::Departement, ids::CENTRE, "Centre")
    );
    assert_eq!(c.history().as_slice(), &[root()]);

    c.drill_down(ids::MFOUNDI, "Mfoundi", DivisionLevel::Departement)
        .expect("departement has a child level");
    assert_eq!(
        c.current(),
        &NavigationState::new(DivisionLevel::Arrondissement, ids::MFOUNDI, "Mfoundi")
    );
    assert_eq!(c.history().len(), 2);

    c.jump_to_history(0).unwrap();
    assert_eq!(c.current(), &root());
    assert!(c.history().is_empty());
}

#[test]
fn test_click_on_terminal_level_is_ignored() {
    let (mut c, queue) = controller();
    c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region);
    c.drill_down(ids::MFOUNDI, "Mfoundi", DivisionLevel::Departement);
    queue.drain();

    let before = c.current().clone();
    assert!(c
        .drill_down(ids::YAOUNDE_I, "Yaoundé I", DivisionLevel::Arrondissement)
        .is_none());
    assert!(c.drill_down(1, "Cameroun", DivisionLevel::Country).is_none());

    assert_eq!(c.current(), &before);
    assert_eq!(c.history().len(), 2);
    assert!(queue.is_empty(), "ignored clicks must not emit fetches");
}

#[test]
fn test_jump_restores_state_before_next_drill() {
    let paths: &[&[(i64, &str, DivisionLevel)]] = &[
        &[(ids::CENTRE, "Centre", DivisionLevel::Region)],
        &[
            (ids::CENTRE, "Centre", DivisionLevel::Region),
            (ids::MFOUNDI, "Mfoundi", DivisionLevel::Departement),
        ],
        &[
            (ids::LITTORAL, "Littoral", DivisionLevel::Region),
            (ids::WOURI, "Wouri", DivisionLevel::Departement),
        ],
    ];

    for path in paths {
        for k in 0..path.len() {
            let (mut c, _) = controller();
            let mut before = Vec::new();
            for (id, name, level) in path.iter() {
                before.push(c.current().clone());
                c.drill_down(*id, name, *level);
            }

            c.jump_to_history(k).unwrap();
            assert_eq!(c.history().len(), k, "path {:?}, k = {}", path, k);
            assert_eq!(c.current(), &before[k], "path {:?}, k = {}", path, k);
        }
    }
}

#[test]
fn test_jump_out_of_range_leaves_state_untouched() {
    let (mut c, queue) = controller();
    c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region);
    queue.drain();

    let err = c.jump_to_history(1).unwrap_err();
    assert_eq!(err, DrillDownError::HistoryIndexOutOfRange { index: 1, len: 1 });
    assert_eq!(c.current().parent_id, Some(ids::CENTRE));
    assert_eq!(c.history().len(), 1);
    assert!(queue.is_empty());
}

#[test]
fn test_reset_clears_history() {
    let (mut c, _) = controller();
    c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region);
    c.drill_down(ids::MFOUNDI, "Mfoundi", DivisionLevel::Departement);

    let command = c.reset();
    assert_eq!(c.current(), &root());
    assert!(c.history().is_empty());
    assert!(matches!(
        command,
        FetchCommand::Zones { level: DivisionLevel::Region, parent_id: None, .. }
    ));
}

#[test]
fn test_reset_after_any_jump_returns_to_root() {
    let depth = {
        let (mut c, _) = controller();
        c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region);
        c.drill_down(ids::MFOUNDI, "Mfoundi", DivisionLevel::Departement);
        c.history().len()
    };

    for index in 0..depth {
        let (mut c, _) = controller();
        c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region);
        c.drill_down(ids::MFOUNDI, "Mfoundi", DivisionLevel::Departement);

        c.jump_to_history(index).unwrap();
        c.reset();
        assert_eq!(c.current(), &root(), "after jump to {}", index);
        assert!(c.history().is_empty(), "after jump to {}", index);
    }
}

#[test]
fn test_back_walks_up_then_resets() {
    let (mut c, _) = controller();
    c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region);
    c.drill_down(ids::MFOUNDI, "Mfoundi", DivisionLevel::Departement);

    c.back();
    assert_eq!(c.current().name, "Centre");
    assert_eq!(c.history().len(), 1);

    c.back();
    assert_eq!(c.current(), &root());

    c.back();
    assert_eq!(c.current(), &root());
    assert!(c.history().is_empty());
}

// ============================================================================
// Emitted commands
// ============================================================================

#[test]
fn test_every_transition_notifies_observers() {
    let (mut c, queue) = controller();
    c.refresh();
    c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region);
    c.jump_to_history(0).unwrap();
    c.reset();

    let commands = queue.drain();
    assert_eq!(commands.len(), 4);
    assert!(commands.iter().all(|c| c.channel() == "zones"));
    assert!(matches!(
        commands[1],
        FetchCommand::Zones {
            level: DivisionLevel::Departement,
            parent_id: Some(ids::CENTRE),
            ..
        }
    ));

    let tickets: Vec<u64> = commands.iter().map(|c| c.ticket().value()).collect();
    assert!(tickets.windows(2).all(|w| w[0] < w[1]), "tickets: {:?}", tickets);
}

#[test]
fn test_root_fetch_has_no_parent() {
    let (mut c, _) = controller();
    assert!(matches!(
        c.refresh(),
        FetchCommand::Zones { level: DivisionLevel::Region, parent_id: None, .. }
    ));
}

// ============================================================================
// Derived view data
// ============================================================================

#[test]
fn test_breadcrumbs_and_labels() {
    let (mut c, _) = controller();
    assert_eq!(c.scope_label(), "PAYS");
    assert!(!c.detail_panel_visible());

    c.drill_down(ids::CENTRE, "Centre", DivisionLevel::Region);
    c.drill_down(ids::MFOUNDI, "Mfoundi", DivisionLevel::Departement);
    assert_eq!(c.scope_label(), "DÉPARTEMENT");
    assert!(c.detail_panel_visible());

    let crumbs = c.breadcrumbs();
    let names: Vec<&str> = crumbs.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec![ROOT_NAME, "Centre", "Mfoundi"]);
    assert_eq!(crumbs[0].index, Some(0));
    assert_eq!(crumbs[2].index, None);
}
