//! Unit tests for ak-control.

use ak_core::{ComponentState, ComponentType};

use crate::StateMapping;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn mapping(entries: &[(&str, ComponentState)]) -> StateMapping {
    StateMapping::capture(
        entries
            .iter()
            .map(|&(name, state)| (name, ComponentType::VehicleComponent, state)),
    )
}

#[cfg(test)]
mod mapping_tests {
    use super::*;

    #[test]
    fn absent_name_reads_undefined() {
        let m = mapping(&[("a", ComponentState::Acting)]);
        assert_eq!(m.state_of("a"), ComponentState::Acting);
        assert_eq!(m.state_of("b"), ComponentState::Undefined);
        assert!(m.get("b").is_none());
    }

    #[test]
    fn iteration_is_name_ordered() {
        let m = mapping(&[("z", ComponentState::Armed), ("a", ComponentState::Disabled)]);
        let names: Vec<&str> = m.iter().map(|(name, _, _)| name).collect();
        assert_eq!(names, vec!["a", "z"]);
        assert_eq!(m.len(), 2);
    }
}

#[cfg(test)]
mod condition_tests {
    use super::*;
    use crate::{Condition, StateExpr};

    fn lookup_eq(a: &str, b: &str) -> Condition {
        Condition::equals(StateExpr::component(a), StateExpr::component(b))
    }

    #[test]
    fn fixed_ignores_mapping() {
        let expr = StateExpr::fixed(ComponentState::Armed);
        assert_eq!(expr.get(&StateMapping::default()), ComponentState::Armed);
    }

    #[test]
    fn equality_of_two_lookups() {
        let cond = lookup_eq("a", "b");
        let same = mapping(&[("a", ComponentState::Acting), ("b", ComponentState::Acting)]);
        let diff = mapping(&[("a", ComponentState::Acting), ("b", ComponentState::Armed)]);
        assert!(cond.is_fulfilled(&same));
        assert!(!cond.is_fulfilled(&diff));
    }

    #[test]
    fn missing_component_compares_as_undefined() {
        let cond = lookup_eq("a", "b");
        let only_a = mapping(&[("a", ComponentState::Acting)]);
        assert!(!cond.is_fulfilled(&only_a));

        let a_undefined = mapping(&[("a", ComponentState::Undefined)]);
        assert!(cond.is_fulfilled(&a_undefined));

        let lookups = cond.undefined_lookups(&only_a);
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].name, "b");
    }

    #[test]
    fn combinators() {
        let m = mapping(&[("a", ComponentState::Acting), ("b", ComponentState::Disabled)]);
        let a_acting = Condition::component_is("a", ComponentState::Acting);
        let b_acting = Condition::component_is("b", ComponentState::Acting);

        assert!(Condition::And(vec![a_acting.clone(), b_acting.clone().negate()]).is_fulfilled(&m));
        assert!(!Condition::And(vec![a_acting.clone(), b_acting.clone()]).is_fulfilled(&m));
        assert!(Condition::Or(vec![b_acting.clone(), a_acting.clone()]).is_fulfilled(&m));
        assert!(Condition::NotEquals(StateExpr::component("a"), StateExpr::component("b")).is_fulfilled(&m));
        assert!(!b_acting.is_fulfilled(&m));
    }

    #[test]
    fn empty_combinators() {
        let m = StateMapping::default();
        assert!(Condition::And(vec![]).is_fulfilled(&m));
        assert!(!Condition::Or(vec![]).is_fulfilled(&m));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let cond = Condition::Or(vec![
            lookup_eq("a", "missing"),
            Condition::component_is("b", ComponentState::Armed).negate(),
        ]);
        let m = mapping(&[("a", ComponentState::Armed), ("b", ComponentState::Armed)]);
        let first = cond.is_fulfilled(&m);
        for _ in 0..10 {
            assert_eq!(cond.is_fulfilled(&m), first);
        }
        assert_eq!(cond.undefined_lookups(&m), cond.undefined_lookups(&m));
    }

    #[test]
    fn referenced_components_in_order() {
        let cond = Condition::And(vec![
            lookup_eq("a", "b"),
            Condition::component_is("c", ComponentState::Acting).negate(),
        ]);
        assert_eq!(cond.referenced_components(), vec!["a", "b", "c"]);
    }
}

#[cfg(test)]
mod controller_tests {
    use super::*;
    use crate::{
        ComponentStateController, Condition, ControlState, StateChangeRequest,
        TransitionCause, TransitionPolicy, TransitionTable,
    };

    fn watching(name: &str, target: &str, state: ComponentState) -> ControlState {
        ControlState::new(name, ComponentType::VehicleComponent, state)
            .with_condition(Condition::component_is(target, ComponentState::Acting))
    }

    #[test]
    fn default_policy_acts_or_disables() {
        let controller = ComponentStateController::default();
        let entries = vec![
            watching("x", "a", ComponentState::Disabled),
            watching("y", "b", ComponentState::Acting),
        ];
        let m = mapping(&[("a", ComponentState::Acting), ("b", ComponentState::Armed)]);
        assert_eq!(
            controller.next_states(&m, &entries),
            vec![Some(ComponentState::Acting), Some(ComponentState::Disabled)]
        );
    }

    #[test]
    fn no_condition_keeps_state() {
        let controller = ComponentStateController::default();
        let mut entries = vec![ControlState::new("x", ComponentType::Driver, ComponentState::Armed)];
        let transitions = controller.apply(&StateMapping::default(), &[], entries.iter_mut());
        assert!(transitions.is_empty());
        assert_eq!(entries[0].state, ComponentState::Armed);
    }

    #[test]
    fn policy_is_per_type() {
        let table = TransitionTable::default().with(
            ComponentType::Driver,
            TransitionPolicy { on_fulfilled: ComponentState::Armed, on_unfulfilled: None },
        );
        let controller = ComponentStateController::new(table);
        let driver = ControlState::new("d", ComponentType::Driver, ComponentState::Acting)
            .with_condition(Condition::component_is("a", ComponentState::Acting));
        let vehicle = watching("v", "a", ComponentState::Acting);

        let on = mapping(&[("a", ComponentState::Acting)]);
        let off = mapping(&[("a", ComponentState::Disabled)]);
        assert_eq!(controller.next_state(&on, &driver, None), Some(ComponentState::Armed));
        assert_eq!(controller.next_state(&off, &driver, None), None);
        assert_eq!(controller.next_state(&on, &vehicle, None), Some(ComponentState::Acting));
        assert_eq!(controller.next_state(&off, &vehicle, None), Some(ComponentState::Disabled));
    }

    #[test]
    fn apply_reads_snapshot_not_live_state() {
        // y watches x; x flips this cycle, but y must see the snapshot value.
        let controller = ComponentStateController::default();
        let mut entries = vec![
            watching("x", "a", ComponentState::Acting),
            watching("y", "x", ComponentState::Disabled),
        ];
        let m = StateMapping::capture(
            [("x", ComponentState::Acting), ("y", ComponentState::Disabled)]
                .into_iter()
                .map(|(n, s)| (n, ComponentType::VehicleComponent, s)),
        );
        let transitions = controller.apply(&m, &[], entries.iter_mut());

        assert_eq!(entries[0].state, ComponentState::Disabled);
        assert_eq!(entries[1].state, ComponentState::Acting);
        assert_eq!(transitions.len(), 2);
        assert!(transitions.iter().all(|t| t.cause == TransitionCause::Condition));
    }

    #[test]
    fn request_beats_condition() {
        let controller = ComponentStateController::default();
        let mut entries = vec![watching("x", "a", ComponentState::Disabled)];
        let m = mapping(&[("a", ComponentState::Acting)]);
        let requests = [StateChangeRequest::new("x", ComponentState::Armed)];

        let transitions = controller.apply(&m, &requests, entries.iter_mut());
        assert_eq!(entries[0].state, ComponentState::Armed);
        assert_eq!(transitions[0].cause, TransitionCause::Request);
        assert_eq!(transitions[0].from, ComponentState::Disabled);
    }

    #[test]
    fn last_request_wins_and_unknown_is_dropped() {
        let controller = ComponentStateController::default();
        let mut entries = vec![ControlState::new("x", ComponentType::Driver, ComponentState::Acting)];
        let requests = [
            StateChangeRequest::new("x", ComponentState::Armed),
            StateChangeRequest::new("ghost", ComponentState::Acting),
            StateChangeRequest::new("x", ComponentState::Disabled),
        ];
        let transitions = controller.apply(&StateMapping::default(), &requests, entries.iter_mut());
        assert_eq!(entries[0].state, ComponentState::Disabled);
        assert_eq!(transitions.len(), 1);
    }

    #[test]
    fn unchanged_state_reports_nothing() {
        let controller = ComponentStateController::default();
        let mut entries = vec![watching("x", "a", ComponentState::Acting)];
        let m = mapping(&[("a", ComponentState::Acting)]);
        assert!(controller.apply(&m, &[], entries.iter_mut()).is_empty());
    }
}
