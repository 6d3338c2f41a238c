//! Unit tests for ak-component.

use ak_control::StateMapping;
use ak_core::{AgentId, ComponentState, StochasticsService, Tick};

use crate::{CycleInfo, Port, SignalKind, SignalValue, StepContext};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn cycle() -> CycleInfo {
    CycleInfo { tick: Tick(3), time_ms: 300, agent: AgentId(0) }
}

fn bool_ports(n: usize) -> Vec<Port> {
    (0..n).map(|i| Port::new(format!("in{i}"), SignalKind::Bool)).collect()
}

#[cfg(test)]
mod arbitration_tests {
    use crate::{ArbitrationError, ArbitrationPattern};

    #[test]
    fn idle_until_first_activity() {
        let mut ecu = ArbitrationPattern::ecu();
        assert_eq!(ecu.decide(&[false; 4]).unwrap(), -1);
        assert_eq!(ecu.decide(&[false; 4]).unwrap(), -1);
        assert!(!ecu.had_prior_activity());
    }

    #[test]
    fn collision_has_absolute_priority() {
        let mut ecu = ArbitrationPattern::ecu();
        for rest in 0..8u8 {
            let triggers = [true, rest & 1 != 0, rest & 2 != 0, rest & 4 != 0];
            assert_eq!(ecu.decide(&triggers).unwrap(), 0);
        }
    }

    #[test]
    fn collision_alone_does_not_arm_post_activity() {
        let mut ecu = ArbitrationPattern::ecu();
        ecu.decide(&[true, false, false, false]).unwrap();
        assert!(!ecu.had_prior_activity());
        assert_eq!(ecu.decide(&[false; 4]).unwrap(), -1);
    }

    #[test]
    fn priority_one_sets_flag() {
        let mut ecu = ArbitrationPattern::ecu();
        assert_eq!(ecu.decide(&[false, true, false, false]).unwrap(), 1);
        assert!(ecu.had_prior_activity());
    }

    #[test]
    fn highest_set_trigger_wins() {
        let mut ecu = ArbitrationPattern::ecu();
        assert_eq!(ecu.decide(&[false, false, true, true]).unwrap(), 2);
        assert_eq!(ecu.decide(&[false, false, false, true]).unwrap(), 3);
        assert_eq!(ecu.decide(&[false, true, true, true]).unwrap(), 1);
    }

    #[test]
    fn never_idle_again_after_activity() {
        let mut ecu = ArbitrationPattern::ecu();
        ecu.decide(&[false, false, false, true]).unwrap();
        for _ in 0..20 {
            assert_eq!(ecu.decide(&[false; 4]).unwrap(), 100);
        }
        ecu.decide(&[true, false, false, false]).unwrap();
        assert_eq!(ecu.decide(&[false; 4]).unwrap(), 100);
    }

    #[test]
    fn fresh_instance_starts_idle() {
        let mut used = ArbitrationPattern::ecu();
        used.decide(&[false, true, false, false]).unwrap();
        let mut rebuilt = ArbitrationPattern::ecu();
        assert_eq!(rebuilt.decide(&[false; 4]).unwrap(), -1);
    }

    #[test]
    fn custom_layout() {
        let mut pattern = ArbitrationPattern::new(vec![10, 20], 0, 99).unwrap();
        assert_eq!(pattern.decide(&[false, false]).unwrap(), 0);
        assert_eq!(pattern.decide(&[false, true]).unwrap(), 20);
        assert_eq!(pattern.decide(&[false, false]).unwrap(), 99);
        assert_eq!(pattern.trigger_count(), 2);
    }

    #[test]
    fn trigger_count_must_match() {
        let mut ecu = ArbitrationPattern::ecu();
        assert_eq!(
            ecu.decide(&[false, true]),
            Err(ArbitrationError::TriggerCount { expected: 4, found: 2 })
        );
        assert!(!ecu.had_prior_activity());
        assert_eq!(ArbitrationPattern::new(vec![], -1, 100), Err(ArbitrationError::NoOutcomes));
    }
}

#[cfg(test)]
mod context_tests {
    use super::*;
    use crate::StepError;

    #[test]
    fn writes_are_kind_checked_and_staged() {
        let states = StateMapping::default();
        let mut rng = StochasticsService::new(1);
        let outputs = vec![Port::new("speed", SignalKind::Double)];
        let mut ctx = StepContext::new(cycle(), "c", ComponentState::Acting, &states, &mut rng)
            .with_ports(&[], &[], &outputs);

        assert!(matches!(
            ctx.write(0, true),
            Err(StepError::KindMismatch { expected: SignalKind::Double, found: SignalKind::Bool, .. })
        ));
        assert!(matches!(ctx.write(1, 1.0), Err(StepError::UnknownOutput { port: 1 })));
        ctx.write(0, 1.0).unwrap();
        ctx.write(0, 2.5).unwrap();

        let out = ctx.finish();
        assert_eq!(out.writes, vec![Some(SignalValue::Double(2.5))]);
    }

    #[test]
    fn unwritten_input_reads_none() {
        let states = StateMapping::default();
        let mut rng = StochasticsService::new(1);
        let inputs = bool_ports(2);
        let values = vec![None, Some(SignalValue::Bool(true))];
        let ctx = StepContext::new(cycle(), "c", ComponentState::Acting, &states, &mut rng)
            .with_ports(&inputs, &values, &[]);

        assert_eq!(ctx.read_bool(0).unwrap(), None);
        assert_eq!(ctx.read_bool(1).unwrap(), Some(true));
        assert!(ctx.read_double(1).is_err());
        assert!(ctx.input(7).is_none());
    }

    #[test]
    fn port_counts_follow_wiring() {
        let states = StateMapping::default();
        let mut rng = StochasticsService::new(1);
        let inputs = bool_ports(3);
        let values = vec![None; 3];
        let outputs = vec![Port::new("label", SignalKind::Text)];
        let ctx = StepContext::new(cycle(), "c", ComponentState::Acting, &states, &mut rng)
            .with_ports(&inputs, &values, &outputs);
        assert_eq!(ctx.input_count(), 3);
        assert_eq!(ctx.output_count(), 1);

        let mut rng = StochasticsService::new(1);
        let bare = StepContext::new(cycle(), "c", ComponentState::Acting, &states, &mut rng);
        assert_eq!(bare.input_count(), 0);
        assert_eq!(bare.output_count(), 0);
    }

    #[test]
    fn text_and_doubles_accessors() {
        let text = SignalValue::Text("lane 2".into());
        let doubles = SignalValue::Doubles(vec![1.5, -0.25]);
        assert_eq!(text.as_text(), Some("lane 2"));
        assert_eq!(text.as_doubles(), None);
        assert_eq!(doubles.as_doubles(), Some(&[1.5, -0.25][..]));
        assert_eq!(doubles.as_text(), None);
        assert_eq!(SignalValue::Int(4).as_text(), None);
    }

    #[test]
    fn published_values_carry_cycle() {
        let states = StateMapping::default();
        let mut rng = StochasticsService::new(1);
        let mut ctx = StepContext::new(cycle(), "c", ComponentState::Acting, &states, &mut rng);
        ctx.publish("grp", "key", 7i64);
        let out = ctx.finish();
        assert_eq!(out.observations.len(), 1);
        assert_eq!(out.observations[0].time_ms, 300);
        assert_eq!(out.observations[0].value, SignalValue::Int(7));
    }
}

#[cfg(test)]
mod ecu_tests {
    use super::*;
    use crate::{ComponentModel, EcuComponent, ModelError, ModelInit, Parameters};

    fn init<'a>(inputs: &'a [Port], outputs: &'a [Port], params: &'a Parameters) -> ModelInit<'a> {
        ModelInit { component: "ecu", priority: 10, inputs, outputs, parameters: params }
    }

    fn step(ecu: &mut EcuComponent, values: &[Option<SignalValue>]) -> i64 {
        let states = StateMapping::default();
        let mut rng = StochasticsService::new(1);
        let inputs = bool_ports(4);
        let outputs = vec![Port::new("index", SignalKind::Int)];
        let mut ctx = StepContext::new(cycle(), "ecu", ComponentState::Acting, &states, &mut rng)
            .with_ports(&inputs, values, &outputs);
        ecu.step(&mut ctx).unwrap();
        let out = ctx.finish();
        assert_eq!(out.observations[0].group, "ecu");
        out.writes[0].as_ref().and_then(SignalValue::as_int).unwrap()
    }

    fn ecu() -> EcuComponent {
        let params = Parameters::new();
        let inputs = bool_ports(4);
        let outputs = vec![Port::new("index", SignalKind::Int)];
        EcuComponent::new(&init(&inputs, &outputs, &params)).unwrap()
    }

    #[test]
    fn unset_inputs_read_false() {
        let mut ecu = ecu();
        assert_eq!(step(&mut ecu, &[None, None, None, None]), -1);
    }

    #[test]
    fn decisions_follow_pattern() {
        let mut ecu = ecu();
        let t = Some(SignalValue::Bool(true));
        let f = Some(SignalValue::Bool(false));
        assert_eq!(step(&mut ecu, &[f.clone(), None, t.clone(), None]), 2);
        assert_eq!(step(&mut ecu, &[t.clone(), t.clone(), None, None]), 0);
        assert_eq!(step(&mut ecu, &[f.clone(), f.clone(), f.clone(), f]), 100);
        assert!(ecu.pattern().had_prior_activity());
    }

    #[test]
    fn wrong_wiring_is_rejected() {
        let params = Parameters::new();
        let outputs = vec![Port::new("index", SignalKind::Int)];
        let three = bool_ports(3);
        assert!(matches!(
            EcuComponent::new(&init(&three, &outputs, &params)),
            Err(ModelError::PortCount { expected: 4, found: 3, .. })
        ));

        let mut four = bool_ports(4);
        four[2].kind = SignalKind::Double;
        assert!(matches!(
            EcuComponent::new(&init(&four, &outputs, &params)),
            Err(ModelError::PortKind { port: 2, .. })
        ));
    }
}

#[cfg(test)]
mod params_tests {
    use ak_core::{Distribution, StochasticsService};

    use crate::{ModelError, ParameterValue, Parameters};

    #[test]
    fn typed_access() {
        let params = Parameters::new()
            .with("gain", ParameterValue::Double(0.5))
            .with("steps", ParameterValue::Int(3))
            .with("mode", ParameterValue::Text("left".into()));

        assert_eq!(params.double("c", "gain").unwrap(), Some(0.5));
        assert_eq!(params.double("c", "steps").unwrap(), Some(3.0));
        assert_eq!(params.int("c", "steps").unwrap(), Some(3));
        assert_eq!(params.text("c", "mode").unwrap(), Some("left"));
        assert_eq!(params.bool("c", "absent").unwrap(), None);
        assert!(matches!(params.int("c", "mode"), Err(ModelError::InvalidParameter { .. })));
        assert!(matches!(
            params.require_double("c", "absent"),
            Err(ModelError::MissingParameter { .. })
        ));
    }

    #[test]
    fn draw_samples_distributions() {
        let params = Parameters::new()
            .with("fixed", ParameterValue::Double(2.0))
            .with("spread", ParameterValue::Distribution(Distribution::Uniform { min: 1.0, max: 2.0 }));
        let mut rng = StochasticsService::new(8);

        assert_eq!(params.draw("fixed", &mut rng).unwrap(), Some(2.0));
        let v = params.draw("spread", &mut rng).unwrap().unwrap();
        assert!((1.0..=2.0).contains(&v));
        assert_eq!(params.draw("absent", &mut rng).unwrap(), None);
    }
}
