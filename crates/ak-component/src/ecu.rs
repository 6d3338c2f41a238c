//! The ECU component: arbitration over four Bool channels.

use tracing::warn;

use crate::{
    ArbitrationPattern, ComponentModel, ModelError, ModelInit, ModelResult, Port, SignalKind,
    StepContext, StepResult,
};

/// Input ports, highest priority first.
pub const COLLISION: usize = 0;
pub const PRIORITY_1: usize = 1;
pub const PRIORITY_2: usize = 2;
pub const PRIORITY_3: usize = 3;

/// Output port carrying the arbitration outcome.
pub const INDEX: usize = 0;

/// Group under which each decision is published.
pub const OBSERVATION_GROUP: &str = "ecu";

/// Combines a collision flag and three prioritised triggers into one index.
///
/// Inputs `collision`, `prio1`, `prio2`, `prio3` are Bool channels; a channel
/// nobody has written yet reads as `false`.  The output is an Int channel
/// carrying the [`ArbitrationPattern::ecu`] outcome.
pub struct EcuComponent {
    pattern: ArbitrationPattern,
}

impl EcuComponent {
    pub const INPUTS: usize = 4;
    pub const OUTPUTS: usize = 1;

    pub fn new(init: &ModelInit<'_>) -> ModelResult<Self> {
        check_ports(init.component, "input", init.inputs, Self::INPUTS, SignalKind::Bool)?;
        check_ports(init.component, "output", init.outputs, Self::OUTPUTS, SignalKind::Int)?;
        if init.priority == 0 {
            warn!(component = init.component, "ECU configured with priority 0");
        }
        Ok(Self { pattern: ArbitrationPattern::ecu() })
    }

    pub fn pattern(&self) -> &ArbitrationPattern {
        &self.pattern
    }
}

impl ComponentModel for EcuComponent {
    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepResult<()> {
        let mut triggers = [false; Self::INPUTS];
        for (port, trigger) in triggers.iter_mut().enumerate() {
            *trigger = ctx.read_bool(port)?.unwrap_or(false);
        }

        let index = self.pattern.decide(&triggers)?;
        ctx.write(INDEX, i64::from(index))?;
        ctx.publish(OBSERVATION_GROUP, "index", i64::from(index));
        Ok(())
    }
}

fn check_ports(
    component: &str,
    direction: &'static str,
    ports:     &[Port],
    expected:  usize,
    kind:      SignalKind,
) -> ModelResult<()> {
    if ports.len() != expected {
        return Err(ModelError::PortCount {
            component: component.to_owned(),
            direction,
            expected,
            found: ports.len(),
        });
    }
    if let Some((port, bad)) = ports.iter().enumerate().find(|(_, p)| p.kind != kind) {
        return Err(ModelError::PortKind {
            component: component.to_owned(),
            direction,
            port,
            channel:  bad.channel.clone(),
            expected: kind,
            found:    bad.kind,
        });
    }
    Ok(())
}
