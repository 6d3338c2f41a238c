//! A component that does nothing.

use crate::{ComponentModel, StepContext, StepResult};

/// A [`ComponentModel`] whose step reads nothing and writes nothing.
///
/// Useful as a placeholder for wiring tests or for components whose only
/// role is to carry a state other conditions refer to.
pub struct NoopComponent;

impl ComponentModel for NoopComponent {
    fn step(&mut self, _ctx: &mut StepContext<'_>) -> StepResult<()> {
        Ok(())
    }
}
