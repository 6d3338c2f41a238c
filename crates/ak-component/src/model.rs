//! The `ComponentModel` trait — the extension point for component behavior.

use crate::{Parameters, Port, StepContext, StepResult};

/// Pluggable component behavior.
///
/// The kernel treats a component as an opaque unit: it copies the component's
/// inputs into a [`StepContext`], calls `step`, and commits staged outputs.
/// A component may keep internal state between steps (an arbitration flag,
/// a filter history); that state lives and dies with the owning agent.
///
/// # Errors and panics
///
/// Returning `Err` or panicking is a component failure.  The scheduler
/// catches both, marks the agent failed, and never calls `step` on that
/// agent again.  Nothing staged by the failing step is committed.
///
/// # Thread safety
///
/// Agents may be stepped on worker threads, so models must be `Send`.  A model
/// is only ever stepped from the thread currently running its agent.
///
/// # Example
///
/// ```rust,ignore
/// struct Doubler;
///
/// impl ComponentModel for Doubler {
///     fn step(&mut self, ctx: &mut StepContext<'_>) -> StepResult<()> {
///         let x = ctx.read_double(0)?.unwrap_or(0.0);
///         ctx.write(0, 2.0 * x)
///     }
/// }
/// ```
pub trait ComponentModel: Send + 'static {
    /// Execute one cycle.
    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepResult<()>;
}

impl ComponentModel for Box<dyn ComponentModel> {
    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepResult<()> {
        (**self).step(ctx)
    }
}

/// Adapts a closure into a [`ComponentModel`].
pub struct FnComponent<F>(pub F);

impl<F> FnComponent<F>
where
    F: FnMut(&mut StepContext<'_>) -> StepResult<()> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> ComponentModel for FnComponent<F>
where
    F: FnMut(&mut StepContext<'_>) -> StepResult<()> + Send + 'static,
{
    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepResult<()> {
        (self.0)(ctx)
    }
}

/// What a model factory receives when a component is built.
#[derive(Clone, Copy, Debug)]
pub struct ModelInit<'a> {
    pub component:  &'a str,
    /// Scheduling priority; higher runs earlier among ready components.
    pub priority:   i32,
    pub inputs:     &'a [Port],
    pub outputs:    &'a [Port],
    pub parameters: &'a Parameters,
}
