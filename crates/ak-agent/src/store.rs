//! Per-agent arenas for components and channels.
//!
//! Both stores are append-only during agent construction and fixed in size
//! afterwards.  `ComponentId(i)` / `ChannelId(i)` is simply the position in
//! the backing `Vec`; name lookups go through a side index.

use std::collections::BTreeMap;

use ak_component::{ComponentModel, Port, SignalKind, SignalValue, StepError};
use ak_control::{ControlState, StateMapping};
use ak_core::{ChannelId, ComponentId, Tick};
use ak_schedule::TaskTiming;

// ── ComponentSlot ─────────────────────────────────────────────────────────────

/// Everything the scheduler needs to run one component.
pub struct ComponentSlot {
    /// Name, type, state, and condition; the only part the controller touches.
    pub control:      ControlState,
    pub priority:     i32,
    pub timing:       TaskTiming,
    pub inputs:       Vec<ChannelId>,
    pub outputs:      Vec<ChannelId>,
    pub input_ports:  Vec<Port>,
    pub output_ports: Vec<Port>,
    pub model:        Box<dyn ComponentModel>,
}

impl ComponentSlot {
    #[inline]
    pub fn name(&self) -> &str {
        &self.control.name
    }
}

// ── ComponentStore ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ComponentStore {
    slots:   Vec<ComponentSlot>,
    by_name: BTreeMap<String, ComponentId>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `slot` and return its id.  Names are assumed unique.
    pub fn push(&mut self, slot: ComponentSlot) -> ComponentId {
        let id = ComponentId::from_index(self.slots.len());
        self.by_name.insert(slot.control.name.clone(), id);
        self.slots.push(slot);
        id
    }

    #[inline]
    pub fn get(&self, id: ComponentId) -> Option<&ComponentSlot> {
        self.slots.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut ComponentSlot> {
        self.slots.get_mut(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<ComponentId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&ComponentSlot> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &ComponentSlot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (ComponentId::from_index(i), slot))
    }

    /// Mutable access to each component's control state, for the controller.
    pub fn controls_mut(&mut self) -> impl Iterator<Item = &mut ControlState> + '_ {
        self.slots.iter_mut().map(|slot| &mut slot.control)
    }

    /// Capture the current states of all components.
    pub fn snapshot(&self) -> StateMapping {
        StateMapping::capture(
            self.slots
                .iter()
                .map(|s| (s.control.name.as_str(), s.control.component_type, s.control.state)),
        )
    }
}

// ── SignalChannel ─────────────────────────────────────────────────────────────

/// A single-writer, multi-reader conduit holding the last written value.
///
/// The value is never cleared: a producer that skips a cycle leaves its
/// previous value in place for consumers.
#[derive(Clone, Debug)]
pub struct SignalChannel {
    pub id:        String,
    pub kind:      SignalKind,
    pub producer:  ComponentId,
    pub consumers: Vec<ComponentId>,
    value:         Option<SignalValue>,
    written_at:    Option<Tick>,
}

impl SignalChannel {
    pub fn new(id: impl Into<String>, kind: SignalKind, producer: ComponentId, consumers: Vec<ComponentId>) -> Self {
        Self { id: id.into(), kind, producer, consumers, value: None, written_at: None }
    }

    /// The last written value; `None` until the producer first writes.
    #[inline]
    pub fn value(&self) -> Option<&SignalValue> {
        self.value.as_ref()
    }

    /// The tick of the last write.
    #[inline]
    pub fn written_at(&self) -> Option<Tick> {
        self.written_at
    }

    pub fn port(&self) -> Port {
        Port::new(self.id.clone(), self.kind)
    }

    /// Replace the value.  A value of the wrong kind is rejected and the
    /// channel left unchanged.
    pub fn write(&mut self, value: SignalValue, tick: Tick) -> Result<(), StepError> {
        if value.kind() != self.kind {
            return Err(StepError::KindMismatch {
                channel:  self.id.clone(),
                expected: self.kind,
                found:    value.kind(),
            });
        }
        self.value = Some(value);
        self.written_at = Some(tick);
        Ok(())
    }
}

// ── ChannelStore ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct ChannelStore {
    channels: Vec<SignalChannel>,
    by_id:    BTreeMap<String, ChannelId>,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, channel: SignalChannel) -> ChannelId {
        let id = ChannelId::from_index(self.channels.len());
        self.by_id.insert(channel.id.clone(), id);
        self.channels.push(channel);
        id
    }

    #[inline]
    pub fn get(&self, id: ChannelId) -> Option<&SignalChannel> {
        self.channels.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: ChannelId) -> Option<&mut SignalChannel> {
        self.channels.get_mut(id.index())
    }

    pub fn id_of(&self, id: &str) -> Option<ChannelId> {
        self.by_id.get(id).copied()
    }

    /// Current value of the channel with string id `id`.
    pub fn value_of(&self, id: &str) -> Option<&SignalValue> {
        self.id_of(id).and_then(|c| self.get(c)).and_then(SignalChannel::value)
    }

    /// Copy the current values of `ids`, in order.
    pub fn read(&self, ids: &[ChannelId]) -> Vec<Option<SignalValue>> {
        ids.iter()
            .map(|&id| self.get(id).and_then(SignalChannel::value).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChannelId, &SignalChannel)> + '_ {
        self.channels
            .iter()
            .enumerate()
            .map(|(i, ch)| (ChannelId::from_index(i), ch))
    }
}
