//! Structural checks on an [`AgentConfig`], run before anything is built.
//!
//! Component and channel declarations describe the same wiring twice: a
//! component lists the channels it reads and writes, a channel names its
//! producer and consumers.  Both views must agree exactly.
//!
//! Names referenced only from conditions are not checked here.  A condition
//! may watch a component that does not exist; the lookup reads `Undefined`.

use std::collections::{BTreeMap, BTreeSet};

use ak_schedule::{ConfigurationError, ScheduleResult};

use crate::AgentConfig;

/// Validate `config`; the first defect found is returned.
pub fn check(config: &AgentConfig) -> ScheduleResult<()> {
    let mut components = BTreeSet::new();
    for c in &config.components {
        if !components.insert(c.name.as_str()) {
            return Err(ConfigurationError::DuplicateComponent(c.name.clone()));
        }
    }

    let mut channels = BTreeMap::new();
    for ch in &config.channels {
        if channels.insert(ch.id.as_str(), ch).is_some() {
            return Err(ConfigurationError::DuplicateChannel(ch.id.clone()));
        }
        for name in std::iter::once(&ch.producer).chain(&ch.consumers) {
            if !components.contains(name.as_str()) {
                return Err(ConfigurationError::UnknownComponent {
                    name:          name.clone(),
                    referenced_by: ch.id.clone(),
                });
            }
        }
    }

    // Who claims to write / read each channel, from the component side.
    let mut writers: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut readers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for c in &config.components {
        for id in c.outputs.iter().chain(&c.inputs) {
            if !channels.contains_key(id.as_str()) {
                return Err(ConfigurationError::UnknownChannel {
                    channel:   id.clone(),
                    component: c.name.clone(),
                });
            }
        }
        for id in &c.outputs {
            let list = writers.entry(id.as_str()).or_default();
            if !list.contains(&c.name.as_str()) {
                list.push(c.name.as_str());
            }
        }
        for id in &c.inputs {
            readers.entry(id.as_str()).or_default().insert(c.name.as_str());
        }
    }

    for (id, ch) in &channels {
        let claimed = writers.get(id).map(Vec::as_slice).unwrap_or_default();
        match claimed {
            [] => {
                return Err(ConfigurationError::NoWriter(ch.id.clone()));
            }
            [single] if *single == ch.producer => {}
            [single] => {
                return Err(inconsistent(ch.id.as_str(), single, format!(
                    "component writes it but the channel names {:?} as producer",
                    ch.producer
                )));
            }
            many => {
                return Err(ConfigurationError::MultipleWriters {
                    channel: ch.id.clone(),
                    writers: many.iter().map(|s| (*s).to_owned()).collect(),
                });
            }
        }

        let declared: BTreeSet<&str> = ch.consumers.iter().map(String::as_str).collect();
        let actual = readers.get(id).cloned().unwrap_or_default();
        if let Some(missing) = declared.difference(&actual).next() {
            return Err(inconsistent(
                &ch.id,
                missing,
                "listed as consumer but does not declare the channel as input".to_owned(),
            ));
        }
        if let Some(extra) = actual.difference(&declared).next() {
            return Err(inconsistent(
                &ch.id,
                extra,
                "reads the channel but is not listed as consumer".to_owned(),
            ));
        }
    }

    Ok(())
}

fn inconsistent(channel: &str, component: &str, reason: String) -> ConfigurationError {
    ConfigurationError::InconsistentWiring {
        channel:   channel.to_owned(),
        component: component.to_owned(),
        reason,
    }
}
