use std::collections::BTreeSet;

use comadrelab_protocol::{DomCommand, NodeId, Target};

use crate::config::RevealConfig;

/// Options for the shared intersection observer.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RevealPlan {
    /// Reduced motion: reveal everything now, observe nothing.
    RevealAll,
    /// Watch every opted-in element with one observer.
    Observe(ObserverOptions),
}

pub fn plan(reduced_motion: bool, config: &RevealConfig) -> RevealPlan {
    if reduced_motion {
        RevealPlan::RevealAll
    } else {
        RevealPlan::Observe(ObserverOptions {
            threshold: config.threshold,
            root_margin: config.root_margin(),
        })
    }
}

/// One record delivered by the intersection observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub node: NodeId,
    pub is_intersecting: bool,
}

/// Reveal-opted elements that have not been revealed yet.
///
/// The set only ever shrinks: an element leaves it on its first
/// intersection (or on [`RevealTracker::reveal_all`]) and never comes back,
/// so each element is revealed exactly once.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    pending: BTreeSet<NodeId>,
    revealed_class: String,
}

impl RevealTracker {
    /// Track `count` elements, numbered in document order.
    pub fn new(count: u32, config: &RevealConfig) -> Self {
        Self {
            pending: (0..count).map(NodeId).collect(),
            revealed_class: config.revealed_class.clone(),
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, node: NodeId) -> bool {
        self.pending.contains(&node)
    }

    /// Reveal every pending element at once.
    pub fn reveal_all(&mut self) -> Vec<DomCommand> {
        let revealed = std::mem::take(&mut self.pending);
        revealed
            .into_iter()
            .map(|node| self.reveal_command(node))
            .collect()
    }

    /// Handle one observer callback.
    ///
    /// Entries are processed in delivery order. Every intersecting entry
    /// for a still-pending element is revealed and unobserved; the rest are
    /// ignored.
    pub fn on_entries(&mut self, entries: &[IntersectionEntry]) -> Vec<DomCommand> {
        let mut commands = Vec::new();
        for entry in entries {
            if !entry.is_intersecting || !self.pending.remove(&entry.node) {
                continue;
            }
            commands.push(self.reveal_command(entry.node));
            commands.push(DomCommand::Unobserve {
                target: Target::Node(entry.node),
            });
        }
        commands
    }

    fn reveal_command(&self, node: NodeId) -> DomCommand {
        DomCommand::AddClass {
            target: Target::Node(node),
            class: self.revealed_class.clone(),
        }
    }
}
