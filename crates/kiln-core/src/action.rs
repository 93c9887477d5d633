//! Scheduled actions: values that emit named action events over time.

use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

use crate::error::ActionError;
use crate::event::Event;

/// Events produced by one action update.
pub type Events = SmallVec<[Event; 2]>;

/// An immutable, time-driven producer of action events.
///
/// The scheduler advances the current action each tick and delivers the
/// events the advanced value carries. `Immediate` fires on its first
/// update, `Delayed` on the first update at or after its time; either then
/// sits as `Pending` for exactly one tick before becoming `Complete`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Action {
    /// Fires on the next update.
    Immediate {
        /// Name of the emitted action event.
        name: Arc<str>,
    },
    /// Fires on the first update at or after `time`.
    Delayed {
        /// Name of the emitted action event.
        name: Arc<str>,
        /// Earliest firing instant, in milliseconds.
        time: u64,
    },
    /// Fired; carries the events to deliver this tick.
    Pending {
        /// Events to deliver.
        events: Events,
    },
    /// Several actions advancing together.
    Composite {
        /// Children still pending.
        actions: Arc<[Action]>,
        /// Union of the children's events from the last update.
        events: Events,
    },
    /// Nothing left to do.
    #[default]
    Complete,
}

impl Action {
    /// Fire `name` on the next tick.
    pub fn immediate(name: &str) -> Result<Self, ActionError> {
        Ok(Self::Immediate {
            name: non_empty(name)?,
        })
    }

    /// Fire `name` on the first tick at or after `time`.
    pub fn delayed(name: &str, time: u64) -> Result<Self, ActionError> {
        Ok(Self::Delayed {
            name: non_empty(name)?,
            time,
        })
    }

    /// Advance `actions` together.
    pub fn composite(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::Composite {
            actions: actions.into_iter().collect(),
            events: Events::new(),
        }
    }

    /// Events to deliver for this state.
    pub fn events(&self) -> &[Event] {
        match self {
            Self::Pending { events } | Self::Composite { events, .. } => events,
            _ => &[],
        }
    }

    /// Whether further updates may still produce events.
    pub fn is_pending(&self) -> bool {
        !matches!(self, Self::Complete)
    }

    /// Advance to `time`.
    pub fn update(&self, time: u64) -> Self {
        match self {
            Self::Immediate { name } => Self::Pending {
                events: smallvec![Event::fired(time, Arc::clone(name))],
            },
            Self::Delayed { name, time: due } => {
                if time < *due {
                    self.clone()
                } else {
                    Self::Pending {
                        events: smallvec![Event::fired(time, Arc::clone(name))],
                    }
                }
            }
            Self::Pending { .. } | Self::Complete => Self::Complete,
            Self::Composite { actions, .. } => {
                let mut events = Events::new();
                let mut live = Vec::with_capacity(actions.len());
                for action in actions.iter() {
                    let next = action.update(time);
                    events.extend(next.events().iter().cloned());
                    if next.is_pending() {
                        live.push(next);
                    }
                }
                if live.is_empty() {
                    Self::Complete
                } else {
                    Self::Composite {
                        actions: live.into(),
                        events,
                    }
                }
            }
        }
    }

    /// Combine the scheduler's `current` action with a freshly scheduled
    /// `next` one.
    ///
    /// Returns `current` unchanged when both are equal or `next` has
    /// nothing to do, `next` when `current` has completed, and otherwise a
    /// composite advancing both.
    pub fn merge(current: Action, next: Action) -> Action {
        if current == next || !next.is_pending() {
            return current;
        }
        if !current.is_pending() {
            return next;
        }
        Self::composite([current, next])
    }
}

fn non_empty(name: &str) -> Result<Arc<str>, ActionError> {
    if name.is_empty() {
        return Err(ActionError::EmptyName);
    }
    Ok(Arc::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use proptest::prelude::*;

    fn names(action: &Action) -> Vec<String> {
        action
            .events()
            .iter()
            .map(|e| match e.kind() {
                EventKind::Action { name } => name.to_string(),
                other => panic!("unexpected event {other:?}"),
            })
            .collect()
    }

    #[test]
    fn immediate_fires_once() {
        let a = Action::immediate("jump").unwrap();
        assert!(a.is_pending());
        assert!(a.events().is_empty());

        let fired = a.update(40);
        assert_eq!(names(&fired), vec!["jump"]);
        assert_eq!(fired.events()[0].time(), 40);
        assert!(fired.is_pending());

        let done = fired.update(56);
        assert_eq!(done, Action::Complete);
        assert!(done.events().is_empty());
        assert_eq!(done.update(72), Action::Complete);
    }

    #[test]
    fn delayed_waits_for_its_time() {
        let a = Action::delayed("spawn", 100).unwrap();
        assert_eq!(a.update(99), a);
        let fired = a.update(116);
        assert_eq!(names(&fired), vec!["spawn"]);
        assert_eq!(fired.events()[0].time(), 116);
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(Action::immediate(""), Err(ActionError::EmptyName));
        assert_eq!(Action::delayed("", 5), Err(ActionError::EmptyName));
    }

    #[test]
    fn composite_unions_events_and_drops_finished_children() {
        let c = Action::composite([
            Action::immediate("a").unwrap(),
            Action::delayed("b", 50).unwrap(),
        ]);
        let first = c.update(10);
        assert_eq!(names(&first), vec!["a"]);

        let second = first.update(60);
        assert_eq!(names(&second), vec!["b"]);
        let Action::Composite { actions, .. } = &second else {
            panic!("expected composite, got {second:?}");
        };
        assert_eq!(actions.len(), 1);

        assert_eq!(second.update(70), Action::Complete);
    }

    #[test]
    fn merge_rules() {
        let a = Action::immediate("a").unwrap();
        let b = Action::delayed("b", 5).unwrap();

        assert_eq!(Action::merge(a.clone(), a.clone()), a);
        assert_eq!(Action::merge(Action::Complete, b.clone()), b);
        assert_eq!(Action::merge(a.clone(), Action::Complete), a);
        let merged = Action::merge(a.clone(), b.clone());
        assert_eq!(merged, Action::composite([a, b]));
        assert!(merged.events().is_empty());
    }

    #[test]
    fn empty_composite_completes_on_update() {
        assert_eq!(Action::composite([]).update(0), Action::Complete);
    }

    proptest! {
        #[test]
        fn every_child_fires_exactly_once(delays in proptest::collection::vec(0u64..200, 1..8)) {
            let children = delays
                .iter()
                .enumerate()
                .map(|(i, &d)| Action::delayed(&format!("a{i}"), d).unwrap());
            let mut action = Action::composite(children);
            let mut fired = Vec::new();
            let mut time = 0;
            while action.is_pending() {
                action = action.update(time);
                fired.extend(names(&action));
                time += 16;
                prop_assert!(time < 1_000, "action never completed");
            }
            fired.sort();
            let mut expected: Vec<String> = (0..delays.len()).map(|i| format!("a{i}")).collect();
            expected.sort();
            prop_assert_eq!(fired, expected);
        }
    }
}
