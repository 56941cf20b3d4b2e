//! Synchronous publish/subscribe bus.
//!
//! Gameplay reactions (scoring, damage, stage flow, game end) are handlers
//! subscribed to a [`Topic`]. [`EventBus::emit`] calls them immediately, in
//! registration order, before returning.
//!
//! Handlers receive the bus itself and a mutable context (the game state),
//! so they can emit follow-up messages, subscribe new handlers or clear the
//! bus for a restart. The bus keeps a bounded journal of what was emitted.
//!
//! # Example
//!
//! ```
//! use starfall_core::event::{EventBus, Message, Topic};
//!
//! let mut bus: EventBus<Vec<&'static str>> = EventBus::new();
//! bus.on(Topic::FireRequested, |_, log, _| log.push("first"));
//! bus.on(Topic::FireRequested, |_, log, _| log.push("second"));
//!
//! let mut log = Vec::new();
//! bus.emit(&mut log, Message::FireRequested);
//! assert_eq!(log, vec!["first", "second"]);
//! ```

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::EntityId;

/// Subscription key of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Player pressed fire.
    FireRequested,
    /// Player asked for a fresh game.
    RestartRequested,
    /// Player asked for the meteor.
    MeteorRequested,
    /// A hero laser overlaps a hostile.
    CollisionEnemyLaser,
    /// A hostile overlaps the hero.
    CollisionEnemyHero,
    /// An enemy laser overlaps the hero.
    CollisionHeroEnemyLaser,
    /// The hero overlaps a shield pickup.
    CollisionHeroShield,
    /// The last stage was cleared.
    GameEndWin,
    /// The hero lost the last life.
    GameEndLoss,
}

/// A message published on the bus, with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Player pressed fire.
    FireRequested,
    /// Player asked for a fresh game.
    RestartRequested,
    /// Player asked for the meteor.
    MeteorRequested,
    /// A hero laser overlaps a hostile.
    CollisionEnemyLaser {
        /// The hero laser
        laser: EntityId,
        /// The enemy or boss hit
        enemy: EntityId,
    },
    /// A hostile overlaps the hero.
    CollisionEnemyHero {
        /// The enemy or boss that rammed the hero
        enemy: EntityId,
    },
    /// An enemy laser overlaps the hero.
    CollisionHeroEnemyLaser {
        /// The enemy laser
        laser: EntityId,
    },
    /// The hero overlaps a shield pickup.
    CollisionHeroShield {
        /// The pickup
        shield: EntityId,
    },
    /// The last stage was cleared.
    GameEndWin,
    /// The hero lost the last life.
    GameEndLoss,
}

impl Message {
    /// Topic this message is delivered on.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::FireRequested => Topic::FireRequested,
            Self::RestartRequested => Topic::RestartRequested,
            Self::MeteorRequested => Topic::MeteorRequested,
            Self::CollisionEnemyLaser { .. } => Topic::CollisionEnemyLaser,
            Self::CollisionEnemyHero { .. } => Topic::CollisionEnemyHero,
            Self::CollisionHeroEnemyLaser { .. } => Topic::CollisionHeroEnemyLaser,
            Self::CollisionHeroShield { .. } => Topic::CollisionHeroShield,
            Self::GameEndWin => Topic::GameEndWin,
            Self::GameEndLoss => Topic::GameEndLoss,
        }
    }
}

/// Shared subscriber callback.
///
/// Handlers are `Fn` so a dispatch can hold a snapshot of them while one of
/// them re-emits on its own topic.
pub type Handler<C> = Rc<dyn Fn(&mut EventBus<C>, &mut C, &Message)>;

/// Most recent messages kept by the journal.
pub const JOURNAL_CAPACITY: usize = 4096;

/// Topic-keyed list of handlers over a context `C`.
///
/// # Reentrancy
///
/// [`EventBus::emit`] dispatches over a snapshot of the topic's handlers
/// taken when it starts. Messages emitted from inside a handler are
/// delivered immediately and depth first, including on the topic being
/// dispatched. Handlers subscribed during a dispatch, or removed by
/// [`EventBus::clear`], only take effect from the next emit on.
pub struct EventBus<C> {
    handlers: HashMap<Topic, Vec<Handler<C>>>,
    /// Last [`JOURNAL_CAPACITY`] emitted messages, oldest first.
    journal: VecDeque<Message>,
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("[{} handlers]", self.handler_count()))
            .field("journal", &self.journal.len())
            .finish()
    }
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventBus<C> {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            journal: VecDeque::new(),
        }
    }

    /// Subscribes `handler` to `topic`. Handlers run in subscription order.
    pub fn on<F>(&mut self, topic: Topic, handler: F)
    where
        F: Fn(&mut EventBus<C>, &mut C, &Message) + 'static,
    {
        self.handlers.entry(topic).or_default().push(Rc::new(handler));
    }

    /// Delivers `message` to every handler of its topic, synchronously.
    ///
    /// Emitting on a topic with no subscribers is a no-op apart from the
    /// journal entry.
    pub fn emit(&mut self, ctx: &mut C, message: Message) {
        let topic = message.topic();
        trace!(?message, "emit");
        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(message.clone());

        let Some(handlers) = self.handlers.get(&topic).cloned() else {
            return;
        };
        for handler in &handlers {
            handler(self, ctx, &message);
        }
    }

    /// Removes every subscription. The journal is kept.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of handlers subscribed to `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.handlers.get(&topic).map_or(0, Vec::len)
    }

    /// Total number of subscriptions.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Drains the journal of emitted messages.
    pub fn take_messages(&mut self) -> Vec<Message> {
        self.journal.drain(..).collect()
    }

    /// Messages emitted since the journal was last drained, up to the last
    /// [`JOURNAL_CAPACITY`].
    #[must_use]
    pub fn journal(&self) -> &VecDeque<Message> {
        &self.journal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<String>;

    #[test]
    fn topic_matches_variant() {
        let msg = Message::CollisionEnemyLaser {
            laser: EntityId::new(1),
            enemy: EntityId::new(2),
        };
        assert_eq!(msg.topic(), Topic::CollisionEnemyLaser);
        assert_eq!(Message::GameEndLoss.topic(), Topic::GameEndLoss);
    }

    #[test]
    fn emit_without_subscribers_is_noop() {
        let mut bus: EventBus<Log> = EventBus::new();
        let mut log = Log::new();
        bus.emit(&mut log, Message::GameEndWin);
        assert!(log.is_empty());
        assert_eq!(bus.take_messages(), vec![Message::GameEndWin]);
    }

    #[test]
    fn handlers_only_see_their_topic() {
        let mut bus: EventBus<Log> = EventBus::new();
        bus.on(Topic::GameEndWin, |_, log, _| log.push("win".into()));
        bus.on(Topic::GameEndLoss, |_, log, _| log.push("loss".into()));

        let mut log = Log::new();
        bus.emit(&mut log, Message::GameEndLoss);
        assert_eq!(log, vec!["loss"]);
    }

    #[test]
    fn handler_receives_payload() {
        let mut bus: EventBus<Vec<EntityId>> = EventBus::new();
        bus.on(Topic::CollisionHeroShield, |_, seen, msg| {
            if let Message::CollisionHeroShield { shield } = msg {
                seen.push(*shield);
            }
        });

        let mut seen = Vec::new();
        bus.emit(
            &mut seen,
            Message::CollisionHeroShield {
                shield: EntityId::new(9),
            },
        );
        assert_eq!(seen, vec![EntityId::new(9)]);
    }

    mod reentrancy_tests {
        use super::*;

        #[test]
        fn nested_emit_on_other_topic_runs_inline() {
            let mut bus: EventBus<Log> = EventBus::new();
            bus.on(Topic::FireRequested, |bus, log, _| {
                log.push("fire:before".into());
                bus.emit(log, Message::GameEndWin);
                log.push("fire:after".into());
            });
            bus.on(Topic::GameEndWin, |_, log, _| log.push("win".into()));

            let mut log = Log::new();
            bus.emit(&mut log, Message::FireRequested);
            assert_eq!(log, vec!["fire:before", "win", "fire:after"]);
        }

        #[test]
        fn same_topic_emit_from_handler_is_delivered() {
            let mut bus: EventBus<Log> = EventBus::new();
            bus.on(Topic::FireRequested, |bus, log, _| {
                log.push("fire".into());
                if log.len() == 1 {
                    bus.emit(log, Message::FireRequested);
                }
            });
            bus.on(Topic::FireRequested, |_, log, _| log.push("after".into()));

            let mut log = Log::new();
            bus.emit(&mut log, Message::FireRequested);
            assert_eq!(log, vec!["fire", "fire", "after", "after"]);
            assert_eq!(bus.journal().len(), 2);
            assert_eq!(bus.subscriber_count(Topic::FireRequested), 2);
        }

        #[test]
        fn handlers_survive_dispatch() {
            let mut bus: EventBus<Log> = EventBus::new();
            bus.on(Topic::FireRequested, |_, log, _| log.push("fire".into()));

            let mut log = Log::new();
            bus.emit(&mut log, Message::FireRequested);
            bus.emit(&mut log, Message::FireRequested);
            assert_eq!(log.len(), 2);
            assert_eq!(bus.subscriber_count(Topic::FireRequested), 1);
        }

        #[test]
        fn subscribe_during_dispatch_applies_next_emit() {
            let mut bus: EventBus<Log> = EventBus::new();
            bus.on(Topic::FireRequested, |bus, log, _| {
                log.push("outer".into());
                if log.len() == 1 {
                    bus.on(Topic::FireRequested, |_, log, _| log.push("late".into()));
                }
            });

            let mut log = Log::new();
            bus.emit(&mut log, Message::FireRequested);
            assert_eq!(log, vec!["outer"]);
            bus.emit(&mut log, Message::FireRequested);
            assert_eq!(log, vec!["outer", "outer", "late"]);
        }

        #[test]
        fn clear_during_dispatch_drops_old_handlers() {
            let mut bus: EventBus<Log> = EventBus::new();
            bus.on(Topic::RestartRequested, |bus, log, _| {
                log.push("restart".into());
                bus.clear();
                bus.on(Topic::RestartRequested, |_, log, _| log.push("fresh".into()));
            });

            let mut log = Log::new();
            bus.emit(&mut log, Message::RestartRequested);
            assert_eq!(log, vec!["restart"]);
            assert_eq!(bus.subscriber_count(Topic::RestartRequested), 1);

            bus.emit(&mut log, Message::RestartRequested);
            assert_eq!(log, vec!["restart", "fresh"]);
        }
    }

    #[test]
    fn clear_removes_subscriptions_but_keeps_journal() {
        let mut bus: EventBus<Log> = EventBus::new();
        bus.on(Topic::GameEndWin, |_, log, _| log.push("win".into()));
        let mut log = Log::new();
        bus.emit(&mut log, Message::GameEndWin);

        bus.clear();
        bus.emit(&mut log, Message::GameEndWin);

        assert_eq!(log, vec!["win"]);
        assert_eq!(bus.handler_count(), 0);
        assert_eq!(bus.take_messages().len(), 2);
        assert!(bus.journal().is_empty());
    }

    #[test]
    fn journal_keeps_only_recent_messages() {
        let mut bus: EventBus<()> = EventBus::new();
        for _ in 0..JOURNAL_CAPACITY + 10 {
            bus.emit(&mut (), Message::FireRequested);
        }
        bus.emit(&mut (), Message::GameEndWin);

        assert_eq!(bus.journal().len(), JOURNAL_CAPACITY);
        assert_eq!(bus.journal().back(), Some(&Message::GameEndWin));
        assert_eq!(bus.take_messages().len(), JOURNAL_CAPACITY);
        assert!(bus.journal().is_empty());
    }
}
