//! Narration channel.
//!
//! Battles record [`CombatEvent`]s into a [`Journal`]. A disabled journal
//! never builds an event, so silent batch runs pay nothing for narration and
//! produce exactly the same outcome as narrated ones.

use std::fmt;

use tracing::info;

use crate::effect::{EffectDuration, ParamValue};
use crate::engine::Winner;

/// Something that happened during a battle, in human-readable terms.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    BattleStarted {
        side_a: Vec<String>,
        side_b: Vec<String>,
    },
    RoundStarted {
        round: u32,
    },
    TurnStarted {
        unit: String,
        current_hp: i64,
        max_hp: i64,
    },
    Stunned {
        unit: String,
    },
    SkillUsed {
        unit: String,
        skill: String,
        targets: Vec<String>,
    },
    BasicAttack {
        unit: String,
        target: String,
    },
    Damaged {
        unit: String,
        amount: i64,
        is_crit: bool,
        remaining_hp: i64,
    },
    Healed {
        unit: String,
        amount: i64,
        current_hp: i64,
    },
    EffectApplied {
        unit: String,
        effect: String,
        duration: EffectDuration,
        potency: f64,
    },
    EffectRemoved {
        unit: String,
        effect: String,
    },
    EffectsCleared {
        unit: String,
        count: usize,
    },
    FlagSet {
        unit: String,
        flag: String,
        value: ParamValue,
    },
    Defeated {
        unit: String,
    },
    BattleEnded {
        winner: Winner,
        rounds: u32,
    },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BattleStarted { side_a, side_b } => {
                write!(f, "battle: [{}] vs [{}]", side_a.join(", "), side_b.join(", "))
            }
            Self::RoundStarted { round } => write!(f, "--- round {round} ---"),
            Self::TurnStarted {
                unit,
                current_hp,
                max_hp,
            } => write!(f, "{unit}'s turn ({current_hp}/{max_hp} HP)"),
            Self::Stunned { unit } => write!(f, "{unit} is stunned and loses the turn"),
            Self::SkillUsed {
                unit,
                skill,
                targets,
            } => {
                if targets.is_empty() {
                    write!(f, "{unit} uses {skill}")
                } else {
                    write!(f, "{unit} uses {skill} on {}", targets.join(", "))
                }
            }
            Self::BasicAttack { unit, target } => write!(f, "{unit} attacks {target}"),
            Self::Damaged {
                unit,
                amount,
                is_crit,
                remaining_hp,
            } => {
                let crit = if *is_crit { " (critical)" } else { "" };
                write!(f, "{unit} takes {amount} damage{crit}, {remaining_hp} HP left")
            }
            Self::Healed {
                unit,
                amount,
                current_hp,
            } => write!(f, "{unit} recovers {amount} HP ({current_hp})"),
            Self::EffectApplied {
                unit,
                effect,
                duration,
                potency,
            } => write!(f, "{unit} gains {effect} for {duration} (potency {potency})"),
            Self::EffectRemoved { unit, effect } => write!(f, "{effect} fades from {unit}"),
            Self::EffectsCleared { unit, count } => {
                write!(f, "{unit} is cleansed of {count} effect(s)")
            }
            Self::FlagSet { unit, flag, value } => write!(f, "{unit}: {flag} = {value}"),
            Self::Defeated { unit } => write!(f, "{unit} is defeated"),
            Self::BattleEnded { winner, rounds } => {
                write!(f, "battle over after {rounds} round(s): {winner}")
            }
        }
    }
}

/// Ordered record of narration events.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    enabled: bool,
    events: Vec<CombatEvent>,
    flushed: usize,
}

impl Journal {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, event: CombatEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<CombatEvent> {
        self.events
    }

    /// Emits every event recorded since the previous flush through tracing.
    pub fn flush(&mut self) {
        for event in &self.events[self.flushed..] {
            info!(target: "combat::narration", "{event}");
        }
        self.flushed = self.events.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_journal_records_nothing() {
        let mut journal = Journal::disabled();
        journal.record(CombatEvent::RoundStarted { round: 1 });

        assert!(journal.events().is_empty());
    }

    #[test]
    fn flush_only_advances_the_cursor() {
        let mut journal = Journal::enabled();
        journal.record(CombatEvent::RoundStarted { round: 1 });
        journal.flush();
        journal.record(CombatEvent::RoundStarted { round: 2 });
        journal.flush();

        assert_eq!(journal.events().len(), 2);
    }

    #[test]
    fn events_render_for_humans() {
        let event = CombatEvent::Damaged {
            unit: "Jaina".into(),
            amount: 42,
            is_crit: true,
            remaining_hp: 58,
        };
        assert_eq!(event.to_string(), "Jaina takes 42 damage (critical), 58 HP left");

        let event = CombatEvent::SkillUsed {
            unit: "Thrall".into(),
            skill: "chain_lightning".into(),
            targets: vec!["Arthas".into(), "Illidan".into()],
        };
        assert_eq!(event.to_string(), "Thrall uses chain_lightning on Arthas, Illidan");
    }
}
