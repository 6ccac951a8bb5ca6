//! Battle scheduler.
//!
//! A [`Battle`] owns the arena, the battle RNG and a [`TurnOrder`]. Each
//! round visits the units in order; a visited unit that is no longer alive
//! is skipped. One turn runs:
//!
//! ```text
//! turn start hooks -> (died? forfeit) -> act -> turn end hooks, ticks, cooldowns
//! ```
//!
//! The battle ends as soon as either side has no living unit, checked after
//! every turn. Both sides falling to the same action is a draw.

mod outcome;
mod turns;

pub use outcome::{BattleOutcome, Side, UnitVitals, Winner};
pub use turns::{DuelOrder, SpeedOrder, TurnOrder, rank_by_speed};

use tracing::{debug, info};

use crate::action::ActionInterpreter;
use crate::config::CombatConfig;
use crate::env::{CombatRng, EffectTemplateProvider};
use crate::error::BattleError;
use crate::event::{CombatEvent, Journal};
use crate::skill::Skill;
use crate::state::{Arena, Unit, UnitId};
use crate::stats::BaseStats;

/// Scheduling mode of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BattleMode {
    /// Order ranked once at battle start.
    Duel,
    /// Order re-ranked over living units every round.
    Skirmish,
}

impl BattleMode {
    /// Duel for one-on-one battles, skirmish otherwise.
    pub fn for_sides(side_a: usize, side_b: usize) -> Self {
        if side_a == 1 && side_b == 1 {
            Self::Duel
        } else {
            Self::Skirmish
        }
    }
}

/// One battle between two sides.
pub struct Battle<'p> {
    arena: Arena,
    side_a: Vec<UnitId>,
    side_b: Vec<UnitId>,
    effects: &'p dyn EffectTemplateProvider,
    rng: CombatRng,
    config: CombatConfig,
    mode: BattleMode,
    rounds: u32,
}

impl<'p> Battle<'p> {
    pub fn new(
        side_a: Vec<Unit>,
        side_b: Vec<Unit>,
        effects: &'p dyn EffectTemplateProvider,
    ) -> Result<Self, BattleError> {
        if side_a.is_empty() {
            return Err(BattleError::EmptySide(Side::A));
        }
        if side_b.is_empty() {
            return Err(BattleError::EmptySide(Side::B));
        }

        let mode = BattleMode::for_sides(side_a.len(), side_b.len());
        let mut arena = Arena::new(ActionInterpreter::new());
        let side_a = side_a.into_iter().map(|unit| arena.spawn(unit)).collect();
        let side_b = side_b.into_iter().map(|unit| arena.spawn(unit)).collect();

        Ok(Self {
            arena,
            side_a,
            side_b,
            effects,
            rng: CombatRng::new(0),
            config: CombatConfig::default(),
            mode,
            rounds: 0,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = CombatRng::new(seed);
        self
    }

    pub fn with_config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_mode(mut self, mode: BattleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables narration. Outcomes are identical either way.
    pub fn narrated(mut self, enabled: bool) -> Self {
        let journal = if enabled {
            Journal::enabled()
        } else {
            Journal::disabled()
        };
        *self.arena.journal_mut() = journal;
        self
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn mode(&self) -> BattleMode {
        self.mode
    }

    pub fn side(&self, side: Side) -> &[UnitId] {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn side_of(&self, id: UnitId) -> Side {
        if self.side_a.contains(&id) {
            Side::A
        } else {
            Side::B
        }
    }

    pub fn events(&self) -> &[CombatEvent] {
        self.arena.journal().events()
    }

    fn alive(&self, side: Side) -> impl Iterator<Item = UnitId> + '_ {
        self.side(side)
            .iter()
            .copied()
            .filter(|&id| self.arena.is_alive(id))
    }

    fn standing(&self, side: Side) -> bool {
        self.alive(side).next().is_some()
    }

    fn both_standing(&self) -> bool {
        self.standing(Side::A) && self.standing(Side::B)
    }

    /// Runs the battle to completion.
    pub fn run(&mut self) -> BattleOutcome {
        self.arena.narrate(|arena| CombatEvent::BattleStarted {
            side_a: self.side_a.iter().map(|&id| arena.unit_name(id)).collect(),
            side_b: self.side_b.iter().map(|&id| arena.unit_name(id)).collect(),
        });

        let mut order: Box<dyn TurnOrder> = match self.mode {
            BattleMode::Duel => Box::new(DuelOrder::new(
                &self.arena,
                self.side_a.iter().chain(&self.side_b).copied(),
            )),
            BattleMode::Skirmish => {
                Box::new(SpeedOrder::new(self.side_a.iter().chain(&self.side_b).copied()))
            }
        };

        let mut truncated = false;
        while self.both_standing() {
            if self.config.round_limit.is_some_and(|limit| self.rounds >= limit) {
                truncated = true;
                break;
            }
            self.rounds += 1;
            let round = self.rounds;
            self.arena.narrate(|_| CombatEvent::RoundStarted { round });

            for id in order.round_order(&self.arena) {
                if !self.arena.is_alive(id) {
                    continue;
                }
                self.take_turn(id);
                self.arena.journal_mut().flush();
                if !self.both_standing() {
                    break;
                }
            }
        }

        let outcome = self.outcome(truncated);
        let winner = outcome.winner;
        let rounds = outcome.rounds;
        self.arena
            .narrate(|_| CombatEvent::BattleEnded { winner, rounds });
        self.arena.journal_mut().flush();

        debug!(
            target: "combat::engine",
            mode = %self.mode,
            rounds,
            truncated,
            "battle finished: {winner}"
        );
        outcome
    }

    fn take_turn(&mut self, id: UnitId) {
        self.arena.narrate(|arena| {
            let unit = arena.unit(id);
            CombatEvent::TurnStarted {
                unit: arena.unit_name(id),
                current_hp: unit.map(Unit::current_hp).unwrap_or_default(),
                max_hp: unit.map(Unit::max_hp).unwrap_or_default(),
            }
        });

        self.arena.process_turn_start(id);
        if !self.arena.is_alive(id) {
            self.arena.narrate(|arena| CombatEvent::Defeated {
                unit: arena.unit_name(id),
            });
            return;
        }

        let opponents: Vec<UnitId> = self.alive(self.side_of(id).opponent()).collect();
        if opponents.is_empty() {
            return;
        }

        let before: Vec<(UnitId, bool)> = opponents
            .iter()
            .map(|&op| (op, self.arena.is_alive(op)))
            .collect();
        self.arena.act(id, &opponents, &mut self.rng, self.effects);
        self.arena.process_turn_end(id);

        if self.arena.journal().is_enabled() {
            for (unit, was_alive) in before.into_iter().chain([(id, true)]) {
                if was_alive && !self.arena.is_alive(unit) {
                    self.arena.narrate(|arena| CombatEvent::Defeated {
                        unit: arena.unit_name(unit),
                    });
                }
            }
        }
    }

    fn outcome(&self, truncated: bool) -> BattleOutcome {
        let winner = match (self.standing(Side::A), self.standing(Side::B)) {
            (true, false) => Winner::Side(Side::A),
            (false, true) => Winner::Side(Side::B),
            _ => Winner::Draw,
        };
        let survivors = match winner {
            Winner::Side(side) => self
                .alive(side)
                .filter_map(|id| self.arena.unit(id))
                .map(|unit| unit.name().to_owned())
                .collect(),
            Winner::Draw => Vec::new(),
        };
        let units = [Side::A, Side::B]
            .into_iter()
            .flat_map(|side| self.side(side).iter().map(move |&id| (side, id)))
            .filter_map(|(side, id)| {
                self.arena.unit(id).map(|unit| UnitVitals {
                    name: unit.name().to_owned(),
                    side,
                    current_hp: unit.current_hp(),
                    max_hp: unit.max_hp(),
                })
            })
            .collect();

        BattleOutcome {
            winner,
            survivors,
            rounds: self.rounds,
            truncated,
            units,
        }
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Assembles a unit from base stats and a skill list.
pub fn build_unit(
    name: impl Into<String>,
    stats: &BaseStats,
    skills: impl IntoIterator<Item = Skill>,
) -> Unit {
    Unit::new(name, stats).with_skills(skills)
}

/// Runs one battle with default configuration.
///
/// With `silent` unset the battle narrates through `tracing` at target
/// `combat::narration`. The outcome does not depend on `silent`.
pub fn run_battle(
    side_a: Vec<Unit>,
    side_b: Vec<Unit>,
    effects: &dyn EffectTemplateProvider,
    seed: u64,
    silent: bool,
) -> Result<BattleOutcome, BattleError> {
    let mut battle = Battle::new(side_a, side_b, effects)?
        .with_seed(seed)
        .narrated(!silent);
    let outcome = battle.run();
    if !silent {
        info!(
            target: "combat::engine",
            winner = %outcome.winner,
            rounds = outcome.rounds,
            "battle complete"
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::NoEffects;

    fn fighter(name: &str, hp: f64, attack: f64, speed: f64) -> Unit {
        build_unit(
            name,
            &BaseStats::new(hp, attack, 0.0, speed).with_crit_rate(0.0),
            [],
        )
    }

    #[test]
    fn rejects_empty_sides() {
        let result = Battle::new(vec![], vec![fighter("b", 10.0, 1.0, 1.0)], &NoEffects);
        assert_eq!(result.err(), Some(BattleError::EmptySide(Side::A)));

        let result = Battle::new(vec![fighter("a", 10.0, 1.0, 1.0)], vec![], &NoEffects);
        assert_eq!(result.err(), Some(BattleError::EmptySide(Side::B)));
    }

    #[test]
    fn mode_follows_side_sizes() {
        assert_eq!(BattleMode::for_sides(1, 1), BattleMode::Duel);
        assert_eq!(BattleMode::for_sides(1, 2), BattleMode::Skirmish);
        assert_eq!(BattleMode::for_sides(3, 3), BattleMode::Skirmish);
    }

    #[test]
    fn round_limit_truncates_into_draw() {
        let mut battle = Battle::new(
            vec![fighter("wall_a", 1_000.0, 1.0, 5.0)],
            vec![fighter("wall_b", 1_000.0, 1.0, 4.0)],
            &NoEffects,
        )
        .unwrap()
        .with_config(CombatConfig::with_round_limit(10));

        let outcome = battle.run();

        assert_eq!(outcome.winner, Winner::Draw);
        assert!(outcome.truncated);
        assert_eq!(outcome.rounds, 10);
        assert!(outcome.survivors.is_empty());
        assert_eq!(outcome.units[0].current_hp, 990);
    }

    #[test]
    fn narration_does_not_change_the_outcome() {
        let build = || {
            (
                vec![fighter("a1", 60.0, 9.0, 6.0), fighter("a2", 45.0, 12.0, 8.0)],
                vec![fighter("b1", 70.0, 8.0, 7.0), fighter("b2", 50.0, 11.0, 5.0)],
            )
        };

        let (a, b) = build();
        let silent = run_battle(a, b, &NoEffects, 99, true).unwrap();
        let (a, b) = build();
        let mut narrated = Battle::new(a, b, &NoEffects)
            .unwrap()
            .with_seed(99)
            .narrated(true);
        let loud = narrated.run();

        assert_eq!(silent, loud);
        assert!(!narrated.events().is_empty());
        assert!(matches!(
            narrated.events().last(),
            Some(CombatEvent::BattleEnded { .. })
        ));
    }
}
