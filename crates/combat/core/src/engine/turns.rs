//! Turn ordering.
//!
//! Both orders sort by descending speed with a stable tie-break on input
//! order (side A before side B, then position within the side). They differ
//! in when the speed ranking is taken.

use crate::state::{Arena, UnitId};

/// Produces the acting order of each round.
pub trait TurnOrder {
    /// Units to visit this round. The scheduler re-checks that each one is
    /// alive immediately before its turn.
    fn round_order(&mut self, arena: &Arena) -> Vec<UnitId>;
}

/// Ranks `units` by current speed, fastest first, ties in input order.
pub fn rank_by_speed(arena: &Arena, units: impl IntoIterator<Item = UnitId>) -> Vec<UnitId> {
    let mut keyed: Vec<(i64, UnitId)> = units
        .into_iter()
        .map(|id| (arena.speed(id), id))
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, id)| id).collect()
}

/// Fixed order ranked once, at battle start.
///
/// Used for duels: the faster unit acts first in every round regardless of
/// later speed changes.
#[derive(Clone, Debug)]
pub struct DuelOrder {
    order: Vec<UnitId>,
}

impl DuelOrder {
    pub fn new(arena: &Arena, units: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            order: rank_by_speed(arena, units),
        }
    }
}

impl TurnOrder for DuelOrder {
    fn round_order(&mut self, _arena: &Arena) -> Vec<UnitId> {
        self.order.clone()
    }
}

/// Order re-ranked over the living units at the start of every round.
#[derive(Clone, Debug)]
pub struct SpeedOrder {
    units: Vec<UnitId>,
}

impl SpeedOrder {
    pub fn new(units: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            units: units.into_iter().collect(),
        }
    }
}

impl TurnOrder for SpeedOrder {
    fn round_order(&mut self, arena: &Arena) -> Vec<UnitId> {
        let alive = self.units.iter().copied().filter(|&id| arena.is_alive(id));
        rank_by_speed(arena, alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionInterpreter;
    use crate::state::Unit;
    use crate::stats::BaseStats;

    fn arena_with_speeds(speeds: &[f64]) -> (Arena, Vec<UnitId>) {
        let mut arena = Arena::new(ActionInterpreter::new());
        let ids = speeds
            .iter()
            .enumerate()
            .map(|(i, &speed)| {
                arena.spawn(Unit::new(
                    format!("u{i}"),
                    &BaseStats::new(100.0, 10.0, 0.0, speed),
                ))
            })
            .collect();
        (arena, ids)
    }

    #[test]
    fn ranks_fastest_first() {
        let (arena, ids) = arena_with_speeds(&[5.0, 10.0, 1.0]);
        let mut order = SpeedOrder::new(ids.clone());

        assert_eq!(order.round_order(&arena), vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn ties_keep_input_order() {
        let (arena, ids) = arena_with_speeds(&[7.0, 9.0, 7.0, 7.0]);

        assert_eq!(
            rank_by_speed(&arena, ids.clone()),
            vec![ids[1], ids[0], ids[2], ids[3]]
        );
    }

    #[test]
    fn dead_units_leave_the_speed_order() {
        let (mut arena, ids) = arena_with_speeds(&[5.0, 10.0, 1.0]);
        let mut order = SpeedOrder::new(ids.clone());

        arena.take_damage(ids[0], 100, false);

        assert_eq!(order.round_order(&arena), vec![ids[1], ids[2]]);
    }

    #[test]
    fn duel_order_is_fixed_at_start() {
        let (mut arena, ids) = arena_with_speeds(&[3.0, 8.0]);
        let mut order = DuelOrder::new(&arena, ids.clone());

        if let Some(unit) = arena.unit_mut(ids[0]) {
            unit.define_attribute("speed", crate::stats::Attribute::integer(50.0));
        }

        assert_eq!(arena.speed(ids[0]), 50);
        assert_eq!(order.round_order(&arena), vec![ids[1], ids[0]]);
    }
}
