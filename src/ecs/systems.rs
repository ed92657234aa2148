use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::*;

use super::{
    components::{CombatStats, IntentStep, Monster, MonsterBrain, PlayerTag, Position},
    resources::{CombatLog, MovementContext},
};
use crate::ai::{can_see, is_adjacent, step_towards, wander_step};

/// Decides where each live monster wants to go this turn.
#[derive(Default)]
pub struct MonsterAiSystem;

impl<'a> System<'a> for MonsterAiSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, IntentStep>,
        ReadStorage<'a, Position>,
        ReadStorage<'a, MonsterBrain>,
        ReadStorage<'a, CombatStats>,
        ReadExpect<'a, MovementContext>,
        WriteExpect<'a, RandomNumberGenerator>,
    );

    fn run(
        &mut self,
        (entities, mut intents, positions, brains, stats, movement, mut rng): Self::SystemData,
    ) {
        let occupied: HashSet<Point> = (&positions, &brains)
            .join()
            .map(|(pos, _)| pos.point)
            .collect();
        let player = movement.player_point;

        for (entity, pos, brain, stat) in (&entities, &positions, &brains, &stats).join() {
            if stat.is_dead() {
                continue;
            }
            let is_free = |point: Point| {
                movement.is_passable(point) && point != player && !occupied.contains(&point)
            };

            let delta = if is_adjacent(pos.point, player) {
                Some(player - pos.point)
            } else if can_see(pos.point, player, brain.sight) {
                step_towards(pos.point, player, is_free)
            } else {
                wander_step(
                    pos.point,
                    &movement.level,
                    brain.wander_chance,
                    &mut rng,
                    is_free,
                )
            };

            if let Some(delta) = delta {
                let _ = intents.insert(entity, IntentStep { delta });
            }
        }
    }
}

/// Applies monster intents: a step into the player is an attack, anything
/// else moves only onto a free passable tile.
#[derive(Default)]
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Position>,
        WriteStorage<'a, IntentStep>,
        ReadStorage<'a, PlayerTag>,
        ReadStorage<'a, Monster>,
        WriteStorage<'a, CombatStats>,
        ReadExpect<'a, MovementContext>,
        WriteExpect<'a, CombatLog>,
    );

    fn run(
        &mut self,
        (
            entities,
            mut positions,
            mut intents,
            players,
            monsters,
            mut stats,
            movement,
            mut combat_log,
        ): Self::SystemData,
    ) {
        let player = (&entities, &players).join().next().map(|(entity, _)| entity);
        let mut occupied: HashSet<Point> = (&positions, &monsters)
            .join()
            .map(|(pos, _)| pos.point)
            .collect();
        let player_point = movement.player_point;

        let mut to_clear = Vec::new();
        for (entity, pos, intent, monster) in (&entities, &mut positions, &intents, &monsters).join()
        {
            to_clear.push(entity);
            let target = pos.point + intent.delta;

            if target == player_point {
                let Some(player) = player else { continue };
                let Some(power) = stats.get(entity).map(|s| s.power) else {
                    continue;
                };
                if let Some(player_stats) = stats.get_mut(player) {
                    player_stats.take_damage(power);
                    combat_log.push(format!("The {} hits you for {power}.", monster.name));
                    if player_stats.is_dead() {
                        combat_log.push(format!("You were slain by the {}.", monster.name));
                    }
                }
                continue;
            }

            if movement.is_passable(target) && !occupied.contains(&target) {
                occupied.remove(&pos.point);
                occupied.insert(target);
                pos.point = target;
            }
        }

        for entity in to_clear {
            intents.remove(entity);
        }
    }
}
