pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::{data::monsters::MonsterTemplate, map::Level};

use self::{
    components::{CombatStats, IntentStep, Monster, MonsterBrain, PlayerTag, Position, Renderable},
    resources::{CombatLog, MovementContext},
    systems::{MonsterAiSystem, MovementSystem},
};

pub const PLAYER_GLYPH: char = '@';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Monster,
}

/// Read-only copy of an entity handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityView {
    pub kind: EntityKind,
    pub name: String,
    pub point: Point,
    pub hp: i32,
    pub max_hp: i32,
    pub power: i32,
    pub glyph: char,
    pub color: RGB,
}

pub struct AttackReport {
    pub hit: String,
    pub kill: Option<String>,
}

pub struct EcsWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
}

impl EcsWorld {
    pub fn new(spawn: Point, player_stats: CombatStats, seed: u64) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(RandomNumberGenerator::seeded(seed));
        specs_world.insert(CombatLog::default());
        let player = Self::spawn_player(&mut specs_world, spawn, player_stats);
        let dispatcher = DispatcherBuilder::new()
            .with(MonsterAiSystem, "monster_ai", &[])
            .with(MovementSystem, "movement", &["monster_ai"])
            .build();

        Self {
            specs_world,
            dispatcher,
            player,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<IntentStep>();
        world.register::<PlayerTag>();
        world.register::<Monster>();
        world.register::<MonsterBrain>();
        world.register::<CombatStats>();
    }

    fn spawn_player(world: &mut SpecsWorld, spawn: Point, stats: CombatStats) -> Entity {
        world
            .create_entity()
            .with(Position { point: spawn })
            .with(Renderable {
                glyph: PLAYER_GLYPH,
                color: RGB::from_u8(255, 255, 255),
            })
            .with(stats)
            .with(PlayerTag)
            .build()
    }

    pub fn spawn_monster(&mut self, template: &MonsterTemplate, point: Point) -> Entity {
        self.specs_world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                glyph: template.glyph,
                color: template.color,
            })
            .with(Monster {
                name: template.name.to_string(),
            })
            .with(MonsterBrain {
                wander_chance: template.wander_chance,
                sight: template.sight,
            })
            .with(CombatStats::new(template.hp, template.power))
            .build()
    }

    /// Runs the monster systems against `level` for one turn.
    pub fn advance(&mut self, level: &Level) {
        let context = MovementContext::new(level, self.player_point());
        self.specs_world.insert(context);
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();
    }

    /// The living monster standing on `point`, if any.
    pub fn monster_at(&self, point: Point) -> Option<Entity> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let monsters = self.specs_world.read_component::<Monster>();
        let stats = self.specs_world.read_component::<CombatStats>();
        (&entities, &positions, &monsters, &stats)
            .join()
            .find(|(_, pos, _, stat)| pos.point == point && !stat.is_dead())
            .map(|(entity, _, _, _)| entity)
    }

    /// The player strikes `target` with their current power. Dead monsters stay
    /// in the world until [`EcsWorld::remove_dead`] runs.
    pub fn player_attack(&mut self, target: Entity) -> Option<AttackReport> {
        if target == self.player {
            return None;
        }
        let mut stats = self.specs_world.write_component::<CombatStats>();
        let monsters = self.specs_world.read_component::<Monster>();
        let power = stats.get(self.player)?.power;
        let name = monsters.get(target)?.name.clone();
        let target_stats = stats.get_mut(target)?;
        if target_stats.is_dead() {
            return None;
        }
        target_stats.take_damage(power);

        let kill = target_stats
            .is_dead()
            .then(|| format!("The {name} dies."));
        Some(AttackReport {
            hit: format!("You hit the {name} for {power}."),
            kill,
        })
    }

    /// Deletes every monster with no health left and returns the deleted
    /// entities.
    pub fn remove_dead(&mut self) -> Vec<Entity> {
        let dead: Vec<Entity> = {
            let entities = self.specs_world.entities();
            let stats = self.specs_world.read_component::<CombatStats>();
            let monsters = self.specs_world.read_component::<Monster>();
            (&entities, &stats, &monsters)
                .join()
                .filter(|(_, stat, _)| stat.is_dead())
                .map(|(entity, _, _)| entity)
                .collect()
        };
        self.delete(&dead);
        dead
    }

    pub fn remove_monsters(&mut self) {
        let all: Vec<Entity> = {
            let entities = self.specs_world.entities();
            let monsters = self.specs_world.read_component::<Monster>();
            (&entities, &monsters)
                .join()
                .map(|(entity, _)| entity)
                .collect()
        };
        self.delete(&all);
    }

    fn delete(&mut self, doomed: &[Entity]) {
        for entity in doomed {
            if let Err(err) = self.specs_world.delete_entity(*entity) {
                log::warn!("monster already gone: {err}");
            }
        }
        self.specs_world.maintain();
    }

    pub fn view(&self, entity: Entity) -> Option<EntityView> {
        if !self.specs_world.is_alive(entity) {
            return None;
        }
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();
        let stats = self.specs_world.read_component::<CombatStats>();
        let monsters = self.specs_world.read_component::<Monster>();

        let pos = positions.get(entity)?;
        let render = renderables.get(entity)?;
        let stat = stats.get(entity)?;
        let (kind, name) = match monsters.get(entity) {
            Some(monster) => (EntityKind::Monster, monster.name.clone()),
            None => (EntityKind::Player, "you".to_string()),
        };
        Some(EntityView {
            kind,
            name,
            point: pos.point,
            hp: stat.hp,
            max_hp: stat.max_hp,
            power: stat.power,
            glyph: render.glyph,
            color: render.color,
        })
    }

    pub fn stats_mut<F, R>(&mut self, entity: Entity, f: F) -> Option<R>
    where
        F: FnOnce(&mut CombatStats) -> R,
    {
        let mut stats = self.specs_world.write_component::<CombatStats>();
        stats.get_mut(entity).map(f)
    }

    pub fn set_position(&mut self, entity: Entity, point: Point) {
        let mut positions = self.specs_world.write_component::<Position>();
        if let Some(pos) = positions.get_mut(entity) {
            pos.point = point;
        }
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    pub fn player_point(&self) -> Point {
        let positions = self.specs_world.read_component::<Position>();
        positions
            .get(self.player)
            .map(|pos| pos.point)
            .unwrap_or(Point::new(0, 0))
    }

    pub fn player_stats(&self) -> Option<CombatStats> {
        let stats = self.specs_world.read_component::<CombatStats>();
        stats.get(self.player).cloned()
    }

    pub fn drain_combat_log(&mut self) -> Vec<String> {
        let mut log = self.specs_world.write_resource::<CombatLog>();
        std::mem::take(&mut log.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rat() -> MonsterTemplate {
        MonsterTemplate::bestiary()[0].clone()
    }

    #[test]
    fn attack_and_reap() {
        let mut ecs = EcsWorld::new(Point::new(0, 0), CombatStats::new(100, 15), 1);
        let rat = ecs.spawn_monster(&rat(), Point::new(1, 0));
        assert_eq!(ecs.monster_at(Point::new(1, 0)), Some(rat));

        let first = ecs.player_attack(rat).unwrap();
        assert!(first.kill.is_none());
        assert!(ecs.remove_dead().is_empty());

        let second = ecs.player_attack(rat).unwrap();
        assert!(second.kill.is_some());
        assert_eq!(ecs.remove_dead(), vec![rat]);
        assert_eq!(ecs.monster_at(Point::new(1, 0)), None);
        assert!(ecs.view(rat).is_none());
    }

    #[test]
    fn monsters_attack_adjacent_player() {
        let level = Level::from_rows(&["...", "...", "..."]);
        let mut ecs = EcsWorld::new(Point::new(1, 1), CombatStats::new(100, 10), 1);
        let template = rat();
        ecs.spawn_monster(&template, Point::new(1, 0));
        ecs.spawn_monster(&template, Point::new(2, 1));

        ecs.advance(&level);

        let stats = ecs.player_stats().unwrap();
        assert_eq!(stats.hp, 100 - 2 * template.power);
        assert_eq!(ecs.drain_combat_log().len(), 2);
        assert!(ecs.monster_at(Point::new(1, 0)).is_some());
        assert!(ecs.monster_at(Point::new(2, 1)).is_some());
    }

    #[test]
    fn monsters_close_in_without_overlapping() {
        let level = Level::from_rows(&["......."]);
        let mut ecs = EcsWorld::new(Point::new(0, 0), CombatStats::new(100, 10), 1);
        let template = rat();
        let near = ecs.spawn_monster(&template, Point::new(3, 0));
        let far = ecs.spawn_monster(&template, Point::new(4, 0));

        ecs.advance(&level);

        let near_at = ecs.view(near).unwrap().point;
        let far_at = ecs.view(far).unwrap().point;
        assert_eq!(near_at, Point::new(2, 0));
        assert_ne!(near_at, far_at);
        assert_eq!(ecs.player_stats().unwrap().hp, 100);
    }

    #[test]
    fn walls_stop_monsters() {
        let level = Level::from_rows(&[".#."]);
        let mut ecs = EcsWorld::new(Point::new(0, 0), CombatStats::new(100, 10), 1);
        let rat = ecs.spawn_monster(&rat(), Point::new(2, 0));
        for _ in 0..5 {
            ecs.advance(&level);
        }
        assert_eq!(ecs.view(rat).unwrap().point, Point::new(2, 0));
    }

    #[test]
    fn healing_stops_at_max() {
        let mut full = CombatStats::new(100, 10);
        assert_eq!(full.heal(25), 0);
        assert_eq!(full.hp, full.max_hp);

        let mut hurt = CombatStats::new(100, 10);
        hurt.take_damage(10);
        assert_eq!(hurt.heal(25), 10);
        assert_eq!(hurt.hp, 100);
    }

    #[test]
    fn remove_monsters_keeps_player() {
        let mut ecs = EcsWorld::new(Point::new(0, 0), CombatStats::new(100, 10), 1);
        let monster = ecs.spawn_monster(&rat(), Point::new(3, 3));
        ecs.remove_monsters();
        assert!(ecs.view(monster).is_none());
        assert!(ecs.view(ecs.player_entity()).is_some());
    }
}
