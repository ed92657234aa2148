pub mod view;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::Entity;

use crate::{
    config::{GameConfig, MAX_MONSTERS},
    data::{
        items::{RewardEffect, chest_rewards},
        monsters::MonsterTemplate,
    },
    ecs::{EcsWorld, EntityView, components::CombatStats},
    error::{GameError, GameResult},
    map::{Level, TileType},
};

use self::view::GameView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    Descended { depth: u32 },
    PlayerDied { depth: u32 },
}

pub struct GameEngine<V: GameView> {
    config: GameConfig,
    view: V,
    rng: RandomNumberGenerator,
    depth: u32,
    level: Level,
    spawns: Vec<Point>,
    ecs: EcsWorld,
    monsters: Vec<Option<Entity>>,
    messages: Vec<String>,
    game_over: bool,
}

impl<V: GameView> GameEngine<V> {
    pub fn new(config: GameConfig, view: V) -> GameResult<Self> {
        let rng = match config.seed {
            Some(seed) => RandomNumberGenerator::seeded(seed),
            None => RandomNumberGenerator::new(),
        };
        let player_stats = CombatStats::new(config.player_health, config.player_power);
        let mut engine = Self {
            level: Level::filled(config.width, config.height, TileType::Wall),
            ecs: EcsWorld::new(Point::new(0, 0), player_stats, 0),
            config,
            view,
            rng,
            depth: 1,
            spawns: Vec::new(),
            monsters: vec![None; MAX_MONSTERS],
            messages: Vec::new(),
            game_over: false,
        };
        engine.start_game()?;
        Ok(engine)
    }

    /// Fresh run from depth 1 with a new player.
    pub fn start_game(&mut self) -> GameResult<()> {
        self.depth = 1;
        self.game_over = false;
        self.messages.clear();
        self.level = self.generate_level();
        self.spawns = self.get_spawns();
        self.spawn_player()?;
        self.spawn_monsters();
        log::info!("new game started, {} spawn points left", self.spawns.len());
        self.push_message("You enter the dungeon.");
        self.render();
        Ok(())
    }

    fn generate_level(&mut self) -> Level {
        Level::generate(
            self.config.width,
            self.config.height,
            self.config.wall_chance,
            self.config.chest_chance,
            &mut self.rng,
        )
    }

    fn get_spawns(&self) -> Vec<Point> {
        self.level.spawn_points()
    }

    fn take_spawn(&mut self) -> Option<Point> {
        if self.spawns.is_empty() {
            return None;
        }
        let idx = self.rng.range(0, self.spawns.len());
        Some(self.spawns.swap_remove(idx))
    }

    fn spawn_player(&mut self) -> GameResult<()> {
        let point = self.take_spawn().ok_or(GameError::NoSpawnPoint { depth: self.depth })?;
        let stats = CombatStats::new(self.config.player_health, self.config.player_power);
        let seed = self.rng.next_u64();
        self.ecs = EcsWorld::new(point, stats, seed);
        self.monsters = vec![None; MAX_MONSTERS];
        Ok(())
    }

    /// Moves the existing player to a fresh spawn point, keeping its health.
    fn place_player(&mut self) -> GameResult<()> {
        let point = self.take_spawn().ok_or(GameError::NoSpawnPoint { depth: self.depth })?;
        let player = self.ecs.player_entity();
        self.ecs.set_position(player, point);
        Ok(())
    }

    fn spawn_monsters(&mut self) {
        let bestiary = MonsterTemplate::bestiary();
        self.monsters = vec![None; MAX_MONSTERS];
        for slot in 0..self.config.monster_budget() {
            let Some(point) = self.take_spawn() else {
                log::debug!("ran out of spawn points after {slot} monsters");
                break;
            };
            let template = &bestiary[self.rng.range(0, bestiary.len())];
            self.monsters[slot] = Some(self.ecs.spawn_monster(template, point));
        }
    }

    pub fn move_player_left(&mut self) {
        self.move_player(Point::new(-1, 0));
    }

    pub fn move_player_right(&mut self) {
        self.move_player(Point::new(1, 0));
    }

    pub fn move_player_up(&mut self) {
        self.move_player(Point::new(0, -1));
    }

    pub fn move_player_down(&mut self) {
        self.move_player(Point::new(0, 1));
    }

    fn move_player(&mut self, delta: Point) {
        if self.game_over {
            return;
        }
        let target = self.ecs.player_point() + delta;
        if !self.level.in_bounds(target) {
            return;
        }
        if let Some(monster) = self.ecs.monster_at(target) {
            self.hit_monster(monster);
            return;
        }
        match self.level.tile_at(target) {
            Some(TileType::Wall) | None => self.push_message("You bump into a wall."),
            Some(TileType::Chest) => {
                self.ecs.set_position(self.ecs.player_entity(), target);
                self.open_chest(target);
            }
            Some(TileType::Floor | TileType::Stairs) => {
                self.ecs.set_position(self.ecs.player_entity(), target);
            }
        }
    }

    fn open_chest(&mut self, point: Point) {
        self.level.set_tile(point, TileType::Floor);
        let rewards = chest_rewards();
        let reward = &rewards[self.rng.range(0, rewards.len())];
        let player = self.ecs.player_entity();
        let line = match reward.effect {
            RewardEffect::Heal { amount } => {
                let healed = self.ecs.stats_mut(player, |s| s.heal(amount)).unwrap_or(0);
                format!("The chest holds a {}: +{healed} health.", reward.name)
            }
            RewardEffect::Sharpen { power } => {
                self.ecs.stats_mut(player, |s| s.power += power);
                format!("The chest holds a {}: +{power} power.", reward.name)
            }
        };
        self.push_message(line);
    }

    fn hit_monster(&mut self, monster: Entity) {
        if let Some(report) = self.ecs.player_attack(monster) {
            self.push_message(report.hit);
            if let Some(kill) = report.kill {
                self.push_message(kill);
            }
        }
    }

    fn move_monsters(&mut self) {
        self.ecs.advance(&self.level);
        let combat = self.ecs.drain_combat_log();
        self.messages.extend(combat);
    }

    fn clean_dead_monsters(&mut self) {
        let dead = self.ecs.remove_dead();
        for slot in self.monsters.iter_mut() {
            if slot.is_some_and(|entity| dead.contains(&entity)) {
                *slot = None;
            }
        }
    }

    /// New level one deeper. The player keeps its health; monsters are
    /// replaced. A level with no free tile is discarded and nothing changes.
    fn descend_level(&mut self) -> GameResult<()> {
        let depth = self.depth + 1;
        let level = self.generate_level();
        if level.spawn_points().is_empty() {
            log::warn!("discarding level at depth {depth}: no free tile");
            return Err(GameError::NoSpawnPoint { depth });
        }
        self.depth = depth;
        self.level = level;
        self.spawns = self.get_spawns();
        self.ecs.remove_monsters();
        self.place_player()?;
        self.spawn_monsters();
        log::info!("descended to depth {}", self.depth);
        self.push_message(format!("You descend to depth {}.", self.depth));
        Ok(())
    }

    /// Resolves one turn after the player acted.
    pub fn do_turn(&mut self) -> GameResult<TurnOutcome> {
        if self.game_over {
            self.render();
            return Ok(TurnOutcome::PlayerDied { depth: self.depth });
        }

        self.clean_dead_monsters();
        self.move_monsters();

        let mut outcome = TurnOutcome::Continue;
        if let Some(stats) = self.ecs.player_stats() {
            if stats.is_dead() {
                self.game_over = true;
                log::info!("player died at depth {}", self.depth);
                outcome = TurnOutcome::PlayerDied { depth: self.depth };
            } else if self.level.tile_at(self.ecs.player_point()) == Some(TileType::Stairs) {
                if let Err(err) = self.descend_level() {
                    self.render();
                    return Err(err);
                }
                outcome = TurnOutcome::Descended { depth: self.depth };
            }
        }

        self.render();
        Ok(outcome)
    }

    fn render(&mut self) {
        let player = self.player_view();
        let monsters = self.monster_views();
        self.view.update_display(&self.level, player.as_ref(), &monsters);
    }

    fn push_message<S: Into<String>>(&mut self, message: S) {
        self.messages.push(message.into());
    }

    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn player_view(&self) -> Option<EntityView> {
        self.ecs.view(self.ecs.player_entity())
    }

    pub fn monster_views(&self) -> Vec<Option<EntityView>> {
        self.monsters
            .iter()
            .map(|slot| slot.and_then(|entity| self.ecs.view(entity)))
            .collect()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}

#[cfg(test)]
impl<V: GameView> GameEngine<V> {
    /// Swaps in a hand-built level with the player at `player_at` and no
    /// monsters.
    fn install_level(&mut self, level: Level, player_at: Point) {
        self.level = level;
        self.ecs.remove_monsters();
        self.monsters = vec![None; MAX_MONSTERS];
        self.ecs.set_position(self.ecs.player_entity(), player_at);
        self.spawns = self
            .get_spawns()
            .into_iter()
            .filter(|point| *point != player_at)
            .collect();
    }

    fn add_monster(&mut self, name: &str, point: Point) -> Entity {
        let template = MonsterTemplate::bestiary()
            .into_iter()
            .find(|t| t.name == name)
            .expect("known monster");
        let entity = self.ecs.spawn_monster(&template, point);
        let slot = self
            .monsters
            .iter()
            .position(Option::is_none)
            .expect("free slot");
        self.monsters[slot] = Some(entity);
        entity
    }

    fn set_player_hp(&mut self, hp: i32) {
        let player = self.ecs.player_entity();
        self.ecs.stats_mut(player, |s| s.hp = hp);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Default)]
    struct RecordingView {
        frames: usize,
        last_player: Option<EntityView>,
        last_monsters: usize,
    }

    impl GameView for RecordingView {
        fn update_display(
            &mut self,
            _: &Level,
            player: Option<&EntityView>,
            monsters: &[Option<EntityView>],
        ) {
            self.frames += 1;
            self.last_player = player.cloned();
            self.last_monsters = monsters.iter().flatten().count();
        }
    }

    fn engine() -> GameEngine<RecordingView> {
        GameEngine::new(GameConfig::default(), RecordingView::default()).unwrap()
    }

    fn player_at<V: GameView>(engine: &GameEngine<V>) -> Point {
        engine.player_view().unwrap().point
    }

    #[test]
    fn start_game_spawns_everyone_apart() {
        let engine = engine();
        assert_eq!(engine.depth(), 1);
        assert_eq!(engine.view().frames, 1);

        let player = engine.player_view().unwrap();
        assert_eq!(player.hp, 100);
        assert!(engine.level().tile_at(player.point).unwrap().is_spawnable());

        let monsters: Vec<EntityView> = engine.monster_views().into_iter().flatten().collect();
        assert_eq!(monsters.len(), 4);
        assert_eq!(engine.monster_views().len(), MAX_MONSTERS);

        let mut seen = HashSet::new();
        seen.insert(player.point);
        for monster in &monsters {
            assert!(engine.level().tile_at(monster.point).unwrap().is_spawnable());
            assert!(seen.insert(monster.point), "two entities share a tile");
        }
    }

    #[test]
    fn seeded_games_repeat() {
        let a = engine();
        let b = engine();
        assert_eq!(a.level(), b.level());
        assert_eq!(a.player_view(), b.player_view());
    }

    #[test]
    fn no_room_for_player_is_an_error() {
        let config = GameConfig {
            wall_chance: 1.0,
            ..GameConfig::default()
        };
        let result = GameEngine::new(config, RecordingView::default());
        assert!(matches!(result, Err(GameError::NoSpawnPoint { depth: 1 })));
    }

    #[test]
    fn monsters_limited_by_free_tiles() {
        let config = GameConfig {
            width: 3,
            height: 1,
            wall_chance: 0.0,
            chest_chance: 0.0,
            monsters_per_level: 10,
            ..GameConfig::default()
        };
        let engine = GameEngine::new(config, RecordingView::default()).unwrap();
        // three tiles: stairs, player, one monster
        assert_eq!(engine.monster_views().iter().flatten().count(), 1);
    }

    #[test]
    fn walls_and_edges_block_movement() {
        let mut engine = engine();
        engine.install_level(Level::from_rows(&[".#", ".."]), Point::new(0, 0));

        engine.move_player_left();
        engine.move_player_up();
        assert_eq!(player_at(&engine), Point::new(0, 0));

        engine.move_player_right();
        assert_eq!(player_at(&engine), Point::new(0, 0));
        assert!(
            engine
                .drain_messages()
                .iter()
                .any(|m| m.contains("bump"))
        );

        engine.move_player_down();
        engine.move_player_right();
        assert_eq!(player_at(&engine), Point::new(1, 1));
        engine.move_player_down();
        engine.move_player_right();
        assert_eq!(player_at(&engine), Point::new(1, 1));
    }

    #[test]
    fn bumping_a_monster_attacks_it() {
        let mut engine = engine();
        engine.install_level(Level::from_rows(&["...."]), Point::new(0, 0));
        // 20 hp against 10 power: two hits
        let rat = engine.add_monster("Cave Rat", Point::new(1, 0));

        engine.move_player_right();
        assert_eq!(player_at(&engine), Point::new(0, 0));
        assert_eq!(engine.ecs.view(rat).unwrap().hp, 10);

        engine.move_player_right();
        assert_eq!(engine.ecs.view(rat).unwrap().hp, 0);
        assert_eq!(engine.monster_views().iter().flatten().count(), 1);

        let outcome = engine.do_turn().unwrap();
        assert_eq!(outcome, TurnOutcome::Continue);
        assert!(engine.monster_views().iter().all(Option::is_none));
        assert_eq!(engine.view().last_monsters, 0);

        engine.move_player_right();
        assert_eq!(player_at(&engine), Point::new(1, 0));
    }

    #[test]
    fn adjacent_monster_hits_player_each_turn() {
        let mut engine = engine();
        engine.install_level(Level::from_rows(&["..."]), Point::new(0, 0));
        let ghoul = engine.add_monster("Ghoul", Point::new(1, 0));
        let power = engine.ecs.view(ghoul).unwrap().power;

        engine.do_turn().unwrap();
        assert_eq!(engine.player_view().unwrap().hp, 100 - power);
        assert_eq!(engine.ecs.view(ghoul).unwrap().point, Point::new(1, 0));
    }

    #[test]
    fn death_ends_the_run_until_restart() {
        let mut engine = engine();
        engine.install_level(Level::from_rows(&["...", "..."]), Point::new(0, 0));
        engine.add_monster("Ghoul", Point::new(1, 0));
        engine.set_player_hp(1);

        let outcome = engine.do_turn().unwrap();
        assert_eq!(outcome, TurnOutcome::PlayerDied { depth: 1 });
        assert!(engine.is_game_over());

        engine.move_player_down();
        assert_eq!(player_at(&engine), Point::new(0, 0));
        assert_eq!(
            engine.do_turn().unwrap(),
            TurnOutcome::PlayerDied { depth: 1 }
        );

        engine.start_game().unwrap();
        assert!(!engine.is_game_over());
        assert_eq!(engine.player_view().unwrap().hp, 100);
    }

    #[test]
    fn stairs_descend_and_keep_health() {
        let mut engine = engine();
        engine.install_level(Level::from_rows(&[".>"]), Point::new(0, 0));
        engine.set_player_hp(42);

        engine.move_player_right();
        let outcome = engine.do_turn().unwrap();
        assert_eq!(outcome, TurnOutcome::Descended { depth: 2 });
        assert_eq!(engine.depth(), 2);

        let player = engine.player_view().unwrap();
        assert_eq!(player.hp, 42);
        assert!(engine.level().tile_at(player.point).unwrap().is_spawnable());
        assert_eq!(engine.monster_views().iter().flatten().count(), 4);
        assert_eq!(engine.view().last_player.as_ref().map(|p| p.point), Some(player.point));
    }

    #[test]
    fn blocked_descent_leaves_level_untouched() {
        let mut engine = engine();
        let rows = ["...", "..>"];
        engine.install_level(Level::from_rows(&rows), Point::new(1, 1));
        let rat = engine.add_monster("Cave Rat", Point::new(0, 0));
        engine.move_player_right();
        engine.config.wall_chance = 1.0;
        let frames = engine.view().frames;

        let err = engine.do_turn();
        assert!(matches!(err, Err(GameError::NoSpawnPoint { depth: 2 })));
        assert_eq!(engine.depth(), 1);
        assert_eq!(engine.level(), &Level::from_rows(&rows));
        assert_eq!(player_at(&engine), Point::new(2, 1));
        assert!(!engine.is_game_over());
        assert!(engine.ecs.view(rat).is_some());
        assert_eq!(engine.view().frames, frames + 1);

        engine.config.wall_chance = 0.0;
        let outcome = engine.do_turn().unwrap();
        assert_eq!(outcome, TurnOutcome::Descended { depth: 2 });
        assert!(engine.ecs.view(rat).is_none());
    }

    #[test]
    fn chests_open_once() {
        let mut engine = engine();
        engine.install_level(Level::from_rows(&[".="]), Point::new(0, 0));
        engine.set_player_hp(50);

        engine.move_player_right();
        assert_eq!(player_at(&engine), Point::new(1, 0));
        assert_eq!(engine.level().tile_at(Point::new(1, 0)), Some(TileType::Floor));

        let player = engine.player_view().unwrap();
        assert!(player.hp > 50 || player.power > 10);
        assert!(
            engine
                .drain_messages()
                .iter()
                .any(|m| m.contains("chest"))
        );
    }

    #[test]
    fn every_turn_renders() {
        let mut engine = engine();
        let before = engine.view().frames;
        engine.do_turn().unwrap();
        engine.do_turn().unwrap();
        assert_eq!(engine.view().frames, before + 2);
    }
}
