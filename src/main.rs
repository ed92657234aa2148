mod ai;
mod config;
mod data;
mod ecs;
mod engine;
mod error;
mod logging;
mod map;
mod render;
mod scripted_input;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use config::GameConfig;
use engine::{
    GameEngine, TurnOutcome,
    view::{GameView, NullView},
};
use error::GameResult;
use render::{FrameBuffer, draw_game_over, draw_hud, draw_log};
use scripted_input::ScriptedInput;

const SCREEN_HEIGHT: i32 = 50;
const MAP_ORIGIN_X: i32 = 2;
const MAP_ORIGIN_Y: i32 = 4;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 8;
const LOG_MAX_ENTRIES: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Action {
    Left,
    Right,
    Up,
    Down,
    Wait,
    Restart,
    Quit,
}

fn key_action(key: VirtualKeyCode) -> Option<Action> {
    match key {
        VirtualKeyCode::Left | VirtualKeyCode::A | VirtualKeyCode::H => Some(Action::Left),
        VirtualKeyCode::Right | VirtualKeyCode::D | VirtualKeyCode::L => Some(Action::Right),
        VirtualKeyCode::Up | VirtualKeyCode::W | VirtualKeyCode::K => Some(Action::Up),
        VirtualKeyCode::Down | VirtualKeyCode::S | VirtualKeyCode::J => Some(Action::Down),
        VirtualKeyCode::Period | VirtualKeyCode::Space => Some(Action::Wait),
        VirtualKeyCode::R => Some(Action::Restart),
        VirtualKeyCode::Escape => Some(Action::Quit),
        _ => None,
    }
}

/// Feeds one action to the engine. A move is always followed by a turn.
fn apply_action<V: GameView>(
    engine: &mut GameEngine<V>,
    action: Action,
) -> GameResult<Option<TurnOutcome>> {
    match action {
        Action::Left => engine.move_player_left(),
        Action::Right => engine.move_player_right(),
        Action::Up => engine.move_player_up(),
        Action::Down => engine.move_player_down(),
        Action::Wait => {}
        Action::Restart => {
            if engine.is_game_over() {
                engine.start_game()?;
            }
            return Ok(None);
        }
        Action::Quit => return Ok(None),
    }
    engine.do_turn().map(Some)
}

struct DungeonState {
    engine: GameEngine<FrameBuffer>,
    message_log: Vec<String>,
}

impl GameState for DungeonState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if let Some(key) = ctx.key {
            match key_action(key) {
                Some(Action::Quit) => ctx.quit(),
                Some(action) => self.handle_action(action),
                None => {}
            }
        }
        self.flush_messages();
        ctx.cls();
        self.draw_scene(ctx);
    }
}

impl DungeonState {
    fn handle_action(&mut self, action: Action) {
        match apply_action(&mut self.engine, action) {
            Ok(Some(TurnOutcome::Descended { depth })) => {
                self.push_log_entry(format!("Welcome to depth {depth}."));
            }
            Ok(Some(TurnOutcome::PlayerDied { depth })) => {
                self.push_log_entry(format!("Slain on depth {depth}."));
            }
            Ok(_) => {}
            Err(err) => {
                log::error!("turn failed: {err}");
                self.push_log_entry(format!("The dungeon shifts: {err}"));
            }
        }
    }

    fn flush_messages(&mut self) {
        for message in self.engine.drain_messages() {
            self.push_log_entry(message);
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    fn draw_scene(&self, ctx: &mut BTerm) {
        let frame = self.engine.view();
        draw_hud(ctx, self.engine.depth(), frame.player(), &frame.engaged());
        if self.engine.is_game_over() {
            draw_game_over(ctx, self.engine.depth());
        } else {
            frame.draw(ctx, Point::new(MAP_ORIGIN_X, MAP_ORIGIN_Y));
        }
        draw_log(ctx, &self.message_log, LOG_PANEL_START);
    }
}

/// Replays a key script without a terminal and reports where the run ended.
fn run_script(config: GameConfig, script: &mut ScriptedInput) -> GameResult<()> {
    log::info!("replaying {} scripted keys", script.len());
    let mut engine = GameEngine::new(config, NullView)?;
    while let Some(key) = script.next_key() {
        let Some(action) = key_action(key) else {
            continue;
        };
        if action == Action::Quit {
            break;
        }
        if let Some(TurnOutcome::Descended { depth }) = apply_action(&mut engine, action)? {
            log::info!("script reached depth {depth}");
        }
    }
    for message in engine.drain_messages() {
        println!("{message}");
    }
    let hp = engine.player_view().map(|p| p.hp).unwrap_or(0);
    println!(
        "Finished at depth {} with {hp} HP{}, {} chests unopened.",
        engine.depth(),
        if engine.is_game_over() { " (dead)" } else { "" },
        engine.level().count(map::TileType::Chest)
    );
    Ok(())
}

fn main() -> BError {
    let config = GameConfig::discover()?;
    if let Some(path) = &config.log_file {
        logging::init(path, &config.log_level)?;
    }

    if let Some(path) = config.script.clone() {
        let mut script = ScriptedInput::from_file(&path)?;
        run_script(config, &mut script)?;
        return Ok(());
    }

    let engine = GameEngine::new(config, FrameBuffer::default())?;
    let context = BTermBuilder::simple80x50()
        .with_title("Dungeon Crawler")
        .build()?;
    let game_state = DungeonState {
        engine,
        message_log: Vec::new(),
    };
    main_loop(context, game_state)
}
