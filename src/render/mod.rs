use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::{
    ai::is_adjacent,
    ecs::{EntityKind, EntityView},
    engine::view::GameView,
    map::Level,
};

/// Last frame pushed by the engine; drawn on the next terminal tick.
#[derive(Default)]
pub struct FrameBuffer {
    level: Option<Level>,
    player: Option<EntityView>,
    monsters: Vec<EntityView>,
}

impl GameView for FrameBuffer {
    fn update_display(
        &mut self,
        level: &Level,
        player: Option<&EntityView>,
        monsters: &[Option<EntityView>],
    ) {
        self.level = Some(level.clone());
        self.player = player.cloned();
        self.monsters = monsters.iter().flatten().cloned().collect();
    }
}

impl FrameBuffer {
    pub fn player(&self) -> Option<&EntityView> {
        self.player.as_ref()
    }

    /// Monsters close enough to trade blows with the player this turn.
    pub fn engaged(&self) -> Vec<&EntityView> {
        let Some(player) = &self.player else {
            return Vec::new();
        };
        self.monsters
            .iter()
            .filter(|monster| is_adjacent(monster.point, player.point))
            .collect()
    }

    pub fn draw(&self, ctx: &mut BTerm, origin: Point) {
        let Some(level) = &self.level else {
            return;
        };
        ctx.draw_box(
            origin.x - 1,
            origin.y - 1,
            level.width + 1,
            level.height + 1,
            RGB::named(GRAY),
            RGB::named(BLACK),
        );
        for y in 0..level.height {
            for x in 0..level.width {
                let point = Point::new(x, y);
                if let Some(tile) = level.tile_at(point) {
                    ctx.set(
                        origin.x + x,
                        origin.y + y,
                        tile.color(),
                        RGB::named(BLACK),
                        to_cp437(tile.glyph()),
                    );
                }
            }
        }
        for entity in self.monsters.iter().chain(self.player.iter()) {
            let bg = match entity.kind {
                EntityKind::Player => RGB::from_u8(30, 30, 70),
                EntityKind::Monster => RGB::named(BLACK),
            };
            ctx.set(
                origin.x + entity.point.x,
                origin.y + entity.point.y,
                entity.color,
                bg,
                to_cp437(entity.glyph),
            );
        }
    }
}

pub fn draw_hud(
    ctx: &mut BTerm,
    depth: u32,
    player: Option<&EntityView>,
    engaged: &[&EntityView],
) {
    let (width, _) = ctx.get_char_size();
    ctx.draw_box(0, 0, width - 1, 2, RGB::named(GRAY), RGB::named(BLACK));
    ctx.print_color(
        2,
        1,
        RGB::named(YELLOW),
        RGB::named(BLACK),
        format!("Depth {depth}"),
    );
    if let Some(player) = player {
        let ratio = player.hp.max(0) as f32 / player.max_hp.max(1) as f32;
        let hp_color = if ratio <= 0.3 {
            RGB::named(RED)
        } else if ratio <= 0.6 {
            RGB::named(ORANGE)
        } else {
            RGB::named(LIGHT_GREEN)
        };
        ctx.print_color(
            14,
            1,
            hp_color,
            RGB::named(BLACK),
            format!("HP {}/{}", player.hp.max(0), player.max_hp),
        );
        ctx.print_color(
            30,
            1,
            RGB::named(LIGHT_BLUE),
            RGB::named(BLACK),
            format!("Power {}", player.power),
        );
    }
    if let Some(foe) = engaged.first() {
        ctx.print_color(
            44,
            1,
            foe.color,
            RGB::named(BLACK),
            format!("{} {}/{}", foe.name, foe.hp.max(0), foe.max_hp),
        );
    }
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let height = (log.len() as i32).min(5) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(
        2,
        top + 1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Event Log",
    );
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}

pub fn draw_game_over(ctx: &mut BTerm, depth: u32) {
    ctx.print_color_centered(
        20,
        RGB::named(RED),
        RGB::named(BLACK),
        "You have died.",
    );
    ctx.print_color_centered(
        22,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!("You reached depth {depth}. Press R to try again or Esc to quit."),
    );
}
