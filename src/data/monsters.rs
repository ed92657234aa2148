use bracket_terminal::prelude::RGB;

#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub wander_chance: f32,
    pub sight: i32,
    pub hp: i32,
    pub power: i32,
}

impl MonsterTemplate {
    pub fn bestiary() -> Vec<Self> {
        vec![
            Self::new("Cave Rat", 'r', RGB::from_u8(170, 140, 110), 0.7, 4, 20, 3),
            Self::new("Kobold", 'k', RGB::from_u8(200, 120, 70), 0.5, 6, 35, 5),
            Self::new(
                "Giant Spider",
                's',
                RGB::from_u8(150, 90, 200),
                0.4,
                5,
                45,
                7,
            ),
            Self::new("Ghoul", 'g', RGB::from_u8(120, 200, 120), 0.3, 8, 60, 9),
        ]
    }

    fn new(
        name: &'static str,
        glyph: char,
        color: RGB,
        wander_chance: f32,
        sight: i32,
        hp: i32,
        power: i32,
    ) -> Self {
        Self {
            name,
            glyph,
            color,
            wander_chance,
            sight,
            hp,
            power,
        }
    }
}
