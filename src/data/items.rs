#[derive(Clone, Debug, PartialEq)]
pub struct ChestReward {
    pub name: &'static str,
    pub effect: RewardEffect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardEffect {
    /// Restores health, never past the maximum.
    Heal { amount: i32 },
    /// Permanent bonus to attack power.
    Sharpen { power: i32 },
}

pub fn chest_rewards() -> Vec<ChestReward> {
    vec![
        ChestReward::new("Healing Draught", RewardEffect::Heal { amount: 25 }),
        ChestReward::new("Bandage Roll", RewardEffect::Heal { amount: 10 }),
        ChestReward::new("Whetstone", RewardEffect::Sharpen { power: 2 }),
    ]
}

impl ChestReward {
    pub const fn new(name: &'static str, effect: RewardEffect) -> Self {
        Self { name, effect }
    }
}
