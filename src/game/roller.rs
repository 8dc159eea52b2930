/// Source of code digits for Mastermind targets. Tests swap in a scripted roller.
pub trait Roller {
    /// Returns a digit in `1..=9`.
    fn roll_digit(&mut self) -> u8;
}

pub struct ThreadRngRoller {
    rng: rand::rngs::ThreadRng,
}

impl ThreadRngRoller {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Roller for ThreadRngRoller {
    fn roll_digit(&mut self) -> u8 {
        use rand::Rng;
        self.rng.random_range(1..=9)
    }
}
