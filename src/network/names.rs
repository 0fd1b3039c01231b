//! Finite pool of station names, drawn without replacement.
//!
//! Names are consumed for good: removing a station from a line does not give
//! its name back, so two stations never share a name within one document.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DEFAULT_NAMES: &[&str] = &[
    "Aarberg", "Bellevue", "Chambrelien", "Dornach", "Eglisau", "Flamatt", "Gampel",
    "Hergiswil", "Ins", "Jegenstorf", "Kandersteg", "Lyss", "Martigny", "Neuveville",
    "Oberdorf", "Pfäffikon", "Quinten", "Romont", "Sissach", "Thalwil", "Uster",
    "Vallorbe", "Wädenswil", "Yverdon", "Zofingen", "Aigle", "Brugg", "Cossonay",
    "Delémont", "Estavayer", "Frutigen", "Grandson", "Horgen", "Interlaken", "Kerzers",
    "Langnau", "Moudon", "Nyon", "Olten", "Payerne", "Rolle", "Sion", "Thun", "Vevey",
    "Wil", "Zug",
];

#[derive(Debug, Clone)]
pub struct NamePool {
    remaining: Vec<String>,
    rng: StdRng,
}

impl Default for NamePool {
    fn default() -> Self {
        Self::new(DEFAULT_NAMES.iter().map(|n| n.to_string()), StdRng::from_entropy())
    }
}

impl NamePool {
    pub fn new(names: impl IntoIterator<Item = String>, rng: StdRng) -> Self {
        let mut remaining: Vec<String> = names.into_iter().collect();
        remaining.sort();
        remaining.dedup();
        Self { remaining, rng }
    }

    /// Deterministic pool over the built-in names
    pub fn seeded(seed: u64) -> Self {
        Self::new(
            DEFAULT_NAMES.iter().map(|n| n.to_string()),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Take a random name out of the pool.
    pub fn draw(&mut self) -> Option<String> {
        if self.remaining.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.remaining.len());
        Some(self.remaining.swap_remove(index))
    }

    /// Take a specific name out of the pool (used when loading a map).
    pub fn claim(&mut self, name: &str) -> bool {
        match self.remaining.iter().position(|n| n == name) {
            Some(index) => {
                self.remaining.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}
