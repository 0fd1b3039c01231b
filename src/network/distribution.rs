//! Percentage breakdowns attached to areas.
//!
//! A [`Distribution`] always holds every key of its category set and its
//! values never sum above 100. Setting a category clips the new value to what
//! is left; the excess is dropped, never taken from other categories.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A closed set of category keys.
pub trait Category: Copy + Ord + std::fmt::Debug + 'static {
    const ALL: &'static [Self];

    /// Attribute name used in the map file
    fn key(&self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }
}

/// Who lives in an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PopulationCategory {
    Tourist,
    Student,
    Businessman,
    Worker,
    Child,
    Retired,
    Unemployed,
}

impl Category for PopulationCategory {
    const ALL: &'static [Self] = &[
        PopulationCategory::Tourist,
        PopulationCategory::Student,
        PopulationCategory::Businessman,
        PopulationCategory::Worker,
        PopulationCategory::Child,
        PopulationCategory::Retired,
        PopulationCategory::Unemployed,
    ];

    fn key(&self) -> &'static str {
        match self {
            PopulationCategory::Tourist => "tourist",
            PopulationCategory::Student => "student",
            // Spelling is part of the file format
            PopulationCategory::Businessman => "businessmann",
            PopulationCategory::Worker => "worker",
            PopulationCategory::Child => "child",
            PopulationCategory::Retired => "retired",
            PopulationCategory::Unemployed => "unemployed",
        }
    }
}

/// What people travel to an area for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DestinationCategory {
    Work,
    School,
    Shopping,
    Leisure,
    Home,
}

impl Category for DestinationCategory {
    const ALL: &'static [Self] = &[
        DestinationCategory::Work,
        DestinationCategory::School,
        DestinationCategory::Shopping,
        DestinationCategory::Leisure,
        DestinationCategory::Home,
    ];

    fn key(&self) -> &'static str {
        match self {
            DestinationCategory::Work => "work",
            DestinationCategory::School => "school",
            DestinationCategory::Shopping => "shopping",
            DestinationCategory::Leisure => "leisure",
            DestinationCategory::Home => "home",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution<C: Category> {
    values: BTreeMap<C, u8>,
}

impl<C: Category> Default for Distribution<C> {
    fn default() -> Self {
        Self {
            values: C::ALL.iter().map(|c| (*c, 0)).collect(),
        }
    }
}

impl<C: Category> Distribution<C> {
    pub fn get(&self, category: C) -> u8 {
        self.values.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.values.values().map(|v| *v as u32).sum()
    }

    /// Set a category, clipped so the total stays at or below 100.
    /// Returns the value actually stored.
    pub fn set(&mut self, category: C, value: u32) -> u8 {
        let others = self.total() - self.get(category) as u32;
        let stored = value.min(100 - others) as u8;
        self.values.insert(category, stored);
        stored
    }

    pub fn iter(&self) -> impl Iterator<Item = (C, u8)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }
}
