use serde::{Deserialize, Serialize};

use super::{LineId, StationId};

/// One stop of a line: the station and the platform the line serves there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub station: StationId,
    pub platform: u32,
}

/// An ordered route through stations. The order defines which stations lie
/// "between" two others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub stops: Vec<Stop>,
    pub palette_index: usize,
    pub train_count: u32,
}

/// Letters for a line id: 0 -> A, 25 -> Z, 26 -> AA, 27 -> AB, ...
pub fn line_name(id: u32) -> String {
    let mut n = id as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

impl Line {
    pub fn new(id: LineId) -> Self {
        Self {
            id,
            stops: Vec::new(),
            palette_index: id.0 as usize,
            train_count: 1,
        }
    }

    pub fn name(&self) -> String {
        line_name(self.id.0)
    }

    pub fn stations(&self) -> impl Iterator<Item = StationId> + '_ {
        self.stops.iter().map(|stop| stop.station)
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.stops.iter().any(|stop| stop.station == station)
    }

    pub fn position_of(&self, station: StationId) -> Option<usize> {
        self.stops.iter().position(|stop| stop.station == station)
    }

    pub fn push(&mut self, station: StationId, platform: u32) {
        self.stops.push(Stop { station, platform });
    }

    /// Remove the first stop at `station`. Returns its index.
    pub fn remove_station(&mut self, station: StationId) -> Option<usize> {
        let index = self.position_of(station)?;
        self.stops.remove(index);
        Some(index)
    }

    /// Replace every stop at `old` with `new`, keeping index and platform.
    /// Returns the index of the first replaced stop.
    pub fn replace_station(&mut self, old: StationId, new: StationId) -> Option<usize> {
        let first = self.position_of(old)?;
        for stop in self.stops.iter_mut().filter(|stop| stop.station == old) {
            stop.station = new;
        }
        Some(first)
    }

    /// Stops from `a` to `b` inclusive, in line order regardless of which of
    /// the two comes first.
    pub fn stops_between(&self, a: StationId, b: StationId) -> Option<&[Stop]> {
        let ia = self.position_of(a)?;
        let ib = self.position_of(b)?;
        let (from, to) = if ia <= ib { (ia, ib) } else { (ib, ia) };
        Some(&self.stops[from..=to])
    }
}
