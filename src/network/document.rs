use bevy::prelude::*;

use crate::common::BorderSide;
use crate::constants::AREA_BORDER_MARGIN;
use crate::events::{Event, EventDraft};
use crate::geo::{clamp_step, Viewport};

use super::area::{Area, AreaRect};
use super::distribution::{DestinationCategory, PopulationCategory};
use super::line::Line;
use super::names::NamePool;
use super::station::Station;
use super::{AreaId, EventId, LineId, NetworkError, StationId};

/// One open network: the viewport it is seen through and every entity in it.
///
/// Entities are kept in creation order; ids are never reused. Stations are
/// never removed from the registry, only from lines.
#[derive(Resource, Debug, Clone, Default)]
pub struct NetworkDocument {
    pub viewport: Viewport,
    stations: Vec<Station>,
    lines: Vec<Line>,
    areas: Vec<Area>,
    events: Vec<Event>,
    next_station_id: u32,
    next_line_id: u32,
    next_area_id: u32,
    next_event_id: u32,
    names: NamePool,
}

impl NetworkDocument {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn with_names(viewport: Viewport, names: NamePool) -> Self {
        Self {
            viewport,
            names,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.lines.is_empty() && self.areas.is_empty()
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.stations.iter_mut().find(|s| s.id == id)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    fn area_mut(&mut self, id: AreaId) -> Option<&mut Area> {
        self.areas.iter_mut().find(|a| a.id == id)
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// First line, in creation order, that stops at `station`.
    pub fn owning_line(&self, station: StationId) -> Option<LineId> {
        self.lines.iter().find(|l| l.contains(station)).map(|l| l.id)
    }

    /// Lines that stop at `station`, in creation order.
    pub fn lines_through(&self, station: StationId) -> impl Iterator<Item = &Line> + '_ {
        self.lines.iter().filter(move |l| l.contains(station))
    }

    /// Stations from `a` to `b` inclusive along the first line serving both.
    pub fn stations_between(&self, a: StationId, b: StationId) -> Vec<StationId> {
        self.lines
            .iter()
            .find_map(|l| l.stops_between(a, b))
            .map(|stops| stops.iter().map(|s| s.station).collect())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Stations
    // ------------------------------------------------------------------

    /// Create a station at a window pixel with a fresh name from the pool.
    pub fn add_station(&mut self, pixel: IVec2) -> Result<StationId, NetworkError> {
        let id = StationId(self.next_station_id);
        let next = id_after(id.0, "station")?;
        let name = self.names.draw().ok_or(NetworkError::NamePoolExhausted)?;
        self.next_station_id = next;

        let mut station = Station::at_pixel(id, name, pixel, &self.viewport);
        station.area = self.area_containing(station.pixel);
        debug!("Added {} '{}' at {:?}", id, station.name, pixel);
        self.stations.push(station);
        Ok(id)
    }

    /// Insert a fully formed station (map loading). Its name is taken out of
    /// the pool and the id counter moves past its id.
    pub fn insert_station(&mut self, station: Station) -> Result<(), NetworkError> {
        if self.station(station.id).is_some() {
            return Err(NetworkError::DuplicateId {
                kind: "station",
                id: station.id.0,
            });
        }
        self.next_station_id = self.next_station_id.max(id_after(station.id.0, "station")?);
        self.names.claim(&station.name);
        self.stations.push(station);
        Ok(())
    }

    /// Move a station on screen, clamped to the window. Returns the delta
    /// actually applied.
    pub fn move_station(&mut self, id: StationId, delta: IVec2) -> Option<IVec2> {
        let viewport = self.viewport;
        let station = self.station_mut(id)?;
        let applied = viewport.clamp_delta(station.pixel, delta);
        station.move_by(applied, &viewport);
        Some(applied)
    }

    // ------------------------------------------------------------------
    // Lines
    // ------------------------------------------------------------------

    pub fn create_line(&mut self) -> Result<LineId, NetworkError> {
        let id = LineId(self.next_line_id);
        self.next_line_id = id_after(id.0, "line")?;
        self.lines.push(Line::new(id));
        debug!("Created {} ({})", id, super::line_name(id.0));
        Ok(id)
    }

    pub fn insert_line(&mut self, line: Line) -> Result<(), NetworkError> {
        if self.line(line.id).is_some() {
            return Err(NetworkError::DuplicateId {
                kind: "line",
                id: line.id.0,
            });
        }
        self.next_line_id = self.next_line_id.max(id_after(line.id.0, "line")?);
        self.lines.push(line);
        Ok(())
    }

    pub fn append_to_line(
        &mut self,
        line: LineId,
        station: StationId,
        platform: u32,
    ) -> Result<(), NetworkError> {
        if self.station(station).is_none() {
            return Err(NetworkError::UnknownStation(station));
        }
        let target = self.line_mut(line).ok_or(NetworkError::UnknownLine(line))?;
        target.push(station, platform);
        Ok(())
    }

    pub fn set_train_count(&mut self, line: LineId, trains: u32) -> Result<(), NetworkError> {
        let target = self.line_mut(line).ok_or(NetworkError::UnknownLine(line))?;
        target.train_count = trains;
        Ok(())
    }

    /// Take `station` off its owning line. The station itself stays in the
    /// registry and its name is not returned to the pool.
    pub fn remove_from_owning_line(&mut self, station: StationId) -> Option<(LineId, usize)> {
        let line_id = self.owning_line(station)?;
        let index = self.line_mut(line_id)?.remove_station(station)?;
        debug!("Removed {} from {} at index {}", station, line_id, index);
        Some((line_id, index))
    }

    /// Swap `old` for `new` inside one line, keeping the stop index.
    pub fn replace_in_line(
        &mut self,
        line: LineId,
        old: StationId,
        new: StationId,
    ) -> Option<usize> {
        self.line_mut(line)?.replace_station(old, new)
    }

    // ------------------------------------------------------------------
    // Areas
    // ------------------------------------------------------------------

    pub fn add_area(&mut self, rect: AreaRect) -> Result<AreaId, NetworkError> {
        let id = AreaId(self.next_area_id);
        let next = id_after(id.0, "area")?;
        let area = Area::new(id, rect, &self.viewport)?;
        self.next_area_id = next;
        self.areas.push(area);
        self.refresh_station_areas();
        debug!("Added {} at {:?}", id, rect);
        Ok(id)
    }

    pub fn insert_area(&mut self, area: Area) -> Result<(), NetworkError> {
        if self.area(area.id).is_some() {
            return Err(NetworkError::DuplicateId {
                kind: "area",
                id: area.id.0,
            });
        }
        self.next_area_id = self.next_area_id.max(id_after(area.id.0, "area")?);
        self.areas.push(area);
        Ok(())
    }

    /// Move an area, clamping its top-left corner to the window. Returns the
    /// delta actually applied.
    pub fn move_area(&mut self, id: AreaId, delta: IVec2) -> Option<IVec2> {
        let viewport = self.viewport;
        let area = self.area_mut(id)?;
        let applied = viewport.clamp_delta(area.rect.top_left(), delta);
        area.move_by(applied, &viewport);
        Some(applied)
    }

    /// Drag one edge of an area. The edge stays inside the window and the
    /// opposite edge does not move. A step that would shrink the area below
    /// its minimum size is rejected and leaves the area unchanged.
    pub fn extend_area(
        &mut self,
        id: AreaId,
        side: BorderSide,
        delta: IVec2,
    ) -> Result<IVec2, NetworkError> {
        let viewport = self.viewport;
        let area = self.area_mut(id).ok_or(NetworkError::UnknownArea(id))?;
        let edge = area.edge(side);
        let applied = if side.is_horizontal_axis() {
            IVec2::new(clamp_step(edge, delta.x, viewport.width), 0)
        } else {
            IVec2::new(0, clamp_step(edge, delta.y, viewport.height))
        };
        area.extend(side, applied, &viewport)?;
        Ok(applied)
    }

    pub fn set_area_population(
        &mut self,
        id: AreaId,
        category: PopulationCategory,
        value: u32,
    ) -> Result<u8, NetworkError> {
        let area = self.area_mut(id).ok_or(NetworkError::UnknownArea(id))?;
        Ok(area.population.set(category, value))
    }

    pub fn set_area_destination(
        &mut self,
        id: AreaId,
        category: DestinationCategory,
        value: u32,
    ) -> Result<u8, NetworkError> {
        let area = self.area_mut(id).ok_or(NetworkError::UnknownArea(id))?;
        Ok(area.destination.set(category, value))
    }

    /// Last area, in creation order, whose interior contains `pixel`.
    fn area_containing(&self, pixel: IVec2) -> Option<AreaId> {
        self.areas
            .iter()
            .rev()
            .find(|a| a.rect.interior_contains(pixel, AREA_BORDER_MARGIN))
            .map(|a| a.id)
    }

    /// Recompute every station's area back-reference from current pixels.
    pub fn refresh_station_areas(&mut self) {
        let assignments: Vec<Option<AreaId>> = self
            .stations
            .iter()
            .map(|s| self.area_containing(s.pixel))
            .collect();
        for (station, area) in self.stations.iter_mut().zip(assignments) {
            station.area = area;
        }
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    /// Re-derive every pixel position from the stored geo positions.
    pub fn resync(&mut self) {
        let viewport = self.viewport;
        for station in &mut self.stations {
            station.sync_pixel(&viewport);
        }
        for area in &mut self.areas {
            area.sync_pixel(&viewport);
        }
    }

    /// Shift the whole network on screen by panning the map underneath it.
    pub fn pan_all(&mut self, delta: IVec2) {
        self.viewport.pan_by_pixels(delta);
        self.resync();
    }

    pub fn zoom_by(&mut self, steps: i32, anchor: IVec2) -> bool {
        let changed = self.viewport.zoom_by(steps, anchor);
        if changed {
            self.resync();
        }
        changed
    }

    pub fn zoom_in_at(&mut self, pixel: IVec2) -> bool {
        let changed = self.viewport.zoom_in_at(pixel);
        if changed {
            self.resync();
        }
        changed
    }

    pub fn resize_viewport(&mut self, width: i32, height: i32) {
        if self.viewport.width == width && self.viewport.height == height {
            return;
        }
        self.viewport.resize(width, height);
        self.resync();
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn next_event_id(&self) -> EventId {
        EventId(self.next_event_id)
    }

    /// Validate a draft and add the resulting event.
    pub fn commit_draft(&mut self, draft: &EventDraft) -> Result<EventId, NetworkError> {
        let event = draft.build(self.next_event_id())?;
        let id = event.id;
        self.insert_event(event)?;
        debug!("Committed {} ({})", id, draft.kind.label());
        Ok(id)
    }

    pub fn insert_event(&mut self, event: Event) -> Result<(), NetworkError> {
        if self.event(event.id).is_some() {
            return Err(NetworkError::DuplicateId {
                kind: "event",
                id: event.id.0,
            });
        }
        self.next_event_id = self.next_event_id.max(id_after(event.id.0, "event")?);
        self.events.push(event);
        Ok(())
    }

    pub fn remove_event(&mut self, id: EventId) -> Option<Event> {
        let index = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(index))
    }

    pub fn event_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == id)
    }
}

/// Counter value after `id`. The last u32 is never handed out so the counter
/// cannot wrap onto ids already in use.
fn id_after(id: u32, kind: &'static str) -> Result<u32, NetworkError> {
    id.checked_add(1)
        .filter(|next| *next < u32::MAX)
        .ok_or(NetworkError::IdOutOfRange { kind, id })
}
