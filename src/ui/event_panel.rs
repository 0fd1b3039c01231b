//! Right side panel: event drafting, the event list, line and area properties.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::{EditorNotice, EditorSession};
use crate::events::{Event, EventDraft, EventError, EventKindTag, PendingSelection};
use crate::network::{
    line_name, AreaId, Category, DestinationCategory, EventId, MapDirtyState, NetworkDocument,
    PopulationCategory, StationId,
};
use crate::theme::ui::{HINT_TEXT, WARNING_TEXT};
use crate::theme::{bevy_to_egui_opaque, line_color, line_color_name};

/// Text fields for rescheduling the selected event.
#[derive(Default)]
pub struct EventEdit {
    event: Option<EventId>,
    start: String,
    end: String,
    peak: String,
}

impl EventEdit {
    /// Reload the fields when the selection changes.
    fn sync(&mut self, event: Option<&Event>) {
        let id = event.map(|e| e.id);
        if self.event == id {
            return;
        }
        self.event = id;
        match event {
            Some(event) => {
                self.start = event.start().to_string();
                self.end = event.end().to_string();
                self.peak = event
                    .kind()
                    .peak()
                    .map(|p| p.peak.clone())
                    .unwrap_or_default();
            }
            None => {
                self.start.clear();
                self.end.clear();
                self.peak.clear();
            }
        }
    }

    /// Push the fields into `event`. On failure the event is unchanged.
    fn apply(&self, event: &mut Event) -> Result<(), EventError> {
        let peak = event.kind().peak().map(|_| self.peak.as_str());
        event.reschedule(&self.start, &self.end, peak)
    }
}

fn station_label(doc: &NetworkDocument, id: Option<StationId>) -> String {
    match id.and_then(|id| doc.station(id)) {
        Some(station) => station.name.clone(),
        None => "-".to_string(),
    }
}

/// Button that arms the next station double-click for one draft field.
fn pick_button(ui: &mut egui::Ui, session: &mut EditorSession, target: PendingSelection, key: &str) {
    let armed = session.pending == target;
    let text = if armed {
        "Double-click a station".to_string()
    } else {
        format!("Pick ({})", key)
    };
    if ui.add(egui::Button::new(text).selected(armed)).clicked() {
        session.pending = if armed {
            PendingSelection::None
        } else {
            target
        };
    }
}

fn draft_ui(ui: &mut egui::Ui, session: &mut EditorSession, doc: &NetworkDocument) -> bool {
    let mut commit = false;

    egui::ComboBox::from_id_salt("event_kind")
        .selected_text(session.draft.kind.label())
        .show_ui(ui, |ui| {
            for tag in EventKindTag::ALL {
                ui.selectable_value(&mut session.draft.kind, tag, tag.label());
            }
        });

    let kind = session.draft.kind;
    let pattern = kind.timestamp_format().pattern();

    egui::Grid::new("event_draft_times")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Start:");
            ui.add(egui::TextEdit::singleline(&mut session.draft.start).hint_text(pattern));
            ui.end_row();
            ui.label("End:");
            ui.add(egui::TextEdit::singleline(&mut session.draft.end).hint_text(pattern));
            ui.end_row();
            if kind.has_peak() {
                ui.label("Peak:");
                ui.add(egui::TextEdit::singleline(&mut session.draft.peak).hint_text(pattern));
                ui.end_row();
                ui.label("Size:");
                ui.add(egui::DragValue::new(&mut session.draft.size));
                ui.end_row();
            }
            if kind == EventKindTag::LineDelay {
                ui.label("Delay (min):");
                ui.add(egui::DragValue::new(&mut session.draft.delay_minutes));
                ui.end_row();
            }
        });

    if kind.has_range() {
        ui.horizontal(|ui| {
            ui.label(format!("From: {}", station_label(doc, session.draft.station_start)));
            pick_button(ui, session, PendingSelection::Start, "1");
        });
        ui.horizontal(|ui| {
            ui.label(format!("To: {}", station_label(doc, session.draft.station_end)));
            pick_button(ui, session, PendingSelection::End, "2");
        });
    }

    if kind.uses_concerned() {
        let names: Vec<String> = session
            .draft
            .concerned
            .iter()
            .map(|id| station_label(doc, Some(*id)))
            .collect();
        let shown = if names.is_empty() {
            "-".to_string()
        } else if kind == EventKindTag::MultipleStationsClosed {
            names.join(", ")
        } else {
            // Single-station kinds use the most recent pick
            names.last().cloned().unwrap_or_default()
        };
        ui.horizontal(|ui| {
            ui.label(format!("Stations: {}", shown));
            pick_button(ui, session, PendingSelection::Concerned, "3");
            if !session.draft.concerned.is_empty() && ui.small_button("Clear").clicked() {
                session.draft.concerned.clear();
            }
        });
    }

    if kind == EventKindTag::TrainHour {
        ui.horizontal(|ui| {
            ui.label("Line:");
            let selected = session
                .draft
                .line
                .map(|l| line_name(l.0))
                .unwrap_or_else(|| "-".to_string());
            egui::ComboBox::from_id_salt("event_line")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for line in doc.lines() {
                        ui.selectable_value(&mut session.draft.line, Some(line.id), line.name());
                    }
                });
            ui.label("Trains:");
            ui.add(egui::DragValue::new(&mut session.draft.train_number).range(1..=99));
        });
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        if ui.button("Add event").clicked() {
            commit = true;
        }
        if ui.button("Reset").clicked() {
            session.draft = EventDraft {
                kind,
                ..Default::default()
            };
            session.pending = PendingSelection::None;
        }
    });

    commit
}

fn events_list_ui(
    ui: &mut egui::Ui,
    session: &mut EditorSession,
    doc: &mut NetworkDocument,
    edited: &mut bool,
) {
    if doc.events().is_empty() {
        ui.label(egui::RichText::new("No events").color(HINT_TEXT));
        return;
    }

    let mut to_remove = None;
    for event in doc.events() {
        ui.horizontal(|ui| {
            let selected = session.selected_event == Some(event.id);
            let text = format!(
                "{} {} .. {}",
                event.kind().tag().label(),
                event.start(),
                event.end()
            );
            if ui.selectable_label(selected, text).clicked() {
                session.selected_event = if selected { None } else { Some(event.id) };
            }
            if ui.small_button("x").on_hover_text("Delete event").clicked() {
                to_remove = Some(event.id);
            }
        });
    }

    if let Some(id) = to_remove
        && doc.remove_event(id).is_some()
    {
        if session.selected_event == Some(id) {
            session.selected_event = None;
        }
        *edited = true;
        info!("Removed {}", id);
    }
}

/// Returns true when the user asked to apply the fields.
fn event_edit_ui(ui: &mut egui::Ui, edit: &mut EventEdit, event: &Event) -> bool {
    let pattern = event.window().format().pattern();
    let mut apply = false;

    ui.label(egui::RichText::new(format!("Edit {}", event.id)).strong());
    egui::Grid::new("event_edit").num_columns(2).show(ui, |ui| {
        ui.label("Start:");
        ui.add(egui::TextEdit::singleline(&mut edit.start).hint_text(pattern));
        ui.end_row();
        ui.label("End:");
        ui.add(egui::TextEdit::singleline(&mut edit.end).hint_text(pattern));
        ui.end_row();
        if event.kind().peak().is_some() {
            ui.label("Peak:");
            ui.add(egui::TextEdit::singleline(&mut edit.peak).hint_text(pattern));
            ui.end_row();
        }
    });
    if ui.button("Apply").clicked() {
        apply = true;
    }
    apply
}

fn lines_ui(ui: &mut egui::Ui, doc: &mut NetworkDocument, edited: &mut bool) {
    if doc.lines().is_empty() {
        ui.label(egui::RichText::new("No lines").color(HINT_TEXT));
        return;
    }

    let mut changes = Vec::new();
    for line in doc.lines() {
        ui.horizontal(|ui| {
            let swatch = bevy_to_egui_opaque(line_color(line.palette_index));
            ui.colored_label(swatch, "\u{25A0}")
                .on_hover_text(line_color_name(line.palette_index));
            ui.label(format!("{} ({} stops)", line.name(), line.stops.len()));
            let mut trains = line.train_count;
            if ui
                .add(egui::DragValue::new(&mut trains).range(1..=99).suffix(" trains"))
                .changed()
            {
                changes.push((line.id, trains));
            }
        });
    }
    for (line, trains) in changes {
        if doc.set_train_count(line, trains).is_ok() {
            *edited = true;
        }
    }
}

fn category_editor<C: Category>(
    ui: &mut egui::Ui,
    values: impl Iterator<Item = (C, u8)>,
    changes: &mut Vec<(C, u32)>,
) {
    for (category, value) in values {
        ui.horizontal(|ui| {
            let mut percent = value as u32;
            ui.label(category.key());
            if ui
                .add(egui::DragValue::new(&mut percent).range(0..=100).suffix("%"))
                .changed()
            {
                changes.push((category, percent));
            }
        });
    }
}

fn areas_ui(ui: &mut egui::Ui, doc: &mut NetworkDocument, edited: &mut bool) {
    if doc.areas().is_empty() {
        ui.label(egui::RichText::new("No areas").color(HINT_TEXT));
        return;
    }

    let mut population: Vec<(AreaId, Vec<(PopulationCategory, u32)>)> = Vec::new();
    let mut destination: Vec<(AreaId, Vec<(DestinationCategory, u32)>)> = Vec::new();
    for area in doc.areas() {
        egui::CollapsingHeader::new(format!("Area {}", area.id.0))
            .id_salt(("area", area.id.0))
            .show(ui, |ui| {
                let mut pop_changes = Vec::new();
                let mut dest_changes = Vec::new();
                ui.label(
                    egui::RichText::new(format!("Population ({}%)", area.population.total()))
                        .strong(),
                );
                category_editor(ui, area.population.iter(), &mut pop_changes);
                ui.label(
                    egui::RichText::new(format!("Destination ({}%)", area.destination.total()))
                        .strong(),
                );
                category_editor(ui, area.destination.iter(), &mut dest_changes);
                population.push((area.id, pop_changes));
                destination.push((area.id, dest_changes));
            });
    }

    for (area, changes) in population {
        for (category, value) in changes {
            if let Ok(stored) = doc.set_area_population(area, category, value) {
                *edited = true;
                if stored as u32 != value {
                    debug!("{} {} clipped to {}", area, category.key(), stored);
                }
            }
        }
    }
    for (area, changes) in destination {
        for (category, value) in changes {
            if let Ok(stored) = doc.set_area_destination(area, category, value) {
                *edited = true;
                if stored as u32 != value {
                    debug!("{} {} clipped to {}", area, category.key(), stored);
                }
            }
        }
    }
}

/// Side panel for events and network properties
pub fn event_panel_ui(
    mut contexts: EguiContexts,
    mut session: ResMut<EditorSession>,
    mut doc: ResMut<NetworkDocument>,
    mut dirty: ResMut<MapDirtyState>,
    mut notice: ResMut<EditorNotice>,
    mut edit: Local<EventEdit>,
) -> Result {
    let mut commit = false;
    let mut apply_edit = false;
    let mut edited = false;

    egui::SidePanel::right("event_panel")
        .default_width(300.0)
        .resizable(true)
        .show(contexts.ctx_mut()?, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("New Event");
                ui.add_space(4.0);
                commit = draft_ui(ui, &mut session, &doc);
                if session.pending != PendingSelection::None {
                    ui.label(
                        egui::RichText::new("Double-click a station on the map").color(WARNING_TEXT),
                    );
                }

                ui.separator();
                ui.heading("Events");
                events_list_ui(ui, &mut session, &mut doc, &mut edited);
                edit.sync(session.selected_event.and_then(|id| doc.event(id)));
                if let Some(event) = session.selected_event.and_then(|id| doc.event(id)) {
                    ui.add_space(4.0);
                    apply_edit = event_edit_ui(ui, &mut edit, event);
                }

                ui.separator();
                ui.heading("Lines");
                lines_ui(ui, &mut doc, &mut edited);

                ui.separator();
                ui.heading("Areas");
                areas_ui(ui, &mut doc, &mut edited);
            });
        });

    if commit {
        match doc.commit_draft(&session.draft) {
            Ok(id) => {
                info!("Added {} ({})", id, session.draft.kind.label());
                session.selected_event = Some(id);
                session.draft = EventDraft {
                    kind: session.draft.kind,
                    ..Default::default()
                };
                edited = true;
            }
            Err(e) => {
                warn!("Event rejected: {}", e);
                notice.show(format!("Event rejected: {}", e));
            }
        }
    }

    if apply_edit
        && let Some(event) = edit.event.and_then(|id| doc.event_mut(id))
    {
        match edit.apply(event) {
            Ok(()) => {
                info!("Rescheduled {}", event.id);
                edited = true;
            }
            Err(e) => {
                warn!("Event change rejected: {}", e);
                notice.show(format!("Event change rejected: {}", e));
            }
        }
    }

    if edited {
        dirty.mark();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Viewport;
    use bevy::math::IVec2;

    #[test]
    fn test_station_label_falls_back_to_dash() {
        let mut doc = NetworkDocument::new(Viewport::default());
        let id = doc.add_station(IVec2::new(100, 100)).unwrap();
        let name = doc.station(id).unwrap().name.clone();

        assert_eq!(station_label(&doc, Some(id)), name);
        assert_eq!(station_label(&doc, None), "-");
        assert_eq!(station_label(&doc, Some(StationId(99))), "-");
    }

    fn doc_with_peak_event() -> (NetworkDocument, EventId) {
        let mut doc = NetworkDocument::new(Viewport::default());
        let station = doc.add_station(IVec2::new(100, 100)).unwrap();
        let draft = EventDraft {
            kind: EventKindTag::AttendancePeak,
            start: "2024/01/10-08:00".to_string(),
            end: "2024/01/10-10:00".to_string(),
            peak: "2024/01/10-09:00".to_string(),
            size: 200,
            concerned: vec![station],
            ..Default::default()
        };
        let id = doc.commit_draft(&draft).unwrap();
        (doc, id)
    }

    #[test]
    fn test_event_edit_loads_selected_event() {
        let (doc, id) = doc_with_peak_event();
        let mut edit = EventEdit::default();

        edit.sync(doc.event(id));
        assert_eq!(edit.start, "2024/01/10-08:00");
        assert_eq!(edit.peak, "2024/01/10-09:00");

        // Same selection keeps what the user typed
        edit.start = "2024/01/10-07:00".to_string();
        edit.sync(doc.event(id));
        assert_eq!(edit.start, "2024/01/10-07:00");

        edit.sync(None);
        assert!(edit.start.is_empty());
    }

    #[test]
    fn test_event_edit_apply_keeps_event_on_error() {
        let (mut doc, id) = doc_with_peak_event();
        let mut edit = EventEdit::default();
        edit.sync(doc.event(id));

        edit.end = "2024/01/10-07:00".to_string();
        let event = doc.event_mut(id).unwrap();
        assert!(edit.apply(event).is_err());
        assert_eq!(event.end(), "2024/01/10-10:00");

        edit.end = "2024/01/10-11:00".to_string();
        edit.peak = "2024/01/10-10:30".to_string();
        edit.apply(event).unwrap();
        assert_eq!(event.end(), "2024/01/10-11:00");
        assert_eq!(event.kind().peak().unwrap().peak, "2024/01/10-10:30");
    }
}
