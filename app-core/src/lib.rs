use eframe::{App, CreationContext};
use egui::{Align2, Id, Pos2, RichText, ScrollArea, Ui};
use history_map::{
    events::{Event, PayloadClusterClick, PayloadMarkerClick, PayloadViewportChange},
    Category, CategoryFilter, EventGenerator, EventId, EventStore, Favourites, FeatureCollection,
    KeyValueStore, MapSurface, MapView, MemoryStore, Selection, SettingsNavigation, SettingsStyle,
    SurfaceError,
};

mod config;
mod storage;

pub use config::{AppConfig, ConfigError, ACCESS_TOKEN_VAR, CONFIG_PATH_VAR, EVENT_COUNT_VAR};
pub use crossbeam::channel::{unbounded, Receiver, Sender};
pub use storage::{EframeReader, EframeStore};

const SIDE_PANEL_WIDTH: f32 = 260.;
/// Gap between the active marker and the bottom edge of its popup.
const POPUP_OFFSET: f32 = 14.;

/// UI intent collected while panels are drawn and applied once per frame,
/// when the storage handle is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleFavourite(EventId),
    SelectFromList(EventId),
    Dismiss,
    SetCategory(Option<Category>),
}

pub struct HistoryMapApp {
    pub events: EventStore,
    pub surface: Result<MapSurface, SurfaceError>,
    pub filter: CategoryFilter,
    pub favourites: Favourites,
    pub selection: Selection,
    pub settings_navigation: SettingsNavigation,
    pub settings_style: SettingsStyle,
    pub event_publisher: Sender<Event>,
    pub event_consumer: Receiver<Event>,

    /// Used when the host offers no persistent storage.
    fallback_store: MemoryStore,
    pending: Vec<Action>,
}

impl HistoryMapApp {
    pub fn new(cc: &CreationContext<'_>, config: &AppConfig) -> Self {
        let favourites = match cc.storage {
            Some(storage) => {
                Favourites::load_with_key(&EframeReader::new(storage), &config.favourites_key)
            }
            None => {
                log::warn!("no persistent storage, favourites last for this session only");
                Favourites::with_key(config.favourites_key.as_str())
            }
        };

        let events = EventGenerator::new(config.event_count).generate();
        log::info!("generated {} events", events.len());

        Self::with_events(config, events, favourites)
    }

    /// Builds the app around an existing store. The surface is initialised
    /// from `config`; a failure is kept and shown instead of the map.
    pub fn with_events(config: &AppConfig, events: EventStore, favourites: Favourites) -> Self {
        let surface = MapSurface::new(config.cluster.clone(), config.access_token.as_deref())
            .map(|mut surface| {
                surface.set_data(FeatureCollection::from_events(events.iter()));
                surface
            })
            .inspect_err(|err| log::error!("map surface unavailable: {err}"));

        let (event_publisher, event_consumer) = unbounded();

        Self {
            events,
            surface,
            filter: CategoryFilter::default(),
            favourites,
            selection: Selection::default(),
            settings_navigation: SettingsNavigation::default(),
            settings_style: SettingsStyle::default(),
            event_publisher,
            event_consumer,
            fallback_store: MemoryStore::new(),
            pending: Vec::new(),
        }
    }

    pub fn apply(&mut self, action: Action, store: &mut dyn KeyValueStore) {
        match action {
            Action::ToggleFavourite(id) => {
                let added = self.favourites.toggle(id, store);
                log::debug!("favourite {id} {}", if added { "added" } else { "removed" });
            }
            Action::SelectFromList(id) => self.selection.select_from_list(id, &self.events),
            Action::Dismiss => self.selection.dismiss(),
            Action::SetCategory(category) => {
                if !self.filter.set(category) {
                    return;
                }
                let hidden = self
                    .selection
                    .active_event(&self.events)
                    .is_some_and(|e| !self.filter.matches(e));
                if hidden {
                    self.selection.dismiss();
                }
                self.refresh_surface();
            }
        }
    }

    pub fn handle_map_event(&mut self, event: Event) {
        match event {
            Event::MarkerClick(PayloadMarkerClick { id }) => match self.events.get(id) {
                Some(e) => self.selection.select_from_map(e),
                None => log::debug!("click on unknown marker {id}"),
            },
            Event::ClusterClick(PayloadClusterClick { point_count, .. }) => {
                log::debug!("expanding cluster of {point_count} events");
            }
            Event::ViewportChange(PayloadViewportChange { viewport }) => {
                self.selection.on_viewport_change(viewport);
            }
        }
    }

    /// Number of events currently handed to the surface.
    pub fn shown_count(&self) -> usize {
        self.surface.as_ref().map_or(0, |s| s.features().len())
    }

    fn refresh_surface(&mut self) {
        if let Ok(surface) = &mut self.surface {
            surface.set_data(FeatureCollection::from_events_filtered(
                self.events.iter(),
                &self.filter,
            ));
            log::debug!(
                "filter {:?} shows {} events",
                self.filter.selected(),
                surface.features().len()
            );
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_consumer.try_recv() {
            self.handle_map_event(event);
        }
    }

    fn apply_pending(&mut self, frame: &mut eframe::Frame) {
        if self.pending.is_empty() {
            return;
        }

        let actions = std::mem::take(&mut self.pending);
        match frame.storage_mut() {
            Some(storage) => {
                let mut store = EframeStore::new(storage);
                for action in actions {
                    self.apply(action, &mut store);
                }
            }
            None => {
                let mut store = std::mem::take(&mut self.fallback_store);
                for action in actions {
                    self.apply(action, &mut store);
                }
                self.fallback_store = store;
            }
        }
    }

    fn ui_top_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.strong("Historical Events");
            ui.separator();

            let current = self.filter.selected();
            let mut selected = current;
            egui::ComboBox::from_id_salt("category_filter")
                .selected_text(selected.map_or("All categories", Category::label))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selected, None, "All categories");
                    for category in Category::ALL {
                        ui.selectable_value(&mut selected, Some(category), category.label());
                    }
                });
            if selected != current {
                self.pending.push(Action::SetCategory(selected));
            }

            ui.label(format!("{} of {} events", self.shown_count(), self.events.len()));
        });
    }

    fn ui_favourites(&mut self, ui: &mut Ui) {
        ui.heading("★ Favourite Events");
        ui.separator();

        if self.favourites.is_empty() {
            ui.weak("No favourites yet. Open an event on the map and press ☆.");
            return;
        }

        let active = self.selection.active();
        ScrollArea::vertical().show(ui, |ui| {
            for event in self.favourites.resolve(&self.events) {
                let clicked = ui
                    .selectable_label(active == Some(event.id), event.title.as_str())
                    .on_hover_text(event.category.label())
                    .clicked();
                if clicked {
                    self.pending.push(Action::SelectFromList(event.id));
                }
            }
        });
    }

    /// Draws the map and returns the screen position of the active event.
    fn ui_map(&mut self, ui: &mut Ui) -> Option<Pos2> {
        let surface = match &mut self.surface {
            Ok(surface) => surface,
            Err(err) => {
                let color = ui.visuals().error_fg_color;
                ui.centered_and_justified(|ui| {
                    let text = RichText::new(format!("Map unavailable: {err}"));
                    ui.label(text.color(color).heading());
                });
                return None;
            }
        };

        let active = self
            .selection
            .active_event(&self.events)
            .filter(|e| self.filter.matches(e));
        let mut view = MapView::new(surface, self.selection.viewport())
            .with_active(active.map(|e| e.id))
            .with_navigations(&self.settings_navigation)
            .with_styles(&self.settings_style)
            .with_event_sink(&self.event_publisher);
        let rect = ui.add(&mut view).rect;

        active
            .map(|e| MapView::screen_pos(rect, &view.viewport(), e.position))
            .filter(|pos| rect.contains(*pos))
    }

    fn ui_popup(&mut self, ctx: &egui::Context, anchor: Pos2) {
        let Some(event) = self.selection.active_event(&self.events) else {
            return;
        };
        let is_favourite = self.favourites.is_favourite(event.id);

        let mut open = true;
        egui::Window::new(event.title.as_str())
            .id(Id::new("event_popup"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .pivot(Align2::CENTER_BOTTOM)
            .fixed_pos(anchor - egui::vec2(0., POPUP_OFFSET))
            .show(ctx, |ui| {
                ui.label(event.description.as_str());
                ui.label(RichText::new(event.category.label()).small().weak());
                let text = if is_favourite { "★ Unfavourite" } else { "☆ Favourite" };
                if ui.button(text).clicked() {
                    self.pending.push(Action::ToggleFavourite(event.id));
                }
            });

        if !open {
            self.pending.push(Action::Dismiss);
        }
    }
}

impl App for HistoryMapApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| self.ui_top_bar(ui));

        egui::SidePanel::right("favourites")
            .default_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| self.ui_favourites(ui));

        let anchor = egui::CentralPanel::default()
            .show(ctx, |ui| self.ui_map(ui))
            .inner;
        if let Some(anchor) = anchor {
            self.ui_popup(ctx, anchor);
        }

        self.drain_events();
        self.apply_pending(frame);
    }
}
