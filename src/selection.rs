use crate::{viewport::FLY_TO_ZOOM, EventId, EventStore, HistoricalEvent, Viewport};

/// Tracks the single active event and the map viewport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    active: Option<EventId>,
    viewport: Viewport,
}

impl Selection {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            active: None,
            viewport,
        }
    }

    pub fn active(&self) -> Option<EventId> {
        self.active
    }

    pub fn active_event<'a>(&self, events: &'a EventStore) -> Option<&'a HistoricalEvent> {
        self.active.and_then(|id| events.get(id))
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Marker click on the map. The viewport stays where the user left it.
    pub fn select_from_map(&mut self, event: &HistoricalEvent) {
        self.active = Some(event.id);
    }

    /// Selection from the favourites list: activates the event and flies to it.
    ///
    /// Unknown ids come from stale UI state and are ignored.
    pub fn select_from_list(&mut self, id: EventId, events: &EventStore) {
        let Some(event) = events.get(id) else {
            log::debug!("ignoring selection of unknown event {id}");
            return;
        };

        self.active = Some(event.id);
        self.viewport = Viewport::centered_on(event.position, FLY_TO_ZOOM);
    }

    /// Popup closed.
    pub fn dismiss(&mut self) {
        self.active = None;
    }

    /// Pan or zoom reported by the map surface.
    pub fn on_viewport_change(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
