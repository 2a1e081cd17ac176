use std::cell::RefCell;

use history_map::{
    events::{Event, EventSink, PayloadMarkerClick, PayloadViewportChange},
    viewport::FLY_TO_ZOOM,
    Category, CategoryFilter, ClusterConfig, EventGenerator, EventId, EventStore, Favourites,
    FeatureCollection, HistoricalEvent, MapSurface, MemoryStore, Position, Selection, Viewport,
};
use rand::{rngs::StdRng, SeedableRng};

fn five_events() -> EventStore {
    let mut events: Vec<HistoricalEvent> = EventGenerator::new(5)
        .generate_with(&mut StdRng::seed_from_u64(11))
        .events()
        .to_vec();
    events[1].position = Position::new(12.0, 34.0);
    EventStore::new(events)
}

#[test]
fn test_favourites_scenario() {
    let events = five_events();
    let ids: Vec<u32> = events.iter().map(|e| e.id.0).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);

    let mut kv = MemoryStore::new();
    let mut favourites = Favourites::load(&kv);
    favourites.toggle(EventId(3), &mut kv);
    favourites.toggle(EventId(1), &mut kv);
    assert_eq!(favourites.ids(), &[EventId(1), EventId(3)]);

    favourites.toggle(EventId(3), &mut kv);
    assert_eq!(favourites.ids(), &[EventId(1)]);

    // next session
    let reloaded = Favourites::load(&kv);
    assert_eq!(reloaded, favourites);
}

#[test]
fn test_select_from_list_scenario() {
    let events = five_events();
    let mut selection = Selection::default();
    selection.select_from_list(EventId(2), &events);

    assert_eq!(selection.active(), Some(EventId(2)));
    assert_eq!(
        selection.viewport(),
        Viewport {
            latitude: 12.0,
            longitude: 34.0,
            zoom: FLY_TO_ZOOM,
        }
    );
}

#[test]
fn test_stale_favourite_selection_is_ignored() {
    let events = five_events();
    let mut kv = MemoryStore::new();
    let mut favourites = Favourites::default();
    favourites.toggle(EventId(77), &mut kv);
    assert_eq!(favourites.resolve(&events).count(), 0);

    let mut selection = Selection::default();
    let before = selection.clone();
    for &id in favourites.ids() {
        selection.select_from_list(id, &events);
    }
    assert_eq!(selection, before);
}

#[test]
fn test_filter_hides_features_on_surface() {
    let events = EventGenerator::new(500).generate_with(&mut StdRng::seed_from_u64(2));
    let mut surface = MapSurface::new(ClusterConfig::default(), None).expect("valid config");
    let mut filter = CategoryFilter::default();

    surface.set_data(FeatureCollection::from_events_filtered(events.iter(), &filter));
    assert_eq!(surface.features().len(), 500);

    filter.set(Some(Category::Politics));
    surface.set_data(FeatureCollection::from_events_filtered(events.iter(), &filter));
    let expected = events
        .iter()
        .filter(|e| e.category == Category::Politics)
        .count();
    assert_eq!(surface.features().len(), expected);
    assert!(surface
        .features()
        .features
        .iter()
        .all(|f| f.properties.category == Category::Politics));

    let shown: usize = surface.items_at(0.).iter().map(|i| i.point_count()).sum();
    assert_eq!(shown, expected);
}

#[test]
fn test_surface_events_drive_selection() {
    let events = five_events();
    let mut selection = Selection::default();
    let sink = RefCell::new(Vec::new());

    let moved = Viewport::new(1.0, 2.0, 4.0);
    sink.send(Event::ViewportChange(PayloadViewportChange { viewport: moved }));
    sink.send(Event::MarkerClick(PayloadMarkerClick { id: EventId(4) }));

    for event in sink.take() {
        match event {
            Event::MarkerClick(PayloadMarkerClick { id }) => {
                if let Some(e) = events.get(id) {
                    selection.select_from_map(e);
                }
            }
            Event::ViewportChange(PayloadViewportChange { viewport }) => {
                selection.on_viewport_change(viewport);
            }
            Event::ClusterClick(_) => {}
        }
    }

    assert_eq!(selection.active(), Some(EventId(4)));
    assert_eq!(selection.viewport(), moved);

    selection.dismiss();
    assert_eq!(selection.active(), None);
    assert_eq!(selection.viewport(), moved);
}
