use egui::{
    Align2, CursorIcon, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2, Widget,
};

use crate::{
    cluster::{abbreviate, ClusterItem},
    events::{Event, EventSink, PayloadClusterClick, PayloadMarkerClick, PayloadViewportChange},
    viewport::{world_size, MAX_LATITUDE, MAX_ZOOM},
    ClusterStyle, EventId, MapSurface, Position, SettingsNavigation, SettingsStyle, Viewport,
};

/// Minimal spacing between graticule lines in pixels.
const GRATICULE_SPACING: f64 = 80.;
const GRATICULE_STEPS: [f64; 12] = [30., 15., 10., 5., 2., 1., 0.5, 0.2, 0.1, 0.05, 0.01, 0.005];
const MAX_GRATICULE_LINES: usize = 200;

/// Widget drawing a [`MapSurface`] for a [`Viewport`].
///
/// It implements [`egui::Widget`] and can be used like any other widget. The
/// viewport is owned by the caller: when the user drags, zooms or clicks a
/// cluster the widget draws the new viewport for the current frame and
/// reports it with [`Event::ViewportChange`] through the sink set with
/// [`MapView::with_event_sink`]. Clicks on single points are reported with
/// [`Event::MarkerClick`]. The world repeats horizontally, so events across
/// the antimeridian are drawn next to the viewport.
pub struct MapView<'a> {
    surface: &'a mut MapSurface,
    viewport: Viewport,
    active: Option<EventId>,

    settings_navigation: SettingsNavigation,
    settings_style: SettingsStyle,

    events_sink: Option<&'a dyn EventSink>,
}

impl Widget for &mut MapView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;

        let mut viewport = self.handle_navigation(ui, &response);

        let style = *self.surface.style();
        painter.rect_filled(rect, 0., self.settings_style.background);
        self.draw_graticule(&painter, rect, &viewport);
        let visible = self.draw_items(&painter, rect, &viewport, &style);

        let hovered = response
            .hover_pos()
            .and_then(|pos| hit_test(&visible, pos));
        if hovered.is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }

        if response.clicked() {
            let clicked = response
                .interact_pointer_pos()
                .and_then(|pos| hit_test(&visible, pos));
            if let Some(item) = clicked {
                viewport = self.handle_click(item, viewport);
            }
        }

        if viewport != self.viewport {
            self.publish(Event::ViewportChange(PayloadViewportChange { viewport }));
            self.viewport = viewport;
        }

        response
    }
}

impl<'a> MapView<'a> {
    pub fn new(surface: &'a mut MapSurface, viewport: Viewport) -> Self {
        Self {
            surface,
            viewport,
            active: None,

            settings_navigation: SettingsNavigation::default(),
            settings_style: SettingsStyle::default(),

            events_sink: None,
        }
    }

    /// Highlights the given event.
    pub fn with_active(mut self, active: Option<EventId>) -> Self {
        self.active = active;
        self
    }

    pub fn with_navigations(mut self, settings_navigation: &SettingsNavigation) -> Self {
        self.settings_navigation = settings_navigation.clone();
        self
    }

    pub fn with_styles(mut self, settings_style: &SettingsStyle) -> Self {
        self.settings_style = settings_style.clone();
        self
    }

    pub fn with_event_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.events_sink = Some(sink);
        self
    }

    /// Viewport after the last frame.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Screen position of `position` inside a map drawn in `rect`.
    pub fn screen_pos(rect: Rect, viewport: &Viewport, position: Position) -> Pos2 {
        let [dx, dy] = viewport.offset_of(position);
        rect.center() + Vec2::new(dx as f32, dy as f32)
    }

    fn publish(&self, event: Event) {
        if let Some(sink) = self.events_sink {
            sink.send(event);
        }
    }

    fn handle_navigation(&self, ui: &Ui, response: &Response) -> Viewport {
        let mut viewport = self.viewport;
        if !self.settings_navigation.zoom_and_pan_enabled {
            return viewport;
        }

        let d = response.drag_delta();
        if response.dragged() && d != Vec2::ZERO {
            viewport = viewport.panned_by([f64::from(d.x), f64::from(d.y)]);
        }

        if !response.contains_pointer() {
            return viewport;
        }

        let (pinch, scroll, pointer) =
            ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta.y, i.pointer.hover_pos()));
        let mut delta = f64::from(scroll) / 100. * self.settings_navigation.zoom_speed;
        if pinch != 1. {
            delta += f64::from(pinch).log2();
        }
        if delta != 0. {
            let anchor = pointer.map_or([0., 0.], |p| {
                let off = p - response.rect.center();
                [f64::from(off.x), f64::from(off.y)]
            });
            viewport = viewport.zoomed_about(delta, anchor);
        }

        viewport
    }

    fn handle_click(&self, item: ClusterItem, viewport: Viewport) -> Viewport {
        match item {
            ClusterItem::Point { id, .. } => {
                self.publish(Event::MarkerClick(PayloadMarkerClick { id }));
                viewport
            }
            ClusterItem::Cluster {
                position,
                point_count,
            } => {
                self.publish(Event::ClusterClick(PayloadClusterClick {
                    position,
                    point_count,
                }));
                let zoom =
                    (viewport.zoom + self.settings_navigation.cluster_click_zoom).min(MAX_ZOOM);
                Viewport::centered_on(position, zoom)
            }
        }
    }

    fn draw_graticule(&self, p: &Painter, rect: Rect, viewport: &Viewport) {
        let px_per_degree = world_size(viewport.zoom) / 360.;
        let step = GRATICULE_STEPS
            .iter()
            .copied()
            .rev()
            .find(|s| s * px_per_degree >= GRATICULE_SPACING)
            .unwrap_or(GRATICULE_STEPS[0]);

        let half = rect.size() / 2.;
        let north_west = viewport.position_at([-f64::from(half.x), -f64::from(half.y)]);
        let south_east = viewport.position_at([f64::from(half.x), f64::from(half.y)]);
        let stroke = Stroke::new(1., self.settings_style.graticule);

        for lng in grid_values(north_west.longitude, south_east.longitude, step) {
            let x = Self::screen_pos(rect, viewport, Position::new(viewport.latitude, lng)).x;
            p.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        }

        let south = south_east.latitude.max(-MAX_LATITUDE);
        let north = north_west.latitude.min(MAX_LATITUDE);
        for lat in grid_values(south, north, step) {
            let y = Self::screen_pos(rect, viewport, Position::new(lat, viewport.longitude)).y;
            p.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        }
    }

    /// Draws clusters, their labels and single points, in that order. Returns
    /// what ended up on screen, in draw order, for hit testing.
    fn draw_items(
        &mut self,
        p: &Painter,
        rect: Rect,
        viewport: &Viewport,
        style: &ClusterStyle,
    ) -> Vec<(Pos2, f32, ClusterItem)> {
        let margin = style.max_radius();
        let bounds = rect.expand(margin);
        let mut clusters = Vec::new();
        let mut points = Vec::new();

        let world = world_size(viewport.zoom) as f32;
        for item in self.surface.items_at(viewport.zoom) {
            let origin = Self::screen_pos(rect, viewport, item.position());
            for pos in world_copies(origin, world, bounds) {
                match item {
                    ClusterItem::Cluster { point_count, .. } => {
                        clusters.push((pos, style.tier(*point_count).1, *item));
                    }
                    ClusterItem::Point { .. } => {
                        points.push((pos, style.point_radius + style.point_stroke_width, *item));
                    }
                }
            }
        }

        for (pos, radius, item) in &clusters {
            let (color, _) = style.tier(item.point_count());
            p.circle_filled(*pos, *radius, color);
            if self.settings_style.cluster_labels {
                p.text(
                    *pos,
                    Align2::CENTER_CENTER,
                    abbreviate(item.point_count()),
                    FontId::proportional(self.settings_style.label_size),
                    egui::Color32::BLACK,
                );
            }
        }

        for (pos, _, item) in &points {
            p.circle_filled(*pos, style.point_radius, style.point_color);
            if style.point_stroke_width > 0. {
                p.circle_stroke(
                    *pos,
                    style.point_radius,
                    Stroke::new(style.point_stroke_width, style.point_stroke_color),
                );
            }
            if let ClusterItem::Point { id, .. } = item {
                if Some(*id) == self.active {
                    p.circle_stroke(
                        *pos,
                        style.point_radius * 1.8,
                        Stroke::new(3., self.settings_style.selection),
                    );
                }
            }
        }

        clusters.extend(points);
        clusters
    }
}

/// Topmost item under `pos`.
fn hit_test(visible: &[(Pos2, f32, ClusterItem)], pos: Pos2) -> Option<ClusterItem> {
    visible
        .iter()
        .rev()
        .find(|(center, radius, _)| center.distance(pos) <= *radius)
        .map(|(_, _, item)| *item)
}

/// Screen positions of `pos` and its copies one world to the west and east
/// that fall inside `bounds`. The map repeats horizontally across the
/// antimeridian.
fn world_copies(pos: Pos2, world: f32, bounds: Rect) -> impl Iterator<Item = Pos2> {
    [0., -world, world]
        .into_iter()
        .map(move |dx| pos + Vec2::new(dx, 0.))
        .filter(move |p| bounds.contains(*p))
}

/// Multiples of `step` within `[from, to]`.
fn grid_values(from: f64, to: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (from / step).ceil() as i64;
    let last = (to / step).floor() as i64;
    (first..=last)
        .take(MAX_GRATICULE_LINES)
        .map(move |i| i as f64 * step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, ClusterConfig, FeatureCollection, HistoricalEvent};
    use egui::{Modifiers, MouseWheelUnit, PointerButton, RawInput};
    use std::cell::RefCell;

    const SCREEN: Vec2 = Vec2::new(800., 600.);

    /// Runs a [`MapView`] in a headless context, frame by frame, keeping the
    /// viewport it reports like a host app would.
    struct Harness {
        ctx: egui::Context,
        surface: MapSurface,
        viewport: Viewport,
        sink: RefCell<Vec<Event>>,
        rect: Rect,
    }

    impl Harness {
        fn new(events: &[HistoricalEvent], viewport: Viewport) -> Self {
            let mut surface = MapSurface::new(ClusterConfig::default(), None).unwrap();
            surface.set_data(FeatureCollection::from_events(events));
            let mut harness = Self {
                ctx: egui::Context::default(),
                surface,
                viewport,
                sink: RefCell::new(Vec::new()),
                rect: Rect::NOTHING,
            };
            harness.frame(Vec::new());
            harness
        }

        fn frame(&mut self, events: Vec<egui::Event>) {
            let input = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, SCREEN)),
                events,
                ..RawInput::default()
            };
            let ctx = self.ctx.clone();
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let mut view = MapView::new(&mut self.surface, self.viewport)
                        .with_event_sink(&self.sink);
                    self.rect = ui.add(&mut view).rect;
                    self.viewport = view.viewport();
                });
            });
        }

        fn click(&mut self, pos: Pos2) {
            self.frame(vec![egui::Event::PointerMoved(pos)]);
            self.frame(vec![button(pos, true)]);
            self.frame(vec![button(pos, false)]);
        }
    }

    fn button(pos: Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    fn event(id: u32, lat: f64, lng: f64) -> HistoricalEvent {
        HistoricalEvent {
            id: EventId(id),
            title: format!("event {id}"),
            description: String::new(),
            position: Position::new(lat, lng),
            category: Category::History,
        }
    }

    #[test]
    fn test_click_on_point_reports_marker() {
        let start = Viewport::new(10., 20., 16.);
        let mut h = Harness::new(&[event(7, 10., 20.)], start);

        let center = h.rect.center();
        h.click(center);

        assert_eq!(
            h.sink.take(),
            vec![Event::MarkerClick(PayloadMarkerClick { id: EventId(7) })]
        );
        assert_eq!(h.viewport, start);
    }

    #[test]
    fn test_click_on_cluster_zooms_in_on_it() {
        let mut h = Harness::new(
            &[event(1, 10., 20.), event(2, 10.000_01, 20.000_01)],
            Viewport::new(10., 20., 5.),
        );
        let items = h.surface.items_at(5.).to_vec();
        let [ClusterItem::Cluster {
            position,
            point_count: 2,
        }] = items[..]
        else {
            panic!("expected a single cluster, got {items:?}");
        };

        let center = h.rect.center();
        h.click(center);

        let expected = Viewport::centered_on(position, 7.);
        assert_eq!(
            h.sink.take(),
            vec![
                Event::ClusterClick(PayloadClusterClick {
                    position,
                    point_count: 2,
                }),
                Event::ViewportChange(PayloadViewportChange { viewport: expected }),
            ]
        );
        assert_eq!(h.viewport, expected);
    }

    #[test]
    fn test_drag_reports_viewport_change() {
        let mut h = Harness::new(&[], Viewport::new(0., 0., 3.));
        let c = h.rect.center();

        h.frame(vec![egui::Event::PointerMoved(c)]);
        h.frame(vec![button(c, true)]);
        h.frame(vec![egui::Event::PointerMoved(c + Vec2::new(30., 0.))]);
        h.frame(vec![egui::Event::PointerMoved(c + Vec2::new(60., 0.))]);
        h.frame(vec![button(c + Vec2::new(60., 0.), false)]);

        let events = h.sink.take();
        assert!(!events.is_empty());
        assert!(events
            .iter()
            .all(|e| matches!(e, Event::ViewportChange(_))));
        let Some(Event::ViewportChange(PayloadViewportChange { viewport })) = events.last() else {
            panic!("expected a viewport change");
        };
        assert_eq!(*viewport, h.viewport);
        assert!(viewport.longitude < 0.);
        assert!(viewport.latitude.abs() < 1e-9);
        assert_eq!(viewport.zoom, 3.);
    }

    #[test]
    fn test_scroll_zooms_in() {
        let mut h = Harness::new(&[], Viewport::new(0., 0., 3.));
        let c = h.rect.center();

        h.frame(vec![egui::Event::PointerMoved(c)]);
        h.frame(vec![egui::Event::MouseWheel {
            unit: MouseWheelUnit::Point,
            delta: Vec2::new(0., 120.),
            modifiers: Modifiers::NONE,
        }]);
        for _ in 0..10 {
            h.frame(Vec::new());
        }

        let events = h.sink.take();
        assert!(!events.is_empty());
        assert!(events
            .iter()
            .all(|e| matches!(e, Event::ViewportChange(_))));
        assert!(h.viewport.zoom > 3.);
    }

    #[test]
    fn test_hover_without_input_reports_nothing() {
        let mut h = Harness::new(&[event(1, 0., 0.)], Viewport::new(0., 0., 16.));
        let c = h.rect.center();
        h.frame(vec![egui::Event::PointerMoved(c)]);
        h.frame(Vec::new());
        assert!(h.sink.take().is_empty());
    }

    #[test]
    fn test_point_across_antimeridian_is_clickable() {
        let mut h = Harness::new(&[event(3, 0., -179.)], Viewport::new(0., 179., 4.));

        let east = (2. / 360. * world_size(4.)) as f32;
        let target = h.rect.center() + Vec2::new(east, 0.);
        h.click(target);

        assert_eq!(
            h.sink.take(),
            vec![Event::MarkerClick(PayloadMarkerClick { id: EventId(3) })]
        );
    }

    #[test]
    fn test_world_copies() {
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(100., 100.));
        let copies: Vec<_> = world_copies(Pos2::new(-462., 50.), 512., bounds).collect();
        assert_eq!(copies, [Pos2::new(50., 50.)]);

        // a small world repeats more than once on screen
        let copies: Vec<_> = world_copies(Pos2::new(40., 50.), 50., bounds).collect();
        assert_eq!(copies, [Pos2::new(40., 50.), Pos2::new(90., 50.)]);
    }

    #[test]
    fn test_grid_values() {
        let v: Vec<_> = grid_values(-25., 31., 10.).collect();
        assert_eq!(v, [-20., -10., 0., 10., 20., 30.]);
        assert_eq!(grid_values(1., 2., 5.).count(), 0);
        assert_eq!(grid_values(-1e9, 1e9, 1.).count(), MAX_GRATICULE_LINES);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let cluster = ClusterItem::Cluster {
            position: Position::default(),
            point_count: 5,
        };
        let point = ClusterItem::Point {
            id: EventId(1),
            position: Position::default(),
        };
        let visible = [(Pos2::new(10., 10.), 20., cluster), (Pos2::new(12., 10.), 9., point)];

        assert_eq!(hit_test(&visible, Pos2::new(12., 12.)), Some(point));
        assert_eq!(hit_test(&visible, Pos2::new(25., 10.)), Some(cluster));
        assert_eq!(hit_test(&visible, Pos2::new(100., 100.)), None);
    }

    #[test]
    fn test_screen_pos_of_center() {
        let rect = Rect::from_min_size(Pos2::new(10., 20.), Vec2::new(200., 100.));
        let viewport = Viewport::new(12., 34., 5.);
        let pos = MapView::screen_pos(rect, &viewport, viewport.center());
        assert_eq!(pos, rect.center());
    }
}
