/// Simplified site map
/// Draws imagery overlays and status-coloured sign markers on a grid,
/// positioned by linear projection of the site bounds.
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, LineDash, Path, Stroke, Text};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Size, Theme};

use crate::map::projection::MapBounds;
use crate::state::data::{ImageryLayer, SignId, SignInstance, SignStatus};
use crate::state::catalog::CatalogStore;
use crate::ui::style;
use crate::Message;

const MARKER_RADIUS: f32 = 8.0;
const GRID_SPACING: f32 = 20.0;
const OVERLAY_INSET: f32 = 16.0;

#[derive(Debug, Clone)]
struct Marker {
    id: SignId,
    lat: f64,
    lng: f64,
    status: SignStatus,
    selected: bool,
}

#[derive(Debug, Clone)]
struct Overlay {
    name: String,
    opacity: f32,
    /// "size • filename" when the layer has file metadata
    caption: Option<String>,
}

/// Snapshot of everything the map needs for one frame
#[derive(Debug, Clone)]
pub struct SiteMap {
    bounds: MapBounds,
    markers: Vec<Marker>,
    overlays: Vec<Overlay>,
}

impl SiteMap {
    pub fn new<'a>(
        bounds: MapBounds,
        signs: &[SignInstance],
        layers: impl Iterator<Item = &'a ImageryLayer>,
        selected: Option<SignId>,
    ) -> Self {
        let markers = signs
            .iter()
            .map(|s| Marker {
                id: s.id,
                lat: s.lat,
                lng: s.lng,
                status: s.status,
                selected: selected == Some(s.id),
            })
            .collect();

        let overlays = layers
            .map(|l| Overlay {
                name: l.name.clone(),
                opacity: l.opacity,
                caption: l
                    .metadata
                    .as_ref()
                    .map(|m| format!("{} • {}", m.size, m.filename)),
            })
            .collect();

        Self { bounds, markers, overlays }
    }

    fn marker_position(&self, marker: &Marker, size: Size) -> Point {
        let (x, y) = self
            .bounds
            .project(marker.lat, marker.lng)
            .to_pixels(size.width, size.height);
        Point::new(x, y)
    }

    /// Marker under the cursor, if any (topmost wins)
    fn hit(&self, cursor: Point, size: Size) -> Option<SignId> {
        self.markers
            .iter()
            .rev()
            .find(|m| self.marker_position(m, size).distance(cursor) <= MARKER_RADIUS + 2.0)
            .map(|m| m.id)
    }
}

/// Tooltip-style caption for a marker
pub fn marker_title(catalog: &CatalogStore, sign: &SignInstance) -> String {
    format!("{} - {}", catalog.resolve_name(sign.sign_type_id), sign.status)
}

fn label(content: String, position: Point, color: Color) -> Text {
    Text {
        content,
        position,
        color,
        size: Pixels(12.0),
        ..Text::default()
    }
}

impl canvas::Program<Message> for SiteMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let size = bounds.size();

        // Background
        frame.fill_rectangle(Point::ORIGIN, size, Color::from_rgb(0.88, 0.95, 0.91));

        // Grid
        let grid_color = Color::from_rgba(0.0, 0.0, 0.0, 0.06);
        let mut grid = canvas::path::Builder::new();
        let mut x = 0.0;
        while x <= size.width {
            grid.move_to(Point::new(x, 0.0));
            grid.line_to(Point::new(x, size.height));
            x += GRID_SPACING;
        }
        let mut y = 0.0;
        while y <= size.height {
            grid.move_to(Point::new(0.0, y));
            grid.line_to(Point::new(size.width, y));
            y += GRID_SPACING;
        }
        frame.stroke(&grid.build(), Stroke::default().with_color(grid_color).with_width(1.0));

        // Imagery overlays (file content is not rendered, only its footprint)
        let overlay_origin = Point::new(OVERLAY_INSET, OVERLAY_INSET);
        let overlay_size = Size::new(
            (size.width - 2.0 * OVERLAY_INSET).max(0.0),
            (size.height - 2.0 * OVERLAY_INSET).max(0.0),
        );
        for overlay in &self.overlays {
            let tint = Color { a: overlay.opacity * 0.2, ..style::ACCENT };
            frame.fill_rectangle(overlay_origin, overlay_size, tint);
            frame.stroke(
                &Path::rectangle(overlay_origin, overlay_size),
                Stroke {
                    line_dash: LineDash { segments: &[6.0, 4.0], offset: 0 },
                    ..Stroke::default().with_color(style::ACCENT).with_width(2.0)
                },
            );
            frame.fill_text(label(
                overlay.name.clone(),
                Point::new(overlay_origin.x + 8.0, overlay_origin.y + 8.0),
                style::ACCENT,
            ));
            if let Some(caption) = &overlay.caption {
                frame.fill_text(label(
                    caption.clone(),
                    Point::new(overlay_origin.x + 8.0, overlay_origin.y + overlay_size.height - 22.0),
                    Color::from_rgb(0.3, 0.3, 0.3),
                ));
            }
        }

        // Corner coordinates
        let text_color = Color::from_rgb(0.3, 0.3, 0.3);
        frame.fill_text(label(
            format!("{:.4}, {:.4}", self.bounds.max_lat, self.bounds.min_lng),
            Point::new(4.0, 2.0),
            text_color,
        ));
        frame.fill_text(label(
            format!("{:.4}, {:.4}", self.bounds.min_lat, self.bounds.max_lng),
            Point::new(size.width - 110.0, size.height - 16.0),
            text_color,
        ));

        // Markers
        for marker in &self.markers {
            let center = self.marker_position(marker, size);
            let radius = if marker.selected { MARKER_RADIUS + 2.0 } else { MARKER_RADIUS };
            let circle = Path::circle(center, radius);
            frame.fill(&circle, style::status_color(marker.status));
            frame.stroke(&circle, Stroke::default().with_color(Color::WHITE).with_width(2.0));
        }

        // Site centre
        let site_center = self.bounds.center();
        let (cx, cy) = self
            .bounds
            .project(site_center.lat, site_center.lng)
            .to_pixels(size.width, size.height);
        let center_dot = Path::circle(Point::new(cx, cy), 5.0);
        frame.fill(&center_dot, style::ACCENT);
        frame.stroke(&center_dot, Stroke::default().with_color(Color::WHITE).with_width(2.0));

        frame.fill_text(label(
            "Site view (UTM: 516689, 4363463)".to_string(),
            Point::new(OVERLAY_INSET + 8.0, size.height - 16.0),
            text_color,
        ));

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if let canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
            if let Some(position) = cursor.position_in(bounds) {
                if let Some(id) = self.hit(position, bounds.size()) {
                    return (canvas::event::Status::Captured, Some(Message::SignSelected(id)));
                }
            }
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        match cursor.position_in(bounds) {
            Some(position) if self.hit(position, bounds.size()).is_some() => mouse::Interaction::Pointer,
            _ => mouse::Interaction::default(),
        }
    }
}
