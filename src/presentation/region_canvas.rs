use iced::mouse;
use iced::widget::{canvas, container, image, stack};
use iced::{Color, ContentFit, Element, Length, Point, Rectangle, Size};

use crate::core::models::{DrawnRectangle, Region, UploadedImage};

#[derive(Debug, Clone)]
pub enum RegionCanvasMessage {
    RectangleDrawn(DrawnRectangle),
}

/// Reference image with the current regions on top. When drawing is enabled,
/// every finished drag is published as one rectangle in image pixels.
pub struct RegionCanvas {
    image_handle: image::Handle,
    image_width: u32,
    image_height: u32,
    source_name: String,
    regions: Vec<Region>,
    drawing_enabled: bool,
}

#[derive(Debug, Default)]
pub struct DragState {
    start: Option<Point>,
    current: Option<Point>,
}

impl RegionCanvas {
    pub fn build_from_upload(upload: &UploadedImage) -> Option<Self> {
        let (image_width, image_height) = upload.read_dimensions()?;
        log::debug!(
            "[REGION_CANVAS] reference image '{}' is {}x{}",
            upload.file_name,
            image_width,
            image_height
        );

        Some(Self {
            image_handle: image::Handle::from_bytes(upload.bytes.as_ref().clone()),
            image_width,
            image_height,
            source_name: upload.file_name.clone(),
            regions: Vec::new(),
            drawing_enabled: false,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn set_regions(&mut self, regions: Vec<Region>) {
        self.regions = regions;
    }

    pub fn set_drawing_enabled(&mut self, drawing_enabled: bool) {
        self.drawing_enabled = drawing_enabled;
    }

    pub fn render_ui(&self) -> Element<'_, RegionCanvasMessage> {
        let reference_image = image(self.image_handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill);

        let overlay_canvas = canvas(self).width(Length::Fill).height(Length::Fill);

        container(stack![reference_image, overlay_canvas])
            .width(Length::Fill)
            .height(Length::Fixed(420.0))
            .into()
    }

    fn displayed_image_rect(&self, bounds: Size) -> Rectangle {
        fit_image_in_bounds(
            (self.image_width as f32, self.image_height as f32),
            bounds,
        )
    }

    fn build_drawn_rectangle(&self, start: Point, end: Point, bounds: Size) -> DrawnRectangle {
        let viewer_rect = self.displayed_image_rect(bounds);
        let image_size = (self.image_width as f32, self.image_height as f32);

        let image_start = to_image_point(start, viewer_rect, image_size);
        let image_end = to_image_point(end, viewer_rect, image_size);

        DrawnRectangle::new(
            image_start.x,
            image_start.y,
            image_end.x - image_start.x,
            image_end.y - image_start.y,
        )
    }
}

/// Where an image of `image_size` lands inside `bounds` when scaled to fit
/// while keeping its aspect ratio.
pub fn fit_image_in_bounds(image_size: (f32, f32), bounds: Size) -> Rectangle {
    let (image_width, image_height) = image_size;
    if image_width <= 0.0 || image_height <= 0.0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return Rectangle::new(Point::ORIGIN, Size::ZERO);
    }

    let image_aspect = image_width / image_height;
    let bounds_aspect = bounds.width / bounds.height;

    if image_aspect > bounds_aspect {
        let display_height = bounds.width / image_aspect;
        Rectangle::new(
            Point::new(0.0, (bounds.height - display_height) / 2.0),
            Size::new(bounds.width, display_height),
        )
    } else {
        let display_width = bounds.height * image_aspect;
        Rectangle::new(
            Point::new((bounds.width - display_width) / 2.0, 0.0),
            Size::new(display_width, bounds.height),
        )
    }
}

pub fn to_image_point(point: Point, viewer_rect: Rectangle, image_size: (f32, f32)) -> Point {
    if viewer_rect.width <= 0.0 || viewer_rect.height <= 0.0 {
        return point;
    }

    let scale_x = image_size.0 / viewer_rect.width;
    let scale_y = image_size.1 / viewer_rect.height;

    let x = ((point.x - viewer_rect.x) * scale_x).clamp(0.0, image_size.0);
    let y = ((point.y - viewer_rect.y) * scale_y).clamp(0.0, image_size.1);
    Point::new(x, y)
}

fn to_viewer_rect(region: &Region, viewer_rect: Rectangle, image_size: (f32, f32)) -> Rectangle {
    let scale_x = viewer_rect.width / image_size.0;
    let scale_y = viewer_rect.height / image_size.1;

    Rectangle::new(
        Point::new(
            viewer_rect.x + region.left() as f32 * scale_x,
            viewer_rect.y + region.top() as f32 * scale_y,
        ),
        Size::new(
            region.width() as f32 * scale_x,
            region.height() as f32 * scale_y,
        ),
    )
}

impl canvas::Program<RegionCanvasMessage> for RegionCanvas {
    type State = DragState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<RegionCanvasMessage>> {
        if !self.drawing_enabled {
            return None;
        }

        match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                state.start = Some(position);
                state.current = Some(position);
                Some(canvas::Action::request_redraw().and_capture())
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                state.start?;
                state.current = cursor.position_in(bounds).or(state.current);
                Some(canvas::Action::request_redraw())
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let start = state.start.take()?;
                let end = state.current.take().unwrap_or(start);
                let rectangle = self.build_drawn_rectangle(start, end, bounds.size());

                log::debug!("[REGION_CANVAS] drag finished: {:?}", rectangle);
                Some(canvas::Action::publish(RegionCanvasMessage::RectangleDrawn(rectangle)).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<iced::Renderer>> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let viewer_rect = self.displayed_image_rect(bounds.size());
        let image_size = (self.image_width as f32, self.image_height as f32);
        let region_color = Color::from_rgb(0.3, 0.6, 1.0);

        for (index, region) in self.regions.iter().enumerate() {
            let rect = to_viewer_rect(region, viewer_rect, image_size);

            frame.fill_rectangle(rect.position(), rect.size(), Color::from_rgba(0.3, 0.6, 1.0, 0.15));
            frame.stroke(
                &canvas::Path::rectangle(rect.position(), rect.size()),
                canvas::Stroke::default()
                    .with_color(region_color)
                    .with_width(2.0),
            );
            frame.fill_text(canvas::Text {
                content: (index + 1).to_string(),
                position: Point::new(rect.x + 4.0, rect.y + 2.0),
                color: Color::WHITE,
                size: 14.0.into(),
                ..Default::default()
            });
        }

        if let (Some(start), Some(current)) = (state.start, state.current) {
            let top_left = Point::new(start.x.min(current.x), start.y.min(current.y));
            let size = Size::new((start.x - current.x).abs(), (start.y - current.y).abs());

            frame.stroke(
                &canvas::Path::rectangle(top_left, size),
                canvas::Stroke::default()
                    .with_color(Color::from_rgb(1.0, 0.8, 0.2))
                    .with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.drawing_enabled && cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
