use iced::canvas::{path, Frame, Stroke};
use iced::{Color, Point, Size};

use crate::error::{Error, Result};

/// Something the host can hand out as a drawing target.
pub trait Surface {
    fn id(&self) -> &str;
    fn is_drawable(&self) -> bool;
    fn size(&self) -> Size;
}

pub enum SurfaceRef<'a, S> {
    Id(&'a str),
    Handle(&'a S),
}

pub fn resolve<'a, S: Surface>(target: SurfaceRef<'a, S>, surfaces: &'a [S]) -> Result<&'a S> {
    let (name, found) = match target {
        SurfaceRef::Id(id) => (id.to_string(), surfaces.iter().find(|s| s.id() == id)),
        SurfaceRef::Handle(surface) => (surface.id().to_string(), Some(surface)),
    };
    match found {
        Some(surface) if surface.is_drawable() => Ok(surface),
        _ => Err(Error::InvalidSurface(name)),
    }
}

/// Paint primitives for one frame. Circles and lines go into a single path
/// which is stroked once and optionally filled.
pub trait DrawSurface {
    fn clear(&mut self);
    fn fill_background(&mut self, color: Color);
    fn circle(&mut self, center: Point, radius: f32);
    fn line(&mut self, from: Point, to: Point);
    fn stroke(&mut self, color: Color, width: f32);
    fn fill(&mut self, color: Color);
}

pub struct FramePainter<'a> {
    frame: &'a mut Frame,
    builder: Option<path::Builder>,
    path: Option<path::Path>,
}

impl<'a> FramePainter<'a> {
    pub fn new(frame: &'a mut Frame) -> Self {
        FramePainter {
            frame,
            builder: Some(path::Builder::new()),
            path: None,
        }
    }

    fn builder(&mut self) -> &mut path::Builder {
        self.path = None;
        self.builder.get_or_insert_with(path::Builder::new)
    }

    fn path(&mut self) -> &path::Path {
        if let Some(builder) = self.builder.take() {
            self.path = Some(builder.build());
        }
        self.path.get_or_insert_with(|| path::Builder::new().build())
    }
}

impl<'a> DrawSurface for FramePainter<'a> {
    fn clear(&mut self) {
        // frames start out transparent
    }

    fn fill_background(&mut self, color: Color) {
        let size = self.frame.size();
        self.frame.fill_rectangle(Point::ORIGIN, size, color);
    }

    fn circle(&mut self, center: Point, radius: f32) {
        let builder = self.builder();
        builder.move_to(Point::new(center.x + radius, center.y));
        builder.circle(center, radius);
    }

    fn line(&mut self, from: Point, to: Point) {
        let builder = self.builder();
        builder.move_to(from);
        builder.line_to(to);
    }

    fn stroke(&mut self, color: Color, width: f32) {
        let path = self.path().clone();
        self.frame.stroke(
            &path,
            Stroke {
                color,
                width,
                ..Stroke::default()
            },
        );
    }

    fn fill(&mut self, color: Color) {
        let path = self.path().clone();
        self.frame.fill(&path, color);
    }
}

#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Command {
        Clear,
        Background(Color),
        Circle(Point, f32),
        Line(Point, Point),
        Stroke(Color, f32),
        Fill(Color),
    }

    #[derive(Default)]
    pub struct Recorder {
        pub commands: Vec<Command>,
    }

    impl DrawSurface for Recorder {
        fn clear(&mut self) {
            self.commands.push(Command::Clear);
        }

        fn fill_background(&mut self, color: Color) {
            self.commands.push(Command::Background(color));
        }

        fn circle(&mut self, center: Point, radius: f32) {
            self.commands.push(Command::Circle(center, radius));
        }

        fn line(&mut self, from: Point, to: Point) {
            self.commands.push(Command::Line(from, to));
        }

        fn stroke(&mut self, color: Color, width: f32) {
            self.commands.push(Command::Stroke(color, width));
        }

        fn fill(&mut self, color: Color) {
            self.commands.push(Command::Fill(color));
        }
    }

    pub struct Fake {
        pub id: &'static str,
        pub drawable: bool,
        pub size: Size,
    }

    impl Surface for Fake {
        fn id(&self) -> &str {
            self.id
        }

        fn is_drawable(&self) -> bool {
            self.drawable
        }

        fn size(&self) -> Size {
            self.size
        }
    }
}
