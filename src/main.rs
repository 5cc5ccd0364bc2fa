mod error;
mod input;
mod links;
mod options;
mod particles;
mod scene;
mod scheduler;
mod simulation;
mod surface;
mod trail;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use iced::canvas::{Cache, Canvas, Cursor, Frame, Geometry};
use iced::{
    Application, Clipboard, Color, Command, Element, HorizontalAlignment, Length, Point,
    Rectangle, Settings, Size, Subscription, VerticalAlignment,
};
use iced_native::keyboard::{self, KeyCode};
use iced_native::{event, mouse, window, Event};

use crate::error::Error;
use crate::input::{InputTracker, Orientation, OrientationFeed};
use crate::options::Options;
use crate::scene::Constellation;
use crate::scheduler::FrameScheduler;
use crate::surface::{resolve, FramePainter, Surface, SurfaceRef};
use crate::trail::Trail;

const OPTIONS_PATH: &str = "zodiac.json";
const SURFACE_ID: &str = "background";

#[derive(Clone, Debug)]
enum Message {
    OptionsLoaded(Options),
    Tick,
    Resized(Size),
    PointerMoved(Point),
    Oriented(Orientation),
    ToggleRunning,
    Refresh,
    ToggleOverlay,
}

struct Flags {
    options_path: PathBuf,
    surface: Option<String>,
    scheduler: FrameScheduler,
    orientation: Option<PathBuf>,
    size: (u32, u32),
}

impl Flags {
    fn from_env() -> Self {
        let mut args = std::env::args().skip(1);
        let options_path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(OPTIONS_PATH));
        let surface = args.next();
        let refresh_hz = std::env::var("ZODIAC_REFRESH_HZ")
            .ok()
            .and_then(|hz| hz.parse().ok());

        Flags {
            options_path,
            surface,
            scheduler: FrameScheduler::select(refresh_hz),
            orientation: std::env::var_os("ZODIAC_ORIENTATION").map(PathBuf::from),
            size: (1024, 768),
        }
    }
}

/// The window's drawing area. The canvas fills the whole window.
struct Viewport {
    size: Size,
}

impl Surface for Viewport {
    fn id(&self) -> &str {
        SURFACE_ID
    }

    fn is_drawable(&self) -> bool {
        true
    }

    fn size(&self) -> Size {
        self.size
    }
}

struct Zodiac {
    surface: Option<String>,
    scheduler: FrameScheduler,
    orientation: Option<PathBuf>,
    viewport: Viewport,
    input: InputTracker,
    state: State,
    failed: bool,
}

impl Zodiac {
    fn attach(&mut self, options: Options) -> Result<(), Error> {
        let surfaces = std::slice::from_ref(&self.viewport);
        let target = match &self.surface {
            Some(id) => SurfaceRef::Id(id),
            None => SurfaceRef::Handle(&self.viewport),
        };
        let surface = resolve(target, surfaces)?;
        let mut constellation = Constellation::create(surface, options)?;

        constellation.start();
        self.input.attach();
        self.state.trail = Trail::new(trail::depth(constellation.options().background_color));
        self.state.constellation = Some(constellation);
        self.state.repaint(self.viewport.size);
        Ok(())
    }

    fn toggle_running(&mut self) {
        if let Some(constellation) = &mut self.state.constellation {
            if constellation.is_running() {
                constellation.stop();
                self.input.detach();
            } else {
                constellation.start();
                self.input.attach();
            }
        }
    }

    fn tick(&mut self) {
        if let Some(constellation) = &mut self.state.constellation {
            let start = Instant::now();
            constellation.tick(self.input.tilt());
            self.state.timestep += 1;
            self.state.last_tick_duration = start.elapsed();
            self.state.repaint(self.viewport.size);
        }
    }

    fn refresh(&mut self) {
        if let Some(constellation) = &mut self.state.constellation {
            constellation.refresh(&self.viewport);
            self.state.trail.clear();
            self.state.repaint(self.viewport.size);
        }
    }
}

impl Application for Zodiac {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Flags = Flags;

    fn new(flags: Self::Flags) -> (Self, Command<Message>) {
        log::info!(
            "frame scheduler: {:?}, every {:?}",
            flags.scheduler,
            flags.scheduler.interval()
        );

        let path = flags.options_path;
        let (width, height) = flags.size;
        let zodiac = Zodiac {
            surface: flags.surface,
            scheduler: flags.scheduler,
            orientation: flags.orientation,
            viewport: Viewport {
                size: Size::new(width as f32, height as f32),
            },
            input: InputTracker::default(),
            state: State::default(),
            failed: false,
        };

        (
            zodiac,
            Command::perform(tokio::fs::read_to_string(path.clone()), move |result| {
                Message::OptionsLoaded(load_options(result, &path))
            }),
        )
    }

    fn title(&self) -> String {
        String::from("Zodiac")
    }

    fn background_color(&self) -> Color {
        Color::TRANSPARENT
    }

    fn should_exit(&self) -> bool {
        self.failed
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![iced_native::subscription::events_with(host_event)];

        if self.input.is_attached() {
            subscriptions.push(iced_native::subscription::events_with(pointer_event));
            if let Some(path) = &self.orientation {
                subscriptions.push(
                    Subscription::from_recipe(OrientationFeed { path: path.clone() })
                        .map(Message::Oriented),
                );
            }
        }

        let running = self
            .state
            .constellation
            .as_ref()
            .map_or(false, Constellation::is_running);
        if running {
            subscriptions.push(self.scheduler.subscription().map(|_| Message::Tick));
        }

        Subscription::batch(subscriptions)
    }

    fn update(&mut self, message: Self::Message, _clipboard: &mut Clipboard) -> Command<Message> {
        match message {
            Message::OptionsLoaded(options) => {
                if let Err(e) = self.attach(options) {
                    log::error!("{}", e);
                    self.failed = true;
                }
            }
            Message::Tick => self.tick(),
            Message::Resized(size) => {
                self.viewport.size = size;
                self.refresh();
            }
            Message::PointerMoved(position) => {
                self.input.pointer_moved(position, self.viewport.size);
            }
            Message::Oriented(orientation) => {
                self.input.oriented(orientation, self.viewport.size);
            }
            Message::ToggleRunning => self.toggle_running(),
            Message::Refresh => self.refresh(),
            Message::ToggleOverlay => {
                self.state.show_overlay = !self.state.show_overlay;
            }
        }
        Command::none()
    }

    fn view(&mut self) -> Element<Message> {
        Canvas::new(&mut self.state)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

struct State {
    constellation: Option<Constellation>,
    timestep: u64,
    last_tick_duration: Duration,
    show_overlay: bool,
    cache: Cache,
    trail: Trail<Geometry>,
}

impl State {
    /// Invalidates the cached frame. Under a translucent background the new
    /// frame is painted right away and layered over the previous ones.
    fn repaint(&mut self, size: Size) {
        self.cache.clear();
        if self.trail.depth() > 1 {
            if let Some(constellation) = &self.constellation {
                let mut frame = Frame::new(size);
                constellation.paint(&mut FramePainter::new(&mut frame));
                self.trail.push(frame.into_geometry());
            }
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            constellation: None,
            timestep: 0,
            last_tick_duration: Duration::default(),
            show_overlay: false,
            cache: Cache::default(),
            trail: Trail::new(1),
        }
    }
}

impl iced::canvas::Program<Message> for State {
    fn draw(&self, bounds: Rectangle, _cursor: Cursor) -> Vec<Geometry> {
        let constellation = match &self.constellation {
            Some(constellation) => constellation,
            None => return Vec::new(),
        };

        let start = Instant::now();

        let mut layers: Vec<Geometry> = if self.trail.depth() > 1 {
            self.trail.frames().cloned().collect()
        } else {
            vec![self.cache.draw(bounds.size(), |frame| {
                constellation.paint(&mut FramePainter::new(frame));
            })]
        };

        let duration = start.elapsed();

        if !self.show_overlay {
            return layers;
        }

        let overlay = {
            let mut frame = Frame::new(bounds.size());

            let text = iced::canvas::Text {
                color: Color::WHITE,
                size: 14.0,
                position: Point::new(frame.width(), frame.height()),
                horizontal_alignment: HorizontalAlignment::Right,
                vertical_alignment: VerticalAlignment::Bottom,
                ..Default::default()
            };

            let seeded_for = constellation.bounds();
            frame.fill_text(iced::canvas::Text {
                content: format! {
                    "timestep = {}\nlast_tick_duration = {:?}\nDraw duration: {:?}\nParticle count: {}\nTrail frames: {}\nSurface: {}x{} ({:?})",
                    self.timestep,
                    self.last_tick_duration,
                    duration,
                    constellation.set().len(),
                    self.trail.len(),
                    seeded_for.width,
                    seeded_for.height,
                    constellation.phase(),
                },
                ..text
            });

            frame.into_geometry()
        };

        layers.push(overlay);
        layers
    }
}

fn load_options(result: std::io::Result<String>, path: &Path) -> Options {
    match result {
        Ok(json) => match Options::from_json(&json) {
            Ok(options) => {
                log::info!("options loaded from {}", path.display());
                options
            }
            Err(e) => {
                log::warn!("{}: {}, using defaults", path.display(), Error::from(e));
                Options::default()
            }
        },
        Err(e) => {
            log::info!("no options at {} ({}), using defaults", path.display(), e);
            Options::default()
        }
    }
}

fn host_event(event: Event, _status: event::Status) -> Option<Message> {
    match event {
        Event::Window(window::Event::Resized { width, height }) => {
            Some(Message::Resized(Size::new(width as f32, height as f32)))
        }
        Event::Keyboard(keyboard::Event::KeyPressed { key_code, .. }) => match key_code {
            KeyCode::Space => Some(Message::ToggleRunning),
            KeyCode::R => Some(Message::Refresh),
            KeyCode::D => Some(Message::ToggleOverlay),
            _ => None,
        },
        _ => None,
    }
}

fn pointer_event(event: Event, _status: event::Status) -> Option<Message> {
    match event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => Some(Message::PointerMoved(position)),
        _ => None,
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let flags = Flags::from_env();
    let (width, height) = flags.size;

    Zodiac::run(Settings {
        antialiasing: true,
        window: iced::window::Settings {
            size: (width, height),
            transparent: true,
            ..iced::window::Settings::default()
        },
        ..Settings::with_flags(flags)
    })?;

    Ok(())
}
