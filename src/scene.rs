use iced::{Size, Vector};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::links::links;
use crate::options::Options;
use crate::particles::ParticleSet;
use crate::simulation;
use crate::surface::{DrawSurface, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Seeded,
    Running,
    Reseeding,
}

/// One animated background: configuration, particles and the bounds they
/// were last seeded for.
pub struct Constellation {
    options: Options,
    set: ParticleSet,
    bounds: Size,
    phase: Phase,
    rng: StdRng,
}

impl Constellation {
    pub fn create<S: Surface>(surface: &S, options: Options) -> Result<Self> {
        Self::with_rng(surface, options, StdRng::from_entropy())
    }

    pub fn with_rng<S: Surface>(surface: &S, options: Options, rng: StdRng) -> Result<Self> {
        if !surface.is_drawable() {
            return Err(Error::InvalidSurface(surface.id().to_string()));
        }

        let mut constellation = Constellation {
            set: ParticleSet::new(&options),
            options,
            bounds: Size::new(0.0, 0.0),
            phase: Phase::Seeded,
            rng,
        };
        constellation.refresh(surface);

        log::info!(
            "attached to `{}` with {} particles",
            surface.id(),
            constellation.set.len()
        );

        Ok(constellation)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set(&self) -> &ParticleSet {
        &self.set
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn start(&mut self) {
        self.phase = Phase::Running;
    }

    pub fn stop(&mut self) {
        self.phase = Phase::Seeded;
    }

    /// Re-reads the surface size and reseeds the particle list for it.
    pub fn refresh<S: Surface>(&mut self, surface: &S) {
        let size = surface.size();
        let previous = self.phase;
        self.phase = Phase::Reseeding;

        let reseed = self
            .set
            .resize(size.width, size.height, &self.options, &mut self.rng);
        self.bounds = size;

        log::debug!(
            "reseeded for {}x{}: {} out of view, {} truncated, {} seeded, {} total",
            size.width,
            size.height,
            reseed.out_of_view,
            reseed.truncated,
            reseed.seeded,
            self.set.len()
        );

        self.phase = previous;
    }

    pub fn tick(&mut self, tilt: Vector) {
        if self.is_running() {
            simulation::step(&mut self.set, &self.options, tilt, self.bounds);
        }
    }

    pub fn paint<D: DrawSurface>(&self, surface: &mut D) {
        match self.options.background_color {
            Some(color) => surface.fill_background(color),
            None => surface.clear(),
        }

        // circles sit on the same post-wrap drawn point the links use
        for p in &self.set.particles {
            surface.circle(p.drawn(), self.set.radius.of(p.z));
        }

        for link in links(&self.set.particles, self.set.radius, self.options.link_distance) {
            surface.line(link.from, link.to);
        }

        surface.stroke(self.options.link_color, self.options.link_width);
        if let Some(color) = self.options.dot_color {
            surface.fill(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DotRadius;
    use crate::surface::recording::{Command, Fake, Recorder};
    use iced::Color;

    fn surface(width: f32, height: f32) -> Fake {
        Fake {
            id: "background",
            drawable: true,
            size: Size::new(width, height),
        }
    }

    fn create(surface: &Fake, options: Options) -> Constellation {
        Constellation::with_rng(surface, options, StdRng::seed_from_u64(3)).unwrap()
    }

    #[test]
    fn create_seeds_for_surface_area() {
        let constellation = create(&surface(800.0, 600.0), Options::default());
        assert_eq!(constellation.set().len(), 80);
        assert_eq!(constellation.phase(), Phase::Seeded);
        assert_eq!(constellation.bounds(), Size::new(800.0, 600.0));
    }

    #[test]
    fn undrawable_surface_fails_construction() {
        let surface = Fake {
            id: "sidebar",
            drawable: false,
            size: Size::new(100.0, 100.0),
        };
        match Constellation::create(&surface, Options::default()) {
            Err(Error::InvalidSurface(id)) => assert_eq!(id, "sidebar"),
            _ => panic!("expected an invalid surface"),
        }
    }

    #[test]
    fn refresh_follows_surface_and_keeps_phase() {
        let mut constellation = create(&surface(800.0, 600.0), Options::default());
        constellation.start();

        constellation.refresh(&surface(1200.0, 600.0));
        assert_eq!(constellation.set().len(), 120);
        assert_eq!(constellation.phase(), Phase::Running);

        let before = constellation.set().particles.clone();
        constellation.refresh(&surface(1200.0, 600.0));
        assert_eq!(constellation.set().particles, before);
    }

    #[test]
    fn tick_only_moves_while_running() {
        let mut constellation = create(&surface(800.0, 600.0), Options::default());
        let before = constellation.set().particles.clone();

        constellation.tick(Vector::new(0.0, 0.0));
        assert_eq!(constellation.set().particles, before);

        constellation.start();
        constellation.tick(Vector::new(0.0, 0.0));
        assert_ne!(constellation.set().particles, before);

        constellation.stop();
        let stopped = constellation.set().particles.clone();
        constellation.tick(Vector::new(0.0, 0.0));
        assert_eq!(constellation.set().particles, stopped);
    }

    #[test]
    fn paint_clears_then_strokes_without_fill() {
        let constellation = create(&surface(200.0, 150.0), Options::default());
        let mut recorder = Recorder::default();
        constellation.paint(&mut recorder);

        let n = constellation.set().len();
        assert_eq!(recorder.commands.first(), Some(&Command::Clear));
        let circles = recorder
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Circle(..)))
            .count();
        let lines = recorder
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Line(..)))
            .count();
        assert_eq!(circles, n);
        assert!(lines <= n * (n - 1) / 2);
        assert!(matches!(recorder.commands.last(), Some(Command::Stroke(_, w)) if *w == 2.0));
        assert!(!recorder
            .commands
            .iter()
            .any(|c| matches!(c, Command::Fill(_))));
    }

    #[test]
    fn paint_with_background_and_dot_color() {
        let options = Options {
            background_color: Some(Color::BLACK),
            dot_color: Some(Color::WHITE),
            dot_radius: DotRadius::Fixed(2.0),
            ..Options::default()
        };
        let constellation = create(&surface(200.0, 150.0), options);
        let mut recorder = Recorder::default();
        constellation.paint(&mut recorder);

        assert_eq!(
            recorder.commands.first(),
            Some(&Command::Background(Color::BLACK))
        );
        assert_eq!(recorder.commands.last(), Some(&Command::Fill(Color::WHITE)));
        for command in &recorder.commands {
            if let Command::Circle(_, r) = command {
                assert_eq!(*r, 2.0);
            }
        }
    }
}
