use iced::{Point, Vector};
use rand::Rng;

use crate::options::{Direction, Options, Radius};

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub z: f32,
    pub position: Point,
    pub velocity: Vector,
    pub offset: Vector,
}

impl Particle {
    /// Where the particle is drawn: raw position plus parallax offset.
    pub fn drawn(&self) -> Point {
        self.position + self.offset
    }
}

pub type Particles = Vec<Particle>;

/// Particle list plus the radius and parallax resolution of the last resize.
#[derive(Clone, Debug)]
pub struct ParticleSet {
    pub particles: Particles,
    pub radius: Radius,
    pub parallax_scale: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reseed {
    pub out_of_view: usize,
    pub truncated: usize,
    pub seeded: usize,
}

impl ParticleSet {
    pub fn new(options: &Options) -> Self {
        let radius = options.dot_radius.resolve();
        ParticleSet {
            particles: Particles::new(),
            radius,
            parallax_scale: radius.parallax_scale(options.parallax),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn target(width: f32, height: f32, density: f32) -> usize {
        (width * height / density).ceil().max(0.0) as usize
    }

    /// Drops particles that fell out of view, trims the tail down to the
    /// density target and seeds new particles until the target is reached.
    pub fn resize<R: Rng>(
        &mut self,
        width: f32,
        height: f32,
        options: &Options,
        rng: &mut R,
    ) -> Reseed {
        self.radius = options.dot_radius.resolve();
        self.parallax_scale = self.radius.parallax_scale(options.parallax);

        let target = Self::target(width, height, options.density);
        let mut reseed = Reseed::default();

        let before = self.particles.len();
        self.particles
            .retain(|p| !(p.position.x > width || p.position.y > height));
        reseed.out_of_view = before - self.particles.len();

        if self.particles.len() > target {
            reseed.truncated = self.particles.len() - target;
            self.particles.truncate(target);
        }

        while self.particles.len() < target {
            let particle = self.seed(width, height, options, rng);
            self.particles.push(particle);
            reseed.seeded += 1;
        }

        reseed
    }

    fn seed<R: Rng>(&self, width: f32, height: f32, options: &Options, rng: &mut R) -> Particle {
        let z = match self.radius {
            Radius::Range { min, max } => (rng.gen::<f32>() * (max - min) + min).ceil(),
            Radius::Fixed(_) => (rng.gen::<f32>() * 5.0).ceil(),
        };

        Particle {
            z,
            position: Point::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height),
            velocity: Vector::new(
                speed(options.direction_x, options.velocity_x, rng),
                speed(options.direction_y, options.velocity_y, rng),
            ),
            offset: Vector::new(0.0, 0.0),
        }
    }
}

fn speed<R: Rng>(direction: Direction, [min, max]: [f32; 2], rng: &mut R) -> f32 {
    let sign = match direction {
        Direction::Negative => -1.0,
        Direction::Positive => 1.0,
        Direction::Random => {
            if rng.gen::<f32>() > 0.5 {
                1.0
            } else {
                -1.0
            }
        }
    };
    sign * (rng.gen::<f32>() * (max - min) + min)
}
