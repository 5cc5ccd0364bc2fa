use iced::Point;

use crate::options::Radius;
use crate::particles::Particle;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub from: Point,
    pub to: Point,
}

/// Collects an edge for every pair closer than `distance`, comparing raw
/// positions. Each pair is visited once (`j < i`), and the segment runs
/// between the drawn points, trimmed to each dot's rim.
pub fn links(particles: &[Particle], radius: Radius, distance: f32) -> Vec<Link> {
    let mut links = Vec::new();

    for (i, p) in particles.iter().enumerate() {
        for q in particles[..i].iter().rev() {
            let dx = q.position.x - p.position.x;
            let dy = q.position.y - p.position.y;

            if (dx * dx + dy * dy).sqrt() < distance {
                let from = p.drawn();
                let to = q.drawn();
                let a = (to.y - from.y).atan2(to.x - from.x);
                let (sin, cos) = a.sin_cos();
                let (r, r2) = (radius.of(p.z), radius.of(q.z));

                links.push(Link {
                    from: Point::new(from.x + r * cos, from.y + r * sin),
                    to: Point::new(to.x - r2 * cos, to.y - r2 * sin),
                });
            }
        }
    }

    links
}
