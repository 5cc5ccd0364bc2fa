use std::collections::VecDeque;

use iced::Color;

/// Older frames fade by `1 - alpha` per tick under a translucent background;
/// once they drop below one 8-bit step they are no longer kept.
const VISIBLE: f32 = 1.0 / 255.0;
const MAX_DEPTH: usize = 64;

/// How many painted frames stay visible under `background`. Without a
/// background, or with an opaque one, only the latest frame shows.
pub fn depth(background: Option<Color>) -> usize {
    match background {
        Some(color) if color.a < 1.0 => {
            let fade = 1.0 - color.a.max(0.0);
            if fade >= 1.0 {
                MAX_DEPTH
            } else {
                ((VISIBLE.ln() / fade.ln()).ceil() as usize).max(1).min(MAX_DEPTH)
            }
        }
        _ => 1,
    }
}

/// Ring of the most recent painted frames, oldest first.
pub struct Trail<T> {
    frames: VecDeque<T>,
    depth: usize,
}

impl<T> Trail<T> {
    pub fn new(depth: usize) -> Self {
        Trail {
            frames: VecDeque::with_capacity(depth),
            depth: depth.max(1),
        }
    }

    pub fn push(&mut self, frame: T) {
        while self.frames.len() >= self.depth {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> impl Iterator<Item = &T> {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::scene::Constellation;
    use crate::surface::recording::{Command, Fake, Recorder};
    use iced::{Size, Vector};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn opaque_or_missing_background_keeps_one_frame() {
        assert_eq!(depth(None), 1);
        assert_eq!(depth(Some(Color::BLACK)), 1);
        assert_eq!(depth(Some(Color::new(0.0, 0.0, 0.0, 0.5))), 8);
        assert_eq!(depth(Some(Color::new(0.0, 0.0, 0.0, 0.1))), 53);
        assert_eq!(depth(Some(Color::TRANSPARENT)), MAX_DEPTH);
    }

    #[test]
    fn ring_drops_oldest_frame() {
        let mut trail = Trail::new(3);
        for frame in 0..5 {
            trail.push(frame);
        }
        assert_eq!(trail.frames().copied().collect::<Vec<_>>(), vec![2, 3, 4]);

        assert_eq!(trail.depth(), 3);
        trail.clear();
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn translucent_background_keeps_earlier_frame_underneath() {
        let background = Color::new(0.0, 0.0, 0.0, 0.1);
        let options = Options {
            background_color: Some(background),
            ..Options::default()
        };
        let surface = Fake {
            id: "background",
            drawable: true,
            size: Size::new(200.0, 150.0),
        };
        let mut constellation =
            Constellation::with_rng(&surface, options, StdRng::seed_from_u64(5)).unwrap();
        constellation.start();

        let mut trail = Trail::new(depth(Some(background)));
        for _ in 0..2 {
            constellation.tick(Vector::new(0.0, 0.0));
            let mut recorder = Recorder::default();
            constellation.paint(&mut recorder);
            trail.push(recorder.commands);
        }

        let frames: Vec<&Vec<Command>> = trail.frames().collect();
        assert_eq!(frames.len(), 2);
        assert_ne!(frames[0], frames[1]);
        for frame in &frames {
            assert_eq!(frame.first(), Some(&Command::Background(background)));
        }

        let circles = frames
            .iter()
            .flat_map(|frame| frame.iter())
            .filter(|c| matches!(c, Command::Circle(..)))
            .count();
        assert_eq!(circles, 2 * constellation.set().len());
    }
}
