use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use iced::{Point, Size, Vector};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Holds the tilt vector that drives parallax. Pointer and orientation
/// readings overwrite it; the latest reading wins.
#[derive(Debug)]
pub struct InputTracker {
    tilt: Vector,
    attached: bool,
}

impl Default for InputTracker {
    fn default() -> Self {
        InputTracker {
            tilt: Vector::new(0.0, 0.0),
            attached: false,
        }
    }
}

impl InputTracker {
    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn tilt(&self) -> Vector {
        self.tilt
    }

    pub fn pointer_moved(&mut self, position: Point, viewport: Size) {
        if self.attached {
            self.tilt = Vector::new(
                position.x - viewport.width / 2.0,
                position.y - viewport.height / 2.0,
            );
        }
    }

    pub fn oriented(&mut self, orientation: Orientation, viewport: Size) {
        if self.attached {
            self.tilt = Vector::new(
                (-orientation.beta).max(-30.0).min(30.0) * (viewport.width / 30.0),
                (-orientation.gamma).max(-30.0).min(30.0) * (viewport.height / 30.0),
            );
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    pub beta: f32,
    pub gamma: f32,
}

impl Orientation {
    /// Parses a `<beta> <gamma>` line.
    pub fn parse(line: &str) -> Option<Orientation> {
        let mut fields = line.split_whitespace().map(|field| field.parse::<f32>().ok());
        match (fields.next(), fields.next(), fields.next()) {
            (Some(Some(beta)), Some(Some(gamma)), None) => Some(Orientation { beta, gamma }),
            _ => None,
        }
    }
}

/// Streams orientation readings from a line feed (a file or named pipe).
pub struct OrientationFeed {
    pub path: PathBuf,
}

impl<H, I> iced_native::subscription::Recipe<H, I> for OrientationFeed
where
    H: Hasher,
{
    type Output = Orientation;

    fn hash(&self, state: &mut H) {
        struct Marker;
        std::any::TypeId::of::<Marker>().hash(state);
        self.path.hash(state);
    }

    fn stream(self: Box<Self>, _input: BoxStream<'static, I>) -> BoxStream<'static, Self::Output> {
        let path = self.path;

        stream::once(async move {
            match tokio::fs::File::open(&path).await {
                Ok(file) => Some(BufReader::new(file).lines()),
                Err(e) => {
                    log::warn!("orientation feed {}: {}", path.display(), e);
                    None
                }
            }
        })
        .filter_map(future::ready)
        .flat_map(|lines| {
            stream::unfold(lines, |mut lines| async move {
                match lines.next_line().await {
                    Ok(Some(line)) => Some((line, lines)),
                    Ok(None) => None,
                    Err(e) => {
                        log::warn!("orientation feed closed: {}", e);
                        None
                    }
                }
            })
        })
        .filter_map(|line| async move {
            let orientation = Orientation::parse(&line);
            if orientation.is_none() {
                log::debug!("skipping orientation line {:?}", line);
            }
            orientation
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "expected {} to be close to {}", a, b);
    }

    const VIEWPORT: Size = Size {
        width: 1200.0,
        height: 600.0,
    };

    fn attached() -> InputTracker {
        let mut tracker = InputTracker::default();
        tracker.attach();
        tracker
    }

    #[test]
    fn pointer_tilt_is_relative_to_viewport_center() {
        let mut tracker = attached();
        tracker.pointer_moved(Point::new(700.0, 100.0), VIEWPORT);
        assert_close(tracker.tilt().x, 100.0);
        assert_close(tracker.tilt().y, -200.0);
    }

    #[test]
    fn orientation_is_clamped_and_scaled() {
        let mut tracker = attached();
        tracker.oriented(Orientation { beta: 15.0, gamma: -90.0 }, VIEWPORT);
        assert_close(tracker.tilt().x, -15.0 * 40.0);
        assert_close(tracker.tilt().y, 30.0 * 20.0);
    }

    #[test]
    fn latest_source_wins() {
        let mut tracker = attached();
        tracker.oriented(Orientation { beta: 30.0, gamma: 30.0 }, VIEWPORT);
        tracker.pointer_moved(Point::new(600.0, 300.0), VIEWPORT);
        assert_eq!(tracker.tilt(), Vector::new(0.0, 0.0));
    }

    #[test]
    fn detached_tracker_ignores_input() {
        let mut tracker = InputTracker::default();
        tracker.pointer_moved(Point::new(0.0, 0.0), VIEWPORT);
        assert_eq!(tracker.tilt(), Vector::new(0.0, 0.0));

        tracker.attach();
        tracker.pointer_moved(Point::new(0.0, 0.0), VIEWPORT);
        tracker.detach();
        tracker.pointer_moved(Point::new(600.0, 300.0), VIEWPORT);
        assert_close(tracker.tilt().x, -600.0);
    }

    #[test]
    fn parses_feed_lines() {
        assert_eq!(
            Orientation::parse(" 12.5\t-3 "),
            Some(Orientation { beta: 12.5, gamma: -3.0 })
        );
        assert_eq!(Orientation::parse("12.5"), None);
        assert_eq!(Orientation::parse("1 2 3"), None);
        assert_eq!(Orientation::parse("north east"), None);
    }
}
