use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use futures::stream::{self, BoxStream, StreamExt};
use iced::Subscription;

pub const FALLBACK_INTERVAL: Duration = Duration::from_millis(16);

/// Drives the render tick. Picked once at startup; dropping the subscription
/// cancels it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameScheduler {
    /// Paced by the display refresh rate.
    Display { interval: Duration },
    /// Self-paced timer aiming for 16 ms between frames.
    Fallback,
}

impl FrameScheduler {
    pub fn select(refresh_hz: Option<f64>) -> Self {
        match refresh_hz {
            Some(hz) if hz.is_finite() && hz > 0.0 => FrameScheduler::Display {
                interval: Duration::from_secs_f64(1.0 / hz),
            },
            _ => FrameScheduler::Fallback,
        }
    }

    pub fn interval(&self) -> Duration {
        match *self {
            FrameScheduler::Display { interval } => interval,
            FrameScheduler::Fallback => FALLBACK_INTERVAL,
        }
    }

    pub fn subscription(&self) -> Subscription<Instant> {
        match *self {
            FrameScheduler::Display { interval } => iced::time::every(interval),
            FrameScheduler::Fallback => Subscription::from_recipe(Paced {
                interval: FALLBACK_INTERVAL,
            }),
        }
    }
}

/// Waits out whatever is left of `interval` since the previous frame.
pub fn next_delay(now: Instant, last: Option<Instant>, interval: Duration) -> Duration {
    match last {
        Some(last) => interval
            .checked_sub(now.saturating_duration_since(last))
            .unwrap_or_default(),
        None => Duration::default(),
    }
}

struct Paced {
    interval: Duration,
}

impl<H, I> iced_native::subscription::Recipe<H, I> for Paced
where
    H: Hasher,
{
    type Output = Instant;

    fn hash(&self, state: &mut H) {
        struct Marker;
        std::any::TypeId::of::<Marker>().hash(state);
        self.interval.hash(state);
    }

    fn stream(self: Box<Self>, _input: BoxStream<'static, I>) -> BoxStream<'static, Self::Output> {
        let interval = self.interval;

        stream::unfold(None, move |last| async move {
            let now = Instant::now();
            let delay = next_delay(now, last, interval);
            tokio::time::sleep(delay).await;
            let fired = now + delay;
            Some((fired, Some(fired)))
        })
        .boxed()
    }
}
