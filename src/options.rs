use iced::Color;
use serde::{Deserialize, Deserializer};

const KNOWN_KEYS: [&str; 14] = [
    "directionX",
    "directionY",
    "velocityX",
    "velocityY",
    "bounceX",
    "bounceY",
    "parallax",
    "density",
    "dotRadius",
    "backgroundColor",
    "dotColor",
    "linkColor",
    "linkDistance",
    "linkWidth",
];

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "f32")]
pub enum Direction {
    Negative,
    Random,
    Positive,
}

impl From<f32> for Direction {
    fn from(value: f32) -> Self {
        if value < 0.0 {
            Direction::Negative
        } else if value > 0.0 {
            Direction::Positive
        } else {
            Direction::Random
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DotRadius {
    Fixed(f32),
    Range([f32; 2]),
}

/// Dot radius after resolution: a range with equal ends collapses to a fixed
/// radius. Ranged radii double as particle depth; a fixed radius leaves depth
/// as a 0..=5 parallax weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Radius {
    Fixed(f32),
    Range { min: f32, max: f32 },
}

impl DotRadius {
    pub fn resolve(&self) -> Radius {
        match *self {
            DotRadius::Fixed(r) => Radius::Fixed(r),
            DotRadius::Range([min, max]) if min == max => Radius::Fixed(min),
            DotRadius::Range([min, max]) => Radius::Range { min, max },
        }
    }
}

impl Radius {
    pub fn of(&self, depth: f32) -> f32 {
        match *self {
            Radius::Fixed(r) => r,
            Radius::Range { .. } => depth,
        }
    }

    pub fn parallax_scale(&self, parallax: f32) -> f32 {
        match *self {
            Radius::Fixed(_) => parallax / 5.0,
            Radius::Range { min, max } => parallax / (min.max(max) * min),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub direction_x: Direction,
    pub direction_y: Direction,
    pub velocity_x: [f32; 2],
    pub velocity_y: [f32; 2],
    pub bounce_x: bool,
    pub bounce_y: bool,
    pub parallax: f32,
    pub density: f32,
    pub dot_radius: DotRadius,
    #[serde(deserialize_with = "optional_color")]
    pub background_color: Option<Color>,
    #[serde(deserialize_with = "optional_color")]
    pub dot_color: Option<Color>,
    #[serde(deserialize_with = "color")]
    pub link_color: Color,
    pub link_distance: f32,
    pub link_width: f32,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            direction_x: Direction::Negative,
            direction_y: Direction::Negative,
            velocity_x: [0.1, 0.2],
            velocity_y: [0.5, 1.0],
            bounce_x: true,
            bounce_y: false,
            parallax: 0.2,
            density: 6000.0,
            dot_radius: DotRadius::Range([1.0, 5.0]),
            background_color: None,
            dot_color: None,
            link_color: Color::new(99.0 / 255.0, 99.0 / 255.0, 99.0 / 255.0, 0.8),
            link_distance: 50.0,
            link_width: 2.0,
        }
    }
}

impl Options {
    /// Merges the overrides in `json` onto the defaults. Unknown keys are
    /// ignored after a warning.
    pub fn from_json(json: &str) -> Result<Options, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(map) = value.as_object() {
            for key in map.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
                log::warn!("ignoring unknown option `{}`", key);
            }
        }
        serde_json::from_value(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Rgba([f32; 4]),
}

fn color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    match ColorRepr::deserialize(deserializer)? {
        ColorRepr::Rgba([r, g, b, a]) => Ok(Color::new(r, g, b, a)),
        ColorRepr::Css(css) => parse_color(&css)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized color `{}`", css))),
    }
}

fn optional_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Color>, D::Error> {
    color(deserializer).map(Some)
}

pub fn parse_color(css: &str) -> Option<Color> {
    let css = css.trim().to_ascii_lowercase();
    match css.as_str() {
        "black" => return Some(Color::BLACK),
        "white" => return Some(Color::WHITE),
        "transparent" => return Some(Color::TRANSPARENT),
        "gray" | "grey" => return Some(Color::new(0.5, 0.5, 0.5, 1.0)),
        _ => {}
    }

    if let Some(hex) = css.strip_prefix('#') {
        let digits = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as f32))
            .collect::<Option<Vec<f32>>>()?;
        return match digits.as_slice() {
            [r, g, b] => Some(Color::new(r / 15.0, g / 15.0, b / 15.0, 1.0)),
            [r1, r0, g1, g0, b1, b0] => Some(Color::new(
                (r1 * 16.0 + r0) / 255.0,
                (g1 * 16.0 + g0) / 255.0,
                (b1 * 16.0 + b0) / 255.0,
                1.0,
            )),
            [r1, r0, g1, g0, b1, b0, a1, a0] => Some(Color::new(
                (r1 * 16.0 + r0) / 255.0,
                (g1 * 16.0 + g0) / 255.0,
                (b1 * 16.0 + b0) / 255.0,
                (a1 * 16.0 + a0) / 255.0,
            )),
            _ => None,
        };
    }

    let args = css
        .strip_prefix("rgba(")
        .or_else(|| css.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let channels = args
        .split(',')
        .map(|channel| channel.trim().parse::<f32>().ok())
        .collect::<Option<Vec<f32>>>()?;
    match channels.as_slice() {
        [r, g, b] => Some(Color::new(r / 255.0, g / 255.0, b / 255.0, 1.0)),
        [r, g, b, a] => Some(Color::new(r / 255.0, g / 255.0, b / 255.0, *a)),
        _ => None,
    }
}
