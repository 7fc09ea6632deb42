use bevy::prelude::*;
use bevy_inspector_egui::{prelude::ReflectInspectorOptions, InspectorOptions};

use crate::chain::{Chain, LineStyle};

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;
pub const BACKGROUND: Color = Color::rgb(245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0);

#[derive(Reflect, Resource, InspectorOptions)]
#[reflect(Resource, InspectorOptions)]
pub struct Config {
    /// Root position, screen space with y pointing down
    pub pivot: Vec2,
    #[inspector(min = 0.5, max = 10.0)]
    pub line_thickness: f32,
    pub line_color: Color,
    /// Seconds a tail trail line stays on screen, 0 turns the trail off
    #[inspector(min = 0.0, max = 10.0)]
    pub trail_duration: f32,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pivot: Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            line_thickness: 2.0,
            line_color: Color::BLACK,
            trail_duration: 1.5,
            seed: None,
        }
    }
}

impl Config {
    pub fn line_style(&self) -> LineStyle {
        LineStyle {
            thickness: self.line_thickness,
            color: self.line_color,
        }
    }
}

/// Source of randomness for new segments.
#[derive(Resource, Deref, DerefMut)]
pub struct ChainRng(pub fastrand::Rng);

impl ChainRng {
    pub fn from_config(config: &Config) -> Self {
        match config.seed {
            Some(seed) => Self(fastrand::Rng::with_seed(seed)),
            None => Self(fastrand::Rng::new()),
        }
    }
}

impl FromWorld for ChainRng {
    fn from_world(world: &mut World) -> Self {
        Self::from_config(world.resource::<Config>())
    }
}

impl FromWorld for Chain {
    fn from_world(world: &mut World) -> Self {
        Chain::new(world.resource::<Config>().pivot)
    }
}
