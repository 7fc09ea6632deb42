use bevy::{prelude::*, sprite::MaterialMesh2dBundle};
use bevy_prototype_debug_lines::DebugLines;

use crate::{
    chain::{Chain, ChainCanvas},
    resources::{Config, SCREEN_HEIGHT, SCREEN_WIDTH},
};

// z spacing between shapes so later draws cover earlier ones
const DEPTH_STEP: f32 = 0.01;
// kept below the camera, which sits at z = 100
const MAX_DEPTH: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line {
        from: Vec2,
        to: Vec2,
        thickness: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

/// Shapes for the current frame in draw order, screen space.
#[derive(Resource, Default, Debug)]
pub struct DrawList {
    pub shapes: Vec<Shape>,
}

impl ChainCanvas for DrawList {
    fn draw_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.shapes.push(Shape::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
        });
    }
}

/// Screen space (origin top left, y down) to the centred, y up world of a 2d camera.
pub fn screen_to_world(point: Vec2) -> Vec2 {
    Vec2::new(point.x - SCREEN_WIDTH * 0.5, SCREEN_HEIGHT * 0.5 - point.y)
}

/// Transform and size of a sprite quad covering the line `from`..`to` (world space).
pub fn line_quad(from: Vec2, to: Vec2, thickness: f32, z: f32) -> (Transform, Vec2) {
    let delta = to - from;
    let transform = Transform::from_translation(((from + to) * 0.5).extend(z))
        .with_rotation(Quat::from_rotation_z(delta.y.atan2(delta.x)));
    (transform, Vec2::new(delta.length(), thickness))
}

/// z of the `order`th of `count` shapes, increasing and always under `MAX_DEPTH`.
pub fn depth(order: usize, count: usize) -> f32 {
    let step = DEPTH_STEP.min(MAX_DEPTH / count.max(1) as f32);
    order as f32 * step
}

#[derive(Component)]
pub struct CircleShape;

#[derive(Component)]
pub struct LineShape;

/// Entities reused every frame to show the draw list.
#[derive(Resource)]
pub struct ShapePool {
    circle_mesh: Handle<Mesh>,
    circles: Vec<Entity>,
    lines: Vec<Entity>,
}

impl FromWorld for ShapePool {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        Self {
            circle_mesh: meshes.add(shape::Circle::new(1.0).into()),
            circles: Vec::new(),
            lines: Vec::new(),
        }
    }
}

pub fn render_chain(chain: Res<Chain>, config: Res<Config>, mut draw_list: ResMut<DrawList>) {
    draw_list.shapes.clear();
    chain.render(&mut *draw_list, config.line_style());
}

pub fn present(
    mut commands: Commands,
    draw_list: Res<DrawList>,
    mut pool: ResMut<ShapePool>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut circles: Query<
        (&mut Transform, &Handle<ColorMaterial>, &mut Visibility),
        (With<CircleShape>, Without<LineShape>),
    >,
    mut lines: Query<
        (&mut Transform, &mut Sprite, &mut Visibility),
        (With<LineShape>, Without<CircleShape>),
    >,
) {
    let pool = &mut *pool;
    let mut circle_count = 0;
    let mut line_count = 0;

    let count = draw_list.shapes.len();
    for (order, shape) in draw_list.shapes.iter().enumerate() {
        let z = depth(order, count);
        match *shape {
            Shape::Circle {
                center,
                radius,
                color,
            } => {
                let transform = Transform::from_translation(screen_to_world(center).extend(z))
                    .with_scale(Vec3::new(radius, radius, 1.0));

                match pool.circles.get(circle_count).copied() {
                    Some(entity) => {
                        if let Ok((mut trans, material, mut visibility)) = circles.get_mut(entity) {
                            *trans = transform;
                            *visibility = Visibility::Inherited;
                            let stale = materials.get(material).map_or(false, |m| m.color != color);
                            if stale {
                                if let Some(m) = materials.get_mut(material) {
                                    m.color = color;
                                }
                            }
                        }
                    }
                    None => {
                        let entity = commands
                            .spawn((
                                MaterialMesh2dBundle {
                                    mesh: pool.circle_mesh.clone().into(),
                                    material: materials.add(ColorMaterial::from(color)),
                                    transform,
                                    ..default()
                                },
                                CircleShape,
                                Name::new(format!("Circle {}", circle_count)),
                            ))
                            .id();
                        pool.circles.push(entity);
                    }
                }
                circle_count += 1;
            }
            Shape::Line {
                from,
                to,
                thickness,
                color,
            } => {
                let (transform, size) =
                    line_quad(screen_to_world(from), screen_to_world(to), thickness, z);

                match pool.lines.get(line_count).copied() {
                    Some(entity) => {
                        if let Ok((mut trans, mut sprite, mut visibility)) = lines.get_mut(entity) {
                            *trans = transform;
                            sprite.color = color;
                            sprite.custom_size = Some(size);
                            *visibility = Visibility::Inherited;
                        }
                    }
                    None => {
                        let entity = commands
                            .spawn((
                                SpriteBundle {
                                    sprite: Sprite {
                                        color,
                                        custom_size: Some(size),
                                        ..default()
                                    },
                                    transform,
                                    ..default()
                                },
                                LineShape,
                                Name::new(format!("Line {}", line_count)),
                            ))
                            .id();
                        pool.lines.push(entity);
                    }
                }
                line_count += 1;
            }
        }
    }

    for entity in pool.circles.iter().skip(circle_count) {
        if let Ok((_, _, mut visibility)) = circles.get_mut(*entity) {
            *visibility = Visibility::Hidden;
        }
    }
    for entity in pool.lines.iter().skip(line_count) {
        if let Ok((_, _, mut visibility)) = lines.get_mut(*entity) {
            *visibility = Visibility::Hidden;
        }
    }
}

/// Last known tail position, remembered between frames.
#[derive(Default)]
pub struct Trail {
    last: Option<(u64, Vec3)>,
}

impl Trail {
    /// The line from the previous tail position to `pos`, if the tail is the same one.
    pub fn advance(&mut self, tail_id: u64, pos: Vec3) -> Option<(Vec3, Vec3)> {
        let line = match self.last {
            Some((id, last)) if id == tail_id => Some((last, pos)),
            _ => None,
        };
        self.last = Some((tail_id, pos));
        line
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// Fading trail behind the tail segment.
pub fn draw_trail(
    mut lines: ResMut<DebugLines>,
    chain: Res<Chain>,
    config: Res<Config>,
    mut trail: Local<Trail>,
) {
    if chain.len() < 2 || config.trail_duration <= 0.0 {
        trail.clear();
        return;
    }

    let tail = chain.tail();
    let pos = screen_to_world(tail.position).extend(0.0);
    if let Some((from, to)) = trail.advance(chain.tail_id(), pos) {
        lines.line_colored(from, to, config.trail_duration, tail.color);
    }
}
