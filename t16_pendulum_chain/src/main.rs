mod chain;
mod render;
mod resources;
mod state;

use chain::*;
use render::*;
use resources::*;
use state::*;

use bevy::prelude::*;
use bevy_inspector_egui::quick::ResourceInspectorPlugin;
use bevy_prototype_debug_lines::DebugLinesPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Multi-Arm Pendulum".into(),
                resolution: (SCREEN_WIDTH, SCREEN_HEIGHT).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND))
        .init_resource::<Config>()
        .init_resource::<ChainRng>()
        .init_resource::<Chain>()
        .init_resource::<DrawList>()
        .init_resource::<ShapePool>()
        .add_plugin(ResourceInspectorPlugin::<Config>::default())
        .add_plugin(DebugLinesPlugin::default())
        .add_plugin(StatePlugin)
        .add_plugin(ChainPlugin)
        .add_startup_system(setup)
        .add_systems((render_chain, present, draw_trail).chain().after(ChainSet))
        .register_type::<Config>()
        .run()
}

/// Systems that move and edit the chain, in frame order.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct ChainSet;

pub struct ChainPlugin;

impl Plugin for ChainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            (
                follow_pivot,
                simulate.in_set(OnUpdate(AppState::Playing)),
                chain_listen,
                settle.in_set(OnUpdate(AppState::Pause)),
            )
                .chain()
                .in_set(ChainSet),
        );
    }
}

fn setup(mut commands: Commands) {
    // Setup Camera
    commands.spawn(Camera2dBundle {
        transform: Transform::from_xyz(0., 0., 100.),
        ..Default::default()
    });

    info!("Press 'A' to add a segment, 'R' to remove one, 'Space' to pause, 'C' to reset");
}

fn follow_pivot(config: Res<Config>, mut chain: ResMut<Chain>) {
    if config.is_changed() && chain.root().position != config.pivot {
        chain.set_pivot(config.pivot);
    }
}

fn simulate(mut chain: ResMut<Chain>, time: Res<Time>) {
    chain.update(time.delta_seconds());
}

// Arms added while paused still need placing off their parent.
fn settle(mut chain: ResMut<Chain>) {
    chain.update(0.0);
}

fn chain_listen(keys: Res<Input<KeyCode>>, mut chain: ResMut<Chain>, mut rng: ResMut<ChainRng>) {
    if keys.just_pressed(KeyCode::A) {
        chain.add_segment(&mut rng);
        info!("Added segment, chain length {}", chain.len());
    }

    if keys.just_pressed(KeyCode::R) {
        match chain.remove_segment() {
            Some(_) => info!("Removed segment, chain length {}", chain.len()),
            None => debug!("Only the root is left"),
        }
    }
}
