use bevy::prelude::*;

use crate::{
    chain::Chain,
    resources::{ChainRng, Config},
};

pub struct StatePlugin;

impl Plugin for StatePlugin {
    fn build(&self, app: &mut App) {
        app.add_state::<AppState>()
            .add_system(reset_listen.in_set(OnUpdate(AppState::Playing)))
            .add_system(pause_listen.in_set(OnUpdate(AppState::Playing)))
            .add_system(pause_stop_listen.in_set(OnUpdate(AppState::Pause)))
            .add_system(reset.in_set(OnUpdate(AppState::Reset)));
    }
}

#[derive(States, PartialEq, Eq, Debug, Clone, Hash, Default)]
pub enum AppState {
    #[default]
    Playing,
    Pause,
    Reset,
}

fn reset(
    mut chain: ResMut<Chain>,
    mut rng: ResMut<ChainRng>,
    config: Res<Config>,
    mut app_state: ResMut<NextState<AppState>>,
) {
    chain.reset();
    *rng = ChainRng::from_config(&config);
    info!("Reset, chain back to its root");
    app_state.set(AppState::Playing);
}

pub fn reset_listen(keys: Res<Input<KeyCode>>, mut app_state: ResMut<NextState<AppState>>) {
    if keys.just_pressed(KeyCode::C) {
        debug!("Reset requested");
        app_state.set(AppState::Reset);
    }
}

pub fn pause_listen(keys: Res<Input<KeyCode>>, mut app_state: ResMut<NextState<AppState>>) {
    if keys.just_pressed(KeyCode::Space) {
        info!("Paused, 'A' and 'R' still edit the chain");
        app_state.set(AppState::Pause);
    }
}

pub fn pause_stop_listen(keys: Res<Input<KeyCode>>, mut app_state: ResMut<NextState<AppState>>) {
    if keys.just_pressed(KeyCode::Space) {
        info!("Resumed");
        app_state.set(AppState::Playing);
    }
}
