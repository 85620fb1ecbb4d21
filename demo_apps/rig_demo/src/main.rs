//! Headless rig demo.
//!
//! Loads the leg and crane assets, builds their rigs from the bundled JSON
//! configs and steps a fixed-rate simulation. The leg walks on a gait cycle
//! while the crane hook follows a scripted sequence of target key presses.
//! An asset that fails to load is logged and left out of the loop.
//!
//! Run with `RUST_LOG=info cargo run -p rig_demo` (add `trace` for per-frame
//! solver output). An optional first argument sets the number of frames.

use std::path::PathBuf;

use anyhow::Context;
use glam::Vec3;
use log::{error, info, warn};
use marionette::prelude::*;

const SIMULATION_HZ: u32 = 60;
const DEFAULT_FRAMES: u64 = 600;

/// Key pressed on a given frame, with the fast modifier flag.
const CRANE_SCRIPT: &[(u64, TargetKey, bool)] = &[
    (60, TargetKey::Back, true),
    (90, TargetKey::Right, true),
    (150, TargetKey::Forward, false),
    (180, TargetKey::Forward, true),
    (240, TargetKey::Left, true),
    (300, TargetKey::Up, false),
    (360, TargetKey::Reset, false),
    (420, TargetKey::Back, true),
    (480, TargetKey::Right, true),
];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("frame count must be an integer")?,
        None => DEFAULT_FRAMES,
    };

    let asset_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    let loader = AssetLoader::new(FileAssetReader::new(&asset_dir));
    let mut scene = Scene::new();

    // A rig whose asset or config fails to load simply never appears.
    let mut state = RigState::default();
    let mut gait = GaitDriver::default();
    let mut controller = TargetController::default();

    if let Some((leg, config)) = load_rig(&loader, &mut scene, "leg.json", "leg.rig.json") {
        state.rigs.extend(leg.rigs);
        gait = GaitDriver::new(config.gait);
    }
    if let Some((crane, config)) = load_rig(&loader, &mut scene, "crane.json", "crane.rig.json") {
        state.rigs.extend(crane.rigs);
        state.target = crane.target;
        controller = TargetController::new(config.input);
    }
    if state.rigs.is_empty() {
        warn!("No rig was built; stepping an empty scene");
    }

    let mut clock = FrameClock::fixed(SIMULATION_HZ);

    while clock.frames() < frames {
        let tick = clock.tick();

        let mut input = gait.drive(FrameInput::new(), "leg", tick.time);
        for &(_, key, fast) in CRANE_SCRIPT.iter().filter(|(at, ..)| *at == tick.frame) {
            input = input.with_command(controller.command(key, fast));
        }

        state = KinematicsSolver::update(&mut scene, state, tick.dt, &input);

        if tick.frame % u64::from(SIMULATION_HZ) == 0 {
            report(&scene, &state);
        }
    }

    info!(
        "Simulated {} frame(s) ({:.2}s of rig time) in {:.3}s",
        clock.frames(),
        clock.simulated_seconds(),
        clock.wall_seconds()
    );
    Ok(())
}

/// Loads `asset` and its rig config through the same reader, then builds the
/// rigs. Any load failure is logged and yields `None`.
fn load_rig(
    loader: &AssetLoader<FileAssetReader>,
    scene: &mut Scene,
    asset: &str,
    config_uri: &str,
) -> Option<(RigState, RigConfig)> {
    let config: RigConfig = match loader.fetch_json(config_uri) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}; '{asset}' will not be rigged");
            return None;
        }
    };
    let Ok(loaded) = loader.load(asset, scene) else {
        warn!("'{asset}' failed to load and will not appear");
        return None;
    };
    let state = RigBuilder::new(scene, loaded.root).build_from_config(scene, &config);
    Some((state, config))
}

fn report(scene: &Scene, state: &RigState) {
    if let Some(leg) = state.chain("leg") {
        let ankle = leg
            .joints()
            .last()
            .and_then(|joint| scene.world_position(joint.pivot()))
            .unwrap_or(Vec3::ZERO);
        info!("[{:>4}] leg ankle at {ankle:.3}", state.frame);
    }
    if let Some(hook) = state.slide("HookGroup") {
        let position = scene.world_position(hook.assembly()).unwrap_or(Vec3::ZERO);
        info!(
            "[{:>4}] hook s = {:.3} in [{:.3}, {:.3}], world {position:.3}, target {:.2}",
            state.frame,
            hook.slide().scalar(),
            hook.axis().min(),
            hook.axis().max(),
            state.target.position()
        );
    }
}
