//! End-to-end engine scenarios: loading, toggling and frame output.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use heart_morph::prelude::*;
use heart_morph::TargetKind;
use image::{Rgba, RgbaImage};

fn temp_png(name: &str, image: &RgbaImage) -> PathBuf {
    let path = std::env::temp_dir().join(format!("heart-morph-{}-{name}.png", std::process::id()));
    image.save(&path).unwrap();
    path
}

fn wait_for_field(engine: &mut Engine) {
    for _ in 0..500 {
        engine.poll();
        if !engine.state().is_loading() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("image never finished loading");
}

#[test]
fn photo_on_disk_becomes_the_target() {
    // Left half opaque, right half transparent
    let image = RgbaImage::from_fn(8, 8, |x, _| {
        if x < 4 {
            Rgba([200, 40, 90, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let path = temp_png("half", &image);

    let config = MorphConfig::default().with_image(&path).with_raster(8, 8).with_seed(5);
    let mut engine = Engine::new(config);
    engine.start();
    wait_for_field(&mut engine);
    std::fs::remove_file(&path).ok();

    let field = engine.field().unwrap();
    assert_eq!(field.kind(), TargetKind::Image);
    assert_eq!(field.len(), 32);
    assert!(field.target().iter().all(|p| p.x < 0.0 && p.z == 0.0));

    let expected = Vec3::new(200.0, 40.0, 90.0) / 255.0;
    assert!(field.colors().iter().all(|c| (*c - expected).length() < 1e-6));
}

#[test]
fn undecodable_file_falls_back_to_grid() {
    let path = std::env::temp_dir().join(format!("heart-morph-{}-garbage.png", std::process::id()));
    std::fs::write(&path, b"definitely not a png").unwrap();

    let mut engine = Engine::new(MorphConfig::default().with_image(&path).with_particle_count(100));
    engine.start();
    wait_for_field(&mut engine);
    std::fs::remove_file(&path).ok();

    match engine.state() {
        FieldState::Failed { fallback, error } => {
            assert_eq!(fallback.len(), 100);
            assert!(matches!(error, ImageError::Decode(_)));
        }
        other => panic!("expected grid fallback, got {other:?}"),
    }
    // The fallback is fully usable
    assert_eq!(engine.toggle(0.0), Some(Shape::Photo));
}

#[test]
fn eased_transition_over_two_seconds() {
    let config = MorphConfig::default()
        .with_particle_count(16)
        .with_transition_duration(2.0)
        .with_easing(Easing::QuadInOut);
    let mut engine = Engine::new(config);
    engine.start();

    engine.toggle(0.0);
    let quarter = engine.tick(0.5).unwrap().morph;
    let half = engine.tick(1.0).unwrap().morph;
    assert!(quarter < 0.25, "ease-in should lag linear, got {quarter}");
    assert!(half > 0.0 && half < 1.0);
    assert!(half > 0.25);

    let done = engine.tick(2.0).unwrap();
    assert_eq!(done.morph, 1.0);
    assert_eq!(done.pulse, 1.0);
    assert_eq!(engine.phase(), MorphPhase::Photo);
}

#[test]
fn reversing_mid_flight_heads_back_to_the_heart() {
    let mut engine = Engine::new(MorphConfig::default().with_particle_count(16).with_transition_duration(1.0));
    engine.start();

    engine.toggle(0.0);
    let peak = engine.tick(0.5).unwrap().morph;
    assert_eq!(engine.toggle(0.5), Some(Shape::Heart));

    let mut last = peak;
    let mut t = 0.5;
    while t < 1.6 {
        t += 1.0 / 60.0;
        let morph = engine.tick(t).unwrap().morph;
        assert!(morph <= last + 1e-6);
        last = morph;
    }
    assert_eq!(last, 0.0);
    assert_eq!(engine.phase(), MorphPhase::Heart);
}

#[test]
fn frames_compose_positions_for_every_particle() {
    let mut engine = Engine::new(MorphConfig::default().with_particle_count(25).with_seed(2));
    engine.start();
    let mut clock = ManualClock::at_hz(60.0);

    let frame = engine.frame(&mut clock).unwrap();
    let positions = compose_positions(frame.field, &frame.inputs);
    let colors = compose_colors(frame.field, Vec3::new(1.0, 0.0, 0.2), frame.inputs.morph);
    assert_eq!(positions.len(), 25);
    assert_eq!(colors.len(), 25);
    assert!(colors.iter().all(|c| *c == Vec3::new(1.0, 0.0, 0.2)));
}

#[test]
fn config_survives_a_round_trip_through_disk() {
    let path = std::env::temp_dir().join(format!("heart-morph-{}-config.json", std::process::id()));
    let config = MorphConfig::default()
        .with_particle_count(321)
        .with_easing(Easing::CubicInOut)
        .with_seed(11);
    config.save(&path).unwrap();
    let loaded = MorphConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);
}
