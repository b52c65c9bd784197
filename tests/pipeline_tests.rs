//! Integration tests for the terrain -> registry -> accumulation pipeline.

use lumen2d::prelude::*;

fn triangle(offset: f32) -> [Vec2; 3] {
    [
        Vec2::new(offset, offset),
        Vec2::new(offset + 10.0, offset),
        Vec2::new(offset, offset + 10.0),
    ]
}

/// One simulated frame: step physics, rebuild, sync, trace (advance).
fn run_frame(physics: &mut Physics, world: &World, state: &mut TraceState) {
    physics.step();
    let staged = world.stage_shapes(physics).expect("stage shapes");
    state.sync_shapes(staged);
    state.advance();
}

#[test]
fn test_rebuild_is_deterministic() {
    let mut physics = Physics::default();
    let mut world = World::new();
    world
        .append(&mut physics, TerrainData::new(&triangle(0.0), Material::diffuse(Vec3::ONE)))
        .unwrap();
    world
        .append(&mut physics, TerrainData::new(&triangle(40.0), Material::emissive(Vec3::X)))
        .unwrap();

    let first = world.stage_shapes(&physics).unwrap();
    physics.step();
    let second = world.stage_shapes(&physics).unwrap();

    assert_eq!(first, second);
    let a: Vec<Shape> = first.iter().collect();
    let b: Vec<Shape> = second.iter().collect();
    assert_eq!(a, b);
    assert_eq!(a.len(), 6);
}

#[test]
fn test_ten_frames_after_one_reflective_triangle() {
    let mut physics = Physics::default();
    let mut world = World::new();
    let mut state = TraceState::new();

    world
        .append(
            &mut physics,
            TerrainData::new(&triangle(100.0), Material::reflective(Vec3::ONE)),
        )
        .unwrap();

    let mut writers = Vec::new();
    for _ in 0..10 {
        physics.step();
        state.sync_shapes(world.stage_shapes(&physics).unwrap());
        writers.push(state.accumulation().write_index());
        state.advance();
        // the buffer just written now holds the newest estimate
        assert_eq!(state.accumulation().current_index(), *writers.last().unwrap());
    }

    assert_eq!(state.sample_index(), 10);
    assert_eq!(state.accumulation().current_index(), 0);
    assert_eq!(writers, vec![1, 0, 1, 0, 1, 0, 1, 0, 1, 0]);
    assert_eq!(state.shapes().len(), 3);
}

#[test]
fn test_new_piece_restarts_accumulation() {
    let mut physics = Physics::default();
    let mut world = World::new();
    let mut state = TraceState::new();

    world
        .append(&mut physics, TerrainData::new(&triangle(0.0), Material::default()))
        .unwrap();
    for _ in 0..5 {
        run_frame(&mut physics, &world, &mut state);
    }
    assert_eq!(state.sample_index(), 5);

    world
        .append(&mut physics, TerrainData::new(&triangle(30.0), Material::default()))
        .unwrap();
    let reset = state.sync_shapes(world.stage_shapes(&physics).unwrap());
    assert!(reset);
    assert_eq!(state.sample_index(), 0);

    state.advance();
    run_frame(&mut physics, &world, &mut state);
    assert_eq!(state.sample_index(), 2);
}

#[test]
fn test_clear_restarts_accumulation() {
    let mut physics = Physics::default();
    let mut world = World::new();
    let mut state = TraceState::new();

    world
        .append(&mut physics, TerrainData::new(&triangle(0.0), Material::default()))
        .unwrap();
    for _ in 0..3 {
        run_frame(&mut physics, &world, &mut state);
    }

    world.clear(&mut physics);
    state.clear_shapes();
    assert_eq!(state.sample_index(), 0);

    // the empty rebuild matches the cleared registry, so sampling continues
    run_frame(&mut physics, &world, &mut state);
    run_frame(&mut physics, &world, &mut state);
    assert_eq!(state.sample_index(), 2);
    assert!(state.shapes().is_empty());
}

#[test]
fn test_alternation_after_reset() {
    let mut state = TraceState::new();
    for n in 0..7u32 {
        let acc = state.accumulation();
        assert_eq!(acc.current_index(), (n % 2) as usize);
        assert_eq!(acc.previous_index(), ((n + 1) % 2) as usize);
        state.advance();
    }
    state.clear_shapes();
    assert_eq!(state.accumulation().current_index(), 0);
}

#[test]
fn test_capacity_limit_through_world() {
    let mut physics = Physics::default();
    let mut world = World::new();

    // 170 triangles = 510 segments, one more brings 513
    for i in 0..170 {
        world
            .append(&mut physics, TerrainData::new(&triangle(i as f32), Material::default()))
            .unwrap();
    }
    assert_eq!(world.stage_shapes(&physics).unwrap().len(), 510);

    world
        .append(&mut physics, TerrainData::new(&triangle(500.0), Material::default()))
        .unwrap();
    let err = world.stage_shapes(&physics).unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded { capacity: 512 }));
}

#[test]
fn test_registry_capacity_boundary() {
    let mut state = TraceState::new();
    for i in 0..SHAPE_CAPACITY {
        state
            .append_shape(Vec2::splat(i as f32), Vec2::ONE, Material::default())
            .expect("append within capacity");
    }
    assert_eq!(state.shapes().len(), 512);
    assert!(state
        .append_shape(Vec2::ZERO, Vec2::ONE, Material::default())
        .is_err());
    assert_eq!(state.shapes().len(), 512);
}

#[test]
fn test_for_each_reports_terrain_outline() {
    let mut physics = Physics::default();
    let mut world = World::new();
    world
        .append(&mut physics, TerrainData::new(&triangle(0.0), Material::emissive(Vec3::ONE)))
        .unwrap();
    let registry = world.stage_shapes(&physics).unwrap();

    let mut edges = Vec::new();
    registry.for_each(|a, b, m| edges.push((a, b, m.kind)));
    let t = triangle(0.0);
    assert_eq!(
        edges,
        vec![
            (t[0], t[1], MaterialKind::Emissive),
            (t[1], t[2], MaterialKind::Emissive),
            (t[2], t[0], MaterialKind::Emissive),
        ]
    );
    // restartable
    assert_eq!(registry.iter().count(), registry.iter().count());
}
