//! Integration tests for the scene file: round-trip and missing-file handling.

use lumen2d::prelude::*;

use tempfile::TempDir;

fn sample_terrain() -> Vec<TerrainData> {
    vec![
        TerrainData::new(
            &[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)],
            Material::diffuse(Vec3::new(1.0, 1.0, 1.0)),
        ),
        TerrainData::new(
            &[Vec2::new(5.0, 5.0), Vec2::new(15.0, 5.0), Vec2::new(5.0, 15.0)],
            Material::emissive(Vec3::new(1.0, 0.0, 0.0)),
        ),
    ]
}

#[test]
fn test_roundtrip_world_through_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("game.data");

    let mut physics = Physics::default();
    let mut world = World::new();
    world.brush = Material::reflective(Vec3::new(0.2, 0.4, 0.6));
    for piece in sample_terrain() {
        world.append(&mut physics, piece).unwrap();
    }
    persist::save(&path, &world.scene(&physics)).expect("Failed to save");

    let loaded = persist::load(&path).expect("Failed to load").expect("file exists");
    assert_eq!(loaded.brush, world.brush);
    assert_eq!(loaded.terrain, sample_terrain());

    // restore into a fresh world and compare what physics reports
    let mut physics2 = Physics::default();
    let mut world2 = World::new();
    world2.restore(&mut physics2, loaded).unwrap();
    assert_eq!(world2.scene(&physics2), world.scene(&physics));
    assert_eq!(
        world2.stage_shapes(&physics2).unwrap(),
        world.stage_shapes(&physics).unwrap()
    );
}

#[test]
fn test_file_size_matches_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.data");
    let scene = Scene {
        brush: Material::default(),
        terrain: sample_terrain(),
    };
    persist::save(&path, &scene).unwrap();
    let len = std::fs::metadata(&path).unwrap().len() as usize;
    assert_eq!(len, persist::BRUSH_RECORD_SIZE + 2 * persist::TERRAIN_RECORD_SIZE);
}

#[test]
fn test_missing_file_is_empty_scene() {
    let dir = TempDir::new().unwrap();
    let loaded = persist::load(dir.path().join("nope.data")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_save_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("nested").join("game.data");
    persist::save(&path, &Scene::default()).unwrap();
    let loaded = persist::load(&path).unwrap().unwrap();
    assert_eq!(loaded, Scene::default());
    assert!(loaded.terrain.is_empty());
}

#[test]
fn test_empty_scene_roundtrip_keeps_brush() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("brush.data");
    let scene = Scene {
        brush: Material::emissive(Vec3::new(0.9, 0.8, 0.1)),
        terrain: Vec::new(),
    };
    persist::save(&path, &scene).unwrap();
    assert_eq!(persist::load(&path).unwrap(), Some(scene));
}

fn write_sample(path: &std::path::Path) -> Vec<u8> {
    let scene = Scene {
        brush: Material::default(),
        terrain: sample_terrain(),
    };
    persist::save(path, &scene).unwrap();
    std::fs::read(path).unwrap()
}

#[test]
fn test_unreadable_file_survives_exit_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.data");
    let mut bytes = write_sample(&path);
    // second terrain record gets an unknown material kind
    let kind = persist::BRUSH_RECORD_SIZE + 2 * persist::TERRAIN_RECORD_SIZE - 4;
    bytes[kind..kind + 4].copy_from_slice(&9u32.to_le_bytes());
    std::fs::write(&path, &bytes).unwrap();

    let mut slot = SceneSlot::new(&path);
    assert!(slot.load().is_err());
    assert!(!slot.is_writable());
    assert!(!slot.save(&Scene::default()).unwrap());
    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_retargeted_slot_saves_to_new_path() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.data");
    std::fs::write(&broken, [0xffu8; 16]).unwrap();
    let opened = dir.path().join("opened.data");

    let mut slot = SceneSlot::new(&broken);
    assert!(slot.load().is_err());
    slot.retarget(&opened);
    let scene = Scene {
        brush: Material::reflective(Vec3::ONE),
        terrain: sample_terrain(),
    };
    assert!(slot.save(&scene).unwrap());
    assert_eq!(persist::load(&opened).unwrap(), Some(scene));
    assert_eq!(std::fs::read(&broken).unwrap(), [0xffu8; 16]);
}

#[test]
fn test_failed_save_keeps_previous_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.data");
    let before = write_sample(&path);

    let mut terrain = sample_terrain();
    terrain.push(TerrainData::new(&[Vec2::ZERO; 4], Material::default()));
    let scene = Scene {
        brush: Material::default(),
        terrain,
    };
    let err = persist::save(&path, &scene).unwrap_err();
    assert!(matches!(err, Error::InvalidRecord { index: 3, .. }));
    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert!(!dir.path().join("game.data.tmp").exists());
}

#[test]
fn test_rejected_open_keeps_world() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.data");
    let mut bytes = write_sample(&path);
    // first terrain record decodes with only two vertices
    let count = persist::BRUSH_RECORD_SIZE;
    bytes[count..count + 8].copy_from_slice(&2u64.to_le_bytes());
    std::fs::write(&path, &bytes).unwrap();

    let mut physics = Physics::default();
    let mut world = World::new();
    world.append(&mut physics, sample_terrain().remove(1)).unwrap();
    let before = world.scene(&physics);

    let loaded = persist::load(&path).unwrap().unwrap();
    assert!(world.restore(&mut physics, loaded).is_err());
    assert_eq!(world.scene(&physics), before);
}
