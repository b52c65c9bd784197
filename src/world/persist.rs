//! Scene file: a brush record followed by fixed-size terrain records.
//!
//! All fields little-endian:
//! ```text
//! brush:   color 3×f32, kind u32                              (16 bytes)
//! terrain: vertex_count u64, 3×(f32, f32), color 3×f32, kind u32  (48 bytes)
//! ```
//! Unused vertex slots are written as zero.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Vec2, Vec3};

use super::TerrainData;
use crate::physics::TERRAIN_MAX_VERTS;
use crate::render::{Material, MaterialKind};
use crate::util::{Error, Result};

pub const BRUSH_RECORD_SIZE: usize = 16;
pub const TERRAIN_RECORD_SIZE: usize = 48;

/// Everything a scene file holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub brush: Material,
    pub terrain: Vec<TerrainData>,
}

/// Write `scene` to `path`, creating parent directories.
///
/// The scene is validated before anything touches disk and written through a
/// sibling temp file, so a failed save leaves the previous file intact.
pub fn save(path: impl AsRef<Path>, scene: &Scene) -> Result<()> {
    let path = path.as_ref();
    validate_scene(scene)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    let written = File::create(&tmp).map_err(Error::from).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_scene(&mut writer, scene)?;
        writer.flush()?;
        Ok(())
    });
    if let Err(e) = written {
        fs::remove_file(&tmp).ok();
        return Err(e);
    }
    fs::rename(&tmp, path)?;
    tracing::info!(path = %path.display(), pieces = scene.terrain.len(), "scene saved");
    Ok(())
}

/// Read a scene from `path`. A missing file is an empty scene, not an error.
pub fn load(path: impl AsRef<Path>) -> Result<Option<Scene>> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no saved scene");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let scene = read_scene(&bytes)?;
    tracing::info!(path = %path.display(), pieces = scene.terrain.len(), "scene loaded");
    Ok(Some(scene))
}

/// Check every terrain record fits the fixed layout. Record 0 is the brush.
pub fn validate_scene(scene: &Scene) -> Result<()> {
    for (i, piece) in scene.terrain.iter().enumerate() {
        let count = piece.vertices.len();
        if count > TERRAIN_MAX_VERTS {
            return Err(Error::record(i + 1, format!("{count} vertices")));
        }
    }
    Ok(())
}

pub fn write_scene<W: Write>(writer: &mut W, scene: &Scene) -> Result<()> {
    validate_scene(scene)?;
    write_material(writer, scene.brush)?;
    for piece in &scene.terrain {
        let count = piece.vertices.len();
        writer.write_u64::<LittleEndian>(count as u64)?;
        for slot in 0..TERRAIN_MAX_VERTS {
            let v = piece.vertices.get(slot).copied().unwrap_or(Vec2::ZERO);
            writer.write_f32::<LittleEndian>(v.x)?;
            writer.write_f32::<LittleEndian>(v.y)?;
        }
        write_material(writer, piece.material)?;
    }
    Ok(())
}

/// The file a session loads at startup and writes back on exit.
///
/// A file that exists but fails to decode is never overwritten: the slot
/// refuses to save until it is pointed at another path.
#[derive(Debug, Clone)]
pub struct SceneSlot {
    path: PathBuf,
    writable: bool,
}

impl SceneSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writable: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Read the slot's file. A decode or read failure locks the slot.
    pub fn load(&mut self) -> Result<Option<Scene>> {
        let loaded = load(&self.path);
        if loaded.is_err() {
            self.writable = false;
        }
        loaded
    }

    /// Refuse later saves, e.g. after the decoded scene failed to restore.
    pub fn lock(&mut self) {
        self.writable = false;
    }

    /// Point the slot at a file the user opened or saved to.
    pub fn retarget(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.writable = true;
    }

    /// Write `scene` unless the slot is locked. Returns whether it wrote.
    pub fn save(&self, scene: &Scene) -> Result<bool> {
        if !self.writable {
            tracing::warn!(path = %self.path.display(), "keeping unreadable scene file, not saving over it");
            return Ok(false);
        }
        save(&self.path, scene)?;
        Ok(true)
    }
}

/// Decode a whole scene file already in memory.
///
/// A trailing partial record is dropped with a warning.
pub fn read_scene(bytes: &[u8]) -> Result<Scene> {
    if bytes.len() < BRUSH_RECORD_SIZE {
        tracing::warn!(len = bytes.len(), "scene file too short for brush record");
        return Ok(Scene::default());
    }
    let (mut head, body) = bytes.split_at(BRUSH_RECORD_SIZE);
    let brush = read_material(&mut head).map_err(|reason| Error::record(0, reason))?;

    let records = body.chunks_exact(TERRAIN_RECORD_SIZE);
    if !records.remainder().is_empty() {
        tracing::warn!(
            trailing = records.remainder().len(),
            "ignoring truncated terrain record"
        );
    }

    let terrain = records
        .enumerate()
        .map(|(i, record)| read_terrain(record).map_err(|reason| Error::record(i + 1, reason)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Scene { brush, terrain })
}

fn write_material<W: Write>(writer: &mut W, material: Material) -> Result<()> {
    for c in material.color.to_array() {
        writer.write_f32::<LittleEndian>(c)?;
    }
    writer.write_u32::<LittleEndian>(material.kind.as_raw())?;
    Ok(())
}

fn read_material(reader: &mut impl Read) -> std::result::Result<Material, String> {
    let mut color = [0.0f32; 3];
    for c in &mut color {
        *c = reader.read_f32::<LittleEndian>().map_err(|e| e.to_string())?;
    }
    let raw = reader.read_u32::<LittleEndian>().map_err(|e| e.to_string())?;
    let kind = MaterialKind::from_raw(raw).ok_or_else(|| format!("unknown material kind {raw}"))?;
    Ok(Material::new(kind, Vec3::from_array(color)))
}

fn read_terrain(mut record: &[u8]) -> std::result::Result<TerrainData, String> {
    let count = record.read_u64::<LittleEndian>().map_err(|e| e.to_string())?;
    if count > TERRAIN_MAX_VERTS as u64 {
        return Err(format!("vertex count {count} above {TERRAIN_MAX_VERTS}"));
    }
    let mut slots = [Vec2::ZERO; TERRAIN_MAX_VERTS];
    for slot in &mut slots {
        let x = record.read_f32::<LittleEndian>().map_err(|e| e.to_string())?;
        let y = record.read_f32::<LittleEndian>().map_err(|e| e.to_string())?;
        *slot = Vec2::new(x, y);
    }
    let material = read_material(&mut record)?;
    Ok(TerrainData::new(&slots[..count as usize], material))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scene() -> Scene {
        Scene {
            brush: Material::reflective(Vec3::new(0.25, 0.5, 0.75)),
            terrain: vec![TerrainData::new(
                &[Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)],
                Material::emissive(Vec3::ONE),
            )],
        }
    }

    #[test]
    fn test_record_layout() {
        let mut bytes = Vec::new();
        write_scene(&mut bytes, &sample_scene()).unwrap();
        assert_eq!(bytes.len(), BRUSH_RECORD_SIZE + TERRAIN_RECORD_SIZE);
        // brush kind
        assert_eq!(&bytes[12..16], &1u32.to_le_bytes());
        // vertex count
        assert_eq!(&bytes[16..24], &3u64.to_le_bytes());
        // first vertex x
        assert_eq!(&bytes[24..28], &1.0f32.to_le_bytes());
        // terrain kind
        assert_eq!(&bytes[60..64], &2u32.to_le_bytes());
    }

    #[test]
    fn test_truncated_tail_is_dropped() {
        let mut bytes = Vec::new();
        write_scene(&mut bytes, &sample_scene()).unwrap();
        bytes.extend_from_slice(&[0u8; 20]);
        let scene = read_scene(&bytes).unwrap();
        assert_eq!(scene, sample_scene());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let mut bytes = Vec::new();
        write_scene(&mut bytes, &sample_scene()).unwrap();
        bytes[60..64].copy_from_slice(&9u32.to_le_bytes());
        let err = read_scene(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_vertex_count_above_cap_rejected() {
        let mut bytes = Vec::new();
        write_scene(&mut bytes, &sample_scene()).unwrap();
        bytes[16..24].copy_from_slice(&4u64.to_le_bytes());
        assert!(matches!(read_scene(&bytes), Err(Error::InvalidRecord { .. })));
    }

    #[test]
    fn test_oversized_piece_rejected_before_writing() {
        let mut scene = sample_scene();
        scene.terrain.push(TerrainData::new(&[Vec2::ZERO; 4], Material::default()));
        let mut bytes = Vec::new();
        let err = write_scene(&mut bytes, &scene).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { index: 2, .. }));
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_short_file_is_default_scene() {
        let scene = read_scene(&[0u8; 7]).unwrap();
        assert_eq!(scene, Scene::default());
    }
}
