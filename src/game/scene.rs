//! Named object volumes for everything placed in the forest.
//!
//! Each object is known by the mesh name it was exported under and carries a
//! local-space bounding box plus a flat colour used when drawing it. A built-in
//! table covers every object the game needs; an OBJ file can be scanned on top
//! to replace those bounds with ones measured from real geometry.

use crate::game::collision::AxisAlignedBox;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Choppable spruce.
pub const TREE: &str = "Tree_Spruce_small_01_Cylinder.016";
/// Stump left behind by a felled tree.
pub const STUMP: &str = "Stump_average_low_Cube.014";
/// Fallen log.
pub const LOG: &str = "Log_big_regular_Cylinder.015";
/// Giant tree at the centre of the clearing.
pub const GIANT_TREE: &str = "fattree_Mesh.003";
/// Villager who hands out quests.
pub const KNIGHT: &str = "knight";
/// Boulder on the outer ring.
pub const ROCK: &str = "stone_1";
/// Ground plane.
pub const GROUND: &str = "SimpleGround_Plane.024";
/// Chicken.
pub const CHICKEN: &str = "chicken";
/// The player's axe.
pub const AXE: &str = "axe";
/// Bushes and flowers, in scatter order.
pub const DECORATIONS: [&str; 4] = [
    "Grass_bush_high_01_Plane.002",
    "Grass_bush_low_01_Plane.005",
    "Flower_bush_white_Plane.023",
    "Flower_bush_red_Plane.031",
];

/// Object used when faces appear before any `o`/`g` statement.
const UNNAMED_OBJECT: &str = "default";

/// Errors raised while building or querying the registry.
#[derive(Debug, Error)]
pub enum SceneError {
    /// No object with this name is registered.
    #[error("no object named {0:?} in the scene")]
    NotFound(String),
    /// The OBJ file could not be read.
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    /// A line of the OBJ file is malformed.
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
}

/// Bounds and draw colour of one named object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    /// Local-space bounding box.
    pub bounds: AxisAlignedBox,
    /// RGBA8 colour.
    pub tint: [u8; 4],
}

impl SceneObject {
    fn new(min: [f32; 3], max: [f32; 3], tint: [u8; 4]) -> Self {
        Self {
            bounds: AxisAlignedBox::new(min, max),
            tint,
        }
    }
}

/// Lookup table from object name to [`SceneObject`].
#[derive(Debug, Clone)]
pub struct SceneRegistry {
    objects: HashMap<String, SceneObject>,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl SceneRegistry {
    /// A registry holding only the built-in volumes.
    pub fn with_defaults() -> Self {
        let builtin = [
            (TREE, SceneObject::new([-4.0, 0.0, -4.0], [4.0, 14.0, 4.0], [46, 97, 52, 255])),
            (STUMP, SceneObject::new([-0.6, 0.0, -0.6], [0.6, 0.8, 0.6], [120, 84, 52, 255])),
            (LOG, SceneObject::new([-1.0, 0.0, -0.8], [22.0, 1.5, 3.3], [104, 72, 44, 255])),
            (GIANT_TREE, SceneObject::new([-6.0, 0.0, -5.0], [4.0, 18.0, 5.0], [88, 64, 40, 255])),
            (KNIGHT, SceneObject::new([-0.08, 0.0, -0.06], [0.08, 0.3, 0.06], [150, 156, 168, 255])),
            (ROCK, SceneObject::new([-0.5, 0.0, -0.5], [0.5, 0.7, 0.5], [118, 118, 124, 255])),
            (GROUND, SceneObject::new([-50.0, 0.0, -50.0], [50.0, 0.0, 50.0], [92, 140, 62, 255])),
            (CHICKEN, SceneObject::new([-0.25, 0.0, -0.35], [0.25, 0.6, 0.35], [240, 236, 226, 255])),
            (AXE, SceneObject::new([-0.03, -0.25, -0.03], [0.03, 0.25, 0.03], [150, 100, 60, 255])),
            (DECORATIONS[0], SceneObject::new([-0.6, 0.0, -0.6], [0.6, 1.0, 0.6], [70, 130, 50, 255])),
            (DECORATIONS[1], SceneObject::new([-0.6, 0.0, -0.6], [0.6, 0.5, 0.6], [84, 148, 58, 255])),
            (DECORATIONS[2], SceneObject::new([-0.3, 0.0, -0.3], [0.3, 0.5, 0.3], [236, 236, 240, 255])),
            (DECORATIONS[3], SceneObject::new([-0.3, 0.0, -0.3], [0.3, 0.5, 0.3], [200, 48, 48, 255])),
        ];

        Self {
            objects: builtin
                .into_iter()
                .map(|(name, object)| (name.to_string(), object))
                .collect(),
        }
    }

    /// Built-in volumes, overridden by the OBJ file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, SceneError> {
        let mut registry = Self::with_defaults();
        if let Some(path) = path {
            let updated = registry.merge_obj(BufReader::new(File::open(path)?))?;
            log::info!("Loaded {updated} object bounds from {}", path.display());
        }
        Ok(registry)
    }

    /// Bounds of the object called `name`.
    pub fn lookup(&self, name: &str) -> Result<&AxisAlignedBox, SceneError> {
        self.object(name).map(|object| &object.bounds)
    }

    /// The object called `name`.
    pub fn object(&self, name: &str) -> Result<&SceneObject, SceneError> {
        self.objects
            .get(name)
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are registered.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn without(mut self, name: &str) -> Self {
        self.objects.remove(name);
        self
    }

    /// Scans Wavefront OBJ text and replaces the bounds of every object that has faces.
    ///
    /// Only `v`, `f`, `o` and `g` statements are read. A box covers the vertices
    /// referenced by the object's faces, so shared vertex pools do not leak into
    /// neighbouring objects. Objects not yet known get a neutral grey tint.
    /// Returns the number of objects whose bounds were set.
    pub fn merge_obj(&mut self, reader: impl BufRead) -> Result<usize, SceneError> {
        let mut vertices: Vec<[f32; 3]> = Vec::new();
        let mut bounds: HashMap<String, AxisAlignedBox> = HashMap::new();
        let mut current = UNNAMED_OBJECT.to_string();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let number = index + 1;
            let mut fields = line.split_whitespace();

            match fields.next() {
                Some("v") => vertices.push(parse_vertex(fields, number)?),
                Some("o") | Some("g") => {
                    let name = fields.collect::<Vec<_>>().join(" ");
                    if !name.is_empty() {
                        current = name;
                    }
                }
                Some("f") => {
                    let aabb = bounds
                        .entry(current.clone())
                        .or_insert_with(AxisAlignedBox::empty);
                    for corner in fields {
                        let vertex = resolve_index(corner, vertices.len(), number)?;
                        aabb.expand_to_point(vertices[vertex]);
                    }
                }
                _ => {}
            }
        }

        let mut updated = 0;
        for (name, aabb) in bounds.into_iter().filter(|(_, aabb)| !aabb.is_empty()) {
            log::debug!("Object {name:?} bounds {:?}..{:?}", aabb.min, aabb.max);
            self.objects
                .entry(name)
                .and_modify(|object| object.bounds = aabb)
                .or_insert(SceneObject {
                    bounds: aabb,
                    tint: [160, 160, 160, 255],
                });
            updated += 1;
        }
        Ok(updated)
    }
}

fn parse_vertex<'a>(
    fields: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; 3], SceneError> {
    let coords = fields
        .take(3)
        .map(|field| {
            field.parse::<f32>().map_err(|e| SceneError::Parse {
                line,
                message: format!("bad vertex coordinate {field:?}: {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    match coords.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(SceneError::Parse {
            line,
            message: "vertex needs three coordinates".to_string(),
        }),
    }
}

/// Turns the position part of a face corner (`7`, `7/2`, `7//3`, `-1/...`) into a
/// zero-based index into the vertices read so far.
fn resolve_index(corner: &str, vertex_count: usize, line: usize) -> Result<usize, SceneError> {
    let raw = corner.split('/').next().unwrap_or_default();
    let bad = |message: String| SceneError::Parse { line, message };

    let value = raw
        .parse::<i64>()
        .map_err(|e| bad(format!("bad face index {raw:?}: {e}")))?;
    let count = vertex_count as i64;
    let resolved = match value {
        v if v > 0 => v - 1,
        v if v < 0 => count + v,
        _ => return Err(bad("face index 0 is not valid".to_string())),
    };

    if (0..count).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(bad(format!(
            "face index {value} out of range for {vertex_count} vertices"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_OBJECTS: &str = "\
# exported
o Tree_Spruce_small_01_Cylinder.016
v -1.0 0.0 -2.0
v 3.0 9.0 2.0
v 0.0 4.0 0.0
f 1 2 3
o rock_pile
v 10.0 0.0 10.0
v 12.0 1.0 11.0
v 11.0 2.0 12.0
f -3/1 -2/2/1 -1//4
";

    /// Every object the world needs is available without a scene file.
    #[test]
    fn test_defaults_cover_world_objects() {
        let registry = SceneRegistry::with_defaults();
        for name in [TREE, STUMP, LOG, GIANT_TREE, KNIGHT, ROCK, GROUND, CHICKEN, AXE]
            .into_iter()
            .chain(DECORATIONS)
        {
            assert!(registry.lookup(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let registry = SceneRegistry::with_defaults();
        match registry.lookup("Nope") {
            Err(SceneError::NotFound(name)) => assert_eq!(name, "Nope"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    /// Scanned bounds replace built-ins, keep the tint, and add unknown objects.
    #[test]
    fn test_merge_obj_overrides_and_adds() {
        let mut registry = SceneRegistry::with_defaults();
        let tint = registry.object(TREE).map(|o| o.tint).unwrap();
        let count = registry.len();

        let updated = registry.merge_obj(Cursor::new(TWO_OBJECTS)).unwrap();
        assert_eq!(updated, 2);
        assert_eq!(registry.len(), count + 1);

        let tree = registry.object(TREE).unwrap();
        assert_eq!(tree.bounds, AxisAlignedBox::new([-1.0, 0.0, -2.0], [3.0, 9.0, 2.0]));
        assert_eq!(tree.tint, tint);

        let rocks = registry.lookup("rock_pile").unwrap();
        assert_eq!(*rocks, AxisAlignedBox::new([10.0, 0.0, 10.0], [12.0, 2.0, 12.0]));
    }

    /// Vertices no face points at do not widen the box.
    #[test]
    fn test_unreferenced_vertices_ignored() {
        let mut registry = SceneRegistry::with_defaults();
        let obj = "o thing\nv 0 0 0\nv 1 1 1\nv 100 100 100\nf 1 2 1\n";
        registry.merge_obj(Cursor::new(obj)).unwrap();
        assert_eq!(
            *registry.lookup("thing").unwrap(),
            AxisAlignedBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0])
        );
    }

    #[test]
    fn test_parse_errors_report_line() {
        let mut registry = SceneRegistry::with_defaults();
        let err = registry
            .merge_obj(Cursor::new("o a\nv 0 0 0\nv 1 x 1\n"))
            .unwrap_err();
        assert!(matches!(err, SceneError::Parse { line: 3, .. }), "{err}");

        let err = registry
            .merge_obj(Cursor::new("o a\nv 0 0 0\nf 1 2 3\n"))
            .unwrap_err();
        assert!(matches!(err, SceneError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneRegistry::load(Some(Path::new("/definitely/not/here.obj"))).unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
