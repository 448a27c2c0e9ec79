//! Wavefront OBJ loading. Only geometry records are read: `v`, `vt`, `vn` and `f`; everything
//! else (materials, groups, smoothing) is skipped.

use std::path::Path;

use tracing::debug;

use crate::{
    error::{Error, Result},
    vec::{Vec2, Vec3},
    Index, Mesh,
};

/// Indexed triangle mesh. Indices past the end of the uv or normal lists, which is how corners
/// without those attributes are stored, resolve to zero vectors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<[Index; 3]>,
}

const MISSING: usize = usize::MAX;

impl Model {
    /// Two triangles spanning `[-0.9, 0.9]` in `x` and `y`, tilted so `z` follows `x`. Every
    /// corner carries its uv and the shared normal.
    pub fn quad() -> Self {
        let positions = [
            [-0.9, -0.9, -0.9],
            [0.9, -0.9, 0.9],
            [0.9, 0.9, 0.9],
            [-0.9, 0.9, -0.9],
        ];
        let uvs = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]];
        let normal = Vec3::from([-1., 0., 1.]).normalize();
        let corner = |i| Index {
            position: i,
            uv: i,
            normal: 0,
        };
        Model {
            positions: positions.into_iter().map(Vec3::from).collect(),
            uvs: uvs.into_iter().map(Vec2::from).collect(),
            normals: vec![normal],
            faces: vec![
                [corner(0), corner(1), corner(2)],
                [corner(0), corner(2), corner(3)],
            ],
        }
    }

    /// Interleaved `[px, py, pz, u, v, nx, ny, nz]` for every corner of every face.
    pub fn vertex_buffer(&self) -> Vec<f32> {
        let mut buf = Vec::with_capacity(self.faces.len() * 3 * 8);
        for face in 0..self.faces.len() {
            for nth in 0..3 {
                if let Some(vert) = self.vertex(face, nth) {
                    buf.extend_from_slice(&vert.position.to_array());
                    buf.extend_from_slice(&vert.uv.to_array());
                    buf.extend_from_slice(&vert.normal.to_array());
                }
            }
        }
        buf
    }
}

impl Mesh for Model {
    fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, face: usize) -> Option<[Index; 3]> {
        self.faces.get(face).copied()
    }

    fn position(&self, i: usize) -> Vec3 {
        self.positions.get(i).copied().unwrap_or(Vec3::zero())
    }

    fn uv(&self, i: usize) -> Vec2 {
        self.uvs.get(i).copied().unwrap_or(Vec2::zero())
    }

    fn normal(&self, i: usize) -> Vec3 {
        self.normals.get(i).copied().unwrap_or(Vec3::zero())
    }
}

pub fn load_obj(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let model = parse_obj(&source)?;
    debug!(
        path = %path.display(),
        vertices = model.positions.len(),
        faces = model.faces.len(),
        "loaded obj"
    );
    Ok(model)
}

/// Parses OBJ text. Polygons with more than three corners are split into a fan around their first
/// corner.
pub fn parse_obj(source: &str) -> Result<Model> {
    let mut model = Model::default();
    let mut corners = Vec::new();

    for (i, line) in source.lines().enumerate() {
        let line_no = i + 1;
        let err = |reason: String| Error::ObjParse {
            line: line_no,
            reason,
        };
        let line = line.split('#').next().unwrap_or("");
        let mut it = line.split_ascii_whitespace();
        match it.next() {
            Some("v") => {
                let [x, y, z] = parse_floats(&mut it).map_err(err)?;
                model.positions.push(Vec3::from([x, y, z]));
            }
            Some("vt") => {
                let [u, v] = parse_floats(&mut it).map_err(err)?;
                model.uvs.push(Vec2::from([u, v]));
            }
            Some("vn") => {
                let [x, y, z] = parse_floats(&mut it).map_err(err)?;
                model.normals.push(Vec3::from([x, y, z]));
            }
            Some("f") => {
                corners.clear();
                for corner in it {
                    corners.push(parse_corner(corner, &model).map_err(err)?);
                }
                if corners.len() < 3 {
                    return Err(err(format!(
                        "face needs at least 3 corners, got {}",
                        corners.len()
                    )));
                }
                for pair in corners[1..].windows(2) {
                    model.faces.push([corners[0], pair[0], pair[1]]);
                }
            }
            _ => continue,
        }
    }
    Ok(model)
}

/// Reads the leading `N` numbers; extra components such as `w` are ignored.
fn parse_floats<'a, const N: usize>(
    it: &mut impl Iterator<Item = &'a str>,
) -> std::result::Result<[f32; N], String> {
    let mut out = [0.; N];
    for slot in out.iter_mut() {
        let el = it
            .next()
            .ok_or_else(|| format!("expected {N} coordinates"))?;
        *slot = el
            .parse::<f32>()
            .map_err(|e| format!("invalid coordinate {el:?}: {e}"))?;
    }
    Ok(out)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`.
fn parse_corner(corner: &str, model: &Model) -> std::result::Result<Index, String> {
    let mut parts = corner.split('/');
    let position = match parts.next() {
        Some(p) => resolve_index(p, model.positions.len())?,
        None => return Err(format!("empty face corner {corner:?}")),
    };
    let uv = match parts.next() {
        Some("") | None => MISSING,
        Some(t) => resolve_index(t, model.uvs.len())?,
    };
    let normal = match parts.next() {
        Some("") | None => MISSING,
        Some(n) => resolve_index(n, model.normals.len())?,
    };
    if parts.next().is_some() {
        return Err(format!("too many components in face corner {corner:?}"));
    }
    Ok(Index {
        position,
        uv,
        normal,
    })
}

/// One based index, or negative relative to the end of what has been read so far.
fn resolve_index(s: &str, len: usize) -> std::result::Result<usize, String> {
    let i: i64 = s
        .parse()
        .map_err(|e| format!("invalid index {s:?}: {e}"))?;
    let resolved = match i {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(len as i64 + i),
    };
    match resolved {
        Some(idx) if idx >= 0 && (idx as usize) < len => Ok(idx as usize),
        _ => Err(format!("index {i} out of range for {len} elements")),
    }
}
