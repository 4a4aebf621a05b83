//! Reference resolver: recursive flattening of SREF/AREF
//! into per-layer geometry. The three output maps are carried as one
//! `LayerMapBundle` threaded through the recursion,
//! dispatched by matching on the `Element` variant.

use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::element::Element;
use crate::library::Library;
use crate::strans::Strans;
use crate::transform::{transform_point, transform_points, transform_width};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PolygonLayer {
    pub enabled: bool,
    pub polygons: Vec<Vec<i32>>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathLayer {
    pub enabled: bool,
    pub paths: Vec<Vec<i32>>,
    pub path_types: Vec<i16>,
    pub widths: Vec<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelLayer {
    pub enabled: bool,
    pub labels: Vec<String>,
    pub label_coords: Vec<Vec<i32>>,
}

/// The three per-layer maps a flatten query produces,
/// carried together through the recursion rather than passed as
/// separate arguments selected by a runtime type check.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerMapBundle {
    pub polygons: HashMap<String, PolygonLayer>,
    pub paths: HashMap<String, PathLayer>,
    pub labels: HashMap<String, LabelLayer>,
}

impl LayerMapBundle {
    fn push_polygon(&mut self, layer_key: String, points: Vec<i32>) {
        self.polygons
            .entry(layer_key)
            .or_insert_with(|| PolygonLayer {
                enabled: true,
                polygons: Vec::new(),
            })
            .polygons
            .push(points);
    }

    fn push_path(&mut self, layer_key: String, points: Vec<i32>, path_type: i16, width: i32) {
        let layer = self.paths.entry(layer_key).or_insert_with(|| PathLayer {
            enabled: true,
            paths: Vec::new(),
            path_types: Vec::new(),
            widths: Vec::new(),
        });
        layer.paths.push(points);
        layer.path_types.push(path_type);
        layer.widths.push(width);
    }

    fn push_label(&mut self, layer_key: String, label: String, coords: Vec<i32>) {
        let layer = self.labels.entry(layer_key).or_insert_with(|| LabelLayer {
            enabled: true,
            labels: Vec::new(),
            label_coords: Vec::new(),
        });
        layer.labels.push(label);
        layer.label_coords.push(coords);
    }
}

/// A composed rigid-body transform: `(dx, dy, strans, mag, angle)`.
/// Carried down the recursion instead of a 2×3 matrix and re-derived at
/// each level via [`compose`], rounding to `i32` exactly where the
/// transform kernel does.
#[derive(Clone, Copy, Debug)]
struct Transform {
    dx: i32,
    dy: i32,
    strans: Strans,
    mag: f64,
    angle: f64,
}

impl Transform {
    fn identity() -> Self {
        Self {
            dx: 0,
            dy: 0,
            strans: Strans::default(),
            mag: 1.0,
            angle: 0.0,
        }
    }

    /// Express an inner reference's own `(dx, dy, strans, mag, angle)`
    /// (defined in this transform's local frame) in the root frame: the
    /// inner insertion point is first placed via `self`, then the two
    /// similarity transforms compose algebraically.
    fn compose(&self, inner_dx: i32, inner_dy: i32, inner_strans: Strans, inner_mag: f64, inner_angle: f64) -> Self {
        let (dx, dy) = transform_point(inner_dx, inner_dy, self.dx, self.dy, self.strans, self.mag, self.angle);
        let composed_reflect = self.strans.reflect() ^ inner_strans.reflect();
        let inner_angle_adjusted = if self.strans.reflect() { -inner_angle } else { inner_angle };
        Self {
            dx,
            dy,
            strans: Strans::from_raw(if composed_reflect { 1 << 15 } else { 0 }),
            mag: self.mag * inner_mag,
            angle: self.angle + inner_angle_adjusted,
        }
    }

    fn points(&self, xy: &[i32]) -> Vec<i32> {
        transform_points(xy, self.dx, self.dy, self.strans, self.mag, self.angle)
    }
}

/// Flatten `root` into `bundle`, recursively expanding SREF/AREF.
pub fn flatten(library: &Library, root: &str) -> Result<LayerMapBundle> {
    let mut bundle = LayerMapBundle::default();
    expand(&mut bundle, library, root, Transform::identity())?;
    Ok(bundle)
}

fn expand(bundle: &mut LayerMapBundle, library: &Library, structure_name: &str, transform: Transform) -> Result<()> {
    let structure = library
        .structure(structure_name)
        .ok_or_else(|| anyhow!("reference to missing structure \"{structure_name}\""))?;

    for element in &structure.elements {
        match element {
            Element::Boundary(b) => {
                let points = transform.points(&b.xy);
                bundle.push_polygon(b.layer_key(), points);
            }
            Element::Box(bx) => {
                let points = transform.points(&bx.xy);
                bundle.push_polygon(bx.layer_key(), points);
            }
            Element::Path(p) => {
                let points = transform.points(&p.xy);
                let width = if p.width < 0 {
                    p.width
                } else {
                    transform_width(p.width, transform.mag)
                };
                bundle.push_path(p.layer_key(), points, p.pathtype, width);
            }
            Element::Text(t) => {
                // Text's own transform is applied locally first,
                // then the accumulated outer transform.
                let (local_x, local_y) = transform_point(
                    t.xy[0],
                    t.xy[1],
                    0,
                    0,
                    t.strans,
                    t.mag,
                    t.angle,
                );
                let (x, y) = transform_point(
                    local_x,
                    local_y,
                    transform.dx,
                    transform.dy,
                    transform.strans,
                    transform.mag,
                    transform.angle,
                );
                bundle.push_label(t.layer_key(), t.string.clone(), vec![x, y]);
            }
            Element::Node(_) => {
                // Unsupported by the resolver; preserved by the codec only.
            }
            Element::SRef(s) => {
                let composed = transform.compose(s.xy[0], s.xy[1], s.strans, s.mag, s.angle);
                expand(bundle, library, &s.sname, composed)?;
            }
            Element::ARef(a) => {
                let ncol = i64::from(a.colrow.0);
                let nrow = i64::from(a.colrow.1);
                let (x0, y0) = (a.xy[0], a.xy[1]);
                let (x1, y1) = (a.xy[2], a.xy[3]);
                let (x2, y2) = (a.xy[4], a.xy[5]);
                let dcol_x = (x1 - x0) as f64 / ncol as f64;
                let dcol_y = (y1 - y0) as f64 / ncol as f64;
                let drow_x = (x2 - x0) as f64 / nrow as f64;
                let drow_y = (y2 - y0) as f64 / nrow as f64;

                for j in 0..nrow {
                    for i in 0..ncol {
                        let origin_x = (x0 as f64 + i as f64 * dcol_x + j as f64 * drow_x).round() as i32;
                        let origin_y = (y0 as f64 + i as f64 * dcol_y + j as f64 * drow_y).round() as i32;
                        let composed = transform.compose(origin_x, origin_y, a.strans, a.mag, a.angle);
                        expand(bundle, library, &a.sname, composed)?;
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Boundary;
    use crate::library::{Library, Structure, Timestamps, Units};

    fn test_library() -> Library {
        Library::new(
            "TESTLIB",
            Units {
                user_per_db: 0.001,
                meters_per_db: 1e-9,
            },
        )
    }

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<i32> {
        vec![x0, y0, x1, y0, x1, y1, x0, y1, x0, y0]
    }

    #[test]
    fn preservation_with_no_references() {
        let mut lib = test_library();
        let boundary = Boundary {
            elflags: 0,
            plex: 0,
            layer: 1,
            datatype: 0,
            xy: rect(0, 0, 10, 10),
        };
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "TOP".to_string(),
            elements: vec![Element::Boundary(boundary.clone())],
        })
        .unwrap();

        let bundle = flatten(&lib, "TOP").unwrap();
        let layer = bundle.polygons.get("1/0").unwrap();
        assert_eq!(layer.polygons, vec![boundary.xy]);
    }

    #[test]
    fn aref_cardinality_and_origins() {
        use crate::element::ARef;

        let mut lib = test_library();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "CELL".to_string(),
            elements: vec![Element::Boundary(Boundary {
                elflags: 0,
                plex: 0,
                layer: 1,
                datatype: 0,
                xy: rect(0, 0, 4, 4),
            })],
        })
        .unwrap();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "TOP".to_string(),
            elements: vec![Element::ARef(ARef {
                elflags: 0,
                plex: 0,
                sname: "CELL".to_string(),
                strans: Strans::default(),
                mag: 1.0,
                angle: 0.0,
                colrow: (2, 3),
                xy: vec![0, 0, 20, 0, 0, 30],
            })],
        })
        .unwrap();

        let bundle = flatten(&lib, "TOP").unwrap();
        let layer = bundle.polygons.get("1/0").unwrap();
        assert_eq!(layer.polygons.len(), 6);

        let origins: Vec<(i32, i32)> = layer.polygons.iter().map(|p| (p[0], p[1])).collect();
        assert_eq!(
            origins,
            vec![(0, 0), (10, 0), (0, 10), (10, 10), (0, 20), (10, 20)]
        );
    }

    #[test]
    fn missing_reference_is_an_error() {
        let mut lib = test_library();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "TOP".to_string(),
            elements: vec![Element::SRef(crate::element::SRef {
                elflags: 0,
                plex: 0,
                sname: "NOPE".to_string(),
                strans: Strans::default(),
                mag: 1.0,
                angle: 0.0,
                xy: vec![0, 0],
            })],
        })
        .unwrap();
        assert!(flatten(&lib, "TOP").is_err());
    }

    #[test]
    fn nested_sref_composes_transforms() {
        use crate::element::SRef;

        let mut lib = test_library();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "LEAF".to_string(),
            elements: vec![Element::Boundary(Boundary {
                elflags: 0,
                plex: 0,
                layer: 2,
                datatype: 0,
                xy: rect(0, 0, 1, 1),
            })],
        })
        .unwrap();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "MID".to_string(),
            elements: vec![Element::SRef(SRef {
                elflags: 0,
                plex: 0,
                sname: "LEAF".to_string(),
                strans: Strans::default(),
                mag: 1.0,
                angle: 0.0,
                xy: vec![5, 0],
            })],
        })
        .unwrap();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "TOP".to_string(),
            elements: vec![Element::SRef(SRef {
                elflags: 0,
                plex: 0,
                sname: "MID".to_string(),
                strans: Strans::default(),
                mag: 1.0,
                angle: 0.0,
                xy: vec![100, 100],
            })],
        })
        .unwrap();

        let bundle = flatten(&lib, "TOP").unwrap();
        let layer = bundle.polygons.get("2/0").unwrap();
        assert_eq!(layer.polygons.len(), 1);
        // LEAF's origin at (0,0) shifts by MID's (5,0) then TOP's (100,100).
        assert_eq!(layer.polygons[0][0..2], [105, 100]);
    }

    #[test]
    fn nested_sref_and_aref_flatten_composes_mirror_rotate_scale() {
        use crate::element::{ARef, SRef};

        let mut lib = test_library();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "LEAF".to_string(),
            elements: vec![Element::Boundary(Boundary {
                elflags: 0,
                plex: 0,
                layer: 1,
                datatype: 0,
                xy: rect(0, 0, 2, 2),
            })],
        })
        .unwrap();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "ROW".to_string(),
            elements: vec![Element::ARef(ARef {
                elflags: 0,
                plex: 0,
                sname: "LEAF".to_string(),
                strans: Strans::default(),
                mag: 1.0,
                angle: 0.0,
                colrow: (3, 1),
                xy: vec![0, 0, 15, 0, 0, 5],
            })],
        })
        .unwrap();
        lib.add_structure(Structure {
            bgn: Timestamps::default(),
            name: "TOP".to_string(),
            elements: vec![Element::SRef(SRef {
                elflags: 0,
                plex: 0,
                sname: "ROW".to_string(),
                strans: Strans::from_raw(1 << 15),
                mag: 2.0,
                angle: 90.0,
                xy: vec![50, 50],
            })],
        })
        .unwrap();

        // TOP's SREF mirrors, rotates 90deg and doubles ROW; ROW's own
        // ARef step (5,0) becomes a (0,10) step in the root frame, so
        // the three LEAF origins land at (50,50), (50,60), (50,70).
        let bundle = flatten(&lib, "TOP").unwrap();
        let layer = bundle.polygons.get("1/0").unwrap();
        insta::assert_debug_snapshot!(layer.polygons, @r#"
        [
            [
                50,
                50,
                50,
                54,
                54,
                54,
                54,
                50,
                50,
                50,
            ],
            [
                50,
                60,
                50,
                64,
                54,
                64,
                54,
                60,
                50,
                60,
            ],
            [
                50,
                70,
                50,
                74,
                54,
                74,
                54,
                70,
                50,
                70,
            ],
        ]
        "#);
    }
}
