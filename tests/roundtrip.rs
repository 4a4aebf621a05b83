//! End-to-end round trip: build a library in memory, encode it to GDSII
//! bytes, decode it back, and check the result is structurally identical.

use std::io::Cursor;

use gds_rs::element::{ARef, Boundary, GdsBox, Node, Path, SRef, Text};
use gds_rs::strans::Strans;
use gds_rs::{Element, Library, Structure, Timestamps, Units};

fn sample_library() -> Library {
    let mut lib = Library::new(
        "ROUNDTRIP.DB",
        Units {
            user_per_db: 0.001,
            meters_per_db: 1e-9,
        },
    );

    lib.add_structure(Structure {
        bgn: Timestamps::default(),
        name: "LEAF".to_string(),
        elements: vec![
            Element::Boundary(Boundary {
                elflags: 0,
                plex: 0,
                layer: 1,
                datatype: 0,
                xy: vec![0, 0, 10, 0, 10, 10, 5, 15, 0, 10, 0, 0],
            }),
            Element::Path(Path {
                elflags: 0,
                plex: 0,
                layer: 2,
                datatype: 0,
                pathtype: 2,
                width: 5,
                xy: vec![0, 0, 0, 10, 10, 10],
            }),
            Element::Text(Text {
                elflags: 0,
                plex: 0,
                layer: 3,
                texttype: 0,
                presentation: 0,
                strans: Strans::default(),
                mag: 1.0,
                angle: 0.0,
                xy: vec![5, 5],
                string: "LABEL".to_string(),
            }),
            Element::Node(Node {
                elflags: 0,
                plex: 0,
                layer: 4,
                nodetype: 0,
                xy: vec![1, 1],
            }),
            Element::Box(GdsBox {
                elflags: 0,
                plex: 0,
                layer: 5,
                boxtype: 0,
                xy: vec![0, 0, 1, 0, 1, 1, 0, 1, 0, 0],
            }),
        ],
    })
    .unwrap();

    lib.add_structure(Structure {
        bgn: Timestamps::default(),
        name: "TOP".to_string(),
        elements: vec![
            Element::SRef(SRef {
                elflags: 0,
                plex: 0,
                sname: "LEAF".to_string(),
                strans: Strans::from_raw(1 << 15),
                mag: 2.0,
                angle: 90.0,
                xy: vec![100, 100],
            }),
            Element::ARef(ARef {
                elflags: 0,
                plex: 0,
                sname: "LEAF".to_string(),
                strans: Strans::default(),
                mag: 1.0,
                angle: 0.0,
                colrow: (2, 3),
                xy: vec![0, 0, 40, 0, 0, 60],
            }),
        ],
    })
    .unwrap();

    lib
}

#[test]
fn library_round_trips_through_bytes() {
    let original = sample_library();

    let mut bytes = Vec::new();
    original.write(&mut bytes).unwrap();

    let decoded = Library::read(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn flatten_top_yields_expected_cardinality() {
    let library = sample_library();
    let bundle = gds_rs::api::flatten_all(&library, "TOP").unwrap();

    // One SREF instance plus a 2x3 AREF: 7 boundaries and 7 boxes total.
    let boundaries = bundle.polygons.get("1/0").unwrap();
    assert_eq!(boundaries.polygons.len(), 7);
    let boxes = bundle.polygons.get("5/0").unwrap();
    assert_eq!(boxes.polygons.len(), 7);

    let paths = bundle.paths.get("2/0").unwrap();
    assert_eq!(paths.paths.len(), 7);

    let labels = bundle.labels.get("3/0").unwrap();
    assert_eq!(labels.labels.len(), 7);
    assert!(labels.labels.iter().all(|s| s == "LABEL"));
}

#[test]
fn missing_structure_reference_is_rejected_at_flatten_time() {
    let mut library = Library::new(
        "BAD",
        Units {
            user_per_db: 0.001,
            meters_per_db: 1e-9,
        },
    );
    library
        .add_structure(Structure {
            bgn: Timestamps::default(),
            name: "TOP".to_string(),
            elements: vec![Element::SRef(SRef {
                elflags: 0,
                plex: 0,
                sname: "GHOST".to_string(),
                strans: Strans::default(),
                mag: 1.0,
                angle: 0.0,
                xy: vec![0, 0],
            })],
        })
        .unwrap();

    assert!(gds_rs::api::flatten_all(&library, "TOP").is_err());
}
