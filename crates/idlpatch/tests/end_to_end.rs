// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Full pipeline: parse an IDL tree, generate assignments and patch a
//! publisher source, twice.

use idlpatch::{CodeGenerator, FilePatcher, IdlParser, PatcherOptions, ValueTable};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const IDL: &str = "\
// Surveillance demo types\n\
module Demo {\n\
    typedef double Degrees;\n\
    typedef Degrees Heading;\n\
\n\
    enum Status { IDLE, PATROL, ERROR_STATE };\n\
\n\
    struct Point {\n\
        Degrees latitude;\n\
        Degrees longitude;\n\
        float altitude;\n\
    };\n\
\n\
    union Location switch (long) {\n\
        case 1: Point gps_data;\n\
        default: long zone_code;\n\
    };\n\
\n\
    struct Track {\n\
        string sensor_id;\n\
        Status unit_status;\n\
        Heading orientation_deg;\n\
        Location location;\n\
        sequence<Point, 8> waypoints;\n\
        long cell_ids[4];\n\
        boolean has_error;\n\
    };\n\
};\n";

// NOTE: `\n\` continuations would strip the leading indentation of the next
// line, so the fixture is spelled with explicit escapes to keep it.
const CXX: &str = "void TrackPublisher::run()\n{\n    /* Initialize your structure here */\n    Demo::Track m_data;\n\n    publish(m_data);\n}\n";

fn write_file(dir: &Path, name: &str, content: &str) {
    let mut f = std::fs::File::create(dir.join(name)).expect("create file");
    f.write_all(content.as_bytes()).expect("write file");
}

fn run_patch(root: &Path) -> idlpatch::PatchReport {
    let table = ValueTable::default();
    let mut parser = IdlParser::new(table.primitive_types());
    parser.parse_dir(root).expect("parse");
    let registry = parser.into_registry();
    let generator = CodeGenerator::new(&registry, &table);
    let mut patcher = FilePatcher::new(root, generator, PatcherOptions::default());
    patcher.run().expect("patch run")
}

#[test]
fn test_patch_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "demo.idl", IDL);
    write_file(dir.path(), "TrackPublisherApp.cxx", CXX);

    let report = run_patch(dir.path());
    assert_eq!(report.processed, 1);
    assert_eq!(report.patched.len(), 1);
    assert!(report.skipped.is_empty());

    let patched =
        std::fs::read_to_string(dir.path().join("TrackPublisherApp.cxx")).expect("read patched");

    // Marker block sits after the declaration, indented like it.
    assert!(patched.contains("Demo::Track m_data;\n    // --- BEGIN AUTOGENERATED IDL PATCH (v1) ---"));
    assert!(patched.contains("    // --- END AUTOGENERATED IDL PATCH (v1) ---"));
    // The rest of the function is untouched.
    assert!(patched.contains("publish(m_data);"));

    // String id heuristic.
    assert!(patched.contains("m_data.sensor_id(\"DeviceID_123\");"));
    // Enum topical preference.
    assert!(patched.contains("m_data.unit_status(Demo::Status::IDLE);"));
    // Typedef chain Heading -> Degrees -> double, name rule `orientation`.
    assert!(patched.contains("m_data.orientation_deg(180);"));
    // Union: first non-default case, nested struct through typedefs.
    assert!(patched.contains("m_data.location()._d(1);"));
    assert!(patched.contains("m_data.location().gps_data().latitude(37.7749);"));
    assert!(patched.contains("m_data.location().gps_data().altitude(100.0f);"));
    assert!(!patched.contains("zone_code"));
    // Sequence of structs: two elements, second moved.
    assert!(patched.contains("Demo::Point m_data_waypoints_item;"));
    assert!(patched.contains("m_data.waypoints().push_back(m_data_waypoints_item);"));
    assert!(patched.contains("m_data.waypoints().push_back(std::move(m_data_waypoints_item2));"));
    // Array: first element only.
    assert!(patched.contains("m_data.cell_ids()[0] = 123456789L;"));
    assert_eq!(patched.matches("cell_ids()[").count(), 1);
    // Boolean name rule.
    assert!(patched.contains("m_data.has_error(false);"));

    // Backup preserves the original source.
    let backup = std::fs::read_to_string(
        dir.path().join("TrackPublisherApp.cxx.idlpatch_v1.backup"),
    )
    .expect("read backup");
    assert_eq!(backup, CXX);
}

#[test]
fn test_repatching_is_idempotent() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "demo.idl", IDL);
    write_file(dir.path(), "TrackPublisherApp.cxx", CXX);

    let first = run_patch(dir.path());
    assert_eq!(first.patched.len(), 1);
    let after_first =
        std::fs::read_to_string(dir.path().join("TrackPublisherApp.cxx")).expect("read");

    let second = run_patch(dir.path());
    assert_eq!(second.patched.len(), 0);
    assert_eq!(second.up_to_date.len(), 1);
    let after_second =
        std::fs::read_to_string(dir.path().join("TrackPublisherApp.cxx")).expect("read");
    assert_eq!(after_first, after_second);
    // Exactly one marker block, no duplicates.
    assert_eq!(after_second.matches("BEGIN AUTOGENERATED IDL PATCH").count(), 1);
}

#[test]
fn test_multiple_targets_and_missing_definition() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "demo.idl", IDL);
    write_file(dir.path(), "TrackPublisherApp.cxx", CXX);
    write_file(
        dir.path(),
        "GhostPublisherApp.cxx",
        "    /* Initialize your structure here */\n    Demo::Ghost m_data;\n",
    );

    let report = run_patch(dir.path());
    assert_eq!(report.processed, 2);
    assert_eq!(report.patched.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].file.contains("Ghost"));
    assert_eq!(report.touched(), 1);
}
