//! Integration tests for the partition logging system
//!
//! These tests swap the process-wide logger, so every test is `#[serial]`.
//!
//! Run with: cargo test --test logging_integration_tests

use galaxy_3d_partition::galaxy3d::log::{
    Logger, LogEntry, LogSeverity, reset_logger, set_logger, set_min_severity,
};
use galaxy_3d_partition::galaxy3d::math::Bound;
use galaxy_3d_partition::galaxy3d::spatial::{
    ObjectFlags, ObjectRegistry, Octree, OctreeConfig, PartitionConfig, PartitionManager,
};
use galaxy_3d_partition::glam::Vec3;
use galaxy_3d_partition::log::{dispatch, dispatch_detailed};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

/// Install a capturing logger at the given minimum severity.
fn capture(min: LogSeverity) -> Arc<Mutex<Vec<LogEntry>>> {
    let (logger, entries) = TestLogger::new();
    set_logger(logger);
    set_min_severity(min);
    entries
}

fn restore() {
    set_min_severity(LogSeverity::Info);
    reset_logger();
}

fn cube(min: f32, size: f32) -> Bound {
    Bound::new(Vec3::splat(min), Vec3::splat(min + size))
}

// ============================================================================
// LOGGER SLOT
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let entries = capture(LogSeverity::Info);

    dispatch(LogSeverity::Info, "test::module", "Test info message".to_string());
    dispatch(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    dispatch(LogSeverity::Error, "test::module", "Test error message".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].source, "test::module");
        assert_eq!(captured[0].message, "Test info message");
        assert_eq!(captured[1].severity, LogSeverity::Warn);
        assert_eq!(captured[2].severity, LogSeverity::Error);
        assert_eq!(captured[2].file, None);
    }

    restore();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let entries = capture(LogSeverity::Info);

    dispatch_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].file, Some("test_file.rs"));
        assert_eq!(captured[0].line, Some(42));
    }

    restore();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let entries = capture(LogSeverity::Info);
    dispatch(LogSeverity::Info, "test", "captured".to_string());

    restore();
    dispatch(LogSeverity::Info, "test", "goes to the default logger".to_string());

    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_integration_min_severity_filter() {
    let entries = capture(LogSeverity::Warn);

    dispatch(LogSeverity::Trace, "test", "dropped".to_string());
    dispatch(LogSeverity::Debug, "test", "dropped".to_string());
    dispatch(LogSeverity::Info, "test", "dropped".to_string());
    dispatch(LogSeverity::Warn, "test", "kept".to_string());
    dispatch(LogSeverity::Error, "test", "kept".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert!(captured.iter().all(|e| e.message == "kept"));
    }

    restore();
}

// ============================================================================
// PARTITION DIAGNOSTICS
// ============================================================================

#[test]
#[serial]
fn test_integration_invalid_config_logs_error() {
    let entries = capture(LogSeverity::Info);

    let mut config = PartitionConfig::default();
    config.octree.max_objects_per_node = 0;
    assert!(PartitionManager::<u32>::new(config).is_err());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Error);
        assert_eq!(captured[0].source, "galaxy3d::PartitionManager");
        assert!(captured[0].message.contains("max_objects_per_node"));
        assert!(captured[0].file.is_some());
        assert!(captured[0].line.is_some());
    }

    restore();
}

#[test]
#[serial]
fn test_integration_stale_handle_logs_warning() {
    let mut registry = ObjectRegistry::new();
    let mut partition = PartitionManager::new(PartitionConfig::default()).unwrap();
    let key = registry.spawn(cube(0.0, 1.0), ObjectFlags::SPATIAL);
    partition.register(&registry, key);
    registry.despawn(key);

    let entries = capture(LogSeverity::Warn);
    let stats = partition.update(&registry, 0.016, 16);
    assert_eq!(stats.stale, 1);

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Warn);
        assert_eq!(captured[0].source, "galaxy3d::PartitionManager");
        assert!(captured[0].message.contains("stale"));
    }

    restore();
}

#[test]
#[serial]
fn test_integration_not_found_is_not_an_error() {
    let entries = capture(LogSeverity::Trace);

    let mut partition: PartitionManager<u32> = PartitionManager::new(PartitionConfig::default()).unwrap();
    assert!(!partition.unregister(3));
    let mut tree: Octree<u32> = Octree::new(cube(-10.0, 20.0), OctreeConfig::default());
    assert!(!tree.remove(3, &cube(0.0, 1.0)));

    assert!(entries
        .lock()
        .unwrap()
        .iter()
        .all(|e| e.severity < LogSeverity::Warn));

    restore();
}

#[test]
#[serial]
fn test_integration_bulk_register_logs_info() {
    let entries = capture(LogSeverity::Info);

    let mut registry = ObjectRegistry::new();
    let keys: Vec<_> = (0..10)
        .map(|i| registry.spawn(cube(i as f32, 0.5), ObjectFlags::SPATIAL))
        .collect();
    let mut partition = PartitionManager::new(PartitionConfig::default()).unwrap();
    partition.bulk_register(&registry, keys);

    {
        let captured = entries.lock().unwrap();
        let info: Vec<&LogEntry> = captured
            .iter()
            .filter(|e| e.severity == LogSeverity::Info)
            .collect();
        assert_eq!(info.len(), 1);
        assert!(info[0].message.starts_with("Bulk registered 10 objects"));
    }

    restore();
}

#[test]
#[serial]
fn test_integration_split_and_dump_log_at_debug() {
    let mut tree = Octree::new(cube(-100.0, 200.0), OctreeConfig { max_depth: 6, max_objects_per_node: 4 });

    // Nothing below Info reaches the logger by default
    let entries = capture(LogSeverity::Info);
    for i in 0..5u32 {
        tree.insert(i, cube(-100.0, 200.0).create_octant(i as usize));
    }
    assert!(entries.lock().unwrap().is_empty());

    tree.clear();
    let entries = capture(LogSeverity::Debug);
    for i in 0..5u32 {
        tree.insert(i, cube(-100.0, 200.0).create_octant(i as usize));
    }
    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].source, "galaxy3d::Octree");
        assert!(captured[0].message.starts_with("Split node 0 at depth 0"));
    }

    tree.debug_dump();
    {
        let captured = entries.lock().unwrap();
        // split + BEGIN + 9 nodes + END
        assert_eq!(captured.len(), 1 + 11);
        assert_eq!(captured[1].message, "===== OCTREE DUMP BEGIN =====");
        assert_eq!(captured[11].message, "===== OCTREE DUMP END =====");
    }

    restore();
}
