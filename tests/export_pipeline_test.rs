//! Integration tests for the export pipeline
//!
//! The reader double builds maps whose tilesets hold leases from a
//! [`ResourceLedger`], so every test can check that the map was released
//! exactly once, whatever happened to the write.

use mapexport::adapters::reader::MapReader;
use mapexport::adapters::writers::{MapWriter, WriterRegistry};
use mapexport::core::export::{ExportCoordinator, ExportOptions};
use mapexport::domain::{
    ExportError, ExportErrorKind, ExportRequest, Map, NameFilterSet, Orientation, ReadError,
    ResourceLedger, Tileset, WriteError,
};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Calls {
    loads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    /// Live leases seen by the writer while it ran
    live_during_write: Arc<Mutex<Vec<usize>>>,
}

impl Calls {
    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

struct LedgerReader {
    ledger: ResourceLedger,
    calls: Calls,
    fail: bool,
}

impl MapReader for LedgerReader {
    fn read_map(&self, path: &Path) -> Result<Map, ReadError> {
        self.calls.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ReadError::InvalidMap(format!(
                "{} is not a map",
                path.display()
            )));
        }

        let mut map = Map::new(Orientation::Orthogonal, 4, 4, 16, 16);
        map.add_tileset(Tileset::new(1, "ground", 16, 16).with_lease(self.ledger.acquire()));
        map.add_tileset(Tileset::new(65, "props", 16, 16).with_lease(self.ledger.acquire()));
        Ok(map)
    }
}

#[derive(Clone, Copy)]
enum Behaviour {
    Succeed,
    Fail,
    Panic,
}

struct ScriptedWriter {
    name: &'static str,
    label: &'static str,
    pattern: &'static str,
    behaviour: Behaviour,
    ledger: ResourceLedger,
    calls: Calls,
}

impl MapWriter for ScriptedWriter {
    fn name(&self) -> &str {
        self.name
    }

    fn name_filters(&self) -> NameFilterSet {
        NameFilterSet::new().with_entry(self.label, [self.pattern])
    }

    fn write(&self, map: &Map, _target: &Path) -> Result<(), WriteError> {
        self.calls.writes.fetch_add(1, Ordering::SeqCst);
        self.calls
            .live_during_write
            .lock()
            .unwrap()
            .push(self.ledger.live());
        assert_eq!(map.tilesets().len(), 2);

        match self.behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => Err(WriteError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only file system",
            ))),
            Behaviour::Panic => panic!("writer bug"),
        }
    }
}

struct Harness {
    coordinator: ExportCoordinator,
    ledger: ResourceLedger,
    calls: Calls,
}

fn harness(behaviour: Behaviour, reader_fails: bool) -> Harness {
    let ledger = ResourceLedger::new();
    let calls = Calls::default();

    let mut registry = WriterRegistry::new();
    registry
        .register(ScriptedWriter {
            name: "A",
            label: "JSON files",
            pattern: "json",
            behaviour,
            ledger: ledger.clone(),
            calls: calls.clone(),
        })
        .unwrap();

    let reader = LedgerReader {
        ledger: ledger.clone(),
        calls: calls.clone(),
        fail: reader_fails,
    };

    Harness {
        coordinator: ExportCoordinator::new(registry, Box::new(reader)),
        ledger,
        calls,
    }
}

#[test]
fn successful_export_loads_writes_and_releases_once() {
    let h = harness(Behaviour::Succeed, false);

    let summary = h
        .coordinator
        .export_args(&["map.tmx", "out.json"], ExportOptions::default())
        .unwrap();

    assert_eq!(summary.writer, "A");
    assert_eq!(summary.filter_label, "JSON files");
    assert_eq!(summary.tileset_count, 2);
    assert!(!summary.dry_run);

    assert_eq!(h.calls.loads(), 1);
    assert_eq!(h.calls.writes(), 1);
    assert_eq!(*h.calls.live_during_write.lock().unwrap(), vec![2]);
    assert_eq!(h.ledger.acquired(), 2);
    assert_eq!(h.ledger.released(), 2);
    assert_eq!(h.ledger.live(), 0);
}

#[test]
fn single_token_is_malformed() {
    let h = harness(Behaviour::Succeed, false);

    let err = h
        .coordinator
        .export_args(&["map.tmx"], ExportOptions::default())
        .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::MalformedRequest);
    assert!(err
        .to_string()
        .starts_with("Export syntax is export [format] <source map> <target file>"));
    assert_eq!(h.calls.loads(), 0);
    assert_eq!(h.calls.writes(), 0);
}

#[test]
fn no_tokens_is_malformed() {
    let h = harness(Behaviour::Succeed, false);
    let args: [&str; 0] = [];
    let err = h
        .coordinator
        .export_args(&args, ExportOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ExportErrorKind::MalformedRequest);
}

#[test]
fn load_failure_never_writes() {
    let h = harness(Behaviour::Succeed, true);

    let err = h
        .coordinator
        .export_args(&["broken.tmx", "out.json"], ExportOptions::default())
        .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::SourceLoadFailed);
    assert!(matches!(
        &err,
        ExportError::SourceLoadFailed { path, .. } if path == Path::new("broken.tmx")
    ));
    assert_eq!(h.calls.loads(), 1);
    assert_eq!(h.calls.writes(), 0);
    assert_eq!(h.ledger.acquired(), 0);
}

#[test]
fn resolution_failure_never_loads() {
    let h = harness(Behaviour::Succeed, false);

    let err = h
        .coordinator
        .export_args(&["map.tmx", "out.png"], ExportOptions::default())
        .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::NoMatchingFormat);
    assert_eq!(h.calls.loads(), 0);
}

#[test]
fn write_failure_still_releases_exactly_once() {
    let h = harness(Behaviour::Fail, false);

    let err = h
        .coordinator
        .export_args(&["map.tmx", "out.json"], ExportOptions::default())
        .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::WriteFailed);
    assert!(err
        .to_string()
        .starts_with("Failed to export map to target file out.json"));
    match &err {
        ExportError::WriteFailed { writer, source, .. } => {
            assert_eq!(writer, "A");
            assert!(source.to_string().contains("read-only"));
        }
        other => panic!("unexpected error {other:?}"),
    }

    assert_eq!(h.calls.writes(), 1);
    assert_eq!(*h.calls.live_during_write.lock().unwrap(), vec![2]);
    assert_eq!(h.ledger.released(), 2);
    assert_eq!(h.ledger.live(), 0);
}

#[test]
fn panicking_writer_still_releases() {
    let h = harness(Behaviour::Panic, false);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        h.coordinator
            .export_args(&["map.tmx", "out.json"], ExportOptions::default())
    }));

    assert!(outcome.is_err());
    assert_eq!(h.calls.writes(), 1);
    assert_eq!(h.ledger.released(), 2);
    assert_eq!(h.ledger.live(), 0);
}

#[test]
fn dry_run_loads_and_releases_without_writing() {
    let h = harness(Behaviour::Fail, false);

    let summary = h
        .coordinator
        .export_args(&["map.tmx", "out.json"], ExportOptions { dry_run: true })
        .unwrap();

    assert!(summary.dry_run);
    assert_eq!(h.calls.loads(), 1);
    assert_eq!(h.calls.writes(), 0);
    assert_eq!(h.ledger.live(), 0);
}

#[test]
fn hint_from_request_is_used() {
    let h = harness(Behaviour::Succeed, false);
    let request = ExportRequest::new(Some("json FILES".to_string()), "map.tmx", "out.dat").unwrap();

    let summary = h.coordinator.export(&request, ExportOptions::default()).unwrap();

    assert_eq!(summary.writer, "A");
    assert_eq!(summary.target, Path::new("out.dat"));
}

#[test]
fn extra_tokens_are_ignored() {
    let h = harness(Behaviour::Succeed, false);

    let summary = h
        .coordinator
        .export_args(
            &["JSON files", "map.tmx", "out.dat", "--verbose"],
            ExportOptions::default(),
        )
        .unwrap();

    assert_eq!(summary.source, Path::new("map.tmx"));
    assert_eq!(h.calls.writes(), 1);
}

#[test]
fn ambiguous_suffix_never_loads() {
    let ledger = ResourceLedger::new();
    let calls = Calls::default();
    let mut registry = WriterRegistry::new();
    for (name, label) in [("A", "JSON"), ("B", "JSON text")] {
        registry
            .register(ScriptedWriter {
                name,
                label,
                pattern: "json",
                behaviour: Behaviour::Succeed,
                ledger: ledger.clone(),
                calls: calls.clone(),
            })
            .unwrap();
    }
    let reader = LedgerReader {
        ledger,
        calls: calls.clone(),
        fail: false,
    };
    let coordinator = ExportCoordinator::new(registry, Box::new(reader));

    let err = coordinator
        .export_args(&["map.tmx", "out.json"], ExportOptions::default())
        .unwrap_err();

    assert_eq!(err.kind(), ExportErrorKind::AmbiguousFormat);
    assert_eq!(calls.loads(), 0);
    assert_eq!(calls.writes(), 0);
}

mod end_to_end {
    use mapexport::adapters::reader::TmxReader;
    use mapexport::adapters::writers::create_writer_registry;
    use mapexport::config::PluginsConfig;
    use mapexport::core::export::{ExportCoordinator, ExportOptions};
    use mapexport::domain::{ExportErrorKind, ResourceLedger};
    use std::fs;
    use tempfile::TempDir;

    const TOWN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.0" orientation="orthogonal" width="2" height="2" tilewidth="16" tileheight="16">
 <tileset firstgid="1" name="terrain" tilewidth="16" tileheight="16"/>
 <layer name="ground" width="2" height="2">
  <data encoding="csv">1,2,0,3</data>
 </layer>
</map>
"#;

    fn setup() -> (TempDir, ExportCoordinator, ResourceLedger) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("town.tmx"), TOWN).unwrap();

        let ledger = ResourceLedger::new();
        let registry = create_writer_registry(&PluginsConfig::default()).unwrap();
        let coordinator =
            ExportCoordinator::new(registry, Box::new(TmxReader::with_ledger(ledger.clone())));
        (dir, coordinator, ledger)
    }

    #[test]
    fn exports_tmx_to_json() {
        let (dir, coordinator, ledger) = setup();
        let source = dir.path().join("town.tmx");
        let target = dir.path().join("town.json");

        let summary = coordinator
            .export_args(
                &[source.to_str().unwrap(), target.to_str().unwrap()],
                ExportOptions::default(),
            )
            .unwrap();

        assert_eq!(summary.writer, "json");
        assert_eq!(summary.layer_count, 1);
        assert_eq!(ledger.acquired(), 1);
        assert_eq!(ledger.live(), 0);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(written["width"], 2);
        assert_eq!(written["tilesets"][0]["name"], "terrain");
        assert_eq!(written["layers"][0]["name"], "ground");
    }

    #[test]
    fn exports_tmx_to_csv_by_hint() {
        let (dir, coordinator, ledger) = setup();
        let source = dir.path().join("town.tmx");
        let target = dir.path().join("town.txt");

        let summary = coordinator
            .export_args(
                &["csv files", source.to_str().unwrap(), target.to_str().unwrap()],
                ExportOptions::default(),
            )
            .unwrap();

        assert_eq!(summary.writer, "csv");
        assert_eq!(ledger.live(), 0);
        assert_eq!(fs::read_to_string(&target).unwrap(), "0,1\n-1,2\n");
    }

    #[test]
    fn dry_run_leaves_no_file() {
        let (dir, coordinator, ledger) = setup();
        let source = dir.path().join("town.tmx");
        let target = dir.path().join("town.lua");

        coordinator
            .export_args(
                &[source.to_str().unwrap(), target.to_str().unwrap()],
                ExportOptions { dry_run: true },
            )
            .unwrap();

        assert!(!target.exists());
        assert_eq!(ledger.acquired(), 1);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn unwritable_target_is_write_failure() {
        let (dir, coordinator, ledger) = setup();
        let source = dir.path().join("town.tmx");
        let target = dir.path().join("missing").join("town.json");

        let err = coordinator
            .export_args(
                &[source.to_str().unwrap(), target.to_str().unwrap()],
                ExportOptions::default(),
            )
            .unwrap_err();

        assert_eq!(err.kind(), ExportErrorKind::WriteFailed);
        assert_eq!(ledger.live(), 0);
    }

    #[test]
    fn partially_loaded_map_is_released() {
        let (dir, coordinator, ledger) = setup();
        let source = dir.path().join("broken.tmx");
        fs::write(
            &source,
            r#"<map width="2" height="2" tilewidth="16" tileheight="16">
 <tileset firstgid="1" name="terrain" tilewidth="16" tileheight="16"/>
 <layer name="ground" width="2" height="2"><data encoding="csv">1,2,3</data></layer>
</map>"#,
        )
        .unwrap();
        let target = dir.path().join("broken.json");

        let err = coordinator
            .export_args(
                &[source.to_str().unwrap(), target.to_str().unwrap()],
                ExportOptions::default(),
            )
            .unwrap_err();

        assert_eq!(err.kind(), ExportErrorKind::SourceLoadFailed);
        assert_eq!(ledger.acquired(), 1);
        assert_eq!(ledger.live(), 0);
        assert!(!target.exists());
    }

    #[test]
    fn missing_source_is_load_failure() {
        let (dir, coordinator, _) = setup();
        let source = dir.path().join("nowhere.tmx");
        let target = dir.path().join("town.json");

        let err = coordinator
            .export_args(
                &[source.to_str().unwrap(), target.to_str().unwrap()],
                ExportOptions::default(),
            )
            .unwrap_err();

        assert_eq!(err.kind(), ExportErrorKind::SourceLoadFailed);
        assert!(!target.exists());
    }
}
