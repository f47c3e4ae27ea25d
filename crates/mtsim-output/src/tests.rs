//! Integration tests for mtsim-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{TickSummaryRow, VehicleSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(actor_id: u64, tick: u64) -> VehicleSnapshotRow {
        VehicleSnapshotRow {
            tick,
            sim_time: tick as f64 * 0.1,
            actor_id,
            x: actor_id as f64,
            y: 0.0,
            heading: 0.0,
            speed: 5.0,
            role: "social".into(),
            source: "traffic".into(),
        }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow { tick, sim_time: tick as f64 * 0.1, owned_count: tick }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("vehicle_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "sim_time", "actor_id", "x", "y", "heading", "speed", "role", "source"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["tick", "sim_time", "owned_count"]);
    }

    #[test]
    fn csv_snapshot_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)];
        w.write_snapshots(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 3);
        assert_eq!(&read_rows[0][2], "0"); // actor_id
        assert_eq!(&read_rows[0][0], "5"); // tick
        assert_eq!(&read_rows[1][2], "1");
        assert_eq!(&read_rows[2][2], "2");
    }

    #[test]
    fn csv_tick_summary_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 1);
        assert_eq!(&read_rows[0][0], "3"); // tick
        assert_eq!(&read_rows[0][2], "3"); // owned_count
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap(); // should return Ok(())
    }
}

// ── End-to-end: provider + observer ──────────────────────────────────────────

#[cfg(test)]
mod integration_tests {
    use mtsim_core::Point2;
    use mtsim_map::{StaticRoadMap, StaticRoadMapBuilder};
    use mtsim_provider::{Provider, ProviderConfig, Scenario};
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::observer::ProviderOutputObserver;

    const FLOW_XML: &str = r#"
    <routes>
      <vType id="car" maxSpeed="12" accel="2.6" decel="4.5"/>
      <route id="r0" edges="0"/>
      <flow id="f0" type="car" route="r0" begin="0" end="3600" vehsPerHour="3600"
            departLane="0" departPos="0" departSpeed="max"
            arrivalLane="0" arrivalPos="max"/>
    </routes>
    "#;

    fn one_lane_map() -> StaticRoadMap {
        let mut b = StaticRoadMapBuilder::new();
        let road = b.add_road();
        b.add_lane(road, 0, Point2::new(0.0, 0.0), 0.0, 500.0, 3.5, 30.0, f64::INFINITY);
        b.build()
    }

    #[test]
    fn observer_writes_a_row_per_owned_vehicle_per_tick() {
        let flow_file = mtsim_flow::load_flow_str(FLOW_XML).unwrap();
        let scenario = Scenario {
            map: one_lane_map(),
            flow_file,
            config: ProviderConfig { dt: 0.1, seed: 1, endless_traffic: false, ..ProviderConfig::default() },
            source: "traffic".into(),
        };
        let (mut provider, _state) = Provider::setup(scenario).unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut observer = ProviderOutputObserver::new(writer);

        let mut sim_time = 0.0;
        for _ in 0..10 {
            sim_time += 0.1;
            provider.step(0.1, sim_time, &mut observer);
        }
        observer.finish();
        assert!(observer.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert!(!rows.is_empty(), "at least one owned vehicle should have been snapshotted");

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let summaries: Vec<_> = rdr2.records().map(|r| r.unwrap()).collect();
        assert_eq!(summaries.len(), 10, "one tick summary row per step() call");
    }

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }
}
