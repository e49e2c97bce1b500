use border_core::{
    BorderMarkers, DenseRunEstimator, MapDeclaration, MidpointCache, MidpointTable, Point,
    Strategy, build_table,
};

const MAP: &str = r#"{
  "regions": [
    { "name": "West",  "d": "M0 0 L100 0 L100 100 L0 100 Z" },
    { "name": "East",  "d": "M100 0 L200 0 L200 100 L100 100 Z" },
    { "name": "North", "d": "M0 100 L100 100 L100 200 L0 200 Z" },
    { "name": "Isle",  "d": "M500 500 L600 500 L600 600 L500 600 Z" }
  ],
  "adjacency": [[0, 1], [2, 0], [1, 0], [0, 3]]
}"#;

#[test]
fn builds_one_entry_per_unique_pair() {
    let decl = MapDeclaration::from_json(MAP).unwrap();
    let table = build_table(&decl).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.get(1, 0), Some(Point::new(100.0, 50.0)));
    assert_eq!(table.get(0, 2), Some(Point::new(50.0, 100.0)));
    // across the strait: bounding-box centers
    assert_eq!(table.get(3, 0), Some(Point::new(300.0, 300.0)));
}

#[test]
fn live_strategy_agrees_on_straight_borders() {
    let mut decl = MapDeclaration::from_json(MAP).unwrap();
    decl.estimator.strategy = Strategy::Live;
    let table = build_table(&decl).unwrap();
    assert_eq!(table.get(0, 1), Some(Point::new(100.0, 50.0)));
    assert_eq!(table.get(0, 2), Some(Point::new(50.0, 100.0)));
}

#[test]
fn table_json_is_stable_across_regenerations() {
    let decl = MapDeclaration::from_json(MAP).unwrap();
    let first = build_table(&decl).unwrap().to_json_pretty().unwrap();
    let second = build_table(&decl).unwrap().to_json_pretty().unwrap();
    assert_eq!(first, second);
    let reread = MidpointTable::from_json(&first).unwrap();
    assert_eq!(reread, build_table(&decl).unwrap());
    assert!(first.starts_with("{\n  \"0-1\": {"));
}

#[test]
fn precomputed_table_seeds_a_session() {
    let decl = MapDeclaration::from_json(MAP).unwrap();
    let table = build_table(&decl).unwrap();
    let mut markers = BorderMarkers::new(decl.shapes(), Box::new(DenseRunEstimator::default()))
        .with_cache(MidpointCache::from_table(&table));
    assert_eq!(markers.cache().len(), 3);
    assert_eq!(markers.midpoint(2, 0).unwrap(), Point::new(50.0, 100.0));
    // a pair missing from the table is computed lazily and kept
    let p = markers.midpoint(1, 2).unwrap();
    assert_eq!(markers.cache().get(2, 1), Some(p));
    assert_eq!(markers.cache().len(), 4);
}

#[test]
fn bad_adjacency_is_reported() {
    let mut decl = MapDeclaration::from_json(MAP).unwrap();
    decl.adjacency.push([1, 9]);
    assert!(build_table(&decl).is_err());
}
