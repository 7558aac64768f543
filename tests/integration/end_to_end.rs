use hfsubset::{
    extract_upstream, extract_upstream_with, ExtractError, ExtractOptions, Layer, SledContainer,
    TableProvider,
};
use tempfile::TempDir;

use crate::integration::support::{
    column_values, flowpaths_table, sample_layers, write_container,
};

#[test]
fn extracts_upstream_of_nexus_into_new_container() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("conus.db");
    let destination = temp.path().join("out").join("subset.db");
    write_container(&source, &sample_layers());

    let result = extract_upstream(&source, &destination, "nex-1", None).unwrap();

    let upstream: Vec<&str> = result.upstream.iter().map(String::as_str).collect();
    assert_eq!(upstream, vec!["nex-1", "wb-1", "wb-2"]);
    let divides: Vec<&str> = result.divide_ids.iter().map(String::as_str).collect();
    assert_eq!(divides, vec!["cat-1", "cat-2"]);

    let output = SledContainer::open_source(&destination).unwrap();
    let mut layers = output.list_layers().unwrap();
    layers.sort();
    assert_eq!(
        layers,
        vec!["divides", "flowpath-attributes", "flowpaths", "network", "nexus"]
    );

    assert_eq!(
        column_values(&output.get_layer("divides").unwrap(), "divide_id"),
        vec!["cat-1", "cat-2"]
    );
    assert_eq!(
        column_values(&output.get_layer("nexus").unwrap(), "id"),
        vec!["nex-1"]
    );
    assert_eq!(
        column_values(&output.get_layer("flowpaths").unwrap(), "id"),
        vec!["wb-1", "wb-2"]
    );
    assert_eq!(
        column_values(&output.get_layer("network").unwrap(), "divide_id"),
        vec!["cat-1", "cat-2"]
    );

    let attributes = output.get_layer("flowpath-attributes").unwrap();
    assert_eq!(
        column_values(&attributes, "link"),
        vec!["wb-1", "wb-1", "wb-2"]
    );
}

#[test]
fn geometry_survives_the_round_trip() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("conus.db");
    let destination = temp.path().join("subset.db");
    write_container(&source, &sample_layers());

    let result = extract_upstream(&source, &destination, "nex-1", None).unwrap();
    assert!(result.layer(Layer::Divides).unwrap().has_geometry);
    assert!(!result.layer(Layer::Network).unwrap().has_geometry);

    let output = SledContainer::open_source(&destination).unwrap();
    let flowpaths = output.get_layer("flowpaths").unwrap();
    assert_eq!(flowpaths.geometry_column(), Some("geometry"));
    let geometry = flowpaths.schema().column_index("geometry").unwrap();
    let id = flowpaths.schema().column_index("id").unwrap();
    for row in flowpaths.rows() {
        let expected = format!("POINT({})", row[id].as_str().unwrap()).into_bytes();
        assert_eq!(row[geometry], hfsubset::Value::Blob(expected));
    }
}

#[test]
fn attribute_projection_is_applied() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("conus.db");
    let destination = temp.path().join("subset.db");
    write_container(&source, &sample_layers());

    let columns = vec!["link".to_string(), "BtmWdth".to_string()];
    let result = extract_upstream(&source, &destination, "nex-1", Some(&columns)).unwrap();

    let summary = result.layer(Layer::FlowpathAttributes).unwrap();
    assert_eq!(summary.columns, columns);
    // Projection drops `n`, so the two wb-1 rows that differed only in `n` collapse
    assert_eq!(summary.rows, 2);
}

#[test]
fn missing_source_is_reported() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("absent.db");
    let destination = temp.path().join("subset.db");

    let err = extract_upstream(&source, &destination, "nex-1", None).unwrap_err();
    assert!(matches!(err, ExtractError::SourceNotFound { path } if path == source));
    assert!(!destination.exists());
}

#[test]
fn missing_layer_is_reported() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("conus.db");
    let destination = temp.path().join("subset.db");
    write_container(&source, &[flowpaths_table(&[("wb-1", Some("nex-1"))])]);

    let err = extract_upstream(&source, &destination, "nex-1", None).unwrap_err();
    assert!(matches!(err, ExtractError::LayerNotFound { layer, .. } if layer == "nexus"));
    assert!(!destination.exists());
}

#[test]
fn unknown_seed_produces_no_output() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("conus.db");
    let destination = temp.path().join("subset.db");
    write_container(&source, &sample_layers());

    let err = extract_upstream(&source, &destination, "nex-404", None).unwrap_err();
    assert!(matches!(err, ExtractError::NodeNotFound(id) if id == "nex-404"));
    assert!(!destination.exists());
}

#[test]
fn malformed_upstream_id_aborts_before_export() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("conus.db");
    let destination = temp.path().join("subset.db");
    let mut layers = sample_layers();
    layers[1] = flowpaths_table(&[
        ("wb-1", Some("nex-1")),
        ("wb-2", Some("wb-1")),
        ("headwater", Some("wb-2")),
    ]);
    write_container(&source, &layers);

    let err = extract_upstream(&source, &destination, "nex-1", None).unwrap_err();
    assert!(matches!(err, ExtractError::MalformedIdentifier(id) if id == "headwater"));
    assert!(!destination.exists());
}

#[test]
fn upstream_limit_is_enforced() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("conus.db");
    let destination = temp.path().join("subset.db");
    write_container(&source, &sample_layers());

    let options = ExtractOptions::default().with_max_upstream_nodes(1);
    let err = extract_upstream_with(&source, &destination, "nex-1", options).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::UpstreamLimitExceeded { seed, limit: 1 } if seed == "nex-1"
    ));
    assert!(!destination.exists());
}

#[test]
fn repeated_export_appends_to_destination() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("conus.db");
    let destination = temp.path().join("subset.db");
    write_container(&source, &sample_layers());

    extract_upstream(&source, &destination, "wb-2", None).unwrap();
    extract_upstream(&source, &destination, "wb-2", None).unwrap();

    let output = SledContainer::open_source(&destination).unwrap();
    assert_eq!(
        column_values(&output.get_layer("flowpaths").unwrap(), "id"),
        vec!["wb-2", "wb-2"]
    );
}
