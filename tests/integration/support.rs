use std::path::Path;

use hfsubset::{Column, DataType, Schema, SledContainer, Table, TableExporter, Value};

fn geometry(id: &str) -> Value {
    Value::Blob(format!("POINT({})", id).into_bytes())
}

fn text(v: Option<&str>) -> Value {
    Value::from(v)
}

pub fn nexus_table(rows: &[(&str, Option<&str>)]) -> Table {
    let schema = Schema::new(
        vec![
            Column::new("id", DataType::Text),
            Column::new("type", DataType::Text),
            Column::new("toid", DataType::Text),
            Column::new("geometry", DataType::Blob),
        ],
        Some("geometry".to_string()),
    );
    Table::with_rows(
        "nexus",
        schema,
        rows.iter()
            .map(|(id, toid)| {
                vec![
                    (*id).into(),
                    "nexus".into(),
                    text(*toid),
                    geometry(id),
                ]
            })
            .collect(),
    )
    .unwrap()
}

pub fn flowpaths_table(rows: &[(&str, Option<&str>)]) -> Table {
    let schema = Schema::new(
        vec![
            Column::new("id", DataType::Text),
            Column::new("toid", DataType::Text),
            Column::new("lengthkm", DataType::Real),
            Column::new("geometry", DataType::Blob),
        ],
        Some("geometry".to_string()),
    );
    Table::with_rows(
        "flowpaths",
        schema,
        rows.iter()
            .map(|(id, toid)| vec![(*id).into(), text(*toid), 1.5.into(), geometry(id)])
            .collect(),
    )
    .unwrap()
}

pub fn divides_table(ids: &[&str]) -> Table {
    let schema = Schema::new(
        vec![
            Column::new("divide_id", DataType::Text),
            Column::new("areasqkm", DataType::Real),
            Column::new("geometry", DataType::Blob),
        ],
        Some("geometry".to_string()),
    );
    Table::with_rows(
        "divides",
        schema,
        ids.iter()
            .map(|id| vec![(*id).into(), 2.0.into(), geometry(id)])
            .collect(),
    )
    .unwrap()
}

pub fn attributes_table(rows: &[(&str, f64, f64)]) -> Table {
    let schema = Schema::new(
        vec![
            Column::new("link", DataType::Text),
            Column::new("n", DataType::Real),
            Column::new("BtmWdth", DataType::Real),
        ],
        None,
    );
    Table::with_rows(
        "flowpath-attributes",
        schema,
        rows.iter()
            .map(|(link, n, width)| vec![(*link).into(), (*n).into(), (*width).into()])
            .collect(),
    )
    .unwrap()
}

pub fn network_table(rows: &[(Option<&str>, &str)]) -> Table {
    let schema = Schema::new(
        vec![
            Column::new("divide_id", DataType::Text),
            Column::new("id", DataType::Text),
        ],
        None,
    );
    Table::with_rows(
        "network",
        schema,
        rows.iter()
            .map(|(divide, id)| vec![text(*divide), (*id).into()])
            .collect(),
    )
    .unwrap()
}

/// Small hydrofabric: wb-2 drains to wb-1, which drains to nex-1, which drains
/// to nex-2. wb-9 and nex-9 are a disconnected basin.
pub fn sample_layers() -> Vec<Table> {
    vec![
        nexus_table(&[
            ("nex-1", Some("nex-2")),
            ("nex-2", None),
            ("nex-9", None),
        ]),
        flowpaths_table(&[
            ("wb-1", Some("nex-1")),
            ("wb-2", Some("wb-1")),
            ("wb-9", Some("nex-9")),
        ]),
        divides_table(&["cat-1", "cat-2", "cat-9"]),
        attributes_table(&[
            ("wb-1", 0.03, 4.0),
            ("wb-1", 0.03, 4.0),
            ("wb-1", 0.05, 4.0),
            ("wb-2", 0.04, 2.5),
            ("wb-9", 0.06, 1.0),
        ]),
        network_table(&[
            (Some("cat-1"), "wb-1"),
            (Some("cat-2"), "wb-2"),
            (None, "nex-2"),
            (Some("cat-9"), "wb-9"),
        ]),
    ]
}

/// Write `layers` to a new container at `path` and close it
pub fn write_container(path: &Path, layers: &[Table]) {
    let mut container = SledContainer::open_destination(path).unwrap();
    for table in layers {
        container.write_layer(table.name(), table).unwrap();
    }
}

/// Sorted, non-null text values of `column`
pub fn column_values(table: &Table, column: &str) -> Vec<String> {
    let idx = table.schema().column_index(column).unwrap();
    let mut values: Vec<String> = table
        .rows()
        .iter()
        .filter_map(|row| row[idx].as_str().map(str::to_string))
        .collect();
    values.sort();
    values
}
