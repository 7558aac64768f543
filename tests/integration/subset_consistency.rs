use std::collections::{BTreeSet, HashMap};

use hfsubset::{
    divide_id_for, ExtractError, ExtractOptions, Extractor, MemoryContainer, Table,
    TableExporter, TableProvider,
};
use proptest::prelude::*;

use crate::integration::support::{
    attributes_table, column_values, divides_table, flowpaths_table, network_table, nexus_table,
};

/// Random drainage tree: wb-1 drains to nex-1, every later wb-i drains to an
/// earlier flowpath.
fn tree_container(parents: &[usize]) -> (MemoryContainer, HashMap<usize, usize>) {
    let ids: Vec<String> = (1..=parents.len() + 1).map(|i| format!("wb-{}", i)).collect();
    let mut toids: Vec<String> = vec!["nex-1".to_string()];
    let mut parent_of = HashMap::new();
    for (offset, p) in parents.iter().enumerate() {
        let child = offset + 2;
        let parent = p % (child - 1) + 1;
        parent_of.insert(child, parent);
        toids.push(format!("wb-{}", parent));
    }

    let flowpath_rows: Vec<(&str, Option<&str>)> = ids
        .iter()
        .zip(toids.iter())
        .map(|(id, toid)| (id.as_str(), Some(toid.as_str())))
        .collect();
    let divide_ids: Vec<String> = (1..=ids.len()).map(|i| format!("cat-{}", i)).collect();
    let divide_refs: Vec<&str> = divide_ids.iter().map(String::as_str).collect();
    let attribute_rows: Vec<(&str, f64, f64)> = ids
        .iter()
        .flat_map(|id| [(id.as_str(), 0.03, 1.0), (id.as_str(), 0.03, 1.0)])
        .collect();
    let network_rows: Vec<(Option<&str>, &str)> = divide_ids
        .iter()
        .zip(ids.iter())
        .map(|(d, id)| (Some(d.as_str()), id.as_str()))
        .collect();

    let mut container = MemoryContainer::new();
    container.insert(nexus_table(&[("nex-1", None)]));
    container.insert(flowpaths_table(&flowpath_rows));
    container.insert(divides_table(&divide_refs));
    container.insert(attributes_table(&attribute_rows));
    container.insert(network_table(&network_rows));
    (container, parent_of)
}

fn drains_into(mut node: usize, target: usize, parent_of: &HashMap<usize, usize>) -> bool {
    loop {
        if node == target {
            return true;
        }
        match parent_of.get(&node) {
            Some(parent) => node = *parent,
            None => return false,
        }
    }
}

fn set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().collect()
}

proptest! {
    #[test]
    fn subset_matches_drainage_tree(
        parents in prop::collection::vec(0usize..64, 0..24),
        seed_pick in 0usize..64,
    ) {
        let (source, parent_of) = tree_container(&parents);
        let seed_n = seed_pick % (parents.len() + 1) + 1;
        let seed = format!("wb-{}", seed_n);

        let mut sink = MemoryContainer::new();
        let result = Extractor::new(&source, ExtractOptions::default())
            .run(&seed, &mut sink)
            .unwrap();

        let expected: BTreeSet<String> = (1..=parents.len() + 1)
            .filter(|n| drains_into(*n, seed_n, &parent_of))
            .map(|n| format!("wb-{}", n))
            .collect();
        prop_assert!(result.upstream.contains(&seed));
        prop_assert_eq!(&result.upstream, &expected);

        let derived: BTreeSet<String> = result
            .upstream
            .iter()
            .map(|id| divide_id_for(id).unwrap())
            .collect();
        prop_assert_eq!(&result.divide_ids, &derived);

        let flowpaths = sink.get_layer("flowpaths").unwrap();
        prop_assert_eq!(set(column_values(&flowpaths, "id")), expected.clone());

        let divides = sink.get_layer("divides").unwrap();
        prop_assert_eq!(set(column_values(&divides, "divide_id")), derived.clone());

        let network = sink.get_layer("network").unwrap();
        prop_assert_eq!(set(column_values(&network, "divide_id")), derived);

        let attributes = sink.get_layer("flowpath-attributes").unwrap();
        prop_assert_eq!(attributes.len(), expected.len());
        prop_assert_eq!(attributes.dedup().len(), attributes.len());

        prop_assert!(sink.get_layer("nexus").unwrap().is_empty());
    }
}

#[test]
fn seed_nexus_collects_whole_tree() {
    let (source, _) = tree_container(&[0, 0, 1, 2]);
    let subset = Extractor::new(&source, ExtractOptions::default())
        .extract("nex-1")
        .unwrap();
    assert_eq!(subset.keys.node_ids.len(), 6);
    assert_eq!(subset.tables.nexus.len(), 1);
    assert_eq!(subset.tables.flowpaths.len(), 5);
    assert_eq!(subset.tables.divides.len(), 5);
}

struct FailingExporter {
    written: Vec<String>,
    fail_on: &'static str,
}

impl TableExporter for FailingExporter {
    fn write_layer(&mut self, layer: &str, _table: &Table) -> Result<(), ExtractError> {
        if layer == self.fail_on {
            return Err(ExtractError::InvalidRow {
                layer: layer.to_string(),
                reason: "disk full".to_string(),
            });
        }
        self.written.push(layer.to_string());
        Ok(())
    }
}

#[test]
fn export_failure_names_the_layer() {
    let (source, _) = tree_container(&[0]);
    let mut exporter = FailingExporter {
        written: Vec::new(),
        fail_on: "flowpaths",
    };
    let err = Extractor::new(&source, ExtractOptions::default())
        .run("nex-1", &mut exporter)
        .unwrap_err();

    assert!(matches!(
        &err,
        ExtractError::ExportWrite { layer, reason } if layer == "flowpaths" && reason.contains("disk full")
    ));
    assert_eq!(exporter.written, vec!["divides", "nexus"]);
}
