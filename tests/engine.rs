use osmmeta::data::osm::{FeatureRef, Member, MemberKind, Node, OsmId, Relation, Tags, Way};
use osmmeta::data::OsmMapData;
use osmmeta::persist::{load_state, save_state};
use osmmeta::store::history::History;
use osmmeta::store::OsmMetaStore;

fn node(id: OsmId) -> Node {
    Node {
        id,
        lon: 0.0,
        lat: 0.0,
        tags: Tags::new(),
        local: None,
    }
}

fn highway_way(id: OsmId, nd: &[OsmId]) -> Way {
    let mut tags = Tags::new();
    tags.insert(b"highway".to_vec(), b"primary".to_vec());
    Way {
        id,
        nd: nd.to_vec(),
        tags,
        local: None,
    }
}

fn bus_route(id: OsmId, members: Vec<Member>) -> Relation {
    let mut tags = Tags::new();
    tags.insert(b"type".to_vec(), b"route".to_vec());
    tags.insert(b"route".to_vec(), b"bus".to_vec());
    tags.insert(b"public_transport:version".to_vec(), b"2".to_vec());
    Relation {
        id,
        members,
        tags,
        local: None,
    }
}

fn sample_store() -> OsmMetaStore {
    let mut data = OsmMapData::default();
    data.nodes.insert(1, node(1));
    data.nodes.insert(2, node(2));
    data.ways.insert(10, highway_way(10, &[1, 2]));
    data.relations.insert(
        20,
        bus_route(
            20,
            vec![Member {
                kind: MemberKind::Way,
                ref_id: 10,
                role: b"route".to_vec(),
            }],
        ),
    );
    OsmMetaStore::with_data(data)
}

#[test]
fn derived_state_follows_mutation_commit_and_history_travel() {
    let mut store = sample_store();
    store.commit();

    let mut history = History::default();
    history.record(store.state());

    {
        let computed = store.computed().unwrap();
        assert!(computed.tree.roots.relation.contains(&20));
        assert!(!computed.tree.roots.way.contains(&10));
        assert!(computed.collections.highway.contains(FeatureRef::way(10)));
        assert!(computed.collections.ptv2.contains(FeatureRef::relation(20)));
        assert!(computed.collections.global.contains(FeatureRef::way(10)));
        assert!(computed.collections.global.contains(FeatureRef::relation(20)));
    }

    // A locally created node shows up in `created` but not in `global`.
    store.insert_node(node(-5));
    store.commit();
    history.record(store.state());

    {
        let computed = store.computed().unwrap();
        assert!(computed.collections.created.contains(FeatureRef::node(-5)));
        assert!(!computed.collections.global.contains(FeatureRef::node(-5)));
        assert!(computed.tree.roots.node.contains(&-5));
    }

    assert!(history.undo(&mut store));
    let computed = store.computed().unwrap();
    assert!(!computed.tree.elems.node.contains_key(&-5));
    assert!(computed.collections.created.is_empty());
}

#[test]
fn selection_survives_persistence_but_derived_state_is_rebuilt() {
    let mut store = sample_store();
    store.select(FeatureRef::way(10)).unwrap();
    store.select(FeatureRef::node(1)).unwrap();
    store.commit();

    let bytes = save_state(store.state()).unwrap();
    let mut reloaded = OsmMetaStore::from_state(load_state(&bytes).unwrap());

    assert_eq!(
        reloaded.selected(),
        &[FeatureRef::way(10), FeatureRef::node(1)]
    );
    assert_eq!(reloaded.active(), Some(FeatureRef::node(1)));
    assert!(reloaded.local_state(FeatureRef::way(10)).unwrap().selected);
    assert!(!reloaded.local_state(FeatureRef::way(10)).unwrap().active);

    let computed = reloaded.computed().unwrap();
    assert_eq!(computed.tree.elems.way[&10].childs.node, vec![1, 2]);
}

#[test]
fn deleting_a_selected_feature_keeps_the_rest_of_the_session_intact() {
    let mut store = sample_store();
    store.select(FeatureRef::node(1)).unwrap();
    store.select(FeatureRef::way(10)).unwrap();

    store.remove_feature(FeatureRef::way(10));

    assert_eq!(store.selected(), &[FeatureRef::node(1)]);
    assert_eq!(store.active(), None);

    let computed = store.computed().unwrap();
    assert!(!computed.tree.elems.way.contains_key(&10));
    // Node 1 lost its only father and becomes a root again.
    assert!(computed.tree.roots.node.contains(&1));
    assert!(computed.collections.highway.is_empty());
}
