use crate::data::osm::{FeatureRef, MemberKind, OsmId, Tags};
use crate::data::OsmMapData;

use super::collection::CollectionItem;

fn has_key(tags: &Tags, key: &[u8]) -> bool {
    tags.contains_key(key)
}

fn has_kv_pair(tags: &Tags, key: &[u8], value: &[u8]) -> bool {
    match tags.get(key) {
        // Tag values may be semicolon-separated lists.
        Some(tag_value) => tag_value.split(|b| *b == b';').any(|part| part == value),
        None => false,
    }
}

fn member_ref(kind: MemberKind, ref_id: OsmId) -> Option<FeatureRef> {
    match kind {
        MemberKind::Node => Some(FeatureRef::node(ref_id)),
        MemberKind::Way => Some(FeatureRef::way(ref_id)),
        MemberKind::Relation => Some(FeatureRef::relation(ref_id)),
        MemberKind::Other => None,
    }
}

/// Bus routes mapped in public-transport-v2 style, together with every
/// member the route resolves to in the current maps.
pub fn filter_bus_ptv2(data: &OsmMapData) -> CollectionItem {
    let mut item = CollectionItem::default();
    for relation in data.relations.values() {
        let bus_route = has_kv_pair(&relation.tags, b"type", b"route")
            && has_kv_pair(&relation.tags, b"route", b"bus")
            && has_kv_pair(&relation.tags, b"public_transport:version", b"2");
        let bus_master = has_kv_pair(&relation.tags, b"type", b"route_master")
            && has_kv_pair(&relation.tags, b"route_master", b"bus");
        if !(bus_route || bus_master) {
            continue;
        }
        item.insert(FeatureRef::relation(relation.id));
        for member in &relation.members {
            if let Some(feature) = member_ref(member.kind, member.ref_id) {
                if data.contains(feature) {
                    item.insert(feature);
                }
            }
        }
    }
    item
}

/// Ways carrying a `highway` key, together with the nodes they resolve to.
pub fn filter_highway(data: &OsmMapData) -> CollectionItem {
    let mut item = CollectionItem::default();
    for way in data.ways.values() {
        if !has_key(&way.tags, b"highway") {
            continue;
        }
        item.insert(FeatureRef::way(way.id));
        for &nd in &way.nd {
            if data.nodes.contains_key(&nd) {
                item.insert(FeatureRef::node(nd));
            }
        }
    }
    item
}

/// Features created locally in this editing session. Those carry negative
/// ids until they are uploaded.
pub fn filter_created(data: &OsmMapData) -> CollectionItem {
    let mut item = CollectionItem::default();
    for &id in data.nodes.keys().filter(|id| **id < 0) {
        item.insert(FeatureRef::node(id));
    }
    for &id in data.ways.keys().filter(|id| **id < 0) {
        item.insert(FeatureRef::way(id));
    }
    for &id in data.relations.keys().filter(|id| **id < 0) {
        item.insert(FeatureRef::relation(id));
    }
    item
}
