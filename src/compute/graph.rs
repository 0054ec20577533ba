use std::collections::{HashMap, HashSet};

use crate::data::osm::{FeatureType, MemberKind, OsmId};
use crate::data::OsmMapData;
use crate::errors::{Error, Result};

use super::ByType;

/// One feature's place in the reference graph. Father and child lists keep
/// the order the references appear in the source data and may name ids that
/// do not exist in the current maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: OsmId,
    pub feature_type: FeatureType,
    pub fathers: ByType<Vec<OsmId>>,
    pub childs: ByType<Vec<OsmId>>,
}

impl GraphNode {
    fn new(feature_type: FeatureType, id: OsmId) -> GraphNode {
        GraphNode {
            id,
            feature_type,
            fathers: ByType::default(),
            childs: ByType::default(),
        }
    }

    pub fn is_root(&self) -> bool {
        FeatureType::ALL
            .into_iter()
            .all(|t| self.fathers.get(t).is_empty())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeatureGraph {
    pub elems: ByType<HashMap<OsmId, GraphNode>>,
    pub roots: ByType<HashSet<OsmId>>,
}

fn sorted_ids<V>(map: &HashMap<OsmId, V>) -> Vec<OsmId> {
    let mut ids: Vec<OsmId> = map.keys().copied().collect();
    ids.sort_unstable();
    ids
}

/// Builds the father/child reference graph from the raw maps. Reads only;
/// dangling references stay unresolved instead of becoming edges.
pub fn build_feature_graph(data: &OsmMapData) -> Result<FeatureGraph> {
    let mut graph = FeatureGraph::default();

    for &id in data.nodes.keys() {
        graph
            .elems
            .node
            .insert(id, GraphNode::new(FeatureType::Node, id));
    }
    for &id in data.ways.keys() {
        graph
            .elems
            .way
            .insert(id, GraphNode::new(FeatureType::Way, id));
    }
    for &id in data.relations.keys() {
        graph
            .elems
            .relation
            .insert(id, GraphNode::new(FeatureType::Relation, id));
    }

    // Ways adopt the nodes they reference. Visiting ways in ascending id
    // order keeps father lists deterministic across rebuilds.
    for way_id in sorted_ids(&data.ways) {
        let way = &data.ways[&way_id];
        for &nd in &way.nd {
            let Some(child) = graph.elems.node.get_mut(&nd) else {
                continue;
            };
            child.fathers.way.push(way_id);
            graph
                .elems
                .way
                .get_mut(&way_id)
                .ok_or_else(|| Error::Integrity(format!("way {way_id} missing after init")))?
                .childs
                .node
                .push(nd);
        }
    }

    // Relations adopt their members. `Other` members carry no edges.
    for rel_id in sorted_ids(&data.relations) {
        let relation = &data.relations[&rel_id];
        for member in &relation.members {
            let child_type = match member.kind {
                MemberKind::Node => FeatureType::Node,
                MemberKind::Way => FeatureType::Way,
                MemberKind::Relation => FeatureType::Relation,
                MemberKind::Other => continue,
            };
            let Some(child) = graph.elems.get_mut(child_type).get_mut(&member.ref_id) else {
                continue;
            };
            child.fathers.relation.push(rel_id);
            graph
                .elems
                .relation
                .get_mut(&rel_id)
                .ok_or_else(|| Error::Integrity(format!("relation {rel_id} missing after init")))?
                .childs
                .get_mut(child_type)
                .push(member.ref_id);
        }
    }

    for feature_type in FeatureType::ALL {
        let root_ids: Vec<OsmId> = graph
            .elems
            .get(feature_type)
            .values()
            .filter(|elem| elem.is_root())
            .map(|elem| elem.id)
            .collect();
        graph.roots.get_mut(feature_type).extend(root_ids);
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::osm::{Member, Node, Relation, Tags, Way};

    fn node(id: OsmId) -> Node {
        Node {
            id,
            lon: 0.0,
            lat: 0.0,
            tags: Tags::new(),
            local: None,
        }
    }

    fn way(id: OsmId, nd: &[OsmId]) -> Way {
        Way {
            id,
            nd: nd.to_vec(),
            tags: Tags::new(),
            local: None,
        }
    }

    fn relation(id: OsmId, members: Vec<Member>) -> Relation {
        Relation {
            id,
            members,
            tags: Tags::new(),
            local: None,
        }
    }

    fn member(kind: MemberKind, ref_id: OsmId) -> Member {
        Member {
            kind,
            ref_id,
            role: Vec::new(),
        }
    }

    #[test]
    fn way_adopts_existing_nodes_and_skips_dangling_refs() {
        let mut data = OsmMapData::default();
        data.nodes.insert(1, node(1));
        data.nodes.insert(2, node(2));
        data.ways.insert(10, way(10, &[1, 2, 3]));

        let graph = build_feature_graph(&data).unwrap();

        assert_eq!(graph.elems.node[&1].fathers.way, vec![10]);
        assert_eq!(graph.elems.node[&2].fathers.way, vec![10]);
        assert_eq!(graph.elems.way[&10].childs.node, vec![1, 2]);
        assert!(graph.roots.way.contains(&10));
        assert!(!graph.roots.node.contains(&1));
        assert!(!graph.roots.node.contains(&2));
    }

    #[test]
    fn relation_skips_dangling_and_other_members() {
        let mut data = OsmMapData::default();
        data.ways.insert(10, way(10, &[]));
        data.relations.insert(
            1,
            relation(
                1,
                vec![
                    member(MemberKind::Way, 10),
                    member(MemberKind::Node, 99),
                    member(MemberKind::Other, 5),
                ],
            ),
        );

        let graph = build_feature_graph(&data).unwrap();

        assert_eq!(graph.elems.way[&10].fathers.relation, vec![1]);
        assert_eq!(graph.elems.relation[&1].childs.way, vec![10]);
        assert!(graph.elems.relation[&1].childs.node.is_empty());
        assert!(graph.elems.relation[&1].childs.relation.is_empty());
        assert!(graph.roots.relation.contains(&1));
        assert!(!graph.roots.way.contains(&10));
    }

    #[test]
    fn relation_members_may_be_relations() {
        let mut data = OsmMapData::default();
        data.relations.insert(1, relation(1, vec![member(MemberKind::Relation, 2)]));
        data.relations.insert(2, relation(2, vec![]));

        let graph = build_feature_graph(&data).unwrap();

        assert_eq!(graph.elems.relation[&2].fathers.relation, vec![1]);
        assert_eq!(graph.elems.relation[&1].childs.relation, vec![2]);
        assert!(graph.roots.relation.contains(&1));
        assert!(!graph.roots.relation.contains(&2));
    }

    #[test]
    fn self_referencing_relation_is_not_a_root() {
        let mut data = OsmMapData::default();
        data.relations.insert(7, relation(7, vec![member(MemberKind::Relation, 7)]));

        let graph = build_feature_graph(&data).unwrap();

        assert_eq!(graph.elems.relation[&7].fathers.relation, vec![7]);
        assert_eq!(graph.elems.relation[&7].childs.relation, vec![7]);
        assert!(!graph.roots.relation.contains(&7));
    }

    #[test]
    fn child_and_father_lists_are_mutually_consistent() {
        let mut data = OsmMapData::default();
        for id in 1..=4 {
            data.nodes.insert(id, node(id));
        }
        data.ways.insert(10, way(10, &[1, 2]));
        data.ways.insert(11, way(11, &[2, 3, 4]));
        data.relations.insert(
            20,
            relation(
                20,
                vec![
                    member(MemberKind::Way, 10),
                    member(MemberKind::Way, 11),
                    member(MemberKind::Node, 4),
                ],
            ),
        );

        let graph = build_feature_graph(&data).unwrap();

        for feature_type in FeatureType::ALL {
            for elem in graph.elems.get(feature_type).values() {
                for (child_type, childs) in elem.childs.iter() {
                    for child_id in childs {
                        let child = &graph.elems.get(child_type)[child_id];
                        let back_refs = child.fathers.get(feature_type);
                        assert!(
                            back_refs.contains(&elem.id),
                            "{} {} lists {} {} as child but has no back reference",
                            feature_type.name(),
                            elem.id,
                            child_type.name(),
                            child_id,
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn roots_are_exactly_the_fatherless_elements() {
        let mut data = OsmMapData::default();
        data.nodes.insert(1, node(1));
        data.nodes.insert(2, node(2));
        data.ways.insert(10, way(10, &[1]));

        let graph = build_feature_graph(&data).unwrap();

        for feature_type in FeatureType::ALL {
            for elem in graph.elems.get(feature_type).values() {
                assert_eq!(
                    graph.roots.get(feature_type).contains(&elem.id),
                    elem.is_root(),
                );
            }
        }
        assert!(graph.roots.node.contains(&2));
        assert!(!graph.roots.node.contains(&1));
    }

    #[test]
    fn rebuild_from_unchanged_data_is_equal() {
        let mut data = OsmMapData::default();
        data.nodes.insert(1, node(1));
        data.nodes.insert(2, node(2));
        data.ways.insert(10, way(10, &[1, 2]));
        data.ways.insert(11, way(11, &[2]));
        data.relations.insert(20, relation(20, vec![member(MemberKind::Way, 10)]));

        let first = build_feature_graph(&data).unwrap();
        let second = build_feature_graph(&data).unwrap();

        assert_eq!(first, second);
    }
}
