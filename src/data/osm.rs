use std::collections::HashMap;

/// Numeric feature key. Features created locally in the editor and not yet
/// uploaded carry negative ids, following the usual OSM editor convention.
pub type OsmId = i64;

/// Raw tag map as parsed from the .osm file. Keys and values are kept as
/// bytes and only decoded where a consumer needs a string.
pub type Tags = HashMap<Vec<u8>, Vec<u8>>;

#[derive(
    rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
pub enum FeatureType {
    Node,
    Way,
    Relation,
}

impl FeatureType {
    pub const ALL: [FeatureType; 3] = [FeatureType::Node, FeatureType::Way, FeatureType::Relation];

    pub fn name(self) -> &'static str {
        match self {
            FeatureType::Node => "node",
            FeatureType::Way => "way",
            FeatureType::Relation => "relation",
        }
    }
}

/// A (type, id) pair identifying one feature. Equality is by both fields.
#[derive(
    rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
pub struct FeatureRef {
    pub feature_type: FeatureType,
    pub id: OsmId,
}

impl FeatureRef {
    pub fn node(id: OsmId) -> FeatureRef {
        FeatureRef {
            feature_type: FeatureType::Node,
            id,
        }
    }

    pub fn way(id: OsmId) -> FeatureRef {
        FeatureRef {
            feature_type: FeatureType::Way,
            id,
        }
    }

    pub fn relation(id: OsmId) -> FeatureRef {
        FeatureRef {
            feature_type: FeatureType::Relation,
            id,
        }
    }
}

/// Per-feature interaction flags. Created lazily on first activation or
/// selection and deleted together with the feature.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LocalState {
    pub visible: bool,
    pub highlighted: bool,
    pub hovered: bool,
    pub selected: bool,
    pub active: bool,
}

impl Default for LocalState {
    fn default() -> Self {
        LocalState {
            visible: true,
            highlighted: false,
            hovered: false,
            selected: false,
            active: false,
        }
    }
}

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
pub struct Node {
    pub id: OsmId,
    pub lon: f64,
    pub lat: f64,
    pub tags: Tags,
    pub local: Option<LocalState>,
}

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
pub struct Way {
    pub id: OsmId,
    /// Ordered node references. May contain ids absent from the node map.
    pub nd: Vec<OsmId>,
    pub tags: Tags,
    pub local: Option<LocalState>,
}

/// Member type tag of a relation member. Anything the .osm file declares
/// outside the three feature types parses as `Other` and never contributes
/// a graph edge.
#[derive(
    rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum MemberKind {
    Node,
    Way,
    Relation,
    Other,
}

impl MemberKind {
    pub fn parse(raw: &[u8]) -> MemberKind {
        match raw {
            b"node" => MemberKind::Node,
            b"way" => MemberKind::Way,
            b"relation" => MemberKind::Relation,
            _ => MemberKind::Other,
        }
    }
}

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
pub struct Member {
    pub kind: MemberKind,
    pub ref_id: OsmId,
    pub role: Vec<u8>,
}

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: OsmId,
    /// Ordered member references. May contain dangling or `Other` members.
    pub members: Vec<Member>,
    pub tags: Tags,
    pub local: Option<LocalState>,
}
