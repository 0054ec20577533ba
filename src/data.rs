use std::collections::HashMap;

use self::osm::{FeatureRef, FeatureType, LocalState, Node, OsmId, Relation, Way};

pub mod osm;

/// Map data as defined in the .osm file. Some elements are discarded but most are
/// kept without any processing. This is the raw slice everything else is
/// derived from.

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Default, Clone, PartialEq)]
pub struct OsmMapData {
    pub nodes: HashMap<OsmId, Node>,
    pub ways: HashMap<OsmId, Way>,
    pub relations: HashMap<OsmId, Relation>,
}

impl OsmMapData {
    pub fn contains(&self, feature: FeatureRef) -> bool {
        match feature.feature_type {
            FeatureType::Node => self.nodes.contains_key(&feature.id),
            FeatureType::Way => self.ways.contains_key(&feature.id),
            FeatureType::Relation => self.relations.contains_key(&feature.id),
        }
    }

    pub fn local_state(&self, feature: FeatureRef) -> Option<&LocalState> {
        match feature.feature_type {
            FeatureType::Node => self.nodes.get(&feature.id)?.local.as_ref(),
            FeatureType::Way => self.ways.get(&feature.id)?.local.as_ref(),
            FeatureType::Relation => self.relations.get(&feature.id)?.local.as_ref(),
        }
    }

    /// Mutable access to the local state slot of an existing feature.
    /// `None` means the feature itself is absent from the maps.
    pub(crate) fn local_slot_mut(
        &mut self,
        feature: FeatureRef,
    ) -> Option<&mut Option<LocalState>> {
        match feature.feature_type {
            FeatureType::Node => self.nodes.get_mut(&feature.id).map(|n| &mut n.local),
            FeatureType::Way => self.ways.get_mut(&feature.id).map(|w| &mut w.local),
            FeatureType::Relation => self.relations.get_mut(&feature.id).map(|r| &mut r.local),
        }
    }
}
