use crate::data::osm::FeatureType;
use crate::data::OsmMapData;
use crate::errors::Result;

use self::collection::{gen_collection, Collection};
use self::graph::{build_feature_graph, FeatureGraph};

pub mod collection;
pub mod filters;
pub mod graph;

/// Per-type record. The graph and the collections both keep one slot per
/// feature type, mirroring the three raw maps.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ByType<T> {
    pub node: T,
    pub way: T,
    pub relation: T,
}

impl<T> ByType<T> {
    pub fn get(&self, feature_type: FeatureType) -> &T {
        match feature_type {
            FeatureType::Node => &self.node,
            FeatureType::Way => &self.way,
            FeatureType::Relation => &self.relation,
        }
    }

    pub fn get_mut(&mut self, feature_type: FeatureType) -> &mut T {
        match feature_type {
            FeatureType::Node => &mut self.node,
            FeatureType::Way => &mut self.way,
            FeatureType::Relation => &mut self.relation,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureType, &T)> {
        FeatureType::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}

/// Everything derived from the raw maps. None of this is persisted or kept
/// in history snapshots; it is rebuilt whenever the raw maps change.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedFeatures {
    pub tree: FeatureGraph,
    pub collections: Collection,
}

pub fn compute_features(data: &OsmMapData) -> Result<ComputedFeatures> {
    Ok(ComputedFeatures {
        tree: build_feature_graph(data)?,
        collections: gen_collection(
            data,
            filters::filter_bus_ptv2,
            filters::filter_highway,
            filters::filter_created,
        ),
    })
}
