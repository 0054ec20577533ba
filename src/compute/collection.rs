use std::collections::HashSet;

use crate::data::osm::{FeatureRef, FeatureType, OsmId};
use crate::data::OsmMapData;

use super::ByType;

/// A named subset of feature ids, per type. Membership only, no payload.
pub type CollectionItem = ByType<HashSet<OsmId>>;

impl CollectionItem {
    pub fn insert(&mut self, feature: FeatureRef) {
        self.get_mut(feature.feature_type).insert(feature.id);
    }

    pub fn contains(&self, feature: FeatureRef) -> bool {
        self.get(feature.feature_type).contains(&feature.id)
    }

    pub fn len(&self) -> usize {
        FeatureType::ALL.into_iter().map(|t| self.get(t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn union(a: &CollectionItem, b: &CollectionItem) -> CollectionItem {
    let mut result = CollectionItem::default();
    for feature_type in FeatureType::ALL {
        let merged = result.get_mut(feature_type);
        merged.extend(a.get(feature_type).iter().copied());
        merged.extend(b.get(feature_type).iter().copied());
    }
    result
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Collection {
    pub ptv2: CollectionItem,
    pub highway: CollectionItem,
    pub created: CollectionItem,
    /// Union of `ptv2` and `highway`. `created` is left out on purpose.
    pub global: CollectionItem,
}

/// Runs the three domain filters over the raw maps. The filters are
/// independent of each other and free of side effects, so callers may cache
/// the result as long as the maps are unchanged.
pub fn gen_collection<P, H, C>(
    data: &OsmMapData,
    filter_bus_ptv2: P,
    filter_highway: H,
    filter_created: C,
) -> Collection
where
    P: Fn(&OsmMapData) -> CollectionItem,
    H: Fn(&OsmMapData) -> CollectionItem,
    C: Fn(&OsmMapData) -> CollectionItem,
{
    let ptv2 = filter_bus_ptv2(data);
    let highway = filter_highway(data);
    let created = filter_created(data);
    let global = union(&ptv2, &highway);

    Collection {
        ptv2,
        highway,
        created,
        global,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(features: &[FeatureRef]) -> CollectionItem {
        let mut item = CollectionItem::default();
        for &feature in features {
            item.insert(feature);
        }
        item
    }

    #[test]
    fn global_is_the_union_of_ptv2_and_highway() {
        let data = OsmMapData::default();
        let collection = gen_collection(
            &data,
            |_| item(&[FeatureRef::relation(1), FeatureRef::way(10)]),
            |_| item(&[FeatureRef::way(10), FeatureRef::way(11), FeatureRef::node(5)]),
            |_| item(&[FeatureRef::node(-3)]),
        );

        let expected = item(&[
            FeatureRef::relation(1),
            FeatureRef::way(10),
            FeatureRef::way(11),
            FeatureRef::node(5),
        ]);
        assert_eq!(collection.global, expected);
    }

    #[test]
    fn created_stays_out_of_global() {
        let data = OsmMapData::default();
        let collection = gen_collection(
            &data,
            |_| CollectionItem::default(),
            |_| CollectionItem::default(),
            |_| item(&[FeatureRef::node(-1), FeatureRef::way(-2)]),
        );

        assert_eq!(collection.created.len(), 2);
        assert!(collection.global.is_empty());
    }

    #[test]
    fn duplicate_ids_collapse_in_the_union() {
        let data = OsmMapData::default();
        let collection = gen_collection(
            &data,
            |_| item(&[FeatureRef::way(10)]),
            |_| item(&[FeatureRef::way(10)]),
            |_| CollectionItem::default(),
        );

        assert_eq!(collection.global.len(), 1);
        assert!(collection.global.contains(FeatureRef::way(10)));
    }
}
