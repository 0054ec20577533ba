use log::info;

use crate::compute::{compute_features, ComputedFeatures};
use crate::data::osm::{FeatureRef, FeatureType, LocalState, Node, Relation, Way};
use crate::data::OsmMapData;
use crate::errors::{Error, Result};

pub mod history;

/// The persisted, undoable slice: raw maps plus session selection state.
/// Everything derived (graph, collections) lives outside of this struct and
/// is rebuilt from it, never stored.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Default, Clone, PartialEq)]
pub struct OsmMetaState {
    pub data: OsmMapData,
    /// Selection in insertion order. A feature appears at most once.
    pub selected: Vec<FeatureRef>,
    pub active: Option<FeatureRef>,
    /// Bumped on commit; gates history snapshots.
    pub commit_counter: u64,
}

struct CachedFeatures {
    revision: u64,
    features: ComputedFeatures,
}

/// Single-writer store over the raw maps and the selection state. Mutations
/// run to completion synchronously; the derived snapshot is recomputed
/// lazily whenever the revision it was built from is stale.
pub struct OsmMetaStore {
    state: OsmMetaState,
    revision: u64,
    computed: Option<CachedFeatures>,
}

impl Default for OsmMetaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OsmMetaStore {
    pub fn new() -> OsmMetaStore {
        OsmMetaStore {
            state: OsmMetaState::default(),
            revision: 0,
            computed: None,
        }
    }

    pub fn from_state(state: OsmMetaState) -> OsmMetaStore {
        OsmMetaStore {
            state,
            revision: 0,
            computed: None,
        }
    }

    pub fn with_data(data: OsmMapData) -> OsmMetaStore {
        Self::from_state(OsmMetaState {
            data,
            ..OsmMetaState::default()
        })
    }

    pub fn state(&self) -> &OsmMetaState {
        &self.state
    }

    pub fn data(&self) -> &OsmMapData {
        &self.state.data
    }

    pub fn selected(&self) -> &[FeatureRef] {
        &self.state.selected
    }

    pub fn active(&self) -> Option<FeatureRef> {
        self.state.active
    }

    pub fn local_state(&self, feature: FeatureRef) -> Option<&LocalState> {
        self.state.data.local_state(feature)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Lazily creates the feature's local state with defaults. Fails if the
    /// feature itself is absent from the raw maps, so state can never be
    /// attached to an id that does not exist.
    pub fn ensure_local_state(&mut self, feature: FeatureRef) -> Result<()> {
        let slot = self
            .state
            .data
            .local_slot_mut(feature)
            .ok_or(Error::NotFound {
                feature_type: feature.feature_type,
                id: feature.id,
            })?;
        if slot.is_none() {
            *slot = Some(LocalState::default());
        }
        self.touch();
        Ok(())
    }

    /// Makes `feature` the single active feature, clearing the flag on the
    /// previously active one if it still has local state.
    pub fn activate(&mut self, feature: FeatureRef) -> Result<()> {
        self.ensure_local_state(feature)?;
        if let Some(previous) = self.state.active {
            if let Some(Some(local)) = self.state.data.local_slot_mut(previous) {
                local.active = false;
            }
        }
        self.state.active = Some(feature);
        if let Some(Some(local)) = self.state.data.local_slot_mut(feature) {
            local.active = true;
        }
        self.touch();
        Ok(())
    }

    /// Adds `feature` to the selection and activates it. Selecting an
    /// already selected feature still moves the active marker to it.
    pub fn select(&mut self, feature: FeatureRef) -> Result<()> {
        self.ensure_local_state(feature)?;
        if !self.state.selected.contains(&feature) {
            self.state.selected.push(feature);
        }
        if let Some(Some(local)) = self.state.data.local_slot_mut(feature) {
            local.selected = true;
        }
        self.activate(feature)
    }

    /// Drops the whole selection and the active marker. Features whose local
    /// state is already gone are skipped silently.
    pub fn clear_selection(&mut self) {
        let selected = std::mem::take(&mut self.state.selected);
        for feature in selected {
            if let Some(Some(local)) = self.state.data.local_slot_mut(feature) {
                local.selected = false;
            }
        }
        if let Some(active) = self.state.active.take() {
            if let Some(Some(local)) = self.state.data.local_slot_mut(active) {
                local.active = false;
            }
        }
        self.touch();
    }

    /// Removes every trace of `feature` from the session state and drops its
    /// local state. No-op if the feature itself no longer exists.
    pub fn delete_feature_state(&mut self, feature: FeatureRef) {
        if !self.state.data.contains(feature) {
            return;
        }
        self.state.selected.retain(|selected| *selected != feature);
        if self.state.active == Some(feature) {
            self.state.active = None;
        }
        if let Some(slot) = self.state.data.local_slot_mut(feature) {
            *slot = None;
        }
        self.touch();
    }

    pub fn replace_data(&mut self, data: OsmMapData) {
        self.state.data = data;
        self.touch();
    }

    pub fn insert_node(&mut self, node: Node) {
        self.state.data.nodes.insert(node.id, node);
        self.touch();
    }

    pub fn insert_way(&mut self, way: Way) {
        self.state.data.ways.insert(way.id, way);
        self.touch();
    }

    pub fn insert_relation(&mut self, relation: Relation) {
        self.state.data.relations.insert(relation.id, relation);
        self.touch();
    }

    /// Removes a feature from the raw maps, detaching its session state
    /// first so no dangling selection survives.
    pub fn remove_feature(&mut self, feature: FeatureRef) {
        self.delete_feature_state(feature);
        match feature.feature_type {
            FeatureType::Node => {
                self.state.data.nodes.remove(&feature.id);
            }
            FeatureType::Way => {
                self.state.data.ways.remove(&feature.id);
            }
            FeatureType::Relation => {
                self.state.data.relations.remove(&feature.id);
            }
        }
        self.touch();
    }

    /// Marks the current state as committed. History snapshots are gated on
    /// this counter, not on every intermediate edit.
    pub fn commit(&mut self) {
        self.state.commit_counter += 1;
    }

    /// Replaces the whole persisted slice, e.g. on load or history travel.
    /// The derived snapshot is invalidated and rebuilt from the new raw
    /// maps on next access instead of being replayed from anywhere.
    pub fn restore(&mut self, state: OsmMetaState) {
        self.state = state;
        self.touch();
    }

    /// The derived snapshot for the current raw maps. Rebuilt only when a
    /// mutation happened since it was last computed.
    pub fn computed(&mut self) -> Result<&ComputedFeatures> {
        let stale = self
            .computed
            .as_ref()
            .map_or(true, |cached| cached.revision != self.revision);
        if stale {
            let features = compute_features(&self.state.data)?;
            info!(revision = self.revision; "Recomputed derived features");
            self.computed = Some(CachedFeatures {
                revision: self.revision,
                features,
            });
        }
        match &self.computed {
            Some(cached) => Ok(&cached.features),
            None => Err(Error::Integrity(
                "computed cache empty after rebuild".to_string(),
            )),
        }
    }
}
