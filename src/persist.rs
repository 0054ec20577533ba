use crate::errors::Result;
use crate::store::OsmMetaState;

/// Encodes the persisted slice. Derived data (graph, collections) is not
/// encodable at all; it is rebuilt from this slice after every load.
pub fn save_state(state: &OsmMetaState) -> Result<Vec<u8>> {
    let bytes = rkyv::to_bytes::<_, 256>(state).map_err(|err| err.to_string())?;
    Ok(bytes.to_vec())
}

pub fn load_state(bytes: &[u8]) -> Result<OsmMetaState> {
    let state = unsafe { rkyv::from_bytes_unchecked(bytes) }.map_err(|err| err.to_string())?;
    Ok(state)
}
