use std::env;
use std::fs::{self, create_dir_all, File};
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use osmmeta::data::osm::FeatureType;
use osmmeta::errors::Result;
use osmmeta::etl::parse_osm::{ParseOsmEtl, OUTPUT_FILE_NAME};
use osmmeta::etl::Etl;
use osmmeta::persist::load_state;
use osmmeta::store::OsmMetaStore;

#[derive(Deserialize)]
pub struct UserConfig {
    pub data_path: String,
    pub dest_path: String,
}

fn load_user_config(path: &str) -> Result<UserConfig> {
    let file = File::open(path)?;
    serde_json::from_reader(file).map_err(|err| err.to_string().into())
}

fn create_output_dir(config: &UserConfig) -> Result<PathBuf> {
    let input_fname = Path::new(&config.data_path)
        .file_name()
        .ok_or("Could not get input file name")?;
    let output_dir = Path::new(&config.dest_path).join(input_fname);
    create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn setup_logging() {
    Builder::with_level("info")
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    setup_logging();

    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "config/osmmeta.json".to_string());
    let config = load_user_config(&config_path)?;

    let mut etl = ParseOsmEtl::new(Path::new(&config.data_path));
    let output_dir = create_output_dir(&config)?;
    etl.process(&output_dir)?;

    let bytes = fs::read(output_dir.join(OUTPUT_FILE_NAME))?;
    let state = load_state(&bytes)?;
    let mut store = OsmMetaStore::from_state(state);

    let computed = store.computed()?;
    for feature_type in FeatureType::ALL {
        info!(
            feature_type = feature_type.name(),
            elems = computed.tree.elems.get(feature_type).len(),
            roots = computed.tree.roots.get(feature_type).len();
            "Derived feature graph"
        );
    }
    info!(
        ptv2 = computed.collections.ptv2.len(),
        highway = computed.collections.highway.len(),
        created = computed.collections.created.len(),
        global = computed.collections.global.len();
        "Derived collections"
    );

    Ok(())
}
