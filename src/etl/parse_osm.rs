use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str;

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use xz::bufread::XzDecoder;

use crate::data::osm::{Member, MemberKind, Node, OsmId, Relation, Tags, Way};
use crate::data::OsmMapData;
use crate::errors::Result;
use crate::etl::Etl;
use crate::persist::save_state;
use crate::store::OsmMetaState;

pub const ETL_NAME: &str = "parse_osm";
pub const OUTPUT_FILE_NAME: &str = "osm_meta_state.rkyv";

/// Parses an xz-compressed .osm file into the raw feature maps and caches
/// the resulting store state as rkyv.
pub struct ParseOsmEtl {
    data_path: PathBuf,
}

/// Container element currently being read. `nd`, `member` and `tag`
/// children attach to it.
enum Pending {
    None,
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl ParseOsmEtl {
    pub fn new(data_path: &Path) -> ParseOsmEtl {
        ParseOsmEtl {
            data_path: data_path.to_path_buf(),
        }
    }

    fn output_path(dir: &Path) -> PathBuf {
        dir.join(OUTPUT_FILE_NAME)
    }

    fn create_osm_reader(&self) -> Result<Reader<impl BufRead>> {
        let file = fs::File::open(&self.data_path)?;
        let file_reader = BufReader::new(file);
        let xz_reader = XzDecoder::new(file_reader);
        Ok(Reader::from_reader(BufReader::new(xz_reader)))
    }

    fn attr(el: &BytesStart, name: &[u8]) -> Result<Option<Vec<u8>>> {
        for attribute in el.attributes() {
            let attribute = attribute?;
            if attribute.key.as_ref() == name {
                return Ok(Some(attribute.value.into_owned()));
            }
        }
        Ok(None)
    }

    fn parse_id(el: &BytesStart) -> Result<OsmId> {
        let raw = Self::attr(el, b"id")?.ok_or("Element is missing an id attribute")?;
        Ok(str::from_utf8(&raw)?.parse()?)
    }

    fn parse_node(el: &BytesStart) -> Result<Node> {
        let mut id: Option<OsmId> = None;
        let mut lat: Option<f64> = None;
        let mut lon: Option<f64> = None;

        for attribute in el.attributes() {
            let attribute = attribute?;
            let value = str::from_utf8(&attribute.value)?;
            match attribute.key.as_ref() {
                b"id" => id = Some(value.parse()?),
                b"lat" => lat = Some(value.parse()?),
                b"lon" => lon = Some(value.parse()?),
                _ => (),
            }
        }

        Ok(Node {
            id: id.ok_or("Node is missing an id attribute")?,
            lat: lat.ok_or("Node is missing a lat attribute")?,
            lon: lon.ok_or("Node is missing a lon attribute")?,
            tags: Tags::new(),
            local: None,
        })
    }

    fn parse_nd(el: &BytesStart) -> Result<OsmId> {
        let raw = Self::attr(el, b"ref")?.ok_or("nd is missing a ref attribute")?;
        Ok(str::from_utf8(&raw)?.parse()?)
    }

    fn parse_member(el: &BytesStart) -> Result<Member> {
        let kind = match Self::attr(el, b"type")? {
            Some(raw) => MemberKind::parse(&raw),
            None => MemberKind::Other,
        };
        let raw_ref = Self::attr(el, b"ref")?.ok_or("member is missing a ref attribute")?;
        let ref_id = str::from_utf8(&raw_ref)?.parse()?;
        let role = Self::attr(el, b"role")?.unwrap_or_default();

        Ok(Member { kind, ref_id, role })
    }

    fn parse_tag(el: &BytesStart, pending: &mut Pending) -> Result<()> {
        let tags = match pending {
            Pending::None => return Ok(()),
            Pending::Node(node) => &mut node.tags,
            Pending::Way(way) => &mut way.tags,
            Pending::Relation(relation) => &mut relation.tags,
        };
        let key = Self::attr(el, b"k")?.ok_or("tag is missing a k attribute")?;
        let value = Self::attr(el, b"v")?.ok_or("tag is missing a v attribute")?;
        tags.insert(key, value);
        Ok(())
    }

    fn finish(pending: &mut Pending, data: &mut OsmMapData) {
        match std::mem::replace(pending, Pending::None) {
            Pending::None => (),
            Pending::Node(node) => {
                data.nodes.insert(node.id, node);
            }
            Pending::Way(way) => {
                data.ways.insert(way.id, way);
            }
            Pending::Relation(relation) => {
                data.relations.insert(relation.id, relation);
            }
        }
    }

    /// Event loop over the .osm document. Elements with unknown names and
    /// text content are skipped.
    pub fn parse_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<OsmMapData> {
        let mut buf = Vec::new();
        let mut data = OsmMapData::default();
        let mut pending = Pending::None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Eof => break,
                Event::Start(e) => match e.name().as_ref() {
                    b"node" => pending = Pending::Node(Self::parse_node(&e)?),
                    b"way" => {
                        pending = Pending::Way(Way {
                            id: Self::parse_id(&e)?,
                            nd: Vec::new(),
                            tags: Tags::new(),
                            local: None,
                        })
                    }
                    b"relation" => {
                        pending = Pending::Relation(Relation {
                            id: Self::parse_id(&e)?,
                            members: Vec::new(),
                            tags: Tags::new(),
                            local: None,
                        })
                    }
                    _ => (),
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"node" => {
                        let node = Self::parse_node(&e)?;
                        data.nodes.insert(node.id, node);
                    }
                    b"nd" => {
                        if let Pending::Way(way) = &mut pending {
                            way.nd.push(Self::parse_nd(&e)?);
                        }
                    }
                    b"member" => {
                        if let Pending::Relation(relation) = &mut pending {
                            relation.members.push(Self::parse_member(&e)?);
                        }
                    }
                    b"tag" => Self::parse_tag(&e, &mut pending)?,
                    _ => (),
                },
                Event::End(e) => match e.name().as_ref() {
                    b"node" | b"way" | b"relation" => Self::finish(&mut pending, &mut data),
                    _ => (),
                },
                _ => (),
            }
            buf.clear();
        }

        Ok(data)
    }
}

impl Etl for ParseOsmEtl {
    type Input = OsmMapData;
    type Output = OsmMetaState;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(Self::output_path(dir).try_exists()?)
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        if self.is_cached(dir)? {
            fs::remove_file(Self::output_path(dir))?;
        }
        Ok(())
    }

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        let mut reader = self.create_osm_reader()?;
        Self::parse_reader(&mut reader)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        Ok(OsmMetaState {
            data: input,
            ..OsmMetaState::default()
        })
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let mut output_file = File::create(Self::output_path(dir))?;
        let bytes = save_state(&output)?;
        output_file.write_all(&bytes)?;
        Ok(())
    }
}
