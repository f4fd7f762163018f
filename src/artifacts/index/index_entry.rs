use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepositoryError;
use byteorder::{ByteOrder, WriteBytesExt};
use derive_new::new;
use std::path::PathBuf;

/// One entry of a staging record
pub trait RecordEntry: Sized {
    fn write_to(&self, writer: &mut Checksum) -> anyhow::Result<()>;

    fn read_from(reader: &mut Checksum) -> anyhow::Result<Self>;
}

/// A path staged for addition together with its blob id
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagedFile {
    pub path: PathBuf,
    pub oid: ObjectId,
}

/// A path staged for removal
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RemovedPath {
    pub path: PathBuf,
}

impl RecordEntry for StagedFile {
    fn write_to(&self, writer: &mut Checksum) -> anyhow::Result<()> {
        let mut oid_bytes = Vec::with_capacity(OBJECT_ID_LENGTH / 2);
        self.oid.write_h40_to(&mut oid_bytes)?;
        writer.write(&oid_bytes)?;

        write_path(&self.path, writer)
    }

    fn read_from(reader: &mut Checksum) -> anyhow::Result<Self> {
        let oid_bytes = reader.read(OBJECT_ID_LENGTH / 2)?;
        let oid = ObjectId::from_digest(&oid_bytes);
        let path = read_path(reader)?;

        Ok(StagedFile::new(path, oid))
    }
}

impl RecordEntry for RemovedPath {
    fn write_to(&self, writer: &mut Checksum) -> anyhow::Result<()> {
        write_path(&self.path, writer)
    }

    fn read_from(reader: &mut Checksum) -> anyhow::Result<Self> {
        Ok(RemovedPath::new(read_path(reader)?))
    }
}

fn write_path(path: &std::path::Path, writer: &mut Checksum) -> anyhow::Result<()> {
    let name = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("path {} is not valid UTF-8", path.display()))?;
    let length = u16::try_from(name.len())
        .map_err(|_| anyhow::anyhow!("path {} is too long to stage", path.display()))?;

    let mut bytes = Vec::with_capacity(2 + name.len());
    bytes.write_u16::<byteorder::NetworkEndian>(length)?;
    bytes.extend_from_slice(name.as_bytes());

    writer.write(&bytes)
}

fn read_path(reader: &mut Checksum) -> anyhow::Result<PathBuf> {
    let length = byteorder::NetworkEndian::read_u16(&reader.read(2)?);
    let name = reader.read(length as usize)?;
    let name = String::from_utf8(name.to_vec())
        .map_err(|_| RepositoryError::corrupt("staged path is not valid UTF-8"))?;

    Ok(PathBuf::from(name))
}
