//! PNG chunk sequence codec.
//!
//! A PNG file is the 8-byte signature followed by chunks of
//! `length (u32 BE) | type (4 bytes) | data | crc (u32 BE)`, where the CRC-32
//! covers type and data.

use std::io::{Cursor, Read};

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use wa_texturizer_core::error::TexturizeError;
use wa_texturizer_core::metadata::{WalvRecord, WALV_CHUNK_TYPE};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Position the `waLV` chunk is inserted at: directly after `IHDR`.
pub const WALV_CHUNK_INDEX: usize = 1;

/// One chunk, without its length and CRC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub chunk_type: [u8; 4],
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(chunk_type: [u8; 4], data: impl Into<Vec<u8>>) -> Self {
        Self {
            chunk_type,
            data: data.into(),
        }
    }

    /// The chunk carrying `record`.
    pub fn walv(record: &WalvRecord) -> Self {
        Self::new(WALV_CHUNK_TYPE, record.to_bytes())
    }

    pub fn type_str(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }

    pub fn crc(&self) -> u32 {
        crc32(&self.chunk_type, &self.data)
    }
}

fn format_err(msg: impl Into<String>) -> TexturizeError {
    TexturizeError::Format(msg.into())
}

/// Splits a PNG file into its chunks.
///
/// Fails with `TexturizeError::Format` on a bad signature, a truncated
/// chunk, a CRC mismatch or a missing `IEND`. Bytes after `IEND` are ignored.
pub fn parse_chunks(bytes: &[u8]) -> Result<Vec<Chunk>, TexturizeError> {
    if bytes.len() < PNG_SIGNATURE.len() || bytes[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(format_err("missing PNG signature"));
    }
    let mut r = Cursor::new(&bytes[PNG_SIGNATURE.len()..]);
    let mut chunks = Vec::new();
    loop {
        let len = r
            .read_u32::<BE>()
            .map_err(|_| format_err(format!("truncated chunk header after {} chunks", chunks.len())))?
            as usize;
        let mut chunk_type = [0u8; 4];
        r.read_exact(&mut chunk_type)
            .map_err(|_| format_err("truncated chunk type"))?;
        let remaining = r.get_ref().len() - r.position() as usize;
        if len > remaining {
            return Err(format_err(format!(
                "chunk {} declares {len} bytes, only {remaining} left",
                String::from_utf8_lossy(&chunk_type)
            )));
        }
        let mut data = vec![0u8; len];
        r.read_exact(&mut data)
            .map_err(|_| format_err("truncated chunk data"))?;
        let stored = r
            .read_u32::<BE>()
            .map_err(|_| format_err("truncated chunk crc"))?;
        let chunk = Chunk { chunk_type, data };
        let computed = chunk.crc();
        if stored != computed {
            return Err(format_err(format!(
                "crc mismatch in {} chunk: stored {stored:08x}, computed {computed:08x}",
                chunk.type_str()
            )));
        }
        let is_end = &chunk.chunk_type == b"IEND";
        chunks.push(chunk);
        if is_end {
            break;
        }
    }
    if &chunks[0].chunk_type != b"IHDR" {
        return Err(format_err("first chunk is not IHDR"));
    }
    Ok(chunks)
}

/// Serializes chunks behind the PNG signature, recomputing every CRC.
pub fn write_chunks(chunks: &[Chunk]) -> Vec<u8> {
    let size: usize = chunks.iter().map(|c| c.data.len() + 12).sum();
    let mut out = Vec::with_capacity(PNG_SIGNATURE.len() + size);
    out.extend_from_slice(&PNG_SIGNATURE);
    for chunk in chunks {
        // writes into a Vec cannot fail
        let _ = write_chunk(&mut out, chunk);
    }
    out
}

fn write_chunk(out: &mut Vec<u8>, chunk: &Chunk) -> std::io::Result<()> {
    out.write_u32::<BE>(chunk.data.len() as u32)?;
    out.extend_from_slice(&chunk.chunk_type);
    out.extend_from_slice(&chunk.data);
    out.write_u32::<BE>(chunk.crc())
}

/// Inserts the `waLV` chunk for `record` into a PNG file.
///
/// An existing `waLV` chunk is replaced, so splicing twice is harmless.
pub fn splice_walv(png: &[u8], record: &WalvRecord) -> Result<Vec<u8>, TexturizeError> {
    let mut chunks = parse_chunks(png)?;
    chunks.retain(|c| c.chunk_type != WALV_CHUNK_TYPE);
    chunks.insert(WALV_CHUNK_INDEX, Chunk::walv(record));
    Ok(write_chunks(&chunks))
}

/// The `waLV` record of a PNG file, if it carries one.
pub fn read_walv(png: &[u8]) -> Result<Option<WalvRecord>, TexturizeError> {
    parse_chunks(png)?
        .iter()
        .find(|c| c.chunk_type == WALV_CHUNK_TYPE)
        .map(|c| WalvRecord::from_bytes(&c.data))
        .transpose()
}

const CRC_TABLE: [u32; 256] = crc_table();

const fn crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { 0xedb8_8320 ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// CRC-32 (ISO 3309) over `chunk_type` followed by `data`.
pub fn crc32(chunk_type: &[u8], data: &[u8]) -> u32 {
    let mut crc = 0xffff_ffffu32;
    for &b in chunk_type.iter().chain(data) {
        crc = CRC_TABLE[((crc ^ b as u32) & 0xff) as usize] ^ (crc >> 8);
    }
    crc ^ 0xffff_ffff
}
