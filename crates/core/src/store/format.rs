use crate::errors::CoreError;

/// Magic bytes identifying a CTRK (Coin Tracker) snapshot file.
pub const MAGIC: &[u8; 4] = b"CTRK";

/// Current snapshot format version.
pub const CURRENT_VERSION: u16 = 1;

/// Header size in bytes: magic(4) + version(2) + payload_len(8) = 14
pub const HEADER_SIZE: usize = 14;

/// File header read from a snapshot file.
#[derive(Debug)]
pub struct FileHeader {
    pub version: u16,
    pub payload_len: u64,
}

/// Write a complete snapshot file to bytes.
///
/// Layout:
/// ```text
/// [CTRK: 4B] [version: 2B LE] [payload_len: 8B LE] [payload: variable]
/// ```
pub fn write_file(version: u16, payload: &[u8]) -> Vec<u8> {
    let payload_len = payload.len() as u64;
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());

    // Magic
    buf.extend_from_slice(MAGIC);
    // Version
    buf.extend_from_slice(&version.to_le_bytes());
    // Payload length
    buf.extend_from_slice(&payload_len.to_le_bytes());
    // Payload (bincode-encoded store state)
    buf.extend_from_slice(payload);

    buf
}

/// Parse the header from raw file bytes.
/// Returns the header and the payload slice.
pub fn read_file(data: &[u8]) -> Result<(FileHeader, &[u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::StorageCorrupt(
            "File too small to be a valid CTRK snapshot".into(),
        ));
    }

    // Validate magic bytes
    if &data[0..4] != MAGIC {
        return Err(CoreError::StorageCorrupt(
            "Invalid magic bytes: not a CTRK snapshot".into(),
        ));
    }

    let mut offset = 4;

    // Version
    let version = u16::from_le_bytes([data[offset], data[offset + 1]]);
    offset += 2;

    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::StorageCorrupt(format!(
            "Unsupported snapshot version: {version}"
        )));
    }

    // Payload length
    let payload_len = u64::from_le_bytes(
        data[offset..offset + 8]
            .try_into()
            .map_err(|_| CoreError::StorageCorrupt("Failed to read payload length".into()))?,
    );
    offset += 8;

    // Compare in u64: a corrupt length field can exceed both the file
    // and usize, and must never reach the slice arithmetic.
    let available = (data.len() - offset) as u64;
    if available < payload_len {
        return Err(CoreError::StorageCorrupt(format!(
            "File truncated: expected {payload_len} bytes of payload, got {available}"
        )));
    }

    let payload = &data[offset..offset + payload_len as usize];

    let header = FileHeader {
        version,
        payload_len,
    };

    Ok((header, payload))
}
