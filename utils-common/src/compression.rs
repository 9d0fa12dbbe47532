use std::io::Read;
use flate2::{Compression, write::GzEncoder, read::GzDecoder};

use crate::error::IndexError;

/// 魔数常量 - 用于标识文件格式
pub const MAGIC_BYTES: &[u8] = b"BLGIX";

/// 头部长度：魔数 + 2 字节版本号 + 4 字节原始大小
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, IndexError> {
    Ok(bincode::serde::encode_to_vec(obj, bincode::config::standard())?)
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T, IndexError> {
    let (value, _) = bincode::serde::decode_from_slice(data, bincode::config::standard())?;
    Ok(value)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, IndexError> {
    let binary = to_binary(obj)?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&(binary.len() as u32).to_le_bytes());

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    std::io::Write::write_all(&mut encoder, &binary)?;
    output.extend_from_slice(&encoder.finish()?);

    Ok(output)
}

/// 从压缩的二进制格式反序列化对象，使用默认最大版本1
pub fn from_compressed<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T, IndexError> {
    from_compressed_with_max_version(data, 1)
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: serde::de::DeserializeOwned>(
    data: &[u8],
    max_version: u8,
) -> Result<T, IndexError> {
    validate_compressed_data_with_max_version(data, max_version)?;

    let size_offset = MAGIC_BYTES.len() + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..HEADER_LEN]);
    let original_size = u32::from_le_bytes(size_bytes) as usize;

    let mut decoder = GzDecoder::new(&data[HEADER_LEN..]);
    let mut decompressed = Vec::with_capacity(original_size);
    decoder.read_to_end(&mut decompressed)?;

    if decompressed.len() != original_size {
        return Err(IndexError::SizeMismatch {
            expected: original_size,
            actual: decompressed.len(),
        });
    }

    from_binary(&decompressed)
}

/// 验证压缩数据是否有效
pub fn validate_compressed_data(data: &[u8]) -> Result<[u8; 2], IndexError> {
    validate_compressed_data_with_max_version(data, 1)
}

/// 验证压缩数据头部，返回版本号
pub fn validate_compressed_data_with_max_version(data: &[u8], max_version: u8) -> Result<[u8; 2], IndexError> {
    if data.len() < HEADER_LEN {
        return Err(IndexError::TooShort(data.len()));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(IndexError::BadMagic);
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];

    if version[0] > max_version {
        return Err(IndexError::UnsupportedVersion {
            major: version[0],
            minor: version[1],
        });
    }

    Ok(version)
}
