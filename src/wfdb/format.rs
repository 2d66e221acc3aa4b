/// On-disk sample encodings understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    /// 8-bit offset binary.
    F80,
    /// 12-bit two's complement, two samples packed into three bytes.
    F212,
    /// 16-bit two's complement, little-endian.
    F16,
    /// 16-bit two's complement, big-endian.
    F61,
    /// 16-bit offset binary, little-endian.
    F160,
    /// 24-bit two's complement, little-endian.
    F24,
    /// 32-bit two's complement, little-endian.
    F32,
}

impl StorageFormat {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            80 => Some(Self::F80),
            212 => Some(Self::F212),
            16 => Some(Self::F16),
            61 => Some(Self::F61),
            160 => Some(Self::F160),
            24 => Some(Self::F24),
            32 => Some(Self::F32),
            _ => None,
        }
    }

    /// Digital value written in place of a missing sample.
    pub fn invalid_sample(self) -> i32 {
        match self {
            Self::F80 => -128,
            Self::F212 => -2048,
            Self::F16 | Self::F61 | Self::F160 => -32768,
            Self::F24 => -(1 << 23),
            Self::F32 => i32::MIN,
        }
    }

    /// Number of whole samples held in `len` bytes.
    pub fn samples_in(self, len: usize) -> usize {
        match self {
            Self::F80 => len,
            Self::F212 => len * 2 / 3,
            Self::F16 | Self::F61 | Self::F160 => len / 2,
            Self::F24 => len / 3,
            Self::F32 => len / 4,
        }
    }

    /// Decode the first `count` samples of an interleaved byte stream.
    /// `count` must not exceed [`samples_in`](Self::samples_in) of the buffer.
    pub fn decode(self, bytes: &[u8], count: usize) -> Vec<i32> {
        let mut out = Vec::with_capacity(count);
        match self {
            Self::F80 => out.extend(bytes[..count].iter().map(|&b| b as i32 - 128)),
            Self::F16 => out.extend(
                bytes
                    .chunks_exact(2)
                    .take(count)
                    .map(|c| i16::from_le_bytes([c[0], c[1]]) as i32),
            ),
            Self::F61 => out.extend(
                bytes
                    .chunks_exact(2)
                    .take(count)
                    .map(|c| i16::from_be_bytes([c[0], c[1]]) as i32),
            ),
            Self::F160 => out.extend(
                bytes
                    .chunks_exact(2)
                    .take(count)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]) as i32 - 32768),
            ),
            Self::F24 => out.extend(bytes.chunks_exact(3).take(count).map(|c| {
                let raw = i32::from_le_bytes([c[0], c[1], c[2], 0]);
                (raw << 8) >> 8
            })),
            Self::F32 => out.extend(
                bytes
                    .chunks_exact(4)
                    .take(count)
                    .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]])),
            ),
            Self::F212 => {
                for i in 0..count {
                    let base = (i / 2) * 3;
                    let raw = if i % 2 == 0 {
                        bytes[base] as i32 | ((bytes[base + 1] as i32 & 0x0F) << 8)
                    } else {
                        bytes[base + 2] as i32 | ((bytes[base + 1] as i32 & 0xF0) << 4)
                    };
                    out.push(if raw >= 2048 { raw - 4096 } else { raw });
                }
            }
        }
        out
    }
}
