//! Binary record of a finished game.
//!
//! The batch harness can write one file per game so runs can be replayed or
//! mined later. The format is little-endian throughout: a fixed header, the
//! bot description, the packed board states, the move bytes and a CRC32C
//! trailer over everything before it.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::engine::Move;

const MAGIC: &[u8; 4] = b"T3R1";
const VERSION: u8 = 1;
const ENDIAN_LE: u8 = 0;

// 4 magic + 1 version + 1 endian + 4 steps + 8 start + 4 elapsed
// + 8 score + 4 highest card + 2 bot_str length
const HEADER_LEN: usize = 4 + 1 + 1 + 4 + 8 + 4 + 8 + 4 + 2;

/// Per-run metadata stored in the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub steps: u32,
    pub start_unix_s: u64,
    pub elapsed_s: f32,
    pub final_score: u64,
    /// Face value of the highest card reached.
    pub highest_card: u32,
    pub bot_str: Option<String>,
}

/// A finished game: metadata, `steps + 1` packed boards and `steps` moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub meta: Meta,
    pub states: Vec<u64>,
    pub moves: Vec<u8>,
}

#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid magic or version")]
    MagicOrVersion,
    #[error("unsupported endianness")]
    Endianness,
    #[error("file too short or malformed")]
    Malformed,
    #[error("checksum mismatch")]
    Checksum,
}

impl Run {
    /// Bundle a finished game, checking the lengths agree.
    pub fn new(meta: Meta, states: Vec<u64>, moves: Vec<u8>) -> Result<Self, TraceError> {
        if states.len() != meta.steps as usize + 1 || moves.len() != meta.steps as usize {
            return Err(TraceError::Malformed);
        }
        Ok(Run {
            meta,
            states,
            moves,
        })
    }

    /// Serialize to the on-disk byte format.
    pub fn encode(&self) -> Vec<u8> {
        let bot_bytes = self
            .meta
            .bot_str
            .as_ref()
            .map(|s| s.as_bytes())
            .unwrap_or(&[]);
        let bot_len = u16::try_from(bot_bytes.len()).expect("bot description too long");

        let payload_len = bot_bytes.len() + self.states.len() * 8 + self.moves.len();
        let mut buf = Vec::with_capacity(HEADER_LEN + payload_len + 4);

        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.push(ENDIAN_LE);
        buf.extend_from_slice(&self.meta.steps.to_le_bytes());
        buf.extend_from_slice(&self.meta.start_unix_s.to_le_bytes());
        buf.extend_from_slice(&self.meta.elapsed_s.to_bits().to_le_bytes());
        buf.extend_from_slice(&self.meta.final_score.to_le_bytes());
        buf.extend_from_slice(&self.meta.highest_card.to_le_bytes());
        buf.extend_from_slice(&bot_len.to_le_bytes());
        buf.extend_from_slice(bot_bytes);
        for &state in &self.states {
            buf.extend_from_slice(&state.to_le_bytes());
        }
        buf.extend_from_slice(&self.moves);

        let checksum = crc32c::crc32c(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());
        buf
    }

    /// Parse the on-disk byte format, verifying the checksum first.
    pub fn decode(bytes: &[u8]) -> Result<Self, TraceError> {
        if bytes.len() < HEADER_LEN + 4 {
            return Err(TraceError::Malformed);
        }
        let (content, trailer) = bytes.split_at(bytes.len() - 4);
        let file_crc = u32::from_le_bytes(trailer.try_into().expect("four trailer bytes"));
        if file_crc != crc32c::crc32c(content) {
            return Err(TraceError::Checksum);
        }

        if &content[..4] != MAGIC || content[4] != VERSION {
            return Err(TraceError::MagicOrVersion);
        }
        if content[5] != ENDIAN_LE {
            return Err(TraceError::Endianness);
        }

        let mut reader = Reader {
            bytes: content,
            off: 6,
        };
        let steps = reader.u32()?;
        let start_unix_s = reader.u64()?;
        let elapsed_s = f32::from_bits(reader.u32()?);
        let final_score = reader.u64()?;
        let highest_card = reader.u32()?;
        let bot_len = reader.u16()? as usize;
        let bot_str = match reader.take(bot_len)? {
            [] => None,
            bytes => std::str::from_utf8(bytes).ok().map(str::to_string),
        };

        // Bound-check against the actual payload before trusting `steps`
        // with an allocation; the checksum does not make the field honest.
        let state_count = steps as usize + 1;
        let states_bytes_len = state_count.checked_mul(8).ok_or(TraceError::Malformed)?;
        let moves_len = steps as usize;
        if content.len() < reader.off + states_bytes_len + moves_len {
            return Err(TraceError::Malformed);
        }

        let mut states = Vec::with_capacity(state_count);
        for _ in 0..state_count {
            states.push(reader.u64()?);
        }
        let moves = reader.take(moves_len)?.to_vec();

        Ok(Run {
            meta: Meta {
                steps,
                start_unix_s,
                elapsed_s,
                final_score,
                highest_card,
                bot_str,
            },
            states,
            moves,
        })
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), TraceError> {
        let mut f = fs::File::create(path)?;
        f.write_all(&self.encode())?;
        Ok(())
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        Run::decode(&fs::read(path)?)
    }

    /// The recorded moves as `Move`s; `None` if any byte is out of range.
    pub fn decoded_moves(&self) -> Option<Vec<Move>> {
        self.moves.iter().map(|&m| Move::from_u8(m)).collect()
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    off: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], TraceError> {
        let end = self.off.checked_add(n).ok_or(TraceError::Malformed)?;
        if end > self.bytes.len() {
            return Err(TraceError::Malformed);
        }
        let out = &self.bytes[self.off..end];
        self.off = end;
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16, TraceError> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    fn u32(&mut self) -> Result<u32, TraceError> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64, TraceError> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }
}

pub fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_run() -> Run {
        let meta = Meta {
            steps: 2,
            start_unix_s: 1_750_000_000,
            elapsed_s: 4.5,
            final_score: 243,
            highest_card: 48,
            bot_str: Some("6 / 3 / OpennessMatthew".to_string()),
        };
        Run::new(
            meta,
            vec![0x0000_0000_0000_0321, 0x0000_0000_0000_3021, 0x0000_0000_0003_1021],
            vec![0, 2],
        )
        .unwrap()
    }

    #[test]
    fn round_trip_through_a_file() {
        let run = sample_run();
        let tmp = NamedTempFile::new().unwrap();
        run.write_to_path(tmp.path()).unwrap();
        let back = Run::read_from_path(tmp.path()).unwrap();
        assert_eq!(back, run);
        assert_eq!(
            back.decoded_moves().unwrap(),
            vec![Move::Left, Move::Up]
        );
    }

    #[test]
    fn corrupt_payload_fails_checksum() {
        let mut bytes = sample_run().encode();
        let idx = HEADER_LEN + 3;
        bytes[idx] ^= 0xff;
        assert!(matches!(Run::decode(&bytes), Err(TraceError::Checksum)));
    }

    #[test]
    fn truncated_file_is_malformed() {
        let mut bytes = sample_run().encode();
        bytes.truncate(bytes.len() - 5);
        // The CRC no longer matches once the trailer is gone.
        assert!(Run::decode(&bytes).is_err());
    }

    #[test]
    fn forged_step_count_is_malformed() {
        let mut bytes = sample_run().encode();
        // Rewrite the steps field to a huge value and re-sign the trailer:
        // decode must fail the length check instead of trusting the field
        // with a multi-gigabyte allocation.
        bytes[6..10].copy_from_slice(&u32::MAX.to_le_bytes());
        let content_len = bytes.len() - 4;
        let crc = crc32c::crc32c(&bytes[..content_len]);
        bytes[content_len..].copy_from_slice(&crc.to_le_bytes());
        assert!(matches!(Run::decode(&bytes), Err(TraceError::Malformed)));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let meta = Meta {
            steps: 3,
            start_unix_s: 0,
            elapsed_s: 0.0,
            final_score: 0,
            highest_card: 0,
            bot_str: None,
        };
        assert!(matches!(
            Run::new(meta, vec![0, 1], vec![0, 1, 2]),
            Err(TraceError::Malformed)
        ));
    }
}
