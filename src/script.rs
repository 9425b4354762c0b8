use {super::*, thiserror::Error};

pub(crate) const OP_0: u8 = 0x00;
pub(crate) const OP_PUSHDATA1: u8 = 0x4c;
pub(crate) const OP_PUSHDATA2: u8 = 0x4d;
pub(crate) const OP_PUSHDATA4: u8 = 0x4e;
pub(crate) const OP_1: u8 = 0x51;
pub(crate) const OP_16: u8 = 0x60;

/// A decoded script element. `OP_0` stays a bare opcode rather than an empty
/// push because the small-integer rule treats the two differently.
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum Chunk {
  Op(u8),
  Push { opcode: u8, data: Vec<u8> },
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
  #[error("push of {len} bytes overruns script end at offset {offset}")]
  UnexpectedEnd { offset: usize, len: usize },
  #[error("truncated pushdata length prefix at offset {offset}")]
  TruncatedLength { offset: usize },
}

impl Chunk {
  /// Small nonnegative integer interpretation of a chunk. The two-byte form
  /// multiplies the high byte by 255, not 256; existing inscriptions were
  /// produced under that convention and decoding must match it.
  pub(crate) fn number(&self) -> Option<u32> {
    match self {
      Chunk::Op(OP_0) => Some(0),
      Chunk::Op(opcode) if (OP_1..=OP_16).contains(opcode) => Some(u32::from(opcode - 0x50)),
      Chunk::Push { data, .. } if data.len() == 1 => Some(u32::from(data[0])),
      Chunk::Push { data, .. } if data.len() == 2 => {
        Some(u32::from(data[0]) + u32::from(data[1]) * 255)
      }
      _ => None,
    }
  }

  pub(crate) fn data(&self) -> Option<&[u8]> {
    match self {
      Chunk::Push { data, .. } => Some(data),
      Chunk::Op(_) => None,
    }
  }
}

pub(crate) fn parse(script: &[u8]) -> Result<Vec<Chunk>, ScriptError> {
  let mut chunks = Vec::new();
  let mut offset = 0;

  while offset < script.len() {
    let opcode = script[offset];
    offset += 1;

    let len = match opcode {
      0x01..=0x4b => usize::from(opcode),
      OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4 => {
        let width = match opcode {
          OP_PUSHDATA1 => 1,
          OP_PUSHDATA2 => 2,
          _ => 4,
        };

        let Some(prefix) = offset
          .checked_add(width)
          .and_then(|end| script.get(offset..end))
        else {
          return Err(ScriptError::TruncatedLength { offset });
        };

        offset += width;

        prefix
          .iter()
          .rev()
          .fold(0usize, |len, byte| (len << 8) | usize::from(*byte))
      }
      _ => {
        chunks.push(Chunk::Op(opcode));
        continue;
      }
    };

    let Some(data) = offset
      .checked_add(len)
      .and_then(|end| script.get(offset..end))
    else {
      return Err(ScriptError::UnexpectedEnd { offset, len });
    };

    offset += len;

    chunks.push(Chunk::Push {
      opcode,
      data: data.to_vec(),
    });
  }

  Ok(chunks)
}

#[cfg(test)]
pub(crate) fn encode(chunks: &[Chunk]) -> Vec<u8> {
  let mut script = Vec::new();

  for chunk in chunks {
    match chunk {
      Chunk::Op(opcode) => script.push(*opcode),
      Chunk::Push { opcode, data } => {
        script.push(*opcode);
        match *opcode {
          OP_PUSHDATA1 => script.push(u8::try_from(data.len()).unwrap()),
          OP_PUSHDATA2 => script.extend(u16::try_from(data.len()).unwrap().to_le_bytes()),
          OP_PUSHDATA4 => script.extend(u32::try_from(data.len()).unwrap().to_le_bytes()),
          _ => {}
        }
        script.extend(data);
      }
    }
  }

  script
}
