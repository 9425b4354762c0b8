use super::*;

pub(crate) const PROTOCOL_ID: [u8; 3] = *b"ord";

/// The decoded payload of a single inscription-bearing scriptSig: the declared
/// piece count, the content type, and whatever `(index, data)` pairs the
/// script carried.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct Envelope {
  pub(crate) total_pieces: u32,
  pub(crate) content_type: String,
  pub(crate) pieces: BTreeMap<u32, Vec<u8>>,
}

impl Envelope {
  /// Decodes an opening envelope: a push of `ord`, a piece count, a content
  /// type, then interleaved `(index, data)` pairs. Returns `None` on anything
  /// else; callers traverse many unrelated transactions and skip them.
  pub(crate) fn from_chunks(chunks: &[Chunk]) -> Option<Self> {
    if chunks.first()?.data()? != PROTOCOL_ID {
      return None;
    }

    let total_pieces = chunks.get(1)?.number()?;

    let content_type = String::from_utf8_lossy(chunks.get(2)?.data()?).into_owned();

    Some(Self {
      total_pieces,
      content_type,
      pieces: ingest(chunks, 3, None),
    })
  }

  /// Decodes a follow-up transaction in the spender chain. An embedded
  /// envelope overrides the hints taken from the genesis; otherwise pair
  /// ingestion starts at chunk zero. Indices outside the declared range are
  /// dropped. Returns `None` when no piece survives.
  pub(crate) fn continuation(
    chunks: &[Chunk],
    expected_total: u32,
    expected_content_type: &str,
  ) -> Option<Self> {
    if let Some(mut envelope) = Self::from_chunks(chunks) {
      let total = envelope.total_pieces;
      envelope.pieces.retain(|index, _| *index < total);
      return (!envelope.pieces.is_empty()).then_some(envelope);
    }

    let pieces = ingest(chunks, 0, Some(expected_total));

    (!pieces.is_empty()).then(|| Self {
      total_pieces: expected_total,
      content_type: expected_content_type.into(),
      pieces,
    })
  }
}

fn ingest(chunks: &[Chunk], start: usize, limit: Option<u32>) -> BTreeMap<u32, Vec<u8>> {
  let mut pieces = BTreeMap::new();
  let mut i = start;

  while i + 1 < chunks.len() {
    let Some(index) = chunks[i].number() else {
      break;
    };

    let Some(data) = chunks[i + 1].data() else {
      break;
    };

    if limit.map_or(true, |limit| index < limit) {
      pieces.entry(index).or_insert_with(|| data.to_vec());
    }

    i += 2;
  }

  pieces
}
