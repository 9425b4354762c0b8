use super::*;

/// Result of the backward walk: the earliest transaction of a contiguous
/// envelope-bearing chain, or the transaction the walk died on with no
/// envelope at all.
pub(crate) struct Genesis {
  pub(crate) envelope: Option<Envelope>,
  pub(crate) transaction: Transaction,
}

/// A transaction found spending the watched outpoint.
pub(crate) struct Spend {
  pub(crate) transaction: Transaction,
  pub(crate) vin: usize,
  pub(crate) height: u64,
}

/// Decoded envelope of `vin[0]`, or `None` for anything that is not an
/// inscription input. Parse failures are deliberately indistinguishable from
/// foreign scripts; the walk must keep going either way.
pub(crate) fn input_envelope(transaction: &Transaction) -> Option<Envelope> {
  Envelope::from_chunks(&input_chunks(transaction, 0)?)
}

pub(crate) fn input_chunks(transaction: &Transaction, vin: usize) -> Option<Vec<Chunk>> {
  let script_sig = transaction.vin.get(vin)?.script_sig.as_ref()?;
  let bytes = hex::decode(&script_sig.hex).ok()?;
  script::parse(&bytes).ok()
}

/// Walks backward through `vin[0]` until the earliest transaction of a
/// contiguous envelope chain. Iterative on purpose: inscription chains can be
/// long enough to make recursion a liability.
pub(crate) fn genesis(client: &dyn Api, txid: Txid) -> Result<Genesis> {
  let mut transaction = client
    .get_raw_transaction(txid)
    .with_context(|| format!("failed to fetch transaction {txid}"))?;

  loop {
    if transaction
      .vin
      .first()
      .and_then(|input| input.script_sig.as_ref())
      .is_none()
    {
      return Ok(Genesis {
        envelope: None,
        transaction,
      });
    }

    let envelope = input_envelope(&transaction);

    let Some(parent_txid) = transaction.vin.first().and_then(|input| input.txid) else {
      return Ok(Genesis {
        envelope,
        transaction,
      });
    };

    let parent = client
      .get_raw_transaction(parent_txid)
      .with_context(|| format!("failed to fetch parent transaction {parent_txid}"))?;

    if envelope.is_some() && input_envelope(&parent).is_none() {
      return Ok(Genesis {
        envelope,
        transaction,
      });
    }

    transaction = parent;
  }
}

/// Scans blocks at strictly increasing heights for the first input spending
/// `(txid, vout)`. Any fetch failure ends the window; the caller settles for
/// a partial reconstruction. Paced to keep the node responsive.
pub(crate) fn find_spender(
  client: &dyn Api,
  txid: Txid,
  vout: u32,
  start: u64,
  depth: u64,
  pause: Duration,
) -> Option<Spend> {
  log::info!(
    "scanning blocks {start}..={} for the spender of {txid}:{vout}",
    start.saturating_add(depth),
  );

  for height in start..=start.saturating_add(depth) {
    if height > start && !pause.is_zero() {
      thread::sleep(pause);
    }

    let hash = match client.get_block_hash(height) {
      Ok(hash) => hash,
      Err(err) => {
        log::warn!("spender scan stopped at height {height}: {err}");
        return None;
      }
    };

    let block = match client.get_block(&hash) {
      Ok(block) => block,
      Err(err) => {
        log::warn!("spender scan stopped at height {height}: {err}");
        return None;
      }
    };

    for transaction in block.tx {
      if let Some(vin) = transaction
        .vin
        .iter()
        .position(|input| input.txid == Some(txid) && input.vout == Some(vout))
      {
        return Some(Spend {
          transaction,
          vin,
          height,
        });
      }
    }
  }

  None
}
