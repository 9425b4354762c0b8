use super::*;

/// Outcome of `ensure`: the artifact bytes when they were just assembled,
/// `None` when the content store already had them.
#[derive(Debug)]
pub struct Artifact {
  pub inscription_id: InscriptionId,
  pub content_type: String,
  pub bytes: Option<Vec<u8>>,
  pub from_cache: bool,
}

pub struct Reconstructor<'a> {
  client: &'a dyn Api,
  store: ContentStore,
  scan_depth: u64,
  scan_pause: Duration,
}

impl<'a> Reconstructor<'a> {
  pub fn new(client: &'a dyn Api, settings: &Settings) -> Self {
    Self {
      client,
      store: ContentStore::new(settings.content_dir.clone()),
      scan_depth: settings.scan_depth,
      scan_pause: settings.scan_pause,
    }
  }

  pub(crate) fn store(&self) -> &ContentStore {
    &self.store
  }

  /// Materializes the inscription named by a txid or inscription id into the
  /// content store, decoding it from the chain unless it is already present.
  pub fn ensure(&self, id_or_txid: &str) -> Result<Artifact> {
    let id = id_or_txid
      .parse::<InscriptionId>()
      .with_context(|| format!("invalid inscription id or txid `{id_or_txid}`"))?
      .canonical();

    let master = self.store.load_master();

    if let Some(record) = master.get(&id.to_string()) {
      if self.store.content_dir().join(&record.filename).is_file() {
        log::info!("{id} served from master index");
        return Ok(Artifact {
          inscription_id: id,
          content_type: record.mime_type.clone(),
          bytes: None,
          from_cache: true,
        });
      }
    }

    if let Some(path) = self.store.find_file(&id.to_string()) {
      return self.adopt(id, &path);
    }

    self.reconstruct(id)
  }

  /// Registers an artifact file that exists on disk but is missing from the
  /// master index, deriving the content type from its extension.
  fn adopt(&self, id: InscriptionId, path: &Path) -> Result<Artifact> {
    let filename = path
      .file_name()
      .ok_or_else(|| anyhow!("artifact path `{}` has no filename", path.display()))?
      .to_string_lossy()
      .into_owned();

    let ext = path
      .extension()
      .map(|ext| ext.to_string_lossy().to_lowercase())
      .unwrap_or_default();

    let content_type = Media::content_type_for_extension(&ext).to_string();

    let size = fs::metadata(path)
      .with_context(|| format!("failed to stat `{}`", path.display()))?
      .len();

    log::info!("adopting `{filename}` into the master index");

    self.store.upsert(ContentRecord {
      inscription_id: id,
      txid: id.txid,
      filename,
      mime_type: content_type.clone(),
      ext,
      size,
      created_at: Utc::now(),
    })?;

    Ok(Artifact {
      inscription_id: id,
      content_type,
      bytes: None,
      from_cache: true,
    })
  }

  fn reconstruct(&self, id: InscriptionId) -> Result<Artifact> {
    let genesis = walker::genesis(self.client, id.txid)?;

    let Some(envelope) = genesis.envelope else {
      bail!("no inscription found at {}", id.txid);
    };

    let inscription_id = InscriptionId::from(genesis.transaction.txid);

    if inscription_id != id {
      log::warn!("{} resolves to inscription {inscription_id}", id.txid);
    }

    log::info!(
      "genesis {} declares {} piece(s) of {}",
      inscription_id.txid,
      envelope.total_pieces,
      envelope.content_type,
    );

    let mut total = envelope.total_pieces;
    let mut content_type = envelope.content_type;
    let mut pieces = envelope.pieces;

    let height = match &genesis.transaction.blockhash {
      Some(hash) => Some(
        self
          .client
          .get_block_header(hash)
          .context("failed to fetch genesis block header")?
          .height,
      ),
      None => None,
    };

    if let Some(mut height) = height {
      let mut current = genesis.transaction.txid;

      while !(0..total).all(|index| pieces.contains_key(&index)) {
        let Some(spend) = walker::find_spender(
          self.client,
          current,
          0,
          height,
          self.scan_depth,
          self.scan_pause,
        ) else {
          break;
        };

        log::info!(
          "spender {} at height {}",
          spend.transaction.txid,
          spend.height,
        );

        if let Some(chunks) = walker::input_chunks(&spend.transaction, spend.vin) {
          if let Some(continuation) = Envelope::continuation(&chunks, total, &content_type) {
            total = continuation.total_pieces;
            content_type = continuation.content_type;
            for (index, data) in continuation.pieces {
              pieces.entry(index).or_insert(data);
            }
          }
        }

        current = spend.transaction.txid;
        height = spend.height;
      }
    }

    if !(0..total).all(|index| pieces.contains_key(&index)) {
      log::warn!(
        "spender chain exhausted with {} of {total} piece(s) for {inscription_id}; writing partial artifact",
        pieces.len(),
      );
    }

    let mut bytes = Vec::new();
    for index in (0..total).rev() {
      if let Some(piece) = pieces.get(&index) {
        bytes.extend_from_slice(piece);
      }
    }

    let ext = Media::extension(&content_type);
    let filename = format!("{inscription_id}.{ext}");

    let size = self.store.write_artifact(&filename, &bytes)?;

    self.store.upsert(ContentRecord {
      inscription_id,
      txid: inscription_id.txid,
      filename: filename.clone(),
      mime_type: content_type.clone(),
      ext: ext.into(),
      size,
      created_at: Utc::now(),
    })?;

    log::info!("wrote `{filename}` ({size} bytes)");

    Ok(Artifact {
      inscription_id,
      content_type,
      bytes: Some(bytes),
      from_cache: false,
    })
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  fn inscribe(node: &mut TestNode, id: u64, parent: u64, script: Vec<u8>) {
    node.insert_mempool(plain_tx(txid(parent)));
    node.insert_mempool(script_tx(txid(id), Some((txid(parent), 0)), script));
  }

  #[test]
  fn single_transaction_inscription() {
    let mut node = TestNode::new();
    node.insert_mempool(plain_tx(txid(9)));
    node.insert_block(
      100,
      vec![script_tx(
        txid(1),
        Some((txid(9), 0)),
        envelope_script(1, "image/png", &[(0, b"PNG")]),
      )],
    );

    let context = TestContext::new(node);
    let artifact = context.reconstructor().ensure(&txid(1).to_string()).unwrap();

    assert_eq!(artifact.inscription_id, inscription_id(1));
    assert_eq!(artifact.content_type, "image/png");
    assert_eq!(artifact.bytes, Some(b"PNG".to_vec()));
    assert!(!artifact.from_cache);

    let filename = format!("{}.png", inscription_id(1));
    assert_eq!(
      fs::read(context.content_path(&filename)).unwrap(),
      b"PNG".to_vec(),
    );

    let index = context.store().load_master();
    let record = &index[&inscription_id(1).to_string()];
    assert_eq!(record.filename, filename);
    assert_eq!(record.size, 3);
    assert_eq!(record.mime_type, "image/png");
    assert_eq!(record.ext, "png");
  }

  #[test]
  fn second_ensure_is_served_from_cache() {
    let mut node = TestNode::new();
    node.insert_mempool(plain_tx(txid(9)));
    node.insert_block(
      100,
      vec![script_tx(
        txid(1),
        Some((txid(9), 0)),
        envelope_script(1, "image/png", &[(0, b"PNG")]),
      )],
    );

    let context = TestContext::new(node);
    let reconstructor = context.reconstructor();

    reconstructor.ensure(&txid(1).to_string()).unwrap();
    let created_at = context.store().load_master()[&inscription_id(1).to_string()].created_at;

    let artifact = reconstructor.ensure(&txid(1).to_string()).unwrap();

    assert!(artifact.from_cache);
    assert_eq!(artifact.bytes, None);
    assert_eq!(artifact.content_type, "image/png");
    assert_eq!(
      context.store().load_master()[&inscription_id(1).to_string()].created_at,
      created_at,
    );
  }

  #[test]
  fn input_is_canonicalized() {
    let mut node = TestNode::new();
    node.insert_mempool(plain_tx(txid(9)));
    node.insert_block(
      100,
      vec![script_tx(
        txid(1),
        Some((txid(9), 0)),
        envelope_script(1, "text/plain", &[(0, b"hi")]),
      )],
    );

    let context = TestContext::new(node);
    let reconstructor = context.reconstructor();

    let bare = reconstructor.ensure(&txid(1).to_string()).unwrap();
    let canonical = reconstructor.ensure(&format!("{}i0", txid(1))).unwrap();
    let suffixed = reconstructor.ensure(&format!("{}i5", txid(1))).unwrap();

    assert_eq!(bare.inscription_id, inscription_id(1));
    assert_eq!(canonical.inscription_id, inscription_id(1));
    assert_eq!(suffixed.inscription_id, inscription_id(1));

    assert!(!bare.from_cache);
    assert!(canonical.from_cache);
    assert!(suffixed.from_cache);
  }

  #[test]
  fn three_piece_chain() {
    let mut node = TestNode::new();
    node.insert_mempool(plain_tx(txid(9)));
    node.insert_block(
      100,
      vec![script_tx(
        txid(1),
        Some((txid(9), 0)),
        envelope_script(3, "text/plain", &[(0, b"A")]),
      )],
    );
    node.insert_block(101, Vec::new());
    node.insert_block(102, Vec::new());
    node.insert_block(
      103,
      vec![script_tx(
        txid(2),
        Some((txid(1), 0)),
        continuation_script(&[(1, b"B"), (2, b"C")]),
      )],
    );

    let context = TestContext::new(node);
    let artifact = context.reconstructor().ensure(&txid(1).to_string()).unwrap();

    assert_eq!(artifact.bytes, Some(b"CBA".to_vec()));
  }

  #[test]
  fn overlapping_pieces_keep_the_first_writers() {
    let mut node = TestNode::new();
    node.insert_mempool(plain_tx(txid(9)));
    node.insert_block(
      100,
      vec![script_tx(
        txid(1),
        Some((txid(9), 0)),
        envelope_script(3, "text/plain", &[(0, b"A"), (1, b"B1")]),
      )],
    );
    node.insert_block(
      101,
      vec![script_tx(
        txid(2),
        Some((txid(1), 0)),
        continuation_script(&[(1, b"B2"), (2, b"C")]),
      )],
    );

    let context = TestContext::new(node);
    let artifact = context.reconstructor().ensure(&txid(1).to_string()).unwrap();

    assert_eq!(artifact.bytes, Some(b"CB1A".to_vec()));
  }

  #[test]
  fn missing_middle_piece_emits_partial_artifact() {
    let mut node = TestNode::new();
    node.insert_mempool(plain_tx(txid(9)));
    node.insert_block(
      100,
      vec![script_tx(
        txid(1),
        Some((txid(9), 0)),
        envelope_script(3, "text/plain", &[(0, b"A"), (2, b"C")]),
      )],
    );

    let context = TestContext::new(node);
    let artifact = context.reconstructor().ensure(&txid(1).to_string()).unwrap();

    assert_eq!(artifact.bytes, Some(b"CA".to_vec()));

    let index = context.store().load_master();
    assert_eq!(index[&inscription_id(1).to_string()].size, 2);
  }

  #[test]
  fn unconfirmed_genesis_skips_the_spender_scan() {
    let mut node = TestNode::new();
    inscribe(
      &mut node,
      1,
      9,
      envelope_script(2, "text/plain", &[(0, b"A")]),
    );

    let context = TestContext::new(node);
    let artifact = context.reconstructor().ensure(&txid(1).to_string()).unwrap();

    assert_eq!(artifact.bytes, Some(b"A".to_vec()));
  }

  #[test]
  fn continuation_envelope_overrides_totals() {
    let mut node = TestNode::new();
    node.insert_mempool(plain_tx(txid(9)));
    node.insert_block(
      100,
      vec![script_tx(
        txid(1),
        Some((txid(9), 0)),
        envelope_script(2, "text/plain", &[(0, b"A")]),
      )],
    );
    node.insert_block(
      101,
      vec![script_tx(
        txid(2),
        Some((txid(1), 0)),
        envelope_script(3, "text/plain", &[(1, b"B"), (2, b"C")]),
      )],
    );

    let context = TestContext::new(node);
    let artifact = context.reconstructor().ensure(&txid(1).to_string()).unwrap();

    assert_eq!(artifact.bytes, Some(b"CBA".to_vec()));
  }

  #[test]
  fn no_inscription_is_an_error() {
    let mut node = TestNode::new();
    node.insert_mempool(plain_tx(txid(9)));
    node.insert_mempool(script_tx(txid(1), Some((txid(9), 0)), vec![0x51]));

    let context = TestContext::new(node);

    assert_eq!(
      context
        .reconstructor()
        .ensure(&txid(1).to_string())
        .unwrap_err()
        .to_string(),
      format!("no inscription found at {}", txid(1)),
    );
  }

  #[test]
  fn orphan_file_is_adopted() {
    let context = TestContext::new(TestNode::new());

    let filename = format!("{}.svg", inscription_id(1));
    fs::write(context.content_path(&filename), b"<svg/>").unwrap();

    let artifact = context.reconstructor().ensure(&txid(1).to_string()).unwrap();

    assert!(artifact.from_cache);
    assert_eq!(artifact.content_type, "image/svg+xml");

    let index = context.store().load_master();
    let record = &index[&inscription_id(1).to_string()];
    assert_eq!(record.filename, filename);
    assert_eq!(record.size, 6);
    assert_eq!(record.ext, "svg");
  }

  #[test]
  fn unknown_content_type_falls_back_to_bin() {
    let mut node = TestNode::new();
    inscribe(
      &mut node,
      1,
      9,
      envelope_script(1, "application/x-zordinal", &[(0, b"blob")]),
    );

    let context = TestContext::new(node);
    let artifact = context.reconstructor().ensure(&txid(1).to_string()).unwrap();

    assert!(!artifact.from_cache);
    assert!(context
      .content_path(&format!("{}.bin", inscription_id(1)))
      .is_file());
  }
}
