use super::*;

/// One master index entry. Keys on disk are camelCase to stay readable next
/// to artifacts that were indexed by earlier tooling.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
  pub inscription_id: InscriptionId,
  pub txid: Txid,
  pub filename: String,
  pub mime_type: String,
  pub ext: String,
  pub size: u64,
  pub created_at: DateTime<Utc>,
}

/// Flat directory of `<inscription id>.<ext>` artifacts plus the master
/// index at `master/master.json`. Created lazily on first write.
pub(crate) struct ContentStore {
  dir: PathBuf,
}

impl ContentStore {
  pub(crate) fn new(dir: PathBuf) -> Self {
    Self { dir }
  }

  pub(crate) fn content_dir(&self) -> &Path {
    &self.dir
  }

  fn master_dir(&self) -> PathBuf {
    self.dir.join("master")
  }

  fn master_path(&self) -> PathBuf {
    self.master_dir().join("master.json")
  }

  /// A missing or empty index reads as empty; an unreadable one is logged
  /// and reset rather than wedging every future reconstruction.
  pub(crate) fn load_master(&self) -> BTreeMap<String, ContentRecord> {
    let path = self.master_path();

    let Ok(bytes) = fs::read(&path) else {
      return BTreeMap::new();
    };

    if bytes.is_empty() {
      return BTreeMap::new();
    }

    match serde_json::from_slice(&bytes) {
      Ok(index) => index,
      Err(err) => {
        log::warn!("resetting unreadable master index at `{}`: {err}", path.display());
        BTreeMap::new()
      }
    }
  }

  /// Read-merge-write. `created_at` of an existing entry survives the
  /// update. The replace goes through a temp file so an interrupted write
  /// cannot truncate the index.
  pub(crate) fn upsert(&self, record: ContentRecord) -> Result {
    let mut index = self.load_master();

    let key = record.inscription_id.to_string();

    let record = match index.get(&key) {
      Some(existing) => ContentRecord {
        created_at: existing.created_at,
        ..record
      },
      None => record,
    };

    index.insert(key, record);

    let dir = self.master_dir();
    fs::create_dir_all(&dir)
      .with_context(|| format!("failed to create `{}`", dir.display()))?;

    let path = self.master_path();
    let tmp = dir.join("master.json.tmp");

    fs::write(&tmp, serde_json::to_string_pretty(&index)?)
      .with_context(|| format!("failed to write `{}`", tmp.display()))?;
    fs::rename(&tmp, &path)
      .with_context(|| format!("failed to replace `{}`", path.display()))?;

    Ok(())
  }

  /// Writes a fully assembled artifact and reports its on-disk size.
  pub(crate) fn write_artifact(&self, filename: &str, bytes: &[u8]) -> Result<u64> {
    fs::create_dir_all(&self.dir)
      .with_context(|| format!("failed to create `{}`", self.dir.display()))?;

    let path = self.dir.join(filename);

    fs::write(&path, bytes).with_context(|| format!("failed to write `{}`", path.display()))?;

    Ok(
      fs::metadata(&path)
        .with_context(|| format!("failed to stat `{}`", path.display()))?
        .len(),
    )
  }

  /// Case-insensitive prefix lookup so callers need not know the extension.
  /// The id is tried as given, as the bare txid, and as `<txid>i0`.
  pub(crate) fn find_file(&self, id: &str) -> Option<PathBuf> {
    let base = id.split('i').next().unwrap_or(id);

    let candidates = [id.to_string(), base.to_string(), format!("{base}i0")];

    let entries = fs::read_dir(&self.dir)
      .ok()?
      .flatten()
      .filter(|entry| entry.path().is_file())
      .collect::<Vec<_>>();

    for candidate in candidates {
      let prefix = format!("{}.", candidate.to_lowercase());

      for entry in &entries {
        if entry
          .file_name()
          .to_string_lossy()
          .to_lowercase()
          .starts_with(&prefix)
        {
          return Some(entry.path());
        }
      }
    }

    None
  }
}
