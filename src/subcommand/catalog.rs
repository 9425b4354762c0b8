use super::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub inscriptions: BTreeMap<String, ContentRecord>,
}

pub(crate) fn run(settings: Settings) -> Result {
  let store = ContentStore::new(settings.content_dir.clone());

  print_json(Output {
    inscriptions: store.load_master(),
  })?;

  Ok(())
}
