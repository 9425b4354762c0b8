use super::*;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub inscription_id: InscriptionId,
  pub content_type: String,
  pub file: PathBuf,
  pub size: u64,
  pub from_cache: bool,
  pub dependencies: usize,
}

#[derive(Debug, Parser)]
pub(crate) struct Reconstruct {
  #[arg(help = "Reconstruct inscription <ID>, a transaction id with an optional `i<n>` suffix.")]
  id: String,
}

impl Reconstruct {
  pub(crate) fn run(self, settings: Settings) -> Result {
    let client = RpcClient::new(&settings)?;

    let reconstructor = Reconstructor::new(&client, &settings);

    let artifact = reconstructor.ensure(&self.id)?;

    let dependencies = deps::resolve(&reconstructor, &artifact);

    let record = reconstructor
      .store()
      .load_master()
      .remove(&artifact.inscription_id.to_string())
      .ok_or_else(|| {
        anyhow!(
          "master index is missing an entry for {}",
          artifact.inscription_id
        )
      })?;

    print_json(Output {
      inscription_id: artifact.inscription_id,
      content_type: artifact.content_type,
      file: reconstructor.store().content_dir().join(record.filename),
      size: record.size,
      from_cache: artifact.from_cache,
      dependencies,
    })?;

    Ok(())
  }
}
