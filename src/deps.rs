use super::*;

/// Ensures every inscription referenced from an HTML or SVG artifact is
/// present in the content store, recursing through referenced artifacts that
/// are themselves HTML or SVG. Returns how many dependencies were resolved.
/// A failed child is logged and skipped; one broken reference must not sink
/// the rest of the page.
pub(crate) fn resolve(reconstructor: &Reconstructor, artifact: &Artifact) -> usize {
  let mut visited = HashSet::from([artifact.inscription_id.txid]);

  walk(reconstructor, artifact, &mut visited)
}

fn walk(
  reconstructor: &Reconstructor,
  artifact: &Artifact,
  visited: &mut HashSet<Txid>,
) -> usize {
  if Media::from_content_type(&artifact.content_type) != Media::Iframe {
    return 0;
  }

  let text = match load_text(reconstructor, artifact) {
    Ok(text) => text,
    Err(err) => {
      log::warn!(
        "skipping dependency scan of {}: {err}",
        artifact.inscription_id,
      );
      return 0;
    }
  };

  let mut resolved = 0;

  for reference in references(&text) {
    let Ok(id) = reference.parse::<InscriptionId>() else {
      continue;
    };

    if !visited.insert(id.txid) {
      continue;
    }

    match reconstructor.ensure(&reference) {
      Ok(child) => {
        resolved += 1 + walk(reconstructor, &child, visited);
      }
      Err(err) => log::warn!("failed to resolve dependency {reference}: {err}"),
    }
  }

  resolved
}

/// Unique `/content/<id>` references in document order.
fn references(text: &str) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut ids = Vec::new();

  for capture in re::CONTENT_REFERENCE.captures_iter(text) {
    let id = capture[1].to_lowercase();
    if seen.insert(id.clone()) {
      ids.push(id);
    }
  }

  ids
}

fn load_text(reconstructor: &Reconstructor, artifact: &Artifact) -> Result<String> {
  if let Some(bytes) = &artifact.bytes {
    return Ok(String::from_utf8_lossy(bytes).into_owned());
  }

  let path = reconstructor
    .store()
    .find_file(&artifact.inscription_id.to_string())
    .ok_or_else(|| anyhow!("missing artifact file for {}", artifact.inscription_id))?;

  let bytes = fs::read(&path).with_context(|| format!("failed to read `{}`", path.display()))?;

  Ok(String::from_utf8_lossy(&bytes).into_owned())
}
