use super::*;

mod catalog;
mod reconstruct;

#[derive(Debug, Parser)]
pub(crate) enum Subcommand {
  #[command(about = "Decode an inscription into the content store")]
  Reconstruct(reconstruct::Reconstruct),
  #[command(about = "Print the master index")]
  Catalog,
}

impl Subcommand {
  pub(crate) fn run(self, settings: Settings) -> Result {
    match self {
      Self::Reconstruct(reconstruct) => reconstruct.run(settings),
      Self::Catalog => catalog::run(settings),
    }
  }
}
