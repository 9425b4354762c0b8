use super::*;

#[derive(Debug, Parser)]
#[command(
  name = "zord",
  version,
  about = "Zordinals inscription reconstructor"
)]
pub(crate) struct Arguments {
  #[command(flatten)]
  pub(crate) options: Options,
  #[command(subcommand)]
  pub(crate) subcommand: Subcommand,
}

impl Arguments {
  pub(crate) fn run(self) -> Result {
    self.subcommand.run(Settings::load(self.options)?)
  }
}
