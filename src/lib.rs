#![allow(clippy::too_many_arguments, clippy::result_large_err)]

use {
  self::{
    arguments::Arguments, envelope::Envelope, media::Media, script::Chunk, store::ContentStore,
    subcommand::Subcommand,
  },
  anyhow::{anyhow, bail, ensure, Context, Error},
  chrono::{DateTime, Utc},
  clap::Parser,
  lazy_static::lazy_static,
  regex::Regex,
  serde::{Deserialize, Deserializer, Serialize, Serializer},
  serde_json::Value,
  std::{
    collections::{BTreeMap, HashSet},
    env,
    fmt::{self, Display, Formatter},
    fs, io,
    path::{Path, PathBuf},
    process,
    str::FromStr,
    thread,
    time::Duration,
  },
};


#[cfg(test)]
use self::test::*;

mod arguments;
mod deps;
mod envelope;
mod inscription_id;
mod media;
mod options;
mod re;
mod reconstructor;
mod rpc;
mod script;
mod settings;
mod store;
pub mod subcommand;
mod transaction;
mod txid;
mod walker;

pub use crate::{
  inscription_id::InscriptionId,
  options::Options,
  reconstructor::{Artifact, Reconstructor},
  rpc::{Api, RpcClient, RpcError},
  settings::Settings,
  store::ContentRecord,
  transaction::{Block, BlockHeader, ScriptPubKey, ScriptSig, Transaction, TxIn, TxOut},
  txid::Txid,
};

type Result<T = (), E = Error> = std::result::Result<T, E>;

fn print_json(output: impl Serialize) -> Result {
  serde_json::to_writer_pretty(io::stdout(), &output)?;
  println!();
  Ok(())
}

pub fn main() {
  env_logger::init();

  if let Err(err) = Arguments::parse().run() {
    eprintln!("error: {err}");
    err
      .chain()
      .skip(1)
      .for_each(|cause| eprintln!("because: {cause}"));
    if env::var_os("RUST_BACKTRACE")
      .map(|val| val == "1")
      .unwrap_or_default()
    {
      eprintln!("{}", err.backtrace());
    }
    process::exit(1);
  }
}
