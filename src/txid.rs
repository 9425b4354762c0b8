use super::*;

/// Transaction identifier as the node reports it: 64 lowercase hex digits in
/// display order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Txid([u8; 32]);

impl From<[u8; 32]> for Txid {
  fn from(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }
}

impl Display for Txid {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", hex::encode(self.0))
  }
}

impl fmt::Debug for Txid {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{self}")
  }
}

impl FromStr for Txid {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    ensure!(s.len() == 64, "invalid txid length {}", s.len());

    let bytes = hex::decode(s).context("invalid txid hex")?;

    Ok(Self(
      bytes
        .try_into()
        .map_err(|_| anyhow!("invalid txid length"))?,
    ))
  }
}

impl Serialize for Txid {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Txid {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    String::deserialize(deserializer)?
      .parse()
      .map_err(serde::de::Error::custom)
  }
}
