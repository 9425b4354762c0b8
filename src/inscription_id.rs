use super::*;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord)]
pub struct InscriptionId {
  pub txid: Txid,
  pub index: u32,
}

impl InscriptionId {
  /// The canonical form pins the suffix to `i0` whatever the caller supplied.
  pub(crate) fn canonical(self) -> Self {
    Self {
      txid: self.txid,
      index: 0,
    }
  }
}

impl From<Txid> for InscriptionId {
  fn from(txid: Txid) -> Self {
    Self { txid, index: 0 }
  }
}

impl Display for InscriptionId {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}i{}", self.txid, self.index)
  }
}

impl FromStr for InscriptionId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    ensure!(s.is_ascii(), "invalid character in inscription id");

    if s.len() == 64 {
      return Ok(Self {
        txid: s.parse()?,
        index: 0,
      });
    }

    ensure!(s.len() > 65, "invalid inscription id length {}", s.len());
    ensure!(&s[64..65] == "i", "invalid inscription id separator");

    Ok(Self {
      txid: s[..64].parse()?,
      index: s[65..].parse().context("invalid inscription index")?,
    })
  }
}

impl Serialize for InscriptionId {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for InscriptionId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    String::deserialize(deserializer)?
      .parse()
      .map_err(serde::de::Error::custom)
  }
}
