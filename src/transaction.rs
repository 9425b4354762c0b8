use super::*;

/// Minimal projection of a verbose `getrawtransaction` response. Unknown
/// fields are ignored; `blockhash` is absent while the transaction is
/// unconfirmed.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Transaction {
  pub txid: Txid,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blockhash: Option<String>,
  #[serde(default)]
  pub vin: Vec<TxIn>,
  #[serde(default)]
  pub vout: Vec<TxOut>,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct TxIn {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub txid: Option<Txid>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vout: Option<u32>,
  #[serde(
    default,
    rename = "scriptSig",
    skip_serializing_if = "Option::is_none"
  )]
  pub script_sig: Option<ScriptSig>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub coinbase: Option<String>,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ScriptSig {
  #[serde(default)]
  pub hex: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TxOut {
  pub n: u32,
  #[serde(rename = "scriptPubKey")]
  pub script_pub_key: ScriptPubKey,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ScriptPubKey {
  #[serde(default)]
  pub hex: String,
}

/// `getblock [hash, 2]`: header fields plus fully decoded transactions.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Block {
  pub hash: String,
  pub height: u64,
  #[serde(default)]
  pub tx: Vec<Transaction>,
}

/// `getblock [hash]`: the header projection; the `tx` array of id strings is
/// ignored.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BlockHeader {
  pub hash: String,
  pub height: u64,
}

struct Reader<'a> {
  bytes: &'a [u8],
  offset: usize,
}

impl<'a> Reader<'a> {
  fn new(bytes: &'a [u8]) -> Self {
    Self { bytes, offset: 0 }
  }

  fn take(&mut self, len: usize) -> Result<&'a [u8]> {
    let end = self
      .offset
      .checked_add(len)
      .filter(|end| *end <= self.bytes.len())
      .ok_or_else(|| anyhow!("raw transaction truncated at byte {}", self.offset))?;

    let slice = &self.bytes[self.offset..end];
    self.offset = end;

    Ok(slice)
  }

  fn u32(&mut self) -> Result<u32> {
    Ok(u32::from_le_bytes(self.take(4)?.try_into()?))
  }

  fn u64(&mut self) -> Result<u64> {
    Ok(u64::from_le_bytes(self.take(8)?.try_into()?))
  }

  fn varint(&mut self) -> Result<u64> {
    Ok(match self.take(1)?[0] {
      0xfd => u64::from(u16::from_le_bytes(self.take(2)?.try_into()?)),
      0xfe => u64::from(self.u32()?),
      0xff => self.u64()?,
      n => u64::from(n),
    })
  }
}

impl Transaction {
  /// Last-resort decode of the raw hex form for nodes that reject verbose
  /// `getrawtransaction`. Reads the transparent layout only: a version word
  /// whose high bit marks an overwintered transaction (followed by a version
  /// group id), then inputs and outputs. The containing block is unknown, so
  /// the result reads as unconfirmed.
  pub(crate) fn from_raw(txid: Txid, raw: &[u8]) -> Result<Self> {
    let mut reader = Reader::new(raw);

    let version = reader.u32()?;
    if version & 0x8000_0000 != 0 {
      reader.u32()?;
    }

    let mut vin = Vec::new();
    for _ in 0..reader.varint()? {
      let mut prev = <[u8; 32]>::try_from(reader.take(32)?)?;
      // wire order to display order
      prev.reverse();

      let prev_vout = reader.u32()?;
      let script_len = usize::try_from(reader.varint()?)?;
      let script = reader.take(script_len)?;
      reader.u32()?; // sequence

      let coinbase = prev == [0; 32] && prev_vout == u32::MAX;

      vin.push(TxIn {
        txid: (!coinbase).then_some(Txid::from(prev)),
        vout: (!coinbase).then_some(prev_vout),
        script_sig: (!coinbase).then(|| ScriptSig {
          hex: hex::encode(script),
        }),
        coinbase: coinbase.then(|| hex::encode(script)),
      });
    }

    let mut vout = Vec::new();
    for n in 0..reader.varint()? {
      reader.u64()?; // value
      let script_len = usize::try_from(reader.varint()?)?;
      let script = reader.take(script_len)?;

      vout.push(TxOut {
        n: u32::try_from(n)?,
        script_pub_key: ScriptPubKey {
          hex: hex::encode(script),
        },
      });
    }

    Ok(Self {
      txid,
      blockhash: None,
      vin,
      vout,
    })
  }
}
