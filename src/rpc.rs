use {
  super::*,
  serde::de::DeserializeOwned,
  serde_json::json,
  thiserror::Error,
};

const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RpcError {
  #[error("node unreachable: {source}")]
  Unreachable { source: reqwest::Error },
  #[error("node rejected {method} {params}: {message}")]
  Node {
    method: String,
    params: Value,
    message: String,
  },
  #[error("malformed response to {method}: {message}")]
  Malformed { method: String, message: String },
}

/// The node surface the reconstructor needs. `RpcClient` talks to a real
/// node; tests substitute a fixture implementation.
pub trait Api {
  fn get_raw_transaction(&self, txid: Txid) -> Result<Transaction, RpcError>;
  fn get_block_hash(&self, height: u64) -> Result<String, RpcError>;
  fn get_block_header(&self, hash: &str) -> Result<BlockHeader, RpcError>;
  fn get_block(&self, hash: &str) -> Result<Block, RpcError>;
}

#[derive(Deserialize)]
struct JsonResponse<T> {
  error: Option<JsonError>,
  result: Option<T>,
}

#[derive(Deserialize, Debug)]
struct JsonError {
  code: i64,
  message: String,
}

pub struct RpcClient {
  client: reqwest::blocking::Client,
  url: String,
  user: String,
  pass: String,
}

impl RpcClient {
  pub fn new(settings: &Settings) -> Result<Self> {
    Ok(Self {
      client: reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .context("failed to build RPC transport")?,
      url: settings.rpc_url.clone(),
      user: settings.rpc_user.clone(),
      pass: settings.rpc_pass.clone(),
    })
  }

  pub fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
    let body = json!({
      "jsonrpc": "1.0",
      "id": "zord",
      "method": method,
      "params": params.clone(),
    });

    let response = self
      .client
      .post(&self.url)
      .basic_auth(&self.user, Some(&self.pass))
      .json(&body)
      .send()
      .map_err(|source| RpcError::Unreachable { source })?;

    let response = response
      .json::<JsonResponse<T>>()
      .map_err(|err| RpcError::Malformed {
        method: method.into(),
        message: err.to_string(),
      })?;

    if let Some(JsonError { code, message }) = response.error {
      return Err(RpcError::Node {
        method: method.into(),
        params,
        message: format!("{message} (code {code})"),
      });
    }

    response.result.ok_or_else(|| RpcError::Malformed {
      method: method.into(),
      message: "missing result".into(),
    })
  }
}

impl Api for RpcClient {
  /// Verbose fetch with a fallback ladder: some nodes take the verbosity as
  /// a number, some as a boolean, and some not at all, in which case the raw
  /// hex is decoded locally.
  fn get_raw_transaction(&self, txid: Txid) -> Result<Transaction, RpcError> {
    match self.call("getrawtransaction", json!([txid, 1])) {
      Ok(transaction) => Ok(transaction),
      Err(RpcError::Node { .. }) => match self.call("getrawtransaction", json!([txid, true])) {
        Ok(transaction) => Ok(transaction),
        Err(RpcError::Node { .. }) => {
          let raw: String = self.call("getrawtransaction", json!([txid]))?;

          let raw = hex::decode(&raw).map_err(|err| RpcError::Malformed {
            method: "getrawtransaction".into(),
            message: err.to_string(),
          })?;

          Transaction::from_raw(txid, &raw).map_err(|err| RpcError::Malformed {
            method: "getrawtransaction".into(),
            message: err.to_string(),
          })
        }
        Err(err) => Err(err),
      },
      Err(err) => Err(err),
    }
  }

  fn get_block_hash(&self, height: u64) -> Result<String, RpcError> {
    self.call("getblockhash", json!([height]))
  }

  fn get_block_header(&self, hash: &str) -> Result<BlockHeader, RpcError> {
    self.call("getblock", json!([hash]))
  }

  fn get_block(&self, hash: &str) -> Result<Block, RpcError> {
    self.call("getblock", json!([hash, 2]))
  }
}
