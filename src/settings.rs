use super::*;

#[derive(Debug, Clone)]
pub struct Settings {
  pub(crate) rpc_url: String,
  pub(crate) rpc_user: String,
  pub(crate) rpc_pass: String,
  pub(crate) content_dir: PathBuf,
  pub(crate) scan_depth: u64,
  pub(crate) scan_pause: Duration,
}

impl Settings {
  pub fn load(options: Options) -> Result<Self> {
    Self::new(options, env::vars().collect())
  }

  /// Flags beat environment variables. The RPC endpoint and credentials have
  /// no defaults; refusing to start beats decoding against the wrong node.
  pub fn new(options: Options, env: BTreeMap<String, String>) -> Result<Self> {
    let Some(rpc_url) = Self::setting(&env, options.rpc_url, "NODE_RPC_URL") else {
      bail!("NODE_RPC_URL is not set: export the node RPC endpoint or pass --rpc-url");
    };

    let Some(rpc_user) = Self::setting(&env, options.rpc_user, "NODE_RPC_USER") else {
      bail!("NODE_RPC_USER is not set: export the node RPC username or pass --rpc-user");
    };

    let Some(rpc_pass) = Self::setting(&env, options.rpc_pass, "NODE_RPC_PASS") else {
      bail!("NODE_RPC_PASS is not set: export the node RPC password or pass --rpc-pass");
    };

    Ok(Self {
      rpc_url,
      rpc_user,
      rpc_pass,
      content_dir: options.content_dir.unwrap_or_else(|| "content".into()),
      scan_depth: options.scan_depth.unwrap_or(2000),
      scan_pause: Duration::from_millis(options.scan_pause.unwrap_or(1000)),
    })
  }

  fn setting(env: &BTreeMap<String, String>, arg: Option<String>, key: &str) -> Option<String> {
    arg.or_else(|| env.get(key).cloned())
  }
}
