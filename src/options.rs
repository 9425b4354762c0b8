use super::*;

#[derive(Clone, Default, Debug, Parser)]
pub struct Options {
  #[arg(long, help = "Send node RPC requests to <RPC_URL>. Overrides NODE_RPC_URL.")]
  pub(crate) rpc_url: Option<String>,
  #[arg(long, help = "Authenticate to the node as <RPC_USER>. Overrides NODE_RPC_USER.")]
  pub(crate) rpc_user: Option<String>,
  #[arg(long, help = "Authenticate to the node with <RPC_PASS>. Overrides NODE_RPC_PASS.")]
  pub(crate) rpc_pass: Option<String>,
  #[arg(long, help = "Write decoded artifacts to <CONTENT_DIR>. [default: ./content]")]
  pub(crate) content_dir: Option<PathBuf>,
  #[arg(long, help = "Scan at most <SCAN_DEPTH> blocks for each spender. [default: 2000]")]
  pub(crate) scan_depth: Option<u64>,
  #[arg(
    long,
    help = "Pause <SCAN_PAUSE> milliseconds between block fetches. [default: 1000]"
  )]
  pub(crate) scan_pause: Option<u64>,
}
