use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::locale::Lang;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mrt-history-server",
    author,
    version,
    about = "Serve the rail network as it was in any given month",
    long_about = "Loads the snapshot corpus once at startup, validates every snapshot, \
                  and serves /{lang}/history/{year}/{month} from the in-memory store."
)]
pub struct Config {
    /// Directory holding one JSON document per snapshot
    #[arg(long, env = "MRT_CORPUS_DIR", default_value = "data/snapshots")]
    pub corpus: PathBuf,

    /// Address to listen on
    #[arg(long, env = "MRT_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Language used when a URL has no language segment
    #[arg(long, env = "MRT_DEFAULT_LANG", default_value = "en")]
    pub default_lang: Lang,
}
