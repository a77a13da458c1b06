mod dispatch;

use anyhow::{Context, Result};
use clap::Parser;
use dispatch::{HandlerKind, Phase};
use orgflow_cloud_aws::AwsContext;
use orgflow_config::{HandlerConfig, LogFormat};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orgflow-handler")]
#[command(version, about = "アカウント単位のリソースを begin/poll で払い出すハンドラ", long_about = None)]
struct Cli {
    /// 実行するハンドラ (account, delegation, email)
    #[arg(long, value_enum, required_unless_present = "list_accounts")]
    handler: Option<HandlerKind>,

    /// フェーズ (on-event: 開始, is-complete: 完了確認)
    #[arg(long, value_enum, default_value = "on-event")]
    phase: Phase,

    /// イベント JSON ファイル (省略時は標準入力から読む)
    #[arg(long)]
    event: Option<PathBuf>,

    /// 設定ファイルのパス
    #[arg(long, env = "ORGFLOW_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Organizations のアカウント一覧を JSON で出力
    #[arg(long, conflicts_with_all = ["handler", "event"])]
    list_accounts: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = HandlerConfig::load(cli.config.as_deref())?;
    init_tracing(&config);

    let result = run(&cli, &config).await;
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

async fn run(cli: &Cli, config: &HandlerConfig) -> Result<()> {
    // AWS クライアントは呼び出しごとに作り直す
    let context = AwsContext::load(config.region.as_deref()).await;

    let output = if cli.list_accounts {
        dispatch::list_accounts(&context).await?
    } else {
        let kind = cli.handler.context("--handler is required")?;
        let event = read_event(cli.event.as_deref())?;
        dispatch::dispatch(&context, kind, cli.phase, &config.settings(), &event).await?
    };

    // stdout にはレスポンス JSON だけを書く
    println!("{}", output);
    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(config: &HandlerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn read_event(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            Ok(buf)
        }
    }
}
