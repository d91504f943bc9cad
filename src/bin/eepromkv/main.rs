use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

use eepromkv::StoreError;

mod cli;
mod util;
mod cmd_init;
mod cmd_usage;
mod cmd_get;
mod cmd_set;
mod cmd_json;
mod cmd_dump;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт - info.
    // Пример: RUST_LOG=debug ./eepromkv get --image ./nv.img --layout ./layout.json --key heat
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        match e.downcast_ref::<StoreError>() {
            Some(se) => error!("[{}] {:#}", se.kind_name(), e),
            None => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Init { image, capacity } =>
            cmd_init::exec(image, capacity),

        cli::Cmd::Usage { image, layout, json } =>
            cmd_usage::exec(image, layout, json),

        cli::Cmd::Get { image, layout, key } =>
            cmd_get::exec(image, layout, key),

        cli::Cmd::Set { image, layout, key, value } =>
            cmd_set::exec(image, layout, key, value),

        cli::Cmd::GetJson { image, key, layout } =>
            cmd_json::exec_get(image, key, layout),

        cli::Cmd::SetJson { image, key, json, layout } =>
            cmd_json::exec_set(image, key, json, layout),

        cli::Cmd::Dump { image, json } =>
            cmd_dump::exec(image, json),
    }
}
