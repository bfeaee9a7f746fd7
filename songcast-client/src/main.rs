use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use reedline::Reedline;
use rodio::{OutputStream, Sink};
use std::{
    net::TcpStream,
    process::exit,
    sync::Arc,
};
use tracing_subscriber::EnvFilter;

mod cli;
mod handlers;
mod helpers;
mod player;
mod threads;
mod types;
use types::*;


#[derive(Parser)]
#[command(name = "songcast-client", about = "Interactive client for a songcast server")]
struct Args {
    /// Server host name or address
    host: String,

    /// Server port
    port: u16,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let Ok(stream) = TcpStream::connect((args.host.as_str(), args.port)) else {
        println!(
            "{}",
            format!("Could not connect to {}:{}", args.host, args.port).red()
        );
        exit(1);
    };
    if let Err(e) = stream.set_nodelay(true) {
        tracing::warn!("Could not set TCP_NODELAY: {e}");
    }
    println!("{} {}:{}", "Connected to".green(), args.host, args.port);

    let (_output_stream, stream_handle) =
        OutputStream::try_default().context("opening audio output")?;
    let sink: RodioSink = Arc::new(Sink::try_new(&stream_handle).context("creating audio sink")?);
    let buffer = Arc::new(SharedBuffer::new());

    threads::server_interface(stream.try_clone()?, buffer.clone());
    threads::player(buffer.clone(), sink.clone());

    let mut editor =
        Reedline::create().with_highlighter(Box::new(SongcastHighlighter::new()));
    handlers::print_help();

    loop {
        match helpers::songcast_prompt(&stream, &buffer, &sink, &mut editor) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => {
                tracing::error!("Prompt failed: {e:#}");
                break;
            }
        }
    }

    sink.stop();
    buffer.update(PlaybackBuffer::close);
    Ok(())
}
