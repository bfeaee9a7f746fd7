use crate::{threads::Notice, types::SongTable};
use colored::Colorize;
use songcast_protocol::*;
use std::io::Write;
use tabled::{Table, settings::Style};

mod prompt;
pub use prompt::*;

/// Encode and write one command. Pass `&TcpStream` for the live connection.
pub fn send_to_server<W: Write>(mut writer: W, command: &Command) -> anyhow::Result<()> {
    write_frame(&mut writer, command)?;
    tracing::debug!("Sent {} {}", command.kind, command.secondary);
    Ok(())
}

pub fn render_listing(entries: &[SongEntry]) -> String {
    Table::new(entries.iter().map(|e| SongTable {
        index: e.index,
        name: e.name.clone(),
    }))
    .with(Style::rounded())
    .to_string()
}

pub fn show_notice(notice: Notice) {
    match notice {
        Notice::Listing(entries) if entries.is_empty() => {
            println!("{}", "No songs available.".yellow());
        }
        Notice::Listing(entries) => println!("{}", render_listing(&entries).yellow()),
        Notice::Error(message) => println!("{} {}", "Server error:".red(), message.red().bold()),
        Notice::Finished(song) => println!("{} {}", "Finished".green(), song.blue()),
    }
}
