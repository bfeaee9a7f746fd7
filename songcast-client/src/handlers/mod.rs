use crate::{helpers, player::AudioOutput, types::*};
use anyhow::Result;
use colored::Colorize;
use songcast_protocol::{Command, encode};
use std::io::Write;

pub fn print_help() {
    println!("{}", "Valid Commands =>".yellow());
    println!("  {}", "list, l         => List songs on the server.".blue());
    println!("  {}", "play, p <song>  => Play a song by index or name.".blue());
    println!("  {}", "stop, s         => Stop playback.".blue());
    println!("  {}", "help, h         => Show this help.".blue());
    println!("  {}", "quit, q, exit   => Exit the player.".blue());
}

pub fn handle_list<W: Write>(writer: W) -> Result<()> {
    helpers::send_to_server(writer, &Command::list())
}

/// Drop whatever is buffered or queued, then ask for `target`. A target that
/// cannot be framed leaves the current song alone.
pub fn handle_play<W, O>(mut writer: W, buffer: &SharedBuffer, output: &O, target: &str) -> Result<()>
where
    W: Write,
    O: AudioOutput + ?Sized,
{
    let frame = encode(&Command::play(target))?;
    buffer.update(PlaybackBuffer::start);
    output.clear();
    writer.write_all(&frame)?;
    writer.flush()?;
    println!("{} {}", "Requested".green(), target.blue());
    Ok(())
}

pub fn handle_stop<W, O>(writer: W, buffer: &SharedBuffer, output: &O) -> Result<()>
where
    W: Write,
    O: AudioOutput + ?Sized,
{
    let sent = helpers::send_to_server(writer, &Command::stop());
    buffer.update(PlaybackBuffer::stop);
    output.clear();
    sent?;
    println!("{}", "Stopped.".green());
    Ok(())
}
