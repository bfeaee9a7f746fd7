use crate::{cli::*, handlers::*, types::*};
use anyhow::Result;
use colored::Colorize;
use reedline::{Reedline, Signal};
use std::net::TcpStream;

pub fn songcast_prompt(
    stream: &TcpStream,
    buffer: &SharedBuffer,
    sink: &rodio::Sink,
    editor: &mut Reedline,
) -> Result<Flow> {
    let prompt = SongcastPrompt::for_buffer(buffer);

    let input = match editor.read_line(&prompt) {
        Ok(Signal::Success(line)) => line,
        Ok(Signal::CtrlC) => {
            println!("{}", "Use CtrlD or type quit to exit.".yellow().bold());
            return Ok(Flow::Continue);
        }
        Ok(Signal::CtrlD) => {
            println!("{}", "Exiting...".green());
            return Ok(Flow::Exit);
        }
        #[allow(unreachable_patterns)]
        Ok(_) => return Ok(Flow::Continue),
        Err(e) => return Err(e.into()),
    };

    let result = match parse_command(&input) {
        Ok(UserCommand::List) => handle_list(stream),
        Ok(UserCommand::Play(target)) => handle_play(stream, buffer, sink, &target),
        Ok(UserCommand::Stop) => handle_stop(stream, buffer, sink),
        Ok(UserCommand::Help) => {
            print_help();
            Ok(())
        }
        Ok(UserCommand::Quit) => {
            println!("{}", "Exiting...".green());
            return Ok(Flow::Exit);
        }
        Err(ParseError::Empty) => Ok(()),
        Err(e) => {
            println!("{}", e.to_string().red());
            print_help();
            Ok(())
        }
    };

    if let Err(e) = result {
        println!("{} {}", "Command failed:".red(), e);
    }
    Ok(Flow::Continue)
}
