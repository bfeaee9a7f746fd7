use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

pub struct SongcastHighlighter {
    pub commands: Vec<&'static str>,
    pub takes_parameters: Vec<&'static str>,
}

impl SongcastHighlighter {
    pub fn new() -> Self {
        Self {
            commands: vec![
                "exit", "h", "help", "l", "list", "p", "play", "q", "quit", "s", "stop",
            ],
            takes_parameters: vec!["p", "play"],
        }
    }
}

impl Highlighter for SongcastHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut out = StyledText::new();
        let command = line.split_whitespace().next().unwrap_or("");

        for (i, chunk) in line.split_inclusive(' ').enumerate() {
            let trimmed = chunk.trim_end();

            let style = if i == 0 {
                if self.commands.contains(&trimmed) {
                    Style::new().fg(Color::Blue).bold()
                } else {
                    Style::new().fg(Color::Red)
                }
            } else if self.takes_parameters.contains(&command) {
                Style::new().fg(Color::White).bold()
            } else {
                Style::new().fg(Color::DarkGray).italic()
            };
            out.push((style, chunk.to_string()));
        }
        out
    }
}
