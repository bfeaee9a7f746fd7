use std::sync::Arc;
use tabled::Tabled;

mod buffer;
pub use buffer::*;

mod linereader;
pub use linereader::*;

mod highlighter;
pub use highlighter::*;

pub type RodioSink = Arc<rodio::Sink>;

/// What the prompt loop should do after a command.
#[derive(PartialEq, Debug)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Tabled)]
pub struct SongTable {
    #[tabled(rename = "#")]
    pub index: usize,

    #[tabled(rename = "Song")]
    pub name: String,
}
