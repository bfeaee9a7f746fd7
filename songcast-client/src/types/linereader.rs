use super::SharedBuffer;
use colored::Colorize;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};
use std::borrow::Cow;

/// Prompt that shows the song currently in the playback buffer on the right.
pub struct SongcastPrompt {
    now_playing: Option<String>,
}

impl SongcastPrompt {
    pub fn new(now_playing: Option<&str>) -> Self {
        Self {
            now_playing: now_playing.map(str::to_string),
        }
    }

    /// Snapshot of `buffer`, taken when the prompt is drawn.
    pub fn for_buffer(buffer: &SharedBuffer) -> Self {
        let buffer = buffer.lock();
        Self::new(if buffer.is_stopped() { None } else { buffer.song() })
    }
}

impl Prompt for SongcastPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned("songcast❯ ".green().bold().to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        match &self.now_playing {
            Some(song) => Cow::Owned(format!("▶ {song}").blue().to_string()),
            None => Cow::Borrowed(""),
        }
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("… ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({prefix}search: {}) ", history_search.term))
    }
}
