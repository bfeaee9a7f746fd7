/// One line of a catalog listing.
#[derive(PartialEq, Clone, Debug, Eq)]
pub struct SongEntry {
    pub index: usize,
    pub name: String,
}

impl SongEntry {
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
        }
    }
}

/// Render entries as the MP3S payload: `"<index>: <name>"` lines joined by `\n`.
pub fn format_listing(entries: &[SongEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {}", e.index, e.name))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Parse an MP3S payload. Lines that do not match the format are skipped.
pub fn parse_listing(text: &str) -> Vec<SongEntry> {
    text.lines()
        .filter_map(|line| {
            let (index, name) = line.split_once(": ")?;
            Some(SongEntry {
                index: index.trim().parse().ok()?,
                name: name.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_listing() {
        let entries = vec![SongEntry::new(0, "a.mp3"), SongEntry::new(1, "b c.mp3")];
        assert_eq!(format_listing(&entries), "0: a.mp3\n1: b c.mp3");
    }

    #[test]
    fn test_parse_listing_keeps_colons_in_names() {
        let entries = parse_listing("0: intro.mp3\n1: live: encore.mp3");
        assert_eq!(entries[1], SongEntry::new(1, "live: encore.mp3"));
    }

    #[test]
    fn test_parse_listing_skips_junk() {
        let entries = parse_listing("0: a.mp3\nnot a song\nx: b.mp3\n");
        assert_eq!(entries, vec![SongEntry::new(0, "a.mp3")]);
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(format_listing(&[]), "");
        assert!(parse_listing("").is_empty());
    }
}
