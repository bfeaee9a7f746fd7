use anyhow::Context;
use songcast_protocol::{SongEntry, Tag, encode_parts, format_listing};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Position of a song in load order.
#[derive(PartialEq, Clone, Copy, Debug, Eq, Hash)]
pub struct SongId(usize);

impl SongId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct Song {
    pub name: String,
    chunks: Vec<Vec<u8>>,
}

impl Song {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

#[derive(PartialEq, Debug, Eq)]
pub enum Chunk<'a> {
    Data(&'a [u8]),
    EndOfSong,
    InvalidSong,
}

/// Songs loaded once at startup, pre-split into chunks. Read-only afterwards.
#[derive(Debug)]
pub struct Catalog {
    songs: Vec<Song>,
    by_name: HashMap<String, SongId>,
    extension: Option<String>,
}

impl Catalog {
    /// Read every file in `dir` whose extension is in `extensions`, sorted by
    /// file name, and split each into `chunk_size` byte chunks.
    pub fn load(dir: &Path, extensions: &[String], chunk_size: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(chunk_size > 0, "chunk size must be positive");

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(e).with_context(|| format!("scanning {}", dir.display()));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(ext) = path.extension().and_then(|s| s.to_str())
                && extensions.iter().any(|want| want.eq_ignore_ascii_case(ext))
            {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();

        tracing::info!("Found {} songs in {}.", paths.len(), dir.display());

        let mut songs = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let data = std::fs::read(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            songs.push((name, data));
        }

        let mut catalog = Self::from_songs(songs, chunk_size);
        catalog.extension = extensions.first().cloned();
        for song in &catalog.songs {
            tracing::info!("Chunked {} into {} chunks", song.name, song.chunk_count());
        }
        Ok(catalog)
    }

    pub fn from_songs(songs: impl IntoIterator<Item = (String, Vec<u8>)>, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let mut catalog = Catalog {
            songs: Vec::new(),
            by_name: HashMap::new(),
            extension: None,
        };
        for (name, data) in songs {
            if !is_sendable_name(&name) {
                tracing::warn!("Skipping {name:?}: name cannot be carried in a frame or listing");
                continue;
            }
            if catalog.by_name.contains_key(&name) {
                tracing::warn!("Skipping duplicate song name {name}");
                continue;
            }
            let chunks = data.chunks(chunk_size).map(<[u8]>::to_vec).collect();
            catalog
                .by_name
                .insert(name.clone(), SongId(catalog.songs.len()));
            catalog.songs.push(Song { name, chunks });
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn list(&self) -> Vec<SongEntry> {
        self.songs
            .iter()
            .enumerate()
            .map(|(i, song)| SongEntry::new(i, &song.name))
            .collect()
    }

    /// The MP3S payload for this catalog.
    pub fn listing(&self) -> String {
        format_listing(&self.list())
    }

    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.songs.get(id.0)
    }

    pub fn name(&self, id: SongId) -> Option<&str> {
        self.song(id).map(|s| s.name.as_str())
    }

    pub fn chunk(&self, id: SongId, index: usize) -> Chunk<'_> {
        match self.song(id) {
            None => Chunk::InvalidSong,
            Some(song) => match song.chunks.get(index) {
                Some(data) => Chunk::Data(data),
                None => Chunk::EndOfSong,
            },
        }
    }

    /// Look up a song by index, exact name, or name without its extension.
    pub fn resolve(&self, target: &str) -> Option<SongId> {
        let target = target.trim();
        if let Ok(index) = target.parse::<usize>() {
            return (index < self.songs.len()).then_some(SongId(index));
        }
        if let Some(id) = self.by_name.get(target) {
            return Some(*id);
        }
        let ext = self.extension.as_deref()?;
        self.by_name.get(&format!("{target}.{ext}")).copied()
    }
}

/// DATA and FINI carry the name as the secondary field, and MP3S lists one
/// name per line.
fn is_sendable_name(name: &str) -> bool {
    !name.contains('\n') && encode_parts(Tag::Data, name, &[]).is_ok()
}
