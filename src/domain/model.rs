use std::collections::BTreeMap;
use std::collections::HashMap;

/// A release as normalized from the Discogs API: flat, immutable, built once
/// per request and discarded after the response is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub artist: String,
    pub title: String,
    pub tracks: Vec<Track>,
    pub cover_art_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Original position string from Discogs (e.g. "1-1", "A1", "7").
    pub position: String,
    pub title: String,
    /// Duration as Discogs reports it ("m:ss"), empty when unknown.
    pub duration: String,
}

/// A parsed track position. Discogs positions come in three shapes:
/// "disc-track" ("2-5"), lettered LP sides ("A1", "B3"), and plain
/// numerals ("7"). Lettered sides are treated as one disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackPosition {
    pub disc: u32,
    pub track: u32,
    /// Sequential number across discs, used only for ordering. Disc-track
    /// positions reserve 100 slots per disc so discs never interleave.
    pub overall: u32,
}

/// Rolling state for lettered positions: each new letter opens the next
/// slot, repeats of a letter continue the count.
#[derive(Debug, Default)]
pub struct PositionParser {
    letter_counts: HashMap<char, u32>,
}

impl PositionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for rows that are not tracks (section headings such
    /// as "Bonus Tracks" have no parseable position).
    pub fn parse(&mut self, position: &str) -> Option<TrackPosition> {
        let position = position.trim();

        // "disc-track" format
        if let Some((disc_str, track_str)) = position.split_once('-') {
            if let (Ok(disc), Ok(track)) = (disc_str.parse::<u32>(), track_str.parse::<u32>()) {
                return Some(TrackPosition {
                    disc,
                    track,
                    overall: disc.saturating_sub(1) * 100 + track,
                });
            }
        }

        // Lettered LP sides ("A1", "B2"). Vinyl side listings are assumed
        // to describe a single disc.
        if let Some(letter) = position.chars().next().filter(|c| c.is_ascii_alphabetic()) {
            let letter = letter.to_ascii_uppercase();
            let next = self.letter_counts.values().copied().max().unwrap_or(0) + 1;
            let count = self.letter_counts.entry(letter).or_insert(next - 1);
            *count += 1;
            let track = self.letter_counts.values().copied().max().unwrap_or(0);
            return Some(TrackPosition {
                disc: 1,
                track,
                overall: track,
            });
        }

        // Plain numeral, possibly with stray punctuation ("7", "7.")
        let digits: String = position.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u32>() {
            Ok(track) if track > 0 => Some(TrackPosition {
                disc: 1,
                track,
                overall: track,
            }),
            _ => None,
        }
    }
}

/// One physical disc worth of tracks, rendered as its own label face.
#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    pub number: u32,
    pub tracks: Vec<NumberedTrack>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberedTrack {
    pub number: u32,
    pub overall: u32,
    pub title: String,
    pub duration: String,
}

/// Groups a release's tracks by disc, in disc order, with tracks ordered
/// by their overall number. Heading rows are dropped.
pub fn group_into_discs(release: &Release) -> Vec<Disc> {
    let mut parser = PositionParser::new();
    let mut discs: BTreeMap<u32, Vec<NumberedTrack>> = BTreeMap::new();

    for track in &release.tracks {
        let Some(pos) = parser.parse(&track.position) else {
            continue;
        };
        discs.entry(pos.disc).or_default().push(NumberedTrack {
            number: pos.track,
            overall: pos.overall,
            title: track.title.clone(),
            duration: track.duration.clone(),
        });
    }

    discs
        .into_iter()
        .map(|(number, mut tracks)| {
            tracks.sort_by_key(|t| t.overall);
            Disc { number, tracks }
        })
        .collect()
}

/// Decoded cover art, ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Rendering switches. All off by default; brackets in track titles are
/// stripped unless disabled, since Discogs titles often carry remix and
/// credit notes in brackets that do not fit a label column.
#[derive(Debug, Clone)]
pub struct LabelOptions {
    pub alternate_backgrounds: bool,
    pub title_background: bool,
    pub ruler: bool,
    pub strip_brackets: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            alternate_backgrounds: false,
            title_background: false,
            ruler: false,
            strip_brackets: true,
        }
    }
}
