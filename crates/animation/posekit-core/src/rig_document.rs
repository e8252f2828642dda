use serde::{Deserialize, Serialize};

use crate::data::{Clip, Track};
use crate::error::Result;
use crate::skeleton::{Node, Skeleton};

/// A rig plus its clips, as stored in JSON fixtures and CLI files.
#[derive(Clone, Debug, PartialEq)]
pub struct RigDocument {
    pub name: Option<String>,
    pub skeleton: Option<Skeleton>,
    pub clips: Vec<Clip>,
}

/// Public API: parse rig-document JSON into core types.
///
/// Notes:
/// - `skeleton` is a node tree (`name`, `isBone`, `rotation {x,y,z}`, `children`).
/// - Clip `duration` is optional; when missing it is the latest sample time.
/// - Every track is validated (times/values correspondence, ordering) and every
///   clip duration must cover its samples.
pub fn parse_rig_document_json(s: &str) -> Result<RigDocument> {
    let raw: RawDocument = serde_json::from_str(s)?;

    let mut clips = Vec::with_capacity(raw.clips.len());
    for rc in raw.clips {
        let clip = match rc.duration {
            Some(duration) => Clip::new(rc.name, duration, rc.tracks),
            None => Clip::from_tracks(rc.name, rc.tracks),
        };
        clip.validate()?;
        clips.push(clip);
    }

    Ok(RigDocument {
        name: raw.name,
        skeleton: raw.skeleton.map(Skeleton::new),
        clips,
    })
}

/// Parse a single clip object (the shape written by [`clip_to_json`]).
pub fn parse_clip_json(s: &str) -> Result<Clip> {
    let rc: RawClip = serde_json::from_str(s)?;
    let clip = match rc.duration {
        Some(duration) => Clip::new(rc.name, duration, rc.tracks),
        None => Clip::from_tracks(rc.name, rc.tracks),
    };
    clip.validate()?;
    Ok(clip)
}

/// Pretty JSON for one clip.
pub fn clip_to_json(clip: &Clip) -> Result<String> {
    Ok(serde_json::to_string_pretty(clip)?)
}

/// Pretty JSON for a whole document.
pub fn rig_document_to_json(doc: &RigDocument) -> Result<String> {
    let raw = RawDocumentRef {
        name: doc.name.as_deref(),
        skeleton: doc.skeleton.as_ref().map(|s| &s.root),
        clips: &doc.clips,
    };
    Ok(serde_json::to_string_pretty(&raw)?)
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    skeleton: Option<Node>,
    #[serde(default)]
    clips: Vec<RawClip>,
}

#[derive(Debug, Deserialize)]
struct RawClip {
    name: String,
    #[serde(default)]
    duration: Option<f32>,
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Serialize)]
struct RawDocumentRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skeleton: Option<&'a Node>,
    clips: &'a [Clip],
}
