//! Model and clip loading by file extension (.glb/.gltf via posekit-gltf, .json rig documents).

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use posekit_core::{parse_rig_document_json, Clip, Config, Node, Skeleton};

/// Skeleton and clips read from one input file.
pub struct LoadedModel {
    pub skeleton: Skeleton,
    pub clips: Vec<Clip>,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

pub fn load_model(path: &Path) -> Result<LoadedModel> {
    match extension(path).as_str() {
        "glb" | "gltf" => {
            let model = posekit_gltf::load_model_path(path)
                .with_context(|| format!("Failed to load glTF: {:?}", path))?;
            Ok(LoadedModel {
                skeleton: model.skeleton,
                clips: model.clips,
            })
        }
        "json" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let doc = parse_rig_document_json(&text)
                .with_context(|| format!("Failed to parse rig document {:?}", path))?;
            Ok(LoadedModel {
                // A clip-only document still yields an (empty) rig.
                skeleton: doc.skeleton.unwrap_or_else(|| Skeleton::new(Node::group(""))),
                clips: doc.clips,
            })
        }
        _ => bail!(
            "Unsupported model format: {:?} (use .glb, .gltf, or .json)",
            path
        ),
    }
}

/// Clips from an additional animation file.
pub fn load_clips(path: &Path) -> Result<Vec<Clip>> {
    Ok(load_model(path)?.clips)
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read config {:?}", path))?;
    Config::from_json_str(&text).with_context(|| format!("Invalid config {:?}", path))
}

/// File name used for the export base name.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("pose")
        .to_string()
}
