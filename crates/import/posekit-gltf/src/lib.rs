//! glTF/GLB loader for posekit.
//!
//! Reads the node hierarchy of a model into a [`Skeleton`] (skin joints become
//! bones) and every glTF animation into a [`Clip`]. Image data is never decoded.

use std::path::Path;

use hashbrown::HashSet;
use log::{debug, warn};

use gltf::animation::util::ReadOutputs;
use gltf::animation::Interpolation as GltfInterpolation;

use posekit_core::{
    quat_to_euler_xyz, Clip, CoreError, Interpolation, Node, Skeleton, Track, TrackProperty,
};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ImportError {
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Model has no scene")]
    NoScene,

    #[error("Animation '{animation}' channel {channel} has no readable sampler data")]
    MissingSamplerData { animation: String, channel: usize },

    #[error("Animation '{animation}': {source}")]
    Track {
        animation: String,
        #[source]
        source: CoreError,
    },
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Skeleton and clips read from one model file.
#[derive(Clone, Debug)]
pub struct ImportedModel {
    pub skeleton: Skeleton,
    pub clips: Vec<Clip>,
}

/// Make a name safe for track binding: whitespace becomes `_`, `[ ] . : /` are dropped.
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | '.' | ':' | '/'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn node_name(node: &gltf::Node) -> String {
    match node.name() {
        Some(name) if !name.is_empty() => sanitize_node_name(name),
        _ => format!("Node_{}", node.index()),
    }
}

/// Load a `.glb` or self-contained `.gltf` from memory.
pub fn load_model_slice(bytes: &[u8]) -> Result<ImportedModel> {
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&gltf.document, None, gltf.blob)?;
    build_model(&gltf.document, &buffers)
}

/// Load a model from disk; external buffers resolve relative to the file.
pub fn load_model_path(path: &Path) -> Result<ImportedModel> {
    let gltf = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&gltf.document, path.parent(), gltf.blob)?;
    build_model(&gltf.document, &buffers)
}

/// Load only the clips of a model (used for additional animation files).
pub fn load_clips_slice(bytes: &[u8]) -> Result<Vec<Clip>> {
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&gltf.document, None, gltf.blob)?;
    read_clips(&gltf.document, &buffers)
}

fn build_model(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<ImportedModel> {
    let skeleton = read_skeleton(document)?;
    let clips = read_clips(document, buffers)?;
    debug!(
        "imported model: {} bones, {} clips",
        skeleton.bone_count(),
        clips.len()
    );
    Ok(ImportedModel { skeleton, clips })
}

/// Build the node tree of the default (or first) scene under an unnamed root.
pub fn read_skeleton(document: &gltf::Document) -> Result<Skeleton> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(ImportError::NoScene)?;

    let joints: HashSet<usize> = document
        .skins()
        .flat_map(|skin| skin.joints().map(|j| j.index()))
        .collect();

    let mut root = Node::group("");
    root.children = scene.nodes().map(|n| convert_node(&n, &joints)).collect();
    Ok(Skeleton::new(root))
}

fn convert_node(node: &gltf::Node, joints: &HashSet<usize>) -> Node {
    let (translation, rotation, scale) = node.transform().decomposed();
    let mut out = if joints.contains(&node.index()) {
        Node::bone(node_name(node))
    } else {
        Node::group(node_name(node))
    };
    out.position = translation.map(f64::from);
    out.rotation = quat_to_euler_xyz(rotation);
    out.scale = scale.map(f64::from);
    out.children = node.children().map(|c| convert_node(&c, joints)).collect();
    out
}

/// Convert every animation into a clip whose duration is its latest sample time.
pub fn read_clips(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<Vec<Clip>> {
    let mut clips = Vec::new();
    for anim in document.animations() {
        let name = anim
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("animation_{}", anim.index()));

        let mut tracks = Vec::new();
        for (ci, channel) in anim.channels().enumerate() {
            let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
            let target = channel.target();
            let missing = || ImportError::MissingSamplerData {
                animation: name.clone(),
                channel: ci,
            };

            let times: Vec<f32> = reader.read_inputs().ok_or_else(missing)?.collect();
            let outputs = reader.read_outputs().ok_or_else(missing)?;

            let (property, values): (TrackProperty, Vec<f32>) = match outputs {
                ReadOutputs::Translations(iter) => {
                    (TrackProperty::Position, iter.flatten().collect())
                }
                ReadOutputs::Rotations(iter) => {
                    (TrackProperty::Rotation, iter.into_f32().flatten().collect())
                }
                ReadOutputs::Scales(iter) => (TrackProperty::Scale, iter.flatten().collect()),
                ReadOutputs::MorphTargetWeights(_) => {
                    warn!("animation '{}': skipping morph-weight channel {}", name, ci);
                    continue;
                }
            };

            let interpolation = match channel.sampler().interpolation() {
                GltfInterpolation::Linear => Interpolation::Linear,
                GltfInterpolation::Step => Interpolation::Step,
                GltfInterpolation::CubicSpline => Interpolation::CubicSpline,
            };

            let track = Track::new(node_name(&target.node()), property, times, values)
                .with_interpolation(interpolation);
            track.validate().map_err(|source| ImportError::Track {
                animation: name.clone(),
                source,
            })?;
            tracks.push(track);
        }

        let clip = Clip::from_tracks(name, tracks);
        debug!(
            "read clip '{}' ({} tracks, {:.3}s)",
            clip.name,
            clip.tracks.len(),
            clip.duration
        );
        clips.push(clip);
    }
    Ok(clips)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_matches_binding_rules() {
        assert_eq!(sanitize_node_name("Upper Arm"), "Upper_Arm");
        assert_eq!(sanitize_node_name("Hand.L"), "HandL");
        assert_eq!(sanitize_node_name("mixamorig:Hips"), "mixamorigHips");
        assert_eq!(sanitize_node_name("a/b[0]"), "ab0");
    }
}
