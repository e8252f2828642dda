//! Session state: the loaded rig, the available clips, the combination
//! selection and the last export.
//!
//! Methods:
//! - load_model, import_clips (clip set)
//! - add_to_selection, combine_selection (combiner)
//! - play, advance, pose_at (posing)
//! - export_pose (serializer)

use log::{debug, info};

use crate::combine::combine_with_config;
use crate::config::Config;
use crate::data::Clip;
use crate::error::{CoreError, Result};
use crate::ids::{ClipId, IdAllocator};
use crate::pose::{export_pose, ExportDocument};
use crate::quantize::Quantizer;
use crate::sampling::sample_pose;
use crate::skeleton::Skeleton;

/// Available clips in insertion order.
#[derive(Default, Debug)]
struct ClipLib {
    items: Vec<(ClipId, Clip)>,
}

impl ClipLib {
    fn insert(&mut self, id: ClipId, clip: Clip) {
        self.items.push((id, clip));
    }
    fn get(&self, id: ClipId) -> Option<&Clip> {
        self.items
            .iter()
            .find_map(|(a, c)| if *a == id { Some(c) } else { None })
    }
    fn clear(&mut self) {
        self.items.clear();
    }
}

/// Playback cursor of the clip currently driving the skeleton.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playback {
    pub clip: ClipId,
    pub time: f32,
}

/// Strip a model file extension to get the export base name.
pub fn export_base_name(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    for ext in [".glb", ".gltf", ".json"] {
        if lower.ends_with(ext) {
            return &file_name[..file_name.len() - ext.len()];
        }
    }
    file_name
}

#[derive(Debug, Default)]
pub struct Session {
    cfg: Config,
    ids: IdAllocator,
    model_name: String,
    skeleton: Option<Skeleton>,
    clips: ClipLib,
    selection: Vec<ClipId>,
    playback: Option<Playback>,
    export: Option<ExportDocument>,
}

impl Session {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replace the rig and the available clips with a freshly imported model.
    /// Selection, playback and the previous export are dropped.
    pub fn load_model(
        &mut self,
        file_name: &str,
        skeleton: Skeleton,
        clips: Vec<Clip>,
    ) -> Vec<ClipId> {
        self.model_name = export_base_name(file_name).to_string();
        info!(
            "loaded model '{}' ({} bones, {} clips)",
            self.model_name,
            skeleton.bone_count(),
            clips.len()
        );
        self.skeleton = Some(skeleton);
        self.clips.clear();
        self.selection.clear();
        self.playback = None;
        self.export = None;
        self.import_clips(clips)
    }

    /// Append clips from an additional animation file.
    pub fn import_clips(&mut self, clips: Vec<Clip>) -> Vec<ClipId> {
        clips
            .into_iter()
            .map(|clip| {
                let id = self.ids.alloc_clip();
                debug!("registered clip '{}' as {:?}", clip.name, id);
                self.clips.insert(id, clip);
                id
            })
            .collect()
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Override the export base name (defaults to the model file stem).
    pub fn set_model_name(&mut self, name: impl Into<String>) {
        self.model_name = name.into();
    }

    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    pub fn clips(&self) -> impl Iterator<Item = (ClipId, &Clip)> {
        self.clips.items.iter().map(|(id, c)| (*id, c))
    }

    pub fn clip_count(&self) -> usize {
        self.clips.items.len()
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.get(id)
    }

    /// First clip with the given name.
    pub fn find_clip(&self, name: &str) -> Option<ClipId> {
        self.clips
            .items
            .iter()
            .find_map(|(id, c)| (c.name == name).then_some(*id))
    }

    /// Append a clip to the combination selection. Duplicates are allowed.
    pub fn add_to_selection(&mut self, id: ClipId) -> Result<()> {
        if self.clips.get(id).is_none() {
            return Err(CoreError::UnknownClip { id });
        }
        self.selection.push(id);
        Ok(())
    }

    pub fn selection(&self) -> &[ClipId] {
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Combine the selection in order. On success the new clip is appended to
    /// the available set and the selection is cleared; otherwise nothing changes.
    pub fn combine_selection(&mut self) -> Option<ClipId> {
        let clips: Vec<&Clip> = self
            .selection
            .iter()
            .filter_map(|id| self.clips.get(*id))
            .collect();
        let combined = combine_with_config(&clips, &self.cfg)?;
        let id = self.ids.alloc_clip();
        info!(
            "combined {} clips into '{}' ({:.3}s) as {:?}",
            self.selection.len(),
            combined.name,
            combined.duration,
            id
        );
        self.clips.insert(id, combined);
        self.selection.clear();
        Some(id)
    }

    /// Start driving the skeleton with `id` from time 0.
    pub fn play(&mut self, id: ClipId) -> Result<()> {
        if self.clips.get(id).is_none() {
            return Err(CoreError::UnknownClip { id });
        }
        self.playback = Some(Playback { clip: id, time: 0.0 });
        self.apply_playback();
        Ok(())
    }

    pub fn stop(&mut self) {
        self.playback = None;
    }

    pub fn playback(&self) -> Option<Playback> {
        self.playback
    }

    /// Per-frame tick: move playback forward by `dt` seconds and re-pose.
    pub fn advance(&mut self, dt: f32) {
        if let Some(pb) = self.playback.as_mut() {
            pb.time += dt;
        }
        self.apply_playback();
    }

    /// Pose the skeleton with `id` at `time` without touching playback state.
    pub fn pose_at(&mut self, id: ClipId, time: f32) -> Result<usize> {
        let clip = self.clips.get(id).ok_or(CoreError::UnknownClip { id })?;
        Ok(match self.skeleton.as_mut() {
            Some(skeleton) => sample_pose(skeleton, clip, time, self.cfg.loop_mode),
            None => 0,
        })
    }

    fn apply_playback(&mut self) {
        let (Some(pb), Some(skeleton)) = (self.playback, self.skeleton.as_mut()) else {
            return;
        };
        if let Some(clip) = self.clips.get(pb.clip) {
            sample_pose(skeleton, clip, pb.time, self.cfg.loop_mode);
        }
    }

    /// Regenerate the export from the current pose. `None` without a skeleton.
    pub fn export_pose(&mut self) -> Option<&ExportDocument> {
        let quantizer = Quantizer::from_config(&self.cfg);
        self.export = export_pose(self.skeleton.as_ref(), &self.model_name, &quantizer);
        self.export.as_ref()
    }

    pub fn export(&self) -> Option<&ExportDocument> {
        self.export.as_ref()
    }
}
