//! Subcommand implementations on top of [`Session`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use posekit_core::{clip_to_json, Config, Session};

use crate::input;

/// Load the model plus any extra animation files into a fresh session.
pub fn open_session(model: &Path, imports: &[PathBuf], cfg: Config) -> Result<Session> {
    let loaded = input::load_model(model)?;
    let mut session = Session::new(cfg);
    session.load_model(&input::file_name(model), loaded.skeleton, loaded.clips);
    for path in imports {
        let clips = input::load_clips(path)?;
        tracing::info!("Imported {} clips from {:?}", clips.len(), path);
        session.import_clips(clips);
    }
    Ok(session)
}

/// Text listing of bones and clips.
pub fn inspect(session: &Session) -> String {
    let mut out = String::new();
    out.push_str("Bones:\n");
    if let Some(skeleton) = session.skeleton() {
        for bone in skeleton.bones() {
            let r = bone.rotation;
            out.push_str(&format!(
                "  {:<24} x={:+.4} y={:+.4} z={:+.4}\n",
                bone.name, r.x, r.y, r.z
            ));
        }
    }
    out.push_str("Clips:\n");
    for (_, clip) in session.clips() {
        out.push_str(&format!(
            "  {:<24} {:>8.3}s  {} tracks\n",
            clip.name,
            clip.duration,
            clip.tracks.len()
        ));
    }
    out
}

/// Select clips by name in order and combine them; returns the combined clip as JSON.
pub fn combine(session: &mut Session, names: &[String]) -> Result<String> {
    for name in names {
        let Some(id) = session.find_clip(name) else {
            let available: Vec<_> = session.clips().map(|(_, c)| c.name.clone()).collect();
            bail!(
                "Clip '{}' not found. Available clips: {:?}",
                name,
                available
            );
        };
        session.add_to_selection(id)?;
    }
    let Some(id) = session.combine_selection() else {
        bail!(
            "Need at least {} clips to combine, got {}",
            session.config().min_combine.max(2),
            names.len()
        );
    };
    let clip = session.clip(id).context("combined clip missing from session")?;
    Ok(clip_to_json(clip)?)
}

/// Pose from `clip` at `time` (if given), then export. Returns (file name, text).
pub fn export(
    session: &mut Session,
    clip: Option<&str>,
    time: Option<f32>,
    name: Option<&str>,
) -> Result<(String, String)> {
    if let Some(clip_name) = clip {
        let id = session
            .find_clip(clip_name)
            .with_context(|| format!("Clip '{}' not found", clip_name))?;
        let t = time.unwrap_or(session.config().pose_sample_time);
        let posed = session.pose_at(id, t)?;
        tracing::info!("Posed {} nodes from '{}' at {:.3}s", posed, clip_name, t);
    }
    if let Some(name) = name {
        session.set_model_name(name);
    }
    let Some(doc) = session.export_pose() else {
        bail!("No skeleton loaded");
    };
    Ok((doc.file_name(), doc.text().to_string()))
}

/// Write `contents` to `dir/file_name` (creating `dir`), or to stdout without a dir.
pub fn deliver(dir: Option<&Path>, file_name: &str, contents: &str) -> Result<Option<PathBuf>> {
    let Some(dir) = dir else {
        print!("{contents}");
        return Ok(None);
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(file_name);
    fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(Some(path))
}
