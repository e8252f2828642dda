//! Pose serializer: turn the current bone rotations of a skeleton into an
//! animation script for the external playback runtime.
//!
//! Output shape (one instruction per non-zero axis):
//! ```text
//! export const NAME = (ref) => {
//!
//!     let animations = []
//!
//!     animations.push(["Arm", "rotation", "x", Math.PI/2, "+"]);
//!
//!     ref.animations.push(animations);
//!
//!     if(ref.pending === false){
//!         ref.pending = true;
//!         ref.animate();
//!     }
//!
//! }
//! ```

use std::fmt::Write as _;

use log::{debug, warn};

use crate::quantize::{QuantizedAngle, Quantizer};
use crate::skeleton::{Axis, Skeleton};

/// Direction token written next to every value. Derived from the raw angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn of(radian: f64) -> Self {
        if radian >= 0.0 {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }
}

/// One `animations.push([...])` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseInstruction {
    pub bone: String,
    pub axis: Axis,
    pub value: QuantizedAngle,
    pub sign: Sign,
}

impl PoseInstruction {
    /// Only rotation channels are exported.
    pub const PROPERTY: &'static str = "rotation";
}

/// Generated script text plus the instructions it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportDocument {
    name: String,
    text: String,
    instructions: Vec<PoseInstruction>,
}

impl ExportDocument {
    /// Uppercased export identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn instructions(&self) -> &[PoseInstruction] {
        &self.instructions
    }

    /// Download file name, `<NAME>.js`.
    pub fn file_name(&self) -> String {
        format!("{}.js", self.name)
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Depth-first walk of the bones, one instruction per axis outside the zero band.
pub fn collect_instructions(skeleton: &Skeleton, quantizer: &Quantizer) -> Vec<PoseInstruction> {
    let mut out = Vec::new();
    for bone in skeleton.bones() {
        for (axis, radian) in bone.rotation.axes() {
            if !radian.is_finite() {
                warn!(
                    "bone '{}' has non-finite {} rotation; skipped",
                    bone.name,
                    axis.as_str()
                );
                continue;
            }
            let value = quantizer.quantize_angle(radian);
            if value.is_zero() {
                continue;
            }
            out.push(PoseInstruction {
                bone: bone.name.clone(),
                axis,
                value,
                sign: Sign::of(radian),
            });
        }
    }
    out
}

/// Uppercase the export name and make it usable as a script constant:
/// characters outside `[A-Za-z0-9_$]` become `_`, a leading digit gets a `_`
/// prefix and an empty name becomes `_`.
pub fn export_identifier(name: &str) -> String {
    let mut ident: String = name
        .to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

fn escape_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the script text for an already uppercased name.
pub fn render_script(name: &str, instructions: &[PoseInstruction]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write!(out, "export const {name} = (ref) => {{\n\n");
    out.push_str("    let animations = []\n\n");
    for ins in instructions {
        let _ = writeln!(
            out,
            "    animations.push([\"{}\", \"{}\", \"{}\", {}, \"{}\"]);",
            escape_str(&ins.bone),
            PoseInstruction::PROPERTY,
            ins.axis.as_str(),
            ins.value,
            ins.sign.as_str()
        );
    }
    out.push_str("\n    ref.animations.push(animations);\n\n");
    out.push_str("    if(ref.pending === false){\n");
    out.push_str("        ref.pending = true;\n");
    out.push_str("        ref.animate();\n");
    out.push_str("    }\n\n");
    out.push_str("}\n");
    out
}

/// Export the current pose. Returns `None` when no skeleton is loaded.
pub fn export_pose(
    skeleton: Option<&Skeleton>,
    export_name: &str,
    quantizer: &Quantizer,
) -> Option<ExportDocument> {
    let skeleton = skeleton?;
    let name = export_identifier(export_name);
    let instructions = collect_instructions(skeleton, quantizer);
    debug!(
        "exported pose '{}' with {} instructions over {} bones",
        name,
        instructions.len(),
        skeleton.bone_count()
    );
    let text = render_script(&name, &instructions);
    Some(ExportDocument {
        name,
        text,
        instructions,
    })
}
