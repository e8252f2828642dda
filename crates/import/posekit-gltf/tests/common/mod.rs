//! In-memory GLB assembly for import tests.

use serde_json::{json, Value};

/// Wrap a glTF JSON document and its binary buffer into a GLB container.
pub fn assemble_glb(root: &Value, buffer_data: &[u8]) -> Vec<u8> {
    let json_string = serde_json::to_string(root).expect("serialize glTF JSON");
    let json_bytes = json_string.as_bytes();

    // Both chunks are padded to 4-byte alignment.
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;

    let total_length = 12 + 8 + json_chunk_length + 8 + buffer_chunk_length;
    let mut glb = Vec::with_capacity(total_length);

    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat(0x20u8).take(json_padding));

    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat(0u8).take(buffer_padding));

    glb
}

fn push_f32s(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

pub const HALF_SQRT2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Two-joint arm rig with two animations:
/// - "wave": rotation of "Upper Arm" (identity -> pi/2 about x) and a stepped
///   translation of "Hand.L", both over one second;
/// - unnamed: a rotation channel on "Hand.L" sharing the "wave" samplers.
pub fn arm_rig_glb() -> Vec<u8> {
    let mut bin = Vec::new();
    push_f32s(&mut bin, &[0.0, 1.0]); // times: 0..8
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, HALF_SQRT2, 0.0, 0.0, HALF_SQRT2]); // 8..40
    push_f32s(&mut bin, &[0.0, 0.5, 0.0, 0.0, 0.75, 0.0]); // 40..64

    let root = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0, 3] } ],
        "nodes": [
            { "name": "Armature", "children": [1] },
            { "name": "Upper Arm", "rotation": [HALF_SQRT2, 0.0, 0.0, HALF_SQRT2], "children": [2] },
            { "name": "Hand.L", "translation": [0.0, 0.5, 0.0] },
            { "name": "Prop" }
        ],
        "skins": [ { "joints": [1, 2] } ],
        "buffers": [ { "byteLength": bin.len() } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 32 },
            { "buffer": 0, "byteOffset": 40, "byteLength": 24 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC4" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "animations": [
            {
                "name": "wave",
                "channels": [
                    { "sampler": 0, "target": { "node": 1, "path": "rotation" } },
                    { "sampler": 1, "target": { "node": 2, "path": "translation" } }
                ],
                "samplers": [
                    { "input": 0, "output": 1, "interpolation": "LINEAR" },
                    { "input": 0, "output": 2, "interpolation": "STEP" }
                ]
            },
            {
                "channels": [
                    { "sampler": 0, "target": { "node": 2, "path": "rotation" } }
                ],
                "samplers": [
                    { "input": 0, "output": 1 }
                ]
            }
        ]
    });

    assemble_glb(&root, &bin)
}
