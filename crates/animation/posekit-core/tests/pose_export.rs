use posekit_core::{
    export_pose, parse_rig_document_json, sample_pose, Euler, LoopMode, Node, Quantizer, Skeleton,
};

fn arm_rig_skeleton() -> Skeleton {
    let json = posekit_test_fixtures::rigs::json("arm-rig").expect("load arm-rig fixture");
    parse_rig_document_json(&json)
        .expect("parse arm-rig")
        .skeleton
        .expect("skeleton")
}

fn push_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|l| l.trim_start().starts_with("animations.push(["))
        .collect()
}

#[test]
fn static_pose_matches_expected_script_exactly() {
    let skeleton = arm_rig_skeleton();
    let doc = export_pose(Some(&skeleton), "pose1", &Quantizer::default())
        .expect("skeleton present");
    let expected = posekit_test_fixtures::exports::text("arm-rig-pose1").expect("expected text");
    assert_eq!(doc.text(), expected);
    assert_eq!(doc.file_name(), "POSE1.js");
}

#[test]
fn single_bone_half_pi_scenario() {
    let skeleton = Skeleton::new(Node::bone("Arm").with_rotation(Euler::new(1.5708, 0.0, 0.0)));
    let doc = export_pose(Some(&skeleton), "pose1", &Quantizer::default()).unwrap();
    assert!(doc.text().contains("export const POSE1 = (ref) => {"));
    assert_eq!(
        push_lines(doc.text()),
        ["    animations.push([\"Arm\", \"rotation\", \"x\", Math.PI/2, \"+\"]);"]
    );
}

#[test]
fn runtime_handoff_is_guarded_once() {
    let skeleton = Skeleton::new(Node::bone("Arm"));
    let doc = export_pose(Some(&skeleton), "idle", &Quantizer::default()).unwrap();
    let text = doc.text();
    assert_eq!(text.matches("ref.animations.push(animations);").count(), 1);
    assert_eq!(text.matches("ref.animate();").count(), 1);
    assert!(text.contains("    if(ref.pending === false){\n        ref.pending = true;\n"));
    assert!(text.ends_with("    }\n\n}\n"));
}

#[test]
fn zero_rotation_bones_contribute_no_lines() {
    let skeleton = Skeleton::new(
        Node::group("Scene")
            .with_child(Node::bone("A"))
            .with_child(Node::bone("B").with_rotation(Euler::new(9e-5, -9e-5, 0.0))),
    );
    let doc = export_pose(Some(&skeleton), "rest", &Quantizer::default()).unwrap();
    assert!(push_lines(doc.text()).is_empty());
}

#[test]
fn sampled_pose_exports_quantized_angles() {
    let json = posekit_test_fixtures::rigs::json("arm-rig").unwrap();
    let doc = parse_rig_document_json(&json).unwrap();
    let mut skeleton = doc.skeleton.unwrap();
    let wave = &doc.clips[0];

    // Halfway through "wave" the arm sits at pi/4 around x; y/z collapse to zero.
    sample_pose(&mut skeleton, wave, 0.5, LoopMode::Once);
    let out = export_pose(Some(&skeleton), "wave_mid", &Quantizer::default()).unwrap();
    let lines = push_lines(out.text());
    assert!(lines.contains(&"    animations.push([\"Arm\", \"rotation\", \"x\", Math.PI/4, \"+\"]);"));
    assert!(!lines.iter().any(|l| l.contains("\"Arm\", \"rotation\", \"z\"")));
    // Spine keeps its rest rotation because "wave" does not touch it.
    assert!(lines.contains(&"    animations.push([\"Spine\", \"rotation\", \"y\", -0.3000, \"-\"]);"));
}

#[test]
fn each_export_replaces_the_previous_text() {
    let mut skeleton = Skeleton::new(Node::bone("Arm").with_rotation(Euler::new(0.3, 0.0, 0.0)));
    let q = Quantizer::default();
    let first = export_pose(Some(&skeleton), "p", &q).unwrap();
    skeleton.root.rotation = Euler::new(0.0, 0.0, -0.2);
    let second = export_pose(Some(&skeleton), "p", &q).unwrap();
    assert_ne!(first.text(), second.text());
    assert_eq!(push_lines(second.text()).len(), 1);
    assert!(second.text().contains("\"z\", -0.2000, \"-\""));
}
