use posekit_core::{parse_rig_document_json, Config, LoopMode, Session};

fn loaded_session(cfg: Config) -> Session {
    let json = posekit_test_fixtures::rigs::json("arm-rig").expect("arm-rig");
    let doc = parse_rig_document_json(&json).expect("parse");
    let mut session = Session::new(cfg);
    session.load_model("arm_rig.glb", doc.skeleton.expect("skeleton"), doc.clips);
    session
}

#[test]
fn import_combine_and_play_combined_clip() {
    let mut session = loaded_session(Config::default());
    let extra = posekit_test_fixtures::rigs::json("extra-clips").unwrap();
    let extra = parse_rig_document_json(&extra).unwrap();
    let imported = session.import_clips(extra.clips);
    assert_eq!(imported.len(), 1);
    assert_eq!(session.clip_count(), 3);

    let wave = session.find_clip("wave").unwrap();
    let shrug = session.find_clip("shrug").unwrap();
    session.add_to_selection(wave).unwrap();
    session.add_to_selection(shrug).unwrap();
    let combined = session.combine_selection().expect("two clips selected");

    let clip = session.clip(combined).unwrap();
    assert_eq!(clip.duration, 1.75);
    assert_eq!(clip.tracks.len(), 3);
    // Tail is not part of the rig; it survives combination untouched.
    assert!(clip.tracks.iter().any(|t| t.target_name == "Tail"));

    // Play the combined clip to the end of the "wave" half: arm raised to pi/2.
    session.play(combined).unwrap();
    session.advance(0.5);
    session.advance(0.5 - 1e-4);
    let doc = session.export_pose().unwrap();
    assert_eq!(doc.name(), "ARM_RIG");
    assert!(doc
        .text()
        .contains("animations.push([\"Arm\", \"rotation\", \"x\", Math.PI/2, \"+\"]);"));
}

#[test]
fn failed_combine_leaves_clip_set_unchanged() {
    let mut session = loaded_session(Config::default());
    let wave = session.find_clip("wave").unwrap();
    session.add_to_selection(wave).unwrap();
    assert!(session.combine_selection().is_none());
    assert_eq!(session.clip_count(), 2);
    assert_eq!(session.selection(), &[wave]);
}

#[test]
fn config_drives_name_and_looping() {
    let cfg = Config {
        combined_name: "sequence".into(),
        loop_mode: LoopMode::Once,
        ..Config::default()
    };
    let mut session = loaded_session(cfg);
    let wave = session.find_clip("wave").unwrap();
    session.add_to_selection(wave).unwrap();
    session.add_to_selection(wave).unwrap();
    let id = session.combine_selection().unwrap();
    assert_eq!(session.clip(id).unwrap().name, "sequence");

    // Past the end with LoopMode::Once the pose holds the last sample.
    session.pose_at(wave, 5.0).unwrap();
    let arm = session.skeleton().unwrap().find("Arm").unwrap();
    assert!((arm.rotation.x - std::f64::consts::FRAC_PI_2).abs() < 1e-4);
}

#[test]
fn export_name_can_be_overridden() {
    let mut session = loaded_session(Config::default());
    session.set_model_name("crouch");
    let doc = session.export_pose().unwrap();
    assert_eq!(doc.file_name(), "CROUCH.js");
}

#[test]
fn combined_clip_poses_each_segment_from_its_own_source() {
    let mut session = loaded_session(Config::default());
    let wave = session.find_clip("wave").unwrap();

    session.pose_at(wave, 0.5).unwrap();
    let solo = session.skeleton().unwrap().find("Arm").unwrap().rotation;

    session.add_to_selection(wave).unwrap();
    session.add_to_selection(wave).unwrap();
    let combined = session.combine_selection().unwrap();

    for t in [0.5, 1.5] {
        session.pose_at(combined, t).unwrap();
        let arm = session.skeleton().unwrap().find("Arm").unwrap().rotation;
        assert!((arm.x - solo.x).abs() < 1e-5, "t={t}: {arm:?} vs {solo:?}");
        assert!((arm.x - std::f64::consts::FRAC_PI_4).abs() < 1e-5);
    }
    let doc = session.export_pose().unwrap();
    assert!(doc
        .text()
        .contains("animations.push([\"Arm\", \"rotation\", \"x\", Math.PI/4, \"+\"]);"));
}
