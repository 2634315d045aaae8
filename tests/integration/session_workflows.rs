use presetctl::engine::{
    ColorDepth, EncodeMode, Encoder, FieldChange, JsonFileStore, MemoryStore, PresetStore,
    SessionError, SessionManager, violations,
};

use crate::common::helpers::{
    changes, memory_session, names, preset, qsv_lookahead_preset, temp_store_dir, tuned_preset,
};

#[tokio::test]
async fn test_edit_then_save_as_adds_sorted_entry() {
    let a = preset("A");
    let b = tuned_preset("B");
    let mut session = memory_session(Some(&a), &[a.clone(), b.clone()]).await;
    assert!(!session.would_discard_changes());

    let view = session.mutate(changes(&["quality=30"])).await.unwrap();
    assert!(view.is_edited);
    assert_eq!(view.current.rate.quality, 30);

    let view = session.save_as("C").await.unwrap();
    assert!(!view.is_edited);
    assert_eq!(view.current.name, "C");
    assert_eq!(names(view.presets), ["A", "B", "C"]);

    // The entry saved under A is untouched
    assert_eq!(view.presets[0], a);
    assert_eq!(view.presets[2].rate.quality, 30);
}

#[tokio::test]
async fn test_save_overwrites_in_place() {
    let b = preset("B");
    let mut session = memory_session(Some(&b), &[preset("A"), b.clone(), preset("C")]).await;
    session.mutate(changes(&["audio_bitrate=320"])).await.unwrap();

    let view = session.save().await.unwrap();
    assert!(!view.is_edited);
    assert_eq!(names(view.presets), ["A", "B", "C"]);
    assert_eq!(view.presets[1].audio.bitrate_kbps, 320);
}

#[tokio::test]
async fn test_selected_copy_is_independent_of_saved_entry() {
    let saved = tuned_preset("Film");
    let mut session = memory_session(None, &[saved.clone()]).await;
    session.new_preset(true).await.unwrap();

    session.select("Film", true).await.unwrap();
    session.mutate([FieldChange::Quality(40)]).await.unwrap();

    assert_eq!(session.view().presets[0], saved);
    assert_eq!(session.view().current.rate.quality, 40);
    assert!(session.would_discard_changes());
}

#[tokio::test]
async fn test_reverting_an_edit_clears_dirty_flag() {
    let saved = tuned_preset("Film");
    let mut session = memory_session(Some(&saved), &[saved.clone()]).await;

    session.mutate([FieldChange::Quality(40)]).await.unwrap();
    assert!(session.would_discard_changes());

    let view = session.mutate([FieldChange::Quality(saved.rate.quality)]).await.unwrap();
    assert!(!view.is_edited);
}

#[tokio::test]
async fn test_switching_encoder_repairs_qsv_only_fields() {
    let saved = qsv_lookahead_preset("QSV LA");
    let mut session = memory_session(Some(&saved), &[saved.clone()]).await;

    let view = session.mutate(changes(&["encoder=nvenc"])).await.unwrap();
    assert_eq!(view.current.encoder, Encoder::Nvenc);
    assert_eq!(view.current.encode_mode, EncodeMode::Vbr);
    assert!(view.is_edited);

    let fields: Vec<&str> = session.last_corrections().iter().map(|c| c.field).collect();
    assert_eq!(fields, ["encode_mode", "d3d_mode"]);
}

#[tokio::test]
async fn test_unsaved_changes_block_new_and_select() {
    let a = preset("A");
    let mut session = memory_session(Some(&a), &[a.clone(), preset("B")]).await;
    assert!(!session.would_discard_changes());
    session.mutate(changes(&["color_depth=c10bit", "encoder=nvenc"])).await.unwrap();
    assert_eq!(session.view().current.color_depth, ColorDepth::C10Bit);

    let before = session.context().clone();
    let writes = session.store().write_count();

    assert!(matches!(
        session.select("B", false).await,
        Err(SessionError::UnsavedChanges)
    ));
    assert!(matches!(
        session.new_preset(false).await,
        Err(SessionError::UnsavedChanges)
    ));
    assert_eq!(session.context(), &before);
    assert_eq!(session.store().write_count(), writes);

    let view = session.select("B", true).await.unwrap();
    assert_eq!(view.current.name, "B");
    assert!(!view.is_edited);
}

#[tokio::test]
async fn test_new_preset_is_always_edited() {
    let mut session = memory_session(None, &[preset("New Preset")]).await;
    session.select("New Preset", false).await.unwrap();
    assert!(!session.would_discard_changes());

    let view = session.new_preset(false).await.unwrap();
    assert!(view.is_edited);
    assert_eq!(view.current, &presetctl::engine::Preset::default());
}

#[tokio::test]
async fn test_failed_write_keeps_in_memory_edit() {
    let saved = preset("A");
    let mut session = memory_session(Some(&saved), &[saved.clone()]).await;
    session.store().set_fail_writes(true);

    let err = session.mutate([FieldChange::Bitrate(9000)]).await.unwrap_err();
    assert!(matches!(err, SessionError::Persistence(_)));
    assert_eq!(session.view().current.rate.bitrate_kbps, 9000);
    assert!(session.would_discard_changes());
}

#[tokio::test]
async fn test_file_store_session_survives_restart() {
    let temp_dir = temp_store_dir();

    {
        let store = JsonFileStore::new(temp_dir.path());
        let mut session = SessionManager::initialize(store).await.unwrap();
        assert!(session.view().presets.is_empty());

        session
            .mutate(changes(&["name=Anime", "encoder=nvenc", "quality=21"]))
            .await
            .unwrap();
        session.save().await.unwrap();
        session.save_as("Anime Copy").await.unwrap();
        session.mutate(changes(&["deinterlace=true"])).await.unwrap();
    }

    let store = JsonFileStore::new(temp_dir.path());
    let session = SessionManager::initialize(store).await.unwrap();
    let view = session.view();

    assert_eq!(names(view.presets), ["Anime", "Anime Copy"]);
    assert_eq!(view.current.name, "Anime Copy");
    assert!(view.current.video.deinterlace);
    assert!(view.is_edited);

    let entries = session.entries();
    assert!(entries[1].selected);
    assert!(!entries[0].selected);
}

#[tokio::test]
async fn test_initialize_repairs_stored_current() {
    let mut broken = qsv_lookahead_preset("Broken");
    broken.encoder = Encoder::Vce;

    let store = MemoryStore::seeded(Some(&broken), &[]).unwrap();
    let session = SessionManager::initialize(store).await.unwrap();

    assert_eq!(session.view().current.encode_mode, EncodeMode::Vbr);
    assert_eq!(session.last_corrections().len(), 2);

    let stored = session.store().load_current().await.unwrap();
    assert_eq!(&stored, session.view().current);
    assert!(violations(&stored).is_empty());
}

#[tokio::test]
async fn test_repaired_current_survives_restart() {
    let temp_dir = temp_store_dir();
    let mut broken = qsv_lookahead_preset("Broken");
    broken.encoder = Encoder::Nvenc;
    JsonFileStore::new(temp_dir.path()).save_current(&broken).await.unwrap();

    let first = SessionManager::initialize(JsonFileStore::new(temp_dir.path()))
        .await
        .unwrap();
    assert_eq!(first.last_corrections().len(), 2);
    let repaired = first.view().current.clone();
    drop(first);

    let second = SessionManager::initialize(JsonFileStore::new(temp_dir.path()))
        .await
        .unwrap();
    assert!(second.last_corrections().is_empty());
    assert_eq!(second.view().current, &repaired);
}
