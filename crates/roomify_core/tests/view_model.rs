use roomify_core::{
    update, CandidateFile, DataUrl, Msg, NavbarView, Phase, ProgressTick,
    UploadState, PROMPT_SIGNED_IN, STATUS_ANALYZING, STATUS_REDIRECTING,
};

#[test]
fn dropzone_reflects_auth_and_hover() {
    let (state, _) = update(UploadState::default(), Msg::AuthChanged(true));
    let (state, _) = update(state, Msg::DragOver);

    let dropzone = state.view().dropzone.expect("no file held");
    assert!(dropzone.enabled);
    assert!(dropzone.dragging);
    assert_eq!(dropzone.prompt, PROMPT_SIGNED_IN);
    assert_eq!(dropzone.help, "Maximum file size: 10MB");
    assert_eq!(dropzone.accept, ".jpg,.jpeg,.png");
}

#[test]
fn status_card_tracks_progress() {
    let (state, _) = update(UploadState::default(), Msg::AuthChanged(true));
    let file = CandidateFile::from_bytes("kitchen.jpg", "image/jpeg", vec![0xff_u8, 0xd8]);
    let (state, _) = update(state, Msg::FilesPicked(vec![file]));
    let session = state.session().unwrap().token;

    let status = state.view().status.expect("file held");
    assert_eq!(status.file_name, "kitchen.jpg");
    assert_eq!(status.phase, Phase::Decoding);
    assert_eq!(status.status_text, STATUS_ANALYZING);
    assert!(state.view().dropzone.is_none());

    let (state, _) = update(
        state,
        Msg::DecodeSucceeded {
            session,
            payload: DataUrl::encode("image/jpeg", &[0xff, 0xd8]),
        },
    );
    let (state, _) = update(
        state,
        Msg::ProgressTicked {
            session,
            tick: ProgressTick {
                value: 100,
                reached_complete: true,
            },
        },
    );
    let status = state.view().status.unwrap();
    assert!(status.complete);
    assert_eq!(status.progress, 100);
    assert_eq!(status.status_text, STATUS_REDIRECTING);
}

#[test]
fn navbar_greets_user() {
    let signed_out = NavbarView::from_auth(false, Some("ada"));
    assert_eq!(signed_out.greeting, None);
    assert_eq!(signed_out.auth_button, "Log In");
    assert!(signed_out.show_get_started);

    let named = NavbarView::from_auth(true, Some("ada"));
    assert_eq!(named.greeting.as_deref(), Some("Hi,ada"));
    assert_eq!(named.auth_button, "Log Out");
    assert!(!named.show_get_started);

    let anonymous = NavbarView::from_auth(true, Some(""));
    assert_eq!(anonymous.greeting.as_deref(), Some("Signed in"));
}
