use crate::{
    is_acceptable, CandidateFile, Effect, Msg, Phase, RouteState, UploadState,
    INVALID_TYPE_MESSAGE, PROGRESS_COMPLETE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: UploadState, msg: Msg) -> (UploadState, Vec<Effect>) {
    // Nothing may touch a surface that no longer exists.
    if state.is_unmounted() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::AuthChanged(signed_in) => {
            if state.signed_in() == signed_in {
                return (state, Vec::new());
            }
            state.set_signed_in(signed_in);
            state.mark_dirty();
            if signed_in {
                Vec::new()
            } else {
                state.set_dragging(false);
                abandon_live_session(&mut state)
            }
        }
        Msg::FilesPicked(files) => match files.into_iter().next() {
            Some(file) if state.signed_in() => select_file(&mut state, file),
            _ => Vec::new(),
        },
        Msg::DragOver => {
            if state.signed_in() {
                state.set_dragging(true);
            }
            Vec::new()
        }
        Msg::DragLeave => {
            state.set_dragging(false);
            Vec::new()
        }
        Msg::FilesDropped(files) => {
            if !state.signed_in() {
                return (state, Vec::new());
            }
            state.set_dragging(false);
            match files.into_iter().next() {
                Some(file) => select_file(&mut state, file),
                None => Vec::new(),
            }
        }
        Msg::DecodeSucceeded { session, payload } => {
            if !state.signed_in() {
                return (state, Vec::new());
            }
            match state.current_mut(session, Phase::Decoding) {
                Some(current) => {
                    current.payload = Some(payload);
                    current.progress = 0;
                    current.phase = Phase::Progressing;
                    state.mark_dirty();
                    vec![Effect::StartProgress { session }]
                }
                None => Vec::new(),
            }
        }
        Msg::DecodeFailed { session, .. } => {
            if state.current_mut(session, Phase::Decoding).is_none() {
                return (state, Vec::new());
            }
            state.take_session();
            vec![Effect::CancelSession { session }]
        }
        Msg::ProgressTicked { session, tick } => {
            if !state.signed_in() {
                return (state, Vec::new());
            }
            let Some(current) = state.current_mut(session, Phase::Progressing) else {
                return (state, Vec::new());
            };
            if tick.value < current.progress || tick.value > PROGRESS_COMPLETE {
                return (state, Vec::new());
            }
            current.progress = tick.value;
            let completed = tick.reached_complete && tick.value == PROGRESS_COMPLETE;
            if completed {
                current.phase = Phase::Completing;
            }
            state.mark_dirty();
            if completed {
                vec![Effect::ScheduleRedirect { session }]
            } else {
                Vec::new()
            }
        }
        Msg::RedirectElapsed { session, route_id } => {
            if !state.signed_in() {
                return (state, Vec::new());
            }
            let path = state.route_path(&route_id);
            let Some(current) = state.current_mut(session, Phase::Completing) else {
                return (state, Vec::new());
            };
            let Some(payload) = current.payload.take() else {
                return (state, Vec::new());
            };
            current.phase = Phase::HandedOff;
            let file_name = current.file.name.clone();
            state.mark_dirty();
            vec![
                Effect::Complete {
                    payload: payload.clone(),
                },
                Effect::Navigate {
                    path,
                    state: RouteState { payload, file_name },
                },
            ]
        }
        Msg::Unmounted => {
            state.mark_unmounted();
            vec![Effect::Teardown]
        }
    };

    (state, effects)
}

fn select_file(state: &mut UploadState, file: CandidateFile) -> Vec<Effect> {
    if !is_acceptable(&file) {
        return vec![Effect::Alert {
            message: INVALID_TYPE_MESSAGE.to_string(),
        }];
    }

    let (session, previous) = state.begin_session(file.clone());
    let mut effects = Vec::with_capacity(2);
    // Cancel before start: the old timer must be gone before the new decode runs.
    if let Some(previous) = previous.filter(|p| p.phase.is_live()) {
        effects.push(Effect::CancelSession {
            session: previous.token,
        });
    }
    effects.push(Effect::Decode { session, file });
    effects
}

fn abandon_live_session(state: &mut UploadState) -> Vec<Effect> {
    if !state.phase().is_live() {
        return Vec::new();
    }
    match state.take_session() {
        Some(session) => vec![Effect::CancelSession {
            session: session.token,
        }],
        None => Vec::new(),
    }
}
