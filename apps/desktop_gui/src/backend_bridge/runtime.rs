//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{
    CharacterSession, HttpCharacterStore, RemoteStore, SessionError, Settings, VoteChange,
};
use crossbeam_channel::{Receiver, Sender};
use reqwest::Client as HttpClient;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::fetch_portrait;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store = match HttpCharacterStore::from_settings(&settings) {
                Ok(store) => store,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("failed to build http client: {err}");
                    return;
                }
            };
            tracing::info!(base_url = %store.base_url(), "backend: worker ready");
            let portraits = HttpClient::new();
            let mut session = CharacterSession::new(store);

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&mut session, &portraits, &ui_tx, cmd).await;
            }
            tracing::info!("backend: command queue closed, worker exiting");
        });
    });
}

async fn handle_command<S: RemoteStore>(
    session: &mut CharacterSession<S>,
    portraits: &HttpClient,
    ui_tx: &Sender<UiEvent>,
    cmd: BackendCommand,
) {
    match cmd {
        BackendCommand::Refresh => {
            tracing::info!("backend: refresh");
            match session.refresh().await {
                Ok(_) => send(ui_tx, UiEvent::Synced(session.snapshot())),
                Err(err) => report(ui_tx, UiErrorContext::LoadRoster, &err),
            }
        }
        BackendCommand::Select { id } => {
            tracing::info!(character_id = %id, "backend: select");
            match session.select(&id).map(|_| ()) {
                Ok(_) => send(ui_tx, UiEvent::Synced(session.snapshot())),
                Err(err) => report(ui_tx, UiErrorContext::General, &err),
            }
        }
        BackendCommand::AddVotes { raw_input } => {
            tracing::info!("backend: add_votes");
            let previous = session.selected().map(|c| c.votes);
            let result = session.add_votes(&raw_input).await;
            send_vote_result(session, ui_tx, previous, result);
        }
        BackendCommand::ResetVotes => {
            tracing::info!("backend: reset_votes");
            let previous = session.selected().map(|c| c.votes);
            let result = session.reset_votes().await;
            send_vote_result(session, ui_tx, previous, result);
        }
        BackendCommand::CreateCharacter { name, image } => {
            tracing::info!(name = %name, "backend: create_character");
            match session.create_character(&name, &image).await.map(|_| ()) {
                Ok(_) => send(ui_tx, UiEvent::CharacterCreated(session.snapshot())),
                Err(SessionError::InvalidForm(err)) => {
                    send(ui_tx, UiEvent::Rejected(capitalize(&err.to_string())))
                }
                Err(err) => report(ui_tx, UiErrorContext::CreateCharacter, &err),
            }
        }
        BackendCommand::FetchPortrait { url } => {
            let http = portraits.clone();
            let ui_tx = ui_tx.clone();
            tokio::spawn(async move {
                let event = match fetch_portrait(&http, &url).await {
                    Ok(image) => UiEvent::PortraitLoaded { url, image },
                    Err(reason) => {
                        tracing::warn!(url = %url, "backend: portrait unavailable: {reason}");
                        UiEvent::PortraitFailed { url, reason }
                    }
                };
                send(&ui_tx, event);
            });
        }
    }
}

fn send_vote_result<S: RemoteStore>(
    session: &CharacterSession<S>,
    ui_tx: &Sender<UiEvent>,
    previous: Option<u64>,
    result: Result<VoteChange, SessionError>,
) {
    match result {
        Ok(change) => send(
            ui_tx,
            UiEvent::VotesUpdated {
                snapshot: session.snapshot(),
                change,
            },
        ),
        Err(SessionError::InvalidVotes(err)) => {
            tracing::info!("backend: vote input rejected: {err}");
            send(ui_tx, UiEvent::Rejected(err.user_message().to_string()));
        }
        Err(err @ SessionError::Store(_)) => {
            // The local count already moved; show it alongside the sync failure.
            let snapshot = session.snapshot();
            if let (Some(previous), Some(votes)) =
                (previous, snapshot.selected.as_ref().map(|c| c.votes))
            {
                send(
                    ui_tx,
                    UiEvent::VotesUpdated {
                        snapshot,
                        change: VoteChange { previous, votes },
                    },
                );
            }
            report(ui_tx, UiErrorContext::UpdateVotes, &err);
        }
        Err(err) => report(ui_tx, UiErrorContext::UpdateVotes, &err),
    }
}

fn report(ui_tx: &Sender<UiEvent>, context: UiErrorContext, err: &SessionError) {
    let ui_err = UiError::from_session_error(context, err);
    tracing::error!(
        context = ?ui_err.context(),
        category = ?ui_err.category(),
        "backend: {}",
        ui_err.message()
    );
    send(ui_tx, UiEvent::Error(ui_err));
}

fn send(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.try_send(event).is_err() {
        tracing::warn!("backend: ui event queue full or closed; dropping event");
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::capitalize;

    #[test]
    fn capitalizes_form_messages() {
        assert_eq!(capitalize("character name is required"), "Character name is required");
        assert_eq!(capitalize(""), "");
    }
}
