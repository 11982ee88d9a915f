//! Runtime bridge between UI command queue and backend event intake.

use std::{collections::HashMap, sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use signup_client::SignupApi;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::backend_bridge::commands::{ActionKey, BackendCommand};
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// In-flight backend tasks, one per [`ActionKey`].
#[derive(Default)]
pub struct InFlight {
    tasks: HashMap<ActionKey, JoinHandle<()>>,
}

impl InFlight {
    /// Tracks `task` under `key`, aborting the task it supersedes.
    /// Returns true when a still-running task was aborted.
    pub fn track(&mut self, key: ActionKey, task: JoinHandle<()>) -> bool {
        self.tasks.retain(|_, running| !running.is_finished());
        match self.tasks.insert(key, task) {
            Some(stale) if !stale.is_finished() => {
                stale.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self, key: &ActionKey) -> bool {
        self.tasks.get(key).is_some_and(|task| !task.is_finished())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

fn send(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.try_send(event).is_err() {
        warn!("ui event queue unavailable; dropping backend event");
    }
}

/// Runs one command against the backend and reports every outcome as a
/// [`UiEvent`].
pub async fn execute(api: &dyn SignupApi, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
    match cmd {
        BackendCommand::LoadRoster { generation } => {
            let event = match api.list_activities().await {
                Ok(roster) => UiEvent::RosterLoaded { generation, roster },
                Err(err) => {
                    error!(generation, "error fetching activities: {err}");
                    UiEvent::RosterLoadFailed {
                        generation,
                        error: UiError::from_client_error(UiErrorContext::LoadRoster, &err),
                    }
                }
            };
            send(ui_tx, event);
        }
        BackendCommand::Signup { activity, email } => {
            let event = match api.signup(&activity, &email).await {
                Ok(response) => UiEvent::SignupSucceeded {
                    activity,
                    message: response.message,
                },
                Err(err) => {
                    error!(activity = %activity, "error signing up: {err}");
                    UiEvent::SignupFailed(UiError::from_client_error(UiErrorContext::Signup, &err))
                }
            };
            send(ui_tx, event);
        }
        BackendCommand::RemoveParticipant { activity, email } => {
            let response = match api.unregister(&activity, &email).await {
                Ok(response) => response,
                Err(err) => {
                    error!(activity = %activity, "error removing participant: {err}");
                    send(
                        ui_tx,
                        UiEvent::RemoveFailed(UiError::from_client_error(
                            UiErrorContext::RemoveParticipant,
                            &err,
                        )),
                    );
                    return;
                }
            };
            send(
                ui_tx,
                UiEvent::ParticipantRemoved {
                    activity: activity.clone(),
                    email,
                    message: response.message,
                },
            );

            match api.list_activities().await {
                Ok(roster) => match roster.get(activity.as_str()) {
                    Some(current) => send(
                        ui_tx,
                        UiEvent::AvailabilityRefreshed {
                            activity,
                            current: current.clone(),
                        },
                    ),
                    None => warn!(activity = %activity, "activity missing from refreshed roster"),
                },
                Err(err) => warn!(activity = %activity, "availability refresh failed: {err}"),
            }
        }
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, api: Arc<dyn SignupApi>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            info!("backend worker ready");
            let mut in_flight = InFlight::default();
            while let Ok(cmd) = cmd_rx.recv() {
                let key = cmd.action_key();
                let command = cmd.name();
                if !key.supersedes() && in_flight.is_running(&key) {
                    debug!(command, "dropping repeat of a request still in flight");
                    continue;
                }
                let api = Arc::clone(&api);
                let ui_tx = ui_tx.clone();
                let task = tokio::spawn(async move {
                    execute(api.as_ref(), cmd, &ui_tx).await;
                });
                if in_flight.track(key, task) {
                    debug!(command, in_flight = in_flight.len(), "aborted superseded request");
                }
            }
            info!("ui command queue closed; backend worker stopping");
        });
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use crossbeam_channel::unbounded;
    use signup_client::{ClientError, Result as ClientResult};
    use signup_shared::{
        domain::{Activity, ActivityName, Roster},
        error::ApiRejection,
        protocol::MessageResponse,
    };
    use tokio::sync::Mutex;

    use super::*;

    fn activity(max: u32, participants: &[&str]) -> Activity {
        Activity {
            description: "Learn strategies".to_string(),
            schedule: "Mon 3pm".to_string(),
            max_participants: max,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    struct FakeApi {
        roster: Mutex<Roster>,
        fail_list: bool,
        reject_with: Option<String>,
        respond_after: Duration,
        list_calls: Mutex<u32>,
    }

    impl FakeApi {
        fn with(roster: Roster) -> Self {
            Self {
                roster: Mutex::new(roster),
                fail_list: false,
                reject_with: None,
                respond_after: Duration::ZERO,
                list_calls: Mutex::new(0),
            }
        }

        fn rejecting(mut self, detail: &str) -> Self {
            self.reject_with = Some(detail.to_string());
            self
        }

        /// Commits each mutation immediately but answers only after `delay`.
        fn responding_after(mut self, delay: Duration) -> Self {
            self.respond_after = delay;
            self
        }

        fn unreachable_list(mut self) -> Self {
            self.fail_list = true;
            self
        }

        fn rejection(&self) -> Option<ClientError> {
            self.reject_with
                .as_ref()
                .map(|detail| ApiRejection::new(400, Some(detail.clone())).into())
        }
    }

    #[async_trait]
    impl SignupApi for FakeApi {
        async fn list_activities(&self) -> ClientResult<Roster> {
            *self.list_calls.lock().await += 1;
            if self.fail_list {
                return Err(ClientError::UnsupportedServerUrl("offline".to_string()));
            }
            Ok(self.roster.lock().await.clone())
        }

        async fn signup(&self, activity: &ActivityName, email: &str) -> ClientResult<MessageResponse> {
            if let Some(err) = self.rejection() {
                return Err(err);
            }
            {
                let mut roster = self.roster.lock().await;
                let mut current = roster.get(activity.as_str()).cloned().expect("known activity");
                if current.participants.iter().any(|p| p == email) {
                    return Err(ApiRejection::new(400, Some("Student already signed up".into())).into());
                }
                current.participants.push(email.to_string());
                roster.insert(activity.clone(), current);
            }
            tokio::time::sleep(self.respond_after).await;
            Ok(MessageResponse::new(format!("Signed up {email} for {activity}")))
        }

        async fn unregister(
            &self,
            activity: &ActivityName,
            email: &str,
        ) -> ClientResult<MessageResponse> {
            if let Some(err) = self.rejection() {
                return Err(err);
            }
            {
                let mut roster = self.roster.lock().await;
                let mut current = roster.get(activity.as_str()).cloned().expect("known activity");
                if !current.participants.iter().any(|p| p == email) {
                    return Err(ApiRejection::new(404, Some("Participant not found".into())).into());
                }
                current.participants.retain(|p| p != email);
                roster.insert(activity.clone(), current);
            }
            tokio::time::sleep(self.respond_after).await;
            Ok(MessageResponse::default())
        }
    }

    fn chess_roster() -> Roster {
        [(ActivityName::from("Chess Club"), activity(10, &["a@x.com"]))]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn load_roster_reports_generation() {
        let api = FakeApi::with(chess_roster());
        let (tx, rx) = unbounded();

        execute(&api, BackendCommand::LoadRoster { generation: 7 }, &tx).await;

        match rx.try_recv().expect("event") {
            UiEvent::RosterLoaded { generation, roster } => {
                assert_eq!(generation, 7);
                assert_eq!(roster.len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_failure_is_reported_with_generation() {
        let api = FakeApi::with(chess_roster()).unreachable_list();
        let (tx, rx) = unbounded();

        execute(&api, BackendCommand::LoadRoster { generation: 3 }, &tx).await;

        assert!(matches!(
            rx.try_recv().expect("event"),
            UiEvent::RosterLoadFailed { generation: 3, .. }
        ));
    }

    #[tokio::test]
    async fn signup_success_does_not_fetch_by_itself() {
        let api = FakeApi::with(chess_roster());
        let (tx, rx) = unbounded();

        execute(
            &api,
            BackendCommand::Signup {
                activity: ActivityName::from("Chess Club"),
                email: "b@x.com".to_string(),
            },
            &tx,
        )
        .await;

        assert!(matches!(
            rx.try_recv().expect("event"),
            UiEvent::SignupSucceeded { .. }
        ));
        assert!(rx.try_recv().is_err());
        assert_eq!(*api.list_calls.lock().await, 0);
    }

    #[tokio::test]
    async fn rejected_signup_carries_detail() {
        let api = FakeApi::with(chess_roster()).rejecting("Activity full");
        let (tx, rx) = unbounded();

        execute(
            &api,
            BackendCommand::Signup {
                activity: ActivityName::from("Chess Club"),
                email: "b@x.com".to_string(),
            },
            &tx,
        )
        .await;

        match rx.try_recv().expect("event") {
            UiEvent::SignupFailed(error) => assert_eq!(error.message(), "Activity full"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn removal_emits_optimistic_removal_then_refreshed_availability() {
        let api = FakeApi::with(chess_roster());
        let (tx, rx) = unbounded();

        execute(
            &api,
            BackendCommand::RemoveParticipant {
                activity: ActivityName::from("Chess Club"),
                email: "a@x.com".to_string(),
            },
            &tx,
        )
        .await;

        assert!(matches!(
            rx.try_recv().expect("removed"),
            UiEvent::ParticipantRemoved { ref email, .. } if email == "a@x.com"
        ));
        match rx.try_recv().expect("refreshed") {
            UiEvent::AvailabilityRefreshed { activity, current } => {
                assert_eq!(activity.as_str(), "Chess Club");
                assert_eq!(current.spots_left(), 10);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(*api.list_calls.lock().await, 1);
    }

    #[tokio::test]
    async fn removal_survives_failed_refresh() {
        let api = FakeApi::with(chess_roster()).unreachable_list();
        let (tx, rx) = unbounded();

        execute(
            &api,
            BackendCommand::RemoveParticipant {
                activity: ActivityName::from("Chess Club"),
                email: "a@x.com".to_string(),
            },
            &tx,
        )
        .await;

        assert!(matches!(
            rx.try_recv().expect("removed"),
            UiEvent::ParticipantRemoved { .. }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn rejected_removal_emits_only_failure() {
        let api = FakeApi::with(chess_roster()).rejecting("Participant not found");
        let (tx, rx) = unbounded();

        execute(
            &api,
            BackendCommand::RemoveParticipant {
                activity: ActivityName::from("Chess Club"),
                email: "a@x.com".to_string(),
            },
            &tx,
        )
        .await;

        assert!(matches!(rx.try_recv().expect("event"), UiEvent::RemoveFailed(_)));
        assert!(rx.try_recv().is_err());
        assert_eq!(*api.list_calls.lock().await, 0);
    }

    #[tokio::test]
    async fn newer_command_with_same_key_aborts_stale_task() {
        let mut in_flight = InFlight::default();
        let stale = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        let stale_handle = stale.abort_handle();

        assert!(!in_flight.track(ActionKey::LoadRoster, stale));
        let fresh = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        assert!(in_flight.track(ActionKey::LoadRoster, fresh));

        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(stale_handle.is_finished());
        assert_eq!(in_flight.len(), 1);
    }

    #[tokio::test]
    async fn distinct_keys_run_side_by_side() {
        let mut in_flight = InFlight::default();
        let long = || {
            tokio::spawn(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
            })
        };

        assert!(!in_flight.track(ActionKey::LoadRoster, long()));
        assert!(!in_flight.track(
            ActionKey::Signup {
                activity: ActivityName::from("Chess Club"),
                email: "a@x.com".to_string(),
            },
            long(),
        ));
        assert!(!in_flight.track(
            ActionKey::Remove {
                activity: ActivityName::from("Chess Club"),
                email: "a@x.com".to_string(),
            },
            long(),
        ));
        assert_eq!(in_flight.len(), 3);
    }

    fn send_twice(cmd_tx: &crossbeam_channel::Sender<BackendCommand>, cmd: BackendCommand) {
        cmd_tx.send(cmd.clone()).expect("queue first");
        thread::sleep(Duration::from_millis(50));
        cmd_tx.send(cmd).expect("queue second");
    }

    #[test]
    fn repeated_removal_keeps_the_first_outcome() {
        let api = Arc::new(FakeApi::with(chess_roster()).responding_after(Duration::from_millis(200)));
        let (cmd_tx, cmd_rx) = unbounded();
        let (ui_tx, ui_rx) = unbounded();
        launch(cmd_rx, ui_tx, api.clone());

        send_twice(
            &cmd_tx,
            BackendCommand::RemoveParticipant {
                activity: ActivityName::from("Chess Club"),
                email: "a@x.com".to_string(),
            },
        );

        let wait = Duration::from_secs(2);
        assert!(matches!(
            ui_rx.recv_timeout(wait).expect("removed"),
            UiEvent::ParticipantRemoved { ref email, .. } if email == "a@x.com"
        ));
        match ui_rx.recv_timeout(wait).expect("refreshed") {
            UiEvent::AvailabilityRefreshed { current, .. } => {
                assert!(current.participants.is_empty());
                assert_eq!(current.spots_left(), 10);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(ui_rx.recv_timeout(Duration::from_millis(400)).is_err());
    }

    #[test]
    fn repeated_signup_keeps_the_first_outcome() {
        let api = Arc::new(FakeApi::with(chess_roster()).responding_after(Duration::from_millis(200)));
        let (cmd_tx, cmd_rx) = unbounded();
        let (ui_tx, ui_rx) = unbounded();
        launch(cmd_rx, ui_tx, api.clone());

        send_twice(
            &cmd_tx,
            BackendCommand::Signup {
                activity: ActivityName::from("Chess Club"),
                email: "b@x.com".to_string(),
            },
        );

        assert!(matches!(
            ui_rx.recv_timeout(Duration::from_secs(2)).expect("signup"),
            UiEvent::SignupSucceeded { .. }
        ));
        assert!(ui_rx.recv_timeout(Duration::from_millis(400)).is_err());
    }

    #[test]
    fn only_roster_loads_supersede() {
        assert!(ActionKey::LoadRoster.supersedes());
        assert!(!ActionKey::Remove {
            activity: ActivityName::from("Chess Club"),
            email: "a@x.com".to_string(),
        }
        .supersedes());
    }

    #[tokio::test]
    async fn finished_mutation_does_not_block_a_later_one() {
        let mut in_flight = InFlight::default();
        let key = ActionKey::Signup {
            activity: ActivityName::from("Chess Club"),
            email: "a@x.com".to_string(),
        };
        let done = tokio::spawn(async {});
        in_flight.track(key.clone(), done);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!in_flight.is_running(&key));
    }
}
