use std::sync::Arc;

use relay_core::{ContainerId, MessageSink, OutboundMessage, RelayError, ReturnAction};
use tracing::info;

/// User- and lifecycle-triggered requests sent to the host.
pub struct ActionReceiver {
    sink: Arc<dyn MessageSink>,
    default_container: ContainerId,
}

impl ActionReceiver {
    pub fn new(sink: Arc<dyn MessageSink>, default_container: ContainerId) -> Self {
        Self {
            sink,
            default_container,
        }
    }

    /// Ask the host to bring `target` to the foreground. A missing or
    /// empty target means the default container.
    pub fn switch_container(&self, target: Option<&ContainerId>) -> Result<(), RelayError> {
        let target = match target {
            Some(t) if !t.is_empty() => t.clone(),
            _ => self.default_container.clone(),
        };
        info!(target = %target, "requesting container switch");
        self.sink.send(OutboundMessage::SwitchContainer(target))
    }

    /// Invoked when the user taps a relayed notification.
    pub fn on_return_action(&self, action: &ReturnAction) -> Result<(), RelayError> {
        self.switch_container(Some(&action.target_container))
    }

    pub fn boot_completed(&self) -> Result<(), RelayError> {
        info!("announcing boot completed");
        self.sink.send(OutboundMessage::BootCompleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    const A0: &str = "00000000-0000-0000-0000-000000000000";

    fn receiver() -> (ActionReceiver, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ActionReceiver::new(Arc::new(tx), ContainerId::from_raw(A0)), rx)
    }

    #[test]
    fn switch_to_named_container() {
        let (actions, mut rx) = receiver();
        actions.switch_container(Some(&ContainerId::from_raw("c2"))).unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            OutboundMessage::SwitchContainer(ContainerId::from_raw("c2"))
        );
    }

    #[test]
    fn missing_or_empty_target_uses_default() {
        let (actions, mut rx) = receiver();
        actions.switch_container(None).unwrap();
        actions.switch_container(Some(&ContainerId::from_raw(""))).unwrap();
        for _ in 0..2 {
            assert_eq!(
                rx.try_recv().unwrap(),
                OutboundMessage::SwitchContainer(ContainerId::from_raw(A0))
            );
        }
    }

    #[test]
    fn return_action_switches_to_source() {
        let (actions, mut rx) = receiver();
        let action = ReturnAction {
            request_code: 3,
            target_container: ContainerId::from_raw("c1"),
        };
        actions.on_return_action(&action).unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            OutboundMessage::SwitchContainer(ContainerId::from_raw("c1"))
        );
    }

    #[test]
    fn boot_completed_is_sent() {
        let (actions, mut rx) = receiver();
        actions.boot_completed().unwrap();
        assert_eq!(rx.try_recv().unwrap(), OutboundMessage::BootCompleted);
    }
}
