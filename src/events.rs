use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Domain events emitted by the service layer after a committed write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Load events
    LoadCreated(Uuid),
    LoadUpdated(Uuid),
    LoadStatusChanged {
        load_id: Uuid,
        old_status: String,
        new_status: String,
    },
    LoadDeleted(Uuid),

    // Shipper events
    ShipperCreated(Uuid),
    ShipperDeleted {
        shipper_id: Uuid,
        loads_removed: u64,
    },

    // Smart hub events
    HubCreated(Uuid),
    HubUpdated(Uuid),
    HubScoresUpdated {
        hub_id: Uuid,
        efficiency_score: f64,
        network_impact: f64,
    },
    HubDeactivated(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel and logs each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        info!(?event, "domain event");
    }
    info!("event channel closed; event processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_fails_once_receiver_is_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        drop(rx);
        assert!(sender.send(Event::LoadCreated(Uuid::new_v4())).await.is_err());
    }

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();
        sender.send(Event::HubDeactivated(id)).await.unwrap();
        match rx.recv().await {
            Some(Event::HubDeactivated(got)) => assert_eq!(got, id),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
