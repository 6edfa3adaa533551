use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};

/// Status outputs published for host UI feedback
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouterEvent {
    /// Name of the control the operator touched last
    MostRecentControl(String),
    /// Name of the selection still waiting for a port; empty once claimed
    UnclaimedControl(String),
    /// Name of the control a port now drives; empty when unbound
    BoundControl { port: String, control: String },
}

pub type RouterEventSender = Sender<RouterEvent>;
pub type RouterEventReceiver = Receiver<RouterEvent>;

pub fn event_channel() -> (RouterEventSender, RouterEventReceiver) {
    mpsc::channel()
}
