use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::config::NodeSettings;
use crate::node::backlog::Backlog;
use crate::node::clock::Clock;
use crate::node::message::{Control, Message};
use crate::node::status::Status;
use crate::utils::parse::non_negative_int;

/// An event consumed by the node's processing loop.
///
/// Inbound messages and bypass-timer fires arrive over the same channel, so
/// all state mutation is serialized on one task and the backlog never sees
/// concurrent access.
#[derive(Debug)]
pub enum NodeEvent {
    Inbound(Message),
    /// Posted by an armed bypass timer. The generation lets the node discard
    /// fires from timers that were cancelled after the event was already in
    /// flight.
    TimerFired(u64),
    Shutdown,
}

/// The queueing/release state machine.
///
/// A `QueueNode` holds messages in a FIFO backlog and releases them
/// downstream one at a time, either on an explicit `trigger` control message
/// or automatically at a fixed cadence once the bypass timer is armed. It
/// also understands control messages that reset it, query the backlog length,
/// retune the bypass interval, or switch it into pass-through mode.
///
/// Each instance owns its state exclusively; nothing is shared across nodes.
pub struct QueueNode {
    pub(crate) backlog: Backlog,
    pub(crate) disabled: bool,
    pub(crate) busy: bool,
    pub(crate) first_message_bypass: bool,
    pub(crate) bypass_interval: u64,
    pub(crate) timer: Option<JoinHandle<()>>,
    pub(crate) timer_generation: u64,
    events: UnboundedSender<NodeEvent>,
    downstream: UnboundedSender<Message>,
    status: UnboundedSender<Status>,
    clock: Arc<dyn Clock>,
}

impl QueueNode {
    /// Creates a node around an existing event channel.
    ///
    /// Most callers want [`QueueNode::spawn`], which also starts the
    /// processing loop; constructing directly is useful when the caller
    /// drives events itself.
    pub fn new(
        settings: &NodeSettings,
        events: UnboundedSender<NodeEvent>,
        downstream: UnboundedSender<Message>,
        status: UnboundedSender<Status>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backlog: Backlog::new(),
            disabled: false,
            busy: false,
            first_message_bypass: settings.first_message_bypass,
            bypass_interval: settings.bypass_interval_ms,
            timer: None,
            timer_generation: 0,
            events,
            downstream,
            status,
            clock,
        }
    }

    /// Starts a node on its own tokio task and returns a handle to it.
    ///
    /// Released messages go out on `downstream`, status snapshots on
    /// `status`. The task runs until [`NodeHandle::shutdown`] is called.
    pub fn spawn(
        settings: &NodeSettings,
        downstream: UnboundedSender<Message>,
        status: UnboundedSender<Status>,
        clock: Arc<dyn Clock>,
    ) -> NodeHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let node = QueueNode::new(settings, events_tx.clone(), downstream, status, clock);
        let task = tokio::spawn(run(node, events_rx));
        NodeHandle {
            events: events_tx,
            task,
        }
    }

    /// Dispatches one event.
    pub fn handle_event(&mut self, event: NodeEvent) {
        match event {
            NodeEvent::Inbound(msg) => self.handle_input(msg),
            NodeEvent::TimerFired(generation) => self.handle_timer_fired(generation),
            NodeEvent::Shutdown => {}
        }
    }

    /// Processes one inbound message.
    ///
    /// The message is classified by its reserved control fields and handled
    /// by exactly one branch; at most one message is sent downstream from
    /// this path. Afterwards the bypass timer is re-armed if it should be
    /// running and the status indicator is refreshed, whatever the branch
    /// did.
    pub fn handle_input(&mut self, mut msg: Message) {
        match msg.control() {
            Some(Control::Reset) => {
                self.backlog.clear();
                self.set_idle();
            }
            Some(Control::CountQuery) => {
                msg.queue_count = Some(self.backlog.len());
                self.send(msg);
            }
            Some(Control::SetBypassInterval(value)) => {
                // Junk values keep the previous interval rather than erroring.
                if let Some(interval) = non_negative_int(&value) {
                    self.bypass_interval = interval;
                }
            }
            Some(Control::Bypass(enable)) => {
                if enable {
                    self.disabled = true;
                } else {
                    // The backlog is deliberately left intact on re-enable.
                    self.disabled = false;
                    self.set_idle();
                }
            }
            Some(Control::Trigger) => self.release_next(),
            None => self.accept_payload(msg),
        }
        self.arm_bypass();
        self.report_status();
    }

    /// Manual release: purge overdue entries, then pop and send the head.
    ///
    /// An empty backlog (including one emptied by the purge) just clears the
    /// busy flag. A successful pop cancels the armed timer so the automatic
    /// path cannot race this release; the caller re-arms right after.
    fn release_next(&mut self) {
        self.backlog.purge_expired(self.clock.now_millis());
        match self.backlog.pop() {
            Some(mut msg) => {
                msg.queue_count = Some(self.backlog.len());
                self.send(msg);
                self.cancel_bypass();
            }
            None => self.set_idle(),
        }
    }

    /// Handles a plain payload message.
    ///
    /// In disabled mode, or for the first message while idle under
    /// first-message-bypass, the message skips the backlog and goes straight
    /// downstream. Otherwise it is stamped and appended, and the backlog is
    /// swept for expired entries.
    fn accept_payload(&mut self, mut msg: Message) {
        if self.disabled || (self.first_message_bypass && !self.busy) {
            self.busy = true;
            msg.queue_count = Some(self.backlog.len());
            self.send(msg);
            self.cancel_bypass();
        } else {
            let now = self.clock.now_millis();
            self.backlog.push(msg, now);
            self.backlog.purge_expired(now);
        }
    }

    /// Reacts to a bypass-timer fire.
    ///
    /// A fire from a cancelled timer (stale generation) is dropped. A live
    /// fire pops and sends the head, then re-arms while messages remain;
    /// finding the backlog already empty just returns the node to idle.
    fn handle_timer_fired(&mut self, generation: u64) {
        if generation != self.timer_generation {
            return;
        }
        self.timer = None;
        match self.backlog.pop() {
            Some(mut msg) => {
                msg.queue_count = Some(self.backlog.len());
                self.send(msg);
                if self.backlog.is_empty() {
                    self.busy = false;
                } else {
                    self.arm_bypass();
                }
                self.report_status();
            }
            None => {
                self.busy = false;
            }
        }
    }

    /// Arms the bypass timer if it should be running and is not yet armed.
    ///
    /// At most one timer is armed at a time. The timer task sleeps for the
    /// configured interval and posts a `TimerFired` back into the node's own
    /// event channel.
    fn arm_bypass(&mut self) {
        if self.bypass_interval == 0 || self.backlog.is_empty() || self.timer.is_some() {
            return;
        }
        self.timer_generation += 1;
        let generation = self.timer_generation;
        let interval = Duration::from_millis(self.bypass_interval);
        let events = self.events.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = events.send(NodeEvent::TimerFired(generation));
        }));
    }

    /// Cancels any armed timer and invalidates fires already in flight.
    fn cancel_bypass(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.timer_generation += 1;
    }

    fn set_idle(&mut self) {
        self.cancel_bypass();
        self.busy = false;
    }

    fn send(&self, msg: Message) {
        if let Err(e) = self.downstream.send(msg) {
            eprintln!("Failed to send released message downstream: {e}");
        }
    }

    fn report_status(&self) {
        let status = Status::of(
            self.backlog.len(),
            self.disabled,
            self.first_message_bypass,
            self.busy,
        );
        // The host may have stopped watching the indicator; that is fine.
        let _ = self.status.send(status);
    }

    /// Shutdown path: refresh the indicator once, then cancel the timer so
    /// it cannot fire against a torn-down node.
    fn close(&mut self) {
        self.report_status();
        self.cancel_bypass();
    }
}

async fn run(mut node: QueueNode, mut events: UnboundedReceiver<NodeEvent>) {
    while let Some(event) = events.recv().await {
        if matches!(event, NodeEvent::Shutdown) {
            break;
        }
        node.handle_event(event);
    }
    node.close();
}

/// Handle to a spawned [`QueueNode`].
pub struct NodeHandle {
    events: UnboundedSender<NodeEvent>,
    task: JoinHandle<()>,
}

impl NodeHandle {
    /// A cloneable sender for feeding messages into the node.
    pub fn sender(&self) -> NodeSender {
        NodeSender {
            events: self.events.clone(),
        }
    }

    /// Asks the processing loop to stop. The node refreshes its status once
    /// and cancels any armed timer on the way out.
    pub fn shutdown(&self) {
        let _ = self.events.send(NodeEvent::Shutdown);
    }

    /// Waits for the processing loop to finish.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Inbound side of a node, handed to transports.
#[derive(Clone)]
pub struct NodeSender {
    events: UnboundedSender<NodeEvent>,
}

impl NodeSender {
    /// Posts a message to the node. Returns `false` once the node has shut
    /// down.
    pub fn send(&self, msg: Message) -> bool {
        self.events.send(NodeEvent::Inbound(msg)).is_ok()
    }
}
