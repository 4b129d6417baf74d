use crate::actor::Callback;
use crate::lease_manager::{
    AcceptInput, AcceptOutput, DecideInput, DecideOutput, LeaseManager, LeaseManagerError, LeaseManagerStatus,
    LeaseRequestInput, LeaseRequestOutput, PaxosPeers, PrepareInput, PrepareSlotOutput, PromiseOutput,
    StatusUpdateOutput,
};
use std::collections::VecDeque;
use std::fmt::Debug;
use tokio::sync::mpsc;

#[derive(Debug)]
pub(crate) enum Event {
    // From the slot timer. Always handled, even while crashed.
    PrepareSlot(Callback<PrepareSlotOutput, LeaseManagerError>),

    // Paxos roles.
    Prepare(PrepareInput, Callback<PromiseOutput, LeaseManagerError>),
    Accept(AcceptInput, Callback<AcceptOutput, LeaseManagerError>),
    Decide(DecideInput, Callback<DecideOutput, LeaseManagerError>),

    // From transaction managers and clients.
    LeaseRequest(LeaseRequestInput, Callback<LeaseRequestOutput, LeaseManagerError>),
    // Parked until the current instance settles.
    StatusUpdate(Callback<StatusUpdateOutput, LeaseManagerError>),
    Status(Callback<LeaseManagerStatus, LeaseManagerError>),
}

/// LeaseManagerClient is how everything else (RPC server, slot driver, local peers) talks to the
/// lease manager actor.
#[derive(Clone)]
pub(crate) struct LeaseManagerClient {
    sender: mpsc::Sender<Event>,
}

impl LeaseManagerClient {
    pub(crate) fn new(queue_size: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(queue_size);

        (LeaseManagerClient { sender: tx }, rx)
    }

    pub(crate) async fn prepare_slot(&self) -> Result<PrepareSlotOutput, LeaseManagerError> {
        self.call(Event::PrepareSlot).await
    }

    pub(crate) async fn prepare(&self, input: PrepareInput) -> Result<PromiseOutput, LeaseManagerError> {
        self.call(|callback| Event::Prepare(input, callback)).await
    }

    pub(crate) async fn accept(&self, input: AcceptInput) -> Result<AcceptOutput, LeaseManagerError> {
        self.call(|callback| Event::Accept(input, callback)).await
    }

    pub(crate) async fn decide(&self, input: DecideInput) -> Result<DecideOutput, LeaseManagerError> {
        self.call(|callback| Event::Decide(input, callback)).await
    }

    pub(crate) async fn lease_request(&self, input: LeaseRequestInput) -> Result<LeaseRequestOutput, LeaseManagerError> {
        self.call(|callback| Event::LeaseRequest(input, callback)).await
    }

    pub(crate) async fn status_update(&self) -> Result<StatusUpdateOutput, LeaseManagerError> {
        self.call(Event::StatusUpdate).await
    }

    pub(crate) async fn status(&self) -> Result<LeaseManagerStatus, LeaseManagerError> {
        self.call(Event::Status).await
    }

    async fn call<O, F>(&self, event: F) -> Result<O, LeaseManagerError>
    where
        O: Debug,
        F: FnOnce(Callback<O, LeaseManagerError>) -> Event,
    {
        let (callback, rx) = Callback::new();
        self.sender
            .send(event(callback))
            .await
            .map_err(|_| LeaseManagerError::ActorExited)?;

        rx.await.map_err(|_| LeaseManagerError::ActorExited)?
    }
}

/// LeaseManagerActor is the lease manager in actor model: one task owns the state, and events are
/// handled one at a time. While the schedule has us crashed, everything but the slot tick is
/// parked and replayed in arrival order once we're back.
pub(crate) struct LeaseManagerActor<P: PaxosPeers> {
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event>,
    lease_manager: LeaseManager<P>,
    parked: VecDeque<Event>,
}

impl<P: PaxosPeers> LeaseManagerActor<P> {
    pub(crate) fn new(logger: slog::Logger, receiver: mpsc::Receiver<Event>, lease_manager: LeaseManager<P>) -> Self {
        LeaseManagerActor {
            logger,
            receiver,
            lease_manager,
            parked: VecDeque::new(),
        }
    }

    pub(crate) async fn run_event_loop(mut self) {
        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }

        slog::info!(self.logger, "Lease manager event loop exited");
    }

    // This must NOT be async. Any long running work must be spawned and report back through a
    // client.
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::PrepareSlot(callback) => {
                callback.send(Ok(self.lease_manager.prepare_slot()));
                if !self.lease_manager.is_crashed() {
                    self.replay_parked();
                }
            }
            event if self.lease_manager.is_crashed() => self.parked.push_back(event),
            Event::Prepare(input, callback) => callback.send(self.lease_manager.handle_prepare(input)),
            Event::Accept(input, callback) => callback.send(self.lease_manager.handle_accept(input)),
            Event::Decide(input, callback) => callback.send(self.lease_manager.handle_decide(input)),
            Event::LeaseRequest(input, callback) => callback.send(self.lease_manager.handle_lease_request(input)),
            Event::StatusUpdate(callback) => self.lease_manager.handle_status_update(callback),
            Event::Status(callback) => callback.send(Ok(self.lease_manager.status())),
        }
    }

    fn replay_parked(&mut self) {
        if self.parked.is_empty() {
            return;
        }

        slog::info!(self.logger, "Replaying {} requests parked while crashed", self.parked.len());
        let parked = std::mem::take(&mut self.parked);
        for event in parked {
            self.handle_event(event);
        }
    }
}
