use crate::actor::Callback;
use crate::transaction_manager::{
    AdoptLogOutput, ApplyStatusInput, ApplyStatusOutput, BeginSlotOutput, CommitPlan, Contention, KeyValue,
    LeaseManagers, SameSlotLeaseExecutionInput, SameSlotLeaseExecutionOutput, SuspicionInput, SuspicionOutput,
    TransactionManager, TransactionManagerError, TransactionManagerPhase, TransactionManagerStatus, TxCommitInput,
    TxCommitOutput, TxId, TxPrepareInput, TxPrepareOutput, TxSubmitInput, TxSubmitOutput, UpdateOutput,
};
use std::collections::VecDeque;
use std::fmt::Debug;
use tokio::sync::mpsc;

#[derive(Debug)]
pub(crate) enum Event {
    // From the slot driver. Always handled, even while crashed.
    BeginSlot(Callback<BeginSlotOutput, TransactionManagerError>),
    EnterPhase(TransactionManagerPhase, Callback<(), TransactionManagerError>),
    AdoptLog(Vec<KeyValue>, Callback<AdoptLogOutput, TransactionManagerError>),
    ApplyStatus(ApplyStatusInput, Callback<ApplyStatusOutput, TransactionManagerError>),
    ClearContention(Contention, Callback<(), TransactionManagerError>),
    CommitPlans(Callback<Vec<CommitPlan>, TransactionManagerError>),
    FinishCommit(TxId, Callback<(), TransactionManagerError>),
    EndSlot(Callback<(), TransactionManagerError>),
    // Local observability, never parked.
    Snapshot(Callback<TransactionManagerStatus, TransactionManagerError>),

    // From clients. Parked until committed.
    TxSubmit(TxSubmitInput, Callback<TxSubmitOutput, TransactionManagerError>),
    Status(Callback<TransactionManagerStatus, TransactionManagerError>),

    // From other transaction managers.
    Prepare(TxPrepareInput, Callback<TxPrepareOutput, TransactionManagerError>),
    Commit(TxCommitInput, Callback<TxCommitOutput, TransactionManagerError>),
    Update(Callback<UpdateOutput, TransactionManagerError>),
    // Parked until our side of the race is released.
    SameSlotLeaseExecution(
        SameSlotLeaseExecutionInput,
        Callback<SameSlotLeaseExecutionOutput, TransactionManagerError>,
    ),
    Suspicion(SuspicionInput, Callback<SuspicionOutput, TransactionManagerError>),
}

impl Event {
    /// Requests from outside this process, which a crashed process doesn't see.
    fn is_inbound(&self) -> bool {
        matches!(
            self,
            Event::TxSubmit(..)
                | Event::Status(..)
                | Event::Prepare(..)
                | Event::Commit(..)
                | Event::Update(..)
                | Event::SameSlotLeaseExecution(..)
                | Event::Suspicion(..)
        )
    }
}

/// TransactionManagerClient is how the RPC server, the slot driver and local peers talk to the
/// transaction manager actor.
#[derive(Clone)]
pub(crate) struct TransactionManagerClient {
    sender: mpsc::Sender<Event>,
}

impl TransactionManagerClient {
    pub(crate) fn new(queue_size: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(queue_size);

        (TransactionManagerClient { sender: tx }, rx)
    }

    pub(crate) async fn begin_slot(&self) -> Result<BeginSlotOutput, TransactionManagerError> {
        self.call(Event::BeginSlot).await
    }

    pub(crate) async fn enter_phase(&self, phase: TransactionManagerPhase) -> Result<(), TransactionManagerError> {
        self.call(|callback| Event::EnterPhase(phase, callback)).await
    }

    pub(crate) async fn adopt_log(&self, log: Vec<KeyValue>) -> Result<AdoptLogOutput, TransactionManagerError> {
        self.call(|callback| Event::AdoptLog(log, callback)).await
    }

    pub(crate) async fn apply_status(
        &self,
        input: ApplyStatusInput,
    ) -> Result<ApplyStatusOutput, TransactionManagerError> {
        self.call(|callback| Event::ApplyStatus(input, callback)).await
    }

    pub(crate) async fn clear_contention(&self, contention: Contention) -> Result<(), TransactionManagerError> {
        self.call(|callback| Event::ClearContention(contention, callback))
            .await
    }

    pub(crate) async fn commit_plans(&self) -> Result<Vec<CommitPlan>, TransactionManagerError> {
        self.call(Event::CommitPlans).await
    }

    pub(crate) async fn finish_commit(&self, tx_id: TxId) -> Result<(), TransactionManagerError> {
        self.call(|callback| Event::FinishCommit(tx_id, callback)).await
    }

    pub(crate) async fn end_slot(&self) -> Result<(), TransactionManagerError> {
        self.call(Event::EndSlot).await
    }

    pub(crate) async fn snapshot(&self) -> Result<TransactionManagerStatus, TransactionManagerError> {
        self.call(Event::Snapshot).await
    }

    pub(crate) async fn tx_submit(&self, input: TxSubmitInput) -> Result<TxSubmitOutput, TransactionManagerError> {
        self.call(|callback| Event::TxSubmit(input, callback)).await
    }

    pub(crate) async fn status(&self) -> Result<TransactionManagerStatus, TransactionManagerError> {
        self.call(Event::Status).await
    }

    pub(crate) async fn prepare(&self, input: TxPrepareInput) -> Result<TxPrepareOutput, TransactionManagerError> {
        self.call(|callback| Event::Prepare(input, callback)).await
    }

    pub(crate) async fn commit(&self, input: TxCommitInput) -> Result<TxCommitOutput, TransactionManagerError> {
        self.call(|callback| Event::Commit(input, callback)).await
    }

    pub(crate) async fn update(&self) -> Result<UpdateOutput, TransactionManagerError> {
        self.call(Event::Update).await
    }

    pub(crate) async fn same_slot_lease_execution(
        &self,
        input: SameSlotLeaseExecutionInput,
    ) -> Result<SameSlotLeaseExecutionOutput, TransactionManagerError> {
        self.call(|callback| Event::SameSlotLeaseExecution(input, callback))
            .await
    }

    pub(crate) async fn suspicion(&self, input: SuspicionInput) -> Result<SuspicionOutput, TransactionManagerError> {
        self.call(|callback| Event::Suspicion(input, callback)).await
    }

    async fn call<O, F>(&self, event: F) -> Result<O, TransactionManagerError>
    where
        O: Debug,
        F: FnOnce(Callback<O, TransactionManagerError>) -> Event,
    {
        let (callback, rx) = Callback::new();
        self.sender
            .send(event(callback))
            .await
            .map_err(|_| TransactionManagerError::ActorExited)?;

        rx.await.map_err(|_| TransactionManagerError::ActorExited)?
    }
}

/// TransactionManagerActor owns a TransactionManager and handles events one at a time. While the
/// schedule has us crashed, inbound requests are parked and replayed in arrival order once we're
/// back.
pub(crate) struct TransactionManagerActor<L: LeaseManagers> {
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event>,
    transaction_manager: TransactionManager<L>,
    parked: VecDeque<Event>,
}

impl<L: LeaseManagers> TransactionManagerActor<L> {
    pub(crate) fn new(
        logger: slog::Logger,
        receiver: mpsc::Receiver<Event>,
        transaction_manager: TransactionManager<L>,
    ) -> Self {
        TransactionManagerActor {
            logger,
            receiver,
            transaction_manager,
            parked: VecDeque::new(),
        }
    }

    pub(crate) async fn run_event_loop(mut self) {
        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }

        slog::info!(self.logger, "Transaction manager event loop exited");
    }

    // This must NOT be async. Any long running work must be spawned and report back through a
    // client.
    fn handle_event(&mut self, event: Event) {
        let tm = &mut self.transaction_manager;

        match event {
            Event::BeginSlot(callback) => {
                callback.send(Ok(tm.begin_slot()));
                if !tm.is_crashed() {
                    self.replay_parked();
                }
            }
            event if event.is_inbound() && tm.is_crashed() => self.parked.push_back(event),
            Event::EnterPhase(phase, callback) => callback.send(Ok(tm.enter_phase(phase))),
            Event::AdoptLog(log, callback) => callback.send(Ok(tm.adopt_log(log))),
            Event::ApplyStatus(input, callback) => callback.send(Ok(tm.apply_status(input))),
            Event::ClearContention(contention, callback) => callback.send(Ok(tm.clear_contention(contention))),
            Event::CommitPlans(callback) => callback.send(Ok(tm.commit_plans())),
            Event::FinishCommit(tx_id, callback) => callback.send(Ok(tm.finish_commit(tx_id))),
            Event::EndSlot(callback) => callback.send(Ok(tm.end_slot())),
            Event::Snapshot(callback) => callback.send(Ok(tm.status())),
            Event::TxSubmit(input, callback) => tm.handle_tx_submit(input, callback),
            Event::Status(callback) => callback.send(Ok(tm.status())),
            Event::Prepare(input, callback) => callback.send(tm.handle_prepare(input)),
            Event::Commit(input, callback) => callback.send(tm.handle_commit(input)),
            Event::Update(callback) => callback.send(tm.handle_update()),
            Event::SameSlotLeaseExecution(input, callback) => tm.handle_same_slot_lease_execution(input, callback),
            Event::Suspicion(input, callback) => callback.send(tm.handle_suspicion(input)),
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
