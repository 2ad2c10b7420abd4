//! Background job channel for the prediction controller.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;
use std::time::{Duration, Instant};

use crate::predict::FieldSet;
use crate::predict::api::{self, PredictError, PredictionReply};

pub(crate) enum JobMessage {
    PredictSettled(PredictResult),
}

#[derive(Debug)]
pub(crate) struct PredictJob {
    pub(crate) request_id: u64,
    pub(crate) endpoint: String,
    pub(crate) fields: FieldSet,
}

#[derive(Debug)]
pub(crate) struct PredictResult {
    pub(crate) request_id: u64,
    pub(crate) result: Result<PredictionReply, PredictError>,
    pub(crate) elapsed: Duration,
}

/// Channel plumbing plus the request sequence fence.
///
/// Concurrent submissions are not cancelled; instead each request carries a
/// monotonically increasing id, and only the most recently issued one may
/// apply its result. A stale response settling late is dropped.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    next_request_id: u64,
    latest_request_id: Option<u64>,
}

impl ControllerJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            next_request_id: 1,
            latest_request_id: None,
        }
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(crate) fn next_request_id(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1).max(1);
        request_id
    }

    /// True when `request_id` is the newest issued request.
    pub(crate) fn is_current(&self, request_id: u64) -> bool {
        self.latest_request_id == Some(request_id)
    }

    pub(crate) fn clear_in_flight(&mut self) {
        self.latest_request_id = None;
    }

    /// Spawn the blocking prediction call on a worker thread.
    ///
    /// Deliberately no in-progress guard: a second submit races the first
    /// and the sequence fence decides which settled result is applied.
    pub(crate) fn begin_predict(&mut self, job: PredictJob) {
        self.latest_request_id = Some(job.request_id);
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let started = Instant::now();
            let result = api::request_prediction(&job.endpoint, &job.fields);
            let _ = tx.send(JobMessage::PredictSettled(PredictResult {
                request_id: job.request_id,
                result,
                elapsed: started.elapsed(),
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_increase_monotonically() {
        let mut jobs = ControllerJobs::new();
        let first = jobs.next_request_id();
        let second = jobs.next_request_id();
        assert!(second > first);
    }

    #[test]
    fn only_the_newest_request_is_current() {
        let mut jobs = ControllerJobs::new();
        let first = jobs.next_request_id();
        let second = jobs.next_request_id();
        jobs.latest_request_id = Some(first);
        jobs.latest_request_id = Some(second);
        assert!(!jobs.is_current(first));
        assert!(jobs.is_current(second));
        jobs.clear_in_flight();
        assert!(!jobs.is_current(second));
    }
}
