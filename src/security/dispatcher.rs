//! Background dispatch of security checks
//!
//! Requests are queued on a channel and picked up by a fixed pool of worker
//! threads. Submitting never blocks and never fails; whatever goes wrong on a
//! worker is logged and dropped.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use super::validator::{SecurityValidator, ValidationRequest};
use crate::error::{AccountingError, AccountingResult};

/// Worker pool sending security checks to a [`SecurityValidator`]
pub struct SecurityCheckDispatcher {
    sender: Option<Sender<ValidationRequest>>,
    workers: Vec<JoinHandle<()>>,
}

impl SecurityCheckDispatcher {
    /// Spawn `workers` threads (at least one) feeding `validator`
    pub fn start(validator: Arc<dyn SecurityValidator>, workers: usize) -> AccountingResult<Self> {
        let (sender, receiver) = mpsc::channel::<ValidationRequest>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..workers.max(1))
            .map(|index| {
                let receiver = Arc::clone(&receiver);
                let validator = Arc::clone(&validator);
                thread::Builder::new()
                    .name(format!("security-check-{}", index))
                    .spawn(move || run_worker(receiver, validator))
                    .map_err(|e| {
                        AccountingError::SecurityCheck(format!("Failed to spawn worker: {}", e))
                    })
            })
            .collect::<AccountingResult<Vec<_>>>()?;

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Queue a check and return immediately
    pub fn submit(&self, request: ValidationRequest) {
        let account_number = request.account_number;
        let queued = self
            .sender
            .as_ref()
            .map(|sender| sender.send(request).is_ok())
            .unwrap_or(false);

        if queued {
            debug!(%account_number, "security check queued");
        } else {
            warn!(%account_number, "security check queue is closed, request dropped");
        }
    }

    /// Stop accepting requests and wait until queued ones are handled
    pub fn shutdown(&mut self) {
        // Closing the channel ends each worker once the queue is drained
        self.sender.take();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("security check worker panicked");
            }
        }
    }
}

impl Drop for SecurityCheckDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(receiver: Arc<Mutex<Receiver<ValidationRequest>>>, validator: Arc<dyn SecurityValidator>) {
    loop {
        let next = match receiver.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => break,
        };

        let request = match next {
            Ok(request) => request,
            Err(_) => break,
        };

        match validator.security_check(&request) {
            Ok(()) => debug!(
                account_number = %request.account_number,
                "security check requested"
            ),
            Err(e) => warn!(
                account_number = %request.account_number,
                holder = %request.account_holder_name,
                error = %e,
                "error when requesting security check"
            ),
        }
    }
}
