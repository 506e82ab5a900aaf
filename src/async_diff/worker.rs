use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::git::{DiffEngine, RepoCache};

use super::channel::{DiffRequest, DiffResult};

/// Computes diffs off the UI task. Results carry the request's generation so
/// the app can drop answers to requests it has since superseded.
pub struct DiffWorker {
    request_tx: mpsc::UnboundedSender<DiffRequest>,
    result_rx: mpsc::UnboundedReceiver<DiffResult>,
}

impl DiffWorker {
    pub fn new(repo_path: PathBuf) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<DiffRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<DiffResult>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let path = repo_path.clone();
                let tx = result_tx.clone();

                tokio::task::spawn_blocking(move || {
                    let deltas = RepoCache::open(&path)
                        .and_then(|repo| DiffEngine::compute_diff(repo.repo(), &request.options))
                        .map_err(|e| format!("{e:#}"));
                    if let Err(ref e) = deltas {
                        tracing::warn!(generation = request.generation, error = %e, "diff failed");
                    }
                    let _ = tx.send(DiffResult {
                        generation: request.generation,
                        deltas,
                    });
                });
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    pub fn request(&self, req: DiffRequest) {
        let _ = self.request_tx.send(req);
    }

    pub fn try_recv(&mut self) -> Option<DiffResult> {
        self.result_rx.try_recv().ok()
    }
}
