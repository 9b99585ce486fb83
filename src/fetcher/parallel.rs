use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::app::{AlmanacError, Result};
use crate::fetcher::{FetchResponse, Fetcher};

pub const DEFAULT_WORKERS: usize = 5;

/// Runs many GETs concurrently, bounded by a semaphore.
#[derive(Clone)]
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Fetch every URL, returning results in input order.
    pub async fn fetch_all(&self, urls: Vec<String>) -> Vec<(String, Result<FetchResponse>)> {
        let mut handles = Vec::with_capacity(urls.len());

        for url in urls {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();

            let handle = tokio::spawn(async move {
                let result = match semaphore.acquire().await {
                    Ok(_permit) => fetcher.fetch(&url).await,
                    Err(e) => Err(AlmanacError::Other(e.to_string())),
                };
                (url, result)
            });

            handles.push(handle);
        }

        futures::future::join_all(handles)
            .await
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                    None
                }
            })
            .collect()
    }
}
