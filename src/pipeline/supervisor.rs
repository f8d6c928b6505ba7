use std::sync::Arc;

use futures::future::join_all;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api;
use crate::app::{AppContext, Result};
use crate::domain::FeedSource;
use crate::fetcher::FeedReader;
use crate::pipeline::{
    channels, log_error, run_error_consumer, run_ingestion_consumer, FeedPoller, IngestionError,
};
use crate::shutdown::{self, ShutdownSignal};
use crate::store::Store;

/// The set of tasks that turns feeds into stored items.
pub struct Pipeline {
    sources: Vec<FeedSource>,
    reader: Arc<dyn FeedReader + Send + Sync>,
    store: Arc<dyn Store + Send + Sync>,
}

/// Running pipeline tasks.
pub struct PipelineHandle {
    pollers: Vec<JoinHandle<u64>>,
    ingestion: JoinHandle<usize>,
    errors: JoinHandle<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub cycles: u64,
    pub batches: usize,
    pub errors: usize,
}

impl Pipeline {
    pub fn new(
        sources: Vec<FeedSource>,
        reader: Arc<dyn FeedReader + Send + Sync>,
        store: Arc<dyn Store + Send + Sync>,
    ) -> Self {
        Self {
            sources,
            reader,
            store,
        }
    }

    /// Start the pipeline, logging every ingestion error.
    pub fn spawn(self, shutdown: ShutdownSignal) -> PipelineHandle {
        self.spawn_with_reporter(shutdown, log_error)
    }

    /// Start one poller per source plus the two consumers.
    ///
    /// Only the pollers watch `shutdown`. The consumers stop on their own once
    /// every producer has dropped its sender, after draining whatever was
    /// already queued.
    pub fn spawn_with_reporter<F>(self, shutdown: ShutdownSignal, report: F) -> PipelineHandle
    where
        F: FnMut(&IngestionError) + Send + 'static,
    {
        let (sinks, drains) = channels();

        let pollers = self
            .sources
            .into_iter()
            .map(|source| {
                let poller =
                    FeedPoller::new(source, self.reader.clone(), sinks.clone(), shutdown.clone());
                tokio::spawn(poller.run())
            })
            .collect();

        let ingestion = tokio::spawn(run_ingestion_consumer(
            drains.batches,
            self.store,
            self.reader.clone(),
            sinks.errors.clone(),
        ));
        let errors = tokio::spawn(run_error_consumer(drains.errors, report));

        // From here on only the pollers and the ingestion consumer hold senders.
        drop(sinks);

        PipelineHandle {
            pollers,
            ingestion,
            errors,
        }
    }
}

impl PipelineHandle {
    /// Wait for every task to finish. Call after triggering shutdown.
    pub async fn join(self) -> PipelineStats {
        let mut stats = PipelineStats::default();

        for result in join_all(self.pollers).await {
            match result {
                Ok(cycles) => stats.cycles += cycles,
                Err(e) => tracing::error!("Poller join error: {}", e),
            }
        }

        match self.ingestion.await {
            Ok(batches) => stats.batches = batches,
            Err(e) => tracing::error!("Ingestion consumer join error: {}", e),
        }

        match self.errors.await {
            Ok(errors) => stats.errors = errors,
            Err(e) => tracing::error!("Error consumer join error: {}", e),
        }

        stats
    }
}

/// Process entry point: start the pipeline and serve the API until a
/// termination signal arrives.
///
/// The listener is bound before any poller starts, so a taken port fails the
/// process without having touched a single feed.
pub async fn run(ctx: AppContext) -> Result<()> {
    let sources = ctx.config.sources()?;
    tracing::info!("Store holds {} items", ctx.store.count()?);

    let listener = TcpListener::bind(ctx.config.server.listen).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let (shutdown, signal) = shutdown::channel();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown::wait_for_os_signal().await;
            tracing::info!("Shutdown requested");
            shutdown.trigger();
        });
    }

    tracing::info!("Starting {} feed pollers", sources.len());
    let pipeline =
        Pipeline::new(sources, ctx.reader.clone(), ctx.store.clone()).spawn(signal.clone());

    let app = api::router(ctx.store.clone(), Some(ctx.config.server.static_dir.as_path()));
    let mut server_signal = signal;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_signal.triggered().await })
        .await;

    // The server only returns on shutdown or failure; either way stop polling.
    shutdown.trigger();
    let stats = pipeline.join().await;
    tracing::info!(
        "Pipeline stopped: {} poll cycles, {} batches, {} errors",
        stats.cycles,
        stats.batches,
        stats.errors
    );

    served?;
    Ok(())
}
