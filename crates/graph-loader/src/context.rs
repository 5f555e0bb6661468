use crate::error::LoadError;
use crate::loader::{verify, LoadOptions, LoadReport, Loader};
use graph_sink::GraphSink;
use tbl_source::TblDirectory;
use tracing::{info, warn};

/// One load run: the sink, the source directory and the options.
///
/// [`LoadContext::run`] performs clear, setup, load, graph declaration and
/// verification, and closes the sink on every exit path.
pub struct LoadContext<S: GraphSink> {
    sink: S,
    source: TblDirectory,
    options: LoadOptions,
}

impl<S: GraphSink> LoadContext<S> {
    pub fn new(sink: S, source: TblDirectory, options: LoadOptions) -> Self {
        Self {
            sink,
            source,
            options,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub async fn run(&self) -> Result<LoadReport, LoadError> {
        let result = self.run_stages().await;
        let closed = self
            .sink
            .close()
            .await
            .map_err(LoadError::backend("close"));

        match (result, closed) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(
                    "Failed to close {} sink after error: {close_err}",
                    self.sink.name()
                );
                Err(e)
            }
        }
    }

    async fn run_stages(&self) -> Result<LoadReport, LoadError> {
        let mut loader = Loader::new(&self.sink, &self.options)?;
        let sink = &self.sink;

        info!(
            "Starting TPC-H load from {} into {} (batch size {})",
            self.source.root().display(),
            sink.name(),
            self.options.batch_size
        );

        if self.options.dry_run {
            info!("Dry run: {} will not be modified", sink.name());
        } else {
            sink.clear().await.map_err(LoadError::backend("clear"))?;
            sink.setup().await.map_err(LoadError::backend("setup"))?;
        }

        let report = loader.load_all(&self.source).await?;

        if !self.options.dry_run {
            sink.declare_graph()
                .await
                .map_err(LoadError::backend("graph declaration"))?;
            if self.options.verify {
                verify(sink, &report).await?;
            }
        }

        info!("TPC-H load into {} completed", sink.name());
        Ok(report)
    }
}
