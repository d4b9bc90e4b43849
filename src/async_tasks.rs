//! Background loading of table data
//!
//! Parsing runs on a blocking task so the render loop keeps drawing the
//! loading spinner. Results come back to the main loop as [`TaskMessage`]s.

use crate::data::{infer_columns, load_rows};
use crate::table::Column;
use crate::types::Row;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Messages sent from background tasks to the main thread
#[derive(Debug)]
pub enum TaskMessage {
    /// Data loading started
    DataLoadingStarted { file_path: String },

    /// Data parsed and a column schema inferred
    DataLoaded {
        rows: Vec<Row>,
        columns: Vec<Column>,
        file_path: String,
    },

    /// Data loading failed
    DataLoadError { error: String },
}

/// Manages spawning and communication with background tasks
pub struct AsyncTaskRunner {
    tx: mpsc::UnboundedSender<TaskMessage>,
}

impl AsyncTaskRunner {
    pub fn new(tx: mpsc::UnboundedSender<TaskMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task to read and parse a JSON data file
    pub fn spawn_load_data(&self, file_path: String) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move { load_data_task(file_path, tx).await })
    }
}

async fn load_data_task(file_path: String, tx: mpsc::UnboundedSender<TaskMessage>) {
    tracing::info!("Starting data load task: {}", file_path);

    let _ = tx.send(TaskMessage::DataLoadingStarted {
        file_path: file_path.clone(),
    });

    let path = PathBuf::from(file_path.clone());
    let parse_result = tokio::task::spawn_blocking(move || {
        let rows = load_rows(&path)?;
        let columns = infer_columns(&rows);
        Ok::<_, crate::error::AppError>((rows, columns))
    })
    .await;

    let message = match parse_result {
        Ok(Ok((rows, columns))) => {
            tracing::debug!(
                "Data parsed: {} rows, {} columns",
                rows.len(),
                columns.len()
            );
            TaskMessage::DataLoaded {
                rows,
                columns,
                file_path,
            }
        }
        Ok(Err(e)) => {
            tracing::error!("Data parsing error: {}", e);
            TaskMessage::DataLoadError {
                error: e.to_string(),
            }
        }
        Err(e) => {
            tracing::error!("Task join error during data parsing: {}", e);
            TaskMessage::DataLoadError {
                error: format!("Task join error: {}", e),
            }
        }
    };

    let _ = tx.send(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_data_sends_started_then_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Outage", "type": "incident"}}]"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = AsyncTaskRunner::new(tx);
        runner.spawn_load_data(path.clone()).await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(TaskMessage::DataLoadingStarted { .. })
        ));
        match rx.recv().await {
            Some(TaskMessage::DataLoaded {
                rows,
                columns,
                file_path,
            }) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(columns.len(), 2);
                assert_eq!(file_path, path);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_data_reports_errors() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = AsyncTaskRunner::new(tx);
        runner
            .spawn_load_data("/no/such/file.json".to_string())
            .await
            .unwrap();

        let _ = rx.recv().await;
        assert!(matches!(
            rx.recv().await,
            Some(TaskMessage::DataLoadError { .. })
        ));
    }
}
