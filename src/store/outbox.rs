use crate::core::error::NotifyError;
use crate::core::notify::{Notifier, validate_address};
use async_trait::async_trait;
use chrono::Local;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

/// Delivers messages by writing them as text files into a directory.
pub struct OutboxNotifier {
    dir: PathBuf,
    seq: AtomicU32,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seq: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let address = validate_address(address)?;
        let delivery = |e: std::io::Error| NotifyError::Delivery(e.to_string());

        tokio::fs::create_dir_all(&self.dir).await.map_err(delivery)?;
        let name = format!(
            "email_{}_{}.txt",
            Local::now().format("%Y%m%d_%H%M%S"),
            self.seq.fetch_add(1, Ordering::SeqCst)
        );
        let path = self.dir.join(name);
        let content = format!("To: {address}\nSubject: {subject}\n\n{body}\n");
        tokio::fs::write(&path, content).await.map_err(delivery)?;

        info!(to = %address, path = %path.display(), "Message written to outbox");
        Ok(())
    }
}
