//! # seed
//!
//! Prepares a data directory: writes the bundled users, threads and comments
//! for every collection that is not stored yet, then reports what the forum
//! would load.

use std::sync::Arc;

use anyhow::Context;
use configs::{Settings, StorageBackend};
use domains::{KeyValueStore, ThreadCategory};
use services::{Forum, Persistence, SeedData};
use storage_adapters::{FileStore, MemoryStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    configs::init_tracing(&settings.logging);

    let store: Arc<dyn KeyValueStore> = match settings.storage.backend {
        StorageBackend::File => Arc::new(FileStore::open(&settings.storage.data_dir).await?),
        StorageBackend::Memory => {
            warn!("memory backend selected, seeded data is discarded on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let seed = if settings.seed.enabled {
        SeedData::bundled()
    } else {
        SeedData::empty()
    };

    if settings.seed.enabled {
        let report = seed.write_missing(&Persistence::new(store.clone())).await?;
        info!(written = ?report.written, skipped = ?report.skipped, "seed finished");
    } else {
        info!("seeding disabled, nothing written");
    }

    let forum = Forum::open(store, &seed).await;
    for category in ThreadCategory::ALL {
        let threads = forum.threads.threads_in_category(category);
        let answered = threads.iter().filter(|t| t.is_answered()).count();
        info!(%category, threads = threads.len(), answered, "category");
    }
    info!(
        users = forum.users.users().len(),
        comments = forum.threads.comments().len(),
        "forum ready"
    );

    Ok(())
}
